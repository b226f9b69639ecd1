use crate::engine::verdict::{HIGH_AMOUNT, SUSPICIOUS_LOCATION, UNUSUAL_MERCHANT};
use crate::engine::{Amount, TransactionRecord, Verdict};

/// Scoring strategy contract: turns one record into one verdict and never
/// fails. Every failure mode must be encoded in the verdict itself, so a
/// batch can keep going no matter what a single row does.
pub trait RiskScorer {
    fn score(&self, record: &TransactionRecord) -> Verdict;
}

/// In-process heuristic scorer. Pure and synchronous: no I/O, no clock,
/// no randomness. The original system drove its "unusual pattern" signal
/// from an unseeded random draw; here it is derived from the merchant
/// name so the same record always yields the same verdict.
#[derive(Debug, Default, Clone)]
pub struct LocalHeuristicScorer;

// Pattern score above the first threshold flags the record as fraud; above
// the second it also surfaces the merchant-pattern risk factor.
const PATTERN_FRAUD_THRESHOLD: f64 = 0.7;
const PATTERN_FACTOR_THRESHOLD: f64 = 0.8;

impl LocalHeuristicScorer {
    pub fn new() -> Self {
        LocalHeuristicScorer
    }

    /// Fraction of merchant-name characters that are neither alphanumeric
    /// nor whitespace. Ordinary names score 0.0; names that are mostly
    /// symbols approach 1.0. Empty merchants score 0.0.
    fn merchant_pattern_score(merchant: &str) -> f64 {
        let total = merchant.chars().count();
        if total == 0 {
            return 0.0;
        }
        let suspicious = merchant
            .chars()
            .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
            .count();
        suspicious as f64 / total as f64
    }

    /// Integer confidence: [75, 95) for fraud, [80, 95) for legitimate,
    /// spread deterministically by the amount instead of a random draw.
    fn confidence_for(is_fraud: bool, amount: Amount) -> u8 {
        let jitter = (amount.units().rem_euclid(97)) as f64 / 97.0;
        let confidence = if is_fraud {
            75.0 + jitter * 20.0
        } else {
            80.0 + jitter * 15.0
        };
        confidence.floor() as u8
    }
}

impl RiskScorer for LocalHeuristicScorer {
    fn score(&self, record: &TransactionRecord) -> Verdict {
        let high_amount = record.amount > Amount::HIGH_THRESHOLD;
        let pattern_score = Self::merchant_pattern_score(&record.merchant);
        let is_fraud = high_amount || pattern_score > PATTERN_FRAUD_THRESHOLD;

        let mut risk_factors = Vec::new();
        if high_amount {
            risk_factors.push(HIGH_AMOUNT.to_string());
        }
        if pattern_score > PATTERN_FACTOR_THRESHOLD {
            risk_factors.push(UNUSUAL_MERCHANT.to_string());
        }
        if record.location.to_lowercase().contains("unknown") {
            risk_factors.push(SUSPICIOUS_LOCATION.to_string());
        }

        let confidence = Self::confidence_for(is_fraud, record.amount);
        log::debug!(
            "Scored record merchant={:?} amount={} -> fraud={} confidence={}",
            record.merchant,
            record.amount,
            is_fraud,
            confidence
        );

        Verdict::scored(record, is_fraud, confidence, risk_factors)
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::verdict::{HIGH_AMOUNT, SUSPICIOUS_LOCATION, UNUSUAL_MERCHANT};
    use crate::engine::{LocalHeuristicScorer, RiskScorer, TransactionRecord};

    #[test]
    fn test_that_high_amount_flags_fraud() {
        let scorer = LocalHeuristicScorer::new();
        let record = TransactionRecord::from_parts("5000.01", "ShopX", "Paris", "10:00");

        let verdict = scorer.score(&record);
        assert!(verdict.is_fraud);
        assert!(verdict.risk_factors.contains(&HIGH_AMOUNT.to_string()));
    }

    #[test]
    fn test_that_amount_at_threshold_is_legitimate() {
        let scorer = LocalHeuristicScorer::new();
        let record = TransactionRecord::from_parts("5000", "ShopX", "Paris", "10:00");

        let verdict = scorer.score(&record);
        assert!(!verdict.is_fraud);
        assert!(verdict.risk_factors.is_empty());
    }

    #[test]
    fn test_that_symbol_heavy_merchant_trips_pattern_signal() {
        let scorer = LocalHeuristicScorer::new();
        let record = TransactionRecord::from_parts("10", "$$$-###!!!", "Paris", "10:00");

        let verdict = scorer.score(&record);
        assert!(verdict.is_fraud);
        assert!(verdict.risk_factors.contains(&UNUSUAL_MERCHANT.to_string()));
    }

    #[test]
    fn test_that_unknown_location_adds_factor_on_fraud_only() {
        let scorer = LocalHeuristicScorer::new();

        let fraud = scorer.score(&TransactionRecord::from_parts(
            "7000",
            "ShopX",
            "Unknown City",
            "13:00",
        ));
        assert!(fraud.is_fraud);
        assert!(fraud.risk_factors.contains(&HIGH_AMOUNT.to_string()));
        assert!(fraud.risk_factors.contains(&SUSPICIOUS_LOCATION.to_string()));

        let legitimate = scorer.score(&TransactionRecord::from_parts(
            "10",
            "ShopY",
            "UNKNOWN",
            "09:00",
        ));
        assert!(!legitimate.is_fraud);
        assert!(legitimate.risk_factors.is_empty());
    }

    #[test]
    fn test_that_confidence_stays_in_contract_range() {
        let scorer = LocalHeuristicScorer::new();
        for amount in ["0", "10", "123.45", "4999.99", "5000.01", "7000", "99999"] {
            let verdict = scorer.score(&TransactionRecord::from_parts(amount, "Shop", "", ""));
            assert!(verdict.confidence <= 100);
            if verdict.is_fraud {
                assert!((75..=95).contains(&verdict.confidence));
            } else {
                assert!((80..=95).contains(&verdict.confidence));
            }
        }
    }

    #[test]
    fn test_that_scoring_is_deterministic() {
        let scorer = LocalHeuristicScorer::new();
        let record = TransactionRecord::from_parts("1250.00", "Online Store XYZ", "New York", "12:30");
        assert_eq!(scorer.score(&record), scorer.score(&record));
    }
}
