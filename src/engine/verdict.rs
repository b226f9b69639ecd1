use serde::{Deserialize, Serialize};

use crate::engine::TransactionRecord;

/// Risk factor strings surfaced to the user alongside a fraud verdict.
pub const HIGH_AMOUNT: &str = "High transaction amount";
pub const UNUSUAL_MERCHANT: &str = "Unusual merchant pattern";
pub const SUSPICIOUS_LOCATION: &str = "Suspicious location";
pub const HIGH_PROBABILITY: &str = "High fraud probability";
pub const BACKEND_ERROR: &str = "Error connecting to backend";

/// The scoring outcome for one transaction record.
///
/// `risk_factors` is non-empty only when `is_fraud` is true, with one
/// exception: the backend-error sentinel carries [`BACKEND_ERROR`] while
/// flagging the transaction according to the configured error policy. A
/// zero-confidence verdict is an "unknown", not a trustworthy negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub is_fraud: bool,
    pub confidence: u8,
    pub risk_factors: Vec<String>,
    pub amount: String,
    pub merchant: String,
}

impl Verdict {
    /// Builds a verdict for a scored record, echoing amount and merchant
    /// for display. Risk factors are kept only on fraud verdicts.
    pub fn scored(
        record: &TransactionRecord,
        is_fraud: bool,
        confidence: u8,
        risk_factors: Vec<String>,
    ) -> Self {
        Verdict {
            is_fraud,
            confidence,
            risk_factors: if is_fraud { risk_factors } else { Vec::new() },
            amount: record.amount.to_string(),
            merchant: record.merchant.clone(),
        }
    }
}

/// A flat projection of a Verdict for CSV output.
/// It decouples the report format from the engine type and keeps
/// serialisation trivial.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct VerdictRow {
    pub amount: String,
    pub merchant: String,
    pub is_fraud: bool,
    pub confidence: u8,
    pub risk_factors: String,
}

impl From<&Verdict> for VerdictRow {
    fn from(verdict: &Verdict) -> Self {
        VerdictRow {
            amount: verdict.amount.clone(),
            merchant: verdict.merchant.clone(),
            is_fraud: verdict.is_fraud,
            confidence: verdict.confidence,
            risk_factors: verdict.risk_factors.join("; "),
        }
    }
}
