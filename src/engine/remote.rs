use reqwest::blocking::multipart;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::verdict::{BACKEND_ERROR, HIGH_AMOUNT, HIGH_PROBABILITY};
use crate::engine::{Amount, RiskScorer, TransactionRecord, Verdict};

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Scoring backend returned HTTP {0}")]
    HttpStatus(u16),
}

/// What a remote failure turns into at the verdict boundary.
///
/// `FailOpen` (the default) reports the transaction as legitimate with zero
/// confidence; `FailClosed` flags it as fraud instead. Either way the
/// verdict carries [`BACKEND_ERROR`] so callers can tell an "unknown" from
/// a real negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    #[default]
    FailOpen,
    FailClosed,
}

#[derive(Serialize, Debug)]
struct PredictRequest {
    amount: f64,
    time: i64,
}

#[derive(Deserialize, Debug)]
struct PredictResponse {
    prediction: i64,
    probability: f64,
}

#[derive(Deserialize, Debug)]
struct FilePredictions {
    predictions: Vec<FilePrediction>,
}

#[derive(Deserialize, Debug)]
struct FilePrediction {
    #[serde(rename = "Amount", default)]
    amount: f64,
    #[serde(rename = "Fraud_Prediction")]
    prediction: i64,
    #[serde(rename = "Fraud_Probability")]
    probability: f64,
}

/// Scorer that delegates to an external prediction service: one POST to
/// `/predict` per record, or one `/predict-file` upload for a whole batch.
/// Transport and non-success failures never escape [`RiskScorer::score`];
/// they resolve to the backend-error sentinel per the configured policy.
pub struct RemoteScorer {
    client: reqwest::blocking::Client,
    base_url: String,
    policy: ErrorPolicy,
}

impl RemoteScorer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_policy(base_url, ErrorPolicy::default())
    }

    pub fn with_policy(base_url: impl Into<String>, policy: ErrorPolicy) -> Self {
        RemoteScorer {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
            policy,
        }
    }

    fn predict(&self, record: &TransactionRecord) -> Result<Verdict, RemoteError> {
        let request = PredictRequest {
            amount: record.amount.to_f64(),
            time: record.time_as_integer(),
        };
        log::debug!("Sending prediction request: {request:?}");

        let response = self
            .client
            .post(format!("{}/predict", self.base_url))
            .json(&request)
            .send()?;

        if !response.status().is_success() {
            Err(RemoteError::HttpStatus(response.status().as_u16()))?
        }

        let prediction: PredictResponse = response.json()?;
        log::debug!("Received prediction response: {prediction:?}");
        Ok(verdict_from_prediction(record, &prediction))
    }

    /// Uploads a raw CSV file and maps the backend's batch predictions to
    /// verdicts in response order. The backend parses the file itself, so
    /// this is a single round-trip no matter the row count.
    pub fn score_file(&self, file_name: &str, content: Vec<u8>) -> Result<Vec<Verdict>, RemoteError> {
        let part = multipart::Part::bytes(content).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/predict-file", self.base_url))
            .multipart(form)
            .send()?;

        if !response.status().is_success() {
            Err(RemoteError::HttpStatus(response.status().as_u16()))?
        }

        let parsed: FilePredictions = response.json()?;
        log::debug!("Received {} batch predictions", parsed.predictions.len());
        Ok(verdicts_from_file_predictions(&parsed))
    }

    fn sentinel(&self, record: &TransactionRecord) -> Verdict {
        Verdict {
            is_fraud: self.policy == ErrorPolicy::FailClosed,
            confidence: 0,
            risk_factors: vec![BACKEND_ERROR.to_string()],
            amount: record.amount.to_string(),
            merchant: record.merchant.clone(),
        }
    }
}

impl RiskScorer for RemoteScorer {
    fn score(&self, record: &TransactionRecord) -> Verdict {
        match self.predict(record) {
            Ok(verdict) => verdict,
            Err(e) => {
                log::warn!("Remote scoring failed, returning sentinel verdict: {e}");
                self.sentinel(record)
            }
        }
    }
}

fn verdict_from_prediction(record: &TransactionRecord, response: &PredictResponse) -> Verdict {
    let is_fraud = response.prediction == 1;
    let confidence = scale_probability(response.probability);

    let mut risk_factors = Vec::new();
    if record.amount > Amount::HIGH_THRESHOLD {
        risk_factors.push(HIGH_AMOUNT.to_string());
    }

    Verdict::scored(record, is_fraud, confidence, risk_factors)
}

fn verdicts_from_file_predictions(parsed: &FilePredictions) -> Vec<Verdict> {
    parsed
        .predictions
        .iter()
        .map(|p| {
            let is_fraud = p.prediction == 1;
            Verdict {
                is_fraud,
                confidence: scale_probability(p.probability),
                risk_factors: if is_fraud {
                    vec![HIGH_PROBABILITY.to_string()]
                } else {
                    Vec::new()
                },
                amount: Amount::from_f64(p.amount).to_string(),
                merchant: String::new(),
            }
        })
        .collect()
}

/// Rounds a [0,1] probability down to an integer percentage.
fn scale_probability(probability: f64) -> u8 {
    (probability * 100.0).floor().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use crate::engine::remote::{
        verdict_from_prediction, verdicts_from_file_predictions, ErrorPolicy, FilePrediction,
        FilePredictions, PredictResponse, RemoteScorer,
    };
    use crate::engine::verdict::{BACKEND_ERROR, HIGH_AMOUNT, HIGH_PROBABILITY};
    use crate::engine::TransactionRecord;

    #[test]
    fn test_that_fraud_prediction_maps_to_fraud_verdict() {
        let record = TransactionRecord::from_parts("7000", "ShopX", "", "13:00");
        let response = PredictResponse {
            prediction: 1,
            probability: 0.876,
        };

        let verdict = verdict_from_prediction(&record, &response);
        assert!(verdict.is_fraud);
        assert_eq!(verdict.confidence, 87);
        assert_eq!(verdict.risk_factors, vec![HIGH_AMOUNT]);
    }

    #[test]
    fn test_that_legitimate_prediction_drops_factors() {
        let record = TransactionRecord::from_parts("7000", "ShopX", "", "13:00");
        let response = PredictResponse {
            prediction: 0,
            probability: 0.12,
        };

        let verdict = verdict_from_prediction(&record, &response);
        assert!(!verdict.is_fraud);
        assert_eq!(verdict.confidence, 12);
        assert!(verdict.risk_factors.is_empty());
    }

    #[test]
    fn test_that_batch_predictions_map_in_order() {
        let parsed = FilePredictions {
            predictions: vec![
                FilePrediction {
                    amount: 149.62,
                    prediction: 0,
                    probability: 0.03,
                },
                FilePrediction {
                    amount: 9000.0,
                    prediction: 1,
                    probability: 0.99,
                },
            ],
        };

        let verdicts = verdicts_from_file_predictions(&parsed);
        assert_eq!(verdicts.len(), 2);
        assert!(!verdicts[0].is_fraud);
        assert!(verdicts[0].risk_factors.is_empty());
        assert!(verdicts[1].is_fraud);
        assert_eq!(verdicts[1].risk_factors, vec![HIGH_PROBABILITY]);
        assert_eq!(verdicts[1].amount, "9000.0000");
        assert_eq!(verdicts[1].confidence, 99);
    }

    #[test]
    fn test_that_sentinel_follows_error_policy() {
        let record = TransactionRecord::from_parts("10", "ShopY", "", "");

        let open = RemoteScorer::new("http://127.0.0.1:1").sentinel(&record);
        assert!(!open.is_fraud);
        assert_eq!(open.confidence, 0);
        assert_eq!(open.risk_factors, vec![BACKEND_ERROR]);

        let closed = RemoteScorer::with_policy("http://127.0.0.1:1", ErrorPolicy::FailClosed)
            .sentinel(&record);
        assert!(closed.is_fraud);
        assert_eq!(closed.risk_factors, vec![BACKEND_ERROR]);
    }
}
