use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Monetary value of a transaction under evaluation.
/// Backed by an i64 to avoid floating point rounding error; precision is
/// four places past the decimal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount {
    store: i64,
}

#[derive(Error, Debug, Clone)]
pub enum AmountError {
    #[error("Amount parsing error: {0}")]
    Parse(String),

    #[error("Overflow error while creating Amount")]
    Overflow,
}

impl Amount {
    /// Amounts strictly above this threshold are treated as a fraud signal.
    pub const HIGH_THRESHOLD: Amount = Amount {
        store: 5_000 * 10_000,
    };

    pub fn zero() -> Self {
        Amount { store: 0 }
    }

    /// Lenient parse used for user-entered fields: an empty, unparsable or
    /// negative amount normalizes to zero instead of being rejected.
    pub fn parse_lenient(s: &str) -> Self {
        match Amount::from_str(s) {
            Ok(amount) if amount.store >= 0 => amount,
            _ => Amount::zero(),
        }
    }

    pub fn to_f64(self) -> f64 {
        self.store as f64 / 10_000.0
    }

    /// Converts a backend-reported amount. Non-finite or out-of-range values
    /// map to zero.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Amount::zero();
        }
        let scaled = (value * 10_000.0).round();
        if scaled > i64::MAX as f64 || scaled < i64::MIN as f64 {
            return Amount::zero();
        }
        Amount {
            store: scaled as i64,
        }
    }

    /// Raw store in ten-thousandths, used to derive deterministic jitter.
    pub(crate) fn units(self) -> i64 {
        self.store
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            Err(AmountError::Parse(s.into()))?
        }

        let mut parts = s.split('.');
        let left_part = parts.next().unwrap(); // Ok to unwrap as the first part always exists
        let decimal_part = parts.next();

        // Checking for extra '.'
        if parts.next().is_some() {
            Err(AmountError::Parse(s.into()))?
        }

        // Checking if integer part is empty (ex: ".05")
        let left_str = if left_part.is_empty() { "0" } else { left_part };

        let total: i64 = match decimal_part {
            None => {
                // No decimal part - try to convert and multiply 10000
                let parsed = left_str.parse::<i64>();
                match parsed {
                    Ok(v) => match v.checked_mul(10_000) {
                        Some(val) => val,
                        None => Err(AmountError::Overflow)?, // Overflow when multiplying
                    },
                    Err(_) => Err(AmountError::Parse(s.into()))?,
                }
            }
            Some(dec_str) => {
                let mut dec_str = dec_str.to_owned();
                if dec_str.is_empty() {
                    dec_str = String::from("0000");
                }
                if !dec_str.chars().all(|c| c.is_ascii_digit()) {
                    Err(AmountError::Parse(s.into()))?
                }

                // Ensure 4 digits for decimal part
                if dec_str.len() > 4 {
                    dec_str.truncate(4);
                } else if dec_str.len() < 4 {
                    while dec_str.len() < 4 {
                        dec_str.push('0');
                    }
                }

                let combined_str = format!("{}{}", left_str, dec_str);
                let total = combined_str.parse::<i64>();

                match total {
                    Ok(v) => v,
                    Err(_) => Err(AmountError::Parse(s.into()))?,
                }
            }
        };

        Ok(Self { store: total })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.store;
        let negative = value < 0;
        let abs_val = value.abs();

        let left_part = abs_val / 10_000;
        let decimal_part = abs_val % 10_000;

        if negative {
            write!(f, "-{}.{:04}", left_part, decimal_part)
        } else {
            write!(f, "{}.{:04}", left_part, decimal_part)
        }
    }
}
