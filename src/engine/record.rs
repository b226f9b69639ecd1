use csv::StringRecord;

use crate::engine::Amount;

/// One transaction under evaluation, normalized from a CSV row or the
/// manual entry form. Immutable once built and scored exactly once.
#[derive(Debug, Clone, Default)]
pub struct TransactionRecord {
    pub amount: Amount,
    pub merchant: String,
    pub location: String,
    pub time: String,
}

impl TransactionRecord {
    /// Builds a record from the manual entry form. Every field is trimmed;
    /// a missing or unparsable amount normalizes to zero.
    pub fn from_parts(amount: &str, merchant: &str, location: &str, time: &str) -> Self {
        TransactionRecord {
            amount: Amount::parse_lenient(amount),
            merchant: merchant.trim().to_string(),
            location: location.trim().to_string(),
            time: time.trim().to_string(),
        }
    }

    /// Zips one CSV data row positionally against the lower-cased header
    /// row. Fields absent from the row default to empty strings and
    /// unrecognized columns are ignored.
    pub fn from_row(headers: &[String], row: &StringRecord) -> Self {
        let mut record = TransactionRecord::default();
        for (idx, header) in headers.iter().enumerate() {
            let value = row.get(idx).unwrap_or("").trim();
            match header.as_str() {
                "amount" => record.amount = Amount::parse_lenient(value),
                "merchant" => record.merchant = value.to_string(),
                "location" => record.location = value.to_string(),
                "time" => record.time = value.to_string(),
                _ => {}
            }
        }
        record
    }

    /// Leading-integer prefix of the time field ("13:00" -> 13), the shape
    /// the remote collaborator expects. Defaults to zero.
    pub fn time_as_integer(&self) -> i64 {
        let digits: String = self
            .time
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use csv::StringRecord;

    use crate::engine::{Amount, TransactionRecord};

    fn headers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn test_that_row_fields_are_zipped_by_header_position() {
        let headers = headers(&["amount", "merchant", "location", "time"]);
        let row = StringRecord::from(vec!["7000", "ShopX", "Unknown City", "13:00"]);

        let record = TransactionRecord::from_row(&headers, &row);
        assert_eq!(record.amount, Amount::parse_lenient("7000"));
        assert_eq!(record.merchant, "ShopX");
        assert_eq!(record.location, "Unknown City");
        assert_eq!(record.time, "13:00");
    }

    #[test]
    fn test_that_short_rows_default_missing_fields_to_empty() {
        let headers = headers(&["amount", "merchant", "location", "time"]);
        let row = StringRecord::from(vec!["10", "ShopY"]);

        let record = TransactionRecord::from_row(&headers, &row);
        assert_eq!(record.merchant, "ShopY");
        assert_eq!(record.location, "");
        assert_eq!(record.time, "");
    }

    #[test]
    fn test_that_unrecognized_columns_are_ignored() {
        let headers = headers(&["amount", "card_number", "merchant"]);
        let row = StringRecord::from(vec!["10", "4111-1111", "ShopY"]);

        let record = TransactionRecord::from_row(&headers, &row);
        assert_eq!(record.amount, Amount::parse_lenient("10"));
        assert_eq!(record.merchant, "ShopY");
    }

    #[test]
    fn test_that_unparsable_manual_amount_becomes_zero() {
        let record = TransactionRecord::from_parts("abc", "ShopZ", "", "");
        assert_eq!(record.amount, Amount::zero());
    }

    #[test]
    fn test_that_time_integer_takes_leading_digits() {
        let record = TransactionRecord::from_parts("1", "", "", "13:00");
        assert_eq!(record.time_as_integer(), 13);

        let record = TransactionRecord::from_parts("1", "", "", "noon");
        assert_eq!(record.time_as_integer(), 0);

        let record = TransactionRecord::from_parts("1", "", "", "");
        assert_eq!(record.time_as_integer(), 0);
    }
}
