use std::fs;
use std::path::{Path, PathBuf};

use csv::Trim;
use thiserror::Error;

use crate::engine::{RemoteScorer, RiskScorer, TransactionRecord, Verdict};

/// Default bound on data rows evaluated per upload, sized for an
/// interactive review of the results.
pub const DEFAULT_MAX_ROWS: usize = 10;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of data rows evaluated per upload; rows past the cap
    /// are silently dropped. Defaults to [`DEFAULT_MAX_ROWS`].
    pub max_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unsupported file {0:?}: expected a .csv file")]
    UnsupportedFile(PathBuf),

    #[error("Failed to read input file: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs the parser and a scoring strategy over an uploaded batch, one
/// verdict per data row, preserving row order. Each row is scored
/// independently; a malformed row or an error verdict never aborts the
/// rows after it.
pub struct BatchEvaluator<S: RiskScorer> {
    scorer: S,
    config: EngineConfig,
}

impl<S: RiskScorer> BatchEvaluator<S> {
    pub fn new(scorer: S) -> Self {
        Self::with_config(scorer, EngineConfig::default())
    }

    pub fn with_config(scorer: S, config: EngineConfig) -> Self {
        BatchEvaluator { scorer, config }
    }

    /// Manual entry path: one pre-built record, one verdict.
    pub fn evaluate_record(&self, record: &TransactionRecord) -> Verdict {
        self.scorer.score(record)
    }

    /// Parses CSV text and scores every record in input order.
    pub fn evaluate_text(&self, text: &str) -> Vec<Verdict> {
        let records = parse_records(text, self.config.max_rows);
        log::debug!("Parsed {} records from upload", records.len());
        records
            .iter()
            .map(|record| self.scorer.score(record))
            .collect()
    }

    /// File path variant: rejects files not named `*.csv` before reading
    /// anything, then delegates to [`Self::evaluate_text`].
    pub fn evaluate_file(&self, path: &Path) -> Result<Vec<Verdict>, EngineError> {
        check_csv_extension(path)?;
        let text = fs::read_to_string(path)?;
        Ok(self.evaluate_text(&text))
    }
}

/// Whole-file remote evaluation: extension gate, then a single upload to
/// the scoring backend which parses the file itself. A failed upload
/// resolves to an empty batch with a warning, never an error to the
/// caller.
pub fn evaluate_file_remote(
    scorer: &RemoteScorer,
    path: &Path,
) -> Result<Vec<Verdict>, EngineError> {
    check_csv_extension(path)?;
    let content = fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.csv");

    match scorer.score_file(file_name, content) {
        Ok(verdicts) => Ok(verdicts),
        Err(e) => {
            log::warn!("Remote batch scoring failed, returning empty batch: {e}");
            Ok(Vec::new())
        }
    }
}

/// Splits CSV text into at most `max_rows` transaction records. The first
/// row is the header; header names are trimmed and lower-cased before the
/// data rows are zipped against them. Malformed rows are logged and
/// skipped. Text with no data rows yields an empty batch.
pub fn parse_records(text: &str, max_rows: usize) -> Vec<TransactionRecord> {
    // The reader only skips truly empty lines; drop whitespace-only lines
    // too, so they neither produce a record nor consume a row slot.
    let text: String = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let mut rdr = csv::ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = match rdr.headers() {
        Ok(header_row) => header_row.iter().map(|h| h.trim().to_lowercase()).collect(),
        Err(e) => {
            log::warn!("Could not read header row: {e}");
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    for result in rdr.records().take(max_rows) {
        log::debug!("Deserialising row: {result:?}");
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping malformed row: {e}");
                continue;
            }
        };
        records.push(TransactionRecord::from_row(&headers, &row));
    }
    records
}

fn check_csv_extension(path: &Path) -> Result<(), EngineError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => Ok(()),
        _ => Err(EngineError::UnsupportedFile(path.to_path_buf())),
    }
}
