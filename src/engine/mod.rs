mod amount;
mod batch;
mod record;
mod remote;
mod scorer;
pub mod verdict;

pub use amount::{Amount, AmountError};
pub use batch::{
    BatchEvaluator, DEFAULT_MAX_ROWS, EngineConfig, EngineError, evaluate_file_remote,
    parse_records,
};
pub use record::TransactionRecord;
pub use remote::{ErrorPolicy, RemoteError, RemoteScorer};
pub use scorer::{LocalHeuristicScorer, RiskScorer};
pub use verdict::{Verdict, VerdictRow};
