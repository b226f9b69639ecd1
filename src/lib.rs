//! Transaction risk evaluation engine.
//!
//! Turns raw transaction records, entered manually or uploaded as a CSV
//! batch, into fraud verdicts: a flag, an integer confidence and a list of
//! human-readable risk factors. Scoring is polymorphic over two strategies
//! behind one [`engine::RiskScorer`] contract: a pure in-process heuristic
//! and a remote prediction service.

pub mod engine;

pub use engine::{
    BatchEvaluator, EngineConfig, LocalHeuristicScorer, RemoteScorer, RiskScorer,
    TransactionRecord, Verdict,
};
