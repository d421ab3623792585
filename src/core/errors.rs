use super::types::ProcessId;
use thiserror::Error;

/// Everything that can abort a simulation run or an experiment.
///
/// Admission rejections are not errors; they are ordinary outcomes
/// recorded in the statistics.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid delay {delay}: timeouts must be finite and non-negative")]
    InvalidDelay { delay: f64 },

    #[error("Over-release on '{resource}': releasing {requested} but level is {level}")]
    OverRelease {
        resource: String,
        requested: u64,
        level: u64,
    },

    #[error("Release mismatch on '{resource}': {holder} released {requested} but holds {held}")]
    ReleaseMismatch {
        resource: String,
        holder: ProcessId,
        requested: u64,
        held: u64,
    },

    #[error("Invalid distribution '{name}': {reason}")]
    InvalidDistribution { name: String, reason: String },

    #[error("Invalid configuration '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type SimResult<T> = Result<T, SimError>;
