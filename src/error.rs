use thiserror::Error;

/// Errors that stop a run before or between workflow phases.
///
/// Failures of a single object are never raised as errors; they end up in the
/// [`RunReport`](crate::models::RunReport) instead.
#[derive(Error, Debug)]
pub enum HygieneError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Setup error: {0}")]
    Setup(String),

    #[error("Staging directory error: {0}")]
    Staging(#[from] std::io::Error),

    #[error("Listing error: {0}")]
    Listing(#[source] anyhow::Error),

    #[error("Invalid run transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: crate::services::orchestrator::RunState,
        to: crate::services::orchestrator::RunState,
    },
}
