pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;

pub use config::HygieneConfig;
pub use error::HygieneError;
pub use models::{ItemOutcome, RunReport};
pub use services::orchestrator::{RunOrchestrator, RunSettings, RunState};

