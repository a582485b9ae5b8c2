pub mod classifier;
pub mod executor;
pub mod orchestrator;
pub mod staging;
pub mod storage;
