pub mod ingest;
pub mod runner;
mod types;
