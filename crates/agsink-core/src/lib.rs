//! Ingestion pipeline: adapter output is stamped with identity by the
//! mapper and persisted by the idempotent store, one transcript per run.

mod mapper;
mod pipeline;

pub use mapper::{EventMapper, NoRepoResolver, RepoResolver};
pub use pipeline::{IngestOutcome, ingest};
