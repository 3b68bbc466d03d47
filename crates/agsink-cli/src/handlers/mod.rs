mod ingest;
mod sessions;
mod status;

pub use ingest::{IngestArgs, handle_ingest};
pub use sessions::handle_sessions;
pub use status::handle_status;
