use agsink_store::Store;
use anyhow::Result;

use crate::output;

pub fn handle_sessions(store: &Store, limit: usize) -> Result<()> {
    let sessions = store.list_sessions(limit)?;
    output::report_sessions(&sessions);
    Ok(())
}
