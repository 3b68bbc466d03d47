use agsink_store::Store;
use anyhow::Result;
use std::path::Path;

use crate::output;

pub fn handle_status(store: &Store, db_path: &Path) -> Result<()> {
    let count = store.count_events()?;
    output::report_status(db_path, count);
    Ok(())
}
