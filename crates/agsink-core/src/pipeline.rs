use agsink_adapters::{ParseHint, adapter_for};
use agsink_store::Store;
use agsink_types::{AgentSource, Identity};
use anyhow::{Context, Result};
use std::path::Path;

use crate::mapper::{EventMapper, RepoResolver};

/// Result of one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub session_id: String,
    pub inserted: usize,
    pub skipped: usize,
}

/// One ingestion run: parse one transcript, stamp identity, insert one
/// batch. An unreadable transcript or a storage failure aborts the run with
/// no partial writes; everything else degrades inside the adapters.
pub fn ingest(
    store: &mut Store,
    source: AgentSource,
    transcript: &Path,
    hint: Option<&ParseHint>,
    identity: &Identity,
    resolver: &dyn RepoResolver,
) -> Result<IngestOutcome> {
    let adapter = adapter_for(source)?;
    let parsed = adapter
        .parse(transcript, hint)
        .with_context(|| format!("Failed to parse transcript: {}", transcript.display()))?;

    let mapper = EventMapper::new(identity.clone(), source);
    let batch = mapper.map_batch(parsed.events, resolver);
    let report = store
        .insert_events(&batch)
        .context("Failed to store events")?;

    Ok(IngestOutcome {
        session_id: parsed.session_id,
        inserted: report.inserted,
        skipped: report.skipped,
    })
}
