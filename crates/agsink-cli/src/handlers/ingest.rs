use agsink_adapters::{ParseHint, SubagentHint, discovery};
use agsink_core::ingest;
use agsink_store::Store;
use agsink_types::AgentSource;
use anyhow::{Context, Result, bail};
use std::path::PathBuf;

use crate::config;
use crate::gitrepo::GitRepoResolver;
use crate::output;

pub struct IngestArgs {
    pub source: String,
    pub transcript: Option<PathBuf>,
    pub session: Option<String>,
    pub session_id: Option<String>,
    pub cwd: Option<String>,
    pub agent_id: Option<String>,
    pub parent: Option<PathBuf>,
}

pub fn handle_ingest(store: &mut Store, args: IngestArgs) -> Result<()> {
    let Some(source) = AgentSource::parse(&args.source) else {
        bail!("unknown source: {} (expected claude_code, codex, gemini or cursor)", args.source);
    };

    let transcript = match (args.transcript, &args.session) {
        (Some(path), _) => path,
        (None, Some(session)) => discovery::find_transcript(source, session)
            .with_context(|| format!("Failed to locate transcript for session {session}"))?,
        (None, None) => bail!("either --transcript or --session is required"),
    };

    let hint = ParseHint {
        session_id: args.session_id,
        cwd: args.cwd,
        subagent: match (args.agent_id, args.parent) {
            (Some(agent_id), Some(parent_path)) => Some(SubagentHint {
                agent_id,
                parent_path,
            }),
            _ => None,
        },
    };

    let identity = config::load_identity();
    let resolver = GitRepoResolver::new();
    let outcome = ingest(store, source, &transcript, Some(&hint), &identity, &resolver)?;

    output::report_ingest(&outcome);
    Ok(())
}
