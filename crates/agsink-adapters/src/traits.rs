use agsink_types::{AgentSource, NormalizedEvent};
use std::path::{Path, PathBuf};

use crate::Result;

/// Transcript normalization
///
/// Responsibilities:
/// - Parse one raw transcript file into an ordered event sequence
/// - Resolve the session id (from the file or the hook payload)
/// - Handle format differences (JSONL vs. single JSON document)
pub trait SourceAdapter: Send + Sync {
    /// Which source this adapter reads
    fn source(&self) -> AgentSource;

    /// Parse an entire transcript into normalized events plus the resolved
    /// session id. Malformed individual entries are skipped, not fatal; an
    /// unreadable file is fatal.
    fn parse(&self, path: &Path, hint: Option<&ParseHint>) -> Result<ParsedSession>;
}

/// Adapter output for one transcript
#[derive(Debug)]
pub struct ParsedSession {
    pub session_id: String,
    pub events: Vec<NormalizedEvent>,
}

/// Out-of-band hook payload accompanying a transcript path
#[derive(Debug, Clone, Default)]
pub struct ParseHint {
    /// Session identity supplied by the hook (wins over file content)
    pub session_id: Option<String>,
    /// Working directory supplied by the hook
    pub cwd: Option<String>,
    /// Set when ingesting a subagent (child) transcript
    pub subagent: Option<SubagentHint>,
}

/// Back-reference from a child transcript to its spawning parent
#[derive(Debug, Clone)]
pub struct SubagentHint {
    pub agent_id: String,
    pub parent_path: PathBuf,
}

/// Create the adapter for a source. The adapter set is closed; new sources
/// are added here, not by branching on string tags elsewhere.
pub fn adapter_for(source: AgentSource) -> Result<Box<dyn SourceAdapter>> {
    match source {
        AgentSource::ClaudeCode => Ok(Box::new(crate::claude::ClaudeAdapter)),
        AgentSource::Codex => Ok(Box::new(crate::codex::CodexAdapter)),
        AgentSource::Gemini => Ok(Box::new(crate::gemini::GeminiAdapter)),
        AgentSource::Cursor => Ok(Box::new(crate::cursor::CursorAdapter)),
        other => Err(crate::Error::Provider(format!(
            "no adapter for source: {}",
            other
        ))),
    }
}
