//! Locate a transcript by session id under a source's default log root.
//!
//! Used by the CLI when a hook hands over a session id without a path.
//! Matching is name-based: every source embeds the session id in the
//! transcript filename, so no file content is read during the walk.

use agsink_types::AgentSource;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::{Error, Result};

/// Default log root for a source, under the user's home directory.
pub fn log_root(source: AgentSource) -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    let root = match source {
        AgentSource::ClaudeCode => home.join(".claude").join("projects"),
        AgentSource::Codex => home.join(".codex").join("sessions"),
        AgentSource::Gemini => home.join(".gemini").join("tmp"),
        AgentSource::Cursor => home.join(".cursor").join("chats"),
        AgentSource::Opencode | AgentSource::Other => return None,
    };
    Some(root)
}

/// Find the transcript for a session under the source's default log root.
pub fn find_transcript(source: AgentSource, session_id: &str) -> Result<PathBuf> {
    let root = log_root(source).ok_or_else(|| {
        Error::Provider(format!("no default log root for source: {}", source))
    })?;
    find_in_root(&root, source, session_id)
}

/// Walk a log root looking for the transcript whose filename carries the
/// session id. Depth is bounded: every source nests transcripts at most a
/// few directories deep (project dirs, date dirs, chat dirs).
pub fn find_in_root(root: &Path, source: AgentSource, session_id: &str) -> Result<PathBuf> {
    if !root.exists() {
        return Err(Error::Provider(format!(
            "log root does not exist: {}",
            root.display()
        )));
    }

    let extension = match source {
        AgentSource::Gemini | AgentSource::Cursor => "json",
        _ => "jsonl",
    };

    for entry in WalkDir::new(root)
        .max_depth(5)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || path.extension().is_none_or(|e| e != extension) {
            continue;
        }
        let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        if name == session_id || name.contains(session_id) {
            return Ok(path.to_path_buf());
        }
    }

    Err(Error::Provider(format!(
        "no transcript found for session {} under {}",
        session_id,
        root.display()
    )))
}
