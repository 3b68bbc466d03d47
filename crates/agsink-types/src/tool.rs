use serde::{Deserialize, Serialize};

/// Canonical tool vocabulary that all sources' raw tool names map onto.
///
/// The set is intentionally small: it covers the operations every agent tool
/// has some spelling of. Anything else lands in `Other` rather than growing
/// the vocabulary per provider release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalTool {
    Bash,
    FileRead,
    FileWrite,
    FileEdit,
    Glob,
    Grep,
    WebSearch,
    WebFetch,
    Task,
    Todo,
    Other,
}

impl CanonicalTool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::FileRead => "file_read",
            Self::FileWrite => "file_write",
            Self::FileEdit => "file_edit",
            Self::Glob => "glob",
            Self::Grep => "grep",
            Self::WebSearch => "web_search",
            Self::WebFetch => "web_fetch",
            Self::Task => "task",
            Self::Todo => "todo",
            Self::Other => "other",
        }
    }
}

/// File effect classification for a tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAction {
    Create,
    Update,
    Delete,
}

impl FileAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}
