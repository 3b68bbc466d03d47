use serde::{Deserialize, Serialize};

/// Agent tool that produced a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentSource {
    ClaudeCode,
    Codex,
    Gemini,
    Opencode,
    Cursor,
    Other,
}

impl AgentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClaudeCode => "claude_code",
            Self::Codex => "codex",
            Self::Gemini => "gemini",
            Self::Opencode => "opencode",
            Self::Cursor => "cursor",
            Self::Other => "other",
        }
    }

    /// Parse a source name as given on the CLI or stored in the database.
    /// Accepts the common short aliases ("claude").
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "claude_code" | "claude" => Some(Self::ClaudeCode),
            "codex" => Some(Self::Codex),
            "gemini" => Some(Self::Gemini),
            "opencode" => Some(Self::Opencode),
            "cursor" => Some(Self::Cursor),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for AgentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
