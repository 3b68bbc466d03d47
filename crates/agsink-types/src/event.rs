use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::source::AgentSource;
use crate::tool::{CanonicalTool, FileAction};

// NOTE: Schema Design Goals
//
// 1. One wide record shape for every adapter: provider quirks (streamed
//    chunks, nested batch messages, duplicated notifications) are resolved
//    inside the adapters so everything downstream sees the same row.
// 2. Identity is content-derived, not id-derived: the generated `id` is
//    fresh on every mapping pass, so dedup must key on
//    (session_id, timestamp, event_type, tool_name_raw, tool_input).
// 3. Timestamps stay as ISO-8601 strings in source order; they are parsed
//    only where ordering decisions are made.

/// Event kinds in the normalized stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SessionStart,
    SessionEnd,
    Prompt,
    TurnStart,
    TurnEnd,
    ToolCall,
    Error,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionStart => "session_start",
            Self::SessionEnd => "session_end",
            Self::Prompt => "prompt",
            Self::TurnStart => "turn_start",
            Self::TurnEnd => "turn_end",
            Self::ToolCall => "tool_call",
            Self::Error => "error",
        }
    }
}

/// Normalized event as produced by a source adapter, before identity is
/// attached. One adapter call produces an ordered sequence of these for a
/// single session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedEvent {
    /// ISO-8601 timestamp, required, source-order significant
    pub timestamp: String,
    pub event_type: EventKind,
    /// Stable per conversation
    pub session_id: String,

    // Context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_repo: Option<String>,

    // Turn data. Every tool_call and the turn_end of one model turn share
    // one turn_index; values are 1-based and strictly increasing per session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,

    // Tool data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name_raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<CanonicalTool>,
    /// Serialized JSON arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_action: Option<FileAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_lines_added: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_lines_removed: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_text: Option<String>,

    // Subagent linkage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<String>,
}

impl NormalizedEvent {
    pub fn new(
        timestamp: impl Into<String>,
        event_type: EventKind,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            event_type,
            session_id: session_id.into(),
            cwd: None,
            git_branch: None,
            git_repo: None,
            turn_index: None,
            model: None,
            prompt_tokens: None,
            completion_tokens: None,
            total_tokens: None,
            tool_name_raw: None,
            tool_name: None,
            tool_input: None,
            file_path: None,
            file_action: None,
            file_lines_added: None,
            file_lines_removed: None,
            prompt_text: None,
            agent_id: None,
            agent_type: None,
        }
    }

    /// Parse the event timestamp. Returns None for timestamps that are not
    /// valid RFC 3339 (adapters keep the raw string regardless).
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Stored event: a NormalizedEvent stamped with identity and source.
///
/// Write-once. `id` is regenerated on every mapping pass, so two ingestions
/// of the same transcript carry different ids for logically identical
/// events; the store deduplicates on content, never on `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Time-ordered unique identifier (UUIDv7)
    pub id: Uuid,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<String>,
    pub source: AgentSource,
    #[serde(flatten)]
    pub event: NormalizedEvent,
    /// Null until an external sync marks the row; never written by ingestion
    #[serde(default)]
    pub synced_at: Option<String>,
}

/// Generate a fresh event id. UUIDv7 keeps ids globally unique and totally
/// ordered consistently with generation time.
pub fn new_event_id() -> Uuid {
    Uuid::now_v7()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_ids_are_unique_and_v7() {
        let a = new_event_id();
        let b = new_event_id();
        assert_ne!(a, b);
        assert_eq!(a.get_version_num(), 7);
    }

    #[test]
    fn stored_event_serializes_flat() {
        let event = NormalizedEvent::new("2025-01-01T00:00:00Z", EventKind::Prompt, "s-1");
        let stored = StoredEvent {
            id: new_event_id(),
            user_id: "u-1".to_string(),
            team_id: None,
            machine_id: None,
            source: AgentSource::ClaudeCode,
            event,
            synced_at: None,
        };

        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["event_type"], "prompt");
        assert_eq!(json["session_id"], "s-1");
        assert_eq!(json["source"], "claude_code");
    }

    #[test]
    fn timestamp_parses_rfc3339() {
        let event = NormalizedEvent::new("2025-06-02T10:30:00.120Z", EventKind::Prompt, "s");
        assert!(event.timestamp_utc().is_some());

        let bad = NormalizedEvent::new("not-a-time", EventKind::Prompt, "s");
        assert!(bad.timestamp_utc().is_none());
    }
}
