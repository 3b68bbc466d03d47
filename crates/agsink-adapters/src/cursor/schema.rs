use serde::Deserialize;
use serde_json::Value;

/// One exported Cursor chat: a single JSON document with the whole message
/// array, keyed by the composer (session) id.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CursorSession {
    #[serde(alias = "composerId")]
    pub session_id: String,
    #[serde(default)]
    pub workspace: Option<String>,
    #[serde(default)]
    pub messages: Vec<CursorMessage>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "lowercase")]
pub(crate) enum CursorMessage {
    User(UserMessage),
    Assistant(AssistantMessage),
    Error(SystemMessage),
    Info(SystemMessage),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct UserMessage {
    pub timestamp: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssistantMessage {
    pub timestamp: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct SystemMessage {
    pub timestamp: String,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}
