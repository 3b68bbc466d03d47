use serde::Deserialize;
use serde_json::Value;

/// One Gemini CLI chat file: a single JSON document holding the whole
/// message array for a session.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiSession {
    pub session_id: String,
    #[serde(default)]
    pub messages: Vec<GeminiMessage>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "lowercase")]
pub(crate) enum GeminiMessage {
    User(UserMessage),
    Gemini(AssistantMessage),
    Info(SystemMessage),
    Error(SystemMessage),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct UserMessage {
    /// Legacy CLI events reuse the user type with a numeric id
    pub id: String,
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
    pub tokens: Option<TokenUsage>,
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
pub(crate) struct TokenUsage {
    #[serde(default)]
    pub input: u64,
    #[serde(default)]
    pub output: u64,
    #[serde(default)]
    pub total: u64,
}
