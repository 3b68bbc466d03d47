use serde::Deserialize;

/// How the session was started (CLI invocation or spawned subagent)
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub(crate) enum SessionSource {
    Subagent { subagent: String },
    Cli(String),
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum CodexRecord {
    SessionMeta(SessionMetaRecord),
    ResponseItem(ResponseItemRecord),
    EventMsg(EventMsgRecord),
    TurnContext(TurnContextRecord),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct SessionMetaRecord {
    pub timestamp: String,
    pub payload: SessionMetaPayload,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct SessionMetaPayload {
    pub id: String,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub source: Option<SessionSource>,
    #[serde(default)]
    pub git: Option<GitInfo>,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct GitInfo {
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub repository_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct ResponseItemRecord {
    pub timestamp: String,
    pub payload: ResponseItemPayload,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum ResponseItemPayload {
    Message(MessagePayload),
    FunctionCall(FunctionCallPayload),
    FunctionCallOutput(FunctionCallOutputPayload),
    CustomToolCall(CustomToolCallPayload),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct MessagePayload {
    pub role: String,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum MessageContent {
    InputText {
        text: String,
    },
    OutputText {
        text: String,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct FunctionCallPayload {
    pub name: String,
    /// Arguments arrive as a JSON string, not an object
    pub arguments: String,
    pub call_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct FunctionCallOutputPayload {
    #[allow(dead_code)]
    pub call_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct CustomToolCallPayload {
    pub name: String,
    pub input: String,
    pub call_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct EventMsgRecord {
    pub timestamp: String,
    pub payload: EventMsgPayload,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum EventMsgPayload {
    TokenCount(TokenCountPayload),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct TokenCountPayload {
    #[serde(default)]
    pub info: Option<TokenInfo>,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct TokenInfo {
    pub total_token_usage: TokenUsage,
}

/// Cumulative session totals. `input_tokens` already includes the cached
/// portion, so it maps straight onto prompt_tokens.
#[derive(Debug, Deserialize, Clone)]
pub(crate) struct TokenUsage {
    #[serde(default)]
    pub input_tokens: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct TurnContextRecord {
    #[allow(dead_code)]
    pub timestamp: String,
    pub payload: TurnContextPayload,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct TurnContextPayload {
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}
