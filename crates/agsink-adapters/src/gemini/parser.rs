use agsink_types::{AgentSource, EventKind, NormalizedEvent};
use std::path::Path;

use crate::normalize::canonical_tool;
use crate::session::{apply_hint, bracket_session};
use crate::traits::{ParseHint, ParsedSession, SourceAdapter};
use crate::{Error, Result};

use super::schema::{GeminiMessage, GeminiSession};
use super::tools;

/// Gemini CLI adapter.
///
/// Document-oriented: the chat file is one JSON document whose `messages`
/// array already holds discrete, non-streamed records, so there is no chunk
/// deduplication or max-accumulation. Each assistant message closes its own
/// turn; `error` messages map to `error` events and `info` messages are
/// dropped.
pub struct GeminiAdapter;

impl SourceAdapter for GeminiAdapter {
    fn source(&self) -> AgentSource {
        AgentSource::Gemini
    }

    fn parse(&self, path: &Path, hint: Option<&ParseHint>) -> Result<ParsedSession> {
        let text = std::fs::read_to_string(path)?;
        parse_document(&text, hint)
    }
}

pub(crate) fn parse_document(text: &str, hint: Option<&ParseHint>) -> Result<ParsedSession> {
    let doc: GeminiSession = serde_json::from_str(text)?;
    let session_id = hint
        .and_then(|h| h.session_id.clone())
        .unwrap_or_else(|| doc.session_id.clone());
    if session_id.is_empty() {
        return Err(Error::Parse(
            "could not resolve session id from transcript".into(),
        ));
    }

    let mut events = Vec::new();
    let mut turn_index = 0u64;

    for message in &doc.messages {
        match message {
            GeminiMessage::User(user) => {
                // Legacy CLI events reuse the user type with numeric ids;
                // they carry no user intent.
                if user.id.parse::<u32>().is_ok() || user.content.is_empty() {
                    continue;
                }
                let mut prompt =
                    NormalizedEvent::new(&user.timestamp, EventKind::Prompt, &session_id);
                prompt.prompt_text = Some(user.content.clone());
                events.push(prompt);
            }

            GeminiMessage::Gemini(asst) => {
                turn_index += 1;

                for call in &asst.tool_calls {
                    let mut event =
                        NormalizedEvent::new(&asst.timestamp, EventKind::ToolCall, &session_id);
                    event.turn_index = Some(turn_index);
                    event.tool_name_raw = Some(call.name.clone());
                    event.tool_name = Some(canonical_tool(&call.name, AgentSource::Gemini));
                    event.tool_input = serde_json::to_string(&call.args).ok();
                    event.cwd = tools::shell_directory(&call.name, &call.args);
                    if let Some(effect) = tools::file_effect(&call.name, &call.args) {
                        event.file_path = effect.path;
                        event.file_action = Some(effect.action);
                        event.file_lines_added = effect.lines_added;
                        event.file_lines_removed = effect.lines_removed;
                    }
                    events.push(event);
                }

                let mut end =
                    NormalizedEvent::new(&asst.timestamp, EventKind::TurnEnd, &session_id);
                end.turn_index = Some(turn_index);
                end.model = asst.model.clone();
                if let Some(tokens) = &asst.tokens {
                    end.prompt_tokens = Some(tokens.input);
                    end.completion_tokens = Some(tokens.output);
                    end.total_tokens = Some(tokens.total);
                }
                events.push(end);
            }

            GeminiMessage::Error(err) => {
                events.push(NormalizedEvent::new(
                    &err.timestamp,
                    EventKind::Error,
                    &session_id,
                ));
            }

            GeminiMessage::Info(_) | GeminiMessage::Unknown => {}
        }
    }

    // Bracket before the hint fan-out so the synthesized session events get
    // tagged like everything else.
    let mut events = bracket_session(&session_id, events);
    apply_hint(&mut events, hint, None);
    Ok(ParsedSession { session_id, events })
}
