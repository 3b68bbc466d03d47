use agsink_types::{AgentSource, EventKind, NormalizedEvent};
use std::path::Path;

use crate::normalize::canonical_tool;
use crate::session::{apply_hint, bracket_session};
use crate::traits::{ParseHint, ParsedSession, SourceAdapter};
use crate::{Error, Result};

use super::schema::{CursorMessage, CursorSession};
use super::tools;

/// Cursor chat-export adapter.
///
/// Document-oriented like Gemini: the export is one JSON document with a
/// finished message array, so each assistant message closes its own turn and
/// no streaming deduplication applies.
pub struct CursorAdapter;

impl SourceAdapter for CursorAdapter {
    fn source(&self) -> AgentSource {
        AgentSource::Cursor
    }

    fn parse(&self, path: &Path, hint: Option<&ParseHint>) -> Result<ParsedSession> {
        let text = std::fs::read_to_string(path)?;
        parse_document(&text, hint)
    }
}

pub(crate) fn parse_document(text: &str, hint: Option<&ParseHint>) -> Result<ParsedSession> {
    let doc: CursorSession = serde_json::from_str(text)?;
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
            CursorMessage::User(user) => {
                if user.content.is_empty() {
                    continue;
                }
                let mut prompt =
                    NormalizedEvent::new(&user.timestamp, EventKind::Prompt, &session_id);
                prompt.prompt_text = Some(user.content.clone());
                prompt.cwd = doc.workspace.clone();
                events.push(prompt);
            }

            CursorMessage::Assistant(asst) => {
                turn_index += 1;

                for call in &asst.tool_calls {
                    let mut event =
                        NormalizedEvent::new(&asst.timestamp, EventKind::ToolCall, &session_id);
                    event.turn_index = Some(turn_index);
                    event.tool_name_raw = Some(call.name.clone());
                    event.tool_name = Some(canonical_tool(&call.name, AgentSource::Cursor));
                    event.tool_input = serde_json::to_string(&call.args).ok();
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
                if let Some(usage) = &asst.usage {
                    end.prompt_tokens = Some(usage.input_tokens);
                    end.completion_tokens = Some(usage.output_tokens);
                    end.total_tokens = Some(usage.input_tokens + usage.output_tokens);
                }
                events.push(end);
            }

            CursorMessage::Error(err) => {
                events.push(NormalizedEvent::new(
                    &err.timestamp,
                    EventKind::Error,
                    &session_id,
                ));
            }

            CursorMessage::Info(_) | CursorMessage::Unknown => {}
        }
    }

    let workspace = doc.workspace.clone();
    for event in &mut events {
        if event.cwd.is_none() {
            event.cwd = workspace.clone();
        }
    }

    // Bracket before the hint fan-out so the synthesized session events get
    // tagged like everything else.
    let mut events = bracket_session(&session_id, events);
    apply_hint(&mut events, hint, None);
    Ok(ParsedSession { session_id, events })
}
