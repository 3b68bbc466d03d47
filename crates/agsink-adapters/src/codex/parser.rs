use agsink_types::{AgentSource, EventKind, NormalizedEvent};
use std::path::Path;

use crate::normalize::canonical_tool;
use crate::session::{apply_hint, bracket_session};
use crate::traits::{ParseHint, ParsedSession, SourceAdapter};
use crate::turn::TurnAccumulator;
use crate::{Error, Result};

use super::schema::{
    CodexRecord, EventMsgPayload, MessageContent, ResponseItemPayload, SessionSource,
};
use super::tools;

/// Codex JSONL adapter.
///
/// Flush cadence is per user prompt boundary: every tool call between two
/// prompts shares one turn. Tool results never flush. Token figures arrive
/// as async `token_count` notifications carrying cumulative session totals,
/// so prompt_tokens is the maximum observed during the turn and completion
/// tokens are omitted rather than guessed.
pub struct CodexAdapter;

impl SourceAdapter for CodexAdapter {
    fn source(&self) -> AgentSource {
        AgentSource::Codex
    }

    fn parse(&self, path: &Path, hint: Option<&ParseHint>) -> Result<ParsedSession> {
        let text = std::fs::read_to_string(path)?;
        parse_transcript(&text, hint)
    }
}

pub(crate) fn parse_transcript(text: &str, hint: Option<&ParseHint>) -> Result<ParsedSession> {
    let records: Vec<CodexRecord> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();

    let meta = records.iter().find_map(|r| match r {
        CodexRecord::SessionMeta(m) => Some(&m.payload),
        _ => None,
    });
    let session_id = hint
        .and_then(|h| h.session_id.clone())
        .or_else(|| meta.map(|m| m.id.clone()))
        .ok_or_else(|| Error::Parse("could not resolve session id from transcript".into()))?;

    let mut cwd = meta.and_then(|m| m.cwd.clone());
    let git_branch = meta.and_then(|m| m.git.as_ref()).and_then(|g| g.branch.clone());
    let git_repo = meta
        .and_then(|m| m.git.as_ref())
        .and_then(|g| g.repository_url.as_deref())
        .and_then(repo_slug);
    // Spawned-subagent sessions declare their type in the header.
    let meta_agent_type = meta.and_then(|m| match &m.source {
        Some(SessionSource::Subagent { subagent }) => Some(subagent.clone()),
        _ => None,
    });

    let mut events = Vec::new();
    let mut acc = TurnAccumulator::new(&session_id);
    let mut model: Option<String> = None;

    for record in &records {
        match record {
            CodexRecord::SessionMeta(_) => {}

            CodexRecord::TurnContext(ctx) => {
                if ctx.payload.model.is_some() {
                    model = ctx.payload.model.clone();
                }
                if cwd.is_none() {
                    cwd = ctx.payload.cwd.clone();
                }
            }

            CodexRecord::ResponseItem(item) => match &item.payload {
                ResponseItemPayload::Message(msg) if msg.role == "user" => {
                    let text: Vec<&str> = msg
                        .content
                        .iter()
                        .filter_map(|c| match c {
                            MessageContent::InputText { text } if is_user_authored(text) => {
                                Some(text.as_str())
                            }
                            _ => None,
                        })
                        .collect();
                    // Injected context blocks are not user intent.
                    if text.is_empty() {
                        continue;
                    }

                    acc.flush(&mut events);
                    let mut prompt =
                        NormalizedEvent::new(&item.timestamp, EventKind::Prompt, &session_id);
                    prompt.prompt_text = Some(text.join("\n"));
                    events.push(prompt);
                }

                ResponseItemPayload::Message(msg) if msg.role == "assistant" => {
                    acc.open(None, &item.timestamp, model.as_deref());
                }

                ResponseItemPayload::FunctionCall(call) => {
                    acc.open(None, &item.timestamp, model.as_deref());
                    let args: serde_json::Value =
                        serde_json::from_str(&call.arguments).unwrap_or(serde_json::Value::Null);

                    let mut event =
                        NormalizedEvent::new(&item.timestamp, EventKind::ToolCall, &session_id);
                    event.tool_name_raw = Some(call.name.clone());
                    event.tool_name = Some(canonical_tool(&call.name, AgentSource::Codex));
                    event.tool_input = Some(call.arguments.clone());
                    if let Some(effect) = tools::file_effect(&call.name, &args) {
                        event.file_path = effect.path;
                        event.file_action = Some(effect.action);
                        event.file_lines_added = effect.lines_added;
                        event.file_lines_removed = effect.lines_removed;
                    }
                    acc.push_tool_call(Some(&call.call_id), event);
                }

                ResponseItemPayload::CustomToolCall(call) => {
                    acc.open(None, &item.timestamp, model.as_deref());
                    let args = serde_json::json!({ "input": call.input });

                    let mut event =
                        NormalizedEvent::new(&item.timestamp, EventKind::ToolCall, &session_id);
                    event.tool_name_raw = Some(call.name.clone());
                    event.tool_name = Some(canonical_tool(&call.name, AgentSource::Codex));
                    event.tool_input = serde_json::to_string(&args).ok();
                    if let Some(effect) = tools::file_effect(&call.name, &args) {
                        event.file_path = effect.path;
                        event.file_action = Some(effect.action);
                        event.file_lines_added = effect.lines_added;
                        event.file_lines_removed = effect.lines_removed;
                    }
                    acc.push_tool_call(Some(&call.call_id), event);
                }

                // Tool output does not bound a Codex turn.
                ResponseItemPayload::FunctionCallOutput(_)
                | ResponseItemPayload::Message(_)
                | ResponseItemPayload::Unknown => {}
            },

            CodexRecord::EventMsg(msg) => {
                if let EventMsgPayload::TokenCount(count) = &msg.payload
                    && let Some(info) = &count.info
                {
                    acc.record_tokens(Some(info.total_token_usage.input_tokens), None);
                }
            }

            CodexRecord::Unknown => {}
        }
    }

    acc.flush(&mut events);

    // Bracket before the header-context fill so the synthesized session
    // events carry cwd/branch/repo and the subagent tag like everything else.
    let mut events = bracket_session(&session_id, events);

    for event in &mut events {
        if event.cwd.is_none() {
            event.cwd = cwd.clone();
        }
        if event.git_branch.is_none() {
            event.git_branch = git_branch.clone();
        }
        if event.git_repo.is_none() {
            event.git_repo = git_repo.clone();
        }
        if event.agent_type.is_none() {
            event.agent_type = meta_agent_type.clone();
        }
    }

    apply_hint(&mut events, hint, meta_agent_type.as_deref());
    Ok(ParsedSession { session_id, events })
}

/// Codex prepends synthetic user messages carrying instructions and
/// environment context. They arrive tagged as user input but are not
/// user-authored.
fn is_user_authored(text: &str) -> bool {
    let trimmed = text.trim_start();
    !trimmed.is_empty()
        && !trimmed.starts_with("<user_instructions>")
        && !trimmed.starts_with("<environment_context>")
        && !trimmed.starts_with("<turn_aborted>")
}

/// "https://github.com/acme/tool.git" or "git@github.com:acme/tool.git"
/// both reduce to "acme/tool".
fn repo_slug(url: &str) -> Option<String> {
    let trimmed = url.trim_end_matches('/').trim_end_matches(".git");
    let mut parts = trimmed.rsplit(['/', ':']);
    let repo = parts.next()?;
    let owner = parts.next()?;
    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some(format!("{owner}/{repo}"))
}
