use agsink_types::{AgentSource, EventKind, NormalizedEvent};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::normalize::canonical_tool;
use crate::session::{apply_hint, bracket_session};
use crate::traits::{ParseHint, ParsedSession, SourceAdapter};
use crate::turn::TurnAccumulator;
use crate::{Error, Result};

use super::schema::{AssistantContent, ClaudeRecord, UserContent};
use super::tools;

/// Claude Code JSONL adapter.
///
/// Flush cadence is per tool round-trip: every user-authored entry (a real
/// prompt or a tool-result carrier) bounds the pending turn, and so does a
/// new logical message id. Streamed chunks of one API response share a
/// message id and merge into the same pending turn.
pub struct ClaudeAdapter;

impl SourceAdapter for ClaudeAdapter {
    fn source(&self) -> AgentSource {
        AgentSource::ClaudeCode
    }

    fn parse(&self, path: &Path, hint: Option<&ParseHint>) -> Result<ParsedSession> {
        let text = std::fs::read_to_string(path)?;
        parse_transcript(&text, hint)
    }
}

pub(crate) fn parse_transcript(text: &str, hint: Option<&ParseHint>) -> Result<ParsedSession> {
    let records: Vec<ClaudeRecord> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();

    let session_id = hint
        .and_then(|h| h.session_id.clone())
        .or_else(|| {
            records.iter().find_map(|r| match r {
                ClaudeRecord::User(user) => Some(user.session_id.clone()),
                ClaudeRecord::Assistant(asst) => Some(asst.session_id.clone()),
                ClaudeRecord::Unknown => None,
            })
        })
        .ok_or_else(|| Error::Parse("could not resolve session id from transcript".into()))?;

    let events = normalize_records(&records, &session_id);
    // Bracket before the hint fan-out so the synthesized session events get
    // tagged like everything else.
    let mut events = bracket_session(&session_id, events);

    // Subagent mode: discover the agent type from the spawning parent.
    // An unreadable parent degrades to tagging with agent_id only.
    let agent_type = hint
        .and_then(|h| h.subagent.as_ref())
        .and_then(|s| lookup_agent_type(&s.parent_path, &s.agent_id));
    apply_hint(&mut events, hint, agent_type.as_deref());

    Ok(ParsedSession { session_id, events })
}

fn normalize_records(records: &[ClaudeRecord], session_id: &str) -> Vec<NormalizedEvent> {
    let mut events = Vec::new();
    let mut acc = TurnAccumulator::new(session_id);
    let mut seen_lines: HashSet<&str> = HashSet::new();
    let mut cwd: Option<String> = None;
    let mut git_branch: Option<String> = None;

    for record in records {
        match record {
            ClaudeRecord::User(user) => {
                if !seen_lines.insert(user.uuid.as_str()) {
                    continue;
                }
                if cwd.is_none() {
                    cwd = user.cwd.clone();
                }
                if git_branch.is_none() {
                    git_branch = user.git_branch.clone();
                }

                // Any user entry bounds the pending turn, including a pure
                // tool-result carrier.
                acc.flush(&mut events);

                if user.is_meta {
                    continue;
                }
                let text: Vec<&str> = user
                    .message
                    .content
                    .iter()
                    .filter_map(|c| match c {
                        UserContent::Text { text } if !text.is_empty() => Some(text.as_str()),
                        _ => None,
                    })
                    .collect();
                // A message that is exclusively tool-result plumbing is not
                // user intent and never becomes a prompt.
                if text.is_empty() {
                    continue;
                }

                let mut prompt =
                    NormalizedEvent::new(&user.timestamp, EventKind::Prompt, session_id);
                prompt.prompt_text = Some(text.join("\n"));
                prompt.cwd = user.cwd.clone();
                prompt.git_branch = user.git_branch.clone();
                events.push(prompt);
            }

            ClaudeRecord::Assistant(asst) => {
                if !seen_lines.insert(asst.uuid.as_str()) {
                    continue;
                }
                if cwd.is_none() {
                    cwd = asst.cwd.clone();
                }
                if git_branch.is_none() {
                    git_branch = asst.git_branch.clone();
                }

                let has_emittable = asst.message.content.iter().any(|c| {
                    matches!(c, AssistantContent::Text { text } if !text.is_empty())
                        || matches!(c, AssistantContent::ToolUse { .. })
                });
                let same_turn = matches!(
                    (acc.pending_message_id(), asst.message.id.as_deref()),
                    (Some(pending), Some(current)) if pending == current
                );
                // Reasoning-only chunks neither open nor close a turn, but a
                // continuation chunk of the open turn still merges its usage.
                if !has_emittable && !same_turn {
                    continue;
                }
                // A new logical message id closes the previous turn even
                // without an intervening tool result.
                if acc.pending_message_id().is_some() && !same_turn {
                    acc.flush(&mut events);
                }

                acc.open(
                    asst.message.id.as_deref(),
                    &asst.timestamp,
                    asst.message.model.as_deref(),
                );
                if let Some(usage) = &asst.message.usage {
                    let prompt_tokens =
                        usage.input_tokens + usage.cache_read_input_tokens.unwrap_or(0);
                    acc.record_tokens(Some(prompt_tokens), Some(usage.output_tokens));
                }

                for content in &asst.message.content {
                    if let AssistantContent::ToolUse { id, name, input } = content {
                        let mut call =
                            NormalizedEvent::new(&asst.timestamp, EventKind::ToolCall, session_id);
                        call.tool_name_raw = Some(name.clone());
                        call.tool_name = Some(canonical_tool(name, AgentSource::ClaudeCode));
                        call.tool_input = serde_json::to_string(input).ok();
                        if let Some(effect) = tools::file_effect(name, input) {
                            call.file_path = effect.path;
                            call.file_action = Some(effect.action);
                            call.file_lines_added = effect.lines_added;
                            call.file_lines_removed = effect.lines_removed;
                        }
                        acc.push_tool_call(Some(id), call);
                    }
                }
            }

            ClaudeRecord::Unknown => {}
        }
    }

    // Stream exhausted: an interrupted turn still closes.
    acc.flush(&mut events);

    for event in &mut events {
        if event.cwd.is_none() {
            event.cwd = cwd.clone();
        }
        if event.git_branch.is_none() {
            event.git_branch = git_branch.clone();
        }
    }
    events
}

/// Scan a parent transcript for the Task invocation that spawned the child
/// with this agent id and return its subagent type.
fn lookup_agent_type(parent: &Path, agent_id: &str) -> Option<String> {
    let text = std::fs::read_to_string(parent).ok()?;

    // tool_use_id -> subagent_type for every Task invocation in the parent
    let mut task_types: HashMap<String, String> = HashMap::new();
    let mut matched_tool_use: Option<String> = None;

    for line in text.lines() {
        let Ok(record) = serde_json::from_str::<ClaudeRecord>(line) else {
            continue;
        };
        match record {
            ClaudeRecord::Assistant(asst) => {
                for content in &asst.message.content {
                    if let AssistantContent::ToolUse { id, name, input } = content
                        && name == "Task"
                        && let Some(kind) = input.get("subagent_type").and_then(|v| v.as_str())
                    {
                        task_types.insert(id.clone(), kind.to_string());
                    }
                }
            }
            ClaudeRecord::User(user) => {
                let record_level_match = user
                    .tool_use_result
                    .as_ref()
                    .and_then(|r| r.get("agentId"))
                    .and_then(|v| v.as_str())
                    == Some(agent_id);
                for content in &user.message.content {
                    if let UserContent::ToolResult {
                        tool_use_id,
                        agent_id: block_agent,
                    } = content
                        && (block_agent.as_deref() == Some(agent_id) || record_level_match)
                    {
                        matched_tool_use = Some(tool_use_id.clone());
                    }
                }
            }
            ClaudeRecord::Unknown => {}
        }
    }

    matched_tool_use.and_then(|id| task_types.get(&id).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_line(uuid: &str, ts: &str, text: &str) -> String {
        format!(
            r#"{{"type":"user","uuid":"{uuid}","sessionId":"s-1","timestamp":"{ts}","cwd":"/work/app","gitBranch":"main","message":{{"role":"user","content":[{{"type":"text","text":"{text}"}}]}}}}"#
        )
    }

    fn tool_result_line(uuid: &str, ts: &str, tool_use_id: &str) -> String {
        format!(
            r#"{{"type":"user","uuid":"{uuid}","sessionId":"s-1","timestamp":"{ts}","message":{{"role":"user","content":[{{"type":"tool_result","tool_use_id":"{tool_use_id}","content":"ok"}}]}}}}"#
        )
    }

    fn assistant_tool_line(uuid: &str, msg_id: &str, ts: &str, call_id: &str) -> String {
        format!(
            r#"{{"type":"assistant","uuid":"{uuid}","sessionId":"s-1","timestamp":"{ts}","message":{{"id":"{msg_id}","model":"claude-sonnet-4-5","content":[{{"type":"tool_use","id":"{call_id}","name":"Bash","input":{{"command":"ls"}}}}],"usage":{{"input_tokens":10,"output_tokens":4}}}}}}"#
        )
    }

    fn kinds(events: &[NormalizedEvent]) -> Vec<EventKind> {
        events.iter().map(|e| e.event_type).collect()
    }

    #[test]
    fn prompt_then_turn_with_tool_call() {
        let transcript = [
            user_line("u1", "2025-03-01T10:00:00Z", "fix the bug"),
            assistant_tool_line("a1", "msg_1", "2025-03-01T10:00:05Z", "toolu_1"),
        ]
        .join("\n");

        let parsed = parse_transcript(&transcript, None).unwrap();
        assert_eq!(parsed.session_id, "s-1");
        assert_eq!(
            kinds(&parsed.events),
            vec![
                EventKind::SessionStart,
                EventKind::Prompt,
                EventKind::ToolCall,
                EventKind::TurnEnd,
                EventKind::SessionEnd,
            ]
        );

        let call = &parsed.events[2];
        assert_eq!(call.tool_name_raw.as_deref(), Some("Bash"));
        assert_eq!(call.turn_index, Some(1));
        let end = &parsed.events[3];
        assert_eq!(end.turn_index, Some(1));
        assert_eq!(end.model.as_deref(), Some("claude-sonnet-4-5"));
        assert_eq!(end.prompt_tokens, Some(10));
    }

    #[test]
    fn tool_result_only_message_never_prompts() {
        let transcript = [
            user_line("u1", "2025-03-01T10:00:00Z", "run it"),
            assistant_tool_line("a1", "msg_1", "2025-03-01T10:00:05Z", "toolu_1"),
            tool_result_line("u2", "2025-03-01T10:00:07Z", "toolu_1"),
        ]
        .join("\n");

        let parsed = parse_transcript(&transcript, None).unwrap();
        let prompts = parsed
            .events
            .iter()
            .filter(|e| e.event_type == EventKind::Prompt)
            .count();
        assert_eq!(prompts, 1);
    }

    #[test]
    fn tool_round_trips_split_turns_with_increasing_indexes() {
        // One user turn, two tool-result-bounded exchanges.
        let transcript = [
            user_line("u1", "2025-03-01T10:00:00Z", "do two things"),
            assistant_tool_line("a1", "msg_1", "2025-03-01T10:00:05Z", "toolu_1"),
            tool_result_line("u2", "2025-03-01T10:00:07Z", "toolu_1"),
            assistant_tool_line("a2", "msg_2", "2025-03-01T10:00:09Z", "toolu_2"),
            tool_result_line("u3", "2025-03-01T10:00:11Z", "toolu_2"),
        ]
        .join("\n");

        let parsed = parse_transcript(&transcript, None).unwrap();
        let ends: Vec<&NormalizedEvent> = parsed
            .events
            .iter()
            .filter(|e| e.event_type == EventKind::TurnEnd)
            .collect();
        assert_eq!(ends.len(), 2);
        assert_eq!(ends[0].turn_index, Some(1));
        assert_eq!(ends[1].turn_index, Some(2));

        // Each turn carries only its own tool call.
        for (end, call_id) in ends.iter().zip(["toolu_1", "toolu_2"]) {
            let calls: Vec<&NormalizedEvent> = parsed
                .events
                .iter()
                .filter(|e| {
                    e.event_type == EventKind::ToolCall && e.turn_index == end.turn_index
                })
                .collect();
            assert_eq!(calls.len(), 1);
            assert!(calls[0].tool_input.as_deref().is_some());
            let _ = call_id;
        }
    }

    #[test]
    fn streamed_chunks_share_one_turn_and_keep_max_tokens() {
        let chunk1 = r#"{"type":"assistant","uuid":"a1","sessionId":"s-1","timestamp":"2025-03-01T10:00:05Z","message":{"id":"msg_1","model":"claude-sonnet-4-5","content":[{"type":"text","text":"working"}],"usage":{"input_tokens":5,"output_tokens":1}}}"#;
        let chunk2 = r#"{"type":"assistant","uuid":"a2","sessionId":"s-1","timestamp":"2025-03-01T10:00:06Z","message":{"id":"msg_1","model":"claude-sonnet-4-5","content":[{"type":"text","text":"done"}],"usage":{"input_tokens":8,"output_tokens":3}}}"#;
        let transcript = [
            user_line("u1", "2025-03-01T10:00:00Z", "go"),
            chunk1.to_string(),
            chunk2.to_string(),
        ]
        .join("\n");

        let parsed = parse_transcript(&transcript, None).unwrap();
        let ends: Vec<&NormalizedEvent> = parsed
            .events
            .iter()
            .filter(|e| e.event_type == EventKind::TurnEnd)
            .collect();
        assert_eq!(ends.len(), 1);
        assert_eq!(ends[0].prompt_tokens, Some(8));
        assert_eq!(ends[0].completion_tokens, Some(3));
    }

    #[test]
    fn duplicate_line_uuid_is_processed_once() {
        let line = assistant_tool_line("a1", "msg_1", "2025-03-01T10:00:05Z", "toolu_1");
        let transcript = [
            user_line("u1", "2025-03-01T10:00:00Z", "go"),
            line.clone(),
            line,
        ]
        .join("\n");

        let parsed = parse_transcript(&transcript, None).unwrap();
        let calls = parsed
            .events
            .iter()
            .filter(|e| e.event_type == EventKind::ToolCall)
            .count();
        assert_eq!(calls, 1);
    }

    #[test]
    fn reasoning_only_entry_does_not_open_a_turn() {
        let thinking = r#"{"type":"assistant","uuid":"a1","sessionId":"s-1","timestamp":"2025-03-01T10:00:05Z","message":{"id":"msg_1","model":"claude-sonnet-4-5","content":[{"type":"thinking","thinking":"hmm"}]}}"#;
        let transcript = [user_line("u1", "2025-03-01T10:00:00Z", "go"), thinking.into()].join("\n");

        let parsed = parse_transcript(&transcript, None).unwrap();
        assert!(
            parsed
                .events
                .iter()
                .all(|e| e.event_type != EventKind::TurnEnd)
        );
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let transcript = [
            "{not json".to_string(),
            user_line("u1", "2025-03-01T10:00:00Z", "hello"),
        ]
        .join("\n");

        let parsed = parse_transcript(&transcript, None).unwrap();
        assert_eq!(
            parsed
                .events
                .iter()
                .filter(|e| e.event_type == EventKind::Prompt)
                .count(),
            1
        );
    }

    #[test]
    fn interrupted_turn_flushes_at_stream_end() {
        let transcript = [
            user_line("u1", "2025-03-01T10:00:00Z", "go"),
            assistant_tool_line("a1", "msg_1", "2025-03-01T10:00:05Z", "toolu_1"),
        ]
        .join("\n");

        let parsed = parse_transcript(&transcript, None).unwrap();
        assert!(
            parsed
                .events
                .iter()
                .any(|e| e.event_type == EventKind::TurnEnd)
        );
    }

    #[test]
    fn session_brackets_and_context() {
        let transcript = user_line("u1", "2025-03-01T10:00:00Z", "hello");
        let parsed = parse_transcript(&transcript, None).unwrap();

        assert_eq!(parsed.events[0].event_type, EventKind::SessionStart);
        assert_eq!(parsed.events[0].cwd.as_deref(), Some("/work/app"));
        assert_eq!(
            parsed.events.last().unwrap().event_type,
            EventKind::SessionEnd
        );
    }

    #[test]
    fn subagent_lookup_finds_task_type() {
        let parent_dir = tempfile::tempdir().unwrap();
        let parent_path = parent_dir.path().join("parent.jsonl");
        let task_use = r#"{"type":"assistant","uuid":"p1","sessionId":"parent","timestamp":"2025-03-01T09:59:00Z","message":{"id":"msg_p","model":"claude-sonnet-4-5","content":[{"type":"tool_use","id":"toolu_task","name":"Task","input":{"subagent_type":"code-reviewer","prompt":"review"}}]}}"#;
        let task_result = r#"{"type":"user","uuid":"p2","sessionId":"parent","timestamp":"2025-03-01T10:01:00Z","message":{"role":"user","content":[{"type":"tool_result","tool_use_id":"toolu_task","agentId":"agent-42"}]}}"#;
        std::fs::write(&parent_path, format!("{task_use}\n{task_result}\n")).unwrap();

        let hint = ParseHint {
            session_id: None,
            cwd: None,
            subagent: Some(crate::traits::SubagentHint {
                agent_id: "agent-42".to_string(),
                parent_path,
            }),
        };
        let transcript = user_line("u1", "2025-03-01T10:00:30Z", "child work");
        let parsed = parse_transcript(&transcript, Some(&hint)).unwrap();

        for event in &parsed.events {
            assert_eq!(event.agent_id.as_deref(), Some("agent-42"));
            assert_eq!(event.agent_type.as_deref(), Some("code-reviewer"));
        }
    }

    #[test]
    fn subagent_missing_parent_fails_soft() {
        let hint = ParseHint {
            session_id: None,
            cwd: None,
            subagent: Some(crate::traits::SubagentHint {
                agent_id: "agent-42".to_string(),
                parent_path: "/nonexistent/parent.jsonl".into(),
            }),
        };
        let transcript = user_line("u1", "2025-03-01T10:00:30Z", "child work");
        let parsed = parse_transcript(&transcript, Some(&hint)).unwrap();

        let prompt = &parsed.events[1];
        assert_eq!(prompt.agent_id.as_deref(), Some("agent-42"));
        assert_eq!(prompt.agent_type, None);
    }
}
