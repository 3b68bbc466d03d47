use agsink_types::{EventKind, NormalizedEvent};
use chrono::{DateTime, Utc};

use crate::traits::{ParseHint, SubagentHint};

/// Parse an event timestamp for ordering decisions. Unparseable strings sort
/// last so they never win the bracket positions.
fn parsed(event: &NormalizedEvent) -> Option<DateTime<Utc>> {
    event.timestamp_utc()
}

/// Bracket an emitted sequence with synthesized session_start/session_end
/// events at the first and last observed timestamps. Empty sequences stay
/// empty (nothing was observed, so there is no session to bracket).
pub(crate) fn bracket_session(
    session_id: &str,
    mut events: Vec<NormalizedEvent>,
) -> Vec<NormalizedEvent> {
    if events.is_empty() {
        return events;
    }

    let start_ts = events
        .iter()
        .filter_map(|e| parsed(e).map(|t| (t, &e.timestamp)))
        .min_by_key(|(t, _)| *t)
        .map(|(_, s)| s.clone())
        .unwrap_or_else(|| events[0].timestamp.clone());
    let end_ts = events
        .iter()
        .filter_map(|e| parsed(e).map(|t| (t, &e.timestamp)))
        .max_by_key(|(t, _)| *t)
        .map(|(_, s)| s.clone())
        .unwrap_or_else(|| events[events.len() - 1].timestamp.clone());

    let mut start = NormalizedEvent::new(&start_ts, EventKind::SessionStart, session_id);
    let mut end = NormalizedEvent::new(&end_ts, EventKind::SessionEnd, session_id);

    // Carry the session context onto the brackets so downstream repo
    // resolution sees it even when the first real event is a prompt.
    if let Some(with_cwd) = events.iter().find(|e| e.cwd.is_some()) {
        start.cwd = with_cwd.cwd.clone();
        end.cwd = with_cwd.cwd.clone();
    }
    if let Some(with_branch) = events.iter().find(|e| e.git_branch.is_some()) {
        start.git_branch = with_branch.git_branch.clone();
        end.git_branch = with_branch.git_branch.clone();
    }

    events.insert(0, start);
    events.push(end);
    events
}

/// Apply hook-supplied context and subagent linkage to every emitted event.
/// `agent_type` is the type discovered from the parent transcript, if any.
pub(crate) fn apply_hint(
    events: &mut [NormalizedEvent],
    hint: Option<&ParseHint>,
    agent_type: Option<&str>,
) {
    let Some(hint) = hint else {
        return;
    };
    for event in events.iter_mut() {
        if event.cwd.is_none() {
            event.cwd = hint.cwd.clone();
        }
        if let Some(SubagentHint { agent_id, .. }) = &hint.subagent {
            event.agent_id = Some(agent_id.clone());
            if event.agent_type.is_none() {
                event.agent_type = agent_type.map(str::to_string);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brackets_use_first_and_last_timestamps() {
        let events = vec![
            NormalizedEvent::new("2025-01-01T00:00:05Z", EventKind::Prompt, "s"),
            NormalizedEvent::new("2025-01-01T00:00:09Z", EventKind::TurnEnd, "s"),
        ];
        let bracketed = bracket_session("s", events);

        assert_eq!(bracketed.len(), 4);
        assert_eq!(bracketed[0].event_type, EventKind::SessionStart);
        assert_eq!(bracketed[0].timestamp, "2025-01-01T00:00:05Z");
        assert_eq!(bracketed[3].event_type, EventKind::SessionEnd);
        assert_eq!(bracketed[3].timestamp, "2025-01-01T00:00:09Z");
    }

    #[test]
    fn empty_sequence_stays_empty() {
        assert!(bracket_session("s", Vec::new()).is_empty());
    }

    #[test]
    fn brackets_inherit_session_context() {
        let mut prompt = NormalizedEvent::new("2025-01-01T00:00:05Z", EventKind::Prompt, "s");
        prompt.cwd = Some("/work/repo".to_string());
        let bracketed = bracket_session("s", vec![prompt]);
        assert_eq!(bracketed[0].cwd.as_deref(), Some("/work/repo"));
    }
}
