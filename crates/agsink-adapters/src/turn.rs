use agsink_types::{EventKind, NormalizedEvent};
use std::collections::HashSet;

/// One in-flight model turn.
///
/// Token figures reported by streamed chunks are cumulative counters, so the
/// accumulator keeps the maximum observed value, never a sum.
struct PendingTurn {
    message_id: Option<String>,
    timestamp: String,
    model: Option<String>,
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
    tool_calls: Vec<NormalizedEvent>,
    call_ids: HashSet<String>,
}

/// Turn-accumulation state machine shared by the line-oriented adapters.
///
/// The flush triggers (user entry, tool result, new message id, stream end)
/// are decided by each adapter; this type only owns the pending state and
/// the turn_index counter. Indexes are 1-based and strictly increasing; the
/// buffered tool_call events and the closing turn_end share one index.
pub(crate) struct TurnAccumulator {
    session_id: String,
    next_index: u64,
    pending: Option<PendingTurn>,
}

impl TurnAccumulator {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            next_index: 1,
            pending: None,
        }
    }

    /// Message id of the open turn, if any. Used by adapters that flush on a
    /// new logical message id.
    pub fn pending_message_id(&self) -> Option<&str> {
        self.pending.as_ref().and_then(|t| t.message_id.as_deref())
    }

    /// Open a turn, or merge into the already-open one. The timestamp always
    /// advances to the latest observed chunk.
    pub fn open(&mut self, message_id: Option<&str>, timestamp: &str, model: Option<&str>) {
        let turn = self.pending.get_or_insert_with(|| PendingTurn {
            message_id: None,
            timestamp: timestamp.to_string(),
            model: None,
            prompt_tokens: None,
            completion_tokens: None,
            tool_calls: Vec::new(),
            call_ids: HashSet::new(),
        });
        turn.timestamp = timestamp.to_string();
        if turn.message_id.is_none() {
            turn.message_id = message_id.map(str::to_string);
        }
        if turn.model.is_none() {
            turn.model = model.map(str::to_string);
        }
    }

    /// Record token figures for the open turn. Cumulative counters: max, not
    /// sum. No-op when no turn is open (e.g. a stray async token report).
    pub fn record_tokens(&mut self, prompt: Option<u64>, completion: Option<u64>) {
        let Some(turn) = self.pending.as_mut() else {
            return;
        };
        if let Some(p) = prompt {
            turn.prompt_tokens = Some(turn.prompt_tokens.map_or(p, |cur| cur.max(p)));
        }
        if let Some(c) = completion {
            turn.completion_tokens = Some(turn.completion_tokens.map_or(c, |cur| cur.max(c)));
        }
    }

    /// Buffer a tool_call event for the open turn. Calls sharing a provider
    /// call id are processed once (streaming re-emission).
    pub fn push_tool_call(&mut self, call_id: Option<&str>, event: NormalizedEvent) {
        let Some(turn) = self.pending.as_mut() else {
            return;
        };
        if let Some(id) = call_id
            && !turn.call_ids.insert(id.to_string())
        {
            return;
        }
        turn.tool_calls.push(event);
    }

    /// Close the pending turn: emit its buffered tool_calls followed by one
    /// turn_end, all stamped with the same index. No-op when nothing is
    /// pending.
    pub fn flush(&mut self, events: &mut Vec<NormalizedEvent>) {
        let Some(turn) = self.pending.take() else {
            return;
        };
        let index = self.next_index;
        self.next_index += 1;

        for mut call in turn.tool_calls {
            call.turn_index = Some(index);
            events.push(call);
        }

        let mut end = NormalizedEvent::new(&turn.timestamp, EventKind::TurnEnd, &self.session_id);
        end.turn_index = Some(index);
        end.model = turn.model;
        end.prompt_tokens = turn.prompt_tokens;
        end.completion_tokens = turn.completion_tokens;
        end.total_tokens = match (turn.prompt_tokens, turn.completion_tokens) {
            (Some(p), Some(c)) => Some(p + c),
            _ => None,
        };
        events.push(end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_without_pending_is_noop() {
        let mut acc = TurnAccumulator::new("s-1");
        let mut events = Vec::new();
        acc.flush(&mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn indexes_increase_and_are_shared_with_tool_calls() {
        let mut acc = TurnAccumulator::new("s-1");
        let mut events = Vec::new();

        acc.open(Some("m1"), "2025-01-01T00:00:01Z", Some("model-a"));
        acc.push_tool_call(
            Some("c1"),
            NormalizedEvent::new("2025-01-01T00:00:01Z", EventKind::ToolCall, "s-1"),
        );
        acc.flush(&mut events);

        acc.open(Some("m2"), "2025-01-01T00:00:02Z", None);
        acc.flush(&mut events);

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].event_type, EventKind::ToolCall);
        assert_eq!(events[0].turn_index, Some(1));
        assert_eq!(events[1].event_type, EventKind::TurnEnd);
        assert_eq!(events[1].turn_index, Some(1));
        assert_eq!(events[2].turn_index, Some(2));
    }

    #[test]
    fn cumulative_tokens_keep_max_not_sum() {
        let mut acc = TurnAccumulator::new("s-1");
        acc.open(Some("m1"), "2025-01-01T00:00:01Z", None);
        acc.record_tokens(Some(5), None);
        acc.record_tokens(Some(8), Some(12));
        acc.record_tokens(Some(8), Some(12));

        let mut events = Vec::new();
        acc.flush(&mut events);
        let end = &events[0];
        assert_eq!(end.prompt_tokens, Some(8));
        assert_eq!(end.completion_tokens, Some(12));
        assert_eq!(end.total_tokens, Some(20));
    }

    #[test]
    fn duplicate_call_ids_are_processed_once() {
        let mut acc = TurnAccumulator::new("s-1");
        acc.open(Some("m1"), "2025-01-01T00:00:01Z", None);
        let call = NormalizedEvent::new("2025-01-01T00:00:01Z", EventKind::ToolCall, "s-1");
        acc.push_tool_call(Some("c1"), call.clone());
        acc.push_tool_call(Some("c1"), call);

        let mut events = Vec::new();
        acc.flush(&mut events);
        let calls = events
            .iter()
            .filter(|e| e.event_type == EventKind::ToolCall)
            .count();
        assert_eq!(calls, 1);
    }
}
