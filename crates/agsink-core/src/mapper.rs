use agsink_types::{AgentSource, Identity, NormalizedEvent, StoredEvent, new_event_id};

/// Git repository resolution, keyed by working directory.
///
/// Supplied by the caller and expected to memoize its own lookups; the
/// mapper invokes it at most once per batch.
pub trait RepoResolver {
    fn resolve(&self, cwd: &str) -> Option<String>;
}

/// Resolver that never answers. For sources whose adapter resolves the repo
/// itself, and for tests.
pub struct NoRepoResolver;

impl RepoResolver for NoRepoResolver {
    fn resolve(&self, _cwd: &str) -> Option<String> {
        None
    }
}

/// Stamps adapter output with identity to produce storable records.
///
/// Every event gets a fresh time-ordered id; no event is dropped here.
pub struct EventMapper {
    identity: Identity,
    source: AgentSource,
}

impl EventMapper {
    pub fn new(identity: Identity, source: AgentSource) -> Self {
        Self { identity, source }
    }

    /// Map one adapter batch. When no event carries a resolved repo, the
    /// resolver is consulted once for the batch's working directory and the
    /// answer fans out to every event; a failed lookup degrades to leaving
    /// the field empty.
    pub fn map_batch(
        &self,
        events: Vec<NormalizedEvent>,
        resolver: &dyn RepoResolver,
    ) -> Vec<StoredEvent> {
        let batch_repo = if events.iter().any(|e| e.git_repo.is_some()) {
            None
        } else {
            events
                .iter()
                .find_map(|e| e.cwd.as_deref())
                .and_then(|cwd| resolver.resolve(cwd))
        };

        events
            .into_iter()
            .map(|mut event| {
                if event.git_repo.is_none() {
                    event.git_repo = batch_repo.clone();
                }
                StoredEvent {
                    id: new_event_id(),
                    user_id: self.identity.user_id.clone(),
                    team_id: self.identity.team_id.clone(),
                    machine_id: self.identity.machine_id.clone(),
                    source: self.source,
                    event,
                    synced_at: None,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agsink_types::EventKind;
    use std::cell::Cell;

    struct CountingResolver {
        calls: Cell<usize>,
        answer: Option<String>,
    }

    impl RepoResolver for CountingResolver {
        fn resolve(&self, _cwd: &str) -> Option<String> {
            self.calls.set(self.calls.get() + 1);
            self.answer.clone()
        }
    }

    fn event_with_cwd(ts: &str) -> NormalizedEvent {
        let mut event = NormalizedEvent::new(ts, EventKind::Prompt, "s-1");
        event.cwd = Some("/work/app".to_string());
        event
    }

    #[test]
    fn resolver_is_called_at_most_once_per_batch() {
        let resolver = CountingResolver {
            calls: Cell::new(0),
            answer: Some("acme/app".to_string()),
        };
        let mapper = EventMapper::new(Identity::new("u-1"), AgentSource::ClaudeCode);

        let batch = vec![
            event_with_cwd("2025-01-01T00:00:00Z"),
            event_with_cwd("2025-01-01T00:00:01Z"),
            event_with_cwd("2025-01-01T00:00:02Z"),
        ];
        let stored = mapper.map_batch(batch, &resolver);

        assert_eq!(resolver.calls.get(), 1);
        assert!(stored.iter().all(|e| e.event.git_repo.as_deref() == Some("acme/app")));
    }

    #[test]
    fn adapter_resolved_repo_skips_the_resolver() {
        let resolver = CountingResolver {
            calls: Cell::new(0),
            answer: Some("wrong/answer".to_string()),
        };
        let mapper = EventMapper::new(Identity::new("u-1"), AgentSource::Codex);

        let mut event = event_with_cwd("2025-01-01T00:00:00Z");
        event.git_repo = Some("acme/tool".to_string());
        let stored = mapper.map_batch(vec![event], &resolver);

        assert_eq!(resolver.calls.get(), 0);
        assert_eq!(stored[0].event.git_repo.as_deref(), Some("acme/tool"));
    }

    #[test]
    fn ids_are_fresh_per_mapping_pass() {
        let mapper = EventMapper::new(Identity::new("u-1"), AgentSource::ClaudeCode);
        let batch = vec![event_with_cwd("2025-01-01T00:00:00Z")];

        let first = mapper.map_batch(batch.clone(), &NoRepoResolver);
        let second = mapper.map_batch(batch, &NoRepoResolver);
        assert_ne!(first[0].id, second[0].id);
    }

    #[test]
    fn identity_lands_on_every_event() {
        let identity = Identity {
            user_id: "u-1".to_string(),
            team_id: Some("t-1".to_string()),
            machine_id: Some("m-1".to_string()),
        };
        let mapper = EventMapper::new(identity, AgentSource::Gemini);
        let stored = mapper.map_batch(vec![event_with_cwd("2025-01-01T00:00:00Z")], &NoRepoResolver);

        assert_eq!(stored[0].user_id, "u-1");
        assert_eq!(stored[0].team_id.as_deref(), Some("t-1"));
        assert_eq!(stored[0].machine_id.as_deref(), Some("m-1"));
        assert_eq!(stored[0].source, AgentSource::Gemini);
        assert_eq!(stored[0].synced_at, None);
    }
}
