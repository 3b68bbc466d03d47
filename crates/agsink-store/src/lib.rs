//! Idempotent SQLite store for normalized agent events.
//!
//! One wide `events` table keyed by the generated event id, with a unique
//! index over the content-derived key. Event identity for deduplication is
//! the content key, never the id: ids are regenerated on every mapping pass,
//! so re-ingesting a transcript must collide on content instead.

use agsink_types::StoredEvent;
use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use std::path::Path;

// NOTE: Storage Design Rationale
//
// Why INSERT OR IGNORE (not upsert)?
// - Events are write-once; an overlapping re-ingest carries the same
//   content, so there is nothing to update
// - A silent skip keeps concurrent overlapping ingests commutative
//
// Why WAL journal mode?
// - Two hook firings can race on the same database file; WAL serializes
//   the writers while letting a reader see a consistent snapshot
//
// Why COALESCE in the unique index?
// - SQLite treats NULLs as distinct in unique indexes; tool fields are
//   null for non-tool events, so the key null-coalesces them to ''

/// Outcome of one batch insert. `skipped` counts rows whose content key
/// already existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// One row of the sessions listing.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub session_id: String,
    pub source: String,
    pub first_ts: Option<String>,
    pub last_ts: Option<String>,
    pub event_count: usize,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
        conn.query_row("PRAGMA journal_mode=WAL", [], |_| Ok(()))?;

        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                team_id TEXT,
                machine_id TEXT,
                source TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                event_type TEXT NOT NULL,
                session_id TEXT NOT NULL,
                cwd TEXT,
                git_branch TEXT,
                git_repo TEXT,
                turn_index INTEGER,
                model TEXT,
                prompt_tokens INTEGER,
                completion_tokens INTEGER,
                total_tokens INTEGER,
                tool_name_raw TEXT,
                tool_name TEXT,
                tool_input TEXT,
                file_path TEXT,
                file_action TEXT,
                file_lines_added INTEGER,
                file_lines_removed INTEGER,
                prompt_text TEXT,
                agent_id TEXT,
                agent_type TEXT,
                synced_at TEXT
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_events_content ON events(
                session_id, timestamp, event_type,
                COALESCE(tool_name_raw, ''), COALESCE(tool_input, '')
            );

            CREATE INDEX IF NOT EXISTS idx_events_ts ON events(timestamp);
            CREATE INDEX IF NOT EXISTS idx_events_session ON events(session_id);
            CREATE INDEX IF NOT EXISTS idx_events_synced ON events(synced_at);
            "#,
        )?;
        Ok(())
    }

    /// Insert a batch as one transaction. Rows colliding on the content key
    /// are silently skipped; `skipped = batch_len - inserted`. A storage
    /// failure aborts the whole batch, leaving prior state unchanged.
    pub fn insert_events(&mut self, events: &[StoredEvent]) -> Result<InsertReport> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0usize;
        {
            let mut stmt = tx.prepare_cached(
                r#"
                INSERT OR IGNORE INTO events (
                    id, user_id, team_id, machine_id, source,
                    timestamp, event_type, session_id,
                    cwd, git_branch, git_repo,
                    turn_index, model, prompt_tokens, completion_tokens, total_tokens,
                    tool_name_raw, tool_name, tool_input,
                    file_path, file_action, file_lines_added, file_lines_removed,
                    prompt_text, agent_id, agent_type, synced_at
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                    ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27
                )
                "#,
            )?;

            for stored in events {
                let e = &stored.event;
                let changed = stmt.execute(params![
                    stored.id.to_string(),
                    stored.user_id,
                    stored.team_id,
                    stored.machine_id,
                    stored.source.as_str(),
                    e.timestamp,
                    e.event_type.as_str(),
                    e.session_id,
                    e.cwd,
                    e.git_branch,
                    e.git_repo,
                    e.turn_index.map(|v| v as i64),
                    e.model,
                    e.prompt_tokens.map(|v| v as i64),
                    e.completion_tokens.map(|v| v as i64),
                    e.total_tokens.map(|v| v as i64),
                    e.tool_name_raw,
                    e.tool_name.map(|t| t.as_str()),
                    e.tool_input,
                    e.file_path,
                    e.file_action.map(|a| a.as_str()),
                    e.file_lines_added.map(|v| v as i64),
                    e.file_lines_removed.map(|v| v as i64),
                    e.prompt_text,
                    e.agent_id,
                    e.agent_type,
                    stored.synced_at,
                ])?;
                inserted += changed;
            }
        }
        tx.commit().context("Failed to commit event batch")?;

        Ok(InsertReport {
            inserted,
            skipped: events.len() - inserted,
        })
    }

    pub fn count_events(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Most recently started sessions first.
    pub fn list_sessions(&self, limit: usize) -> Result<Vec<SessionSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT session_id, source, MIN(timestamp), MAX(timestamp), COUNT(*)
            FROM events
            GROUP BY session_id, source
            ORDER BY MIN(timestamp) DESC
            LIMIT ?1
            "#,
        )?;

        let sessions = stmt
            .query_map([limit as i64], |row| {
                Ok(SessionSummary {
                    session_id: row.get(0)?,
                    source: row.get(1)?,
                    first_ts: row.get(2)?,
                    last_ts: row.get(3)?,
                    event_count: row.get::<_, i64>(4)? as usize,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(sessions)
    }
}
