//! Source adapters: one per agent tool, each turning a raw transcript file
//! into an ordered sequence of normalized events for one session.
//!
//! Line-oriented sources (Claude Code, Codex) stream JSONL and need the
//! turn-accumulation state machine in `turn`; document-oriented sources
//! (Gemini, Cursor) deliver a finished message array and map it directly.

mod claude;
mod codex;
mod cursor;
pub mod discovery;
mod error;
mod gemini;
mod normalize;
mod session;
mod traits;
mod turn;

pub use claude::ClaudeAdapter;
pub use codex::CodexAdapter;
pub use cursor::CursorAdapter;
pub use error::{Error, Result};
pub use gemini::GeminiAdapter;
pub use normalize::canonical_tool;
pub use traits::{ParseHint, ParsedSession, SourceAdapter, SubagentHint, adapter_for};
