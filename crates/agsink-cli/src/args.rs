use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agsink")]
#[command(about = "Idempotent local ledger for AI coding-agent session logs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database file (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest one transcript into the event store
    Ingest {
        /// Source tool: claude_code (or claude), codex, gemini, cursor
        #[arg(long)]
        source: String,

        /// Path to the transcript file
        #[arg(long, required_unless_present = "session")]
        transcript: Option<PathBuf>,

        /// Locate the transcript by session id under the source's default
        /// log root instead of passing a path
        #[arg(long, conflicts_with = "transcript")]
        session: Option<String>,

        /// Session id supplied by a hook payload (wins over file content)
        #[arg(long)]
        session_id: Option<String>,

        /// Working directory supplied by a hook payload
        #[arg(long)]
        cwd: Option<String>,

        /// Subagent mode: id of the spawned agent
        #[arg(long, requires = "parent")]
        agent_id: Option<String>,

        /// Subagent mode: path to the spawning parent transcript
        #[arg(long, requires = "agent_id")]
        parent: Option<PathBuf>,
    },

    /// List ingested sessions
    Sessions {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Show database path and event count
    Status,
}
