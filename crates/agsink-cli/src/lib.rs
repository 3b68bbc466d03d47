mod args;
mod config;
mod gitrepo;
mod handlers;
mod output;

pub use args::{Cli, Commands};

use agsink_store::Store;
use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    let db_path = cli.db.unwrap_or_else(config::default_db_path);
    let mut store = Store::open(&db_path)?;

    match cli.command {
        Commands::Ingest {
            source,
            transcript,
            session,
            session_id,
            cwd,
            agent_id,
            parent,
        } => handlers::handle_ingest(
            &mut store,
            handlers::IngestArgs {
                source,
                transcript,
                session,
                session_id,
                cwd,
                agent_id,
                parent,
            },
        ),
        Commands::Sessions { limit } => handlers::handle_sessions(&store, limit),
        Commands::Status => handlers::handle_status(&store, &db_path),
    }
}
