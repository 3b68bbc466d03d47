use agsink_core::IngestOutcome;
use agsink_store::SessionSummary;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::path::Path;

fn colored() -> bool {
    std::io::stdout().is_terminal()
}

pub fn report_ingest(outcome: &IngestOutcome) {
    if colored() {
        println!(
            "{} session {}: {} inserted, {} skipped",
            "✓".green(),
            outcome.session_id.bold(),
            outcome.inserted,
            outcome.skipped
        );
    } else {
        println!(
            "session {}: {} inserted, {} skipped",
            outcome.session_id, outcome.inserted, outcome.skipped
        );
    }
}

pub fn report_sessions(sessions: &[SessionSummary]) {
    if sessions.is_empty() {
        println!("No sessions ingested yet.");
        return;
    }

    for session in sessions {
        let started = session.first_ts.as_deref().unwrap_or("-");
        let line = format!(
            "{:<12} {:<38} {:>6} events  {}",
            session.source, session.session_id, session.event_count, started
        );
        if colored() {
            println!("{}", line.dimmed());
        } else {
            println!("{line}");
        }
    }
}

pub fn report_status(db_path: &Path, count: usize) {
    println!("database: {}", db_path.display());
    println!("events:   {count}");
}
