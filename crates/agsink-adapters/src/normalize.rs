use agsink_types::{AgentSource, CanonicalTool, FileAction};
use serde_json::Value;

// Rationale for adapter-layer placement:
//   The canonical vocabulary lives in agsink-types; the knowledge of which
//   raw identifier each agent tool uses for it lives here, next to the
//   parsers that produce those identifiers.

/// Registry of raw tool names per source
const CLAUDE_TOOLS: &[(&str, CanonicalTool)] = &[
    ("Bash", CanonicalTool::Bash),
    ("BashOutput", CanonicalTool::Bash),
    ("KillShell", CanonicalTool::Bash),
    ("Read", CanonicalTool::FileRead),
    ("Write", CanonicalTool::FileWrite),
    ("Edit", CanonicalTool::FileEdit),
    ("MultiEdit", CanonicalTool::FileEdit),
    ("NotebookEdit", CanonicalTool::FileEdit),
    ("Glob", CanonicalTool::Glob),
    ("Grep", CanonicalTool::Grep),
    ("WebSearch", CanonicalTool::WebSearch),
    ("WebFetch", CanonicalTool::WebFetch),
    ("Task", CanonicalTool::Task),
    ("TodoWrite", CanonicalTool::Todo),
];

const CODEX_TOOLS: &[(&str, CanonicalTool)] = &[
    ("shell", CanonicalTool::Bash),
    ("local_shell", CanonicalTool::Bash),
    ("exec_command", CanonicalTool::Bash),
    ("apply_patch", CanonicalTool::FileEdit),
    ("update_plan", CanonicalTool::Todo),
    ("web_search", CanonicalTool::WebSearch),
    ("view_image", CanonicalTool::FileRead),
];

const GEMINI_TOOLS: &[(&str, CanonicalTool)] = &[
    ("run_shell_command", CanonicalTool::Bash),
    ("read_file", CanonicalTool::FileRead),
    ("read_many_files", CanonicalTool::FileRead),
    ("write_file", CanonicalTool::FileWrite),
    ("replace", CanonicalTool::FileEdit),
    ("glob", CanonicalTool::Glob),
    ("search_file_content", CanonicalTool::Grep),
    ("google_web_search", CanonicalTool::WebSearch),
    ("web_fetch", CanonicalTool::WebFetch),
    ("save_memory", CanonicalTool::Other),
];

const CURSOR_TOOLS: &[(&str, CanonicalTool)] = &[
    ("run_terminal_cmd", CanonicalTool::Bash),
    ("read_file", CanonicalTool::FileRead),
    ("edit_file", CanonicalTool::FileEdit),
    ("write_file", CanonicalTool::FileWrite),
    ("delete_file", CanonicalTool::FileEdit),
    ("list_dir", CanonicalTool::FileRead),
    ("file_search", CanonicalTool::Glob),
    ("codebase_search", CanonicalTool::Grep),
    ("grep_search", CanonicalTool::Grep),
    ("web_search", CanonicalTool::WebSearch),
];

/// Map a raw tool identifier to the canonical vocabulary. Total: agent tools
/// evolve faster than this table, so unmapped names fall back to `Other`
/// instead of erroring.
pub fn canonical_tool(raw: &str, source: AgentSource) -> CanonicalTool {
    let table = match source {
        AgentSource::ClaudeCode => CLAUDE_TOOLS,
        AgentSource::Codex => CODEX_TOOLS,
        AgentSource::Gemini => GEMINI_TOOLS,
        AgentSource::Cursor => CURSOR_TOOLS,
        AgentSource::Opencode | AgentSource::Other => &[],
    };

    table
        .iter()
        .find(|(name, _)| *name == raw)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(CanonicalTool::Other)
}

/// File effect derived from tool arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEffect {
    pub path: Option<String>,
    pub action: FileAction,
    pub lines_added: Option<u64>,
    pub lines_removed: Option<u64>,
}

/// Line-delta heuristic: simple newline count on the text as written.
pub(crate) fn count_lines(text: &str) -> u64 {
    if text.is_empty() {
        0
    } else {
        text.lines().count() as u64
    }
}

pub(crate) fn arg_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

/// Classify a Codex `apply_patch` document. The patch body uses
/// `*** Add File: <path>` / `*** Update File:` / `*** Delete File:` headers
/// with unified +/- hunk lines.
pub(crate) fn patch_effect(patch: &str) -> Option<FileEffect> {
    let mut path = None;
    let mut action = None;
    let mut added = 0u64;
    let mut removed = 0u64;

    for line in patch.lines() {
        if let Some(rest) = line.strip_prefix("*** Add File: ") {
            action.get_or_insert(FileAction::Create);
            path.get_or_insert_with(|| rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("*** Update File: ") {
            action.get_or_insert(FileAction::Update);
            path.get_or_insert_with(|| rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("*** Delete File: ") {
            action.get_or_insert(FileAction::Delete);
            path.get_or_insert_with(|| rest.trim().to_string());
        } else if line.starts_with("+++") || line.starts_with("---") || line.starts_with("***") {
            continue;
        } else if line.starts_with('+') {
            added += 1;
        } else if line.starts_with('-') {
            removed += 1;
        }
    }

    let action = action?;
    Some(FileEffect {
        path,
        action,
        lines_added: (added > 0).then_some(added),
        lines_removed: (removed > 0).then_some(removed),
    })
}
