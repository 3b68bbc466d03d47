use agsink_types::FileAction;
use serde_json::Value;

use crate::normalize::{FileEffect, arg_str, count_lines};

/// Derive a file effect from Claude tool arguments.
///
/// Adapters never inspect the filesystem, so Write on an unseen path is
/// still classified as `update` rather than guessing `create`.
pub(crate) fn file_effect(tool_name: &str, args: &Value) -> Option<FileEffect> {
    match tool_name {
        "Write" => {
            let added = count_lines(arg_str(args, "content")?);
            Some(FileEffect {
                path: arg_str(args, "file_path").map(str::to_string),
                action: FileAction::Update,
                lines_added: (added > 0).then_some(added),
                lines_removed: None,
            })
        }
        "Edit" => {
            let removed = count_lines(arg_str(args, "old_string").unwrap_or(""));
            let added = count_lines(arg_str(args, "new_string").unwrap_or(""));
            Some(FileEffect {
                path: arg_str(args, "file_path").map(str::to_string),
                action: FileAction::Update,
                lines_added: (added > 0).then_some(added),
                lines_removed: (removed > 0).then_some(removed),
            })
        }
        "MultiEdit" => {
            let edits = args.get("edits")?.as_array()?;
            let mut added = 0;
            let mut removed = 0;
            for edit in edits {
                removed += count_lines(arg_str(edit, "old_string").unwrap_or(""));
                added += count_lines(arg_str(edit, "new_string").unwrap_or(""));
            }
            Some(FileEffect {
                path: arg_str(args, "file_path").map(str::to_string),
                action: FileAction::Update,
                lines_added: (added > 0).then_some(added),
                lines_removed: (removed > 0).then_some(removed),
            })
        }
        "NotebookEdit" => Some(FileEffect {
            path: arg_str(args, "notebook_path").map(str::to_string),
            action: FileAction::Update,
            lines_added: arg_str(args, "new_source")
                .map(count_lines)
                .filter(|n| *n > 0),
            lines_removed: None,
        }),
        _ => None,
    }
}
