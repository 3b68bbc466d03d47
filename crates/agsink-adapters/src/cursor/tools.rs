use agsink_types::FileAction;
use serde_json::Value;

use crate::normalize::{FileEffect, arg_str, count_lines};

fn target(args: &Value) -> Option<String> {
    arg_str(args, "target_file")
        .or_else(|| arg_str(args, "file_path"))
        .map(str::to_string)
}

/// Derive a file effect from Cursor tool arguments. `delete_file` is the one
/// source with an explicit delete verb.
pub(super) fn file_effect(name: &str, args: &Value) -> Option<FileEffect> {
    match name {
        "write_file" => {
            let added = count_lines(arg_str(args, "content")?);
            Some(FileEffect {
                path: target(args),
                action: FileAction::Update,
                lines_added: (added > 0).then_some(added),
                lines_removed: None,
            })
        }
        "edit_file" => {
            let added = count_lines(arg_str(args, "code_edit").unwrap_or(""));
            Some(FileEffect {
                path: target(args),
                action: FileAction::Update,
                lines_added: (added > 0).then_some(added),
                lines_removed: None,
            })
        }
        "delete_file" => Some(FileEffect {
            path: target(args),
            action: FileAction::Delete,
            lines_added: None,
            lines_removed: None,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn delete_file_is_a_delete() {
        let effect = file_effect("delete_file", &json!({"target_file": "old.ts"})).unwrap();
        assert_eq!(effect.action, FileAction::Delete);
        assert_eq!(effect.path.as_deref(), Some("old.ts"));
        assert_eq!(effect.lines_added, None);
    }

    #[test]
    fn edit_counts_the_edit_body() {
        let args = json!({"target_file": "a.ts", "code_edit": "x\ny\nz"});
        let effect = file_effect("edit_file", &args).unwrap();
        assert_eq!(effect.action, FileAction::Update);
        assert_eq!(effect.lines_added, Some(3));
    }

    #[test]
    fn terminal_has_no_effect() {
        assert!(file_effect("run_terminal_cmd", &json!({"command": "ls"})).is_none());
    }
}
