use agsink_types::FileAction;
use serde_json::Value;

use crate::normalize::{FileEffect, arg_str, count_lines};

/// Derive a file effect from Gemini tool arguments.
pub(super) fn file_effect(name: &str, args: &Value) -> Option<FileEffect> {
    match name {
        "write_file" => {
            let added = count_lines(arg_str(args, "content")?);
            Some(FileEffect {
                path: arg_str(args, "file_path").map(str::to_string),
                action: FileAction::Update,
                lines_added: (added > 0).then_some(added),
                lines_removed: None,
            })
        }
        "replace" => {
            let removed = count_lines(arg_str(args, "old_string").unwrap_or(""));
            let added = count_lines(arg_str(args, "new_string").unwrap_or(""));
            Some(FileEffect {
                path: arg_str(args, "file_path").map(str::to_string),
                action: FileAction::Update,
                lines_added: (added > 0).then_some(added),
                lines_removed: (removed > 0).then_some(removed),
            })
        }
        _ => None,
    }
}

/// `run_shell_command` takes an optional working directory; it carries no
/// file effect but seeds the event context.
pub(super) fn shell_directory(name: &str, args: &Value) -> Option<String> {
    if name != "run_shell_command" {
        return None;
    }
    arg_str(args, "directory").map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn write_file_counts_lines() {
        let args = json!({"file_path": "/tmp/a.py", "content": "a\nb"});
        let effect = file_effect("write_file", &args).unwrap();
        assert_eq!(effect.action, FileAction::Update);
        assert_eq!(effect.lines_added, Some(2));
        assert_eq!(effect.lines_removed, None);
    }

    #[test]
    fn replace_counts_both_sides() {
        let args = json!({"file_path": "/tmp/a.py", "old_string": "x", "new_string": "y\nz"});
        let effect = file_effect("replace", &args).unwrap();
        assert_eq!(effect.lines_removed, Some(1));
        assert_eq!(effect.lines_added, Some(2));
    }

    #[test]
    fn read_has_no_effect() {
        assert!(file_effect("read_file", &json!({"file_path": "/tmp/a.py"})).is_none());
    }

    #[test]
    fn shell_directory_only_for_shell() {
        let args = json!({"command": "ls", "directory": "/work"});
        assert_eq!(
            shell_directory("run_shell_command", &args).as_deref(),
            Some("/work")
        );
        assert_eq!(shell_directory("write_file", &args), None);
    }
}
