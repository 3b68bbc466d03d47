use serde_json::Value;

use crate::normalize::{FileEffect, patch_effect};

/// Derive a file effect from a Codex function call. `apply_patch` carries
/// the patch document in its `input` argument; shell tools carry it as the
/// second element of the command vector when the agent shells out to
/// `apply_patch` instead of calling it directly.
pub(super) fn file_effect(name: &str, args: &Value) -> Option<FileEffect> {
    match name {
        "apply_patch" => args
            .get("input")
            .and_then(Value::as_str)
            .and_then(patch_effect),
        "shell" | "local_shell" | "exec_command" => {
            let command = args.get("command")?.as_array()?;
            if command.first()?.as_str()? == "apply_patch" {
                patch_effect(command.get(1)?.as_str()?)
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agsink_types::FileAction;
    use serde_json::json;

    #[test]
    fn apply_patch_argument_is_classified() {
        let args = json!({
            "input": "*** Begin Patch\n*** Add File: a.txt\n+one\n+two\n*** End Patch"
        });
        let effect = file_effect("apply_patch", &args).unwrap();
        assert_eq!(effect.action, FileAction::Create);
        assert_eq!(effect.path.as_deref(), Some("a.txt"));
        assert_eq!(effect.lines_added, Some(2));
    }

    #[test]
    fn shell_wrapped_apply_patch_is_classified() {
        let args = json!({
            "command": [
                "apply_patch",
                "*** Begin Patch\n*** Delete File: old.txt\n*** End Patch"
            ]
        });
        let effect = file_effect("shell", &args).unwrap();
        assert_eq!(effect.action, FileAction::Delete);
        assert_eq!(effect.path.as_deref(), Some("old.txt"));
    }

    #[test]
    fn plain_shell_command_has_no_effect() {
        let args = json!({"command": ["bash", "-lc", "cargo check"]});
        assert_eq!(file_effect("shell", &args), None);
    }
}
