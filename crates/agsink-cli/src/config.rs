use agsink_types::Identity;
use serde::Deserialize;
use std::path::PathBuf;

/// On-disk identity configuration, `~/.config/agsink/config.toml`:
///
/// ```toml
/// user_id = "jane"
/// team_id = "platform"    # optional
/// machine_id = "laptop-1" # optional
/// ```
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    user_id: Option<String>,
    team_id: Option<String>,
    machine_id: Option<String>,
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("agsink").join("config.toml"))
}

/// Load identity from configuration. A missing or unparseable file falls
/// back to the login user, so ingestion works before anyone writes a config.
pub fn load_identity() -> Identity {
    let file = config_path()
        .and_then(|path| std::fs::read_to_string(path).ok())
        .and_then(|text| toml::from_str::<ConfigFile>(&text).ok())
        .unwrap_or_default();

    Identity {
        user_id: file
            .user_id
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_else(|| "unknown".to_string()),
        team_id: file.team_id,
        machine_id: file.machine_id,
    }
}

/// Default database location under the platform data directory.
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("agsink")
        .join("agsink.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let file: ConfigFile =
            toml::from_str("user_id = \"jane\"\nteam_id = \"platform\"").unwrap();
        assert_eq!(file.user_id.as_deref(), Some("jane"));
        assert_eq!(file.team_id.as_deref(), Some("platform"));
        assert_eq!(file.machine_id, None);
    }

    #[test]
    fn identity_always_has_a_user() {
        let identity = load_identity();
        assert!(!identity.user_id.is_empty());
    }
}
