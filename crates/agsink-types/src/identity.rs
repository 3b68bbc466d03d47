use serde::{Deserialize, Serialize};

/// Read-only identity context attached to every stored event.
///
/// Loaded by the CLI from configuration; the core never writes it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub machine_id: Option<String>,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            team_id: None,
            machine_id: None,
        }
    }
}
