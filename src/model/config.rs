use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://api.todoist.com/rest/v2";
pub const DEFAULT_SYNC_URL: &str = "https://api.todoist.com/sync/v9";

/// Configuration from `config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// API token; the `-k` flag and `TODOIST_API_TOKEN` take precedence
    #[serde(default)]
    pub api_token: Option<String>,
    /// Base URL of the REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Base URL of the sync API (used for reminders)
    #[serde(default = "default_sync_url")]
    pub sync_url: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Strip emoji from displayed text unless overridden on the command line
    #[serde(default)]
    pub strip_emojis: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_token: None,
            api_url: default_api_url(),
            sync_url: default_sync_url(),
            timeout_secs: default_timeout_secs(),
            strip_emojis: false,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_sync_url() -> String {
    DEFAULT_SYNC_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
