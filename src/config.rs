use core::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://yutura.net";
pub const DEFAULT_BANNED_PATH: &str = "/banned/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "ja,en-US;q=0.9,en;q=0.8";
pub const DEFAULT_STATE_FILE: &str = "notified.json";

/// Resolved run configuration. The binary fills this from flags and the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub banned_path: String,
    pub pages: u32,
    /// `None` only in dry-run mode.
    pub webhook_url: Option<String>,
    pub user_agent: String,
    pub accept_language: String,
    pub state_file: std::path::PathBuf,
    pub listing_delay: Duration,
    pub detail_delay: Duration,
    pub error_delay: Duration,
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            banned_path: DEFAULT_BANNED_PATH.to_owned(),
            pages: 1,
            webhook_url: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_owned(),
            state_file: DEFAULT_STATE_FILE.into(),
            listing_delay: const { Duration::from_millis(1000) },
            detail_delay: const { Duration::from_millis(1500) },
            error_delay: const { Duration::from_millis(5000) },
            dry_run: false,
        }
    }
}
