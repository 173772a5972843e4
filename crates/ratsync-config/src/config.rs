use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MOVIELENS_EXPORT_URL: &str = "https://movielens.org/api/users/me/movielens-ratings.csv";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub movielens: MovielensConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovielensConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_movielens_export_url")]
    pub export_url: String,
    /// Where the browser drops the export. Falls back to the data dir's `exports`.
    #[serde(default)]
    pub exports_dir: Option<PathBuf>,
    #[serde(default = "default_page_load_timeout_secs")]
    pub page_load_timeout_secs: u64,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// 0 waits for the export file indefinitely
    #[serde(default = "default_file_wait_timeout_secs")]
    pub file_wait_timeout_secs: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Connection to an already running, already logged-in browser
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// DevTools websocket, e.g. `ws://127.0.0.1:9222/devtools/browser/<id>`
    #[serde(default)]
    pub debugger_url: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_movielens_export_url() -> String {
    DEFAULT_MOVIELENS_EXPORT_URL.to_string()
}

fn default_page_load_timeout_secs() -> u64 {
    5
}

fn default_settle_delay_ms() -> u64 {
    1000
}

fn default_file_wait_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for MovielensConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            export_url: default_movielens_export_url(),
            exports_dir: None,
            page_load_timeout_secs: default_page_load_timeout_secs(),
            settle_delay_ms: default_settle_delay_ms(),
            file_wait_timeout_secs: default_file_wait_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl MovielensConfig {
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn file_wait_timeout(&self) -> Option<Duration> {
        match self.file_wait_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// A missing file is not an error: every setting has a default
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let movielens = &self.movielens;

        if !movielens.export_url.starts_with("https://") && !movielens.export_url.starts_with("http://") {
            return Err(anyhow::anyhow!("movielens.export_url must be an http(s) URL: {}", movielens.export_url));
        }
        if movielens.page_load_timeout_secs == 0 {
            return Err(anyhow::anyhow!("movielens.page_load_timeout_secs must be greater than zero"));
        }
        if movielens.poll_interval_ms == 0 {
            return Err(anyhow::anyhow!("movielens.poll_interval_ms must be greater than zero"));
        }

        if let Some(url) = &self.browser.debugger_url {
            if !url.starts_with("ws://") && !url.starts_with("wss://") {
                return Err(anyhow::anyhow!("browser.debugger_url must be a ws:// or wss:// URL: {}", url));
            }
        }

        Ok(())
    }

    /// Configured exports directory, or the default one under `data_dir`
    pub fn exports_dir(&self, paths: &crate::PathManager) -> PathBuf {
        self.movielens
            .exports_dir
            .clone()
            .unwrap_or_else(|| paths.exports_dir())
    }
}
