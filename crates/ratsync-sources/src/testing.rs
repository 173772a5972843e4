use async_trait::async_trait;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use crate::error::SessionError;
use crate::movielens::AcquireSettings;
use crate::session::{ExportSession, Navigation};

/// Cloneable in-memory writer so tests can read back what a `StatusLine` wrote
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Browser stand-in: optionally drops a file into the download directory when
/// navigated, the way a real browser would finish the download.
pub struct FakeSession {
    pub outcome: Result<Navigation, String>,
    pub download: Option<(PathBuf, String)>,
    pub visited: Mutex<Vec<(String, Duration)>>,
}

impl FakeSession {
    pub fn new(outcome: Navigation) -> Self {
        Self {
            outcome: Ok(outcome),
            download: None,
            visited: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            download: None,
            visited: Mutex::new(Vec::new()),
        }
    }

    pub fn with_download(mut self, path: PathBuf, contents: &str) -> Self {
        self.download = Some((path, contents.to_string()));
        self
    }

    pub fn visited(&self) -> Vec<(String, Duration)> {
        self.visited.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExportSession for FakeSession {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<Navigation, SessionError> {
        self.visited.lock().unwrap().push((url.to_string(), timeout));
        if let Some((path, contents)) = &self.download {
            std::fs::write(path, contents).unwrap();
        }
        self.outcome.clone().map_err(|message| SessionError::Navigation {
            url: url.to_string(),
            message,
        })
    }
}

/// Fast timings so the polling tests finish quickly
pub fn test_settings(exports_dir: &Path) -> AcquireSettings {
    AcquireSettings {
        export_url: "https://movielens.org/api/users/me/movielens-ratings.csv".to_string(),
        exports_dir: exports_dir.to_path_buf(),
        page_load_timeout: Duration::from_secs(5),
        settle_delay: Duration::from_millis(0),
        file_wait_timeout: Some(Duration::from_millis(100)),
        poll_interval: Duration::from_millis(10),
    }
}
