use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::browser::{SetDownloadBehaviorBehavior, SetDownloadBehaviorParams};
use chromiumoxide::Page;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use crate::error::SessionError;

/// How a navigation ended when it did not fail outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Completed,
    TimedOut,
}

/// An already-authenticated browser tab that exports can be requested through.
///
/// Logging in, cookies and launching the browser all happen before a session
/// reaches this crate.
#[async_trait]
pub trait ExportSession: Send + Sync {
    /// Navigate to `url`, giving up on the page load after `timeout`.
    /// A timeout is reported as `Navigation::TimedOut`, not as an error, since
    /// a download may still be running in the background.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<Navigation, SessionError>;
}

#[async_trait]
impl ExportSession for Page {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<Navigation, SessionError> {
        info!("Navigating to {} (timeout: {}s)...", url, timeout.as_secs());
        let start = Instant::now();

        match tokio::time::timeout(timeout, self.goto(url.to_string())).await {
            Ok(Ok(_)) => {
                debug!("Navigation to {} completed in {:.2}s", url, start.elapsed().as_secs_f64());
                Ok(Navigation::Completed)
            }
            Ok(Err(e)) => {
                let message = e.to_string();
                // Chromium aborts the navigation once the response turns into a download
                if message.contains("ERR_ABORTED") {
                    debug!("Navigation to {} was turned into a download", url);
                    return Ok(Navigation::Completed);
                }
                warn!("Navigation to {} failed after {:.2}s: {}", url, start.elapsed().as_secs_f64(), message);
                Err(SessionError::Navigation { url: url.to_string(), message })
            }
            Err(_) => {
                debug!("Navigation to {} timed out after {}s", url, timeout.as_secs());
                Ok(Navigation::TimedOut)
            }
        }
    }
}

/// Make the browser save downloads straight into `download_dir`
pub async fn route_downloads_to(page: &Page, download_dir: &Path) -> Result<(), SessionError> {
    std::fs::create_dir_all(download_dir).map_err(|e| SessionError::Downloads {
        path: download_dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let params = SetDownloadBehaviorParams {
        behavior: SetDownloadBehaviorBehavior::Allow,
        download_path: Some(download_dir.to_string_lossy().to_string()),
        browser_context_id: None,
        events_enabled: None,
    };

    page.execute(params).await.map_err(|e| SessionError::Downloads {
        path: download_dir.to_path_buf(),
        message: e.to_string(),
    })?;

    debug!("Browser downloads routed to {:?}", download_dir);
    Ok(())
}
