use chrono::{Local, NaiveDateTime};
use ratsync_config::MovielensConfig;
use ratsync_models::RatingSite;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};
use crate::error::SourceError;
use crate::session::{ExportSession, Navigation};
use crate::status::StatusLine;

/// Name the browser gives the export before we rename it
pub const DEFAULT_DOWNLOAD_FILE_NAME: &str = "movielens-ratings.csv";

/// Capture time of a run, embedded in every export file name written by it.
/// Computed once per run by the caller and handed to the acquirer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureTimestamp(NaiveDateTime);

impl CaptureTimestamp {
    pub fn now() -> Self {
        Self(Local::now().naive_local())
    }

    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    /// `YYYYMMDDHHMMSS`
    pub fn compact(&self) -> String {
        self.0.format("%Y%m%d%H%M%S").to_string()
    }
}

impl fmt::Display for CaptureTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.compact())
    }
}

#[derive(Debug, Clone)]
pub struct AcquireSettings {
    pub export_url: String,
    pub exports_dir: PathBuf,
    pub page_load_timeout: Duration,
    /// Pause before requesting the export, and again after a navigation timeout
    pub settle_delay: Duration,
    /// None polls until the file shows up
    pub file_wait_timeout: Option<Duration>,
    pub poll_interval: Duration,
}

impl AcquireSettings {
    pub fn from_config(config: &MovielensConfig, exports_dir: PathBuf) -> Self {
        Self {
            export_url: config.export_url.clone(),
            exports_dir,
            page_load_timeout: config.page_load_timeout(),
            settle_delay: config.settle_delay(),
            file_wait_timeout: config.file_wait_timeout(),
            poll_interval: config.poll_interval(),
        }
    }
}

/// NotRequested -> Requested -> (Downloading | TimedOut) -> Waiting -> (Renamed | Reported)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireState {
    NotRequested,
    Requested,
    Downloading,
    TimedOut,
    Waiting,
    Renamed,
    Reported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireOutcome {
    Renamed(PathBuf),
    /// The export never materialized; the operator was told on the status line
    Reported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileWait {
    Found,
    NotFound,
}

/// Poll until `path` exists. With no timeout this only returns once the file
/// is there.
pub async fn wait_for_file(path: &Path, poll_interval: Duration, timeout: Option<Duration>) -> FileWait {
    let start = Instant::now();
    let mut polls = 0u32;

    loop {
        if path.exists() {
            debug!("Found {:?} after {} polls", path, polls);
            return FileWait::Found;
        }
        if let Some(limit) = timeout {
            if start.elapsed() >= limit {
                debug!("Gave up waiting for {:?} after {:.1}s", path, start.elapsed().as_secs_f64());
                return FileWait::NotFound;
            }
        }
        polls += 1;
        sleep(poll_interval).await;
    }
}

/// Requests a site's ratings export through a browser session and moves the
/// downloaded file to a timestamped name in the exports directory.
#[derive(Debug)]
pub struct ExportAcquirer {
    site: RatingSite,
    settings: AcquireSettings,
    timestamp: CaptureTimestamp,
    state: AcquireState,
}

impl ExportAcquirer {
    pub fn new(site: RatingSite, settings: AcquireSettings, timestamp: CaptureTimestamp) -> Self {
        Self {
            site,
            settings,
            timestamp,
            state: AcquireState::NotRequested,
        }
    }

    pub fn state(&self) -> AcquireState {
        self.state
    }

    pub fn settings(&self) -> &AcquireSettings {
        &self.settings
    }

    /// Where the browser drops the export
    pub fn download_path(&self) -> PathBuf {
        self.settings.exports_dir.join(DEFAULT_DOWNLOAD_FILE_NAME)
    }

    /// `{timestamp}_{Site}.csv`
    pub fn export_file_name(&self) -> String {
        format!("{}_{}.csv", self.timestamp, self.site.name())
    }

    pub fn export_path(&self) -> PathBuf {
        self.settings.exports_dir.join(self.export_file_name())
    }

    /// Ask the browser for the export. A page-load timeout is expected here
    /// (the response is a file, not a page) and is not an error.
    pub async fn download_export_file<S>(&mut self, session: &S, status: &StatusLine) -> Result<Navigation, SourceError>
    where
        S: ExportSession + ?Sized,
    {
        status.progress("Retrieving ratings CSV file");
        std::fs::create_dir_all(&self.settings.exports_dir)?;

        self.state = AcquireState::Requested;
        sleep(self.settings.settle_delay).await;

        let navigation = session
            .navigate(&self.settings.export_url, self.settings.page_load_timeout)
            .await?;

        match navigation {
            Navigation::Completed => {
                self.state = AcquireState::Downloading;
            }
            Navigation::TimedOut => {
                debug!(
                    "Export request timed out after {}s, download may still be running",
                    self.settings.page_load_timeout.as_secs()
                );
                sleep(self.settings.settle_delay).await;
                self.state = AcquireState::TimedOut;
            }
        }

        Ok(navigation)
    }

    /// Wait for the browser's download, then move it to its timestamped name
    pub async fn wait_and_rename(&mut self, status: &StatusLine) -> Result<AcquireOutcome, SourceError> {
        self.state = AcquireState::Waiting;
        let download_path = self.download_path();

        match wait_for_file(&download_path, self.settings.poll_interval, self.settings.file_wait_timeout).await {
            FileWait::Found => Ok(self.rename_export(status)?),
            FileWait::NotFound => {
                warn!("Export file {:?} never appeared", download_path);
                Ok(self.report_missing(status))
            }
        }
    }

    /// Move the downloaded export to its timestamped name. If the download is
    /// gone by now, the failure is reported rather than returned.
    pub fn rename_export(&mut self, status: &StatusLine) -> io::Result<AcquireOutcome> {
        let download_path = self.download_path();
        let export_path = self.export_path();

        // An existing export is only replaced once there is a download to replace it with
        if !download_path.exists() {
            warn!("Export file {:?} vanished before it could be renamed", download_path);
            return Ok(self.report_missing(status));
        }
        if export_path.exists() {
            std::fs::remove_file(&export_path)?;
        }

        match std::fs::rename(&download_path, &export_path) {
            Ok(()) => {
                status.finish(&format!(
                    "CSV downloaded to {}/{}",
                    self.settings.exports_dir.display(),
                    self.export_file_name()
                ));
                info!("Renamed {:?} to {:?}", download_path, export_path);
                self.state = AcquireState::Renamed;
                Ok(AcquireOutcome::Renamed(export_path))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Export file {:?} vanished before it could be renamed", download_path);
                Ok(self.report_missing(status))
            }
            Err(e) => Err(e),
        }
    }

    fn report_missing(&mut self, status: &StatusLine) -> AcquireOutcome {
        status.finish("Could not retrieve ratings CSV");
        self.state = AcquireState::Reported;
        AcquireOutcome::Reported
    }
}
