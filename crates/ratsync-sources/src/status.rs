use ratsync_models::RatingSite;
use std::io::{self, Write};
use std::sync::Mutex;
use tracing::debug;

/// Single-line, overwriting progress text for one site.
///
/// Every line is prefixed with `===== {Site}: ` and starts with a carriage
/// return, so successive `progress` calls redraw the same terminal line until
/// `finish` ends it. Messages are mirrored to `tracing` so non-interactive
/// runs still get them in the log.
pub struct StatusLine {
    site: RatingSite,
    writer: Mutex<Box<dyn Write + Send>>,
    verbosity: u8,
    quiet: bool,
}

impl StatusLine {
    pub fn stdout(site: RatingSite, verbosity: u8, quiet: bool) -> Self {
        Self::with_writer(site, Box::new(io::stdout()), verbosity, quiet)
    }

    pub fn with_writer(site: RatingSite, writer: Box<dyn Write + Send>, verbosity: u8, quiet: bool) -> Self {
        Self {
            site,
            writer: Mutex::new(writer),
            verbosity,
            quiet,
        }
    }

    /// Discards everything; tracing events are still emitted
    pub fn silent(site: RatingSite) -> Self {
        Self::with_writer(site, Box::new(io::sink()), 0, true)
    }

    pub fn site(&self) -> RatingSite {
        self.site
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity >= 1 && !self.quiet
    }

    /// Redraw the current line
    pub fn progress(&self, msg: &str) {
        debug!(site = self.site.name(), "{}", msg);
        self.write(&format!("\r===== {}: {}", self.site.name(), msg));
    }

    /// Redraw the current line and end it
    pub fn finish(&self, msg: &str) {
        debug!(site = self.site.name(), "{}", msg);
        self.write(&format!("\r===== {}: {}\r\n", self.site.name(), msg));
    }

    /// Full line without the site prefix
    pub fn line(&self, msg: &str) {
        debug!(site = self.site.name(), "{}", msg);
        self.write(&format!("===== {}\r\n", msg));
    }

    /// Dump raw fields under a heading, only at verbosity >= 1
    pub fn detail<'a, I>(&self, heading: &str, fields: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        if !self.is_verbose() {
            return;
        }
        let mut text = format!("\r===== {}: {}\r\n", self.site.name(), heading);
        for field in fields {
            text.push_str(field);
            text.push_str("\r\n");
        }
        self.write(&text);
    }

    fn write(&self, text: &str) {
        if self.quiet {
            return;
        }
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if let Err(e) = writer.write_all(text.as_bytes()).and_then(|_| writer.flush()) {
            debug!("Failed to write status line: {}", e);
        }
    }
}

impl std::fmt::Debug for StatusLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusLine")
            .field("site", &self.site)
            .field("verbosity", &self.verbosity)
            .field("quiet", &self.quiet)
            .finish()
    }
}
