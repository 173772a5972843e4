use std::path::PathBuf;

/// Malformed export data. Any of these aborts the whole parse so a corrupt
/// export never yields a silently partial list.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read export {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: expected at least 6 columns, found {found}")]
    ShortRow { line: u64, found: usize },

    #[error("line {line}: invalid rating '{value}' (expected a number between 0.0 and 5.0)")]
    InvalidRating { line: u64, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("failed to configure download directory {path}: {message}")]
    Downloads { path: PathBuf, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("export file operation failed: {0}")]
    Io(#[from] std::io::Error),
}
