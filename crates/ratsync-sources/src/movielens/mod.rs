pub mod acquire;
pub mod client;
pub mod parser;

pub use acquire::{
    wait_for_file, AcquireOutcome, AcquireSettings, AcquireState, CaptureTimestamp, ExportAcquirer, FileWait,
    DEFAULT_DOWNLOAD_FILE_NAME,
};
pub use client::MovielensClient;
pub use parser::{parse_ratings_csv, parse_ratings_reader};
