pub mod config;
pub mod paths;

pub use config::{BrowserConfig, Config, MovielensConfig, DEFAULT_MOVIELENS_EXPORT_URL};
pub use paths::{PathManager, container_base_path};
