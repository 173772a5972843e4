use async_trait::async_trait;
use ratsync_models::{MovieRecord, RatingSite};
use std::path::PathBuf;
use crate::error::SourceError;

/// Result of collecting a site's ratings
#[derive(Debug)]
pub enum RatingsFetch {
    /// Export was downloaded, renamed to `path` and parsed
    Parsed { path: PathBuf, movies: Vec<MovieRecord> },
    /// Export never showed up; the operator has already been told
    Unavailable,
}

#[async_trait]
pub trait RatingsSource: Send + Sync {
    fn site(&self) -> RatingSite;

    fn source_name(&self) -> &'static str {
        self.site().name()
    }

    async fn get_ratings(&mut self) -> Result<RatingsFetch, SourceError>;
}
