use async_trait::async_trait;
use ratsync_models::RatingSite;
use tracing::info;
use crate::error::SourceError;
use crate::movielens::acquire::{AcquireOutcome, AcquireSettings, CaptureTimestamp, ExportAcquirer};
use crate::movielens::parser;
use crate::session::ExportSession;
use crate::status::StatusLine;
use crate::traits::{RatingsFetch, RatingsSource};

/// MovieLens ratings through an already logged-in browser session
pub struct MovielensClient<S: ExportSession> {
    session: S,
    acquirer: ExportAcquirer,
    status: StatusLine,
}

impl<S: ExportSession> MovielensClient<S> {
    pub fn new(session: S, settings: AcquireSettings, timestamp: CaptureTimestamp, status: StatusLine) -> Self {
        Self {
            session,
            acquirer: ExportAcquirer::new(RatingSite::Movielens, settings, timestamp),
            status,
        }
    }

    pub fn acquirer(&self) -> &ExportAcquirer {
        &self.acquirer
    }

    pub fn session(&self) -> &S {
        &self.session
    }
}

#[async_trait]
impl<S: ExportSession> RatingsSource for MovielensClient<S> {
    fn site(&self) -> RatingSite {
        RatingSite::Movielens
    }

    async fn get_ratings(&mut self) -> Result<RatingsFetch, SourceError> {
        self.acquirer.download_export_file(&self.session, &self.status).await?;

        match self.acquirer.wait_and_rename(&self.status).await? {
            AcquireOutcome::Renamed(path) => {
                self.status.line("getting movies from CSV");
                let movies = parser::parse_ratings_csv(&path, &self.status)?;
                info!(site = self.source_name(), count = movies.len(), "Collected ratings");
                Ok(RatingsFetch::Parsed { path, movies })
            }
            AcquireOutcome::Reported => Ok(RatingsFetch::Unavailable),
        }
    }
}
