pub mod error;
pub mod movielens;
pub mod session;
pub mod status;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ParseError, SessionError, SourceError};
pub use movielens::MovielensClient;
pub use session::{route_downloads_to, ExportSession, Navigation};
pub use status::StatusLine;
pub use traits::{RatingsFetch, RatingsSource};
