pub mod external_id;
pub mod movie;
pub mod site;

pub use external_id::ExternalId;
pub use movie::{MovieRecord, SourceRating};
pub use site::{RatingSite, SiteRating};
