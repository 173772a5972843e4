use serde::{Deserialize, Serialize};
use crate::external_id::ExternalId;
use crate::site::{RatingSite, SiteRating};

/// A rated movie as read from one row of a site's ratings export
///
/// The source rating is flattened so a record serializes with the site key at
/// the top level, next to `imdb` and `tmdb`:
/// `{"title": .., "year": .., "movielens": {..}, "imdb": {..}, "tmdb": {..}}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    pub title: String,
    pub year: u32, // 0 when the export carries no year
    #[serde(flatten)]
    pub source: SourceRating,
    pub imdb: ExternalId,
    pub tmdb: ExternalId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceRating {
    Movielens(SiteRating),
}

impl SourceRating {
    pub fn site(&self) -> RatingSite {
        match self {
            SourceRating::Movielens(_) => RatingSite::Movielens,
        }
    }

    pub fn rating(&self) -> &SiteRating {
        match self {
            SourceRating::Movielens(rating) => rating,
        }
    }
}

impl MovieRecord {
    pub fn site(&self) -> RatingSite {
        self.source.site()
    }

    pub fn my_rating(&self) -> u8 {
        self.source.rating().my_rating
    }
}
