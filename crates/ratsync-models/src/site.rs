use serde::{Deserialize, Serialize};

/// Sites a ratings export can be collected from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RatingSite {
    Movielens, // 0.5-5.0 stars, half-star steps
}

impl RatingSite {
    /// Display name, also used in export file names (`..._Movielens.csv`)
    pub fn name(&self) -> &'static str {
        match self {
            RatingSite::Movielens => "Movielens",
        }
    }

    /// Lowercase key used when a record is serialized
    pub fn key(&self) -> &'static str {
        match self {
            RatingSite::Movielens => "movielens",
        }
    }

    pub fn movie_url(&self, id: &str) -> String {
        match self {
            RatingSite::Movielens => format!("https://movielens.org/movies/{}", id),
        }
    }
}

/// The user's rating on the site the export came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteRating {
    pub id: String,
    pub url: String,
    pub my_rating: u8, // 0-10 half-star scale
}

impl SiteRating {
    pub fn new(site: RatingSite, id: &str, my_rating: u8) -> Self {
        Self {
            id: id.to_string(),
            url: site.movie_url(id),
            my_rating,
        }
    }
}
