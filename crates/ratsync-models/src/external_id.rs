use serde::{Deserialize, Serialize};

const IMDB_PREFIX: &str = "tt";

/// Identifier of a movie on a service other than the one the rating came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ExternalId {
    pub id: String,
    pub url: String,
}

impl ExternalId {
    /// IMDb title id. Exports sometimes carry the bare numeric part
    /// (e.g. `0133093`), so the `tt` prefix is added when missing.
    /// Only a leading `tt` counts as present: an id with `tt` somewhere in
    /// the middle still gets the prefix.
    pub fn imdb(raw: &str) -> Self {
        let id = if raw.starts_with(IMDB_PREFIX) {
            raw.to_string()
        } else {
            format!("{}{}", IMDB_PREFIX, raw)
        };
        let url = format!("http://www.imdb.com/title/{}", id);
        Self { id, url }
    }

    /// TMDb movie id, kept verbatim
    pub fn tmdb(raw: &str) -> Self {
        Self {
            id: raw.to_string(),
            url: format!("https://www.themoviedb.org/movie/{}", raw),
        }
    }
}
