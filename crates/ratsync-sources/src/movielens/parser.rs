use csv::{ReaderBuilder, StringRecord};
use once_cell::sync::Lazy;
use ratsync_models::{ExternalId, MovieRecord, RatingSite, SiteRating, SourceRating};
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};
use crate::error::ParseError;
use crate::status::StatusLine;

#[cfg(test)]
mod tests;

// "(1999)" anywhere in the title; the last one is the release year
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([0-9]{4})\)").unwrap());

/// One data row of a MovieLens ratings export, validated by column count.
///
/// Columns: `movie_id, imdb_id, tmdb_id, rating, average_rating, title`.
/// The average rating is not used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub movie_id: String,
    pub imdb_id: String,
    pub tmdb_id: String,
    pub rating: String,
    pub title: String,
}

impl ExportRow {
    pub const MIN_COLUMNS: usize = 6;

    pub fn from_record(record: &StringRecord, line: u64) -> Result<Self, ParseError> {
        if record.len() < Self::MIN_COLUMNS {
            return Err(ParseError::ShortRow { line, found: record.len() });
        }
        let field = |idx: usize| record.get(idx).unwrap_or_default().to_string();

        Ok(Self {
            movie_id: field(0),
            imdb_id: field(1),
            tmdb_id: field(2),
            rating: field(3),
            title: field(5),
        })
    }

    pub fn into_movie(self, line: u64) -> Result<MovieRecord, ParseError> {
        let (title, year) = split_title_year(&self.title);
        let my_rating = half_star_rating(&self.rating).ok_or_else(|| ParseError::InvalidRating {
            line,
            value: self.rating.clone(),
        })?;

        Ok(MovieRecord {
            title,
            year,
            source: SourceRating::Movielens(SiteRating::new(RatingSite::Movielens, &self.movie_id, my_rating)),
            imdb: ExternalId::imdb(&self.imdb_id),
            tmdb: ExternalId::tmdb(&self.tmdb_id),
        })
    }
}

/// Split `"Alien (Director's Cut) (1979)"` into `("Alien (Director's Cut)", 1979)`.
/// Without a parenthesized year the year is 0 and the title is only trimmed.
pub fn split_title_year(raw: &str) -> (String, u32) {
    match YEAR_RE.captures_iter(raw).last() {
        Some(caps) => {
            let year = caps[1].parse::<u32>().unwrap_or(0);
            let title = raw.replace(&caps[0], "").trim().to_string();
            (title, year)
        }
        None => (raw.trim().to_string(), 0),
    }
}

/// 0.0-5.0 stars to the 0-10 half-star scale, truncating: "3.5" -> 7
pub fn half_star_rating(raw: &str) -> Option<u8> {
    let stars: f64 = raw.trim().parse().ok()?;
    if !stars.is_finite() || !(0.0..=5.0).contains(&stars) {
        return None;
    }
    Some((stars * 2.0) as u8)
}

/// Convert one raw CSV record (header already skipped)
pub fn convert_row(record: &StringRecord, line: u64) -> Result<MovieRecord, ParseError> {
    ExportRow::from_record(record, line)?.into_movie(line)
}

/// Parse a MovieLens ratings export from disk
pub fn parse_ratings_csv<P: AsRef<Path>>(path: P, status: &StatusLine) -> Result<Vec<MovieRecord>, ParseError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let movies = parse_ratings_reader(file, status)?;
    info!("Parsed {} movies from {:?}", movies.len(), path);
    Ok(movies)
}

/// Parse a MovieLens ratings export. The first row is a header and is
/// discarded. Any bad row fails the whole parse.
pub fn parse_ratings_reader<R: Read>(input: R, status: &StatusLine) -> Result<Vec<MovieRecord>, ParseError> {
    // flexible: short rows must reach ExportRow's check instead of failing as UnequalLengths
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let mut movies = Vec::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        status.detail("reading movie from CSV:", record.iter());

        let movie = convert_row(&record, line)?;

        // Debug first few rows
        if movies.len() < 3 {
            debug!(
                line = line,
                movie_id = %movie.source.rating().id,
                imdb_id = %movie.imdb.id,
                title = %movie.title,
                year = movie.year,
                my_rating = movie.my_rating(),
                "Parsed ratings CSV row"
            );
        }

        movies.push(movie);
    }

    Ok(movies)
}
