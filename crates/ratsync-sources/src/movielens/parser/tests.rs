use super::*;
use crate::testing::SharedBuffer;
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "movie_id,imdb_id,tmdb_id,rating,average_rating,title";

fn record(fields: &[&str]) -> StringRecord {
    StringRecord::from(fields.to_vec())
}

fn create_ratings_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file
}

fn silent() -> StatusLine {
    StatusLine::silent(RatingSite::Movielens)
}

#[test]
fn test_split_title_year() {
    assert_eq!(split_title_year("Pulp Fiction (1994)"), ("Pulp Fiction".to_string(), 1994));
    assert_eq!(split_title_year("  Heat (1995)  "), ("Heat".to_string(), 1995));
}

#[test]
fn test_split_title_year_last_match_wins() {
    assert_eq!(
        split_title_year("Alien (Director's Cut) (1979)"),
        ("Alien (Director's Cut)".to_string(), 1979)
    );
    assert_eq!(
        split_title_year("Blade Runner (1982) (2007)"),
        ("Blade Runner (1982)".to_string(), 2007)
    );
}

#[test]
fn test_split_title_year_removes_every_copy_of_the_year() {
    let (title, year) = split_title_year("Solaris (1972) Remaster (1972)");
    assert_eq!(year, 1972);
    assert_eq!(title, "Solaris  Remaster");
    assert!(!title.contains("(1972)"));
}

#[test]
fn test_split_title_year_without_year() {
    assert_eq!(split_title_year("  Unknown Title "), ("Unknown Title".to_string(), 0));
    assert_eq!(split_title_year("Brazil (Final Cut)"), ("Brazil (Final Cut)".to_string(), 0));
    // Not exactly four digits
    assert_eq!(split_title_year("Movie (19999)"), ("Movie (19999)".to_string(), 0));
    assert_eq!(split_title_year("2001: A Space Odyssey"), ("2001: A Space Odyssey".to_string(), 0));
}

#[test]
fn test_half_star_rating() {
    assert_eq!(half_star_rating("3.5"), Some(7));
    assert_eq!(half_star_rating("4.0"), Some(8));
    assert_eq!(half_star_rating("0.5"), Some(1));
    assert_eq!(half_star_rating("5"), Some(10));
    assert_eq!(half_star_rating("0.0"), Some(0));
    // Truncated, not rounded
    assert_eq!(half_star_rating("3.3"), Some(6));
    assert_eq!(half_star_rating("4.99"), Some(9));
}

#[test]
fn test_half_star_rating_rejects_malformed_values() {
    assert_eq!(half_star_rating(""), None);
    assert_eq!(half_star_rating("four"), None);
    assert_eq!(half_star_rating("-1.0"), None);
    assert_eq!(half_star_rating("5.5"), None);
    assert_eq!(half_star_rating("NaN"), None);
    assert_eq!(half_star_rating("inf"), None);
}

#[test]
fn test_convert_row() {
    let movie = convert_row(&record(&["123", "0133093", "680", "3.5", "x", "Pulp Fiction (1994)"]), 2).unwrap();

    assert_eq!(movie.title, "Pulp Fiction");
    assert_eq!(movie.year, 1994);
    assert_eq!(movie.site(), RatingSite::Movielens);
    assert_eq!(movie.source.rating().id, "123");
    assert_eq!(movie.source.rating().url, "https://movielens.org/movies/123");
    assert_eq!(movie.my_rating(), 7);
    assert_eq!(movie.imdb.id, "tt0133093");
    assert_eq!(movie.imdb.url, "http://www.imdb.com/title/tt0133093");
    assert_eq!(movie.tmdb.id, "680");
    assert_eq!(movie.tmdb.url, "https://www.themoviedb.org/movie/680");
}

#[test]
fn test_convert_row_keeps_prefixed_imdb_id() {
    let movie = convert_row(&record(&["1", "tt0133093", "603", "4.0", "x", "The Matrix (1999)"]), 2).unwrap();
    assert_eq!(movie.imdb.id, "tt0133093");
    assert_eq!(movie.my_rating(), 8);
}

#[test]
fn test_convert_row_ignores_extra_columns() {
    let movie = convert_row(&record(&["1", "1", "2", "2.5", "x", "Heat (1995)", "extra"]), 2).unwrap();
    assert_eq!(movie.title, "Heat");
    assert_eq!(movie.my_rating(), 5);
}

#[test]
fn test_convert_row_short_row() {
    let result = convert_row(&record(&["123", "0133093", "680", "3.5", "x"]), 4);
    assert!(matches!(result, Err(ParseError::ShortRow { line: 4, found: 5 })));
}

#[test]
fn test_convert_row_invalid_rating() {
    let result = convert_row(&record(&["123", "0133093", "680", "great", "x", "Heat (1995)"]), 7);
    match result {
        Err(ParseError::InvalidRating { line, value }) => {
            assert_eq!(line, 7);
            assert_eq!(value, "great");
        }
        other => panic!("expected InvalidRating, got {:?}", other),
    }
}

#[test]
fn test_parse_ratings_csv() {
    let file = create_ratings_csv(&["123,0133093,680,3.5,x,Pulp Fiction (1994)"]);
    let movies = parse_ratings_csv(file.path(), &silent()).unwrap();

    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "Pulp Fiction");
    assert_eq!(movies[0].year, 1994);
    assert_eq!(movies[0].my_rating(), 7);
    assert_eq!(movies[0].imdb.id, "tt0133093");
    assert_eq!(movies[0].tmdb.id, "680");
}

#[test]
fn test_parse_ratings_csv_keeps_row_order_and_quoted_titles() {
    let file = create_ratings_csv(&[
        "1,0114369,807,4.5,4.1,Se7en (a.k.a. Seven) (1995)",
        "2,0078748,348,5.0,4.0,\"Alien (Director's Cut) (1979)\"",
        "3,0092099,744,2.0,3.3,\"Good, the Bad and the Ugly, The (1966)\"",
        "4,1234567,99,1.5,2.0,Untitled Project",
    ]);
    let movies = parse_ratings_csv(file.path(), &silent()).unwrap();

    let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Se7en (a.k.a. Seven)",
            "Alien (Director's Cut)",
            "Good, the Bad and the Ugly, The",
            "Untitled Project",
        ]
    );
    let years: Vec<u32> = movies.iter().map(|m| m.year).collect();
    assert_eq!(years, vec![1995, 1979, 1966, 0]);
    let ratings: Vec<u8> = movies.iter().map(|m| m.my_rating()).collect();
    assert_eq!(ratings, vec![9, 10, 4, 3]);
}

#[test]
fn test_parse_ratings_csv_header_only() {
    let file = create_ratings_csv(&[]);
    let movies = parse_ratings_csv(file.path(), &silent()).unwrap();
    assert!(movies.is_empty());
}

#[test]
fn test_parse_ratings_csv_short_row_aborts_batch() {
    let file = create_ratings_csv(&[
        "123,0133093,680,3.5,x,Pulp Fiction (1994)",
        "124,0133094,681,3.5",
    ]);
    let result = parse_ratings_csv(file.path(), &silent());
    assert!(matches!(result, Err(ParseError::ShortRow { line: 3, found: 4 })));
}

#[test]
fn test_parse_ratings_csv_bad_rating_aborts_batch() {
    let file = create_ratings_csv(&[
        "123,0133093,680,3.5,x,Pulp Fiction (1994)",
        "124,0133094,681,n/a,x,Heat (1995)",
    ]);
    let result = parse_ratings_csv(file.path(), &silent());
    assert!(matches!(result, Err(ParseError::InvalidRating { line: 3, .. })));
}

#[test]
fn test_parse_ratings_csv_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = parse_ratings_csv(dir.path().join("missing.csv"), &silent());
    assert!(matches!(result, Err(ParseError::Io { .. })));
}

#[test]
fn test_parse_ratings_reader_verbose_dumps_rows() {
    let buffer = SharedBuffer::default();
    let status = StatusLine::with_writer(RatingSite::Movielens, Box::new(buffer.clone()), 1, false);
    let data = format!("{}\n123,0133093,680,3.5,x,Pulp Fiction (1994)\n", HEADER);

    let movies = parse_ratings_reader(data.as_bytes(), &status).unwrap();

    assert_eq!(movies.len(), 1);
    assert_eq!(
        buffer.contents(),
        "\r===== Movielens: reading movie from CSV:\r\n123\r\n0133093\r\n680\r\n3.5\r\nx\r\nPulp Fiction (1994)\r\n"
    );
}
