use super::Context;
use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use ratsync_models::RatingSite;
use ratsync_sources::movielens::parse_ratings_csv;
use std::path::Path;

pub fn run_parse(file: &Path, context: &Context, output: &Output) -> Result<()> {
    let status = output.status_line(RatingSite::Movielens, context.verbose());
    status.line("getting movies from CSV");

    let movies = parse_ratings_csv(file, &status)
        .wrap_err_with(|| format!("Failed to parse ratings export {}", file.display()))?;

    output.movies(RatingSite::Movielens, file, &movies);
    Ok(())
}
