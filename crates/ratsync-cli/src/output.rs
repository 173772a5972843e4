use clap::ValueEnum;
use comfy_table::{Cell, CellAlignment, Table};
use owo_colors::OwoColorize;
use ratsync_models::{MovieRecord, RatingSite};
use ratsync_sources::StatusLine;
use serde_json::json;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{} {}", "✓".green(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let json = json!({
                    "type": "success",
                    "message": msg.as_ref()
                });
                self.print_json(&json);
            }
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{}", msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let json = json!({
                    "type": "info",
                    "message": msg.as_ref()
                });
                self.print_json(&json);
            }
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{} {}", "⚠".yellow(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let json = json!({
                    "type": "warning",
                    "message": msg.as_ref()
                });
                self.print_json(&json);
            }
        }
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.format != OutputFormat::Human {
            return;
        }

        self.print_json(data);
    }

    /// Progress lines for one site. They go to stderr in the JSON formats so
    /// stdout stays machine-readable.
    pub fn status_line(&self, site: RatingSite, verbosity: u8) -> StatusLine {
        let writer: Box<dyn io::Write + Send> = match self.format {
            OutputFormat::Human => Box::new(io::stdout()),
            OutputFormat::Json | OutputFormat::JsonPretty => Box::new(io::stderr()),
        };
        StatusLine::with_writer(site, writer, verbosity, self.quiet)
    }

    /// Print normalized movies as a table, or as a single JSON document
    pub fn movies(&self, site: RatingSite, source: &Path, movies: &[MovieRecord]) {
        match self.format {
            OutputFormat::Human => {
                if self.quiet {
                    return;
                }
                if movies.is_empty() {
                    println!("{}", format!("No {} ratings in {}", site.name(), source.display()).bright_black());
                    return;
                }

                let mut table = Table::new();
                table.set_header(vec![
                    Cell::new("Title").add_attribute(comfy_table::Attribute::Bold),
                    Cell::new("Year").add_attribute(comfy_table::Attribute::Bold),
                    Cell::new(site.name()).add_attribute(comfy_table::Attribute::Bold),
                    Cell::new("IMDb").add_attribute(comfy_table::Attribute::Bold),
                    Cell::new("TMDb").add_attribute(comfy_table::Attribute::Bold),
                    Cell::new("Rating").add_attribute(comfy_table::Attribute::Bold),
                ]);
                for movie in movies {
                    let year = if movie.year == 0 { "-".to_string() } else { movie.year.to_string() };
                    table.add_row(vec![
                        Cell::new(&movie.title),
                        Cell::new(year).set_alignment(CellAlignment::Right),
                        Cell::new(&movie.source.rating().id),
                        Cell::new(&movie.imdb.id),
                        Cell::new(&movie.tmdb.id),
                        Cell::new(format!("{}/10", movie.my_rating())).set_alignment(CellAlignment::Right),
                    ]);
                }
                table.load_preset(comfy_table::presets::UTF8_FULL);
                table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
                println!("{}", table);
                println!(
                    "{} {} movies from {}",
                    "✓".green(),
                    movies.len(),
                    source.display()
                );
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let json = json!({
                    "source": site.key(),
                    "file": source.display().to_string(),
                    "count": movies.len(),
                    "movies": movies,
                });
                self.json(&json);
            }
        }
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(data).unwrap_or_default());
            }
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Human => {
                println!("{}", data);
            }
        }
    }
}
