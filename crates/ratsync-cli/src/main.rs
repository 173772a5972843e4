use clap::{ArgAction, Parser, Subcommand};
use commands::{config, fetch, parse, Context};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "ratsync")]
#[command(about = "ratsync - collect your movie ratings from rating sites")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Configuration file (defaults to <config dir>/ratsync/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to a file instead of stderr, rotated daily. Bare
    /// `--log-file` uses <config dir>/ratsync/logs/ratsync.log, `--log-file=PATH` picks one.
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1, require_equals = true)]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the MovieLens ratings export and print the normalized movies
    #[command(long_about = "Request the MovieLens ratings export through an already running, already logged-in Chromium (started with --remote-debugging-port), wait for the CSV to land in the exports directory, rename it with a timestamp and print the normalized movies.")]
    Fetch {
        /// DevTools websocket of the logged-in browser (overrides browser.debugger_url)
        #[arg(long, value_name = "WS_URL")]
        debugger_url: Option<String>,

        /// Directory the export is downloaded to and renamed in
        #[arg(long, value_name = "DIR")]
        exports_dir: Option<PathBuf>,
    },
    /// Normalize a MovieLens ratings export that is already on disk
    Parse {
        /// Path to the exported CSV
        file: PathBuf,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with default settings
    Init {
        /// Overwrite an existing configuration file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let context = Context::new(cli.config, cli.verbose);
    logging::init_logging_with_file(cli.verbose, cli.quiet, context.log_file(cli.log_file))
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Fetch { debugger_url, exports_dir } => {
            fetch::run_fetch(debugger_url, exports_dir, &context, &output).await
        }
        Commands::Parse { file } => parse::run_parse(&file, &context, &output),
        Commands::Config { cmd } => config::run_config(cmd, &context, &output),
    }
}
