use super::Context;
use crate::output::{Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use ratsync_config::Config;
use serde_json::json;

pub fn run_config(cmd: crate::ConfigCommands, context: &Context, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show => show_config(context, output),
        crate::ConfigCommands::Init { force } => init_config(force, context, output),
    }
}

fn show_config(context: &Context, output: &Output) -> Result<()> {
    let config_file = context.config_path();
    let exists = config_file.exists();
    let config = context.load_config()?;
    let exports_dir = context.exports_dir(&config, None);

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            let mut info_table = Table::new();
            info_table.set_header(vec![
                Cell::new("Config File").add_attribute(comfy_table::Attribute::Bold),
                Cell::new(config_file.display().to_string()),
            ]);
            if !exists {
                info_table.add_row(vec![
                    Cell::new("Status"),
                    Cell::new("not found, showing defaults".yellow().to_string()),
                ]);
            }
            info_table.load_preset(comfy_table::presets::UTF8_FULL);
            info_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", info_table);
            println!();

            let movielens = &config.movielens;
            let mut movielens_table = Table::new();
            movielens_table.set_header(vec![
                Cell::new("MovieLens Configuration").fg(comfy_table::Color::Cyan).add_attribute(comfy_table::Attribute::Bold)
            ]);
            movielens_table.add_row(vec![
                Cell::new("Enabled"),
                Cell::new(if movielens.enabled { "✓".green().to_string() } else { "✗".red().to_string() }),
            ]);
            movielens_table.add_row(vec![Cell::new("Export URL"), Cell::new(&movielens.export_url)]);
            movielens_table.add_row(vec![Cell::new("Exports Directory"), Cell::new(exports_dir.display().to_string())]);
            movielens_table.add_row(vec![
                Cell::new("Page Load Timeout"),
                Cell::new(format!("{}s", movielens.page_load_timeout_secs)),
            ]);
            movielens_table.add_row(vec![
                Cell::new("Settle Delay"),
                Cell::new(format!("{}ms", movielens.settle_delay_ms)),
            ]);
            let file_wait = if movielens.file_wait_timeout_secs == 0 {
                "indefinite".to_string()
            } else {
                format!("{}s", movielens.file_wait_timeout_secs)
            };
            movielens_table.add_row(vec![Cell::new("File Wait Timeout"), Cell::new(file_wait)]);
            movielens_table.add_row(vec![
                Cell::new("Poll Interval"),
                Cell::new(format!("{}ms", movielens.poll_interval_ms)),
            ]);
            movielens_table.load_preset(comfy_table::presets::UTF8_FULL);
            movielens_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", movielens_table);
            println!();

            let mut browser_table = Table::new();
            browser_table.set_header(vec![
                Cell::new("Browser Configuration").fg(comfy_table::Color::Cyan).add_attribute(comfy_table::Attribute::Bold)
            ]);
            browser_table.add_row(vec![
                Cell::new("Debugger URL"),
                Cell::new(
                    config.browser.debugger_url
                        .clone()
                        .unwrap_or_else(|| "not set".bright_black().to_string()),
                ),
            ]);
            browser_table.load_preset(comfy_table::presets::UTF8_FULL);
            browser_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", browser_table);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let json = json!({
                "config_file": config_file.display().to_string(),
                "exists": exists,
                "exports_dir": exports_dir.display().to_string(),
                "config": config,
            });
            output.json(&json);
        }
    }

    Ok(())
}

fn init_config(force: bool, context: &Context, output: &Output) -> Result<()> {
    let config_file = context.config_path();

    if config_file.exists() && !force {
        output.warn(format!(
            "Configuration file already exists at: {} (use --force to overwrite)",
            config_file.display()
        ));
        return Ok(());
    }

    context
        .paths()
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create ratsync directories: {}", e))?;
    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write config to {}: {}", config_file.display(), e))?;

    output.success(format!("Configuration written to {}", config_file.display()));
    output.info("Set browser.debugger_url to the DevTools websocket of your logged-in browser before running 'ratsync fetch'.");
    Ok(())
}
