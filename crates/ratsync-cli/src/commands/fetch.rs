use super::Context;
use crate::output::Output;
use chromiumoxide::{Browser, Handler};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use futures::StreamExt;
use ratsync_models::RatingSite;
use ratsync_sources::movielens::{AcquireSettings, CaptureTimestamp};
use ratsync_sources::{route_downloads_to, MovielensClient, RatingsFetch, RatingsSource};
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const MAX_HANDLER_ERRORS: usize = 10;

pub async fn run_fetch(
    debugger_url: Option<String>,
    exports_dir: Option<PathBuf>,
    context: &Context,
    output: &Output,
) -> Result<()> {
    let config = context.load_config()?;

    if !config.movielens.enabled {
        output.warn("MovieLens is disabled in the configuration, nothing to fetch");
        return Ok(());
    }

    let debugger_url = debugger_url
        .or_else(|| config.browser.debugger_url.clone())
        .ok_or_else(|| {
            eyre!(
                "No browser to connect to. Start Chromium with --remote-debugging-port, log in to MovieLens, \
                 then pass --debugger-url or set browser.debugger_url in {}",
                context.config_path().display()
            )
        })?;
    let exports_dir = context.exports_dir(&config, exports_dir);

    // Taken once so every file of this run shares the same prefix
    let timestamp = CaptureTimestamp::now();
    info!(exports_dir = %exports_dir.display(), timestamp = %timestamp, "Fetching MovieLens ratings");

    let (browser, handler) = Browser::connect(debugger_url.as_str())
        .await
        .map_err(|e| eyre!("Failed to connect to browser at {}: {}", debugger_url, e))?;
    let handler_task = spawn_handler(handler);

    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| eyre!("Failed to open a browser tab: {}", e))?;
    route_downloads_to(&page, &exports_dir)
        .await
        .wrap_err("Failed to route browser downloads")?;

    let settings = AcquireSettings::from_config(&config.movielens, exports_dir);
    let status = output.status_line(RatingSite::Movielens, context.verbose());
    let mut client = MovielensClient::new(page, settings, timestamp, status);

    let result = client.get_ratings().await;

    // Only the tab is ours; the browser keeps running for the user
    if let Err(e) = client.session().clone().close().await {
        debug!("Failed to close export tab: {}", e);
    }
    drop(browser);
    handler_task.abort();

    match result.wrap_err("Failed to fetch MovieLens ratings")? {
        RatingsFetch::Parsed { path, movies } => {
            output.movies(RatingSite::Movielens, &path, &movies);
            Ok(())
        }
        RatingsFetch::Unavailable => Err(eyre!(
            "MovieLens export did not arrive in {}. Check that the browser is logged in to MovieLens.",
            client.acquirer().settings().exports_dir.display()
        )),
    }
}

/// Drive the CDP connection until it closes or keeps failing
fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut error_count = 0;

        while let Some(event) = handler.next().await {
            match event {
                Ok(_) => error_count = 0,
                Err(e) => {
                    error_count += 1;
                    warn!("Browser handler error (count: {}/{}): {:?}", error_count, MAX_HANDLER_ERRORS, e);
                    if error_count >= MAX_HANDLER_ERRORS {
                        break;
                    }
                }
            }
        }

        debug!("Browser handler task ended");
    })
}
