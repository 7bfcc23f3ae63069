// Copyright 2026 RedNote Spider Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::Parser;
use tracing::info;

use rednote_spider::browser::chromium::ChromiumPage;
use rednote_spider::config::SpiderConfig;
use rednote_spider::cookies;
use rednote_spider::pipeline::{self, RunOutcome, SessionMode};

/// One-shot RedNote search scraper.
///
/// Drives a local Chromium through the fixed keyword search, scrolls to
/// trigger lazy loading, and writes notes.json and notes.csv into the
/// working directory. Every knob is fixed; the only flags are --help and
/// --version.
#[derive(Parser)]
#[command(name = "rednote-spider", version)]
struct Cli {}

#[tokio::main]
async fn main() -> Result<()> {
    let _cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rednote_spider=info".parse()?),
        )
        .init();

    let config = SpiderConfig::default();

    let stored = cookies::load_cookie_file(&config.cookie_file)?;
    let session = match &stored {
        Some(cookies) => SessionMode::LoggedIn {
            cookie_count: cookies.len(),
        },
        None => SessionMode::Guest,
    };

    println!("Launching Chromium...");
    let page = ChromiumPage::launch(&config, stored.as_deref()).await?;

    match pipeline::run(&config, Box::new(page), session).await? {
        RunOutcome::Completed { notes } => {
            info!(count = notes.len(), "spider finished");
        }
        RunOutcome::AbortedAtNavigation => {
            info!("spider aborted at navigation");
        }
    }

    Ok(())
}
