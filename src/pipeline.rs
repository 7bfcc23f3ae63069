//! The linear run: Init, Navigate, Scroll, Extract, Export.
//!
//! Phases execute strictly in order. The one early exit is a navigation
//! timeout, which releases the browser and writes nothing.

use crate::browser::{NavigationOutcome, SearchPage};
use crate::config::SpiderConfig;
use crate::export;
use crate::extract::{self, NoteRecord};
use anyhow::{Context, Result};
use tracing::info;

/// Pipeline phase, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Navigate,
    Scroll,
    Extract,
    Export,
}

impl Phase {
    /// The phase that follows on the normal path, if any.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Init => Some(Phase::Navigate),
            Phase::Navigate => Some(Phase::Scroll),
            Phase::Scroll => Some(Phase::Extract),
            Phase::Extract => Some(Phase::Export),
            Phase::Export => None,
        }
    }

    /// Whether the run may abort early from this phase.
    ///
    /// Navigation is the only phase with an early exit; any other failure
    /// propagates as an error instead.
    pub fn can_abort(self) -> bool {
        matches!(self, Phase::Navigate)
    }
}

/// Whether the run carries imported session cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    LoggedIn { cookie_count: usize },
    Guest,
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// All phases ran; both outputs and the debug capture are on disk.
    Completed { notes: Vec<NoteRecord> },
    /// Navigation timed out; the browser was released and nothing was
    /// written.
    AbortedAtNavigation,
}

/// Drive a launched page through the full phase sequence.
///
/// The page is closed on both the completed and the aborted path. Errors
/// propagate without closing it.
pub async fn run(
    config: &SpiderConfig,
    mut page: Box<dyn SearchPage>,
    session: SessionMode,
) -> Result<RunOutcome> {
    let url = config.search_url()?;
    let mut page_url = url.to_string();
    let mut notes: Vec<NoteRecord> = Vec::new();

    let mut phase = Phase::Init;
    loop {
        match phase {
            Phase::Init => match session {
                SessionMode::LoggedIn { cookie_count } => {
                    println!("Imported {cookie_count} cookies, visiting with a logged-in session");
                }
                SessionMode::Guest => {
                    println!("No cookie file found, visiting as a guest");
                }
            },
            Phase::Navigate => {
                println!("Opening search page: {url}");
                match page.navigate(url.as_str(), config.navigation_timeout).await? {
                    NavigationOutcome::Loaded {
                        final_url,
                        load_time_ms,
                    } => {
                        info!(load_time_ms, %final_url, "navigation committed");
                        page_url = final_url;
                        tokio::time::sleep(config.render_delay).await;
                        let html = page.html().await?;
                        std::fs::write(&config.debug_html, &html).with_context(|| {
                            format!("failed to write {}", config.debug_html.display())
                        })?;
                        println!("Saved rendered page to {}", config.debug_html.display());
                    }
                    NavigationOutcome::TimedOut { waited } => {
                        println!(
                            "Page load timed out after {}s; the site's anti-bot check was likely triggered",
                            waited.as_secs()
                        );
                        page.close().await?;
                        return Ok(RunOutcome::AbortedAtNavigation);
                    }
                }
            }
            Phase::Scroll => {
                for i in 0..config.scroll_count {
                    page.scroll_down(config.scroll_delta).await?;
                    tokio::time::sleep(config.scroll_pause(i)).await;
                    println!("Finished scroll {} of {}", i + 1, config.scroll_count);
                }
            }
            Phase::Extract => {
                let html = page.html().await?;
                notes = extract::extract_notes(&html, &page_url);
                println!("Detected {} notes", notes.len());
            }
            Phase::Export => {
                export::write_json(&notes, &config.json_output)?;
                export::write_csv(&notes, &config.csv_output)?;
                println!(
                    "Saved {} and {}",
                    config.json_output.display(),
                    config.csv_output.display()
                );
            }
        }

        phase = match phase.next() {
            Some(next) => next,
            None => break,
        };
    }

    info!(count = notes.len(), "run complete");
    page.close().await?;
    Ok(RunOutcome::Completed { notes })
}
