//! Browser abstraction for driving the search page.
//!
//! Defines the `SearchPage` trait that hides the engine (currently
//! Chromium via chromiumoxide) so the pipeline can run against a scripted
//! page in tests.

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Outcome of the initial navigation.
///
/// A timeout is a value rather than an error: it is the one condition the
/// pipeline recovers from, by aborting the run cleanly.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    /// The page committed within the deadline.
    Loaded {
        /// URL after any redirects.
        final_url: String,
        /// Time until the navigation call returned, in milliseconds.
        load_time_ms: u64,
    },
    /// The deadline elapsed before the page committed.
    TimedOut { waited: Duration },
}

/// A live search-results page, exclusively owned for the whole run.
#[async_trait]
pub trait SearchPage: Send + Sync {
    /// Navigate to `url`, giving up after `timeout`.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<NavigationOutcome>;
    /// Issue one downward scroll-wheel gesture of `delta_y` pixels.
    async fn scroll_down(&self, delta_y: f64) -> Result<()>;
    /// Full rendered markup of the current document.
    async fn html(&self) -> Result<String>;
    /// Close the page and release the browser behind it.
    async fn close(self: Box<Self>) -> Result<()>;
}
