//! Run configuration: every fixed knob for a spider run in one place.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Configuration for a single spider run.
///
/// Nothing here is read from flags or the environment; construct with
/// `SpiderConfig::default()` and pass by reference into the pipeline.
#[derive(Debug, Clone)]
pub struct SpiderConfig {
    /// Search keyword, percent-encoded into the search URL.
    pub keyword: String,
    /// Search-results page, without the keyword query parameter.
    pub search_base: String,
    /// User-agent string the browser presents.
    pub user_agent: String,
    /// Optional session-cookie file. Absence means a guest run.
    pub cookie_file: PathBuf,
    /// JSON output path, overwritten each run.
    pub json_output: PathBuf,
    /// CSV output path, overwritten each run.
    pub csv_output: PathBuf,
    /// Rendered-markup dump for offline selector debugging.
    pub debug_html: PathBuf,
    /// Hard deadline on the initial navigation.
    pub navigation_timeout: Duration,
    /// Unconditional settle pause after navigation succeeds.
    pub render_delay: Duration,
    /// Number of scroll gestures issued to trigger lazy loading.
    pub scroll_count: u32,
    /// Wheel delta per gesture, in pixels downward.
    pub scroll_delta: f64,
    /// Pause after the first gesture; each later pause adds one second.
    pub scroll_pause_base: Duration,
    /// Run without a visible window. The site withholds results from
    /// obviously automated browsers, so the default keeps one.
    pub headless: bool,
}

impl Default for SpiderConfig {
    fn default() -> Self {
        Self {
            keyword: "咖啡馆".to_string(),
            search_base: "https://www.xiaohongshu.com/search_result".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36".to_string(),
            cookie_file: PathBuf::from("cookies.json"),
            json_output: PathBuf::from("notes.json"),
            csv_output: PathBuf::from("notes.csv"),
            debug_html: PathBuf::from("debug.html"),
            navigation_timeout: Duration::from_secs(60),
            render_delay: Duration::from_secs(5),
            scroll_count: 3,
            scroll_delta: 2000.0,
            scroll_pause_base: Duration::from_secs(2),
            headless: false,
        }
    }
}

impl SpiderConfig {
    /// Full search URL with the keyword percent-encoded.
    pub fn search_url(&self) -> Result<Url> {
        Url::parse_with_params(&self.search_base, [("keyword", self.keyword.as_str())])
            .with_context(|| format!("invalid search base: {}", self.search_base))
    }

    /// Pause after the scroll gesture at `iteration` (0-based).
    pub fn scroll_pause(&self, iteration: u32) -> Duration {
        self.scroll_pause_base + Duration::from_secs(u64::from(iteration))
    }
}
