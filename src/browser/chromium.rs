//! Chromium-backed search page using chromiumoxide.

use super::{NavigationOutcome, SearchPage};
use crate::config::SpiderConfig;
use crate::cookies::{self, StoredCookie};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchMouseEventParams, DispatchMouseEventType,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::debug;

/// Where in the viewport scroll gestures are aimed.
const WHEEL_X: f64 = 400.0;
const WHEEL_Y: f64 = 300.0;

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. REDNOTE_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("REDNOTE_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser", "chrome"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 3. Common macOS location
    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// A page in a dedicated Chromium instance.
///
/// The browser process is owned for the whole run and released by `close`.
pub struct ChromiumPage {
    browser: Browser,
    page: Page,
}

impl ChromiumPage {
    /// Launch Chromium with the configured identity and open a blank page.
    ///
    /// `cookies`, when present, are applied before any navigation.
    pub async fn launch(config: &SpiderConfig, cookies: Option<&[StoredCookie]>) -> Result<Self> {
        let chrome_path = find_chromium()
            .context("Chromium not found. Install Chrome or set REDNOTE_CHROMIUM_PATH.")?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg(format!("--user-agent={}", config.user_agent))
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage");
        if config.headless {
            builder = builder.arg("--headless=new").arg("--disable-gpu");
        } else {
            builder = builder.with_head();
        }
        let browser_config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .context("failed to launch Chromium")?;

        // Spawn the handler task
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;

        if let Some(cookies) = cookies {
            let params = cookies::to_cookie_params(cookies)?;
            debug!(count = params.len(), "applying session cookies");
            page.set_cookies(params)
                .await
                .context("failed to apply session cookies")?;
        }

        Ok(Self { browser, page })
    }
}

#[async_trait]
impl SearchPage for ChromiumPage {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<NavigationOutcome> {
        let start = Instant::now();

        let result = tokio::time::timeout(timeout, self.page.goto(url)).await;

        match result {
            Ok(Ok(_response)) => {
                // Wait for the load event to fire
                let _ = self.page.wait_for_navigation().await;

                let final_url = self
                    .page
                    .url()
                    .await
                    .unwrap_or_default()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| url.to_string());

                Ok(NavigationOutcome::Loaded {
                    final_url,
                    load_time_ms: start.elapsed().as_millis() as u64,
                })
            }
            Ok(Err(e)) => bail!("navigation failed: {e}"),
            Err(_) => Ok(NavigationOutcome::TimedOut { waited: timeout }),
        }
    }

    async fn scroll_down(&self, delta_y: f64) -> Result<()> {
        let params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseWheel)
            .x(WHEEL_X)
            .y(WHEEL_Y)
            .delta_x(0.0)
            .delta_y(delta_y)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build wheel event: {e}"))?;

        self.page
            .execute(params)
            .await
            .context("failed to dispatch scroll wheel")?;
        Ok(())
    }

    async fn html(&self) -> Result<String> {
        let result = self
            .page
            .evaluate("document.documentElement.outerHTML")
            .await
            .context("failed to get HTML")?;

        let html: String = result
            .into_value()
            .map_err(|e| anyhow::anyhow!("failed to convert HTML result: {e:?}"))?;

        Ok(html)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let ChromiumPage { page, mut browser } = *self;
        let _ = page.close().await;
        browser.close().await.context("failed to close browser")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_chromium_navigate_scroll_and_capture() {
        let config = SpiderConfig {
            headless: true,
            ..SpiderConfig::default()
        };
        let page = ChromiumPage::launch(&config, None)
            .await
            .expect("failed to launch");
        let mut page: Box<dyn SearchPage> = Box::new(page);

        let outcome = page
            .navigate(
                "data:text/html,<h1>hello</h1><div style=\"height:5000px\"></div>",
                Duration::from_secs(10),
            )
            .await
            .expect("navigation failed");
        assert!(matches!(outcome, NavigationOutcome::Loaded { .. }));

        page.scroll_down(2000.0).await.expect("scroll failed");

        let html = page.html().await.expect("capture failed");
        assert!(html.contains("<h1>hello</h1>"));

        page.close().await.expect("close failed");
    }
}
