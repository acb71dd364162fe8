//! Smoke scenario
//!
//! The minimal companion to the full run: navigate, read the title, capture
//! one screenshot. Separates "the app is not serving at all" from "the
//! analysis flow regressed" when the full scenario fails at navigation.

use seer_browser::{capture_checkpoint, BrowserConfig, BrowserSession};
use seer_core::{Result, VerifyConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Artifact file name for the smoke screenshot
pub const SMOKE_SCREENSHOT: &str = "simple_screenshot.png";

/// Navigation budget for the smoke run, tighter than the full scenario's
const SMOKE_NAV_SECS: u64 = 30;

/// Load the target page, read its title, and capture one screenshot
///
/// Returns the page title and the screenshot path. Errors propagate to the
/// caller after the session is released; there is no diagnostic screenshot
/// here.
pub async fn run_smoke(config: &VerifyConfig) -> Result<(String, PathBuf)> {
    info!("Starting smoke run against {}", config.base_url);

    let browser_config = BrowserConfig {
        headless: config.headless,
        sandbox: config.sandbox,
        nav_timeout_secs: SMOKE_NAV_SECS,
        ..BrowserConfig::default()
    };
    let session = BrowserSession::launch_with_config(browser_config).await?;

    let outcome = drive(&session, config).await;
    session.close().await?;
    outcome
}

async fn drive(session: &BrowserSession, config: &VerifyConfig) -> Result<(String, PathBuf)> {
    session.navigate(&config.base_url).await?;
    session
        .wait_for_element("body", Some(Duration::from_secs(SMOKE_NAV_SECS)))
        .await?;

    let title = session.get_title().await?;
    info!("Page title: '{}'", title);

    let path = capture_checkpoint(session, &config.artifact_dir, SMOKE_SCREENSHOT).await?;
    Ok((title, path))
}
