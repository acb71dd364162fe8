//! Screenshot capture using Chrome DevTools Protocol

use crate::browser::BrowserSession;
use seer_core::{Result, SeerError};
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Capture the current page as PNG bytes
pub async fn capture_page(session: &BrowserSession) -> Result<Vec<u8>> {
    debug!("Capturing full page screenshot");

    let screenshot_data = session
        .tab()
        .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
        .map_err(|e| SeerError::Screenshot(format!("CDP capture failed: {}", e)))?;

    Ok(screenshot_data)
}

/// Capture the current page and store it under a fixed artifact name
///
/// The artifact directory is created if missing and an existing file with the
/// same name is overwritten, so repeated runs converge on one set of files.
///
/// # Arguments
/// * `session` - Active browser session
/// * `artifact_dir` - Directory screenshots are stored in
/// * `file_name` - Artifact file name, e.g. `01_analysis_complete.png`
///
/// # Returns
/// Path of the stored screenshot
pub async fn capture_checkpoint(
    session: &BrowserSession,
    artifact_dir: &Path,
    file_name: &str,
) -> Result<PathBuf> {
    let screenshot_data = capture_page(session).await?;
    store_screenshot(artifact_dir, file_name, &screenshot_data).await
}

/// Write screenshot bytes to the artifact directory
pub async fn store_screenshot(
    artifact_dir: &Path,
    file_name: &str,
    data: &[u8],
) -> Result<PathBuf> {
    fs::create_dir_all(artifact_dir)
        .await
        .map_err(|e| SeerError::Screenshot(format!("Failed to create artifact dir: {}", e)))?;

    let path = artifact_dir.join(file_name);
    fs::write(&path, data)
        .await
        .map_err(|e| SeerError::Screenshot(format!("Failed to write {}: {}", path.display(), e)))?;

    info!("Screenshot stored: {} ({} bytes)", path.display(), data.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_store_screenshot_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("artifacts").join("run");

        let path = store_screenshot(&nested, "01_analysis_complete.png", b"fake png")
            .await
            .unwrap();

        assert_eq!(path, nested.join("01_analysis_complete.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"fake png");
    }

    #[tokio::test]
    async fn test_store_screenshot_overwrites_existing() {
        let dir = tempdir().unwrap();

        let first = store_screenshot(dir.path(), "02_stats_reset.png", b"first run")
            .await
            .unwrap();
        let second = store_screenshot(dir.path(), "02_stats_reset.png", b"second run")
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read(&second).unwrap(), b"second run");
    }
}
