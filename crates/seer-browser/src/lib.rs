//! Browser session and DOM observation layer for StyleSeer verification
//!
//! This crate drives a real Chrome/Chromium instance over the Chrome DevTools
//! Protocol (CDP) and exposes the primitives the verification scenario is
//! built from: navigation, text visibility polling, file upload, button
//! clicks, and checkpoint screenshots.
//!
//! # Features
//!
//! - **Browser Management**: Launch and control Chrome/Chromium browsers
//! - **DOM Observation**: Rendered-text visibility checks and control text polling
//! - **File Upload**: Feed the embedded fixture image into a file input
//! - **Screenshot Capture**: Full-page checkpoints written to an artifact directory
//!
//! # Example
//!
//! ```no_run
//! use seer_browser::browser::BrowserSession;
//! use seer_browser::screenshot::capture_checkpoint;
//! use std::path::Path;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Launch browser
//!     let session = BrowserSession::launch().await?;
//!
//!     // Navigate to the app under test
//!     session.navigate("http://localhost:3000").await?;
//!
//!     // Wait for a completion marker to render
//!     let appeared = session
//!         .wait_for_text_visible(
//!             "Analysis Results",
//!             Duration::from_secs(30),
//!             Duration::from_millis(250),
//!         )
//!         .await?;
//!     assert!(appeared);
//!
//!     // Capture a checkpoint screenshot
//!     let path = capture_checkpoint(&session, Path::new("artifacts"), "complete.png").await?;
//!     println!("Screenshot saved: {}", path.display());
//!
//!     // Clean up
//!     session.close().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Requirements
//!
//! - Chrome or Chromium browser installed
//! - For headless operation, no additional setup required
//! - Inside containers without user namespaces, disable the Chrome sandbox
//!   via [`BrowserConfig::sandbox`](browser::BrowserConfig)
//!
//! # Architecture
//!
//! The crate is organized into modules:
//!
//! - [`browser`]: Browser lifecycle, navigation, and DOM observation
//! - [`screenshot`]: Checkpoint screenshot capture and storage
//! - [`fixture`]: Embedded upload payload

pub mod browser;
pub mod fixture;
pub mod screenshot;

// Re-export commonly used types
pub use browser::{BrowserConfig, BrowserSession};
pub use fixture::{fixture_bytes, UploadFixture, FIXTURE_FILE_NAME};
pub use screenshot::{capture_checkpoint, capture_page, store_screenshot};

#[cfg(test)]
mod tests {
    #[test]
    fn test_public_api_availability() {
        // This test just ensures all public APIs are accessible
        // Actual functionality is tested in individual modules
    }
}
