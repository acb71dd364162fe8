//! Browser lifecycle management using Chrome DevTools Protocol

use seer_core::{Result, SeerError};
use headless_chrome::protocol::cdp::DOM;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Configuration for browser launch
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode (default: true)
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Run Chrome with its sandbox enabled (disable inside containers)
    pub sandbox: bool,
    /// Navigation timeout in seconds
    pub nav_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            sandbox: true,
            nav_timeout_secs: 60,
        }
    }
}

/// Active browser session with Chrome DevTools Protocol
pub struct BrowserSession {
    /// Underlying browser instance (kept alive for tab lifetime)
    #[allow(dead_code)]
    browser: Browser,
    /// Current active tab
    tab: Arc<Tab>,
    /// Configuration
    config: BrowserConfig,
}

impl BrowserSession {
    /// Launch a new browser instance
    ///
    /// # Example
    /// ```no_run
    /// use seer_browser::browser::BrowserSession;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let session = BrowserSession::launch().await.unwrap();
    ///     session.navigate("http://localhost:3000").await.unwrap();
    /// }
    /// ```
    pub async fn launch() -> Result<Self> {
        Self::launch_with_config(BrowserConfig::default()).await
    }

    /// Launch browser with custom configuration
    pub async fn launch_with_config(config: BrowserConfig) -> Result<Self> {
        info!(
            "Launching browser (headless: {}, size: {}x{})",
            config.headless, config.window_width, config.window_height
        );

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(config.sandbox)
            .window_size(Some((config.window_width, config.window_height)))
            .build()
            .map_err(|e| SeerError::Browser(format!("Failed to build launch options: {}", e)))?;

        // Launch browser
        let browser = Browser::new(launch_options)
            .map_err(|e| SeerError::Browser(format!("Failed to launch browser: {}", e)))?;

        // Get initial tab
        let tab = browser
            .new_tab()
            .map_err(|e| SeerError::Browser(format!("Failed to create tab: {}", e)))?;

        // Navigation waits are bounded by the tab default timeout
        tab.set_default_timeout(Duration::from_secs(config.nav_timeout_secs));

        info!("Browser launched successfully");

        Ok(Self {
            browser,
            tab,
            config,
        })
    }

    /// Navigate to a URL and wait for the load to settle
    ///
    /// # Arguments
    /// * `url` - URL to navigate to
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);

        self.tab.navigate_to(url).map_err(|e| SeerError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        // Wait for navigation to complete
        self.tab
            .wait_until_navigated()
            .map_err(|e| SeerError::Navigation {
                url: url.to_string(),
                reason: format!("load did not settle: {}", e),
            })?;

        info!("Successfully navigated to {}", url);
        Ok(())
    }

    /// Wait for an element to appear
    ///
    /// # Arguments
    /// * `selector` - CSS selector for the element
    /// * `timeout` - Optional timeout duration (uses config default if None)
    pub async fn wait_for_element(&self, selector: &str, timeout: Option<Duration>) -> Result<()> {
        let timeout_duration =
            timeout.unwrap_or_else(|| Duration::from_secs(self.config.nav_timeout_secs));

        debug!("Waiting for element: {} (timeout: {:?})", selector, timeout_duration);

        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout_duration)
            .map_err(|_e| SeerError::Browser(format!("Element not found: {}", selector)))?;

        debug!("Element found: {}", selector);
        Ok(())
    }

    /// Execute JavaScript in the page context
    ///
    /// # Arguments
    /// * `script` - JavaScript code to execute
    ///
    /// # Returns
    /// JSON result from JavaScript execution
    pub async fn evaluate_script(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| SeerError::Browser(format!("JavaScript evaluation failed: {}", e)))?;

        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    /// Get the current page title
    pub async fn get_title(&self) -> Result<String> {
        let result = self.evaluate_script("document.title").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Get the rendered text of the first element matching a selector
    ///
    /// Returns an empty string when no element matches.
    ///
    /// # Arguments
    /// * `selector` - CSS selector for the element
    pub async fn element_text(&self, selector: &str) -> Result<String> {
        let result = self.evaluate_script(&element_text_script(selector)).await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Get the rendered text of a control, or `None` when it is absent
    ///
    /// Distinguishes "element not mounted yet" from "element has empty text",
    /// which [`element_text`](Self::element_text) cannot.
    pub async fn control_text(&self, selector: &str) -> Result<Option<String>> {
        let result = self.evaluate_script(&control_text_script(selector)).await?;
        Ok(result.as_str().map(|s| s.to_string()))
    }

    /// Check whether the given text is currently rendered anywhere on the page
    ///
    /// A text node counts as visible when its parent element has at least one
    /// client rect, which excludes `display: none` subtrees.
    pub async fn text_visible(&self, text: &str) -> Result<bool> {
        let result = self.evaluate_script(&text_visible_script(text)).await?;
        Ok(result.as_bool().unwrap_or(false))
    }

    /// Poll until the given text is rendered on the page
    ///
    /// Returns `Ok(true)` when the text appeared within the deadline and
    /// `Ok(false)` when the deadline elapsed first. Script failures propagate.
    pub async fn wait_for_text_visible(
        &self,
        text: &str,
        timeout: Duration,
        poll: Duration,
    ) -> Result<bool> {
        debug!("Waiting for text to appear: '{}' (timeout: {:?})", text, timeout);

        let deadline = Instant::now() + timeout;
        loop {
            if self.text_visible(text).await? {
                debug!("Text appeared: '{}'", text);
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(poll).await;
        }
    }

    /// Poll until the given text is no longer rendered on the page
    ///
    /// Text that was never present counts as hidden immediately.
    pub async fn wait_for_text_hidden(
        &self,
        text: &str,
        timeout: Duration,
        poll: Duration,
    ) -> Result<bool> {
        debug!("Waiting for text to disappear: '{}' (timeout: {:?})", text, timeout);

        let deadline = Instant::now() + timeout;
        loop {
            if !self.text_visible(text).await? {
                debug!("Text gone: '{}'", text);
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(poll).await;
        }
    }

    /// Poll until a control is mounted and no longer shows a loading placeholder
    ///
    /// The control must both exist and render text that does not contain
    /// `placeholder` before the deadline.
    pub async fn wait_for_placeholder_cleared(
        &self,
        selector: &str,
        placeholder: &str,
        timeout: Duration,
        poll: Duration,
    ) -> Result<bool> {
        debug!(
            "Waiting for {} to settle (placeholder: '{}', timeout: {:?})",
            selector, placeholder, timeout
        );

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(text) = self.control_text(selector).await? {
                if !text.contains(placeholder) {
                    debug!("Control settled: {} ('{}')", selector, text);
                    return Ok(true);
                }
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(poll).await;
        }
    }

    /// Attach a file to a file input element
    ///
    /// # Arguments
    /// * `selector` - CSS selector for the `input[type="file"]` element
    /// * `path` - File to attach
    /// * `timeout` - How long to wait for the input to appear
    pub async fn upload_file(&self, selector: &str, path: &Path, timeout: Duration) -> Result<()> {
        let path_str = path.to_str().ok_or_else(|| {
            SeerError::Fixture(format!("Fixture path is not valid UTF-8: {}", path.display()))
        })?;

        debug!("Attaching {} to {}", path.display(), selector);

        let element = self
            .tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map_err(|_e| SeerError::Browser(format!("File input not found: {}", selector)))?;

        self.tab
            .call_method(DOM::SetFileInputFiles {
                files: vec![path_str.to_string()],
                node_id: Some(element.node_id),
                backend_node_id: None,
                object_id: None,
            })
            .map_err(|e| SeerError::Browser(format!("Failed to attach file: {}", e)))?;

        info!("File attached to {}", selector);
        Ok(())
    }

    /// Click the first button whose text contains the given label
    ///
    /// # Arguments
    /// * `label` - Visible button text to match
    /// * `timeout` - How long to wait for the button to appear
    pub async fn click_button_with_text(&self, label: &str, timeout: Duration) -> Result<()> {
        let xpath = format!("//button[contains(., {})]", xpath_string(label));

        debug!("Clicking button: '{}'", label);

        let element = self
            .tab
            .wait_for_xpath_with_custom_timeout(&xpath, timeout)
            .map_err(|_e| SeerError::Browser(format!("Button not found: '{}'", label)))?;

        element
            .click()
            .map_err(|e| SeerError::Browser(format!("Failed to click '{}': {}", label, e)))?;

        info!("Clicked button: '{}'", label);
        Ok(())
    }

    /// Get reference to the active tab
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Close the browser session
    pub async fn close(self) -> Result<()> {
        info!("Closing browser session");
        // Browser will be dropped and cleaned up automatically
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        debug!("BrowserSession dropped, Chrome process will be cleaned up");
    }
}

/// Quote text as a JavaScript string literal
fn js_string(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Quote text as an XPath string literal
///
/// XPath 1.0 has no escape syntax, so text containing single quotes is
/// emitted as a `concat()` of quoted pieces.
fn xpath_string(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{}'", text);
    }

    let mut parts = Vec::new();
    for (i, piece) in text.split('\'').enumerate() {
        if i > 0 {
            parts.push("\"'\"".to_string());
        }
        parts.push(format!("'{}'", piece));
    }
    format!("concat({})", parts.join(", "))
}

fn element_text_script(selector: &str) -> String {
    format!("document.querySelector({})?.innerText ?? ''", js_string(selector))
}

fn control_text_script(selector: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({}); return el ? el.innerText : null; }})()",
        js_string(selector)
    )
}

fn text_visible_script(text: &str) -> String {
    format!(
        r#"(() => {{
    if (!document.body) {{ return false; }}
    const needle = {};
    const walker = document.createTreeWalker(document.body, NodeFilter.SHOW_TEXT);
    while (walker.nextNode()) {{
        const node = walker.currentNode;
        if (!node.textContent.includes(needle)) {{ continue; }}
        const parent = node.parentElement;
        if (parent && parent.getClientRects().length > 0) {{ return true; }}
    }}
    return false;
}})()"#,
        js_string(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert!(config.sandbox);
        assert_eq!(config.window_width, 1920);
        assert_eq!(config.window_height, 1080);
        assert_eq!(config.nav_timeout_secs, 60);
    }

    #[test]
    fn test_custom_config() {
        let config = BrowserConfig {
            headless: false,
            window_width: 1024,
            window_height: 768,
            sandbox: false,
            nav_timeout_secs: 30,
        };

        assert!(!config.headless);
        assert!(!config.sandbox);
        assert_eq!(config.window_width, 1024);
        assert_eq!(config.nav_timeout_secs, 30);
    }

    #[test]
    fn test_js_string_plain() {
        assert_eq!(js_string("Analysis Results"), "\"Analysis Results\"");
    }

    #[test]
    fn test_js_string_escapes_quotes_and_backslashes() {
        assert_eq!(js_string(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(js_string(r"a\b"), r#""a\\b""#);
        assert_eq!(js_string("line\nbreak"), "\"line\\nbreak\"");
    }

    #[test]
    fn test_xpath_string_plain() {
        assert_eq!(xpath_string("Analyze Another Image"), "'Analyze Another Image'");
    }

    #[test]
    fn test_xpath_string_with_apostrophe() {
        assert_eq!(xpath_string("it's"), r#"concat('it', "'", 's')"#);
    }

    #[test]
    fn test_element_text_script_quotes_selector() {
        let script = element_text_script(r#"input[type="file"]"#);
        assert!(script.starts_with("document.querySelector(\""));
        assert!(script.contains(r#"input[type=\"file\"]"#));
        assert!(script.ends_with("?.innerText ?? ''"));
    }

    #[test]
    fn test_text_visible_script_embeds_needle() {
        let script = text_visible_script("Analyzing image details...");
        assert!(script.contains(r#"const needle = "Analyzing image details...";"#));
        assert!(script.contains("createTreeWalker"));
        assert!(script.contains("getClientRects"));
    }
}
