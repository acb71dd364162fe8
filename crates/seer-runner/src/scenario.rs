//! The end-to-end verification scenario
//!
//! Drives a running StyleSeer instance through one full analysis cycle:
//! load the page, wait for the model list, upload the fixture image, wait
//! for the analysis to finish, assert on the rendered results and footer
//! stats, then reset and assert the page is upload-ready with zeroed
//! stats. Screenshots are captured at the two success checkpoints and,
//! best-effort, after a failure. The browser session is released on every
//! exit path.

use regex::Regex;
use seer_browser::{capture_checkpoint, BrowserConfig, BrowserSession, UploadFixture};
use seer_core::{Result, RunReport, ScenarioStep, SeerError, StepOutcome, VerifyConfig};
use std::time::Instant;
use tracing::{error, info, warn};

/// CSS selector for the model-selection control
pub const MODEL_CONTROL: &str = r#"[role="combobox"]"#;
/// Text the model control shows while the model list is still loading
pub const MODEL_LOADING_PLACEHOLDER: &str = "Loading models...";
/// CSS selector for the upload input
pub const FILE_INPUT: &str = r#"input[type="file"]"#;
/// CSS selector for the session stats footer
pub const STATS_FOOTER: &str = "footer";
/// Progress texts that must disappear before the results are trusted
pub const PROGRESS_INDICATORS: [&str; 2] =
    ["Analyzing image details...", "Finding recommendations..."];
/// Heading that marks the results region as rendered
pub const RESULTS_MARKER: &str = "Analysis Results";
/// CSS selector for the upload affordance, the label wired to the file input
pub const UPLOAD_CONTROL: &str = r#"label[for="image-upload-input"]"#;
/// Visible label of the reset button
pub const RESET_BUTTON_LABEL: &str = "Analyze Another Image";

/// Footer pattern for the cumulative token count
pub const TOKEN_PATTERN: &str = r"Total Tokens: (\d+)";
/// Footer pattern for the cumulative cost
pub const COST_PATTERN: &str = r"Cost: \$(\d+\.\d+)";
/// Exact footer literal for a zeroed token count
pub const RESET_TOKENS_LITERAL: &str = "Total Tokens: 0";
/// Exact footer literal for a zeroed cost
pub const RESET_COST_LITERAL: &str = "Cost: $0.000000";

/// Checkpoint screenshot after the analysis completes
pub const ANALYSIS_SCREENSHOT: &str = "01_analysis_complete.png";
/// Checkpoint screenshot after the reset
pub const RESET_SCREENSHOT: &str = "02_stats_reset.png";
/// Diagnostic screenshot written after a failed step
pub const ERROR_SCREENSHOT: &str = "final_error_screenshot.png";

/// Run the full verification scenario against the configured target
///
/// Returns the per-step report; callers decide pass/fail from
/// [`RunReport::passed`]. A step failure is recorded in the report, triggers
/// a best-effort diagnostic screenshot, and skips the remaining steps. Only
/// a browser launch failure returns `Err` directly, since without a page
/// there is nothing to report or capture.
pub async fn run(config: &VerifyConfig) -> Result<RunReport> {
    info!("Starting verification run against {}", config.base_url);

    let browser_config = BrowserConfig {
        headless: config.headless,
        sandbox: config.sandbox,
        nav_timeout_secs: config.timeouts.navigation_secs,
        ..BrowserConfig::default()
    };
    let session = BrowserSession::launch_with_config(browser_config).await?;

    let mut report = RunReport::new(config.base_url.clone());
    if let Err(e) = drive(&session, config, &mut report).await {
        error!("Verification failed: {}", e);

        match capture_checkpoint(&session, &config.artifact_dir, ERROR_SCREENSHOT).await {
            Ok(path) => {
                info!("Diagnostic screenshot written to {}", path.display());
                report.error_screenshot = Some(path);
            }
            Err(capture_err) => {
                warn!("Could not capture diagnostic screenshot: {}", capture_err);
            }
        }
    }

    session.close().await?;

    if report.passed() {
        info!("Verification run passed ({} steps)", report.steps.len());
    } else if let Some(failure) = report.first_failure() {
        warn!("Verification run failed at {}: {}", failure.step, failure.detail);
    }

    Ok(report)
}

/// Execute the step sequence, recording each outcome until the first failure
async fn drive(
    session: &BrowserSession,
    config: &VerifyConfig,
    report: &mut RunReport,
) -> Result<()> {
    // The renderer reads the uploaded file after the change event fires, so
    // the fixture must stay on disk until the scenario finishes
    let mut fixture: Option<UploadFixture> = None;

    for step in ScenarioStep::SEQUENCE {
        info!("Running step: {}", step);
        let started = Instant::now();

        match execute_step(session, config, report, &mut fixture, step).await {
            Ok(detail) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                info!("Step passed: {} ({} ms)", step, elapsed_ms);
                report.record(StepOutcome::passed(step, detail, elapsed_ms));
            }
            Err(e) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                report.record(StepOutcome::failed(step, e.to_string(), elapsed_ms));
                return Err(e);
            }
        }
    }

    Ok(())
}

async fn execute_step(
    session: &BrowserSession,
    config: &VerifyConfig,
    report: &mut RunReport,
    fixture: &mut Option<UploadFixture>,
    step: ScenarioStep,
) -> Result<String> {
    match step {
        ScenarioStep::Navigate => {
            session.navigate(&config.base_url).await?;
            Ok(format!("loaded {}", config.base_url))
        }
        ScenarioStep::Readiness => step_readiness(session, config).await,
        ScenarioStep::Upload => step_upload(session, config, fixture).await,
        ScenarioStep::Completion => step_completion(session, config).await,
        ScenarioStep::Outcome => step_outcome(session, config).await,
        ScenarioStep::Checkpoint => {
            step_checkpoint(session, config, report, ANALYSIS_SCREENSHOT).await
        }
        ScenarioStep::Reset => step_reset(session, config).await,
        ScenarioStep::PostReset => step_post_reset(session, config).await,
        ScenarioStep::FinalCheckpoint => {
            step_checkpoint(session, config, report, RESET_SCREENSHOT).await
        }
    }
}

/// Wait for the model selector to exist and stop showing the loading text
async fn step_readiness(session: &BrowserSession, config: &VerifyConfig) -> Result<String> {
    let settled = session
        .wait_for_placeholder_cleared(
            MODEL_CONTROL,
            MODEL_LOADING_PLACEHOLDER,
            config.timeouts.readiness(),
            config.timeouts.poll_interval(),
        )
        .await?;

    if !settled {
        return Err(SeerError::ReadinessTimeout {
            control: "model selector".to_string(),
            timeout_secs: config.timeouts.readiness_secs,
        });
    }

    Ok("model list populated".to_string())
}

/// Materialize the fixture image and submit it to the file input
async fn step_upload(
    session: &BrowserSession,
    config: &VerifyConfig,
    fixture: &mut Option<UploadFixture>,
) -> Result<String> {
    let materialized = UploadFixture::materialize()?;
    session
        .upload_file(FILE_INPUT, materialized.path(), config.timeouts.outcome())
        .await?;

    *fixture = Some(materialized);
    Ok(format!("submitted {}", seer_browser::FIXTURE_FILE_NAME))
}

/// Wait for both in-progress indicators to clear
///
/// Each indicator gets the full completion budget, since the two analysis
/// phases run back to back.
async fn step_completion(session: &BrowserSession, config: &VerifyConfig) -> Result<String> {
    for indicator in PROGRESS_INDICATORS {
        let hidden = session
            .wait_for_text_hidden(
                indicator,
                config.timeouts.completion(),
                config.timeouts.poll_interval(),
            )
            .await?;

        if !hidden {
            return Err(SeerError::CompletionTimeout {
                indicator: indicator.to_string(),
                timeout_secs: config.timeouts.completion_secs,
            });
        }
    }

    Ok("analysis pipeline finished".to_string())
}

/// Assert the results region rendered and the footer shows positive usage
async fn step_outcome(session: &BrowserSession, config: &VerifyConfig) -> Result<String> {
    let visible = session
        .wait_for_text_visible(
            RESULTS_MARKER,
            config.timeouts.outcome(),
            config.timeouts.poll_interval(),
        )
        .await?;

    if !visible {
        return Err(SeerError::Assertion {
            expected: format!("'{}' visible", RESULTS_MARKER),
            observed: "not rendered within budget".to_string(),
        });
    }

    let tokens = wait_for_footer_stat(
        session,
        config,
        settled_token_count,
        "footer with a positive token count",
    )
    .await?;

    let cost = wait_for_footer_stat(
        session,
        config,
        settled_cost,
        "footer with a positive cost",
    )
    .await?;

    Ok(format!("results rendered, tokens={}, cost=${}", tokens, cost))
}

/// Capture a checkpoint screenshot and record its path in the report
async fn step_checkpoint(
    session: &BrowserSession,
    config: &VerifyConfig,
    report: &mut RunReport,
    file_name: &str,
) -> Result<String> {
    let path = capture_checkpoint(session, &config.artifact_dir, file_name).await?;
    report.add_screenshot(path.clone());
    Ok(format!("captured {}", path.display()))
}

/// Click the reset button
async fn step_reset(session: &BrowserSession, config: &VerifyConfig) -> Result<String> {
    session
        .click_button_with_text(RESET_BUTTON_LABEL, config.timeouts.outcome())
        .await?;
    Ok(format!("clicked '{}'", RESET_BUTTON_LABEL))
}

/// Assert the page returned to its upload-ready state with zeroed stats
///
/// The upload control is mounted in every app state, so the reset is
/// witnessed by the results marker leaving the page before the control
/// lookup runs.
async fn step_post_reset(session: &BrowserSession, config: &VerifyConfig) -> Result<String> {
    let results_gone = session
        .wait_for_text_hidden(
            RESULTS_MARKER,
            config.timeouts.outcome(),
            config.timeouts.poll_interval(),
        )
        .await?;

    if !results_gone {
        return Err(SeerError::Assertion {
            expected: format!("'{}' hidden after reset", RESULTS_MARKER),
            observed: "results still rendered".to_string(),
        });
    }

    session
        .wait_for_element(UPLOAD_CONTROL, Some(config.timeouts.outcome()))
        .await
        .map_err(|_| SeerError::Assertion {
            expected: format!("upload control '{}' present", UPLOAD_CONTROL),
            observed: "control not found after reset".to_string(),
        })?;

    wait_for_footer_stat(
        session,
        config,
        |text| text.contains(RESET_TOKENS_LITERAL).then_some(()),
        "footer containing 'Total Tokens: 0'",
    )
    .await?;

    wait_for_footer_stat(
        session,
        config,
        |text| text.contains(RESET_COST_LITERAL).then_some(()),
        "footer containing 'Cost: $0.000000'",
    )
    .await?;

    Ok("upload-ready state restored, stats footer zeroed".to_string())
}

/// Poll the stats footer until `accept` extracts a value from its text
///
/// Mirrors the retrying style of the visibility waits: the footer re-renders
/// asynchronously after the analysis and after the reset, so a single read
/// would race it. Fails with an [`SeerError::Assertion`] carrying the last
/// observed footer text once the outcome budget is spent.
async fn wait_for_footer_stat<T, F>(
    session: &BrowserSession,
    config: &VerifyConfig,
    accept: F,
    expected: &str,
) -> Result<T>
where
    F: Fn(&str) -> Option<T>,
{
    let deadline = Instant::now() + config.timeouts.outcome();
    loop {
        let footer = session.element_text(STATS_FOOTER).await?;
        if let Some(value) = accept(&footer) {
            return Ok(value);
        }

        if Instant::now() >= deadline {
            return Err(SeerError::Assertion {
                expected: expected.to_string(),
                observed: if footer.is_empty() {
                    "empty footer".to_string()
                } else {
                    footer
                },
            });
        }

        tokio::time::sleep(config.timeouts.poll_interval()).await;
    }
}

/// Parse the cumulative token count out of footer text
pub fn parse_token_count(footer_text: &str) -> Option<u64> {
    let pattern = Regex::new(TOKEN_PATTERN).unwrap();
    pattern
        .captures(footer_text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Parse the cumulative cost out of footer text
pub fn parse_cost(footer_text: &str) -> Option<f64> {
    let pattern = Regex::new(COST_PATTERN).unwrap();
    pattern
        .captures(footer_text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Token count accepted as proof the analysis actually ran
///
/// The footer shows `Total Tokens: 0` before the first analysis and after
/// a reset, so zero parses but proves nothing.
pub fn settled_token_count(footer_text: &str) -> Option<u64> {
    parse_token_count(footer_text).filter(|count| *count > 0)
}

/// Cost accepted as proof the analysis actually ran
pub fn settled_cost(footer_text: &str) -> Option<f64> {
    parse_cost(footer_text).filter(|cost| *cost > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_count() {
        assert_eq!(parse_token_count("Total Tokens: 1531"), Some(1531));
        assert_eq!(parse_token_count("Session Stats\nTotal Tokens: 42\nCost: $0.000120"), Some(42));
        assert_eq!(parse_token_count("Total Tokens: -"), None);
        assert_eq!(parse_token_count(""), None);
    }

    #[test]
    fn test_parse_cost() {
        assert_eq!(parse_cost("Cost: $0.004310"), Some(0.00431));
        assert_eq!(parse_cost("Total Tokens: 99 Cost: $1.250000"), Some(1.25));
        // no decimal part means the footer has not settled yet
        assert_eq!(parse_cost("Cost: $12"), None);
        assert_eq!(parse_cost("Cost: pending"), None);
    }

    #[test]
    fn test_reset_literals_are_zeroed_stats() {
        // the post-reset literals must be the zero case of the same patterns
        assert_eq!(parse_token_count(RESET_TOKENS_LITERAL), Some(0));
        assert_eq!(parse_cost(RESET_COST_LITERAL), Some(0.0));
    }

    #[test]
    fn test_outcome_gates_reject_zeroed_stats() {
        // zeroed footers parse cleanly but must not pass the outcome step
        assert_eq!(settled_token_count(RESET_TOKENS_LITERAL), None);
        assert_eq!(settled_cost(RESET_COST_LITERAL), None);

        assert_eq!(settled_token_count("Total Tokens: 1531"), Some(1531));
        assert_eq!(settled_cost("Cost: $0.001531"), Some(0.001531));
    }

    #[test]
    fn test_progress_indicators_are_distinct() {
        let [first, second] = PROGRESS_INDICATORS;
        assert_ne!(first, second);
        assert!(first.ends_with("..."));
        assert!(second.ends_with("..."));
    }

    #[test]
    fn test_artifact_names_are_distinct_pngs() {
        let names = [ANALYSIS_SCREENSHOT, RESET_SCREENSHOT, ERROR_SCREENSHOT];
        for name in names {
            assert!(name.ends_with(".png"));
        }
        assert_ne!(ANALYSIS_SCREENSHOT, RESET_SCREENSHOT);
        assert_ne!(ANALYSIS_SCREENSHOT, ERROR_SCREENSHOT);
    }
}
