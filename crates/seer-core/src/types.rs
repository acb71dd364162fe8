//! Scenario step and report types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The steps of the verification scenario, in execution order
///
/// The scenario is strictly linear: each step is a blocking wait-then-assert
/// with its own budget, and the first failure aborts the remaining steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Load the application page
    Navigate,
    /// Wait for the model selector to finish populating
    Readiness,
    /// Submit the fixture image to the file input
    Upload,
    /// Wait for both in-progress indicators to clear
    Completion,
    /// Assert the results marker and footer token/cost stats
    Outcome,
    /// Capture the post-analysis screenshot
    Checkpoint,
    /// Click the reset control
    Reset,
    /// Assert the upload affordance and zeroed footer stats
    PostReset,
    /// Capture the post-reset screenshot
    FinalCheckpoint,
}

impl ScenarioStep {
    /// The fixed execution order of the scenario
    pub const SEQUENCE: [ScenarioStep; 9] = [
        ScenarioStep::Navigate,
        ScenarioStep::Readiness,
        ScenarioStep::Upload,
        ScenarioStep::Completion,
        ScenarioStep::Outcome,
        ScenarioStep::Checkpoint,
        ScenarioStep::Reset,
        ScenarioStep::PostReset,
        ScenarioStep::FinalCheckpoint,
    ];
}

impl std::fmt::Display for ScenarioStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioStep::Navigate => write!(f, "navigate"),
            ScenarioStep::Readiness => write!(f, "readiness wait"),
            ScenarioStep::Upload => write!(f, "upload"),
            ScenarioStep::Completion => write!(f, "completion wait"),
            ScenarioStep::Outcome => write!(f, "outcome assertions"),
            ScenarioStep::Checkpoint => write!(f, "checkpoint"),
            ScenarioStep::Reset => write!(f, "reset"),
            ScenarioStep::PostReset => write!(f, "post-reset assertions"),
            ScenarioStep::FinalCheckpoint => write!(f, "final checkpoint"),
        }
    }
}

/// Result of a single scenario step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step: ScenarioStep,
    pub passed: bool,
    /// What was observed (or the error message on failure)
    pub detail: String,
    /// Wall-clock time the step took
    pub elapsed_ms: u64,
}

impl StepOutcome {
    pub fn passed(step: ScenarioStep, detail: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            step,
            passed: true,
            detail: detail.into(),
            elapsed_ms,
        }
    }

    pub fn failed(step: ScenarioStep, detail: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            step,
            passed: false,
            detail: detail.into(),
            elapsed_ms,
        }
    }
}

/// Full record of one verification run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Base URL the run targeted
    pub target: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Outcome of each executed step, in order
    pub steps: Vec<StepOutcome>,
    /// Checkpoint screenshots written on the success path
    pub screenshots: Vec<PathBuf>,
    /// Diagnostic screenshot written after a failure (best-effort)
    pub error_screenshot: Option<PathBuf>,
}

impl RunReport {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            started_at: Utc::now(),
            steps: Vec::new(),
            screenshots: Vec::new(),
            error_screenshot: None,
        }
    }

    pub fn record(&mut self, outcome: StepOutcome) {
        self.steps.push(outcome);
    }

    pub fn add_screenshot(&mut self, path: PathBuf) {
        self.screenshots.push(path);
    }

    /// A run passes only if every step of the sequence ran and passed
    pub fn passed(&self) -> bool {
        self.steps.len() == ScenarioStep::SEQUENCE.len() && self.steps.iter().all(|s| s.passed)
    }

    /// The step the run failed at, if any
    pub fn first_failure(&self) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| !s.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_order_is_fixed() {
        // completion must be observed before the outcome assertions, and the
        // reset click only happens after the post-upload assertions pass
        let seq = ScenarioStep::SEQUENCE;
        let pos = |step| seq.iter().position(|s| *s == step).unwrap();

        assert!(pos(ScenarioStep::Completion) < pos(ScenarioStep::Outcome));
        assert!(pos(ScenarioStep::Outcome) < pos(ScenarioStep::Reset));
        assert!(pos(ScenarioStep::Reset) < pos(ScenarioStep::PostReset));
        assert_eq!(seq.first(), Some(&ScenarioStep::Navigate));
        assert_eq!(seq.last(), Some(&ScenarioStep::FinalCheckpoint));
    }

    #[test]
    fn test_step_display() {
        assert_eq!(ScenarioStep::Navigate.to_string(), "navigate");
        assert_eq!(ScenarioStep::PostReset.to_string(), "post-reset assertions");
    }

    #[test]
    fn test_report_passes_only_when_complete() {
        let mut report = RunReport::new("http://localhost:3000");
        assert!(!report.passed());

        for step in ScenarioStep::SEQUENCE {
            report.record(StepOutcome::passed(step, "ok", 1));
        }
        assert!(report.passed());
        assert!(report.first_failure().is_none());
    }

    #[test]
    fn test_report_fails_on_any_failed_step() {
        let mut report = RunReport::new("http://localhost:3000");
        report.record(StepOutcome::passed(ScenarioStep::Navigate, "loaded", 120));
        report.record(StepOutcome::failed(
            ScenarioStep::Readiness,
            "still loading",
            30_000,
        ));

        assert!(!report.passed());
        let failure = report.first_failure().unwrap();
        assert_eq!(failure.step, ScenarioStep::Readiness);
        assert_eq!(failure.detail, "still loading");
    }

    #[test]
    fn test_report_tracks_screenshots() {
        let mut report = RunReport::new("http://localhost:3000");
        report.add_screenshot(PathBuf::from("verification/01_analysis_complete.png"));
        report.add_screenshot(PathBuf::from("verification/02_stats_reset.png"));

        assert_eq!(report.screenshots.len(), 2);
        assert!(report.error_screenshot.is_none());
    }

    #[test]
    fn test_step_serde_round_trip() {
        let outcome = StepOutcome::passed(ScenarioStep::Outcome, "tokens=123", 412);
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"outcome\""));

        let parsed: StepOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.step, ScenarioStep::Outcome);
        assert!(parsed.passed);
    }
}
