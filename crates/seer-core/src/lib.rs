//! # seer-core
//!
//! Core types for the StyleSeer UI verification harness.
//!
//! The harness drives the running StyleSeer app through a headless browser
//! and asserts on what the page actually renders. This crate holds the parts
//! every other crate needs:
//!
//! - [`SeerError`]: unified error type for browser, wait, and assertion
//!   failures
//! - [`VerifyConfig`]: target URL, artifact directory, and per-phase wait
//!   budgets
//! - [`ScenarioStep`] / [`RunReport`]: the fixed step sequence and the
//!   per-run record rendered by the CLI

mod config;
mod error;
mod types;

pub use config::{Timeouts, VerifyConfig};
pub use error::{Result, SeerError};
pub use types::{RunReport, ScenarioStep, StepOutcome};
