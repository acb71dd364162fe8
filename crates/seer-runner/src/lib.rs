//! Verification scenarios for the StyleSeer web app
//!
//! Two entry points:
//!
//! - [`scenario::run`]: the full analysis cycle (navigate, wait for the
//!   model list, upload the fixture, wait for completion, assert outcomes,
//!   reset, assert zeroed stats) with checkpoint screenshots and a per-step
//!   [`seer_core::RunReport`].
//! - [`smoke::run_smoke`]: navigate, title, one screenshot. A quick "is it
//!   even serving" check.
//!
//! Both release the browser session on every exit path.

pub mod scenario;
pub mod smoke;

// Re-export the entry points
pub use scenario::run;
pub use smoke::run_smoke;
