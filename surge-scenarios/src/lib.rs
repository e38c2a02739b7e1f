//! Scenario driver for the phased issuance load test
//!
//! A phase runs `INIT -> SETUP -> ITERATE x (workers * iterations) -> TEARDOWN`.
//! Setup happens once before any worker starts and aborts the run on
//! failure. Iterations are independent: an error ends only that iteration
//! and is counted against the phase's check threshold. Teardown is
//! best-effort.

pub mod bootstrap;
pub mod checks;
pub mod driver;
pub mod error;
pub mod harness;
pub mod phases;

pub use bootstrap::{bootstrap_issuers, IssuerProfile};
pub use checks::{CheckCount, Checks, RunSummary, Threshold};
pub use driver::{Phase, Runner};
pub use error::{ScenarioError, ScenarioResult};
pub use harness::Harness;
pub use phases::PhaseKind;
