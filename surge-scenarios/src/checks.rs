//! Named pass/fail checks and run-level thresholds

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{ScenarioError, ScenarioResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckCount {
    pub passes: u64,
    pub fails: u64,
}

impl CheckCount {
    pub fn total(&self) -> u64 {
        self.passes + self.fails
    }

    /// Pass rate; 1.0 when nothing was checked
    pub fn rate(&self) -> f64 {
        match self.total() {
            0 => 1.0,
            total => self.passes as f64 / total as f64,
        }
    }
}

/// Check counters shared by every worker of a run
#[derive(Debug, Clone, Default)]
pub struct Checks {
    counts: Arc<Mutex<BTreeMap<String, CheckCount>>>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome and hand it back
    pub fn check(&self, name: &str, ok: bool) -> bool {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        let count = counts.entry(name.to_string()).or_default();
        if ok {
            count.passes += 1;
        } else {
            count.fails += 1;
        }
        ok
    }

    /// Record an outcome; a failure ends the iteration
    pub fn require(&self, name: &str, ok: bool) -> ScenarioResult<()> {
        if self.check(name, ok) {
            Ok(())
        } else {
            Err(ScenarioError::CheckFailed(name.to_string()))
        }
    }

    /// Record whether `result` succeeded; the error is passed through
    pub fn require_ok<T, E>(&self, name: &str, result: Result<T, E>) -> ScenarioResult<T>
    where
        E: Into<ScenarioError>,
    {
        self.check(name, result.is_ok());
        result.map_err(Into::into)
    }

    /// Record whether a lookup found something
    pub fn require_some<T>(&self, name: &str, value: Option<T>) -> ScenarioResult<T> {
        self.check(name, value.is_some());
        value.ok_or_else(|| ScenarioError::CheckFailed(name.to_string()))
    }

    pub fn snapshot(&self) -> BTreeMap<String, CheckCount> {
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Sum over all checks
    pub fn totals(&self) -> CheckCount {
        self.snapshot()
            .values()
            .fold(CheckCount::default(), |acc, c| CheckCount {
                passes: acc.passes + c.passes,
                fails: acc.fails + c.fails,
            })
    }
}

/// Pass condition on the overall check rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "rate", rename_all = "snake_case")]
pub enum Threshold {
    /// Every check passed
    All,
    /// Strictly more than this share of checks passed
    Above(f64),
    /// Informational run; never fails on checks
    None,
}

impl Threshold {
    pub fn is_met(&self, rate: f64) -> bool {
        match self {
            Threshold::All => rate >= 1.0,
            Threshold::Above(min) => rate > *min,
            Threshold::None => true,
        }
    }
}

/// Outcome of one phase run, printed as JSON at the end
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub phase: String,
    /// Harness version the run was configured with
    pub version: String,
    pub workers: u32,
    pub iterations_per_worker: u32,
    pub iterations_completed: u64,
    pub iterations_failed: u64,
    pub checks: BTreeMap<String, CheckCount>,
    pub check_rate: f64,
    pub threshold: Threshold,
    pub elapsed_ms: u64,
    pub passed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_and_require() {
        let checks = Checks::new();
        assert!(checks.check("tenant created", true));
        assert!(!checks.check("tenant created", false));
        assert!(checks.require("event received", true).is_ok());

        let err = checks.require("event received", false).unwrap_err();
        assert!(matches!(err, ScenarioError::CheckFailed(name) if name == "event received"));

        let snapshot = checks.snapshot();
        assert_eq!(snapshot["tenant created"], CheckCount { passes: 1, fails: 1 });
        assert_eq!(checks.totals(), CheckCount { passes: 2, fails: 2 });
    }

    #[test]
    fn test_require_ok_keeps_error() {
        let checks = Checks::new();
        let value = checks
            .require_ok("lookup", Ok::<_, ScenarioError>(7))
            .unwrap();
        assert_eq!(value, 7);

        let err = checks
            .require_ok::<u32, _>("lookup", Err(ScenarioError::missing("wallet_id")))
            .unwrap_err();
        assert!(matches!(err, ScenarioError::MissingData(_)));
        assert_eq!(checks.snapshot()["lookup"], CheckCount { passes: 1, fails: 1 });

        assert_eq!(checks.require_some("found", Some("w-1")).unwrap(), "w-1");
        assert!(checks.require_some::<&str>("found", None).is_err());
        assert_eq!(checks.snapshot()["found"].fails, 1);
    }

    #[test]
    fn test_clones_share_counts() {
        let checks = Checks::new();
        let worker = checks.clone();
        worker.check("x", true);
        assert_eq!(checks.totals().passes, 1);
    }

    #[test]
    fn test_thresholds() {
        assert!(Threshold::All.is_met(1.0));
        assert!(!Threshold::All.is_met(0.999));
        assert!(Threshold::Above(0.99).is_met(0.995));
        assert!(!Threshold::Above(0.99).is_met(0.99));
        assert!(Threshold::None.is_met(0.0));
        assert_eq!(CheckCount::default().rate(), 1.0);
        assert_eq!(CheckCount { passes: 3, fails: 1 }.rate(), 0.75);
    }

    #[test]
    fn test_threshold_serialization() {
        assert_eq!(
            serde_json::to_value(Threshold::Above(0.99)).unwrap(),
            serde_json::json!({"kind": "above", "rate": 0.99})
        );
        assert_eq!(
            serde_json::to_value(Threshold::All).unwrap(),
            serde_json::json!({"kind": "all"})
        );
    }
}
