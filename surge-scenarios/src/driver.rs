//! Phase trait and the worker-pool runner

use crate::checks::{RunSummary, Threshold};
use crate::error::{ScenarioError, ScenarioResult};
use crate::harness::Harness;
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use surge_phase::{ExecutionContext, PhaseFile};
use tracing::{error, info, info_span, warn, Instrument};

/// Check recorded once per iteration with its overall outcome
pub const ITERATION_CHECK: &str = "iteration completed";

/// One step of the phased load test
#[async_trait]
pub trait Phase: Send + Sync {
    fn name(&self) -> &'static str;

    /// Pass condition on the run's check rate
    fn threshold(&self) -> Threshold;

    /// Output of an earlier phase this one consumes
    fn input(&self, _harness: &Harness) -> Option<PhaseFile> {
        None
    }

    /// Runs once before any worker starts; an error aborts the run
    async fn setup(&mut self, harness: &Harness) -> ScenarioResult<()>;

    /// Runs once per `(worker, iteration)`
    async fn iterate(&self, harness: &Harness, ctx: ExecutionContext) -> ScenarioResult<()>;

    /// Best-effort cleanup after all workers finish
    async fn teardown(&self, _harness: &Harness) -> ScenarioResult<()> {
        Ok(())
    }
}

/// Fixed pool of workers, each running its iterations back to back
pub struct Runner {
    harness: Arc<Harness>,
    workers: u32,
    iterations: u32,
    pause: Duration,
}

impl Runner {
    /// Worker count, iterations and pause come from the harness configuration
    pub fn new(harness: Arc<Harness>) -> Self {
        let test = &harness.config.test;
        let (workers, iterations, pause) = (test.vus, test.iterations, test.sleep_duration);
        Self {
            harness,
            workers,
            iterations,
            pause,
        }
    }

    pub fn workers(mut self, workers: u32) -> Self {
        self.workers = workers;
        self
    }

    pub fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub async fn run(&self, mut phase: Box<dyn Phase>) -> ScenarioResult<RunSummary> {
        let name = phase.name();
        let started = Instant::now();
        let setup_failed = |source: ScenarioError| ScenarioError::Setup {
            phase: name,
            source: Box::new(source),
        };

        if let Some(input) = phase.input(&self.harness) {
            if !input.exists().await {
                return Err(setup_failed(ScenarioError::missing(format!(
                    "input file {} not found; run the producing phase first",
                    input.path().display()
                ))));
            }
        }

        let version = &self.harness.config.test.version;
        info!(
            "Starting {} (surge {}) with {} workers x {} iterations",
            name, version, self.workers, self.iterations
        );
        phase.setup(&self.harness).await.map_err(setup_failed)?;

        let phase: Arc<dyn Phase> = Arc::from(phase);
        let handles = (1..=self.workers).map(|worker_id| {
            tokio::spawn(run_worker(
                phase.clone(),
                self.harness.clone(),
                worker_id,
                self.iterations,
                self.pause,
            ))
        });

        let mut completed = 0u64;
        let mut failed = 0u64;
        for (index, outcome) in join_all(handles).await.into_iter().enumerate() {
            match outcome {
                Ok((ok, failures)) => {
                    completed += ok;
                    failed += failures;
                }
                Err(e) => {
                    error!("Worker {} aborted: {}", index + 1, e);
                    failed += self.iterations as u64;
                }
            }
        }

        if let Err(e) = phase.teardown(&self.harness).await {
            warn!("Teardown of {} failed: {}", name, e);
        }

        let threshold = phase.threshold();
        let check_rate = self.harness.checks.totals().rate();
        let summary = RunSummary {
            phase: name.to_string(),
            version: version.clone(),
            workers: self.workers,
            iterations_per_worker: self.iterations,
            iterations_completed: completed,
            iterations_failed: failed,
            checks: self.harness.checks.snapshot(),
            check_rate,
            threshold,
            elapsed_ms: started.elapsed().as_millis() as u64,
            passed: threshold.is_met(check_rate),
        };

        info!(
            "Finished {}: {} completed, {} failed, check rate {:.4}",
            name, completed, failed, check_rate
        );
        Ok(summary)
    }
}

async fn run_worker(
    phase: Arc<dyn Phase>,
    harness: Arc<Harness>,
    worker_id: u32,
    iterations: u32,
    pause: Duration,
) -> (u64, u64) {
    let mut completed = 0;
    let mut failed = 0;

    for iteration_id in 0..iterations {
        let ctx = ExecutionContext::new(worker_id, iteration_id, iterations);
        let span = info_span!(
            "iteration",
            phase = phase.name(),
            worker = worker_id,
            iteration = iteration_id
        );

        let result = phase.iterate(&harness, ctx).instrument(span.clone()).await;
        harness.checks.check(ITERATION_CHECK, result.is_ok());
        match result {
            Ok(()) => completed += 1,
            Err(e) => {
                span.in_scope(|| error!("Iteration failed: {}", e));
                failed += 1;
            }
        }

        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }

    (completed, failed)
}
