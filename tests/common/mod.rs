//! Shared setup for the phase-level integration tests

use std::path::Path;
use std::sync::Arc;
use surge_config::SurgeConfig;
use surge_scenarios::{Harness, Runner};
use wiremock::MockServer;

/// Configuration pointed at the mock backend with files under `output_dir`
pub fn config(
    server: &MockServer,
    output_dir: &Path,
    workers: u32,
    iterations: u32,
) -> SurgeConfig {
    let mut config = SurgeConfig::default();
    config.api.base_url = server.uri();
    config.auth.tenant_admin_api_key = Some("adminApiKey".into());
    config.auth.governance_api_key = Some("governanceApiKey".into());
    config.test.vus = workers;
    config.test.iterations = iterations;
    config.test.output_dir = output_dir.to_path_buf();
    config.polling.max_attempts = 2;
    config.polling.backoff_ms = vec![10];
    config
}

/// A fresh harness per phase, as every CLI run starts with clean counters
pub async fn runner(config: SurgeConfig) -> Runner {
    let harness = Harness::connect(config).await.unwrap();
    Runner::new(Arc::new(harness))
}
