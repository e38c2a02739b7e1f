//! Integration tests for surge-config

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use surge_config::*;
use temp_env::with_vars;

const API_KEYS: [(&str, Option<&str>); 2] = [
    ("TENANT_ADMIN_API_KEY", Some("adminApiKey")),
    ("GOVERNANCE_API_KEY", Some("governanceApiKey")),
];

fn with_keys<'a>(extra: Vec<(&'a str, Option<&'a str>)>) -> Vec<(&'a str, Option<&'a str>)> {
    let mut vars: Vec<(&'a str, Option<&'a str>)> = API_KEYS.to_vec();
    vars.extend(extra);
    vars
}

#[test]
fn test_default_config_requires_api_keys() {
    let config = SurgeConfig::default();
    let err = config.validate_all().unwrap_err();
    assert_eq!(err.messages().len(), 2);
}

#[test]
fn test_defaults_from_env() {
    with_vars(with_keys(vec![("VUS", None), ("ITERATIONS", None)]), || {
        let config = ConfigLoader::new().from_env().unwrap();

        assert_eq!(config.test.vus, 4);
        assert_eq!(config.test.iterations, 1);
        assert_eq!(config.test.total_batches, 1);
        assert_eq!(config.test.issuer_prefix, "issuer");
        assert_eq!(config.test.holder_prefix, "holder");
        assert_eq!(config.test.num_issuers, 1);
        assert!(config.test.oob_invitation);
        assert!(!config.test.use_auto_publish);
        assert!(!config.test.shuffle);
        assert_eq!(config.schema.name, "didx_acc");
        assert_eq!(config.schema.version, "0.1.0");
        assert_eq!(config.api.base_url, "http://cloudapi.127.0.0.1.nip.io");
        assert_eq!(config.polling.max_attempts, 3);
        assert_eq!(config.polling.look_back, 60);
        assert_eq!(config.polling.request_timeout, Duration::from_secs(14));
    });
}

#[test]
fn test_config_loader_from_env() {
    let vars = with_keys(vec![
        ("VUS", Some("10")),
        ("ITERATIONS", Some("25")),
        ("ISSUER_PREFIX", Some("acme")),
        ("SLEEP_DURATION", Some("2")),
        ("SHUFFLE", Some("1")),
        ("IS_REVOKED", Some("true")),
        ("OOB_INVITATION", Some("false")),
        ("DEBUG", Some("true")),
        ("LOG_FORMAT", Some("json")),
        ("CLOUDAPI_URL", Some("http://localhost:8100")),
        ("POLL_USE_STREAM", Some("1")),
    ]);

    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();

        assert_eq!(config.test.vus, 10);
        assert_eq!(config.test.iterations, 25);
        assert_eq!(config.test.total_iterations(), 250);
        assert_eq!(config.test.issuer_prefix, "acme");
        assert_eq!(config.test.sleep_duration, Duration::from_secs(2));
        assert!(config.test.shuffle);
        assert!(config.test.is_revoked);
        assert!(!config.test.oob_invitation);
        assert_eq!(config.logging.effective_level(), LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.api.base_url, "http://localhost:8100");
        assert!(config.polling.use_stream);
    });
}

#[test]
fn test_invalid_values_are_reported_together() {
    let vars = with_keys(vec![
        ("VUS", Some("-4")),
        ("ITERATIONS", Some("many")),
        ("LOG_LEVEL", Some("loud")),
    ]);

    with_vars(vars, || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        let messages = err.messages();
        assert_eq!(messages.len(), 3, "{:?}", messages);
        assert!(messages[0].contains("VUS"));
        assert!(messages[1].contains("ITERATIONS"));
    });
}

#[test]
fn test_proof_selection_from_env() {
    with_vars(with_keys(vec![("PROOF_SELECTION", None)]), || {
        let config = ConfigLoader::new().from_env().unwrap();
        assert_eq!(config.test.proof_selection, ProofSelection::First);
    });

    let vars = with_keys(vec![("PROOF_SELECTION", Some("date_of_issue"))]);
    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();
        assert_eq!(config.test.proof_selection, ProofSelection::DateOfIssue);
    });

    let vars = with_keys(vec![("PROOF_SELECTION", Some("latest"))]);
    with_vars(vars, || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(err.messages()[0].contains("PROOF_SELECTION"));
    });
}

#[test]
fn test_stream_settings_from_env() {
    let vars = with_keys(vec![
        ("POLL_STREAM_MAX_RETRIES", Some("0")),
        ("POLL_STREAM_RETRY_DELAY", Some("1")),
        ("POLL_STREAM_MAX_EMPTY_PINGS", Some("6")),
        ("POLL_STREAM_CONNECTION_TIMEOUT", Some("55")),
    ]);

    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();
        assert_eq!(config.polling.stream_max_retries, 0);
        assert_eq!(config.polling.stream_retry_delay, Duration::from_secs(1));
        assert_eq!(config.polling.stream_max_empty_pings, 6);
        assert_eq!(
            config.polling.stream_connection_timeout,
            Duration::from_secs(55)
        );
    });
}

#[test]
fn test_zero_workers_fail_validation() {
    let vars = with_keys(vec![("VUS", Some("0")), ("TOTAL_BATCHES", Some("0"))]);

    with_vars(vars, || {
        match ConfigLoader::new().from_env() {
            Err(ConfigError::ValidationError(messages)) => {
                assert_eq!(messages.len(), 2);
                assert!(messages.iter().any(|m| m.contains("vus")));
                assert!(messages.iter().any(|m| m.contains("total_batches")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    });
}

#[test]
fn test_enterprise_mode_from_env() {
    let vars = vec![
        ("TENANT_ADMIN_API_KEY", None),
        ("GOVERNANCE_API_KEY", None),
        ("USE_ENTERPRISE", Some("true")),
        ("CLIENT_ID", Some("tenant-admin")),
        ("CLIENT_SECRET", Some("s3cret")),
        ("OAUTH_ENDPOINT", Some("realms/tenant/token")),
    ];

    with_vars(vars, || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        let messages = err.messages();
        assert_eq!(messages.len(), 3);
        assert!(messages.iter().all(|m| m.contains("governance_")));
    });
}

#[test]
fn test_prefixed_loader() {
    let vars = vec![
        ("LT_VUS", Some("7")),
        ("LT_TENANT_ADMIN_API_KEY", Some("a")),
        ("LT_GOVERNANCE_API_KEY", Some("b")),
    ];

    with_vars(vars, || {
        let config = ConfigLoader::with_prefix("LT").from_env().unwrap();
        assert_eq!(config.test.vus, 7);
    });
}

#[test]
fn test_yaml_file_with_env_override() {
    let yaml = r#"
test:
  vus: 2
  iterations: 5
  holder_prefix: wallet
  output_dir: /tmp/surge-output
schema:
  name: passport
auth:
  tenant_admin_api_key: adminApiKey
  governance_api_key: governanceApiKey
polling:
  backoff_ms: [100, 200]
"#;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    with_vars(vec![("ITERATIONS", Some("9")), ("VUS", None)], || {
        let config = ConfigLoader::new().load(Some(file.path())).unwrap();
        assert_eq!(config.test.vus, 2);
        assert_eq!(config.test.iterations, 9);
        assert_eq!(config.test.holder_prefix, "wallet");
        assert_eq!(config.test.output_dir, PathBuf::from("/tmp/surge-output"));
        assert_eq!(config.schema.name, "passport");
        assert_eq!(config.schema.version, "0.1.0");
        assert_eq!(config.polling.backoff_ms, vec![100, 200]);
    });
}

#[test]
fn test_sample_round_trips() {
    let sample = SurgeConfig::generate_sample();
    let parsed: SurgeConfig = serde_yaml::from_str(&sample).unwrap();
    assert_eq!(parsed.test.vus, 4);
    assert_eq!(parsed.polling.backoff_ms, vec![500, 1000, 2000, 3000]);
}
