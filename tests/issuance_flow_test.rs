//! Credential issuance over prepared connections, with event confirmation

mod common;

use serde_json::json;
use std::path::Path;
use std::time::Duration;
use surge_phase::{CredentialRecord, EpochRecord, InvitationRecord, PhaseFile};
use surge_scenarios::PhaseKind;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOLDER_TOKEN: &str = "tenant.holder_0";
const ISSUER_TOKEN: &str = "tenant.issuer_0";

async fn write_connection(output: &Path) {
    let writer = PhaseFile::paired(output, "issuer", "holder", "create-invitation")
        .create_writer()
        .await
        .unwrap();
    writer
        .append(&InvitationRecord {
            wallet_label: "holder 0".into(),
            wallet_name: "holder_0".into(),
            wallet_id: "id-holder_0".into(),
            access_token: HOLDER_TOKEN.into(),
            connection_id: "conn-holder".into(),
            issuer_connection_id: "conn-issuer".into(),
            issuer_wallet_name: "issuer_0".into(),
            issuer_wallet_id: "id-issuer_0".into(),
            issuer_access_token: ISSUER_TOKEN.into(),
            issuer_credential_definition_id: "cd:3:CL:8:issuer_0".into(),
        })
        .await
        .unwrap();
}

async fn mount_offer(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/tenant/v1/issuer/credentials"))
        .and(header("x-api-key", ISSUER_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "thread_id": "th-0",
            "credential_exchange_id": "v2-issuer-0",
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// A single event frame; both the poller and the stream listener read it
fn event(topic: &str, state: &str) -> ResponseTemplate {
    let frame = json!({
        "wallet_id": "id-holder_0",
        "topic": topic,
        "payload": { "state": state },
    });
    ResponseTemplate::new(200).set_body_raw(format!("data: {}\n\n", frame), "text/event-stream")
}

#[tokio::test]
async fn test_create_credentials_confirms_offer_and_storage() {
    issue_one_credential(false).await;
}

#[tokio::test]
async fn test_create_credentials_over_event_stream() {
    issue_one_credential(true).await;
}

async fn issue_one_credential(use_stream: bool) {
    let server = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();
    write_connection(output.path()).await;
    mount_offer(&server).await;

    Mock::given(method("GET"))
        .and(path("/tenant/v1/sse/id-holder_0/credentials/thread_id/th-0/offer-received"))
        .and(header("x-api-key", HOLDER_TOKEN))
        .respond_with(event("credentials", "offer-received"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tenant/v1/issuer/credentials"))
        .and(header("x-api-key", HOLDER_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "thread_id": "th-other", "credential_exchange_id": "v2-holder-9" },
            { "thread_id": "th-0", "credential_exchange_id": "v2-holder-0" },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tenant/v1/issuer/credentials/v2-holder-0/request"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tenant/v1/sse/id-holder_0/credentials/credential_exchange_id/v2-holder-0/done"))
        .respond_with(event("credentials", "done"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = common::config(&server, output.path(), 1, 1);
    config.polling.use_stream = use_stream;
    let summary = common::runner(config)
        .await
        .run(PhaseKind::CreateCredentials.build())
        .await
        .unwrap();

    assert!(summary.passed, "checks: {:?}", summary.checks);
    assert_eq!(summary.checks["holder received offer"].passes, 1);
    assert_eq!(summary.checks["holder credential stored"].passes, 1);

    let epochs: Vec<EpochRecord> =
        PhaseFile::paired(output.path(), "issuer", "holder", "epoch-timestamps")
            .read_records()
            .await
            .unwrap();
    assert_eq!(epochs.len(), 1);

    let issued: Vec<CredentialRecord> =
        PhaseFile::paired(output.path(), "issuer", "holder", "create-credentials")
            .read_records()
            .await
            .unwrap();
    assert_eq!(issued.len(), 1);
    assert_eq!(issued[0].credential_exchange_id, "v2-issuer-0");
    assert_eq!(issued[0].issuer_connection_id, "conn-issuer");
    assert_eq!(issued[0].date_of_issue, epochs[0].epoch_timestamp.to_string());
}

#[tokio::test]
async fn test_create_credentials_fails_iteration_when_offer_never_arrives() {
    let server = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();
    write_connection(output.path()).await;
    mount_offer(&server).await;

    // Events for the thread exist but never reach the awaited state
    Mock::given(method("GET"))
        .and(path("/tenant/v1/sse/id-holder_0/credentials/thread_id/th-0/offer-received"))
        .respond_with(event("credentials", "offer-sent"))
        .expect(2)
        .mount(&server)
        .await;

    let runner = common::runner(common::config(&server, output.path(), 1, 1)).await;
    let summary = runner
        .run(PhaseKind::CreateCredentials.build())
        .await
        .unwrap();

    assert!(!summary.passed);
    assert_eq!(summary.iterations_failed, 1);
    assert_eq!(summary.checks["holder received offer"].fails, 1);
    assert!(!summary.checks.contains_key("holder credential stored"));

    let issued: Vec<CredentialRecord> =
        PhaseFile::paired(output.path(), "issuer", "holder", "create-credentials")
            .read_records()
            .await
            .unwrap();
    assert!(issued.is_empty());
}

#[tokio::test]
async fn test_stream_wait_honours_configured_reconnects() {
    let server = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();
    write_connection(output.path()).await;
    mount_offer(&server).await;

    Mock::given(method("GET"))
        .and(path(
            "/tenant/v1/sse/id-holder_0/credentials/thread_id/th-0/offer-received",
        ))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = common::config(&server, output.path(), 1, 1);
    config.polling.use_stream = true;
    config.polling.stream_max_retries = 1;
    config.polling.stream_retry_delay = Duration::from_millis(10);
    let summary = common::runner(config)
        .await
        .run(PhaseKind::CreateCredentials.build())
        .await
        .unwrap();

    assert!(!summary.passed);
    assert_eq!(summary.checks["holder received offer"].fails, 1);
}
