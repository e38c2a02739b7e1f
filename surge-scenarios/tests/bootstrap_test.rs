//! Issuer bootstrap against a mock Cloud API

use serde_json::json;
use surge_config::SurgeConfig;
use surge_scenarios::{bootstrap_issuers, Harness, IssuerProfile};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn harness(server: &MockServer, num_issuers: u32) -> Harness {
    let mut config = SurgeConfig::default();
    config.api.base_url = server.uri();
    config.auth.tenant_admin_api_key = Some("adminApiKey".into());
    config.auth.governance_api_key = Some("governanceApiKey".into());
    config.test.num_issuers = num_issuers;
    Harness::connect(config).await.unwrap()
}

#[tokio::test]
async fn test_bootstrap_reuses_existing_and_creates_missing() {
    let server = MockServer::start().await;

    // issuer_0 is fully provisioned already
    Mock::given(method("GET"))
        .and(path("/tenant-admin/v1/tenants"))
        .and(query_param("wallet_name", "issuer_0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "wallet_id": "id-issuer_0" }])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tenant-admin/v1/tenants/id-issuer_0/access-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "tenant.issuer_0" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tenant/v1/definitions/credentials"))
        .and(header("x-api-key", "tenant.issuer_0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "tag": "issuer_0", "id": "cd-issuer_0" },
        ])))
        .mount(&server)
        .await;

    // issuer_1 needs a tenant, the schema and a credential definition
    Mock::given(method("GET"))
        .and(path("/tenant-admin/v1/tenants"))
        .and(query_param("wallet_name", "issuer_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tenant-admin/v1/tenants"))
        .and(body_partial_json(json!({
            "wallet_name": "issuer_1",
            "roles": ["issuer", "verifier"],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "wallet_id": "id-issuer_1",
            "access_token": "tenant.issuer_1",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tenant/v1/definitions/credentials"))
        .and(header("x-api-key", "tenant.issuer_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/governance/v1/definitions/schemas"))
        .and(header("x-api-key", "governance.governanceApiKey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/governance/v1/definitions/schemas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "schema-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tenant/v1/definitions/credentials"))
        .and(body_partial_json(json!({ "tag": "issuer_1", "schema_id": "schema-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "cd-issuer_1" })))
        .expect(1)
        .mount(&server)
        .await;

    let issuers = bootstrap_issuers(&harness(&server, 2).await).await.unwrap();

    assert_eq!(
        issuers,
        vec![
            IssuerProfile {
                wallet_name: "issuer_0".into(),
                wallet_id: "id-issuer_0".into(),
                access_token: "tenant.issuer_0".into(),
                credential_definition_id: "cd-issuer_0".into(),
            },
            IssuerProfile {
                wallet_name: "issuer_1".into(),
                wallet_id: "id-issuer_1".into(),
                access_token: "tenant.issuer_1".into(),
                credential_definition_id: "cd-issuer_1".into(),
            },
        ]
    );
}

#[tokio::test]
async fn test_bootstrap_propagates_backend_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tenant-admin/v1/tenants"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let err = bootstrap_issuers(&harness(&server, 1).await)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("503"), "unexpected error: {}", err);
}
