use std::time::Duration;
use surge_config::PollingConfig;
use surge_events::{EventPoller, PollRequest, StreamListener, StreamSettings, Topic};
use surge_http::CloudApi;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SSE_PATH: &str = "/tenant/v1/sse/wallet-9/connections/connection_id/conn-1/completed";

fn request() -> PollRequest {
    PollRequest::new(
        "tenant.abc",
        "wallet-9",
        Topic::Connections,
        "connection_id",
        "conn-1",
        "completed",
    )
    .unwrap()
}

fn fast_settings() -> StreamSettings {
    StreamSettings {
        max_retries: 1,
        retry_delay: Duration::from_millis(10),
        max_empty_pings: 3,
        connection_timeout: Duration::from_secs(5),
    }
}

fn event_stream(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .set_body_string(body)
}

#[tokio::test]
async fn test_poller_against_status_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SSE_PATH))
        .and(query_param("look_back", "60"))
        .and(header("x-api-key", "tenant.abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(concat!(
            r#"data: {"wallet_id":"wallet-9","topic":"connections","#,
            r#""payload":{"state":"completed"}}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let poller = EventPoller::new(CloudApi::with_base_url(server.uri()).unwrap());
    assert!(poller.poll_for_event(&request()).await);
}

#[tokio::test]
async fn test_stream_skips_unrelated_frames() {
    let server = MockServer::start().await;
    let body = concat!(
        ": connected\n\n",
        "data: {\"topic\":\"connections\",\"payload\":{\"state\":\"request-sent\"}}\n\n",
        "data:\n\n",
        "data: {\"topic\":\"connections\",\"payload\":{\"state\":\"completed\"}}\n\n",
    );
    Mock::given(method("GET"))
        .and(path(SSE_PATH))
        .respond_with(event_stream(body))
        .mount(&server)
        .await;

    let listener = StreamListener::with_settings(
        CloudApi::with_base_url(server.uri()).unwrap(),
        fast_settings(),
    );
    assert!(listener.wait_for_event(&request()).await);
}

#[tokio::test]
async fn test_stream_gives_up_on_idle_pings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SSE_PATH))
        .respond_with(event_stream("data:\n\ndata:\n\ndata:\n\n"))
        .expect(1)
        .mount(&server)
        .await;

    let listener = StreamListener::with_settings(
        CloudApi::with_base_url(server.uri()).unwrap(),
        fast_settings(),
    );
    assert!(!listener.wait_for_event(&request()).await);
}

#[tokio::test]
async fn test_stream_reconnects_after_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SSE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let listener = StreamListener::with_settings(
        CloudApi::with_base_url(server.uri()).unwrap(),
        fast_settings(),
    );
    assert!(!listener.wait_for_event(&request()).await);
}

#[tokio::test]
async fn test_stream_reconnect_budget_comes_from_polling_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SSE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let polling = PollingConfig {
        stream_max_retries: 0,
        ..PollingConfig::default()
    };
    let listener = StreamListener::with_settings(
        CloudApi::with_base_url(server.uri()).unwrap(),
        StreamSettings::from_polling(&polling),
    );
    assert!(!listener.wait_for_event(&request()).await);
}

#[tokio::test]
async fn test_stream_decodes_multibyte_frames() {
    let server = MockServer::start().await;
    let body = "data: {\"topic\":\"connections\",\"label\":\"caf\u{e9} \u{1f600}\",\
                \"payload\":{\"state\":\"completed\"}}\n\n";
    Mock::given(method("GET"))
        .and(path(SSE_PATH))
        .respond_with(event_stream(body))
        .mount(&server)
        .await;

    let listener = StreamListener::with_settings(
        CloudApi::with_base_url(server.uri()).unwrap(),
        fast_settings(),
    );
    assert!(listener.wait_for_event(&request()).await);
}
