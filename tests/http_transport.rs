//! Integration tests for the HTTP transport against a mock server.
//!
//! The transport uses reqwest's blocking client, which must not run on an
//! async worker thread, so every call goes through `spawn_blocking`.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use metasync::client::MetadataClient;
use metasync::composer::Composer;
use metasync::error::Error;
use metasync::protocol::Query;
use metasync::transport::{HttpTransport, Response, Transport, ADMIN_SECRET_HEADER};

/// Build the transport and send `query` on a blocking thread.
async fn send(
    server: &MockServer,
    secret: Option<&str>,
    timeout: Duration,
    query: Query,
) -> metasync::error::Result<Response> {
    let endpoint = Url::parse(&server.uri()).unwrap();
    let secret = secret.map(str::to_string);
    tokio::task::spawn_blocking(move || {
        let transport = HttpTransport::new(&endpoint, secret, Some(timeout))?;
        transport.send(&query)
    })
    .await
    .expect("transport task panicked")
}

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test(flavor = "multi_thread")]
async fn test_posts_operation_to_query_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/query"))
        .and(body_json(json!({"type": "reload_metadata", "args": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"success"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let response = send(&server, None, TIMEOUT, Query::reload_metadata())
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body_text(), r#"{"message":"success"}"#);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sends_admin_secret_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/query"))
        .and(header(ADMIN_SECRET_HEADER, "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let response = send(&server, Some("s3cret"), TIMEOUT, Query::clear_metadata())
        .await
        .unwrap();
    assert!(response.is_ok());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_omits_admin_secret_when_unset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    send(&server, None, TIMEOUT, Query::clear_metadata())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key(ADMIN_SECRET_HEADER));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_non_ok_status_is_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"error":"bad","path":"$.args"}"#),
        )
        .mount(&server)
        .await;

    let response = send(&server, None, TIMEOUT, Query::reload_metadata())
        .await
        .unwrap();
    assert_eq!(response.status, 400);
    assert!(!response.is_ok());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("{}")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = send(
        &server,
        None,
        Duration::from_millis(200),
        Query::reload_metadata(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_client_decodes_rejection_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"error":"inconsistent object","code":"unexpected"}"#),
        )
        .mount(&server)
        .await;

    let endpoint = Url::parse(&server.uri()).unwrap();
    let err = tokio::task::spawn_blocking(move || {
        let transport = HttpTransport::new(&endpoint, None, Some(TIMEOUT))?;
        let client = MetadataClient::new(Box::new(transport), Composer::new(Vec::new()));
        client.drop_inconsistent_metadata()
    })
    .await
    .unwrap()
    .unwrap_err();

    let rejection = err.rejection().unwrap();
    assert_eq!(rejection.message, "inconsistent object");
    assert_eq!(rejection.code.as_deref(), Some("unexpected"));
}
