//! End-to-end tests for the `inconsistency` command

mod common;
use common::prelude::*;

use serde_json::json;
use wiremock::matchers::{body_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INCONSISTENT: &str = r#"{
    "is_consistent": false,
    "inconsistent_objects": [
        {"type": "table", "reason": "no such table", "definition": {"table": {"schema": "public", "name": "orders"}}},
        {"type": "remote_schema", "reason": "unreachable", "message": "connection refused", "definition": {"name": "payments"}}
    ]
}"#;

async fn server_with(body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({"type": "get_inconsistent_metadata", "args": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_consistent() {
    let server = server_with(r#"{"is_consistent": true, "inconsistent_objects": []}"#).await;
    let fixture = TestFixture::new().with_endpoint(&server.uri());

    fixture
        .command()
        .args(["inconsistency", "status"])
        .assert()
        .success()
        .stdout("[OK] Metadata is consistent\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_inconsistent() {
    let server = server_with(INCONSISTENT).await;
    let fixture = TestFixture::new().with_endpoint(&server.uri());

    fixture
        .command()
        .args(["inconsistency", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("inconsistent (2 object(s))"));
}

/// Objects are listed in the order the service reports them
#[tokio::test(flavor = "multi_thread")]
async fn test_list_preserves_order() {
    let server = server_with(INCONSISTENT).await;
    let fixture = TestFixture::new().with_endpoint(&server.uri());

    let output = fixture
        .command()
        .args(["inconsistency", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("NAME"));
    assert!(lines[1].starts_with("public.orders"));
    assert!(lines[1].ends_with("no such table"));
    assert!(lines[2].starts_with("payments"));
    assert!(lines[2].contains("remote_schema"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_json() {
    let server = server_with(INCONSISTENT).await;
    let fixture = TestFixture::new().with_endpoint(&server.uri());

    let output = fixture
        .command()
        .args(["inconsistency", "list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed[0]["definition"]["table"]["name"], "orders");
    assert_eq!(listed[1]["type"], "remote_schema");
    assert_eq!(listed[1]["message"], "connection refused");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_drop() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({"type": "drop_inconsistent_metadata", "args": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"success"}"#))
        .expect(1)
        .mount(&server)
        .await;
    let fixture = TestFixture::new().with_endpoint(&server.uri());

    fixture
        .command()
        .args(["inconsistency", "drop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Inconsistent objects dropped"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_undecodable_response() {
    let server = server_with(r#"{"unexpected": 1}"#).await;
    let fixture = TestFixture::new().with_endpoint(&server.uri());

    fixture
        .command()
        .args(["inconsistency", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to decode response"));
}
