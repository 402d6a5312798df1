//! End-to-end runs of the `pylacus` binary against a mock instance.

use std::process::{Command, Output};

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn pylacus(args: Vec<String>) -> Output {
    tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_pylacus"))
            .args(&args)
            .env_remove("LACUS_URL")
            .env_remove("LACUS_TOKEN")
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to run pylacus")
    })
    .await
    .expect("blocking task panicked")
}

fn argv(uri: &str, rest: &[&str]) -> Vec<String> {
    let mut args = vec!["--url-instance".to_owned(), uri.to_owned()];
    args.extend(rest.iter().map(|s| (*s).to_owned()));
    args
}

async fn live_instance() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn test_enqueue_prints_uuid() {
    let server = live_instance().await;
    Mock::given(method("POST"))
        .and(path("/enqueue"))
        .respond_with(ResponseTemplate::new(200).set_body_json("abc-123"))
        .expect(1)
        .mount(&server)
        .await;

    let out = pylacus(argv(&server.uri(), &["--json", "enqueue", "example.com"])).await;

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let body: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(body, json!({"uuid": "abc-123"}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_not_found_exit_code() {
    let server = live_instance().await;
    Mock::given(method("GET"))
        .and(path("/capture_status/nope"))
        .respond_with(ResponseTemplate::new(200).set_body_json(-1))
        .mount(&server)
        .await;

    let out = pylacus(argv(&server.uri(), &["--json", "status", "nope"])).await;

    assert_eq!(out.status.code(), Some(4));
    let err: Value = serde_json::from_slice(&out.stderr).unwrap();
    assert_eq!(err["ok"], false);
    assert_eq!(err["error"]["code"], "not_found");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_redis_up_takes_precedence() {
    let server = live_instance().await;
    Mock::given(method("GET"))
        .and(path("/redis_up"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"is_up": true})))
        .expect(1)
        .mount(&server)
        .await;

    let out = pylacus(argv(
        &server.uri(),
        &["--redis_up", "--json", "status", "abc-123"],
    ))
    .await;

    assert!(out.status.success());
    let body: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(body, json!({"check": "redis_up", "value": true}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_instance_exits_one() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let out = pylacus(argv(&server.uri(), &["status", "abc-123"])).await;

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Unable to reach"), "{stderr}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_enqueue_without_target_exits_two() {
    let server = live_instance().await;

    let out = pylacus(argv(&server.uri(), &["enqueue"])).await;

    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
}
