//! HTTP-level tests for the providers, run against throwaway local servers.

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use groundrag_core::error::{AnswerFailure, IndexError};
use groundrag_core::index::{BucketId, FileDescriptor, IndexClient};
use groundrag_core::message::Turn;
use groundrag_core::Provider;
use groundrag_providers::{GroundXClient, OpenAiCompatProvider};
use std::time::Duration;

// ── Helpers ──────────────────────────────────────────────────────────────

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// An address nothing is listening on.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

fn llm(base: &str) -> OpenAiCompatProvider {
    OpenAiCompatProvider::new(base, "sk-test", "test-model", Duration::from_secs(5)).unwrap()
}

fn groundx(base: &str) -> GroundXClient {
    GroundXClient::new(base, "gx-test", Duration::from_secs(5)).unwrap()
}

fn turn() -> Turn {
    Turn::new("Answer from context only.", "What is offered?")
}

// ── Chat completions ─────────────────────────────────────────────────────

#[tokio::test]
async fn completion_success_returns_content() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            if auth != "Bearer sk-test" {
                return (StatusCode::UNAUTHORIZED, Json(serde_json::json!({})));
            }
            let system = body["messages"][0]["content"].as_str().unwrap_or_default();
            let content = format!(
                "model={} system_len={}",
                body["model"].as_str().unwrap_or_default(),
                system.len()
            );
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "choices": [{"message": {"role": "assistant", "content": content}}]
                })),
            )
        }),
    );
    let base = spawn_server(router).await;

    let answer = llm(&base).complete(&turn()).await.unwrap();
    assert!(answer.starts_with("model=test-model"));
    assert!(answer.contains("system_len=25"));
}

#[tokio::test]
async fn completion_non_2xx_is_upstream_error_with_status() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "model overloaded") }),
    );
    let base = spawn_server(router).await;

    let err = llm(&base).complete(&turn()).await.unwrap_err();
    assert_eq!(
        err,
        AnswerFailure::Upstream {
            status_code: 503,
            body: "model overloaded".into()
        }
    );
}

#[tokio::test]
async fn completion_unexpected_shape_is_malformed() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(serde_json::json!({"output": "hi"})) }),
    );
    let base = spawn_server(router).await;

    match llm(&base).complete(&turn()).await {
        Err(AnswerFailure::MalformedResponse { raw_body }) => {
            assert!(raw_body.contains("output"));
        }
        other => panic!("expected MalformedResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn completion_connection_refused_is_transport() {
    let err = llm(&closed_port_url()).complete(&turn()).await.unwrap_err();
    assert_eq!(err.kind(), "transport");
}

#[tokio::test]
async fn completion_timeout_is_transport() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            "late"
        }),
    );
    let base = spawn_server(router).await;
    let provider =
        OpenAiCompatProvider::new(&base, "sk-test", "m", Duration::from_millis(200)).unwrap();

    let err = provider.complete(&turn()).await.unwrap_err();
    assert!(matches!(err, AnswerFailure::Transport { .. }));
}

// ── GroundX ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn groundx_search_maps_results() {
    let router = Router::new().route(
        "/v1/search/{bucket}",
        post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
            assert_eq!(headers.get("x-api-key").unwrap(), "gx-test");
            let text = format!("text for {}", body["query"].as_str().unwrap_or_default());
            Json(serde_json::json!({
                "search": {
                    "results": [
                        {"score": 0.8, "text": text,
                         "searchData": {"url": "https://x.io/a", "title": "A"}}
                    ]
                }
            }))
        }),
    );
    let base = spawn_server(router).await;

    let response = groundx(&base).search(BucketId(5), "healthcare").await.unwrap();
    assert!(response.text.is_none());
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].text, "text for healthcare");
    assert_eq!(response.results[0].source_url(), Some("https://x.io/a"));
}

#[tokio::test]
async fn groundx_bucket_list_and_create() {
    let router = Router::new().route(
        "/v1/bucket",
        get(|| async { Json(serde_json::json!({"buckets": [{"bucketId": 11, "name": "docs"}]})) })
            .post(|Json(body): Json<serde_json::Value>| async move {
                Json(serde_json::json!({"bucket": {"bucketId": 12, "name": body["name"]}}))
            }),
    );
    let base = spawn_server(router).await;
    let client = groundx(&base);

    let buckets = client.list_buckets().await.unwrap();
    assert_eq!(buckets[0].id, BucketId(11));

    let created = client.create_bucket("fresh").await.unwrap();
    assert_eq!(created.id, BucketId(12));
    assert_eq!(created.name, "fresh");
}

#[tokio::test]
async fn groundx_ingest_returns_status() {
    let router = Router::new().route(
        "/v1/ingest/documents/remote",
        post(|Json(body): Json<serde_json::Value>| async move {
            assert_eq!(body["documents"][0]["bucketId"], 4);
            assert_eq!(body["documents"][0]["fileType"], "txt");
            Json(serde_json::json!({"ingest": {"processId": "p-1", "status": "queued"}}))
        }),
    );
    let base = spawn_server(router).await;

    let file = FileDescriptor {
        source_url: "https://x.io/a".into(),
        file_name: "x.io_a.txt".into(),
        file_type: "txt".into(),
        metadata: serde_json::Map::new(),
    };
    let response = groundx(&base).ingest(BucketId(4), &file).await.unwrap();
    assert_eq!(response.status, "queued");
    assert_eq!(response.process_id.as_deref(), Some("p-1"));
}

#[tokio::test]
async fn groundx_api_error_keeps_status() {
    let router = Router::new().route(
        "/v1/bucket",
        get(|| async { (StatusCode::FORBIDDEN, "bad key") }),
    );
    let base = spawn_server(router).await;

    match groundx(&base).list_buckets().await {
        Err(IndexError::Api {
            status_code,
            message,
        }) => {
            assert_eq!(status_code, 403);
            assert_eq!(message, "bad key");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn groundx_unreachable_is_network_error() {
    let err = groundx(&closed_port_url()).list_buckets().await.unwrap_err();
    assert!(matches!(err, IndexError::Network(_)));
}
