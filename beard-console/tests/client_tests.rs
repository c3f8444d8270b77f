//! HTTP wire-contract tests against an in-process stub of the Beard server
//!
//! Tests cover:
//! - Request paths and JSON bodies of the three analysis endpoints
//! - Response decoding into the console view state
//! - Error statuses, undecodable bodies and unreachable servers
//! - Health check and method listing
//! - Event stream of a full submission

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use beard_common::{ConsoleEvent, EventBus, Lifecycle, Workflow};
use beard_console::models::{Decision, PhoneticBlockRequest};
use beard_console::render::{render_clustering, render_phonetic_block, render_prediction};
use beard_console::services::{BeardClient, PhoneticBlockService, ServiceError};
use beard_console::{Console, ConsoleError, SubmitOutcome};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Captured = Arc<Mutex<Option<Value>>>;

/// Serve `router` on an ephemeral local port and return its base URL
async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Route that records the JSON body it receives and answers with `reply`
fn capture_route(captured: &Captured, reply: Value) -> axum::routing::MethodRouter {
    let captured = captured.clone();
    post(move |Json(body): Json<Value>| {
        let captured = captured.clone();
        let reply = reply.clone();
        async move {
            *captured.lock().unwrap() = Some(body);
            Json(reply)
        }
    })
}

fn console_for(base_url: &str) -> Console {
    let client = BeardClient::new(base_url, Some(Duration::from_secs(5))).unwrap();
    Console::new(client, EventBus::new(100))
}

// =============================================================================
// Analysis endpoints
// =============================================================================

#[tokio::test]
async fn test_clusters_round_trip() {
    let captured = Captured::default();
    let router = Router::new().route(
        "/api/clustering/clusters",
        capture_route(
            &captured,
            json!({"0": ["Wang_1395222", "Wang_428605"], "1": ["Lin_428605"]}),
        ),
    );
    let console = console_for(&spawn_stub(router).await);

    console.orchestrator.load_sample_clusters().await.unwrap();
    let outcome = console.orchestrator.submit_clusters().await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Completed { stale: false, .. }));

    // Body carries both arrays with typed fields
    let body = captured.lock().unwrap().clone().unwrap();
    assert_eq!(body["signatures"].as_array().unwrap().len(), 3);
    assert_eq!(body["records"].as_array().unwrap().len(), 2);
    assert_eq!(body["signatures"][0]["signature_id"], "Wang_1395222");
    assert_eq!(body["signatures"][0]["publication_id"], 1395222);
    assert_eq!(body["records"][1]["year"], 1996);

    let html = render_clustering(&console.view().clustering().await);
    assert!(html.contains("<tr><th scope=\"row\">0</th><td>Wang_1395222, Wang_428605</td></tr>"));
    assert!(html.contains("<tr><th scope=\"row\">1</th><td>Lin_428605</td></tr>"));
}

#[tokio::test]
async fn test_phonetic_blocks_round_trip() {
    let captured = Captured::default();
    let router = Router::new().route(
        "/api/text/phonetic_blocks",
        capture_route(&captured, json!({"phonetic_blocks": {"John Smith": "SMIT-J"}})),
    );
    let console = console_for(&spawn_stub(router).await);

    console
        .view()
        .set_full_name(Some("John Smith".to_string()))
        .await;
    console.orchestrator.submit_phonetic_block().await.unwrap();

    assert_eq!(
        captured.lock().unwrap().clone().unwrap(),
        json!({"full_names": ["John Smith"]})
    );

    let label = render_phonetic_block(&console.view().phonetic_block().await);
    assert_eq!(label.text, "SMIT-J");
    assert_eq!(label.color.hex(), "#27ae60");
}

#[tokio::test]
async fn test_coreness_round_trip() {
    let captured = Captured::default();
    let router = Router::new().route(
        "/api/predictor/coreness",
        capture_route(
            &captured,
            json!({"decision": "Non-CORE", "scores": [-1.25, 1.375, -3.06]}),
        ),
    );
    let console = console_for(&spawn_stub(router).await);

    let view = console.view();
    view.set_publication_title(Some("Jets at the LHC".to_string()))
        .await;
    view.set_publication_abstract(Some("We study jets.".to_string()))
        .await;
    view.set_publication_category(Some("astro-ph, hep-ph".to_string()))
        .await;
    console.orchestrator.submit_predictor().await.unwrap();

    assert_eq!(
        captured.lock().unwrap().clone().unwrap(),
        json!({
            "title": "Jets at the LHC",
            "abstract": "We study jets.",
            "categories": ["astro-ph", "hep-ph"]
        })
    );

    let state = view.prediction().await;
    let label = render_prediction(&state);
    assert_eq!(label.text, "Non-CORE");
    assert_eq!(label.color.hex(), "#d35400");

    let result = state.result.unwrap();
    assert_eq!(result.decision, Decision::NonCore);
    assert_eq!(result.scores, vec![-1.25, 1.375, -3.06]);
}

#[tokio::test]
async fn test_clusters_body_keeps_record_keys() {
    let captured = Captured::default();
    let router = Router::new().route(
        "/api/clustering/clusters",
        capture_route(&captured, json!({"0": ["Smith_1"]})),
    );
    let console = console_for(&spawn_stub(router).await);

    let view = console.view();
    view.set_clustering_records(Some(
        r#"[{"title": "T", "publication_id": 1, "authors": ["A"],
            "keywords": ["jets"], "abstract": "We study jets."}]"#
            .to_string(),
    ))
    .await;
    view.set_clustering_signatures(Some(
        r#"[{"signature_id": "Smith_1", "publication_id": 1}]"#.to_string(),
    ))
    .await;
    console.orchestrator.submit_clusters().await.unwrap();

    let body = captured.lock().unwrap().clone().unwrap();
    assert_eq!(
        body["records"][0],
        json!({
            "title": "T",
            "publication_id": 1,
            "authors": ["A"],
            "keywords": ["jets"],
            "abstract": "We study jets."
        })
    );
    assert_eq!(body["signatures"][0], json!({"signature_id": "Smith_1", "publication_id": 1}));
}

#[tokio::test]
async fn test_empty_clustering_result() {
    let captured = Captured::default();
    let router = Router::new().route(
        "/api/clustering/clusters",
        capture_route(&captured, json!({})),
    );
    let console = console_for(&spawn_stub(router).await);

    console.orchestrator.load_sample_clusters().await.unwrap();
    console.orchestrator.submit_clusters().await.unwrap();

    let state = console.view().clustering().await;
    assert_eq!(state.lifecycle, Lifecycle::Done);
    assert!(state.result.as_ref().unwrap().clusters.is_empty());
    assert!(!render_clustering(&state).contains("<tr><th scope"));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_server_error_status() {
    let router = Router::new().route(
        "/api/predictor/coreness",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model not trained") }),
    );
    let console = console_for(&spawn_stub(router).await);
    console.orchestrator.load_sample_publication().await;

    let err = console.orchestrator.submit_predictor().await.unwrap_err();
    match err {
        ConsoleError::Service(ServiceError::Api(status, body)) => {
            assert_eq!(status, 500);
            assert_eq!(body, "model not trained");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let state = console.view().prediction().await;
    assert_eq!(state.lifecycle, Lifecycle::Failed);
    assert_eq!(render_prediction(&state).color.hex(), "#c0392b");
}

#[tokio::test]
async fn test_undecodable_body() {
    let router = Router::new().route(
        "/api/text/phonetic_blocks",
        post(|| async { "not json" }),
    );
    let client = BeardClient::new(spawn_stub(router).await, None).unwrap();

    let err = client
        .phonetic_blocks(&PhoneticBlockRequest::single("John Smith"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_server() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let console = console_for(&format!("http://{}", addr));
    console
        .view()
        .set_full_name(Some("John Smith".to_string()))
        .await;

    let err = console.orchestrator.submit_phonetic_block().await.unwrap_err();
    assert!(matches!(err, ConsoleError::Service(ServiceError::Network(_))));
    assert_eq!(
        console.view().lifecycle(Workflow::PhoneticBlock).await,
        Lifecycle::Failed
    );
}

// =============================================================================
// Health and method listing
// =============================================================================

#[tokio::test]
async fn test_ping() {
    let router = Router::new().route("/ping", get(|| async { "OK\n" }));
    let client = BeardClient::new(spawn_stub(router).await, None).unwrap();

    assert_eq!(client.ping().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_available_methods() {
    let router = Router::new().route(
        "/api/clustering/",
        get(|| async {
            Json(json!({"methods": {"clusters": "/api/clustering/clusters", "train": "/api/clustering/train"}}))
        }),
    );
    let client = BeardClient::new(spawn_stub(router).await, None).unwrap();

    let methods = client.available_methods(Workflow::Clustering).await.unwrap();
    assert_eq!(methods["methods"]["clusters"], "/api/clustering/clusters");

    // Unrouted service listing is an API error
    let err = client
        .available_methods(Workflow::Prediction)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Api(404, _)));
}

// =============================================================================
// Event stream
// =============================================================================

#[tokio::test]
async fn test_submission_event_sequence() {
    let captured = Captured::default();
    let router = Router::new().route(
        "/api/text/phonetic_blocks",
        capture_route(&captured, json!({"phonetic_blocks": {"John Smith": "SMIT-J"}})),
    );
    let console = console_for(&spawn_stub(router).await);
    let mut rx = console.events.subscribe();

    console.orchestrator.load_sample_phonetic_block().await;
    console.orchestrator.submit_phonetic_block().await.unwrap();

    let mut types = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let ConsoleEvent::WorkflowCompleted { stale, .. } = &event {
            assert!(!stale);
        }
        types.push(event.event_type());
    }

    assert_eq!(
        types,
        vec![
            "InputsChanged",
            "WorkflowSubmitted",
            "ProgressStarted",
            "WorkflowCompleted",
            "ProgressDone"
        ]
    );
}
