//! Integration tests for the generate flow against a mocked backend.
//!
//! Exercises the full path: session snapshot, HTTP round trip, status update.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use neura_client::{shared, ClientConfig, GenerationBackend, GenerationClient, GenerationFlow};
use neura_core::api::UNREACHABLE_MESSAGE;
use neura_core::{GenerateRequest, GenerationFailure, GenerationStatus, Session, ToolMode};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Backend that counts calls and answers after a short pause.
struct CountingBackend {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl GenerationBackend for CountingBackend {
    async fn generate(&self, _request: &GenerateRequest) -> Result<String, GenerationFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok("painted".to_string())
    }
}

fn flow_for(server: &MockServer) -> GenerationFlow<GenerationClient> {
    let client = GenerationClient::new(&ClientConfig::new(server.uri())).expect("client");
    GenerationFlow::new(client)
}

// ===========================================================================
// Success and failure reach the session
// ===========================================================================

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn test_success_replaces_previous_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "generated_image": "X" })))
        .mount(&server)
        .await;

    let mut session = Session::new(32, 32).expect("session");
    let _ = session.begin_generation();
    session.finish_generation(Err(GenerationFailure::Server { message: None }));
    let session = shared(session);

    let status = flow_for(&server).generate(&session).await.expect("sent");

    assert_eq!(
        status,
        GenerationStatus::Completed {
            image: "X".to_string()
        }
    );
    let guard = session.lock().expect("lock");
    assert!(guard.status().error_message().is_none());
    assert!(!guard.is_generating());
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn test_server_error_is_shown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Missing image_data" })),
        )
        .mount(&server)
        .await;

    let session = shared(Session::new(16, 16).expect("session"));
    let status = flow_for(&server).generate(&session).await.expect("sent");

    assert_eq!(status.error_message(), Some("Missing image_data"));
    assert!(status.output_image().is_none());
}

#[tokio::test]
async fn test_unreachable_backend_ends_in_progress() {
    let port = portpicker::pick_unused_port().expect("no available port");
    let client = GenerationClient::new(&ClientConfig::new(format!("http://127.0.0.1:{port}")))
        .expect("client");
    let session = shared(Session::new(16, 16).expect("session"));

    let status = GenerationFlow::new(client)
        .generate(&session)
        .await
        .expect("sent");

    assert_eq!(status.error_message(), Some(UNREACHABLE_MESSAGE));
    assert!(!session.lock().expect("lock").is_generating());
}

// ===========================================================================
// At most one outstanding request
// ===========================================================================

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn test_concurrent_generate_sends_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "generated_image": "once" }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = shared(Session::new(16, 16).expect("session"));
    let flow = flow_for(&server);

    let (first, second) = tokio::join!(flow.generate(&session), flow.generate(&session));

    assert_eq!(
        first.and_then(|s| s.output_image().map(str::to_string)),
        Some("once".to_string())
    );
    assert!(second.is_none());
}

#[tokio::test]
async fn test_generate_after_completion_sends_again() {
    let calls = Arc::new(AtomicUsize::new(0));
    let flow = GenerationFlow::new(CountingBackend {
        calls: Arc::clone(&calls),
    });
    let session = shared(Session::new(16, 16).expect("session"));

    assert!(flow.generate(&session).await.is_some());
    assert!(flow.generate(&session).await.is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ===========================================================================
// The sketch stays editable while a request is outstanding
// ===========================================================================

#[tokio::test]
async fn test_drawing_during_outstanding_request() {
    let calls = Arc::new(AtomicUsize::new(0));
    let flow = GenerationFlow::new(CountingBackend {
        calls: Arc::clone(&calls),
    });
    let session = shared(Session::new(40, 40).expect("session"));

    let draw = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let mut guard = session.lock().expect("lock");
        assert!(guard.is_generating());
        guard.set_mode(ToolMode::Draw);
        let surface = guard.surface_mut();
        surface.begin_stroke(2.0, 2.0);
        let changed = surface.extend_stroke(30.0, 30.0);
        surface.end_stroke();
        changed
    };

    let (status, changed) = tokio::join!(flow.generate(&session), draw);

    assert!(changed > 0);
    assert_eq!(
        status.and_then(|s| s.output_image().map(str::to_string)),
        Some("painted".to_string())
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_clear_during_request_keeps_progress() {
    let flow = GenerationFlow::new(CountingBackend {
        calls: Arc::new(AtomicUsize::new(0)),
    });
    let session = shared(Session::new(16, 16).expect("session"));

    let clear = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let mut guard = session.lock().expect("lock");
        guard.clear();
        guard.is_generating()
    };

    let (status, still_generating) = tokio::join!(flow.generate(&session), clear);

    assert!(still_generating);
    assert!(matches!(status, Some(GenerationStatus::Completed { .. })));
}
