//! Common test utilities: an in-process mock gateway.
//!
//! Tests script an axum router with the responses they need and point a
//! real `GatewayClient` at it over a local socket. Every request that
//! reaches the mock is counted, so tests can assert that local
//! pre-validation issued no network call at all.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;

use promptcards::{AuthSession, User};

/// Mock backend bound to an OS-assigned local port.
pub struct MockGateway {
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl MockGateway {
    /// Serve the router on a fresh port, counting every incoming request.
    pub async fn serve(router: Router) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = router.layer(middleware::from_fn_with_state(
            hits.clone(),
            count_requests,
        ));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock gateway");
        let addr = listener.local_addr().expect("mock gateway addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock gateway");
        });

        Self {
            url: format!("http://{addr}"),
            hits,
        }
    }

    /// Number of requests that reached the mock.
    pub fn request_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn count_requests(
    State(hits): State<Arc<AtomicUsize>>,
    request: Request,
    next: Next,
) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    next.run(request).await
}

/// Auth session fixture matching the mock's hard-coded token.
pub fn test_auth() -> AuthSession {
    AuthSession {
        token: "tok-1".to_string(),
        user: User {
            id: "u1".to_string(),
            email: "student@example.com".to_string(),
        },
    }
}

/// JSON for one wire-format flashcard.
pub fn card_json(id: Option<&str>, front: &str, difficulty: &str) -> serde_json::Value {
    let mut card = serde_json::json!({
        "front": front,
        "back": format!("{front} (answer)"),
        "category": "Test",
        "difficulty": difficulty,
    });
    if let Some(id) = id {
        card["id"] = serde_json::Value::String(id.to_string());
    }
    card
}
