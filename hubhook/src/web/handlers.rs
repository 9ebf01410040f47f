//! Webhook endpoint handlers.
//!
//! The receiver is a caller of the library: it buffers the body up to the
//! configured limit, runs the extract-then-verify pipeline and maps the
//! outcome to an HTTP status. It does not dispatch on event kind.

use std::error::Error as StdError;
use std::io::{self, Cursor};
use std::sync::Arc;

use axum::{
    body::{self, Bytes},
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use http_body_util::LengthLimitError;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ExtractionError, VerificationError};
use crate::extract::is_post;
use crate::hook::WebhookVerifier;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub hook: Arc<WebhookVerifier>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(hook: WebhookVerifier, max_body_bytes: usize) -> Self {
        Self {
            hook: Arc::new(hook),
            max_body_bytes,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Webhook
// =============================================================================

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

impl WebhookResponse {
    fn rejected(status: &'static str) -> Self {
        Self {
            status,
            delivery_id: None,
            event: None,
        }
    }
}

/// Status code and response label for a rejected request.
pub fn rejection(err: &VerificationError) -> (StatusCode, &'static str) {
    match err {
        VerificationError::Extraction(ExtractionError::MethodNotAllowed) => {
            (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed")
        }
        VerificationError::Extraction(ExtractionError::MissingSignature) => {
            (StatusCode::BAD_REQUEST, "missing_signature")
        }
        VerificationError::Extraction(ExtractionError::MissingEvent) => {
            (StatusCode::BAD_REQUEST, "missing_event")
        }
        VerificationError::Extraction(ExtractionError::MissingDeliveryId) => {
            (StatusCode::BAD_REQUEST, "missing_delivery_id")
        }
        VerificationError::Extraction(ExtractionError::BodyRead(_)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "body_read_failed")
        }
        VerificationError::InvalidSignature => (StatusCode::UNAUTHORIZED, "invalid_signature"),
    }
}

/// Whether a buffering error came from the body size limit.
fn exceeds_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

fn reject(err: VerificationError) -> Response {
    let (code, label) = rejection(&err);
    warn!(
        error = %err,
        status = code.as_u16(),
        "webhook_rejected"
    );
    (code, Json(WebhookResponse::rejected(label))).into_response()
}

/// Webhook endpoint.
///
/// This endpoint:
/// 1. Rejects non-POST requests before touching the body
/// 2. Buffers at most `max_body_bytes` of body
/// 3. Extracts and verifies the delivery
/// 4. Returns 200 with the delivery id, or the mapped rejection
pub async fn receive_webhook(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    if !is_post(&parts.method) {
        return reject(ExtractionError::MethodNotAllowed.into());
    }

    let bytes: Bytes = match body::to_bytes(body, state.max_body_bytes).await {
        Ok(b) => b,
        Err(e) if exceeds_limit(&e) => {
            warn!(
                max_body_bytes = state.max_body_bytes,
                "webhook_body_too_large"
            );
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(WebhookResponse::rejected("payload_too_large")),
            )
                .into_response();
        }
        Err(e) => return reject(ExtractionError::BodyRead(io::Error::other(e)).into()),
    };

    info!(
        method = %parts.method,
        body_length = bytes.len(),
        "webhook_received"
    );

    let request = http::Request::from_parts(parts, Cursor::new(bytes));

    match state.hook.parse(request) {
        Ok(envelope) => {
            info!(
                delivery_id = %envelope.id(),
                event = %envelope.event(),
                payload_length = envelope.payload().len(),
                "webhook_accepted"
            );
            (
                StatusCode::OK,
                Json(WebhookResponse {
                    status: "accepted",
                    delivery_id: Some(envelope.id().to_string()),
                    event: Some(envelope.event().to_string()),
                }),
            )
                .into_response()
        }
        Err(err) => reject(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Algorithm;
    use crate::hook::VerifierConfig;
    use crate::signature::sign;
    use axum::body::Body;

    const SECRET: &[u8] = b"foobar";

    fn state(max_body_bytes: usize) -> AppState {
        AppState::new(
            WebhookVerifier::new(VerifierConfig::new(Algorithm::Sha256, SECRET)),
            max_body_bytes,
        )
    }

    fn webhook(method: &str, signature: &str, body: &'static str) -> Request {
        http::Request::builder()
            .method(method)
            .uri("/webhooks")
            .header("x-hub-signature-256", signature)
            .header("x-github-event", "push")
            .header("x-github-delivery", "abc-123")
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let Json(response) = health().await;
        assert_eq!(response.status, "ok");
    }

    #[tokio::test]
    async fn test_accepts_valid_webhook() {
        let sig = sign(Algorithm::Sha256, SECRET, b"{}");
        let response = receive_webhook(State(state(1024)), webhook("POST", &sig, "{}")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "accepted");
        assert_eq!(json["delivery_id"], "abc-123");
        assert_eq!(json["event"], "push");
    }

    #[tokio::test]
    async fn test_rejects_get() {
        let response = receive_webhook(State(state(1024)), webhook("GET", "sig", "")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_rejects_bad_signature() {
        let sig = sign(Algorithm::Sha256, b"wrong", b"{}");
        let response = receive_webhook(State(state(1024)), webhook("POST", &sig, "{}")).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = json_body(response).await;
        assert_eq!(json["status"], "invalid_signature");
        assert!(json.get("delivery_id").is_none());
    }

    #[tokio::test]
    async fn test_rejects_missing_signature() {
        let request = http::Request::builder()
            .method("POST")
            .uri("/webhooks")
            .body(Body::from("{}"))
            .unwrap();
        let response = receive_webhook(State(state(1024)), request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["status"], "missing_signature");
    }

    #[tokio::test]
    async fn test_rejects_oversized_body() {
        let body = "{\"padding\":\"0123456789\"}";
        let sig = sign(Algorithm::Sha256, SECRET, body.as_bytes());
        let response = receive_webhook(State(state(8)), webhook("POST", &sig, body)).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_get_with_large_body_is_method_not_allowed() {
        let response =
            receive_webhook(State(state(4)), webhook("GET", "sig", "0123456789")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json_body(response).await["status"], "method_not_allowed");
    }

    #[tokio::test]
    async fn test_body_stream_failure_is_body_read_failed() {
        let chunks: Vec<Result<Bytes, io::Error>> = vec![
            Ok(Bytes::from_static(b"{")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
        ];
        let request = http::Request::builder()
            .method("POST")
            .uri("/webhooks")
            .header("x-hub-signature-256", "sig")
            .header("x-github-event", "push")
            .header("x-github-delivery", "abc-123")
            .body(Body::from_stream(futures::stream::iter(chunks)))
            .unwrap();

        let response = receive_webhook(State(state(1024)), request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["status"], "body_read_failed");
    }

    #[test]
    fn test_rejection_mapping() {
        let cases: [(VerificationError, StatusCode); 6] = [
            (ExtractionError::MethodNotAllowed.into(), StatusCode::METHOD_NOT_ALLOWED),
            (ExtractionError::MissingSignature.into(), StatusCode::BAD_REQUEST),
            (ExtractionError::MissingEvent.into(), StatusCode::BAD_REQUEST),
            (ExtractionError::MissingDeliveryId.into(), StatusCode::BAD_REQUEST),
            (
                ExtractionError::BodyRead(io::Error::other("boom")).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (VerificationError::InvalidSignature, StatusCode::UNAUTHORIZED),
        ];

        for (err, expected) in cases {
            assert_eq!(rejection(&err).0, expected, "{err}");
        }
    }
}
