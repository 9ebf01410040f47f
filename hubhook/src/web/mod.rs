//! Reference HTTP receiver for signed webhooks.
//!
//! This module provides a thin web server that:
//! - Buffers inbound webhook bodies up to a configured limit
//! - Extracts and verifies each delivery
//! - Maps rejections to HTTP status codes
//!
//! What happens to an accepted payload is left to the embedding application.

pub mod handlers;

pub use handlers::{health, receive_webhook, rejection, AppState, HealthResponse, WebhookResponse};
