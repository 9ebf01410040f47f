//! Hubhook - extraction and verification of signed inbound webhooks.
//!
//! Senders sign the raw request body with HMAC (SHA-1 or SHA-256) and send
//! the digest as `<algorithm>=<hex>` in a header, alongside an event kind and
//! a delivery id. This crate turns such a request into an [`Envelope`] and
//! authenticates it.
//!
//! ## Flow
//!
//! ```text
//! Request → Extractor → Envelope → Verifier → accepted | VerificationError
//! ```
//!
//! The library performs no logging and places no cap on body size; the
//! `web` module is a reference receiver that does both.

pub mod algorithm;
pub mod config;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod hook;
pub mod signature;
pub mod web;

// Re-export commonly used types
pub use algorithm::Algorithm;
pub use config::Config;
pub use envelope::Envelope;
pub use error::{ConfigError, ExtractionError, VerificationError};
pub use extract::Extractor;
pub use hook::{parse, VerifierConfig, WebhookVerifier};
pub use signature::{sign, verify, Verifier};
pub use web::AppState;
