//! Error taxonomy for webhook extraction, verification and configuration.
//!
//! Every variant is terminal: nothing in this crate retries. Callers decide how
//! each kind maps to an HTTP status.

use std::io;

use thiserror::Error;

/// A request could not be turned into an [`Envelope`](crate::Envelope).
///
/// Variants are ordered the way the extractor checks them; only the first
/// failing check is ever reported.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The request method was not POST.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// The signature header was absent or empty.
    #[error("missing signature header")]
    MissingSignature,

    /// The event header was absent or empty.
    #[error("missing event header")]
    MissingEvent,

    /// The delivery-id header was absent or empty.
    #[error("missing delivery id header")]
    MissingDeliveryId,

    /// The body stream failed before it was fully drained.
    #[error("failed to read request body")]
    BodyRead(#[source] io::Error),
}

/// Failure of the full extract-then-verify pipeline.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The signature did not authenticate the body.
    ///
    /// Wrong length, wrong prefix, bad hex and MAC mismatch all land here so
    /// that a sender cannot tell which check rejected it.
    #[error("invalid signature")]
    InvalidSignature,
}

/// Invalid deployment configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("webhook secret is not configured")]
    MissingSecret,

    #[error("unknown signature algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),
}
