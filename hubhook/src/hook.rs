//! Extract-then-verify pipeline.

use std::fmt;
use std::io::Read;

use http::{HeaderName, Request};

use crate::algorithm::Algorithm;
use crate::envelope::Envelope;
use crate::error::{ExtractionError, VerificationError};
use crate::extract::{Extractor, DEFAULT_DELIVERY_HEADER, DEFAULT_EVENT_HEADER};
use crate::signature::Verifier;

/// Per-deployment verification settings, fixed at construction.
#[derive(Clone)]
pub struct VerifierConfig {
    pub algorithm: Algorithm,
    pub secret: Vec<u8>,
    pub signature_header: HeaderName,
    pub event_header: HeaderName,
    pub delivery_header: HeaderName,
}

impl VerifierConfig {
    /// Settings with the conventional header names for `algorithm`.
    pub fn new(algorithm: Algorithm, secret: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm,
            secret: secret.into(),
            signature_header: algorithm.default_header(),
            event_header: HeaderName::from_static(DEFAULT_EVENT_HEADER),
            delivery_header: HeaderName::from_static(DEFAULT_DELIVERY_HEADER),
        }
    }

    pub fn with_signature_header(mut self, name: HeaderName) -> Self {
        self.signature_header = name;
        self
    }

    pub fn with_event_header(mut self, name: HeaderName) -> Self {
        self.event_header = name;
        self
    }

    pub fn with_delivery_header(mut self, name: HeaderName) -> Self {
        self.delivery_header = name;
        self
    }
}

impl fmt::Debug for VerifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifierConfig")
            .field("algorithm", &self.algorithm)
            .field("secret", &"[REDACTED]")
            .field("signature_header", &self.signature_header)
            .field("event_header", &self.event_header)
            .field("delivery_header", &self.delivery_header)
            .finish()
    }
}

/// Extractor and verifier for one deployment.
///
/// Holds no mutable state; wrap in an `Arc` to share between requests.
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    extractor: Extractor,
    verifier: Verifier,
}

impl WebhookVerifier {
    pub fn new(config: VerifierConfig) -> Self {
        Self {
            extractor: Extractor::new(
                config.signature_header,
                config.event_header,
                config.delivery_header,
            ),
            verifier: Verifier::new(config.algorithm, config.secret),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.verifier.algorithm()
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Extract without verifying.
    pub fn extract<B: Read>(&self, request: Request<B>) -> Result<Envelope, ExtractionError> {
        self.extractor.extract(request)
    }

    /// Verify an already extracted envelope.
    pub fn verify(&self, envelope: &Envelope) -> bool {
        self.verifier.verify(envelope.signature(), envelope.payload())
    }

    /// Extract and verify.
    ///
    /// Extraction errors come back unchanged. Any verification failure is
    /// reported as [`VerificationError::InvalidSignature`] with no detail.
    pub fn parse<B: Read>(&self, request: Request<B>) -> Result<Envelope, VerificationError> {
        let envelope = self.extract(request)?;
        if !self.verify(&envelope) {
            return Err(VerificationError::InvalidSignature);
        }
        Ok(envelope)
    }
}

/// One-shot [`WebhookVerifier::parse`] for callers without a long-lived verifier.
pub fn parse<B: Read>(
    config: &VerifierConfig,
    request: Request<B>,
) -> Result<Envelope, VerificationError> {
    WebhookVerifier::new(config.clone()).parse(request)
}
