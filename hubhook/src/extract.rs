//! Pulling an unverified [`Envelope`] out of an HTTP request.
//!
//! The extractor takes the request by value: its body is a one-shot stream,
//! and once drained it belongs to the returned envelope.

use std::io::Read;

use http::{HeaderMap, HeaderName, Method, Request};

use crate::algorithm::Algorithm;
use crate::envelope::Envelope;
use crate::error::ExtractionError;

/// Default event header.
pub const DEFAULT_EVENT_HEADER: &str = "x-github-event";

/// Default delivery-id header.
pub const DEFAULT_DELIVERY_HEADER: &str = "x-github-delivery";

/// Reads the configured headers and body from a request.
#[derive(Debug, Clone)]
pub struct Extractor {
    signature_header: HeaderName,
    event_header: HeaderName,
    delivery_header: HeaderName,
}

impl Extractor {
    pub fn new(
        signature_header: HeaderName,
        event_header: HeaderName,
        delivery_header: HeaderName,
    ) -> Self {
        Self {
            signature_header,
            event_header,
            delivery_header,
        }
    }

    /// Extractor using the conventional header names for `algorithm`.
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        Self::new(
            algorithm.default_header(),
            HeaderName::from_static(DEFAULT_EVENT_HEADER),
            HeaderName::from_static(DEFAULT_DELIVERY_HEADER),
        )
    }

    pub fn signature_header(&self) -> &HeaderName {
        &self.signature_header
    }

    pub fn event_header(&self) -> &HeaderName {
        &self.event_header
    }

    pub fn delivery_header(&self) -> &HeaderName {
        &self.delivery_header
    }

    /// Extract an envelope, failing on the first missing piece.
    ///
    /// Checks run in order: method, signature, event, delivery id, body.
    /// The body is only read once every header check has passed.
    pub fn extract<B: Read>(&self, request: Request<B>) -> Result<Envelope, ExtractionError> {
        if !is_post(request.method()) {
            return Err(ExtractionError::MethodNotAllowed);
        }

        let headers = request.headers();
        let signature = required_header(headers, &self.signature_header)
            .ok_or(ExtractionError::MissingSignature)?;
        let event = required_header(headers, &self.event_header)
            .ok_or(ExtractionError::MissingEvent)?;
        let id = required_header(headers, &self.delivery_header)
            .ok_or(ExtractionError::MissingDeliveryId)?;

        let mut body = request.into_body();
        let mut payload = Vec::new();
        body.read_to_end(&mut payload).map_err(ExtractionError::BodyRead)?;

        Ok(Envelope::new(id, event, signature, payload))
    }
}

/// POST, compared without regard to ASCII case.
pub fn is_post(method: &Method) -> bool {
    method.as_str().eq_ignore_ascii_case("POST")
}

/// Non-empty header value as a string.
///
/// Any present, non-empty value counts, whatever its bytes. Invalid UTF-8 is
/// replaced rather than dropped, so a garbled signature still reaches the
/// verifier and fails there.
fn required_header(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .filter(|v| !v.is_empty())
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}
