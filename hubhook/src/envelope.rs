//! The extracted webhook unit.

use serde::de::DeserializeOwned;

use crate::algorithm::Algorithm;
use crate::signature;

/// Identifying fields and raw body of one webhook delivery.
///
/// Fields are private so the envelope cannot change after extraction. The
/// payload holds the exact bytes read from the wire, which are the bytes the
/// sender signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    id: String,
    event: String,
    signature: String,
    payload: Vec<u8>,
}

impl Envelope {
    pub(crate) fn new(id: String, event: String, signature: String, payload: Vec<u8>) -> Self {
        Self {
            id,
            event,
            signature,
            payload,
        }
    }

    /// Sender-assigned delivery identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Event kind, e.g. `push`.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Signature header as received.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Body bytes exactly as they came off the wire.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Take ownership of the body, dropping the headers.
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Check this envelope's signature against `secret`.
    pub fn signed_by(&self, secret: &[u8], algorithm: Algorithm) -> bool {
        signature::verify(algorithm, secret, &self.signature, &self.payload)
    }

    /// Deserialize the JSON payload into `T`.
    ///
    /// Only meaningful once the envelope has been verified.
    pub fn decode<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.payload)
    }
}
