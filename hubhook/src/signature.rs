//! Hub-style webhook signature verification.
//!
//! The sender signs the raw request body with HMAC and sends
//! `<algorithm>=<hex digest>` in a header. Verification recomputes the digest
//! and compares it in constant time. Malformed headers are rejected before any
//! hex decoding is attempted, and no path panics on attacker input.

use std::fmt;

use subtle::ConstantTimeEq;

use crate::algorithm::{Algorithm, MAX_DIGEST_SIZE};

/// Verify a signature header against a body.
///
/// # Arguments
///
/// * `algorithm` - Hash function the deployment is configured for
/// * `secret` - Shared webhook secret
/// * `signature` - Signature header exactly as received
/// * `body` - Raw body bytes the sender signed
///
/// # Returns
///
/// `true` only if the header is well-formed and its digest matches.
pub fn verify(algorithm: Algorithm, secret: &[u8], signature: &str, body: &[u8]) -> bool {
    let prefix = algorithm.prefix();
    if signature.len() != algorithm.signature_len() || !signature.starts_with(prefix) {
        return false;
    }

    let mut buf = [0u8; MAX_DIGEST_SIZE];
    let provided = &mut buf[..algorithm.digest_size()];
    if hex::decode_to_slice(&signature[prefix.len()..], provided).is_err() {
        return false;
    }

    let expected = algorithm.mac(secret, body);
    constant_time_eq(&expected, provided)
}

/// Build the signature header a sender would attach to `body`.
pub fn sign(algorithm: Algorithm, secret: &[u8], body: &[u8]) -> String {
    format!("{}{}", algorithm.prefix(), hex::encode(algorithm.mac(secret, body)))
}

/// Constant-time slice comparison.
///
/// Lengths are public (fixed by the algorithm), only contents are compared in
/// fixed time.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Verifier bound to one algorithm and one secret.
///
/// Read-only after construction, so a single instance can be shared across
/// concurrent requests.
#[derive(Clone)]
pub struct Verifier {
    algorithm: Algorithm,
    secret: Vec<u8>,
}

impl Verifier {
    pub fn new(algorithm: Algorithm, secret: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm,
            secret: secret.into(),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn verify(&self, signature: &str, body: &[u8]) -> bool {
        verify(self.algorithm, &self.secret, signature, body)
    }

    pub fn sign(&self, body: &[u8]) -> String {
        sign(self.algorithm, &self.secret, body)
    }
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier")
            .field("algorithm", &self.algorithm)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
