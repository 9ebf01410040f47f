//! Supported HMAC algorithms and their wire conventions.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use http::HeaderName;
use sha1::Sha1;
use sha2::Sha256;

use crate::error::ConfigError;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Largest digest produced by any supported algorithm.
pub(crate) const MAX_DIGEST_SIZE: usize = 32;

/// Hash function used to sign webhook bodies.
///
/// Chosen once per verifier. A SHA-1 verifier never accepts a `sha256=`
/// header and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Legacy `X-Hub-Signature` signing.
    Sha1,
    /// `X-Hub-Signature-256` signing.
    Sha256,
}

impl Algorithm {
    /// Lowercase algorithm name as it appears on the wire.
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha256 => "sha256",
        }
    }

    /// Literal that every signature header starts with, e.g. `sha256=`.
    pub const fn prefix(self) -> &'static str {
        match self {
            Algorithm::Sha1 => "sha1=",
            Algorithm::Sha256 => "sha256=",
        }
    }

    /// Raw digest length in bytes.
    pub const fn digest_size(self) -> usize {
        match self {
            Algorithm::Sha1 => 20,
            Algorithm::Sha256 => 32,
        }
    }

    /// Exact length of a well-formed signature header (45 or 71).
    pub const fn signature_len(self) -> usize {
        self.prefix().len() + 2 * self.digest_size()
    }

    /// Conventional signature header for this algorithm.
    pub fn default_header(self) -> HeaderName {
        match self {
            Algorithm::Sha1 => HeaderName::from_static("x-hub-signature"),
            Algorithm::Sha256 => HeaderName::from_static("x-hub-signature-256"),
        }
    }

    /// HMAC of `body` keyed with `secret`.
    pub(crate) fn mac(self, secret: &[u8], body: &[u8]) -> Vec<u8> {
        match self {
            Algorithm::Sha1 => {
                let mut mac =
                    HmacSha1::new_from_slice(secret).expect("HMAC can take key of any size");
                mac.update(body);
                mac.finalize().into_bytes().to_vec()
            }
            Algorithm::Sha256 => {
                let mut mac =
                    HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
                mac.update(body);
                mac.finalize().into_bytes().to_vec()
            }
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("sha1") {
            Ok(Algorithm::Sha1)
        } else if trimmed.eq_ignore_ascii_case("sha256") {
            Ok(Algorithm::Sha256)
        } else {
            Err(ConfigError::UnknownAlgorithm(s.to_string()))
        }
    }
}
