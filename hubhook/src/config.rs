//! Configuration module for environment variable parsing.
//!
//! Reads the receiver's settings from environment variables. Numeric values
//! fall back to defaults with a warning; verification settings are validated
//! by [`Config::verifier_config`] so a bad deployment fails at startup.

use std::env;
use std::str::FromStr;

use http::HeaderName;
use tracing::warn;

use crate::algorithm::Algorithm;
use crate::error::ConfigError;
use crate::extract::{DEFAULT_DELIVERY_HEADER, DEFAULT_EVENT_HEADER};
use crate::hook::VerifierConfig;

/// Default maximum accepted body size (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Shared secret used to sign webhook bodies
    pub webhook_secret: Option<String>,

    /// Signature algorithm name (`sha1` or `sha256`)
    pub algorithm: String,

    /// Signature header; defaults to the algorithm's conventional header
    pub signature_header: Option<String>,

    /// Header carrying the event kind
    pub event_header: String,

    /// Header carrying the delivery id
    pub delivery_header: String,

    /// Largest body the receiver buffers before verification
    pub max_body_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: parse_or("PORT", 8080),

            webhook_secret: env::var("WEBHOOK_SECRET").ok(),

            algorithm: env::var("WEBHOOK_ALGORITHM").unwrap_or_else(|_| "sha256".to_string()),

            signature_header: env::var("WEBHOOK_SIGNATURE_HEADER")
                .ok()
                .filter(|s| !s.trim().is_empty()),

            event_header: env::var("WEBHOOK_EVENT_HEADER")
                .unwrap_or_else(|_| DEFAULT_EVENT_HEADER.to_string()),

            delivery_header: env::var("WEBHOOK_DELIVERY_HEADER")
                .unwrap_or_else(|_| DEFAULT_DELIVERY_HEADER.to_string()),

            max_body_bytes: parse_or("WEBHOOK_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES),
        }
    }

    /// Validate and convert into verifier settings.
    pub fn verifier_config(&self) -> Result<VerifierConfig, ConfigError> {
        let secret = self
            .webhook_secret
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        let algorithm = Algorithm::from_str(&self.algorithm)?;

        let signature_header = match &self.signature_header {
            Some(name) => header_name(name)?,
            None => algorithm.default_header(),
        };

        Ok(VerifierConfig::new(algorithm, secret.as_bytes())
            .with_signature_header(signature_header)
            .with_event_header(header_name(&self.event_header)?)
            .with_delivery_header(header_name(&self.delivery_header)?))
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("webhook_secret_set", &self.webhook_secret.is_some())
            .field("algorithm", &self.algorithm)
            .field("signature_header", &self.signature_header)
            .field("event_header", &self.event_header)
            .field("delivery_header", &self.delivery_header)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

fn header_name(raw: &str) -> Result<HeaderName, ConfigError> {
    HeaderName::from_bytes(raw.trim().as_bytes())
        .map_err(|_| ConfigError::InvalidHeaderName(raw.to_string()))
}

/// Parse an environment variable, warning and falling back on bad input.
fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}
