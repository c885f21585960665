//! HTTP server configuration read from the environment.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

use backend::domain::{MAX_IMAGE_BYTES, UserId};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MODEL_TIMEOUT_SECONDS: u64 = 60;
const DEFAULT_VERIFIER_TIMEOUT_SECONDS: u64 = 10;

/// Runtime configuration for the server binary.
///
/// Everything comes from environment variables:
///
/// - `BIND_ADDR` — listen address (default `0.0.0.0:8080`)
/// - `MODEL_ENDPOINT` — model-server URL; fixture engine when unset
/// - `MODEL_TIMEOUT_SECONDS` — inference request timeout (default 60)
/// - `TOKEN_VERIFIER_ENDPOINT` — identity verifier URL
/// - `TOKEN_VERIFIER_TIMEOUT_SECONDS` — verifier request timeout (default 10)
/// - `AUTH_TOKENS` — `token:uid` pairs, comma separated, used when no
///   verifier endpoint is configured
/// - `MAX_UPLOAD_BYTES` — upload cap (default 50 MiB)
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) model_endpoint: Option<Url>,
    pub(crate) model_timeout: Duration,
    pub(crate) verifier_endpoint: Option<Url>,
    pub(crate) verifier_timeout: Duration,
    pub(crate) static_tokens: Vec<(String, UserId)>,
    pub(crate) max_upload_bytes: usize,
}

fn invalid(name: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("invalid {name}: {err}"))
}

fn optional_url(name: &str) -> std::io::Result<Option<Url>> {
    match env::var(name) {
        Ok(raw) => Url::parse(&raw).map(Some).map_err(|e| invalid(name, e)),
        Err(_) => Ok(None),
    }
}

fn seconds(name: &str, default: u64) -> std::io::Result<Duration> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| invalid(name, e)),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

/// Parse `token:uid` pairs out of an `AUTH_TOKENS`-style value.
pub(crate) fn parse_token_pairs(raw: &str) -> Result<Vec<(String, UserId)>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (token, uid) = entry
                .split_once(':')
                .ok_or_else(|| format!("entry {entry:?} is not of the form token:uid"))?;
            if token.is_empty() {
                return Err(format!("entry {entry:?} has an empty token"));
            }
            let user = UserId::new(uid).map_err(|e| format!("entry {entry:?}: {e}"))?;
            Ok((token.to_owned(), user))
        })
        .collect()
}

impl ServerConfig {
    /// Assemble the configuration from the process environment.
    pub fn from_env() -> std::io::Result<Self> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned())
            .parse::<SocketAddr>()
            .map_err(|e| invalid("BIND_ADDR", e))?;

        let static_tokens = match env::var("AUTH_TOKENS") {
            Ok(raw) => parse_token_pairs(&raw).map_err(|e| invalid("AUTH_TOKENS", e))?,
            Err(_) => Vec::new(),
        };

        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(raw) => raw
                .parse::<usize>()
                .map_err(|e| invalid("MAX_UPLOAD_BYTES", e))?,
            Err(_) => MAX_IMAGE_BYTES,
        };

        Ok(Self {
            bind_addr,
            model_endpoint: optional_url("MODEL_ENDPOINT")?,
            model_timeout: seconds("MODEL_TIMEOUT_SECONDS", DEFAULT_MODEL_TIMEOUT_SECONDS)?,
            verifier_endpoint: optional_url("TOKEN_VERIFIER_ENDPOINT")?,
            verifier_timeout: seconds(
                "TOKEN_VERIFIER_TIMEOUT_SECONDS",
                DEFAULT_VERIFIER_TIMEOUT_SECONDS,
            )?,
            static_tokens,
            max_upload_bytes,
        })
    }

    /// The socket address the server will bind to.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
