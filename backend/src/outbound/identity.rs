//! Identity resolver adapters.
//!
//! Two implementations of the same port: a static token map for development
//! and tests, and a reqwest-backed verifier client for deployments with a
//! real identity provider.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{IdentityResolver, IdentityResolverError};
use crate::domain::{Credential, UserId};

/// Resolver backed by a fixed token→user map.
///
/// An empty map rejects every credential, which is the safe default when no
/// verifier endpoint is configured.
#[derive(Debug, Default, Clone)]
pub struct StaticIdentityResolver {
    tokens: HashMap<String, UserId>,
}

impl StaticIdentityResolver {
    /// Resolver that rejects every credential.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a resolver from token/user pairs.
    pub fn from_pairs<I, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, UserId)>,
        T: Into<String>,
    {
        Self {
            tokens: pairs
                .into_iter()
                .map(|(token, user)| (token.into(), user))
                .collect(),
        }
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn resolve(&self, credential: &Credential) -> Result<UserId, IdentityResolverError> {
        self.tokens
            .get(credential.token())
            .cloned()
            .ok_or_else(|| IdentityResolverError::invalid_credential("unknown token"))
    }
}

#[derive(Serialize)]
struct VerifyRequestDto<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
struct VerifyResponseDto {
    uid: String,
}

/// Resolver that posts the token to an external verifier endpoint.
///
/// Owns transport details only: request serialisation, timeout, and HTTP
/// status mapping.
pub struct HttpIdentityResolver {
    client: Client,
    endpoint: Url,
}

impl HttpIdentityResolver {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl IdentityResolver for HttpIdentityResolver {
    async fn resolve(&self, credential: &Credential) -> Result<UserId, IdentityResolverError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&VerifyRequestDto {
                token: credential.token(),
            })
            .send()
            .await
            .map_err(|err| IdentityResolverError::unavailable(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(IdentityResolverError::invalid_credential(
                "verifier rejected the token",
            ));
        }
        if !status.is_success() {
            return Err(IdentityResolverError::unavailable(format!(
                "verifier answered {status}"
            )));
        }

        let body: VerifyResponseDto = response
            .json()
            .await
            .map_err(|err| IdentityResolverError::unavailable(err.to_string()))?;
        UserId::new(body.uid).map_err(|err| {
            IdentityResolverError::unavailable(format!("verifier returned an unusable uid: {err}"))
        })
    }
}
