//! Port for resolving a bearer credential into a caller identity.
//!
//! The identity provider is an external collaborator; the core only depends
//! on this contract and must invoke it before any other business logic.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::auth::Credential;
use crate::domain::user::UserId;

/// Errors raised by identity resolver adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityResolverError {
    /// The credential was rejected by the identity provider.
    #[error("credential rejected: {message}")]
    InvalidCredential {
        /// Adapter-supplied context.
        message: String,
    },
    /// The identity provider could not be reached.
    #[error("identity provider unavailable: {message}")]
    Unavailable {
        /// Adapter-supplied context.
        message: String,
    },
}

impl IdentityResolverError {
    /// Convenience constructor for [`IdentityResolverError::InvalidCredential`].
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::InvalidCredential {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`IdentityResolverError::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Port for credential resolution.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve a credential into the stable identity it belongs to.
    async fn resolve(&self, credential: &Credential) -> Result<UserId, IdentityResolverError>;
}

/// Fixture implementation that accepts every credential.
///
/// Test wiring only: resolves everything to one fixed identity.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityResolver;

/// Identity the fixture resolver hands out.
pub const FIXTURE_USER_ID: &str = "fixture-user";

#[async_trait]
impl IdentityResolver for FixtureIdentityResolver {
    async fn resolve(&self, _credential: &Credential) -> Result<UserId, IdentityResolverError> {
        UserId::new(FIXTURE_USER_ID)
            .map_err(|err| IdentityResolverError::unavailable(err.to_string()))
    }
}
