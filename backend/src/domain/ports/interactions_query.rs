//! Driving port for the interaction audit history.

use async_trait::async_trait;

use crate::domain::auth::Credential;
use crate::domain::error::Error;
use crate::domain::interaction::Interaction;

/// Use-case trait for reading a caller's own audit trail.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteractionsQuery: Send + Sync {
    /// The caller's recorded interactions, insertion order.
    async fn list(&self, credential: &Credential) -> Result<Vec<Interaction>, Error>;
}
