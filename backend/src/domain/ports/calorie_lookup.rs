//! Port for the optional calorie enrichment lookup.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by calorie lookup adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalorieLookupError {
    /// The lookup source could not be reached.
    #[error("calorie lookup unavailable: {message}")]
    Unavailable {
        /// Adapter-supplied context.
        message: String,
    },
}

impl CalorieLookupError {
    /// Convenience constructor for [`CalorieLookupError::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Port for estimating kilocalories from a food label.
///
/// A miss is `Ok(None)`, never an error: enrichment is decoration, and the
/// pipeline degrades lookup failures to an absent field as well.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalorieLookup: Send + Sync {
    /// Estimated kilocalories for the label, when known.
    async fn lookup(&self, label: &str) -> Result<Option<u32>, CalorieLookupError>;
}

/// Fixture lookup that knows nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpCalorieLookup;

#[async_trait]
impl CalorieLookup for NoOpCalorieLookup {
    async fn lookup(&self, _label: &str) -> Result<Option<u32>, CalorieLookupError> {
        Ok(None)
    }
}
