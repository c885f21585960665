//! Authentication primitives.
//!
//! Keep header parsing outside the handlers' bodies by exposing a validating
//! constructor the inbound adapter calls before anything talks to a port.

use std::fmt;

use zeroize::Zeroizing;

/// Domain error returned when a bearer credential cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialParseError {
    /// No `Authorization` header was supplied.
    MissingHeader,
    /// The header did not use the `Bearer` scheme.
    InvalidScheme,
    /// The bearer token was empty once trimmed.
    EmptyToken,
}

impl fmt::Display for CredentialParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "authorization header missing"),
            Self::InvalidScheme => write!(f, "authorization header must use the Bearer scheme"),
            Self::EmptyToken => write!(f, "bearer token must not be empty"),
        }
    }
}

impl std::error::Error for CredentialParseError {}

/// Opaque bearer credential presented by a caller.
///
/// The token is treated as a secret: it is zeroed on drop and redacted from
/// debug output. Resolution into a [`crate::domain::UserId`] is the identity
/// resolver port's job.
///
/// # Examples
/// ```
/// use backend::domain::Credential;
///
/// let cred = Credential::from_authorization_header(Some("Bearer abc123")).unwrap();
/// assert_eq!(cred.token(), "abc123");
/// ```
#[derive(Clone)]
pub struct Credential(Zeroizing<String>);

impl Credential {
    /// Construct a credential from a raw token.
    pub fn new(token: impl Into<String>) -> Result<Self, CredentialParseError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(CredentialParseError::EmptyToken);
        }
        Ok(Self(Zeroizing::new(token)))
    }

    /// Parse the value of an `Authorization` header.
    pub fn from_authorization_header(header: Option<&str>) -> Result<Self, CredentialParseError> {
        let header = header.ok_or(CredentialParseError::MissingHeader)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(CredentialParseError::InvalidScheme)?;
        Self::new(token)
    }

    /// The raw token presented by the caller.
    pub fn token(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
