//! Bearer-credential extraction.
//!
//! Keep handlers free of header parsing: the extractor yields a validated
//! domain [`Credential`] or rejects the request with `401` before any
//! service runs. Resolution of the token itself happens inside the services
//! so that failed resolutions still reach the audit trail.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use futures_util::future::{Ready, ready};

use crate::domain::{Credential, CredentialParseError, Error};
use crate::inbound::http::error::ApiError;

/// Extractor wrapping the `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct BearerCredential(Credential);

impl BearerCredential {
    /// The parsed credential.
    pub fn into_inner(self) -> Credential {
        self.0
    }
}

fn map_parse_error(err: CredentialParseError) -> ApiError {
    ApiError::from(Error::unauthorized(err.to_string()))
}

impl FromRequest for BearerCredential {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        ready(
            Credential::from_authorization_header(header)
                .map(Self)
                .map_err(map_parse_error),
        )
    }
}
