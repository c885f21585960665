//! Error-mapping helpers shared by the domain services.

use serde_json::json;

use crate::domain::error::Error;
use crate::domain::ports::{IdentityResolverError, InferenceEngineError};
use crate::domain::upload::ImageUploadError;

pub(crate) fn map_identity_error(error: IdentityResolverError) -> Error {
    match error {
        IdentityResolverError::InvalidCredential { message } => Error::unauthorized(message),
        IdentityResolverError::Unavailable { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
    }
}

pub(crate) fn map_engine_error(error: InferenceEngineError) -> Error {
    match error {
        InferenceEngineError::Unavailable { message } => {
            Error::inference_failed(format!("inference engine unreachable: {message}"))
        }
        InferenceEngineError::Failed { message } => Error::inference_failed(message),
    }
}

pub(crate) fn map_upload_error(error: ImageUploadError) -> Error {
    match &error {
        ImageUploadError::Empty => {
            Error::invalid_request(error.to_string()).with_details(json!({ "code": "empty" }))
        }
        ImageUploadError::TooLarge { limit } => Error::invalid_request(error.to_string())
            .with_details(json!({ "code": "too_large", "limitBytes": limit })),
        ImageUploadError::Undecodable => {
            Error::invalid_request(error.to_string()).with_details(json!({ "code": "undecodable" }))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(
        map_identity_error(IdentityResolverError::invalid_credential("expired")),
        ErrorCode::Unauthorized
    )]
    #[case(
        map_identity_error(IdentityResolverError::unavailable("timeout")),
        ErrorCode::ServiceUnavailable
    )]
    #[case(
        map_engine_error(InferenceEngineError::unavailable("refused")),
        ErrorCode::InferenceFailed
    )]
    #[case(
        map_engine_error(InferenceEngineError::failed("no detection")),
        ErrorCode::InferenceFailed
    )]
    #[case(map_upload_error(ImageUploadError::Empty), ErrorCode::InvalidRequest)]
    #[case(map_upload_error(ImageUploadError::Undecodable), ErrorCode::InvalidRequest)]
    fn mappings_pick_the_stable_code(#[case] err: Error, #[case] expected: ErrorCode) {
        assert_eq!(err.code(), expected);
    }
}
