//! Mapping of domain failures onto HTTP responses
//!
//! Authentication failures only reveal whether a credential was expired or
//! invalid. Internal details are logged and never returned.

use actix_web::{http::StatusCode, HttpResponse};
use tracing::error;
use validator::ValidationErrors;

use parley_core::{AuthError, DomainError, TokenError};
use parley_shared::errors::{error_codes, ErrorResponse};

/// Status code and JSON body for a domain error
pub fn error_body(error: &DomainError) -> (StatusCode, ErrorResponse) {
    match error {
        DomainError::Token(TokenError::ExpiredAccessToken)
        | DomainError::Token(TokenError::ExpiredRefreshToken) => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new(error_codes::TOKEN_EXPIRED, "Session expired"),
        ),
        DomainError::Token(_) => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new(error_codes::UNAUTHORIZED, "Unauthorized"),
        ),
        DomainError::Auth(AuthError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new(error_codes::INVALID_CREDENTIALS, error.to_string()),
        ),
        DomainError::Auth(AuthError::UserAlreadyExists) => (
            StatusCode::CONFLICT,
            ErrorResponse::new(error_codes::CONFLICT, error.to_string()),
        ),
        DomainError::Validation { message } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone()),
        ),
        DomainError::Internal { message } => {
            error!(error = %message, "internal error while handling request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred"),
            )
        }
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let (status, body) = error_body(error);
    HttpResponse::build(status).json(body)
}

/// 400 with the failing fields listed under `details`
pub fn handle_validation_errors(errors: &ValidationErrors) -> HttpResponse {
    let mut body = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request");

    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);
    for (field, failures) in fields {
        let messages: Vec<String> = failures
            .iter()
            .map(|failure| {
                failure
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| failure.code.to_string())
            })
            .collect();
        body = body.add_detail(field, messages);
    }

    HttpResponse::BadRequest().json(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    use crate::dto::auth::CredentialsRequest;

    #[test]
    fn test_expired_tokens_are_distinguished() {
        for error in [TokenError::ExpiredAccessToken, TokenError::ExpiredRefreshToken] {
            let (status, body) = error_body(&error.into());
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body.error, error_codes::TOKEN_EXPIRED);
        }
    }

    #[test]
    fn test_invalid_tokens_share_one_response() {
        for error in [
            TokenError::InvalidAccessToken,
            TokenError::InvalidRefreshToken,
            TokenError::InvalidSession,
        ] {
            let (status, body) = error_body(&error.into());
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body.error, error_codes::UNAUTHORIZED);
            assert_eq!(body.message, "Unauthorized");
        }
    }

    #[test]
    fn test_auth_errors() {
        let (status, body) = error_body(&AuthError::InvalidCredentials.into());
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, error_codes::INVALID_CREDENTIALS);

        let (status, body) = error_body(&AuthError::UserAlreadyExists.into());
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error, error_codes::CONFLICT);
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let (status, body) = error_body(&DomainError::internal("connection refused at 10.0.0.3"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, error_codes::INTERNAL_ERROR);
        assert!(!body.message.contains("10.0.0.3"));
    }

    #[test]
    fn test_validation_errors_list_fields() {
        let request = CredentialsRequest {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = request.validate().unwrap_err();

        let response = handle_validation_errors(&errors);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
