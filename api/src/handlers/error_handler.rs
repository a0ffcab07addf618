//! Mapping of domain and request errors to HTTP responses

use actix_web::{error::InternalError, error::JsonPayloadError, HttpRequest, HttpResponse};
use jr_core::errors::{AuthError, DomainError};
use jr_shared::errors::{error_codes, ErrorResponse};
use validator::ValidationErrors;

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match error {
        DomainError::Auth(AuthError::EmailTaken) => HttpResponse::BadRequest().json(
            ErrorResponse::new(error_codes::EMAIL_TAKEN, "Email already registered"),
        ),
        DomainError::Auth(AuthError::UserNotFound) => HttpResponse::NotFound().json(
            ErrorResponse::new(error_codes::NOT_FOUND, "User not found"),
        ),
        DomainError::Auth(AuthError::InvalidCredentials) => HttpResponse::Unauthorized().json(
            ErrorResponse::new(error_codes::INVALID_CREDENTIALS, "Invalid credentials"),
        ),
        DomainError::Token(token_error) if token_error.is_verification_failure() => {
            HttpResponse::Unauthorized().json(ErrorResponse::new(
                error_codes::UNAUTHORIZED,
                "Invalid or expired token",
            ))
        }
        DomainError::Validation { message } => HttpResponse::BadRequest().json(
            ErrorResponse::new(error_codes::VALIDATION_ERROR, message),
        ),
        other => {
            tracing::error!(error = %other, "Request failed");
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                error_codes::INTERNAL_ERROR,
                "An internal error occurred",
            ))
        }
    }
}

/// 400 response listing the fields that failed validation
pub fn handle_validation_errors(errors: ValidationErrors) -> HttpResponse {
    let fields: Vec<String> = errors.field_errors().keys().map(|f| f.to_string()).collect();
    HttpResponse::BadRequest().json(
        ErrorResponse::new(error_codes::VALIDATION_ERROR, "Request validation failed")
            .add_detail("fields", fields),
    )
}

/// Turns an unreadable JSON body into a 400 with the standard error body
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(
        error_codes::BAD_REQUEST,
        format!("Invalid request body: {}", err),
    ));
    InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use jr_core::errors::TokenError;

    #[test]
    fn test_auth_error_statuses() {
        assert_eq!(
            handle_domain_error(AuthError::EmailTaken.into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            handle_domain_error(AuthError::UserNotFound.into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            handle_domain_error(AuthError::InvalidCredentials.into()).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_verification_failures_are_unauthorized() {
        for error in [
            TokenError::Malformed,
            TokenError::Expired,
            TokenError::InvalidSignature,
            TokenError::KeySetUnavailable { message: "down".into() },
        ] {
            assert_eq!(handle_domain_error(error.into()).status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_signing_failure_is_internal() {
        let error = TokenError::SigningFailed { message: "boom".into() };
        assert_eq!(
            handle_domain_error(error.into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
