use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::app::AppState;
use crate::dto::auth_dto::RefreshTokenRequest;
use crate::handlers::error_handler::{handle_domain_error, handle_validation_errors};

/// Handler for POST /auth/refresh
///
/// Exchanges a refresh token for a new token pair.
///
/// ## Errors
/// - 400 Bad Request: invalid body
/// - 401 Unauthorized: the token is not a valid, unexpired refresh token
pub async fn refresh(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state.auth_service.refresh(&request.refresh_token).await {
        Ok(pair) => HttpResponse::Ok().json(pair),
        Err(error) => handle_domain_error(error),
    }
}
