use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::app::AppState;
use crate::dto::auth_dto::RegisterRequest;
use crate::handlers::error_handler::{handle_domain_error, handle_validation_errors};

/// Handler for POST /register
///
/// # Request Body
///
/// ```json
/// { "email": "ann@example.com", "username": "ann", "password": "secret" }
/// ```
///
/// ## Success (201 Created)
/// ```json
/// "created"
/// ```
///
/// ## Errors
/// - 400 Bad Request: invalid body or email already registered
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state
        .auth_service
        .register(&request.email, &request.username, &request.password)
        .await
    {
        Ok(_) => HttpResponse::Created().json("created"),
        Err(error) => handle_domain_error(error),
    }
}
