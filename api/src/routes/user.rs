use actix_web::{web, HttpResponse};

use crate::app::AppState;
use crate::handlers::error_handler::handle_domain_error;
use crate::middleware::auth::AuthContext;

/// Handler for GET /user
///
/// Requires a valid access token; returns the caller's profile without the
/// password hash.
pub async fn profile(state: web::Data<AppState>, auth: AuthContext) -> HttpResponse {
    match state.auth_service.profile(&auth.user_id).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(error) => handle_domain_error(error),
    }
}
