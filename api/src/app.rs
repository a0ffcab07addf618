//! Application state and factory
//!
//! This module holds the shared services handed to every handler and
//! builds the actix-web application around them.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error, HttpResponse,
};
use jr_core::services::auth::AuthService;
use jr_core::services::token::{KeySetPublisher, TokenVerifier};
use jr_shared::errors::{error_codes, ErrorResponse};
use tracing_actix_web::TracingLogger;

use crate::handlers::error_handler::json_error_handler;
use crate::middleware::auth::JwtAuth;
use crate::routes::{auth, keys, user};

/// Services shared by all handlers
pub struct AppState {
    /// Account registration, login, refresh and profile lookup
    pub auth_service: Arc<AuthService>,
    /// Source of the published key set
    pub publisher: Arc<KeySetPublisher>,
    /// Verifier used by the bearer token middleware
    pub verifier: Arc<TokenVerifier>,
}

/// Create and configure the application with all dependencies
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let verifier = state.verifier.clone();

    App::new()
        .app_data(state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .route("/auth/keys", web::get().to(keys::keys))
        .route("/auth/refresh", web::post().to(auth::refresh::refresh))
        .route("/register", web::post().to(auth::register::register))
        .route("/login", web::post().to(auth::login::login))
        .service(
            web::resource("/user")
                .wrap(JwtAuth::new(verifier))
                .route(web::get().to(user::profile)),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "jwks-rsa-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Fallback for unknown routes
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
