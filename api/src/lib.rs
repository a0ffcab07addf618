//! # JWKS-RSA API
//!
//! actix-web surface over the core services: the published key set, the
//! account routes and the bearer token middleware guarding `/user`.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, AppState};
