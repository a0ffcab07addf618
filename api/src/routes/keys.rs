use actix_web::{web, HttpResponse};

use crate::app::AppState;

/// Handler for GET /auth/keys
///
/// Returns the published key set. Never fails: a cache problem only
/// means the document is recomputed.
///
/// ```json
/// {
///     "keys": [
///         { "kty": "RSA", "alg": "RS256", "kid": "32acb48c...", "n": "...", "e": "AQAB", "use": "sig" }
///     ]
/// }
/// ```
pub async fn keys(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.publisher.publish())
}
