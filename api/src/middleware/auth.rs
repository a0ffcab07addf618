//! Bearer token middleware for protecting API endpoints.
//!
//! The middleware extracts the access token from the Authorization header,
//! verifies it against the configured key set and injects the caller's
//! identity into the request.
//!
//! A missing header or a scheme other than `Bearer` is answered with
//! `412 Precondition Failed`. Every verification failure is answered with
//! the same opaque `401`; the specific reason is only logged.

use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use jr_core::domain::entities::{TokenClass, VerifiedIdentity};
use jr_core::services::token::TokenVerifier;
use jr_shared::errors::{error_codes, ErrorResponse};
use tracing::debug;

/// Identity of the authenticated caller, injected into requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Subject of the verified access token
    pub user_id: String,
}

impl From<VerifiedIdentity> for AuthContext {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            user_id: identity.user_id,
        }
    }
}

/// Bearer token middleware factory
pub struct JwtAuth {
    verifier: Arc<TokenVerifier>,
}

impl JwtAuth {
    /// Creates the middleware verifying access tokens with `verifier`
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
        }))
    }
}

/// Bearer token middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    verifier: Arc<TokenVerifier>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let verifier = Arc::clone(&self.verifier);

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    debug!(path = %req.path(), "Request without bearer token");
                    let response = HttpResponse::PreconditionFailed().json(ErrorResponse::new(
                        error_codes::MISSING_AUTHORIZATION,
                        "Authorization header with a Bearer token is required",
                    ));
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            // the verifier logs the precise rejection reason
            let identity = match verifier.verify(TokenClass::Access, &token).await {
                Ok(identity) => identity,
                Err(_) => {
                    let response = HttpResponse::Unauthorized().json(ErrorResponse::new(
                        error_codes::UNAUTHORIZED,
                        "Invalid or expired token",
                    ));
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            req.extensions_mut().insert(AuthContext::from(identity));

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}
