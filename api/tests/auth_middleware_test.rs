//! Integration tests for the bearer token middleware

mod common;

use actix_web::{http::StatusCode, test, web, App, HttpResponse};
use jr_api::middleware::auth::{AuthContext, JwtAuth};
use jr_core::domain::entities::{Claims, TokenClass};
use jr_core::testutil::tamper_signature;
use serde_json::Value;

use common::{fixture_issuer, test_state};

async fn whoami(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().body(auth.user_id)
}

macro_rules! protected_app {
    () => {
        test::init_service(
            App::new()
                .wrap(JwtAuth::new(test_state().verifier.clone()))
                .route("/protected", web::get().to(whoami)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_missing_header_is_precondition_failed() {
    let app = protected_app!();

    let req = test::TestRequest::get().uri("/protected").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "MISSING_AUTHORIZATION");
}

#[actix_web::test]
async fn test_non_bearer_scheme_is_precondition_failed() {
    let app = protected_app!();

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
        .to_request();

    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::PRECONDITION_FAILED);
}

#[actix_web::test]
async fn test_valid_access_token_reaches_handler() {
    let app = protected_app!();
    let token = fixture_issuer().issue(TokenClass::Access, "user-7").unwrap();

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;

    assert_eq!(body, "user-7");
}

#[actix_web::test]
async fn test_rejections_are_opaque() {
    let app = protected_app!();
    let issuer = fixture_issuer();
    let mut expired = Claims::new(TokenClass::Access, "u", 0).unwrap();
    expired.exp -= 60;

    let tokens = [
        "invalid-token".to_string(),
        issuer.issue(TokenClass::Refresh, "u").unwrap(),
        tamper_signature(&issuer.issue(TokenClass::Access, "u").unwrap()),
        issuer.sign(&expired).unwrap(),
    ];

    let mut bodies = Vec::new();
    for token in tokens {
        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        bodies.push((body["error"].clone(), body["message"].clone()));
    }

    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}

#[actix_web::test]
async fn test_extractor_without_middleware() {
    let app = test::init_service(App::new().route("/protected", web::get().to(whoami))).await;

    let req = test::TestRequest::get().uri("/protected").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
