//! Integration tests for the cookie session gate

mod common;

use actix_web::cookie::Cookie;
use actix_web::{http::StatusCode, test, web, App, HttpResponse};

use common::*;
use parley_api::create_app;
use parley_api::dto::auth::SessionResponse;
use parley_api::middleware::auth::AuthContext;

async fn whoami(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "user_id": auth.user_id.to_string(),
        "session_id": auth.session_id.to_string(),
    }))
}

#[actix_web::test]
async fn test_gate_requires_access_cookie() {
    let ctx = context();
    let app = test::init_service(
        App::new()
            .wrap(ctx.state.gate())
            .route("/protected", web::get().to(whoami)),
    )
    .await;

    let req = test::TestRequest::get().uri("/protected").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(clears_session(&resp));
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[actix_web::test]
async fn test_gate_rejects_forged_access_cookie() {
    let ctx = context();
    let app = test::init_service(
        App::new()
            .wrap(ctx.state.gate())
            .route("/protected", web::get().to(whoami)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/protected")
        .cookie(Cookie::new("access_token", "eyJhbGciOiJIUzI1NiJ9.e30.forged"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(clears_session(&resp));
}

#[actix_web::test]
async fn test_auth_context_extractor_requires_gate() {
    let app = test::init_service(App::new().route("/protected", web::get().to(whoami))).await;

    let req = test::TestRequest::get().uri("/protected").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_expired_access_rotates_silently() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let registered = test::call_service(&app, register_request(EMAIL, PASSWORD).to_request()).await;
    let old = session_from(&registered).unwrap();
    let created: SessionResponse = test::read_body_json(registered).await;

    ctx.expire_access_token();
    let req = old.attach(test::TestRequest::get().uri("/api/v1/auth/me"));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let new = session_from(&resp).expect("rotated cookies are re-set");
    assert_ne!(new.access.value(), old.access.value());
    assert_ne!(new.refresh.value(), old.refresh.value());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["session_id"], created.session_id.to_string());
    assert_eq!(ctx.tokens.records_for_session(created.session_id).await.len(), 2);
    assert_eq!(ctx.tokens.live_count(created.session_id).await, 1);

    // The new pair authenticates without another rotation
    let req = new.attach(test::TestRequest::get().uri("/api/v1/auth/me"));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(response_cookie(&resp, "access_token").is_none());
}

#[actix_web::test]
async fn test_expired_access_without_refresh_cookie_uses_session_record() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let registered = test::call_service(&app, register_request(EMAIL, PASSWORD).to_request()).await;
    let old = session_from(&registered).unwrap();
    let created: SessionResponse = test::read_body_json(registered).await;

    ctx.expire_access_token();
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .cookie(old.access.clone());
    let resp = test::call_service(&app, req.to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_from(&resp).is_some());
    assert_eq!(ctx.tokens.live_count(created.session_id).await, 1);
}

#[actix_web::test]
async fn test_replayed_refresh_cookie_is_rejected() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let registered = test::call_service(&app, register_request(EMAIL, PASSWORD).to_request()).await;
    let old = session_from(&registered).unwrap();

    ctx.expire_access_token();
    let first = old.attach(test::TestRequest::get().uri("/api/v1/auth/me"));
    assert_eq!(
        test::call_service(&app, first.to_request()).await.status(),
        StatusCode::OK
    );

    let replay = old.attach(test::TestRequest::get().uri("/api/v1/auth/me"));
    let resp = test::call_service(&app, replay.to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(clears_session(&resp));
}

#[actix_web::test]
async fn test_expired_refresh_forces_login() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let registered = test::call_service(&app, register_request(EMAIL, PASSWORD).to_request()).await;
    let session = session_from(&registered).unwrap();

    ctx.clock.advance(chrono::Duration::days(8));
    let req = session.attach(test::TestRequest::get().uri("/api/v1/auth/me"));
    let resp = test::call_service(&app, req.to_request()).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(clears_session(&resp));
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_EXPIRED");
}

#[actix_web::test]
async fn test_store_failure_during_rotation_is_unauthorized() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let registered = test::call_service(&app, register_request(EMAIL, PASSWORD).to_request()).await;
    let session = session_from(&registered).unwrap();

    ctx.expire_access_token();
    ctx.tokens.set_failing(true);
    let req = session.attach(test::TestRequest::get().uri("/api/v1/auth/me"));
    let resp = test::call_service(&app, req.to_request()).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "UNAUTHORIZED");
}
