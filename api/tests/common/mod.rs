//! Shared fixtures for the API integration tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::{test, web};
use chrono::{Duration, TimeZone, Utc};

use parley_api::AppState;
use parley_core::{
    AuthService, AuthServiceConfig, ManualClock, MockTokenRepository, MockUserRepository,
    TokenService, TokenServiceConfig,
};
use parley_shared::config::auth::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use parley_shared::config::CookieConfig;

pub const EMAIL: &str = "ada@parley.test";
pub const PASSWORD: &str = "correct horse battery";

pub type TestState = AppState<MockUserRepository, MockTokenRepository>;

pub struct TestContext {
    pub state: web::Data<TestState>,
    pub tokens: MockTokenRepository,
    pub clock: ManualClock,
}

impl TestContext {
    /// Move past the access token lifetime but stay inside the refresh lifetime
    pub fn expire_access_token(&self) {
        self.clock.advance(Duration::minutes(16));
    }
}

pub fn context() -> TestContext {
    let clock = ManualClock::new(Utc.timestamp_opt(1_700_000_000, 0).unwrap());
    let tokens = MockTokenRepository::new();

    let token_service = Arc::new(TokenService::with_clock(
        tokens.clone(),
        TokenServiceConfig::new(
            "api-access-secret",
            Duration::minutes(15),
            "api-refresh-secret",
            Duration::days(7),
        ),
        Arc::new(clock.clone()),
    ));
    let auth_service = Arc::new(AuthService::new(
        Arc::new(MockUserRepository::new()),
        token_service,
        AuthServiceConfig {
            password_hash_cost: 4,
            min_password_length: 8,
        },
    ));

    TestContext {
        state: web::Data::new(AppState::new(auth_service, CookieConfig::default())),
        tokens,
        clock,
    }
}

/// Access and refresh cookies as a browser would hold them
#[derive(Debug, Clone)]
pub struct Session {
    pub access: Cookie<'static>,
    pub refresh: Cookie<'static>,
}

impl Session {
    pub fn attach(&self, request: test::TestRequest) -> test::TestRequest {
        request.cookie(self.access.clone()).cookie(self.refresh.clone())
    }
}

pub fn credentials(email: &str, password: &str) -> serde_json::Value {
    serde_json::json!({ "email": email, "password": password })
}

pub fn register_request(email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(credentials(email, password))
}

pub fn login_request(email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(credentials(email, password))
}

pub fn response_cookie<B>(response: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.into_owned())
}

/// Both cookies set by a response, with their attributes stripped
pub fn session_from<B>(response: &ServiceResponse<B>) -> Option<Session> {
    let access = response_cookie(response, ACCESS_TOKEN_COOKIE)?;
    let refresh = response_cookie(response, REFRESH_TOKEN_COOKIE)?;
    Some(Session {
        access: Cookie::new(ACCESS_TOKEN_COOKIE, access.value().to_string()),
        refresh: Cookie::new(REFRESH_TOKEN_COOKIE, refresh.value().to_string()),
    })
}

/// True when the response clears both session cookies
pub fn clears_session<B>(response: &ServiceResponse<B>) -> bool {
    [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE].iter().all(|name| {
        response_cookie(response, name)
            .map(|cookie| cookie.value().is_empty())
            .unwrap_or(false)
    })
}
