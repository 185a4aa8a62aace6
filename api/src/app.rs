//! Application state and factory

use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpResponseBuilder};

use parley_core::{AuthService, TokenKind, TokenPair, TokenRepository, UserRepository};
use parley_shared::config::CookieConfig;
use parley_shared::errors::{error_codes, ErrorResponse};

use crate::cookies::AuthCookies;
use crate::dto::auth::SessionResponse;
use crate::middleware::auth::CookieAuth;
use crate::routes::auth::{login, logout, me, refresh, register};

/// Services shared by every worker
pub struct AppState<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    pub auth_service: Arc<AuthService<U, T>>,
    pub cookies: AuthCookies,
}

impl<U, T> AppState<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    /// Cookie lifetimes are taken from the token service's signer
    pub fn new(auth_service: Arc<AuthService<U, T>>, cookies: CookieConfig) -> Self {
        let signer = auth_service.token_service().signer();
        let cookies = AuthCookies::new(
            cookies,
            signer.lifetime(TokenKind::Access),
            signer.lifetime(TokenKind::Refresh),
        );
        Self {
            auth_service,
            cookies,
        }
    }

    /// Session gate bound to this state's token service
    pub fn gate(&self) -> CookieAuth<T> {
        CookieAuth::new(
            Arc::clone(self.auth_service.token_service()),
            self.cookies.clone(),
        )
    }

    /// Finish `response` with the pair's cookies and a session body
    pub fn session_established(
        &self,
        mut response: HttpResponseBuilder,
        pair: &TokenPair,
    ) -> HttpResponse {
        self.cookies.set_pair(&mut response, pair);
        let expires_in = self
            .auth_service
            .token_service()
            .signer()
            .lifetime(TokenKind::Access)
            .num_seconds();

        response.json(SessionResponse {
            session_id: pair.session_id,
            expires_in,
        })
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<U, T>(
    state: web::Data<AppState<U, T>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    let gate = state.gate();

    App::new()
        .app_data(state)
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/register", web::post().to(register::register::<U, T>))
                    .route("/login", web::post().to(login::login::<U, T>))
                    .route("/logout", web::post().to(logout::logout::<U, T>))
                    .route("/refresh", web::post().to(refresh::refresh::<U, T>))
                    .route("/me", web::get().to(me::me::<U, T>).wrap(gate)),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "parley-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
