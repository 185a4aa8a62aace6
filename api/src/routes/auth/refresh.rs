use actix_web::{web, HttpRequest, HttpResponse};
use tracing::debug;

use parley_core::{DomainError, TokenError, TokenRepository, UserRepository};

use crate::app::AppState;
use crate::cookies::AuthCookies;
use crate::handlers::{error_body, handle_domain_error};
use crate::middleware::auth::rotate_session;

/// Handler for POST /api/v1/auth/refresh
///
/// Rotates the session explicitly, whether or not the access token has
/// expired yet. Both cookies are replaced on success. A rotation failure
/// that needs a fresh login clears both cookies.
pub async fn refresh<U, T>(req: HttpRequest, state: web::Data<AppState<U, T>>) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    let access_token = AuthCookies::read_access(&req);
    let refresh_token = AuthCookies::read_refresh(&req);

    let result = match access_token.as_deref() {
        Some(access_token) => {
            rotate_session(
                state.auth_service.token_service(),
                access_token,
                refresh_token.as_deref(),
            )
            .await
        }
        None => Err(TokenError::InvalidAccessToken.into()),
    };

    match result {
        Ok(pair) => state.session_established(HttpResponse::Ok(), &pair),
        Err(error) if error.requires_reauthentication() => {
            debug!(error = %error, "explicit refresh rejected");
            reauthenticate(&state.cookies, &error)
        }
        Err(error) => handle_domain_error(&error),
    }
}

fn reauthenticate(cookies: &AuthCookies, error: &DomainError) -> HttpResponse {
    let (status, body) = error_body(error);
    let mut response = HttpResponse::build(status);
    cookies.clear_all(&mut response);
    response.json(body)
}
