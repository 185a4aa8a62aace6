use actix_web::{web, HttpRequest, HttpResponse};

use parley_core::{TokenRepository, UserRepository};

use crate::app::AppState;
use crate::cookies::AuthCookies;
use crate::dto::auth::LogoutResponse;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the session's refresh token when one can be identified from the
/// cookies. Always answers 200 and clears both cookies, so a stale or
/// missing session never blocks logging out.
pub async fn logout<U, T>(req: HttpRequest, state: web::Data<AppState<U, T>>) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    let access_token = AuthCookies::read_access(&req);
    let refresh_token = AuthCookies::read_refresh(&req);

    state
        .auth_service
        .logout(access_token.as_deref(), refresh_token.as_deref())
        .await;

    let mut response = HttpResponse::Ok();
    state.cookies.clear_all(&mut response);
    response.json(LogoutResponse {
        message: "Logged out successfully".to_string(),
    })
}
