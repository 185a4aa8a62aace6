use actix_web::{web, HttpResponse};

use parley_core::{TokenRepository, UserRepository};

use crate::app::AppState;
use crate::dto::auth::MeResponse;
use crate::handlers::handle_domain_error;
use crate::middleware::auth::AuthContext;

/// Handler for GET /api/v1/auth/me, behind the session gate
pub async fn me<U, T>(auth: AuthContext, state: web::Data<AppState<U, T>>) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    match state.auth_service.current_user(auth.user_id).await {
        Ok(user) => HttpResponse::Ok().json(MeResponse::new(user, auth.session_id)),
        Err(error) => handle_domain_error(&error),
    }
}
