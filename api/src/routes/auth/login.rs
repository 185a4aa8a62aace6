use actix_web::{web, HttpResponse};
use validator::Validate;

use parley_core::{TokenRepository, UserRepository};

use crate::app::AppState;
use crate::dto::auth::CredentialsRequest;
use crate::handlers::{handle_domain_error, handle_validation_errors};

/// Handler for POST /api/v1/auth/login
///
/// Every successful login starts a new session with its own token pair.
///
/// ## Errors
/// - 400 Bad Request: malformed email or short password
/// - 401 Unauthorized: unknown email or wrong password, indistinguishably
pub async fn login<U, T>(
    state: web::Data<AppState<U, T>>,
    request: web::Json<CredentialsRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    match state
        .auth_service
        .login(&request.email, &request.password)
        .await
    {
        Ok(pair) => state.session_established(HttpResponse::Ok(), &pair),
        Err(error) => handle_domain_error(&error),
    }
}
