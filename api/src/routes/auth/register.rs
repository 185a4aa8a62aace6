use actix_web::{web, HttpResponse};
use validator::Validate;

use parley_core::{TokenRepository, UserRepository};

use crate::app::AppState;
use crate::dto::auth::CredentialsRequest;
use crate::handlers::{handle_domain_error, handle_validation_errors};

/// Handler for POST /api/v1/auth/register
///
/// Creates the account and starts its first session.
///
/// ## Success (201 Created)
/// Both token cookies are set and the body names the session:
/// ```json
/// { "session_id": "550e8400-e29b-41d4-a716-446655440000", "expires_in": 900 }
/// ```
///
/// ## Errors
/// - 400 Bad Request: invalid email or password length
/// - 409 Conflict: the email is already registered
pub async fn register<U, T>(
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
        .register(&request.email, &request.password)
        .await
    {
        Ok(pair) => state.session_established(HttpResponse::Created(), &pair),
        Err(error) => handle_domain_error(&error),
    }
}
