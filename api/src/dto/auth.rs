use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use parley_core::User;

/// Body of `POST /register` and `POST /login`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    /// bcrypt only reads the first 72 bytes
    #[validate(length(min = 8, max = 72, message = "must be between 8 and 72 characters"))]
    pub password: String,
}

/// Returned whenever a session's cookies are (re)issued
///
/// Tokens never appear in bodies; they travel only as cookies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    /// Seconds until the access cookie expires
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub email: String,
    pub name: String,
}

impl MeResponse {
    pub fn new(user: User, session_id: Uuid) -> Self {
        Self {
            user_id: user.id,
            session_id,
            email: user.email,
            name: user.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}
