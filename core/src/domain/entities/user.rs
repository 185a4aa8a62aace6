//! User entity representing a registered account.

use chrono::{DateTime, Utc};
use parley_shared::validation::validators::email_local_part;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Login email, unique across users
    pub email: String,

    /// Display name shown to other users
    pub name: String,

    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user whose display name is derived from the email
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let email = email.into();
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: display_name_from_email(&email),
            email,
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Display name from the email local part: first character upper-cased,
/// the rest lower-cased.
pub fn display_name_from_email(email: &str) -> String {
    let mut chars = email_local_part(email).chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
