//! Models that represent user accounts and their API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{forms::ValidatedUser, types::UserId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// Database representation of a registered user account.
pub struct User {
    /// Unique identifier for the user.
    pub id: UserId,
    /// Unique username used for login.
    pub username: String,
    /// Contact address; empty when none was given.
    pub email: String,
    /// Argon2 hash of the user's password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Creation timestamp for auditing.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp for auditing.
    pub updated_at: DateTime<Utc>,
}

/// Record handed to the repository when registering an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    /// Maps validated registration data onto a record; the caller supplies
    /// the already-hashed password.
    pub fn from_validated(user: ValidatedUser, password_hash: String) -> Self {
        Self {
            id: UserId::new(),
            username: user.username,
            email: user.email,
            password_hash,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Public-facing representation of a user returned by the API.
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}
