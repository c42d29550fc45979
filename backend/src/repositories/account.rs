//! Account repository: user registration and profile persistence.
//!
//! The trait can be mocked using mockall for handler tests.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::{
        profile::{Profile, ProfileUpdate},
        user::{NewUser, User},
    },
    types::{ProfileId, UserId},
};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";
const PROFILE_COLUMNS: &str = "id, user_id, avatar, bio, created_at, updated_at";

/// Repository trait for account operations.
///
/// Use `MockAccountRepositoryTrait` in tests to mock the behavior.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    /// Returns true when a user already holds this username.
    async fn username_exists(&self, username: &str) -> Result<bool, AppError>;

    /// Creates the user together with an empty profile.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_profile(&self, user_id: UserId) -> Result<Option<Profile>, AppError>;

    /// Applies the update to the user's profile; 404 when it does not exist.
    async fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<Profile, AppError>;
}

/// Postgres-backed implementation of [`AccountRepositoryTrait`].
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "INSERT INTO users (id, username, email, password_hash, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) \
             RETURNING {}",
            USER_COLUMNS
        );
        let created = sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO profiles (id, user_id, avatar, bio, created_at, updated_at) \
             VALUES ($1, $2, NULL, '', $3, $3)",
        )
        .bind(ProfileId::new())
        .bind(created.id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn find_profile(&self, user_id: UserId) -> Result<Option<Profile>, AppError> {
        let query = format!("SELECT {} FROM profiles WHERE user_id = $1", PROFILE_COLUMNS);
        let row = sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<Profile, AppError> {
        let query = format!(
            "UPDATE profiles SET avatar = COALESCE($2, avatar), bio = $3, updated_at = $4 \
             WHERE user_id = $1 \
             RETURNING {}",
            PROFILE_COLUMNS
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(&update.avatar)
            .bind(&update.bio)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".into()))
    }
}
