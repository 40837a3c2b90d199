//! User profile repository
//!
//! The identity service authenticates users; this repository only maps a
//! presented token (hashed) to the stored profile record.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{DomainError, Role};
use crate::error::AppError;

/// Stored profile record for an authenticated user.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn profile_from_row(
        row: (Uuid, String, String, String, DateTime<Utc>),
    ) -> Result<UserProfile, AppError> {
        let (id, name, email, role, created_at) = row;
        let role: Role = role
            .parse()
            .map_err(|e: String| AppError::Internal(format!("corrupt user role: {}", e)))?;
        Ok(UserProfile {
            id,
            name,
            email,
            role,
            created_at,
        })
    }

    /// Look up the profile matching a hashed bearer token.
    pub async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<UserProfile>, AppError> {
        let row: Option<(Uuid, String, String, String, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT id, name, email, role, created_at
            FROM users
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::profile_from_row).transpose()
    }

    /// Fetch a profile by id; distinguishable not-found.
    pub async fn get(&self, user_id: Uuid) -> Result<UserProfile, AppError> {
        let row: Option<(Uuid, String, String, String, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT id, name, email, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or(DomainError::UserNotFound(user_id))?;
        Self::profile_from_row(row)
    }
}
