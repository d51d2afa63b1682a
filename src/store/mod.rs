/// Persistence interfaces
///
/// The auth core and the handlers only see these traits. `postgres` is the
/// production implementation; `memory` backs the test suite and database-less
/// runs.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::RefreshTokenRecord;
use crate::error::DatabaseError;
use crate::models::{Chirp, User};

/// Account storage.
///
/// Emails are unique; a duplicate surfaces as
/// `DatabaseError::UniqueConstraintViolation`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn lookup_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn create(&self, email: &str, hashed_password: &str) -> Result<User, DatabaseError>;

    /// Returns `None` if no user has `user_id`.
    async fn update(
        &self,
        user_id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<User>, DatabaseError>;

    async fn delete_all(&self) -> Result<(), DatabaseError>;
}

/// Refresh token persistence, keyed by the token string.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn insert(
        &self,
        token: &str,
        user_id: Uuid,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError>;

    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, DatabaseError>;

    /// Set `revoked_at` if it is not already set.
    async fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> Result<(), DatabaseError>;

    async fn delete_all(&self) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait ChirpStore: Send + Sync {
    async fn create(&self, body: &str, user_id: Uuid) -> Result<Chirp, DatabaseError>;

    /// All chirps, oldest first.
    async fn list(&self) -> Result<Vec<Chirp>, DatabaseError>;

    async fn get(&self, chirp_id: Uuid) -> Result<Option<Chirp>, DatabaseError>;

    async fn delete_all(&self) -> Result<(), DatabaseError>;
}
