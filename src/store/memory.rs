//! In-memory stores.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ChirpStore, RefreshTokenStore, UserStore};
use crate::auth::RefreshTokenRecord;
use crate::error::DatabaseError;
use crate::models::{Chirp, User};

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn lookup_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, email: &str, hashed_password: &str) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "users_email_key".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update(
        &self,
        user_id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email && u.id != user_id) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "users_email_key".to_string(),
            ));
        }

        Ok(users.iter_mut().find(|u| u.id == user_id).map(|user| {
            user.email = email.to_string();
            user.hashed_password = hashed_password.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete_all(&self) -> Result<(), DatabaseError> {
        self.users.write().await.clear();
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryRefreshTokenStore {
    tokens: RwLock<HashMap<String, RefreshTokenRecord>>,
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn insert(
        &self,
        token: &str,
        user_id: Uuid,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(token) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "refresh_tokens_pkey".to_string(),
            ));
        }

        tokens.insert(
            token.to_string(),
            RefreshTokenRecord {
                user_id,
                created_at,
                expires_at,
                revoked_at: None,
            },
        );
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, DatabaseError> {
        Ok(self.tokens.read().await.get(token).cloned())
    }

    async fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> Result<(), DatabaseError> {
        if let Some(record) = self.tokens.write().await.get_mut(token) {
            record.revoked_at.get_or_insert(at);
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), DatabaseError> {
        self.tokens.write().await.clear();
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryChirpStore {
    chirps: RwLock<Vec<Chirp>>,
}

#[async_trait]
impl ChirpStore for InMemoryChirpStore {
    async fn create(&self, body: &str, user_id: Uuid) -> Result<Chirp, DatabaseError> {
        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        self.chirps.write().await.push(chirp.clone());
        Ok(chirp)
    }

    async fn list(&self) -> Result<Vec<Chirp>, DatabaseError> {
        let mut chirps = self.chirps.read().await.clone();
        chirps.sort_by_key(|c| c.created_at);
        Ok(chirps)
    }

    async fn get(&self, chirp_id: Uuid) -> Result<Option<Chirp>, DatabaseError> {
        let chirps = self.chirps.read().await;
        Ok(chirps.iter().find(|c| c.id == chirp_id).cloned())
    }

    async fn delete_all(&self) -> Result<(), DatabaseError> {
        self.chirps.write().await.clear();
        Ok(())
    }
}
