/// Refresh Token Management
///
/// Handles refresh token generation, storage, validation, and revocation.
/// Refresh tokens are:
/// - Cryptographically secure random 64-character strings
/// - Valid for 60 days from issue
/// - Store-backed so they can be revoked before they expire
/// - Never rotated: a refresh mints a new access token only

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AuthError;
use crate::store::RefreshTokenStore;

pub const REFRESH_TOKEN_LIFETIME_DAYS: i64 = 60;
const REFRESH_TOKEN_LENGTH: usize = 64;

/// The server-side record behind a refresh token string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Lifecycle of a refresh token. `Expired` and `Revoked` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Expired,
    Revoked,
}

impl RefreshTokenRecord {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Revocation wins over expiry when both apply.
    pub fn state_at(&self, now: DateTime<Utc>) -> SessionState {
        if self.is_revoked() {
            SessionState::Revoked
        } else if self.is_expired_at(now) {
            SessionState::Expired
        } else {
            SessionState::Active
        }
    }
}

/// Generate a new cryptographically secure refresh token
///
/// 64 alphanumeric characters drawn from the thread-local CSPRNG.
pub fn generate_refresh_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(REFRESH_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Issues, resolves and revokes refresh tokens against a `RefreshTokenStore`.
///
/// Holds no session state of its own. Concurrent refresh and revoke calls are
/// ordered by the store.
#[derive(Clone)]
pub struct RefreshTokenManager {
    store: Arc<dyn RefreshTokenStore>,
}

impl RefreshTokenManager {
    pub fn new(store: Arc<dyn RefreshTokenStore>) -> Self {
        Self { store }
    }

    /// Mint and persist a token for `user_id`, expiring 60 days after `now`.
    ///
    /// A token collision surfaces as a `Persistence` error and is not retried.
    pub async fn issue(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), AuthError> {
        let token = generate_refresh_token();
        let expires_at = now + Duration::days(REFRESH_TOKEN_LIFETIME_DAYS);

        self.store.insert(&token, user_id, now, expires_at).await?;

        tracing::debug!(user_id = %user_id, expires_at = %expires_at, "Refresh token issued");
        Ok((token, expires_at))
    }

    /// Look up the owner of a usable token.
    ///
    /// # Errors
    /// `RefreshTokenNotFound`, `RefreshTokenRevoked` or `RefreshTokenExpired`,
    /// checked in that order
    pub async fn resolve(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, AuthError> {
        let record = self
            .store
            .find(token)
            .await?
            .ok_or(AuthError::RefreshTokenNotFound)?;

        match record.state_at(now) {
            SessionState::Active => Ok(record.user_id),
            SessionState::Revoked => {
                tracing::warn!(user_id = %record.user_id, "Attempt to use revoked refresh token");
                Err(AuthError::RefreshTokenRevoked)
            }
            SessionState::Expired => {
                tracing::info!(user_id = %record.user_id, "Refresh token expired");
                Err(AuthError::RefreshTokenExpired)
            }
        }
    }

    /// Revoke a token. Revoking an already revoked or expired token succeeds
    /// and leaves the original `revoked_at` in place.
    pub async fn revoke(&self, token: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        let record = self
            .store
            .find(token)
            .await?
            .ok_or(AuthError::RefreshTokenNotFound)?;

        if !record.is_revoked() {
            self.store.mark_revoked(token, now).await?;
            tracing::info!(user_id = %record.user_id, "Refresh token revoked");
        }

        Ok(())
    }

    /// Delete every refresh token record.
    pub async fn clear_all(&self) -> Result<(), AuthError> {
        self.store.delete_all().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryRefreshTokenStore;

    fn manager() -> (RefreshTokenManager, Arc<InMemoryRefreshTokenStore>) {
        let store = Arc::new(InMemoryRefreshTokenStore::default());
        (RefreshTokenManager::new(store.clone()), store)
    }

    #[test]
    fn test_generate_refresh_token() {
        let token = generate_refresh_token();

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_refresh_token());
    }

    #[test]
    fn test_record_state() {
        let now = Utc::now();
        let mut record = RefreshTokenRecord {
            user_id: Uuid::new_v4(),
            created_at: now,
            expires_at: now + Duration::days(60),
            revoked_at: None,
        };

        assert_eq!(record.state_at(now), SessionState::Active);
        assert_eq!(record.state_at(record.expires_at), SessionState::Expired);

        record.revoked_at = Some(now);
        assert_eq!(record.state_at(now), SessionState::Revoked);
        assert_eq!(record.state_at(record.expires_at), SessionState::Revoked);
    }

    #[tokio::test]
    async fn test_issue_then_resolve() {
        let (manager, _) = manager();
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        let (token, expires_at) = manager.issue(user_id, now).await.unwrap();

        assert_eq!(expires_at, now + Duration::days(60));
        assert_eq!(manager.resolve(&token, now).await.unwrap(), user_id);
    }

    #[tokio::test]
    async fn test_resolve_unknown_token() {
        let (manager, _) = manager();
        let result = manager.resolve("never-issued", Utc::now()).await;

        assert!(matches!(result, Err(AuthError::RefreshTokenNotFound)));
    }

    #[tokio::test]
    async fn test_resolve_expired_token() {
        let (manager, _) = manager();
        let now = Utc::now();
        let (token, expires_at) = manager.issue(Uuid::new_v4(), now).await.unwrap();

        assert!(manager.resolve(&token, expires_at - Duration::seconds(1)).await.is_ok());
        assert!(matches!(
            manager.resolve(&token, expires_at).await,
            Err(AuthError::RefreshTokenExpired)
        ));
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let (manager, store) = manager();
        let now = Utc::now();
        let (token, _) = manager.issue(Uuid::new_v4(), now).await.unwrap();

        manager.revoke(&token, now).await.unwrap();
        manager.revoke(&token, now + Duration::minutes(5)).await.unwrap();

        let record = store.find(&token).await.unwrap().unwrap();
        assert_eq!(record.revoked_at, Some(now));
        assert!(matches!(
            manager.resolve(&token, now).await,
            Err(AuthError::RefreshTokenRevoked)
        ));
    }

    #[tokio::test]
    async fn test_revoke_expired_token_is_not_an_error() {
        let (manager, _) = manager();
        let now = Utc::now();
        let (token, _) = manager.issue(Uuid::new_v4(), now).await.unwrap();

        assert!(manager.revoke(&token, now + Duration::days(90)).await.is_ok());
    }

    #[tokio::test]
    async fn test_revoke_unknown_token() {
        let (manager, _) = manager();

        assert!(matches!(
            manager.revoke("never-issued", Utc::now()).await,
            Err(AuthError::RefreshTokenNotFound)
        ));
    }

    #[tokio::test]
    async fn test_clear_all() {
        let (manager, _) = manager();
        let now = Utc::now();
        let (token, _) = manager.issue(Uuid::new_v4(), now).await.unwrap();

        manager.clear_all().await.unwrap();

        assert!(matches!(
            manager.resolve(&token, now).await,
            Err(AuthError::RefreshTokenNotFound)
        ));
    }
}
