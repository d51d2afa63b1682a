/// Authentication facade
///
/// Composes the password hasher, access token codec, bearer extractor and
/// refresh token manager into the operations the request handlers call.

use actix_web::http::header::HeaderMap;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::bearer::extract_bearer;
use crate::auth::jwt::AccessTokenCodec;
use crate::auth::password::PasswordHasher;
use crate::auth::refresh_token::RefreshTokenManager;
use crate::clock::Clock;
use crate::configuration::{AuthSettings, Platform};
use crate::error::AuthError;
use crate::models::User;
use crate::store::{RefreshTokenStore, UserStore};

/// Everything a successful login hands back to the client.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
}

pub struct AuthService {
    codec: AccessTokenCodec,
    hasher: PasswordHasher,
    users: Arc<dyn UserStore>,
    refresh_tokens: RefreshTokenManager,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(
        settings: &AuthSettings,
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            codec: AccessTokenCodec::from_settings(settings)?,
            hasher: PasswordHasher::new(settings.password_hash_cost),
            users,
            refresh_tokens: RefreshTokenManager::new(refresh_tokens),
            clock,
        })
    }

    // bcrypt is CPU-bound; keep it off the async workers.
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher;
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let hasher = self.hasher;
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
    }

    /// Create an account. The password is stored only as a bcrypt hash.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let hashed_password = self.hash_password(password).await?;
        let user = self.users.create(email, &hashed_password).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Verify an email/password pair and open a session.
    ///
    /// `requested_lifetime` applies to the access token only and is clamped to
    /// one hour. An unknown email and a wrong password fail identically.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        requested_lifetime: Option<Duration>,
    ) -> Result<Session, AuthError> {
        let user = self
            .users
            .lookup_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredential)?;

        if !self.verify_password(password, &user.hashed_password).await? {
            return Err(AuthError::InvalidCredential);
        }

        let now = self.clock.now();
        let access_token = self.codec.issue(user.id, requested_lifetime, now)?;
        let (refresh_token, refresh_token_expires_at) =
            self.refresh_tokens.issue(user.id, now).await?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(Session {
            user,
            access_token,
            refresh_token,
            refresh_token_expires_at,
        })
    }

    /// Identify the caller from the access token in the request headers.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Uuid, AuthError> {
        let token = extract_bearer(headers)?;
        self.codec.validate(token, self.clock.now())
    }

    /// Exchange the refresh token in the request headers for a fresh
    /// one-hour access token. The refresh token itself is left as is.
    pub async fn refresh(&self, headers: &HeaderMap) -> Result<String, AuthError> {
        let token = extract_bearer(headers)?;
        let now = self.clock.now();
        let user_id = self.refresh_tokens.resolve(token, now).await?;

        let access_token = self.codec.issue(user_id, None, now)?;
        tracing::info!(user_id = %user_id, "Access token refreshed");
        Ok(access_token)
    }

    /// Revoke the refresh token in the request headers.
    pub async fn revoke(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let token = extract_bearer(headers)?;
        self.refresh_tokens.revoke(token, self.clock.now()).await
    }

    /// Replace the email and password of an authenticated user.
    pub async fn update_credentials(
        &self,
        user_id: Uuid,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let hashed_password = self.hash_password(password).await?;
        let user = self
            .users
            .update(user_id, email, &hashed_password)
            .await?
            .ok_or(AuthError::UnknownSubject)?;

        tracing::info!(user_id = %user.id, "User credentials updated");
        Ok(user)
    }

    /// Delete every refresh token and user. Only allowed on the dev platform.
    pub async fn reset(&self, platform: Platform) -> Result<(), AuthError> {
        if !platform.is_dev() {
            return Err(AuthError::Forbidden);
        }

        self.refresh_tokens.clear_all().await?;
        self.users.delete_all().await?;
        tracing::warn!("All users and refresh tokens deleted");
        Ok(())
    }
}
