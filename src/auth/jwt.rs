/// Access Token Generation and Validation
///
/// Access tokens are HS256 JWTs signed with the process-wide secret. They are
/// never stored: validity is the signature plus the `exp` claim, so the only
/// way to end one early is to rotate the secret.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::configuration::AuthSettings;
use crate::error::AuthError;

/// Upper bound on any access token lifetime, in seconds.
pub const MAX_ACCESS_TOKEN_LIFETIME_SECS: i64 = 60 * 60;

/// Clamp a requested lifetime into `(0, 1 hour]`.
///
/// Missing, zero, negative and over-long requests all become exactly one hour.
pub fn clamp_lifetime(requested: Option<Duration>) -> Duration {
    let max = Duration::seconds(MAX_ACCESS_TOKEN_LIFETIME_SECS);
    match requested {
        Some(lifetime) if lifetime > Duration::zero() && lifetime < max => lifetime,
        _ => max,
    }
}

/// Convert a client-supplied lifetime in seconds.
///
/// Values `Duration` cannot represent are treated as absent, so they get the
/// default one hour like any other out-of-range request.
pub fn requested_lifetime(seconds: Option<i64>) -> Option<Duration> {
    seconds.and_then(Duration::try_seconds)
}

/// Signs and verifies access tokens with a single shared secret.
#[derive(Clone)]
pub struct AccessTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl AccessTokenCodec {
    /// # Errors
    /// Returns `Signing` if `secret` is empty
    pub fn new(secret: &str, issuer: impl Into<String>) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Signing(
                "signing secret must not be empty".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
        })
    }

    pub fn from_settings(settings: &AuthSettings) -> Result<Self, AuthError> {
        Self::new(settings.secret.expose_secret(), settings.issuer.clone())
    }

    /// Issue an access token for `user_id`, valid from `now` for the clamped
    /// `lifetime`.
    pub fn issue(
        &self,
        user_id: Uuid,
        lifetime: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        self.sign(user_id, clamp_lifetime(lifetime), now)
    }

    /// Sign with an exact lifetime, bypassing the clamp.
    pub(crate) fn sign(
        &self,
        user_id: Uuid,
        lifetime: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = Claims::new(user_id, self.issuer.clone(), now, lifetime);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Validate a token and return the user it identifies.
    ///
    /// # Errors
    /// - `InvalidSignature` if the token was not signed with this secret
    /// - `MalformedToken` if it does not decode into the expected claims,
    ///   names another issuer, or carries a non-UUID subject
    /// - `TokenExpired` if `now` is past `exp`
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, AuthError> {
        let claims = self.decode_claims(token)?;

        if claims.is_expired_at(now) {
            return Err(AuthError::TokenExpired);
        }

        claims.user_id()
    }

    /// Verify the signature and issuer and return the raw claims, without
    /// looking at the clock.
    pub fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock, not the system time.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::MalformedToken,
            })
    }
}
