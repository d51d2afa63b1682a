/// Authentication module
///
/// Handles access token issue/validation, password hashing, bearer header
/// parsing and refresh token management, composed by `AuthService`.

mod bearer;
mod claims;
mod jwt;
mod password;
mod refresh_token;
mod service;

pub use bearer::extract_bearer;
pub use claims::Claims;
pub use jwt::{
    clamp_lifetime, requested_lifetime, AccessTokenCodec, MAX_ACCESS_TOKEN_LIFETIME_SECS,
};
pub use password::PasswordHasher;
pub use refresh_token::generate_refresh_token;
pub use refresh_token::{
    RefreshTokenManager, RefreshTokenRecord, SessionState, REFRESH_TOKEN_LIFETIME_DAYS,
};
pub use service::{AuthService, Session};
