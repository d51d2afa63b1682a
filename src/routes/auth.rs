/// Session Routes
///
/// Handles login, access token refresh and refresh token revocation.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{requested_lifetime, AuthService};
use crate::error::{ErrorContext, RequestError};
use crate::models::UserProfile;

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Requested access token lifetime. Anything outside (0, 3600] becomes one hour.
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserProfile,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// POST /api/login
///
/// # Errors
/// - 401: unknown email or wrong password, with the same message for both
///
/// The email is not format-checked here so a malformed address fails the
/// same way an unknown one does.
pub async fn login(
    form: web::Json<LoginRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, RequestError> {
    let context = ErrorContext::new("user_login");
    let lifetime = requested_lifetime(form.expires_in_seconds);

    let session = auth
        .login(form.email.trim(), &form.password, lifetime)
        .await
        .map_err(|e| context.attach(e))?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %session.user.id,
        refresh_token_expires_at = %session.refresh_token_expires_at,
        "Session opened"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: UserProfile::from(&session.user),
        token: session.access_token,
        refresh_token: session.refresh_token,
    }))
}

/// POST /api/refresh
///
/// Takes the refresh token as a bearer credential and returns a new access
/// token. No new refresh token is issued.
pub async fn refresh(
    req: HttpRequest,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, RequestError> {
    let context = ErrorContext::new("token_refresh");

    let token = auth
        .refresh(req.headers())
        .await
        .map_err(|e| context.attach(e))?;

    tracing::info!(request_id = %context.request_id, "Access token refreshed");
    Ok(HttpResponse::Ok().json(RefreshResponse { token }))
}

/// POST /api/revoke
///
/// Revoking an already revoked token succeeds again.
pub async fn revoke(
    req: HttpRequest,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, RequestError> {
    let context = ErrorContext::new("token_revoke");

    auth.revoke(req.headers())
        .await
        .map_err(|e| context.attach(e))?;

    tracing::info!(request_id = %context.request_id, "Refresh token revoked");
    Ok(HttpResponse::NoContent().finish())
}
