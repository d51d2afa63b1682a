/// Account Routes
///
/// Account creation and credential updates for the signed-in user.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::auth::AuthService;
use crate::error::{ErrorContext, RequestError, ValidationError};
use crate::middleware::AuthenticatedUser;
use crate::models::UserProfile;
use crate::validators::is_valid_email;

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

impl CredentialsRequest {
    /// Normalized email, with an empty password rejected
    fn validate(&self) -> Result<String, ValidationError> {
        let email = is_valid_email(&self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::EmptyField("password".to_string()));
        }
        Ok(email)
    }
}

/// POST /api/users
///
/// # Errors
/// - 400: invalid email or empty password
/// - 409: email already registered
pub async fn create_user(
    form: web::Json<CredentialsRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, RequestError> {
    let context = ErrorContext::new("user_registration");
    let email = form.validate().map_err(|e| context.attach(e))?;

    let user = auth
        .register(&email, &form.password)
        .await
        .map_err(|e| context.attach(e))?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User created"
    );

    Ok(HttpResponse::Created().json(UserProfile::from(&user)))
}

/// PUT /api/users
///
/// Replaces the email and password of the user named by the access token.
pub async fn update_user(
    user: AuthenticatedUser,
    form: web::Json<CredentialsRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, RequestError> {
    let context = ErrorContext::new("user_update").with_user_id(user.user_id.to_string());
    let email = form.validate().map_err(|e| context.attach(e))?;

    let updated = auth
        .update_credentials(user.user_id, &email, &form.password)
        .await
        .map_err(|e| context.attach(e))?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = ?context.user_id,
        "User credentials updated"
    );

    Ok(HttpResponse::Ok().json(UserProfile::from(&updated)))
}
