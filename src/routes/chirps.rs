use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, ErrorContext, RequestError, ValidationError};
use crate::middleware::AuthenticatedUser;
use crate::store::ChirpStore;
use crate::validators::validate_chirp;

#[derive(Deserialize)]
pub struct ChirpRequest {
    pub body: String,
}

/// POST /api/chirps
///
/// The author is always the token holder.
pub async fn create_chirp(
    user: AuthenticatedUser,
    form: web::Json<ChirpRequest>,
    chirps: web::Data<dyn ChirpStore>,
) -> Result<HttpResponse, RequestError> {
    let context = ErrorContext::new("chirp_create").with_user_id(user.user_id.to_string());
    let body = validate_chirp(&form.body).map_err(|e| context.attach(e))?;

    let chirp = chirps
        .create(&body, user.user_id)
        .await
        .map_err(|e| context.attach(e))?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = ?context.user_id,
        chirp_id = %chirp.id,
        "Chirp created"
    );

    Ok(HttpResponse::Created().json(chirp))
}

/// GET /api/chirps
pub async fn list_chirps(chirps: web::Data<dyn ChirpStore>) -> Result<HttpResponse, AppError> {
    let all = chirps.list().await?;
    tracing::debug!(count = all.len(), "Chirps listed");
    Ok(HttpResponse::Ok().json(all))
}

/// GET /api/chirps/{chirpID}
///
/// # Errors
/// - 400: the path segment is not a UUID
/// - 404: no chirp with that id
pub async fn get_chirp(
    path: web::Path<String>,
    chirps: web::Data<dyn ChirpStore>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = Uuid::parse_str(&path.into_inner())
        .map_err(|_| ValidationError::InvalidFormat("chirp id".to_string()))?;

    let chirp = chirps
        .get(chirp_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Chirp".to_string()))?;

    Ok(HttpResponse::Ok().json(chirp))
}
