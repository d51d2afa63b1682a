use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::auth::AuthService;
use crate::configuration::ApplicationSettings;
use crate::error::{AuthError, ErrorContext, RequestError};
use crate::middleware::FileserverHits;
use crate::store::ChirpStore;

/// GET /admin/metrics
pub async fn metrics(hits: web::Data<FileserverHits>) -> HttpResponse {
    let body = format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>",
        hits.load()
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// POST /admin/reset
///
/// Zeroes the hit counter and deletes every chirp, refresh token and user.
/// Answers 403 on any platform other than `dev`.
pub async fn reset(
    application: web::Data<ApplicationSettings>,
    hits: web::Data<FileserverHits>,
    chirps: web::Data<dyn ChirpStore>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, RequestError> {
    let context = ErrorContext::new("admin_reset");

    if !application.platform.is_dev() {
        return Err(context.attach(AuthError::Forbidden));
    }

    hits.reset();
    chirps
        .delete_all()
        .await
        .map_err(|e| context.attach(e))?;
    auth.reset(application.platform)
        .await
        .map_err(|e| context.attach(e))?;

    tracing::warn!(request_id = %context.request_id, "Application state reset");
    Ok(HttpResponse::Ok().json(json!({ "message": "all users deleted" })))
}
