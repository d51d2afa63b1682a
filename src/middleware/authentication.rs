/// Request authentication
///
/// `AuthenticatedUser` is an extractor: adding it to a handler's arguments
/// makes the route require a valid access token in the Authorization header.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::AuthService;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<AuthService>>() {
            Some(auth) => auth
                .authenticate(req.headers())
                .map(|user_id| {
                    tracing::debug!(user_id = %user_id, "Access token validated");
                    AuthenticatedUser { user_id }
                })
                .map_err(AppError::from),
            None => Err(AppError::Internal(
                "authentication service is not registered".to_string(),
            )),
        };

        ready(result)
    }
}
