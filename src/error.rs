/// Error handling for the chirpy service
///
/// This module provides the unified error type for the entire application.
/// It covers:
/// 1. Domain-specific error types (validation, database, authentication)
/// 2. The central `AppError` used as the handler return type
/// 3. HTTP response mapping with structured logging

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// ============================================================================
/// 1. DOMAIN-SPECIFIC ERROR TYPES
/// ============================================================================

/// Validation errors for input data
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("{0} is empty")]
    EmptyField(String),
    #[error("{0} is too long (maximum {1} characters)")]
    TooLong(String, usize),
    #[error("{0} has invalid format")]
    InvalidFormat(String),
    #[error("request body could not be decoded: {0}")]
    MalformedBody(String),
}

/// Database operation errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Duplicate entry: {0}")]
    UniqueConstraintViolation(String),
    #[error("Database connection error: {0}")]
    ConnectionPool(String),
    #[error("Query error: {0}")]
    QueryExecution(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                DatabaseError::UniqueConstraintViolation(db_err.message().to_string())
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => DatabaseError::ConnectionPool(err.to_string()),
            _ => DatabaseError::QueryExecution(err.to_string()),
        }
    }
}

/// Authentication and session errors
///
/// Every variant except the infrastructure ones (`Hashing`, `Signing`,
/// `Persistence`) and `Forbidden` is reported to clients as a plain 401.
/// The specific reason only reaches the server log.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. The two cases are never distinguished.
    #[error("Incorrect email or password")]
    InvalidCredential,
    #[error("Missing authorization header")]
    MissingCredential,
    #[error("Malformed authorization header")]
    MalformedCredential,
    #[error("Token signature is invalid")]
    InvalidSignature,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Token is malformed")]
    MalformedToken,
    #[error("Token subject no longer exists")]
    UnknownSubject,
    #[error("Refresh token not found")]
    RefreshTokenNotFound,
    #[error("Refresh token has been revoked")]
    RefreshTokenRevoked,
    #[error("Refresh token has expired")]
    RefreshTokenExpired,
    #[error("Password hashing failed: {0}")]
    Hashing(String),
    #[error("Token signing failed: {0}")]
    Signing(String),
    #[error("Operation is not available on this platform")]
    Forbidden,
    #[error(transparent)]
    Persistence(#[from] DatabaseError),
}

impl AuthError {
    /// True for every failure that must surface as a uniform 401.
    pub fn is_unauthorized(&self) -> bool {
        !matches!(
            self,
            AuthError::Hashing(_)
                | AuthError::Signing(_)
                | AuthError::Forbidden
                | AuthError::Persistence(_)
        )
    }
}

/// ============================================================================
/// 2. UNIFIED APPLICATION ERROR TYPE
/// ============================================================================

/// Central error type that all handler errors map to
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

// ============================================================================
// 3. HTTP RESPONSE MAPPING
// ============================================================================

/// Error response structure for HTTP responses
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Human-readable error message
    pub message: String,
    /// Error code for client-side handling
    pub code: String,
    /// HTTP status code
    pub status: u16,
    /// Timestamp when error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, message: String, code: String, status: u16) -> Self {
        Self {
            error_id,
            message,
            code,
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Trait for converting errors to HTTP responses with proper logging
pub trait ErrorHandler {
    fn error_response(&self, request_id: &str) -> (StatusCode, ErrorResponse);
    fn log_error(&self, request_id: &str);
}

fn classify_database(e: &DatabaseError) -> (StatusCode, &'static str, String) {
    match e {
        DatabaseError::UniqueConstraintViolation(_) => (
            StatusCode::CONFLICT,
            "DUPLICATE_ENTRY",
            "Duplicate entry".to_string(),
        ),
        DatabaseError::ConnectionPool(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            "Database service temporarily unavailable".to_string(),
        ),
        DatabaseError::QueryExecution(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "DATABASE_ERROR",
            "Database error occurred".to_string(),
        ),
    }
}

impl AppError {
    /// Status, client-facing code and client-facing message for this error.
    fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
            AppError::Database(e) => classify_database(e),
            AppError::Auth(e) => match e {
                AuthError::InvalidCredential => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    e.to_string(),
                ),
                AuthError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", "Forbidden".to_string()),
                AuthError::Persistence(db) => classify_database(db),
                AuthError::Hashing(_) | AuthError::Signing(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                ),
                _ => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Unauthorized".to_string()),
            },
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        }
    }
}

impl ErrorHandler for AppError {
    fn error_response(&self, request_id: &str) -> (StatusCode, ErrorResponse) {
        let (status, code, message) = self.classify();
        let error_response = ErrorResponse::new(
            request_id.to_string(),
            message,
            code.to_string(),
            status.as_u16(),
        );

        (status, error_response)
    }

    fn log_error(&self, request_id: &str) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Validation error");
            }
            AppError::Database(DatabaseError::UniqueConstraintViolation(_))
            | AppError::Auth(AuthError::Persistence(DatabaseError::UniqueConstraintViolation(_))) => {
                tracing::warn!(request_id = request_id, error = %self, "Duplicate entry attempt");
            }
            AppError::Database(e) => {
                tracing::error!(request_id = request_id, error = %e, "Database error");
            }
            AppError::Auth(AuthError::InvalidCredential) => {
                tracing::warn!(request_id = request_id, "Invalid credentials attempt");
            }
            AppError::Auth(e) if e.is_unauthorized() || matches!(e, AuthError::Forbidden) => {
                tracing::warn!(request_id = request_id, error = %e, "Authentication error");
            }
            AppError::Auth(e) => {
                tracing::error!(request_id = request_id, error = %e, "Authentication infrastructure error");
            }
            AppError::NotFound(what) => {
                tracing::debug!(request_id = request_id, resource = %what, "Resource not found");
            }
            AppError::Internal(msg) => {
                tracing::error!(request_id = request_id, error = %msg, "Internal error");
            }
        }
    }
}

/// Implement ResponseError for Actix-web integration
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let request_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&request_id);

        let (status, error_response) = <Self as ErrorHandler>::error_response(self, &request_id);

        HttpResponse::build(status).json(error_response)
    }

    fn status_code(&self) -> StatusCode {
        self.classify().0
    }
}

// ============================================================================
// 4. ERROR CONTEXT ENRICHMENT
// ============================================================================

/// Per-operation context carried into structured log lines
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub request_id: String,
    pub user_id: Option<String>,
    pub operation: String,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            user_id: None,
            operation: operation.into(),
        }
    }

    pub fn with_user_id(mut self, user_id: String) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Tag a failure with this context so the client-facing `error_id` and
    /// the error log line carry the handler's `request_id`.
    pub fn attach(&self, error: impl Into<AppError>) -> RequestError {
        RequestError {
            request_id: self.request_id.clone(),
            operation: self.operation.clone(),
            error: error.into(),
        }
    }
}

/// An `AppError` raised inside a handler that already owns a request id
#[derive(Debug, Error)]
#[error("{operation}: {error}")]
pub struct RequestError {
    pub request_id: String,
    pub operation: String,
    #[source]
    pub error: AppError,
}

impl ResponseError for RequestError {
    fn error_response(&self) -> HttpResponse {
        tracing::debug!(
            request_id = %self.request_id,
            operation = %self.operation,
            "Handler failed"
        );
        self.error.log_error(&self.request_id);

        let (status, error_response) =
            <AppError as ErrorHandler>::error_response(&self.error, &self.request_id);

        HttpResponse::build(status).json(error_response)
    }

    fn status_code(&self) -> StatusCode {
        self.error.classify().0
    }
}
