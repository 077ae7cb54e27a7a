use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Every failure a handler can surface to a client. Each variant maps to a
/// distinct, user-displayable message; nothing here is swallowed silently.
#[derive(Debug, Display)]
pub enum ApiError {
    /// Distance gate failed (or coordinates were unusable — gate fails closed).
    #[display(fmt = "Not within office")]
    OutOfRange,

    #[display(fmt = "Already checked in today")]
    AlreadyCheckedIn,

    #[display(fmt = "Already checked out today")]
    AlreadyCheckedOut,

    #[display(fmt = "No active check-in found for today")]
    NoActiveCheckIn,

    #[display(fmt = "Month and year are required")]
    InvalidWindow,

    #[display(fmt = "{}", _0)]
    NotFound(&'static str),

    #[display(fmt = "Internal Server Error")]
    Database(sqlx::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::OutOfRange => StatusCode::FORBIDDEN,
            ApiError::AlreadyCheckedIn
            | ApiError::AlreadyCheckedOut
            | ApiError::NoActiveCheckIn
            | ApiError::InvalidWindow => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Database(e) = self {
            tracing::error!(error = %e, "Database error");
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Database(e)
    }
}
