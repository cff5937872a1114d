use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

/// Error type shared by the whole service.
///
/// Every failure the slug registry surfaces is tagged with one of three
/// kinds so the HTTP boundary can map it to a transport-level response:
/// - `Validation`: bad or dangerous input URL (4xx, the caller's fault)
/// - `NotFound`: slug absent, expired, or inactive (404)
/// - `Database`: store failure or slug retry exhaustion (5xx, operational)
#[derive(Debug, Clone)]
pub enum LinksnapError {
    Validation(String),
    NotFound(String),
    Database(String),
}

impl LinksnapError {
    pub fn code(&self) -> &'static str {
        match self {
            LinksnapError::Validation(_) => "E001",
            LinksnapError::NotFound(_) => "E002",
            LinksnapError::Database(_) => "E003",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            LinksnapError::Validation(_) => "Validation Error",
            LinksnapError::NotFound(_) => "Resource Not Found",
            LinksnapError::Database(_) => "Database Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            LinksnapError::Validation(msg) => msg,
            LinksnapError::NotFound(msg) => msg,
            LinksnapError::Database(msg) => msg,
        }
    }
}

impl fmt::Display for LinksnapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for LinksnapError {}

// Convenience constructors
impl LinksnapError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinksnapError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinksnapError::NotFound(msg.into())
    }

    pub fn database<T: Into<String>>(msg: T) -> Self {
        LinksnapError::Database(msg.into())
    }
}

impl From<sea_orm::DbErr> for LinksnapError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinksnapError::Database(err.to_string())
    }
}

impl From<std::io::Error> for LinksnapError {
    fn from(err: std::io::Error) -> Self {
        LinksnapError::Database(err.to_string())
    }
}

impl ResponseError for LinksnapError {
    fn status_code(&self) -> StatusCode {
        match self {
            LinksnapError::Validation(_) => StatusCode::BAD_REQUEST,
            LinksnapError::NotFound(_) => StatusCode::NOT_FOUND,
            LinksnapError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Internal details stay in the logs, not in the response body.
        let message = match self {
            LinksnapError::Database(_) => "Internal server error",
            _ => self.message(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

pub type Result<T> = std::result::Result<T, LinksnapError>;
