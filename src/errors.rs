use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use diesel::r2d2;
use serde_json::json;
use std::fmt;

/// Application-wide error types with user-friendly messages
#[derive(Debug, PartialEq)]
pub enum AppError {
    // Validation Errors
    InvalidInput { field: String, message: String },
    ResourceNotFound { resource: String },

    // Feed-related Errors
    FeedAlreadySubscribed,
    FeedNotFound,
    FeedParseError,

    // Database Errors
    DatabaseError,
    ConnectionPoolError,

    // External Service Errors
    NetworkError,
    ServiceUnavailable,

    // System Errors
    InternalError,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput { field, message } => write!(f, "Invalid {}: {}", field, message),
            AppError::ResourceNotFound { resource } => write!(f, "{} not found", resource),

            AppError::FeedAlreadySubscribed => write!(f, "Already subscribed to this feed"),
            AppError::FeedNotFound => write!(f, "Feed not found or inaccessible"),
            AppError::FeedParseError => write!(f, "Unable to parse feed - invalid format"),

            AppError::DatabaseError => write!(f, "A database error occurred - please try again"),
            AppError::ConnectionPoolError => {
                write!(f, "Service temporarily unavailable - please try again")
            }

            AppError::NetworkError => write!(f, "Network error - could not reach the feed"),
            AppError::ServiceUnavailable => {
                write!(f, "Feed host unavailable - please try again later")
            }

            AppError::InternalError => write!(f, "An unexpected error occurred - please try again"),
        }
    }
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput { .. } => "INVALID_INPUT",
            AppError::ResourceNotFound { .. } => "RESOURCE_NOT_FOUND",
            AppError::FeedAlreadySubscribed => "FEED_ALREADY_SUBSCRIBED",
            AppError::FeedNotFound => "FEED_NOT_FOUND",
            AppError::FeedParseError => "FEED_PARSE_ERROR",
            AppError::DatabaseError => "DATABASE_ERROR",
            AppError::ConnectionPoolError => "CONNECTION_POOL_ERROR",
            AppError::NetworkError => "NETWORK_ERROR",
            AppError::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            AppError::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::InvalidInput { .. }
            | AppError::FeedAlreadySubscribed
            | AppError::FeedParseError => StatusCode::BAD_REQUEST,

            // 404 Not Found
            AppError::ResourceNotFound { .. } | AppError::FeedNotFound => StatusCode::NOT_FOUND,

            // 500 Internal Server Error
            AppError::DatabaseError | AppError::ConnectionPoolError | AppError::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 502 Bad Gateway
            AppError::NetworkError => StatusCode::BAD_GATEWAY,

            // 503 Service Unavailable
            AppError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Log detailed error information for debugging
        match self {
            AppError::DatabaseError | AppError::ConnectionPoolError | AppError::InternalError => {
                log::error!("Server error: {:?}", self);
            }
            _ => {
                log::info!("Client error: {:?}", self);
            }
        }

        HttpResponse::build(self.status_code()).json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string()
            }
        }))
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn invalid_input(field: &str, message: &str) -> Self {
        AppError::InvalidInput {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn resource_not_found(resource: &str) -> Self {
        AppError::ResourceNotFound {
            resource: resource.to_string(),
        }
    }
}

/// Convert database connection pool errors
impl From<r2d2::PoolError> for AppError {
    fn from(err: r2d2::PoolError) -> Self {
        log::error!("Database connection pool error: {}", err);
        AppError::ConnectionPoolError
    }
}

/// Convert diesel database errors
impl From<diesel::result::Error> for AppError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::Error as DieselError;

        match err {
            DieselError::NotFound => AppError::ResourceNotFound {
                resource: "Record".to_string(),
            },
            _ => {
                log::error!("Database error: {}", err);
                AppError::DatabaseError
            }
        }
    }
}

/// Convert network/reqwest errors
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        log::warn!("Network error: {}", err);
        if err.is_timeout() || err.is_connect() {
            AppError::NetworkError
        } else {
            AppError::ServiceUnavailable
        }
    }
}

/// Convert feed parsing errors
impl From<feed_rs::parser::ParseFeedError> for AppError {
    fn from(err: feed_rs::parser::ParseFeedError) -> Self {
        log::warn!("Feed parse error: {}", err);
        AppError::FeedParseError
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        log::error!("Template render error: {}", err);
        AppError::InternalError
    }
}
