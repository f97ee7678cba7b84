//! Unified error types for the people service.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Unified error type for the people service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Record store errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A record with this ID is already stored.
    #[error("person {id} already exists")]
    DuplicateId {
        /// The conflicting ID.
        id: String,
    },
}

/// Health check failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HealthError {
    /// Too many tasks alive on the runtime.
    #[error("too many tasks alive: {count} > {max}")]
    TooManyTasks {
        /// Observed alive task count.
        count: usize,
        /// Configured threshold.
        max: usize,
    },

    /// DNS lookup did not finish in time.
    #[error("lookup of {host} timed out after {timeout:?}")]
    DnsTimeout {
        /// Host being resolved.
        host: String,
        /// Configured timeout.
        timeout: Duration,
    },

    /// DNS lookup failed.
    #[error("lookup of {host} failed: {reason}")]
    DnsFailed {
        /// Host being resolved.
        host: String,
        /// Resolver error.
        reason: String,
    },

    /// DNS lookup returned nothing.
    #[error("lookup of {host} returned no addresses")]
    NoAddresses {
        /// Host being resolved.
        host: String,
    },
}

/// Errors returned to HTTP clients.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request body could not be decoded.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Request conflicts with stored state.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl ApiError {
    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateId { .. } => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(format!("invalid person body: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match self {
            ApiError::BadRequest(msg) | ApiError::Conflict(msg) => msg,
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;
