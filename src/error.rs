// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Tile ({x}, {y}) is already occupied")]
    TileOccupied { x: u32, y: u32 },

    #[error("Not enough coins: need {required} but have {available}")]
    InsufficientFunds { required: u32, available: u32 },

    #[error("Invariant violation: {0}")]
    Invariant(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    available: Option<u32>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::InvalidLocation(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_location", Some(msg.clone()))
            }
            AppError::TileOccupied { .. } => {
                (StatusCode::CONFLICT, "tile_occupied", Some(self.to_string()))
            }
            AppError::InsufficientFunds { .. } => (
                StatusCode::BAD_REQUEST,
                "insufficient_funds",
                Some(self.to_string()),
            ),
            AppError::Invariant(msg) => {
                tracing::error!(error = %msg, "Invariant violation");
                (StatusCode::INTERNAL_SERVER_ERROR, "invariant_violation", None)
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let (required, available) = match &self {
            AppError::InsufficientFunds {
                required,
                available,
            } => (Some(*required), Some(*available)),
            _ => (None, None),
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
            required,
            available,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
