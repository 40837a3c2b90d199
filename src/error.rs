//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Missing or invalid credentials")]
    Unauthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] crate::domain::DomainError),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }

            // 401 Unauthorized
            AppError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "unauthenticated", None)
            }

            // 403 Forbidden
            AppError::Forbidden(msg) => {
                (StatusCode::FORBIDDEN, "forbidden", Some(msg.clone()))
            }

            // Domain errors - map to appropriate HTTP status
            AppError::Domain(ref domain_err) => {
                use crate::domain::DomainError;
                match domain_err {
                    DomainError::TeamNotFound(id) => {
                        (StatusCode::NOT_FOUND, "team_not_found", Some(id.clone()))
                    }
                    DomainError::PlayerNotFound(id) => {
                        (StatusCode::NOT_FOUND, "player_not_found", Some(id.to_string()))
                    }
                    DomainError::EventNotFound(id) => {
                        (StatusCode::NOT_FOUND, "event_not_found", Some(id.to_string()))
                    }
                    DomainError::UserNotFound(id) => {
                        (StatusCode::NOT_FOUND, "user_not_found", Some(id.to_string()))
                    }
                    DomainError::DeclarationNotFound(id) => {
                        (StatusCode::NOT_FOUND, "declaration_not_found", Some(id.to_string()))
                    }
                    DomainError::TeamAlreadyExists(id) => {
                        (StatusCode::CONFLICT, "team_already_exists", Some(id.clone()))
                    }
                    DomainError::TeamIdentityChange => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "team_identity_change", None)
                    }
                    DomainError::InvalidSlug(input) => {
                        (StatusCode::BAD_REQUEST, "invalid_slug", Some(input.clone()))
                    }
                    DomainError::InvalidTimeWindow => {
                        (StatusCode::BAD_REQUEST, "invalid_time_window", None)
                    }
                    DomainError::EmptyParticipantSelection => {
                        (StatusCode::BAD_REQUEST, "empty_participant_selection", None)
                    }
                    DomainError::PlayerNotOnRoster { .. } => {
                        (StatusCode::BAD_REQUEST, "player_not_on_roster", Some(domain_err.to_string()))
                    }
                    DomainError::NotAParticipant(id) => {
                        (StatusCode::BAD_REQUEST, "not_a_participant", Some(id.to_string()))
                    }
                    DomainError::DeclarationsClosed { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "event_not_open_for_declarations", Some(domain_err.to_string()))
                    }
                    DomainError::InvalidTransition { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "invalid_status_transition", Some(domain_err.to_string()))
                    }
                    DomainError::MainTeamNotInTeams(id) => {
                        (StatusCode::BAD_REQUEST, "main_team_not_in_teams", Some(id.clone()))
                    }
                    DomainError::MultiTeamEditUnsupported => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "multi_team_edit_unsupported", None)
                    }
                    DomainError::Unauthorized(msg) => {
                        (StatusCode::FORBIDDEN, "unauthorized", Some(msg.clone()))
                    }
                    DomainError::Validation(msg) => {
                        (StatusCode::BAD_REQUEST, "validation_failed", Some(msg.clone()))
                    }
                }
            }

            // 500 Internal Server Error
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
