use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::response::{ApiResponse, Meta};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Ressource introuvable")]
    NotFound,

    #[error("Requête invalide : {0}")]
    BadRequest(String),

    #[error("Non authentifié : {0}")]
    Unauthorized(String),

    #[error("Accès refusé")]
    Forbidden,

    #[error("Conflit : {0}")]
    Conflict(String),

    #[error("Erreur de base de données")]
    DbError(#[from] sqlx::Error),

    #[error("Erreur de base de données")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Erreur interne du serveur")]
    Internal(#[from] anyhow::Error),

    /// Infrastructure failure replaced by a message the UI can show as is.
    #[error("{0}")]
    Action(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    /// Swap an infrastructure failure for a French user-facing message,
    /// logging the cause. Validation, auth and not-found errors are kept.
    pub fn context(self, message: &str) -> Self {
        match self {
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => {
                tracing::error!(error = ?self, "{message}");
                AppError::Action(message.to_string())
            }
            other => other,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DbError(_)
            | AppError::OrmError(_)
            | AppError::Internal(_)
            | AppError::Action(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
