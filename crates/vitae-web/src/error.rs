use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use vitae_core::ingest::ReadError;
use vitae_core::NerError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Upload { status: StatusCode, message: String },

    #[error(transparent)]
    Parse(#[from] vitae_core::Error),
}

impl ApiError {
    pub fn bad_upload(message: impl Into<String>) -> Self {
        Self::Upload {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Upload { status, .. } => *status,
            Self::Parse(err) if err.is_unsupported_format() => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Parse(err) if err.is_extraction_failure() => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Parse(vitae_core::Error::Ner(NerError::Timeout(_))) => StatusCode::GATEWAY_TIMEOUT,
            Self::Parse(vitae_core::Error::Ner(_)) => StatusCode::BAD_GATEWAY,
            Self::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ReadError> for ApiError {
    fn from(err: ReadError) -> Self {
        Self::Parse(err.into())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::Upload {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Upload {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "Request failed");
        } else {
            tracing::warn!(%status, error = %self, "Request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}
