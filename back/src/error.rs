use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jot_api::v1::{ErrorBody, TODO_NOT_FOUND};
use tracing::error;

use crate::store::StoreError;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error("{}", TODO_NOT_FOUND)]
    NotFound,

    #[error("Internal server error")]
    Internal(#[source] StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation { field, message } => ApiError::Validation { field, message },
            StoreError::NotFound => ApiError::NotFound,
            err => ApiError::Internal(err),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(source) = &self {
            error!(error = %source, "request failed");
        }

        let field = match &self {
            ApiError::Validation { field, .. } => Some(field.to_string()),
            _ => None,
        };

        let body = ErrorBody {
            error: self.to_string(),
            field,
        };

        (self.status_code(), Json(body)).into_response()
    }
}
