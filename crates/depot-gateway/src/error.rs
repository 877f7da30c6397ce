//! Gateway error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    /// Any storage-layer failure; reported as a generic 500
    #[error(transparent)]
    Store(#[from] depot_core::StoreError),

    /// Request body the gateway could not parse
    #[error("malformed request: {0}")]
    BadRequest(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // plain-text body, mirroring what update clients already parse
        (self.status_code(), self.to_string()).into_response()
    }
}
