//! Error responses.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::{truncate, EcommerceError, MAX_DETAIL};

#[derive(Debug)]
pub struct ApiError(pub EcommerceError);

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    fn category(&self) -> &'static str {
        match &self.0 {
            EcommerceError::Validation(_) => "validation_error",
            EcommerceError::NotFound(_) => "not_found",
            EcommerceError::InvalidReference(_) => "invalid_reference",
            EcommerceError::EmptyCart => "empty_cart",
            EcommerceError::Storage(_) => "storage_error",
        }
    }

    fn status(&self) -> StatusCode {
        match &self.0 {
            EcommerceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EcommerceError::NotFound(_) => StatusCode::NOT_FOUND,
            EcommerceError::InvalidReference(_) | EcommerceError::EmptyCart => StatusCode::BAD_REQUEST,
            EcommerceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EcommerceError> for ApiError {
    fn from(error: EcommerceError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self.0 {
            EcommerceError::Storage(source) => {
                error!("storage failure: {source}");
                format!("Storage error: {}", truncate(&source.to_string(), MAX_DETAIL))
            }
            other => other.to_string(),
        };
        let body = ErrorBody { error: self.category(), message };
        (self.status(), Json(body)).into_response()
    }
}

macro_rules! rejection_is_validation {
    ($($rejection:ty),+) => {$(
        impl From<$rejection> for ApiError {
            fn from(rejection: $rejection) -> Self {
                Self(EcommerceError::Validation(rejection.body_text()))
            }
        }
    )+};
}

rejection_is_validation!(JsonRejection, QueryRejection, PathRejection);
