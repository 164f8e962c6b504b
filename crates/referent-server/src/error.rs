use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use referent_core::error::AppError;

use crate::dto::ErrorResponse;

/// Everything a handler can fail with, rendered as `{"error": <message>}`.
#[derive(Debug)]
pub enum ApiError {
    App(AppError),
    /// The request body could not be read as JSON.
    Rejection(JsonRejection),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejection(rejection)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::App(err) => app_status(err),
            ApiError::Rejection(
                JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_),
            ) => StatusCode::BAD_REQUEST,
            ApiError::Rejection(rejection) => rejection.status(),
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::App(err) => err.to_string(),
            ApiError::Rejection(rejection) => rejection.body_text(),
        }
    }
}

fn app_status(err: &AppError) -> StatusCode {
    match err {
        AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
        AppError::UpstreamError { status_code, .. } => {
            StatusCode::from_u16(*status_code).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        AppError::ModelLoading => StatusCode::SERVICE_UNAVAILABLE,
        AppError::ContentUnavailable => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::Busy => StatusCode::CONFLICT,
        AppError::ConfigError(_)
        | AppError::NetworkError(_)
        | AppError::HttpError(_)
        | AppError::UnexpectedFormat(_)
        | AppError::SerializationError(_)
        | AppError::Generic(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!(%status, "{message}");
        } else {
            tracing::warn!(%status, "{message}");
        }

        (status, axum::Json(ErrorResponse { error: message })).into_response()
    }
}
