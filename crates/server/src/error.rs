use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::analytics::AnalyticsError;
use thiserror::Error;
use tracing::error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid input or a referential violation; message names the field.
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Analytics(AnalyticsError::InvalidAnalysisType(_)) => StatusCode::BAD_REQUEST,
            ApiError::Analytics(AnalyticsError::Database(_)) | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        if status.is_server_error() {
            // Internal tool: the raw driver message goes out unsanitized.
            error!(status = %status, message, "request failed");
        }
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_analysis_type_maps_to_bad_request() {
        let err = ApiError::from(AnalyticsError::InvalidAnalysisType("bogus".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid analysis type: bogus");
    }

    #[test]
    fn database_errors_map_to_server_error() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
