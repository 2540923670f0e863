use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::error::AppError;
use crate::http::api_types::ErrorResponse;
use crate::limiter::AdmissionError;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Parse(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BodyTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Admission(AdmissionError::Closed | AdmissionError::Timeout { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Admission(_)
            | AppError::Transport(_)
            | AppError::Serialization(_)
            | AppError::Config(_)
            | AppError::Init(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed ({}): {}", status, self);
        } else {
            warn!("Request rejected ({}): {}", status, self);
        }

        let body = ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Parse("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Validation("x".into()).status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(AppError::BodyTooLarge(10).status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            AppError::from(AdmissionError::Closed).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::from(AdmissionError::Timeout { waited: Duration::from_millis(5) }).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::from(AdmissionError::WorkerPanicked).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::Transport("reset".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
