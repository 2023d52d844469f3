use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Failed to load artifact: {0}")]
    ArtifactError(String),

    #[error("Value not recognized for {field}: '{value}' (expected one of: {expected})")]
    UnrecognizedValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Inference failed: {0}")]
    InferenceError(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl PredictError {
    /// Prefix an artifact error with the location it refers to
    pub fn context(self, location: impl std::fmt::Display) -> Self {
        match self {
            PredictError::ArtifactError(msg) => {
                PredictError::ArtifactError(format!("{}: {}", location, msg))
            }
            other => other,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PredictError::ArtifactError(_) => "ARTIFACT_ERROR",
            PredictError::UnrecognizedValue { .. } => "VALUE_NOT_RECOGNIZED",
            PredictError::InvalidInput(_) => "INVALID_INPUT",
            PredictError::InvalidRequest(_) => "INVALID_REQUEST",
            PredictError::InferenceError(_) => "INFERENCE_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            PredictError::UnrecognizedValue { .. } | PredictError::InvalidInput(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            PredictError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            PredictError::ArtifactError(_) | PredictError::InferenceError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_value_message() {
        let err = PredictError::UnrecognizedValue {
            field: "Sex".to_string(),
            value: "X".to_string(),
            expected: "F, M".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Value not recognized for Sex: 'X' (expected one of: F, M)"
        );
        assert_eq!(err.code(), "VALUE_NOT_RECOGNIZED");
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_context_prefixes_artifact_errors_only() {
        let err = PredictError::ArtifactError("bad".to_string()).context("model.json");
        assert_eq!(err.to_string(), "Failed to load artifact: model.json: bad");

        let err = PredictError::InvalidInput("bad".to_string()).context("model.json");
        assert_eq!(err.to_string(), "Invalid input: bad");
    }

    #[test]
    fn test_invalid_request_is_bad_request() {
        let err = PredictError::InvalidRequest("missing field `Sex`".to_string());
        assert_eq!(err.code(), "INVALID_REQUEST");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid request: missing field `Sex`");
    }

    #[test]
    fn test_inference_error_is_server_side() {
        let response = PredictError::InferenceError("bad shape".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
