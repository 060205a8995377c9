//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::PredictorError;
use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ModelUnavailable(PredictorError),

    #[error("Prediction error: {0}")]
    Prediction(PredictorError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Validation(_) | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::ModelUnavailable(_) | ServerError::Prediction(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        match &self {
            ServerError::ModelUnavailable(e) => {
                tracing::error!(detail = %e, "Model unavailable");
            }
            ServerError::Prediction(e) => {
                tracing::error!(detail = %e, "Prediction failed");
            }
            _ => {}
        }

        let body = Json(json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_status_mapping() {
        let validation = ServerError::from(ValidationError::GarageCarsOutOfRange);
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(validation.to_string(), "Garage Cars must be between 0 and 4");

        let missing = ServerError::ModelUnavailable(PredictorError::ArtifactNotFound(
            PathBuf::from("model/house_price_model.json"),
        ));
        assert_eq!(missing.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let failed = ServerError::Prediction(PredictorError::ModelNotFitted);
        assert_eq!(failed.to_string(), "Prediction error: Model not fitted");
    }

    #[tokio::test]
    async fn test_json_body() {
        let response = ServerError::BadRequest("No data provided".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "No data provided");
    }
}
