//! HTTP request handlers

use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use crate::inference::{predict_price, PricePrediction};
use crate::validation::{raw_fields_from_json, validate_input, RawFields};

use super::error::{Result, ServerError};
use super::pages::{self, IndexPage};
use super::state::AppState;

/// Name reported by the model-info endpoint
pub const ALGORITHM_NAME: &str = "Random Forest Regressor";

/// How the artifact is persisted, reported by the model-info endpoint
pub const PERSISTENCE_METHOD: &str = "JSON";

// ============================================================================
// Web Form Handlers
// ============================================================================

fn error_page(status: StatusCode, message: &str) -> Response {
    (status, Html(pages::render_error(message))).into_response()
}

/// Prediction form
pub async fn serve_index(State(state): State<Arc<AppState>>) -> Response {
    match state.models.get().await {
        Ok(package) => {
            let neighborhoods = package.sorted_neighborhoods();
            Html(pages::render_index(&IndexPage {
                neighborhoods: &neighborhoods,
                ..Default::default()
            }))
            .into_response()
        }
        Err(e) => {
            error!(error = %e, "Cannot render form without a model");
            error_page(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

/// Form submission: re-renders the form with either the prediction or the error
pub async fn predict_form(
    State(state): State<Arc<AppState>>,
    Form(fields): Form<RawFields>,
) -> Response {
    let package = match state.models.get().await {
        Ok(package) => package,
        Err(e) => {
            error!(error = %e, "Cannot serve prediction without a model");
            return error_page(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        }
    };
    let neighborhoods = package.sorted_neighborhoods();

    let outcome = validate_input(&fields)
        .map_err(ServerError::from)
        .and_then(|features| predict_price(&package, &features).map_err(ServerError::Prediction));

    let html = match &outcome {
        Ok(prediction) => {
            info!(predicted_price = prediction.predicted_price, "Form prediction served");
            pages::render_index(&IndexPage {
                neighborhoods: &neighborhoods,
                form: Some(&fields),
                prediction: Some(prediction),
                error: None,
            })
        }
        Err(e) => {
            if e.status().is_server_error() {
                error!(error = %e, "Form prediction failed");
            }
            let message = e.to_string();
            pages::render_index(&IndexPage {
                neighborhoods: &neighborhoods,
                form: Some(&fields),
                prediction: None,
                error: Some(&message),
            })
        }
    };

    Html(html).into_response()
}

// ============================================================================
// JSON API Handlers
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    #[serde(flatten)]
    pub prediction: PricePrediction,
}

/// JSON prediction: 400 on bad input, 500 when the model cannot answer
pub async fn api_predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PredictResponse>> {
    let data: serde_json::Value = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ServerError::BadRequest(format!("Invalid JSON: {}", e)))?
    };

    let object = match data {
        serde_json::Value::Object(map) if !map.is_empty() => map,
        _ => return Err(ServerError::BadRequest("No data provided".to_string())),
    };

    let features = validate_input(&raw_fields_from_json(&object))?;
    let package = state.package().await?;
    let prediction = predict_price(&package, &features).map_err(ServerError::Prediction)?;

    Ok(Json(PredictResponse {
        success: true,
        prediction,
    }))
}

/// Neighborhood vocabulary, sorted
pub async fn list_neighborhoods(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>> {
    let package = state.package().await?;

    Ok(Json(json!({
        "success": true,
        "neighborhoods": package.sorted_neighborhoods(),
    })))
}

/// Metrics recorded at training time
pub async fn model_info(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>> {
    let package = state.package().await?;
    let metrics = &package.metrics;

    Ok(Json(json!({
        "success": true,
        "algorithm": ALGORITHM_NAME,
        "features": package.selected_features(),
        "n_estimators": package.model.n_estimators(),
        "metrics": {
            "test_r2": metrics.test.r2,
            "test_rmse": metrics.test.rmse,
            "test_mae": metrics.test.mae,
            "cv_mean_r2": metrics.cv_mean,
            "cv_std_r2": metrics.cv_std,
        },
        "persistence_method": PERSISTENCE_METHOD,
    })))
}

// ============================================================================
// System Handlers
// ============================================================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    let timestamp = chrono::Utc::now().to_rfc3339();

    match state.models.get().await {
        Ok(_) => Json(json!({
            "status": "healthy",
            "model_loaded": true,
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": timestamp,
        }))
        .into_response(),
        Err(e) => {
            error!(error = %e, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "unhealthy",
                    "model_loaded": false,
                    "error": e.to_string(),
                    "timestamp": timestamp,
                })),
            )
                .into_response()
        }
    }
}

/// Unknown routes: JSON under `/api`, an HTML page elsewhere
pub async fn handle_404(uri: Uri) -> Response {
    if uri.path().starts_with("/api/") || uri.path() == "/api" {
        ServerError::NotFound("Not found".to_string()).into_response()
    } else {
        error_page(StatusCode::NOT_FOUND, "Page not found")
    }
}
