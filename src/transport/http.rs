//! HTTP surface: prediction, judgement, health and the bundled web page.

use crate::core::service::PredictionService;
use crate::domain::model::{InputRecord, JudgeRequest, JudgeResponse, PredictResponse};
use crate::transport::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub struct AppState {
    pub service: PredictionService,
}

impl AppState {
    pub fn new(service: PredictionService) -> Self {
        Self { service }
    }
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let artifact = state.service.artifact();
    Json(json!({
        "status": "ok",
        "feature_columns": artifact.feature_columns().len(),
        "cities": artifact.city_categories().len(),
    }))
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InputRecord>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(record) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let predicted_price = state.service.predict(&record)?;
    Ok(Json(PredictResponse { predicted_price }))
}

pub async fn judge_price(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<JudgeRequest>, JsonRejection>,
) -> Result<Json<JudgeResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let judged = state.service.judge(&request.record, request.listed_price)?;
    tracing::debug!(
        "Judged listed {} against predicted {}: {:?}",
        judged.listed_price,
        judged.predicted_price,
        judged.judgment_key
    );
    Ok(Json(judged))
}

pub fn router(state: Arc<AppState>, static_dir: Option<&str>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/judge_price", post(judge_price));

    if let Some(dir) = static_dir {
        let index = Path::new(dir).join("index.html");
        app = app
            .route_service("/", ServeFile::new(index))
            .nest_service("/static", ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
