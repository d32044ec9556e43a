use aqariy_price::core::artifact::ModelArtifact;
use aqariy_price::core::encoder::{city_column, DirectField, CITY_PREFIX};
use aqariy_price::core::regressor::{LinearModel, RegressorModel};
use aqariy_price::transport::{router, AppState};
use aqariy_price::PredictionService;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// price = 1000 * area + 20000 for Ramallah
fn app(static_dir: Option<&str>) -> Router {
    let mut columns: Vec<String> = DirectField::ALL
        .iter()
        .map(|f| f.column().to_string())
        .collect();
    columns.push(city_column(CITY_PREFIX, "رام الله"));

    let mut coefficients = vec![0.0; columns.len()];
    coefficients[3] = 1000.0;
    coefficients[9] = 20000.0;
    let regressor = RegressorModel::Linear(LinearModel {
        intercept: 0.0,
        coefficients,
    });

    let artifact =
        ModelArtifact::from_parts(Box::new(regressor), columns, vec!["رام الله".to_string()])
            .unwrap();
    router(
        Arc::new(AppState::new(PredictionService::new(artifact))),
        static_dir,
    )
}

fn body() -> Value {
    json!({
        "عدد_الغرف": 3,
        "عدد_الحمامات": 2,
        "مفروشة": 1,
        "مساحة_البناء": 100,
        "الطابق": 2,
        "عمر_البناء": 7,
        "العقار_مرهون": 0,
        "طريقة_الدفع": 1,
        "مصعد": 1,
        "المدينة": "رام الله"
    })
}

async fn post_json(app: Router, uri: &str, payload: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_predict_returns_rounded_price() {
    let (status, json) = post_json(app(None), "/predict", &body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "predicted_price": 120000.0 }));
}

#[tokio::test]
async fn test_predict_with_parking_premium() {
    let mut payload = body();
    payload["موقف_سيارات"] = json!(1);

    let (status, json) = post_json(app(None), "/predict", &payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["predicted_price"], json!(121320.0));
}

#[tokio::test]
async fn test_unknown_city_is_not_an_error() {
    let mut payload = body();
    payload["المدينة"] = json!("القدس");

    let (status, json) = post_json(app(None), "/predict", &payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["predicted_price"], json!(100000.0));
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let mut payload = body();
    payload.as_object_mut().unwrap().remove("مصعد");

    let (status, json) = post_json(app(None), "/predict", &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].as_str().unwrap().contains("مصعد"));
}

#[tokio::test]
async fn test_negative_count_is_bad_request() {
    let mut payload = body();
    payload["عدد_الغرف"] = json!(-1);

    let (status, json) = post_json(app(None), "/predict", &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn test_invalid_flag_is_bad_request() {
    let mut payload = body();
    payload["مفروشة"] = json!(2);

    let (status, json) = post_json(app(None), "/predict", &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].as_str().unwrap().contains("مفروشة"));
}

#[tokio::test]
async fn test_judge_price() {
    let mut payload = body();
    payload["listed_price"] = json!(90000);

    let (status, json) = post_json(app(None), "/judge_price", &payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["predicted_price"], json!(120000.0));
    assert_eq!(json["listed_price"], json!(90000.0));
    assert_eq!(json["ratio"], json!(0.75));
    assert_eq!(json["judgment_key"], json!("GOOD_DEAL"));
}

#[tokio::test]
async fn test_judge_price_rejects_non_positive_listing() {
    let mut payload = body();
    payload["listed_price"] = json!(0);

    let (status, json) = post_json(app(None), "/judge_price", &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app(None).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["feature_columns"], 10);
}

#[tokio::test]
async fn test_index_served_from_static_dir() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("index.html"), "<h1>عقاري</h1>").unwrap();
    std::fs::write(temp_dir.path().join("script.js"), "console.log(1);").unwrap();
    let app = app(Some(temp_dir.path().to_str().unwrap()));

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(std::str::from_utf8(&bytes).unwrap(), "<h1>عقاري</h1>");

    let request = Request::builder()
        .uri("/static/script.js")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
