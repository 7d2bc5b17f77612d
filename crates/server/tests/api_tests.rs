//! Integration tests for the prediction API endpoints

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use pricer_lib::{
    model::ModelBundle,
    predict::PredictionAdapter,
    registry::{load_json, ArtifactPaths},
    schema::TableSchema,
    training::{Trainer, TrainerConfig},
    PredictionInput,
};
use std::io::Write;
use std::sync::{Arc, RwLock};
use tower::ServiceExt;

const SAMPLE_HEADER: &str =
    "Company,TypeName,Inches,ScreenResolution,Cpu,Ram,Memory,Gpu,OpSys,Weight,Price";

const SAMPLE_ROWS: &[&str] = &[
    "Apple,Ultrabook,13.3,IPS Panel Retina Display 2560x1600,Intel Core i5 2.3GHz,8GB,128GB SSD,Intel Iris Plus Graphics 640,macOS,1.37kg,71378.68",
    "Dell,Notebook,15.6,Full HD 1920x1080,Intel Core i7 7700HQ 2.8GHz,16GB,256GB SSD +  1TB HDD,Nvidia GeForce GTX 1050,Windows 10,2.62kg,96095.81",
    "HP,Notebook,15.6,1366x768,AMD A9-Series 9420 3GHz,4GB,500GB HDD,AMD Radeon R5,Windows 10,2.1kg,21312.00",
];

struct AppState {
    bundle: RwLock<Option<Arc<ModelBundle>>>,
}

impl AppState {
    fn new(bundle: Option<ModelBundle>) -> Self {
        Self {
            bundle: RwLock::new(bundle.map(Arc::new)),
        }
    }

    fn current_bundle(&self) -> Option<Arc<ModelBundle>> {
        self.bundle
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

async fn predict(
    State(state): State<Arc<AppState>>,
    Form(input): Form<PredictionInput>,
) -> impl IntoResponse {
    let Some(bundle) = state.current_bundle() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": "no trained model loaded" })),
        );
    };

    match PredictionAdapter::new(bundle).predict(&input) {
        Ok(price) => (StatusCode::OK, Json(serde_json::json!({ "price": price }))),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.current_bundle().is_some() {
        (StatusCode::OK, Json(serde_json::json!({ "ready": true })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "ready": false })),
        )
    }
}

fn create_test_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/readyz", get(readyz))
        .with_state(state)
}

fn write_csv(dir: &std::path::Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{}", SAMPLE_HEADER).unwrap();
    for row in SAMPLE_ROWS {
        writeln!(file, "{}", row).unwrap();
    }
    path
}

fn trained_bundle(dir: &std::path::Path) -> ModelBundle {
    let trainer = Trainer::new(
        TrainerConfig {
            train_csv: write_csv(dir, "train.csv"),
            test_csv: write_csv(dir, "test.csv"),
            artifact_dir: dir.join("artifacts"),
        },
        TableSchema::default(),
    );
    trainer.run().unwrap();

    load_json(&ArtifactPaths::new(dir.join("artifacts")).model_bundle()).unwrap()
}

const FORM_BODY: &str = "Company=Dell&TypeName=Notebook&Ram=16&Weight=2.62&Touchscreen=0&IPS=0\
                         &cpu_name=Intel%20Core%20i7&gpu_brand=Nvidia&os=windows&SSD=256&HDD=1000";

fn predict_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_predict_returns_price() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(AppState::new(Some(trained_bundle(dir.path()))));
    let app = create_test_router(state);

    let response = app.oneshot(predict_request(FORM_BODY)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["price"].as_f64().unwrap().is_finite());
}

#[tokio::test]
async fn test_predict_without_model_is_unavailable() {
    let state = Arc::new(AppState::new(None));
    let app = create_test_router(state);

    let response = app.oneshot(predict_request(FORM_BODY)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_predict_rejects_bad_flag() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(AppState::new(Some(trained_bundle(dir.path()))));
    let app = create_test_router(state);

    let body = FORM_BODY.replace("Touchscreen=0", "Touchscreen=5");
    let response = app.oneshot(predict_request(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("Touchscreen"));
}

#[tokio::test]
async fn test_unknown_category_still_predicts() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(AppState::new(Some(trained_bundle(dir.path()))));
    let app = create_test_router(state);

    let body = FORM_BODY.replace("Company=Dell", "Company=Lenovo");
    let response = app.oneshot(predict_request(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readyz_tracks_model_presence() {
    let empty = Arc::new(AppState::new(None));
    let response = create_test_router(empty)
        .oneshot(
            Request::builder()
                .uri("/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let dir = tempfile::tempdir().unwrap();
    let loaded = Arc::new(AppState::new(Some(trained_bundle(dir.path()))));
    let response = create_test_router(loaded)
        .oneshot(
            Request::builder()
                .uri("/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
