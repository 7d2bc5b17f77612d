//! HTTP API for interactive prediction, training, and health/metrics

use std::sync::{Arc, RwLock};
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use tracing::{error, info, warn};

use pricer_lib::{
    evaluation::Evaluator,
    model::ModelBundle,
    predict::PredictionAdapter,
    registry::{self, ArtifactPaths},
    schema::TableSchema,
    store::{self, FsModelStore},
    training::{Trainer, TrainerConfig},
    EvaluationReport, PredictionInput, PricerMetrics,
};

use crate::config::ServerConfig;

/// Shared application state
pub struct AppState {
    pub config: ServerConfig,
    pub schema: TableSchema,
    pub metrics: PricerMetrics,
    bundle: RwLock<Option<Arc<ModelBundle>>>,
}

impl AppState {
    pub fn new(config: ServerConfig, schema: TableSchema) -> Self {
        Self {
            config,
            schema,
            metrics: PricerMetrics::new(),
            bundle: RwLock::new(None),
        }
    }

    /// Load the persisted bundle from the artifact registry
    pub fn load_artifacts(&self) -> pricer_lib::Result<()> {
        let paths = ArtifactPaths::new(&self.config.artifact_dir);
        let bundle: ModelBundle = registry::load_json(&paths.model_bundle())?;
        self.swap_bundle(bundle);
        Ok(())
    }

    /// Replace the served bundle by swapping the shared reference
    ///
    /// In-flight predictions keep the Arc they already cloned; they never
    /// observe a partially updated model.
    pub fn swap_bundle(&self, bundle: ModelBundle) {
        let bundle = Arc::new(bundle);
        self.metrics.set_model_info(bundle.trained_at);
        let mut slot = self.bundle.write().unwrap_or_else(|p| p.into_inner());
        *slot = Some(bundle);
    }

    pub fn current_bundle(&self) -> Option<Arc<ModelBundle>> {
        self.bundle
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[derive(Serialize)]
struct PredictResponse {
    price: f64,
    formatted: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    trained_at: Option<i64>,
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

#[derive(Serialize)]
struct TrainResponse {
    message: String,
    report: EvaluationReport,
}

/// The interactive prediction form
async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

/// Predict one price from the submitted form fields
async fn predict(
    State(state): State<Arc<AppState>>,
    Form(input): Form<PredictionInput>,
) -> Response {
    let Some(bundle) = state.current_bundle() else {
        state.metrics.inc_prediction_errors();
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "no trained model loaded; run /train first".to_string(),
            }),
        )
            .into_response();
    };

    let started = Instant::now();
    match PredictionAdapter::new(bundle).predict(&input) {
        Ok(price) => {
            state
                .metrics
                .observe_prediction_latency(started.elapsed().as_secs_f64());
            state.metrics.inc_predictions();
            (
                StatusCode::OK,
                Json(PredictResponse {
                    price,
                    formatted: format_price(price),
                }),
            )
                .into_response()
        }
        Err(e) => {
            state.metrics.inc_prediction_errors();
            warn!(error = %e, "Prediction failed");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Error: {e}"),
                }),
            )
                .into_response()
        }
    }
}

/// Run training, evaluate against the incumbent, deploy on acceptance
async fn train(State(state): State<Arc<AppState>>) -> Response {
    let worker = state.clone();
    let result = tokio::task::spawn_blocking(move || run_training_flow(&worker)).await;

    match result {
        Ok(Ok(report)) => (
            StatusCode::OK,
            Json(TrainResponse {
                message: "Training successful".to_string(),
                report,
            }),
        )
            .into_response(),
        Ok(Err(e)) => {
            error!(error = %e, "Training failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Error Occurred! {e}"),
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Training task aborted");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Error Occurred! training task aborted".to_string(),
                }),
            )
                .into_response()
        }
    }
}

fn run_training_flow(state: &AppState) -> anyhow::Result<EvaluationReport> {
    let trainer = Trainer::new(
        TrainerConfig {
            train_csv: state.config.train_csv.clone(),
            test_csv: state.config.test_csv.clone(),
            artifact_dir: state.config.artifact_dir.clone(),
        },
        state.schema.clone(),
    );
    let outcome = trainer.run()?;
    state.metrics.inc_training_runs();

    let model_store = FsModelStore::open(&state.config.model_bucket)?;
    let evaluator = Evaluator::new(&model_store, state.config.model_key.clone());
    let report = evaluator.evaluate(&state.config.test_csv, &outcome.metrics)?;

    if report.accepted {
        store::push_bundle(&model_store, &state.config.model_key, &outcome.bundle)?;
        state.swap_bundle(outcome.bundle);
        info!("Accepted and deployed newly trained model");
    } else {
        info!("Trained model rejected; incumbent stays deployed");
    }

    Ok(report)
}

/// Health check response
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let bundle = state.current_bundle();
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            model_loaded: bundle.is_some(),
            trained_at: bundle.map(|b| b.trained_at),
        }),
    )
}

/// Readiness check - 503 until a model is loaded
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.current_bundle().is_some() {
        (
            StatusCode::OK,
            Json(ReadinessResponse {
                ready: true,
                reason: None,
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                ready: false,
                reason: Some("no trained model loaded".to_string()),
            }),
        )
    }
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Format a price the way the form displays it
pub fn format_price(price: f64) -> String {
    format!("Predicted Price: ₹{}", group_thousands(price.round() as i64))
}

fn group_thousands(value: i64) -> String {
    let negative = value < 0;
    let digits = value.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .route("/train", get(train))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(71378.68), "Predicted Price: ₹71,379");
        assert_eq!(format_price(950.2), "Predicted Price: ₹950");
        assert_eq!(format_price(1_234_567.0), "Predicted Price: ₹1,234,567");
    }

    #[test]
    fn test_group_thousands_negative() {
        assert_eq!(group_thousands(-4200), "-4,200");
        assert_eq!(group_thousands(0), "0");
    }
}
