//! Training orchestration
//!
//! Loads the raw train/test splits, normalizes them through the shared
//! feature path, fits the column transformer on train only, fits the
//! regression model, scores it on the held-out split, and persists every
//! artifact. Persistence happens only after all computation succeeds, so a
//! failed run leaves prior artifacts untouched.

use std::path::PathBuf;

use chrono::Utc;
use ndarray::{Array1, Array2};
use tracing::info;

use crate::dataset;
use crate::error::{PriceError, Result};
use crate::features;
use crate::frame::FeatureFrame;
use crate::model::{self, ModelBundle, PriceModel};
use crate::models::{columns, RegressionMetrics};
use crate::pipeline::ColumnPipeline;
use crate::registry::{self, ArtifactPaths};
use crate::schema::TableSchema;

/// Filesystem inputs and outputs of one training run
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    pub train_csv: PathBuf,
    pub test_csv: PathBuf,
    pub artifact_dir: PathBuf,
}

/// Result of a completed training run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub bundle: ModelBundle,
    pub metrics: RegressionMetrics,
    pub train_rows: usize,
    pub test_rows: usize,
}

pub struct Trainer {
    config: TrainerConfig,
    schema: TableSchema,
}

impl Trainer {
    pub fn new(config: TrainerConfig, schema: TableSchema) -> Self {
        Self { config, schema }
    }

    /// Run the full pipeline and persist artifacts
    pub fn run(&self) -> Result<TrainingOutcome> {
        if self.schema.target_column != columns::PRICE {
            return Err(PriceError::SchemaMismatch(format!(
                "schema names unknown target column `{}`",
                self.schema.target_column
            )));
        }

        let train_records = dataset::load_raw_records(&self.config.train_csv)?;
        let test_records = dataset::load_raw_records(&self.config.test_csv)?;
        info!(
            train_rows = train_records.len(),
            test_rows = test_records.len(),
            "Loaded raw splits"
        );

        let train_features = features::normalize(&train_records)?;
        let test_features = features::normalize(&test_records)?;
        let y_train = dataset::targets(&train_records);
        let y_test = dataset::targets(&test_records);

        let train_frame = FeatureFrame::from_rows(&train_features);
        let test_frame = FeatureFrame::from_rows(&test_features);

        // Statistics and vocabularies come from the training split only
        let pipeline = ColumnPipeline::new(&self.schema);
        let transformer = pipeline.fit(&train_frame)?;
        let x_train = transformer.transform(&train_frame)?;
        let x_test = transformer.transform(&test_frame)?;

        let model = PriceModel::fit(&x_train, &Array1::from(y_train.clone()))?;
        let predicted = model.predict(&x_test)?;
        let metrics = model::regression_metrics(&predicted, &y_test);
        info!(
            r2 = metrics.r2_score,
            mse = metrics.mean_squared_error,
            mae = metrics.mean_absolute_error,
            "Scored trained model on held-out split"
        );

        let bundle = ModelBundle {
            transformer: transformer.clone(),
            model,
            trained_at: Utc::now().timestamp(),
        };

        let paths = ArtifactPaths::new(&self.config.artifact_dir);
        registry::save_json(&paths.transformer(), &transformer)?;
        registry::save_json(&paths.model_bundle(), &bundle)?;
        registry::save_json(&paths.metrics(), &metrics)?;
        registry::save_json(&paths.train_matrix(), &with_target(&x_train, &y_train))?;
        registry::save_json(&paths.test_matrix(), &with_target(&x_test, &y_test))?;
        info!(root = %paths.root().display(), "Persisted training artifacts");

        Ok(TrainingOutcome {
            bundle,
            metrics,
            train_rows: train_records.len(),
            test_rows: test_records.len(),
        })
    }
}

/// Append the target as the last matrix column for persistence
fn with_target(x: &Array2<f64>, y: &[f64]) -> Array2<f64> {
    let (rows, cols) = x.dim();
    let mut combined = Array2::zeros((rows, cols + 1));
    for row in 0..rows {
        for col in 0..cols {
            combined[(row, col)] = x[(row, col)];
        }
        combined[(row, cols)] = y[row];
    }
    combined
}
