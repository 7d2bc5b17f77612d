//! Model evaluation against the deployed incumbent
//!
//! Reloads the raw test split independently of training, normalizes it
//! through the same shared feature path, and compares the freshly trained
//! model's stored R² against the incumbent fetched from the model store.
//! The evaluator never writes to the store; pushing is a separate step.

use std::path::Path;

use tracing::info;

use crate::dataset;
use crate::error::Result;
use crate::features;
use crate::model::r2_score;
use crate::models::{EvaluationReport, RegressionMetrics};
use crate::store::{self, ModelStore};

pub struct Evaluator<'a> {
    store: &'a dyn ModelStore,
    model_key: String,
}

impl<'a> Evaluator<'a> {
    pub fn new(store: &'a dyn ModelStore, model_key: impl Into<String>) -> Self {
        Self {
            store,
            model_key: model_key.into(),
        }
    }

    /// Compare the trained model's stored metrics against the incumbent
    ///
    /// The trained R² comes from the metrics computed during training, not
    /// a recomputation; only the incumbent is scored here, on the freshly
    /// normalized test split.
    pub fn evaluate(
        &self,
        test_csv: &Path,
        trained_metrics: &RegressionMetrics,
    ) -> Result<EvaluationReport> {
        let records = dataset::load_raw_records(test_csv)?;
        let rows = features::normalize(&records)?;
        let actual = dataset::targets(&records);

        let incumbent_r2 = if self.store.exists(&self.model_key)? {
            let incumbent = store::fetch_bundle(self.store, &self.model_key)?;
            let predicted = incumbent.predict_rows(&rows)?;
            let score = r2_score(&predicted, &actual);
            info!(incumbent_r2 = score, "Scored incumbent on held-out split");
            Some(score)
        } else {
            info!("No incumbent model in store");
            None
        };

        let report = acceptance(trained_metrics.r2_score, incumbent_r2);
        info!(
            trained_r2 = report.trained_r2,
            accepted = report.accepted,
            delta = report.delta,
            "Evaluation decision"
        );
        Ok(report)
    }
}

/// The acceptance rule: trained beats the incumbent, or 0 without one
///
/// The report keeps "no incumbent" explicit; only the comparison defaults
/// the missing score to 0.
pub fn acceptance(trained_r2: f64, incumbent_r2: Option<f64>) -> EvaluationReport {
    let baseline = incumbent_r2.unwrap_or(0.0);
    EvaluationReport {
        trained_r2,
        incumbent_r2,
        accepted: trained_r2 > baseline,
        delta: trained_r2 - baseline,
    }
}
