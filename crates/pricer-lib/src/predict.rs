//! Single-record prediction
//!
//! Wraps one already-derived input through the persisted transformer and
//! model. The bundle is shared immutably, so concurrent predictions need no
//! coordination.

use std::sync::Arc;

use tracing::debug;

use crate::error::{PriceError, Result};
use crate::model::ModelBundle;
use crate::models::PredictionInput;
use crate::registry::{self, ArtifactPaths};

/// Adapter from a typed serving input to a scalar price
#[derive(Clone, Debug)]
pub struct PredictionAdapter {
    bundle: Arc<ModelBundle>,
}

impl PredictionAdapter {
    pub fn new(bundle: Arc<ModelBundle>) -> Self {
        Self { bundle }
    }

    /// Load the persisted transformer + model pair from the registry
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let bundle: ModelBundle = registry::load_json(&paths.model_bundle())?;
        Ok(Self::new(Arc::new(bundle)))
    }

    /// Predict the price for one input record
    pub fn predict(&self, input: &PredictionInput) -> Result<f64> {
        let row = input.to_features()?;
        let prices = self.bundle.predict_rows(std::slice::from_ref(&row))?;
        let price = prices.first().copied().ok_or_else(|| {
            PriceError::SchemaMismatch("prediction produced no output row".to_string())
        })?;

        debug!(price, "Predicted single record");
        Ok(price)
    }
}
