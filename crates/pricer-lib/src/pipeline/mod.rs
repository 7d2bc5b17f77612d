//! Fit-once/apply-many column transformation
//!
//! Combines numeric standardization and categorical one-hot encoding into a
//! single transformer whose output column layout is frozen at fit time and
//! reproduced identically at every transform call.

mod encoder;
mod scaler;

pub use encoder::OneHotEncoder;
pub use scaler::StandardScaler;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PriceError, Result};
use crate::frame::{ColumnValues, FeatureFrame};
use crate::schema::TableSchema;

/// Stateless pipeline description; [`ColumnPipeline::fit`] produces the
/// stateful transformer
#[derive(Debug, Clone)]
pub struct ColumnPipeline {
    schema: TableSchema,
}

impl ColumnPipeline {
    pub fn new(schema: &TableSchema) -> Self {
        Self {
            schema: schema.clone(),
        }
    }

    /// Learn scaling statistics and categorical vocabularies from the frame
    ///
    /// Returns a fresh immutable transformer; fitting again on other data
    /// never touches a previously returned instance.
    pub fn fit(&self, frame: &FeatureFrame) -> Result<FittedTransformer> {
        if frame.n_rows() == 0 {
            return Err(PriceError::Training(
                "cannot fit transformer on an empty frame".to_string(),
            ));
        }

        let scaler = StandardScaler::fit(frame, &self.schema.num_columns)?;
        let encoder = OneHotEncoder::fit(frame, &self.schema.one_hot_encoding_columns)?;

        // Everything not scaled or encoded passes through; it must be numeric
        let mut passthrough = Vec::new();
        for name in frame.column_names() {
            if self.schema.num_columns.iter().any(|c| c == name)
                || self.schema.one_hot_encoding_columns.iter().any(|c| c == name)
            {
                continue;
            }
            match frame.column(name).map(|c| &c.values) {
                Some(ColumnValues::Numeric(_)) => passthrough.push(name.to_string()),
                _ => {
                    return Err(PriceError::SchemaMismatch(format!(
                        "column `{name}` is neither scaled, encoded, nor numeric passthrough"
                    )))
                }
            }
        }

        let input_columns: Vec<String> =
            frame.column_names().iter().map(|s| s.to_string()).collect();

        let mut output_columns = scaler.columns.clone();
        for (column, vocabulary) in encoder.columns.iter().zip(&encoder.vocabularies) {
            for category in vocabulary {
                output_columns.push(format!("{column}={category}"));
            }
        }
        output_columns.extend(passthrough.iter().cloned());

        debug!(
            inputs = input_columns.len(),
            outputs = output_columns.len(),
            "Fitted column transformer"
        );

        Ok(FittedTransformer {
            scaler,
            encoder,
            passthrough,
            input_columns,
            output_columns,
        })
    }
}

/// Immutable fitted transformer, persisted once per training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedTransformer {
    scaler: StandardScaler,
    encoder: OneHotEncoder,
    passthrough: Vec<String>,
    input_columns: Vec<String>,
    output_columns: Vec<String>,
}

impl FittedTransformer {
    /// Output column layout, fixed at fit time
    pub fn output_columns(&self) -> &[String] {
        &self.output_columns
    }

    /// Apply the fit-time statistics and vocabularies to a frame
    ///
    /// The frame's column set and order must match the fit-time frame
    /// exactly; anything else is a schema mismatch.
    pub fn transform(&self, frame: &FeatureFrame) -> Result<Array2<f64>> {
        let names: Vec<String> = frame.column_names().iter().map(|s| s.to_string()).collect();
        if names != self.input_columns {
            return Err(PriceError::SchemaMismatch(format!(
                "transform-time columns {:?} diverge from fit-time columns {:?}",
                names, self.input_columns
            )));
        }

        let n_rows = frame.n_rows();
        let width = self.output_columns.len();
        let mut matrix = Array2::zeros((n_rows, width));

        let mut offset = 0;
        for (index, column) in self.scaler.columns.iter().enumerate() {
            let values = frame.numeric(column)?;
            for (row, &value) in values.iter().enumerate() {
                matrix[(row, offset)] = self.scaler.scale(index, value);
            }
            offset += 1;
        }

        for (index, column) in self.encoder.columns.iter().enumerate() {
            let values = frame.categorical(column)?;
            let block = self.encoder.vocabularies[index].len();
            for (row, value) in values.iter().enumerate() {
                // Unknown category leaves the whole block at zero
                if let Some(slot) = self.encoder.category_slot(index, value) {
                    matrix[(row, offset + slot)] = 1.0;
                }
            }
            offset += block;
        }

        for column in &self.passthrough {
            let values = frame.numeric(column)?;
            for (row, &value) in values.iter().enumerate() {
                matrix[(row, offset)] = value;
            }
            offset += 1;
        }

        Ok(matrix)
    }
}
