//! Numeric column standardization

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::frame::FeatureFrame;

/// Per-column mean and scale learned from training data
///
/// Scale is the population standard deviation; a constant column gets scale
/// 1 so it maps to all zeros instead of dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub columns: Vec<String>,
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
}

impl StandardScaler {
    /// Learn statistics for the given columns from the frame
    pub fn fit(frame: &FeatureFrame, columns: &[String]) -> Result<Self> {
        let mut means = Vec::with_capacity(columns.len());
        let mut scales = Vec::with_capacity(columns.len());

        for column in columns {
            let values = frame.numeric(column)?;
            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            let scale = variance.sqrt();

            means.push(mean);
            scales.push(if scale == 0.0 { 1.0 } else { scale });
        }

        Ok(Self {
            columns: columns.to_vec(),
            means,
            scales,
        })
    }

    /// Standardize one value of the column at `index`
    pub fn scale(&self, index: usize, value: f64) -> f64 {
        (value - self.means[index]) / self.scales[index]
    }

    /// Undo standardization for the column at `index`
    pub fn inverse(&self, index: usize, scaled: f64) -> f64 {
        scaled * self.scales[index] + self.means[index]
    }
}
