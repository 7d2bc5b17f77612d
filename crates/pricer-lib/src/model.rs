//! Price regression model
//!
//! Linear regression fitted with linfa's coordinate-descent solver. A tiny
//! ridge penalty keeps the solve well-posed: full one-hot blocks are exactly
//! collinear, which plain least squares does not tolerate. The fitted
//! coefficients are captured in a plain struct so prediction and persistence
//! carry no training-time dependencies.

use linfa::prelude::*;
use linfa_elasticnet::ElasticNet;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{PriceError, Result};
use crate::frame::FeatureFrame;
use crate::models::{LaptopFeatures, RegressionMetrics};
use crate::pipeline::FittedTransformer;

/// Ridge penalty; small enough that shrinkage is negligible at price scale
const RIDGE_PENALTY: f64 = 1e-6;

/// Fitted linear regressor over the transformed feature matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl PriceModel {
    /// Fit on a transformed training matrix and target vector
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>) -> Result<Self> {
        let dataset = Dataset::new(x.to_owned(), y.to_owned());
        let fitted = ElasticNet::params()
            .penalty(RIDGE_PENALTY)
            .l1_ratio(0.0)
            .fit(&dataset)
            .map_err(|e| PriceError::Training(e.to_string()))?;

        Ok(Self {
            coefficients: fitted.hyperplane().to_vec(),
            intercept: fitted.intercept(),
        })
    }

    /// Predict one price per matrix row
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        if x.ncols() != self.coefficients.len() {
            return Err(PriceError::SchemaMismatch(format!(
                "matrix has {} columns, model expects {}",
                x.ncols(),
                self.coefficients.len()
            )));
        }

        Ok(x.rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .zip(&self.coefficients)
                    .map(|(v, c)| v * c)
                    .sum::<f64>()
                    + self.intercept
            })
            .collect())
    }
}

/// The deployable unit: transformer and model persisted and shipped together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    pub transformer: FittedTransformer,
    pub model: PriceModel,
    pub trained_at: i64,
}

impl ModelBundle {
    /// Predict prices for derived rows, applying the persisted transformer
    pub fn predict_rows(&self, rows: &[LaptopFeatures]) -> Result<Vec<f64>> {
        let frame = FeatureFrame::from_rows(rows);
        let matrix = self.transformer.transform(&frame)?;
        self.model.predict(&matrix)
    }
}

/// Coefficient of determination; 0 when the targets carry no variance
pub fn r2_score(predicted: &[f64], actual: &[f64]) -> f64 {
    let n = actual.len() as f64;
    if actual.is_empty() {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / n;
    let ss_tot: f64 = actual.iter().map(|y| (y - mean).powi(2)).sum();
    let ss_res: f64 = predicted
        .iter()
        .zip(actual)
        .map(|(p, y)| (y - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    }
}

/// Held-out metrics for a prediction vector
pub fn regression_metrics(predicted: &[f64], actual: &[f64]) -> RegressionMetrics {
    let n = actual.len().max(1) as f64;
    let mean_squared_error = predicted
        .iter()
        .zip(actual)
        .map(|(p, y)| (y - p).powi(2))
        .sum::<f64>()
        / n;
    let mean_absolute_error = predicted
        .iter()
        .zip(actual)
        .map(|(p, y)| (y - p).abs())
        .sum::<f64>()
        / n;

    RegressionMetrics {
        r2_score: r2_score(predicted, actual),
        mean_squared_error,
        mean_absolute_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_recovers_linear_relationship() {
        // y = 2*x0 + 3*x1 + 5
        let x = array![
            [1.0, 0.0],
            [0.0, 1.0],
            [1.0, 1.0],
            [2.0, 1.0],
            [3.0, 2.0],
            [1.0, 4.0]
        ];
        let y = x.rows().into_iter().map(|r| 2.0 * r[0] + 3.0 * r[1] + 5.0);
        let y = Array1::from_iter(y);

        let model = PriceModel::fit(&x, &y).unwrap();
        assert!((model.coefficients[0] - 2.0).abs() < 1e-2);
        assert!((model.coefficients[1] - 3.0).abs() < 1e-2);
        assert!((model.intercept - 5.0).abs() < 1e-2);

        let predicted = model.predict(&x).unwrap();
        for (p, expected) in predicted.iter().zip(y.iter()) {
            assert!((p - expected).abs() < 0.05);
        }
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let model = PriceModel {
            coefficients: vec![1.0, 2.0],
            intercept: 0.0,
        };
        let x = array![[1.0, 2.0, 3.0]];
        assert!(model.predict(&x).is_err());
    }

    #[test]
    fn test_r2_score_perfect_fit() {
        let actual = [1.0, 2.0, 3.0];
        assert!((r2_score(&actual, &actual) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_r2_score_mean_predictor_is_zero() {
        let actual = [1.0, 2.0, 3.0];
        let predicted = [2.0, 2.0, 2.0];
        assert!(r2_score(&predicted, &actual).abs() < 1e-12);
    }

    #[test]
    fn test_regression_metrics() {
        let actual = [10.0, 20.0];
        let predicted = [12.0, 16.0];
        let metrics = regression_metrics(&predicted, &actual);

        assert!((metrics.mean_absolute_error - 3.0).abs() < 1e-12);
        assert!((metrics.mean_squared_error - 10.0).abs() < 1e-12);
        assert!(metrics.r2_score < 1.0);
    }
}
