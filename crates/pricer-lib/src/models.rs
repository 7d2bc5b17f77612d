//! Core data models for the pricing pipeline

use serde::{Deserialize, Serialize};

use crate::error::{PriceError, Result};

/// Column names as they appear in the raw table and the derived frame
pub mod columns {
    pub const COMPANY: &str = "Company";
    pub const TYPE_NAME: &str = "TypeName";
    pub const RAM: &str = "Ram";
    pub const WEIGHT: &str = "Weight";
    pub const SCREEN_RESOLUTION: &str = "ScreenResolution";
    pub const CPU: &str = "Cpu";
    pub const MEMORY: &str = "Memory";
    pub const GPU: &str = "Gpu";
    pub const OP_SYS: &str = "OpSys";
    pub const PRICE: &str = "Price";
    pub const TOUCHSCREEN: &str = "Touchscreen";
    pub const IPS: &str = "IPS";
    pub const CPU_NAME: &str = "cpu_name";
    pub const SSD: &str = "SSD";
    pub const HDD: &str = "HDD";
    pub const GPU_BRAND: &str = "gpu_brand";
    pub const OS: &str = "os";
}

/// One row of the raw source table, fields still string-encoded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "TypeName")]
    pub type_name: String,
    /// Memory size with unit suffix, e.g. `"16GB"`
    #[serde(rename = "Ram")]
    pub ram: String,
    /// Weight with unit suffix, e.g. `"1.37kg"`
    #[serde(rename = "Weight")]
    pub weight: String,
    #[serde(rename = "ScreenResolution")]
    pub screen_resolution: String,
    /// Physical screen size; not a feature, dropped during normalization
    #[serde(rename = "Inches", default)]
    pub inches: Option<String>,
    #[serde(rename = "Cpu")]
    pub cpu: String,
    /// `"+"`-joined storage descriptor, e.g. `"128GB SSD +  1TB HDD"`
    #[serde(rename = "Memory")]
    pub memory: String,
    #[serde(rename = "Gpu")]
    pub gpu: String,
    #[serde(rename = "OpSys")]
    pub op_sys: String,
    #[serde(rename = "Price")]
    pub price: f64,
}

/// Normalized record with the fixed feature schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaptopFeatures {
    pub company: String,
    pub type_name: String,
    pub ram_gb: u32,
    pub weight_kg: f64,
    pub touchscreen: u8,
    pub ips: u8,
    pub cpu_name: String,
    pub ssd_gb: u32,
    pub hdd_gb: u32,
    pub gpu_brand: String,
    pub os: String,
}

/// Held-out metrics computed once per trained model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub r2_score: f64,
    pub mean_squared_error: f64,
    pub mean_absolute_error: f64,
}

/// Outcome of comparing a freshly trained model against the incumbent
///
/// `incumbent_r2` is absent when no incumbent exists; the acceptance
/// comparison treats an absent incumbent as a baseline of 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub trained_r2: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incumbent_r2: Option<f64>,
    pub accepted: bool,
    pub delta: f64,
}

/// A single prediction request in already-derived feature shape
///
/// The serving form collects discrete fields directly, so this is a narrower
/// contract than the raw-text normalizer: only the flag fields still need
/// validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionInput {
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "TypeName")]
    pub type_name: String,
    #[serde(rename = "Ram")]
    pub ram_gb: u32,
    #[serde(rename = "Weight")]
    pub weight_kg: f64,
    #[serde(rename = "Touchscreen")]
    pub touchscreen: u8,
    #[serde(rename = "IPS")]
    pub ips: u8,
    #[serde(rename = "cpu_name")]
    pub cpu_name: String,
    #[serde(rename = "gpu_brand")]
    pub gpu_brand: String,
    #[serde(rename = "os")]
    pub os: String,
    #[serde(rename = "SSD")]
    pub ssd_gb: u32,
    #[serde(rename = "HDD")]
    pub hdd_gb: u32,
}

impl PredictionInput {
    /// Validate the input eagerly and convert to the derived feature shape
    pub fn to_features(&self) -> Result<LaptopFeatures> {
        if self.touchscreen > 1 {
            return Err(PriceError::MalformedField {
                field: "Touchscreen",
                value: self.touchscreen.to_string(),
                expected: "0 or 1",
            });
        }
        if self.ips > 1 {
            return Err(PriceError::MalformedField {
                field: "IPS",
                value: self.ips.to_string(),
                expected: "0 or 1",
            });
        }
        if !self.weight_kg.is_finite() {
            return Err(PriceError::MalformedField {
                field: "Weight",
                value: self.weight_kg.to_string(),
                expected: "a finite weight in kg",
            });
        }

        Ok(LaptopFeatures {
            company: self.company.clone(),
            type_name: self.type_name.clone(),
            ram_gb: self.ram_gb,
            weight_kg: self.weight_kg,
            touchscreen: self.touchscreen,
            ips: self.ips,
            cpu_name: self.cpu_name.clone(),
            ssd_gb: self.ssd_gb,
            hdd_gb: self.hdd_gb,
            gpu_brand: self.gpu_brand.clone(),
            os: self.os.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> PredictionInput {
        PredictionInput {
            company: "Apple".to_string(),
            type_name: "Ultrabook".to_string(),
            ram_gb: 16,
            weight_kg: 1.37,
            touchscreen: 0,
            ips: 1,
            cpu_name: "Intel Core i7".to_string(),
            gpu_brand: "Intel".to_string(),
            os: "mac".to_string(),
            ssd_gb: 512,
            hdd_gb: 0,
        }
    }

    #[test]
    fn test_valid_input_converts() {
        let features = sample_input().to_features().unwrap();
        assert_eq!(features.ram_gb, 16);
        assert_eq!(features.ips, 1);
        assert_eq!(features.cpu_name, "Intel Core i7");
    }

    #[test]
    fn test_flag_out_of_range_rejected() {
        let mut input = sample_input();
        input.touchscreen = 2;
        let err = input.to_features().unwrap_err();
        assert!(err.is_malformed_field());
    }

    #[test]
    fn test_non_finite_weight_rejected() {
        let mut input = sample_input();
        input.weight_kg = f64::NAN;
        assert!(input.to_features().is_err());
    }
}
