//! Column-oriented view over derived feature rows
//!
//! The frame is only ever built through [`FeatureFrame::from_rows`], so the
//! column set and order are identical for every batch — train, test, or a
//! single serving row. The transform pipeline depends on that invariant.

use crate::error::{PriceError, Result};
use crate::models::{columns, LaptopFeatures};

/// Values of one column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

/// An ordered set of named columns with equal row counts
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    columns: Vec<Column>,
    n_rows: usize,
}

impl FeatureFrame {
    /// Build the frame from derived rows, in the one fixed column order
    pub fn from_rows(rows: &[LaptopFeatures]) -> Self {
        let numeric = |f: fn(&LaptopFeatures) -> f64| rows.iter().map(f).collect::<Vec<_>>();
        let categorical =
            |f: fn(&LaptopFeatures) -> String| rows.iter().map(f).collect::<Vec<_>>();

        let columns = vec![
            Column {
                name: columns::COMPANY.to_string(),
                values: ColumnValues::Categorical(categorical(|r| r.company.clone())),
            },
            Column {
                name: columns::TYPE_NAME.to_string(),
                values: ColumnValues::Categorical(categorical(|r| r.type_name.clone())),
            },
            Column {
                name: columns::RAM.to_string(),
                values: ColumnValues::Numeric(numeric(|r| f64::from(r.ram_gb))),
            },
            Column {
                name: columns::WEIGHT.to_string(),
                values: ColumnValues::Numeric(numeric(|r| r.weight_kg)),
            },
            Column {
                name: columns::TOUCHSCREEN.to_string(),
                values: ColumnValues::Numeric(numeric(|r| f64::from(r.touchscreen))),
            },
            Column {
                name: columns::IPS.to_string(),
                values: ColumnValues::Numeric(numeric(|r| f64::from(r.ips))),
            },
            Column {
                name: columns::CPU_NAME.to_string(),
                values: ColumnValues::Categorical(categorical(|r| r.cpu_name.clone())),
            },
            Column {
                name: columns::SSD.to_string(),
                values: ColumnValues::Numeric(numeric(|r| f64::from(r.ssd_gb))),
            },
            Column {
                name: columns::HDD.to_string(),
                values: ColumnValues::Numeric(numeric(|r| f64::from(r.hdd_gb))),
            },
            Column {
                name: columns::GPU_BRAND.to_string(),
                values: ColumnValues::Categorical(categorical(|r| r.gpu_brand.clone())),
            },
            Column {
                name: columns::OS.to_string(),
                values: ColumnValues::Categorical(categorical(|r| r.os.clone())),
            },
        ];

        Self {
            columns,
            n_rows: rows.len(),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Numeric column values, or a schema mismatch if absent / wrong kind
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match self.column(name) {
            Some(Column {
                values: ColumnValues::Numeric(values),
                ..
            }) => Ok(values),
            Some(_) => Err(PriceError::SchemaMismatch(format!(
                "column `{name}` is not numeric"
            ))),
            None => Err(PriceError::SchemaMismatch(format!(
                "column `{name}` missing from frame"
            ))),
        }
    }

    /// Categorical column values, or a schema mismatch if absent / wrong kind
    pub fn categorical(&self, name: &str) -> Result<&[String]> {
        match self.column(name) {
            Some(Column {
                values: ColumnValues::Categorical(values),
                ..
            }) => Ok(values),
            Some(_) => Err(PriceError::SchemaMismatch(format!(
                "column `{name}` is not categorical"
            ))),
            None => Err(PriceError::SchemaMismatch(format!(
                "column `{name}` missing from frame"
            ))),
        }
    }
}
