//! Table schema descriptor
//!
//! Declares which columns are the target, which are scaled, which are
//! one-hot encoded, and which identifier columns are dropped. Loaded from a
//! YAML file or constructed with the built-in laptop defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::columns;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub target_column: String,
    pub num_columns: Vec<String>,
    pub one_hot_encoding_columns: Vec<String>,
    pub drop_columns: Vec<String>,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            target_column: columns::PRICE.to_string(),
            num_columns: vec![
                columns::RAM.to_string(),
                columns::WEIGHT.to_string(),
                columns::SSD.to_string(),
                columns::HDD.to_string(),
            ],
            one_hot_encoding_columns: vec![
                columns::COMPANY.to_string(),
                columns::TYPE_NAME.to_string(),
                columns::CPU_NAME.to_string(),
                columns::GPU_BRAND.to_string(),
                columns::OS.to_string(),
            ],
            drop_columns: vec!["Unnamed: 0".to_string()],
        }
    }
}

impl TableSchema {
    /// Load a schema descriptor from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let schema = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()?;
        Ok(schema)
    }
}
