//! Local artifact registry
//!
//! One training run persists its transformer, model bundle, metrics, and
//! transformed matrices under a single root. Writes go to a temp file and
//! rename into place so readers never observe a partial artifact.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{PriceError, Result};

/// Artifact layout under one registry root
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    root: PathBuf,
}

impl ArtifactPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fitted transformer, write-once per training run
    pub fn transformer(&self) -> PathBuf {
        self.root.join("transformer.json")
    }

    /// Transformer + model pair, the deployable unit
    pub fn model_bundle(&self) -> PathBuf {
        self.root.join("model.json")
    }

    pub fn metrics(&self) -> PathBuf {
        self.root.join("metrics.json")
    }

    pub fn train_matrix(&self) -> PathBuf {
        self.root.join("train_matrix.json")
    }

    pub fn test_matrix(&self) -> PathBuf {
        self.root.join("test_matrix.json")
    }
}

/// Serialize a value to a JSON artifact atomically
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let encoded = serde_json::to_vec(value)?;

    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;
    file.write_all(&encoded)?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    debug!(path = %path.display(), bytes = encoded.len(), "Saved artifact");
    Ok(())
}

/// Load a JSON artifact; a missing file is an [`PriceError::ArtifactNotFound`]
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(PriceError::ArtifactNotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}
