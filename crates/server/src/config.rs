//! Server configuration

use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// HTTP port for the prediction UI and API
    #[serde(default = "default_port")]
    pub port: u16,

    /// Raw training split
    #[serde(default = "default_train_csv")]
    pub train_csv: PathBuf,

    /// Raw held-out split
    #[serde(default = "default_test_csv")]
    pub test_csv: PathBuf,

    /// Local artifact registry root
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,

    /// Bucket directory of the remote model store
    #[serde(default = "default_model_bucket")]
    pub model_bucket: PathBuf,

    /// Object key of the deployed model within the bucket
    #[serde(default = "default_model_key")]
    pub model_key: String,

    /// Optional YAML schema descriptor; built-in defaults when absent
    #[serde(default)]
    pub schema_file: Option<PathBuf>,
}

fn default_port() -> u16 {
    8080
}

fn default_train_csv() -> PathBuf {
    PathBuf::from("data/train.csv")
}

fn default_test_csv() -> PathBuf {
    PathBuf::from("data/test.csv")
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_model_bucket() -> PathBuf {
    PathBuf::from("model-registry")
}

fn default_model_key() -> String {
    "laptop-price/model.json".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            train_csv: default_train_csv(),
            test_csv: default_test_csv(),
            artifact_dir: default_artifact_dir(),
            model_bucket: default_model_bucket(),
            model_key: default_model_key(),
            schema_file: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `PRICER_`-prefixed environment variables
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PRICER"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }
}
