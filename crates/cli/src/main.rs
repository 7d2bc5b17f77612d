//! Laptop Price Predictor CLI
//!
//! A command-line tool for running the training pipeline, evaluating a
//! trained model against the deployed incumbent, and making one-off price
//! predictions from the persisted artifacts.

mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pricer_lib::{
    evaluation::Evaluator,
    predict::PredictionAdapter,
    registry::{self, ArtifactPaths},
    schema::TableSchema,
    store::{push_bundle, FsModelStore},
    training::{Trainer, TrainerConfig},
    PredictionInput, RegressionMetrics,
};

use output::{print_error, print_result, print_success, OutputFormat};

/// Laptop Price Predictor CLI
#[derive(Parser)]
#[command(name = "pricer")]
#[command(author, version, about = "CLI for the Laptop Price Predictor", long_about = None)]
pub struct Cli {
    /// Artifact registry root
    #[arg(long, env = "PRICER_ARTIFACT_DIR", default_value = "artifacts")]
    pub artifact_dir: PathBuf,

    /// Output format
    #[arg(long, short, default_value = "plain")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct StoreArgs {
    /// Bucket directory of the remote model store
    #[arg(long, env = "PRICER_MODEL_BUCKET", default_value = "model-registry")]
    pub model_bucket: PathBuf,

    /// Object key of the deployed model within the bucket
    #[arg(long, env = "PRICER_MODEL_KEY", default_value = "laptop-price/model.json")]
    pub model_key: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train a model, evaluate it, and push it to the store on acceptance
    Train {
        /// Raw training split
        #[arg(long, env = "PRICER_TRAIN_CSV", default_value = "data/train.csv")]
        train_csv: PathBuf,

        /// Raw held-out split
        #[arg(long, env = "PRICER_TEST_CSV", default_value = "data/test.csv")]
        test_csv: PathBuf,

        /// Optional YAML schema descriptor
        #[arg(long, env = "PRICER_SCHEMA_FILE")]
        schema: Option<PathBuf>,

        /// Skip the evaluation + push stage
        #[arg(long)]
        no_push: bool,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Evaluate the persisted metrics against the deployed incumbent
    Evaluate {
        /// Raw held-out split
        #[arg(long, env = "PRICER_TEST_CSV", default_value = "data/test.csv")]
        test_csv: PathBuf,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Predict one price from the persisted artifacts
    Predict {
        #[arg(long)]
        company: String,
        #[arg(long)]
        type_name: String,
        #[arg(long)]
        ram: u32,
        #[arg(long)]
        weight: f64,
        #[arg(long, default_value_t = 0)]
        touchscreen: u8,
        #[arg(long, default_value_t = 0)]
        ips: u8,
        #[arg(long)]
        cpu_name: String,
        #[arg(long)]
        gpu_brand: String,
        #[arg(long)]
        os: String,
        #[arg(long, default_value_t = 0)]
        ssd: u32,
        #[arg(long, default_value_t = 0)]
        hdd: u32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let paths = ArtifactPaths::new(&cli.artifact_dir);

    match cli.command {
        Commands::Train {
            train_csv,
            test_csv,
            schema,
            no_push,
            store,
        } => {
            let schema = match schema {
                Some(path) => TableSchema::load(&path)?,
                None => TableSchema::default(),
            };
            let trainer = Trainer::new(
                TrainerConfig {
                    train_csv,
                    test_csv: test_csv.clone(),
                    artifact_dir: cli.artifact_dir.clone(),
                },
                schema,
            );
            let outcome = trainer.run()?;
            print_success(&format!(
                "Trained on {} rows, scored on {} rows (R² {:.4})",
                outcome.train_rows, outcome.test_rows, outcome.metrics.r2_score
            ));

            if no_push {
                print_result(
                    &outcome.metrics,
                    &[format!("r2_score: {:.4}", outcome.metrics.r2_score)],
                    cli.format,
                );
                return Ok(());
            }

            let model_store = FsModelStore::open(&store.model_bucket)?;
            let report = Evaluator::new(&model_store, store.model_key.clone())
                .evaluate(&test_csv, &outcome.metrics)?;

            if report.accepted {
                push_bundle(&model_store, &store.model_key, &outcome.bundle)?;
                print_success(&format!(
                    "Model accepted (ΔR² {:+.4}) and pushed to {}",
                    report.delta, store.model_key
                ));
            } else {
                print_error(&format!(
                    "Model rejected (ΔR² {:+.4}); incumbent stays deployed",
                    report.delta
                ));
            }
            print_result(&report, &report_lines(&report), cli.format);
        }

        Commands::Evaluate { test_csv, store } => {
            let metrics: RegressionMetrics = registry::load_json(&paths.metrics())?;
            let model_store = FsModelStore::open(&store.model_bucket)?;
            let report =
                Evaluator::new(&model_store, store.model_key).evaluate(&test_csv, &metrics)?;
            print_result(&report, &report_lines(&report), cli.format);
        }

        Commands::Predict {
            company,
            type_name,
            ram,
            weight,
            touchscreen,
            ips,
            cpu_name,
            gpu_brand,
            os,
            ssd,
            hdd,
        } => {
            let input = PredictionInput {
                company,
                type_name,
                ram_gb: ram,
                weight_kg: weight,
                touchscreen,
                ips,
                cpu_name,
                gpu_brand,
                os,
                ssd_gb: ssd,
                hdd_gb: hdd,
            };
            let adapter = PredictionAdapter::load(&paths)?;
            let price = adapter.predict(&input)?;
            print_result(
                &serde_json::json!({ "price": price }),
                &[format!("Predicted price: {price:.2}")],
                cli.format,
            );
        }
    }

    Ok(())
}

fn report_lines(report: &pricer_lib::EvaluationReport) -> Vec<String> {
    let incumbent = match report.incumbent_r2 {
        Some(score) => format!("{score:.4}"),
        None => "none".to_string(),
    };
    vec![
        format!("trained R²:   {:.4}", report.trained_r2),
        format!("incumbent R²: {incumbent}"),
        format!("accepted:     {}", report.accepted),
        format!("delta:        {:+.4}", report.delta),
    ]
}
