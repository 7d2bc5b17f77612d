//! Output formatting utilities

use clap::ValueEnum;
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines (default)
    #[default]
    Plain,
    /// JSON format
    Json,
}

/// Print a serializable result in the requested format
pub fn print_result<T: Serialize>(value: &T, lines: &[String], format: OutputFormat) {
    match format {
        OutputFormat::Plain => {
            for line in lines {
                println!("{line}");
            }
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{json}");
            }
        }
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("✓ {message}");
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("✗ {message}");
}
