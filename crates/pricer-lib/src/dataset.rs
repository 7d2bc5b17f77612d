//! Raw table loading
//!
//! Reads the source CSV into typed records, validating the header up front
//! so a missing column fails as a schema mismatch instead of a row-level
//! deserialization error.

use std::path::Path;

use tracing::debug;

use crate::error::{PriceError, Result};
use crate::models::{columns, RawRecord};

/// Columns every raw split must carry
pub const REQUIRED_COLUMNS: &[&str] = &[
    columns::COMPANY,
    columns::TYPE_NAME,
    columns::RAM,
    columns::WEIGHT,
    columns::SCREEN_RESOLUTION,
    columns::CPU,
    columns::MEMORY,
    columns::GPU,
    columns::OP_SYS,
    columns::PRICE,
];

/// Load a raw split from a CSV file
///
/// Identifier/index columns not in [`REQUIRED_COLUMNS`] are ignored.
pub fn load_raw_records(path: &Path) -> Result<Vec<RawRecord>> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(PriceError::SchemaMismatch(format!(
                "column `{}` missing from {}",
                column,
                path.display()
            )));
        }
    }

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: RawRecord = row?;
        records.push(record);
    }

    debug!(path = %path.display(), rows = records.len(), "Loaded raw split");
    Ok(records)
}

/// Extract the target column from a raw split
pub fn targets(records: &[RawRecord]) -> Vec<f64> {
    records.iter().map(|r| r.price).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    pub(crate) const SAMPLE_HEADER: &str =
        "Unnamed: 0,Company,TypeName,Inches,ScreenResolution,Cpu,Ram,Memory,Gpu,OpSys,Weight,Price";

    pub(crate) const SAMPLE_ROWS: &[&str] = &[
        "0,Apple,Ultrabook,13.3,IPS Panel Retina Display 2560x1600,Intel Core i5 2.3GHz,8GB,128GB SSD,Intel Iris Plus Graphics 640,macOS,1.37kg,71378.68",
        "1,Dell,Notebook,15.6,Full HD 1920x1080,Intel Core i7 7700HQ 2.8GHz,16GB,256GB SSD +  1TB HDD,Nvidia GeForce GTX 1050,Windows 10,2.62kg,96095.81",
        "2,HP,Notebook,15.6,1366x768,AMD A9-Series 9420 3GHz,4GB,500GB HDD,AMD Radeon R5,Windows 10,2.1kg,21312.00",
    ];

    pub(crate) fn write_csv(dir: &std::path::Path, name: &str, rows: &[&str]) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", SAMPLE_HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        path
    }

    #[test]
    fn test_load_valid_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "train.csv", SAMPLE_ROWS);

        let records = load_raw_records(&path).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].company, "Apple");
        assert_eq!(records[1].memory, "256GB SSD +  1TB HDD");
        assert_eq!(records[2].price, 21312.0);
    }

    #[test]
    fn test_missing_column_is_schema_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Company,TypeName,Ram,Weight").unwrap();
        writeln!(file, "Apple,Ultrabook,8GB,1.37kg").unwrap();

        let err = load_raw_records(&path).unwrap_err();
        assert!(matches!(err, PriceError::SchemaMismatch(_)));
    }

    #[test]
    fn test_targets_preserve_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "train.csv", SAMPLE_ROWS);
        let records = load_raw_records(&path).unwrap();

        let y = targets(&records);
        assert_eq!(y, vec![71378.68, 96095.81, 21312.0]);
    }
}
