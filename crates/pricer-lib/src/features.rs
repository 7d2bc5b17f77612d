//! Feature normalization for raw laptop records
//!
//! Converts string-encoded hardware attributes into the fixed feature
//! schema: unit stripping, screen flags, storage decomposition, CPU/GPU
//! bucketing, and OS simplification.
//!
//! This is the single normalization path. Training, evaluation, and the
//! prediction input shaping all go through [`normalize`]; the rules must
//! never be copied elsewhere, or train-time and serve-time columns drift.

use crate::error::{PriceError, Result};
use crate::models::{LaptopFeatures, RawRecord};

/// CPU labels kept verbatim; everything else is bucketed
const KNOWN_CPU_NAMES: &[&str] = &["Intel Core i7", "Intel Core i5", "Intel Core i3"];

/// Normalize a batch of raw records
///
/// Errors carry the index of the offending row; the whole batch fails, rows
/// are never silently skipped.
pub fn normalize(records: &[RawRecord]) -> Result<Vec<LaptopFeatures>> {
    records
        .iter()
        .enumerate()
        .map(|(row, record)| normalize_record(record).map_err(|e| e.at_row(row)))
        .collect()
}

/// Normalize one raw record
pub fn normalize_record(record: &RawRecord) -> Result<LaptopFeatures> {
    let ram_gb = parse_ram(&record.ram)?;
    let weight_kg = parse_weight(&record.weight)?;
    let (touchscreen, ips) = screen_flags(&record.screen_resolution);
    let ssd_gb = storage_capacity_gb(&record.memory, "SSD");
    let hdd_gb = storage_capacity_gb(&record.memory, "HDD");
    let cpu_name = bucket_cpu(&record.cpu)?;
    let gpu_brand = gpu_brand(&record.gpu)?;
    let os = simplify_os(&record.op_sys);

    Ok(LaptopFeatures {
        company: record.company.clone(),
        type_name: record.type_name.clone(),
        ram_gb,
        weight_kg,
        touchscreen,
        ips,
        cpu_name,
        ssd_gb,
        hdd_gb,
        gpu_brand,
        os,
    })
}

/// `"16GB"` -> 16; the unit suffix is required
fn parse_ram(value: &str) -> Result<u32> {
    let trimmed = value.trim();
    trimmed
        .strip_suffix("GB")
        .and_then(|rest| rest.trim().parse().ok())
        .ok_or_else(|| PriceError::MalformedField {
            field: "Ram",
            value: value.to_string(),
            expected: "an integer with a GB suffix",
        })
}

/// `"1.37kg"` -> 1.37; the unit suffix is required
fn parse_weight(value: &str) -> Result<f64> {
    let trimmed = value.trim();
    trimmed
        .strip_suffix("kg")
        .and_then(|rest| rest.trim().parse().ok())
        .ok_or_else(|| PriceError::MalformedField {
            field: "Weight",
            value: value.to_string(),
            expected: "a number with a kg suffix",
        })
}

/// Touchscreen / IPS indicator flags from the screen descriptor
fn screen_flags(descriptor: &str) -> (u8, u8) {
    let touchscreen = u8::from(descriptor.contains("Touchscreen"));
    let ips = u8::from(descriptor.contains("IPS"));
    (touchscreen, ips)
}

/// Capacity in GB for one storage kind within a `"+"`-joined descriptor
///
/// The first part containing the kind's token wins; `TB` parts convert at
/// 1000 GB/TB. A kind with no matching part contributes 0.
fn storage_capacity_gb(descriptor: &str, kind: &str) -> u32 {
    for part in descriptor.split('+') {
        if !part.contains(kind) {
            continue;
        }
        let size = first_decimal(part).unwrap_or(0.0);
        let gb = if part.contains("TB") { size * 1000.0 } else { size };
        return gb.round() as u32;
    }
    0
}

/// First decimal number in a string, e.g. `"  1.5TB HDD"` -> 1.5
fn first_decimal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i + 1 < bytes.len() && bytes[i] == b'.' && bytes[i + 1].is_ascii_digit() {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }
            return text[start..i].parse().ok();
        }
        i += 1;
    }
    None
}

/// Bucket a CPU descriptor into one of five labels
fn bucket_cpu(descriptor: &str) -> Result<String> {
    let tokens: Vec<&str> = descriptor.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(PriceError::MalformedField {
            field: "Cpu",
            value: descriptor.to_string(),
            expected: "a non-empty processor descriptor",
        });
    }

    let candidate = tokens[..tokens.len().min(3)].join(" ");
    if KNOWN_CPU_NAMES.contains(&candidate.as_str()) {
        Ok(candidate)
    } else if tokens[0] == "Intel" {
        Ok("Other Intel Processor".to_string())
    } else {
        Ok("AMD Processor".to_string())
    }
}

/// First token of the GPU descriptor is the brand
fn gpu_brand(descriptor: &str) -> Result<String> {
    descriptor
        .split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or_else(|| PriceError::MalformedField {
            field: "Gpu",
            value: descriptor.to_string(),
            expected: "a non-empty graphics descriptor",
        })
}

/// Collapse operating system strings into mac / windows / other
fn simplify_os(descriptor: &str) -> String {
    if descriptor == "macOS" || descriptor == "Mac OS X" {
        "mac".to_string()
    } else if descriptor.contains("Windows") {
        "windows".to_string()
    } else {
        "other".to_string()
    }
}
