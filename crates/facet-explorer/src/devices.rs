//! Device lists used by the evaluation workflow.
//!
//! The CSV has a header row; the second column holds the device description
//! and the third the name of the term the device should be classified as.
//! Any other columns are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};

use crate::error::{ExplorerError, ExplorerResult};

/// A described item with its expected classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Free-text description shown to the user.
    pub description: String,
    /// Name of the term the device should be found as.
    pub expected_term: String,
}

impl Device {
    /// Creates a new device.
    pub fn new(description: impl Into<String>, expected_term: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            expected_term: expected_term.into(),
        }
    }
}

/// Parses devices from CSV.
pub fn parse_devices<R: Read>(input: R) -> ExplorerResult<Vec<Device>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let mut devices = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let locator = || format!("device row {}", index + 1);
        let description = row.get(1).ok_or_else(|| ExplorerError::MissingField {
            record: locator(),
            field: "description",
        })?;
        let expected = row.get(2).ok_or_else(|| ExplorerError::MissingField {
            record: locator(),
            field: "expected term",
        })?;
        devices.push(Device::new(description.trim(), expected.trim()));
    }
    Ok(devices)
}

/// Loads devices from a CSV file.
pub fn load_devices(path: &Path) -> ExplorerResult<Vec<Device>> {
    let file = File::open(path).map_err(|source| ExplorerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_devices(file)
}

/// Shuffles devices in place; a seed makes the order reproducible.
pub fn shuffle_devices(devices: &mut [Device], seed: Option<u64>) {
    match seed {
        Some(seed) => devices.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => devices.shuffle(&mut rand::thread_rng()),
    }
}
