//! Mapping, function-reference and test-flow record I/O.
//!
//! Mapping records associate a human-readable test-step name with its
//! current locator expression. Function and test-flow records are opaque
//! context: loaded, never transformed.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::HealError;

/// One mapping entry from the mappings YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRecord {
    /// Unique test-step name, e.g. `us.mappings.item.verifySelectLensesCTA`.
    pub name: String,
    /// Locator expression for the element under test.
    pub identifier: String,
}

/// Loads the mapping records (a YAML list of `{name, identifier}` objects).
pub fn load_mappings(path: &Path) -> Result<Vec<MappingRecord>, HealError> {
    let raw = std::fs::read_to_string(path)?;
    let records: Vec<MappingRecord> = serde_yaml::from_str(&raw)?;
    debug!("loaded {} mapping records from {}", records.len(), path.display());
    Ok(records)
}

/// Loads an opaque YAML document (function references or a test flow).
pub fn load_opaque(path: &Path) -> Result<serde_yaml::Value, HealError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&raw)?)
}

/// Returns the identifier of the record named `name`, when present.
pub fn current_identifier<'a>(name: &str, mappings: &'a [MappingRecord]) -> Option<&'a str> {
    mappings
        .iter()
        .find(|record| record.name == name)
        .map(|record| record.identifier.as_str())
}

/// Rewrites the identifier of the first record named `name`. Returns false
/// (and changes nothing) when no record matches.
pub fn update_identifier(name: &str, new_identifier: &str, mappings: &mut [MappingRecord]) -> bool {
    match mappings.iter_mut().find(|record| record.name == name) {
        Some(record) => {
            record.identifier = new_identifier.to_string();
            true
        }
        None => false,
    }
}

/// Persists the mapping records by full-file overwrite. Last writer wins;
/// no atomicity is promised.
pub fn save_mappings(path: &Path, mappings: &[MappingRecord]) -> Result<(), HealError> {
    let raw = serde_yaml::to_string(mappings)?;
    std::fs::write(path, raw)?;
    Ok(())
}
