//! Loading records, filter sets and the reference time.

use anyhow::Context;
use chrono::{DateTime, Utc};
use record_filter::coerce::parse_date;
use record_filter::{FilterSet, Record};
use serde_json::Value;
use std::path::Path;

use crate::CliError;

/// Reads a JSON array of objects.
pub fn load_records(path: &Path) -> anyhow::Result<Vec<Record>> {
    let content = fs_err::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse records from {}", path.display()))?;
    let Value::Array(records) = value else {
        return Err(CliError::RecordsNotArray(path.to_path_buf()).into());
    };
    if let Some(index) = records.iter().position(|r| !r.is_object()) {
        return Err(CliError::RecordNotObject {
            path: path.to_path_buf(),
            index,
        }
        .into());
    }
    log::debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Reads a filter set, choosing YAML or JSON by file extension.
pub fn load_filter_set(path: &Path) -> anyhow::Result<FilterSet> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let content = fs_err::read_to_string(path)?;
    let set: FilterSet = match extension.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse filter set {}", path.display()))?,
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse filter set {}", path.display()))?,
        _ => return Err(CliError::UnsupportedExtension(path.to_path_buf()).into()),
    };
    log::debug!(
        "Loaded {} fields and {} conditions from {}",
        set.fields.len(),
        set.conditions.len(),
        path.display()
    );
    Ok(set)
}

/// The `--now` argument, or the current time when absent.
pub fn parse_now(value: Option<&str>) -> Result<DateTime<Utc>, CliError> {
    match value {
        None => Ok(Utc::now()),
        Some(s) => parse_date(s).ok_or_else(|| CliError::InvalidNow(s.to_string())),
    }
}
