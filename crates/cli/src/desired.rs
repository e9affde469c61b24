//! Loading desired records from disk or stdin.

use anyhow::{bail, Context, Result};
use artisync_reconcile::Record;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// Reads the desired record list from `path`, or stdin when `path` is `-`.
pub fn load_desired(path: &Path) -> Result<Vec<Record>> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read desired records from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    parse_desired(&content).with_context(|| format!("invalid desired records in {}", path.display()))
}

/// Parses a JSON or YAML list of records.
///
/// An empty document is an empty list. Entries may be objects or JSON
/// strings holding an object.
pub fn parse_desired(content: &str) -> Result<Vec<Record>> {
    // YAML is a superset of JSON, so one parser covers both.
    let document: Value = if content.trim().is_empty() {
        Value::Null
    } else {
        serde_yaml::from_str(content)?
    };

    let items = match document {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        _ => bail!("desired records must be a list"),
    };
    Ok(Record::from_values(items)?)
}
