//! Catalog entries as stored in `addons.json`.
//!
//! Entries are the raw parsed descriptors, not typed structs: the catalog
//! must carry whatever fields a descriptor holds, in the order it holds them.

use crate::descriptor::parse_descriptor;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read and parse one descriptor without validating it.
///
/// A blank file becomes `null`, matching what a YAML loader yields for an
/// empty document.
pub fn load_descriptor_from_path(path: &Path) -> Result<Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    parse_descriptor(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Ordering key for a catalog entry: its `name`, or `""` when there is no
/// string name, so unnamed entries sort first.
pub fn catalog_sort_key(entry: &Value) -> &str {
    entry.get("name").and_then(Value::as_str).unwrap_or("")
}
