//! Rendering and writing `addons.json`.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name of the aggregated catalog.
pub const CATALOG_FILE: &str = "addons.json";

/// Serialize entries as a JSON array indented by four spaces.
pub fn render_catalog(entries: &[Value]) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    entries
        .serialize(&mut serializer)
        .context("serializing catalog")?;
    String::from_utf8(buf).context("catalog is not valid UTF-8")
}

/// Write the rendered catalog to `dir/addons.json`.
///
/// The file is written to a temporary sibling first and renamed into place,
/// so readers never observe a half-written catalog.
pub fn write_catalog(dir: &Path, entries: &[Value]) -> Result<PathBuf> {
    let rendered = render_catalog(entries)?;
    let target = dir.join(CATALOG_FILE);

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    tmp.write_all(rendered.as_bytes())
        .context("writing catalog")?;
    tmp.flush().context("flushing catalog")?;
    tmp.persist(&target)
        .with_context(|| format!("replacing {}", target.display()))?;
    Ok(target)
}
