//! Aggregated addon catalog (`addons.json`).
//!
//! The builder trusts its inputs: descriptors are expected to have passed the
//! validator already, so entries are copied verbatim and only ordered by
//! name. `build_catalog` is the whole pipeline; the pieces are exposed for
//! tests and for callers that want the entries without writing them.

pub mod index;
pub mod model;
pub mod writer;

pub use index::{collect_descriptors, descriptor_files, sort_catalog};
pub use model::{catalog_sort_key, load_descriptor_from_path};
pub use writer::{CATALOG_FILE, render_catalog, write_catalog};

use anyhow::Result;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where the catalog was written and how many entries it holds.
pub struct CatalogSummary {
    pub path: PathBuf,
    pub entries: usize,
}

/// Rebuild `dir/addons.json` from every descriptor in `dir`.
pub fn build_catalog(dir: &Path) -> Result<CatalogSummary> {
    let mut entries = collect_descriptors(dir)?;
    sort_catalog(&mut entries);
    let path = write_catalog(dir, &entries)?;
    Ok(CatalogSummary {
        path,
        entries: entries.len(),
    })
}
