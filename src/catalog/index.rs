//! Collecting and ordering the descriptors that make up the catalog.
//!
//! Files are visited in sorted file-name order and the name sort is stable,
//! so two descriptors with the same `name` always land in the same relative
//! order and repeated builds produce identical output.

use crate::catalog::model::{catalog_sort_key, load_descriptor_from_path};
use crate::descriptor::is_descriptor_path;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Descriptor files directly inside `dir` (no recursion), sorted by path.
pub fn descriptor_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && is_descriptor_path(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Parse every descriptor in `dir`, in file order.
pub fn collect_descriptors(dir: &Path) -> Result<Vec<Value>> {
    descriptor_files(dir)?
        .iter()
        .map(|path| load_descriptor_from_path(path))
        .collect()
}

/// Order entries ascending by name; see [`catalog_sort_key`].
pub fn sort_catalog(entries: &mut [Value]) {
    entries.sort_by(|a, b| catalog_sort_key(a).cmp(catalog_sort_key(b)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn only_descriptor_files_are_collected() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("b.yml"), "name: B\n").unwrap();
        fs::write(root.join("a.yaml"), "name: A\n").unwrap();
        fs::write(root.join("notes.txt"), "name: C\n").unwrap();
        fs::write(root.join("addons.json"), "[]").unwrap();
        fs::create_dir(root.join("nested.yaml")).unwrap();
        fs::write(root.join("nested.yaml").join("inner.yaml"), "name: D\n").unwrap();

        let files = descriptor_files(root).unwrap();
        assert_eq!(files, vec![root.join("a.yaml"), root.join("b.yml")]);

        let entries = collect_descriptors(root).unwrap();
        assert_eq!(entries, vec![json!({"name": "A"}), json!({"name": "B"})]);
    }

    #[test]
    fn sort_is_by_name_with_unnamed_first_and_stable() {
        let mut entries = vec![
            json!({"name": "beta"}),
            json!({"alias": "first unnamed"}),
            json!({"name": "Alpha"}),
            json!({"name": "beta", "tags": ["second"]}),
            json!({"alias": "second unnamed"}),
        ];
        sort_catalog(&mut entries);
        assert_eq!(
            entries,
            vec![
                json!({"alias": "first unnamed"}),
                json!({"alias": "second unnamed"}),
                json!({"name": "Alpha"}),
                json!({"name": "beta"}),
                json!({"name": "beta", "tags": ["second"]}),
            ]
        );
    }
}
