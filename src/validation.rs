//! Validation of the descriptor files touched by a pull request.
//!
//! Each file is read, parsed, checked against its own file name, run through
//! the schema check, and (when a release source is supplied) checked against
//! GitHub. Problems are collected rather than raised so a single run reports
//! everything wrong across every file; a broken file never stops its
//! siblings from being validated.

use crate::descriptor::{descriptor_stem, is_descriptor_path, parse_descriptor, value_kind};
use crate::releases::{ReleaseCheck, ReleaseSource, check_releases};
use crate::schema::validate_addon;
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file is not well-formed YAML.
    Parse,
    /// The file is empty or its top level is not a mapping.
    Structure,
    /// A field is missing, empty, mistyped, or misshapen.
    Schema,
    /// The file stem disagrees with the declared `name`.
    Naming,
    /// The declared repository is missing, has no releases, or the lookup failed.
    Remote,
    /// The file could not be read.
    Processing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One rule violation, scoped to the file it was found in.
pub struct ValidationError {
    pub path: PathBuf,
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A problem that could not be confirmed; reported but never fatal.
pub struct ValidationWarning {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error messages with their path prefixes, in report order.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    fn push_error(&mut self, path: &Path, kind: ErrorKind, message: String) {
        self.errors.push(ValidationError {
            path: path.to_path_buf(),
            kind,
            message,
        });
    }

    fn push_warning(&mut self, path: &Path, message: String) {
        self.warnings.push(ValidationWarning {
            path: path.to_path_buf(),
            message,
        });
    }
}

/// Validate every descriptor among `paths`, in the order given.
///
/// Paths without a descriptor extension are skipped silently. The remote
/// release check only runs when `releases` is provided.
pub fn validate_pr_changes(
    paths: &[PathBuf],
    releases: Option<&dyn ReleaseSource>,
) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    for path in paths {
        if !is_descriptor_path(path) {
            continue;
        }
        validate_descriptor_file(path, releases, &mut outcome);
    }
    outcome
}

/// Validate a single descriptor file, appending its findings to `outcome`.
pub fn validate_descriptor_file(
    path: &Path,
    releases: Option<&dyn ReleaseSource>,
    outcome: &mut ValidationOutcome,
) {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            outcome.push_error(
                path,
                ErrorKind::Processing,
                format!("Error processing file: {err}"),
            );
            return;
        }
    };

    let addon = match load_record(&text) {
        Ok(addon) => addon,
        Err((kind, message)) => {
            outcome.push_error(path, kind, message);
            return;
        }
    };

    if let Some(message) = filename_mismatch(path, &addon) {
        outcome.push_error(path, ErrorKind::Naming, message);
    }

    let report = validate_addon(&addon);
    for message in report.errors {
        outcome.push_error(path, ErrorKind::Schema, message);
    }

    let (Some(source), Some(repo)) = (releases, report.checked_repo.as_deref()) else {
        return;
    };
    match check_releases(source, repo) {
        ReleaseCheck::Verified => {}
        ReleaseCheck::Failed(message) => outcome.push_error(path, ErrorKind::Remote, message),
        ReleaseCheck::Unverified(message) => outcome.push_warning(path, message),
    }
}

fn load_record(text: &str) -> Result<Map<String, Value>, (ErrorKind, String)> {
    if text.trim().is_empty() {
        return Err((ErrorKind::Structure, "Empty file".to_string()));
    }
    let value = parse_descriptor(text)
        .map_err(|err| (ErrorKind::Parse, format!("Invalid YAML syntax: {err}")))?;
    match value {
        Value::Object(addon) => Ok(addon),
        // A document holding only comments parses to null.
        Value::Null => Err((ErrorKind::Structure, "Empty file".to_string())),
        other => Err((
            ErrorKind::Structure,
            format!(
                "Invalid YAML structure: expected a dictionary/object, got {}",
                value_kind(&other)
            ),
        )),
    }
}

fn filename_mismatch(path: &Path, addon: &Map<String, Value>) -> Option<String> {
    let name = addon.get("name")?.as_str()?;
    let stem = descriptor_stem(path)?;
    if stem == name {
        return None;
    }
    Some(format!(
        "Filename '{stem}' does not match addon name '{name}'"
    ))
}
