//! Field-level schema check for a single addon descriptor.
//!
//! The check never fails; it returns every violation it finds so a
//! contributor sees all problems in one CI run. Checks are ordered
//! presence → boolean → type → format per field, and a field reported at an
//! earlier stage is skipped by the later ones so one root cause produces one
//! message.

use crate::descriptor::{REQUIRED_FIELDS, is_known_field, value_kind};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Upper bound on the number of tags (categories) per addon.
pub const MAX_TAGS: usize = 4;

/// Upper bound on the space-joined length of `keywords`, in characters.
pub const MAX_KEYWORDS_LENGTH: usize = 255;

static REPO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$").expect("static regex must compile")
});

// Required fields whose type is checked by a dedicated step below.
const SHAPE_CHECKED_FIELDS: &[&str] = &["name", "repo", "tags"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Outcome of the schema check for one descriptor.
pub struct SchemaReport {
    pub errors: Vec<String>,
    /// The `repo` value when it passed the `owner/repo` format check. Only
    /// these repos are eligible for the remote release check.
    pub checked_repo: Option<String>,
}

impl SchemaReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run every field check against a parsed descriptor record.
pub fn validate_addon(addon: &Map<String, Value>) -> SchemaReport {
    let mut errors = Vec::new();

    let flagged = check_required_fields(addon, &mut errors);
    check_name(addon, &flagged, &mut errors);
    let checked_repo = check_repo(addon, &flagged, &mut errors);
    check_tags(addon, &flagged, &mut errors);
    check_keywords(addon, &mut errors);
    check_unknown_fields(addon, &mut errors);

    SchemaReport {
        errors,
        checked_repo,
    }
}

/// Presence, emptiness, and boolean checks for the required fields.
///
/// Returns the fields that were reported here; later steps skip them.
fn check_required_fields(
    addon: &Map<String, Value>,
    errors: &mut Vec<String>,
) -> BTreeSet<&'static str> {
    let mut flagged = BTreeSet::new();
    for &field in REQUIRED_FIELDS {
        let Some(value) = addon.get(field) else {
            errors.push(format!("Missing required field: {field}"));
            flagged.insert(field);
            continue;
        };
        match value {
            Value::Null => {
                errors.push(format!("Required field '{field}' cannot be empty"));
            }
            Value::String(text) if text.is_empty() => {
                errors.push(format!("Required field '{field}' cannot be empty"));
            }
            Value::Bool(_) => {
                errors.push(format!(
                    "Field '{field}' must be {}, not a boolean",
                    expected_shape(field)
                ));
            }
            Value::String(_) => continue,
            other if !SHAPE_CHECKED_FIELDS.contains(&field) => {
                errors.push(format!(
                    "Field '{field}' must be a string, got {}",
                    value_kind(other)
                ));
            }
            _ => continue,
        }
        flagged.insert(field);
    }
    flagged
}

fn expected_shape(field: &str) -> &'static str {
    if field == "tags" { "a list" } else { "a string" }
}

fn check_name(addon: &Map<String, Value>, flagged: &BTreeSet<&str>, errors: &mut Vec<String>) {
    if flagged.contains("name") {
        return;
    }
    match addon.get("name") {
        Some(Value::String(name)) => {
            if name.contains(' ') {
                errors.push(format!("Name field '{name}' contains spaces"));
            }
        }
        Some(other) => errors.push(format!(
            "Field 'name' must be a string, got {}",
            value_kind(other)
        )),
        None => {}
    }
}

fn check_repo(
    addon: &Map<String, Value>,
    flagged: &BTreeSet<&str>,
    errors: &mut Vec<String>,
) -> Option<String> {
    if flagged.contains("repo") {
        return None;
    }
    match addon.get("repo")? {
        Value::String(repo) => {
            if REPO_PATTERN.is_match(repo) {
                Some(repo.clone())
            } else {
                errors.push(format!(
                    "Repo field '{repo}' must be in format 'username/reponame'"
                ));
                None
            }
        }
        other => {
            errors.push(format!(
                "Field 'repo' must be a string, got {}",
                value_kind(other)
            ));
            None
        }
    }
}

fn check_tags(addon: &Map<String, Value>, flagged: &BTreeSet<&str>, errors: &mut Vec<String>) {
    if flagged.contains("tags") {
        return;
    }
    let Some(value) = addon.get("tags") else {
        return;
    };
    let Value::Array(tags) = value else {
        errors.push(format!(
            "Field 'tags' must be a list, got {}",
            value_kind(value)
        ));
        return;
    };

    if tags.len() > MAX_TAGS {
        errors.push(format!(
            "Too many categories/tags: {} (maximum is {MAX_TAGS})",
            tags.len()
        ));
    } else if tags.is_empty() {
        errors.push("Tags list cannot be empty".to_string());
    } else {
        for (idx, tag) in tags.iter().enumerate() {
            if !tag.is_string() {
                errors.push(format!(
                    "Tag at position {} must be a string, got {}",
                    idx + 1,
                    value_kind(tag)
                ));
            }
        }
    }
}

fn check_keywords(addon: &Map<String, Value>, errors: &mut Vec<String>) {
    let Some(value) = addon.get("keywords") else {
        return;
    };
    let keywords = match value {
        Value::Array(keywords) => keywords,
        Value::Bool(_) => {
            errors.push("Field 'keywords' must be a list, not a boolean".to_string());
            return;
        }
        other => {
            errors.push(format!(
                "Field 'keywords' must be a list, got {}",
                value_kind(other)
            ));
            return;
        }
    };

    let mut all_strings = true;
    for (idx, keyword) in keywords.iter().enumerate() {
        match keyword {
            Value::String(text) => {
                if text.contains(' ') {
                    errors.push(format!(
                        "Keyword at position {} ('{text}') contains spaces",
                        idx + 1
                    ));
                }
            }
            other => {
                all_strings = false;
                errors.push(format!(
                    "Keyword at position {} must be a string, got {}",
                    idx + 1,
                    value_kind(other)
                ));
            }
        }
    }

    if all_strings {
        let joined = joined_length(keywords);
        if joined > MAX_KEYWORDS_LENGTH {
            errors.push(format!(
                "Keywords are too long: {joined} characters when joined (maximum is {MAX_KEYWORDS_LENGTH})"
            ));
        }
    }
}

// Length of the keywords joined by single spaces.
fn joined_length(keywords: &[Value]) -> usize {
    let text: usize = keywords
        .iter()
        .filter_map(Value::as_str)
        .map(|keyword| keyword.chars().count())
        .sum();
    text + keywords.len().saturating_sub(1)
}

fn check_unknown_fields(addon: &Map<String, Value>, errors: &mut Vec<String>) {
    let unknown: Vec<&str> = addon
        .keys()
        .map(String::as_str)
        .filter(|key| !is_known_field(key))
        .collect();
    if !unknown.is_empty() {
        errors.push(format!("Unknown fields found: {}", unknown.join(", ")));
    }
}
