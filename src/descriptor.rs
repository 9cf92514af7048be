//! Addon descriptor parsing and the tagged value model.
//!
//! Descriptors are YAML on disk. Everything downstream (schema checks, the
//! catalog writer) works on `serde_json::Value`, so YAML is normalized while
//! it is deserialized, straight into that tagged model.
//!
//! Scalars follow the YAML 1.1 reading that descriptor authors expect:
//! a plain `yes`/`no`/`on`/`off` is a boolean just like `true`/`false`,
//! while any quoted spelling stays a string.

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::path::Path;

/// Fields every descriptor must carry, in the order they are checked.
pub const REQUIRED_FIELDS: &[&str] = &[
    "name",
    "alias",
    "description",
    "author",
    "repo",
    "branch",
    "tags",
];

/// Fields a descriptor may carry in addition to the required set.
pub const OPTIONAL_FIELDS: &[&str] = &["dependencies", "kofi", "keywords"];

/// File extensions recognized as descriptors.
pub const DESCRIPTOR_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Returns true when `name` is one of the recognized descriptor fields.
pub fn is_known_field(name: &str) -> bool {
    REQUIRED_FIELDS.contains(&name) || OPTIONAL_FIELDS.contains(&name)
}

/// Returns true when the path carries a descriptor extension.
///
/// Matching is case-sensitive: `addon.YAML` is not a descriptor.
pub fn is_descriptor_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DESCRIPTOR_EXTENSIONS.contains(&ext))
}

/// File name with its final extension stripped; the expected addon `name`.
pub fn descriptor_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
}

/// Plain scalars read as booleans on top of the YAML 1.2 `true`/`false`.
const YAML11_TRUE: &[&str] = &["yes", "Yes", "YES", "on", "On", "ON"];
const YAML11_FALSE: &[&str] = &["no", "No", "NO", "off", "Off", "OFF"];

/// Parse descriptor text and normalize it into the tagged value model.
///
/// Bare booleans (including the YAML 1.1 words) become booleans while quoted
/// spellings stay strings, which is what lets the schema check tell "wrong
/// type" from "empty". A repeated mapping key keeps its first position and
/// its last value.
pub fn parse_descriptor(text: &str) -> Result<Value, serde_yaml::Error> {
    Normalize { source: text }.deserialize(serde_yaml::Deserializer::from_str(text))
}

/// Deserialization seed that builds a `serde_json::Value` from YAML events.
///
/// `source` is the text being parsed. The YAML deserializer hands out plain
/// and quoted scalars as slices of it, and the byte in front of a slice tells
/// the two apart.
#[derive(Clone, Copy)]
struct Normalize<'de> {
    source: &'de str,
}

impl<'de> Normalize<'de> {
    fn is_plain(&self, scalar: &str) -> bool {
        let base = self.source.as_ptr() as usize;
        let start = scalar.as_ptr() as usize;
        let Some(offset) = start.checked_sub(base) else {
            return false;
        };
        if offset + scalar.len() > self.source.len() {
            return false;
        }
        offset == 0 || !matches!(self.source.as_bytes()[offset - 1], b'"' | b'\'')
    }

    fn scalar(&self, text: &'de str) -> Value {
        if self.is_plain(text) {
            if YAML11_TRUE.contains(&text) {
                return Value::Bool(true);
            }
            if YAML11_FALSE.contains(&text) {
                return Value::Bool(false);
            }
        }
        Value::String(text.to_string())
    }
}

impl<'de> DeserializeSeed<'de> for Normalize<'de> {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for Normalize<'de> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a YAML value")
    }

    fn visit_bool<E: de::Error>(self, flag: bool) -> Result<Value, E> {
        Ok(Value::Bool(flag))
    }

    fn visit_i64<E: de::Error>(self, int: i64) -> Result<Value, E> {
        Ok(Value::from(int))
    }

    fn visit_u64<E: de::Error>(self, uint: u64) -> Result<Value, E> {
        Ok(Value::from(uint))
    }

    fn visit_i128<E: de::Error>(self, int: i128) -> Result<Value, E> {
        Ok(i64::try_from(int)
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(int.to_string())))
    }

    fn visit_u128<E: de::Error>(self, uint: u128) -> Result<Value, E> {
        Ok(u64::try_from(uint)
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(uint.to_string())))
    }

    fn visit_f64<E: de::Error>(self, float: f64) -> Result<Value, E> {
        // JSON has no NaN or infinity; keep the YAML spelling instead.
        Ok(Number::from_f64(float)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(non_finite_text(float).to_string())))
    }

    fn visit_borrowed_str<E: de::Error>(self, text: &'de str) -> Result<Value, E> {
        Ok(self.scalar(text))
    }

    // Owned text only comes from escaped, block or folded scalars.
    fn visit_str<E: de::Error>(self, text: &str) -> Result<Value, E> {
        Ok(Value::String(text.to_string()))
    }

    fn visit_string<E: de::Error>(self, text: String) -> Result<Value, E> {
        Ok(Value::String(text))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element_seed(self)? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut object = Map::new();
        while let Some(key) = map.next_key_seed(self)? {
            let value = map.next_value_seed(self)?;
            object.insert(key_text(key), value);
        }
        Ok(Value::Object(object))
    }

    // Custom tags (`!foo value`) arrive as enums; the tag itself is dropped.
    fn visit_enum<A: de::EnumAccess<'de>>(self, data: A) -> Result<Value, A::Error> {
        let (_tag, contents): (String, _) = data.variant()?;
        contents.newtype_variant_seed(self)
    }
}

fn non_finite_text(float: f64) -> &'static str {
    if float.is_nan() {
        ".nan"
    } else if float.is_sign_positive() {
        ".inf"
    } else {
        "-.inf"
    }
}

fn key_text(key: Value) -> String {
    match key {
        Value::String(text) => text,
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

/// Human-readable type name used in validation messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
