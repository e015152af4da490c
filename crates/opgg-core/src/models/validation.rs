//! Tolerant decoding of upstream JSON.
//!
//! Upstream payloads are loosely typed and change without notice. Decoding
//! keeps whatever parses, reports anything surprising as a
//! [`ValidationWarning`], and only rejects a record when its identifying
//! field is unusable.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A decoded value plus any problems noticed while decoding it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validated<T> {
    pub value: T,
    pub warnings: Vec<ValidationWarning>,
}

impl<T> Validated<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validated<U> {
        Validated {
            value: f(self.value),
            warnings: self.warnings,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// What was wrong with a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum WarningKind {
    Missing,
    Null,
    /// The record could not be decoded at all and was dropped.
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub entity: String,
    pub field: String,
    pub kind: WarningKind,
}

impl ValidationWarning {
    pub fn new(entity: &str, field: &str, kind: WarningKind) -> Self {
        Self {
            entity: entity.to_string(),
            field: field.to_string(),
            kind,
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::Missing => write!(f, "{}.{} is missing", self.entity, self.field),
            WarningKind::Null => write!(f, "{}.{} is null", self.entity, self.field),
            WarningKind::Rejected(reason) => {
                write!(f, "{} record rejected: {}", self.entity, reason)
            }
        }
    }
}

/// An upstream entity with a known set of expected fields.
pub trait Schema: DeserializeOwned {
    const ENTITY: &'static str;
    /// Fields we expect to see; absence is a warning, not an error.
    const EXPECTED_FIELDS: &'static [&'static str];
}

/// Decode one record, collecting warnings for absent or null expected fields.
pub fn decode_one<T: Schema>(raw: &Value) -> Result<Validated<T>, ValidationWarning> {
    let mut warnings = Vec::new();
    if let Some(object) = raw.as_object() {
        for field in T::EXPECTED_FIELDS {
            match object.get(*field) {
                None => {
                    warnings.push(ValidationWarning::new(T::ENTITY, field, WarningKind::Missing))
                }
                Some(Value::Null) => {
                    warnings.push(ValidationWarning::new(T::ENTITY, field, WarningKind::Null))
                }
                Some(_) => {}
            }
        }
    }

    match T::deserialize(raw) {
        Ok(value) => Ok(Validated { value, warnings }),
        Err(e) => Err(ValidationWarning::new(
            T::ENTITY,
            "*",
            WarningKind::Rejected(e.to_string()),
        )),
    }
}

/// Decode a list, dropping (and reporting) records that cannot be decoded.
pub fn decode_many<T: Schema>(raws: &[Value]) -> Validated<Vec<T>> {
    let mut values = Vec::with_capacity(raws.len());
    let mut warnings = Vec::new();
    for raw in raws {
        match decode_one::<T>(raw) {
            Ok(decoded) => {
                values.push(decoded.value);
                warnings.extend(decoded.warnings);
            }
            Err(warning) => warnings.push(warning),
        }
    }
    Validated {
        value: values,
        warnings,
    }
}

/// Pull a list out of a payload that is either a bare array or an object
/// wrapping one under any of `keys`.
pub fn extract_list(payload: &Value, keys: &[&str]) -> Option<Vec<Value>> {
    match payload {
        Value::Array(items) => Some(items.clone()),
        Value::Object(object) => keys
            .iter()
            .find_map(|key| object.get(*key))
            .and_then(|inner| extract_list(inner, keys)),
        _ => None,
    }
}
