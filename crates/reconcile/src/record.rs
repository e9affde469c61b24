//! Configuration records and their identity keys.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// One configuration record: an opaque field mapping.
///
/// Fields the resource kind does not know about are carried through
/// untouched, so new server-side fields survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Creates a record from a field map.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Builds a record from a JSON value.
    ///
    /// Accepts an object, or a string holding the JSON text of an object.
    /// `index` is the record's position in its list and is used in errors.
    pub fn from_value(value: Value, index: usize) -> Result<Self, ValidationError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            Value::String(text) => {
                let parsed: Value =
                    serde_json::from_str(&text).map_err(|e| ValidationError::InvalidJson {
                        index,
                        message: e.to_string(),
                    })?;
                match parsed {
                    Value::Object(fields) => Ok(Self { fields }),
                    _ => Err(ValidationError::NotAnObject { index }),
                }
            }
            _ => Err(ValidationError::NotAnObject { index }),
        }
    }

    /// Converts a list of JSON values into records.
    pub fn from_values(values: Vec<Value>) -> Result<Vec<Self>, ValidationError> {
        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| Self::from_value(value, index))
            .collect()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Extracts the identity key; fails if any key field is absent or null.
    pub fn identity_key(
        &self,
        key_fields: &[String],
        index: usize,
    ) -> Result<IdentityKey, ValidationError> {
        key_fields
            .iter()
            .map(|field| match self.fields.get(field) {
                None | Some(Value::Null) => Err(ValidationError::MissingField {
                    field: field.clone(),
                    index,
                }),
                Some(value) => Ok(key_component(value)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(IdentityKey)
    }

    /// Overwrites this record's identity-key fields with `other`'s values.
    ///
    /// The server is authoritative for key spelling, so a desired `myrepo`
    /// matched against an actual `MyRepo` becomes `MyRepo`.
    pub fn adopt_identity_of(&mut self, other: &Record, key_fields: &[String]) {
        for field in key_fields {
            if let Some(value) = other.fields.get(field) {
                self.fields.insert(field.clone(), value.clone());
            }
        }
    }

    /// Returns a copy of `base` with this record's fields laid over it.
    ///
    /// Top-level fields replace; nested objects are not merged.
    pub fn merged_over(&self, base: &Record) -> Record {
        let mut future = base.clone();
        for (field, value) in &self.fields {
            future.fields.insert(field.clone(), value.clone());
        }
        future
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

fn key_component(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Ordered values of a record's identity-key fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(Vec<String>);

impl IdentityKey {
    pub fn new(components: Vec<String>) -> Self {
        Self(components)
    }

    /// Single-field key, the common case.
    pub fn single(value: impl Into<String>) -> Self {
        Self(vec![value.into()])
    }

    pub fn components(&self) -> &[String] {
        &self.0
    }

    /// First component; the whole key for single-field identities.
    pub fn primary(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }

    /// Case-folded form used for duplicate detection and matching.
    pub fn folded(&self) -> IdentityKey {
        IdentityKey(self.0.iter().map(|c| c.to_lowercase()).collect())
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// Validates a desired record list before any remote call.
///
/// Checks required fields first, then rejects identity keys that collide
/// case-insensitively, since the server would treat them as one record.
pub fn validate_desired(
    records: &[Record],
    key_fields: &[String],
    required_fields: &[String],
) -> Result<Vec<IdentityKey>, ValidationError> {
    for (index, record) in records.iter().enumerate() {
        for field in required_fields {
            if matches!(record.get(field), None | Some(Value::Null)) {
                return Err(ValidationError::MissingField {
                    field: field.clone(),
                    index,
                });
            }
        }
    }

    let mut keys = Vec::with_capacity(records.len());
    let mut seen: HashMap<IdentityKey, IdentityKey> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        let key = record.identity_key(key_fields, index)?;
        if let Some(first) = seen.get(&key.folded()) {
            return Err(ValidationError::DuplicateKey {
                first: first.to_string(),
                second: key.to_string(),
            });
        }
        seen.insert(key.folded(), key.clone());
        keys.push(key);
    }
    Ok(keys)
}
