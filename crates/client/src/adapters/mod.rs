//! Resource adapters backed by the Artifactory REST API.

mod ldap;
mod repository;

pub use ldap::LdapSettingsAdapter;
pub use repository::RepositoryAdapter;

use artisync_reconcile::{Error, Record};
use serde_json::Value;

/// Field every Artifactory resource is identified by.
pub(crate) const KEY_FIELD: &str = "key";

/// Reads the `key` of a record about to be sent, for URLs and errors.
pub(crate) fn key_of(record: &Record) -> String {
    match record.get(KEY_FIELD) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Converts a response body into one record, or reports what came back.
pub(crate) fn single_record(body: Value, what: &str) -> Result<Record, Error> {
    match body {
        Value::Object(fields) => Ok(Record::new(fields)),
        other => Err(Error::RemoteQuery {
            what: what.to_string(),
            status: None,
            message: format!("expected a JSON object, got {}", describe(&other)),
        }),
    }
}

/// Converts a response body into a list of records.
pub(crate) fn record_list(body: Value, what: &str) -> Result<Vec<Record>, Error> {
    match body {
        Value::Array(items) => items
            .into_iter()
            .map(|item| single_record(item, what))
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(Error::RemoteQuery {
            what: what.to_string(),
            status: None,
            message: format!("expected a JSON array, got {}", describe(&other)),
        }),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
