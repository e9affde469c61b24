use artisync_reconcile::{
    Error, IdentityKey, Operation, Record, RemoteResourceAdapter, ResourceKind, Result,
};
use reqwest::{Method, Url};
use serde_json::Value;

use super::{key_of, single_record, KEY_FIELD};
use crate::transport::HttpTransport;

const KIND: ResourceKind = ResourceKind {
    name: "LDAP setting",
    plural: "LDAP settings",
};

/// LDAP settings via the `ldapSettings` user plugin.
///
/// Artifactory has no REST endpoint for LDAP configuration, so the server
/// must have the plugin installed. Every call goes through
/// `api/plugins/execute/<name>`; the record key travels as `params=key=<k>`.
#[derive(Debug, Clone)]
pub struct LdapSettingsAdapter {
    transport: HttpTransport,
}

impl LdapSettingsAdapter {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    fn plugin(&self, name: &str, key: Option<&str>) -> Url {
        let segments = ["api", "plugins", "execute", name];
        match key {
            Some(key) => {
                let params = format!("key={key}");
                self.transport
                    .endpoint(&segments, &[("params", params.as_str())])
            }
            None => self.transport.endpoint(&segments, &[]),
        }
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        let body = self
            .transport
            .send_request(Method::GET, self.plugin("getLdapSettingsList", None), None)
            .map_err(|e| e.into_query(KIND.plural))?;

        let items = match body {
            Value::Array(items) => items,
            Value::Null => return Ok(Vec::new()),
            _ => {
                return Err(Error::RemoteQuery {
                    what: KIND.plural.to_string(),
                    status: None,
                    message: "expected a JSON array of keys".to_string(),
                })
            }
        };

        // Plugin versions differ: some return bare keys, some summaries.
        Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(key) => Some(key),
                Value::Object(fields) => fields
                    .get(KEY_FIELD)
                    .and_then(Value::as_str)
                    .map(String::from),
                _ => None,
            })
            .collect())
    }

    fn fetch(&self, key: &str) -> Result<Record> {
        let what = format!("LDAP setting '{key}'");
        let body = self
            .transport
            .send_request(Method::GET, self.plugin("getLdapSetting", Some(key)), None)
            .map_err(|e| e.into_query(what.clone()))?;
        let mut record = single_record(body, &what)?;
        if record.get(KEY_FIELD).is_none() {
            record.insert(KEY_FIELD, Value::String(key.to_string()));
        }
        Ok(record)
    }
}

impl RemoteResourceAdapter for LdapSettingsAdapter {
    fn kind(&self) -> ResourceKind {
        KIND
    }

    fn identity_key_fields(&self) -> Vec<String> {
        vec![KEY_FIELD.to_string()]
    }

    fn list_actual(&self) -> Result<Vec<Record>> {
        let keys = self.list_keys()?;
        tracing::debug!(count = keys.len(), "Fetching LDAP settings");
        keys.iter().map(|key| self.fetch(key)).collect()
    }

    fn read_one(&self, key: &IdentityKey) -> Result<Record> {
        self.fetch(key.primary())
    }

    fn create(&self, record: &Record, dry_run: bool) -> Result<()> {
        let key = key_of(record);
        let body = record.clone().into_value();
        self.transport
            .send_mutation(
                Method::POST,
                self.plugin("addLdapSetting", None),
                Some(&body),
                dry_run,
            )
            .map_err(|e| e.into_mutation(Operation::Create, key))
    }

    fn update(&self, record: &Record, dry_run: bool) -> Result<()> {
        let key = key_of(record);
        let body = record.clone().into_value();
        self.transport
            .send_mutation(
                Method::POST,
                self.plugin("updateLdapSetting", Some(&key)),
                Some(&body),
                dry_run,
            )
            .map_err(|e| e.into_mutation(Operation::Update, key))
    }

    fn delete(&self, key: &IdentityKey, dry_run: bool) -> Result<()> {
        self.transport
            .send_mutation(
                Method::DELETE,
                self.plugin("deleteLdapSetting", Some(key.primary())),
                None,
                dry_run,
            )
            .map_err(|e| e.into_mutation(Operation::Delete, key.to_string()))
    }
}
