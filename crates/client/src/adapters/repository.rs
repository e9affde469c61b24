use artisync_reconcile::{
    IdentityKey, Operation, Record, RemoteResourceAdapter, ResourceKind, Result,
};
use reqwest::Method;

use super::{key_of, record_list, single_record, KEY_FIELD};
use crate::transport::HttpTransport;

const KIND: ResourceKind = ResourceKind {
    name: "repository",
    plural: "repositories",
};

/// Repository configuration via `api/repositories`.
///
/// Listing returns summaries only; full payloads come from `read_one`.
#[derive(Debug, Clone)]
pub struct RepositoryAdapter {
    transport: HttpTransport,
}

impl RepositoryAdapter {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    fn url(&self, key: &str) -> reqwest::Url {
        self.transport.endpoint(&["api", "repositories", key], &[])
    }
}

impl RemoteResourceAdapter for RepositoryAdapter {
    fn kind(&self) -> ResourceKind {
        KIND
    }

    fn identity_key_fields(&self) -> Vec<String> {
        vec![KEY_FIELD.to_string()]
    }

    fn required_fields(&self) -> Vec<String> {
        ["key", "rclass", "packageType"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn list_actual(&self) -> Result<Vec<Record>> {
        let url = self.transport.endpoint(&["api", "repositories"], &[]);
        let body = self
            .transport
            .send_request(Method::GET, url, None)
            .map_err(|e| e.into_query(KIND.plural))?;
        record_list(body, KIND.plural)
    }

    fn read_one(&self, key: &IdentityKey) -> Result<Record> {
        let what = format!("repository '{key}'");
        let body = self
            .transport
            .send_request(Method::GET, self.url(key.primary()), None)
            .map_err(|e| e.into_query(what.clone()))?;
        single_record(body, &what)
    }

    fn create(&self, record: &Record, dry_run: bool) -> Result<()> {
        let key = key_of(record);
        let body = record.clone().into_value();
        self.transport
            .send_mutation(Method::PUT, self.url(&key), Some(&body), dry_run)
            .map_err(|e| e.into_mutation(Operation::Create, key))
    }

    fn update(&self, record: &Record, dry_run: bool) -> Result<()> {
        let key = key_of(record);
        let body = record.clone().into_value();
        self.transport
            .send_mutation(Method::POST, self.url(&key), Some(&body), dry_run)
            .map_err(|e| e.into_mutation(Operation::Update, key))
    }

    fn delete(&self, key: &IdentityKey, dry_run: bool) -> Result<()> {
        self.transport
            .send_mutation(Method::DELETE, self.url(key.primary()), None, dry_run)
            .map_err(|e| e.into_mutation(Operation::Delete, key.to_string()))
    }
}
