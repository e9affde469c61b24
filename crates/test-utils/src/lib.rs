//! Shared test utilities for artisync crates.
//!
//! This crate provides an in-memory remote server, env-var guards, and
//! file fixtures used across the workspace's integration tests.

use artisync_reconcile::{
    Error, IdentityKey, Operation, Record, RemoteResourceAdapter, ResourceKind, Result,
};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::{LazyLock, Mutex, MutexGuard};

/// Serialize tests that mutate process-global state (env vars, cwd, etc).
///
/// Acquire this guard at the start of any test that modifies environment
/// variables to prevent race conditions between parallel tests.
pub fn env_guard() -> MutexGuard<'static, ()> {
    static TEST_SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    TEST_SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for environment variables - restores original value on drop.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(v) = &self.previous {
            std::env::set_var(self.key, v);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

/// Set an environment variable and return a guard that restores the original on drop.
///
/// # Example
/// ```
/// let _guard = artisync_test_utils::set_env_var("MY_VAR", Some("value"));
/// // MY_VAR is set to "value"
/// // When _guard drops, MY_VAR is restored to its original value
/// ```
pub fn set_env_var(key: &'static str, value: Option<&str>) -> EnvVarGuard {
    let previous = std::env::var(key).ok();
    if let Some(val) = value {
        std::env::set_var(key, val);
    } else {
        std::env::remove_var(key);
    }
    EnvVarGuard { key, previous }
}

/// Builds a record from a JSON literal; panics on non-objects.
pub fn record(value: Value) -> Record {
    Record::from_value(value, 0).expect("test record must be a JSON object")
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory server
// ─────────────────────────────────────────────────────────────────────────────

/// A call observed by [`InMemoryServer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    ReadOne(String),
    Create { key: String, dry_run: bool },
    Update { key: String, dry_run: bool },
    Delete { key: String, dry_run: bool },
}

impl Call {
    /// True for create/update/delete calls that were not dry runs.
    pub fn is_live_mutation(&self) -> bool {
        matches!(
            self,
            Self::Create { dry_run: false, .. }
                | Self::Update { dry_run: false, .. }
                | Self::Delete { dry_run: false, .. }
        )
    }
}

#[derive(Default)]
struct ServerState {
    records: Vec<Record>,
    calls: Vec<Call>,
    failure: Option<(Operation, String)>,
}

/// Remote resource adapter backed by a `Vec<Record>` keyed on `"key"`.
///
/// Honors dry-run, logs every call, and can be told to fail one mutation.
pub struct InMemoryServer {
    kind: ResourceKind,
    required: Vec<String>,
    state: Mutex<ServerState>,
}

impl InMemoryServer {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            kind: ResourceKind {
                name: "repository",
                plural: "repositories",
            },
            required: vec!["key".to_string()],
            state: Mutex::new(ServerState {
                records,
                ..Default::default()
            }),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Overrides the required-field list (defaults to `["key"]`).
    pub fn with_required_fields(mut self, fields: &[&str]) -> Self {
        self.required = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Makes the given mutation on `key` fail with status 500.
    pub fn fail_on(self, operation: Operation, key: &str) -> Self {
        self.lock().failure = Some((operation, key.to_string()));
        self
    }

    pub fn records(&self) -> Vec<Record> {
        self.lock().records.clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.lock().records.iter().map(key_of).collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn live_mutations(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.is_live_mutation())
            .count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_failure(state: &ServerState, operation: Operation, key: &str) -> Result<()> {
        match &state.failure {
            Some((op, k)) if *op == operation && k == key => Err(Error::RemoteMutation {
                operation,
                key: key.to_string(),
                status: Some(500),
                message: "injected failure".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

fn key_of(record: &Record) -> String {
    match record.get("key") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

impl RemoteResourceAdapter for InMemoryServer {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn identity_key_fields(&self) -> Vec<String> {
        vec!["key".to_string()]
    }

    fn required_fields(&self) -> Vec<String> {
        self.required.clone()
    }

    fn list_actual(&self) -> Result<Vec<Record>> {
        let mut state = self.lock();
        state.calls.push(Call::List);
        Ok(state.records.clone())
    }

    fn read_one(&self, key: &IdentityKey) -> Result<Record> {
        let mut state = self.lock();
        state.calls.push(Call::ReadOne(key.to_string()));
        state
            .records
            .iter()
            .find(|r| key_of(r) == key.primary())
            .cloned()
            .ok_or_else(|| Error::RemoteQuery {
                what: format!("repository {key}"),
                status: Some(404),
                message: "not found".to_string(),
            })
    }

    fn create(&self, record: &Record, dry_run: bool) -> Result<()> {
        let mut state = self.lock();
        let key = key_of(record);
        state.calls.push(Call::Create {
            key: key.clone(),
            dry_run,
        });
        Self::check_failure(&state, Operation::Create, &key)?;
        if !dry_run {
            state.records.push(record.clone());
        }
        Ok(())
    }

    fn update(&self, record: &Record, dry_run: bool) -> Result<()> {
        let mut state = self.lock();
        let key = key_of(record);
        state.calls.push(Call::Update {
            key: key.clone(),
            dry_run,
        });
        Self::check_failure(&state, Operation::Update, &key)?;
        if !dry_run {
            if let Some(existing) = state.records.iter_mut().find(|r| key_of(r) == key) {
                *existing = record.clone();
            }
        }
        Ok(())
    }

    fn delete(&self, key: &IdentityKey, dry_run: bool) -> Result<()> {
        let mut state = self.lock();
        let key = key.to_string();
        state.calls.push(Call::Delete {
            key: key.clone(),
            dry_run,
        });
        Self::check_failure(&state, Operation::Delete, &key)?;
        if !dry_run {
            state.records.retain(|r| key_of(r) != key);
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File fixtures
// ─────────────────────────────────────────────────────────────────────────────

/// Temporary directory for desired-record files and a fake HOME.
pub struct TestFixture {
    pub tempdir: tempfile::TempDir,
}

impl TestFixture {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            tempdir: tempfile::tempdir()?,
        })
    }

    /// Get the path that should be set as HOME.
    pub fn home_path(&self) -> &std::path::Path {
        self.tempdir.path()
    }

    /// Create an RAII guard that sets HOME to this fixture's temp directory.
    pub fn home_guard(&self) -> EnvVarGuard {
        set_env_var("HOME", Some(self.home_path().to_str().unwrap()))
    }

    /// Writes `content` to `name` inside the fixture and returns its path.
    pub fn write_file(&self, name: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.tempdir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }
}
