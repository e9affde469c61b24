//! Declarative reconciliation of configuration records for artisync.
//!
//! Brings one kind of remote configuration (repositories, LDAP settings,
//! ...) to a requested end state: `Present`, `Absent`, or `Prune`. The
//! remote side is reached through a pluggable [`RemoteResourceAdapter`];
//! this crate holds no transport and no resource-kind-specific logic.
//!
//! # Examples
//!
//! ```
//! use artisync_reconcile::{
//!     IdentityKey, Reconciler, Record, RemoteResourceAdapter, ResourceKind, Result,
//! };
//! use serde_json::json;
//!
//! struct EmptyServer;
//!
//! impl RemoteResourceAdapter for EmptyServer {
//!     fn kind(&self) -> ResourceKind {
//!         ResourceKind { name: "widget", plural: "widgets" }
//!     }
//!
//!     fn identity_key_fields(&self) -> Vec<String> {
//!         vec!["key".to_string()]
//!     }
//!
//!     fn list_actual(&self) -> Result<Vec<Record>> {
//!         Ok(Vec::new())
//!     }
//!
//!     fn read_one(&self, _key: &IdentityKey) -> Result<Record> {
//!         unreachable!("nothing exists remotely")
//!     }
//!
//!     fn create(&self, _record: &Record, _dry_run: bool) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn update(&self, _record: &Record, _dry_run: bool) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn delete(&self, _key: &IdentityKey, _dry_run: bool) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let desired = Record::from_values(vec![json!({"key": "w1"})]).unwrap();
//! let report = Reconciler::new(EmptyServer).present(&desired, true).unwrap();
//! assert!(report.changed);
//! assert_eq!(report.counts.added, 1);
//! ```

#![deny(unsafe_code)]

pub mod adapter;
pub mod error;
pub mod partition;
pub mod reconciler;
pub mod record;
pub mod report;

pub use adapter::{RemoteResourceAdapter, ResourceKind};
pub use error::{Error, Result, ValidationError};
pub use partition::{partition, Matched, Partition};
pub use reconciler::{Reconciler, TargetState};
pub use record::{validate_desired, IdentityKey, Record};
pub use report::{ChangeCounts, Operation, PlannedAction, ReconcileReport};
