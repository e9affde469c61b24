//! Trait definition for remote resource adapters.

use crate::record::{IdentityKey, Record};
use crate::Result;
use serde::Serialize;

/// Names a resource kind for logs and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceKind {
    /// Singular noun, e.g. "repository".
    pub name: &'static str,
    /// Plural noun, e.g. "repositories".
    pub plural: &'static str,
}

#[cfg(test)]
use mockall::automock;

/// Create/read/update/delete access to one kind of remote configuration.
///
/// Implemented once per resource kind. The reconciler only talks to this
/// trait. Mutations receive `dry_run` explicitly and must not touch the
/// remote system when it is set.
#[cfg_attr(test, automock)]
pub trait RemoteResourceAdapter {
    /// Which resource kind this adapter manages.
    fn kind(&self) -> ResourceKind;

    /// Fields that together identify a record, in order.
    fn identity_key_fields(&self) -> Vec<String>;

    /// Fields every desired record must carry.
    fn required_fields(&self) -> Vec<String> {
        self.identity_key_fields()
    }

    // --- Read operations ---

    /// Fetch every existing record of this kind.
    fn list_actual(&self) -> Result<Vec<Record>>;

    /// Fetch the full current payload of one record.
    fn read_one(&self, key: &IdentityKey) -> Result<Record>;

    // --- Write operations ---

    /// Create a record.
    fn create(&self, record: &Record, dry_run: bool) -> Result<()>;

    /// Replace a record's full payload.
    fn update(&self, record: &Record, dry_run: bool) -> Result<()>;

    /// Remove a record.
    fn delete(&self, key: &IdentityKey, dry_run: bool) -> Result<()>;
}

impl<A: RemoteResourceAdapter + ?Sized> RemoteResourceAdapter for &A {
    fn kind(&self) -> ResourceKind {
        (**self).kind()
    }

    fn identity_key_fields(&self) -> Vec<String> {
        (**self).identity_key_fields()
    }

    fn required_fields(&self) -> Vec<String> {
        (**self).required_fields()
    }

    fn list_actual(&self) -> Result<Vec<Record>> {
        (**self).list_actual()
    }

    fn read_one(&self, key: &IdentityKey) -> Result<Record> {
        (**self).read_one(key)
    }

    fn create(&self, record: &Record, dry_run: bool) -> Result<()> {
        (**self).create(record, dry_run)
    }

    fn update(&self, record: &Record, dry_run: bool) -> Result<()> {
        (**self).update(record, dry_run)
    }

    fn delete(&self, key: &IdentityKey, dry_run: bool) -> Result<()> {
        (**self).delete(key, dry_run)
    }
}

impl<A: RemoteResourceAdapter + ?Sized> RemoteResourceAdapter for Box<A> {
    fn kind(&self) -> ResourceKind {
        (**self).kind()
    }

    fn identity_key_fields(&self) -> Vec<String> {
        (**self).identity_key_fields()
    }

    fn required_fields(&self) -> Vec<String> {
        (**self).required_fields()
    }

    fn list_actual(&self) -> Result<Vec<Record>> {
        (**self).list_actual()
    }

    fn read_one(&self, key: &IdentityKey) -> Result<Record> {
        (**self).read_one(key)
    }

    fn create(&self, record: &Record, dry_run: bool) -> Result<()> {
        (**self).create(record, dry_run)
    }

    fn update(&self, record: &Record, dry_run: bool) -> Result<()> {
        (**self).update(record, dry_run)
    }

    fn delete(&self, key: &IdentityKey, dry_run: bool) -> Result<()> {
        (**self).delete(key, dry_run)
    }
}
