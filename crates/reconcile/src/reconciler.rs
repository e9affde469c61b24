//! Reconciler that drives an adapter towards a target state.

use crate::adapter::RemoteResourceAdapter;
use crate::error::{Error, ValidationError};
use crate::partition::{partition, Partition};
use crate::record::{validate_desired, IdentityKey, Record};
use crate::report::{ChangeCounts, Operation, PlannedAction, ReconcileReport};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// End state requested for the declared records.
///
/// ```
/// use artisync_reconcile::TargetState;
///
/// assert_eq!("present".parse::<TargetState>().unwrap(), TargetState::Present);
/// assert_eq!("PRUNE".parse::<TargetState>().unwrap(), TargetState::Prune);
/// assert!("gone".parse::<TargetState>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetState {
    /// Declared records exist and match; other records are left alone.
    #[default]
    Present,
    /// Declared records do not exist; other records are left alone.
    Absent,
    /// Declared records exist and match; every other record is deleted.
    Prune,
}

impl TargetState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Prune => "Prune",
        }
    }

    fn creates(&self) -> bool {
        matches!(self, Self::Present | Self::Prune)
    }
}

impl FromStr for TargetState {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            "prune" => Ok(Self::Prune),
            _ => Err(ValidationError::InvalidState(s.to_string())),
        }
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Applies desired records to one resource kind through its adapter.
///
/// Every run re-reads remote state, so a reconciler holds no state between
/// runs. Calls are issued one at a time: creates, then updates, then
/// deletes. The first failing call aborts the run without undoing what was
/// already applied.
pub struct Reconciler<A: RemoteResourceAdapter> {
    adapter: A,
}

impl<A: RemoteResourceAdapter> Reconciler<A> {
    pub fn new(adapter: A) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Creates missing records and updates drifted ones.
    pub fn present(&self, desired: &[Record], dry_run: bool) -> Result<ReconcileReport> {
        self.reconcile(TargetState::Present, desired, dry_run)
    }

    /// Deletes declared records that exist remotely.
    pub fn absent(&self, desired: &[Record], dry_run: bool) -> Result<ReconcileReport> {
        self.reconcile(TargetState::Absent, desired, dry_run)
    }

    /// Like [`present`](Self::present), then deletes every undeclared record.
    ///
    /// **Destructive:** an empty `desired` list deletes every record of this
    /// kind on the server.
    pub fn prune(&self, desired: &[Record], dry_run: bool) -> Result<ReconcileReport> {
        self.reconcile(TargetState::Prune, desired, dry_run)
    }

    /// Runs validate, fetch, partition, apply, and report for `state`.
    pub fn reconcile(
        &self,
        state: TargetState,
        desired: &[Record],
        dry_run: bool,
    ) -> Result<ReconcileReport> {
        let kind = self.adapter.kind();
        let key_fields = self.adapter.identity_key_fields();
        validate_desired(desired, &key_fields, &self.adapter.required_fields())?;

        let actual = self.adapter.list_actual()?;
        tracing::debug!(
            kind = kind.plural,
            desired = desired.len(),
            actual = actual.len(),
            "Fetched remote records"
        );

        let Partition {
            only_desired,
            in_both,
            only_actual,
        } = partition(desired, &actual, &key_fields);

        let mut run = Run::new(dry_run);

        if state.creates() {
            for (key, record) in &only_desired {
                run.apply(Operation::Create, key, || {
                    self.adapter.create(record, dry_run)
                })?;
            }

            for matched in &in_both {
                let current = run.guard(self.adapter.read_one(&matched.key))?;
                let future = matched.desired.merged_over(&current);
                if future == current {
                    tracing::debug!(kind = kind.name, key = %matched.key, "Record unchanged");
                    continue;
                }
                run.apply(Operation::Update, &matched.key, || {
                    self.adapter.update(&future, dry_run)
                })?;
            }
        }

        let to_delete: Vec<&IdentityKey> = match state {
            TargetState::Present => Vec::new(),
            TargetState::Absent => in_both.iter().map(|m| &m.key).collect(),
            TargetState::Prune => only_actual.iter().map(|(key, _)| key).collect(),
        };
        for key in to_delete {
            run.apply(Operation::Delete, key, || self.adapter.delete(key, dry_run))?;
        }

        let report = ReconcileReport::new(kind, state, dry_run, run.counts, run.actions);
        tracing::info!(
            kind = kind.plural,
            state = %state,
            dry_run,
            added = report.counts.added,
            updated = report.counts.updated,
            deleted = report.counts.deleted,
            "Reconciliation complete"
        );
        Ok(report)
    }
}

/// Progress of one run, kept so a failure can report what already happened.
struct Run {
    dry_run: bool,
    counts: ChangeCounts,
    actions: Vec<PlannedAction>,
}

impl Run {
    fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            counts: ChangeCounts::default(),
            actions: Vec::new(),
        }
    }

    fn apply(
        &mut self,
        operation: Operation,
        key: &IdentityKey,
        call: impl FnOnce() -> Result<()>,
    ) -> Result<()> {
        self.guard(call())?;
        if self.dry_run {
            tracing::info!(operation = %operation, key = %key, "Would apply (check mode)");
        } else {
            tracing::info!(operation = %operation, key = %key, "Applied");
        }
        self.counts.record(operation);
        self.actions.push(PlannedAction {
            operation,
            key: key.clone(),
        });
        Ok(())
    }

    fn guard<T>(&self, result: Result<T>) -> Result<T> {
        result.map_err(|err: Error| {
            tracing::error!(
                error = %err,
                added = self.counts.added,
                updated = self.counts.updated,
                deleted = self.counts.deleted,
                "Reconciliation aborted; earlier changes were kept"
            );
            err
        })
    }
}
