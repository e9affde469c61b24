//! Reporting types for what a reconciliation run changed.

use crate::adapter::ResourceKind;
use crate::record::IdentityKey;
use crate::reconciler::TargetState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single mutation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Present participle used in messages ("Creating", ...).
    pub fn gerund(&self) -> &'static str {
        match self {
            Self::Create => "Creating",
            Self::Update => "Updating",
            Self::Delete => "Deleting",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One mutation that was applied, or would be in dry-run mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedAction {
    pub operation: Operation,
    pub key: IdentityKey,
}

/// Per-operation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub added: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl ChangeCounts {
    pub fn total(&self) -> usize {
        self.added + self.updated + self.deleted
    }

    pub(crate) fn record(&mut self, operation: Operation) {
        match operation {
            Operation::Create => self.added += 1,
            Operation::Update => self.updated += 1,
            Operation::Delete => self.deleted += 1,
        }
    }
}

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub kind: ResourceKind,
    pub state: TargetState,
    pub dry_run: bool,
    pub counts: ChangeCounts,
    /// True when at least one record was (or would be) added, updated, or deleted.
    pub changed: bool,
    /// Mutations in the order they were issued: creates, updates, deletes.
    pub actions: Vec<PlannedAction>,
    /// Human-readable summary.
    pub message: String,
}

impl ReconcileReport {
    pub(crate) fn new(
        kind: ResourceKind,
        state: TargetState,
        dry_run: bool,
        counts: ChangeCounts,
        actions: Vec<PlannedAction>,
    ) -> Self {
        let changed = counts.total() > 0;
        let message = format_message(&kind, &counts, dry_run);
        Self {
            kind,
            state,
            dry_run,
            counts,
            changed,
            actions,
            message,
        }
    }

    /// Lists the planned actions, one per line, for check-mode output.
    pub fn format_actions(&self) -> String {
        let mut out = String::new();
        for action in &self.actions {
            out.push_str(&format!(
                "  {} {} '{}'\n",
                action.operation, self.kind.name, action.key
            ));
        }
        out
    }
}

fn format_message(kind: &ResourceKind, counts: &ChangeCounts, dry_run: bool) -> String {
    let body = if counts.total() == 0 {
        format!("No {} changed", kind.plural)
    } else {
        format!(
            "{} {plural} were added\n{} {plural} were updated\n{} {plural} were deleted",
            counts.added,
            counts.updated,
            counts.deleted,
            plural = kind.plural
        )
    };
    if dry_run {
        format!("[check mode] {body}")
    } else {
        body
    }
}
