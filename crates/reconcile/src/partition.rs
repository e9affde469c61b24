//! Three-way split of desired and actual records by identity.

use crate::record::{IdentityKey, Record};
use std::collections::{HashMap, HashSet};

/// A desired record paired with the remote record it matched.
#[derive(Debug, Clone, PartialEq)]
pub struct Matched {
    /// Desired record, with identity-key fields spelled as on the server.
    pub desired: Record,
    /// The remote record as returned by the listing.
    ///
    /// Some kinds list summaries only, so this is not necessarily the
    /// full payload; update decisions re-read the record instead.
    pub actual: Record,
    /// Identity key in the server's spelling.
    pub key: IdentityKey,
}

/// Result of [`partition`]. The three groups are disjoint by identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    /// Desired records with no remote counterpart, in desired order.
    pub only_desired: Vec<(IdentityKey, Record)>,
    /// Records present on both sides, in desired order.
    pub in_both: Vec<Matched>,
    /// Remote records nobody asked for, in actual order.
    pub only_actual: Vec<(IdentityKey, Record)>,
}

/// Splits `desired` and `actual` by identity key.
///
/// An exact key match wins; otherwise keys match case-insensitively.
/// Each remote record pairs with at most one desired record. Matched
/// desired records adopt the server's key spelling. Actual records without
/// a usable identity key are skipped with a warning; they cannot be
/// addressed anyway.
///
/// `desired` must already have passed
/// [`validate_desired`](crate::record::validate_desired).
pub fn partition(desired: &[Record], actual: &[Record], key_fields: &[String]) -> Partition {
    let mut exact: HashMap<IdentityKey, usize> = HashMap::with_capacity(actual.len());
    let mut folded: HashMap<IdentityKey, Vec<usize>> = HashMap::with_capacity(actual.len());
    let mut actual_keys = Vec::with_capacity(actual.len());
    for (index, record) in actual.iter().enumerate() {
        match record.identity_key(key_fields, index) {
            Ok(key) => {
                exact.entry(key.clone()).or_insert(index);
                folded.entry(key.folded()).or_default().push(index);
                actual_keys.push(Some(key));
            }
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring remote record without identity key");
                actual_keys.push(None);
            }
        }
    }

    let desired_keys: Vec<Option<IdentityKey>> = desired
        .iter()
        .enumerate()
        .map(|(index, record)| record.identity_key(key_fields, index).ok())
        .collect();

    // Exact matches are claimed first so a case variant elsewhere in the
    // desired list cannot take them.
    let mut consumed: HashSet<usize> = HashSet::new();
    let mut pairing: Vec<Option<usize>> = vec![None; desired.len()];
    for (slot, key) in pairing.iter_mut().zip(&desired_keys) {
        if let Some(&index) = key.as_ref().and_then(|k| exact.get(k)) {
            if consumed.insert(index) {
                *slot = Some(index);
            }
        }
    }
    for (slot, key) in pairing.iter_mut().zip(&desired_keys) {
        let Some(key) = key else { continue };
        if slot.is_some() {
            continue;
        }
        let candidate = folded
            .get(&key.folded())
            .and_then(|indices| indices.iter().copied().find(|i| !consumed.contains(i)));
        if let Some(index) = candidate {
            consumed.insert(index);
            *slot = Some(index);
        }
    }

    let mut result = Partition::default();
    for ((record, key), slot) in desired.iter().zip(desired_keys).zip(pairing) {
        let Some(key) = key else { continue };
        match slot {
            Some(actual_index) => {
                let actual_record = &actual[actual_index];
                let mut normalized = record.clone();
                normalized.adopt_identity_of(actual_record, key_fields);
                let server_key = actual_keys[actual_index].clone().unwrap_or(key);
                result.in_both.push(Matched {
                    desired: normalized,
                    actual: actual_record.clone(),
                    key: server_key,
                });
            }
            None => result.only_desired.push((key, record.clone())),
        }
    }

    for (index, record) in actual.iter().enumerate() {
        if consumed.contains(&index) {
            continue;
        }
        if let Some(key) = &actual_keys[index] {
            result.only_actual.push((key.clone(), record.clone()));
        }
    }

    result
}
