//! Zone signatures: the (station, risk level) identity of a hazard's at-risk set.
//!
//! Two cycles that put the same stations in the same risk bands have equal
//! signatures no matter how their scores or ordering differ.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::{AtRisk, RiskLevel};

/// Unordered set of `(station, risk_level)` pairs.
///
/// Persisted as an array of `[station, level]` pairs. The `{station,
/// risk_level}` object form written by earlier deployments is also
/// accepted on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<StoredEntry>", into = "Vec<(String, RiskLevel)>")]
pub struct Signature(BTreeSet<(String, RiskLevel)>);

impl Signature {
    pub fn of<Z: AtRisk>(zones: &[Z]) -> Self {
        zones
            .iter()
            .map(|z| (z.station().to_string(), z.risk_level()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, station: &str, level: RiskLevel) -> bool {
        self.0.contains(&(station.to_string(), level))
    }

    /// Entries in `self` that `previous` did not have: new stations and
    /// stations whose level moved.
    pub fn added_since(&self, previous: &Signature) -> Vec<(String, RiskLevel)> {
        self.0.difference(&previous.0).cloned().collect()
    }
}

impl FromIterator<(String, RiskLevel)> for Signature {
    fn from_iter<I: IntoIterator<Item = (String, RiskLevel)>>(iter: I) -> Self {
        Signature(iter.into_iter().collect())
    }
}

impl From<Vec<StoredEntry>> for Signature {
    fn from(entries: Vec<StoredEntry>) -> Self {
        entries.into_iter().map(StoredEntry::into_pair).collect()
    }
}

impl From<Signature> for Vec<(String, RiskLevel)> {
    fn from(signature: Signature) -> Self {
        signature.0.into_iter().collect()
    }
}

/// One persisted signature entry, in either on-disk shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StoredEntry {
    Pair(String, RiskLevel),
    Object { station: String, risk_level: RiskLevel },
}

impl StoredEntry {
    fn into_pair(self) -> (String, RiskLevel) {
        match self {
            StoredEntry::Pair(station, level) => (station, level),
            StoredEntry::Object { station, risk_level } => (station, risk_level),
        }
    }
}
