//! Discrepancy calculator: set algebra over declared and implied labels.
//!
//! Naming follows the reviewer's point of view:
//! - `missing`: the app's permissions imply a category the policy does not
//!   declare (`implied − declared`), a disclosure gap.
//! - `overDeclared`: the policy declares a category with no permission
//!   evidence (`declared − implied`).
//! - `consistent`: declared and implied.

use crate::label::Label;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-label reconciliation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewTag {
    Missing,
    OverDeclared,
    Consistent,
}

impl ReviewTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::OverDeclared => "overDeclared",
            Self::Consistent => "consistent",
        }
    }
}

impl std::fmt::Display for ReviewTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three disjoint outcomes over `declared ∪ implied`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discrepancy {
    pub missing: BTreeSet<Label>,
    pub over_declared: BTreeSet<Label>,
    pub consistent: BTreeSet<Label>,
}

impl Discrepancy {
    pub fn status_of(&self, label: &str) -> ReviewTag {
        classify_label(label, &self.missing, &self.over_declared)
    }

    pub fn is_aligned(&self) -> bool {
        self.missing.is_empty() && self.over_declared.is_empty()
    }

    /// `declared ∪ implied`, sorted.
    pub fn universe(&self) -> BTreeSet<Label> {
        self.missing
            .iter()
            .chain(&self.over_declared)
            .chain(&self.consistent)
            .cloned()
            .collect()
    }
}

/// Reconcile the declared and implied label sets.
pub fn reconcile(declared: &BTreeSet<Label>, implied: &BTreeSet<Label>) -> Discrepancy {
    Discrepancy {
        missing: implied.difference(declared).cloned().collect(),
        over_declared: declared.difference(implied).cloned().collect(),
        consistent: declared.intersection(implied).cloned().collect(),
    }
}

/// Status of `label` given the two discrepancy sets; anything in neither is consistent.
pub fn classify_label(
    label: &str,
    missing: &BTreeSet<Label>,
    over_declared: &BTreeSet<Label>,
) -> ReviewTag {
    if missing.contains(label) {
        ReviewTag::Missing
    } else if over_declared.contains(label) {
        ReviewTag::OverDeclared
    } else {
        ReviewTag::Consistent
    }
}
