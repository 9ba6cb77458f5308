//! Review sentence generator.
//!
//! One [`ReviewRecord`] per label in `declared ∪ implied`. Display order is
//! declared labels first, then implied labels, each in caller order, with
//! first occurrence winning. Output depends only on the inputs.

use crate::index::LabelToPermissions;
use crate::label::{Label, Permission};
use crate::reconcile::{ReviewTag, classify_label};
use crate::templates::TemplateTable;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Default number of evidence permissions shown per label.
pub const DEFAULT_EVIDENCE_CAP: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub label: Label,
    pub tag: ReviewTag,
    pub sentence: String,
    /// Supporting permissions, ascending, at most the evidence cap.
    pub evidence: Vec<Permission>,
}

#[derive(Debug, Clone, Copy)]
pub struct ReviewInput<'a> {
    pub declared_labels: &'a [Label],
    pub implied_labels: &'a [Label],
    pub missing: &'a BTreeSet<Label>,
    pub over_declared: &'a BTreeSet<Label>,
    pub label_to_permissions: &'a LabelToPermissions,
    pub evidence_cap: usize,
}

/// Stable, de-duplicated display order: declared first, then implied.
/// Only empty labels are skipped; whitespace is part of a label's name.
fn display_order<'a>(declared: &'a [Label], implied: &'a [Label]) -> Vec<&'a Label> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut order = Vec::new();
    for label in declared.iter().chain(implied) {
        if !label.as_str().is_empty() && seen.insert(label.as_str()) {
            order.push(label);
        }
    }
    order
}

pub fn generate_review_records(
    input: &ReviewInput<'_>,
    templates: &TemplateTable,
) -> Vec<ReviewRecord> {
    display_order(input.declared_labels, input.implied_labels)
        .into_iter()
        .map(|label| {
            let tag = classify_label(label.as_str(), input.missing, input.over_declared);
            if !templates.contains(label.as_str()) {
                tracing::debug!(%label, "no template for label; using fallback sentence");
            }
            ReviewRecord {
                label: label.clone(),
                tag,
                sentence: templates.sentence(label.as_str(), tag),
                evidence: input
                    .label_to_permissions
                    .evidence(label.as_str(), input.evidence_cap),
            }
        })
        .collect()
}
