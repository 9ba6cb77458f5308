//! Full reconciliation report: mapper, calculator and generator in one pass.

use crate::classifier::DeclaredLabels;
use crate::index::{LabelToPermissions, PermissionLabelIndex};
use crate::label::{Label, Permission, join_display};
use crate::mapper::PermissionMapping;
use crate::reconcile::{Discrepancy, reconcile};
use crate::review::{ReviewInput, ReviewRecord, generate_review_records};
use crate::templates::TemplateTable;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const REPORT_SCHEMA: u32 = 1;
pub const REPORT_KIND: &str = "privlens.reconciliation.v1";

const RESULT_ALIGNED: &str = "aligned";
const RESULT_DISCREPANT: &str = "discrepant";

#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub permissions: &'a [Permission],
    pub declared: &'a DeclaredLabels,
    pub index: &'a PermissionLabelIndex,
    pub templates: &'a TemplateTable,
    pub evidence_cap: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub permission_count: usize,
    pub mapped_permission_count: usize,
    pub unknown_permission_count: usize,
    pub label_count: usize,
    pub missing_count: usize,
    pub over_declared_count: usize,
    pub consistent_count: usize,
    pub evidence_cap: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub schema: u32,
    pub report_kind: String,
    pub result: String,
    pub mapping_digest: String,
    pub template_digest: String,
    pub policy_labels: Vec<Label>,
    pub permission_labels: Vec<Label>,
    pub missing: Vec<Label>,
    pub over_declared: Vec<Label>,
    pub consistent: Vec<Label>,
    pub unknown_permissions: Vec<Permission>,
    pub labels_by_permission: BTreeMap<Permission, Vec<Label>>,
    pub label_to_permissions: LabelToPermissions,
    pub compliance_messages: Vec<String>,
    pub review_records: Vec<ReviewRecord>,
    pub classification_failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_polarity: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub policy_scores: BTreeMap<Label, f64>,
    pub summary: ReportSummary,
}

impl ReconciliationReport {
    pub fn aligned(&self) -> bool {
        self.result == RESULT_ALIGNED
    }
}

/// Human-readable summary lines; each is present only when its set is non-empty.
pub fn compliance_messages(
    discrepancy: &Discrepancy,
    unknown_permissions: &BTreeSet<Permission>,
) -> Vec<String> {
    let mut messages = Vec::new();
    if !discrepancy.missing.is_empty() {
        messages.push(format!(
            "Labels missing from the policy: {}",
            join_display(&discrepancy.missing)
        ));
    }
    if !discrepancy.over_declared.is_empty() {
        messages.push(format!(
            "Labels not evidenced by app permissions: {}",
            join_display(&discrepancy.over_declared)
        ));
    }
    if !unknown_permissions.is_empty() {
        messages.push(format!(
            "Permissions absent from the mapping table (review needed): {}",
            join_display(unknown_permissions)
        ));
    }
    messages
}

pub fn build_report(input: &ReportInput<'_>) -> ReconciliationReport {
    let PermissionMapping {
        implied_labels,
        labels_by_permission,
        unknown_permissions,
    } = input.index.map(input.permissions);
    let label_to_permissions = LabelToPermissions::from_labels_by_permission(&labels_by_permission);

    let declared_set: BTreeSet<Label> = input
        .declared
        .labels
        .iter()
        .filter(|label| !label.as_str().is_empty())
        .cloned()
        .collect();
    let discrepancy = reconcile(&declared_set, &implied_labels);

    let policy_labels: Vec<Label> = declared_set.into_iter().collect();
    let permission_labels: Vec<Label> = implied_labels.into_iter().collect();

    let review_records = generate_review_records(
        &ReviewInput {
            declared_labels: &policy_labels,
            implied_labels: &permission_labels,
            missing: &discrepancy.missing,
            over_declared: &discrepancy.over_declared,
            label_to_permissions: &label_to_permissions,
            evidence_cap: input.evidence_cap,
        },
        input.templates,
    );

    let compliance_messages = compliance_messages(&discrepancy, &unknown_permissions);
    let distinct_permissions: BTreeSet<&Permission> = input.permissions.iter().collect();
    let summary = ReportSummary {
        permission_count: distinct_permissions.len(),
        mapped_permission_count: labels_by_permission.len(),
        unknown_permission_count: unknown_permissions.len(),
        label_count: discrepancy.universe().len(),
        missing_count: discrepancy.missing.len(),
        over_declared_count: discrepancy.over_declared.len(),
        consistent_count: discrepancy.consistent.len(),
        evidence_cap: input.evidence_cap,
    };
    let result = if discrepancy.is_aligned() {
        RESULT_ALIGNED
    } else {
        RESULT_DISCREPANT
    };
    tracing::debug!(
        result,
        missing = summary.missing_count,
        over_declared = summary.over_declared_count,
        unknown = summary.unknown_permission_count,
        "reconciliation complete"
    );

    let Discrepancy {
        missing,
        over_declared,
        consistent,
    } = discrepancy;

    ReconciliationReport {
        schema: REPORT_SCHEMA,
        report_kind: REPORT_KIND.to_string(),
        result: result.to_string(),
        mapping_digest: input.index.digest(),
        template_digest: input.templates.digest(),
        policy_labels,
        permission_labels,
        missing: missing.into_iter().collect(),
        over_declared: over_declared.into_iter().collect(),
        consistent: consistent.into_iter().collect(),
        unknown_permissions: unknown_permissions.into_iter().collect(),
        labels_by_permission,
        label_to_permissions,
        compliance_messages,
        review_records,
        classification_failed: input.declared.classification_failed,
        policy_polarity: input.declared.polarity.clone(),
        policy_scores: input.declared.scores.clone(),
        summary,
    }
}
