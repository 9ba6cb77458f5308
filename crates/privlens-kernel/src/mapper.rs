//! Permission label mapper.

use crate::index::{LabelToPermissions, PermissionLabelIndex};
use crate::label::{Label, Permission};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Labels implied by one artifact's permission list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionMapping {
    pub implied_labels: BTreeSet<Label>,
    pub labels_by_permission: BTreeMap<Permission, Vec<Label>>,
    /// Permissions absent from the table. Reported so gaps in the table can be audited.
    pub unknown_permissions: BTreeSet<Permission>,
}

impl PermissionMapping {
    /// Reverse index used for evidence attribution.
    pub fn label_to_permissions(&self) -> LabelToPermissions {
        LabelToPermissions::from_labels_by_permission(&self.labels_by_permission)
    }
}

impl PermissionLabelIndex {
    /// Map raw permissions to the labels they imply.
    ///
    /// Duplicates and ordering in `permissions` do not matter. Unknown
    /// permissions never gain a label.
    pub fn map(&self, permissions: &[Permission]) -> PermissionMapping {
        let mut mapping = PermissionMapping::default();

        for permission in permissions {
            match self.labels_for(permission.as_str()) {
                Some(labels) => {
                    mapping.implied_labels.extend(labels.iter().cloned());
                    mapping
                        .labels_by_permission
                        .entry(permission.clone())
                        .or_insert_with(|| labels.iter().cloned().collect());
                }
                None => {
                    mapping.unknown_permissions.insert(permission.clone());
                }
            }
        }

        if !mapping.unknown_permissions.is_empty() {
            tracing::warn!(
                unknown = mapping.unknown_permissions.len(),
                "permissions missing from the label table"
            );
        }
        tracing::debug!(
            permissions = permissions.len(),
            mapped = mapping.labels_by_permission.len(),
            implied = mapping.implied_labels.len(),
            "mapped permissions to labels"
        );

        mapping
    }
}
