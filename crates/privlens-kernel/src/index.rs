//! Static lookup indexes: permission → labels, and the per-analysis reverse
//! index label → permissions used as evidence.

use crate::error::KernelError;
use crate::label::{Label, Permission};
use serde::Serialize;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

/// Read-only map from permission to the labels it implies.
///
/// Built once per process from an external table. Construction refuses an
/// empty table: a missing table must fail loudly instead of degrading into
/// "every permission is unknown".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionLabelIndex {
    entries: BTreeMap<Permission, BTreeSet<Label>>,
}

impl PermissionLabelIndex {
    /// Build an index from `(permission, labels)` rows.
    ///
    /// Rows naming the same permission are merged by label union, so several
    /// table sources can be concatenated before construction.
    pub fn from_entries<I, L>(rows: I) -> Result<Self, KernelError>
    where
        I: IntoIterator<Item = (Permission, L)>,
        L: IntoIterator<Item = Label>,
    {
        let mut entries: BTreeMap<Permission, BTreeSet<Label>> = BTreeMap::new();
        for (permission, labels) in rows {
            if permission.is_blank() {
                return Err(KernelError::BlankPermission);
            }
            let labels: BTreeSet<Label> = labels.into_iter().collect();
            if labels.is_empty() || labels.iter().any(Label::is_blank) {
                return Err(KernelError::UnlabeledPermission {
                    permission: permission.0,
                });
            }
            entries.entry(permission).or_default().extend(labels);
        }
        if entries.is_empty() {
            return Err(KernelError::EmptyPermissionTable);
        }
        Ok(Self { entries })
    }

    pub fn labels_for(&self, permission: &str) -> Option<&BTreeSet<Label>> {
        self.entries.get(permission)
    }

    pub fn contains(&self, permission: &str) -> bool {
        self.entries.contains_key(permission)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed index; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Permission, &BTreeSet<Label>)> {
        self.entries.iter()
    }

    /// Every label some permission in the table can imply.
    pub fn label_universe(&self) -> BTreeSet<Label> {
        self.entries.values().flatten().cloned().collect()
    }

    /// Content digest of the table, stable across source order and merging.
    pub fn digest(&self) -> String {
        let digest = stable_sha256(&json!({
            "tableKind": "privlens.permission_labels.v1",
            "permissions": self.entries,
        }));
        format!("map1_{digest}")
    }
}

/// Evidence index: label → sorted, deduplicated permissions that imply it.
///
/// Restricted to the permissions actually present in one analyzed artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelToPermissions {
    by_label: BTreeMap<Label, Vec<Permission>>,
}

impl LabelToPermissions {
    /// Invert a `permission → labels` map.
    pub fn from_labels_by_permission(
        labels_by_permission: &BTreeMap<Permission, Vec<Label>>,
    ) -> Self {
        let mut grouped: BTreeMap<Label, BTreeSet<Permission>> = BTreeMap::new();
        for (permission, labels) in labels_by_permission {
            for label in labels {
                grouped
                    .entry(label.clone())
                    .or_default()
                    .insert(permission.clone());
            }
        }
        let by_label = grouped
            .into_iter()
            .map(|(label, permissions)| (label, permissions.into_iter().collect()))
            .collect();
        Self { by_label }
    }

    /// Build directly from label rows; permission lists are sorted and deduplicated.
    pub fn from_rows<I, P>(rows: I) -> Self
    where
        I: IntoIterator<Item = (Label, P)>,
        P: IntoIterator<Item = Permission>,
    {
        let mut grouped: BTreeMap<Label, BTreeSet<Permission>> = BTreeMap::new();
        for (label, permissions) in rows {
            grouped.entry(label).or_default().extend(permissions);
        }
        let by_label = grouped
            .into_iter()
            .map(|(label, permissions)| (label, permissions.into_iter().collect()))
            .collect();
        Self { by_label }
    }

    pub fn permissions_for(&self, label: &str) -> &[Permission] {
        self.by_label.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first `cap` permissions for `label` in ascending order.
    pub fn evidence(&self, label: &str, cap: usize) -> Vec<Permission> {
        self.permissions_for(label)
            .iter()
            .take(cap)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Label, &Vec<Permission>)> {
        self.by_label.iter()
    }
}

pub(crate) fn stable_sha256(value: &Value) -> String {
    let mut hasher = Sha256::new();
    // serde_json's default map is a BTreeMap, so object keys come out sorted.
    hasher.update(value.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}
