//! Ingestion of the policy-text classifier's output.
//!
//! The classifier is an external collaborator. When it fails, the declared
//! set becomes exactly the failure sentinel label so the run still produces a
//! reviewable entry instead of aborting.

use crate::label::{DEFAULT_FAILURE_SENTINEL, Label};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw classifier result document.
///
/// Keys are camelCase; the classifier's native snake_case keys are accepted
/// as aliases. Unknown keys are rejected so a renamed field cannot silently
/// turn into an empty declared set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClassifierOutput {
    #[serde(default, alias = "pred_labels")]
    pub pred_labels: Vec<String>,
    #[serde(
        default,
        alias = "pred_polarity",
        skip_serializing_if = "Option::is_none"
    )]
    pub pred_polarity: Option<String>,
    #[serde(
        default,
        alias = "probs_multi",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub probs_multi: BTreeMap<String, f64>,
    #[serde(default)]
    pub failed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Declared labels ready for reconciliation.
///
/// Polarity and scores are carried for display only; they never influence
/// tagging.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredLabels {
    pub labels: Vec<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polarity: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub scores: BTreeMap<Label, f64>,
    pub classification_failed: bool,
}

impl DeclaredLabels {
    pub fn from_labels<I, L>(labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Declared set standing in for a failed classification.
    pub fn failed(sentinel: &str) -> Self {
        Self {
            labels: vec![Label::new(sentinel)],
            classification_failed: true,
            ..Self::default()
        }
    }
}

impl ClassifierOutput {
    /// A failure is either an explicit `failed` flag or a non-empty `error`.
    pub fn is_failure(&self) -> bool {
        self.failed
            || self
                .error
                .as_deref()
                .is_some_and(|message| !message.trim().is_empty())
    }

    pub fn into_declared(self, sentinel: Option<&str>) -> DeclaredLabels {
        if self.is_failure() {
            let sentinel = sentinel.unwrap_or(DEFAULT_FAILURE_SENTINEL);
            tracing::warn!(
                sentinel,
                error = self.error.as_deref().unwrap_or(""),
                "policy classifier failed; substituting sentinel label"
            );
            return DeclaredLabels::failed(sentinel);
        }
        DeclaredLabels {
            labels: self.pred_labels.into_iter().map(Label::from).collect(),
            polarity: self.pred_polarity,
            scores: self
                .probs_multi
                .into_iter()
                .map(|(label, score)| (Label::from(label), score))
                .collect(),
            classification_failed: false,
        }
    }
}
