//! Label → sentence templates and the fixed per-tag suffixes.
//!
//! Lookup is total: a label without a template gets a generic sentence naming
//! the label and asking for manual review. Sentinel labels from a failed
//! classifier take the same path.

use crate::error::KernelError;
use crate::index::stable_sha256;
use crate::label::Label;
use crate::reconcile::ReviewTag;
use serde::Serialize;
use serde_json::json;
use std::borrow::Cow;
use std::collections::BTreeMap;

pub const SUFFIX_MISSING: &str = "The policy may be missing a disclosure for this category; \
     confirm and add the notice where needed.";
pub const SUFFIX_OVER_DECLARED: &str = "The policy declares this category but implementation \
     evidence may be weak; confirm whether the app or a bundled SDK actually needs it.";
pub const SUFFIX_CONSISTENT: &str = "The policy and the implementation look broadly consistent; \
     confirm whether the data is actually collected or transmitted at runtime.";

/// Fixed follow-up advice appended after the base sentence.
pub fn suffix_for(tag: ReviewTag) -> &'static str {
    match tag {
        ReviewTag::Missing => SUFFIX_MISSING,
        ReviewTag::OverDeclared => SUFFIX_OVER_DECLARED,
        ReviewTag::Consistent => SUFFIX_CONSISTENT,
    }
}

/// Generic base sentence for a label with no template.
pub fn fallback_sentence(label: &str) -> String {
    format!(
        "Processing related to {label} may be present; review manually whether it is disclosed."
    )
}

/// Read-only label → base sentence table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TemplateTable {
    sentences: BTreeMap<Label, String>,
}

impl TemplateTable {
    pub fn from_entries<I>(rows: I) -> Result<Self, KernelError>
    where
        I: IntoIterator<Item = (Label, String)>,
    {
        let mut sentences = BTreeMap::new();
        for (label, sentence) in rows {
            if label.is_blank() {
                return Err(KernelError::InvalidTemplate {
                    label: label.0,
                    reason: "label is blank".to_string(),
                });
            }
            let sentence = sentence.trim().to_string();
            if sentence.is_empty() {
                return Err(KernelError::InvalidTemplate {
                    label: label.0,
                    reason: "sentence is empty".to_string(),
                });
            }
            sentences.insert(label, sentence);
        }
        Ok(Self { sentences })
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.sentences.get(label).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.sentences.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.sentences.keys()
    }

    pub fn base_sentence<'a>(&'a self, label: &str) -> Cow<'a, str> {
        match self.get(label) {
            Some(sentence) => Cow::Borrowed(sentence),
            None => Cow::Owned(fallback_sentence(label)),
        }
    }

    /// Base sentence followed by the tag's suffix.
    pub fn sentence(&self, label: &str, tag: ReviewTag) -> String {
        format!("{} {}", self.base_sentence(label), suffix_for(tag))
    }

    pub fn digest(&self) -> String {
        let digest = stable_sha256(&json!({
            "tableKind": "privlens.label_templates.v1",
            "labels": self.sentences,
        }));
        format!("tpl1_{digest}")
    }
}
