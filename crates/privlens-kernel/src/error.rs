//! Error types for kernel construction.
//!
//! Per-item conditions (unknown permissions, unknown labels, empty inputs)
//! never surface here. Only building a lookup table can fail.

/// Errors raised while constructing kernel lookup tables.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// No permission table was supplied at all.
    #[error("permission label table is empty: refusing to treat every permission as unknown")]
    EmptyPermissionTable,

    /// A permission identifier in a table was blank.
    #[error("blank permission identifier in permission label table")]
    BlankPermission,

    /// A permission maps to no labels, or to a blank label.
    #[error("permission `{permission}` has no usable labels")]
    UnlabeledPermission { permission: String },

    /// A template table entry has a blank label or an empty sentence.
    #[error("invalid label template for `{label}`: {reason}")]
    InvalidTemplate { label: String, reason: String },
}
