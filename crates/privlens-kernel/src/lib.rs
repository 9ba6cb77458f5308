//! # privlens kernel
//!
//! Reconciles two independent descriptions of an app's data handling:
//! labels *declared* by a privacy-policy classifier, and labels *implied* by
//! the permissions the APK requests.
//!
//! The kernel is pure. It never reads files, never runs a classifier and never
//! renders anything. Lookup tables are built once by the host process and
//! passed in by reference.
//!
//! ## Pipeline
//!
//! ```text
//! permissions ──► PermissionLabelIndex::map ──► PermissionMapping
//!                                                 │ implied labels
//! declared labels ───────────────────────────────►│
//!                                                 ▼
//!                                      reconcile ──► Discrepancy
//!                                                 │ missing / overDeclared
//!                                                 ▼
//!                     TemplateTable ──► generate_review_records ──► Vec<ReviewRecord>
//! ```
//!
//! [`build_report`] runs the whole pipeline and assembles a
//! [`ReconciliationReport`].

pub mod classifier;
pub mod error;
pub mod index;
pub mod label;
pub mod mapper;
pub mod reconcile;
pub mod report;
pub mod review;
pub mod templates;

pub use classifier::{ClassifierOutput, DeclaredLabels};
pub use error::KernelError;
pub use index::{LabelToPermissions, PermissionLabelIndex};
pub use label::{DEFAULT_FAILURE_SENTINEL, Label, Permission};
pub use mapper::PermissionMapping;
pub use reconcile::{Discrepancy, ReviewTag, classify_label, reconcile};
pub use report::{
    REPORT_KIND, REPORT_SCHEMA, ReconciliationReport, ReportInput, ReportSummary, build_report,
    compliance_messages,
};
pub use review::{DEFAULT_EVIDENCE_CAP, ReviewInput, ReviewRecord, generate_review_records};
pub use templates::{TemplateTable, fallback_sentence, suffix_for};
