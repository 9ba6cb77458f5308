use crate::support::{
    exit_input_error, join_or_none, load_config_or_exit, load_tables_or_exit,
    read_classifier_or_exit, read_permissions_or_exit, render_json_or_exit, store_records_or_exit,
    yes_no,
};
use privlens_kernel::{DeclaredLabels, ReconciliationReport, ReportInput, build_report};
use privlens_tables::StoreOutcome;
use serde_json::{Value, json};

pub struct Args {
    pub permissions: String,
    pub classifier: Option<String>,
    pub declared: Vec<String>,
    pub mapping: Vec<String>,
    pub templates: Option<String>,
    pub config: Option<String>,
    pub evidence_cap: Option<usize>,
    pub store: Option<String>,
    pub fail_on_missing: bool,
    pub json: bool,
}

pub fn run(args: Args) {
    let config = load_config_or_exit(args.config.as_deref());
    let tables = load_tables_or_exit(&config, &args.mapping, args.templates.as_deref());
    let permissions = read_permissions_or_exit(&args.permissions);
    let declared = match args.classifier.as_deref() {
        Some(path) => read_classifier_or_exit(path).into_declared(Some(config.failure_sentinel())),
        None => DeclaredLabels::from_labels(args.declared.iter().map(String::as_str)),
    };
    let evidence_cap = args.evidence_cap.unwrap_or_else(|| config.evidence_cap());

    let report = build_report(&ReportInput {
        permissions: &permissions,
        declared: &declared,
        index: tables.index(),
        templates: tables.template_table(),
        evidence_cap,
    });

    let stored = args
        .store
        .as_deref()
        .map(|path| (path, store_records_or_exit(path, &report.review_records)));

    if args.json {
        let mut payload = serde_json::to_value(&report)
            .unwrap_or_else(|err| exit_input_error("failed to render reconciliation report", err));
        if let (Value::Object(fields), Some((path, outcome))) = (&mut payload, stored) {
            fields.insert("store".to_string(), json!({ "path": path, "outcome": outcome }));
        }
        println!("{}", render_json_or_exit(&payload));
    } else {
        print_human_summary(&report, &tables.permissions.sources, stored);
    }

    if args.fail_on_missing && !report.missing.is_empty() {
        std::process::exit(1);
    }
}

fn print_human_summary(
    report: &ReconciliationReport,
    sources: &[String],
    stored: Option<(&str, StoreOutcome)>,
) {
    let summary = &report.summary;
    println!("privlens reconcile");
    println!("  Mapping: {} ({})", sources.join(", "), report.mapping_digest);
    println!(
        "  Permissions: {} ({} mapped, {} unknown)",
        summary.permission_count, summary.mapped_permission_count, summary.unknown_permission_count
    );
    println!("  Classification failed: {}", yes_no(report.classification_failed));
    if let Some(polarity) = &report.policy_polarity {
        println!("  Policy polarity: {polarity}");
    }
    println!("  Policy labels: {}", join_or_none(&report.policy_labels));
    println!("  Permission labels: {}", join_or_none(&report.permission_labels));
    println!("  Result: {}", report.result);
    println!("  Missing: {}", join_or_none(&report.missing));
    println!("  Over-declared: {}", join_or_none(&report.over_declared));
    println!("  Consistent: {}", join_or_none(&report.consistent));
    if !report.compliance_messages.is_empty() {
        println!("  Compliance:");
        for message in &report.compliance_messages {
            println!("    - {message}");
        }
    }
    if !report.review_records.is_empty() {
        println!("  Review records:");
        for record in &report.review_records {
            println!("    - {} [{}]: {}", record.label, record.tag, record.sentence);
            if !record.evidence.is_empty() {
                println!("      evidence: {}", join_or_none(&record.evidence));
            }
        }
    }
    if let Some((path, outcome)) = stored {
        println!("  Store: {path} ({})", outcome.as_str());
    }
}
