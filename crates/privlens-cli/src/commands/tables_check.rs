use crate::support::{join_or_none, load_config_or_exit, load_tables_or_exit, render_json_or_exit};
use privlens_tables::{TableAudit, audit_tables};

pub fn run(
    mapping: Vec<String>,
    templates: Option<String>,
    config: Option<String>,
    json_output: bool,
) {
    let config = load_config_or_exit(config.as_deref());
    let tables = load_tables_or_exit(&config, &mapping, templates.as_deref());
    let audit = audit_tables(&tables);

    if json_output {
        println!("{}", render_json_or_exit(&audit));
    } else {
        print_human_summary(&audit);
    }
}

fn print_human_summary(audit: &TableAudit) {
    println!("privlens tables-check");
    println!("  Permission sources: {}", audit.permission_sources.join(", "));
    println!("  Template source: {}", audit.template_source);
    println!("  Mapping digest: {}", audit.mapping_digest);
    println!("  Template digest: {}", audit.template_digest);
    println!("  Permissions: {}", audit.permission_count);
    println!("  Labels: {}", join_or_none(&audit.label_universe));
    println!(
        "  Labels without template (fallback sentence): {}",
        join_or_none(&audit.labels_without_template)
    );
    println!(
        "  Templates without permission: {}",
        join_or_none(&audit.templates_without_permission)
    );
}
