use crate::support::{
    join_or_none, load_config_or_exit, load_permission_table_or_exit, read_permissions_or_exit,
    render_json_or_exit,
};
use privlens_kernel::{Label, Permission};
use serde_json::json;

pub fn run(permissions: String, mapping: Vec<String>, config: Option<String>, json_output: bool) {
    let config = load_config_or_exit(config.as_deref());
    let table = load_permission_table_or_exit(&config, &mapping);
    let permissions = read_permissions_or_exit(&permissions);
    let mapped = table.index.map(&permissions);

    if json_output {
        let payload = json!({
            "permissionSources": table.sources,
            "mappingDigest": table.index.digest(),
            "impliedLabels": mapped.implied_labels,
            "labelsByPermission": mapped.labels_by_permission,
            "labelToPermissions": mapped.label_to_permissions(),
            "unknownPermissions": mapped.unknown_permissions,
        });
        println!("{}", render_json_or_exit(&payload));
    } else {
        let implied: Vec<Label> = mapped.implied_labels.iter().cloned().collect();
        let unknown: Vec<Permission> = mapped.unknown_permissions.iter().cloned().collect();
        println!("privlens map");
        println!("  Mapping: {}", table.sources.join(", "));
        println!("  Implied labels: {}", join_or_none(&implied));
        for (permission, labels) in &mapped.labels_by_permission {
            println!("    - {permission}: {}", join_or_none(labels));
        }
        println!("  Unknown permissions: {}", join_or_none(&unknown));
    }
}
