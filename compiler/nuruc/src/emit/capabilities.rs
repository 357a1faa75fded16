//! `--capabilities` JSON (§4.7.5, §6.4): computed once, at emit time, from the already
//! combined+validated route list, and embedded as a string literal. Nothing about this
//! document depends on argv or process state, so there is no reason to rebuild it at
//! runtime — doing so at emit time also trivially satisfies the idempotence property
//! that re-emitting the same `AppModel` must produce byte-identical output.

use nuru_ir::{AppModel, RouteDefinition, SegmentDefinition};
use serde_json::{json, Value};

/// Build the deterministic capabilities document for one app's already-ordered route
/// list (specificity-descending, declaration order as the tie-break — the same order
/// the dispatcher matches against).
pub fn render(app: &AppModel, routes: &[&RouteDefinition]) -> String {
    let commands: Vec<Value> = routes
        .iter()
        .filter(|r| !r.is_help_route)
        .map(|r| command_entry(r))
        .collect();

    let doc = json!({
        "name": app.app_name,
        "version": app.app_version,
        "description": app.app_description,
        "commitHash": std::env::var("NURU_COMMIT_HASH").ok(),
        "commitDate": std::env::var("NURU_COMMIT_DATE").ok(),
        "commands": commands,
    });
    serde_json::to_string_pretty(&doc).expect("capabilities document is always serializable")
}

fn command_entry(route: &RouteDefinition) -> Value {
    let parameters: Vec<Value> = route
        .segments
        .iter()
        .filter_map(SegmentDefinition::as_parameter)
        .map(|p| {
            json!({
                "name": p.name,
                "type": p.type_constraint.clone().unwrap_or_else(|| "string".to_string()),
                "required": !p.is_optional && !p.is_catch_all,
                "description": p.description.clone().unwrap_or_default(),
            })
        })
        .collect();

    let options: Vec<Value> = route
        .segments
        .iter()
        .filter_map(SegmentDefinition::as_option)
        .map(|o| {
            json!({
                "name": o.long_form,
                "alias": o.short_form.map(|c| c.to_string()),
                "type": o.type_constraint.clone().unwrap_or_else(|| "bool".to_string()),
                "required": !o.is_optional,
                "default": Value::Null,
                "description": o.description.clone().unwrap_or_default(),
            })
        })
        .collect();

    json!({
        "pattern": route.pattern,
        "description": route.description.clone().unwrap_or_default(),
        "messageType": route.message_type.wire_name(),
        "parameters": parameters,
        "options": options,
    })
}
