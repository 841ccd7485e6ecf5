use std::fmt::Write;

use owo_colors::OwoColorize;

use crate::models::{ComponentStatus, ConditionState, RecordId, ResourceRecord};

use super::DependencyGraph;

/// Colours `text` by status when `color` is set.
pub fn paint(status: ComponentStatus, text: &str, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match status {
        ComponentStatus::Healthy => text.green().to_string(),
        ComponentStatus::Degraded => text.yellow().to_string(),
        ComponentStatus::Failed => text.red().bold().to_string(),
        ComponentStatus::Pending => text.cyan().to_string(),
        ComponentStatus::Unknown => text.dimmed().to_string(),
    }
}

fn condition_icon(state: ConditionState) -> &'static str {
    match state {
        ConditionState::True => "✓",
        ConditionState::False => "✗",
        ConditionState::Unknown => "?",
    }
}

/// Pre-order, depth-first rendering of every tree rooted at `roots`.
///
/// Each node prints its header, then its conditions in reported order, then
/// its children in stored order, two spaces deeper.
pub fn render_forest(
    records: &[ResourceRecord],
    graph: &DependencyGraph,
    roots: &[RecordId],
    color: bool,
) -> String {
    let mut out = String::new();
    for &root in roots {
        render_node(&mut out, records, graph, root, 0, color);
    }
    out
}

fn render_node(
    out: &mut String,
    records: &[ResourceRecord],
    graph: &DependencyGraph,
    id: RecordId,
    depth: usize,
    color: bool,
) {
    let record = &records[id];
    let indent = "  ".repeat(depth);
    let header = format!("{}/{} ({})", record.kind, record.name, record.status);

    let _ = writeln!(
        out,
        "{indent}{} {}",
        record.status.icon(),
        paint(record.status, &header, color)
    );
    for condition in &record.conditions {
        let _ = writeln!(
            out,
            "{indent}  {} {}: {}",
            condition_icon(condition.state),
            condition.type_,
            condition.message
        );
    }
    for &child in graph.children(id) {
        render_node(out, records, graph, child, depth + 1, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Condition, ResourceKind};
    use serde_json::json;

    #[test]
    fn forest_renders_depth_first_with_conditions() {
        let records = vec![
            ResourceRecord::new(
                ResourceKind::Machine,
                "m-0",
                "capi",
                vec![
                    Condition::new("Ready", ConditionState::False).with_message("waiting"),
                    Condition::new("BootstrapReady", ConditionState::True),
                ],
                json!({"infrastructureRef": {"name": "m3m-0"}}),
                json!({}),
            ),
            ResourceRecord::new(
                ResourceKind::Metal3Machine,
                "m3m-0",
                "capi",
                vec![],
                json!({}),
                json!({}),
            ),
        ];
        let graph = DependencyGraph::build(&records);
        let text = render_forest(&records, &graph, &graph.roots(), false);
        assert_eq!(
            text,
            "❌ Machine/m-0 (Failed)\n\
             \x20 ✗ Ready: waiting\n\
             \x20 ✓ BootstrapReady: \n\
             \x20 ❓ Metal3Machine/m3m-0 (Unknown)\n"
        );
    }

    #[test]
    fn plain_paint_leaves_text_untouched() {
        assert_eq!(paint(ComponentStatus::Failed, "x", false), "x");
        assert_ne!(paint(ComponentStatus::Failed, "x", true), "x");
    }
}
