use crate::error::Result;
use crate::graph::{render_forest, DependencyGraph};
use crate::models::ResourceRecord;

use super::discovery::DiscoveryScope;
use super::kubeconfig::ClusterTarget;

/// The forest only; the advisor is not consulted.
pub fn render(records: &[ResourceRecord], color: bool) -> String {
    let graph = DependencyGraph::build(records);
    let roots = graph.roots();
    log::info!("tree: {} root(s)", roots.len());
    render_forest(records, &graph, &roots, color)
}

pub async fn run(target: &ClusterTarget, scope: &DiscoveryScope, color: bool) -> Result<()> {
    let records = super::collect(target, scope).await?;
    let text = if records.is_empty() {
        "No Cluster API or Metal3 resources found\n".to_string()
    } else {
        format!(
            "🌳 Cluster API Dependency Tree\n{}\n{}",
            "=".repeat(50),
            render(&records, color)
        )
    };
    super::emit(&mut std::io::stdout().lock(), &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Condition, ConditionState, ResourceKind};
    use serde_json::json;

    #[test]
    fn machine_nests_under_its_cluster() {
        let records = vec![
            ResourceRecord::new(
                ResourceKind::Machine,
                "m-0",
                "capi",
                vec![Condition::new("Ready", ConditionState::Unknown).with_message("provisioning")],
                json!({"clusterName": "prod"}),
                json!({}),
            ),
            ResourceRecord::new(ResourceKind::Cluster, "prod", "capi", vec![], json!({}), json!({})),
        ];
        assert_eq!(
            render(&records, false),
            "❓ Cluster/prod (Unknown)\n  ⏳ Machine/m-0 (Pending)\n    ? Ready: provisioning\n"
        );
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(render(&[], false), "");
    }
}
