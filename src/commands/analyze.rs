use clap::ValueEnum;

use crate::advisor::generate_report;
use crate::error::Result;
use crate::Analysis;

use super::discovery::DiscoveryScope;
use super::kubeconfig::ClusterTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Report,
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeOptions {
    pub format: OutputFormat,
    /// Print the dependency forest ahead of the report.
    pub tree: bool,
    pub color: bool,
}

/// Renders an analysis in the requested format.
///
/// The tree is only added to the text report; JSON and YAML already carry
/// parent/children on every component.
pub fn render(analysis: &Analysis, options: AnalyzeOptions) -> Result<String> {
    match options.format {
        OutputFormat::Report => {
            let mut out = String::new();
            if options.tree {
                out.push_str("🌳 DEPENDENCY TREE\n");
                out.push_str(&"=".repeat(50));
                out.push('\n');
                out.push_str(&analysis.tree(options.color));
                out.push('\n');
            }
            out.push_str(&generate_report(&analysis.result, options.color));
            Ok(out)
        }
        OutputFormat::Json => {
            let document = analysis.result.to_document(Some(&analysis.graph));
            let mut out = serde_json::to_string_pretty(&document)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Yaml => {
            let document = analysis.result.to_document(Some(&analysis.graph));
            Ok(serde_yaml::to_string(&document)?)
        }
    }
}

pub async fn run(target: &ClusterTarget, scope: &DiscoveryScope, options: AnalyzeOptions) -> Result<()> {
    let records = super::collect(target, scope).await?;
    if records.is_empty() {
        eprintln!("No Cluster API or Metal3 resources found");
    }
    let analysis = crate::analyze(records);
    super::emit(&mut std::io::stdout().lock(), &render(&analysis, options)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Condition, ConditionState, ResourceKind, ResourceRecord};
    use serde_json::{json, Value};

    fn sample() -> Analysis {
        crate::analyze(vec![
            ResourceRecord::new(
                ResourceKind::Cluster,
                "prod",
                "capi",
                vec![Condition::new("Ready", ConditionState::True)],
                json!({"infrastructureRef": {"name": "prod-m3c"}}),
                json!({}),
            ),
            ResourceRecord::new(
                ResourceKind::Metal3Cluster,
                "prod-m3c",
                "capi",
                vec![Condition::new("Ready", ConditionState::False).with_message("endpoint down")],
                json!({}),
                json!({}),
            ),
        ])
    }

    #[test]
    fn report_with_tree_puts_forest_first() {
        let options = AnalyzeOptions {
            tree: true,
            ..Default::default()
        };
        let text = render(&sample(), options).unwrap();
        let tree_at = text.find("🌳 DEPENDENCY TREE").unwrap();
        let report_at = text.find("🏥 CLUSTER HEALTH REPORT").unwrap();
        assert!(tree_at < report_at);
        assert!(text.contains("\n  ❌ Metal3Cluster/prod-m3c (Failed)"));
    }

    #[test]
    fn report_without_tree_has_no_forest() {
        let text = render(&sample(), AnalyzeOptions::default()).unwrap();
        assert!(!text.contains("DEPENDENCY TREE"));
        assert!(text.starts_with("🏥 CLUSTER HEALTH REPORT"));
    }

    #[test]
    fn json_output_is_a_document() {
        let options = AnalyzeOptions {
            format: OutputFormat::Json,
            ..Default::default()
        };
        let value: Value = serde_json::from_str(&render(&sample(), options).unwrap()).unwrap();
        assert_eq!(value["summary"]["total_components"], 2);
        assert_eq!(value["summary"]["cluster_health"], "Failed");
        assert_eq!(value["components"][1]["parent"]["name"], "prod");
        assert_eq!(value["issues"][0]["component"]["kind"], "Metal3Cluster");
    }

    #[test]
    fn yaml_output_parses_back() {
        let options = AnalyzeOptions {
            format: OutputFormat::Yaml,
            ..Default::default()
        };
        let value: serde_yaml::Value = serde_yaml::from_str(&render(&sample(), options).unwrap()).unwrap();
        assert_eq!(value["summary"]["total_components"].as_u64(), Some(2));
        assert_eq!(value["components"][0]["kind"].as_str(), Some("Cluster"));
    }
}
