//! Health analysis for Cluster API / Metal3 deployments.
//!
//! Records discovered from a cluster are linked into a dependency forest
//! ([`graph`]), their failing conditions matched against a knowledge base of
//! known failure modes ([`advisor`]), and the findings rolled up into a single
//! health verdict.

pub mod advisor;
pub mod commands;
pub mod error;
pub mod graph;
pub mod models;

use advisor::Advisor;
use graph::DependencyGraph;
use models::{AnalysisResult, ResourceRecord};

/// A graph and the analysis that used it, over the same records.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub graph: DependencyGraph,
    pub result: AnalysisResult,
}

impl Analysis {
    pub fn records(&self) -> &[ResourceRecord] {
        &self.result.records
    }

    /// Renders the dependency forest of the analysed records.
    pub fn tree(&self, color: bool) -> String {
        graph::render_forest(self.records(), &self.graph, &self.graph.roots(), color)
    }
}

/// Builds the dependency graph and runs the advisor over `records`.
pub fn analyze(records: Vec<ResourceRecord>) -> Analysis {
    let graph = DependencyGraph::build(&records);
    let result = Advisor::new().analyze(records, Some(&graph));
    Analysis { graph, result }
}
