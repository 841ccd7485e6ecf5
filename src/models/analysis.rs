use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::k8s::{Condition, ResourceKind, ResourceRecord, ResourceRef};
use super::status::ComponentStatus;
use crate::graph::DependencyGraph;

/// Position of a record in the slice handed to the graph builder and the advisor.
pub type RecordId = usize;

/// Ordered by urgency: `Critical < Warning < Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Severity::Critical => "🔴",
            Severity::Warning => "🟡",
            Severity::Info => "🔵",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Critical => "Critical",
            Severity::Warning => "Warning",
            Severity::Info => "Info",
        })
    }
}

/// One failing condition on one record, with advice attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub record: RecordId,
    pub condition: Condition,
    pub severity: Severity,
    pub description: String,
    pub cause: String,
    pub resolution: String,
    /// Records worth checking next, children first, then siblings.
    pub related: Vec<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "total_components")]
    pub total_records: usize,
    #[serde(rename = "status_counts")]
    pub counts_by_status: BTreeMap<ComponentStatus, usize>,
    #[serde(rename = "severity_counts")]
    pub counts_by_severity: BTreeMap<Severity, usize>,
    #[serde(rename = "cluster_health")]
    pub overall_health: ComponentStatus,
}

impl Summary {
    pub fn status_count(&self, status: ComponentStatus) -> usize {
        self.counts_by_status.get(&status).copied().unwrap_or(0)
    }

    pub fn severity_count(&self, severity: Severity) -> usize {
        self.counts_by_severity.get(&severity).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub records: Vec<ResourceRecord>,
    /// Critical first, then Warning, then Info; scan order within a severity.
    pub issues: Vec<Issue>,
    pub summary: Summary,
}

impl AnalysisResult {
    pub fn record(&self, id: RecordId) -> &ResourceRecord {
        &self.records[id]
    }

    /// Builds the acyclic interchange form used for JSON/YAML output.
    pub fn to_document(&self, graph: Option<&DependencyGraph>) -> AnalysisDocument {
        let identity = |id: RecordId| self.records[id].identity();

        let components = self
            .records
            .iter()
            .enumerate()
            .map(|(id, record)| ComponentView {
                kind: record.kind,
                name: record.name.clone(),
                namespace: record.namespace.clone(),
                status: record.status,
                conditions: record.conditions.clone(),
                parent: graph.and_then(|g| g.parent(id)).map(identity),
                children: graph
                    .map(|g| g.children(id).iter().copied().map(identity).collect())
                    .unwrap_or_default(),
            })
            .collect();

        let issues = self
            .issues
            .iter()
            .map(|issue| IssueView {
                component: identity(issue.record),
                condition: issue.condition.clone(),
                severity: issue.severity,
                description: issue.description.clone(),
                cause: issue.cause.clone(),
                resolution: issue.resolution.clone(),
                dependencies: issue.related.iter().copied().map(identity).collect(),
            })
            .collect();

        AnalysisDocument {
            components,
            issues,
            summary: self.summary.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisDocument {
    pub components: Vec<ComponentView>,
    pub issues: Vec<IssueView>,
    pub summary: Summary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentView {
    /// Same key as the embedded [`ResourceRef`] identities.
    pub kind: ResourceKind,
    pub name: String,
    pub namespace: String,
    pub status: ComponentStatus,
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ResourceRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResourceRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueView {
    pub component: ResourceRef,
    pub condition: Condition,
    pub severity: Severity,
    pub description: String,
    pub cause: String,
    pub resolution: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<ResourceRef>,
}
