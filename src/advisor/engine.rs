use std::collections::BTreeMap;

use crate::graph::DependencyGraph;
use crate::models::{
    AnalysisResult, ComponentStatus, Condition, Issue, RecordId, ResourceKind, ResourceRecord,
    Severity, Summary,
};

use super::guidance;
use super::knowledge::{KnowledgeBase, KnowledgeEntry};

const UNKNOWN_CAUSE: &str = "Unknown cause - no additional information available";
const RULE_GUIDANCE_HEADING: &str = "Specific guidance based on current state:";
const GENERIC_GUIDANCE_HEADING: &str = "Specific guidance based on error:";

/// Evaluates failing conditions against the knowledge base.
#[derive(Debug, Clone, Copy)]
pub struct Advisor {
    knowledge: &'static KnowledgeBase,
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Advisor {
    pub fn new() -> Self {
        Self {
            knowledge: KnowledgeBase::global(),
        }
    }

    /// Produces the severity-ranked issue list and the health rollup.
    ///
    /// `graph` must have been built from `records`; without it issues carry no
    /// related resources.
    pub fn analyze(
        &self,
        records: Vec<ResourceRecord>,
        graph: Option<&DependencyGraph>,
    ) -> AnalysisResult {
        let mut issues = Vec::new();
        let mut counts_by_status: BTreeMap<ComponentStatus, usize> = BTreeMap::new();

        for (id, record) in records.iter().enumerate() {
            *counts_by_status.entry(record.status).or_default() += 1;
            issues.extend(self.inspect(&records, id, graph));
        }

        // stable: equal severities keep record order, then condition order
        issues.sort_by_key(|issue| issue.severity.rank());

        let mut counts_by_severity: BTreeMap<Severity, usize> = BTreeMap::new();
        for issue in &issues {
            *counts_by_severity.entry(issue.severity).or_default() += 1;
        }

        let overall_health = overall_health(&counts_by_status, &counts_by_severity);
        log::info!(
            "advisor: {} record(s), {} issue(s), overall {}",
            records.len(),
            issues.len(),
            overall_health
        );

        AnalysisResult {
            summary: Summary {
                total_records: records.len(),
                counts_by_status,
                counts_by_severity,
                overall_health,
            },
            records,
            issues,
        }
    }

    /// Issues for every `False` condition of one record, in condition order.
    pub fn inspect(
        &self,
        records: &[ResourceRecord],
        id: RecordId,
        graph: Option<&DependencyGraph>,
    ) -> Vec<Issue> {
        let record = &records[id];
        record
            .false_conditions()
            .map(|condition| match self.knowledge.lookup(record.kind, &condition.type_) {
                Some(entry) => rule_issue(records, id, condition, entry, graph),
                None => generic_issue(record, id, condition),
            })
            .collect()
    }
}

fn rule_issue(
    records: &[ResourceRecord],
    id: RecordId,
    condition: &Condition,
    entry: &KnowledgeEntry,
    graph: Option<&DependencyGraph>,
) -> Issue {
    let record = &records[id];
    let resolution = with_guidance(
        fill_template(entry.resolution, record),
        condition,
        RULE_GUIDANCE_HEADING,
    );
    Issue {
        record: id,
        condition: condition.clone(),
        severity: entry.severity,
        description: entry.description.to_string(),
        cause: enhance_cause(entry.cause, condition),
        resolution,
        related: graph
            .map(|graph| related_records(records, graph, id, entry.dependencies))
            .unwrap_or_default(),
    }
}

fn generic_issue(record: &ResourceRecord, id: RecordId, condition: &Condition) -> Issue {
    log::debug!(
        "advisor: no rule for {}.{}, using generic advice",
        record.kind,
        condition.type_
    );
    let resolution = with_guidance(
        generic_resolution(record),
        condition,
        GENERIC_GUIDANCE_HEADING,
    );
    Issue {
        record: id,
        condition: condition.clone(),
        severity: Severity::Warning,
        description: format!("{} {} is {}", record.kind, condition.type_, condition.state.as_str()),
        cause: generic_cause(condition),
        resolution,
        related: Vec::new(),
    }
}

fn fill_template(template: &str, record: &ResourceRecord) -> String {
    template
        .replace("<name>", &record.name)
        .replace("<namespace>", &record.namespace)
}

/// The rule's cause, followed by whatever the condition itself reports.
fn enhance_cause(base: &str, condition: &Condition) -> String {
    let mut cause = base.to_string();
    if !condition.reason.is_empty() {
        cause.push_str("\nReason: ");
        cause.push_str(&condition.reason);
    }
    if !condition.message.is_empty() {
        cause.push_str("\nDetails: ");
        cause.push_str(&condition.message);
    }
    cause
}

fn generic_cause(condition: &Condition) -> String {
    let cause = enhance_cause("", condition);
    match cause.strip_prefix('\n') {
        Some(details) => details.to_string(),
        None => UNKNOWN_CAUSE.to_string(),
    }
}

fn generic_resolution(record: &ResourceRecord) -> String {
    format!(
        "1. Check the {kind} resource: kubectl describe {lower} {name} -n {ns}\n\
         2. Review the condition reason and message above\n\
         3. Check the controller logs for this resource type\n\
         4. Review recent events: kubectl get events -n {ns} --field-selector involvedObject.name={name}",
        kind = record.kind,
        lower = record.kind.as_str().to_lowercase(),
        name = record.name,
        ns = record.namespace,
    )
}

fn with_guidance(resolution: String, condition: &Condition, heading: &str) -> String {
    match guidance::classify(condition) {
        Some(category) => format!("{resolution}\n\n{heading}\n{}", category.guidance),
        None => resolution,
    }
}

/// For each dependency kind: matching children first, then matching siblings.
fn related_records(
    records: &[ResourceRecord],
    graph: &DependencyGraph,
    id: RecordId,
    kinds: &[ResourceKind],
) -> Vec<RecordId> {
    let mut related = Vec::new();
    for &kind in kinds {
        related.extend(
            graph
                .children(id)
                .iter()
                .copied()
                .filter(|&child| records[child].kind == kind),
        );
        related.extend(graph.siblings(id).filter(|&sibling| records[sibling].kind == kind));
    }
    related
}

/// Worst verdict across issues and record statuses, checked in fixed order.
fn overall_health(
    by_status: &BTreeMap<ComponentStatus, usize>,
    by_severity: &BTreeMap<Severity, usize>,
) -> ComponentStatus {
    let status = |s: ComponentStatus| by_status.get(&s).copied().unwrap_or(0) > 0;
    let severity = |s: Severity| by_severity.get(&s).copied().unwrap_or(0) > 0;

    if severity(Severity::Critical) || status(ComponentStatus::Failed) {
        ComponentStatus::Failed
    } else if severity(Severity::Warning) || status(ComponentStatus::Degraded) {
        ComponentStatus::Degraded
    } else if status(ComponentStatus::Pending) {
        ComponentStatus::Pending
    } else {
        ComponentStatus::Healthy
    }
}
