use std::fmt::Write;

use crate::graph::render::paint;
use crate::models::{AnalysisResult, ComponentStatus, Issue, Severity};

/// Indents every line after the first so multi-line text lines up under a label.
fn hang(text: &str, indent: &str) -> String {
    text.lines().collect::<Vec<_>>().join(&format!("\n{indent}"))
}

fn write_dependencies(out: &mut String, result: &AnalysisResult, issue: &Issue, heading: &str) {
    if issue.related.is_empty() {
        return;
    }
    let _ = writeln!(out, "   🔗 {heading}:");
    for &id in &issue.related {
        let dep = result.record(id);
        let _ = writeln!(out, "      {} {}/{}", dep.status.icon(), dep.kind, dep.name);
    }
}

/// Full health report: overall verdict, status distribution, ranked issues.
pub fn generate_report(result: &AnalysisResult, color: bool) -> String {
    let mut out = String::new();
    let summary = &result.summary;

    let _ = writeln!(out, "🏥 CLUSTER HEALTH REPORT");
    let _ = writeln!(out, "{}\n", "=".repeat(50));
    let _ = writeln!(
        out,
        "Overall Health: {} {}\n",
        summary.overall_health.icon(),
        paint(summary.overall_health, summary.overall_health.as_str(), color)
    );

    let _ = writeln!(out, "📊 COMPONENT SUMMARY");
    let _ = writeln!(out, "Total Components: {}", summary.total_records);
    let _ = writeln!(out, "Status Distribution:");
    for (status, count) in summary.counts_by_status.iter().filter(|&(_, &n)| n > 0) {
        let _ = writeln!(
            out,
            "  {} {}: {count}",
            status.icon(),
            paint(*status, status.as_str(), color)
        );
    }
    out.push('\n');

    if result.issues.is_empty() {
        let _ = writeln!(out, "✅ No issues found! All components are healthy.");
        return out;
    }

    let _ = writeln!(out, "🚨 ISSUES FOUND");
    let _ = writeln!(out, "{}", "-".repeat(30));
    for (n, issue) in result.issues.iter().enumerate() {
        let record = result.record(issue.record);
        let _ = writeln!(out, "\n{}. {} {}", n + 1, issue.severity.icon(), issue.description);
        let _ = writeln!(out, "   Component: {}/{}", record.kind, record.name);
        let _ = writeln!(out, "   Cause: {}", hang(&issue.cause, "          "));
        let _ = writeln!(out, "   💡 Resolution: {}", hang(&issue.resolution, "      "));
        write_dependencies(&mut out, result, issue, "Check these dependencies");
    }
    out
}

/// Issue-focused diagnostics, as printed by `doctor`.
pub fn doctor_report(result: &AnalysisResult, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🔍 Analyzed {} components", result.summary.total_records);

    if result.issues.is_empty() {
        let _ = writeln!(out, "\n🎉 Excellent! No issues found.");
        let _ = writeln!(out, "All Cluster API and Metal3 components are healthy.");
        return out;
    }

    let _ = writeln!(
        out,
        "\n🚨 Found {} issue(s) that need attention:",
        result.issues.len()
    );
    for (n, issue) in result.issues.iter().enumerate() {
        let record = result.record(issue.record);
        let severity = match issue.severity {
            Severity::Critical => paint(ComponentStatus::Failed, &issue.description, color),
            Severity::Warning => paint(ComponentStatus::Degraded, &issue.description, color),
            Severity::Info => issue.description.clone(),
        };
        let _ = writeln!(out, "\n{}. {} {severity}", n + 1, issue.severity.icon());
        let _ = writeln!(
            out,
            "   📍 Component: {}/{} (namespace: {})",
            record.kind, record.name, record.namespace
        );
        if !issue.condition.message.is_empty() {
            let _ = writeln!(out, "   📝 Message: {}", issue.condition.message);
        }
        let _ = writeln!(out, "   🔍 Cause: {}", hang(&issue.cause, "            "));
        let _ = writeln!(out, "   💡 Resolution: {}", hang(&issue.resolution, "      "));
        write_dependencies(&mut out, result, issue, "Dependencies to check");
    }

    let _ = writeln!(out, "\n📊 Summary by severity:");
    for (severity, count) in result.summary.counts_by_severity.iter().filter(|&(_, &n)| n > 0) {
        let _ = writeln!(out, "   {} {severity}: {count}", severity.icon());
    }
    out
}
