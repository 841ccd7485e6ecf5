use crate::advisor::doctor_report;
use crate::error::Result;

use super::discovery::DiscoveryScope;
use super::kubeconfig::ClusterTarget;

/// Runs the full analysis but prints only the issue-focused diagnostics.
pub async fn run(target: &ClusterTarget, scope: &DiscoveryScope, color: bool) -> Result<()> {
    eprintln!("🩺 Running Cluster API and Metal3 diagnostics...");
    let records = super::collect(target, scope).await?;
    let text = if records.is_empty() {
        "❌ No Cluster API or Metal3 resources found\n".to_string()
    } else {
        doctor_report(&crate::analyze(records).result, color)
    };
    super::emit(&mut std::io::stdout().lock(), &text)
}
