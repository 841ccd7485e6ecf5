//! Outer layer: cluster access and the `analyze` / `doctor` / `tree` commands.

pub mod analyze;
pub mod discovery;
pub mod doctor;
pub mod kubeconfig;
pub mod tree;

use std::io::Write;

use crate::error::Result;
use crate::models::ResourceRecord;

use discovery::DiscoveryScope;
use kubeconfig::ClusterTarget;

/// Connects to the target cluster and lists every supported resource in scope.
pub async fn collect(target: &ClusterTarget, scope: &DiscoveryScope) -> Result<Vec<ResourceRecord>> {
    let connection = kubeconfig::connect(target).await?;
    if let Some(server) = &connection.server {
        eprintln!("Connected to {server}");
    }

    match &scope.namespace {
        Some(ns) => eprintln!("Discovering resources in namespace {ns}..."),
        None => eprintln!("Discovering resources in all namespaces..."),
    }
    let records = discovery::discover(&connection.client, scope).await;
    eprintln!("Found {} resource(s)", records.len());
    Ok(records)
}

/// Writes rendered output in one piece and flushes it.
pub fn emit(out: &mut impl Write, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}
