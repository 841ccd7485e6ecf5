// List Cluster API / Metal3 objects via kube-rs and normalize them into records
use chrono::{DateTime, Utc};
use kube::api::{Api, ApiResource, DynamicObject, GroupVersionKind, ListParams};
use kube::Client;
use serde_json::Value;

use crate::error::{AdvisorError, Result};
use crate::graph::refs::{self, CLUSTER_NAME_LABEL};
use crate::models::{Condition, ConditionState, ResourceKind, ResourceRecord};

/// Pre-filter applied before analysis.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryScope {
    /// `None` lists across all namespaces.
    pub namespace: Option<String>,
    /// Keep only objects belonging to this CAPI cluster.
    pub cluster: Option<String>,
}

pub fn api_resource(kind: ResourceKind) -> ApiResource {
    let gvk = GroupVersionKind::gvk(kind.api_group(), kind.api_version(), kind.as_str());
    ApiResource::from_gvk_with_plural(&gvk, kind.plural())
}

/// Lists every supported kind and returns whatever could be read.
///
/// A kind whose CRD is not installed contributes nothing; any other per-kind
/// failure is logged and skipped, so the result may be partial.
pub async fn discover(client: &Client, scope: &DiscoveryScope) -> Vec<ResourceRecord> {
    let mut records = Vec::new();

    for kind in ResourceKind::ALL {
        match discover_kind(client, kind, scope.namespace.as_deref()).await {
            Ok(found) => {
                log::info!("discovery: {} {kind} object(s)", found.len());
                records.extend(found);
            }
            Err(e) => log::warn!("discovery: skipping {kind}: {e}"),
        }
    }

    match &scope.cluster {
        Some(cluster) => filter_by_cluster(records, cluster),
        None => records,
    }
}

async fn discover_kind(
    client: &Client,
    kind: ResourceKind,
    namespace: Option<&str>,
) -> Result<Vec<ResourceRecord>> {
    let resource = api_resource(kind);
    let api: Api<DynamicObject> = match namespace {
        Some(ns) => Api::namespaced_with(client.clone(), ns, &resource),
        None => Api::all_with(client.clone(), &resource),
    };

    match api.list(&ListParams::default()).await {
        Ok(list) => Ok(list
            .items
            .iter()
            .map(|obj| record_from_object(kind, obj))
            .collect()),
        Err(kube::Error::Api(resp)) if resp.code == 404 => {
            log::info!("discovery: {kind} CRD not installed");
            Ok(Vec::new())
        }
        Err(source) => Err(AdvisorError::Discovery { kind, source }),
    }
}

/// Normalizes one listed object; derives its status here, once.
pub fn record_from_object(kind: ResourceKind, obj: &DynamicObject) -> ResourceRecord {
    let conditions = refs::lookup(&obj.data, &["status", "conditions"])
        .map(extract_conditions)
        .unwrap_or_default();
    let raw_spec = obj.data.get("spec").cloned().unwrap_or(Value::Null);
    let raw_metadata = serde_json::to_value(&obj.metadata).unwrap_or(Value::Null);

    ResourceRecord::new(
        kind,
        obj.metadata.name.clone().unwrap_or_default(),
        obj.metadata.namespace.clone().unwrap_or_default(),
        conditions,
        raw_spec,
        raw_metadata,
    )
}

/// Reads `status.conditions[]`; entries that are not objects are skipped.
fn extract_conditions(raw: &Value) -> Vec<Condition> {
    let text = |entry: &serde_json::Map<String, Value>, key: &str| {
        entry
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    raw.as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .map(|entry| Condition {
            type_: text(entry, "type"),
            state: ConditionState::parse(&text(entry, "status")),
            reason: text(entry, "reason"),
            message: text(entry, "message"),
            last_transition_time: entry
                .get("lastTransitionTime")
                .and_then(Value::as_str)
                .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
                .map(|t| t.with_timezone(&Utc)),
        })
        .collect()
}

/// Keeps the named Cluster plus every record that points at it through
/// `spec.clusterName` or the `cluster.x-k8s.io/cluster-name` label.
///
/// Matching Clusters come first, then the members, each group in input order.
pub fn filter_by_cluster(records: Vec<ResourceRecord>, cluster: &str) -> Vec<ResourceRecord> {
    let before = records.len();
    let (clusters, members): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|record| record.kind == ResourceKind::Cluster);

    let mut kept: Vec<ResourceRecord> = clusters
        .into_iter()
        .filter(|record| record.name == cluster)
        .collect();
    kept.extend(members.into_iter().filter(|record| {
        refs::lookup_str(&record.raw_spec, &["clusterName"]) == Some(cluster)
            || refs::label(&record.raw_metadata, CLUSTER_NAME_LABEL) == Some(cluster)
    }));
    log::info!(
        "discovery: cluster filter {cluster:?} kept {} of {before} record(s)",
        kept.len()
    );
    kept
}
