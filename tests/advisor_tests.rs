//! End-to-end advisor behaviour: status derivation, issue ranking, guidance,
//! related resources, and the health rollup.

use capi_advisor::advisor::{Advisor, KnowledgeBase};
use capi_advisor::models::{
    ComponentStatus, Condition, ConditionState, ResourceKind, ResourceRecord, Severity,
};
use serde_json::{json, Value};

fn record(kind: ResourceKind, name: &str, conditions: Vec<Condition>) -> ResourceRecord {
    ResourceRecord::new(kind, name, "capi", conditions, json!({}), json!({}))
}

fn failing(type_: &str) -> Condition {
    Condition::new(type_, ConditionState::False)
}

fn passing(type_: &str) -> Condition {
    Condition::new(type_, ConditionState::True)
}

#[test]
fn failed_machine_ready_yields_one_critical_issue_from_the_knowledge_base() {
    let analysis = capi_advisor::analyze(vec![record(
        ResourceKind::Machine,
        "m-0",
        vec![failing("Ready")],
    )]);
    let result = &analysis.result;

    assert_eq!(result.records[0].status, ComponentStatus::Failed);
    assert_eq!(result.issues.len(), 1);

    let issue = &result.issues[0];
    let entry = KnowledgeBase::global()
        .lookup(ResourceKind::Machine, "Ready")
        .unwrap();
    assert_eq!(issue.severity, Severity::Critical);
    assert_eq!(issue.description, entry.description);
    assert_eq!(issue.cause, entry.cause);
    assert!(issue
        .resolution
        .contains("kubectl describe machine m-0 -n capi"));
    assert_eq!(result.summary.overall_health, ComponentStatus::Failed);
}

#[test]
fn ready_true_outranks_a_false_prerequisite() {
    let machine = record(
        ResourceKind::Machine,
        "m-0",
        vec![failing("InfrastructureReady"), passing("Ready")],
    );
    assert_eq!(machine.status, ComponentStatus::Healthy);

    // the False condition is still reported
    let result = Advisor::new().analyze(vec![machine], None);
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].condition.type_, "InfrastructureReady");
}

#[test]
fn all_true_conditions_mean_no_issues_and_healthy() {
    let records = vec![
        record(ResourceKind::Cluster, "prod", vec![passing("Ready"), passing("ControlPlaneReady")]),
        record(ResourceKind::Machine, "m-0", vec![passing("Ready")]),
        record(ResourceKind::BareMetalHost, "node-0", vec![passing("Provisioned")]),
    ];
    let result = capi_advisor::analyze(records).result;

    assert!(result.issues.is_empty());
    assert_eq!(result.summary.overall_health, ComponentStatus::Healthy);
    assert_eq!(result.summary.status_count(ComponentStatus::Healthy), 3);
    assert_eq!(result.summary.total_records, 3);
}

#[test]
fn unknown_conditions_make_the_deployment_pending() {
    let records = vec![
        record(ResourceKind::Machine, "m-0", vec![passing("Ready")]),
        record(
            ResourceKind::Metal3Machine,
            "m3m-0",
            vec![Condition::new("AssociationReady", ConditionState::Unknown)],
        ),
    ];
    let result = Advisor::new().analyze(records, None);

    assert!(result.issues.is_empty());
    assert_eq!(result.summary.overall_health, ComponentStatus::Pending);
}

#[test]
fn unmatched_bmc_failure_gets_generic_issue_with_connectivity_guidance() {
    let host = record(
        ResourceKind::BareMetalHost,
        "node-0",
        vec![failing("Inspected").with_reason("BMCConnectionTimeout")],
    );
    let result = Advisor::new().analyze(vec![host], None);
    let issue = &result.issues[0];

    assert_eq!(issue.severity, Severity::Warning);
    assert_eq!(issue.description, "BareMetalHost Inspected is False");
    assert_eq!(issue.cause, "Reason: BMCConnectionTimeout");
    assert!(issue
        .resolution
        .contains("kubectl describe baremetalhost node-0 -n capi"));
    assert!(issue
        .resolution
        .contains("Specific guidance based on error:\n- BMC connection issue detected"));
    assert!(issue.related.is_empty());
    assert_eq!(result.summary.overall_health, ComponentStatus::Degraded);
}

#[test]
fn matched_rule_appends_guidance_from_the_condition_message() {
    let host = record(
        ResourceKind::BareMetalHost,
        "node-0",
        vec![failing("Provisioned").with_message("failed to download image: 404")],
    );
    let result = Advisor::new().analyze(vec![host], None);
    let resolution = &result.issues[0].resolution;

    assert!(resolution.contains("Specific guidance based on current state:\n- Image access issue detected"));
    assert!(!resolution.contains("BMC connection issue"));
}

#[test]
fn issues_are_ranked_by_severity_then_scan_order() {
    let records = vec![
        record(ResourceKind::KubeadmConfig, "kc-0", vec![failing("DataSecretAvailable")]),
        record(ResourceKind::Machine, "m-0", vec![failing("BootstrapReady"), failing("Ready")]),
        record(ResourceKind::KubeadmConfig, "kc-1", vec![failing("Ready")]),
        record(ResourceKind::Cluster, "prod", vec![failing("Ready")]),
    ];
    let result = Advisor::new().analyze(records, None);

    let order: Vec<(Severity, &str, &str)> = result
        .issues
        .iter()
        .map(|i| {
            (
                i.severity,
                result.record(i.record).name.as_str(),
                i.condition.type_.as_str(),
            )
        })
        .collect();
    assert_eq!(
        order,
        vec![
            (Severity::Critical, "m-0", "BootstrapReady"),
            (Severity::Critical, "m-0", "Ready"),
            (Severity::Critical, "prod", "Ready"),
            (Severity::Warning, "kc-0", "DataSecretAvailable"),
            (Severity::Warning, "kc-1", "Ready"),
        ]
    );
    assert_eq!(result.summary.severity_count(Severity::Critical), 3);
    assert_eq!(result.summary.severity_count(Severity::Warning), 2);
    assert_eq!(result.summary.severity_count(Severity::Info), 0);
}

#[test]
fn related_resources_list_children_before_siblings() {
    let owned_by_kcp = json!({"ownerReferences": [{"kind": "KubeadmControlPlane", "name": "prod-cp"}]});
    let records = vec![
        ResourceRecord::new(
            ResourceKind::Cluster,
            "prod",
            "capi",
            vec![],
            json!({"controlPlaneRef": {"name": "prod-cp"}}),
            json!({}),
        ),
        // claimed by the cluster through clusterName before the control plane adopts
        ResourceRecord::new(
            ResourceKind::Machine,
            "cp-b",
            "capi",
            vec![],
            json!({"clusterName": "prod"}),
            owned_by_kcp.clone(),
        ),
        ResourceRecord::new(
            ResourceKind::KubeadmControlPlane,
            "prod-cp",
            "capi",
            vec![failing("Ready")],
            json!({}),
            json!({}),
        ),
        ResourceRecord::new(ResourceKind::Machine, "cp-a", "capi", vec![], json!({}), owned_by_kcp),
    ];
    let analysis = capi_advisor::analyze(records);
    let issue = &analysis.result.issues[0];

    let related: Vec<&str> = issue
        .related
        .iter()
        .map(|&id| analysis.records()[id].name.as_str())
        .collect();
    assert_eq!(related, vec!["cp-a", "cp-b"]);
}

#[test]
fn related_resources_follow_rule_dependency_order() {
    let records = vec![
        ResourceRecord::new(
            ResourceKind::Machine,
            "m-0",
            "capi",
            vec![failing("Ready")],
            json!({
                "bootstrap": {"configRef": {"name": "kc-0"}},
                "infrastructureRef": {"name": "m3m-0"}
            }),
            json!({}),
        ),
        record(ResourceKind::KubeadmConfig, "kc-0", vec![]),
        record(ResourceKind::Metal3Machine, "m3m-0", vec![]),
    ];
    let analysis = capi_advisor::analyze(records);
    // Metal3Machine before KubeadmConfig, whatever the input order
    assert_eq!(analysis.result.issues[0].related, vec![2, 1]);
}

#[test]
fn duplicates_are_each_analysed() {
    let records = vec![
        record(ResourceKind::Machine, "m-0", vec![failing("Ready")]),
        record(ResourceKind::Machine, "m-0", vec![failing("Ready")]),
    ];
    let result = capi_advisor::analyze(records).result;
    assert_eq!(result.summary.total_records, 2);
    assert_eq!(result.issues.len(), 2);
    assert_eq!(result.issues[0].record, 0);
    assert_eq!(result.issues[1].record, 1);
}

#[test]
fn empty_input_is_healthy() {
    let result = Advisor::new().analyze(vec![], None);
    assert!(result.issues.is_empty());
    assert_eq!(result.summary.total_records, 0);
    assert_eq!(result.summary.overall_health, ComponentStatus::Healthy);
}

#[test]
fn document_embeds_identities_instead_of_links() {
    let records = vec![
        ResourceRecord::new(
            ResourceKind::Metal3Machine,
            "m3m-0",
            "capi",
            vec![failing("Ready").with_reason("ProvisioningFailed")],
            json!({"hostSelector": {}}),
            json!({}),
        ),
        record(ResourceKind::BareMetalHost, "node-0", vec![passing("Ready")]),
    ];
    let analysis = capi_advisor::analyze(records);
    let document = analysis.result.to_document(Some(&analysis.graph));
    let value: Value = serde_json::to_value(&document).unwrap();

    assert_eq!(value["components"][0]["kind"], "Metal3Machine");
    assert!(value["components"][0].get("type").is_none());
    assert_eq!(
        value["components"][0]["children"],
        json!([{"kind": "BareMetalHost", "name": "node-0", "namespace": "capi"}])
    );
    assert_eq!(value["components"][1]["parent"]["name"], "m3m-0");
    assert_eq!(value["issues"][0]["component"]["name"], "m3m-0");
    assert_eq!(value["issues"][0]["condition"]["status"], "False");
    assert_eq!(value["issues"][0]["condition"]["reason"], "ProvisioningFailed");
    assert_eq!(value["issues"][0]["dependencies"][0]["name"], "node-0");
    assert_eq!(value["summary"]["cluster_health"], "Failed");
    assert_eq!(value["summary"]["status_counts"]["Healthy"], 1);
}
