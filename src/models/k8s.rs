// Rust structs mirroring the Cluster API / Metal3 objects the advisor inspects
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::status::{derive_status, ComponentStatus};

/// The closed set of resource kinds the advisor knows how to discover and relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    Cluster,
    Machine,
    MachineSet,
    MachineDeployment,
    /// Infrastructure counterpart of a Machine.
    Metal3Machine,
    /// Infrastructure counterpart of a Cluster.
    Metal3Cluster,
    /// Physical host backing a Metal3Machine.
    BareMetalHost,
    KubeadmControlPlane,
    /// Bootstrap configuration of a Machine.
    KubeadmConfig,
}

impl ResourceKind {
    /// Every kind, in discovery order.
    pub const ALL: [ResourceKind; 9] = [
        ResourceKind::Cluster,
        ResourceKind::Machine,
        ResourceKind::MachineSet,
        ResourceKind::MachineDeployment,
        ResourceKind::Metal3Machine,
        ResourceKind::Metal3Cluster,
        ResourceKind::BareMetalHost,
        ResourceKind::KubeadmControlPlane,
        ResourceKind::KubeadmConfig,
    ];

    /// The Kubernetes `kind` string, as it appears in owner references.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Cluster => "Cluster",
            ResourceKind::Machine => "Machine",
            ResourceKind::MachineSet => "MachineSet",
            ResourceKind::MachineDeployment => "MachineDeployment",
            ResourceKind::Metal3Machine => "Metal3Machine",
            ResourceKind::Metal3Cluster => "Metal3Cluster",
            ResourceKind::BareMetalHost => "BareMetalHost",
            ResourceKind::KubeadmControlPlane => "KubeadmControlPlane",
            ResourceKind::KubeadmConfig => "KubeadmConfig",
        }
    }

    pub fn from_kind_str(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == kind)
    }

    pub fn api_group(self) -> &'static str {
        match self {
            ResourceKind::Cluster
            | ResourceKind::Machine
            | ResourceKind::MachineSet
            | ResourceKind::MachineDeployment => "cluster.x-k8s.io",
            ResourceKind::Metal3Machine | ResourceKind::Metal3Cluster => {
                "infrastructure.cluster.x-k8s.io"
            }
            ResourceKind::BareMetalHost => "metal3.io",
            ResourceKind::KubeadmControlPlane => "controlplane.cluster.x-k8s.io",
            ResourceKind::KubeadmConfig => "bootstrap.cluster.x-k8s.io",
        }
    }

    pub fn api_version(self) -> &'static str {
        match self {
            ResourceKind::BareMetalHost => "v1alpha1",
            _ => "v1beta1",
        }
    }

    /// Lower-case plural used in REST paths (`/apis/<group>/<version>/<plural>`).
    pub fn plural(self) -> &'static str {
        match self {
            ResourceKind::Cluster => "clusters",
            ResourceKind::Machine => "machines",
            ResourceKind::MachineSet => "machinesets",
            ResourceKind::MachineDeployment => "machinedeployments",
            ResourceKind::Metal3Machine => "metal3machines",
            ResourceKind::Metal3Cluster => "metal3clusters",
            ResourceKind::BareMetalHost => "baremetalhosts",
            ResourceKind::KubeadmControlPlane => "kubeadmcontrolplanes",
            ResourceKind::KubeadmConfig => "kubeadmconfigs",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tri-state value of a condition's `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionState {
    True,
    False,
    Unknown,
}

impl ConditionState {
    /// Anything other than the literal `True`/`False` strings reads as `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "True" => ConditionState::True,
            "False" => ConditionState::False,
            _ => ConditionState::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConditionState::True => "True",
            ConditionState::False => "False",
            ConditionState::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(rename = "status")]
    pub state: ConditionState,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,
}

impl Condition {
    pub fn new(type_: impl Into<String>, state: ConditionState) -> Self {
        Self {
            type_: type_.into(),
            state,
            reason: String::new(),
            message: String::new(),
            last_transition_time: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// Identity of a record: `(kind, namespace, name)` is unique within one discovery run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub name: String,
    pub namespace: String,
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

/// One discovered object, normalized for analysis.
///
/// Parent/child relations are not stored here; they live in
/// [`DependencyGraph`](crate::graph::DependencyGraph), keyed by the record's
/// position in the input slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    pub kind: ResourceKind,
    pub name: String,
    pub namespace: String,
    /// In the order the source reported them.
    pub conditions: Vec<Condition>,
    /// Computed once from `conditions` when the record is built.
    pub status: ComponentStatus,
    /// The object's `spec`, only probed for reference fields.
    pub raw_spec: Value,
    /// The object's `metadata` (owner references, labels).
    pub raw_metadata: Value,
}

impl ResourceRecord {
    pub fn new(
        kind: ResourceKind,
        name: impl Into<String>,
        namespace: impl Into<String>,
        conditions: Vec<Condition>,
        raw_spec: Value,
        raw_metadata: Value,
    ) -> Self {
        let status = derive_status(&conditions);
        Self {
            kind,
            name: name.into(),
            namespace: namespace.into(),
            conditions,
            status,
            raw_spec,
            raw_metadata,
        }
    }

    pub fn identity(&self) -> ResourceRef {
        ResourceRef {
            kind: self.kind,
            name: self.name.clone(),
            namespace: self.namespace.clone(),
        }
    }

    pub fn false_conditions(&self) -> impl Iterator<Item = &Condition> {
        self.conditions
            .iter()
            .filter(|c| c.state == ConditionState::False)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_strings_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_kind_str(kind.as_str()), Some(kind));
        }
        assert_eq!(ResourceKind::from_kind_str("Pod"), None);
    }

    #[test]
    fn unknown_state_strings_parse_as_unknown() {
        assert_eq!(ConditionState::parse("True"), ConditionState::True);
        assert_eq!(ConditionState::parse("False"), ConditionState::False);
        assert_eq!(ConditionState::parse("true"), ConditionState::Unknown);
        assert_eq!(ConditionState::parse(""), ConditionState::Unknown);
    }

    #[test]
    fn record_status_is_derived_on_construction() {
        let record = ResourceRecord::new(
            ResourceKind::Machine,
            "m-0",
            "capi",
            vec![Condition::new("Ready", ConditionState::False)],
            json!({}),
            json!({}),
        );
        assert_eq!(record.status, ComponentStatus::Failed);
        assert_eq!(record.false_conditions().count(), 1);
    }

    #[test]
    fn condition_serializes_with_kubernetes_field_names() {
        let value = serde_json::to_value(
            Condition::new("Ready", ConditionState::True).with_reason("AsExpected"),
        )
        .unwrap();
        assert_eq!(value["type"], "Ready");
        assert_eq!(value["status"], "True");
        assert_eq!(value["reason"], "AsExpected");
        assert!(value.get("lastTransitionTime").is_none());
    }
}
