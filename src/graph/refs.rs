//! Per-kind schema of the reference fields the graph builder probes.
//!
//! Every probe is optional: a missing or wrong-typed field yields `None` and
//! simply means "no edge".

use serde_json::Value;

use crate::models::{ResourceKind, ResourceRecord};

pub const CLUSTER_NAME_LABEL: &str = "cluster.x-k8s.io/cluster-name";

/// Which side of the edge the referenced record ends up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// The referenced record owns the probing record.
    Parent,
    /// The probing record owns the referenced record.
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// A plain string holding the referenced name.
    Name,
    /// An object reference carrying a `name` key.
    ObjectRef,
}

#[derive(Debug, Clone, Copy)]
pub struct ReferenceField {
    pub path: &'static [&'static str],
    pub shape: FieldShape,
    pub target: ResourceKind,
    pub relation: Relation,
}

const MACHINE_REFS: &[ReferenceField] = &[
    ReferenceField {
        path: &["clusterName"],
        shape: FieldShape::Name,
        target: ResourceKind::Cluster,
        relation: Relation::Parent,
    },
    ReferenceField {
        path: &["infrastructureRef"],
        shape: FieldShape::ObjectRef,
        target: ResourceKind::Metal3Machine,
        relation: Relation::Child,
    },
    ReferenceField {
        path: &["bootstrap", "configRef"],
        shape: FieldShape::ObjectRef,
        target: ResourceKind::KubeadmConfig,
        relation: Relation::Child,
    },
];

const CLUSTER_REFS: &[ReferenceField] = &[
    ReferenceField {
        path: &["infrastructureRef"],
        shape: FieldShape::ObjectRef,
        target: ResourceKind::Metal3Cluster,
        relation: Relation::Child,
    },
    ReferenceField {
        path: &["controlPlaneRef"],
        shape: FieldShape::ObjectRef,
        target: ResourceKind::KubeadmControlPlane,
        relation: Relation::Child,
    },
];

/// Spec fields through which a record of `kind` names related records.
pub fn reference_schema(kind: ResourceKind) -> &'static [ReferenceField] {
    match kind {
        ResourceKind::Machine => MACHINE_REFS,
        ResourceKind::Cluster => CLUSTER_REFS,
        _ => &[],
    }
}

/// Walks `path` through nested objects.
pub fn lookup<'a>(doc: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(doc, |node, key| node.as_object()?.get(*key))
}

pub fn lookup_str<'a>(doc: &'a Value, path: &[&str]) -> Option<&'a str> {
    lookup(doc, path)?.as_str()
}

/// Resolves the name a reference field points at, if present and well-typed.
pub fn probe_name<'a>(spec: &'a Value, field: &ReferenceField) -> Option<&'a str> {
    let node = lookup(spec, field.path)?;
    let name = match field.shape {
        FieldShape::Name => node.as_str(),
        FieldShape::ObjectRef => node.as_object()?.get("name")?.as_str(),
    }?;
    (!name.is_empty()).then_some(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerRef<'a> {
    pub kind: &'a str,
    pub name: &'a str,
}

/// Well-formed entries of `metadata.ownerReferences`; malformed ones are skipped.
pub fn owner_references(metadata: &Value) -> impl Iterator<Item = OwnerRef<'_>> {
    lookup(metadata, &["ownerReferences"])
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|entry| {
            let entry = entry.as_object()?;
            Some(OwnerRef {
                kind: entry.get("kind")?.as_str()?,
                name: entry.get("name")?.as_str()?,
            })
        })
}

pub fn is_owned_by(record: &ResourceRecord, owner_name: &str, owner_kind: ResourceKind) -> bool {
    owner_references(&record.raw_metadata)
        .any(|owner| owner.name == owner_name && owner.kind == owner_kind.as_str())
}

pub fn label<'a>(metadata: &'a Value, key: &str) -> Option<&'a str> {
    lookup(metadata, &["labels"])?.as_object()?.get(key)?.as_str()
}

/// Whether a Metal3Machine declares a `hostSelector` object.
pub fn has_host_selector(spec: &Value) -> bool {
    lookup(spec, &["hostSelector"]).is_some_and(Value::is_object)
}
