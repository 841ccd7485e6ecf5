use std::collections::HashMap;

use crate::models::{RecordId, ResourceKind, ResourceRecord};

use super::refs::{self, Relation};

/// Kinds whose relationship rules run, in evaluation order. A record keeps the
/// first parent it is given, so this order decides contested edges.
const RULE_ORDER: [ResourceKind; 6] = [
    ResourceKind::Machine,
    ResourceKind::MachineSet,
    ResourceKind::MachineDeployment,
    ResourceKind::Metal3Machine,
    ResourceKind::Cluster,
    ResourceKind::KubeadmControlPlane,
];

/// Parent/child edges between records, keyed by each record's position in the
/// slice the graph was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    parents: Vec<Option<RecordId>>,
    children: Vec<Vec<RecordId>>,
}

impl DependencyGraph {
    /// Infers ownership and reference edges among `records`.
    ///
    /// Never fails: missing or malformed reference fields just leave edges out.
    /// When two records share `(kind, namespace, name)` the later one wins; the
    /// shadowed record takes part in no edge and ends up as a root.
    pub fn build(records: &[ResourceRecord]) -> Self {
        let mut builder = Builder::new(records);
        for kind in RULE_ORDER {
            for id in 0..records.len() {
                if records[id].kind == kind && builder.is_indexed(id) {
                    builder.apply_rules(id);
                }
            }
        }

        let graph = builder.graph;
        log::debug!(
            "graph: {} record(s), {} edge(s), {} root(s)",
            records.len(),
            graph.edge_count(),
            graph.roots().len()
        );
        graph
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Records without a parent, in input order.
    pub fn roots(&self) -> Vec<RecordId> {
        (0..self.len()).filter(|&id| self.parents[id].is_none()).collect()
    }

    pub fn parent(&self, id: RecordId) -> Option<RecordId> {
        self.parents.get(id).copied().flatten()
    }

    /// Children in the order their edges were established.
    pub fn children(&self, id: RecordId) -> &[RecordId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Other children of this record's parent.
    pub fn siblings(&self, id: RecordId) -> impl Iterator<Item = RecordId> + '_ {
        self.parent(id)
            .map(|parent| self.children(parent))
            .unwrap_or(&[])
            .iter()
            .copied()
            .filter(move |&sibling| sibling != id)
    }

    /// Parent, grandparent, ... up to the root.
    pub fn ancestors(&self, id: RecordId) -> Vec<RecordId> {
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            if chain.contains(&ancestor) {
                break;
            }
            chain.push(ancestor);
            current = self.parent(ancestor);
        }
        chain
    }

    /// Every `(parent, child)` pair, ordered by parent then child order.
    pub fn edges(&self) -> Vec<(RecordId, RecordId)> {
        self.children
            .iter()
            .enumerate()
            .flat_map(|(parent, kids)| kids.iter().map(move |&child| (parent, child)))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.children.iter().map(Vec::len).sum()
    }

    fn with_capacity(len: usize) -> Self {
        Self {
            parents: vec![None; len],
            children: vec![Vec::new(); len],
        }
    }

    /// Adds `parent -> child` unless the child is already claimed or the edge
    /// would close a cycle. Returns whether the edge was added.
    ///
    /// The built-in rules link kinds in a fixed hierarchy and never close a
    /// cycle; the check keeps the forest invariant for any rule added later.
    fn link(&mut self, parent: RecordId, child: RecordId) -> bool {
        if self.parents[child].is_some() {
            return false;
        }
        if parent == child || self.ancestors(parent).contains(&child) {
            return false;
        }
        self.parents[child] = Some(parent);
        self.children[parent].push(child);
        true
    }
}

struct Builder<'a> {
    records: &'a [ResourceRecord],
    index: HashMap<(&'a str, &'a str, ResourceKind), RecordId>,
    graph: DependencyGraph,
}

impl<'a> Builder<'a> {
    fn new(records: &'a [ResourceRecord]) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for (id, record) in records.iter().enumerate() {
            let key = (record.name.as_str(), record.namespace.as_str(), record.kind);
            if let Some(shadowed) = index.insert(key, id) {
                log::warn!(
                    "graph: duplicate {}/{} in namespace {:?}, record #{shadowed} shadowed by #{id}",
                    record.kind,
                    record.name,
                    record.namespace
                );
            }
        }
        Self {
            records,
            index,
            graph: DependencyGraph::with_capacity(records.len()),
        }
    }

    fn find(&self, name: &'a str, namespace: &'a str, kind: ResourceKind) -> Option<RecordId> {
        self.index.get(&(name, namespace, kind)).copied()
    }

    /// Whether `id` is the record the index resolves its identity to.
    fn is_indexed(&self, id: RecordId) -> bool {
        let records = self.records;
        let record = &records[id];
        self.find(&record.name, &record.namespace, record.kind) == Some(id)
    }

    fn apply_rules(&mut self, id: RecordId) {
        match self.records[id].kind {
            ResourceKind::Machine | ResourceKind::Cluster => self.link_references(id),
            ResourceKind::MachineSet | ResourceKind::KubeadmControlPlane => {
                self.adopt_owned(id, ResourceKind::Machine)
            }
            ResourceKind::MachineDeployment => self.adopt_owned(id, ResourceKind::MachineSet),
            ResourceKind::Metal3Machine => self.link_host(id),
            _ => {}
        }
    }

    /// Follows the spec fields through which a record names its counterparts.
    fn link_references(&mut self, id: RecordId) {
        let records = self.records;
        let record = &records[id];
        for field in refs::reference_schema(record.kind) {
            let Some(name) = refs::probe_name(&record.raw_spec, field) else {
                continue;
            };
            let Some(target) = self.find(name, &record.namespace, field.target) else {
                log::debug!(
                    "graph: {}/{} references missing {} {name:?}",
                    record.kind,
                    record.name,
                    field.target
                );
                continue;
            };
            match field.relation {
                Relation::Parent => self.link(target, id),
                Relation::Child => self.link(id, target),
            }
        }
    }

    /// Claims every record of `child_kind` whose owner references name `owner`.
    /// Only name and kind are compared; namespaces are not.
    fn adopt_owned(&mut self, owner: RecordId, child_kind: ResourceKind) {
        let records = self.records;
        let owner_record = &records[owner];
        let owned: Vec<RecordId> = (0..records.len())
            .filter(|&candidate| {
                let record = &records[candidate];
                record.kind == child_kind
                    && self.is_indexed(candidate)
                    && refs::is_owned_by(record, &owner_record.name, owner_record.kind)
            })
            .collect();
        for child in owned {
            self.link(owner, child);
        }
    }

    /// Pairs a Metal3Machine with a BareMetalHost.
    ///
    /// Placeholder heuristic: the host selector is not evaluated; the first
    /// unclaimed host in the same namespace is taken.
    fn link_host(&mut self, machine: RecordId) {
        let records = self.records;
        let record = &records[machine];
        if !refs::has_host_selector(&record.raw_spec) {
            return;
        }
        let host = (0..records.len()).find(|&candidate| {
            let host = &records[candidate];
            host.kind == ResourceKind::BareMetalHost
                && host.namespace == record.namespace
                && self.is_indexed(candidate)
                && self.graph.parent(candidate).is_none()
        });
        if let Some(host) = host {
            self.link(machine, host);
        }
    }

    fn link(&mut self, parent: RecordId, child: RecordId) {
        if self.graph.link(parent, child) {
            log::debug!(
                "graph: {} -> {}",
                self.records[parent].identity(),
                self.records[child].identity()
            );
        }
    }
}
