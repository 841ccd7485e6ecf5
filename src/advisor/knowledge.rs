//! Static diagnostic rules keyed by `(kind, condition type)` for conditions
//! reported as `False`.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::models::{ResourceKind, Severity};

#[derive(Debug)]
pub struct KnowledgeEntry {
    pub kind: ResourceKind,
    pub condition_type: &'static str,
    pub description: &'static str,
    pub severity: Severity,
    pub cause: &'static str,
    /// Numbered steps; `<name>` and `<namespace>` are filled in per record.
    pub resolution: &'static str,
    /// Kinds worth checking next when this rule fires.
    pub dependencies: &'static [ResourceKind],
}

use ResourceKind::*;

static ENTRIES: &[KnowledgeEntry] = &[
    KnowledgeEntry {
        kind: Cluster,
        condition_type: "Ready",
        description: "Cluster Ready is False",
        severity: Severity::Critical,
        cause: "Infrastructure or control plane is not ready",
        resolution: "1. Check that the InfrastructureReady condition is True\n\
                     2. Check that the ControlPlaneReady condition is True\n\
                     3. Inspect the Metal3Cluster and KubeadmControlPlane resources\n\
                     4. Review cluster events: kubectl describe cluster <name> -n <namespace>",
        dependencies: &[Metal3Cluster, KubeadmControlPlane],
    },
    KnowledgeEntry {
        kind: Cluster,
        condition_type: "InfrastructureReady",
        description: "Cluster InfrastructureReady is False",
        severity: Severity::Critical,
        cause: "Infrastructure provider is not ready",
        resolution: "1. Inspect the Metal3Cluster: kubectl describe metal3cluster -n <namespace>\n\
                     2. Verify the network configuration in the Metal3Cluster spec\n\
                     3. Check the infrastructure provider controller logs\n\
                     4. Ensure the provisioning and external networks are configured",
        dependencies: &[Metal3Cluster],
    },
    KnowledgeEntry {
        kind: Cluster,
        condition_type: "ControlPlaneReady",
        description: "Cluster ControlPlaneReady is False",
        severity: Severity::Critical,
        cause: "Control plane nodes are not ready",
        resolution: "1. Check the control plane: kubectl describe kcp -n <namespace>\n\
                     2. Verify the control plane replicas are scheduled\n\
                     3. Check the status of the control plane Machines\n\
                     4. Review etcd pod logs if the workload cluster is partially up\n\
                     5. Compare ready control plane nodes against the desired replicas",
        dependencies: &[KubeadmControlPlane, Machine],
    },
    KnowledgeEntry {
        kind: Machine,
        condition_type: "Ready",
        description: "Machine Ready is False",
        severity: Severity::Critical,
        cause: "Machine infrastructure or bootstrap is not ready",
        resolution: "1. Check the Machine: kubectl describe machine <name> -n <namespace>\n\
                     2. Verify the InfrastructureReady condition\n\
                     3. Verify the BootstrapReady condition\n\
                     4. Review the Metal3Machine and KubeadmConfig resources\n\
                     5. Check the node status if the machine is partially provisioned",
        dependencies: &[Metal3Machine, KubeadmConfig],
    },
    KnowledgeEntry {
        kind: Machine,
        condition_type: "InfrastructureReady",
        description: "Machine InfrastructureReady is False",
        severity: Severity::Critical,
        cause: "Metal3Machine is not ready",
        resolution: "1. Check the Metal3Machine: kubectl describe metal3machine -n <namespace>\n\
                     2. Verify the BareMetalHost association and its status\n\
                     3. Check that the BareMetalHost is in the 'provisioned' state\n\
                     4. Review BMC credentials and connectivity\n\
                     5. Check the baremetal-operator logs for provisioning errors",
        dependencies: &[Metal3Machine, BareMetalHost],
    },
    KnowledgeEntry {
        kind: Machine,
        condition_type: "BootstrapReady",
        description: "Machine BootstrapReady is False",
        severity: Severity::Critical,
        cause: "Bootstrap configuration is not ready",
        resolution: "1. Check the KubeadmConfig: kubectl describe kubeadmconfig -n <namespace>\n\
                     2. For control plane machines: verify the API server is reachable\n\
                     3. For workers: ensure the control plane is ready\n\
                     4. Check cluster connectivity and certificates\n\
                     5. Review the bootstrap provider controller logs",
        dependencies: &[KubeadmConfig],
    },
    KnowledgeEntry {
        kind: Metal3Machine,
        condition_type: "Ready",
        description: "Metal3Machine Ready is False",
        severity: Severity::Critical,
        cause: "BareMetalHost is not available or not provisioned",
        resolution: "1. Check the Metal3Machine: kubectl describe metal3machine <name> -n <namespace>\n\
                     2. Verify the BareMetalHost binding and status\n\
                     3. Check the BareMetalHost state (should be 'provisioned')\n\
                     4. Test BMC connectivity: ipmitool -H <bmc-ip> -U <user> -P <pass> power status\n\
                     5. Ensure the image URL is accessible\n\
                     6. Check the baremetal-operator controller logs",
        dependencies: &[BareMetalHost],
    },
    KnowledgeEntry {
        kind: Metal3Machine,
        condition_type: "AssociationReady",
        description: "Metal3Machine AssociationReady is False",
        severity: Severity::Warning,
        cause: "Unable to associate with a BareMetalHost",
        resolution: "1. Check the hostSelector labels in the Metal3Machine spec\n\
                     2. List available hosts: kubectl get bmh -n <namespace>\n\
                     3. Verify the BareMetalHost labels match the hostSelector\n\
                     4. Ensure the host is not already claimed by another machine\n\
                     5. Check that enough hosts are available for provisioning",
        dependencies: &[BareMetalHost],
    },
    KnowledgeEntry {
        kind: BareMetalHost,
        condition_type: "Ready",
        description: "BareMetalHost Ready is False",
        severity: Severity::Critical,
        cause: "Hardware is not available or provisioning failed",
        resolution: "1. Check the host: kubectl describe bmh <name> -n <namespace>\n\
                     2. Test BMC connectivity from the baremetal-operator pod\n\
                     3. Verify the BMC credentials secret\n\
                     4. Check the provisioning state and error message\n\
                     5. Ensure the provisioning image is accessible\n\
                     6. Review hardware compatibility and RAID configuration\n\
                     7. Check the Ironic logs for detailed provisioning errors",
        dependencies: &[],
    },
    KnowledgeEntry {
        kind: BareMetalHost,
        condition_type: "Available",
        description: "BareMetalHost Available is False",
        severity: Severity::Warning,
        cause: "Host is not available for provisioning",
        resolution: "1. Check power state: kubectl get bmh <name> -n <namespace> -o jsonpath='{.status.poweredOn}'\n\
                     2. Test BMC reachability from the cluster network\n\
                     3. Verify the BMC credentials\n\
                     4. Check the hardware inspection status\n\
                     5. Review the operationalStatus and errorMessage fields\n\
                     6. Ensure the host is not in maintenance mode",
        dependencies: &[],
    },
    KnowledgeEntry {
        kind: BareMetalHost,
        condition_type: "Provisioned",
        description: "BareMetalHost Provisioned is False",
        severity: Severity::Critical,
        cause: "Provisioning failed or is still in progress",
        resolution: "1. Check provisioning state: kubectl get bmh <name> -n <namespace> -o jsonpath='{.status.provisioning.state}'\n\
                     2. Review the provisioning error message in status\n\
                     3. Verify the image URL is reachable from the provisioning network\n\
                     4. Check disk format and partitioning settings\n\
                     5. Ensure the target disk is large enough for the image\n\
                     6. Review the Ironic deployment and agent logs\n\
                     7. Check network connectivity during provisioning",
        dependencies: &[],
    },
    KnowledgeEntry {
        kind: KubeadmControlPlane,
        condition_type: "Ready",
        description: "KubeadmControlPlane Ready is False",
        severity: Severity::Critical,
        cause: "Control plane nodes are not ready",
        resolution: "1. Check the control plane: kubectl describe kcp <name> -n <namespace>\n\
                     2. List control plane machines: kubectl get machines -n <namespace> -l cluster.x-k8s.io/control-plane\n\
                     3. Check machine readiness and node status\n\
                     4. Compare desired and ready replicas\n\
                     5. Review etcd health if the workload cluster is reachable\n\
                     6. Check the control plane provider controller logs\n\
                     7. Ensure the kubeconfig secret exists for the workload cluster",
        dependencies: &[Machine],
    },
    KnowledgeEntry {
        kind: KubeadmControlPlane,
        condition_type: "Initialized",
        description: "KubeadmControlPlane Initialized is False",
        severity: Severity::Critical,
        cause: "Control plane initialization failed",
        resolution: "1. Check the status of the first control plane machine\n\
                     2. Review the kubeadm init logs on the first control plane node\n\
                     3. Verify the bootstrap configuration in the KubeadmControlPlane spec\n\
                     4. Check that certificates were generated\n\
                     5. Ensure the control plane endpoint is configured\n\
                     6. Review cloud-init logs on the control plane node\n\
                     7. Verify network connectivity for the API server",
        dependencies: &[Machine],
    },
    KnowledgeEntry {
        kind: KubeadmControlPlane,
        condition_type: "CertificatesAvailable",
        description: "KubeadmControlPlane CertificatesAvailable is False",
        severity: Severity::Critical,
        cause: "Control plane certificates are not available",
        resolution: "1. Check that the cluster certificate secrets exist in <namespace>\n\
                     2. Verify certificate generation on the first control plane node\n\
                     3. Review the kubeadm certificate command output\n\
                     4. Check the bootstrap provider logs for errors\n\
                     5. Ensure the control plane has completed initialization",
        dependencies: &[Machine],
    },
    KnowledgeEntry {
        kind: KubeadmConfig,
        condition_type: "Ready",
        description: "KubeadmConfig Ready is False",
        severity: Severity::Warning,
        cause: "Bootstrap configuration is not ready",
        resolution: "1. Check the config: kubectl describe kubeadmconfig <name> -n <namespace>\n\
                     2. Verify the bootstrap data secret was created\n\
                     3. For workers: ensure the control plane is ready and reachable\n\
                     4. Check cluster connectivity and certificate validity\n\
                     5. Review the bootstrap provider controller logs\n\
                     6. Verify the join configuration",
        dependencies: &[],
    },
    KnowledgeEntry {
        kind: KubeadmConfig,
        condition_type: "DataSecretAvailable",
        description: "KubeadmConfig DataSecretAvailable is False",
        severity: Severity::Warning,
        cause: "Bootstrap data secret has not been generated",
        resolution: "1. Check whether the bootstrap data secret exists in <namespace>\n\
                     2. Verify the KubeadmConfig reconciliation status\n\
                     3. Ensure the control plane is reachable for worker nodes\n\
                     4. Review the bootstrap provider controller logs\n\
                     5. Check the KubeadmConfig status for errors",
        dependencies: &[],
    },
];

/// Read-only rule table, built once per process.
#[derive(Debug)]
pub struct KnowledgeBase {
    rules: HashMap<ResourceKind, HashMap<&'static str, &'static KnowledgeEntry>>,
}

impl KnowledgeBase {
    pub fn global() -> &'static KnowledgeBase {
        static KNOWLEDGE: OnceLock<KnowledgeBase> = OnceLock::new();
        KNOWLEDGE.get_or_init(|| Self::from_entries(ENTRIES))
    }

    fn from_entries(entries: &'static [KnowledgeEntry]) -> Self {
        let mut rules: HashMap<ResourceKind, HashMap<&'static str, &'static KnowledgeEntry>> =
            HashMap::new();
        for entry in entries {
            rules
                .entry(entry.kind)
                .or_default()
                .insert(entry.condition_type, entry);
        }
        Self { rules }
    }

    /// The rule for a `False` condition of `condition_type` on a record of `kind`.
    pub fn lookup(&self, kind: ResourceKind, condition_type: &str) -> Option<&'static KnowledgeEntry> {
        self.rules.get(&kind)?.get(condition_type).copied()
    }

    pub fn len(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
