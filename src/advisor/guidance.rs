use crate::models::Condition;

/// A recognisable failure pattern in a condition's reason or message.
#[derive(Debug)]
pub struct GuidanceCategory {
    pub name: &'static str,
    /// Lower-case fragments looked for in the reason.
    pub reason_terms: &'static [&'static str],
    /// Lower-case fragments looked for in the message.
    pub message_terms: &'static [&'static str],
    pub guidance: &'static str,
}

impl GuidanceCategory {
    fn matches(&self, reason: &str, message: &str) -> bool {
        self.reason_terms.iter().any(|term| reason.contains(term))
            || self.message_terms.iter().any(|term| message.contains(term))
    }
}

/// Checked top to bottom; the first match is the only one applied.
pub static CATEGORIES: &[GuidanceCategory] = &[
    GuidanceCategory {
        name: "connectivity",
        reason_terms: &["bmc", "connection"],
        message_terms: &["ipmi", "bmc"],
        guidance: "- BMC connection issue detected. Verify:\n  \
                   * BMC IP address is reachable from the baremetal-operator pod\n  \
                   * BMC credentials are correct in the secret\n  \
                   * Firewall rules allow IPMI traffic (port 623)\n  \
                   * BMC firmware is up to date",
    },
    GuidanceCategory {
        name: "image",
        reason_terms: &["image"],
        message_terms: &["image", "download", "http"],
        guidance: "- Image access issue detected. Verify:\n  \
                   * Image URL is accessible from the provisioning network\n  \
                   * HTTP server hosting the image is running\n  \
                   * Image checksum matches if specified\n  \
                   * Target host has enough disk space",
    },
    GuidanceCategory {
        name: "network",
        reason_terms: &["timeout"],
        message_terms: &["timeout", "connection refused", "network"],
        guidance: "- Network connectivity issue detected. Verify:\n  \
                   * Network connectivity between components\n  \
                   * DNS resolution is working\n  \
                   * No firewall is blocking required ports\n  \
                   * No network policy restricts the traffic",
    },
    GuidanceCategory {
        name: "certificate",
        reason_terms: &["certificate"],
        message_terms: &["certificate", "tls", "x509"],
        guidance: "- Certificate issue detected. Verify:\n  \
                   * Certificates are not expired\n  \
                   * Certificate chain is complete\n  \
                   * CA bundle is correctly configured\n  \
                   * System time is synchronized (NTP)",
    },
    GuidanceCategory {
        name: "capacity",
        reason_terms: &["insufficient"],
        message_terms: &["insufficient", "no available", "quota"],
        guidance: "- Resource availability issue detected. Verify:\n  \
                   * Enough BareMetalHosts are available\n  \
                   * Hosts meet the required specifications\n  \
                   * No resource quota is exceeded\n  \
                   * Cluster capacity and node resources",
    },
    GuidanceCategory {
        name: "authorization",
        reason_terms: &["auth"],
        message_terms: &["auth", "permission", "forbidden"],
        guidance: "- Authentication/authorization issue detected. Verify:\n  \
                   * Service account has the required permissions\n  \
                   * RBAC roles and bindings are configured\n  \
                   * Secrets contain valid credentials\n  \
                   * API server is accessible",
    },
    GuidanceCategory {
        name: "dependency-wait",
        reason_terms: &["waiting", "pending"],
        message_terms: &["waiting"],
        guidance: "- Waiting for dependencies. Check:\n  \
                   * All prerequisite resources are ready\n  \
                   * Dependencies are not blocked\n  \
                   * The full component hierarchy (capi-advisor tree)\n  \
                   * No circular dependency exists",
    },
];

/// First category whose terms occur (case-insensitively) in the condition text.
pub fn classify(condition: &Condition) -> Option<&'static GuidanceCategory> {
    let reason = condition.reason.to_lowercase();
    let message = condition.message.to_lowercase();
    CATEGORIES
        .iter()
        .find(|category| category.matches(&reason, &message))
}
