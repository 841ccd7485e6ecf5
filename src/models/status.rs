use std::fmt;

use serde::{Deserialize, Serialize};

use super::k8s::{Condition, ConditionState};

/// Coarse health classification of a record, and of the whole analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Failed,
    Pending,
    Unknown,
}

impl ComponentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentStatus::Healthy => "Healthy",
            ComponentStatus::Degraded => "Degraded",
            ComponentStatus::Failed => "Failed",
            ComponentStatus::Pending => "Pending",
            ComponentStatus::Unknown => "Unknown",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ComponentStatus::Healthy => "✅",
            ComponentStatus::Degraded => "⚠️",
            ComponentStatus::Failed => "❌",
            ComponentStatus::Pending => "⏳",
            ComponentStatus::Unknown => "❓",
        }
    }
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const VERDICT_TYPES: [&str; 2] = ["Ready", "Available"];
const PREREQUISITE_TYPES: [&str; 3] = ["InfrastructureReady", "BootstrapReady", "ControlPlaneReady"];

/// Derives a record's status from its conditions.
///
/// Precedence, highest first:
/// 1. no conditions: `Unknown`
/// 2. the first `Ready`/`Available` condition that is `True` or `False` decides
///    (`Healthy` or `Failed`), whatever else is reported
/// 3. a `False` prerequisite (`InfrastructureReady`, `BootstrapReady`,
///    `ControlPlaneReady`): `Degraded`
/// 4. any other `False`: `Degraded`
/// 5. any `Unknown`: `Pending`
/// 6. otherwise `Healthy`
pub fn derive_status(conditions: &[Condition]) -> ComponentStatus {
    if conditions.is_empty() {
        return ComponentStatus::Unknown;
    }

    let verdict = conditions
        .iter()
        .filter(|c| VERDICT_TYPES.contains(&c.type_.as_str()))
        .find_map(|c| match c.state {
            ConditionState::False => Some(ComponentStatus::Failed),
            ConditionState::True => Some(ComponentStatus::Healthy),
            ConditionState::Unknown => None,
        });
    if let Some(status) = verdict {
        return status;
    }

    let failing_prerequisite = conditions.iter().any(|c| {
        c.state == ConditionState::False && PREREQUISITE_TYPES.contains(&c.type_.as_str())
    });
    if failing_prerequisite {
        return ComponentStatus::Degraded;
    }

    if conditions.iter().any(|c| c.state == ConditionState::False) {
        return ComponentStatus::Degraded;
    }
    if conditions.iter().any(|c| c.state == ConditionState::Unknown) {
        return ComponentStatus::Pending;
    }
    ComponentStatus::Healthy
}
