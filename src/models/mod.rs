pub mod analysis;
pub mod k8s;
pub mod status;

pub use analysis::{AnalysisDocument, AnalysisResult, Issue, RecordId, Severity, Summary};
pub use k8s::{Condition, ConditionState, ResourceKind, ResourceRecord, ResourceRef};
pub use status::{derive_status, ComponentStatus};
