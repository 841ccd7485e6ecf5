//! Condition advisory engine: matches failing conditions against the knowledge
//! base and rolls them up into a health verdict.

mod engine;
pub mod guidance;
pub mod knowledge;
pub mod report;

pub use engine::Advisor;
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use report::{doctor_report, generate_report};
