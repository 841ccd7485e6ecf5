//! Dependency graph over discovered records: ownership and reference edges,
//! arranged as a forest.

mod builder;
pub mod refs;
pub mod render;

pub use builder::DependencyGraph;
pub use render::render_forest;
