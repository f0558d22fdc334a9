//! Developer Tooling: scene inspector and consistency checks.
//!
//! # Invariants
//! - Tools are read-only; they never mutate scene state.

mod inspector;

pub use inspector::{Finding, ObjectInfo, SceneInspector, SceneSummary};

pub fn crate_info() -> &'static str {
    "glint-tools v0.1.0"
}
