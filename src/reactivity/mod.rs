// ============================================================================
// spark-panel - Reactivity Module
// Dependency Nodes and the scoping of effect runs
// ============================================================================

pub mod dep;
pub mod tracking;

pub use dep::{Dep, DepInner};
pub use tracking::{untrack, ActiveEffectScope};
