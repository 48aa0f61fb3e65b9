// ============================================================================
// spark-panel - Core Module
// Identifiers and thread-local context for the reactive system
// ============================================================================

pub mod context;
pub mod types;

pub use context::{is_tracking, is_untracking, with_context, ReactiveContext};
pub use types::{AsAny, EffectId, ProxyId};
