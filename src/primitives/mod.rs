// ============================================================================
// spark-panel - Primitives Module
// Observable references, object proxies, computed values and effects
// ============================================================================

pub mod computed;
pub mod effect;
pub mod object;
pub mod reactive;
pub mod reference;

pub use computed::{computed, computed_memo, CachePolicy, Computed};
pub use effect::{run_effect, watch_effect, Effect, EffectFn, EffectInner};
pub use object::{Object, Value};
pub use reactive::{reactive, Property, Reactive};
pub use reference::{observable, Ref};
