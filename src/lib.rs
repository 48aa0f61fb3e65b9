// ============================================================================
// spark-panel - Reactive components for the lighting controller panel
// ============================================================================
//
// A small dependency-tracking core (observable references, object proxies,
// computed values, effects) and a custom-element binding layer on top of it,
// plus the colour maths and device API the panel talks to.
// ============================================================================

pub mod api;
pub mod color;
pub mod component;
pub mod config;
pub mod core;
pub mod error;
pub mod macros;
pub mod primitives;
pub mod reactivity;

// Re-export core items at crate root for ergonomic access
pub use core::context::{is_tracking, is_untracking, with_context, ReactiveContext};
pub use core::types::{EffectId, ProxyId};

// Re-export primitives at crate root
pub use primitives::computed::{computed, computed_memo, CachePolicy, Computed};
pub use primitives::effect::{watch_effect, Effect, EffectFn, EffectInner};
pub use primitives::object::{Object, Value};
pub use primitives::reactive::{reactive, Property, Reactive};
pub use primitives::reference::{observable, Ref};

// Re-export reactivity functions
pub use reactivity::dep::Dep;
pub use reactivity::tracking::untrack;

// Components, configuration and errors
pub use component::{Component, ComponentElement, ComponentLibrary, Document, HostElement};
pub use config::PanelConfig;
pub use error::{ApiError, ConfigError, Error, RegistrationError, Result};

// =============================================================================
// TESTS
// =============================================================================
