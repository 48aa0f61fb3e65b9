// ============================================================================
// spark-panel - Reactive Context
// Thread-local state for tracking the currently running effect
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::primitives::effect::EffectInner;

// =============================================================================
// REACTIVE CONTEXT
// =============================================================================

/// Thread-local reactive context.
///
/// Holds the single active-effect slot. The slot is only ever written by
/// [`ActiveEffectScope`](crate::reactivity::tracking::ActiveEffectScope),
/// which restores the previous occupant when the run ends, so no effect can
/// observe itself as active outside its own call frame.
pub struct ReactiveContext {
    /// Effect whose body is currently executing
    active_effect: RefCell<Option<Rc<EffectInner>>>,

    /// Whether reads are currently untracked
    untracking: Cell<bool>,
}

impl ReactiveContext {
    /// Create a new, empty context
    pub fn new() -> Self {
        Self {
            active_effect: RefCell::new(None),
            untracking: Cell::new(false),
        }
    }

    /// Replace the active effect, returning the previous one
    pub fn set_active_effect(&self, effect: Option<Rc<EffectInner>>) -> Option<Rc<EffectInner>> {
        self.active_effect.replace(effect)
    }

    /// Get the active effect
    pub fn active_effect(&self) -> Option<Rc<EffectInner>> {
        self.active_effect.borrow().clone()
    }

    /// Check if an effect is running
    pub fn has_active_effect(&self) -> bool {
        self.active_effect.borrow().is_some()
    }

    /// Set untracking mode, returning the previous value
    pub fn set_untracking(&self, value: bool) -> bool {
        self.untracking.replace(value)
    }

    /// Check if currently untracking
    pub fn is_untracking(&self) -> bool {
        self.untracking.get()
    }
}

impl Default for ReactiveContext {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// THREAD-LOCAL ACCESS
// =============================================================================

thread_local! {
    static CONTEXT: ReactiveContext = ReactiveContext::new();
}

/// Access the thread-local reactive context.
pub fn with_context<R>(f: impl FnOnce(&ReactiveContext) -> R) -> R {
    CONTEXT.with(f)
}

/// Check if a read right now would register a dependency.
pub fn is_tracking() -> bool {
    with_context(|ctx| ctx.has_active_effect() && !ctx.is_untracking())
}

/// Check if currently untracking
pub fn is_untracking() -> bool {
    with_context(|ctx| ctx.is_untracking())
}

// =============================================================================
// TESTS
// =============================================================================
