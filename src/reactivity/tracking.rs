// ============================================================================
// spark-panel - Dependency Tracking Scope
// Scoping of the active-effect slot to exactly one effect run
// ============================================================================
//
// The slot is a thread-local, but it is never assigned directly: a run
// enters an ActiveEffectScope, and dropping the scope puts back whatever was
// there before. The slot therefore cannot leak past the frame that set it,
// including when the effect body panics.
// ============================================================================

use std::rc::Rc;

use crate::core::context::with_context;
use crate::primitives::effect::EffectInner;

// =============================================================================
// ACTIVE EFFECT SCOPE
// =============================================================================

/// Guard that makes an effect the active one for its lifetime.
///
/// Tracking is switched back on inside the scope, so an effect run that was
/// triggered from within [`untrack`] still records its own reads.
pub struct ActiveEffectScope {
    previous: Option<Rc<EffectInner>>,
    previous_untracking: bool,
}

impl ActiveEffectScope {
    /// Install `effect` in the active-effect slot.
    pub fn enter(effect: Rc<EffectInner>) -> Self {
        with_context(|ctx| Self {
            previous: ctx.set_active_effect(Some(effect)),
            previous_untracking: ctx.set_untracking(false),
        })
    }
}

impl Drop for ActiveEffectScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        let untracking = self.previous_untracking;
        with_context(|ctx| {
            ctx.set_active_effect(previous);
            ctx.set_untracking(untracking);
        });
    }
}

// =============================================================================
// UNTRACK
// =============================================================================

/// Run `f` without registering any dependency.
///
/// # Example
///
/// ```
/// use spark_panel::{observable, untrack, watch_effect};
///
/// let count = observable(1);
/// let _effect = watch_effect({
///     let count = count.clone();
///     move || {
///         let _ = untrack(|| count.get());
///     }
/// });
///
/// assert_eq!(count.dep().subscriber_count(), 0);
/// ```
pub fn untrack<T>(f: impl FnOnce() -> T) -> T {
    struct UntrackGuard(bool);

    impl Drop for UntrackGuard {
        fn drop(&mut self) {
            let previous = self.0;
            with_context(|ctx| ctx.set_untracking(previous));
        }
    }

    let _guard = UntrackGuard(with_context(|ctx| ctx.set_untracking(true)));
    f()
}

// =============================================================================
// TESTS
// =============================================================================
