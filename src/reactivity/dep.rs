// ============================================================================
// spark-panel - Dependency Node
// Records which effects depend on one observable slot and re-runs them
// ============================================================================
//
// One Dep exists per observable slot: one per Ref, one per proxied object
// key (created lazily on first read), one per Computed. Reads call depend(),
// writes call notify().
//
// Borrow safety: notify() snapshots the subscriber list and releases the
// borrow before running anything, because a running subscriber re-reads the
// slot and re-subscribes to this same Dep.
//
// Ordering: invalidators (the internal effects of memoized computeds) run
// before ordinary effects, so no effect reads a cached value this very
// notification has made stale.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::core::context::with_context;
use crate::core::types::EffectId;
use crate::primitives::effect::{run_effect, EffectInner};

// =============================================================================
// DEP INNER
// =============================================================================

/// Shared state of a Dependency Node.
///
/// Subscribers are keyed by effect identity and iterate in subscription
/// order. A subscriber appears at most once.
#[derive(Default)]
pub struct DepInner {
    subscribers: RefCell<IndexMap<EffectId, Rc<EffectInner>>>,
}

impl DepInner {
    /// Remove one subscriber, keeping the order of the rest.
    pub(crate) fn unsubscribe(&self, id: EffectId) -> bool {
        self.subscribers.borrow_mut().shift_remove(&id).is_some()
    }

    fn subscribe(&self, effect: &Rc<EffectInner>) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        if subscribers.contains_key(&effect.id()) {
            return false;
        }
        subscribers.insert(effect.id(), effect.clone());
        true
    }

    /// Drop disposed subscribers, then clone out the live ones.
    fn live_subscribers(&self) -> Vec<Rc<EffectInner>> {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|_, effect| !effect.is_disposed());
        subscribers.values().cloned().collect()
    }
}

// =============================================================================
// DEP - The public handle
// =============================================================================

/// A Dependency Node.
///
/// # Example
///
/// ```
/// use spark_panel::{watch_effect, Dep};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let dep = Dep::new();
/// let runs = Rc::new(Cell::new(0));
///
/// let _effect = watch_effect({
///     let dep = dep.clone();
///     let runs = runs.clone();
///     move || {
///         dep.depend();
///         runs.set(runs.get() + 1);
///     }
/// });
/// assert_eq!(runs.get(), 1);
///
/// dep.notify();
/// assert_eq!(runs.get(), 2);
/// ```
#[derive(Clone, Default)]
pub struct Dep {
    inner: Rc<DepInner>,
}

impl Dep {
    /// Create a node with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe the active effect, if there is one and tracking is on.
    pub fn depend(&self) {
        let active = with_context(|ctx| {
            if ctx.is_untracking() {
                None
            } else {
                ctx.active_effect()
            }
        });

        let Some(effect) = active else {
            return;
        };
        if effect.is_disposed() {
            return;
        }
        if self.inner.subscribe(&effect) {
            effect.record_dep(&self.inner);
        }
    }

    /// Run every subscriber synchronously: invalidators first, then the
    /// ordinary effects in subscription order.
    ///
    /// An effect that already re-ran during this notification (reached
    /// through an invalidator, say) is not run a second time. Re-entrant
    /// notification of the same node is not guarded.
    pub fn notify(&self) {
        let (invalidators, effects): (Vec<_>, Vec<_>) = self
            .inner
            .live_subscribers()
            .into_iter()
            .partition(|effect| effect.is_invalidator());

        let pending: Vec<(Rc<EffectInner>, u64)> = effects
            .into_iter()
            .map(|effect| {
                let runs = effect.run_count();
                (effect, runs)
            })
            .collect();

        for invalidator in &invalidators {
            run_effect(invalidator);
        }
        for (effect, runs) in &pending {
            if effect.run_count() == *runs {
                run_effect(effect);
            }
        }
    }

    /// Number of subscribed effects (disposed ones included until the next
    /// notification prunes them).
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Whether the given effect is subscribed.
    pub fn is_subscribed(&self, id: EffectId) -> bool {
        self.inner.subscribers.borrow().contains_key(&id)
    }

    /// Remove one subscriber. Returns false if it was not subscribed.
    pub fn unsubscribe(&self, id: EffectId) -> bool {
        self.inner.unsubscribe(id)
    }

    /// Whether two handles point at the same node.
    pub fn ptr_eq(&self, other: &Dep) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Dep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dep")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
