// ============================================================================
// spark-panel - Computed Values
// Values derived from other observables, with a selectable cache policy
// ============================================================================
//
// Two policies:
//
// - Recompute (default): every read marks the value dirty and evaluates,
//   so the compute function runs on every read and no caching happens.
//   The function runs under whatever effect is active, which therefore
//   subscribes directly to the observables it reads.
//
// - Memoize: the compute function runs under an internal invalidator
//   effect. Only a notification from one of its dependencies marks the
//   value dirty; reads in between return the cached value. The computed has
//   its own Dep so effects reading it re-run when it is invalidated.
//   Invalidators are notified ahead of ordinary effects, so an effect that
//   reads both a source and the computed never sees the old cached value.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::primitives::effect::EffectInner;
use crate::reactivity::dep::Dep;
use crate::reactivity::tracking::ActiveEffectScope;

// =============================================================================
// CACHE POLICY
// =============================================================================

/// When a [`Computed`] re-evaluates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Evaluate on every read
    #[default]
    Recompute,
    /// Evaluate only after a dependency notified
    Memoize,
}

// =============================================================================
// COMPUTED INNER
// =============================================================================

struct ComputedInner<T> {
    compute: Box<dyn Fn() -> T>,
    value: RefCell<Option<T>>,
    dirty: Cell<bool>,
    policy: CachePolicy,

    /// Readers of a memoized computed subscribe here
    dep: Dep,

    /// Memoize only: subscribed to the compute function's dependencies
    invalidator: RefCell<Option<Rc<EffectInner>>>,
}

impl<T> ComputedInner<T> {
    fn evaluate(&self) -> T
    where
        T: Clone,
    {
        if !self.dirty.get() {
            if let Some(value) = self.value.borrow().as_ref() {
                return value.clone();
            }
        }

        let invalidator = self.invalidator.borrow().clone();
        let value = match invalidator {
            Some(invalidator) => {
                let _scope = ActiveEffectScope::enter(invalidator);
                (self.compute)()
            }
            None => (self.compute)(),
        };
        *self.value.borrow_mut() = Some(value.clone());
        self.dirty.set(false);
        value
    }
}

impl<T> Drop for ComputedInner<T> {
    fn drop(&mut self) {
        if let Some(invalidator) = self.invalidator.get_mut().take() {
            invalidator.dispose();
        }
    }
}

// =============================================================================
// COMPUTED<T> - The public handle
// =============================================================================

/// A value derived from other observables.
///
/// # Example
///
/// ```
/// use spark_panel::{computed, observable};
///
/// let level = observable(1);
/// let next = computed({
///     let level = level.clone();
///     move || level.get() + 1
/// });
///
/// assert_eq!(next.get(), 2);
/// level.set(5);
/// assert_eq!(next.get(), 6);
/// ```
pub struct Computed<T> {
    inner: Rc<ComputedInner<T>>,
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Computed<T>
where
    T: Clone + 'static,
{
    /// Create a computed with the given cache policy.
    pub fn with_policy<F>(compute: F, policy: CachePolicy) -> Self
    where
        F: Fn() -> T + 'static,
    {
        let inner = Rc::new(ComputedInner {
            compute: Box::new(compute),
            value: RefCell::new(None),
            dirty: Cell::new(true),
            policy,
            dep: Dep::new(),
            invalidator: RefCell::new(None),
        });

        if policy == CachePolicy::Memoize {
            let weak: Weak<ComputedInner<T>> = Rc::downgrade(&inner);
            let invalidator = EffectInner::new_invalidator(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.dirty.set(true);
                    inner.dep.notify();
                }
            }));
            *inner.invalidator.borrow_mut() = Some(invalidator);
        }

        Self { inner }
    }

    /// Read the value.
    pub fn get(&self) -> T {
        match self.inner.policy {
            CachePolicy::Recompute => {
                self.inner.dirty.set(true);
                self.inner.evaluate()
            }
            CachePolicy::Memoize => {
                self.inner.dep.depend();
                self.inner.evaluate()
            }
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.inner.policy
    }

    /// Whether the next read will evaluate.
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.get()
    }

    /// The node readers of a memoized computed subscribe to.
    pub fn dep(&self) -> &Dep {
        &self.inner.dep
    }
}

impl<T> std::fmt::Debug for Computed<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Computed")
            .field("policy", &self.inner.policy)
            .field("dirty", &self.inner.dirty.get())
            .field("cached", &*self.inner.value.borrow())
            .finish()
    }
}

// =============================================================================
// CREATION FUNCTIONS
// =============================================================================

/// Create a computed that evaluates on every read.
pub fn computed<T, F>(compute: F) -> Computed<T>
where
    T: Clone + 'static,
    F: Fn() -> T + 'static,
{
    Computed::with_policy(compute, CachePolicy::Recompute)
}

/// Create a computed that caches until a dependency notifies.
///
/// ```
/// use spark_panel::{computed_memo, observable};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let level = observable(1);
/// let evaluations = Rc::new(Cell::new(0));
/// let doubled = computed_memo({
///     let level = level.clone();
///     let evaluations = evaluations.clone();
///     move || {
///         evaluations.set(evaluations.get() + 1);
///         level.get() * 2
///     }
/// });
///
/// assert_eq!(doubled.get(), 2);
/// assert_eq!(doubled.get(), 2);
/// assert_eq!(evaluations.get(), 1);
///
/// level.set(4);
/// assert_eq!(doubled.get(), 8);
/// assert_eq!(evaluations.get(), 2);
/// ```
pub fn computed_memo<T, F>(compute: F) -> Computed<T>
where
    T: Clone + 'static,
    F: Fn() -> T + 'static,
{
    Computed::with_policy(compute, CachePolicy::Memoize)
}

// =============================================================================
// TESTS
// =============================================================================
