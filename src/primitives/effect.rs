// ============================================================================
// spark-panel - Effect System
// Callbacks that re-run whenever an observable they read changes
// ============================================================================
//
// Every run of an effect happens inside an ActiveEffectScope for that same
// effect, so each run subscribes to whatever it reads. Subscription is
// idempotent, so a long-lived effect simply re-subscribes to the same nodes.
//
// An effect remembers (weakly) every Dep it subscribed to. dispose() walks
// that list and detaches from each one; this is the only way an effect stops.
// Dropping the handle does not stop it: a Dep holds its subscribers strongly.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::core::types::EffectId;
use crate::reactivity::dep::DepInner;
use crate::reactivity::tracking::ActiveEffectScope;

// =============================================================================
// TYPE ALIASES
// =============================================================================

/// Effect body
pub type EffectFn = Box<dyn FnMut()>;

// =============================================================================
// EFFECT INNER
// =============================================================================

/// The inner effect implementation, shared between the handle and every
/// Dep the effect is subscribed to.
pub struct EffectInner {
    id: EffectId,

    /// The body; taken out while running
    func: RefCell<Option<EffectFn>>,

    /// Nodes this effect subscribed to
    deps: RefCell<Vec<Weak<DepInner>>>,

    /// Marks a cached value stale; notified ahead of ordinary effects
    invalidator: bool,

    disposed: Cell<bool>,
    running: Cell<bool>,
    runs: Cell<u64>,
}

impl EffectInner {
    /// Create an effect that has not run yet.
    pub fn new(func: EffectFn) -> Rc<Self> {
        Self::build(func, false)
    }

    /// Create an invalidator: an effect that only marks derived state stale.
    pub(crate) fn new_invalidator(func: EffectFn) -> Rc<Self> {
        Self::build(func, true)
    }

    fn build(func: EffectFn, invalidator: bool) -> Rc<Self> {
        Rc::new(Self {
            id: EffectId::next(),
            func: RefCell::new(Some(func)),
            deps: RefCell::new(Vec::new()),
            invalidator,
            disposed: Cell::new(false),
            running: Cell::new(false),
            runs: Cell::new(0),
        })
    }

    pub fn id(&self) -> EffectId {
        self.id
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    pub fn is_invalidator(&self) -> bool {
        self.invalidator
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// How many times the body has been entered.
    pub fn run_count(&self) -> u64 {
        self.runs.get()
    }

    /// Number of live nodes this effect is subscribed to.
    pub fn dep_count(&self) -> usize {
        self.deps
            .borrow()
            .iter()
            .filter(|dep| dep.strong_count() > 0)
            .count()
    }

    /// Remember a node this effect subscribed to.
    pub(crate) fn record_dep(&self, dep: &Rc<DepInner>) {
        let mut deps = self.deps.borrow_mut();
        deps.retain(|d| d.strong_count() > 0);
        let target = Rc::as_ptr(dep);
        if !deps.iter().any(|d| std::ptr::eq(d.as_ptr(), target)) {
            deps.push(Rc::downgrade(dep));
        }
    }

    /// Detach from every recorded node and drop the body.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }

        // Collect first: unsubscribing must not overlap the deps borrow
        let deps: Vec<Rc<DepInner>> = self
            .deps
            .borrow_mut()
            .drain(..)
            .filter_map(|d| d.upgrade())
            .collect();
        for dep in deps {
            dep.unsubscribe(self.id);
        }

        let func = self.func.borrow_mut().take();
        drop(func);
        tracing::debug!(effect = %self.id, "effect disposed");
    }
}

impl std::fmt::Debug for EffectInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectInner")
            .field("id", &self.id)
            .field("deps", &self.dep_count())
            .field("disposed", &self.is_disposed())
            .field("runs", &self.run_count())
            .finish()
    }
}

// =============================================================================
// RUN EFFECT
// =============================================================================

/// Restores the body and the running flag when a run ends, even on panic.
struct RunGuard<'a> {
    effect: &'a Rc<EffectInner>,
    func: Option<EffectFn>,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.effect.running.set(false);
        if !self.effect.is_disposed() {
            *self.effect.func.borrow_mut() = self.func.take();
        }
    }
}

/// Run an effect's body synchronously with the effect as the active one.
///
/// Disposed effects are skipped. A run requested while the same effect is
/// already running is skipped as well.
pub fn run_effect(effect: &Rc<EffectInner>) {
    if effect.is_disposed() {
        return;
    }
    if effect.is_running() {
        tracing::debug!(effect = %effect.id, "skipping re-entrant effect run");
        return;
    }

    let Some(func) = effect.func.borrow_mut().take() else {
        return;
    };

    effect.running.set(true);
    effect.runs.set(effect.runs.get() + 1);

    let mut guard = RunGuard {
        effect,
        func: Some(func),
    };
    let _scope = ActiveEffectScope::enter(effect.clone());
    if let Some(body) = guard.func.as_mut() {
        body();
    }
}

// =============================================================================
// EFFECT - The public handle
// =============================================================================

/// Handle to a running effect.
#[derive(Clone)]
pub struct Effect {
    inner: Rc<EffectInner>,
}

impl Effect {
    pub fn id(&self) -> EffectId {
        self.inner.id
    }

    /// Run the body again now.
    pub fn run(&self) {
        run_effect(&self.inner);
    }

    /// Stop the effect and unsubscribe it from every node it read.
    pub fn dispose(&self) {
        self.inner.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }

    pub fn dep_count(&self) -> usize {
        self.inner.dep_count()
    }

    pub fn run_count(&self) -> u64 {
        self.inner.run_count()
    }

    /// Access the inner effect (for advanced use).
    pub fn inner(&self) -> &Rc<EffectInner> {
        &self.inner
    }
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

// =============================================================================
// WATCH EFFECT
// =============================================================================

/// Run `f` now, and again every time an observable it read changes.
///
/// # Example
///
/// ```
/// use spark_panel::{observable, watch_effect};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let level = observable(10);
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let _effect = watch_effect({
///     let level = level.clone();
///     let seen = seen.clone();
///     move || seen.borrow_mut().push(level.get())
/// });
///
/// level.set(20);
/// level.set(20); // unchanged, no re-run
/// assert_eq!(*seen.borrow(), vec![10, 20]);
/// ```
pub fn watch_effect<F>(f: F) -> Effect
where
    F: FnMut() + 'static,
{
    let inner = EffectInner::new(Box::new(f));
    run_effect(&inner);
    Effect { inner }
}

// =============================================================================
// TESTS
// =============================================================================
