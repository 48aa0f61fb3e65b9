// ============================================================================
// spark-panel - Observable Reference
// A single scalar value behind a tracked get / equality-gated set
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::reactivity::dep::Dep;

// =============================================================================
// REF INNER
// =============================================================================

struct RefInner<T> {
    value: RefCell<T>,
    dep: Dep,
}

// =============================================================================
// REF<T> - The public handle
// =============================================================================

/// An observable reference over one value.
///
/// Reads register the active effect; writes notify only when the new value
/// differs from the stored one.
///
/// # Example
///
/// ```
/// use spark_panel::observable;
///
/// let brightness = observable(128u8);
/// assert_eq!(brightness.get(), 128);
///
/// assert!(brightness.set(255));
/// assert!(!brightness.set(255)); // same value, no notification
/// ```
pub struct Ref<T> {
    inner: Rc<RefInner<T>>,
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Ref<T>
where
    T: PartialEq + 'static,
{
    /// Create a new reference holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefInner {
                value: RefCell::new(value),
                dep: Dep::new(),
            }),
        }
    }

    /// Get the current value (cloning), registering the active effect.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.dep.depend();
        self.inner.value.borrow().clone()
    }

    /// Access the current value with a closure, registering the active effect.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.dep.depend();
        f(&self.inner.value.borrow())
    }

    /// Get the current value without registering any dependency.
    pub fn peek(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.borrow().clone()
    }

    /// Store `value` and notify, unless it equals the current value.
    ///
    /// Returns true if the value changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value;
        }
        // Borrow released: subscribers read the new value
        self.inner.dep.notify();
        true
    }

    /// Mutate the value in place; notifies if the result differs.
    ///
    /// ```
    /// use spark_panel::observable;
    ///
    /// let count = observable(0);
    /// assert!(count.update(|n| *n += 1));
    /// assert!(!count.update(|n| *n += 0));
    /// assert_eq!(count.get(), 1);
    /// ```
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool
    where
        T: Clone,
    {
        let mut next = self.peek();
        f(&mut next);
        self.set(next)
    }

    /// The Dependency Node behind this reference.
    pub fn dep(&self) -> &Dep {
        &self.inner.dep
    }
}

impl<T> std::fmt::Debug for Ref<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ref")
            .field("value", &*self.inner.value.borrow())
            .finish()
    }
}

// =============================================================================
// CREATION FUNCTION
// =============================================================================

/// Create an observable reference.
pub fn observable<T>(value: T) -> Ref<T>
where
    T: PartialEq + std::fmt::Debug + 'static,
{
    tracing::trace!(initial = ?value, "creating observable reference");
    Ref::new(value)
}

// =============================================================================
// TESTS
// =============================================================================
