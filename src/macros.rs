// ============================================================================
// spark-panel - Ergonomic Macros
// ============================================================================

/// Helper macro to clone variables into a move closure.
///
/// Saves cloning every `Ref` or `Reactive` handle by hand before moving it
/// into a closure.
///
/// # Usage
///
/// ```rust
/// use spark_panel::{cloned, computed, observable};
///
/// let a = observable(1);
/// let b = observable(2);
///
/// let sum = computed(cloned!(a, b => move || a.get() + b.get()));
/// assert_eq!(sum.get(), 3);
/// ```
#[macro_export]
macro_rules! cloned {
    ($($n:ident),+ => $e:expr) => {
        {
            $( let $n = $n.clone(); )+
            $e
        }
    };
}

/// Watch an effect with automatic variable capturing.
///
/// Wraps `watch_effect(cloned!(... => move || ...))`.
///
/// # Usage
///
/// ```rust
/// use spark_panel::{observable, watch};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let level = observable(1);
/// let total = Rc::new(Cell::new(0));
///
/// let _effect = watch!(level, total => total.set(total.get() + level.get()));
/// level.set(5);
/// assert_eq!(total.get(), 6);
/// ```
#[macro_export]
macro_rules! watch {
    // Case 1: With dependencies
    ($($deps:ident),+ => $body:expr) => {
        $crate::watch_effect($crate::cloned!($($deps),+ => move || { $body; }))
    };
    // Case 2: No dependencies
    ($body:expr) => {
        $crate::watch_effect(move || { $body; })
    };
}

/// Create a computed value with automatic variable capturing.
///
/// ```rust
/// use spark_panel::observable;
///
/// let on = observable(false);
/// let label = spark_panel::computed!(on => if on.get() { "on" } else { "off" });
/// on.set(true);
/// assert_eq!(label.get(), "on");
/// ```
#[macro_export]
macro_rules! computed {
    ($($deps:ident),+ => $body:expr) => {
        $crate::computed($crate::cloned!($($deps),+ => move || $body))
    };
    ($body:expr) => {
        $crate::computed(move || $body)
    };
}
