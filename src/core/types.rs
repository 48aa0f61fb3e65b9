// ============================================================================
// spark-panel - Type Definitions
// Identifiers and type-erasure helpers shared by the reactive graph
// ============================================================================

use std::any::Any;
use std::cell::Cell;
use std::fmt;

// =============================================================================
// EFFECT IDENTITY
// =============================================================================
//
// Dependency Nodes deduplicate subscribers by identity, not by closure
// equality (closures have none). Every effect gets a process-unique id at
// creation; the id is the key in each Dep's subscriber set.
// =============================================================================

/// Unique identity of an effect (or internal invalidator).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(u64);

impl EffectId {
    /// Allocate the next effect id for this thread.
    pub(crate) fn next() -> Self {
        Self(next_id(&NEXT_EFFECT_ID))
    }

    /// Raw numeric value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect#{}", self.0)
    }
}

/// Unique identity of one object proxy instance.
///
/// Proxies are never cached: every nested read hands out a new one, and the
/// id is how callers tell two proxies over the same object apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProxyId(u64);

impl ProxyId {
    pub(crate) fn next() -> Self {
        Self(next_id(&NEXT_PROXY_ID))
    }

    /// Raw numeric value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

thread_local! {
    static NEXT_EFFECT_ID: Cell<u64> = const { Cell::new(1) };
    static NEXT_PROXY_ID: Cell<u64> = const { Cell::new(1) };
}

fn next_id(counter: &'static std::thread::LocalKey<Cell<u64>>) -> u64 {
    counter.with(|c| {
        let id = c.get();
        c.set(id + 1);
        id
    })
}

// =============================================================================
// AS ANY
// =============================================================================

/// Upcast helper so trait objects can be downcast to their concrete type.
///
/// Blanket-implemented for every `'static` type; use it as a supertrait.
pub trait AsAny: Any {
    /// Upcast to `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_ids_are_unique_and_increasing() {
        let a = EffectId::next();
        let b = EffectId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn proxy_ids_are_unique() {
        let a = ProxyId::next();
        let b = ProxyId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn as_any_downcasts_through_trait_object() {
        trait Named: AsAny {}
        struct Thing(u8);
        impl Named for Thing {}

        let boxed: Box<dyn Named> = Box::new(Thing(7));
        let thing = (*boxed).as_any().downcast_ref::<Thing>();
        assert_eq!(thing.map(|t| t.0), Some(7));
    }

    #[test]
    fn display_formats_effect_id() {
        let id = EffectId(3);
        assert_eq!(id.to_string(), "effect#3");
    }
}
