// ============================================================================
// spark-panel - Reactive Object Proxy
// Per-key tracked reads and always-notifying writes over a plain Object
// ============================================================================
//
// Semantics:
// - get(key) creates the key's Dep if absent, depends on it, and returns
//   either the scalar or a FRESH proxy over the nested object. Proxies are
//   not cached; every nested read hands out a new instance.
// - set(key, v) writes into the object and, if the key's Dep exists,
//   notifies unconditionally. Unlike Ref::set there is no equality gate.
// ============================================================================

use crate::core::types::ProxyId;
use crate::primitives::object::{Object, Value};

// =============================================================================
// PROPERTY
// =============================================================================

/// What a proxied read returns.
#[derive(Clone, Debug, PartialEq)]
pub enum Property {
    /// A scalar value
    Value(serde_json::Value),
    /// A fresh proxy over a nested object
    Nested(Reactive),
}

impl Property {
    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            Property::Value(v) => Some(v),
            Property::Nested(_) => None,
        }
    }

    pub fn as_nested(&self) -> Option<&Reactive> {
        match self {
            Property::Nested(r) => Some(r),
            Property::Value(_) => None,
        }
    }

    pub fn into_nested(self) -> Option<Reactive> {
        match self {
            Property::Nested(r) => Some(r),
            Property::Value(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(|v| v.as_str())
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_value().and_then(|v| v.as_i64())
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_value().and_then(|v| v.as_f64())
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_value().and_then(|v| v.as_bool())
    }
}

// =============================================================================
// REACTIVE
// =============================================================================

/// A tracking facade over an [`Object`].
///
/// # Example
///
/// ```
/// use spark_panel::{reactive, watch_effect, Object};
/// use serde_json::json;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let state = Object::from_json_value(json!({ "mode": "static" })).expect("object");
/// let proxy = reactive(&state);
/// let runs = Rc::new(Cell::new(0));
///
/// let _effect = watch_effect({
///     let proxy = proxy.clone();
///     let runs = runs.clone();
///     move || {
///         let _ = proxy.get("mode");
///         runs.set(runs.get() + 1);
///     }
/// });
///
/// proxy.set("mode", "static"); // same value still notifies
/// assert_eq!(runs.get(), 2);
/// ```
#[derive(Clone)]
pub struct Reactive {
    target: Object,
    id: ProxyId,
}

impl Reactive {
    /// Wrap `target`. The object is shared, not copied.
    pub fn new(target: &Object) -> Self {
        Self {
            target: target.clone(),
            id: ProxyId::next(),
        }
    }

    /// Identity of this proxy instance.
    pub fn id(&self) -> ProxyId {
        self.id
    }

    /// The underlying object.
    pub fn target(&self) -> &Object {
        &self.target
    }

    /// Whether two proxies wrap the same object.
    pub fn same_target(&self, other: &Reactive) -> bool {
        self.target.ptr_eq(&other.target)
    }

    /// Tracked read of `key`.
    ///
    /// Absent keys still get a Dependency Node, so a later write that adds
    /// the key notifies whoever looked for it.
    pub fn get(&self, key: &str) -> Option<Property> {
        self.target.dep_for(key).depend();
        match self.target.get(key)? {
            Value::Object(nested) => Some(Property::Nested(Reactive::new(&nested))),
            Value::Scalar(v) => Some(Property::Value(v)),
        }
    }

    /// Write `value` at `key`, notifying if the key was ever read.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        self.target.insert(key, value);
        if let Some(dep) = self.target.existing_dep(key) {
            dep.notify();
        }
    }

    /// Untracked deep copy of the underlying object.
    pub fn snapshot(&self) -> serde_json::Value {
        self.target.to_json()
    }
}

impl PartialEq for Reactive {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl std::fmt::Debug for Reactive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reactive")
            .field("id", &self.id)
            .field("target", &self.target)
            .finish()
    }
}

/// Wrap an object in a tracking proxy.
pub fn reactive(object: &Object) -> Reactive {
    Reactive::new(object)
}

// =============================================================================
// TESTS
// =============================================================================
