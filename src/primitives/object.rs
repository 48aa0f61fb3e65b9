// ============================================================================
// spark-panel - Plain Object Graph
// Shared, insertion-ordered objects that reactive proxies read and write
// ============================================================================
//
// An Object is the system of record. Proxies (see reactive.rs) are access
// facades over it and never own it. Nested objects are shared by reference,
// so a proxy over a nested object writes straight into the graph its owner
// still holds.
//
// The per-key Dependency Nodes live with the object rather than with any one
// proxy: every proxy over the same object shares them.
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};

use crate::reactivity::dep::Dep;

// =============================================================================
// VALUE
// =============================================================================

/// A property value: either a scalar or a (shared) nested object.
///
/// Arrays are scalars here: they are only ever replaced as a whole.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(serde_json::Value),
    Object(Object),
}

impl Value {
    /// Convert from JSON; JSON objects become shared [`Object`]s.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => Value::Object(Object::from_json(map)),
            other => Value::Scalar(other),
        }
    }

    /// Deep copy into JSON.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Scalar(v) => v.clone(),
            Value::Object(o) => o.to_json(),
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            Value::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Scalar(v) => Some(v),
            Value::Object(_) => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::from_json(value)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

macro_rules! scalar_from {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Scalar(serde_json::Value::from(value))
                }
            }
        )+
    };
}

scalar_from!(bool, i32, i64, u8, u32, u64, f64, &str, String);

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(v) => v.serialize(serializer),
            Value::Object(o) => o.serialize(serializer),
        }
    }
}

// =============================================================================
// OBJECT
// =============================================================================

#[derive(Default)]
struct ObjectInner {
    fields: RefCell<IndexMap<String, Value>>,

    /// Lazily created, one per key read through a proxy
    deps: RefCell<HashMap<String, Dep>>,
}

/// A shared plain object.
///
/// Reads and writes made directly on an `Object` are untracked and never
/// notify; go through [`reactive`](crate::reactive) for that.
///
/// Nothing stops an object from being inserted into its own graph. Such a
/// cycle is never freed, and the walkers cut it off: [`Object::to_json`]
/// writes `null` where the object reappears, `{:?}` writes `<cycle>`, and
/// serialization fails.
///
/// # Example
///
/// ```
/// use spark_panel::Object;
/// use serde_json::json;
///
/// let state = Object::from_json_value(json!({ "on": true, "colour": { "r": 255 } }))
///     .expect("an object");
///
/// assert_eq!(state.len(), 2);
/// assert!(state.get("colour").is_some_and(|v| v.is_object()));
/// ```
#[derive(Clone, Default)]
pub struct Object {
    inner: Rc<ObjectInner>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON map, converting nested JSON objects recursively.
    pub fn from_json(map: serde_json::Map<String, serde_json::Value>) -> Self {
        let object = Object::new();
        {
            let mut fields = object.inner.fields.borrow_mut();
            for (key, value) in map {
                fields.insert(key, Value::from_json(value));
            }
        }
        object
    }

    /// Build from any JSON value; `None` unless it is a JSON object.
    pub fn from_json_value(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(map) => Some(Self::from_json(map)),
            _ => None,
        }
    }

    /// Untracked read of one property.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.fields.borrow().get(key).cloned()
    }

    /// Untracked write; returns the previous value.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.inner
            .fields
            .borrow_mut()
            .insert(key.into(), value.into())
    }

    /// Untracked removal.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.inner.fields.borrow_mut().shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.fields.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.fields.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.fields.borrow().keys().cloned().collect()
    }

    /// Deep copy into JSON. An object nested inside itself becomes `null`.
    pub fn to_json(&self) -> serde_json::Value {
        let Some(_walk) = WalkGuard::enter(self) else {
            tracing::warn!("object contains itself, cycle written as null");
            return serde_json::Value::Null;
        };
        let fields = self.inner.fields.borrow();
        let map = fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }

    /// Whether both handles refer to the same object.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Keys that have a Dependency Node.
    pub fn tracked_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner.deps.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// The node for `key`, created on first use.
    pub(crate) fn dep_for(&self, key: &str) -> Dep {
        let mut deps = self.inner.deps.borrow_mut();
        if let Some(dep) = deps.get(key) {
            return dep.clone();
        }
        let dep = Dep::new();
        deps.insert(key.to_owned(), dep.clone());
        dep
    }

    /// The node for `key`, if one was ever created.
    pub(crate) fn existing_dep(&self, key: &str) -> Option<Dep> {
        self.inner.deps.borrow().get(key).cloned()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl std::fmt::Debug for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(_walk) = WalkGuard::enter(self) else {
            return f.write_str("<cycle>");
        };
        f.debug_map().entries(self.inner.fields.borrow().iter()).finish()
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Some(_walk) = WalkGuard::enter(self) else {
            return Err(S::Error::custom("object contains itself"));
        };
        let fields = self.inner.fields.borrow();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (key, value) in fields.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// =============================================================================
// CYCLE GUARD
// =============================================================================

thread_local! {
    /// Objects on the current to_json / Debug / Serialize path
    static WALKING: RefCell<Vec<*const ObjectInner>> = const { RefCell::new(Vec::new()) };
}

struct WalkGuard;

impl WalkGuard {
    /// `None` when `object` is already on the path, i.e. it contains itself.
    fn enter(object: &Object) -> Option<WalkGuard> {
        let ptr = Rc::as_ptr(&object.inner);
        WALKING.with(|walking| {
            let mut walking = walking.borrow_mut();
            if walking.contains(&ptr) {
                return None;
            }
            walking.push(ptr);
            Some(WalkGuard)
        })
    }
}

impl Drop for WalkGuard {
    fn drop(&mut self) {
        WALKING.with(|walking| {
            walking.borrow_mut().pop();
        });
    }
}

// =============================================================================
// TESTS
// =============================================================================
