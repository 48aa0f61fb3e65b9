// ============================================================================
// spark-panel - Component Instances
// One live component: its state, isolated root, bindings and effect
// ============================================================================
//
// Lifecycle:
//   Constructed → BindingsInitialised → Connected ⇄ Disconnected
//
// A connected instance owns exactly one effect. The effect re-applies every
// computed property, so it subscribes to whatever those properties read.
// Disconnecting disposes it, which detaches it from all of those nodes.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::component::binding::BoundElement;
use crate::component::class::Component;
use crate::component::definition::ComponentDefinition;
use crate::component::dom::Fragment;
use crate::primitives::effect::{watch_effect, Effect};
use crate::reactivity::tracking::untrack;

/// Where an instance is in its lifecycle.
///
/// `Constructed` only holds while [`ComponentElement::new`] resolves the
/// bindings; a returned instance is at least `BindingsInitialised`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Constructed,
    BindingsInitialised,
    Connected,
    Disconnected,
}

struct ElementState {
    definition: Rc<ComponentDefinition>,
    state: Box<dyn Component>,
    root: Fragment,
    bindings: IndexMap<String, BoundElement>,
    effect: RefCell<Option<Effect>>,
    lifecycle: Cell<Lifecycle>,
}

impl Drop for ElementState {
    fn drop(&mut self) {
        if let Some(effect) = self.effect.get_mut().take() {
            effect.dispose();
        }
    }
}

/// A live component instance.
#[derive(Clone)]
pub struct ComponentElement {
    inner: Rc<ElementState>,
}

impl ComponentElement {
    /// Construct an instance: fresh state, a private copy of the template,
    /// and the binding map resolved against that copy.
    pub fn new(definition: Rc<ComponentDefinition>) -> Self {
        let state = (definition.factory())();
        let root = definition.template().instantiate();

        let mut bindings = IndexMap::new();
        for binding in definition.bindings() {
            match binding.resolve(&root) {
                Some(element) => {
                    bindings.insert(binding.name.clone(), BoundElement::new(binding.clone(), element));
                }
                None => trace!(
                    class = definition.class_name(),
                    token = %binding.token,
                    "binding has no target, skipped"
                ),
            }
        }

        let element = Self {
            inner: Rc::new(ElementState {
                definition,
                state,
                root,
                bindings,
                effect: RefCell::new(None),
                lifecycle: Cell::new(Lifecycle::Constructed),
            }),
        };
        element.transition(Lifecycle::BindingsInitialised);
        element
    }

    // =========================================================================
    // HOST CALLBACKS
    // =========================================================================

    /// An observed attribute changed. `None` means absent.
    pub fn attribute_changed_callback(&self, name: &str, old: Option<&str>, new: Option<&str>) {
        debug!(
            tag = self.tag(),
            name,
            old = ?old,
            new = ?new,
            "attribute changed"
        );
        if old == new {
            return;
        }

        self.update_attribute(name, new);
        untrack(|| self.update_computed_properties());
    }

    /// The instance joined the page: install the effect that keeps computed
    /// properties applied. Any previously installed effect is disposed first.
    pub fn connected_callback(&self) {
        self.dispose_effect();

        let weak: Weak<ElementState> = Rc::downgrade(&self.inner);
        let effect = watch_effect(move || {
            if let Some(inner) = weak.upgrade() {
                ComponentElement { inner }.update_computed_properties();
            }
        });
        *self.inner.effect.borrow_mut() = Some(effect);
        self.transition(Lifecycle::Connected);
    }

    /// The instance left the page: stop reacting.
    pub fn disconnected_callback(&self) {
        self.dispose_effect();
        self.transition(Lifecycle::Disconnected);
    }

    // =========================================================================
    // BINDING UPDATES
    // =========================================================================

    /// Write `value` into the bindings named `name`. Attribute names are
    /// case-insensitive, so `mylabel` reaches a `$myLabel` binding.
    pub fn update_attribute(&self, name: &str, value: Option<&str>) {
        for (binding_name, bound) in &self.inner.bindings {
            if binding_name.eq_ignore_ascii_case(name) {
                bound.apply(value);
            }
        }
    }

    /// Write the current value of every property the component defines into
    /// the binding of the same name.
    pub fn update_computed_properties(&self) {
        for (name, bound) in &self.inner.bindings {
            if let Some(value) = self.inner.state.property(name) {
                bound.apply(Some(&value));
            }
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The component state, if it is a `C`.
    pub fn component<C: Component>(&self) -> Option<&C> {
        (*self.inner.state).as_any().downcast_ref::<C>()
    }

    pub fn definition(&self) -> &Rc<ComponentDefinition> {
        &self.inner.definition
    }

    pub fn tag(&self) -> &str {
        self.inner.definition.tag()
    }

    /// The instance's isolated root.
    pub fn root(&self) -> &Fragment {
        &self.inner.root
    }

    pub fn binding(&self, name: &str) -> Option<&BoundElement> {
        self.inner.bindings.get(name)
    }

    /// Resolved binding names, in discovery order.
    pub fn binding_names(&self) -> Vec<&str> {
        self.inner.bindings.keys().map(String::as_str).collect()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.lifecycle.get()
    }

    /// The installed effect, while connected.
    pub fn effect(&self) -> Option<Effect> {
        self.inner.effect.borrow().clone()
    }

    pub fn ptr_eq(&self, other: &ComponentElement) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn dispose_effect(&self) {
        let previous = self.inner.effect.borrow_mut().take();
        if let Some(effect) = previous {
            effect.dispose();
        }
    }

    fn transition(&self, next: Lifecycle) {
        let previous = self.inner.lifecycle.replace(next);
        debug!(tag = self.tag(), from = ?previous, to = ?next, "lifecycle");
    }
}

impl fmt::Debug for ComponentElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentElement")
            .field("tag", &self.tag())
            .field("lifecycle", &self.lifecycle())
            .field("bindings", &self.binding_names())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
