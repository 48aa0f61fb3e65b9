// ============================================================================
// spark-panel - Component Classes
// The trait user components implement, and its type-erased descriptor
// ============================================================================

use std::any::{type_name, TypeId};
use std::fmt;

use crate::component::naming::short_type_name;
use crate::core::types::AsAny;

/// A panel component.
///
/// Implementors provide state and, optionally, computed properties. Every
/// binding whose name matches a property is refreshed from that property
/// whenever an attribute changes or anything the property read changes.
///
/// ```
/// use spark_panel::component::Component;
/// use spark_panel::{observable, Ref};
///
/// struct PowerToggle {
///     on: Ref<bool>,
/// }
///
/// impl Component for PowerToggle {
///     fn template() -> Option<&'static str> {
///         Some(r#"<span data-text="$state"></span>"#)
///     }
///
///     fn create() -> Self {
///         Self { on: observable(false) }
///     }
///
///     fn property(&self, name: &str) -> Option<String> {
///         match name {
///             "state" => Some(if self.on.get() { "on" } else { "off" }.to_string()),
///             _ => None,
///         }
///     }
/// }
///
/// assert_eq!(PowerToggle::name(), "PowerToggle");
/// ```
pub trait Component: AsAny {
    /// Class name; the tag is its kebab-case form.
    fn name() -> &'static str
    where
        Self: Sized,
    {
        short_type_name(type_name::<Self>())
    }

    /// Inline template markup. `None` means the document must supply a
    /// template under `template-<tag>`.
    fn template() -> Option<&'static str>
    where
        Self: Sized,
    {
        None
    }

    /// Construct a fresh instance's state.
    fn create() -> Self
    where
        Self: Sized;

    /// Current value of a computed property, or `None` if the component has
    /// no property of that name.
    fn property(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Factory producing a boxed instance of one component class.
pub type ComponentFactory = fn() -> Box<dyn Component>;

fn construct<C: Component>() -> Box<dyn Component> {
    Box::new(C::create())
}

/// Type-erased description of a component class.
#[derive(Clone, Copy)]
pub struct ComponentClass {
    type_id: TypeId,
    name: &'static str,
    template: Option<&'static str>,
    factory: ComponentFactory,
}

impl ComponentClass {
    pub fn of<C: Component>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            name: C::name(),
            template: C::template(),
            factory: construct::<C>,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn template(&self) -> Option<&'static str> {
        self.template
    }

    pub fn factory(&self) -> ComponentFactory {
        self.factory
    }
}

impl fmt::Debug for ComponentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentClass")
            .field("name", &self.name)
            .field("inline_template", &self.template.is_some())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
