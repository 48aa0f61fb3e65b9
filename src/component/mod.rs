// ============================================================================
// spark-panel - Component Module
// Custom elements whose templates bind placeholders to attributes and state
// ============================================================================

pub mod binding;
pub mod class;
pub mod definition;
pub mod dom;
pub mod element;
pub mod host;
pub mod library;
pub mod naming;
pub mod template;

pub use binding::{discover, Binding, BindingKind, BoundElement, TEXT_ATTRIBUTE};
pub use class::{Component, ComponentClass, ComponentFactory};
pub use definition::ComponentDefinition;
pub use dom::{Element, Fragment, Node};
pub use element::{ComponentElement, Lifecycle};
pub use host::{Document, HostElement};
pub use library::ComponentLibrary;
pub use naming::{is_valid_custom_element_name, to_kebab_case};
pub use template::{parse_fragment, Template};
