// ============================================================================
// spark-panel - Bindings
// Placeholder discovery in template content and DOM writes through bindings
// ============================================================================
//
// A binding is any template attribute whose value starts with the sentinel
// character. `<span data-text="$label">` yields the binding named `label`.
// Discovery runs once per component class; each instance then resolves the
// bindings against its own cloned root.
// ============================================================================

use crate::component::dom::{Element, Fragment};

/// The attribute that turns a binding into a text-content write.
pub const TEXT_ATTRIBUTE: &str = "data-text";

/// Where a binding writes its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `<slot>` targets: the value replaces the inner content (parsed).
    Slot,
    /// `data-text` attributes: the value replaces the text content.
    Text,
    /// Anything else: the value is written as the attribute.
    Attribute,
}

/// A placeholder discovered in a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    /// Tag of the element carrying the placeholder (lowercase)
    pub tag_name: String,

    /// Attribute holding the placeholder
    pub attribute_name: String,

    /// Raw placeholder token, sentinel included (`$label`)
    pub token: String,

    /// Token without the sentinel (`label`)
    pub name: String,
}

impl Binding {
    pub fn kind(&self) -> BindingKind {
        if self.tag_name == "slot" {
            BindingKind::Slot
        } else if self.attribute_name == TEXT_ATTRIBUTE {
            BindingKind::Text
        } else {
            BindingKind::Attribute
        }
    }

    /// Find the element in `root` this binding targets.
    pub fn resolve(&self, root: &Fragment) -> Option<Element> {
        root.query_attribute(&self.attribute_name, &self.token)
    }
}

/// Collect every placeholder in `content`, in document order, without
/// duplicates.
///
/// ```
/// use spark_panel::component::{discover, Template};
///
/// let template = Template::parse(r#"<input type="$kind"><span data-text="$label"></span>"#);
/// let names: Vec<_> = discover(template.content(), '$').into_iter().map(|b| b.name).collect();
/// assert_eq!(names, ["kind", "label"]);
/// ```
pub fn discover(content: &Fragment, sentinel: char) -> Vec<Binding> {
    let mut bindings: Vec<Binding> = Vec::new();
    for element in content.elements() {
        for (attribute_name, value) in element.attributes() {
            let Some(name) = value.strip_prefix(sentinel) else {
                continue;
            };
            let binding = Binding {
                tag_name: element.tag_name().to_string(),
                attribute_name,
                token: value.clone(),
                name: name.to_string(),
            };
            if !bindings.contains(&binding) {
                bindings.push(binding);
            }
        }
    }
    bindings
}

/// A binding resolved against one instance's root.
#[derive(Debug, Clone)]
pub struct BoundElement {
    pub binding: Binding,
    pub element: Element,
}

impl BoundElement {
    pub fn new(binding: Binding, element: Element) -> Self {
        Self { binding, element }
    }

    /// Write `value` into the target. `None` clears it.
    pub fn apply(&self, value: Option<&str>) {
        match (self.binding.kind(), value) {
            (BindingKind::Slot, Some(v)) => self.element.set_inner_html(v),
            (BindingKind::Slot, None) | (BindingKind::Text, None) => self.element.clear_children(),
            (BindingKind::Text, Some(v)) => self.element.set_text(v),
            (BindingKind::Attribute, Some(v)) => {
                self.element.set_attribute(&self.binding.attribute_name, v);
            }
            (BindingKind::Attribute, None) => {
                self.element.remove_attribute(&self.binding.attribute_name);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
