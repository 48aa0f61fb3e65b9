// ============================================================================
// spark-panel - Component Definitions
// Per-class data computed once at registration
// ============================================================================

use std::any::TypeId;
use std::rc::Rc;

use tracing::debug;

use crate::component::binding::{discover, Binding};
use crate::component::class::{ComponentClass, ComponentFactory};
use crate::component::template::Template;

/// A registered component class: its tag, resolved template and the
/// bindings discovered in it.
#[derive(Debug)]
pub struct ComponentDefinition {
    class: ComponentClass,
    tag: String,
    template: Template,
    bindings: Vec<Binding>,
}

impl ComponentDefinition {
    pub fn new(class: ComponentClass, tag: String, template: Template, sentinel: char) -> Rc<Self> {
        let bindings = discover(template.content(), sentinel);
        Rc::new(Self {
            class,
            tag,
            template,
            bindings,
        })
    }

    pub fn class_name(&self) -> &'static str {
        self.class.name()
    }

    pub fn type_id(&self) -> TypeId {
        self.class.type_id()
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub(crate) fn factory(&self) -> ComponentFactory {
        self.class.factory()
    }

    /// Attribute names the host should report changes for: every binding
    /// name once, lowercased the way attribute names are, in discovery order.
    pub fn observed_attributes(&self) -> Vec<String> {
        let mut list: Vec<String> = Vec::with_capacity(self.bindings.len());
        for binding in &self.bindings {
            let name = binding.name.to_ascii_lowercase();
            if !list.contains(&name) {
                list.push(name);
            }
        }
        debug!(class = self.class_name(), observed = ?list, "observed attributes");
        list
    }

    /// Whether changes to `name` are delivered to instances.
    pub fn observes(&self, name: &str) -> bool {
        self.bindings.iter().any(|b| b.name.eq_ignore_ascii_case(name))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::class::Component;

    struct ModeButton;

    impl Component for ModeButton {
        fn template() -> Option<&'static str> {
            Some(r#"<input type="button" value="$caption" data-mode="$mode"><span data-text="$caption"></span>"#)
        }

        fn create() -> Self {
            ModeButton
        }
    }

    fn definition() -> Rc<ComponentDefinition> {
        let class = ComponentClass::of::<ModeButton>();
        let template = Template::parse(class.template().unwrap_or_default());
        ComponentDefinition::new(class, "mode-button".into(), template, '$')
    }

    #[test]
    fn bindings_are_discovered_at_construction() {
        let def = definition();
        assert_eq!(def.class_name(), "ModeButton");
        assert_eq!(def.tag(), "mode-button");
        assert_eq!(def.bindings().len(), 3);
        assert_eq!(def.type_id(), TypeId::of::<ModeButton>());
    }

    #[test]
    fn observed_attributes_follow_bindings() {
        let def = definition();
        assert_eq!(def.observed_attributes(), vec!["caption", "mode"]);
        assert!(def.observes("mode"));
        assert!(!def.observes("type"));
    }

    struct ColourPicker;

    impl Component for ColourPicker {
        fn template() -> Option<&'static str> {
            Some(r#"<span data-text="$staticColour"></span><b data-text="$staticcolour"></b>"#)
        }

        fn create() -> Self {
            ColourPicker
        }
    }

    #[test]
    fn observed_attributes_are_lowercase() {
        let class = ComponentClass::of::<ColourPicker>();
        let template = Template::parse(class.template().unwrap_or_default());
        let def = ComponentDefinition::new(class, "colour-picker".into(), template, '$');

        assert_eq!(def.observed_attributes(), vec!["staticcolour"]);
        assert!(def.observes("staticColour"));
        assert!(def.observes("STATICCOLOUR"));
    }
}
