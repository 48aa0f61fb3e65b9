// ============================================================================
// spark-panel - Host Document
// Template store, custom element registry and host elements
// ============================================================================
//
// The host plays the part a browser plays for custom elements: it keeps the
// registry, stores attributes on the host node, and delivers lifecycle and
// attribute callbacks to the component instance. Attribute callbacks are only
// delivered for observed attributes, and only when the stored value actually
// changes.
// ============================================================================

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use crate::component::definition::ComponentDefinition;
use crate::component::dom::Element;
use crate::component::element::ComponentElement;
use crate::component::template::Template;
use crate::error::RegistrationError;

// =============================================================================
// DOCUMENT
// =============================================================================

/// The page: templates by id and the custom element registry.
#[derive(Default)]
pub struct Document {
    templates: HashMap<String, Template>,
    registry: IndexMap<String, Rc<ComponentDefinition>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `<template id="...">` to the page.
    pub fn add_template(&mut self, id: &str, markup: &str) {
        self.templates.insert(id.to_string(), Template::parse(markup));
    }

    pub fn template(&self, id: &str) -> Option<&Template> {
        self.templates.get(id)
    }

    /// Define a custom element. A tag can only be defined once.
    pub fn define(&mut self, definition: Rc<ComponentDefinition>) -> Result<(), RegistrationError> {
        if self.registry.contains_key(definition.tag()) {
            return Err(RegistrationError::DuplicateTag {
                tag: definition.tag().to_string(),
                class: definition.class_name().to_string(),
            });
        }
        self.registry.insert(definition.tag().to_string(), definition);
        Ok(())
    }

    pub fn get(&self, tag: &str) -> Option<&Rc<ComponentDefinition>> {
        self.registry.get(tag)
    }

    pub fn is_defined(&self, tag: &str) -> bool {
        self.registry.contains_key(tag)
    }

    /// Defined tags, in definition order.
    pub fn defined_tags(&self) -> Vec<&str> {
        self.registry.keys().map(String::as_str).collect()
    }

    /// Create a host element for a defined tag. The component instance is
    /// constructed immediately; it is not connected yet.
    pub fn create_element(&self, tag: &str) -> Result<HostElement, RegistrationError> {
        let definition = self
            .get(tag)
            .ok_or_else(|| RegistrationError::UnknownElement(tag.to_string()))?;
        Ok(HostElement::new(definition.clone()))
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut templates: Vec<&String> = self.templates.keys().collect();
        templates.sort();
        f.debug_struct("Document")
            .field("templates", &templates)
            .field("defined", &self.defined_tags())
            .finish()
    }
}

// =============================================================================
// HOST ELEMENT
// =============================================================================

/// A custom element on the page: the host node plus its component instance.
pub struct HostElement {
    node: Element,
    observed: Vec<String>,
    instance: ComponentElement,
    connected: Cell<bool>,
}

impl HostElement {
    fn new(definition: Rc<ComponentDefinition>) -> Self {
        let node = Element::new(definition.tag());
        let observed = definition.observed_attributes();
        Self {
            node,
            observed,
            instance: ComponentElement::new(definition),
            connected: Cell::new(false),
        }
    }

    pub fn tag_name(&self) -> &str {
        self.node.tag_name()
    }

    /// The host node itself (its attributes, as the page sees them).
    pub fn node(&self) -> &Element {
        &self.node
    }

    pub fn instance(&self) -> &ComponentElement {
        &self.instance
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.node.get_attribute(name)
    }

    /// Set an attribute on the host node.
    pub fn set_attribute(&self, name: &str, value: &str) {
        let old = self.node.set_attribute(name, value);
        self.deliver(name, old.as_deref(), Some(value));
    }

    pub fn remove_attribute(&self, name: &str) {
        if let Some(old) = self.node.remove_attribute(name) {
            self.deliver(name, Some(&old), None);
        }
    }

    /// Attach to the page.
    pub fn connect(&self) {
        if !self.connected.replace(true) {
            self.instance.connected_callback();
        }
    }

    /// Detach from the page.
    pub fn disconnect(&self) {
        if self.connected.replace(false) {
            self.instance.disconnected_callback();
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn deliver(&self, name: &str, old: Option<&str>, new: Option<&str>) {
        let name = name.to_ascii_lowercase();
        if old == new {
            debug!(tag = self.tag_name(), name = %name, "attribute unchanged, not delivered");
            return;
        }
        if !self.observed.contains(&name) {
            return;
        }
        self.instance.attribute_changed_callback(&name, old, new);
    }
}

impl std::fmt::Debug for HostElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostElement")
            .field("node", &self.node)
            .field("connected", &self.is_connected())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::class::{Component, ComponentClass};

    struct StatusLabel;

    impl Component for StatusLabel {
        fn template() -> Option<&'static str> {
            Some(r#"<span data-text="$label"></span>"#)
        }

        fn create() -> Self {
            StatusLabel
        }
    }

    fn document() -> Document {
        let class = ComponentClass::of::<StatusLabel>();
        let template = Template::parse(class.template().unwrap_or_default());
        let mut document = Document::new();
        document
            .define(ComponentDefinition::new(class, "status-label".into(), template, '$'))
            .expect("define");
        document
    }

    fn label_text(host: &HostElement) -> String {
        host.instance().root().text_content()
    }

    #[test]
    fn unknown_tags_are_rejected() {
        let err = document().create_element("nope-nope").unwrap_err();
        assert_eq!(err, RegistrationError::UnknownElement("nope-nope".into()));
    }

    #[test]
    fn tags_are_defined_once() {
        let mut document = document();
        let definition = document.get("status-label").expect("defined").clone();
        assert!(matches!(
            document.define(definition),
            Err(RegistrationError::DuplicateTag { .. })
        ));
        assert_eq!(document.defined_tags(), vec!["status-label"]);
    }

    #[test]
    fn observed_attribute_changes_are_delivered() {
        let host = document().create_element("status-label").expect("element");
        host.connect();
        host.set_attribute("label", "on");
        assert_eq!(label_text(&host), "on");
        assert_eq!(host.get_attribute("label").as_deref(), Some("on"));
    }

    #[test]
    fn unchanged_values_are_not_delivered() {
        let host = document().create_element("status-label").expect("element");
        host.set_attribute("label", "on");

        let span = host.instance().binding("label").expect("binding").element.clone();
        span.set_text("tampered");

        host.set_attribute("label", "on");
        assert_eq!(label_text(&host), "tampered");
    }

    #[test]
    fn unobserved_attributes_are_stored_only() {
        let host = document().create_element("status-label").expect("element");
        host.set_attribute("class", "big");
        assert_eq!(host.get_attribute("class").as_deref(), Some("big"));
        assert_eq!(label_text(&host), "");
    }

    #[test]
    fn removal_is_delivered_as_none() {
        let host = document().create_element("status-label").expect("element");
        host.set_attribute("label", "on");
        host.remove_attribute("label");
        assert_eq!(label_text(&host), "");
        host.remove_attribute("label");
    }

    struct PowerBadge;

    impl Component for PowerBadge {
        fn template() -> Option<&'static str> {
            Some(r#"<em data-text="$powerState"></em>"#)
        }

        fn create() -> Self {
            PowerBadge
        }
    }

    #[test]
    fn mixed_case_attribute_names_reach_the_binding() {
        let class = ComponentClass::of::<PowerBadge>();
        let template = Template::parse(class.template().unwrap_or_default());
        let mut document = Document::new();
        document
            .define(ComponentDefinition::new(class, "power-badge".into(), template, '$'))
            .expect("define");
        let host = document.create_element("power-badge").expect("element");

        host.set_attribute("powerState", "on");
        assert_eq!(host.get_attribute("powerState").as_deref(), Some("on"));
        assert_eq!(host.get_attribute("powerstate").as_deref(), Some("on"));
        assert_eq!(label_text(&host), "on");

        host.set_attribute("POWERSTATE", "off");
        assert_eq!(label_text(&host), "off");

        host.remove_attribute("powerState");
        assert!(host.get_attribute("powerState").is_none());
        assert_eq!(label_text(&host), "");
    }

    #[test]
    fn connect_and_disconnect_are_idempotent() {
        let host = document().create_element("status-label").expect("element");
        host.connect();
        host.connect();
        assert!(host.is_connected());
        host.disconnect();
        host.disconnect();
        assert!(!host.is_connected());
    }
}
