// ============================================================================
// spark-panel - Templates
// HTML markup parsed into the DOM model
// ============================================================================

use scraper::{ElementRef, Html};

use crate::component::dom::{Element, Fragment, Node};

/// Parse an HTML fragment into detached nodes.
///
/// Comments are dropped; whitespace text is kept as written.
pub fn parse_fragment(html: &str) -> Vec<Node> {
    let document = Html::parse_fragment(html);
    convert_children(document.root_element())
}

fn convert_children(parent: ElementRef<'_>) -> Vec<Node> {
    let mut nodes = Vec::new();
    for child in parent.children() {
        if let Some(element) = ElementRef::wrap(child) {
            nodes.push(Node::Element(convert_element(element)));
        } else if let Some(text) = child.value().as_text() {
            nodes.push(Node::Text(String::from(&**text)));
        }
    }
    nodes
}

fn convert_element(source: ElementRef<'_>) -> Element {
    let element = Element::new(source.value().name());
    for (name, value) in source.value().attrs() {
        element.set_attribute(name, value);
    }
    for node in convert_children(source) {
        element.append_child(node);
    }
    element
}

/// A parsed template: the markup it came from and its inert content.
#[derive(Clone, Debug)]
pub struct Template {
    source: String,
    content: Fragment,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        Self {
            source: source.to_string(),
            content: Fragment::from_nodes(parse_fragment(source)),
        }
    }

    /// Markup the template was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The template's own content. Never mutated by instances.
    pub fn content(&self) -> &Fragment {
        &self.content
    }

    /// A fresh deep copy of the content, for one instance's root.
    pub fn instantiate(&self) -> Fragment {
        self.content.deep_clone()
    }
}

// =============================================================================
// TESTS
// =============================================================================
