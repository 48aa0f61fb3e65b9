// ============================================================================
// spark-panel - DOM Model
// Shared, mutable element trees for templates and isolated rendering roots
// ============================================================================
//
// Elements are reference-counted handles; cloning a handle does not copy
// the element (use deep_clone for that). A Fragment is a parentless list of
// nodes: template content, or a component's shadow root after cloning.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::component::naming::dataset_key;
use crate::component::template::parse_fragment;

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

// =============================================================================
// NODE
// =============================================================================

/// A child node.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    fn deep_clone(&self) -> Node {
        match self {
            Node::Element(e) => Node::Element(e.deep_clone()),
            Node::Text(t) => Node::Text(t.clone()),
        }
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Node::Element(e) => e.write_text(out),
            Node::Text(t) => out.push_str(t),
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(e) => e.write_outer_html(out),
            Node::Text(t) => out.push_str(&html_escape::encode_text(t)),
        }
    }
}

// =============================================================================
// ELEMENT
// =============================================================================

struct ElementInner {
    tag: String,
    attributes: RefCell<IndexMap<String, String>>,
    children: RefCell<Vec<Node>>,
}

/// A shared element handle.
#[derive(Clone)]
pub struct Element {
    inner: Rc<ElementInner>,
}

impl Element {
    /// Create an empty element. Tag names are stored lowercase.
    pub fn new(tag: &str) -> Self {
        Self {
            inner: Rc::new(ElementInner {
                tag: tag.to_ascii_lowercase(),
                attributes: RefCell::new(IndexMap::new()),
                children: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Lowercase tag name.
    pub fn tag_name(&self) -> &str {
        &self.inner.tag
    }

    // Attribute names are case-insensitive; they are stored lowercase and
    // every accessor lowercases the name it is given.

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.inner.attributes.borrow().get(&name.to_ascii_lowercase()).cloned()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.inner.attributes.borrow().contains_key(&name.to_ascii_lowercase())
    }

    /// Set an attribute, returning the previous value.
    pub fn set_attribute(&self, name: &str, value: &str) -> Option<String> {
        self.inner
            .attributes
            .borrow_mut()
            .insert(name.to_ascii_lowercase(), value.to_string())
    }

    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        self.inner
            .attributes
            .borrow_mut()
            .shift_remove(&name.to_ascii_lowercase())
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.inner
            .attributes
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// `data-*` attributes keyed the way a dataset is (`data-static-colour`
    /// → `staticColour`).
    pub fn dataset(&self) -> IndexMap<String, String> {
        self.inner
            .attributes
            .borrow()
            .iter()
            .filter_map(|(name, value)| dataset_key(name).map(|key| (key, value.clone())))
            .collect()
    }

    pub fn children(&self) -> Vec<Node> {
        self.inner.children.borrow().clone()
    }

    pub fn append_child(&self, node: Node) {
        self.inner.children.borrow_mut().push(node);
    }

    pub fn clear_children(&self) {
        self.inner.children.borrow_mut().clear();
    }

    /// Replace all children with one text node.
    pub fn set_text(&self, text: &str) {
        *self.inner.children.borrow_mut() = vec![Node::Text(text.to_string())];
    }

    /// Replace all children with parsed markup.
    pub fn set_inner_html(&self, html: &str) {
        *self.inner.children.borrow_mut() = parse_fragment(html);
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in self.inner.children.borrow().iter() {
            child.write_html(&mut out);
        }
        out
    }

    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_outer_html(&mut out);
        out
    }

    /// Copy this element and its whole subtree.
    pub fn deep_clone(&self) -> Element {
        let copy = Element::new(&self.inner.tag);
        *copy.inner.attributes.borrow_mut() = self.inner.attributes.borrow().clone();
        *copy.inner.children.borrow_mut() = self
            .inner
            .children
            .borrow()
            .iter()
            .map(Node::deep_clone)
            .collect();
        copy
    }

    /// Descendant elements, depth-first in document order.
    pub fn descendants(&self) -> Vec<Element> {
        let mut out = Vec::new();
        collect_elements(&self.inner.children.borrow(), &mut out);
        out
    }

    /// First descendant whose attribute `name` equals `value`.
    pub fn query_attribute(&self, name: &str, value: &str) -> Option<Element> {
        self.descendants()
            .into_iter()
            .find(|e| e.get_attribute(name).as_deref() == Some(value))
    }

    /// Whether both handles refer to the same element.
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn write_text(&self, out: &mut String) {
        for child in self.inner.children.borrow().iter() {
            child.write_text(out);
        }
    }

    fn write_outer_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.inner.tag);
        for (name, value) in self.inner.attributes.borrow().iter() {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(value));
            out.push('"');
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&self.inner.tag.as_str()) {
            return;
        }
        for child in self.inner.children.borrow().iter() {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.inner.tag);
        out.push('>');
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.outer_html())
    }
}

// =============================================================================
// FRAGMENT
// =============================================================================

/// A parentless list of nodes.
#[derive(Clone, Default)]
pub struct Fragment {
    children: Rc<RefCell<Vec<Node>>>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self {
            children: Rc::new(RefCell::new(nodes)),
        }
    }

    pub fn children(&self) -> Vec<Node> {
        self.children.borrow().clone()
    }

    pub fn append_child(&self, node: Node) {
        self.children.borrow_mut().push(node);
    }

    /// Copy the whole tree; the copy shares nothing with the original.
    pub fn deep_clone(&self) -> Fragment {
        Fragment::from_nodes(self.children.borrow().iter().map(Node::deep_clone).collect())
    }

    /// All elements, depth-first in document order.
    pub fn elements(&self) -> Vec<Element> {
        let mut out = Vec::new();
        collect_elements(&self.children.borrow(), &mut out);
        out
    }

    /// The `[name="value"]` selector: first element whose attribute matches.
    pub fn query_attribute(&self, name: &str, value: &str) -> Option<Element> {
        self.elements()
            .into_iter()
            .find(|e| e.get_attribute(name).as_deref() == Some(value))
    }

    /// First element with the given tag.
    pub fn query_tag(&self, tag: &str) -> Option<Element> {
        let tag = tag.to_ascii_lowercase();
        self.elements().into_iter().find(|e| e.tag_name() == tag)
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in self.children.borrow().iter() {
            child.write_text(&mut out);
        }
        out
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in self.children.borrow().iter() {
            child.write_html(&mut out);
        }
        out
    }
}

impl std::fmt::Debug for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inner_html())
    }
}

fn collect_elements(nodes: &[Node], out: &mut Vec<Element>) {
    for node in nodes {
        if let Node::Element(e) = node {
            out.push(e.clone());
            collect_elements(&e.inner.children.borrow(), out);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
