// ============================================================================
// spark-panel - Component Library
// Collects component classes and defines them on a document
// ============================================================================

use std::any::TypeId;

use indexmap::IndexMap;
use tracing::info;

use crate::component::class::{Component, ComponentClass};
use crate::component::definition::ComponentDefinition;
use crate::component::host::Document;
use crate::component::naming::{is_valid_custom_element_name, to_kebab_case};
use crate::component::template::Template;
use crate::config::PanelConfig;
use crate::error::RegistrationError;

/// The set of component classes an application uses.
///
/// ```
/// use spark_panel::component::{Component, ComponentLibrary, Document};
///
/// struct PowerToggle;
///
/// impl Component for PowerToggle {
///     fn template() -> Option<&'static str> {
///         Some(r#"<input type="checkbox" checked="$checked">"#)
///     }
///     fn create() -> Self {
///         PowerToggle
///     }
/// }
///
/// let mut library = ComponentLibrary::new();
/// library.register::<PowerToggle>();
///
/// let mut document = Document::new();
/// let tags = library.register_all(&mut document).unwrap();
/// assert_eq!(tags, ["power-toggle"]);
/// assert!(document.is_defined("power-toggle"));
/// ```
#[derive(Debug, Default)]
pub struct ComponentLibrary {
    classes: IndexMap<TypeId, ComponentClass>,
    config: PanelConfig,
}

impl ComponentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// A library that uses the sentinel and template prefix from `config`.
    pub fn with_config(config: PanelConfig) -> Self {
        Self {
            classes: IndexMap::new(),
            config,
        }
    }

    /// Add a class. Adding the same class again has no effect.
    pub fn register<C: Component>(&mut self) -> &mut Self {
        self.add(ComponentClass::of::<C>())
    }

    /// Add a type-erased class.
    pub fn add(&mut self, class: ComponentClass) -> &mut Self {
        self.classes.entry(class.type_id()).or_insert(class);
        self
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Classes in registration order.
    pub fn classes(&self) -> impl Iterator<Item = &ComponentClass> {
        self.classes.values()
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Define every class on `document`, in registration order.
    ///
    /// Stops at the first failure. Classes already defined on the document
    /// by an earlier call are skipped. Returns the newly defined tags.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::DuplicateTag`] if two classes share a tag
    /// - [`RegistrationError::InvalidTagName`] if a tag is not a valid custom element name
    /// - [`RegistrationError::MissingTemplate`] if a class has no template anywhere
    pub fn register_all(&self, document: &mut Document) -> Result<Vec<String>, RegistrationError> {
        let mut defined = Vec::new();

        for class in self.classes.values() {
            let tag = to_kebab_case(class.name());

            if let Some(existing) = document.get(&tag) {
                if existing.type_id() == class.type_id() {
                    continue;
                }
                return Err(RegistrationError::DuplicateTag {
                    tag,
                    class: class.name().to_string(),
                });
            }
            if !is_valid_custom_element_name(&tag) {
                return Err(RegistrationError::InvalidTagName {
                    tag,
                    class: class.name().to_string(),
                });
            }

            let template = self.resolve_template(class, &tag, document)?;
            let definition = ComponentDefinition::new(*class, tag.clone(), template, self.config.sentinel);
            document.define(definition)?;

            info!(class = class.name(), tag = %tag, "registered component");
            defined.push(tag);
        }

        Ok(defined)
    }

    fn resolve_template(
        &self,
        class: &ComponentClass,
        tag: &str,
        document: &Document,
    ) -> Result<Template, RegistrationError> {
        if let Some(markup) = class.template() {
            return Ok(Template::parse(markup));
        }
        let id = format!("{}{}", self.config.template_prefix, tag);
        match document.template(&id) {
            Some(template) => Ok(template.clone()),
            None => Err(RegistrationError::MissingTemplate {
                id,
                class: class.name().to_string(),
            }),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
