use spark_panel::component::{Component, ComponentLibrary, Document, Lifecycle};
use spark_panel::{observable, reactive, Object, PanelConfig, Reactive, Ref, RegistrationError};

// =============================================================================
// FIXTURES
// =============================================================================

struct StatusLabel;

impl Component for StatusLabel {
    fn template() -> Option<&'static str> {
        Some(r#"<div class="status"><span data-text="$label">…</span></div>"#)
    }

    fn create() -> Self {
        StatusLabel
    }
}

/// Renders the shared device state; its template lives in the document.
struct ModeIndicator {
    device: Reactive,
}

thread_local! {
    static DEVICE: Object = Object::from_json_value(serde_json::json!({ "mode": "static", "on": false }))
        .expect("device state");
}

impl Component for ModeIndicator {
    fn create() -> Self {
        Self {
            device: DEVICE.with(reactive),
        }
    }

    fn property(&self, name: &str) -> Option<String> {
        let value = self.device.get(name)?;
        match name {
            "mode" => value.as_str().map(str::to_string),
            "on" => value.as_bool().map(|on| if on { "power-on" } else { "power-off" }.to_string()),
            _ => None,
        }
    }
}

struct BrightnessSlider {
    level: Ref<u8>,
}

impl Component for BrightnessSlider {
    fn template() -> Option<&'static str> {
        Some(
            r#"<input type="range" min="0" max="100" value="$level"><slot name="$caption">brightness</slot>"#,
        )
    }

    fn create() -> Self {
        Self {
            level: observable(50),
        }
    }

    fn property(&self, name: &str) -> Option<String> {
        (name == "level").then(|| self.level.get().to_string())
    }
}

fn document() -> Document {
    let mut document = Document::new();
    document.add_template(
        "template-mode-indicator",
        r#"<p data-text="$mode"></p><i class="$on"></i>"#,
    );

    let mut library = ComponentLibrary::new();
    library
        .register::<StatusLabel>()
        .register::<ModeIndicator>()
        .register::<BrightnessSlider>();
    let tags = library.register_all(&mut document).expect("register");
    assert_eq!(tags, vec!["status-label", "mode-indicator", "brightness-slider"]);
    document
}

// =============================================================================
// ATTRIBUTE BINDINGS
// =============================================================================

#[test]
fn label_attribute_drives_span_text() {
    let document = document();
    let host = document.create_element("status-label").expect("element");
    host.connect();

    host.set_attribute("label", "on");

    let span = host
        .instance()
        .root()
        .query_tag("span")
        .expect("span");
    assert_eq!(span.text_content(), "on");
}

#[test]
fn unchanged_attribute_is_not_rewritten() {
    let document = document();
    let host = document.create_element("status-label").expect("element");
    host.connect();
    host.set_attribute("label", "on");

    let span = host.instance().root().query_tag("span").expect("span");
    span.set_text("edited elsewhere");

    host.set_attribute("label", "on");
    assert_eq!(span.text_content(), "edited elsewhere");

    host.set_attribute("label", "off");
    assert_eq!(span.text_content(), "off");
}

#[test]
fn slot_binding_takes_markup() {
    let document = document();
    let host = document.create_element("brightness-slider").expect("element");
    host.set_attribute("caption", "<b>Level</b>");

    let slot = host.instance().binding("caption").expect("caption").element.clone();
    assert_eq!(slot.inner_html(), "<b>Level</b>");
    assert_eq!(slot.text_content(), "Level");
}

#[test]
fn instances_are_isolated() {
    let document = document();
    let first = document.create_element("status-label").expect("element");
    let second = document.create_element("status-label").expect("element");

    first.set_attribute("label", "one");
    second.set_attribute("label", "two");

    assert_eq!(first.instance().root().text_content(), "one");
    assert_eq!(second.instance().root().text_content(), "two");
    let template = document.get("status-label").expect("defined").template();
    assert_eq!(template.content().text_content(), "…");
}

// =============================================================================
// PROPERTY BINDINGS
// =============================================================================

#[test]
fn ref_backed_property_follows_state_while_connected() {
    let document = document();
    let host = document.create_element("brightness-slider").expect("element");
    let input = host.instance().root().query_tag("input").expect("input");
    assert_eq!(input.get_attribute("value").as_deref(), Some("$level"));

    host.connect();
    assert_eq!(host.instance().lifecycle(), Lifecycle::Connected);
    assert_eq!(input.get_attribute("value").as_deref(), Some("50"));

    let level = host
        .instance()
        .component::<BrightnessSlider>()
        .expect("slider")
        .level
        .clone();
    level.set(80);
    assert_eq!(input.get_attribute("value").as_deref(), Some("80"));
}

#[test]
fn property_wins_over_attribute_of_the_same_name() {
    let document = document();
    let host = document.create_element("brightness-slider").expect("element");
    host.connect();

    host.set_attribute("level", "10");
    let input = host.instance().root().query_tag("input").expect("input");
    assert_eq!(input.get_attribute("value").as_deref(), Some("50"));
}

#[test]
fn proxy_backed_property_follows_shared_object() {
    let document = document();
    let first = document.create_element("mode-indicator").expect("element");
    let second = document.create_element("mode-indicator").expect("element");
    first.connect();
    second.connect();

    assert_eq!(first.instance().root().text_content(), "static");

    let device = DEVICE.with(reactive);
    device.set("mode", "rainbow");
    device.set("on", true);

    for host in [&first, &second] {
        let root = host.instance().root();
        assert_eq!(root.text_content(), "rainbow");
        let icon = root.query_tag("i").expect("icon");
        assert_eq!(icon.get_attribute("class").as_deref(), Some("power-on"));
    }
}

// =============================================================================
// LIFECYCLE
// =============================================================================

#[test]
fn disconnect_stops_updates_and_reconnect_resumes() {
    let document = document();
    let host = document.create_element("brightness-slider").expect("element");
    host.connect();

    let level = host
        .instance()
        .component::<BrightnessSlider>()
        .expect("slider")
        .level
        .clone();
    let input = host.instance().root().query_tag("input").expect("input");

    host.disconnect();
    assert_eq!(host.instance().lifecycle(), Lifecycle::Disconnected);
    assert_eq!(level.dep().subscriber_count(), 0);

    level.set(5);
    assert_eq!(input.get_attribute("value").as_deref(), Some("50"));

    host.connect();
    assert_eq!(input.get_attribute("value").as_deref(), Some("5"));
    assert_eq!(level.dep().subscriber_count(), 1);
}

// =============================================================================
// REGISTRATION ERRORS
// =============================================================================

struct ColourWheel;

impl Component for ColourWheel {
    fn create() -> Self {
        ColourWheel
    }
}

mod legacy {
    use spark_panel::component::Component;

    pub struct StatusLabel;

    impl Component for StatusLabel {
        fn template() -> Option<&'static str> {
            Some("<span></span>")
        }

        fn create() -> Self {
            StatusLabel
        }
    }
}

#[test]
fn missing_template_aborts_registration() {
    let mut library = ComponentLibrary::new();
    library.register::<ColourWheel>().register::<StatusLabel>();

    let mut document = Document::new();
    let err = library.register_all(&mut document).unwrap_err();
    assert_eq!(err.to_string(), "no such template template-colour-wheel for ColourWheel");
    assert!(!document.is_defined("status-label"));
}

#[test]
fn same_tag_from_two_classes_aborts_registration() {
    let mut library = ComponentLibrary::new();
    library.register::<StatusLabel>().register::<legacy::StatusLabel>();

    let err = library.register_all(&mut Document::new()).unwrap_err();
    assert!(matches!(err, RegistrationError::DuplicateTag { ref tag, .. } if tag == "status-label"));
}

#[test]
fn config_controls_template_lookup() {
    let config = PanelConfig::from_toml(r#"template_prefix = "tpl-""#).expect("config");
    let mut document = Document::new();
    document.add_template("tpl-colour-wheel", r#"<canvas data-hue="$hue"></canvas>"#);

    let mut library = ComponentLibrary::with_config(config);
    library.register::<ColourWheel>();
    library.register_all(&mut document).expect("register");

    let host = document.create_element("colour-wheel").expect("element");
    host.set_attribute("hue", "120");
    let canvas = host.instance().root().query_tag("canvas").expect("canvas");
    assert_eq!(canvas.get_attribute("data-hue").as_deref(), Some("120"));
}
