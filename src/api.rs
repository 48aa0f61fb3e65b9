// ============================================================================
// spark-panel - Device API
// Form-encoded POST requests against the lighting controller's REST API
// ============================================================================
//
// Every call is a POST to `<api_url>/<path>`, optionally with a form body.
// The transport is pluggable so the panel logic can run without a network.
// ============================================================================

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::color::Rgb;
use crate::component::dom::Element;
use crate::config::PanelConfig;
use crate::error::ApiError;

/// Ordered form fields.
pub type FormFields = Vec<(String, String)>;

/// Something that can deliver a POST and return the response body.
pub trait Transport {
    /// POST `body` (already form-encoded) to `url`.
    fn post(&self, url: &str, body: Option<&str>) -> Result<String, ApiError>;
}

/// What `status` reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub on: bool,

    /// Active mode, matched against buttons' `data-mode`
    #[serde(default)]
    pub mode: String,
}

// =============================================================================
// BUTTON ACTION
// =============================================================================

/// A request described by a button's `data-*` attributes: `data-method`
/// names the endpoint and every other `data-*` attribute becomes a form
/// field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonAction {
    pub method: String,
    pub fields: FormFields,
}

impl ButtonAction {
    /// Read the action off a button, or `None` if it has no `data-method`.
    ///
    /// ```
    /// use spark_panel::api::ButtonAction;
    /// use spark_panel::component::Element;
    ///
    /// let button = Element::new("input");
    /// button.set_attribute("data-method", "mode");
    /// button.set_attribute("data-mode", "rainbow");
    ///
    /// let action = ButtonAction::from_element(&button).unwrap();
    /// assert_eq!(action.method, "mode");
    /// assert_eq!(action.mode(), Some("rainbow"));
    /// ```
    pub fn from_element(element: &Element) -> Option<Self> {
        let mut dataset = element.dataset();
        let method = dataset.shift_remove("method")?;
        Some(Self {
            method,
            fields: dataset.into_iter().collect(),
        })
    }

    /// The `mode` field, used to mark the active button.
    pub fn mode(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == "mode")
            .map(|(_, v)| v.as_str())
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Client for the device API.
#[derive(Debug)]
pub struct DeviceClient<T> {
    base_url: String,
    transport: T,
}

impl<T: Transport> DeviceClient<T> {
    pub fn new(config: &PanelConfig, transport: T) -> Self {
        Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// POST to `path` and return the body. Failures are logged and give
    /// `None`.
    pub fn request(&self, path: &str, form: Option<&[(String, String)]>) -> Option<String> {
        match self.send(path, form) {
            Ok(body) => Some(body),
            Err(e) => {
                error!(path, error = %e, "device request failed");
                None
            }
        }
    }

    /// POST to `path`, propagating failures.
    pub fn send(&self, path: &str, form: Option<&[(String, String)]>) -> Result<String, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        let body = form.map(serde_urlencoded::to_string).transpose()?;
        debug!(url = %url, body = ?body, "POST");
        self.transport.post(&url, body.as_deref())
    }

    /// Current power state and mode.
    pub fn status(&self) -> Result<DeviceStatus, ApiError> {
        let body = self
            .request("status", None)
            .ok_or_else(|| ApiError::NoResponse("status".to_string()))?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            path: "status".to_string(),
            source,
        })
    }

    /// Switch the output on or off.
    pub fn set_power(&self, on: bool) -> Result<(), ApiError> {
        let path = if on { "on" } else { "off" };
        self.fire(path, None)
    }

    /// Show a single static colour.
    pub fn set_static_colour(&self, colour: Rgb) -> Result<(), ApiError> {
        let form = vec![("colour".to_string(), colour.to_u32().to_string())];
        self.fire("set-static-colour", Some(&form))
    }

    /// Perform a button's action.
    pub fn invoke(&self, action: &ButtonAction) -> Result<(), ApiError> {
        self.fire(&action.method, Some(&action.fields))
    }

    fn fire(&self, path: &str, form: Option<&[(String, String)]>) -> Result<(), ApiError> {
        self.request(path, form)
            .map(|_| ())
            .ok_or_else(|| ApiError::NoResponse(path.to_string()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
