// ============================================================================
// spark-panel - Errors
// ============================================================================
//
// Registration problems are fatal and surface to whoever drives startup.
// Binding gaps (a placeholder with no element, a name with no property) are
// not errors at all and never reach this module.
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while registering component classes or creating elements.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// Two classes map to the same public tag.
    #[error("a component with the name {tag} has already been registered for {class}")]
    DuplicateTag { tag: String, class: String },

    /// The derived tag is not a valid custom element name.
    #[error("{tag} (from {class}) is not a valid custom element name")]
    InvalidTagName { tag: String, class: String },

    /// The class has no inline template and the document has none under its id.
    #[error("no such template {id} for {class}")]
    MissingTemplate { id: String, class: String },

    /// `create_element` was called for a tag nobody defined.
    #[error("no component is defined for <{0}>")]
    UnknownElement(String),
}

/// Errors loading [`PanelConfig`](crate::PanelConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Errors talking to the device API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport could not deliver the request.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The response body was not what the endpoint promises.
    #[error("unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A form body could not be encoded.
    #[error("failed to encode form body: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),

    /// The request never produced a response (already logged).
    #[error("no response from {0}")]
    NoResponse(String),
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Crate-level result.
pub type Result<T, E = Error> = std::result::Result<T, E>;
