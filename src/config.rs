// ============================================================================
// spark-panel - Configuration
// ============================================================================

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default device API endpoint.
pub const DEFAULT_API_URL: &str = "http://192.168.0.10/api";

/// Marks an attribute value as a binding placeholder.
pub const DEFAULT_SENTINEL: char = '$';

/// Prefix of document template ids (`template-<tag>`).
pub const DEFAULT_TEMPLATE_PREFIX: &str = "template-";

/// Panel configuration.
///
/// Every field has a default, so an empty file is a valid config.
///
/// ```
/// use spark_panel::PanelConfig;
///
/// let config = PanelConfig::from_toml(r#"api_url = "http://10.0.0.2/api""#).unwrap();
/// assert_eq!(config.api_url, "http://10.0.0.2/api");
/// assert_eq!(config.sentinel, '$');
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Base URL of the device REST API, without a trailing slash
    pub api_url: String,

    /// Leading character of binding placeholders
    pub sentinel: char,

    /// Id prefix for templates supplied by the document
    pub template_prefix: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            sentinel: DEFAULT_SENTINEL,
            template_prefix: DEFAULT_TEMPLATE_PREFIX.to_string(),
        }
    }
}

impl PanelConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Override the API endpoint.
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.to_string();
        self
    }

    fn validate(mut self) -> Result<Self, ConfigError> {
        while self.api_url.ends_with('/') {
            self.api_url.pop();
        }
        if self.api_url.is_empty() {
            return Err(ConfigError::Invalid {
                field: "api_url",
                message: "must not be empty".to_string(),
            });
        }
        if self.sentinel.is_whitespace() {
            return Err(ConfigError::Invalid {
                field: "sentinel",
                message: "must not be whitespace".to_string(),
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = PanelConfig::from_toml("").unwrap();
        assert_eq!(config, PanelConfig::default());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.template_prefix, "template-");
    }

    #[test]
    fn overrides_are_applied() {
        let config = PanelConfig::from_toml(
            r#"
            api_url = "http://cube.local/api/"
            sentinel = "@"
            template_prefix = "tpl-"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_url, "http://cube.local/api");
        assert_eq!(config.sentinel, '@');
        assert_eq!(config.template_prefix, "tpl-");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            PanelConfig::from_toml(r#"api_url = "/""#),
            Err(ConfigError::Invalid { field: "api_url", .. })
        ));
        assert!(matches!(
            PanelConfig::from_toml(r#"sentinel = " ""#),
            Err(ConfigError::Invalid { field: "sentinel", .. })
        ));
        assert!(matches!(
            PanelConfig::from_toml("api_url = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = PanelConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn builder_override() {
        let config = PanelConfig::default().with_api_url("http://10.1.1.1/api");
        assert_eq!(config.api_url, "http://10.1.1.1/api");
    }
}
