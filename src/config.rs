//! Runtime configuration.
//!
//! Everything has a default, so an empty TOML document (or no file at all)
//! yields the stock `data-rs-*` attribute contract:
//!
//! ```toml
//! namespace = "rs"
//! debug = false
//!
//! [classes]
//! open = "is-open"
//! scroll_locked = "is-modal-open"
//!
//! [modal]
//! overlay_fallback = ".modal_overlay"
//! content_fallback = ".modal_content"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Attribute namespace: attributes are named `data-{namespace}-…` and
    /// emitted events `{namespace}:modal:open` etc.
    pub namespace: String,
    /// Route registry debug messages through `tracing::debug!`.
    pub debug: bool,
    pub classes: ClassNames,
    pub modal: ModalConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: "rs".to_string(),
            debug: false,
            classes: ClassNames::default(),
            modal: ModalConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    /// Open state on modals, accordion items, heads and panels.
    pub open: String,
    /// Added to the root element while the page scroll is locked.
    pub scroll_locked: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            open: "is-open".to_string(),
            scroll_locked: "is-modal-open".to_string(),
        }
    }
}

/// Class-based fallbacks for markup that predates the data attributes.
/// Empty string disables the fallback.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
    pub overlay_fallback: String,
    pub content_fallback: String,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            overlay_fallback: ".modal_overlay".to_string(),
            content_fallback: ".modal_content".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let ns = &self.namespace;
        let valid = !ns.is_empty()
            && ns
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if valid {
            Ok(())
        } else {
            Err(ConfigError::Namespace(ns.clone()))
        }
    }

    pub fn attribute_names(&self) -> AttributeNames {
        AttributeNames::for_namespace(&self.namespace)
    }
}

// =============================================================================
// Attribute names
// =============================================================================

/// Every attribute of the declarative contract, resolved for one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeNames {
    pub modal: String,
    pub modal_open: String,
    pub modal_target: String,
    pub modal_close: String,
    pub modal_overlay: String,
    pub modal_content: String,
    pub modal_lock: String,
    pub accordion_item: String,
    pub accordion_head: String,
    pub accordion_panel: String,
    pub accordion_offset: String,
    pub accordion_trigger: String,
    pub accordion_group: String,
    pub accordion_open: String,
    pub accordion_ignore: String,
}

impl AttributeNames {
    pub fn for_namespace(ns: &str) -> Self {
        let attr = |suffix: &str| format!("data-{ns}-{suffix}");
        Self {
            modal: attr("modal"),
            modal_open: attr("modal-open"),
            modal_target: attr("modal-target"),
            modal_close: attr("modal-close"),
            modal_overlay: attr("modal-overlay"),
            modal_content: attr("modal-content"),
            modal_lock: attr("modal-lock"),
            accordion_item: attr("accordion-item"),
            accordion_head: attr("accordion-head"),
            accordion_panel: attr("accordion-panel"),
            accordion_offset: attr("accordion-offset"),
            accordion_trigger: attr("accordion-trigger"),
            accordion_group: attr("accordion-group"),
            accordion_open: attr("accordion-open"),
            accordion_ignore: attr("accordion-ignore"),
        }
    }
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self::for_namespace("rs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_toml_str(
            r#"
            namespace = "ui"
            [classes]
            open = "active"
            "#,
        )
        .unwrap();
        assert_eq!(config.namespace, "ui");
        assert_eq!(config.classes.open, "active");
        assert_eq!(config.classes.scroll_locked, "is-modal-open");
        assert_eq!(config.modal, ModalConfig::default());
        assert_eq!(config.attribute_names().modal_open, "data-ui-modal-open");
    }

    #[test]
    fn test_invalid_namespace_rejected() {
        let err = Config::from_toml_str(r#"namespace = "Bad NS""#).unwrap_err();
        assert!(matches!(err, ConfigError::Namespace(ns) if ns == "Bad NS"));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(matches!(
            Config::from_toml_str("namespace = "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_yields_default() {
        let config = Config::load("/nonexistent/spark-widgets/config.toml").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_attribute_names() {
        let names = AttributeNames::default();
        assert_eq!(names.modal, "data-rs-modal");
        assert_eq!(names.accordion_ignore, "data-rs-accordion-ignore");
    }
}
