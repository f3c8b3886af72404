//! Reveal configuration
//!
//! `RevealConfig` is the serde-facing shape (plain strings, loadable from
//! TOML). `RevealSettings` is the validated form the controller runs on.
//!
//! ```toml
//! selector = ".animate-on-scroll"
//! revealed_class = "animated"
//! root_margin = "0px 0px -50px 0px"
//! threshold = 0.1
//! ```

use std::fs;
use std::path::Path;

use anyhow::Context;
use reveal_core::Selector;
use reveal_observer::{ObserverOptions, RootMargin};
use serde::{Deserialize, Serialize};

use crate::error::{RevealError, Result};

/// Class marking elements that should fade in
pub const DEFAULT_TARGET_CLASS: &str = "animate-on-scroll";

/// Class added once an element has been revealed
pub const DEFAULT_REVEALED_CLASS: &str = "animated";

/// Bottom edge pulled 50px up: elements count once they clear it
pub const DEFAULT_ROOT_MARGIN: &str = "0px 0px -50px 0px";

/// At least 10% of the element must be visible
pub const DEFAULT_THRESHOLD: f32 = 0.1;

/// Serializable reveal configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Selector for target elements
    pub selector: String,
    /// Class added when a target is revealed
    pub revealed_class: String,
    /// CSS margin shorthand applied to the viewport
    pub root_margin: String,
    /// Visible ratio at which a target counts as intersecting
    pub threshold: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: format!(".{}", DEFAULT_TARGET_CLASS),
            revealed_class: DEFAULT_REVEALED_CLASS.to_string(),
            root_margin: DEFAULT_ROOT_MARGIN.to_string(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl RevealConfig {
    /// Parse from TOML text; missing keys take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|err| RevealError::Config(err.to_string()))
    }

    /// Validate into runnable settings
    pub fn settings(&self) -> Result<RevealSettings> {
        RevealSettings::try_from(self)
    }
}

/// Validated controller settings
#[derive(Debug, Clone, PartialEq)]
pub struct RevealSettings {
    pub selector: Selector,
    pub revealed_class: String,
    pub options: ObserverOptions,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            selector: Selector::class(DEFAULT_TARGET_CLASS),
            revealed_class: DEFAULT_REVEALED_CLASS.to_string(),
            options: ObserverOptions::new()
                .with_root_margin(RootMargin::bottom_px(-50.0))
                .with_threshold_clamped(DEFAULT_THRESHOLD),
        }
    }
}

impl TryFrom<&RevealConfig> for RevealSettings {
    type Error = RevealError;

    fn try_from(config: &RevealConfig) -> Result<Self> {
        let selector = Selector::parse(&config.selector)?;

        let class = config.revealed_class.trim();
        if class.is_empty() || class.chars().any(char::is_whitespace) {
            return Err(RevealError::Config(format!(
                "revealed_class must be a single class name, got {:?}",
                config.revealed_class
            )));
        }

        let options = ObserverOptions::new()
            .with_root_margin(RootMargin::parse(&config.root_margin)?)
            .with_threshold(config.threshold)?;

        Ok(Self {
            selector,
            revealed_class: class.to_string(),
            options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_default_settings() {
        let settings = RevealConfig::default().settings().unwrap();
        assert_eq!(settings, RevealSettings::default());
        assert_eq!(settings.options.thresholds(), &[0.1]);
        assert_eq!(settings.options.root_margin, RootMargin::bottom_px(-50.0));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = RevealConfig::from_toml_str("threshold = 0.25\n").unwrap();
        assert_eq!(config.threshold, 0.25);
        assert_eq!(config.selector, ".animate-on-scroll");
        assert_eq!(config.revealed_class, "animated");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = RevealConfig {
            selector: ".fade.card".to_string(),
            ..RevealConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(RevealConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_selector = RevealConfig {
            selector: "div > .x".to_string(),
            ..RevealConfig::default()
        };
        assert!(matches!(bad_selector.settings(), Err(RevealError::Selector(_))));

        let bad_threshold = RevealConfig {
            threshold: 1.2,
            ..RevealConfig::default()
        };
        assert!(matches!(bad_threshold.settings(), Err(RevealError::Observer(_))));

        let nan_margin = RevealConfig {
            root_margin: "0px 0px NaNpx 0px".to_string(),
            ..RevealConfig::default()
        };
        assert!(matches!(nan_margin.settings(), Err(RevealError::Observer(_))));

        let bad_class = RevealConfig {
            revealed_class: "is visible".to_string(),
            ..RevealConfig::default()
        };
        assert!(matches!(bad_class.settings(), Err(RevealError::Config(_))));

        assert!(matches!(
            RevealConfig::from_toml_str("threshold = \"high\""),
            Err(RevealError::Toml(_))
        ));
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = RevealConfig::load("/nonexistent/reveal.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/reveal.toml"));
    }
}
