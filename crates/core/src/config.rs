//! Enhancement configuration.
//!
//! Every field has a default, so an empty JSON object (or no config at all)
//! yields the stock page wiring. Overrides are partial: any section or field
//! left out keeps its default.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::result::Result;

/// Root configuration for all page behaviors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnhanceConfig {
    pub reveal: RevealConfig,
    pub counter: CounterConfig,
    pub nav: NavConfig,
    pub log: LogConfig,
}

/// Reveal-on-scroll settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Selector for elements that reveal on scroll
    pub selector: String,
    /// Class added once an element has been seen
    pub visible_class: String,
    /// Minimum visible fraction before an element counts as seen
    pub threshold: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".reveal".to_string(),
            visible_class: "visible".to_string(),
            threshold: 0.15,
        }
    }
}

/// Counter animation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CounterConfig {
    pub selector: String,
    /// Attribute holding the target integer
    pub attribute: String,
    /// Total animation time in milliseconds
    pub duration_ms: u32,
    /// Step used when the computed interval is zero
    pub fallback_step_ms: u32,
    /// Stop ticking once the element has left the document
    pub stop_when_detached: bool,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            selector: "[data-count]".to_string(),
            attribute: "data-count".to_string(),
            duration_ms: crate::counter::DEFAULT_DURATION_MS,
            fallback_step_ms: crate::counter::FALLBACK_STEP_MS,
            stop_when_detached: true,
        }
    }
}

/// Navigation toggle settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    pub toggle_selector: String,
    pub menu_selector: String,
    /// Selector for links inside the menu that close it
    pub link_selector: String,
    pub open_class: String,
    pub expanded_attribute: String,
    /// Also reset the expanded attribute when a link or outside click closes the menu
    pub sync_aria_on_close: bool,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            toggle_selector: ".nav-toggle".to_string(),
            menu_selector: ".nav".to_string(),
            link_selector: "a".to_string(),
            open_class: "open".to_string(),
            expanded_attribute: "aria-expanded".to_string(),
            sync_aria_on_close: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl LogConfig {
    /// Parse the configured level.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidLogLevel` if the level name is not recognized.
    pub fn level(&self) -> Result<tracing::Level> {
        self.level
            .parse::<tracing::Level>()
            .map_err(|_| Error::InvalidLogLevel {
                value: self.level.clone(),
            })
    }
}

impl EnhanceConfig {
    /// Parse and validate a JSON config document.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigParse` for malformed JSON or unknown fields, and
    /// the validation errors of [`EnhanceConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is outside `0.0..=1.0`, a duration is
    /// zero, or the log level is unknown.
    pub fn validate(&self) -> Result<()> {
        crate::reveal::Threshold::new(self.reveal.threshold)?;
        if self.counter.duration_ms == 0 {
            return Err(Error::InvalidDuration {
                field: "counter.duration_ms",
            });
        }
        if self.counter.fallback_step_ms == 0 {
            return Err(Error::InvalidDuration {
                field: "counter.fallback_step_ms",
            });
        }
        self.log.level()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_wiring() {
        let config = EnhanceConfig::default();
        assert_eq!(config.reveal.selector, ".reveal");
        assert_eq!(config.reveal.visible_class, "visible");
        assert!((config.reveal.threshold - 0.15).abs() < f64::EPSILON);
        assert_eq!(config.counter.attribute, "data-count");
        assert_eq!(config.counter.duration_ms, 1000);
        assert_eq!(config.counter.fallback_step_ms, 20);
        assert_eq!(config.nav.toggle_selector, ".nav-toggle");
        assert_eq!(config.nav.menu_selector, ".nav");
        assert_eq!(config.nav.expanded_attribute, "aria-expanded");
        assert!(!config.nav.sync_aria_on_close);
    }

    #[test]
    fn given_default_config_when_level_read_then_only_warnings_pass() -> Result<()> {
        let level = EnhanceConfig::default().log.level()?;
        assert_eq!(level, tracing::Level::WARN);
        assert!(tracing::Level::INFO > level);
        Ok(())
    }

    #[test]
    fn test_empty_json_yields_defaults() -> Result<()> {
        let config = EnhanceConfig::from_json("{}")?;
        assert_eq!(config, EnhanceConfig::default());
        Ok(())
    }

    #[test]
    fn test_partial_override_keeps_other_fields() -> Result<()> {
        let config =
            EnhanceConfig::from_json(r#"{"nav": {"sync_aria_on_close": true}, "log": {"level": "debug"}}"#)?;
        assert!(config.nav.sync_aria_on_close);
        assert_eq!(config.nav.open_class, "open");
        assert_eq!(config.log.level()?, tracing::Level::DEBUG);
        Ok(())
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = EnhanceConfig::from_json(r#"{"reveal": {"treshold": 0.3}}"#);
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let result = EnhanceConfig::from_json(r#"{"reveal": {"threshold": 1.2}}"#);
        assert!(matches!(result, Err(Error::InvalidThreshold { .. })));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let result = EnhanceConfig::from_json(r#"{"counter": {"duration_ms": 0}}"#);
        assert_eq!(
            result,
            Err(Error::InvalidDuration {
                field: "counter.duration_ms"
            })
        );
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let result = EnhanceConfig::from_json(r#"{"log": {"level": "loud"}}"#);
        assert!(matches!(result, Err(Error::InvalidLogLevel { .. })));
    }
}
