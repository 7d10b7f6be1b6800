//! Dashboard settings.

use crate::format::NumberFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors that can occur while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// High-level autorouter presets to balance speed vs. quality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoutingMode {
    /// Fewer passes, quicker result
    #[serde(rename = "fast")]
    Fast,
    /// Default trade-off between speed and quality
    #[serde(rename = "balanced")]
    #[default]
    Balanced,
    /// More passes, better result
    #[serde(rename = "quality")]
    Quality,
}

impl RoutingMode {
    /// Parse a user-supplied mode name.
    ///
    /// `None` stays `None`. Unrecognized names fall back to
    /// [`RoutingMode::Balanced`]; `"slow"` is accepted as an alias of
    /// [`RoutingMode::Quality`].
    pub fn parse(value: Option<&str>) -> Option<Self> {
        value.map(|v| match v.trim().to_lowercase().as_str() {
            "fast" => RoutingMode::Fast,
            "quality" | "slow" => RoutingMode::Quality,
            _ => RoutingMode::Balanced,
        })
    }

    /// Lowercase name, as used in settings files.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingMode::Fast => "fast",
            RoutingMode::Balanced => "balanced",
            RoutingMode::Quality => "quality",
        }
    }
}

impl std::str::FromStr for RoutingMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(Some(s)).unwrap_or_default())
    }
}

impl std::fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for the routing dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Locale tag used for number grouping (e.g. "en", "de-CH")
    pub locale: String,

    /// Drop pass and counter updates that arrive after a run finished
    pub suppress_after_finish: bool,

    /// How often a live display refreshes the elapsed timer
    pub tick_interval_ms: u64,

    /// Router preset, shown in the stage label
    pub routing_mode: RoutingMode,

    /// Configured maximum number of passes
    pub max_passes: i64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            suppress_after_finish: true,
            tick_interval_ms: 1000,
            routing_mode: RoutingMode::default(),
            max_passes: 100,
        }
    }
}

impl DashboardConfig {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&content)?;
        tracing::debug!("Loaded dashboard config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Integer format for the configured locale.
    pub fn number_format(&self) -> NumberFormat {
        NumberFormat::for_locale(&self.locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_routing_mode() {
        assert_eq!(RoutingMode::parse(None), None);
        assert_eq!(RoutingMode::parse(Some("fast")), Some(RoutingMode::Fast));
        assert_eq!(RoutingMode::parse(Some("  FAST ")), Some(RoutingMode::Fast));
        assert_eq!(RoutingMode::parse(Some("quality")), Some(RoutingMode::Quality));
        assert_eq!(RoutingMode::parse(Some("Slow")), Some(RoutingMode::Quality));
        assert_eq!(RoutingMode::parse(Some("balanced")), Some(RoutingMode::Balanced));
        assert_eq!(RoutingMode::parse(Some("turbo")), Some(RoutingMode::Balanced));
        assert_eq!(RoutingMode::parse(Some("")), Some(RoutingMode::Balanced));
    }

    #[test]
    fn test_routing_mode_serde_names() {
        let json = serde_json::to_string(&RoutingMode::Quality).unwrap();
        assert_eq!(json, "\"quality\"");
        let mode: RoutingMode = serde_json::from_str("\"fast\"").unwrap();
        assert_eq!(mode, RoutingMode::Fast);
    }

    #[test]
    fn test_from_str_never_fails() {
        let mode: RoutingMode = "whatever".parse().unwrap();
        assert_eq!(mode, RoutingMode::Balanced);
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"locale": "de", "routing_mode": "fast"}}"#).unwrap();

        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.locale, "de");
        assert_eq!(config.routing_mode, RoutingMode::Fast);
        assert!(config.suppress_after_finish);
        assert_eq!(config.max_passes, 100);
        assert_eq!(config.number_format().format(1234), "1.234");
    }

    #[test]
    fn test_load_missing_file() {
        let result = DashboardConfig::load("/nonexistent/routeview.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let result = DashboardConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }
}
