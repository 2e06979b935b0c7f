//! Configuration for new documents and PDF export.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A4 width in points.
pub const A4_WIDTH: f64 = 595.28;
/// A4 height in points.
pub const A4_HEIGHT: f64 = 841.89;
/// 15 mm expressed in points.
pub const DEFAULT_MARGIN: f64 = 42.52;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Values used when a fresh document is created.
    pub defaults: DocumentDefaults,

    /// PDF export settings.
    pub export: ExportSettings,
}

impl Config {
    /// Parse a JSON configuration. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.defaults.validate()?;
        config.export.validate()?;
        Ok(config)
    }
}

/// Longest accepted due date offset, in days.
pub const MAX_DUE_IN_DAYS: i64 = 3650;

/// Defaults applied to an empty document and to newly added items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentDefaults {
    /// Tax rate in percent for new line items.
    pub default_tax_rate: f64,

    /// Due date offset from the issue date, in days.
    pub due_in_days: i64,

    /// Pre-filled payment terms.
    pub payment_terms: String,

    /// Pre-filled footer notes.
    pub notes: String,
}

impl Default for DocumentDefaults {
    fn default() -> Self {
        Self {
            default_tax_rate: 20.0,
            due_in_days: 30,
            payment_terms: "Paiement à réception de facture".to_string(),
            notes: "Auto-entrepreneur non soumis à la TVA. TVA non applicable, art. 293B du CGI."
                .to_string(),
        }
    }
}

impl DocumentDefaults {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0..=MAX_DUE_IN_DAYS).contains(&self.due_in_days) {
            return Err(ConfigError::Invalid(format!(
                "dueInDays {} is outside 0..={}",
                self.due_in_days, MAX_DUE_IN_DAYS
            )));
        }
        if !self.default_tax_rate.is_finite() {
            return Err(ConfigError::Invalid("defaultTaxRate must be a number".to_string()));
        }
        Ok(())
    }
}

/// Page geometry and output options for exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportSettings {
    /// Page width in points.
    pub page_width: f64,

    /// Page height in points.
    pub page_height: f64,

    /// Margin applied on all four sides, in points.
    pub margin: f64,

    /// Flate-compress page content streams.
    pub compress: bool,

    /// Value of the PDF `Creator` info entry.
    pub creator: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin: DEFAULT_MARGIN,
            compress: true,
            creator: "invoice-core".to_string(),
        }
    }
}

impl ExportSettings {
    /// Horizontal space between the margins.
    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.content_width() < 200.0 || self.page_height - 2.0 * self.margin < 200.0 {
            return Err(ConfigError::Invalid(format!(
                "page {}x{} with margin {} leaves no room for content",
                self.page_width, self.page_height, self.margin
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.defaults.default_tax_rate, 20.0);
        assert_eq!(config.defaults.due_in_days, 30);
        assert!(config.export.compress);
    }

    #[test]
    fn partial_json_overrides_only_given_keys() {
        let config =
            Config::from_json(r#"{"export": {"compress": false}, "defaults": {"dueInDays": 45}}"#)
                .unwrap();
        assert!(!config.export.compress);
        assert_eq!(config.export.page_width, A4_WIDTH);
        assert_eq!(config.defaults.due_in_days, 45);
        assert_eq!(config.defaults.default_tax_rate, 20.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            Config::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn out_of_range_due_offset_is_rejected() {
        for json in [
            r#"{"defaults": {"dueInDays": 100000000000000}}"#,
            r#"{"defaults": {"dueInDays": -1}}"#,
        ] {
            assert!(matches!(Config::from_json(json), Err(ConfigError::Invalid(_))));
        }
        let config = Config::from_json(r#"{"defaults": {"dueInDays": 3650}}"#).unwrap();
        assert_eq!(config.defaults.due_in_days, MAX_DUE_IN_DAYS);
    }

    #[test]
    fn tiny_page_is_rejected() {
        let result = Config::from_json(r#"{"export": {"pageWidth": 100}}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
