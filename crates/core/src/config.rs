use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tick_steps must be non-empty and strictly ascending")]
    TickSteps,
    #[error("scale factor range is inverted or non-positive: [{0}, {1}]")]
    ScaleRange(f64, f64),
    #[error("{0} must be finite and positive")]
    NonPositive(&'static str),
}

/// What to do with an entity whose resolved end year precedes its birth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Drop the record, warn, and report its id in the layout result.
    #[default]
    Skip,
    /// Fail the whole batch.
    Reject,
}

/// Tunable constants of the layout pipeline.
///
/// Every field has a default; a JSON config only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Entities starting within this many years of the current active
    /// segment's end are merged into it.
    pub join_threshold_years: i32,

    /// Zoom value that maps to a zoom factor of 1.
    pub zoom_reference: f64,
    pub min_zoom_factor: f64,
    /// Narrower viewports are laid out as if they were this wide.
    pub min_viewport_px: f64,

    pub base_rate: f64,
    pub density_rate_cap: f64,
    pub density_rate_gain: f64,
    pub gap_compression_base: f64,
    pub gap_compression_cap: f64,
    pub gap_density_gain: f64,

    pub axis_padding_px: f64,
    pub min_inner_width_px: f64,
    pub min_scale_factor: f64,
    pub max_scale_factor: f64,

    pub base_row_height_px: f64,
    pub min_row_height_px: f64,
    pub max_row_height_px: f64,
    pub row_gap_px: f64,
    pub min_row_gap_px: f64,
    pub min_bar_px: f64,
    pub empty_timeline_width_px: f64,

    /// Ascending candidate tick steps in years.
    pub tick_steps: Vec<i32>,
    pub min_major_spacing_px: f64,
    pub min_minor_spacing_px: f64,
    /// Emitted ticks of one kind closer than this are dropped.
    pub major_separation_px: f64,
    pub minor_separation_px: f64,

    pub validation: ValidationPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            join_threshold_years: 34,
            zoom_reference: 140.0,
            min_zoom_factor: 0.74,
            min_viewport_px: 760.0,
            base_rate: 1.14,
            density_rate_cap: 1.58,
            density_rate_gain: 0.17,
            gap_compression_base: 0.22,
            gap_compression_cap: 0.36,
            gap_density_gain: 0.01,
            axis_padding_px: 56.0,
            min_inner_width_px: 620.0,
            min_scale_factor: 0.55,
            max_scale_factor: 2.6,
            base_row_height_px: 56.0,
            min_row_height_px: 46.0,
            max_row_height_px: 62.0,
            row_gap_px: 10.0,
            min_row_gap_px: 7.0,
            min_bar_px: 86.0,
            empty_timeline_width_px: 640.0,
            tick_steps: vec![5, 10, 25, 50, 100, 200, 500],
            min_major_spacing_px: 76.0,
            min_minor_spacing_px: 36.0,
            major_separation_px: 70.0,
            minor_separation_px: 28.0,
            validation: ValidationPolicy::Skip,
        }
    }
}

impl LayoutConfig {
    /// Parse a (partial) JSON config and validate it.
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_steps.is_empty()
            || self.tick_steps.windows(2).any(|w| w[0] >= w[1])
            || self.tick_steps[0] <= 0
        {
            return Err(ConfigError::TickSteps);
        }
        if !(self.min_scale_factor > 0.0 && self.min_scale_factor <= self.max_scale_factor) {
            return Err(ConfigError::ScaleRange(
                self.min_scale_factor,
                self.max_scale_factor,
            ));
        }
        for (name, value) in [
            ("zoom_reference", self.zoom_reference),
            ("base_rate", self.base_rate),
            ("min_viewport_px", self.min_viewport_px),
            ("min_inner_width_px", self.min_inner_width_px),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive(name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = LayoutConfig::from_json(br#"{"join_threshold_years": 10, "validation": "reject"}"#);
        let Ok(config) = config else {
            panic!("config should parse");
        };
        assert_eq!(config.join_threshold_years, 10);
        assert_eq!(config.validation, ValidationPolicy::Reject);
        assert_eq!(config.tick_steps, LayoutConfig::default().tick_steps);
    }

    #[test]
    fn rejects_unsorted_tick_steps() {
        let config = LayoutConfig {
            tick_steps: vec![10, 5],
            ..LayoutConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::TickSteps)));
    }

    #[test]
    fn rejects_inverted_scale_range() {
        let config = LayoutConfig {
            min_scale_factor: 3.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ScaleRange(..))));
    }
}
