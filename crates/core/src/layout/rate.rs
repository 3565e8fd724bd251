use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;

/// Pixels-per-year rates for active and gap time, before scale fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    pub zoom_factor: f64,
    pub density_per_century: f64,
    pub active: f64,
    pub gap: f64,
}

/// Zoom slider value normalized against the reference zoom, floored.
pub fn zoom_factor(zoom: f64, config: &LayoutConfig) -> f64 {
    (zoom / config.zoom_reference).max(config.min_zoom_factor)
}

/// Entities per century of covered time.
pub fn density_per_century(count: usize, year_range: f64) -> f64 {
    count as f64 / (year_range / 100.0).max(1.0)
}

/// Derive active and gap rates.
///
/// Denser datasets get a higher active rate up to `density_rate_cap`. Gap
/// time is a capped fraction of the active rate, so it is always
/// compressed, and less so for dense datasets.
pub fn compute_rates(zoom: f64, count: usize, year_range: f64, config: &LayoutConfig) -> Rates {
    let zoom_factor = zoom_factor(zoom, config);
    let density = density_per_century(count, year_range);

    let density_boost = config
        .density_rate_cap
        .min(0.9 + density.sqrt() * config.density_rate_gain);
    let active = config.base_rate * zoom_factor * density_boost;

    let gap_fraction = config
        .gap_compression_cap
        .min(config.gap_compression_base + density * config.gap_density_gain);
    let gap = active * gap_fraction;

    Rates {
        zoom_factor,
        density_per_century: density,
        active,
        gap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_factor_is_floored() {
        let config = LayoutConfig::default();
        assert!((zoom_factor(140.0, &config) - 1.0).abs() < 1e-12);
        assert!((zoom_factor(10.0, &config) - 0.74).abs() < 1e-12);
    }

    #[test]
    fn density_uses_at_least_one_century() {
        assert!((density_per_century(3, 20.0) - 3.0).abs() < 1e-12);
        assert!((density_per_century(3, 300.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reference_values() {
        let config = LayoutConfig::default();
        // density 1 => boost 1.07, gap fraction 0.23
        let rates = compute_rates(140.0, 1, 100.0, &config);
        assert!((rates.active - 1.14 * 1.07).abs() < 1e-9);
        assert!((rates.gap - rates.active * 0.23).abs() < 1e-9);
    }

    #[test]
    fn higher_zoom_never_lowers_active_rate() {
        let config = LayoutConfig::default();
        let mut previous = 0.0;
        for zoom in (40..=400).step_by(20) {
            let rates = compute_rates(f64::from(zoom), 25, 2500.0, &config);
            assert!(rates.active >= previous);
            previous = rates.active;
        }
    }

    #[test]
    fn gap_rate_is_compressed_and_capped() {
        let config = LayoutConfig::default();
        for count in [1, 10, 100, 10_000] {
            let rates = compute_rates(140.0, count, 100.0, &config);
            assert!(rates.gap < rates.active);
            assert!(rates.gap <= rates.active * config.gap_compression_cap + 1e-12);
            assert!(rates.active <= config.base_rate * config.density_rate_cap + 1e-12);
        }
    }
}
