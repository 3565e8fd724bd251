use eraline_protocol::Piece;

use super::rate::Rates;
use crate::config::LayoutConfig;

/// Outcome of the scale-fit pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Fit {
    pub pieces: Vec<Piece>,
    pub scale_factor: f64,
    /// Width of the piece table after scaling, at least 1px.
    pub inner_width_px: f64,
    /// Full timeline width, axis padding included, never below the viewport.
    pub timeline_width_px: f64,
}

/// Allowed inner width band for a viewport.
///
/// The lower bound fills the viewport; the upper bound grows with zoom and
/// density so dense or zoomed-in datasets may scroll.
pub fn target_band(viewport_width: f64, rates: &Rates, config: &LayoutConfig) -> (f64, f64) {
    let padding = config.axis_padding_px * 2.0;
    let min_target = (viewport_width - padding).max(config.min_inner_width_px);
    let allowance = 1.25_f64.max(
        1.2 + rates.zoom_factor * 1.35 + (rates.density_per_century * 0.14).min(1.5),
    );
    let max_target = viewport_width * allowance - padding;
    (min_target, max_target)
}

/// Scale factor needed to bring `raw_inner` into the band, clamped to the
/// configured distortion limits.
pub fn scale_factor(raw_inner: f64, band: (f64, f64), config: &LayoutConfig) -> f64 {
    let (min_target, max_target) = band;
    let factor = if raw_inner < min_target {
        min_target / raw_inner
    } else if raw_inner > max_target {
        max_target / raw_inner
    } else {
        1.0
    };
    factor.clamp(config.min_scale_factor, config.max_scale_factor)
}

/// Rescale every piece by one global factor so the rendered width lands in
/// a usable band for `viewport_width`.
pub fn fit_to_viewport(
    pieces: &[Piece],
    viewport_width: f64,
    rates: &Rates,
    config: &LayoutConfig,
) -> Fit {
    let raw_inner = pieces.last().map_or(0.0, |p| p.end_x).max(1.0);
    let band = target_band(viewport_width, rates, config);
    let scale_factor = scale_factor(raw_inner, band, config);

    let pieces: Vec<Piece> = pieces.iter().map(|p| p.scaled(scale_factor)).collect();
    let inner_width_px = (raw_inner * scale_factor).max(1.0);
    let timeline_width_px =
        viewport_width.max((inner_width_px + config.axis_padding_px * 2.0).ceil());

    log::debug!(
        "scale fit: raw_inner={raw_inner:.1} band=({:.1}, {:.1}) factor={scale_factor:.3} width={timeline_width_px}",
        band.0,
        band.1,
    );

    Fit {
        pieces,
        scale_factor,
        inner_width_px,
        timeline_width_px,
    }
}
