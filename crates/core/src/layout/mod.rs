//! The timeline layout pipeline.
//!
//! ```text
//!   entities ─▶ segment ─▶ rate ─▶ mapper ─▶ fit ─▶ rows ─▶ LayoutResult
//!                                              └──────▶ ticks ─▶ TickPlan
//! ```
//!
//! Every call recomputes from scratch; nothing is cached between calls.

pub mod fit;
pub mod mapper;
pub mod rate;
pub mod rows;
pub mod segment;
pub mod ticks;

use eraline_protocol::{Entity, LaidOutEntity, Piece, Segment, SharedStr, Year};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{LayoutConfig, ValidationPolicy};
use mapper::PiecewiseMap;
use rate::Rates;
use rows::RowSizing;

pub use ticks::select_ticks;

/// Share of the axis padding kept to the right of the rightmost bar.
const TRAILING_PADDING_SHARE: f64 = 0.6;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid {name}: {value}")]
    InvalidParams { name: &'static str, value: f64 },
    #[error("entity {id} ends ({end}) before it begins ({birth})")]
    InvertedLifespan { id: SharedStr, birth: Year, end: Year },
}

/// Per-call inputs supplied by the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    /// User zoom value; `LayoutConfig::zoom_reference` is 1×.
    pub zoom: f64,
    pub viewport_width_px: f64,
    /// Year that ongoing lifespans run up to.
    pub current_year: Year,
}

impl LayoutParams {
    pub fn new(zoom: f64, viewport_width_px: f64, current_year: Year) -> Self {
        Self {
            zoom,
            viewport_width_px,
            current_year,
        }
    }

    fn validate(&self) -> Result<(), LayoutError> {
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(LayoutError::InvalidParams {
                name: "zoom",
                value: self.zoom,
            });
        }
        if !(self.viewport_width_px.is_finite() && self.viewport_width_px >= 0.0) {
            return Err(LayoutError::InvalidParams {
                name: "viewport_width_px",
                value: self.viewport_width_px,
            });
        }
        Ok(())
    }
}

/// Year/pixel metrics of one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub min_year: Year,
    pub max_year: Year,
    /// `max_year - min_year`, at least 1. Wider than [`Year`] so any pair
    /// of years fits.
    pub year_range: i64,
    pub timeline_width_px: f64,
    /// Active rate after scale fitting, in px/year.
    pub active_rate: f64,
    pub density_per_century: f64,
    pub scale_factor: f64,
    /// Rates before scale fitting.
    pub raw_rates: Rates,
    map: PiecewiseMap,
}

impl Metrics {
    pub fn year_to_x(&self, year: f64) -> f64 {
        self.map.year_to_x(year)
    }

    pub fn x_to_year(&self, x: f64) -> f64 {
        self.map.x_to_year(x)
    }

    pub fn pieces(&self) -> &[Piece] {
        self.map.pieces()
    }

    pub fn inner_width_px(&self) -> f64 {
        self.map.inner_width_px()
    }

    pub fn clamp_year(&self, year: f64) -> f64 {
        year.clamp(f64::from(self.min_year), f64::from(self.max_year))
    }

    /// Active/gap partition of `[min_year, max_year]`, one per piece.
    pub fn segments(&self) -> Vec<Segment> {
        self.pieces()
            .iter()
            .map(|p| Segment {
                kind: p.kind,
                start: p.start_year,
                end: p.end_year,
            })
            .collect()
    }
}

/// Everything a renderer needs to place rows and bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub items: Vec<LaidOutEntity>,
    pub rows_count: usize,
    pub row_height_px: f64,
    pub row_gap_px: f64,
    pub timeline_width_px: f64,
    /// `None` when no entity survived filtering and validation.
    pub metrics: Option<Metrics>,
    /// Ids of entities dropped by [`ValidationPolicy::Skip`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SharedStr>,
}

impl LayoutResult {
    fn empty(config: &LayoutConfig, skipped: Vec<SharedStr>) -> Self {
        Self {
            items: Vec::new(),
            rows_count: 0,
            row_height_px: config.base_row_height_px,
            row_gap_px: config.row_gap_px,
            timeline_width_px: config.empty_timeline_width_px,
            metrics: None,
            skipped,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, id: &str) -> Option<&LaidOutEntity> {
        self.items.iter().find(|item| item.entity.id == id)
    }
}

/// Apply the validation policy and sort survivors stably by birth year.
fn prepare<'a>(
    entities: impl IntoIterator<Item = &'a Entity>,
    current_year: Year,
    policy: ValidationPolicy,
) -> Result<(Vec<&'a Entity>, Vec<SharedStr>), LayoutError> {
    let mut valid = Vec::new();
    let mut skipped = Vec::new();

    for entity in entities {
        if !entity.is_inverted(current_year) {
            valid.push(entity);
            continue;
        }
        let end = entity.end_year(current_year);
        match policy {
            ValidationPolicy::Reject => {
                return Err(LayoutError::InvertedLifespan {
                    id: entity.id.clone(),
                    birth: entity.birth_year,
                    end,
                });
            }
            ValidationPolicy::Skip => {
                log::warn!(
                    "skipping {}: ends ({end}) before it begins ({})",
                    entity.id,
                    entity.birth_year
                );
                skipped.push(entity.id.clone());
            }
        }
    }

    valid.sort_by_key(|e| e.birth_year);
    Ok((valid, skipped))
}

/// Compute year/pixel metrics for entities sorted by birth year.
///
/// Returns `None` for an empty slice. Entities must not be inverted.
pub fn build_metrics(
    sorted: &[&Entity],
    params: &LayoutParams,
    config: &LayoutConfig,
) -> Option<Metrics> {
    let current_year = params.current_year;
    let min_year = sorted.iter().map(|e| e.birth_year).min()?;
    let max_year = sorted.iter().map(|e| e.end_year(current_year)).max()?;
    let year_range = (i64::from(max_year) - i64::from(min_year)).max(1);

    let viewport_width = params.viewport_width_px.max(config.min_viewport_px);
    let rates = rate::compute_rates(params.zoom, sorted.len(), year_range as f64, config);

    let spans: Vec<(Year, Year)> = sorted
        .iter()
        .map(|e| (e.birth_year, e.end_year(current_year)))
        .collect();
    let segments = segment::build_active_segments(&spans, config.join_threshold_years);
    let pieces = mapper::build_pieces(&segments, min_year, max_year, &rates);
    let fit = fit::fit_to_viewport(&pieces, viewport_width, &rates, config);

    log::debug!(
        "metrics: years {min_year}..{max_year}, {} active segments, {} pieces, density {:.2}/century",
        segments.len(),
        fit.pieces.len(),
        rates.density_per_century,
    );

    let map = PiecewiseMap::new(
        fit.pieces,
        min_year,
        max_year,
        config.axis_padding_px,
        fit.inner_width_px,
    );

    Some(Metrics {
        min_year,
        max_year,
        year_range,
        timeline_width_px: fit.timeline_width_px,
        active_rate: rates.active * fit.scale_factor,
        density_per_century: rates.density_per_century,
        scale_factor: fit.scale_factor,
        raw_rates: rates,
        map,
    })
}

/// Lay out `entities` (any order) on one timeline.
///
/// Accepts a slice of entities or the borrowed output of an entity filter.
/// Never fails on an empty input; fails only on invalid params or, under
/// [`ValidationPolicy::Reject`], on an inverted lifespan.
pub fn layout_entities<'a>(
    entities: impl IntoIterator<Item = &'a Entity>,
    params: &LayoutParams,
    config: &LayoutConfig,
) -> Result<LayoutResult, LayoutError> {
    params.validate()?;
    let (sorted, skipped) = prepare(entities, params.current_year, config.validation)?;

    let Some(mut metrics) = build_metrics(&sorted, params, config) else {
        return Ok(LayoutResult::empty(config, skipped));
    };

    let sizing = RowSizing::new(metrics.density_per_century, params.zoom, config);
    let (items, rows_count) = rows::pack_rows(
        &sorted,
        &metrics.map,
        &sizing,
        params.current_year,
        config,
    );

    let far_right = items
        .iter()
        .map(LaidOutEntity::right_x)
        .fold(f64::NEG_INFINITY, f64::max);
    let timeline_width_px = metrics
        .timeline_width_px
        .max((far_right + config.axis_padding_px * TRAILING_PADDING_SHARE).ceil());
    metrics.timeline_width_px = timeline_width_px;

    log::debug!(
        "layout: {} items in {rows_count} rows, width {timeline_width_px}px",
        items.len()
    );

    Ok(LayoutResult {
        items,
        rows_count,
        row_height_px: sizing.row_height_px,
        row_gap_px: sizing.row_gap_px,
        timeline_width_px,
        metrics: Some(metrics),
        skipped,
    })
}
