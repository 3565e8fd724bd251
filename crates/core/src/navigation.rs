//! Scroll targets and readouts derived from layout metrics.

use eraline_protocol::{LaidOutEntity, Year, format_year};
use serde::{Deserialize, Serialize};

use crate::layout::Metrics;

/// A named anchor year for "jump to era" controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Era {
    pub id: String,
    pub label: String,
    pub year: Year,
}

impl Era {
    pub fn new(id: impl Into<String>, label: impl Into<String>, year: Year) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            year,
        }
    }
}

pub fn default_eras() -> Vec<Era> {
    vec![
        Era::new("ancient", "Antiquity", -500),
        Era::new("middle-ages", "Middle Ages", 900),
        Era::new("renaissance", "Renaissance", 1500),
        Era::new("modern", "Modern era", 1800),
        Era::new("twentieth", "20th century", 1930),
        Era::new("today", "Present day", 2005),
    ]
}

/// Scroll offset that centres `year` (clamped to the data range).
pub fn scroll_target_for_year(metrics: &Metrics, year: f64, viewport_width_px: f64) -> f64 {
    let x = metrics.year_to_x(metrics.clamp_year(year));
    (x - viewport_width_px / 2.0).max(0.0)
}

/// Scroll offset that centres a laid-out bar.
pub fn scroll_target_for_item(item: &LaidOutEntity, viewport_width_px: f64) -> f64 {
    (item.center_x() - viewport_width_px / 2.0).max(0.0)
}

/// Year interval currently inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisiblePeriod {
    pub from: Year,
    pub to: Year,
}

impl VisiblePeriod {
    pub fn label(&self) -> String {
        format!("{} - {}", format_year(self.from), format_year(self.to))
    }
}

pub fn visible_period(metrics: &Metrics, scroll_left: f64, viewport_width_px: f64) -> VisiblePeriod {
    let start = metrics.x_to_year(scroll_left);
    let end = metrics.x_to_year(scroll_left + viewport_width_px);
    VisiblePeriod {
        from: round_year(start.max(f64::from(metrics.min_year))),
        to: round_year(end.min(f64::from(metrics.max_year))),
    }
}

/// Era closest to the year at the centre of the viewport.
pub fn nearest_era<'a>(
    eras: &'a [Era],
    metrics: &Metrics,
    scroll_left: f64,
    viewport_width_px: f64,
) -> Option<&'a Era> {
    let center_year = metrics.x_to_year(scroll_left + viewport_width_px / 2.0);
    let mut nearest: Option<(&Era, f64)> = None;
    for era in eras {
        let distance = (f64::from(era.year) - center_year).abs();
        if nearest.is_none_or(|(_, best)| distance < best) {
            nearest = Some((era, distance));
        }
    }
    nearest.map(|(era, _)| era)
}

/// Round half up, so `-2.5` becomes `-2`.
fn round_year(year: f64) -> Year {
    (year + 0.5).floor() as Year
}
