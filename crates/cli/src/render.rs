use std::fmt::Write as _;

use eraline_core::LayoutResult;
use eraline_protocol::{TickPlan, Year, format_year};

use crate::locate::Location;

const BAR: char = '─';

/// Draw every row as a line of bars, scaled so the whole timeline fits in
/// `columns` characters. Bar starts carry the entity name when it fits.
pub fn render_rows(result: &LayoutResult, columns: usize) -> String {
    let mut out = String::new();
    if result.is_empty() {
        out.push_str("(no entities)\n");
        return out;
    }

    let columns = columns.max(20);
    let scale = columns as f64 / result.timeline_width_px;
    let mut rows = vec![vec![' '; columns]; result.rows_count];

    for item in &result.items {
        let Some(row) = rows.get_mut(item.row) else {
            continue;
        };
        let start = ((item.left_x * scale).floor() as usize).min(columns - 1);
        let end = ((item.right_x() * scale).ceil() as usize).clamp(start + 1, columns);
        let cells = &mut row[start..end];
        cells.fill(BAR);
        for (cell, ch) in cells.iter_mut().zip(item.entity.name.chars()) {
            *cell = ch;
        }
    }

    for row in rows {
        let line: String = row.into_iter().collect();
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

/// One line per laid-out entity: row, pixel extent, years and name.
pub fn render_listing(result: &LayoutResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} entities in {} rows, timeline {:.0}px, row {:.1}px + {:.1}px gap",
        result.items.len(),
        result.rows_count,
        result.timeline_width_px,
        result.row_height_px,
        result.row_gap_px,
    );
    if let Some(metrics) = &result.metrics {
        let _ = writeln!(
            out,
            "years {}..{}, inner {:.0}px, {:.3} px/year (scale {:.2}), {:.2} entities/century",
            metrics.min_year,
            metrics.max_year,
            metrics.inner_width_px(),
            metrics.active_rate,
            metrics.scale_factor,
            metrics.density_per_century,
        );
    }
    for id in &result.skipped {
        let _ = writeln!(out, "skipped {id}");
    }
    for item in &result.items {
        let _ = writeln!(
            out,
            "{:>3} {:>9.1} {:>8.1}  {:<22} {}",
            item.row,
            item.left_x,
            item.width_px,
            item.years_label,
            item.entity.name,
        );
    }
    out
}

pub fn render_ticks(plan: &TickPlan) -> String {
    let mut out = String::new();
    match plan.minor_step {
        Some(minor) => {
            let _ = writeln!(out, "major every {} years, minor every {minor}", plan.major_step);
        }
        None => {
            let _ = writeln!(out, "major every {} years", plan.major_step);
        }
    }
    for tick in plan.majors() {
        let label = tick.label.as_deref().unwrap_or_default();
        let _ = writeln!(out, "{:>9.1}  {label}", tick.x);
    }
    let _ = writeln!(out, "{} minor ticks", plan.minors().count());
    out
}

pub fn render_location(location: &Location) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "year {} (≈{:.1}) at x {:.1}px",
        format_year(location.year.round() as Year),
        location.year,
        location.x,
    );
    let _ = writeln!(out, "scroll to {:.1}px", location.scroll_left);
    let _ = writeln!(out, "Visible period: {}", location.visible_period.label());
    if let Some(era) = &location.nearest_era {
        let _ = writeln!(out, "nearest era: {} ({})", era.label, format_year(era.year));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use eraline_core::navigation::{Era, VisiblePeriod};
    use eraline_core::{LayoutConfig, LayoutParams, layout_entities};
    use eraline_protocol::{Entity, Lifespan};

    fn layout(entities: &[Entity]) -> LayoutResult {
        let params = LayoutParams::new(140.0, 1000.0, 2026);
        layout_entities(entities, &params, &LayoutConfig::default()).expect("layout")
    }

    #[test]
    fn empty_layout_renders_placeholder() {
        assert_eq!(render_rows(&layout(&[]), 80), "(no entities)\n");
    }

    #[test]
    fn overlapping_entities_get_separate_lines() {
        let result = layout(&[
            Entity::new("a", "Ada", "science", 1815, Lifespan::Fixed(1852)),
            Entity::new("b", "Babbage", "science", 1791, Lifespan::Fixed(1871)),
        ]);
        let chart = render_rows(&result, 80);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), result.rows_count);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Babbage"));
        assert!(lines[1].contains("Ada"));
    }

    #[test]
    fn listing_has_one_line_per_item() {
        let result = layout(&[
            Entity::new("a", "Ada", "science", 1815, Lifespan::Fixed(1852)),
            Entity::new("g", "Goodall", "science", 1934, Lifespan::Ongoing),
        ]);
        let listing = render_listing(&result);
        assert_eq!(listing.lines().count(), 2 + result.items.len());
        assert!(listing.contains("1934 – present"));

        let inner = result.metrics.as_ref().map(|m| m.inner_width_px()).expect("metrics");
        assert!(listing.contains(&format!("inner {inner:.0}px")));
    }

    #[test]
    fn location_lists_period_and_era() {
        let location = Location {
            year: -427.4,
            x: 56.0,
            scroll_left: 0.0,
            visible_period: VisiblePeriod { from: -427, to: -300 },
            nearest_era: Some(Era::new("ancient", "Antiquity", -500)),
        };
        let text = render_location(&location);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "year 427 BCE (≈-427.4) at x 56.0px",
                "scroll to 0.0px",
                "Visible period: 427 BCE - 300 BCE",
                "nearest era: Antiquity (500 BCE)",
            ]
        );
    }
}
