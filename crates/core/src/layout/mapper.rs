use eraline_protocol::{Piece, Segment, SegmentKind, Year};
use serde::{Deserialize, Serialize};

use super::rate::Rates;

/// Build the ordered piece table covering `[min_year, max_year]`.
///
/// Each active segment (clipped to the range) becomes an active piece; the
/// stretches before, between and after them become gap pieces. Zero-length
/// stretches produce nothing. If the range is a single year, one fallback
/// active piece at least 1px wide is returned so lookups always succeed.
pub fn build_pieces(
    segments: &[Segment],
    min_year: Year,
    max_year: Year,
    rates: &Rates,
) -> Vec<Piece> {
    let mut pieces = Vec::with_capacity(segments.len() * 2 + 1);
    let mut cursor_year = min_year;
    let mut cursor_x = 0.0;

    let mut push = |kind: SegmentKind, to: Year, cursor_year: &mut Year, cursor_x: &mut f64| {
        let rate = match kind {
            SegmentKind::Active => rates.active,
            SegmentKind::Gap => rates.gap,
        };
        let width = (f64::from(to) - f64::from(*cursor_year)) * rate;
        pieces.push(Piece {
            kind,
            start_year: *cursor_year,
            end_year: to,
            rate,
            start_x: *cursor_x,
            end_x: *cursor_x + width,
        });
        *cursor_x += width;
        *cursor_year = to;
    };

    for segment in segments {
        let start = segment.start.max(min_year);
        let end = segment.end.min(max_year);

        if start > cursor_year {
            push(SegmentKind::Gap, start, &mut cursor_year, &mut cursor_x);
        }
        if end > cursor_year {
            push(SegmentKind::Active, end, &mut cursor_year, &mut cursor_x);
        }
    }

    if cursor_year < max_year {
        push(SegmentKind::Gap, max_year, &mut cursor_year, &mut cursor_x);
    }

    if pieces.is_empty() {
        let year_range = (f64::from(max_year) - f64::from(min_year)).max(1.0);
        pieces.push(Piece {
            kind: SegmentKind::Active,
            start_year: min_year,
            end_year: max_year,
            rate: rates.active,
            start_x: 0.0,
            end_x: (year_range * rates.active).max(1.0),
        });
    }

    pieces
}

/// Piecewise-linear year ↔ x mapping over a piece table.
///
/// Forward and inverse lookups share the same table, so
/// `x_to_year(year_to_x(y)) == y` up to float rounding for any `y` in range.
/// Lookups are linear scans; piece counts stay small.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiecewiseMap {
    pieces: Vec<Piece>,
    min_year: Year,
    max_year: Year,
    axis_padding_px: f64,
    inner_width_px: f64,
}

impl PiecewiseMap {
    pub fn new(
        pieces: Vec<Piece>,
        min_year: Year,
        max_year: Year,
        axis_padding_px: f64,
        inner_width_px: f64,
    ) -> Self {
        Self {
            pieces,
            min_year,
            max_year,
            axis_padding_px,
            inner_width_px,
        }
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn inner_width_px(&self) -> f64 {
        self.inner_width_px
    }

    fn piece_for_year(&self, year: f64) -> Option<&Piece> {
        self.pieces
            .iter()
            .find(|p| p.contains_year(year))
            .or_else(|| self.pieces.last())
    }

    fn piece_for_x(&self, x: f64) -> Option<&Piece> {
        self.pieces
            .iter()
            .find(|p| p.contains_x(x))
            .or_else(|| self.pieces.last())
    }

    /// Absolute x (axis padding included) of `year`, clamped to the range.
    pub fn year_to_x(&self, year: f64) -> f64 {
        let year = year.clamp(f64::from(self.min_year), f64::from(self.max_year));
        let local = self.piece_for_year(year).map_or(0.0, |p| p.x_at(year));
        self.axis_padding_px + local
    }

    /// Approximate year at absolute `x`, clamped to the range.
    pub fn x_to_year(&self, x: f64) -> f64 {
        let local = (x - self.axis_padding_px).clamp(0.0, self.inner_width_px);
        let year = self
            .piece_for_x(local)
            .map_or(f64::from(self.min_year), |p| p.year_at(local));
        year.clamp(f64::from(self.min_year), f64::from(self.max_year))
    }
}
