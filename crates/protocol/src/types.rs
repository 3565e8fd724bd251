use serde::{Deserialize, Serialize};

use crate::entity::{Entity, Year};

/// Whether a stretch of time holds entities or is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Covered by at least one lifespan (after join-threshold merging).
    Active,
    /// Empty time between active segments, drawn compressed.
    Gap,
}

/// A contiguous span of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub start: Year,
    pub end: Year,
}

impl Segment {
    pub fn active(start: Year, end: Year) -> Self {
        Self {
            kind: SegmentKind::Active,
            start,
            end,
        }
    }

    pub fn len(&self) -> i64 {
        i64::from(self.end) - i64::from(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// The pixel-bearing counterpart of a [`Segment`].
///
/// Invariant: `end_x - start_x == (end_year - start_year) * rate`.
/// `start_x`/`end_x` are relative to the inner timeline (axis padding
/// excluded).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: SegmentKind,
    pub start_year: Year,
    pub end_year: Year,
    /// Pixels per year.
    pub rate: f64,
    pub start_x: f64,
    pub end_x: f64,
}

impl Piece {
    pub fn contains_year(&self, year: f64) -> bool {
        year >= f64::from(self.start_year) && year <= f64::from(self.end_year)
    }

    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.start_x && x <= self.end_x
    }

    /// Inner x of `year`, assuming it lies in this piece.
    pub fn x_at(&self, year: f64) -> f64 {
        self.start_x + (year - f64::from(self.start_year)) * self.rate
    }

    /// Year at inner `x`, assuming it lies in this piece. Zero-rate pieces
    /// collapse to their start year.
    pub fn year_at(&self, x: f64) -> f64 {
        if self.rate <= 0.0 {
            return f64::from(self.start_year);
        }
        f64::from(self.start_year) + (x - self.start_x) / self.rate
    }

    pub fn width(&self) -> f64 {
        self.end_x - self.start_x
    }

    /// Multiply rate and pixel extents by one factor.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            rate: self.rate * factor,
            start_x: self.start_x * factor,
            end_x: self.end_x * factor,
            ..*self
        }
    }
}

/// An entity with its row and horizontal extent on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaidOutEntity {
    #[serde(flatten)]
    pub entity: Entity,
    /// Display lane, 0 = top.
    pub row: usize,
    /// Absolute x of the bar's left edge (axis padding included).
    pub left_x: f64,
    /// Bar width after the label floor is applied.
    pub width_px: f64,
    pub years_label: String,
}

impl LaidOutEntity {
    pub fn right_x(&self) -> f64 {
        self.left_x + self.width_px
    }

    pub fn center_x(&self) -> f64 {
        self.left_x + self.width_px / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickKind {
    Major,
    Minor,
}

/// One axis tick. Only major ticks carry a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub kind: TickKind,
    pub year: Year,
    pub x: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Chosen tick steps and the ticks they produce, minor ticks first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickPlan {
    pub major_step: Year,
    pub minor_step: Option<Year>,
    pub ticks: Vec<Tick>,
}

impl TickPlan {
    pub fn majors(&self) -> impl Iterator<Item = &Tick> {
        self.ticks.iter().filter(|t| t.kind == TickKind::Major)
    }

    pub fn minors(&self) -> impl Iterator<Item = &Tick> {
        self.ticks.iter().filter(|t| t.kind == TickKind::Minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(start_year: Year, end_year: Year, rate: f64, start_x: f64) -> Piece {
        Piece {
            kind: SegmentKind::Active,
            start_year,
            end_year,
            rate,
            start_x,
            end_x: start_x + f64::from(end_year - start_year) * rate,
        }
    }

    #[test]
    fn piece_maps_both_directions() {
        let p = piece(1000, 1100, 2.0, 50.0);
        assert!((p.x_at(1025.0) - 100.0).abs() < 1e-9);
        assert!((p.year_at(100.0) - 1025.0).abs() < 1e-9);
        assert!((p.width() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn zero_rate_piece_returns_start_year() {
        let p = piece(10, 10, 0.0, 0.0);
        assert_eq!(p.year_at(5.0), 10.0);
    }

    #[test]
    fn scaling_keeps_width_invariant() {
        let p = piece(-500, -400, 1.5, 30.0).scaled(2.0);
        let expected = f64::from(p.end_year - p.start_year) * p.rate;
        assert!((p.width() - expected).abs() < 1e-9);
    }

    #[test]
    fn segment_length() {
        let s = Segment::active(-500, -400);
        assert_eq!(s.len(), 100);
        assert!(!s.is_empty());
    }
}
