use eraline_protocol::{Entity, LaidOutEntity, Year};

use super::mapper::PiecewiseMap;
use crate::config::LayoutConfig;

const RAW_WIDTH_FLOOR_PX: f64 = 10.0;
const NAME_BOOST_PER_CHAR_PX: f64 = 2.1;
const MAX_NAME_BOOST_PX: f64 = 40.0;
const MAX_LABEL_WIDTH_PX: f64 = 172.0;

/// Row sizing derived from dataset density and zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSizing {
    pub row_height_px: f64,
    pub row_gap_px: f64,
    /// Base label width before the per-name boost.
    pub label_base_px: f64,
}

impl RowSizing {
    /// Rows shrink slightly and gaps tighten as density grows; labels narrow
    /// with density and with zoom above the reference.
    pub fn new(density_per_century: f64, zoom: f64, config: &LayoutConfig) -> Self {
        let row_height_px = (config.base_row_height_px - density_per_century * 0.5)
            .clamp(config.min_row_height_px, config.max_row_height_px);
        let row_gap_px = (config.row_gap_px - density_per_century * 0.35).max(config.min_row_gap_px);
        let label_base_px = (126.0
            - density_per_century * 4.3
            - (zoom - config.zoom_reference) * 0.12)
            .clamp(90.0, 138.0);
        Self {
            row_height_px,
            row_gap_px,
            label_base_px,
        }
    }

    /// Minimum bar width so the entity's name is not truncated.
    pub fn label_floor_px(&self, name_chars: usize, config: &LayoutConfig) -> f64 {
        let boost = (name_chars as f64 * NAME_BOOST_PER_CHAR_PX).min(MAX_NAME_BOOST_PX);
        config
            .min_bar_px
            .max((self.label_base_px + boost).min(MAX_LABEL_WIDTH_PX))
    }
}

/// Greedy first-fit row assignment.
///
/// Tracks the rightmost occupied x of every open row. An item reuses the
/// lowest row whose occupant ends more than `row_gap` before the item's
/// left edge, otherwise it opens a new row.
#[derive(Debug, Default)]
pub struct RowPacker {
    rows_end: Vec<f64>,
    row_gap: f64,
}

impl RowPacker {
    pub fn new(row_gap: f64) -> Self {
        Self {
            rows_end: Vec::new(),
            row_gap,
        }
    }

    /// Place `[left, left + width]` and return its row.
    pub fn place(&mut self, left: f64, width: f64) -> usize {
        let row = self
            .rows_end
            .iter()
            .position(|&end| end + self.row_gap < left)
            .unwrap_or(self.rows_end.len());
        if row == self.rows_end.len() {
            self.rows_end.push(left + width);
        } else {
            self.rows_end[row] = left + width;
        }
        row
    }

    pub fn rows_count(&self) -> usize {
        self.rows_end.len()
    }
}

/// Position and row-pack entities already sorted by birth year.
pub fn pack_rows(
    entities: &[&Entity],
    map: &PiecewiseMap,
    sizing: &RowSizing,
    current_year: Year,
    config: &LayoutConfig,
) -> (Vec<LaidOutEntity>, usize) {
    let mut packer = RowPacker::new(sizing.row_gap_px);

    let items = entities
        .iter()
        .map(|&entity| {
            let left = map.year_to_x(f64::from(entity.birth_year));
            let right = map.year_to_x(f64::from(entity.end_year(current_year)));
            let raw_width = (right - left).max(RAW_WIDTH_FLOOR_PX);
            let width = sizing
                .label_floor_px(entity.name.char_count(), config)
                .max(raw_width);
            let row = packer.place(left, width);

            LaidOutEntity {
                entity: entity.clone(),
                row,
                left_x: left,
                width_px: width,
                years_label: entity.years_label(),
            }
        })
        .collect();

    (items, packer.rows_count())
}
