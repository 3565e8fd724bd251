use eraline_core::Metrics;
use eraline_core::navigation::{
    Era, VisiblePeriod, nearest_era, scroll_target_for_year, visible_period,
};
use serde::Serialize;

/// A position on the timeline given either as a year or as an absolute x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Query {
    Year(f64),
    X(f64),
}

impl Query {
    /// `--year` wins when both are given.
    pub fn from_args(year: Option<f64>, x: Option<f64>) -> Option<Self> {
        year.map(Self::Year).or(x.map(Self::X))
    }
}

/// Where a query lands and what a viewport centred on it would show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub year: f64,
    pub x: f64,
    pub scroll_left: f64,
    pub visible_period: VisiblePeriod,
    pub nearest_era: Option<Era>,
}

pub fn locate(metrics: &Metrics, query: Query, viewport_width_px: f64, eras: &[Era]) -> Location {
    let (year, x) = match query {
        Query::Year(year) => {
            let year = metrics.clamp_year(year);
            (year, metrics.year_to_x(year))
        }
        Query::X(x) => (metrics.x_to_year(x), x),
    };
    let scroll_left = scroll_target_for_year(metrics, year, viewport_width_px);
    Location {
        year,
        x,
        scroll_left,
        visible_period: visible_period(metrics, scroll_left, viewport_width_px),
        nearest_era: nearest_era(eras, metrics, scroll_left, viewport_width_px).cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eraline_core::navigation::default_eras;
    use eraline_core::{LayoutConfig, LayoutParams, LayoutResult, layout_entities};
    use eraline_protocol::{Entity, Lifespan};

    const VIEWPORT: f64 = 100.0;

    fn layout() -> LayoutResult {
        let entities = [
            Entity::new("plato", "Plato", "philosophy", -427, Lifespan::Fixed(-347)),
            Entity::new("dante", "Dante", "art", 1265, Lifespan::Fixed(1321)),
            Entity::new("curie", "Marie Curie", "science", 1867, Lifespan::Fixed(1934)),
        ];
        let params = LayoutParams::new(140.0, 1000.0, 2026);
        layout_entities(&entities, &params, &LayoutConfig::default()).expect("layout")
    }

    #[test]
    fn query_prefers_year() {
        assert_eq!(Query::from_args(Some(1300.0), Some(5.0)), Some(Query::Year(1300.0)));
        assert_eq!(Query::from_args(None, Some(5.0)), Some(Query::X(5.0)));
        assert_eq!(Query::from_args(None, None), None);
    }

    #[test]
    fn year_maps_to_x_scroll_and_era() {
        let result = layout();
        let metrics = result.metrics.as_ref().expect("metrics");
        let found = locate(metrics, Query::Year(1300.0), VIEWPORT, &default_eras());

        assert_eq!(found.year, 1300.0);
        assert_eq!(found.x, metrics.year_to_x(1300.0));
        assert!((found.scroll_left - (found.x - VIEWPORT / 2.0)).abs() < 1e-9);
        assert!(found.visible_period.from <= 1300 && found.visible_period.to >= 1300);
        assert_eq!(found.nearest_era.map(|e| e.id), Some("renaissance".to_string()));
    }

    #[test]
    fn year_outside_data_is_clamped() {
        let result = layout();
        let metrics = result.metrics.as_ref().expect("metrics");
        let found = locate(metrics, Query::Year(5000.0), VIEWPORT, &default_eras());
        assert_eq!(found.year, 1934.0);
        assert_eq!(found.x, metrics.year_to_x(1934.0));
    }

    #[test]
    fn x_maps_back_to_year() {
        let result = layout();
        let metrics = result.metrics.as_ref().expect("metrics");
        let x = metrics.year_to_x(1900.0);
        let found = locate(metrics, Query::X(x), VIEWPORT, &default_eras());

        assert_eq!(found.x, x);
        assert!((found.year - 1900.0).abs() < 1e-6);
        assert_eq!(found.nearest_era.map(|e| e.id), Some("twentieth".to_string()));
    }
}
