use eraline_protocol::{Tick, TickKind, TickPlan, Year, format_year};

use super::Metrics;
use crate::config::LayoutConfig;

/// Smallest candidate step whose on-screen spacing at `rate` reaches
/// `min_spacing_px`. Falls back to the largest candidate.
pub fn choose_major_step(rate: f64, steps: &[Year], min_spacing_px: f64) -> Option<usize> {
    steps
        .iter()
        .position(|&step| f64::from(step) * rate >= min_spacing_px)
        .or_else(|| steps.len().checked_sub(1))
}

/// Pick major/minor steps for the metrics' active rate and generate ticks.
///
/// The nominal active rate differs from the local rate inside gap pieces,
/// so ticks of one kind closer than the configured separation to the
/// previously emitted one are dropped.
pub fn select_ticks(metrics: &Metrics, config: &LayoutConfig) -> TickPlan {
    let steps = &config.tick_steps;
    let rate = metrics.active_rate;

    let Some(major_index) = choose_major_step(rate, steps, config.min_major_spacing_px) else {
        return TickPlan {
            major_step: 0,
            minor_step: None,
            ticks: Vec::new(),
        };
    };
    let major_step = steps[major_index];
    let minor_step = major_index
        .checked_sub(1)
        .map(|i| steps[i])
        .filter(|&step| f64::from(step) * rate >= config.min_minor_spacing_px);

    let clamp_x = |x: f64| x.clamp(0.0, metrics.timeline_width_px);
    let mut ticks = Vec::new();

    if let Some(minor) = minor_step {
        let mut last_x = f64::NEG_INFINITY;
        for year in aligned_years(metrics.min_year, metrics.max_year, minor) {
            if year.rem_euclid(major_step) == 0 {
                continue;
            }
            let x = metrics.year_to_x(f64::from(year));
            if x - last_x < config.minor_separation_px {
                continue;
            }
            ticks.push(Tick {
                kind: TickKind::Minor,
                year,
                x: clamp_x(x),
                label: None,
            });
            last_x = x;
        }
    }

    let mut last_x = f64::NEG_INFINITY;
    for year in aligned_years(metrics.min_year, metrics.max_year, major_step) {
        let x = metrics.year_to_x(f64::from(year));
        if x - last_x < config.major_separation_px {
            continue;
        }
        ticks.push(Tick {
            kind: TickKind::Major,
            year,
            x: clamp_x(x),
            label: Some(format_year(year)),
        });
        last_x = x;
    }

    log::debug!(
        "ticks: major={major_step} minor={minor_step:?} count={}",
        ticks.len()
    );

    TickPlan {
        major_step,
        minor_step,
        ticks,
    }
}

/// Multiples of `step` from the one at or below `min_year` up to `max_year`.
/// Multiples outside the `Year` range are skipped.
fn aligned_years(min_year: Year, max_year: Year, step: Year) -> impl Iterator<Item = Year> {
    let step = i64::from(step.max(1));
    let first = i64::from(min_year).div_euclid(step) * step;
    (first..=i64::from(max_year))
        .step_by(step as usize)
        .filter_map(|year| Year::try_from(year).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEPS: [Year; 7] = [5, 10, 25, 50, 100, 200, 500];

    #[test]
    fn major_step_meets_spacing() {
        assert_eq!(choose_major_step(1.0, &STEPS, 76.0).map(|i| STEPS[i]), Some(100));
        assert_eq!(choose_major_step(3.1, &STEPS, 76.0).map(|i| STEPS[i]), Some(25));
        assert_eq!(choose_major_step(20.0, &STEPS, 76.0).map(|i| STEPS[i]), Some(5));
    }

    #[test]
    fn major_step_falls_back_to_largest() {
        assert_eq!(choose_major_step(0.01, &STEPS, 76.0).map(|i| STEPS[i]), Some(500));
        assert_eq!(choose_major_step(1.0, &[], 76.0), None);
    }

    #[test]
    fn aligned_years_floor_negative_starts() {
        let years: Vec<_> = aligned_years(-503, -250, 100).collect();
        assert_eq!(years, vec![-600, -500, -400, -300]);
        let years: Vec<_> = aligned_years(1815, 1852, 25).collect();
        assert_eq!(years, vec![1800, 1825, 1850]);
    }

    #[test]
    fn aligned_years_near_the_year_limits() {
        // The multiple of 500 below `Year::MIN + 1` does not fit in a Year.
        let years: Vec<_> = aligned_years(Year::MIN + 1, Year::MIN + 600, 500).collect();
        assert_eq!(years, vec![-2_147_483_500]);
        let years: Vec<_> = aligned_years(Year::MAX - 600, Year::MAX, 500).collect();
        assert_eq!(years, vec![2_147_483_000, 2_147_483_500]);
    }
}
