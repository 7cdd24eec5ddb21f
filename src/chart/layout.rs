use crate::data::model::ClimateDataset;

/// Closed numeric interval drawn along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Half-width used when the data collapses to a single value.
    const DEGENERATE_HALF_WIDTH: f64 = 0.5;

    /// `[min - padding*span, max + padding*span]`. A zero span is widened
    /// to ±0.5 around the value and missing data gives `[0, 1]`.
    pub fn padded(extent: Option<(f64, f64)>, padding: f64) -> Self {
        let Some((min, max)) = extent else {
            return AxisRange { min: 0.0, max: 1.0 };
        };
        let span = max - min;
        if span <= 0.0 {
            return Self::around(min);
        }
        AxisRange {
            min: min - span * padding,
            max: max + span * padding,
        }
    }

    /// The exact extent, widened only if it is a single value.
    pub fn exact(extent: Option<(f64, f64)>) -> Self {
        Self::padded(extent, 0.0)
    }

    fn around(value: f64) -> Self {
        AxisRange {
            min: value - Self::DEGENERATE_HALF_WIDTH,
            max: value + Self::DEGENERATE_HALF_WIDTH,
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Map a value from this range onto `other` linearly.
    pub fn map_to(&self, other: &AxisRange, value: f64) -> f64 {
        other.min + (value - self.min) / self.span() * other.span()
    }
}

/// Axis ranges and x ticks, fixed before the first frame so the chart never
/// rescales while the series grow.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub x: AxisRange,
    pub temperature: AxisRange,
    pub mass_balance: AxisRange,
    pub x_ticks: Vec<i64>,
}

impl ChartLayout {
    /// Derive the layout from the full dataset, independent of how much of
    /// it has been revealed.
    pub fn from_dataset(dataset: &ClimateDataset, padding: f64, tick_step: u32) -> Self {
        let years = dataset.year_extent();
        ChartLayout {
            x: AxisRange::exact(years),
            temperature: AxisRange::padded(dataset.temperature_extent(), padding),
            mass_balance: AxisRange::padded(dataset.mass_balance_extent(), padding),
            x_ticks: years
                .map(|(first, last)| year_ticks(first as i64, last as i64, tick_step))
                .unwrap_or_default(),
        }
    }

    /// Position of a mass-balance value on the temperature axis. Used where
    /// only one y coordinate system is available.
    pub fn mass_on_temperature_axis(&self, value: f64) -> f64 {
        self.mass_balance.map_to(&self.temperature, value)
    }

    /// Inverse of [`ChartLayout::mass_on_temperature_axis`].
    pub fn temperature_axis_to_mass(&self, value: f64) -> f64 {
        self.temperature.map_to(&self.mass_balance, value)
    }
}

/// Every `step`-th year from `first`, plus `last` if the stride misses it.
pub fn year_ticks(first: i64, last: i64, step: u32) -> Vec<i64> {
    let step = step.max(1) as usize;
    let mut ticks: Vec<i64> = (first..=last).step_by(step).collect();
    if ticks.last() != Some(&last) {
        ticks.push(last);
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Series;
    use approx::assert_abs_diff_eq;

    fn dataset() -> ClimateDataset {
        ClimateDataset {
            years: vec![1950.0, 1960.0, 1975.0],
            temperatures: vec![
                Series {
                    name: "A".into(),
                    values: vec![0.0, 1.0, f64::NAN],
                },
                Series {
                    name: "B".into(),
                    values: vec![-1.0, 0.5, 1.0],
                },
            ],
            mass_balance: Series {
                name: "MassBalance".into(),
                values: vec![0.0, -10.0, -20.0],
            },
        }
    }

    #[test]
    fn ranges_cover_the_whole_dataset_with_padding() {
        let layout = ChartLayout::from_dataset(&dataset(), 0.1, 10);
        assert_eq!(layout.x, AxisRange { min: 1950.0, max: 1975.0 });
        assert_abs_diff_eq!(layout.temperature.min, -1.2, epsilon = 1e-12);
        assert_abs_diff_eq!(layout.temperature.max, 1.2, epsilon = 1e-12);
        assert_abs_diff_eq!(layout.mass_balance.min, -22.0, epsilon = 1e-12);
        assert_abs_diff_eq!(layout.mass_balance.max, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn ticks_append_final_year() {
        assert_eq!(year_ticks(1950, 1975, 10), vec![1950, 1960, 1970, 1975]);
        assert_eq!(year_ticks(1950, 1970, 10), vec![1950, 1960, 1970]);
        assert_eq!(year_ticks(2000, 2000, 10), vec![2000]);
        assert_eq!(year_ticks(2000, 2002, 1), vec![2000, 2001, 2002]);
    }

    #[test]
    fn degenerate_extents_are_widened() {
        assert_eq!(
            AxisRange::padded(Some((2.0, 2.0)), 0.1),
            AxisRange { min: 1.5, max: 2.5 }
        );
        assert_eq!(AxisRange::padded(None, 0.1), AxisRange { min: 0.0, max: 1.0 });
    }

    #[test]
    fn mass_axis_mapping_round_trips() {
        let layout = ChartLayout::from_dataset(&dataset(), 0.1, 10);
        assert_abs_diff_eq!(
            layout.mass_on_temperature_axis(layout.mass_balance.min),
            layout.temperature.min,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            layout.mass_on_temperature_axis(layout.mass_balance.max),
            layout.temperature.max,
            epsilon = 1e-12
        );
        let v = -7.5;
        assert_abs_diff_eq!(
            layout.temperature_axis_to_mass(layout.mass_on_temperature_axis(v)),
            v,
            epsilon = 1e-9
        );
    }
}
