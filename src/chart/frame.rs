use std::fmt;
use std::sync::Arc;

use crate::color::{self, Rgb8};
use crate::data::model::ClimateDataset;

/// Which y axis a line is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Temperature,
    MassBalance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// One plotted line and the data it currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct LineBuffer {
    pub label: String,
    pub color: Rgb8,
    pub axis: Axis,
    pub style: LineStyle,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LineBuffer {
    fn new(label: &str, color: Rgb8, axis: Axis, style: LineStyle) -> Self {
        Self {
            label: label.to_string(),
            color,
            axis,
            style,
            xs: Vec::new(),
            ys: Vec::new(),
        }
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Runs of consecutive drawable points. A NaN y (blank cell) ends the
    /// current run, so the line shows a gap there instead of bridging it.
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for (&x, &y) in self.xs.iter().zip(&self.ys) {
            if y.is_nan() {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            } else {
                current.push((x, y));
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }

    fn set_data(&mut self, xs: &[f64], ys: &[f64]) {
        self.xs.clear();
        self.xs.extend_from_slice(xs);
        self.ys.clear();
        self.ys.extend_from_slice(ys);
    }

    fn clear(&mut self) {
        self.xs.clear();
        self.ys.clear();
    }
}

/// The "current year" readout in the corner of the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    pub year: i64,
    /// Mean of the temperature sources for that year.
    pub average: f64,
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Year: {}\nAvg. Temp. Rise: {:.2}°C",
            self.year, self.average
        )
    }
}

/// Everything that changes from frame to frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    /// Temperature lines in configured order, then the mass-balance line.
    pub lines: Vec<LineBuffer>,
    pub annotation: Option<Annotation>,
    /// Last frame applied, `None` right after initialisation.
    pub frame: Option<usize>,
}

impl FrameState {
    pub fn temperature_lines(&self) -> impl Iterator<Item = &LineBuffer> {
        self.lines.iter().filter(|l| l.axis == Axis::Temperature)
    }

    pub fn mass_balance_lines(&self) -> impl Iterator<Item = &LineBuffer> {
        self.lines.iter().filter(|l| l.axis == Axis::MassBalance)
    }
}

// ---------------------------------------------------------------------------
// FrameUpdater – the only writer of the line buffers
// ---------------------------------------------------------------------------

/// Owns the plotted lines and rewrites them for each frame index.
///
/// Frames reveal cumulatively: frame `f` shows rows `0..=f` of every series.
#[derive(Debug, Clone)]
pub struct FrameUpdater {
    dataset: Arc<ClimateDataset>,
    state: FrameState,
}

impl FrameUpdater {
    pub fn new(dataset: Arc<ClimateDataset>, mass_label: &str) -> Self {
        let palette = color::line_palette(dataset.temperatures.len());
        let mut lines: Vec<LineBuffer> = dataset
            .temperatures
            .iter()
            .zip(palette)
            .map(|(series, c)| {
                LineBuffer::new(&series.name, c, Axis::Temperature, LineStyle::Solid)
            })
            .collect();
        lines.push(LineBuffer::new(
            mass_label,
            color::MASS_BALANCE,
            Axis::MassBalance,
            LineStyle::Dashed,
        ));

        Self {
            dataset,
            state: FrameState {
                lines,
                annotation: None,
                frame: None,
            },
        }
    }

    pub fn frame_count(&self) -> usize {
        self.dataset.len()
    }

    pub fn state(&self) -> &FrameState {
        &self.state
    }

    /// Empty every line and the annotation.
    pub fn init(&mut self) -> &FrameState {
        for line in &mut self.state.lines {
            line.clear();
        }
        self.state.annotation = None;
        self.state.frame = None;
        &self.state
    }

    /// Show rows `0..=frame`. Past the last row nothing changes.
    pub fn update(&mut self, frame: usize) -> &FrameState {
        let ds = &self.dataset;
        if frame >= ds.len() {
            return &self.state;
        }

        let end = frame + 1;
        let xs = &ds.years[..end];
        let series = ds
            .temperatures
            .iter()
            .chain(std::iter::once(&ds.mass_balance));
        for (line, s) in self.state.lines.iter_mut().zip(series) {
            line.set_data(xs, &s.values[..end]);
        }

        self.state.annotation = match (ds.year_label(frame), ds.annual_mean(frame)) {
            (Some(year), Some(average)) => Some(Annotation { year, average }),
            _ => None,
        };
        self.state.frame = Some(frame);
        &self.state
    }
}
