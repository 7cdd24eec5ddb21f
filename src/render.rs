use std::ops::Range;

use anyhow::Result;
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};

use crate::chart::frame::LineBuffer;
use crate::chart::{ChartLayout, FrameState, LineStyle};
use crate::color;
use crate::config::{AnimationConfig, ChartLabels};

// ---------------------------------------------------------------------------
// Figure geometry
// ---------------------------------------------------------------------------

/// Physical figure size. Sizes below are given in points and scaled to
/// pixels with the DPI, so a higher DPI gives a sharper, not smaller, chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Figure {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

impl Figure {
    pub fn from_config(config: &AnimationConfig) -> Self {
        Self {
            width_in: config.width_in,
            height_in: config.height_in,
            dpi: config.dpi,
        }
    }

    /// Output size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (self.width_in * dpi).round().max(1.0) as u32,
            (self.height_in * dpi).round().max(1.0) as u32,
        )
    }

    /// Points → pixels.
    pub fn pt(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }

    /// Points → whole pixels, never below one.
    pub fn px(&self, points: f64) -> u32 {
        self.pt(points).round().max(1.0) as u32
    }

    fn font(&self, points: f64, style: FontStyle) -> FontDesc<'static> {
        FontDesc::new(FontFamily::SansSerif, self.pt(points), style)
    }
}

// ---------------------------------------------------------------------------
// Year axis
// ---------------------------------------------------------------------------

/// Linear year axis whose ticks are exactly the layout's year ticks.
#[derive(Clone)]
pub struct YearAxis {
    coord: RangedCoordf64,
    ticks: Vec<f64>,
}

impl YearAxis {
    pub fn new(layout: &ChartLayout) -> Self {
        Self {
            coord: (layout.x.min..layout.x.max).into(),
            ticks: layout.x_ticks.iter().map(|&t| t as f64).collect(),
        }
    }
}

impl Ranged for YearAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.coord.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.coord.range()
    }
}

// ---------------------------------------------------------------------------
// Frame drawing
// ---------------------------------------------------------------------------

/// Draw one frame: axes, grid, every line, legend and the year readout.
pub fn draw_frame<DB>(
    root: &DrawingArea<DB, Shift>,
    layout: &ChartLayout,
    state: &FrameState,
    labels: &ChartLabels,
    figure: &Figure,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let x = layout.x.min..layout.x.max;

    let mut chart = ChartBuilder::on(root)
        .margin(figure.px(8.0))
        .x_label_area_size(figure.px(48.0))
        .y_label_area_size(figure.px(64.0))
        .right_y_label_area_size(figure.px(64.0))
        .build_cartesian_2d(
            YearAxis::new(layout),
            layout.temperature.min..layout.temperature.max,
        )?
        .set_secondary_coord(x, layout.mass_balance.min..layout.mass_balance.max);

    let grid = color::to_plotters(color::GRID)
        .mix(0.6)
        .stroke_width(figure.px(0.7));
    let title_font = figure.font(16.0, FontStyle::Bold);
    let tick_font = figure.font(9.0, FontStyle::Normal);

    chart
        .configure_mesh()
        .x_desc(labels.x_axis.as_str())
        .y_desc(labels.temperature_axis.as_str())
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| format!("{v:.1}"))
        .label_style(tick_font.clone())
        .axis_desc_style(title_font.clone())
        .bold_line_style(grid)
        .light_line_style(&TRANSPARENT)
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc(labels.mass_axis.as_str())
        .y_label_formatter(&|v| format!("{v:.0}"))
        .label_style(tick_font)
        .axis_desc_style(title_font)
        .draw()?;

    let stroke = figure.px(1.5);
    let legend_len = figure.px(18.0) as i32;

    for line in state.temperature_lines() {
        let style = color::to_plotters(line.color).stroke_width(stroke);
        for (i, run) in legend_runs(line).into_iter().enumerate() {
            let mut anno = chart.draw_series(LineSeries::new(run, style))?;
            if i == 0 {
                anno.label(line.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + legend_len, y)], style));
            }
        }
    }

    for line in state.mass_balance_lines() {
        let style = color::to_plotters(line.color).stroke_width(stroke);
        for (i, run) in legend_runs(line).into_iter().enumerate() {
            let mut anno = match line.style {
                LineStyle::Dashed => chart.draw_secondary_series(DashedLineSeries::new(
                    run,
                    figure.px(5.0),
                    figure.px(3.0),
                    style,
                ))?,
                LineStyle::Solid => chart.draw_secondary_series(LineSeries::new(run, style))?,
            };
            if i == 0 {
                anno.label(line.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + legend_len, y)], style));
            }
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&color::to_plotters(color::LEGEND_BORDER))
        .label_font(figure.font(8.0, FontStyle::Normal))
        .draw()?;

    if let Some(annotation) = &state.annotation {
        let (x_px, y_px) = chart.plotting_area().get_pixel_range();
        draw_annotation(root, &annotation.to_string(), (x_px.end, y_px.end), figure)?;
    }

    Ok(())
}

/// The line's runs, with one empty run for a line that has no points yet so
/// it still gets its legend entry.
fn legend_runs(line: &LineBuffer) -> Vec<Vec<(f64, f64)>> {
    let mut runs = line.segments();
    if runs.is_empty() {
        runs.push(Vec::new());
    }
    runs
}

/// Right/bottom aligned text box anchored at `corner` (pixel coordinates of
/// the plot area's lower right corner).
fn draw_annotation<DB>(
    root: &DrawingArea<DB, Shift>,
    text: &str,
    corner: (i32, i32),
    figure: &Figure,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let style = figure
        .font(12.0, FontStyle::Normal)
        .color(&color::to_plotters(color::ANNOTATION_TEXT))
        .pos(Pos::new(HPos::Right, VPos::Bottom));

    let pad = figure.px(4.0) as i32;
    let lines: Vec<&str> = text.lines().collect();
    let mut sizes = Vec::with_capacity(lines.len());
    for line in &lines {
        sizes.push(root.estimate_text_size(line, &style)?);
    }
    let width = sizes.iter().map(|&(w, _)| w as i32).max().unwrap_or(0);
    let line_height = sizes.iter().map(|&(_, h)| h as i32).max().unwrap_or(0);

    let right = corner.0 - 2 * pad;
    let bottom = corner.1 - 2 * pad;
    let top = bottom - line_height * lines.len() as i32;
    root.draw(&Rectangle::new(
        [(right - width - pad, top - pad), (right + pad, bottom + pad)],
        WHITE.mix(0.7).filled(),
    ))?;

    for (i, line) in lines.iter().enumerate() {
        let baseline = top + line_height * (i as i32 + 1);
        root.draw(&Text::new(*line, (right, baseline), style.clone()))?;
    }
    Ok(())
}
