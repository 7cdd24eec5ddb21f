use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{
    AxisHints, Corner, HPlacement, Legend, Line, LineStyle as PlotLineStyle, Plot, PlotBounds,
    PlotPoint, PlotPoints, Text,
};

use crate::chart::{Axis, LineStyle};
use crate::color;
use crate::state::PreviewState;

// ---------------------------------------------------------------------------
// Animated chart (central panel)
// ---------------------------------------------------------------------------

/// Render the current frame. egui_plot has a single y coordinate system, so
/// mass balance is mapped onto the temperature axis and the right-hand axis
/// labels map it back.
pub fn animation_plot(ui: &mut Ui, state: &PreviewState) {
    let layout = &state.layout;
    let labels = &state.labels;
    let frame = state.animation.state();

    let axis_layout = layout.clone();
    let mass_axis = AxisHints::new_y()
        .label(labels.mass_axis.as_str())
        .placement(HPlacement::Right)
        .formatter(move |mark, _range| {
            format!("{:.0}", axis_layout.temperature_axis_to_mass(mark.value))
        });

    Plot::new("animation_plot")
        .legend(Legend::default().position(Corner::RightTop))
        .x_axis_label(labels.x_axis.as_str())
        .custom_y_axes(vec![
            AxisHints::new_y().label(labels.temperature_axis.as_str()),
            mass_axis,
        ])
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_double_click_reset(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [layout.x.min, layout.temperature.min],
                [layout.x.max, layout.temperature.max],
            ));

            for line in &frame.lines {
                let style = match line.style {
                    LineStyle::Solid => PlotLineStyle::Solid,
                    LineStyle::Dashed => PlotLineStyle::dashed_loose(),
                };

                // Runs sharing a name share one legend entry.
                for run in line.segments() {
                    let points: PlotPoints = run
                        .into_iter()
                        .map(|(x, y)| match line.axis {
                            Axis::Temperature => [x, y],
                            Axis::MassBalance => [x, layout.mass_on_temperature_axis(y)],
                        })
                        .collect();

                    plot_ui.line(
                        Line::new(points)
                            .name(&line.label)
                            .color(color::to_egui(line.color))
                            .width(1.5)
                            .style(style),
                    );
                }
            }

            if let Some(annotation) = &frame.annotation {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(layout.x.max, layout.temperature.min),
                        RichText::new(annotation.to_string())
                            .size(14.0)
                            .color(Color32::GRAY)
                            .background_color(Color32::from_white_alpha(180)),
                    )
                    .anchor(Align2::RIGHT_BOTTOM),
                );
            }
        });
}
