use std::time::Instant;

use anyhow::{anyhow, Result};
use eframe::egui;

use crate::state::PreviewState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PreviewApp {
    pub state: PreviewState,
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.state.tick(now);

        // ---- Top panel: playback controls ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::animation_plot(ui, &self.state);
        });

        if let Some(wait) = self.state.time_to_next_frame(now) {
            ctx.request_repaint_after(wait);
        }
    }
}

/// Play the animation in a window. Blocks until the window is closed.
pub fn run_preview(state: PreviewState, size: [f32; 2]) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Temperature & Glacier Mass Balance",
        options,
        Box::new(move |_cc| Ok(Box::new(PreviewApp { state }))),
    )
    .map_err(|e| anyhow!("preview window failed: {e}"))
}
