use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::PreviewState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the playback toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut PreviewState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        let total = state.animation.frame_count();
        let frame = state.animation.state();
        match (frame.frame, &frame.annotation) {
            (Some(f), Some(annotation)) => {
                ui.label(format!("Frame {}/{total}  ·  {}", f + 1, annotation.year));
            }
            _ => {
                ui.label(format!("Frame 0/{total}"));
            }
        }

        ui.separator();

        let play_label = if state.playing { "Pause" } else { "Play" };
        if ui.button(play_label).clicked() {
            state.toggle_pause();
        }
        if ui.button("Replay").clicked() {
            state.replay();
        }

        ui.separator();

        ui.label(RichText::new("Close the window to export").color(Color32::GRAY));
    });
}
