//! Top-level run: load → layout → (preview) → export.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::{debug, info};

use crate::animation::Animation;
use crate::app;
use crate::chart::{ChartLayout, FrameUpdater};
use crate::config::Config;
use crate::data::loader;
use crate::export::{self, GifSettings};
use crate::render::Figure;
use crate::state::PreviewState;

/// On-screen pixels per figure inch in the preview window.
const PREVIEW_PX_PER_INCH: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: usize,
    pub output: PathBuf,
}

/// Run the whole program for one configuration. Nothing is written unless
/// the data loads and every frame renders.
pub fn run(config: &Config) -> Result<RunSummary> {
    config.validate()?;

    let dataset = Arc::new(loader::load_dataset(
        &config.input,
        config.header_row,
        &config.columns,
    )?);

    let anim = &config.animation;
    let layout = ChartLayout::from_dataset(&dataset, anim.padding, anim.tick_step);
    debug!("chart layout: {layout:?}");

    let updater = FrameUpdater::new(dataset, &config.labels.mass_legend);
    let mut animation = Animation::new(updater, Duration::from_millis(anim.interval_ms));

    if anim.preview {
        let size = [
            (anim.width_in * PREVIEW_PX_PER_INCH) as f32,
            (anim.height_in * PREVIEW_PX_PER_INCH) as f32,
        ];
        let preview = PreviewState::new(animation.clone(), layout.clone(), config.labels.clone());
        app::run_preview(preview, size)?;
    }

    let output = config.output.display();
    info!("Saving animation to {output}... This might take a moment.");
    let settings = GifSettings {
        layout: &layout,
        labels: &config.labels,
        figure: Figure::from_config(anim),
        fps: anim.fps,
    };
    let frames = export::export_gif(&mut animation, &settings, &config.output)?;
    info!("Saved animation as {output}");

    Ok(RunSummary {
        frames,
        output: config.output.clone(),
    })
}
