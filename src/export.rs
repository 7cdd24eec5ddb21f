use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, RgbImage};
use log::{debug, info};
use plotters::prelude::*;

use crate::animation::Animation;
use crate::chart::ChartLayout;
use crate::config::ChartLabels;
use crate::render::{self, Figure};

/// NeuQuant sampling factor: 1 is best and slowest, 30 fastest.
const GIF_SPEED: i32 = 10;

/// Everything the exporter needs besides the animation itself.
pub struct GifSettings<'a> {
    pub layout: &'a ChartLayout,
    pub labels: &'a ChartLabels,
    pub figure: Figure,
    pub fps: u32,
}

/// Milliseconds each frame is held for at `fps`.
pub fn frame_delay(fps: u32) -> Delay {
    Delay::from_numer_denom_ms(1000, fps.max(1))
}

/// Re-run `animation` from the start and encode every frame into a looping
/// GIF at `path`. The file is only written once every frame has been
/// encoded, so a failure part-way leaves nothing behind.
pub fn export_gif(animation: &mut Animation, settings: &GifSettings<'_>, path: &Path) -> Result<usize> {
    let (width, height) = settings.figure.pixel_size();
    let delay = frame_delay(settings.fps);
    debug!(
        "encoding {} frames at {width}x{height} px, {} fps",
        animation.frame_count(),
        settings.fps
    );

    let mut bytes: Vec<u8> = Vec::new();
    let frames = {
        let mut encoder = GifEncoder::new_with_speed(&mut bytes, GIF_SPEED);
        encoder
            .set_repeat(Repeat::Infinite)
            .context("configuring GIF encoder")?;

        let mut pixels = vec![0u8; width as usize * height as usize * 3];
        animation.run(|frame, state| {
            {
                let root = BitMapBackend::with_buffer(&mut pixels, (width, height))
                    .into_drawing_area();
                render::draw_frame(&root, settings.layout, state, settings.labels, &settings.figure)
                    .with_context(|| format!("rendering frame {frame}"))?;
                root.present()
                    .with_context(|| format!("rendering frame {frame}"))?;
            }
            let rgb = RgbImage::from_raw(width, height, pixels.clone())
                .context("frame buffer has the wrong size")?;
            let rgba = DynamicImage::ImageRgb8(rgb).into_rgba8();
            encoder
                .encode_frame(Frame::from_parts(rgba, 0, 0, delay))
                .with_context(|| format!("encoding frame {frame}"))?;
            Ok(())
        })?
    };

    std::fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {frames} frames ({} bytes) to {}", bytes.len(), path.display());
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use std::io::BufReader;
    use std::sync::Arc;
    use std::time::Duration;

    use image::codecs::gif::GifDecoder;
    use image::AnimationDecoder;
    use tempfile::tempdir;

    use super::*;
    use crate::chart::FrameUpdater;
    use crate::data::model::{ClimateDataset, Series};

    fn millis(delay: Delay) -> f64 {
        let (numer, denom) = delay.numer_denom_ms();
        numer as f64 / denom as f64
    }

    #[test]
    fn delay_follows_fps() {
        assert_eq!(millis(frame_delay(5)), 200.0);
        assert_eq!(millis(frame_delay(4)), 250.0);
        // zero is clamped rather than dividing by zero
        assert_eq!(millis(frame_delay(0)), 1000.0);
    }

    fn three_rows() -> Arc<ClimateDataset> {
        let names = ["Berkeley Earth", "ERA5", "GISTEMP", "HadCRUT5", "JRA-3Q", "NOAAGlobalTemp"];
        Arc::new(ClimateDataset {
            years: vec![2000.0, 2001.0, 2002.0],
            temperatures: names
                .iter()
                .map(|name| Series {
                    name: name.to_string(),
                    values: vec![0.4, 0.5, 0.6],
                })
                .collect(),
            mass_balance: Series {
                name: "MassBalance".into(),
                values: vec![-10.0, -11.0, -12.5],
            },
        })
    }

    #[test]
    fn gif_has_one_frame_per_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.gif");

        let dataset = three_rows();
        let layout = ChartLayout::from_dataset(&dataset, 0.1, 10);
        let labels = ChartLabels::default();
        let mut animation = Animation::new(
            FrameUpdater::new(dataset, &labels.mass_legend),
            Duration::from_millis(100),
        );
        let settings = GifSettings {
            layout: &layout,
            labels: &labels,
            figure: Figure {
                width_in: 9.0,
                height_in: 5.0,
                dpi: 40,
            },
            fps: 5,
        };

        let written = export_gif(&mut animation, &settings, &path).unwrap();
        assert_eq!(written, 3);

        let file = BufReader::new(std::fs::File::open(&path).unwrap());
        let frames = GifDecoder::new(file)
            .unwrap()
            .into_frames()
            .collect_frames()
            .unwrap();
        assert_eq!(frames.len(), 3);
        for frame in &frames {
            assert_eq!(millis(frame.delay()), 200.0);
            assert_eq!(frame.buffer().dimensions(), (360, 200));
        }
    }

    #[test]
    fn failed_export_leaves_no_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.gif");

        let dataset = three_rows();
        let layout = ChartLayout::from_dataset(&dataset, 0.1, 10);
        let labels = ChartLabels::default();
        let mut animation = Animation::new(
            FrameUpdater::new(dataset, &labels.mass_legend),
            Duration::from_millis(100),
        );
        let settings = GifSettings {
            layout: &layout,
            labels: &labels,
            figure: Figure {
                width_in: 4.0,
                height_in: 3.0,
                dpi: 30,
            },
            fps: 5,
        };

        assert!(export_gif(&mut animation, &settings, &path).is_err());
        assert!(!path.exists());
    }
}
