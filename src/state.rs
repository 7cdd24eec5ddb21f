use std::time::{Duration, Instant};

use crate::animation::Animation;
use crate::chart::ChartLayout;
use crate::config::ChartLabels;

// ---------------------------------------------------------------------------
// Preview state
// ---------------------------------------------------------------------------

/// Playback state of the preview window, independent of rendering.
pub struct PreviewState {
    pub animation: Animation,
    pub layout: ChartLayout,
    pub labels: ChartLabels,
    /// Whether frames advance on their own.
    pub playing: bool,
    /// When the last frame was shown.
    last_tick: Option<Instant>,
}

impl PreviewState {
    pub fn new(mut animation: Animation, layout: ChartLayout, labels: ChartLabels) -> Self {
        animation.restart();
        Self {
            animation,
            layout,
            labels,
            playing: true,
            last_tick: None,
        }
    }

    /// Advance one frame if the interval has elapsed. Returns true when a
    /// new frame was applied.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.playing {
            return false;
        }
        let due = match self.last_tick {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.animation.interval(),
        };
        if !due {
            return false;
        }
        match self.animation.advance() {
            Some(_) => {
                self.last_tick = Some(now);
                true
            }
            None => {
                self.playing = false;
                false
            }
        }
    }

    /// How long until the next frame is due, `None` when paused or done.
    pub fn time_to_next_frame(&self, now: Instant) -> Option<Duration> {
        if !self.playing || self.animation.is_finished() {
            return None;
        }
        Some(match self.last_tick {
            None => Duration::ZERO,
            Some(last) => self
                .animation
                .interval()
                .saturating_sub(now.saturating_duration_since(last)),
        })
    }

    /// Start again from an empty chart.
    pub fn replay(&mut self) {
        self.animation.restart();
        self.last_tick = None;
        self.playing = true;
    }

    pub fn toggle_pause(&mut self) {
        if self.animation.is_finished() {
            self.replay();
        } else {
            self.playing = !self.playing;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::chart::FrameUpdater;
    use crate::data::model::{ClimateDataset, Series};

    fn preview(rows: usize) -> PreviewState {
        let years: Vec<f64> = (0..rows).map(|i| 2000.0 + i as f64).collect();
        let ds = Arc::new(ClimateDataset {
            temperatures: vec![Series {
                name: "ERA5".into(),
                values: vec![0.5; rows],
            }],
            mass_balance: Series {
                name: "MassBalance".into(),
                values: vec![-1.0; rows],
            },
            years,
        });
        let layout = ChartLayout::from_dataset(&ds, 0.1, 10);
        let animation = Animation::new(
            FrameUpdater::new(ds, "WGMS"),
            Duration::from_millis(100),
        );
        PreviewState::new(animation, layout, ChartLabels::default())
    }

    #[test]
    fn frames_wait_for_the_interval() {
        let mut state = preview(3);
        let t0 = Instant::now();
        assert!(state.tick(t0));
        assert_eq!(state.animation.state().frame, Some(0));

        assert!(!state.tick(t0 + Duration::from_millis(50)));
        assert_eq!(
            state.time_to_next_frame(t0 + Duration::from_millis(50)),
            Some(Duration::from_millis(50))
        );

        assert!(state.tick(t0 + Duration::from_millis(100)));
        assert!(state.tick(t0 + Duration::from_millis(200)));
        assert_eq!(state.animation.state().frame, Some(2));

        assert!(!state.tick(t0 + Duration::from_millis(300)));
        assert!(!state.playing);
        assert_eq!(state.time_to_next_frame(t0 + Duration::from_millis(300)), None);
    }

    #[test]
    fn pause_and_replay() {
        let mut state = preview(3);
        let t0 = Instant::now();
        state.tick(t0);
        state.toggle_pause();
        assert!(!state.tick(t0 + Duration::from_secs(1)));
        assert_eq!(state.animation.state().frame, Some(0));

        state.replay();
        assert_eq!(state.animation.state().frame, None);
        assert!(state.animation.state().lines.iter().all(|l| l.is_empty()));
        assert!(state.tick(t0 + Duration::from_secs(2)));
        assert_eq!(state.animation.state().frame, Some(0));
    }
}
