use std::time::Duration;

use anyhow::Result;
use log::debug;

use crate::chart::{FrameState, FrameUpdater};

/// Sequences frames `0..frame_count` through a [`FrameUpdater`].
///
/// The updater is initialised exactly once per pass, before frame 0, and each
/// frame index is applied once in increasing order.
#[derive(Debug, Clone)]
pub struct Animation {
    updater: FrameUpdater,
    interval: Duration,
    next: usize,
    started: bool,
}

impl Animation {
    pub fn new(updater: FrameUpdater, interval: Duration) -> Self {
        Self {
            updater,
            interval,
            next: 0,
            started: false,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.updater.frame_count()
    }

    /// Delay between frames when played in real time.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> &FrameState {
        self.updater.state()
    }

    /// Index of the next frame [`Animation::advance`] will draw.
    pub fn position(&self) -> usize {
        self.next
    }

    pub fn is_finished(&self) -> bool {
        self.started && self.next >= self.frame_count()
    }

    /// Start a new pass: clear the lines and rewind to frame 0.
    pub fn restart(&mut self) -> &FrameState {
        self.next = 0;
        self.started = true;
        self.updater.init()
    }

    /// Apply the next frame. Starts a pass if none is running; returns
    /// `None` once every frame has been shown.
    pub fn advance(&mut self) -> Option<(usize, &FrameState)> {
        if !self.started {
            self.restart();
        }
        if self.next >= self.frame_count() {
            return None;
        }
        let frame = self.next;
        self.next += 1;
        debug!("frame {frame}/{}", self.frame_count());
        Some((frame, self.updater.update(frame)))
    }

    /// Play one full pass from the start, handing each frame to `on_frame`.
    /// Returns the number of frames played.
    pub fn run<F>(&mut self, mut on_frame: F) -> Result<usize>
    where
        F: FnMut(usize, &FrameState) -> Result<()>,
    {
        self.restart();
        let mut played = 0;
        while let Some((frame, state)) = self.advance() {
            on_frame(frame, state)?;
            played += 1;
        }
        Ok(played)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::model::{ClimateDataset, Series};

    fn animation(rows: usize) -> Animation {
        let years: Vec<f64> = (0..rows).map(|i| 1990.0 + i as f64).collect();
        let ds = ClimateDataset {
            temperatures: vec![Series {
                name: "ERA5".into(),
                values: years.iter().map(|y| (y - 1990.0) * 0.1).collect(),
            }],
            mass_balance: Series {
                name: "MassBalance".into(),
                values: years.iter().map(|y| 1990.0 - y).collect(),
            },
            years,
        };
        Animation::new(
            FrameUpdater::new(Arc::new(ds), "WGMS"),
            Duration::from_millis(100),
        )
    }

    #[test]
    fn every_row_is_one_frame_in_order() {
        let mut anim = animation(25);
        let mut seen = Vec::new();
        let played = anim
            .run(|frame, state| {
                assert_eq!(state.frame, Some(frame));
                assert_eq!(state.lines[0].len(), frame + 1);
                seen.push(frame);
                Ok(())
            })
            .unwrap();
        assert_eq!(played, 25);
        assert_eq!(seen, (0..25).collect::<Vec<_>>());
        assert!(anim.is_finished());
        assert!(anim.advance().is_none());
    }

    #[test]
    fn run_twice_replays_from_scratch() {
        let mut anim = animation(4);
        anim.run(|_, _| Ok(())).unwrap();
        let mut first_lengths = Vec::new();
        anim.run(|_, state| {
            first_lengths.push(state.lines[0].len());
            Ok(())
        })
        .unwrap();
        assert_eq!(first_lengths, vec![1, 2, 3, 4]);
    }

    #[test]
    fn advance_starts_lazily() {
        let mut anim = animation(2);
        assert!(!anim.is_finished());
        assert_eq!(anim.advance().map(|(f, _)| f), Some(0));
        assert_eq!(anim.position(), 1);
        assert_eq!(anim.advance().map(|(f, _)| f), Some(1));
        assert_eq!(anim.advance().map(|(f, _)| f), None);
        anim.restart();
        assert_eq!(anim.state().frame, None);
        assert_eq!(anim.advance().map(|(f, _)| f), Some(0));
    }

    #[test]
    fn callback_error_stops_the_pass() {
        let mut anim = animation(5);
        let err = anim
            .run(|frame, _| {
                if frame == 2 {
                    anyhow::bail!("disk full");
                }
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(anim.position(), 3);
    }
}
