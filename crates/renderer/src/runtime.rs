use std::path::PathBuf;
use std::time::{Duration, Instant};

/// High-level behaviour requested by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPolicy {
    /// Run the frame loop continuously, optionally capping the frame rate.
    Animate {
        /// Optional requested frames-per-second cap.
        target_fps: Option<f32>,
    },
    /// Keep presenting with both time counters pinned at a fixed timestamp.
    Still {
        /// Timestamp to evaluate the passes at (seconds).
        time: Option<f32>,
    },
    /// Evaluate one frame on the CPU, write it to disk, and exit.
    Export {
        /// Timestamp to evaluate the passes at (seconds).
        time: Option<f32>,
        /// Destination path for the exported PNG.
        path: PathBuf,
    },
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Animate { target_fps: None }
    }
}

/// Monotonic per-frame delta source.
///
/// Created once at startup and queried exactly once per frame; the first
/// query measures from creation. Never reset.
pub(crate) struct DeltaClock {
    last: Instant,
}

impl DeltaClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Elapsed time since the previous query (or since creation).
    pub fn delta(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now.saturating_duration_since(self.last);
        self.last = now;
        delta
    }
}

/// Paces redraws when an FPS cap is requested.
///
/// Uncapped schedulers are always ready and report no deadline, which maps
/// to redrawing every vblank.
pub(crate) struct FrameScheduler {
    interval: Option<Duration>,
    next_frame: Instant,
}

impl FrameScheduler {
    pub fn new(target_fps: Option<f32>) -> Self {
        let interval = target_fps
            .filter(|fps| *fps > 0.0)
            .map(|fps| Duration::from_secs_f32(1.0 / fps));
        Self {
            interval,
            next_frame: Instant::now(),
        }
    }

    pub fn ready_for_frame(&self, now: Instant) -> bool {
        match self.interval {
            Some(_) => now >= self.next_frame,
            None => true,
        }
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        if let Some(interval) = self.interval {
            self.next_frame += interval;
            // Do not try to catch up after a stall; rebase on the present.
            if self.next_frame < now {
                self.next_frame = now + interval;
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.interval.map(|_| self.next_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_clock_is_monotonic() {
        let mut clock = DeltaClock::new();
        for _ in 0..5 {
            assert!(clock.delta() >= Duration::ZERO);
        }
    }

    #[test]
    fn uncapped_scheduler_is_always_ready() {
        let scheduler = FrameScheduler::new(None);
        assert!(scheduler.ready_for_frame(Instant::now()));
        assert!(scheduler.next_deadline().is_none());
    }

    #[test]
    fn zero_fps_means_uncapped() {
        let scheduler = FrameScheduler::new(Some(0.0));
        assert!(scheduler.next_deadline().is_none());
    }

    #[test]
    fn capped_scheduler_spaces_frames() {
        let mut scheduler = FrameScheduler::new(Some(10.0));
        let now = Instant::now();
        assert!(scheduler.ready_for_frame(now));
        scheduler.mark_rendered(now);
        let deadline = scheduler.next_deadline().expect("deadline");
        assert!(deadline > now);
        assert!(!scheduler.ready_for_frame(now));
        assert!(scheduler.ready_for_frame(deadline));
    }

    #[test]
    fn capped_scheduler_rebases_after_a_stall() {
        let mut scheduler = FrameScheduler::new(Some(1000.0));
        let late = Instant::now() + Duration::from_secs(5);
        scheduler.mark_rendered(late);
        let deadline = scheduler.next_deadline().expect("deadline");
        assert!(deadline > late);
    }
}
