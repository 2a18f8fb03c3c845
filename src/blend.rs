use std::time::{Duration, Instant};

use crate::color::{linear_blend, Color};
use crate::strip::Strip;

/// Default time a blend takes from start colors to target colors.
pub const DEFAULT_FADE: Duration = Duration::from_secs(2);

/// Timed transition from whatever the strip showed at construction to a set
/// of target colors.
///
/// The start colors are snapshotted exactly once; to start a new transition,
/// construct a new blend. Once the duration has elapsed every further `step`
/// keeps resolving to the targets, so shows may step a finished blend every
/// frame.
pub struct SmoothBlend {
    start_time: Instant,
    duration: Duration,
    initial_colors: Vec<Color>,
    target_colors: Vec<Color>,
}

impl SmoothBlend {
    /// Blend towards one target color per pixel. The target list length must
    /// match the strip.
    pub fn new(strip: &dyn Strip, target_colors: Vec<Color>) -> SmoothBlend {
        SmoothBlend::with_duration(strip, target_colors, DEFAULT_FADE)
    }

    /// Blend every pixel towards the same color.
    pub fn uniform(strip: &dyn Strip, color: Color) -> SmoothBlend {
        SmoothBlend::new(strip, vec![color; strip.len()])
    }

    pub fn with_duration(
        strip: &dyn Strip,
        target_colors: Vec<Color>,
        duration: Duration,
    ) -> SmoothBlend {
        assert_eq!(
            target_colors.len(),
            strip.len(),
            "target color count must match the strip length"
        );

        SmoothBlend {
            start_time: Instant::now(),
            duration,
            initial_colors: (0..strip.len()).map(|i| strip.get(i)).collect(),
            target_colors,
        }
    }

    /// Advance the transition: write the interpolated color of every pixel,
    /// then commit once.
    pub fn step(&self, strip: &mut dyn Strip) {
        self.step_at(strip, Instant::now());
    }

    fn step_at(&self, strip: &mut dyn Strip, now: Instant) {
        let elapsed = now.saturating_duration_since(self.start_time).as_secs_f32();
        let fade_progress = 1.0 - (elapsed / self.duration.as_secs_f32()).min(1.0);

        for led in 0..strip.len() {
            strip.set(
                led,
                linear_blend(
                    self.initial_colors[led],
                    self.target_colors[led],
                    fade_progress,
                ),
            );
        }

        strip.show();
    }
}
