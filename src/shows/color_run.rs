use std::time::Duration;

use rand::Rng;

use crate::color::{Color, BLACK};
use crate::shows::{Params, Show};
use crate::strip::Strip;

/// A lit pixel travelling down the strip at its own speed.
struct Run {
    start: u64,
    speed: f32,
    color: Color,
}

impl Run {
    fn position(&self, frame: u64) -> usize {
        ((frame - self.start) as f32 * self.speed) as usize
    }
}

/// Randomly spawned colored runners racing from one end to the other.
/// Overlapping runners overwrite each other in spawn order.
pub struct ColorRun {
    strip: Box<dyn Strip>,
    num_leds: usize,
    palette: [Color; 7],
    runs: Vec<Run>,
}

impl ColorRun {
    pub fn new(strip: Box<dyn Strip>) -> ColorRun {
        let v = 255.0;
        let palette = [
            Color { r: v, g: 0.0, b: 0.0 },
            Color { r: 0.0, g: v, b: 0.0 },
            Color { r: 0.0, g: 0.0, b: v },
            Color { r: v, g: v, b: 0.0 },
            Color { r: v, g: 0.0, b: v },
            Color { r: 0.0, g: v, b: v },
            Color { r: v, g: v, b: v },
        ];
        let num_leds = strip.len();

        ColorRun {
            strip,
            num_leds,
            palette,
            runs: Vec::new(),
        }
    }
}

pub(crate) fn from_params(strip: Box<dyn Strip>, _params: &Params) -> Result<Box<dyn Show>, String> {
    Ok(Box::new(ColorRun::new(strip)))
}

impl Show for ColorRun {
    fn execute(&mut self, frame: u64) -> Duration {
        let mut rng = rand::thread_rng();

        if self.num_leds > 0 && rng.gen_range(0..=100) > 95 {
            self.runs.push(Run {
                start: frame,
                speed: rng.gen_range(20..=60) as f32 / 100.0,
                color: self.palette[rng.gen_range(0..self.palette.len())],
            });
        }

        self.strip.fill(BLACK);

        let num_leds = self.num_leds;
        self.runs.retain(|run| run.position(frame) < num_leds);
        for run in &self.runs {
            self.strip.set(run.position(frame), run.color);
        }

        self.strip.show();
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strip::testing::RecordingStrip;

    #[test]
    fn run_position_follows_age_times_speed() {
        let run = Run {
            start: 100,
            speed: 0.5,
            color: BLACK,
        };

        assert_eq!(run.position(100), 0);
        assert_eq!(run.position(103), 1);
        assert_eq!(run.position(120), 10);
    }

    #[test]
    fn clears_before_drawing_and_commits() {
        let inner = RecordingStrip::new(30);
        let log = inner.log_handle();
        let mut show = ColorRun::new(Box::new(inner));

        show.execute(0);

        let recording = log.lock().unwrap();
        assert_eq!(recording.fills, vec![BLACK]);
        assert_eq!(recording.shows, 1);
    }

    #[test]
    fn runs_are_pruned_once_off_the_strip() {
        let mut show = ColorRun::new(Box::new(crate::strip::MemoryStrip::new(10)));
        show.runs.push(Run {
            start: 0,
            speed: 0.5,
            color: show.palette[0],
        });

        show.execute(19); // position 9, still on
        assert!(show.runs.iter().any(|run| run.start == 0));

        show.execute(20); // position 10, off the end
        assert!(show.runs.iter().all(|run| run.start != 0));
    }

    #[test]
    fn writes_stay_on_the_strip_over_many_frames() {
        let inner = RecordingStrip::new(10);
        let mut show = ColorRun::new(Box::new(inner));

        for frame in 0..500 {
            show.execute(frame);
        }
    }
}
