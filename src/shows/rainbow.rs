use std::time::Duration;

use crate::color::wheel;
use crate::shows::{Params, Show};
use crate::strip::Strip;

const FRAME_DELAY: Duration = Duration::from_millis(2);

/// Rotating hue gradient, fully recomputed from the frame index each frame.
pub struct Rainbow {
    strip: Box<dyn Strip>,
    num_leds: usize,
}

impl Rainbow {
    pub fn new(strip: Box<dyn Strip>) -> Rainbow {
        let num_leds = strip.len();
        Rainbow { strip, num_leds }
    }
}

pub(crate) fn from_params(strip: Box<dyn Strip>, _params: &Params) -> Result<Box<dyn Show>, String> {
    Ok(Box::new(Rainbow::new(strip)))
}

impl Show for Rainbow {
    fn execute(&mut self, frame: u64) -> Duration {
        // Wheel index distance between two neighboring LEDs
        let scale_factor = 255.0 / self.num_leds as f32;
        let start_index = (frame % 255) as f32;

        for i in 0..self.num_leds {
            let led_index = (start_index + i as f32 * scale_factor) % 255.0;
            self.strip.set(i, wheel(led_index));
        }
        self.strip.show();

        FRAME_DELAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strip::testing::RecordingStrip;

    #[test]
    fn writes_every_led_exactly_once_per_frame() {
        let inner = RecordingStrip::new(10);
        let log = inner.log_handle();
        let mut show = Rainbow::new(Box::new(inner));

        show.execute(0);

        let recording = log.lock().unwrap();
        let mut indices: Vec<usize> = recording.writes.iter().map(|w| w.0).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..10).collect::<Vec<usize>>());
        assert_eq!(recording.shows, 1);
    }

    #[test]
    fn adjacent_leds_differ_in_color() {
        let inner = RecordingStrip::new(10);
        let log = inner.log_handle();
        let mut show = Rainbow::new(Box::new(inner));

        show.execute(42);

        let recording = log.lock().unwrap();
        for pair in recording.writes.windows(2) {
            assert_ne!(pair[0].1, pair[1].1);
        }
    }

    #[test]
    fn phase_advances_with_the_frame_index() {
        let inner = RecordingStrip::new(10);
        let log = inner.log_handle();
        let mut show = Rainbow::new(Box::new(inner));

        show.execute(0);
        show.execute(1);

        let recording = log.lock().unwrap();
        // First write of each frame is the phase color of LED 0
        assert_ne!(recording.writes[0].1, recording.writes[10].1);
    }

    #[test]
    fn survives_a_large_starting_frame_index() {
        let mut show = Rainbow::new(Box::new(crate::strip::MemoryStrip::new(10)));
        show.execute(u64::MAX - 1);
    }
}
