use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::color::{Color, BLACK};
use crate::shows::{Params, Show};
use crate::strip::Strip;

const FRAME_DELAY: Duration = Duration::from_millis(50);
const STAR_COLOR: Color = Color { r: 255.0, g: 180.0, b: 50.0 };

const DEFAULT_PROBABILITY: f64 = 0.1;
const DEFAULT_LENGTH_SECS: f32 = 5.0;
const DEFAULT_FADE_SECS: f32 = 1.0;

/// Randomly igniting stars that fade in, hold, and fade back out.
///
/// Stars are tracked as position -> birth instant; the brightness envelope
/// is linear-in, hold, linear-out, each leg timed off the birth instant.
pub struct Starlight {
    strip: Box<dyn Strip>,
    num_leds: usize,
    state: HashMap<usize, Instant>,
    probability: f64,
    length: f32,
    fade: f32,
}

impl Starlight {
    pub fn new(
        strip: Box<dyn Strip>,
        probability: f64,
        length: f32,
        fade: f32,
    ) -> Result<Starlight, String> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(format!(
                "probability must be within 0..=1, got {}",
                probability
            ));
        }
        if fade <= 0.0 || length < 0.0 {
            return Err(format!(
                "fade must be positive and length non-negative, got fade={} length={}",
                fade, length
            ));
        }

        let num_leds = strip.len();
        Ok(Starlight {
            strip,
            num_leds,
            state: HashMap::new(),
            probability,
            length,
            fade,
        })
    }

    fn brightness(&self, seconds: f32) -> f32 {
        if seconds < self.fade {
            seconds / self.fade
        } else if seconds < self.length + self.fade {
            1.0
        } else if seconds < self.length + 2.0 * self.fade {
            1.0 - (seconds - self.fade - self.length) / self.fade
        } else {
            0.0
        }
    }
}

pub(crate) fn from_params(strip: Box<dyn Strip>, params: &Params) -> Result<Box<dyn Show>, String> {
    let probability = params.f32(0, "probability")?.map_or(DEFAULT_PROBABILITY, f64::from);
    let length = params.f32(1, "length")?.unwrap_or(DEFAULT_LENGTH_SECS);
    let fade = params.f32(2, "fade")?.unwrap_or(DEFAULT_FADE_SECS);
    Ok(Box::new(Starlight::new(strip, probability, length, fade)?))
}

impl Show for Starlight {
    fn execute(&mut self, _frame: u64) -> Duration {
        let now = Instant::now();

        if self.num_leds > 0 && rand::thread_rng().gen_bool(self.probability) {
            self.state
                .insert(rand::thread_rng().gen_range(0..self.num_leds), now);
        }

        let expiry = self.length + 2.0 * self.fade;
        self.state
            .retain(|_, born| now.duration_since(*born).as_secs_f32() < expiry);

        self.strip.fill(BLACK);
        for (&position, born) in &self.state {
            let seconds = now.duration_since(*born).as_secs_f32();
            let brightness = self.brightness(seconds);
            self.strip.set(position, STAR_COLOR * brightness);
        }

        self.strip.show();
        FRAME_DELAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strip::testing::RecordingStrip;
    use crate::strip::MemoryStrip;
    use rstest::rstest;

    fn starlight(probability: f64) -> Starlight {
        Starlight::new(Box::new(MemoryStrip::new(20)), probability, 5.0, 1.0).unwrap()
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(0.5, 0.5)] // fading in
    #[case(1.0, 1.0)]
    #[case(3.0, 1.0)] // holding
    #[case(6.0, 1.0)]
    #[case(6.5, 0.5)] // fading out
    #[case(7.5, 0.0)] // gone
    fn envelope(#[case] seconds: f32, #[case] expected: f32) {
        assert_eq!(starlight(0.1).brightness(seconds), expected);
    }

    #[test]
    fn guaranteed_spawn_lights_a_star() {
        let mut show = starlight(1.0);
        show.execute(0);
        assert_eq!(show.state.len(), 1);
    }

    #[test]
    fn zero_probability_never_spawns() {
        let mut show = starlight(0.0);
        for frame in 0..100 {
            show.execute(frame);
        }
        assert!(show.state.is_empty());
    }

    #[test]
    fn clears_the_strip_before_drawing() {
        let inner = RecordingStrip::new(20);
        let log = inner.log_handle();
        let mut show = Starlight::new(Box::new(inner), 1.0, 5.0, 1.0).unwrap();

        show.execute(0);

        let recording = log.lock().unwrap();
        assert_eq!(recording.fills, vec![BLACK]);
        assert_eq!(recording.shows, 1);
        assert_eq!(recording.writes.len(), 1);
    }

    #[rstest]
    #[case(-0.1, 5.0, 1.0)]
    #[case(1.5, 5.0, 1.0)]
    #[case(0.1, 5.0, 0.0)]
    #[case(0.1, -1.0, 1.0)]
    fn invalid_parameters_fail_construction(
        #[case] probability: f64,
        #[case] length: f32,
        #[case] fade: f32,
    ) {
        assert!(Starlight::new(Box::new(MemoryStrip::new(20)), probability, length, fade).is_err());
    }
}
