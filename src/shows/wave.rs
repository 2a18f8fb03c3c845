use std::f32::consts::PI;
use std::time::Duration;

use crate::color::{wheel, BLACK};
use crate::shows::{Params, Show};
use crate::strip::Strip;

/// Internal time advances this much per frame.
const TIME_STEP: f32 = 0.05;

const DEFAULT_WAVE_SPEED: f32 = 2.0;
const DEFAULT_DECAY_RATE: f32 = 0.5;
const DEFAULT_BRIGHTNESS_FREQUENCY: f32 = 0.4;
const DEFAULT_WAVELENGTH: f32 = 4.0;

/// Traveling wave: a sinusoidal brightness profile propagates outward from
/// the source end, each crest keeps the hue it was emitted with, and the
/// whole thing decays exponentially towards the far end.
pub struct Wave {
    strip: Box<dyn Strip>,
    num_leds: usize,
    wave_speed: f32,
    decay_rate: f32,
    brightness_frequency: f32,
    wavelength: f32,
    time: f32,
    color_time: f32,
}

impl Wave {
    pub fn new(
        strip: Box<dyn Strip>,
        wave_speed: f32,
        decay_rate: f32,
        brightness_frequency: f32,
        wavelength: f32,
    ) -> Result<Wave, String> {
        if wave_speed <= 0.0 || wavelength <= 0.0 {
            return Err(format!(
                "wave_speed and wavelength must be positive, got {} and {}",
                wave_speed, wavelength
            ));
        }

        let num_leds = strip.len();
        Ok(Wave {
            strip,
            num_leds,
            wave_speed,
            decay_rate,
            brightness_frequency,
            wavelength,
            time: 0.0,
            color_time: 0.0,
        })
    }
}

pub(crate) fn from_params(strip: Box<dyn Strip>, params: &Params) -> Result<Box<dyn Show>, String> {
    let wave_speed = params.f32(0, "wave_speed")?.unwrap_or(DEFAULT_WAVE_SPEED);
    let decay_rate = params.f32(1, "decay_rate")?.unwrap_or(DEFAULT_DECAY_RATE);
    let brightness_frequency = params
        .f32(2, "brightness_frequency")?
        .unwrap_or(DEFAULT_BRIGHTNESS_FREQUENCY);
    let wavelength = params.f32(3, "wavelength")?.unwrap_or(DEFAULT_WAVELENGTH);
    Ok(Box::new(Wave::new(
        strip,
        wave_speed,
        decay_rate,
        brightness_frequency,
        wavelength,
    )?))
}

impl Show for Wave {
    fn execute(&mut self, _frame: u64) -> Duration {
        self.time += TIME_STEP;
        self.color_time += TIME_STEP;

        // Source oscillates between 0.3 and 1.0
        let source_brightness =
            0.65 + 0.35 * (self.time * self.brightness_frequency * 2.0 * PI).sin();

        self.strip.fill(BLACK);

        for i in 0..self.num_leds {
            let wave_position =
                (i as f32 - self.time * self.wave_speed * 10.0) / self.wavelength;
            let wave_brightness = (wave_position.sin() + 1.0) / 2.0;

            // When was this pixel's light emitted at the source? That
            // instant picks its hue, so color travels with the wave.
            let emission_time = self.color_time - i as f32 / (self.wave_speed * 10.0);
            let pixel_color = wheel((emission_time * 20.0).rem_euclid(255.0));

            let distance_factor = (-self.decay_rate * i as f32 / self.num_leds as f32).exp();

            let brightness = source_brightness * wave_brightness * distance_factor;
            self.strip.set(i, pixel_color * brightness);
        }

        self.strip.show();
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strip::testing::RecordingStrip;
    use crate::strip::MemoryStrip;

    #[test]
    fn writes_every_pixel_after_a_black_clear() {
        let inner = RecordingStrip::new(20);
        let log = inner.log_handle();
        let mut show = Wave::new(Box::new(inner), 2.0, 0.5, 0.4, 4.0).unwrap();

        show.execute(0);

        let recording = log.lock().unwrap();
        assert_eq!(recording.fills, vec![BLACK]);
        assert_eq!(recording.writes.len(), 20);
        assert_eq!(recording.shows, 1);
    }

    #[test]
    fn brightness_decays_towards_the_far_end() {
        let mut show = Wave::new(Box::new(MemoryStrip::new(100)), 2.0, 0.5, 0.4, 4.0).unwrap();
        show.execute(0);

        // The decay envelope bounds every pixel; compare the brightest
        // possible values near both ends over a couple of wavelengths.
        let near: f32 = (0..10)
            .map(|i| {
                let c = show.strip.get(i);
                c.r + c.g + c.b
            })
            .fold(0.0, f32::max);
        let far: f32 = (90..100)
            .map(|i| {
                let c = show.strip.get(i);
                c.r + c.g + c.b
            })
            .fold(0.0, f32::max);

        assert!(near > far);
    }

    #[test]
    fn wave_pattern_moves_over_time() {
        let mut show = Wave::new(Box::new(MemoryStrip::new(30)), 2.0, 0.5, 0.4, 4.0).unwrap();
        show.execute(0);
        let first: Vec<_> = (0..30).map(|i| show.strip.get(i)).collect();

        show.execute(1);
        let second: Vec<_> = (0..30).map(|i| show.strip.get(i)).collect();

        assert_ne!(first, second);
    }

    #[test]
    fn zero_wavelength_fails_construction() {
        assert!(Wave::new(Box::new(MemoryStrip::new(10)), 2.0, 0.5, 0.4, 0.0).is_err());
    }
}
