use std::time::Duration;

use crate::color::{wheel, BLACK};
use crate::shows::{Params, Show};
use crate::strip::Strip;

/// Each segment is 7 dots long: 2 blank, 5 filled.
const SEGMENT: u64 = 7;
const DEFAULT_STEPS_PER_CYCLE: u64 = 21;

/// Marquee chase: the two blank pixels of every 7-pixel segment march one
/// step ahead each frame while the fill color crawls around the wheel.
///
/// One cycle is one trip through the color wheel; for a seamless wrap
/// `steps_per_cycle` wants to be a multiple of 7.
pub struct TheaterChase {
    strip: Box<dyn Strip>,
    num_leds: usize,
    steps_per_cycle: u64,
}

impl TheaterChase {
    pub fn new(strip: Box<dyn Strip>, steps_per_cycle: u64) -> Result<TheaterChase, String> {
        if steps_per_cycle == 0 {
            return Err("steps_per_cycle must be at least 1".to_string());
        }

        let num_leds = strip.len();
        Ok(TheaterChase {
            strip,
            num_leds,
            steps_per_cycle,
        })
    }
}

pub(crate) fn from_params(strip: Box<dyn Strip>, params: &Params) -> Result<Box<dyn Show>, String> {
    let steps = params
        .usize(0, "num_steps_per_cycle")?
        .map_or(DEFAULT_STEPS_PER_CYCLE, |v| v as u64);
    Ok(Box::new(TheaterChase::new(strip, steps)?))
}

impl Show for TheaterChase {
    fn execute(&mut self, frame: u64) -> Duration {
        let start_index = (frame % SEGMENT) as usize;
        let cycle_pos = (frame % self.steps_per_cycle) as f32 / self.steps_per_cycle as f32;
        let color = wheel((cycle_pos * 255.0).round());

        for pixel in 0..self.num_leds {
            if (pixel + start_index) % SEGMENT as usize <= 1 {
                self.strip.set(pixel, BLACK);
            } else {
                self.strip.set(pixel, color);
            }
        }

        self.strip.show();
        Duration::ZERO
    }
}
