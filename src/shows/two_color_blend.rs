use std::time::Duration;

use crate::blend::SmoothBlend;
use crate::color::Color;
use crate::shows::{Params, Show};
use crate::strip::Strip;

const FRAME_DELAY: Duration = Duration::from_millis(100);

/// Linear gradient between two colors across the strip, faded in once.
pub struct TwoColorBlend {
    strip: Box<dyn Strip>,
    color1: Color,
    color2: Color,
    blend: Option<SmoothBlend>,
}

impl TwoColorBlend {
    pub fn new(strip: Box<dyn Strip>, color1: Color, color2: Color) -> TwoColorBlend {
        TwoColorBlend {
            strip,
            color1,
            color2,
            blend: None,
        }
    }

    fn gradient(&self) -> Vec<Color> {
        let num_leds = self.strip.len();

        (0..num_leds)
            .map(|led| {
                let normal_distance = if num_leds > 1 {
                    led as f32 / (num_leds - 1) as f32
                } else {
                    0.0
                };
                self.color1 * (1.0 - normal_distance) + self.color2 * normal_distance
            })
            .collect()
    }
}

pub(crate) fn from_params(strip: Box<dyn Strip>, params: &Params) -> Result<Box<dyn Show>, String> {
    let color1 = params.require_color(0, "color1")?;
    let color2 = params.require_color(1, "color2")?;
    Ok(Box::new(TwoColorBlend::new(strip, color1, color2)))
}

impl Show for TwoColorBlend {
    fn execute(&mut self, _frame: u64) -> Duration {
        if self.blend.is_none() {
            self.blend = Some(SmoothBlend::new(self.strip.as_ref(), self.gradient()));
        }
        if let Some(blend) = &self.blend {
            blend.step(self.strip.as_mut());
        }

        FRAME_DELAY
    }
}
