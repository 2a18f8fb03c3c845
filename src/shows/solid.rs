use std::time::Duration;

use crate::blend::SmoothBlend;
use crate::color::Color;
use crate::shows::{Params, Show};
use crate::strip::Strip;

const FRAME_DELAY: Duration = Duration::from_millis(100);

/// One color for the whole strip, faded in from whatever was displayed
/// before.
pub struct Solid {
    strip: Box<dyn Strip>,
    color: Color,
    blend: Option<SmoothBlend>,
}

impl Solid {
    pub fn new(strip: Box<dyn Strip>, color: Color) -> Solid {
        Solid {
            strip,
            color,
            blend: None,
        }
    }
}

pub(crate) fn from_params(strip: Box<dyn Strip>, params: &Params) -> Result<Box<dyn Show>, String> {
    let color = params.require_color(0, "color")?;
    Ok(Box::new(Solid::new(strip, color)))
}

impl Show for Solid {
    fn execute(&mut self, _frame: u64) -> Duration {
        if self.blend.is_none() {
            self.blend = Some(SmoothBlend::uniform(self.strip.as_ref(), self.color));
        }
        if let Some(blend) = &self.blend {
            blend.step(self.strip.as_mut());
        }

        FRAME_DELAY
    }
}
