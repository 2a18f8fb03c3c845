use std::collections::VecDeque;
use std::time::Duration;

use crate::color::{Color, BLACK};
use crate::shows::{Params, Show};
use crate::strip::Strip;

const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(5);
/// Continuous time advances this much per frame.
const TIME_STEP: f32 = 0.1;
const STRIPE: f32 = 1.0;

/// One bouncing ball on an inverted-parabola trajectory.
///
/// The bounce width follows from the height so every ball touches down with
/// the same apparent gravity; a completed period is detected through the
/// change of `floor(t / width)`.
struct Ball {
    height: f32,
    width: f32,
    center: f32,
    color: Color,
    period: i64,
    next: bool,
}

impl Ball {
    fn new(height: f32, color: Color) -> Ball {
        let height = height - STRIPE;
        let width = 2.0 * height.sqrt();

        Ball {
            height,
            width,
            center: width / 2.0,
            color,
            period: 0,
            next: false,
        }
    }

    fn position(&mut self, t: f32) -> usize {
        let current_period = (t / self.width).floor() as i64;
        if self.period != current_period {
            self.period = current_period;
            self.next = true;
        }

        (self.height - (t % self.width - self.center).powi(2)) as usize
    }

    /// True once per completed bounce period.
    fn take_next(&mut self) -> bool {
        if self.next {
            self.next = false;
            return true;
        }
        false
    }
}

/// Five balls bouncing at different heights, swapping colors with a spare
/// palette slot whenever they touch down.
pub struct Jump {
    strip: Box<dyn Strip>,
    balls: Vec<Ball>,
    spare_colors: VecDeque<Color>,
    pause: Duration,
}

impl Jump {
    pub fn new(strip: Box<dyn Strip>, pause: Duration) -> Jump {
        let num_leds = strip.len() as f32;
        let heights_and_colors = [
            (num_leds, Color { r: 255.0, g: 0.0, b: 0.0 }),
            (num_leds * 0.5, Color { r: 0.0, g: 255.0, b: 0.0 }),
            (num_leds * 0.75, Color { r: 255.0, g: 255.0, b: 0.0 }),
            (num_leds * 0.88, Color { r: 255.0, g: 0.0, b: 255.0 }),
            (num_leds * 0.66, Color { r: 0.0, g: 0.0, b: 255.0 }),
        ];

        // Balls need positive bounce height, tiny strips get fewer balls
        let balls = heights_and_colors
            .into_iter()
            .filter(|(height, _)| *height > STRIPE)
            .map(|(height, color)| Ball::new(height, color))
            .collect();

        Jump {
            strip,
            balls,
            spare_colors: VecDeque::from([Color { r: 0.0, g: 255.0, b: 255.0 }]),
            pause,
        }
    }
}

pub(crate) fn from_params(strip: Box<dyn Strip>, params: &Params) -> Result<Box<dyn Show>, String> {
    let pause = match params.f32(0, "pause_sec")? {
        Some(seconds) if seconds >= 0.0 => Duration::from_secs_f32(seconds),
        Some(seconds) => return Err(format!("pause_sec must not be negative, got {}", seconds)),
        None => DEFAULT_FRAME_DELAY,
    };
    Ok(Box::new(Jump::new(strip, pause)))
}

impl Show for Jump {
    fn execute(&mut self, frame: u64) -> Duration {
        let t = frame as f32 * TIME_STEP;

        self.strip.fill(BLACK);

        for ball in &mut self.balls {
            let position = ball.position(t);
            self.strip.set(position, ball.color);

            if ball.take_next() {
                self.spare_colors.push_front(ball.color);
                if let Some(color) = self.spare_colors.pop_back() {
                    ball.color = color;
                }
            }
        }

        self.strip.show();
        self.pause
    }
}
