use std::time::Duration;

use crate::blend::SmoothBlend;
use crate::color::Color;
use crate::shows::{Params, Show};
use crate::strip::Strip;

const FRAME_DELAY: Duration = Duration::from_millis(25);

/// Solid color segments with sharp boundaries, sized by strip percentage.
///
/// Good for flags: equal thirds by default, or explicit boundary
/// percentages for unequal stripes.
pub struct ColorRanges {
    strip: Box<dyn Strip>,
    target_colors: Vec<Color>,
    blend: Option<SmoothBlend>,
}

/// `(start percent, end percent, color)` per segment.
type Segment = (f32, f32, Color);

impl ColorRanges {
    /// `boundaries`, when given, holds the inner segment borders in percent,
    /// strictly ascending and strictly inside (0, 100); its length must be
    /// one less than the color count.
    pub fn new(
        strip: Box<dyn Strip>,
        colors: Vec<Color>,
        boundaries: Option<Vec<f32>>,
    ) -> Result<ColorRanges, String> {
        if colors.is_empty() {
            return Err("Colors list cannot be empty".to_string());
        }

        let segments = match boundaries {
            Some(ref bounds) if !bounds.is_empty() => {
                validate_boundaries(bounds, colors.len())?;
                segments_from_boundaries(&colors, bounds)
            }
            _ => equal_segments(&colors),
        };

        let target_colors = segment_colors(&segments, strip.len());
        Ok(ColorRanges {
            strip,
            target_colors,
            blend: None,
        })
    }
}

pub(crate) fn from_params(strip: Box<dyn Strip>, params: &Params) -> Result<Box<dyn Show>, String> {
    let colors = params
        .color_list(0, "colors")?
        .ok_or_else(|| "Missing parameter: colors".to_string())?;
    let boundaries = params.f32_list(1, "ranges")?;
    Ok(Box::new(ColorRanges::new(strip, colors, boundaries)?))
}

fn validate_boundaries(boundaries: &[f32], num_colors: usize) -> Result<(), String> {
    let expected = num_colors - 1;
    if boundaries.len() != expected {
        return Err(format!(
            "Ranges list must have {} elements (one less than colors), got {}",
            expected,
            boundaries.len()
        ));
    }

    for boundary in boundaries {
        if !(0.0 < *boundary && *boundary < 100.0) {
            return Err(format!(
                "Boundaries must be between 0 and 100, got {}",
                boundary
            ));
        }
    }
    for pair in boundaries.windows(2) {
        if pair[0] >= pair[1] {
            return Err(format!(
                "Boundaries must be in ascending order: {} >= {}",
                pair[0], pair[1]
            ));
        }
    }

    Ok(())
}

fn equal_segments(colors: &[Color]) -> Vec<Segment> {
    let pct_per_color = 100.0 / colors.len() as f32;

    colors
        .iter()
        .enumerate()
        .map(|(i, color)| {
            let start = i as f32 * pct_per_color;
            // The last segment ends at exactly 100 to dodge float drift
            let end = if i == colors.len() - 1 {
                100.0
            } else {
                (i + 1) as f32 * pct_per_color
            };
            (start, end, *color)
        })
        .collect()
}

fn segments_from_boundaries(colors: &[Color], boundaries: &[f32]) -> Vec<Segment> {
    colors
        .iter()
        .enumerate()
        .map(|(i, color)| {
            let start = if i == 0 { 0.0 } else { boundaries[i - 1] };
            let end = if i == colors.len() - 1 {
                100.0
            } else {
                boundaries[i]
            };
            (start, end, *color)
        })
        .collect()
}

/// Resolve percentage segments to one color per LED. Index-based so the
/// boundaries stay sharp regardless of float comparison quirks.
fn segment_colors(segments: &[Segment], num_leds: usize) -> Vec<Color> {
    if num_leds == 1 {
        return vec![segments[0].2];
    }

    let mut led_colors = vec![crate::color::BLACK; num_leds];
    for (start_pct, end_pct, color) in segments {
        let start_idx = (start_pct / 100.0 * num_leds as f32) as usize;
        let mut end_idx = (end_pct / 100.0 * num_leds as f32) as usize;
        if (end_pct - 100.0).abs() < 1e-6 {
            end_idx = num_leds;
        }

        for led_color in &mut led_colors[start_idx..end_idx] {
            *led_color = *color;
        }
    }

    led_colors
}

impl Show for ColorRanges {
    fn execute(&mut self, _frame: u64) -> Duration {
        if self.blend.is_none() {
            self.blend = Some(SmoothBlend::new(
                self.strip.as_ref(),
                self.target_colors.clone(),
            ));
        }
        if let Some(blend) = &self.blend {
            blend.step(self.strip.as_mut());
        }

        FRAME_DELAY
    }
}
