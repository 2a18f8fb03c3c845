use json::JsonValue;
use rgb::RGB;

/// Pixel color with float channels in 0.0..=255.0.
///
/// Channels stay float through the whole pipeline so blends land on exact
/// intermediate values; quantization to `u8` happens once, in the output
/// driver.
pub type Color = RGB<f32>;

pub const BLACK: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
};

/// Color wheel: Green -> Red -> Blue -> Green over the position range 0..255.
pub fn wheel(wheel_pos: f32) -> Color {
    let mut pos = wheel_pos;
    if pos > 254.0 {
        // Safeguard, the segments below only cover 0..=254
        pos = 254.0;
    }

    if pos < 85.0 {
        Color {
            r: pos * 3.0,
            g: 255.0 - pos * 3.0,
            b: 0.0,
        }
    } else if pos < 170.0 {
        pos -= 85.0;
        Color {
            r: 255.0 - pos * 3.0,
            g: 0.0,
            b: pos * 3.0,
        }
    } else {
        pos -= 170.0;
        Color {
            r: 0.0,
            g: pos * 3.0,
            b: 255.0 - pos * 3.0,
        }
    }
}

/// Weighted mix of two colors: `start * progress^power + end * (1 - progress)^power`.
///
/// `fade_progress` runs from 1.0 (all start color) down to 0.0 (all end
/// color).
pub fn power_blend(power: f32, start: Color, end: Color, fade_progress: f32) -> Color {
    start * fade_progress.powf(power) + end * (1.0 - fade_progress).powf(power)
}

pub fn linear_blend(start: Color, end: Color, fade_progress: f32) -> Color {
    power_blend(1.0, start, end, fade_progress)
}

/// CIE 1931 lightness correction.
///
/// The human perception of LED brightness is not linear in the duty cycle;
/// this maps a linear 0..=255 lightness to the duty cycle that is perceived
/// as that lightness. Commonly mistaken for gamma correction.
pub fn grayscale_correction(lightness: f32) -> u8 {
    if lightness <= 0.0 {
        return 0;
    }
    if lightness >= 255.0 {
        return 255;
    }

    let l_star = lightness / 255.0 * 100.0;
    let duty_cycle = if l_star <= 8.0 {
        l_star / 902.33
    } else {
        ((l_star + 16.0) / 116.0).powi(3)
    };

    (duty_cycle * 255.0).round() as u8
}

/// Decode a color from a JSON value. Accepts exactly three integer channels
/// in 0..=255; anything else is a descriptive error.
pub fn color_from_json(value: &JsonValue) -> Result<Color, String> {
    if !value.is_array() || value.len() != 3 {
        return Err(format!("Color must be three RGB values, got {}", value));
    }

    let mut channels = [0.0f32; 3];
    for (i, channel) in channels.iter_mut().enumerate() {
        match value[i].as_u8() {
            Some(v) => *channel = v as f32,
            None => {
                return Err(format!(
                    "Color channels must be integers in 0..=255, got {}",
                    value
                ))
            }
        }
    }

    Ok(Color {
        r: channels[0],
        g: channels[1],
        b: channels[2],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, Color { r: 0.0, g: 255.0, b: 0.0 })]
    #[case(84.0, Color { r: 252.0, g: 3.0, b: 0.0 })]
    #[case(85.0, Color { r: 255.0, g: 0.0, b: 0.0 })]
    #[case(169.0, Color { r: 3.0, g: 0.0, b: 252.0 })]
    #[case(170.0, Color { r: 0.0, g: 0.0, b: 255.0 })]
    #[case(254.0, Color { r: 0.0, g: 252.0, b: 3.0 })]
    fn wheel_segments(#[case] pos: f32, #[case] expected: Color) {
        assert_eq!(wheel(pos), expected);
    }

    #[test]
    fn wheel_clamps_overflow() {
        assert_eq!(wheel(255.0), wheel(254.0));
        assert_eq!(wheel(1000.0), wheel(254.0));
    }

    #[test]
    fn linear_blend_endpoints_and_midpoint() {
        let start = Color { r: 0.0, g: 0.0, b: 0.0 };
        let end = Color { r: 255.0, g: 0.0, b: 0.0 };

        assert_eq!(linear_blend(start, end, 1.0), start);
        assert_eq!(linear_blend(start, end, 0.0), end);
        assert_eq!(
            linear_blend(start, end, 0.5),
            Color { r: 127.5, g: 0.0, b: 0.0 }
        );
    }

    #[test]
    fn grayscale_correction_bounds() {
        assert_eq!(grayscale_correction(-1.0), 0);
        assert_eq!(grayscale_correction(0.0), 0);
        assert_eq!(grayscale_correction(255.0), 255);
        assert_eq!(grayscale_correction(400.0), 255);
        // Midtones come out darker than linear
        assert!(grayscale_correction(127.5) < 128);
    }

    #[test]
    fn color_from_json_accepts_rgb_triple() {
        let value = json::array![255, 0, 128];
        assert_eq!(
            color_from_json(&value).unwrap(),
            Color { r: 255.0, g: 0.0, b: 128.0 }
        );
    }

    #[rstest]
    #[case(json::array![255, 0])]
    #[case(json::array![255, 0, 0, 0])]
    #[case(json::array![256, 0, 0])]
    #[case(json::array![-1, 0, 0])]
    #[case(json::array![254.5, 0.0, 0.0])]
    #[case(JsonValue::from("red"))]
    fn color_from_json_rejects_malformed(#[case] value: JsonValue) {
        assert!(color_from_json(&value).is_err());
    }
}
