use std::time::Duration;

use crate::color::{wheel, Color, BLACK};
use crate::shows::{Params, Show};
use crate::strip::Strip;

const FRAME_DELAY: Duration = Duration::from_millis(50);

pub const DEFAULT_MESSAGE: &str = "HELLO";
const DEFAULT_SPEED: f32 = 0.5;
const DEFAULT_DOT_LENGTH: usize = 1;
const DEFAULT_DASH_LENGTH: usize = 3;

/// Gaps in LEDs: between symbols of a letter, between letters, between
/// words, and after the whole message before it wraps around.
const SYMBOL_GAP: usize = 1;
const LETTER_GAP: usize = 2;
const WORD_GAP: usize = 4;
const TRAILING_GAP: usize = 10;

/// International Morse code.
fn morse_symbols(character: char) -> Option<&'static str> {
    match character {
        'A' => Some(".-"),
        'B' => Some("-..."),
        'C' => Some("-.-."),
        'D' => Some("-.."),
        'E' => Some("."),
        'F' => Some("..-."),
        'G' => Some("--."),
        'H' => Some("...."),
        'I' => Some(".."),
        'J' => Some(".---"),
        'K' => Some("-.-"),
        'L' => Some(".-.."),
        'M' => Some("--"),
        'N' => Some("-."),
        'O' => Some("---"),
        'P' => Some(".--."),
        'Q' => Some("--.-"),
        'R' => Some(".-."),
        'S' => Some("..."),
        'T' => Some("-"),
        'U' => Some("..-"),
        'V' => Some("...-"),
        'W' => Some(".--"),
        'X' => Some("-..-"),
        'Y' => Some("-.--"),
        'Z' => Some("--.."),
        '0' => Some("-----"),
        '1' => Some(".----"),
        '2' => Some("..---"),
        '3' => Some("...--"),
        '4' => Some("....-"),
        '5' => Some("....."),
        '6' => Some("-...."),
        '7' => Some("--..."),
        '8' => Some("---.."),
        '9' => Some("----."),
        '.' => Some(".-.-.-"),
        ',' => Some("--..--"),
        '?' => Some("..--.."),
        '\'' => Some(".----."),
        '!' => Some("-.-.--"),
        '/' => Some("-..-."),
        '(' => Some("-.--."),
        ')' => Some("-.--.-"),
        '&' => Some(".-..."),
        ':' => Some("---..."),
        ';' => Some("-.-.-."),
        '=' => Some("-...-"),
        '+' => Some(".-.-."),
        '-' => Some("-....-"),
        '_' => Some("..--.-"),
        '"' => Some(".-..-."),
        '$' => Some("...-..-"),
        '@' => Some(".--.-."),
        _ => None,
    }
}

/// A text message rendered as a static dot/dash pixel pattern and scrolled
/// across the strip.
///
/// Every word gets its own color, drawn evenly from the hue wheel.
/// Characters without a Morse encoding contribute no pixels; an empty
/// message falls back to the default one.
pub struct MorseCode {
    strip: Box<dyn Strip>,
    num_leds: usize,
    pattern: Vec<Color>,
    speed: f32,
}

impl MorseCode {
    pub fn new(
        strip: Box<dyn Strip>,
        message: &str,
        speed: f32,
        dot_length: usize,
        dash_length: usize,
    ) -> Result<MorseCode, String> {
        if dot_length == 0 || dash_length == 0 {
            return Err(format!(
                "dot and dash must be at least one LED, got {} and {}",
                dot_length, dash_length
            ));
        }

        let message = if message.trim().is_empty() {
            DEFAULT_MESSAGE.to_string()
        } else {
            message.to_uppercase()
        };

        let mut pattern = build_pattern(&message, dot_length, dash_length);
        if pattern.is_empty() {
            // Message had no encodable characters at all
            pattern = vec![BLACK; TRAILING_GAP];
        }

        let num_leds = strip.len();
        Ok(MorseCode {
            strip,
            num_leds,
            pattern,
            speed,
        })
    }
}

fn build_pattern(message: &str, dot_length: usize, dash_length: usize) -> Vec<Color> {
    let words: Vec<&str> = message.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let color_step = 255 / words.len();
    let mut pattern = Vec::new();

    for (word_index, word) in words.iter().enumerate() {
        let color = wheel(((word_index * color_step) % 255) as f32);
        let letter_count = word.chars().count();

        for (letter_index, character) in word.chars().enumerate() {
            let Some(symbols) = morse_symbols(character) else {
                continue;
            };

            let symbol_count = symbols.chars().count();
            for (symbol_index, symbol) in symbols.chars().enumerate() {
                let length = if symbol == '.' { dot_length } else { dash_length };
                pattern.extend(std::iter::repeat(color).take(length));

                if symbol_index < symbol_count - 1 {
                    pattern.extend(std::iter::repeat(BLACK).take(SYMBOL_GAP));
                }
            }

            if letter_index < letter_count - 1 {
                pattern.extend(std::iter::repeat(BLACK).take(LETTER_GAP));
            }
        }

        if word_index < words.len() - 1 {
            pattern.extend(std::iter::repeat(BLACK).take(WORD_GAP));
        }
    }

    if pattern.is_empty() {
        return pattern;
    }

    // Visual gap before the pattern wraps around
    pattern.extend(std::iter::repeat(BLACK).take(TRAILING_GAP));
    pattern
}

pub(crate) fn from_params(strip: Box<dyn Strip>, params: &Params) -> Result<Box<dyn Show>, String> {
    let message = params
        .string(0, "message")?
        .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());
    let speed = params.f32(1, "speed")?.unwrap_or(DEFAULT_SPEED);
    let dot_length = params.usize(2, "dot_length")?.unwrap_or(DEFAULT_DOT_LENGTH);
    let dash_length = params
        .usize(3, "dash_length")?
        .unwrap_or(DEFAULT_DASH_LENGTH);
    Ok(Box::new(MorseCode::new(
        strip,
        &message,
        speed,
        dot_length,
        dash_length,
    )?))
}

impl Show for MorseCode {
    fn execute(&mut self, frame: u64) -> Duration {
        let pattern_length = self.pattern.len();
        let offset = (frame as f64 * f64::from(self.speed)) as i64;
        let offset = offset.rem_euclid(pattern_length as i64) as usize;

        for i in 0..self.num_leds {
            self.strip
                .set(i, self.pattern[(offset + i) % pattern_length]);
        }

        self.strip.show();
        FRAME_DELAY
    }
}
