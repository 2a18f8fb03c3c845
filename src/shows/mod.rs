pub(crate) mod color_ranges;
pub(crate) mod color_run;
pub(crate) mod jump;
pub(crate) mod morse_code;
pub(crate) mod rainbow;
pub(crate) mod solid;
pub(crate) mod starlight;
pub(crate) mod theater_chase;
pub(crate) mod two_color_blend;
pub(crate) mod wave;

use std::time::Duration;

use json::JsonValue;

use crate::color::{color_from_json, Color};
use crate::strip::Strip;

/// A per-frame animation. `execute` renders one complete frame through the
/// strip the show owns and returns how long the scheduler should wait
/// before the next frame.
///
/// The frame index is owned by the scheduler and keeps counting across show
/// swaps, so a fresh show can receive an arbitrarily large first index.
pub trait Show: Send {
    fn execute(&mut self, frame: u64) -> Duration;
}

/// Every show the factory can build, in menu order.
pub const NAMES: [&str; 10] = [
    "solid",
    "two_color_blend",
    "rainbow",
    "jump",
    "color_run",
    "starlight",
    "theater_chase",
    "wave",
    "morse_code",
    "color_ranges",
];

/// Build a show by name from remote-control parameters.
///
/// Parameters arrive as a JSON `args` array and `kwargs` object and are
/// decoded explicitly per show; any mismatch is a recoverable error for the
/// caller to report, the previous show stays untouched.
pub fn create(
    name: &str,
    strip: Box<dyn Strip>,
    args: &JsonValue,
    kwargs: &JsonValue,
) -> Result<Box<dyn Show>, String> {
    let params = Params { args, kwargs };

    match name {
        "solid" => solid::from_params(strip, &params),
        "two_color_blend" => two_color_blend::from_params(strip, &params),
        "rainbow" => rainbow::from_params(strip, &params),
        "jump" => jump::from_params(strip, &params),
        "color_run" => color_run::from_params(strip, &params),
        "starlight" => starlight::from_params(strip, &params),
        "theater_chase" => theater_chase::from_params(strip, &params),
        "wave" => wave::from_params(strip, &params),
        "morse_code" => morse_code::from_params(strip, &params),
        "color_ranges" => color_ranges::from_params(strip, &params),
        _ => Err(format!("Unknown show: {}", name)),
    }
}

/// Accessor over the `args`/`kwargs` pair of a show command. Named
/// parameters win over positional ones.
pub(crate) struct Params<'a> {
    args: &'a JsonValue,
    kwargs: &'a JsonValue,
}

impl<'a> Params<'a> {
    fn get(&self, position: usize, name: &str) -> Option<&JsonValue> {
        if self.kwargs.has_key(name) {
            Some(&self.kwargs[name])
        } else if position < self.args.len() {
            Some(&self.args[position])
        } else {
            None
        }
    }

    pub fn color(&self, position: usize, name: &str) -> Result<Option<Color>, String> {
        match self.get(position, name) {
            Some(value) => color_from_json(value).map(Some),
            None => Ok(None),
        }
    }

    pub fn require_color(&self, position: usize, name: &str) -> Result<Color, String> {
        self.color(position, name)?
            .ok_or_else(|| format!("Missing parameter: {}", name))
    }

    pub fn f32(&self, position: usize, name: &str) -> Result<Option<f32>, String> {
        match self.get(position, name) {
            Some(value) => match value.as_f32() {
                Some(v) => Ok(Some(v)),
                None => Err(format!("Parameter {} must be a number, got {}", name, value)),
            },
            None => Ok(None),
        }
    }

    pub fn usize(&self, position: usize, name: &str) -> Result<Option<usize>, String> {
        match self.get(position, name) {
            Some(value) => match value.as_usize() {
                Some(v) => Ok(Some(v)),
                None => Err(format!(
                    "Parameter {} must be a non-negative integer, got {}",
                    name, value
                )),
            },
            None => Ok(None),
        }
    }

    pub fn string(&self, position: usize, name: &str) -> Result<Option<String>, String> {
        match self.get(position, name) {
            Some(value) => match value.as_str() {
                Some(v) => Ok(Some(v.to_string())),
                None => Err(format!("Parameter {} must be a string, got {}", name, value)),
            },
            None => Ok(None),
        }
    }

    pub fn color_list(&self, position: usize, name: &str) -> Result<Option<Vec<Color>>, String> {
        match self.get(position, name) {
            Some(value) => {
                if !value.is_array() {
                    return Err(format!(
                        "Parameter {} must be a list of colors, got {}",
                        name, value
                    ));
                }
                let mut colors = Vec::with_capacity(value.len());
                for entry in value.members() {
                    colors.push(color_from_json(entry)?);
                }
                Ok(Some(colors))
            }
            None => Ok(None),
        }
    }

    pub fn f32_list(&self, position: usize, name: &str) -> Result<Option<Vec<f32>>, String> {
        match self.get(position, name) {
            Some(value) => {
                if !value.is_array() {
                    return Err(format!(
                        "Parameter {} must be a list of numbers, got {}",
                        name, value
                    ));
                }
                let mut numbers = Vec::with_capacity(value.len());
                for entry in value.members() {
                    match entry.as_f32() {
                        Some(v) => numbers.push(v),
                        None => {
                            return Err(format!(
                                "Parameter {} must contain only numbers, got {}",
                                name, entry
                            ))
                        }
                    }
                }
                Ok(Some(numbers))
            }
            None => Ok(None),
        }
    }
}
