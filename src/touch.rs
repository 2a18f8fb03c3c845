use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use json::JsonValue;

use crate::control::Control;
use crate::layout::Layout;
use crate::olaoutput::StripHandle;
use crate::shows;
use crate::strip::Strip;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Crude debounce: ignore the pad for a while after a registered press.
const PRESS_COOLDOWN: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    /// Next show.
    Show,
    /// Next parameter variant of the current show.
    Variant,
    /// Next layout wrapping.
    Layout,
}

/// The physical pad. Implementations poll their sensor hardware and report
/// a registered press; construction and pin wiring stay with the
/// implementor.
pub trait TouchPad: Send {
    fn poll(&mut self) -> Option<Button>;
}

struct Preset {
    name: &'static str,
    /// Positional argument lists, one per variant. Empty means the show has
    /// no variants.
    variants: Vec<JsonValue>,
}

/// Button-driven preset controller: one button cycles shows, one cycles the
/// parameter variants of the current show, one cycles layout wrappings.
/// Variant positions are remembered per show.
pub struct TouchControl {
    control: Arc<Mutex<Control>>,
    strip: StripHandle,
    presets: Vec<Preset>,
    layouts: Vec<(i32, bool, bool)>,
    show_index: usize,
    variant_indices: Vec<usize>,
    layout_index: usize,
}

fn preset_menu() -> Vec<Preset> {
    vec![
        Preset {
            name: "solid",
            variants: vec![
                json::array![[255, 190, 130]],
                json::array![[255, 255, 255]],
                json::array![[255, 0, 0]],
                json::array![[255, 127, 0]],
                json::array![[255, 255, 0]],
                json::array![[0, 255, 0]],
                json::array![[0, 255, 255]],
                json::array![[0, 127, 255]],
                json::array![[0, 0, 255]],
                json::array![[255, 0, 255]],
            ],
        },
        Preset {
            name: "two_color_blend",
            variants: vec![
                json::array![[0, 0, 255], [255, 0, 0]],
                json::array![[0, 255, 0], [255, 0, 0]],
                json::array![[0, 255, 0], [0, 0, 255]],
            ],
        },
        Preset {
            name: "color_run",
            variants: Vec::new(),
        },
        Preset {
            name: "jump",
            variants: Vec::new(),
        },
        Preset {
            name: "rainbow",
            variants: Vec::new(),
        },
        Preset {
            name: "wave",
            variants: Vec::new(),
        },
        Preset {
            name: "starlight",
            variants: vec![
                json::array![0.1, 0.0, 0.25],
                json::array![0.02, 5.0, 1.0],
            ],
        },
        Preset {
            name: "theater_chase",
            variants: vec![json::array![21], json::array![42], json::array![84]],
        },
    ]
}

impl TouchControl {
    pub fn new(control: Arc<Mutex<Control>>, strip: StripHandle) -> TouchControl {
        let presets = preset_menu();
        let variant_indices = vec![0; presets.len()];

        TouchControl {
            control,
            strip,
            presets,
            layouts: vec![
                (0, false, false),
                (0, false, true),
                (0, true, false),
                (0, true, true),
                (100, true, false),
                (100, true, true),
            ],
            show_index: 0,
            variant_indices,
            layout_index: 0,
        }
    }

    /// Advance the selection for one button press and rebuild the show.
    pub fn handle(&mut self, button: Button) {
        match button {
            Button::Show => {
                self.show_index = (self.show_index + 1) % self.presets.len();
            }
            Button::Variant => {
                let variants = self.presets[self.show_index].variants.len();
                if variants > 0 {
                    self.variant_indices[self.show_index] =
                        (self.variant_indices[self.show_index] + 1) % variants;
                }
            }
            Button::Layout => {
                self.layout_index = (self.layout_index + 1) % self.layouts.len();
            }
        }

        self.apply();
    }

    fn apply(&mut self) {
        let preset = &self.presets[self.show_index];
        let args = if preset.variants.is_empty() {
            JsonValue::new_array()
        } else {
            preset.variants[self.variant_indices[self.show_index]].clone()
        };

        let (dead, mirror, reverse) = self.layouts[self.layout_index];
        let base: Box<dyn Strip> = Box::new(self.strip.clone());
        let target = match Layout::new(base, dead, mirror, reverse) {
            Ok(layout) => Box::new(layout) as Box<dyn Strip>,
            Err(err) => {
                log::warn!("Skipping layout preset: {}", err);
                Box::new(self.strip.clone())
            }
        };

        log::info!(
            "Preset: show={} variant={} layout={}",
            preset.name,
            self.variant_indices[self.show_index],
            self.layout_index
        );

        match shows::create(preset.name, target, &args, &JsonValue::new_object()) {
            Ok(show) => self.control.lock().unwrap().set_show(preset.name, show),
            Err(err) => log::warn!("Failed to create show {}: {}", preset.name, err),
        }
    }

    pub fn run(&mut self, pad: &mut dyn TouchPad, shutdown: &AtomicBool) {
        while !shutdown.load(Ordering::Relaxed) {
            if let Some(button) = pad.poll() {
                self.handle(button);
                thread::sleep(PRESS_COOLDOWN);
            }

            thread::sleep(POLL_INTERVAL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::olaoutput::OlaStrip;
    use std::net::SocketAddr;
    use std::str::FromStr;

    fn harness() -> (TouchControl, Arc<Mutex<Control>>) {
        let target = SocketAddr::from_str("127.0.0.1:7770").unwrap();
        let strip = StripHandle::new(OlaStrip::new(160, 0.1, target).unwrap());
        let control = Arc::new(Mutex::new(Control::new(Box::new(strip.clone()))));
        (
            TouchControl::new(Arc::clone(&control), strip),
            control,
        )
    }

    #[test]
    fn show_button_cycles_through_the_menu() {
        let (mut touch, control) = harness();

        touch.handle(Button::Show);
        assert_eq!(
            control.lock().unwrap().current_show_name(),
            Some("two_color_blend")
        );

        for _ in 0..7 {
            touch.handle(Button::Show);
        }
        // Wrapped around the eight entries
        assert_eq!(control.lock().unwrap().current_show_name(), Some("solid"));
    }

    #[test]
    fn variant_button_cycles_within_the_current_show() {
        let (mut touch, control) = harness();

        touch.handle(Button::Variant);
        assert_eq!(touch.variant_indices[0], 1);
        assert_eq!(control.lock().unwrap().current_show_name(), Some("solid"));

        // Shows without variants keep their index at zero
        for _ in 0..4 {
            touch.handle(Button::Show);
        }
        touch.handle(Button::Variant);
        assert_eq!(
            control.lock().unwrap().current_show_name(),
            Some("rainbow")
        );
        assert_eq!(touch.variant_indices[4], 0);
    }

    #[test]
    fn variant_positions_are_remembered_per_show() {
        let (mut touch, _control) = harness();

        touch.handle(Button::Variant);
        touch.handle(Button::Variant);
        assert_eq!(touch.variant_indices[0], 2);

        touch.handle(Button::Show);
        touch.handle(Button::Variant);
        assert_eq!(touch.variant_indices[1], 1);
        // The solid selection survived the excursion
        assert_eq!(touch.variant_indices[0], 2);
    }

    #[test]
    fn layout_button_keeps_the_show_running() {
        let (mut touch, control) = harness();

        touch.handle(Button::Layout);
        assert_eq!(touch.layout_index, 1);
        assert_eq!(control.lock().unwrap().current_show_name(), Some("solid"));

        // Mirrored layout with dead zone: (160 - 100) / 2 works out evenly
        for _ in 0..3 {
            touch.handle(Button::Layout);
        }
        assert_eq!(touch.layout_index, 4);
        assert_eq!(control.lock().unwrap().current_show_name(), Some("solid"));
    }
}
