use std::time::Duration;

use crate::color::BLACK;
use crate::shows::Show;
use crate::strip::Strip;

/// Delay reported when no show is active.
pub const IDLE_DELAY: Duration = Duration::from_millis(100);

/// Holds the one active show and runs it frame by frame.
///
/// Remote controllers swap the show through `set_show` while the scheduler
/// keeps calling `execute`; both sides go through the same mutex, so a swap
/// lands exactly between two frames.
pub struct Control {
    strip: Box<dyn Strip>,
    current: Option<ActiveShow>,
}

struct ActiveShow {
    name: String,
    show: Box<dyn Show>,
}

impl Control {
    pub fn new(strip: Box<dyn Strip>) -> Control {
        Control {
            strip,
            current: None,
        }
    }

    /// Run one frame of the active show, or keep the strip dark when there
    /// is none. Returns the delay the scheduler should wait.
    pub fn execute(&mut self, frame: u64) -> Duration {
        match &mut self.current {
            Some(active) => active.show.execute(frame),
            None => {
                self.strip.fill(BLACK);
                self.strip.show();
                IDLE_DELAY
            }
        }
    }

    /// Replace the active show. The previous one is dropped with all its
    /// state.
    pub fn set_show(&mut self, name: &str, show: Box<dyn Show>) {
        self.current = Some(ActiveShow {
            name: name.to_string(),
            show,
        });
    }

    pub fn clear_show(&mut self) {
        self.current = None;
    }

    pub fn current_show_name(&self) -> Option<&str> {
        self.current.as_ref().map(|active| active.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strip::testing::RecordingStrip;
    use std::sync::{Arc, Mutex};

    struct FrameLog {
        frames: Arc<Mutex<Vec<u64>>>,
        delay: Duration,
    }

    impl Show for FrameLog {
        fn execute(&mut self, frame: u64) -> Duration {
            self.frames.lock().unwrap().push(frame);
            self.delay
        }
    }

    #[test]
    fn idle_control_blanks_the_strip() {
        let strip = RecordingStrip::new(10);
        let log = strip.log_handle();
        let mut control = Control::new(Box::new(strip));

        let delay = control.execute(7);

        assert_eq!(delay, IDLE_DELAY);
        let recording = log.lock().unwrap();
        assert_eq!(recording.fills, vec![BLACK]);
        assert_eq!(recording.shows, 1);
        assert_eq!(control.current_show_name(), None);
    }

    #[test]
    fn active_show_receives_the_scheduler_frame_index() {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let mut control = Control::new(Box::new(RecordingStrip::new(10)));
        control.set_show(
            "framelog",
            Box::new(FrameLog {
                frames: Arc::clone(&frames),
                delay: Duration::from_millis(42),
            }),
        );

        let delay = control.execute(123_456);

        assert_eq!(delay, Duration::from_millis(42));
        assert_eq!(*frames.lock().unwrap(), vec![123_456]);
        assert_eq!(control.current_show_name(), Some("framelog"));
    }

    #[test]
    fn swapping_takes_effect_on_the_next_frame() {
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));
        let mut control = Control::new(Box::new(RecordingStrip::new(10)));

        control.set_show(
            "first",
            Box::new(FrameLog {
                frames: Arc::clone(&first),
                delay: Duration::ZERO,
            }),
        );
        control.execute(10);

        control.set_show(
            "second",
            Box::new(FrameLog {
                frames: Arc::clone(&second),
                delay: Duration::ZERO,
            }),
        );
        control.execute(11);

        assert_eq!(*first.lock().unwrap(), vec![10]);
        assert_eq!(*second.lock().unwrap(), vec![11]);
    }

    #[test]
    fn clearing_returns_to_the_idle_action() {
        let strip = RecordingStrip::new(10);
        let log = strip.log_handle();
        let mut control = Control::new(Box::new(strip));

        control.set_show(
            "framelog",
            Box::new(FrameLog {
                frames: Arc::new(Mutex::new(Vec::new())),
                delay: Duration::ZERO,
            }),
        );
        control.clear_show();
        control.execute(0);

        assert_eq!(log.lock().unwrap().fills, vec![BLACK]);
    }
}
