use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::color::BLACK;
use crate::control::Control;
use crate::strip::Strip;

/// The render loop: one frame per iteration, paced by whatever delay the
/// active show requested.
///
/// This is deliberately not a fixed-tick loop. Shows own their rhythm; the
/// frame index keeps counting monotonically no matter which show consumes
/// it.
pub struct Scheduler {
    control: Arc<Mutex<Control>>,
    strip: Box<dyn Strip>,
    shutdown: Arc<AtomicBool>,
    frames: u32,
    last_fps_print: Instant,
}

impl Scheduler {
    pub fn new(
        control: Arc<Mutex<Control>>,
        strip: Box<dyn Strip>,
        shutdown: Arc<AtomicBool>,
    ) -> Scheduler {
        Scheduler {
            control,
            strip,
            shutdown,
            frames: 0,
            last_fps_print: Instant::now(),
        }
    }

    pub fn run(&mut self) {
        let mut frame: u64 = 0;

        while !self.shutdown.load(Ordering::Relaxed) {
            let delay = self.control.lock().unwrap().execute(frame);
            frame += 1;

            self.update_fps();
            thread::sleep(delay);
        }

        // Leave the hardware dark on the way out
        self.strip.fill(BLACK);
        self.strip.show();
        log::info!("Render loop stopped after {} frames", frame);
    }

    fn update_fps(&mut self) {
        self.frames += 1;

        if Instant::now() - self.last_fps_print > Duration::from_secs(1) {
            log::debug!("Render FPS: {}", self.frames);
            self.frames = 0;
            self.last_fps_print = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shows::Show;
    use crate::strip::testing::RecordingStrip;

    /// Requests zero delay and pulls the plug after a fixed frame count.
    struct StopAfter {
        remaining: u32,
        seen_frames: Arc<Mutex<Vec<u64>>>,
        shutdown: Arc<AtomicBool>,
    }

    impl Show for StopAfter {
        fn execute(&mut self, frame: u64) -> Duration {
            self.seen_frames.lock().unwrap().push(frame);
            self.remaining -= 1;
            if self.remaining == 0 {
                self.shutdown.store(true, Ordering::Relaxed);
            }
            Duration::ZERO
        }
    }

    #[test]
    fn runs_frames_in_order_and_blanks_on_shutdown() {
        let shutdown = Arc::new(AtomicBool::new(false));
        let seen_frames = Arc::new(Mutex::new(Vec::new()));

        let control = Arc::new(Mutex::new(Control::new(Box::new(RecordingStrip::new(4)))));
        control.lock().unwrap().set_show(
            "stop_after",
            Box::new(StopAfter {
                remaining: 3,
                seen_frames: Arc::clone(&seen_frames),
                shutdown: Arc::clone(&shutdown),
            }),
        );

        let strip = RecordingStrip::new(4);
        let log = strip.log_handle();
        let mut scheduler = Scheduler::new(control, Box::new(strip), shutdown);
        scheduler.run();

        assert_eq!(*seen_frames.lock().unwrap(), vec![0, 1, 2]);
        let recording = log.lock().unwrap();
        assert_eq!(recording.fills, vec![BLACK]);
        assert_eq!(recording.shows, 1);
    }

    #[test]
    fn preset_shutdown_flag_stops_before_the_first_frame() {
        let shutdown = Arc::new(AtomicBool::new(true));
        let control = Arc::new(Mutex::new(Control::new(Box::new(RecordingStrip::new(4)))));

        let strip = RecordingStrip::new(4);
        let log = strip.log_handle();
        let mut scheduler = Scheduler::new(control, Box::new(strip), shutdown);
        scheduler.run();

        // Only the exit blackout touched the strip
        assert_eq!(log.lock().unwrap().fills, vec![BLACK]);
    }
}
