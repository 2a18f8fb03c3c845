use std::net::{SocketAddr, UdpSocket};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use rosc::{encoder, OscMessage, OscPacket, OscType};

use crate::color::{grayscale_correction, Color, BLACK};
use crate::strip::Strip;

const DMX_CHANNELS: usize = 512;
/// Three channels per pixel, one universe.
pub const MAX_LEDS: usize = DMX_CHANNELS / 3;

/// Raw OLA endpoint: a DMX universe shipped as an OSC blob over UDP.
pub struct OlaOutput {
    sock: UdpSocket,
    target_addr: SocketAddr,
    buffer: Vec<u8>,
}

impl OlaOutput {
    pub fn new(target_addr: SocketAddr) -> Result<OlaOutput, String> {
        let our_addr = SocketAddr::from_str("0.0.0.0:0").unwrap();
        let sock = match UdpSocket::bind(our_addr) {
            Ok(sock) => sock,
            Err(error) => return Err(error.to_string()),
        };

        Ok(OlaOutput {
            sock,
            target_addr,
            buffer: vec![0; DMX_CHANNELS],
        })
    }

    pub fn set_rgb(&mut self, start_channel: usize, values: [u8; 3]) {
        self.buffer[start_channel..start_channel + 3].copy_from_slice(&values);
    }

    pub fn flush(&mut self) {
        let msg_buf = encoder::encode(&OscPacket::Message(OscMessage {
            addr: "/dmx/universe/0".to_string(),
            args: vec![OscType::Blob(self.buffer.clone())],
        }))
        .unwrap();

        if let Err(err) = self.sock.send_to(&msg_buf, self.target_addr) {
            log::warn!("Failed to send DMX frame: {}", err);
        }
    }

    pub fn blackout(&mut self) {
        for channel in &mut self.buffer {
            *channel = 0;
        }
        self.flush();
    }
}

/// The physical strip: float pixel buffer in front of an [`OlaOutput`].
///
/// Pixels stay float until `show`, which scales them by the master
/// brightness, runs the CIE lightness correction and quantizes to the DMX
/// byte range.
pub struct OlaStrip {
    pixels: Vec<Color>,
    brightness: f32,
    output: OlaOutput,
}

impl OlaStrip {
    pub fn new(
        num_leds: usize,
        brightness: f32,
        target_addr: SocketAddr,
    ) -> Result<OlaStrip, String> {
        if num_leds > MAX_LEDS {
            return Err(format!(
                "{} LEDs do not fit the {} channel DMX universe",
                num_leds, DMX_CHANNELS
            ));
        }

        Ok(OlaStrip {
            pixels: vec![BLACK; num_leds],
            brightness: brightness.clamp(0.0, 1.0),
            output: OlaOutput::new(target_addr)?,
        })
    }
}

impl Strip for OlaStrip {
    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn get(&self, index: usize) -> Color {
        self.pixels[index]
    }

    fn set(&mut self, index: usize, color: Color) {
        self.pixels[index] = color;
    }

    fn fill(&mut self, color: Color) {
        for pixel in &mut self.pixels {
            *pixel = color;
        }
    }

    fn show(&mut self) {
        for (i, pixel) in self.pixels.iter().enumerate() {
            self.output.set_rgb(
                i * 3,
                [
                    grayscale_correction(pixel.r * self.brightness),
                    grayscale_correction(pixel.g * self.brightness),
                    grayscale_correction(pixel.b * self.brightness),
                ],
            );
        }
        self.output.flush();
    }
}

/// Cloneable handle on the one physical strip.
///
/// The render thread, the remote controllers and every layout wrap the same
/// strip through clones of this handle; each operation takes the lock for
/// its duration only.
#[derive(Clone)]
pub struct StripHandle {
    inner: Arc<Mutex<OlaStrip>>,
}

impl StripHandle {
    pub fn new(strip: OlaStrip) -> StripHandle {
        StripHandle {
            inner: Arc::new(Mutex::new(strip)),
        }
    }

    pub fn brightness(&self) -> f32 {
        self.inner.lock().unwrap().brightness
    }

    /// Master brightness, clamped into 0..=1. Takes effect on the next
    /// commit.
    pub fn set_brightness(&self, brightness: f32) {
        self.inner.lock().unwrap().brightness = brightness.clamp(0.0, 1.0);
    }

    /// Blank the hardware immediately.
    pub fn blackout(&self) {
        let mut strip = self.inner.lock().unwrap();
        strip.fill(BLACK);
        strip.output.blackout();
    }
}

impl Strip for StripHandle {
    fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    fn get(&self, index: usize) -> Color {
        self.inner.lock().unwrap().get(index)
    }

    fn set(&mut self, index: usize, color: Color) {
        self.inner.lock().unwrap().set(index, color);
    }

    fn fill(&mut self, color: Color) {
        self.inner.lock().unwrap().fill(color);
    }

    fn show(&mut self) {
        self.inner.lock().unwrap().show();
    }
}
