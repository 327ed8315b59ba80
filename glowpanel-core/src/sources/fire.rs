//! Live fire animation.

use rand::Rng;

use crate::frame::Frame;
use crate::source::FrameSource;

/// Controls how high the flames reach relative to the panel height.
const FIRE_HEIGHT_FACTOR: f64 = 1.2;

/// Randomly generated live fire.
///
/// The bottom row is reseeded with random heat every frame; heat rises one
/// row per frame while decaying by a random amount, and the heat field is
/// mapped through a hot colormap (black → red → yellow → white).
pub struct Fire {
    heat: Vec<u8>,
    height: usize,
    width: usize,
}

impl Fire {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            heat: vec![0; height * width],
            height,
            width,
        }
    }
}

impl FrameSource for Fire {
    fn next_frame(&mut self) -> Frame {
        let mut rng = rand::thread_rng();

        // Bottom fire starter line is randomly generated.
        for col in 0..self.width {
            self.heat[(self.height - 1) * self.width + col] = rng.gen_range(0x7F..0xFF);
        }

        let decay_max = (self.height as f64 / FIRE_HEIGHT_FACTOR).max(2.0) as u8;
        for row in 0..self.height - 1 {
            for col in 0..self.width {
                let below = self.heat[(row + 1) * self.width + col];
                self.heat[row * self.width + col] =
                    below.saturating_sub(rng.gen_range(0..decay_max));
            }
        }

        let mut frame = Frame::new(self.height, self.width);
        for row in 0..self.height {
            for col in 0..self.width {
                frame.set_pixel(col, row, heat_color(self.heat[row * self.width + col]));
            }
        }
        frame
    }
}

/// Hot colormap: red ramps in first, then green, then blue.
fn heat_color(heat: u8) -> [u8; 3] {
    let ramp = |from: u8| -> u8 {
        let span = i32::from(heat) - i32::from(from);
        (span.max(0) * 3).min(0xFF) as u8
    };
    [ramp(0), ramp(85), ramp(170)]
}

// ── Tests ────────────────────────────────────────────────────────
