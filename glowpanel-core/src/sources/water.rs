//! Water ripple animation.

use rand::Rng;

use crate::frame::Frame;
use crate::source::FrameSource;

/// Wave energy lost per simulation step.
const DAMPING: f64 = 0.9;

/// Height impulse added by one drop.
const DROP_VALUE: f64 = 20.0;

/// Frames between automatic drops.
const DROP_INTERVAL: u32 = 10;

/// Randomly dropped water ripples.
///
/// Classic two-buffer height-field simulation: the next height of a cell
/// is the damped average of its current neighbours minus its previous
/// height. Rendered into the blue channel.
pub struct Water {
    previous: Vec<f64>,
    current: Vec<f64>,
    height: usize,
    width: usize,
    ticks_until_drop: u32,
}

impl Water {
    pub fn new(height: usize, width: usize) -> Self {
        let mut water = Self {
            previous: vec![0.0; height * width],
            current: vec![0.0; height * width],
            height,
            width,
            ticks_until_drop: DROP_INTERVAL,
        };
        water.drop();
        water
    }

    /// Add a drop at a random position away from the borders.
    fn drop(&mut self) {
        let mut rng = rand::thread_rng();
        let row = rng.gen_range(1..self.height - 1);
        let col = rng.gen_range(1..self.width - 1);
        self.current[row * self.width + col] = DROP_VALUE;
    }

    fn step(&mut self) {
        let w = self.width;
        for row in 1..self.height - 1 {
            for col in 1..w - 1 {
                let i = row * w + col;
                let neighbours = self.current[i - w]
                    + self.current[i + w]
                    + self.current[i - 1]
                    + self.current[i + 1];
                self.previous[i] = (neighbours / 2.0 - self.previous[i]) * DAMPING;
            }
        }
        std::mem::swap(&mut self.previous, &mut self.current);
    }
}

impl FrameSource for Water {
    fn next_frame(&mut self) -> Frame {
        if self.ticks_until_drop == 0 {
            self.drop();
            self.ticks_until_drop = DROP_INTERVAL;
        }
        self.ticks_until_drop -= 1;

        self.step();

        let mut frame = Frame::new(self.height, self.width);
        for row in 0..self.height {
            for col in 0..self.width {
                let level = self.current[row * self.width + col].clamp(0.0, 255.0) as u8;
                frame.set_pixel(col, row, [0, 0, level]);
            }
        }
        frame
    }
}

// ── Tests ────────────────────────────────────────────────────────
