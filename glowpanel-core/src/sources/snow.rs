//! Falling snow animation.

use rand::Rng;

use crate::frame::Frame;
use crate::source::FrameSource;

/// Randomly generated falling snowflakes.
///
/// Flakes drift straight down one row per frame; the top row is reseeded
/// with a density that itself varies randomly, giving gusty bursts.
pub struct Snow {
    flakes: Vec<bool>,
    height: usize,
    width: usize,
}

impl Snow {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            flakes: vec![false; height * width],
            height,
            width,
        }
    }
}

impl FrameSource for Snow {
    fn next_frame(&mut self) -> Frame {
        let mut rng = rand::thread_rng();

        for row in (1..self.height).rev() {
            for col in 0..self.width {
                self.flakes[row * self.width + col] = self.flakes[(row - 1) * self.width + col];
            }
        }

        let density = rng.gen_range(0.0..1.0) * 0.1;
        for col in 0..self.width {
            self.flakes[col] = rng.gen_range(0.0..1.0) < density;
        }

        let mut frame = Frame::new(self.height, self.width);
        for row in 0..self.height {
            for col in 0..self.width {
                if self.flakes[row * self.width + col] {
                    frame.set_pixel(col, row, [0xFF, 0xFF, 0xFF]);
                }
            }
        }
        frame
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PANEL_WIDTH;

    #[test]
    fn flakes_fall_one_row_per_frame() {
        let mut snow = Snow::new(32, PANEL_WIDTH);
        snow.flakes[5] = true; // (row 0, col 5)

        let frame = snow.next_frame();
        assert_eq!(frame.pixel(5, 1), [0xFF, 0xFF, 0xFF]);

        let frame = snow.next_frame();
        assert_eq!(frame.pixel(5, 2), [0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn flakes_leave_through_the_bottom() {
        let mut snow = Snow::new(4, PANEL_WIDTH);
        snow.flakes[3 * PANEL_WIDTH + 9] = true; // bottom row

        let frame = snow.next_frame();
        assert_eq!(frame.pixel(9, 3), [0, 0, 0]);
    }

    #[test]
    fn snow_is_strictly_monochrome() {
        let mut snow = Snow::new(32, PANEL_WIDTH);
        for _ in 0..16 {
            let frame = snow.next_frame();
            for px in frame.bytes().chunks_exact(3) {
                assert!(matches!(px, [0, 0, 0] | [0xFF, 0xFF, 0xFF]));
            }
        }
    }
}
