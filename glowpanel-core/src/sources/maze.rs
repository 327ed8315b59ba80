//! Growing-tree maze animation.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::frame::Frame;
use crate::source::FrameSource;

/// Color of a cell on the forward pass.
const FORWARD: [u8; 3] = [0x00, 0xFF, 0x00];

/// Color of a cell once the walker backtracks over it.
const BACKWARD: [u8; 3] = [0xFF, 0x00, 0x00];

const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Maze generated with the growing-tree algorithm.
///
/// An explicit frontier stack keeps frame production bounded and
/// resumable: every call advances the walker by exactly one cell, either
/// exploring (green) or backtracking (red). Once every cell has been
/// visited the screen resets and a new maze starts from a random cell.
pub struct Maze {
    frame: Frame,
    stack: Vec<(usize, usize)>,
    height: usize,
    width: usize,
}

impl Maze {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            frame: Frame::new(height, width),
            stack: Vec::with_capacity(height * width),
            height,
            width,
        }
    }

    fn unvisited_neighbours(&self, y: usize, x: usize) -> Vec<(usize, usize)> {
        let mut moves = Vec::with_capacity(4);
        for (dy, dx) in DIRECTIONS {
            let ny = y as isize + dy;
            let nx = x as isize + dx;
            if ny >= 0
                && nx >= 0
                && (ny as usize) < self.height
                && (nx as usize) < self.width
                && self.frame.pixel(nx as usize, ny as usize) == [0, 0, 0]
            {
                moves.push((ny as usize, nx as usize));
            }
        }
        moves
    }
}

impl FrameSource for Maze {
    fn next_frame(&mut self) -> Frame {
        let mut rng = rand::thread_rng();

        if self.stack.is_empty() {
            // Start over from a random cell.
            self.frame.clear();
            let start = (rng.gen_range(0..self.height), rng.gen_range(0..self.width));
            self.frame.set_pixel(start.1, start.0, FORWARD);
            self.stack.push(start);
            return self.frame.clone();
        }

        let &(y, x) = self.stack.last().unwrap_or(&(0, 0));
        let moves = self.unvisited_neighbours(y, x);
        if let Some(&(ny, nx)) = moves.choose(&mut rng) {
            self.frame.set_pixel(nx, ny, FORWARD);
            self.stack.push((ny, nx));
        } else {
            self.frame.set_pixel(x, y, BACKWARD);
            self.stack.pop();
        }

        self.frame.clone()
    }
}

// ── Tests ────────────────────────────────────────────────────────
