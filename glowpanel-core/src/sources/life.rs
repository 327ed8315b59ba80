//! Conway's Game of Life animation, in color.

use rand::Rng;

use crate::frame::{CHANNELS, Frame};
use crate::source::FrameSource;

/// Game of Life on a toroidal grid, with inherited colors.
///
/// Survivors keep their color. A newborn cell takes the average color of
/// its three parents, or mutates to a random color when the parents are
/// nearly identical, which keeps the population from fading to grey.
/// The first generation is seeded randomly; like the original automaton
/// the animation eventually stalls in a still life or a short loop and
/// needs a restart.
pub struct Life {
    cells: Vec<[u8; CHANNELS]>,
    height: usize,
    width: usize,
}

impl Life {
    pub fn new(height: usize, width: usize) -> Self {
        let mut rng = rand::thread_rng();
        let cells = (0..height * width)
            .map(|_| {
                if rng.gen_range(0..2) == 0 {
                    [0, 0, 0]
                } else {
                    [
                        rng.gen_range(0..=0xFF),
                        rng.gen_range(0..=0xFF),
                        rng.gen_range(0..=0xFF),
                    ]
                }
            })
            .collect();
        Self {
            cells,
            height,
            width,
        }
    }

    #[cfg(test)]
    fn from_cells(height: usize, width: usize, cells: Vec<[u8; CHANNELS]>) -> Self {
        assert_eq!(cells.len(), height * width);
        Self {
            cells,
            height,
            width,
        }
    }

    fn cell(&self, y: isize, x: isize) -> [u8; CHANNELS] {
        let y = y.rem_euclid(self.height as isize) as usize;
        let x = x.rem_euclid(self.width as isize) as usize;
        self.cells[y * self.width + x]
    }

    /// The live neighbours of `(y, x)` in the 8-cell neighbourhood.
    fn parents(&self, y: usize, x: usize) -> Vec<[u8; CHANNELS]> {
        let mut alive = Vec::with_capacity(8);
        for dy in -1..=1isize {
            for dx in -1..=1isize {
                if dy == 0 && dx == 0 {
                    continue;
                }
                let neighbour = self.cell(y as isize + dy, x as isize + dx);
                if neighbour != [0, 0, 0] {
                    alive.push(neighbour);
                }
            }
        }
        alive
    }
}

impl FrameSource for Life {
    fn next_frame(&mut self) -> Frame {
        let mut rng = rand::thread_rng();
        let mut next = vec![[0u8; CHANNELS]; self.cells.len()];

        for y in 0..self.height {
            for x in 0..self.width {
                let current = self.cells[y * self.width + x];
                let parents = self.parents(y, x);
                let count = parents.len();

                next[y * self.width + x] = if current != [0, 0, 0] && (count == 2 || count == 3) {
                    current
                } else if current == [0, 0, 0] && count == 3 {
                    blend(&parents, &mut rng)
                } else {
                    [0, 0, 0]
                };
            }
        }

        self.cells = next;

        let mut frame = Frame::new(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                frame.set_pixel(x, y, self.cells[y * self.width + x]);
            }
        }
        frame
    }
}

/// Average the parent colors; mutate when they are too similar.
fn blend(parents: &[[u8; CHANNELS]], rng: &mut impl Rng) -> [u8; CHANNELS] {
    let mut color = [0u8; CHANNELS];
    let mut spread = 0u8;
    for channel in 0..CHANNELS {
        let values: Vec<u8> = parents.iter().map(|p| p[channel]).collect();
        let min = *values.iter().min().unwrap_or(&0);
        let max = *values.iter().max().unwrap_or(&0);
        spread = spread.max(max - min);
        color[channel] =
            (values.iter().map(|&v| u32::from(v)).sum::<u32>() / values.len() as u32) as u8;
    }

    if spread < 2 {
        [
            rng.gen_range(0..=0xFF),
            rng.gen_range(0..=0xFF),
            rng.gen_range(0..=0xFF),
        ]
    } else {
        color
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 3] = [0xE0, 0x00, 0x00];
    const OFF: [u8; 3] = [0, 0, 0];

    fn grid_with(height: usize, width: usize, alive: &[(usize, usize)]) -> Life {
        let mut cells = vec![OFF; height * width];
        for &(y, x) in alive {
            cells[y * width + x] = RED;
        }
        Life::from_cells(height, width, cells)
    }

    #[test]
    fn block_still_life_survives() {
        let mut life = grid_with(8, 8, &[(2, 2), (2, 3), (3, 2), (3, 3)]);
        let frame = life.next_frame();
        for (y, x) in [(2, 2), (2, 3), (3, 2), (3, 3)] {
            assert_eq!(frame.pixel(x, y), RED);
        }
        let lit = frame.bytes().iter().filter(|&&b| b != 0).count();
        assert_eq!(lit, 4, "only the block survives");
    }

    #[test]
    fn lonely_cells_die() {
        let mut life = grid_with(8, 8, &[(4, 4)]);
        let frame = life.next_frame();
        assert!(frame.bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn birth_mutates_identical_parents() {
        // Three identical parents in an L: the empty corner is born, and
        // because the parents match exactly it takes a random color.
        let mut life = grid_with(8, 8, &[(2, 2), (2, 3), (3, 2)]);
        let frame = life.next_frame();
        assert_ne!(frame.pixel(3, 3), OFF);
    }

    #[test]
    fn blend_averages_distinct_parents() {
        let mut rng = rand::thread_rng();
        let color = blend(
            &[[0x00, 0x60, 0xFF], [0x40, 0x60, 0x00], [0x80, 0x60, 0x00]],
            &mut rng,
        );
        assert_eq!(color[0], 0x40);
        assert_eq!(color[1], 0x60);
        assert_eq!(color[2], 0x55);
    }
}
