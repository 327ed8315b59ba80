//! The animation sources.
//!
//! Every module here implements [`FrameSource`] for one animation; new
//! animations register themselves by adding an arm to [`build`].
//!
//! | Source    | Animation                                            |
//! |-----------|------------------------------------------------------|
//! | `fire`    | Live fire, hot-colormapped heat diffusion            |
//! | `life`    | Conway's Game of Life, in color                      |
//! | `snow`    | Falling snowflakes                                   |
//! | `water`   | Water-drop ripples                                   |
//! | `rain`    | Matrix-style glyph rain                              |
//! | `maze`    | Growing-tree maze traversal                          |
//! | `hilbert` | Hilbert-curve fill through the 3-bit color cube      |
//! | `clock`   | Analog clock with RGB hands                          |
//! | `digital` | Time / date / weather readout                        |

pub mod clock;
pub mod digital;
pub mod fire;
pub mod hilbert;
pub mod life;
pub mod maze;
pub mod rain;
pub mod snow;
pub mod water;

use crate::error::PanelError;
use crate::source::{FrameSource, SourceConfig};

/// Construct the named animation source for the given frame shape.
pub fn build(
    name: &str,
    height: usize,
    width: usize,
    config: &SourceConfig,
) -> Result<Box<dyn FrameSource>, PanelError> {
    let source: Box<dyn FrameSource> = match name {
        "fire" => Box::new(fire::Fire::new(height, width)),
        "life" => Box::new(life::Life::new(height, width)),
        "snow" => Box::new(snow::Snow::new(height, width)),
        "water" => Box::new(water::Water::new(height, width)),
        "rain" => Box::new(rain::Rain::new(height, width, config)),
        "maze" => Box::new(maze::Maze::new(height, width)),
        "hilbert" => Box::new(hilbert::HilbertFill::new(height, width)),
        "clock" => Box::new(clock::AnalogClock::new(height, width, config)?),
        "digital" => Box::new(digital::DigitalReadout::new(height, width, config)?),
        other => return Err(PanelError::UnknownSource(other.into())),
    };
    Ok(source)
}

// ── Tests ────────────────────────────────────────────────────────
