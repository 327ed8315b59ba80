//! The contract every animation source implements.

use crate::frame::Frame;

// ── FrameSource ──────────────────────────────────────────────────

/// A generator of display frames.
///
/// One call produces one frame of the shape fixed at construction. The
/// sequence is conceptually infinite and need not be deterministic — most
/// sources are randomized or time-driven. Sources own whatever simulation
/// state they need across calls; the scheduler owns the cadence.
pub trait FrameSource: Send {
    /// Produce the next frame of the animation.
    fn next_frame(&mut self) -> Frame;
}

// ── SourceConfig ─────────────────────────────────────────────────

/// Free-form generator settings, passed to every source at construction.
/// Each source reads only the keys it needs.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Timezone name for time-driven animations, e.g. `Europe/Helsinki`.
    pub timezone: String,
    /// OpenWeatherMap API key.
    pub api_key: String,
    /// City name for weather data.
    pub city: String,
    /// Arbitrary text data, e.g. the glyph set of the rain animation.
    pub text: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            timezone: "GMT".into(),
            api_key: String::new(),
            city: String::new(),
            text: String::new(),
        }
    }
}
