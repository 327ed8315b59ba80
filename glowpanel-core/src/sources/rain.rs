//! Matrix-style glyph rain animation.

use embedded_graphics::Drawable;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_4X6;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::Point;
use embedded_graphics::text::{Baseline, Text};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::frame::Frame;
use crate::source::{FrameSource, SourceConfig};

/// Glyph cell size of [`FONT_4X6`].
const GLYPH_WIDTH: usize = 4;
const GLYPH_HEIGHT: i32 = 6;

/// Trail length bounds, in glyphs.
const TRACE_MIN: usize = 3;
const TRACE_MAX: usize = 8;

/// Slowest column speed; speeds are drawn from `SPEED_MIN..1.0`.
const SPEED_MIN: f64 = 0.2;

// ── Column ───────────────────────────────────────────────────────

/// One independently falling glyph column.
struct Column {
    offset_x: i32,
    trail: Vec<char>,
    trace: usize,
    speed: f64,
    tick: f64,
}

impl Column {
    fn new(offset_x: i32) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            offset_x,
            trail: Vec::new(),
            trace: rng.gen_range(TRACE_MIN..=TRACE_MAX),
            speed: rng.gen_range(SPEED_MIN..1.0),
            tick: 1.0,
        }
    }

    /// Advance the column by one animation tick. Slow columns skip
    /// several ticks between steps.
    fn animate(&mut self, characters: &[char]) {
        self.tick -= 0.1;
        if self.tick > self.speed {
            return;
        }
        self.tick = 1.0;

        let mut rng = rand::thread_rng();
        if let Some(&glyph) = characters.choose(&mut rng) {
            self.trail.push(glyph);
        }
        if self.trail.len() > self.trace {
            self.trail.clear();
            self.trace = rng.gen_range(TRACE_MIN..=TRACE_MAX);
            self.speed = rng.gen_range(SPEED_MIN..1.0);
        }
    }

    /// Draw the trail: white flickering head, green tail fading by
    /// 3-bit brightness steps.
    fn draw(&self, frame: &mut Frame, characters: &[char]) {
        let mut rng = rand::thread_rng();
        for (row, &glyph) in self.trail.iter().enumerate() {
            let age = self.trail.len() - row - 1;
            let (glyph, color) = if age == 0 {
                let head = *characters.choose(&mut rng).unwrap_or(&glyph);
                (head, Rgb888::new(0xFF, 0xFF, 0xFF))
            } else {
                (glyph, Rgb888::new(0, (7 - age.min(7) as u8) << 5, 0))
            };

            let style = MonoTextStyle::new(&FONT_4X6, color);
            let mut buf = [0u8; 4];
            let _ = Text::with_baseline(
                glyph.encode_utf8(&mut buf),
                Point::new(self.offset_x, row as i32 * GLYPH_HEIGHT),
                style,
                Baseline::Top,
            )
            .draw(frame);
        }
    }
}

// ── Rain ─────────────────────────────────────────────────────────

/// Randomly generated glyphs falling like the Matrix rain.
///
/// The glyph set defaults to printable ASCII and can be overridden with
/// the `text` configuration value.
pub struct Rain {
    columns: Vec<Column>,
    characters: Vec<char>,
    height: usize,
    width: usize,
}

impl Rain {
    pub fn new(height: usize, width: usize, config: &SourceConfig) -> Self {
        let characters: Vec<char> = if config.text.is_empty() {
            ('!'..='~').collect()
        } else {
            config.text.chars().collect()
        };
        let columns = (0..width / GLYPH_WIDTH)
            .map(|i| Column::new((i * GLYPH_WIDTH) as i32))
            .collect();
        Self {
            columns,
            characters,
            height,
            width,
        }
    }
}

impl FrameSource for Rain {
    fn next_frame(&mut self) -> Frame {
        let mut frame = Frame::new(self.height, self.width);
        for column in &mut self.columns {
            column.animate(&self.characters);
            column.draw(&mut frame, &self.characters);
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
    fn columns_cover_the_panel_width() {
        let rain = Rain::new(32, PANEL_WIDTH, &SourceConfig::default());
        assert_eq!(rain.columns.len(), PANEL_WIDTH / GLYPH_WIDTH);
    }

    #[test]
    fn rain_eventually_glows_green() {
        let mut rain = Rain::new(32, PANEL_WIDTH, &SourceConfig::default());
        let mut saw_green = false;
        for _ in 0..64 {
            let frame = rain.next_frame();
            saw_green |= frame.bytes().chunks_exact(3).any(|px| px[1] > 0);
        }
        assert!(saw_green);
    }

    #[test]
    fn custom_glyph_set_is_respected() {
        let config = SourceConfig {
            text: "#".into(),
            ..SourceConfig::default()
        };
        let rain = Rain::new(32, PANEL_WIDTH, &config);
        assert_eq!(rain.characters, vec!['#']);
    }
}
