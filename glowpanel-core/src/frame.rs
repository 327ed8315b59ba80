//! In-memory frame representation shared across the pipeline.
//!
//! A [`Frame`] is a `height × width` grid of 8-bit RGB pixels, row-major,
//! tightly packed. The shape is fixed at construction; animation sources draw
//! into it and the codec turns it into the device's bit-plane wire layout.
//!
//! `Frame` implements [`DrawTarget`] so text and primitives from
//! `embedded-graphics` render straight onto it. Pixels outside the panel are
//! silently dropped, which lets callers draw oversized primitives (the analog
//! clock relies on this for its far-off hand endpoints).

use core::convert::Infallible;

use embedded_graphics::Pixel;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

/// Panel width in pixels. Both supported panel geometries share it.
pub const PANEL_WIDTH: usize = 32;

/// Color channels per pixel.
pub const CHANNELS: usize = 3;

// ── Frame ────────────────────────────────────────────────────────

/// One complete pixel grid representing a single moment of display output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    height: usize,
    width: usize,
    /// `height * width * CHANNELS` bytes, row-major RGB.
    data: Vec<u8>,
}

impl Frame {
    /// Create a black frame of the given shape.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            data: vec![0; height * width * CHANNELS],
        }
    }

    /// Frame height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Frame width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Raw pixel bytes, row-major RGB.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw pixel bytes.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The RGB value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; CHANNELS] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Set the RGB value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; CHANNELS]) {
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&rgb);
    }

    /// Paint every pixel with the same color.
    pub fn fill(&mut self, rgb: [u8; CHANNELS]) {
        for px in self.data.chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(&rgb);
        }
    }

    /// Reset the frame to black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        (y * self.width + x) * CHANNELS
    }
}

// ── embedded-graphics integration ────────────────────────────────

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for Frame {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0
                && point.y >= 0
                && (point.x as usize) < self.width
                && (point.y as usize) < self.height
            {
                self.set_pixel(
                    point.x as usize,
                    point.y as usize,
                    [color.r(), color.g(), color.b()],
                );
            }
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────
