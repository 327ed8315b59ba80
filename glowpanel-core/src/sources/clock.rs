//! Analog clock animation.

use std::f64::consts::PI;

use embedded_graphics::Drawable;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::{Line, Primitive, PrimitiveStyle};

use crate::error::PanelError;
use crate::frame::Frame;
use crate::localtime::Localtime;
use crate::source::{FrameSource, SourceConfig};

/// Analog clock with the hour, minute and second hands in the red, green
/// and blue channels respectively; overlapping hands merge channels.
///
/// Hand endpoints are placed far outside the panel: with the endpoint
/// rounded to integers, a short hand would only move in coarse visible
/// jumps, while a distant endpoint yields sub-pixel steps and a smooth
/// sweep. The center pixels are masked to avoid burn-in when the clock
/// stays up for a long time.
pub struct AnalogClock {
    localtime: Localtime,
    height: usize,
    width: usize,
}

impl AnalogClock {
    pub fn new(height: usize, width: usize, config: &SourceConfig) -> Result<Self, PanelError> {
        Ok(Self {
            localtime: Localtime::new(&config.timezone)?,
            height,
            width,
        })
    }

    fn render(&self, hour: u32, minute: u32, second: u32, millisecond: u32) -> Frame {
        let (angle_hour, angle_minute, angle_second) =
            hand_angles(hour, minute, second, millisecond);

        let mut frame = Frame::new(self.height, self.width);
        for (angle, color) in [
            (angle_hour, Rgb888::new(0xFF, 0, 0)),
            (angle_minute, Rgb888::new(0, 0xFF, 0)),
            (angle_second, Rgb888::new(0, 0, 0xFF)),
        ] {
            // Hands draw on their own layer so overlaps merge per channel.
            let mut layer = Frame::new(self.height, self.width);
            self.draw_hand(&mut layer, angle, color);
            for (dst, src) in frame.bytes_mut().iter_mut().zip(layer.bytes()) {
                *dst |= src;
            }
        }

        // Prevent burn-in by keeping the center black.
        let (cx, cy) = (self.width / 2, self.height / 2);
        for y in cy.saturating_sub(1)..=(cy + 1).min(self.height - 1) {
            for x in cx.saturating_sub(1)..=(cx + 1).min(self.width - 1) {
                frame.set_pixel(x, y, [0, 0, 0]);
            }
        }

        frame
    }

    fn draw_hand(&self, layer: &mut Frame, angle: f64, color: Rgb888) {
        let center = Point::new(self.width as i32 / 2, self.height as i32 / 2);
        let reach = (self.height.max(self.width) * 100) as f64;
        let end = Point::new(
            center.x + (reach * angle.cos()) as i32,
            center.y + (reach * angle.sin()) as i32,
        );
        let _ = Line::new(center, end)
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(layer);
    }
}

impl FrameSource for AnalogClock {
    fn next_frame(&mut self) -> Frame {
        self.localtime.update();
        self.render(
            self.localtime.hour(),
            self.localtime.minute(),
            self.localtime.second(),
            self.localtime.millisecond(),
        )
    }
}

/// Hand angles in radians, measured clockwise with zero at 12 o'clock
/// (i.e. offset by -π/2 in screen coordinates).
fn hand_angles(hour: u32, minute: u32, second: u32, millisecond: u32) -> (f64, f64, f64) {
    let fraction_second = (f64::from(second) + f64::from(millisecond) / 1000.0) / 60.0;
    let angle_second = fraction_second * 2.0 * PI - PI / 2.0;

    let fraction_minute = (f64::from(minute) + fraction_second) / 60.0;
    let angle_minute = fraction_minute * 2.0 * PI - PI / 2.0;

    let fraction_hour = (f64::from(hour) + fraction_minute) / 12.0;
    let angle_hour = fraction_hour * 2.0 * PI - PI / 2.0;

    (angle_hour, angle_minute, angle_second)
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PANEL_WIDTH;

    fn clock() -> AnalogClock {
        AnalogClock::new(32, PANEL_WIDTH, &SourceConfig::default()).unwrap()
    }

    #[test]
    fn midnight_points_every_hand_up() {
        let frame = clock().render(0, 0, 0, 0);
        // All three hands overlap pointing at 12: the column above the
        // masked center carries all three channels.
        assert_eq!(frame.pixel(16, 8), [0xFF, 0xFF, 0xFF]);
        assert_eq!(frame.pixel(16, 24), [0, 0, 0]);
    }

    #[test]
    fn quarter_past_separates_the_hands()  {
        let frame = clock().render(3, 15, 0, 0);
        // Second hand up, minute hand right, hour hand just past 3.
        assert_eq!(frame.pixel(16, 8), [0, 0, 0xFF]);
        assert_eq!(frame.pixel(24, 16)[1], 0xFF);
    }

    #[test]
    fn center_is_masked() {
        let frame = clock().render(10, 10, 10, 0);
        for y in 15..=17 {
            for x in 15..=17 {
                assert_eq!(frame.pixel(x, y), [0, 0, 0]);
            }
        }
    }

    #[test]
    fn angles_sweep_clockwise() {
        let (_, _, noon) = hand_angles(0, 0, 0, 0);
        assert!((noon + PI / 2.0).abs() < 1e-9);

        let (_, _, quarter) = hand_angles(0, 0, 15, 0);
        assert!(quarter.abs() < 1e-9); // 15 s points right

        let (hour, _, _) = hand_angles(6, 0, 0, 0);
        assert!((hour - PI / 2.0).abs() < 1e-9); // 6 o'clock points down
    }
}
