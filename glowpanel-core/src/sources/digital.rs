//! Digital time / date / weather readout.

use embedded_graphics::Drawable;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_4X6;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::Point;
use embedded_graphics::text::{Baseline, Text};

use crate::error::PanelError;
use crate::frame::Frame;
use crate::localtime::Localtime;
use crate::source::{FrameSource, SourceConfig};
use crate::weather::{DEFAULT_POLL_INTERVAL, WeatherFeed, WeatherReport};

/// Line pitch of [`FONT_4X6`].
const LINE_HEIGHT: i32 = 6;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Textual dashboard showing the local time, date, temperature, relative
/// humidity and qualitative air quality.
///
/// At 4 pixels per glyph eight characters fit one panel row, which sets
/// the line formats below. The weather feed only spawns when an API key
/// is configured; without one the weather lines show placeholders.
pub struct DigitalReadout {
    localtime: Localtime,
    weather: Option<WeatherFeed>,
    height: usize,
    width: usize,
}

impl DigitalReadout {
    pub fn new(height: usize, width: usize, config: &SourceConfig) -> Result<Self, PanelError> {
        let weather = if config.api_key.is_empty() {
            None
        } else {
            Some(WeatherFeed::spawn(
                &config.api_key,
                &config.city,
                DEFAULT_POLL_INTERVAL,
            ))
        };
        Ok(Self {
            localtime: Localtime::new(&config.timezone)?,
            weather,
            height,
            width,
        })
    }

    /// The five display lines for the given time and weather snapshot.
    fn lines(localtime: &Localtime, report: &WeatherReport) -> [String; 5] {
        let temperature = if report.temperature.is_nan() {
            "N/A".into()
        } else {
            format!("{:.0}C", report.temperature)
        };
        let humidity = if report.humidity.is_nan() {
            "N/A".into()
        } else {
            format!("{:.0}%", report.humidity)
        };

        [
            format!(
                "{:02}:{:02}:{:02}",
                localtime.hour(),
                localtime.minute(),
                localtime.second()
            ),
            format!(
                "{} {:02}{}",
                MONTHS[localtime.month() as usize - 1],
                localtime.day(),
                day_suffix(localtime.day())
            ),
            format!(
                "{} {}",
                localtime.year(),
                WEEKDAYS[localtime.weekday() as usize]
            ),
            format!("{temperature} {humidity}"),
            report.aqi_text().to_string(),
        ]
    }
}

impl FrameSource for DigitalReadout {
    fn next_frame(&mut self) -> Frame {
        self.localtime.update();
        let report = self
            .weather
            .as_ref()
            .map_or_else(WeatherReport::default, |feed| feed.report());

        let mut frame = Frame::new(self.height, self.width);
        let style = MonoTextStyle::new(&FONT_4X6, Rgb888::new(0xFF, 0xFF, 0xFF));
        for (row, line) in Self::lines(&self.localtime, &report).iter().enumerate() {
            let _ = Text::with_baseline(
                line,
                Point::new(0, row as i32 * LINE_HEIGHT),
                style,
                Baseline::Top,
            )
            .draw(&mut frame);
        }
        frame
    }
}

/// English ordinal suffix for a day of the month.
fn day_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PANEL_WIDTH;

    #[test]
    fn day_suffixes() {
        assert_eq!(day_suffix(1), "st");
        assert_eq!(day_suffix(2), "nd");
        assert_eq!(day_suffix(3), "rd");
        assert_eq!(day_suffix(4), "th");
        assert_eq!(day_suffix(11), "th");
        assert_eq!(day_suffix(12), "th");
        assert_eq!(day_suffix(13), "th");
        assert_eq!(day_suffix(21), "st");
        assert_eq!(day_suffix(22), "nd");
        assert_eq!(day_suffix(31), "st");
    }

    #[test]
    fn lines_format_known_time() {
        let mut localtime = Localtime::new("GMT").unwrap();
        localtime.set_timestamp(0);
        let lines = DigitalReadout::lines(&localtime, &WeatherReport::default());
        assert_eq!(lines[0], "00:00:00");
        assert_eq!(lines[1], "Jan 01st");
        assert_eq!(lines[2], "1970 Thu");
        assert_eq!(lines[3], "N/A N/A");
        assert_eq!(lines[4], "N/A");
    }

    #[test]
    fn lines_format_weather_report() {
        let mut localtime = Localtime::new("GMT").unwrap();
        localtime.set_timestamp(0);
        let report = WeatherReport {
            temperature: 28.3,
            humidity: 62.0,
            aqi: 2,
        };
        let lines = DigitalReadout::lines(&localtime, &report);
        assert_eq!(lines[3], "28C 62%");
        assert_eq!(lines[4], "Fair");
    }

    #[test]
    fn readout_renders_without_weather() {
        let mut readout =
            DigitalReadout::new(32, PANEL_WIDTH, &SourceConfig::default()).unwrap();
        let frame = readout.next_frame();
        assert!(frame.bytes().iter().any(|&b| b != 0));
    }
}
