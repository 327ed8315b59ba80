//! Timezone-aware local time snapshot for time-driven animations.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::PanelError;

/// A refreshable local-time snapshot.
///
/// Animations call [`update`](Self::update) once per frame and then read
/// the scalar accessors; nothing here touches the network or blocks.
#[derive(Debug, Clone)]
pub struct Localtime {
    tz: Tz,
    now: DateTime<Tz>,
}

impl Localtime {
    /// Create a snapshot for the given timezone name, e.g. `Asia/Tokyo`.
    pub fn new(timezone: &str) -> Result<Self, PanelError> {
        let tz: Tz = timezone
            .parse()
            .map_err(|_| PanelError::InvalidConfig(format!("unknown timezone: {timezone}")))?;
        Ok(Self {
            tz,
            now: Utc::now().with_timezone(&tz),
        })
    }

    /// Refresh the snapshot to the current wall-clock time.
    pub fn update(&mut self) {
        self.now = Utc::now().with_timezone(&self.tz);
    }

    /// Pin the snapshot to a POSIX timestamp (seconds).
    pub fn set_timestamp(&mut self, stamp: i64) {
        if let chrono::LocalResult::Single(t) = self.tz.timestamp_opt(stamp, 0) {
            self.now = t;
        }
    }

    /// Current hour in 24h format.
    pub fn hour(&self) -> u32 {
        self.now.hour()
    }

    /// Current minute, 0 to 59.
    pub fn minute(&self) -> u32 {
        self.now.minute()
    }

    /// Current second, 0 to 59.
    pub fn second(&self) -> u32 {
        self.now.second()
    }

    /// Current millisecond, 0 to 999.
    pub fn millisecond(&self) -> u32 {
        self.now.nanosecond() / 1_000_000 % 1000
    }

    /// Current day of the month, 1 to 31.
    pub fn day(&self) -> u32 {
        self.now.day()
    }

    /// Current month, 1 to 12.
    pub fn month(&self) -> u32 {
        self.now.month()
    }

    /// Current year.
    pub fn year(&self) -> i32 {
        self.now.year()
    }

    /// Current day of the week, 0 to 6, 0 representing Monday.
    pub fn weekday(&self) -> u32 {
        self.now.weekday().num_days_from_monday()
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_timezone_is_a_config_error() {
        assert!(matches!(
            Localtime::new("Atlantis/Central"),
            Err(PanelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn epoch_in_gmt() {
        let mut lt = Localtime::new("GMT").unwrap();
        lt.set_timestamp(0);
        assert_eq!(lt.year(), 1970);
        assert_eq!(lt.month(), 1);
        assert_eq!(lt.day(), 1);
        assert_eq!(lt.hour(), 0);
        assert_eq!(lt.weekday(), 3); // 1970-01-01 was a Thursday.
    }

    #[test]
    fn timezone_offsets_apply() {
        let mut tokyo = Localtime::new("Asia/Tokyo").unwrap();
        tokyo.set_timestamp(0); // 09:00 in Tokyo.
        assert_eq!(tokyo.hour(), 9);

        let mut gmt = Localtime::new("GMT").unwrap();
        gmt.set_timestamp(0);
        assert_eq!(gmt.hour(), 0);
    }

    #[test]
    fn clock_fields_roll_over() {
        let mut lt = Localtime::new("GMT").unwrap();
        lt.set_timestamp(86_399); // 23:59:59 on the first day.
        assert_eq!((lt.hour(), lt.minute(), lt.second()), (23, 59, 59));
        assert_eq!(lt.millisecond(), 0);
    }
}
