//! Background OpenWeatherMap poller.
//!
//! Weather and air-quality data update on their own schedule, far slower
//! than the frame rate. A background task polls the two API endpoints and
//! publishes a [`WeatherReport`] snapshot through a `watch` channel;
//! animations read the latest snapshot without ever blocking.
//!
//! Failures degrade gracefully: the previous (or empty) report stays
//! visible and unknown values read as `NaN` / AQI 0. The default 5-minute
//! cadence stays far below the free-plan API quota.

use std::time::Duration;

use serde::Deserialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::PanelError;

// ── Constants ────────────────────────────────────────────────────

/// Default delay between update requests.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Qualitative air-quality labels indexed by AQI, 0 meaning unknown.
const AQI_LEVELS: [&str; 6] = ["N/A", "Good", "Fair", "Mod.", "Poor", "Bad"];

// ── WeatherReport ────────────────────────────────────────────────

/// Read-only weather snapshot exposed to animations.
#[derive(Debug, Clone)]
pub struct WeatherReport {
    /// Temperature in degrees Celsius, `NaN` if unknown.
    pub temperature: f64,
    /// Relative humidity in percent, `NaN` if unknown.
    pub humidity: f64,
    /// Air quality index, 1 (good) to 5 (very poor), 0 if unknown.
    pub aqi: u8,
}

impl Default for WeatherReport {
    fn default() -> Self {
        Self {
            temperature: f64::NAN,
            humidity: f64::NAN,
            aqi: 0,
        }
    }
}

impl WeatherReport {
    /// The air quality as qualitative text.
    pub fn aqi_text(&self) -> &'static str {
        AQI_LEVELS[usize::from(self.aqi).min(AQI_LEVELS.len() - 1)]
    }
}

// ── API payloads ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    coord: Option<Coord>,
    main: Option<MainReadings>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Coord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct AirPollution {
    #[serde(default)]
    list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionEntry {
    main: AirPollutionIndex,
}

#[derive(Debug, Deserialize)]
struct AirPollutionIndex {
    aqi: u8,
}

// ── WeatherFeed ──────────────────────────────────────────────────

/// Handle to the background weather poller.
///
/// Cheap to clone; dropping every handle stops the poller on its next tick.
#[derive(Debug, Clone)]
pub struct WeatherFeed {
    rx: watch::Receiver<WeatherReport>,
}

impl WeatherFeed {
    /// Spawn the poller for `city` using the given API key.
    ///
    /// The first request fires immediately; afterwards one update runs per
    /// `poll_interval`.
    pub fn spawn(api_key: &str, city: &str, poll_interval: Duration) -> Self {
        let (tx, rx) = watch::channel(WeatherReport::default());
        let api_key = api_key.to_owned();
        let city = city.to_owned();

        tokio::spawn(async move {
            let client = reqwest::Client::new();
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match fetch(&client, &api_key, &city).await {
                    Ok(report) => {
                        debug!(
                            "weather update: {:.1}C {:.0}% aqi {}",
                            report.temperature, report.humidity, report.aqi
                        );
                        if tx.send(report).is_err() {
                            break; // every consumer is gone
                        }
                    }
                    Err(e) => warn!("weather update failed: {e}"),
                }
            }
        });

        Self { rx }
    }

    /// The most recent report.
    pub fn report(&self) -> WeatherReport {
        self.rx.borrow().clone()
    }
}

/// One polling pass: current conditions first, then air quality for the
/// coordinates the first call resolved.
async fn fetch(
    client: &reqwest::Client,
    api_key: &str,
    city: &str,
) -> Result<WeatherReport, PanelError> {
    let url = format!(
        "https://api.openweathermap.org/data/2.5/weather?q={city}&units=metric&appid={api_key}"
    );
    let current: CurrentConditions = client.get(&url).send().await?.json().await?;
    if let Some(message) = &current.message {
        return Err(PanelError::Weather(message.clone()));
    }

    let mut report = WeatherReport::default();
    if let Some(main) = &current.main {
        report.temperature = main.temp;
        report.humidity = main.humidity;
    }

    let (lat, lon) = current.coord.as_ref().map_or((0.0, 0.0), |c| (c.lat, c.lon));
    let url = format!(
        "https://api.openweathermap.org/data/2.5/air_pollution?lat={lat}&lon={lon}&appid={api_key}"
    );
    let air: AirPollution = client.get(&url).send().await?.json().await?;
    if let Some(entry) = air.list.first() {
        report.aqi = entry.main.aqi;
    }

    Ok(report)
}

// ── Tests ────────────────────────────────────────────────────────
