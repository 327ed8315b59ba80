//! glowpanel — IoT RGB LED matrix animation loader.
//!
//! ```text
//! glowpanel fire display 192.168.1.50          Drive a panel
//! glowpanel fire -r 60 save 100                Record 100 frames to a GIF
//! glowpanel clock -t Asia/Tokyo display panel  Timezone-aware clock
//! ```
//!
//! New animations register themselves in `glowpanel_core::sources::build`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use glowpanel_core::capture::{CaptureConfig, CaptureService};
use glowpanel_core::display::{DEFAULT_PORT, DisplayConfig, DisplaySession};
use glowpanel_core::scheduler::Scheduler;
use glowpanel_core::source::SourceConfig;
use glowpanel_core::sources;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "glowpanel", about = "IoT RGB LED matrix animation loader")]
struct Cli {
    /// Animation source (fire, life, snow, water, rain, maze, hilbert,
    /// clock, digital).
    animation: String,

    /// Panel width in pixels.
    #[arg(short = 'x', long, default_value_t = 32)]
    width: usize,

    /// Panel height in pixels.
    #[arg(short = 'y', long, default_value_t = 32)]
    height: usize,

    /// Animation update rate in Hz.
    #[arg(short, long, default_value_t = 30.0)]
    rate: f64,

    /// Timezone for animations showing time.
    #[arg(short, long, default_value = "GMT")]
    timezone: String,

    /// OpenWeatherMap API key.
    #[arg(short = 'k', long, default_value = "")]
    key: String,

    /// City name for weather data.
    #[arg(short, long, default_value = "")]
    city: String,

    /// Text data to display.
    #[arg(long, default_value = "")]
    text: String,

    /// Increase verbosity (-v warn, -vv info, -vvv debug).
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Display the animation on a LED matrix.
    Display {
        /// Server address.
        server: String,

        /// Server port.
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Maximum current in Amperes.
        #[arg(long, default_value_t = f64::INFINITY)]
        current: f64,
    },

    /// Save the animation to an image: 1 frame generates a png, more
    /// generate a gif.
    Save {
        /// Number of frames to record.
        frames: usize,

        /// Directory where to save the image.
        #[arg(short, long, default_value = "media")]
        dir: PathBuf,

        /// Duration of each frame of the animated image, in milliseconds.
        #[arg(long, default_value_t = 40)]
        duration: u64,
    },
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = ["error", "warn", "info", "debug"][usize::from(cli.verbose).min(3)];
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = SourceConfig {
        timezone: cli.timezone,
        api_key: cli.key,
        city: cli.city,
        text: cli.text,
    };
    let mut source = sources::build(&cli.animation, cli.height, cli.width, &config)?;
    let scheduler = Scheduler::new(cli.rate)?;

    match cli.mode {
        Mode::Display {
            server,
            port,
            current,
        } => {
            let mut session = DisplaySession::new(DisplayConfig {
                host: server,
                port,
                current_max: current,
                ..DisplayConfig::default()
            });
            scheduler.run(source.as_mut(), &mut session).await?;
        }

        Mode::Save {
            frames,
            dir,
            duration,
        } => {
            std::fs::create_dir_all(&dir)?;
            let capture = CaptureService::bind(CaptureConfig {
                name: dir.join(&cli.animation),
                frames,
                frame_duration: Duration::from_millis(duration),
                port: DEFAULT_PORT,
            })
            .await?;
            let port = capture.local_addr()?.port();
            let recorder = tokio::spawn(capture.run());

            // Record through the real wire path, with the panel's typical
            // recording current profile.
            let mut session = DisplaySession::new(DisplayConfig {
                host: "127.0.0.1".into(),
                port,
                current_max: 0.2,
                ..DisplayConfig::default()
            });
            scheduler.run(source.as_mut(), &mut session).await?;

            let path = recorder.await??;
            info!("saved image under {}", path.display());
        }
    }

    Ok(())
}
