//! Display session: pushes frames to the panel over TCP.
//!
//! The session owns the connection and the diffing baseline. Every update
//! runs the same pipeline:
//!
//! 1. Suppress pixel-identical repeats (no I/O at all).
//! 2. Reconnect if needed.
//! 3. Brightness-limit a copy until the estimated current fits the budget.
//! 4. Encode via the bit-plane codec and write the wire frame.
//! 5. Read the acknowledgement; the reserved close-signal means the remote
//!    end wants the whole process to stop.
//!
//! Transient failures (refused connection, timeout, reset) are logged and
//! reported through [`UpdateStatus`] — the caller simply retries on the next
//! scheduled frame.
//!
//! The per-pixel current consumption was measured for each color separately
//! with a USB power meter; the estimate below reproduces that model.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::codec::{self, CLOSE_SIGNAL};
use crate::error::PanelError;
use crate::frame::Frame;

// ── Constants ────────────────────────────────────────────────────

/// Default panel port.
pub const DEFAULT_PORT: u16 = 7777;

/// Default connect / write / acknowledge timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Quiescent current drawn by the panel itself, in Amperes.
const CURRENT_BASE: f64 = 0.13;

/// Current per 3-bit brightness step for the R, G and B channels, in Amperes.
const CURRENT_PER_STEP: [f64; 3] = [0.000139, 0.0000605, 0.0000378];

/// Maximum brightness-limiting passes before giving up. Seven steps zero
/// out any 3-bit channel value, so the loop always terminates dark.
const DIM_ATTEMPTS: u32 = 7;

// ── DisplayConfig ────────────────────────────────────────────────

/// Configuration for [`DisplaySession`].
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Panel host name or IP address.
    pub host: String,
    /// Panel TCP port.
    pub port: u16,
    /// Communication timeout.
    pub timeout: Duration,
    /// Maximum current the displayed frame may draw, in Amperes.
    pub current_max: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            current_max: f64::INFINITY,
        }
    }
}

// ── UpdateStatus ─────────────────────────────────────────────────

/// Outcome of a [`DisplaySession::update`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    /// The frame was transmitted and acknowledged.
    Refreshed,
    /// The frame was identical to the previous one; nothing was sent.
    Unchanged,
    /// The connection failed; the frame was skipped and the session will
    /// reconnect on the next update.
    Dropped,
    /// The remote end replied with the close-signal and requests a clean
    /// process shutdown.
    CloseRequested,
}

// ── DisplaySession ───────────────────────────────────────────────

/// Client side of the frame transport protocol.
///
/// One session owns exactly one connection; dropping the session closes it.
pub struct DisplaySession {
    config: DisplayConfig,
    stream: Option<TcpStream>,
    /// Last transmitted frame, before brightness limiting, used for diffing.
    last_frame: Option<Frame>,
}

impl DisplaySession {
    /// Create a disconnected session. No I/O happens until
    /// [`connect`](Self::connect) or [`update`](Self::update).
    pub fn new(config: DisplayConfig) -> Self {
        Self {
            config,
            stream: None,
            last_frame: None,
        }
    }

    /// Whether the session currently holds a connection.
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Connect to the panel. Idempotent: a call while already connected is
    /// a no-op returning `true`. Refusals and timeouts are logged and
    /// reported as `false`, never raised.
    pub async fn connect(&mut self) -> bool {
        if self.stream.is_some() {
            return true;
        }

        let endpoint = (self.config.host.as_str(), self.config.port);
        info!("connecting to display at {}:{}", endpoint.0, endpoint.1);
        match timeout(self.config.timeout, TcpStream::connect(endpoint)).await {
            Ok(Ok(stream)) => {
                info!("connection successful");
                self.stream = Some(stream);
                true
            }
            Ok(Err(e)) => {
                warn!("connection error: {e}");
                false
            }
            Err(_) => {
                warn!("connection timed out");
                false
            }
        }
    }

    /// Push one frame to the panel.
    ///
    /// Errors are reserved for contract violations (unsupported frame
    /// shape); every network condition maps to an [`UpdateStatus`].
    pub async fn update(&mut self, frame: &Frame) -> Result<UpdateStatus, PanelError> {
        if self.last_frame.as_ref() == Some(frame) {
            debug!("no changes on display");
            return Ok(UpdateStatus::Unchanged);
        }

        if !self.connect().await {
            return Ok(UpdateStatus::Dropped);
        }

        self.last_frame = Some(frame.clone());
        let limited = self.limit_brightness(frame.clone());
        let packed = codec::encode(&limited)?;

        // The stream is present: connect() just succeeded.
        let Some(stream) = self.stream.as_mut() else {
            return Ok(UpdateStatus::Dropped);
        };

        match timeout(self.config.timeout, stream.write_all(&packed)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!("disconnected: {e}");
                self.stream = None;
                return Ok(UpdateStatus::Dropped);
            }
            Err(_) => {
                warn!("write timed out");
                self.stream = None;
                return Ok(UpdateStatus::Dropped);
            }
        }

        let mut reply = [0u8; 16];
        match timeout(self.config.timeout, stream.read(&mut reply)).await {
            Ok(Ok(0)) => {
                warn!("connection reset while waiting for acknowledge");
                self.stream = None;
                Ok(UpdateStatus::Dropped)
            }
            Ok(Ok(n)) if &reply[..n] == CLOSE_SIGNAL => {
                info!("server closed, exiting");
                Ok(UpdateStatus::CloseRequested)
            }
            // Anything that is not the close-signal counts as acceptance.
            Ok(Ok(_)) => Ok(UpdateStatus::Refreshed),
            Ok(Err(e)) => {
                warn!("acknowledge error: {e}");
                self.stream = None;
                Ok(UpdateStatus::Dropped)
            }
            Err(_) => {
                warn!("acknowledge timeout");
                self.stream = None;
                Ok(UpdateStatus::Dropped)
            }
        }
    }

    // ── Brightness limiting ──────────────────────────────────────

    /// Uniformly dim the frame until the estimated current fits the
    /// configured ceiling, bounded to [`DIM_ATTEMPTS`] passes.
    ///
    /// The ceiling is a soft constraint: if it still cannot be met, the
    /// maximally dimmed frame is used and a warning logged.
    fn limit_brightness(&self, mut frame: Frame) -> Frame {
        let mut within_budget = false;
        for _ in 0..DIM_ATTEMPTS {
            let estimate = estimate_current(&frame);
            if estimate <= self.config.current_max {
                debug!("estimated current: {estimate:.3}A");
                within_budget = true;
                break;
            }
            dim_step(&mut frame);
        }
        if !within_budget {
            warn!("screen dimmed to the maximum");
        }
        frame
    }
}

/// Estimate the current the panel will draw for `frame`, in Amperes.
///
/// Sums the 3-bit brightness steps per channel, weighted by the measured
/// per-channel coefficients, on top of the quiescent base draw.
pub fn estimate_current(frame: &Frame) -> f64 {
    let mut steps = [0u64; 3];
    for px in frame.bytes().chunks_exact(3) {
        for (channel, &value) in px.iter().enumerate() {
            steps[channel] += u64::from(value >> 5);
        }
    }
    CURRENT_BASE
        + steps
            .iter()
            .zip(CURRENT_PER_STEP)
            .map(|(&s, coeff)| s as f64 * coeff)
            .sum::<f64>()
}

/// Subtract one 3-bit brightness step from every non-dark channel value.
fn dim_step(frame: &mut Frame) {
    for value in frame.bytes_mut() {
        if *value & 0b1110_0000 != 0 {
            *value -= 1 << 5;
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
