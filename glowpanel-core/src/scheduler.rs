//! Fixed-rate animation scheduler.
//!
//! The only place frame cadence is controlled: the display session and the
//! frame sources are both unaware of timing. Each tick requests one frame,
//! hands it to the session and sleeps for the remainder of the interval.

use std::time::Duration;

use tokio::time::Instant;
use tracing::info;

use crate::display::{DisplaySession, UpdateStatus};
use crate::error::PanelError;
use crate::source::FrameSource;

/// Drives a [`FrameSource`] into a [`DisplaySession`] at a fixed rate.
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    /// Create a scheduler ticking at `rate` frames per second.
    pub fn new(rate: f64) -> Result<Self, PanelError> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(PanelError::InvalidConfig(format!(
                "update rate must be a positive number of Hz, got {rate}"
            )));
        }
        Ok(Self {
            interval: Duration::from_secs_f64(1.0 / rate),
        })
    }

    /// Interval between frames.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run the animation loop until the remote end requests shutdown or
    /// the process is interrupted. Both are clean exits, not errors;
    /// dropped frames are retried implicitly by the next tick.
    pub async fn run(
        &self,
        source: &mut dyn FrameSource,
        session: &mut DisplaySession,
    ) -> Result<(), PanelError> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            let tick_start = Instant::now();

            let frame = source.next_frame();
            if session.update(&frame).await? == UpdateStatus::CloseRequested {
                info!("close signal received, stopping animation");
                return Ok(());
            }

            let wait = self.interval.saturating_sub(tick_start.elapsed());
            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("interrupted, stopping animation");
                    return Ok(());
                }
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_follows_rate() {
        let scheduler = Scheduler::new(30.0).unwrap();
        assert!((scheduler.interval().as_secs_f64() - 1.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn non_positive_rates_are_rejected() {
        assert!(matches!(
            Scheduler::new(0.0),
            Err(PanelError::InvalidConfig(_))
        ));
        assert!(matches!(
            Scheduler::new(-5.0),
            Err(PanelError::InvalidConfig(_))
        ));
        assert!(matches!(
            Scheduler::new(f64::NAN),
            Err(PanelError::InvalidConfig(_))
        ));
    }
}
