//! Domain-specific error types for the panel pipeline.
//!
//! All fallible operations return `Result<T, PanelError>`. Transient network
//! failures are *not* errors — the display session reports them through its
//! status return and recovers on the next frame. Errors here are contract
//! violations (bad shapes, bad configuration) or unrecoverable I/O.

use thiserror::Error;

/// The canonical error type for the panel pipeline.
#[derive(Debug, Error)]
pub enum PanelError {
    // ── Codec Errors ─────────────────────────────────────────────
    /// The frame geometry is not one of the two supported panel shapes.
    #[error("unsupported frame shape: {height}x{width} (expected 16x32 or 32x32)")]
    InvalidShape { height: usize, width: usize },

    /// The packed payload is not exactly one wire frame.
    #[error("invalid packed length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// A byte other than the frame terminator arrived where the
    /// terminator was expected.
    #[error("stream desynchronised: got {0:#04x} where the frame terminator was expected")]
    Desync(u8),

    // ── Configuration Errors ─────────────────────────────────────
    /// Invalid construction parameters. Fatal, surfaced immediately.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The requested animation source does not exist.
    #[error("unknown animation source: {0}")]
    UnknownSource(String),

    // ── Connection Errors ────────────────────────────────────────
    /// The TCP/IO layer reported an error.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    // ── Collaborator Errors ──────────────────────────────────────
    /// The weather API could not be reached or returned garbage.
    #[error("weather api error: {0}")]
    Weather(String),

    /// Writing the capture artifact failed.
    #[error("image export error: {0}")]
    Export(String),
}

// ── Convenient From implementations ──────────────────────────────

impl From<reqwest::Error> for PanelError {
    fn from(e: reqwest::Error) -> Self {
        PanelError::Weather(e.to_string())
    }
}

impl From<image::ImageError> for PanelError {
    fn from(e: image::ImageError) -> Self {
        PanelError::Export(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = PanelError::InvalidShape {
            height: 17,
            width: 32,
        };
        assert!(e.to_string().contains("17x32"));

        let e = PanelError::InvalidLength {
            expected: 1536,
            actual: 12,
        };
        assert!(e.to_string().contains("1536"));
        assert!(e.to_string().contains("12"));

        let e = PanelError::Desync(0xAB);
        assert!(e.to_string().contains("0xab"));
    }

    #[test]
    fn from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broke");
        let e: PanelError = io_err.into();
        assert!(matches!(e, PanelError::Connection(_)));
    }
}
