//! # glowpanel-core
//!
//! Core library for driving an IoT RGB LED matrix over TCP.
//!
//! This crate contains:
//! - **Frame**: the `height × 32 × 3` pixel grid, drawable via `embedded-graphics`
//! - **Codec**: the 3-bit-per-channel bit-plane wire format and its stream decoder
//! - **Display**: `DisplaySession` — diffing, brightness limiting, send/acknowledge
//! - **Capture**: `CaptureService` — records a frame stream into a PNG or GIF
//! - **Sources**: the animation generators behind the `FrameSource` contract
//! - **Scheduler**: fixed-rate loop feeding a source into a session
//! - **Collaborators**: timezone-aware local time and a background weather poller
//! - **Error**: `PanelError` — typed, `thiserror`-based error hierarchy
//!
//! ## Pipeline
//!
//! ```text
//! Scheduler ─► FrameSource ─► Frame ─► DisplaySession ─► codec::encode
//!                                                            │ 1537 bytes
//!                                            panel firmware ◄┴► CaptureService
//!                                                                  │ codec::decode
//!                                                                  ▼
//!                                                            PNG / GIF artifact
//! ```

pub mod capture;
pub mod codec;
pub mod display;
pub mod error;
pub mod frame;
pub mod localtime;
pub mod scheduler;
pub mod source;
pub mod sources;
pub mod weather;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use capture::{CaptureConfig, CaptureService};
pub use codec::{ACK, CLOSE_SIGNAL, FRAME_TERMINATOR, PackedFrameCodec, WIRE_FRAME_LEN};
pub use display::{DEFAULT_PORT, DisplayConfig, DisplaySession, UpdateStatus};
pub use error::PanelError;
pub use frame::{CHANNELS, Frame, PANEL_WIDTH};
pub use localtime::Localtime;
pub use scheduler::Scheduler;
pub use source::{FrameSource, SourceConfig};
pub use weather::{WeatherFeed, WeatherReport};
