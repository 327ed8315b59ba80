//! Bit-plane codec between RGB frames and the device wire layout.
//!
//! The panel firmware reads its display buffer directly off the socket, so
//! the client does the heavy lifting: each 8-bit channel is reduced to its
//! top 3 bits and scattered across three bit-plane rows.
//!
//! ## Wire format
//!
//! ```text
//! 48 rows × 32 bytes payload + 1 terminator byte = 1537 bytes
//!
//! input row r (of a 16-row half) → output rows 3r, 3r+1, 3r+2
//!   output row 3r+p carries bit p of every 3-bit channel value
//!   top half    → byte bits 2 (R), 3 (G), 4 (B)
//!   bottom half → byte bits 5 (R), 6 (G), 7 (B)
//! ```
//!
//! Payload bytes never have bits 0–1 set, so the `\n` terminator
//! (`0b0000_1010`) cannot occur inside a frame and is a safe delimiter.
//!
//! A 16-row panel frame is packed with an all-zero synthetic bottom half;
//! decoding always yields a full 32-row frame.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;

use crate::error::PanelError;
use crate::frame::{CHANNELS, Frame, PANEL_WIDTH};

// ── Wire constants ───────────────────────────────────────────────

/// Rows in one packed half (input rows per half).
pub const HALF_ROWS: usize = 16;

/// Packed output rows: 3 bit-planes per input row, two halves combined.
pub const PACKED_ROWS: usize = 48;

/// Packed payload length in bytes (terminator excluded).
pub const PACKED_LEN: usize = PACKED_ROWS * PANEL_WIDTH;

/// Full wire frame length: payload plus terminator.
pub const WIRE_FRAME_LEN: usize = PACKED_LEN + 1;

/// Terminator byte appended to every packed frame for stream syncing.
pub const FRAME_TERMINATOR: u8 = b'\n';

/// Continue-acknowledgement sent by the receiver after each frame.
pub const ACK: &[u8] = b"\n";

/// Reserved acknowledgement meaning "terminate the session".
pub const CLOSE_SIGNAL: &[u8] = b"0x4";

// ── Encode ───────────────────────────────────────────────────────

/// Pack a frame into the device bit-plane layout, terminator included.
///
/// Only heights of 16 (synthetic black bottom half) and 32 are supported;
/// the width must be [`PANEL_WIDTH`].
pub fn encode(frame: &Frame) -> Result<Bytes, PanelError> {
    if frame.width() != PANEL_WIDTH || (frame.height() != HALF_ROWS && frame.height() != 2 * HALF_ROWS)
    {
        return Err(PanelError::InvalidShape {
            height: frame.height(),
            width: frame.width(),
        });
    }

    let mut out = BytesMut::zeroed(WIRE_FRAME_LEN);

    for (row_base, bit_base) in [(0, 2u8), (HALF_ROWS, 5u8)] {
        for row in 0..HALF_ROWS {
            let src_row = row_base + row;
            if src_row >= frame.height() {
                // 16-row panel: the bottom half stays black.
                break;
            }
            for col in 0..PANEL_WIDTH {
                let px = frame.pixel(col, src_row);
                for (channel, &value) in px.iter().enumerate() {
                    let reduced = value >> 5;
                    for plane in 0..3 {
                        if reduced >> plane & 1 == 1 {
                            out[(row * 3 + plane) * PANEL_WIDTH + col] |=
                                1 << (bit_base + channel as u8);
                        }
                    }
                }
            }
        }
    }

    out[PACKED_LEN] = FRAME_TERMINATOR;
    Ok(out.freeze())
}

// ── Decode ───────────────────────────────────────────────────────

/// Unpack a `48×32` payload (terminator already stripped) back into a
/// 32-row frame.
///
/// The reconstructed channel values carry the 3 significant bits in the
/// top positions; the low 5 bits are always zero.
pub fn decode(data: &[u8]) -> Result<Frame, PanelError> {
    if data.len() != PACKED_LEN {
        return Err(PanelError::InvalidLength {
            expected: PACKED_LEN,
            actual: data.len(),
        });
    }

    let mut frame = Frame::new(2 * HALF_ROWS, PANEL_WIDTH);

    for (row_base, bit_base) in [(0, 2u8), (HALF_ROWS, 5u8)] {
        for row in 0..HALF_ROWS {
            for col in 0..PANEL_WIDTH {
                let mut px = [0u8; CHANNELS];
                for (channel, value) in px.iter_mut().enumerate() {
                    let mut reduced = 0u8;
                    for plane in 0..3 {
                        let byte = data[(row * 3 + plane) * PANEL_WIDTH + col];
                        if byte >> (bit_base + channel as u8) & 1 == 1 {
                            reduced |= 1 << plane;
                        }
                    }
                    *value = reduced << 5;
                }
                frame.set_pixel(col, row_base + row, px);
            }
        }
    }

    Ok(frame)
}

// ── PackedFrameCodec ─────────────────────────────────────────────

/// Stream decoder for packed frames, for use with `tokio_util`'s `Framed`.
///
/// Waits until one full wire frame is buffered, validates the terminator
/// and yields the decoded [`Frame`].
#[derive(Debug, Default)]
pub struct PackedFrameCodec;

impl Decoder for PackedFrameCodec {
    type Item = Frame;
    type Error = PanelError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < WIRE_FRAME_LEN {
            src.reserve(WIRE_FRAME_LEN - src.len());
            return Ok(None);
        }

        let wire = src.split_to(WIRE_FRAME_LEN);
        if wire[PACKED_LEN] != FRAME_TERMINATOR {
            return Err(PanelError::Desync(wire[PACKED_LEN]));
        }

        decode(&wire[..PACKED_LEN]).map(Some)
    }
}

// ── Tests ────────────────────────────────────────────────────────
