//! Capture service: records a frame stream into an image artifact.
//!
//! The service plays the panel's role on the wire — it accepts a sender,
//! reads packed frames, acknowledges each one and, once the configured
//! count is reached, replies with the close-signal instead. The collected
//! frames are then written out as a still PNG (one frame) or a looping
//! GIF (several frames).
//!
//! The accept loop serves one connection at a time and trusts its sender:
//! malformed frames end the connection and the loop simply waits for the
//! next one.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use futures::StreamExt;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame as GifFrame, RgbImage, RgbaImage};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

use crate::codec::{ACK, CLOSE_SIGNAL, PackedFrameCodec};
use crate::error::PanelError;
use crate::frame::Frame;

// ── CaptureConfig ────────────────────────────────────────────────

/// Configuration for [`CaptureService`].
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Artifact base path, without extension; `.png` or `.gif` is
    /// appended depending on the captured frame count.
    pub name: PathBuf,
    /// Number of frames to capture. Must be greater than zero.
    pub frames: usize,
    /// Display duration of each frame in a multi-frame artifact.
    pub frame_duration: Duration,
    /// Port on which to listen for the sender.
    pub port: u16,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            name: "capture".into(),
            frames: 1,
            frame_duration: Duration::from_millis(40),
            port: crate::display::DEFAULT_PORT,
        }
    }
}

// ── CaptureService ───────────────────────────────────────────────

/// Server side of the frame transport protocol.
///
/// Bind first, then [`run`](Self::run) to completion; the service consumes
/// itself and returns the path of the written artifact.
pub struct CaptureService {
    config: CaptureConfig,
    listener: TcpListener,
    buffer: Vec<Frame>,
}

impl CaptureService {
    /// Validate the configuration and bind the listening socket.
    pub async fn bind(config: CaptureConfig) -> Result<Self, PanelError> {
        if config.frames == 0 {
            return Err(PanelError::InvalidConfig(
                "frame count must be greater than 0".into(),
            ));
        }

        let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
        Ok(Self {
            config,
            listener,
            buffer: Vec::new(),
        })
    }

    /// The address the service is listening on.
    pub fn local_addr(&self) -> Result<SocketAddr, PanelError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept senders until the configured frame count is reached, then
    /// export the artifact and return its path.
    pub async fn run(mut self) -> Result<PathBuf, PanelError> {
        while self.buffer.len() < self.config.frames {
            let (stream, peer) = self.listener.accept().await?;
            info!("sender connected from {peer}");

            let mut framed = Framed::new(stream, PackedFrameCodec);
            while self.buffer.len() < self.config.frames {
                let frame = match framed.next().await {
                    Some(Ok(frame)) => frame,
                    Some(Err(e)) => {
                        warn!("dropping connection: {e}");
                        break;
                    }
                    None => break,
                };
                self.buffer.push(frame);

                // Acknowledge or terminate the session.
                let reply = if self.buffer.len() < self.config.frames {
                    ACK
                } else {
                    CLOSE_SIGNAL
                };
                framed.get_mut().write_all(reply).await?;

                debug!(
                    "progress: {:.2}%",
                    100.0 * self.buffer.len() as f64 / self.config.frames as f64
                );
            }
        }

        debug!("saving image...");
        let filename = self.export()?;
        info!("saved image under {}", filename.display());
        Ok(filename)
    }

    // ── Export ───────────────────────────────────────────────────

    /// Write the captured frames as a still or animated image.
    fn export(&self) -> Result<PathBuf, PanelError> {
        let extension = if self.buffer.len() > 1 { "gif" } else { "png" };
        let filename = self.config.name.with_extension(extension);

        if self.buffer.len() == 1 {
            still_image(&self.buffer[0])?.save(&filename)?;
        } else {
            let file = std::fs::File::create(&filename)?;
            let mut encoder = GifEncoder::new(file);
            encoder.set_repeat(Repeat::Infinite)?;
            for frame in &self.buffer {
                let delay = Delay::from_numer_denom_ms(
                    self.config.frame_duration.as_millis() as u32,
                    1,
                );
                let rgba = RgbaImage::from_fn(
                    frame.width() as u32,
                    frame.height() as u32,
                    |x, y| {
                        let [r, g, b] = frame.pixel(x as usize, y as usize);
                        image::Rgba([r, g, b, 0xFF])
                    },
                );
                encoder.encode_frame(GifFrame::from_parts(rgba, 0, 0, delay))?;
            }
        }

        Ok(filename)
    }
}

/// Copy a decoded frame into an [`RgbImage`].
fn still_image(frame: &Frame) -> Result<RgbImage, PanelError> {
    RgbImage::from_raw(
        frame.width() as u32,
        frame.height() as u32,
        frame.bytes().to_vec(),
    )
    .ok_or_else(|| PanelError::Export("frame buffer does not match its shape".into()))
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PANEL_WIDTH;
    use image::AnimationDecoder;
    use image::codecs::gif::GifDecoder;

    fn solid_frame(rgb: [u8; 3]) -> Frame {
        let mut frame = Frame::new(32, PANEL_WIDTH);
        frame.fill(rgb);
        frame
    }

    async fn service_with_frames(
        name: PathBuf,
        frames: Vec<Frame>,
    ) -> CaptureService {
        let mut service = CaptureService::bind(CaptureConfig {
            name,
            frames: frames.len(),
            port: 0,
            ..CaptureConfig::default()
        })
        .await
        .unwrap();
        service.buffer = frames;
        service
    }

    #[tokio::test]
    async fn zero_frames_is_a_config_error() {
        let result = CaptureService::bind(CaptureConfig {
            frames: 0,
            port: 0,
            ..CaptureConfig::default()
        })
        .await;
        assert!(matches!(result, Err(PanelError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn single_frame_exports_png() {
        let dir = tempfile::tempdir().unwrap();
        let service =
            service_with_frames(dir.path().join("still"), vec![solid_frame([0xE0, 0x20, 0x00])])
                .await;

        let path = service.export().unwrap();
        assert_eq!(path.extension().unwrap(), "png");

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (32, 32));
        assert_eq!(img.get_pixel(4, 9).0, [0xE0, 0x20, 0x00]);
    }

    #[tokio::test]
    async fn multiple_frames_export_looping_gif() {
        let dir = tempfile::tempdir().unwrap();
        let frames = vec![
            solid_frame([0xE0, 0x00, 0x00]),
            solid_frame([0x00, 0xE0, 0x00]),
            solid_frame([0x00, 0x00, 0xE0]),
        ];
        let service = service_with_frames(dir.path().join("anim"), frames).await;

        let path = service.export().unwrap();
        assert_eq!(path.extension().unwrap(), "gif");

        let file = std::fs::File::open(&path).unwrap();
        let decoded = GifDecoder::new(std::io::BufReader::new(file))
            .unwrap()
            .into_frames()
            .collect_frames()
            .unwrap();
        assert_eq!(decoded.len(), 3);
    }
}
