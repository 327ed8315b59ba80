//! Integration tests — a real sender/receiver session over localhost,
//! from frame production through capture and artifact export.

use std::time::Duration;

use glowpanel_core::capture::{CaptureConfig, CaptureService};
use glowpanel_core::display::{DisplayConfig, DisplaySession, UpdateStatus};
use glowpanel_core::frame::{Frame, PANEL_WIDTH};

use image::AnimationDecoder;
use image::codecs::gif::GifDecoder;

// ── Helpers ──────────────────────────────────────────────────────

/// A capture service on an OS-assigned port, plus a session pointed at it.
async fn capture_pair(
    name: std::path::PathBuf,
    frames: usize,
    current_max: f64,
) -> (CaptureService, DisplaySession) {
    let service = CaptureService::bind(CaptureConfig {
        name,
        frames,
        frame_duration: Duration::from_millis(40),
        port: 0,
    })
    .await
    .unwrap();
    let port = service.local_addr().unwrap().port();

    let session = DisplaySession::new(DisplayConfig {
        host: "127.0.0.1".into(),
        port,
        timeout: Duration::from_secs(2),
        current_max,
    });
    (service, session)
}

/// A frame filled with a single color already reduced to 3 bits.
fn solid(rgb: [u8; 3]) -> Frame {
    let mut frame = Frame::new(32, PANEL_WIDTH);
    frame.fill(rgb);
    frame
}

// ── Full session ─────────────────────────────────────────────────

#[tokio::test]
async fn capture_session_records_frames_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let (service, mut session) = capture_pair(dir.path().join("anim"), 3, f64::INFINITY).await;
    let capture = tokio::spawn(service.run());

    let frames = [
        solid([0xE0, 0x00, 0x00]),
        solid([0x00, 0xE0, 0x00]),
        solid([0x00, 0x00, 0xE0]),
    ];

    assert_eq!(session.update(&frames[0]).await.unwrap(), UpdateStatus::Refreshed);
    // An identical frame is suppressed and does not consume the capture budget.
    assert_eq!(session.update(&frames[0]).await.unwrap(), UpdateStatus::Unchanged);
    assert_eq!(session.update(&frames[1]).await.unwrap(), UpdateStatus::Refreshed);
    // The final frame is acknowledged with the close-signal; the sender
    // treats it as a clean shutdown, not an error.
    assert_eq!(
        session.update(&frames[2]).await.unwrap(),
        UpdateStatus::CloseRequested
    );

    let path = capture.await.unwrap().unwrap();
    assert_eq!(path.extension().unwrap(), "gif");

    let file = std::fs::File::open(&path).unwrap();
    let decoded = GifDecoder::new(std::io::BufReader::new(file))
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap();
    assert_eq!(decoded.len(), 3);

    // Receipt order matches production order. GIF quantisation is exact
    // for these few solid colors.
    for (sent, received) in frames.iter().zip(&decoded) {
        let px = received.buffer().get_pixel(10, 10).0;
        assert_eq!([px[0], px[1], px[2]], sent.pixel(10, 10));
    }
}

#[tokio::test]
async fn single_frame_capture_exports_a_still() {
    let dir = tempfile::tempdir().unwrap();
    let (service, mut session) = capture_pair(dir.path().join("still"), 1, f64::INFINITY).await;
    let capture = tokio::spawn(service.run());

    // Channel values survive the wire only down to their top 3 bits.
    let mut frame = Frame::new(32, PANEL_WIDTH);
    frame.fill([0xFF, 0x9F, 0x1F]);
    assert_eq!(
        session.update(&frame).await.unwrap(),
        UpdateStatus::CloseRequested
    );

    let path = capture.await.unwrap().unwrap();
    assert_eq!(path.extension().unwrap(), "png");

    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (32, 32));
    assert_eq!(img.get_pixel(3, 7).0, [0xE0, 0x80, 0x00]);
}

#[tokio::test]
async fn half_height_sender_captures_with_black_bottom() {
    let dir = tempfile::tempdir().unwrap();
    let (service, mut session) = capture_pair(dir.path().join("half"), 1, f64::INFINITY).await;
    let capture = tokio::spawn(service.run());

    let mut frame = Frame::new(16, PANEL_WIDTH);
    frame.fill([0xE0, 0xE0, 0xE0]);
    assert_eq!(
        session.update(&frame).await.unwrap(),
        UpdateStatus::CloseRequested
    );

    let img = image::open(capture.await.unwrap().unwrap()).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (32, 32));
    assert_eq!(img.get_pixel(8, 8).0, [0xE0, 0xE0, 0xE0]);
    assert_eq!(img.get_pixel(8, 24).0, [0, 0, 0]);
}

#[tokio::test]
async fn current_ceiling_dims_the_recorded_frame() {
    let dir = tempfile::tempdir().unwrap();
    // 0.2 A cannot be met by a white frame within the bounded dimming
    // passes; the wire carries the maximally dimmed (black) frame while
    // the session's diff baseline keeps the original.
    let (service, mut session) = capture_pair(dir.path().join("dim"), 1, 0.2).await;
    let capture = tokio::spawn(service.run());

    let white = solid([0xFF, 0xFF, 0xFF]);
    assert_eq!(
        session.update(&white).await.unwrap(),
        UpdateStatus::CloseRequested
    );

    let img = image::open(capture.await.unwrap().unwrap()).unwrap().to_rgb8();
    assert!(img.pixels().all(|p| p.0 == [0, 0, 0]));
}
