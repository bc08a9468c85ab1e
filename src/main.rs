// What you SEE:
// • Live camera with a dimmed border and a clear square viewfinder.
// • Corner brackets, a scan line sweeping the viewfinder, prompt text above it.
// • Dots flash on a QR code's corners while it is being read.
// • Once it decodes, the viewfinder freezes on the code. Space scans again.
// • L toggles the scan line. ESC quits.

mod camera;
mod cli;
mod detector;
mod window;

use camera::{CameraPreview, luma_crop, snapshot};
use clap::Parser;
use cli::Cli;
use detector::{Detector, DetectorEvent};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use viewfinder_overlay::color::composite_layer;
use viewfinder_overlay::renderer::ANIMATION_DELAY;
use viewfinder_overlay::{
    CenteredFramingRect, Error, FramingRectSource, Layer, OverlayConfig, OverlayMode,
    OverlayRenderer, Rect, RedrawRequest,
};
use window::PreviewWindow;

/// When the overlay layer should be repainted next, and which part of it.
struct Pending {
    due: Instant,
    region: Option<Rect>,
}

impl From<RedrawRequest> for Pending {
    fn from(request: RedrawRequest) -> Self {
        Self { due: Instant::now() + request.delay, region: request.region }
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => OverlayConfig::load(path)?,
        None => OverlayConfig::default(),
    };
    cli.apply(&mut config);

    /* --- Camera + window setup --- */
    let mut cam = CameraPreview::open(cli.camera, cli.width, cli.height)?;
    let (w, h) = cam.resolution();
    let mut window = PreviewWindow::new("Viewfinder", w as usize, h as usize)?;

    /* --- Overlay --- */
    let framing = CenteredFramingRect {
        fraction: cli.frame_fraction,
        ..CenteredFramingRect::new(w as i32, h as i32).with_offset_y(cli.frame_offset)
    };
    let mut overlay = OverlayRenderer::new(framing, &config, config.assets()?);
    let detector = Detector::spawn(overlay.point_sink())?;

    // The overlay is painted into its own layer and only when it asks to be;
    // the layer is put over every camera frame.
    let mut layer = Layer::new(w as usize, h as usize);
    let mut pending = Some(Pending::from(RedrawRequest::immediate()));

    /* --- FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while window.is_open() && !window.esc_pressed() {
        let now = Instant::now();
        let mut screen = cam.next_frame()?;

        /* 1) Inputs */
        if window.space_pressed_once() {
            pending = Some(overlay.reset().into());
        }
        if window.l_pressed_once() {
            overlay.set_scan_line_visible(!overlay.scan_line_visible());
        }

        /* 2) Feed the decoder and collect what it found */
        let frame = overlay.source().framing_rect();
        if overlay.mode() == OverlayMode::Scanning {
            if let Some(frame) = frame {
                detector.submit(luma_crop(&screen, frame));
            }
        }
        while let Some(event) = detector.poll() {
            match event {
                DetectorEvent::Decoded { content } => {
                    if overlay.mode() != OverlayMode::Scanning {
                        continue;
                    }
                    if let Some(frame) = frame {
                        info!(%content, "showing result");
                        pending = Some(overlay.show_result(snapshot(&screen, frame)).into());
                    }
                }
            }
        }

        /* 3) Repaint the overlay if it asked for it */
        if let Some(request) = pending.take_if(|p| now >= p.due) {
            layer.begin_redraw(request.region);
            pending = match overlay.draw(&mut layer) {
                Some(next) => Some(next.into()),
                // Geometry not there yet: try again next cycle.
                None if overlay.mode() == OverlayMode::Scanning => {
                    Some(RedrawRequest::after(ANIMATION_DELAY, None).into())
                }
                None => None,
            };
        }

        /* 4) Present */
        composite_layer(&mut screen, &layer)?;
        window.present(&screen)?;

        /* 5) FPS */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let fps = frames_this_second as f32 / now.duration_since(last_fps_time).as_secs_f32();
            debug!(fps = format!("{fps:.1}"), mode = ?overlay.mode(), "preview");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
