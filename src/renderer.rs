//! The viewfinder overlay renderer.
//!
//! One call to [`OverlayRenderer::draw`] paints one frame of the overlay:
//!
//! - a dim mask around the framing rect (darker while a result is shown)
//! - either the captured result image, or the live scanning decorations:
//!   corner brackets, the bouncing scan line, the prompt text and the
//!   candidate-point highlights
//!
//! The renderer never owns the event loop. While scanning, `draw` hands back a
//! [`RedrawRequest`] asking to be called again shortly, limited to the framing
//! rect; mode changes hand back an immediate full-surface request. Hosts that
//! cannot invalidate a region may redraw the whole surface instead.

use crate::color::{self, OPAQUE};
use crate::config::OverlayConfig;
use crate::draw::Canvas;
use crate::error::{Error, Result};
use crate::geometry::{FramingRectSource, corner_brackets, mask_rects};
use crate::palette::{OverlayAssets, Palette, ScanLineStyle};
use crate::points::{PointSink, ResultPointTracker};
use crate::scan_line::ScanLineAnimator;
use crate::text::{self, TextMetrics};
use crate::types::{Rect, ResultPoint};
use image::RgbaImage;
use std::time::Duration;
use tracing::{debug, trace};

/// Delay between animation frames while scanning.
pub const ANIMATION_DELAY: Duration = Duration::from_millis(10);
/// Radius of a fresh candidate point.
pub const CURRENT_POINT_RADIUS: f32 = 6.0;
/// Radius of a fading candidate point.
pub const PREVIOUS_POINT_RADIUS: f32 = 3.0;
/// Line advance of the prompt paragraph, in line heights.
pub const PROMPT_LINE_SPACING: f32 = 1.5;

/// What the overlay is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverlayMode {
    #[default]
    Scanning,
    ShowingResult,
}

/// Stroke sizes, read once at the start of every draw.
///
/// Setters may be called between draws from the draw thread. Mutating from
/// another thread is the caller's business (last write wins).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeometryConfig {
    pub corner_stroke_width: i32,
    pub corner_length: i32,
    /// Thickness of the gradient scan line.
    pub mid_line_stroke_width: i32,
    /// Thickness of the textured scan line.
    pub mid_line_padding: i32,
}

impl GeometryConfig {
    /// Every size clamped to `0..=limit`; a stroke wider than the surface
    /// paints the same pixels as one exactly as wide.
    fn limited_to(self, limit: i32) -> Self {
        let fit = |v: i32| v.clamp(0, limit.max(0));
        Self {
            corner_stroke_width: fit(self.corner_stroke_width),
            corner_length: fit(self.corner_length),
            mid_line_stroke_width: fit(self.mid_line_stroke_width),
            mid_line_padding: fit(self.mid_line_padding),
        }
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            corner_stroke_width: 4,
            corner_length: 15,
            mid_line_stroke_width: 3,
            mid_line_padding: 5,
        }
    }
}

/// Placement of the title and prompt above the framing rect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextLayout {
    pub text_size: f32,
    pub density: f32,
    /// Title baseline sits this far above the frame top.
    pub title_offset: i32,
    /// Prompt block starts this far above the frame top.
    pub prompt_offset: i32,
    /// Horizontal inset of the prompt block on both sides.
    pub prompt_margin: i32,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            text_size: 16.0,
            density: 1.0,
            title_offset: 180,
            prompt_offset: 140,
            prompt_margin: 57,
        }
    }
}

/// "Call `draw` again after `delay`", optionally only for `region`.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedrawRequest {
    pub delay: Duration,
    /// `None` means the whole surface.
    pub region: Option<Rect>,
}

impl RedrawRequest {
    /// Redraw everything, now.
    pub fn immediate() -> Self {
        Self { delay: Duration::ZERO, region: None }
    }

    pub fn after(delay: Duration, region: Option<Rect>) -> Self {
        Self { delay, region }
    }
}

enum State {
    Scanning,
    ShowingResult(RgbaImage),
}

pub struct OverlayRenderer<S> {
    source: S,
    palette: Palette,
    assets: OverlayAssets,
    geometry: GeometryConfig,
    text: TextLayout,
    scan_duration_ms: u32,
    scan_line: ScanLineAnimator,
    scan_line_visible: bool,
    points: ResultPointTracker,
    state: State,
}

impl<S: FramingRectSource> OverlayRenderer<S> {
    pub fn new(source: S, config: &OverlayConfig, assets: OverlayAssets) -> Self {
        Self {
            source,
            palette: Palette::new(config.accent_color),
            assets,
            geometry: config.geometry(),
            text: config.text_layout(),
            scan_duration_ms: config.scan_duration_ms,
            scan_line: ScanLineAnimator::new(),
            scan_line_visible: true,
            points: ResultPointTracker::new(),
            state: State::Scanning,
        }
    }

    /// Freeze the overlay on a decoded image.
    pub fn show_result(&mut self, image: RgbaImage) -> RedrawRequest {
        debug!(width = image.width(), height = image.height(), "overlay showing result");
        self.state = State::ShowingResult(image);
        RedrawRequest::immediate()
    }

    /// Drop any result and go back to live scanning.
    pub fn reset(&mut self) -> RedrawRequest {
        debug!("overlay back to scanning");
        self.state = State::Scanning;
        RedrawRequest::immediate()
    }

    /// Report a candidate point (relative to the frame's top-left).
    /// Accepted in either mode; only drawn while scanning.
    pub fn add_candidate_point(&self, point: ResultPoint) {
        self.points.add_point(point);
    }

    /// Handle for a decoder on another thread to report candidate points.
    pub fn point_sink(&self) -> PointSink {
        self.points.sink()
    }

    pub fn set_corner_stroke_width(&mut self, value: i32) {
        self.geometry.corner_stroke_width = value;
    }

    pub fn set_mid_line_stroke_width(&mut self, value: i32) {
        self.geometry.mid_line_stroke_width = value;
    }

    pub fn set_corner_length(&mut self, value: i32) {
        self.geometry.corner_length = value;
    }

    pub fn set_mid_line_padding(&mut self, value: i32) {
        self.geometry.mid_line_padding = value;
    }

    pub fn set_scan_line_visible(&mut self, visible: bool) {
        self.scan_line_visible = visible;
    }

    pub fn scan_line_visible(&self) -> bool {
        self.scan_line_visible
    }

    /// Top edge of the framing rect. Asking before the geometry exists is a bug
    /// in the caller and is reported as such.
    pub fn frame_top(&self) -> Result<i32> {
        self.source
            .framing_rect()
            .map(|frame| frame.top)
            .ok_or(Error::FramingRectUnavailable)
    }

    pub fn mode(&self) -> OverlayMode {
        match self.state {
            State::Scanning => OverlayMode::Scanning,
            State::ShowingResult(_) => OverlayMode::ShowingResult,
        }
    }

    pub fn result_image(&self) -> Option<&RgbaImage> {
        match &self.state {
            State::ShowingResult(image) => Some(image),
            State::Scanning => None,
        }
    }

    pub fn geometry(&self) -> GeometryConfig {
        self.geometry
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn scan_line(&self) -> &ScanLineAnimator {
        &self.scan_line
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Paint one frame. Returns when (and where) to paint the next one, if at all.
    pub fn draw(&mut self, canvas: &mut impl Canvas) -> Option<RedrawRequest> {
        let Some(frame) = self.source.framing_rect() else {
            trace!("no framing rect yet, frame skipped");
            return None;
        };
        let (width, height) = canvas.size();
        let geometry = self.geometry.limited_to(width.max(height));
        self.scan_line
            .initialize(frame, geometry.corner_stroke_width, self.scan_duration_ms);

        let mask = match self.state {
            State::ShowingResult(_) => self.palette.result_background,
            State::Scanning => self.palette.mask,
        };
        for band in mask_rects(width, height, frame) {
            canvas.fill_rect(band, mask);
        }

        if let State::ShowingResult(image) = &self.state {
            canvas.draw_image(image, frame.left, frame.top);
            return None;
        }

        for stroke in corner_brackets(frame, geometry.corner_stroke_width, geometry.corner_length) {
            canvas.fill_rect(stroke, self.palette.corner);
        }

        if self.scan_line_visible {
            let position = self.scan_line.advance();
            self.draw_scan_line(canvas, frame, position, &geometry);
        }

        self.draw_prompt(canvas, frame, width);

        self.points.rotate();
        self.draw_points(canvas, frame);

        Some(RedrawRequest::after(ANIMATION_DELAY, Some(frame)))
    }

    fn draw_scan_line(
        &self,
        canvas: &mut impl Canvas,
        frame: Rect,
        position: i32,
        geometry: &GeometryConfig,
    ) {
        match &self.assets.scan_line {
            ScanLineStyle::Texture(texture) => {
                let band = Rect::new(
                    frame.left,
                    position,
                    frame.right,
                    position + geometry.mid_line_padding,
                );
                canvas.draw_image_stretched(texture, band);
            }
            ScanLineStyle::Gradient => {
                let band = Rect::new(
                    frame.left + geometry.corner_stroke_width,
                    position,
                    frame.right - geometry.corner_stroke_width,
                    position + geometry.mid_line_stroke_width,
                );
                canvas.fill_horizontal_gradient(band, &self.palette.scan_line_stops());
            }
        }
    }

    fn draw_prompt(&self, canvas: &mut impl Canvas, frame: Rect, width: i32) {
        let metrics = TextMetrics::for_size(self.text.text_size, self.text.density);

        if !self.assets.title.is_empty() {
            let baseline = frame.top - self.text.title_offset;
            let left = text::centered_x(&self.assets.title, width / 2, metrics);
            canvas.draw_text(
                &self.assets.title,
                left,
                baseline - metrics.line_height(),
                metrics.scale,
                self.palette.title_text,
            );
        }

        if !self.assets.prompt.is_empty() {
            let margin = self.text.prompt_margin;
            let lines = text::layout_block(
                &self.assets.prompt,
                margin,
                frame.top - self.text.prompt_offset,
                width - 2 * margin,
                metrics,
                PROMPT_LINE_SPACING,
            );
            for line in lines {
                canvas.draw_text(&line.text, line.x, line.y, metrics.scale, self.palette.prompt_text);
            }
        }
    }

    fn draw_points(&self, canvas: &mut impl Canvas, frame: Rect) {
        let (ox, oy) = (frame.left as f32, frame.top as f32);

        let full = color::with_alpha(self.palette.result_point, OPAQUE);
        for point in self.points.current() {
            canvas.fill_circle(ox + point.x, oy + point.y, CURRENT_POINT_RADIUS, full);
        }

        let faded = color::with_alpha(self.palette.result_point, OPAQUE / 2);
        for point in self.points.previous() {
            canvas.fill_circle(ox + point.x, oy + point.y, PREVIOUS_POINT_RADIUS, faded);
        }
    }
}
