// Where things go on screen: the framing rect, the dimmed mask around it,
// and the eight strokes that make up the corner brackets.

use crate::types::Rect;
use std::sync::{Arc, RwLock};

/// How far the brackets sit off the framing rect's edges (px).
pub const CORNER_MARGIN: i32 = 5;

/// Supplies the active scan area each frame; `None` until the geometry exists.
pub trait FramingRectSource {
    fn framing_rect(&self) -> Option<Rect>;
}

impl<F> FramingRectSource for F
where
    F: Fn() -> Option<Rect>,
{
    fn framing_rect(&self) -> Option<Rect> {
        self()
    }
}

/// Framing rect another part of the host can publish or withdraw at any time.
#[derive(Clone, Default)]
pub struct SharedFramingRect {
    rect: Arc<RwLock<Option<Rect>>>,
}

impl SharedFramingRect {
    pub fn new(rect: Option<Rect>) -> Self {
        Self { rect: Arc::new(RwLock::new(rect)) }
    }

    pub fn set(&self, rect: Option<Rect>) {
        *self.rect.write().unwrap_or_else(|e| e.into_inner()) = rect;
    }
}

impl FramingRectSource for SharedFramingRect {
    fn framing_rect(&self) -> Option<Rect> {
        *self.rect.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// Square scan area centered in the preview, `fraction` of the short side.
/// Visual: the clear window in the middle of the dimmed screen.
#[derive(Clone, Copy, Debug)]
pub struct CenteredFramingRect {
    pub surface_width: i32,
    pub surface_height: i32,
    pub fraction: f32,
    /// Push the square down (positive) to leave room for the prompt above it.
    pub offset_y: i32,
}

impl CenteredFramingRect {
    pub fn new(surface_width: i32, surface_height: i32) -> Self {
        Self { surface_width, surface_height, fraction: 0.625, offset_y: 0 }
    }

    pub fn with_offset_y(mut self, offset_y: i32) -> Self {
        self.offset_y = offset_y;
        self
    }
}

impl FramingRectSource for CenteredFramingRect {
    fn framing_rect(&self) -> Option<Rect> {
        if self.surface_width <= 0 || self.surface_height <= 0 {
            return None;
        }
        let short = self.surface_width.min(self.surface_height);
        // Never larger than the short side, whatever `fraction` says
        let side = ((short as f32 * self.fraction) as i32).min(short);
        if side <= 0 {
            return None;
        }
        let left = (self.surface_width - side) / 2;
        let top = ((self.surface_height - side) / 2)
            .saturating_add(self.offset_y)
            .clamp(0, self.surface_height - side);
        Some(Rect::new(left, top, left + side, top + side))
    }
}

/// The four bands that cover the surface outside `frame`: above, left, right, below.
pub fn mask_rects(surface_width: i32, surface_height: i32, frame: Rect) -> [Rect; 4] {
    [
        Rect::new(0, 0, surface_width, frame.top),
        Rect::new(0, frame.top, frame.left, frame.bottom + 1),
        Rect::new(frame.right + 1, frame.top, surface_width, frame.bottom + 1),
        Rect::new(0, frame.bottom + 1, surface_width, surface_height),
    ]
}

/// The eight strokes of the corner brackets, two per corner (horizontal, vertical),
/// in the order top-left, bottom-left, top-right, bottom-right.
/// Each stroke is `stroke` thick and `length` long. The brackets sit `CORNER_MARGIN`
/// *outside* the rect's edges, not inside it.
pub fn corner_brackets(frame: Rect, stroke: i32, length: i32) -> [Rect; 8] {
    let half = stroke / 2;
    let m = CORNER_MARGIN;
    let (l, t, r, b) = (frame.left, frame.top, frame.right, frame.bottom);
    [
        // top-left
        Rect::new(l - half - m, t - half - m, l + length - m, t + half - m),
        Rect::new(l - half - m, t - half - m, l + half - m, t + length - m),
        // bottom-left
        Rect::new(l - half - m, b - half + m, l + length - m, b + half + m),
        Rect::new(l - half - m, b - length + m, l + half - m, b + half + m),
        // top-right
        Rect::new(r - length + m, t - half - m, r + half + m, t + half - m),
        Rect::new(r - half + m, t - half - m, r + half + m, t + length - m),
        // bottom-right
        Rect::new(r - length + m, b - half + m, r + half + m, b + half + m),
        Rect::new(r - half + m, b - length + m, r + half + m, b + half + m),
    ]
}
