// Core types shared by the overlay: rectangles, candidate points and pixel buffers.

use std::hash::{Hash, Hasher};

/// Axis-aligned rectangle in device pixels.
/// `right`/`bottom` are exclusive when filling, like a canvas rect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// True when the rect covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Overlap of two rects (may come back empty).
    pub fn intersect(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// A coordinate reported by the decoder while a scan is in progress.
/// Relative to the framing rect's top-left corner.
///
/// Equality and hashing go through the float bit patterns so points can live in
/// a set; two reports of the exact same coordinate collapse into one highlight.
#[derive(Clone, Copy, Debug)]
pub struct ResultPoint {
    pub x: f32,
    pub y: f32,
}

impl ResultPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl PartialEq for ResultPoint {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }
}

impl Eq for ResultPoint {}

impl Hash for ResultPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
    }
}

/// Opaque preview image, one 0x00RRGGBB pixel per entry (what minifb shows).
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }
}

/// Translucent drawing surface the overlay renders into; 0xAARRGGBB per pixel.
/// Visual: unseen by itself, it gets composited over the live preview.
pub struct Layer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
    /// Drawing outside this rect is discarded.
    pub(crate) clip: Rect,
}

impl Layer {
    /// Fully transparent layer, clip covering everything.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u32; width * height],
            clip: Rect::new(0, 0, width as i32, height as i32),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn clip(&self) -> Rect {
        self.clip
    }

    /// Prepare for a redraw: wipe `region` (or everything) to transparent and clip
    /// subsequent drawing to it. Pixels outside the region keep their last content.
    pub fn begin_redraw(&mut self, region: Option<Rect>) {
        let bounds = self.bounds();
        let region = region.map_or(bounds, |r| r.intersect(&bounds));
        self.clip = region;
        if region.is_empty() {
            return;
        }
        for y in region.top..region.bottom {
            let row = y as usize * self.width;
            self.pixels[row + region.left as usize..row + region.right as usize].fill(0);
        }
    }

    /// Read one pixel; out of range reads as transparent.
    pub fn pixel(&self, x: i32, y: i32) -> u32 {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return 0;
        }
        self.pixels[y as usize * self.width + x as usize]
    }
}
