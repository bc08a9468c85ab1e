// Software drawing for the overlay.
// Visual effects provided here:
// 1) Filled rectangles (mask bands, corner brackets).
// 2) Filled circles (candidate-point highlights).
// 3) Image blits, plain and stretched (result snapshot, scan-line texture).
// 4) A horizontal gradient band (scan line without a texture).
// 5) A tiny 5x7 bitmap font, scaled up, for the prompt text.

use crate::color::{self, blend_over};
use crate::text::{GLYPH_ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::types::{Layer, Rect};
use image::RgbaImage;

/// Drawing surface the renderer issues its commands to.
/// Colors are 0xAARRGGBB; all geometry is in surface pixels.
pub trait Canvas {
    /// (width, height) of the whole surface.
    fn size(&self) -> (i32, i32);
    fn fill_rect(&mut self, rect: Rect, color: u32);
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: u32);
    /// Blit `image` unscaled with its top-left at (`left`, `top`).
    fn draw_image(&mut self, image: &RgbaImage, left: i32, top: i32);
    /// Blit `image` scaled to cover `dst`.
    fn draw_image_stretched(&mut self, image: &RgbaImage, dst: Rect);
    /// Colors spread evenly from `rect.left` to `rect.right`.
    fn fill_horizontal_gradient(&mut self, rect: Rect, stops: &[u32]);
    /// One line of bitmap text, top-left anchored.
    fn draw_text(&mut self, text: &str, left: i32, top: i32, scale: i32, color: u32);
}

#[inline]
fn rgba_to_argb(px: &image::Rgba<u8>) -> u32 {
    let [r, g, b, a] = px.0;
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

impl Layer {
    /// Blend one pixel if (x,y) is inside the clip.
    /// Visual: the exact pixel at (x,y) takes on the color, see-through if it has alpha.
    #[inline]
    fn put_pixel(&mut self, x: i32, y: i32, color: u32) {
        if !self.clip.contains(x, y) {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.pixels[idx] = blend_over(self.pixels[idx], color);
    }

    fn clipped(&self, rect: Rect) -> Rect {
        rect.intersect(&self.clip)
    }
}

impl Canvas for Layer {
    fn size(&self) -> (i32, i32) {
        (self.width as i32, self.height as i32)
    }

    fn fill_rect(&mut self, rect: Rect, color: u32) {
        let area = self.clipped(rect);
        if area.is_empty() || color::alpha(color) == 0 {
            return;
        }
        for y in area.top..area.bottom {
            for x in area.left..area.right {
                self.put_pixel(x, y, color);
            }
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: u32) {
        if radius <= 0.0 || !(cx.is_finite() && cy.is_finite() && radius.is_finite()) {
            return;
        }
        let r2 = radius * radius;
        // Float-to-int casts saturate, so only the +1 needs guarding
        let bbox = self.clipped(Rect::new(
            (cx - radius).floor() as i32,
            (cy - radius).floor() as i32,
            ((cx + radius).ceil() as i32).saturating_add(1),
            ((cy + radius).ceil() as i32).saturating_add(1),
        ));
        for y in bbox.top..bbox.bottom {
            for x in bbox.left..bbox.right {
                // Sample at the pixel center
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.put_pixel(x, y, color);
                }
            }
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, left: i32, top: i32) {
        let (w, h) = image.dimensions();
        let dst = Rect::new(left, top, left + w as i32, top + h as i32);
        let area = self.clipped(dst);
        for y in area.top..area.bottom {
            for x in area.left..area.right {
                let px = image.get_pixel((x - left) as u32, (y - top) as u32);
                self.put_pixel(x, y, rgba_to_argb(px));
            }
        }
    }

    fn draw_image_stretched(&mut self, image: &RgbaImage, dst: Rect) {
        let (iw, ih) = image.dimensions();
        if dst.is_empty() || iw == 0 || ih == 0 {
            return;
        }
        let (dw, dh) = (dst.width() as i64, dst.height() as i64);
        let area = self.clipped(dst);
        for y in area.top..area.bottom {
            // Nearest-neighbour sample back into the source
            let sy = ((y - dst.top) as i64 * ih as i64 / dh) as u32;
            for x in area.left..area.right {
                let sx = ((x - dst.left) as i64 * iw as i64 / dw) as u32;
                let px = image.get_pixel(sx.min(iw - 1), sy.min(ih - 1));
                self.put_pixel(x, y, rgba_to_argb(px));
            }
        }
    }

    fn fill_horizontal_gradient(&mut self, rect: Rect, stops: &[u32]) {
        if rect.is_empty() || stops.is_empty() {
            return;
        }
        let width = rect.width() as f32;
        let area = self.clipped(rect);
        for x in area.left..area.right {
            let t = (x - rect.left) as f32 / (width - 1.0).max(1.0);
            let c = color::sample_stops(stops, t);
            for y in area.top..area.bottom {
                self.put_pixel(x, y, c);
            }
        }
    }

    fn draw_text(&mut self, text: &str, left: i32, top: i32, scale: i32, color: u32) {
        let scale = scale.max(1);
        let shadow = color::with_alpha(0x0000_0000, color::alpha(color));
        let mut x = left;
        for ch in text.chars() {
            if let Some(rows) = glyph5x7(ch) {
                // Shadow pass: offset by one scaled pixel in black to improve readability
                self.draw_glyph(&rows, x + scale, top + scale, scale, shadow);
                self.draw_glyph(&rows, x, top, scale, color);
            }
            x += GLYPH_ADVANCE * scale;
        }
    }
}

impl Layer {
    fn draw_glyph(&mut self, rows: &[u8; 7], x: i32, y: i32, scale: i32, color: u32) {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..GLYPH_WIDTH {
                if (rowbits & (1 << (GLYPH_WIDTH - 1 - rx))) != 0 {
                    let cell = Rect::new(
                        x + rx * scale,
                        y + ry as i32 * scale,
                        x + (rx + 1) * scale,
                        y + (ry as i32 + 1) * scale,
                    );
                    self.fill_rect(cell, color);
                }
            }
        }
    }
}

/* ---------- 5x7 bitmap font (uppercase ASCII, digits, common punctuation) ---------- */

/// Return a 5x7 glyph bitmap; lowercase letters use the uppercase shapes.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; GLYPH_HEIGHT as usize]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),

        _ => None,
    }
}

/// One drawing command, as captured by [`RecordingCanvas`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Rect { rect: Rect, color: u32 },
    Circle { cx: f32, cy: f32, radius: f32, color: u32 },
    Image { left: i32, top: i32, width: u32, height: u32 },
    StretchedImage { dst: Rect },
    Gradient { rect: Rect, stops: Vec<u32> },
    Text { text: String, left: i32, top: i32, scale: i32, color: u32 },
}

/// Canvas that only remembers what was asked of it.
/// Visual: nothing; used to check which parts of the overlay a frame produced.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    pub width: i32,
    pub height: i32,
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height, ops: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: Rect, color: u32) {
        self.ops.push(DrawOp::Rect { rect, color });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: u32) {
        self.ops.push(DrawOp::Circle { cx, cy, radius, color });
    }

    fn draw_image(&mut self, image: &RgbaImage, left: i32, top: i32) {
        let (width, height) = image.dimensions();
        self.ops.push(DrawOp::Image { left, top, width, height });
    }

    fn draw_image_stretched(&mut self, _image: &RgbaImage, dst: Rect) {
        self.ops.push(DrawOp::StretchedImage { dst });
    }

    fn fill_horizontal_gradient(&mut self, rect: Rect, stops: &[u32]) {
        self.ops.push(DrawOp::Gradient { rect, stops: stops.to_vec() });
    }

    fn draw_text(&mut self, text: &str, left: i32, top: i32, scale: i32, color: u32) {
        self.ops.push(DrawOp::Text { text: text.to_string(), left, top, scale, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn fill_rect_respects_clip() {
        let mut layer = Layer::new(10, 10);
        layer.begin_redraw(Some(Rect::new(0, 0, 5, 5)));
        layer.fill_rect(Rect::new(3, 3, 8, 8), 0xFF11_2233);
        assert_eq!(layer.pixel(4, 4), 0xFF11_2233);
        assert_eq!(layer.pixel(5, 5), 0);
        assert_eq!(layer.pixel(2, 2), 0);
    }

    #[test]
    fn circle_covers_center_not_bbox_corner() {
        let mut layer = Layer::new(20, 20);
        layer.fill_circle(10.0, 10.0, 6.0, 0xFFFF_0000);
        assert_eq!(layer.pixel(10, 10), 0xFFFF_0000);
        assert_eq!(layer.pixel(15, 10), 0xFFFF_0000);
        assert_eq!(layer.pixel(4, 4), 0);
        assert_eq!(layer.pixel(17, 10), 0);
    }

    #[test]
    fn circle_far_off_surface_draws_nothing() {
        let mut layer = Layer::new(20, 20);
        layer.fill_circle(f32::MAX, 5.0, 6.0, 0xFFFF_0000);
        layer.fill_circle(5.0, f32::MAX, 6.0, 0xFFFF_0000);
        layer.fill_circle(-f32::MAX, 5.0, 6.0, 0xFFFF_0000);
        layer.fill_circle(f32::INFINITY, 5.0, 6.0, 0xFFFF_0000);
        layer.fill_circle(5.0, f32::NAN, 6.0, 0xFFFF_0000);
        layer.fill_circle(5.0, 5.0, f32::INFINITY, 0xFFFF_0000);
        assert!(layer.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn half_alpha_circle_over_mask_keeps_mask_underneath() {
        let mut layer = Layer::new(8, 8);
        layer.fill_rect(layer.bounds(), 0x6000_0000);
        layer.fill_circle(4.0, 4.0, 3.0, 0x7FFF_BD21);
        let px = layer.pixel(4, 4);
        assert!(color::alpha(px) > 0x7F);
        assert_ne!(px & 0x00FF_FFFF, 0);
    }

    #[test]
    fn stretched_image_fills_destination() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([0, 0, 255, 255]));

        let mut layer = Layer::new(10, 4);
        layer.draw_image_stretched(&image, Rect::new(0, 1, 10, 3));
        assert_eq!(layer.pixel(0, 1), 0xFFFF_0000);
        assert_eq!(layer.pixel(4, 2), 0xFFFF_0000);
        assert_eq!(layer.pixel(5, 2), 0xFF00_00FF);
        assert_eq!(layer.pixel(9, 1), 0xFF00_00FF);
        assert_eq!(layer.pixel(0, 0), 0);
        assert_eq!(layer.pixel(0, 3), 0);
    }

    #[test]
    fn image_blit_lands_at_top_left() {
        let image = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255]));
        let mut layer = Layer::new(10, 10);
        layer.draw_image(&image, 4, 5);
        assert_eq!(layer.pixel(4, 5), 0xFF01_0203);
        assert_eq!(layer.pixel(6, 6), 0xFF01_0203);
        assert_eq!(layer.pixel(7, 6), 0);
        assert_eq!(layer.pixel(4, 7), 0);
    }

    #[test]
    fn text_is_drawn_for_lowercase_too() {
        let mut upper = Layer::new(40, 20);
        let mut lower = Layer::new(40, 20);
        upper.draw_text("SCAN", 1, 1, 1, 0xFFFF_FFFF);
        lower.draw_text("scan", 1, 1, 1, 0xFFFF_FFFF);
        assert_eq!(upper.pixels, lower.pixels);
        assert!(upper.pixels.iter().any(|&p| p == 0xFFFF_FFFF));
    }

    #[test]
    fn gradient_runs_between_its_stops() {
        let mut layer = Layer::new(11, 1);
        layer.fill_horizontal_gradient(Rect::new(0, 0, 11, 1), &[0xFF00_0000, 0xFFFF_FFFF]);
        assert_eq!(layer.pixel(0, 0), 0xFF00_0000);
        assert_eq!(layer.pixel(10, 0), 0xFFFF_FFFF);
    }
}
