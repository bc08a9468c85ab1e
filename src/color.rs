// Packed-color math for the overlay.
// Colors are 0xAARRGGBB; the preview buffer is 0x00RRGGBB (alpha ignored).
// Visual: these decide how see-through the mask is and how the overlay sits on the camera.

use crate::error::Error;
use crate::types::{FrameBuffer, Layer};

pub const TRANSPARENT: u32 = 0x0000_0000;
pub const WHITE: u32 = 0xFFFF_FFFF;
pub const OPAQUE: u8 = 0xFF;

#[inline]
pub fn alpha(color: u32) -> u8 {
    (color >> 24) as u8
}

#[inline]
fn channels(color: u32) -> (u32, u32, u32, u32) {
    (
        (color >> 24) & 0xFF,
        (color >> 16) & 0xFF,
        (color >> 8) & 0xFF,
        color & 0xFF,
    )
}

#[inline]
fn pack(a: u32, r: u32, g: u32, b: u32) -> u32 {
    (a << 24) | (r << 16) | (g << 8) | b
}

/// Same color with its alpha replaced.
#[inline]
pub fn with_alpha(color: u32, alpha: u8) -> u32 {
    (color & 0x00FF_FFFF) | ((alpha as u32) << 24)
}

/// Secondary tone used next to the accent: identical RGB, alpha halved (floored).
/// 0xC8112233 -> 0x64112233.
pub fn derive_secondary_tone(color: u32) -> u32 {
    let (a, r, g, b) = channels(color);
    pack(a / 2, r, g, b)
}

/// Parse "#RRGGBB" (opaque) or "#AARRGGBB"; the leading '#' is optional.
pub fn parse_hex(text: &str) -> Option<u32> {
    let digits = text.trim().trim_start_matches('#');
    let value = u32::from_str_radix(digits, 16).ok()?;
    match digits.len() {
        6 => Some(0xFF00_0000 | value),
        8 => Some(value),
        _ => None,
    }
}

pub fn to_hex(color: u32) -> String {
    format!("#{color:08X}")
}

/// Source-over blend of `src` onto a translucent `dst` (both unpremultiplied ARGB).
/// Visual: drawing a 50% dot over the dim mask gives a half-lit dot, not a hole.
#[inline]
pub fn blend_over(dst: u32, src: u32) -> u32 {
    let (sa, sr, sg, sb) = channels(src);
    if sa == 0xFF {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let (da, dr, dg, db) = channels(dst);
    let dst_weight = da * (255 - sa) / 255;
    let out_a = sa + dst_weight;
    if out_a == 0 {
        return TRANSPARENT;
    }
    let mix = |s: u32, d: u32| (s * sa + d * dst_weight + out_a / 2) / out_a;
    pack(out_a, mix(sr, dr), mix(sg, dg), mix(sb, db))
}

/// Linear interpolation between two ARGB colors, `t` in [0,1].
pub fn lerp(from: u32, to: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let (fa, fr, fg, fb) = channels(from);
    let (ta, tr, tg, tb) = channels(to);
    let mix = |f: u32, t_: u32| (f as f32 + (t_ as f32 - f as f32) * t).round() as u32;
    pack(mix(fa, ta), mix(fr, tr), mix(fg, tg), mix(fb, tb))
}

/// Evenly spaced gradient stops sampled at `t` in [0,1] (clamped at the ends).
pub fn sample_stops(stops: &[u32], t: f32) -> u32 {
    match stops.len() {
        0 => TRANSPARENT,
        1 => stops[0],
        n => {
            let pos = t.clamp(0.0, 1.0) * (n - 1) as f32;
            let i = (pos.floor() as usize).min(n - 2);
            lerp(stops[i], stops[i + 1], pos - i as f32)
        }
    }
}

/// Put the overlay layer on top of the opaque preview.
/// Visual: the camera image shows through wherever the layer is transparent.
pub fn composite_layer(screen: &mut FrameBuffer, layer: &Layer) -> Result<(), Error> {
    if screen.width != layer.width || screen.height != layer.height {
        return Err(Error::SizeMismatch(format!(
            "composite: screen {}x{} vs layer {}x{}",
            screen.width, screen.height, layer.width, layer.height
        )));
    }

    for (dst, &src) in screen.pixels.iter_mut().zip(layer.pixels.iter()) {
        let (a, r, g, b) = channels(src);
        if a == 0 {
            continue;
        }
        if a == 0xFF {
            *dst = src & 0x00FF_FFFF;
            continue;
        }
        let (_, dr, dg, db) = channels(*dst);
        let inv = 255 - a;
        let mix = |s: u32, d: u32| (s * a + d * inv + 127) / 255;
        *dst = pack(0, mix(r, dr), mix(g, dg), mix(b, db));
    }
    Ok(())
}
