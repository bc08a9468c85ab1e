// Colors and assets the overlay draws with, resolved once at construction.

use crate::color::{self, TRANSPARENT};
use image::RgbaImage;

/// Dim applied outside the viewfinder while scanning.
pub const MASK_COLOR: u32 = 0x6000_0000;
/// Darker dim behind a captured result.
pub const RESULT_BACKGROUND_COLOR: u32 = 0xB000_0000;
/// Accent used when the host configures none.
pub const LASER_COLOR: u32 = 0xFFCC_0000;
/// Candidate-detection dots.
pub const RESULT_POINT_COLOR: u32 = 0xC0FF_BD21;
/// Title line above the viewfinder.
pub const TITLE_TEXT_COLOR: u32 = 0xFFF0_F0F0;
pub const PROMPT_TEXT_COLOR: u32 = color::WHITE;
pub const CORNER_COLOR: u32 = color::WHITE;
/// Alpha both prompt lines are drawn at.
pub const TEXT_ALPHA: u8 = 221;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub mask: u32,
    pub result_background: u32,
    /// Base frame/accent color.
    pub accent: u32,
    /// Accent with its alpha halved; the soft shoulders of the gradient scan line.
    pub accent_secondary: u32,
    pub result_point: u32,
    pub corner: u32,
    pub title_text: u32,
    pub prompt_text: u32,
}

impl Palette {
    pub fn new(accent: Option<u32>) -> Self {
        let accent = accent.unwrap_or(LASER_COLOR);
        Self {
            mask: MASK_COLOR,
            result_background: RESULT_BACKGROUND_COLOR,
            accent,
            accent_secondary: color::derive_secondary_tone(accent),
            result_point: RESULT_POINT_COLOR,
            corner: CORNER_COLOR,
            title_text: color::with_alpha(TITLE_TEXT_COLOR, TEXT_ALPHA),
            prompt_text: color::with_alpha(PROMPT_TEXT_COLOR, TEXT_ALPHA),
        }
    }

    /// Stops for the gradient scan line: fades in, holds the accent, fades out.
    pub fn scan_line_stops(&self) -> [u32; 9] {
        let (a, s) = (self.accent, self.accent_secondary);
        [TRANSPARENT, s, a, a, a, a, a, s, TRANSPARENT]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(None)
    }
}

/// How the moving scan line is painted.
#[derive(Clone, Debug)]
pub enum ScanLineStyle {
    /// A texture stretched across the viewfinder width.
    Texture(RgbaImage),
    /// A fading accent band, no asset needed.
    Gradient,
}

/// Externally supplied look: the scan-line texture and the two prompt strings.
#[derive(Clone, Debug)]
pub struct OverlayAssets {
    pub scan_line: ScanLineStyle,
    pub title: String,
    pub prompt: String,
}

impl Default for OverlayAssets {
    fn default() -> Self {
        Self {
            scan_line: ScanLineStyle::Gradient,
            title: String::new(),
            prompt: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_falls_back_to_laser() {
        let palette = Palette::new(None);
        assert_eq!(palette.accent, LASER_COLOR);
        assert_eq!(palette.accent_secondary, 0x7FCC_0000);
    }

    #[test]
    fn secondary_follows_configured_accent() {
        let palette = Palette::new(Some(0xC800_FF00));
        assert_eq!(palette.accent_secondary, 0x6400_FF00);
        let stops = palette.scan_line_stops();
        assert_eq!(stops[0], TRANSPARENT);
        assert_eq!(stops[1], 0x6400_FF00);
        assert_eq!(stops[4], 0xC800_FF00);
    }

    #[test]
    fn text_colors_carry_prompt_alpha() {
        let palette = Palette::default();
        assert_eq!(color::alpha(palette.title_text), TEXT_ALPHA);
        assert_eq!(color::alpha(palette.prompt_text), TEXT_ALPHA);
    }
}
