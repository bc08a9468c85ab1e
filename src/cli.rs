// Command-line options for the demo host.

use clap::Parser;
use std::path::PathBuf;
use viewfinder_overlay::OverlayConfig;
use viewfinder_overlay::color::parse_hex;

#[derive(Parser, Debug)]
#[command(name = "viewfinder", about = "Camera preview with a live scanning overlay")]
pub struct Cli {
    /// Camera index (0 = default webcam)
    #[arg(long, default_value_t = 0)]
    pub camera: u32,

    /// Requested capture width
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Requested capture height
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// JSON overlay config; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Time for one sweep of the scan line, in ms
    #[arg(long)]
    pub scan_duration_ms: Option<u32>,

    /// Accent color, "#RRGGBB" or "#AARRGGBB"
    #[arg(long, value_parser = parse_color)]
    pub accent: Option<u32>,

    /// Image to use for the scan line instead of the gradient
    #[arg(long)]
    pub scan_line_texture: Option<PathBuf>,

    /// Size of the viewfinder relative to the short side of the preview
    #[arg(long, default_value_t = 0.5)]
    pub frame_fraction: f32,

    /// Push the viewfinder down by this many pixels to make room for the prompt
    #[arg(long, default_value_t = 60)]
    pub frame_offset: i32,
}

impl Cli {
    /// Fold the flags that were given into `config`.
    pub fn apply(&self, config: &mut OverlayConfig) {
        if let Some(ms) = self.scan_duration_ms {
            config.scan_duration_ms = ms;
        }
        if let Some(accent) = self.accent {
            config.accent_color = Some(accent);
        }
        if let Some(path) = &self.scan_line_texture {
            config.scan_line_texture = Some(path.clone());
        }
    }
}

fn parse_color(text: &str) -> Result<u32, String> {
    parse_hex(text).ok_or_else(|| format!("expected #RRGGBB or #AARRGGBB, got {text:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from(["viewfinder", "--scan-duration-ms", "900", "--accent", "#00FF00"]);
        let mut config = OverlayConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.scan_duration_ms, 900);
        assert_eq!(config.accent_color, Some(0xFF00_FF00));
        assert_eq!(config.corner_stroke_width, OverlayConfig::default().corner_stroke_width);
    }

    #[test]
    fn bad_accent_is_rejected() {
        assert!(Cli::try_parse_from(["viewfinder", "--accent", "green"]).is_err());
    }
}
