// Overlay configuration: everything the host may tune, with workable defaults.
// Read from JSON; any missing field keeps its default.

use crate::error::{ConfigSource, Error, Result};
use crate::palette::{OverlayAssets, ScanLineStyle};
use crate::renderer::{GeometryConfig, TextLayout};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bracket arm length at density 1.0 (px).
const CORNER_LENGTH_DP: f32 = 15.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// "#AARRGGBB" or "#RRGGBB"; the laser red when absent.
    #[serde(with = "hex_color")]
    pub accent_color: Option<u32>,
    pub corner_stroke_width: i32,
    /// Bracket arm length; 15 × density when absent.
    pub corner_length: Option<i32>,
    pub mid_line_stroke_width: i32,
    pub mid_line_padding: i32,
    /// Time for one top-to-bottom sweep of the scan line.
    pub scan_duration_ms: u32,
    /// Device pixels per density-independent pixel.
    pub density: f32,
    pub text_size: f32,
    pub title: String,
    pub prompt: String,
    pub title_offset: i32,
    pub prompt_offset: i32,
    pub prompt_margin: i32,
    /// Image stretched into the scan line; a gradient band is drawn without one.
    pub scan_line_texture: Option<PathBuf>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            accent_color: None,
            corner_stroke_width: 4,
            corner_length: None,
            mid_line_stroke_width: 3,
            mid_line_padding: 5,
            scan_duration_ms: 1600,
            density: 1.0,
            text_size: 16.0,
            title: "Scan code".to_string(),
            prompt: "Place the code inside the frame to scan it".to_string(),
            title_offset: 180,
            prompt_offset: 140,
            prompt_margin: 57,
            scan_line_texture: None,
        }
    }
}

impl OverlayConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let wrap = |source: ConfigSource| Error::Config { path: path.to_path_buf(), source };
        let text = std::fs::read_to_string(path).map_err(|e| wrap(e.into()))?;
        let config: Self = serde_json::from_str(&text).map_err(|e| wrap(e.into()))?;
        debug!(path = %path.display(), "loaded overlay config");
        Ok(config)
    }

    pub fn geometry(&self) -> GeometryConfig {
        GeometryConfig {
            corner_stroke_width: self.corner_stroke_width,
            corner_length: self
                .corner_length
                .unwrap_or_else(|| (CORNER_LENGTH_DP * self.density) as i32),
            mid_line_stroke_width: self.mid_line_stroke_width,
            mid_line_padding: self.mid_line_padding,
        }
    }

    pub fn text_layout(&self) -> TextLayout {
        TextLayout {
            text_size: self.text_size,
            density: self.density,
            title_offset: self.title_offset,
            prompt_offset: self.prompt_offset,
            prompt_margin: self.prompt_margin,
        }
    }

    /// Resolve the assets, loading the scan-line texture from disk if one is set.
    pub fn assets(&self) -> Result<OverlayAssets> {
        let scan_line = match &self.scan_line_texture {
            Some(path) => ScanLineStyle::Texture(image::open(path)?.to_rgba8()),
            None => ScanLineStyle::Gradient,
        };
        Ok(OverlayAssets {
            scan_line,
            title: self.title.clone(),
            prompt: self.prompt.clone(),
        })
    }
}

/// Optional colors as hex strings in JSON.
mod hex_color {
    use crate::color;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<u32>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(c) => s.serialize_some(&color::to_hex(*c)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        let text: Option<String> = Option::deserialize(d)?;
        text.map(|t| {
            color::parse_hex(&t).ok_or_else(|| D::Error::custom(format!("invalid color {t:?}")))
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: OverlayConfig =
            serde_json::from_str(r##"{ "accent_color": "#C800FF00", "scan_duration_ms": 800 }"##)
                .unwrap();
        assert_eq!(config.accent_color, Some(0xC800_FF00));
        assert_eq!(config.scan_duration_ms, 800);
        assert_eq!(config.corner_stroke_width, 4);
        assert_eq!(config.mid_line_padding, 5);
    }

    #[test]
    fn bad_color_is_rejected() {
        let parsed = serde_json::from_str::<OverlayConfig>(r#"{ "accent_color": "red" }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn corner_length_scales_with_density() {
        let config = OverlayConfig { density: 2.0, ..OverlayConfig::default() };
        assert_eq!(config.geometry().corner_length, 30);

        let fixed = OverlayConfig { corner_length: Some(12), ..config };
        assert_eq!(fixed.geometry().corner_length, 12);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = OverlayConfig { accent_color: Some(0xFF12_3456), ..OverlayConfig::default() };
        let text = serde_json::to_string(&config).unwrap();
        assert!(text.contains("#FF123456"));
        let back: OverlayConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = OverlayConfig::load(Path::new("/nonexistent/overlay.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/overlay.json"));
    }

    #[test]
    fn no_texture_means_gradient() {
        let assets = OverlayConfig::default().assets().unwrap();
        assert!(matches!(assets.scan_line, ScanLineStyle::Gradient));
        assert_eq!(assets.title, "Scan code");
    }
}
