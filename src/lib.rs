//! Live scanning overlay for a camera preview.
//!
//! Draws a dimmed mask around a rectangular viewfinder, corner brackets, a
//! scan line bouncing inside the viewfinder, prompt text and short-lived
//! highlights for candidate detections. The host owns the redraw loop and the
//! drawing surface; [`renderer::OverlayRenderer`] only issues drawing commands
//! to a [`draw::Canvas`] and says when it wants to be called again.

pub mod color;
pub mod config;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod palette;
pub mod points;
pub mod renderer;
pub mod scan_line;
pub mod text;
pub mod types;

pub use config::OverlayConfig;
pub use draw::{Canvas, DrawOp, RecordingCanvas};
pub use error::{Error, Result};
pub use geometry::{CenteredFramingRect, FramingRectSource, SharedFramingRect};
pub use palette::{OverlayAssets, Palette, ScanLineStyle};
pub use points::{PointSink, ResultPointTracker};
pub use renderer::{GeometryConfig, OverlayMode, OverlayRenderer, RedrawRequest, TextLayout};
pub use scan_line::ScanLineAnimator;
pub use types::{FrameBuffer, Layer, Rect, ResultPoint};
