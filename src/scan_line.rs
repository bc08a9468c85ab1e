// The bouncing scan line inside the framing rect.
// Visual: a bright band sweeps from the top of the viewfinder to the bottom,
// then jumps back to the top and sweeps again.

use crate::types::Rect;
use tracing::debug;

/// Nominal frame time the sweep speed is calibrated against (ms).
const NOMINAL_FRAME_MS: u32 = 16;

/// Position of the scan line plus its one-shot calibration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanLineAnimator {
    position: i32,
    top_bound: i32,
    bottom_bound: i32,
    step: i32,
    initialized: bool,
}

impl ScanLineAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calibrate bounds and per-frame step from the first framing rect seen.
    /// Later calls are ignored, even if the rect has changed since.
    pub fn initialize(&mut self, frame: Rect, corner_stroke_width: i32, target_scan_ms: u32) {
        if self.initialized {
            return;
        }
        self.top_bound = frame.top.saturating_add(corner_stroke_width);
        self.bottom_bound = frame.bottom.saturating_sub(corner_stroke_width);

        // Sweep in (duration / 16 ms + 2) frames; never slower than 1 px per frame.
        let frames = (target_scan_ms / NOMINAL_FRAME_MS + 2) as i32;
        self.step = (self.bottom_bound.saturating_sub(self.top_bound) / frames).max(1);

        self.position = self.top_bound;
        self.initialized = true;
        debug!(
            top = self.top_bound,
            bottom = self.bottom_bound,
            step = self.step,
            "scan line calibrated"
        );
    }

    /// Move one frame down; wrap to the top once the bottom bound is reached.
    /// Returns the new position. Does nothing before calibration.
    pub fn advance(&mut self) -> i32 {
        if !self.initialized {
            return self.position;
        }
        self.position = self.position.saturating_add(self.step);
        if self.position >= self.bottom_bound {
            self.position = self.top_bound;
        }
        self.position
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn top_bound(&self) -> i32 {
        self.top_bound
    }

    pub fn bottom_bound(&self) -> i32 {
        self.bottom_bound
    }

    /// Pixels moved per drawn frame.
    pub fn step(&self) -> i32 {
        self.step
    }
}
