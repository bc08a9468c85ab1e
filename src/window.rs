// The on-screen window and the keys the demo listens to.
// Visual: a window showing the camera with the overlay composited on top.

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use viewfinder_overlay::{Error, FrameBuffer};

pub struct PreviewWindow {
    window: Window,
}

impl PreviewWindow {
    /// Create a window sized to the camera feed.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push this frame's pixels to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    /// False once the user closes the window.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Space: leave the frozen result and scan again.
    pub fn space_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::Space, KeyRepeat::No)
    }

    /// L: show/hide the scan line.
    pub fn l_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::L, KeyRepeat::No)
    }
}
