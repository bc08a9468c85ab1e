// Live preview source: opens a camera and hands out frames for the window,
// plus cut-outs of the viewfinder region for the decoder and the result snapshot.

use image::{Rgba, RgbaImage};
use viewfinder_overlay::{Error, FrameBuffer, Rect};

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};
use tracing::debug;

/// Greyscale copy of part of a frame, what the decoder works on.
pub struct LumaCrop {
    pub width: usize,
    pub height: usize,
    pub luma: Vec<u8>,
}

pub struct CameraPreview {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraPreview {
    /// Open camera `index` near the requested resolution and start streaming.
    pub fn open(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(CameraIndex::Index(index), req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The stream might settle on a slightly different resolution.
        let actual = cam.resolution();
        debug!(index, width = actual.width(), height = actual.height(), "camera streaming");

        Ok(Self { cam, width: actual.width(), height: actual.height() })
    }

    /// Block for the next frame and pack it as 0x00RRGGBB.
    pub fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;
        let rgb = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        let (w, h) = rgb.dimensions();
        let pixels = rgb
            .pixels()
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect();
        Ok(FrameBuffer { width: w as usize, height: h as usize, pixels })
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Part of `frame` inside `rect`, clamped to the frame.
fn clamped(frame: &FrameBuffer, rect: Rect) -> Rect {
    rect.intersect(&Rect::new(0, 0, frame.width as i32, frame.height as i32))
}

/// Opaque RGBA copy of the viewfinder region; shown frozen once a code decodes.
pub fn snapshot(frame: &FrameBuffer, rect: Rect) -> RgbaImage {
    let area = clamped(frame, rect);
    if area.is_empty() {
        return RgbaImage::new(0, 0);
    }
    RgbaImage::from_fn(area.width() as u32, area.height() as u32, |x, y| {
        let px = frame.pixels[(area.top as usize + y as usize) * frame.width + area.left as usize + x as usize];
        Rgba([(px >> 16) as u8, (px >> 8) as u8, px as u8, 0xFF])
    })
}

/// Greyscale copy of the viewfinder region (Rec. 601 luma).
pub fn luma_crop(frame: &FrameBuffer, rect: Rect) -> LumaCrop {
    let area = clamped(frame, rect);
    if area.is_empty() {
        return LumaCrop { width: 0, height: 0, luma: Vec::new() };
    }
    let mut luma = Vec::with_capacity((area.width() * area.height()) as usize);
    for y in area.top..area.bottom {
        let row = y as usize * frame.width;
        for x in area.left..area.right {
            let px = frame.pixels[row + x as usize];
            let (r, g, b) = ((px >> 16) & 0xFF, (px >> 8) & 0xFF, px & 0xFF);
            luma.push(((r * 299 + g * 587 + b * 114) / 1000) as u8);
        }
    }
    LumaCrop { width: area.width() as usize, height: area.height() as usize, luma }
}
