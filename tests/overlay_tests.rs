//! Integration tests: the overlay rendered into a real pixel layer.

use image::{Rgba, RgbaImage};
use std::cell::Cell;
use viewfinder_overlay::color::{self, composite_layer};
use viewfinder_overlay::geometry::corner_brackets;
use viewfinder_overlay::palette::{CORNER_COLOR, MASK_COLOR, RESULT_BACKGROUND_COLOR};
use viewfinder_overlay::{
    FrameBuffer, Layer, OverlayAssets, OverlayConfig, OverlayMode, OverlayRenderer, Rect,
    RedrawRequest, ResultPoint, ScanLineStyle,
};

const WIDTH: usize = 320;
const HEIGHT: usize = 480;
const FRAME: Rect = Rect::new(60, 200, 260, 400);

fn assets() -> OverlayAssets {
    OverlayAssets {
        scan_line: ScanLineStyle::Texture(RgbaImage::from_pixel(8, 2, Rgba([0, 255, 0, 255]))),
        title: "SCAN".into(),
        prompt: "Point the camera at a code".into(),
    }
}

fn overlay() -> OverlayRenderer<impl Fn() -> Option<Rect>> {
    OverlayRenderer::new(|| Some(FRAME), &OverlayConfig::default(), assets())
}

#[test]
fn test_scanning_frame_pixels() {
    let mut renderer = overlay();
    let mut layer = Layer::new(WIDTH, HEIGHT);
    let next = renderer.draw(&mut layer).expect("scanning reschedules");
    assert_eq!(next.region, Some(FRAME));

    // Mask outside, clear inside
    assert_eq!(layer.pixel(5, 5), MASK_COLOR);
    assert_eq!(layer.pixel(5, HEIGHT as i32 - 5), MASK_COLOR);
    assert_eq!(layer.pixel(FRAME.left + 100, FRAME.top + 150), 0);

    // Bracket stroke drawn in the corner color
    let stroke = corner_brackets(FRAME, 4, 15)[0];
    assert_eq!(layer.pixel(stroke.left + 1, stroke.top + 1), CORNER_COLOR);

    // Scan line texture across the frame at the current position
    let line = renderer.scan_line().position();
    assert_eq!(layer.pixel(FRAME.left + 10, line + 1), 0xFF00_FF00);
}

#[test]
fn test_region_redraw_keeps_mask_and_moves_line() {
    let mut renderer = overlay();
    let mut layer = Layer::new(WIDTH, HEIGHT);
    let next = renderer.draw(&mut layer).expect("scanning reschedules");
    let first_line = renderer.scan_line().position();

    layer.begin_redraw(next.region);
    assert_eq!(renderer.draw(&mut layer), Some(next));
    let second_line = renderer.scan_line().position();

    assert!(second_line > first_line);
    assert_eq!(layer.pixel(5, 5), MASK_COLOR);
    // Old line position inside the region was wiped
    if first_line + 1 < second_line {
        assert_eq!(layer.pixel(FRAME.left + 100, first_line), 0);
    }
    assert_eq!(layer.pixel(FRAME.left + 10, second_line + 1), 0xFF00_FF00);
}

#[test]
fn test_candidate_point_drawn_relative_to_frame() {
    let mut renderer = overlay();
    let mut layer = Layer::new(WIDTH, HEIGHT);
    renderer.add_candidate_point(ResultPoint::new(100.0, 40.0));
    assert!(renderer.draw(&mut layer).is_some());

    let px = layer.pixel(FRAME.left + 100, FRAME.top + 40);
    assert_eq!(px, color::with_alpha(renderer.palette().result_point, 0xFF));
}

#[test]
fn test_result_then_reset_round_trip() {
    let mut renderer = overlay();
    let mut layer = Layer::new(WIDTH, HEIGHT);
    assert!(renderer.draw(&mut layer).is_some());

    let snapshot = RgbaImage::from_pixel(20, 10, Rgba([10, 20, 30, 255]));
    let request = renderer.show_result(snapshot);
    assert_eq!(request, RedrawRequest::immediate());
    layer.begin_redraw(request.region);
    assert!(renderer.draw(&mut layer).is_none());

    assert_eq!(renderer.mode(), OverlayMode::ShowingResult);
    assert_eq!(layer.pixel(5, 5), RESULT_BACKGROUND_COLOR);
    assert_eq!(layer.pixel(FRAME.left, FRAME.top), 0xFF0A_141E);
    // Nothing decorative inside the frame
    assert_eq!(layer.pixel(FRAME.left + 100, FRAME.top + 150), 0);

    let request = renderer.reset();
    layer.begin_redraw(request.region);
    assert!(renderer.draw(&mut layer).is_some());
    assert_eq!(renderer.mode(), OverlayMode::Scanning);
    assert_eq!(layer.pixel(5, 5), MASK_COLOR);
    assert_eq!(layer.pixel(FRAME.left, FRAME.top), 0);
}

#[test]
fn test_absent_geometry_leaves_layer_untouched() {
    let available = Cell::new(false);
    let mut renderer = OverlayRenderer::new(
        || available.get().then_some(FRAME),
        &OverlayConfig::default(),
        assets(),
    );
    let mut layer = Layer::new(WIDTH, HEIGHT);
    assert!(renderer.draw(&mut layer).is_none());
    assert!(layer.pixels.iter().all(|&p| p == 0));
    assert!(renderer.frame_top().is_err());

    available.set(true);
    assert!(renderer.draw(&mut layer).is_some());
    assert_eq!(renderer.frame_top().unwrap(), FRAME.top);
    assert_eq!(renderer.scan_line().top_bound(), FRAME.top + 4);
}

#[test]
fn test_point_at_infinity_is_skipped() {
    let mut renderer = overlay();
    let mut layer = Layer::new(WIDTH, HEIGHT);
    renderer.add_candidate_point(ResultPoint::new(f32::INFINITY, 0.0));
    renderer.add_candidate_point(ResultPoint::new(f32::MAX, f32::MAX));
    assert!(renderer.draw(&mut layer).is_some());
    assert_eq!(layer.pixel(WIDTH as i32 - 1, FRAME.top), MASK_COLOR);
}

#[test]
fn test_composited_preview_is_dimmed_outside_frame() {
    let mut renderer = overlay();
    let mut layer = Layer::new(WIDTH, HEIGHT);
    assert!(renderer.draw(&mut layer).is_some());

    let mut screen = FrameBuffer::new(WIDTH, HEIGHT);
    screen.pixels.fill(0x00FF_FFFF);
    composite_layer(&mut screen, &layer).unwrap();

    let outside = screen.pixels[5 * WIDTH + 5];
    let inside = screen.pixels[(FRAME.top as usize + 150) * WIDTH + FRAME.left as usize + 100];
    assert_eq!(inside, 0x00FF_FFFF);
    assert!(outside & 0xFF < 0xFF);
}
