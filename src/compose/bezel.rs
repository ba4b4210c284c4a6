/// Procedural fallback bezel
///
/// Drawn whenever a preset has no uploaded bezel asset (or asset use is
/// off): a rounded frame stroke along the output edge, a faint inner
/// stroke, and a camera-pill ornament near the top. Everything is sized
/// proportionally to the output so it holds up at any target resolution.

use image::{Rgba, RgbaImage};

use crate::compose::engine::blend_px;
use crate::compose::geometry::{Rect, RoundedRect};

/// Light device-chrome gray for the frame stroke
const FRAME_COLOR: Rgba<u8> = Rgba([0xd1, 0xd5, 0xdb, 0xff]);
/// Faint dark line just inside the frame
const INNER_STROKE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 15]);
/// Translucent camera pill
const PILL_COLOR: Rgba<u8> = Rgba([0, 0, 0, 64]);

/// Draw the fallback bezel over the full output raster
pub fn draw_fallback(out: &mut RgbaImage) {
    let (w, h) = out.dimensions();
    if w == 0 || h == 0 {
        return;
    }
    let wf = w as f32;
    let hf = h as f32;

    let radius = wf.min(hf) * 0.06;
    let frame_width = (wf * 0.01).max(2.0);
    let outer = RoundedRect::new(Rect::of_size(w, h), radius);
    stroke_rounded(out, &outer, frame_width, FRAME_COLOR);

    let inner_width = (wf * 0.006).max(2.0);
    stroke_rounded(out, &outer.inset(frame_width), inner_width, INNER_STROKE_COLOR);

    // camera pill centered near the top edge
    let pill_w = (wf * 0.08).max(40.0).min(wf);
    let pill_h = (hf * 0.007).max(6.0);
    fill_ellipse(out, wf / 2.0, pill_h * 3.0, pill_w / 3.0, pill_h, PILL_COLOR);
}

/// Paint the band between a rounded rect and its inset by `width`
fn stroke_rounded(img: &mut RgbaImage, rr: &RoundedRect, width: f32, color: Rgba<u8>) {
    let inner = rr.inset(width);
    let (iw, ih) = img.dimensions();

    let x0 = rr.rect.x.floor().max(0.0) as u32;
    let y0 = rr.rect.y.floor().max(0.0) as u32;
    let x1 = (rr.rect.right().ceil() as u32).min(iw);
    let y1 = (rr.rect.bottom().ceil() as u32).min(ih);

    for y in y0..y1 {
        for x in x0..x1 {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            if rr.contains(px, py) && !inner.contains(px, py) {
                blend_px(img, x, y, color);
            }
        }
    }
}

/// Fill an axis-aligned ellipse
fn fill_ellipse(img: &mut RgbaImage, cx: f32, cy: f32, rx: f32, ry: f32, color: Rgba<u8>) {
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    let (iw, ih) = img.dimensions();
    let x0 = (cx - rx).floor().max(0.0) as u32;
    let y0 = (cy - ry).floor().max(0.0) as u32;
    let x1 = ((cx + rx).ceil() as u32).min(iw);
    let y1 = ((cy + ry).ceil() as u32).min(ih);

    for y in y0..y1 {
        for x in x0..x1 {
            let dx = (x as f32 + 0.5 - cx) / rx;
            let dy = (y as f32 + 0.5 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                blend_px(img, x, y, color);
            }
        }
    }
}
