/// The composition pipeline
///
/// Single entry point: `compose` takes a decoded screenshot, a target
/// preset, presentation options, and optionally a bezel asset and a margin
/// override, and returns the finished mockup raster. The call is pure with
/// respect to its inputs; all mutation happens on the freshly allocated
/// output.

use std::fmt;

use image::{
    imageops::{self, FilterType},
    Rgba, RgbaImage,
};

use crate::catalog::OutputPreset;
use crate::compose::bezel;
use crate::compose::geometry::{
    aspect_fill, aspect_fit, orientation_mismatch, Rect, RoundedRect,
};
use crate::error::{Error, Result};
use crate::state::margins::MarginRecord;

/// Default background when padding is off
const BACKGROUND_DARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
/// Warm light background used when padding is on
const BACKGROUND_LIGHT: Rgba<u8> = Rgba([0xf7, 0xee, 0xe6, 255]);
/// Corner radius of the screen cutout, as a fraction of its shorter side
const SCREEN_CORNER_RATIO: f32 = 0.03;
/// In blur mode the screenshot's height is capped at this share of the output
const BLUR_MODE_HEIGHT_CAP: f32 = 0.85;

/// How the screenshot is mapped when no bezel is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeMode {
    /// Aspect-fit: the whole screenshot is visible, bars may pad it
    #[default]
    Fit,
    /// Aspect-fill: edge to edge, excess is cropped
    Fill,
    /// Soft blurred cover of the screenshot behind an aspect-fit copy
    ComposeWithBlur,
}

impl ComposeMode {
    pub const ALL: [ComposeMode; 3] =
        [ComposeMode::Fit, ComposeMode::Fill, ComposeMode::ComposeWithBlur];
}

impl fmt::Display for ComposeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeMode::Fit => write!(f, "Fit (no crop)"),
            ComposeMode::Fill => write!(f, "Fill (crop)"),
            ComposeMode::ComposeWithBlur => write!(f, "Blur backdrop"),
        }
    }
}

/// Per-call presentation configuration, built fresh from UI state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PresentationOptions {
    pub bezel_enabled: bool,
    pub pad_background: bool,
    pub use_bezel_asset: bool,
    pub auto_rotate: bool,
    pub compose_mode: ComposeMode,
}

/// Composite one screenshot into one output preset.
///
/// With the bezel on, the screenshot aspect-fills the screen rectangle
/// (margins from the override, or the computed 6% default) under a rounded
/// clip, and the bezel layer goes on top: the supplied asset scaled to the
/// output, or the procedural fallback. With the bezel off, `compose_mode`
/// decides the mapping over the full canvas.
///
/// `margin_override` is the caller-resolved record: callers holding a
/// margin store pass its current record for the preset here. The engine
/// never consults the store itself, so `None` always means the computed
/// 6% default, not "whatever is stored".
pub fn compose(
    source: &RgbaImage,
    preset: &OutputPreset,
    options: &PresentationOptions,
    bezel_asset: Option<&RgbaImage>,
    margin_override: Option<MarginRecord>,
) -> Result<RgbaImage> {
    let (out_w, out_h) = (preset.width, preset.height);
    if out_w == 0 || out_h == 0 {
        return Err(Error::InvalidPreset {
            width: out_w,
            height: out_h,
        });
    }

    // effective source: rotated 90 degrees clockwise when orientations
    // disagree and auto-rotate is on
    let rotated;
    let source = if options.auto_rotate
        && orientation_mismatch(source.width(), source.height(), out_w, out_h)
    {
        rotated = imageops::rotate90(source);
        &rotated
    } else {
        source
    };

    let background = if options.pad_background {
        BACKGROUND_LIGHT
    } else {
        BACKGROUND_DARK
    };
    let mut out = RgbaImage::from_pixel(out_w, out_h, background);

    if options.bezel_enabled {
        let margins =
            margin_override.unwrap_or_else(|| MarginRecord::default_for(out_w, out_h));
        let screen = margins.screen_rect(out_w, out_h);
        let clip = RoundedRect::new(screen, screen.w.min(screen.h) * SCREEN_CORNER_RATIO);

        // the screen area is black under the screenshot, so aspect-fill
        // rounding never lets the page background bleed through
        fill_clipped(&mut out, &clip, BACKGROUND_DARK);
        let dest = aspect_fill(source.width(), source.height(), screen);
        draw_source_into(&mut out, source, dest, Some(&clip));

        let drew_asset = match bezel_asset {
            Some(asset) if options.use_bezel_asset => overlay_bezel_asset(&mut out, asset),
            _ => false,
        };
        if !drew_asset {
            bezel::draw_fallback(&mut out);
        }
    } else {
        let full = Rect::of_size(out_w, out_h);
        match options.compose_mode {
            ComposeMode::Fit => {
                let dest = aspect_fit(source.width(), source.height(), full);
                draw_source_into(&mut out, source, dest, None);
            }
            ComposeMode::Fill => {
                let dest = aspect_fill(source.width(), source.height(), full);
                let clip = RoundedRect::new(full, 0.0);
                draw_source_into(&mut out, source, dest, Some(&clip));
            }
            ComposeMode::ComposeWithBlur => {
                draw_blur_backdrop(&mut out, source);
                let capped = Rect::new(0.0, 0.0, full.w, full.h * BLUR_MODE_HEIGHT_CAP);
                let mut dest = aspect_fit(source.width(), source.height(), capped);
                // center vertically in the full canvas, not the capped band
                dest.y = (full.h - dest.h) / 2.0;
                draw_source_into(&mut out, source, dest, None);
            }
        }
    }

    Ok(out)
}

/// Alpha-blend one pixel over the raster (source-over, opaque output)
pub(crate) fn blend_px(img: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>) {
    let alpha = color[3] as f32 / 255.0;
    if alpha >= 0.996 {
        img.put_pixel(x, y, Rgba([color[0], color[1], color[2], 255]));
        return;
    }
    if alpha <= 0.004 {
        return;
    }
    let bg = *img.get_pixel(x, y);
    let inv = 1.0 - alpha;
    img.put_pixel(
        x,
        y,
        Rgba([
            (color[0] as f32 * alpha + bg[0] as f32 * inv) as u8,
            (color[1] as f32 * alpha + bg[1] as f32 * inv) as u8,
            (color[2] as f32 * alpha + bg[2] as f32 * inv) as u8,
            255,
        ]),
    );
}

/// Solid-fill every pixel inside a rounded clip region
fn fill_clipped(img: &mut RgbaImage, clip: &RoundedRect, color: Rgba<u8>) {
    let (iw, ih) = img.dimensions();
    let x0 = clip.rect.x.floor().max(0.0) as u32;
    let y0 = clip.rect.y.floor().max(0.0) as u32;
    let x1 = (clip.rect.right().ceil() as u32).min(iw);
    let y1 = (clip.rect.bottom().ceil() as u32).min(ih);

    for y in y0..y1 {
        for x in x0..x1 {
            if clip.contains(x as f32 + 0.5, y as f32 + 0.5) {
                img.put_pixel(x, y, color);
            }
        }
    }
}

/// Scale the source to the destination rectangle and blit it, restricted to
/// the optional clip region. The destination may extend past the raster
/// (aspect-fill overflow); out-of-range pixels are simply skipped.
fn draw_source_into(out: &mut RgbaImage, src: &RgbaImage, dest: Rect, clip: Option<&RoundedRect>) {
    let dw = dest.w.round().max(1.0) as u32;
    let dh = dest.h.round().max(1.0) as u32;
    let scaled = imageops::resize(src, dw, dh, FilterType::Lanczos3);
    let (ow, oh) = out.dimensions();

    let x0 = dest.x.floor().max(0.0) as u32;
    let y0 = dest.y.floor().max(0.0) as u32;
    let x1 = (dest.right().ceil().max(0.0) as u32).min(ow);
    let y1 = (dest.bottom().ceil().max(0.0) as u32).min(oh);

    for y in y0..y1 {
        for x in x0..x1 {
            if let Some(clip) = clip {
                if !clip.contains(x as f32 + 0.5, y as f32 + 0.5) {
                    continue;
                }
            }
            let sx = ((x as f32 - dest.x) as i64).clamp(0, dw as i64 - 1) as u32;
            let sy = ((y as f32 - dest.y) as i64).clamp(0, dh as i64 - 1) as u32;
            blend_px(out, x, y, *scaled.get_pixel(sx, sy));
        }
    }
}

/// Draw an uploaded bezel asset over the whole output, scaled to exactly
/// the output dimensions. Returns false for degenerate assets so the
/// caller can fall back to the procedural bezel instead of aborting.
fn overlay_bezel_asset(out: &mut RgbaImage, asset: &RgbaImage) -> bool {
    if asset.width() == 0 || asset.height() == 0 {
        return false;
    }
    let (ow, oh) = out.dimensions();
    let storage;
    let scaled = if asset.width() == ow && asset.height() == oh {
        asset
    } else {
        storage = imageops::resize(asset, ow, oh, FilterType::Lanczos3);
        &storage
    };
    for y in 0..oh {
        for x in 0..ow {
            blend_px(out, x, y, *scaled.get_pixel(x, y));
        }
    }
    true
}

/// Approximate-blur backdrop: cover-scale the source to roughly a tenth of
/// the output, stretch it back up, and lighten slightly. Cheap and good
/// enough for a soft marketing background.
fn draw_blur_backdrop(out: &mut RgbaImage, src: &RgbaImage) {
    let (ow, oh) = out.dimensions();
    let small_w = (ow / 10).max(64);
    let small_h = (oh / 10).max(64);

    let mut small = RgbaImage::new(small_w, small_h);
    let dest = aspect_fill(src.width(), src.height(), Rect::of_size(small_w, small_h));
    draw_source_into(&mut small, src, dest, None);

    let big = imageops::resize(&small, ow, oh, FilterType::Triangle);
    for y in 0..oh {
        for x in 0..ow {
            let p = big.get_pixel(x, y);
            blend_px(out, x, y, Rgba([p[0], p[1], p[2], 230]));
        }
    }
    // soften with a faint white wash
    for y in 0..oh {
        for x in 0..ow {
            blend_px(out, x, y, Rgba([255, 255, 255, 20]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StoreProfile;

    const RED: Rgba<u8> = Rgba([200, 30, 30, 255]);

    fn preset(w: u32, h: u32) -> OutputPreset {
        OutputPreset {
            id: "test",
            width: w,
            height: h,
            label: "test",
            profile: StoreProfile::Web,
            group: "test",
        }
    }

    fn red_source(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, RED)
    }

    #[test]
    fn test_output_matches_preset_dimensions() {
        let src = red_source(10, 10);
        for opts in [
            PresentationOptions::default(),
            PresentationOptions {
                bezel_enabled: true,
                ..Default::default()
            },
        ] {
            let out = compose(&src, &preset(64, 40), &opts, None, None).unwrap();
            assert_eq!(out.dimensions(), (64, 40));
        }
    }

    #[test]
    fn test_invalid_preset_dimensions() {
        let src = red_source(4, 4);
        let err = compose(&src, &preset(0, 40), &PresentationOptions::default(), None, None);
        assert!(matches!(err, Err(Error::InvalidPreset { .. })));
    }

    #[test]
    fn test_fit_letterboxes_square_into_landscape() {
        let src = red_source(10, 10);
        let opts = PresentationOptions {
            pad_background: true,
            ..Default::default()
        };
        let out = compose(&src, &preset(64, 40), &opts, None, None).unwrap();
        // square fits the 40px height, bars of 12px on each side stay light
        assert_eq!(*out.get_pixel(2, 20), BACKGROUND_LIGHT);
        assert_eq!(*out.get_pixel(61, 20), BACKGROUND_LIGHT);
        assert_eq!(*out.get_pixel(32, 20), RED);
    }

    #[test]
    fn test_fill_reaches_every_edge() {
        let src = red_source(10, 10);
        let opts = PresentationOptions {
            compose_mode: ComposeMode::Fill,
            ..Default::default()
        };
        let out = compose(&src, &preset(64, 40), &opts, None, None).unwrap();
        for (x, y) in [(0, 0), (63, 0), (0, 39), (63, 39), (32, 20)] {
            assert_eq!(*out.get_pixel(x, y), RED, "pixel ({}, {})", x, y);
        }
    }

    #[test]
    fn test_auto_rotate_on_orientation_mismatch() {
        // a 10x20 portrait gradient into a landscape target: with rotation
        // the long axis maps horizontally, so the output is wider than tall
        // in content. Verify via rotate90 directly plus the engine result.
        let mut src = RgbaImage::new(10, 20);
        for (x, _y, p) in src.enumerate_pixels_mut() {
            *p = Rgba([(x * 20) as u8, 0, 0, 255]);
        }
        let rotated = imageops::rotate90(&src);
        assert_eq!(rotated.dimensions(), (20, 10));

        let opts = PresentationOptions {
            auto_rotate: true,
            compose_mode: ComposeMode::Fill,
            ..Default::default()
        };
        let out = compose(&src, &preset(40, 20), &opts, None, None).unwrap();
        // after rotation the gradient runs vertically: rows differ, columns don't
        assert_eq!(out.get_pixel(5, 10), out.get_pixel(35, 10));
    }

    #[test]
    fn test_rotate90_four_times_round_trips() {
        let mut src = RgbaImage::new(7, 13);
        for (x, y, p) in src.enumerate_pixels_mut() {
            *p = Rgba([x as u8, y as u8, 0, 255]);
        }
        let once = imageops::rotate90(&src);
        assert_eq!(once.dimensions(), (13, 7));
        let four = imageops::rotate90(&imageops::rotate90(&imageops::rotate90(&once)));
        assert_eq!(four.dimensions(), (7, 13));
        assert_eq!(four, src);
    }

    #[test]
    fn test_bezel_screen_respects_margin_override() {
        let src = red_source(10, 10);
        let opts = PresentationOptions {
            bezel_enabled: true,
            pad_background: true,
            ..Default::default()
        };
        let margins = MarginRecord {
            left: 30.0,
            top: 10.0,
            right: 10.0,
            bottom: 10.0,
        };
        let out = compose(&src, &preset(200, 120), &opts, None, Some(margins)).unwrap();
        // left of the screen rect: page background, untouched by the screenshot
        assert_eq!(*out.get_pixel(15, 60), BACKGROUND_LIGHT);
        // well inside the screen rect: screenshot
        assert_eq!(*out.get_pixel(100, 60), RED);
    }

    #[test]
    fn test_bezel_default_margins_when_none_stored() {
        let src = red_source(10, 10);
        let opts = PresentationOptions {
            bezel_enabled: true,
            pad_background: true,
            ..Default::default()
        };
        // default inset for 200x120 is round(120 * 0.06) = 7; x=5 sits in the
        // gap between the bezel strokes and the screen rectangle
        let out = compose(&src, &preset(200, 120), &opts, None, None).unwrap();
        assert_eq!(*out.get_pixel(5, 60), BACKGROUND_LIGHT);
        assert_eq!(*out.get_pixel(100, 60), RED);
    }

    #[test]
    fn test_bezel_asset_drawn_over_everything() {
        let src = red_source(10, 10);
        let asset = RgbaImage::from_pixel(200, 120, Rgba([0, 200, 0, 255]));
        let opts = PresentationOptions {
            bezel_enabled: true,
            use_bezel_asset: true,
            ..Default::default()
        };
        let out = compose(&src, &preset(200, 120), &opts, Some(&asset), None).unwrap();
        assert_eq!(*out.get_pixel(100, 60), Rgba([0, 200, 0, 255]));
    }

    #[test]
    fn test_degenerate_asset_falls_back_to_procedural() {
        let src = red_source(10, 10);
        let asset = RgbaImage::new(0, 0);
        let opts = PresentationOptions {
            bezel_enabled: true,
            use_bezel_asset: true,
            ..Default::default()
        };
        let out = compose(&src, &preset(200, 120), &opts, Some(&asset), None).unwrap();
        // frame stroke from the procedural bezel at the top edge midpoint
        assert_eq!(*out.get_pixel(100, 0), Rgba([0xd1, 0xd5, 0xdb, 255]));
    }

    #[test]
    fn test_blur_mode_fills_background() {
        let src = red_source(30, 30);
        let opts = PresentationOptions {
            compose_mode: ComposeMode::ComposeWithBlur,
            ..Default::default()
        };
        let out = compose(&src, &preset(64, 40), &opts, None, None).unwrap();
        // backdrop is a washed-out red, never the plain black background
        let corner = out.get_pixel(1, 1);
        assert!(corner[0] > 100, "backdrop missing: {:?}", corner);
    }

    #[test]
    fn test_compose_does_not_mutate_source() {
        let src = red_source(10, 10);
        let before = src.clone();
        let opts = PresentationOptions {
            bezel_enabled: true,
            ..Default::default()
        };
        let _ = compose(&src, &preset(64, 40), &opts, None, None).unwrap();
        assert_eq!(src, before);
    }
}
