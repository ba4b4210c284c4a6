/// Rectangle mapping and rounded-corner math
///
/// All placement decisions the pipeline makes go through these functions so
/// the editor preview and the full-resolution render can never disagree.

/// An axis-aligned rectangle in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Rectangle spanning a full raster of the given dimensions
    pub fn of_size(w: u32, h: u32) -> Self {
        Rect::new(0.0, 0.0, w as f32, h as f32)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

/// Largest centered rectangle that preserves the source aspect ratio and
/// fits entirely inside the destination. May leave padding on two sides,
/// never crops.
pub fn aspect_fit(src_w: u32, src_h: u32, dst: Rect) -> Rect {
    let scale = (dst.w / src_w as f32).min(dst.h / src_h as f32);
    centered_scaled(src_w, src_h, scale, dst)
}

/// Centered rectangle that preserves the source aspect ratio and fully
/// covers the destination. May crop source edges, never pads.
pub fn aspect_fill(src_w: u32, src_h: u32, dst: Rect) -> Rect {
    let scale = (dst.w / src_w as f32).max(dst.h / src_h as f32);
    centered_scaled(src_w, src_h, scale, dst)
}

fn centered_scaled(src_w: u32, src_h: u32, scale: f32, dst: Rect) -> Rect {
    let dw = src_w as f32 * scale;
    let dh = src_h as f32 * scale;
    Rect::new(
        dst.x + (dst.w - dw) / 2.0,
        dst.y + (dst.h - dh) / 2.0,
        dw,
        dh,
    )
}

/// True iff source and target disagree on landscape vs. portrait.
/// Square counts as landscape on both sides.
pub fn orientation_mismatch(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> bool {
    (src_w >= src_h) != (dst_w >= dst_h)
}

/// A rectangle with rounded corners, used as a clip region and for the
/// procedural bezel strokes.
#[derive(Debug, Clone, Copy)]
pub struct RoundedRect {
    pub rect: Rect,
    /// Effective corner radius, already clamped to half the shorter side
    /// so thin rectangles never self-intersect
    pub radius: f32,
}

impl RoundedRect {
    pub fn new(rect: Rect, radius: f32) -> Self {
        let radius = radius.min(rect.w / 2.0).min(rect.h / 2.0).max(0.0);
        RoundedRect { rect, radius }
    }

    /// Point-containment test equivalent to filling the rounded path:
    /// inside the bounding rect, and inside the corner circle when the
    /// point falls in one of the four corner squares.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        if !self.rect.contains(px, py) {
            return false;
        }
        let r = self.radius;
        if r <= 0.0 {
            return true;
        }

        let cx = if px < self.rect.x + r {
            Some(self.rect.x + r)
        } else if px > self.rect.right() - r {
            Some(self.rect.right() - r)
        } else {
            None
        };
        let cy = if py < self.rect.y + r {
            Some(self.rect.y + r)
        } else if py > self.rect.bottom() - r {
            Some(self.rect.bottom() - r)
        } else {
            None
        };

        match (cx, cy) {
            (Some(cx), Some(cy)) => {
                let dx = px - cx;
                let dy = py - cy;
                dx * dx + dy * dy <= r * r
            }
            _ => true,
        }
    }

    /// The same rounded rect inset by `d` on every side, radius reduced to
    /// match. Collapses to a zero-size rect instead of inverting.
    pub fn inset(&self, d: f32) -> RoundedRect {
        let w = (self.rect.w - 2.0 * d).max(0.0);
        let h = (self.rect.h - 2.0 * d).max(0.0);
        RoundedRect::new(
            Rect::new(self.rect.x + d, self.rect.y + d, w, h),
            (self.radius - d).max(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_fit_never_exceeds_destination() {
        let dst = Rect::of_size(1280, 800);
        for (sw, sh) in [(1920, 1080), (600, 1024), (100, 100), (5000, 50)] {
            let r = aspect_fit(sw, sh, dst);
            assert!(r.w <= dst.w + 0.001, "{}x{} too wide: {:?}", sw, sh, r);
            assert!(r.h <= dst.h + 0.001, "{}x{} too tall: {:?}", sw, sh, r);
            assert!(r.x >= -0.001 && r.y >= -0.001);
        }
    }

    #[test]
    fn test_aspect_fit_touches_one_axis() {
        let dst = Rect::of_size(1280, 800);
        let r = aspect_fit(1920, 1080, dst);
        // 16:9 into 16:10 fits the width exactly
        assert!((r.w - 1280.0).abs() < 0.001);
        assert!(r.h < 800.0);
    }

    #[test]
    fn test_aspect_fill_covers_destination() {
        let dst = Rect::of_size(1280, 800);
        for (sw, sh) in [(1920, 1080), (600, 1024), (100, 100)] {
            let r = aspect_fill(sw, sh, dst);
            assert!(r.w >= dst.w - 0.001, "{}x{} too narrow: {:?}", sw, sh, r);
            assert!(r.h >= dst.h - 0.001, "{}x{} too short: {:?}", sw, sh, r);
        }
    }

    #[test]
    fn test_aspect_fill_centers_overflow() {
        let dst = Rect::of_size(100, 100);
        let r = aspect_fill(200, 100, dst);
        assert!((r.h - 100.0).abs() < 0.001);
        assert!((r.x - (-50.0)).abs() < 0.001);
    }

    #[test]
    fn test_orientation_mismatch() {
        assert!(orientation_mismatch(1920, 1080, 800, 1280));
        assert!(!orientation_mismatch(1920, 1080, 1280, 800));
        // square sources count as landscape
        assert!(!orientation_mismatch(500, 500, 1280, 800));
        assert!(orientation_mismatch(500, 500, 800, 1280));
    }

    #[test]
    fn test_rounded_radius_clamped_on_thin_rects() {
        let rr = RoundedRect::new(Rect::new(0.0, 0.0, 100.0, 4.0), 30.0);
        assert_eq!(rr.radius, 2.0);
    }

    #[test]
    fn test_rounded_contains_corners() {
        let rr = RoundedRect::new(Rect::new(0.0, 0.0, 100.0, 100.0), 20.0);
        // dead corner is outside, center of the corner arc is inside
        assert!(!rr.contains(1.0, 1.0));
        assert!(rr.contains(20.0, 20.0));
        assert!(rr.contains(50.0, 0.5));
        assert!(rr.contains(50.0, 50.0));
        assert!(!rr.contains(100.0, 50.0)); // right edge is exclusive
    }

    #[test]
    fn test_zero_radius_is_plain_rect() {
        let rr = RoundedRect::new(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0);
        assert!(rr.contains(0.0, 0.0));
        assert!(rr.contains(9.9, 9.9));
    }
}
