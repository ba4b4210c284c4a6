/// Margin editor interaction model
///
/// Everything here is pure math over a letterboxed preview of one preset:
/// where the eight resize handles sit, which handle a pointer press grabs,
/// and how a drag delta translates into margin pixels. The iced canvas
/// program in ui::editor_canvas feeds pointer events through `reduce` and
/// draws whatever this module computes, so the interaction logic is fully
/// testable without a rendering surface.

use crate::compose::geometry::Rect;
use crate::state::margins::MarginRecord;

/// Pointer must be within this many surface pixels of a handle to grab it
pub const HANDLE_HIT_RADIUS: f32 = 20.0;
/// Drawn size of a handle square
pub const HANDLE_SIZE: f32 = 10.0;

/// The eight resize handles: corners and edge midpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Nw,
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::Nw,
        Handle::N,
        Handle::Ne,
        Handle::E,
        Handle::Se,
        Handle::S,
        Handle::Sw,
        Handle::W,
    ];

    /// Which edges this handle moves
    fn edges(self) -> (bool, bool, bool, bool) {
        // (north, east, south, west)
        match self {
            Handle::Nw => (true, false, false, true),
            Handle::N => (true, false, false, false),
            Handle::Ne => (true, true, false, false),
            Handle::E => (false, true, false, false),
            Handle::Se => (false, true, true, false),
            Handle::S => (false, false, true, false),
            Handle::Sw => (false, false, true, true),
            Handle::W => (false, false, false, true),
        }
    }

    /// Position of this handle on a screen rectangle in view space
    pub fn position(self, rect: Rect) -> (f32, f32) {
        let cx = rect.x + rect.w / 2.0;
        let cy = rect.y + rect.h / 2.0;
        match self {
            Handle::Nw => (rect.x, rect.y),
            Handle::N => (cx, rect.y),
            Handle::Ne => (rect.right(), rect.y),
            Handle::E => (rect.right(), cy),
            Handle::Se => (rect.right(), rect.bottom()),
            Handle::S => (cx, rect.bottom()),
            Handle::Sw => (rect.x, rect.bottom()),
            Handle::W => (rect.x, cy),
        }
    }
}

/// Letterboxed view of a preset's aspect ratio inside the preview surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorLayout {
    pub preset_w: u32,
    pub preset_h: u32,
    /// Top-left of the letterboxed view on the surface
    pub offset_x: f32,
    pub offset_y: f32,
    /// View dimensions on the surface
    pub view_w: f32,
    pub view_h: f32,
    /// Surface pixels per preset pixel
    pub scale: f32,
}

impl EditorLayout {
    pub fn new(preset_w: u32, preset_h: u32, surface_w: f32, surface_h: f32) -> Self {
        let ratio = preset_w as f32 / preset_h as f32;
        let (view_w, view_h) = if surface_w / surface_h > ratio {
            ((surface_h * ratio).round(), surface_h)
        } else {
            (surface_w, (surface_w / ratio).round())
        };
        EditorLayout {
            preset_w,
            preset_h,
            offset_x: ((surface_w - view_w) / 2.0).round(),
            offset_y: ((surface_h - view_h) / 2.0).round(),
            view_w,
            view_h,
            scale: view_w / preset_w as f32,
        }
    }

    /// The whole letterboxed view as a rect on the surface
    pub fn view_rect(&self) -> Rect {
        Rect::new(self.offset_x, self.offset_y, self.view_w, self.view_h)
    }

    /// The margin record's screen rectangle mapped onto the surface
    pub fn screen_rect(&self, margins: &MarginRecord) -> Rect {
        Rect::new(
            self.offset_x + margins.left * self.scale,
            self.offset_y + margins.top * self.scale,
            self.view_w - (margins.left + margins.right) * self.scale,
            self.view_h - (margins.top + margins.bottom) * self.scale,
        )
    }

    /// Handle positions for the current margins, in surface space
    pub fn handles(&self, margins: &MarginRecord) -> [(Handle, (f32, f32)); 8] {
        let rect = self.screen_rect(margins);
        Handle::ALL.map(|h| (h, h.position(rect)))
    }

    /// The handle under a surface-space point, if any
    pub fn hit_test(&self, margins: &MarginRecord, px: f32, py: f32) -> Option<Handle> {
        self.handles(margins)
            .into_iter()
            .find(|(_, (hx, hy))| (px - hx).hypot(py - hy) <= HANDLE_HIT_RADIUS)
            .map(|(h, _)| h)
    }
}

/// Drag interaction state machine
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        handle: Handle,
        /// Pointer position at drag start, surface space
        start: (f32, f32),
        /// Margin record snapshot at drag start
        origin: MarginRecord,
    },
}

/// Pointer events in surface space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Moved { x: f32, y: f32 },
    Up,
}

/// Advance the drag state machine by one pointer event.
///
/// Returns the new state and, for moves while dragging, the margin record
/// to write back to the store (already clamped to non-negative; the store
/// clamps pair sums against the preset dimensions on `set`).
pub fn reduce(
    state: DragState,
    event: PointerEvent,
    layout: &EditorLayout,
    margins: &MarginRecord,
) -> (DragState, Option<MarginRecord>) {
    match (state, event) {
        (DragState::Idle, PointerEvent::Down { x, y }) => {
            match layout.hit_test(margins, x, y) {
                Some(handle) => (
                    DragState::Dragging {
                        handle,
                        start: (x, y),
                        origin: *margins,
                    },
                    None,
                ),
                None => (DragState::Idle, None),
            }
        }
        (
            DragState::Dragging { handle, start, origin },
            PointerEvent::Moved { x, y },
        ) => {
            // surface-space delta converted to preset pixel space
            let dx = (x - start.0) / layout.scale;
            let dy = (y - start.1) / layout.scale;

            let (north, east, south, west) = handle.edges();
            let mut m = origin;
            if north {
                m.top += dy;
            }
            if south {
                m.bottom -= dy;
            }
            if west {
                m.left += dx;
            }
            if east {
                m.right -= dx;
            }
            m.top = m.top.max(0.0);
            m.bottom = m.bottom.max(0.0);
            m.left = m.left.max(0.0);
            m.right = m.right.max(0.0);

            (DragState::Dragging { handle, start, origin }, Some(m))
        }
        (_, PointerEvent::Up) => (DragState::Idle, None),
        (state, _) => (state, None),
    }
}
