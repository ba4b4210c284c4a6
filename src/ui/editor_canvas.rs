/// Interactive margin editor canvas
///
/// A thin iced `canvas::Program` shell around the pure interaction model
/// in `crate::editor`: pointer events go through `editor::reduce`, margin
/// updates come back out as messages, and `draw` renders the overlay
/// (shade, screen outline, handles) on top of whatever the app stacks
/// underneath (the preset's bezel asset, or nothing).

use iced::mouse;
use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use crate::compose::geometry::Rect;
use crate::editor::{self, DragState, EditorLayout, PointerEvent, HANDLE_SIZE};
use crate::state::margins::MarginRecord;
use crate::Message;

/// Screen outline accent
const OUTLINE: Color = Color {
    r: 0.0,
    g: 0.9,
    b: 0.46,
    a: 1.0,
};
/// Dimming shade over everything outside the screen rectangle
const SHADE: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.45,
};

pub struct MarginEditor {
    pub preset_w: u32,
    pub preset_h: u32,
    pub margins: MarginRecord,
    /// When no bezel asset is stacked underneath, the canvas paints its
    /// own placeholder device frame for orientation
    pub has_asset: bool,
}

impl canvas::Program<Message> for MarginEditor {
    type State = DragState;

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let layout = EditorLayout::new(self.preset_w, self.preset_h, bounds.width, bounds.height);

        let pointer = match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                match cursor.position_in(bounds) {
                    Some(p) => PointerEvent::Down { x: p.x, y: p.y },
                    None => return (canvas::event::Status::Ignored, None),
                }
            }
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                // absolute position, so a drag survives the pointer briefly
                // leaving the canvas
                match cursor.position() {
                    Some(p) => PointerEvent::Moved {
                        x: p.x - bounds.x,
                        y: p.y - bounds.y,
                    },
                    None => return (canvas::event::Status::Ignored, None),
                }
            }
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                PointerEvent::Up
            }
            // a release outside the window never reaches us, so losing the
            // cursor ends the drag rather than leaving it stuck
            canvas::Event::Mouse(mouse::Event::CursorLeft) => PointerEvent::Up,
            _ => return (canvas::event::Status::Ignored, None),
        };

        let was_active = matches!(state, DragState::Dragging { .. });
        let (next, updated) = editor::reduce(state.clone(), pointer, &layout, &self.margins);
        let is_active = matches!(next, DragState::Dragging { .. });
        *state = next;

        match updated {
            Some(record) => (
                canvas::event::Status::Captured,
                Some(Message::MarginEdited(record)),
            ),
            None if was_active || is_active => (canvas::event::Status::Captured, None),
            None => (canvas::event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let layout = EditorLayout::new(self.preset_w, self.preset_h, bounds.width, bounds.height);
        let view = layout.view_rect();
        let screen = layout.screen_rect(&self.margins);

        if !self.has_asset {
            draw_placeholder_device(&mut frame, &view);
        }

        // shade everything outside the screen rectangle
        let (w, h) = (bounds.width, bounds.height);
        shade(&mut frame, 0.0, 0.0, w, screen.y);
        shade(&mut frame, 0.0, screen.bottom(), w, h - screen.bottom());
        shade(&mut frame, 0.0, screen.y, screen.x, screen.h);
        shade(&mut frame, screen.right(), screen.y, w - screen.right(), screen.h);

        let outline = Path::rectangle(
            Point::new(screen.x, screen.y),
            Size::new(screen.w, screen.h),
        );
        frame.stroke(
            &outline,
            Stroke::default().with_width(2.0).with_color(OUTLINE),
        );

        for (_, (hx, hy)) in layout.handles(&self.margins) {
            let half = HANDLE_SIZE / 2.0;
            let square = Path::rectangle(
                Point::new(hx - half, hy - half),
                Size::new(HANDLE_SIZE, HANDLE_SIZE),
            );
            frame.fill(&square, Color::WHITE);
            frame.stroke(
                &square,
                Stroke::default().with_width(1.0).with_color(Color::BLACK),
            );
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if matches!(state, DragState::Dragging { .. }) {
            return mouse::Interaction::Grabbing;
        }
        if let Some(p) = cursor.position_in(bounds) {
            let layout =
                EditorLayout::new(self.preset_w, self.preset_h, bounds.width, bounds.height);
            if layout.hit_test(&self.margins, p.x, p.y).is_some() {
                return mouse::Interaction::Grab;
            }
        }
        mouse::Interaction::default()
    }
}

fn shade(frame: &mut Frame, x: f32, y: f32, w: f32, h: f32) {
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    frame.fill_rectangle(Point::new(x, y), Size::new(w, h), SHADE);
}

/// A dark slab with a light rounded frame, standing in for a bezel asset
fn draw_placeholder_device(frame: &mut Frame, view: &Rect) {
    frame.fill_rectangle(
        Point::new(view.x, view.y),
        Size::new(view.w, view.h),
        Color::from_rgb8(0x20, 0x20, 0x24),
    );

    let radius = view.w.min(view.h) * 0.06;
    let path = rounded_rect_path(view.x, view.y, view.w, view.h, radius);
    frame.stroke(
        &path,
        Stroke::default()
            .with_width((view.w * 0.01).max(2.0))
            .with_color(Color::from_rgb8(0xd1, 0xd5, 0xdb)),
    );
}

fn rounded_rect_path(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Path {
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    Path::new(|b| {
        b.move_to(Point::new(x + r, y));
        b.arc_to(Point::new(x + w, y), Point::new(x + w, y + h), r);
        b.arc_to(Point::new(x + w, y + h), Point::new(x, y + h), r);
        b.arc_to(Point::new(x, y + h), Point::new(x, y), r);
        b.arc_to(Point::new(x, y), Point::new(x + w, y), r);
        b.close();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Handle;
    use iced::Rectangle;

    fn editor() -> MarginEditor {
        MarginEditor {
            preset_w: 1280,
            preset_h: 800,
            margins: MarginRecord::uniform(48.0),
            has_asset: false,
        }
    }

    fn bounds() -> Rectangle {
        Rectangle {
            x: 0.0,
            y: 0.0,
            width: 480.0,
            height: 320.0,
        }
    }

    #[test]
    fn test_cursor_leaving_window_ends_the_drag() {
        let program = editor();
        let mut state = DragState::Dragging {
            handle: Handle::E,
            start: (462.0, 160.0),
            origin: MarginRecord::uniform(48.0),
        };

        let (status, message) = canvas::Program::<Message>::update(
            &program,
            &mut state,
            canvas::Event::Mouse(mouse::Event::CursorLeft),
            bounds(),
            mouse::Cursor::Unavailable,
        );

        assert_eq!(state, DragState::Idle);
        assert!(message.is_none());
        assert!(matches!(status, canvas::event::Status::Captured));
    }

    #[test]
    fn test_cursor_leaving_while_idle_is_ignored() {
        let program = editor();
        let mut state = DragState::Idle;

        let (status, _) = canvas::Program::<Message>::update(
            &program,
            &mut state,
            canvas::Event::Mouse(mouse::Event::CursorLeft),
            bounds(),
            mouse::Cursor::Unavailable,
        );

        assert_eq!(state, DragState::Idle);
        assert!(matches!(status, canvas::event::Status::Ignored));
    }
}
