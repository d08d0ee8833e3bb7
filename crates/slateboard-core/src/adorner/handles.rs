//! Manipulation handles and their hit-testing.
//!
//! Each resize handle maps to an anchor vector in `{-0.5, 0, 0.5}²`
//! through an explicit table; the anchor identifies which corner or edge
//! of the reference rectangle the handle drags.

use kurbo::Rect;

use crate::geometry::{Transform, Vec2};

/// Side length of a resize handle's hot zone.
pub const HANDLE_SIZE: f64 = 14.0;

/// Gap between the reference rectangle and the resize handles.
pub const HANDLE_MARGIN: f64 = 4.0;

/// Side length of the rotate handle's hot zone.
pub const ROTATE_HANDLE_SIZE: f64 = 16.0;

/// Distance of the rotate handle above the top edge.
pub const ROTATE_HANDLE_OFFSET: f64 = 30.0;

/// The eight resize handles around the reference rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::Top,
        ResizeHandle::TopRight,
        ResizeHandle::Left,
        ResizeHandle::Right,
        ResizeHandle::BottomLeft,
        ResizeHandle::Bottom,
        ResizeHandle::BottomRight,
    ];

    /// The anchor vector identifying the dragged corner or edge.
    pub fn anchor(self) -> Vec2 {
        match self {
            ResizeHandle::TopLeft => Vec2::new(-0.5, -0.5),
            ResizeHandle::Top => Vec2::new(0.0, -0.5),
            ResizeHandle::TopRight => Vec2::new(0.5, -0.5),
            ResizeHandle::Left => Vec2::new(-0.5, 0.0),
            ResizeHandle::Right => Vec2::new(0.5, 0.0),
            ResizeHandle::BottomLeft => Vec2::new(-0.5, 0.5),
            ResizeHandle::Bottom => Vec2::new(0.0, 0.5),
            ResizeHandle::BottomRight => Vec2::new(0.5, 0.5),
        }
    }

    /// Whether this handle is visible given the per-axis resize
    /// permissions of the selection.
    pub fn is_visible(self, can_resize_x: bool, can_resize_y: bool) -> bool {
        let anchor = self.anchor();

        (anchor.x == 0.0 || can_resize_x) && (anchor.y == 0.0 || can_resize_y)
    }
}

/// Result of hit-testing the adorner handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandleHit {
    Resize(ResizeHandle),
    Move,
    Rotate,
}

/// World position of a resize handle, honoring the rotation. Intended
/// for the layer that renders the handles.
pub fn handle_position(transform: &Transform, handle: ResizeHandle) -> Vec2 {
    let local = handle_center(transform, handle);

    Vec2::rotated(local, transform.position(), transform.rotation())
}

/// World position of the rotate handle.
pub fn rotate_handle_position(transform: &Transform) -> Vec2 {
    Vec2::rotated(
        rotate_handle_center(transform),
        transform.position(),
        transform.rotation(),
    )
}

/// Hit-test `point` against the adorner handles.
///
/// The point is un-rotated into the reference frame, then handles are
/// tested in fixed priority: resize handles, the move area (the whole
/// rectangle), the rotate handle. The first match wins, so overlapping
/// hot zones resolve deterministically.
pub fn hit_test(
    transform: &Transform,
    point: Vec2,
    can_resize_x: bool,
    can_resize_y: bool,
) -> Option<HandleHit> {
    let unrotated = Vec2::rotated(point, transform.position(), transform.rotation().negate());
    let unrotated = kurbo::Point::from(unrotated);

    for handle in ResizeHandle::ALL {
        if !handle.is_visible(can_resize_x, can_resize_y) {
            continue;
        }

        let zone = centered_rect(handle_center(transform, handle), HANDLE_SIZE);

        if zone.contains(unrotated) {
            return Some(HandleHit::Resize(handle));
        }
    }

    let position = transform.position();
    let size = transform.size();

    let move_zone = Rect::new(
        position.x - size.x * 0.5 - 1.0,
        position.y - size.y * 0.5 - 1.0,
        position.x + size.x * 0.5 + 1.0,
        position.y + size.y * 0.5 + 1.0,
    );

    if move_zone.contains(unrotated) {
        return Some(HandleHit::Move);
    }

    let rotate_zone = centered_rect(rotate_handle_center(transform), ROTATE_HANDLE_SIZE);

    if rotate_zone.contains(unrotated) {
        return Some(HandleHit::Rotate);
    }

    None
}

/// Handle center in the un-rotated reference frame.
fn handle_center(transform: &Transform, handle: ResizeHandle) -> Vec2 {
    transform.position() + handle.anchor() * (transform.size() + Vec2::new(HANDLE_MARGIN, HANDLE_MARGIN))
}

fn rotate_handle_center(transform: &Transform) -> Vec2 {
    let position = transform.position();

    Vec2::new(
        position.x,
        position.y - transform.size().y * 0.5 - ROTATE_HANDLE_OFFSET,
    )
}

fn centered_rect(center: Vec2, size: f64) -> Rect {
    Rect::new(
        center.x - size * 0.5,
        center.y - size * 0.5,
        center.x + size * 0.5,
        center.y + size * 0.5,
    )
}
