//! The manipulation state machine driving move, resize and rotate
//! sessions over the current selection.
//!
//! The controller owns no store. It reads the diagram to derive the
//! selection's aggregate bounds, runs the session math on pointer and
//! key events, and reports results through [`ManipulationHost`]: live
//! previews while a session is active, and exactly one commit per
//! session that actually changed something. The host applies commits to
//! its store, typically via [`Diagram::transform_items`].

use log::{debug, warn};

use crate::diagram::{BoundsResolver, Diagram, DiagramItem, ItemId};
use crate::error::ManipulationError;
use crate::geometry::{Rotation, Transform, Vec2};
use crate::input::{NudgeDirection, SnapModifiers};
use crate::snap::{SnapManager, SnapMode};

use super::handles::{hit_test, HandleHit};
use super::timer::{RepeatTask, TaskHandle};

/// Callbacks through which the controller reports manipulation results.
pub trait ManipulationHost {
    /// A live preview: the selected items as they would look if the
    /// session ended now. Called on every effective pointer move or
    /// nudge tick.
    fn on_preview(&mut self, items: &[DiagramItem]);

    /// The session ended; any preview rendering should be dropped.
    fn on_preview_end(&mut self);

    /// Commit the retargeting of `ids` from `old_bounds` to
    /// `new_bounds`. Fired at most once per session, pointer or
    /// keyboard.
    fn on_transform_commit(
        &mut self,
        ids: &[ItemId],
        old_bounds: &Transform,
        new_bounds: &Transform,
    );
}

/// What the active pointer session is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManipulationMode {
    #[default]
    None,
    Move,
    Resize,
    Rotate,
}

/// The manipulation state machine.
///
/// One controller instance serves one view. It tracks the selection's
/// aggregate bounds, the per-axis resize permissions derived from the
/// selected items' constraints, and at most one active session.
#[derive(Debug, Default)]
pub struct ManipulationController {
    mode: ManipulationMode,
    selection: Vec<ItemId>,
    transform: Transform,
    /// Accumulated rotation of the multi-selection aggregate. Survives
    /// across sessions; reset when the selection changes.
    rotation: Rotation,
    start_transform: Transform,
    start_position: Vec2,
    resize_anchor: Vec2,
    manipulated: bool,
    can_resize_x: bool,
    can_resize_y: bool,
    view_size: Vec2,
    snap_manager: SnapManager,
    resolver: BoundsResolver,
    nudge: RepeatTask,
    nudge_direction: Option<NudgeDirection>,
    nudge_ticks: u32,
    nudge_snap_mode: SnapMode,
}

impl ManipulationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewport size used for viewport snap lines.
    pub fn set_view_size(&mut self, view_size: Vec2) {
        self.view_size = view_size;
    }

    pub fn mode(&self) -> ManipulationMode {
        self.mode
    }

    /// The selection's aggregate bounds, updated live during a session.
    /// This is the reference rectangle the adorner handles render around.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn selection(&self) -> &[ItemId] {
        &self.selection
    }

    pub fn can_resize_x(&self) -> bool {
        self.can_resize_x
    }

    pub fn can_resize_y(&self) -> bool {
        self.can_resize_y
    }

    /// The active snap manager, for rendering guide overlays.
    pub fn snap_manager(&self) -> &SnapManager {
        &self.snap_manager
    }

    /// Change the selection. No session, pointer or keyboard, may be
    /// active. The remembered aggregate rotation starts over at zero.
    pub fn select(
        &mut self,
        diagram: &mut Diagram,
        ids: &[ItemId],
    ) -> Result<(), ManipulationError> {
        if self.mode != ManipulationMode::None || self.nudge.is_active() {
            warn!("selection change rejected: a manipulation session is active");
            return Err(ManipulationError::SessionAlreadyActive);
        }

        self.rotation = Rotation::ZERO;

        diagram.select(ids);
        self.refresh_selection(diagram)
    }

    /// Recompute the aggregate bounds and resize permissions from the
    /// diagram's current selection. Call after external diagram changes.
    pub fn refresh_selection(&mut self, diagram: &Diagram) -> Result<(), ManipulationError> {
        self.selection = diagram.selected_ids().to_vec();
        self.transform = self.selection_bounds(diagram)?;

        // An axis stays resizable as long as at least one selected item
        // is free on it; a constrained sibling never vetoes the others.
        let mut can_resize_x = false;
        let mut can_resize_y = false;

        for item in diagram.selected_items() {
            match item.constraint() {
                Some(constraint) => {
                    can_resize_x |= !constraint.calculates_size_x();
                    can_resize_y |= !constraint.calculates_size_y();
                }
                None => {
                    can_resize_x = true;
                    can_resize_y = true;
                }
            }
        }

        self.can_resize_x = can_resize_x;
        self.can_resize_y = can_resize_y;

        Ok(())
    }

    /// Begin a session if `position` hits a handle or the move area.
    ///
    /// Returns the hit, or `None` when the pointer missed the adorner
    /// entirely (the caller then treats it as a selection click).
    pub fn pointer_down(
        &mut self,
        diagram: &Diagram,
        position: Vec2,
    ) -> Result<Option<HandleHit>, ManipulationError> {
        if self.mode != ManipulationMode::None || self.nudge.is_active() {
            warn!("pointer down rejected: a manipulation session is already active");
            return Err(ManipulationError::SessionAlreadyActive);
        }

        if self.selection.is_empty() {
            return Ok(None);
        }

        let Some(hit) = hit_test(&self.transform, position, self.can_resize_x, self.can_resize_y)
        else {
            return Ok(None);
        };

        self.snap_manager
            .prepare(diagram, self.view_size, &mut self.resolver)?;

        self.mode = match hit {
            HandleHit::Move => ManipulationMode::Move,
            HandleHit::Rotate => ManipulationMode::Rotate,
            HandleHit::Resize(handle) => {
                self.resize_anchor = handle.anchor();
                ManipulationMode::Resize
            }
        };

        self.start_transform = self.transform;
        self.start_position = position;
        self.manipulated = false;

        debug!("manipulation session started: {:?}", self.mode);

        Ok(Some(hit))
    }

    /// Advance the active session to the new pointer position.
    ///
    /// Quietly ignored when no session is active, since hosts usually
    /// forward every hover event.
    pub fn pointer_move(
        &mut self,
        diagram: &Diagram,
        position: Vec2,
        modifiers: SnapModifiers,
        host: &mut impl ManipulationHost,
    ) {
        if self.mode == ManipulationMode::None {
            return;
        }

        let snap_mode = modifiers.snap_mode();
        let delta = position - self.start_position;

        let candidate = match self.mode {
            ManipulationMode::None => unreachable!(),
            ManipulationMode::Move => {
                let snapped = self
                    .snap_manager
                    .snap_moving(&self.start_transform, delta, snap_mode);

                self.start_transform.move_by(snapped.delta)
            }
            ManipulationMode::Resize => self.resize_candidate(delta, snap_mode),
            ManipulationMode::Rotate => {
                let center = self.start_transform.position();
                let degrees = Vec2::angle_between(self.start_position - center, position - center);
                let snapped =
                    self.snap_manager
                        .snap_rotating(&self.start_transform, degrees, snap_mode);

                self.start_transform.rotate_by(Rotation::from_degrees(snapped))
            }
        };

        // A pointer that never effectively moved must not dirty the
        // session, or pointer up would commit an identity change.
        if !self.manipulated && candidate.equals(&self.start_transform) {
            return;
        }

        self.manipulated = true;
        self.transform = candidate;
        self.emit_preview(diagram, host);
    }

    /// End the session, committing at most once.
    pub fn pointer_up(&mut self, host: &mut impl ManipulationHost) -> Result<(), ManipulationError> {
        if self.mode == ManipulationMode::None {
            warn!("pointer up without an active manipulation session");
            return Err(ManipulationError::NoActiveSession);
        }

        host.on_preview_end();

        if self.manipulated && !self.transform.equals(&self.start_transform) {
            debug!("manipulation session committed: {:?}", self.mode);
            self.rotation = self.transform.rotation();
            host.on_transform_commit(&self.selection, &self.start_transform, &self.transform);
        } else {
            debug!("manipulation session ended without a change");
            self.transform = self.start_transform;
        }

        self.mode = ManipulationMode::None;
        self.manipulated = false;

        Ok(())
    }

    /// The view lost focus: a pointer session is discarded uncommitted,
    /// a keyboard nudge session ends like on key up.
    pub fn blur(&mut self, host: &mut impl ManipulationHost) {
        if self.mode != ManipulationMode::None {
            host.on_preview_end();
            self.transform = self.start_transform;
            self.mode = ManipulationMode::None;
            self.manipulated = false;
        }

        if self.nudge.is_active() {
            self.finish_nudge(host);
        }
    }

    /// Handle a key press. An arrow key begins a keyboard nudge session
    /// and starts the repeat task; the returned handle must be passed
    /// back on every scheduled [`ManipulationController::nudge_tick`].
    /// The session runs the Move pipeline and commits once, on key up.
    pub fn key_down(
        &mut self,
        diagram: &Diagram,
        key: &str,
        modifiers: SnapModifiers,
        host: &mut impl ManipulationHost,
    ) -> Result<Option<TaskHandle>, ManipulationError> {
        let Some(direction) = NudgeDirection::from_key(key) else {
            return Ok(None);
        };

        if self.selection.is_empty() || self.mode != ManipulationMode::None {
            return Ok(None);
        }

        // Key auto-repeat re-delivers key down; the repeat task already
        // runs, so keep its pace instead of bursting.
        if self.nudge.is_active() {
            return Ok(None);
        }

        self.snap_manager
            .prepare(diagram, self.view_size, &mut self.resolver)?;

        self.nudge_direction = Some(direction);
        self.nudge_snap_mode = modifiers.snap_mode();
        self.nudge_ticks = 0;
        self.start_transform = self.transform;
        self.manipulated = false;

        debug!("keyboard nudge session started: {direction:?}");

        let handle = self.nudge.schedule();
        self.apply_nudge(diagram, host);

        Ok(Some(handle))
    }

    /// One scheduled repeat tick. Stale handles, from a task cancelled
    /// or rescheduled since, are quietly ignored.
    pub fn nudge_tick(
        &mut self,
        handle: TaskHandle,
        diagram: &Diagram,
        host: &mut impl ManipulationHost,
    ) {
        if !self.nudge.accepts(handle) {
            debug!("ignoring stale nudge tick");
            return;
        }

        self.apply_nudge(diagram, host);
    }

    /// Handle a key release; ends the matching nudge session and
    /// commits its net movement. Quiet no-op for unrelated keys or when
    /// no nudge is active.
    pub fn key_up(&mut self, key: &str, host: &mut impl ManipulationHost) {
        if !self.nudge.is_active() || NudgeDirection::from_key(key) != self.nudge_direction {
            return;
        }

        self.finish_nudge(host);
    }

    /// Advance the nudge session: the cumulative delta is the direction
    /// scaled by the tick count, run through the same snapping as a
    /// pointer move.
    fn apply_nudge(&mut self, diagram: &Diagram, host: &mut impl ManipulationHost) {
        let Some(direction) = self.nudge_direction else {
            return;
        };

        self.nudge_ticks += 1;

        let raw = direction.vector() * f64::from(self.nudge_ticks);
        let snapped = self
            .snap_manager
            .snap_moving(&self.start_transform, raw, self.nudge_snap_mode);
        let candidate = self.start_transform.move_by(snapped.delta);

        if !self.manipulated && candidate.equals(&self.start_transform) {
            return;
        }

        self.manipulated = true;
        self.transform = candidate;
        self.emit_preview(diagram, host);
    }

    fn finish_nudge(&mut self, host: &mut impl ManipulationHost) {
        host.on_preview_end();

        if self.manipulated && !self.transform.equals(&self.start_transform) {
            debug!("keyboard nudge session committed");
            host.on_transform_commit(&self.selection, &self.start_transform, &self.transform);
        } else {
            self.transform = self.start_transform;
        }

        self.manipulated = false;
        self.nudge.cancel();
        self.nudge_direction = None;
        self.nudge_ticks = 0;
    }

    fn emit_preview(&self, diagram: &Diagram, host: &mut impl ManipulationHost) {
        let previews: Vec<DiagramItem> = diagram
            .selected_items()
            .into_iter()
            .map(|item| item.transform_by_bounds(&self.start_transform, &self.transform))
            .collect();

        host.on_preview(&previews);
    }

    fn resize_candidate(&self, delta: Vec2, snap_mode: SnapMode) -> Transform {
        let anchor = self.resize_anchor;
        let rotation = self.start_transform.rotation();

        // Express the pointer delta in the reference frame; the anchor
        // masks it down to the dragged axes. The factor two cancels the
        // half in the anchor components.
        let delta_size =
            Vec2::rotated(delta * 2.0, Vec2::ZERO, rotation.negate()) * anchor;

        let snapped = self.snap_manager.snap_resizing(
            &self.start_transform,
            delta_size,
            snap_mode,
            anchor.x,
            anchor.y,
        );

        let delta_size = Vec2::new(
            if self.can_resize_x { snapped.delta.x } else { 0.0 },
            if self.can_resize_y { snapped.delta.y } else { 0.0 },
        );

        // Growing away from the fixed side shifts the center by half the
        // growth, projected through the rotation.
        let sin = rotation.sin();
        let cos = rotation.cos();

        let mut delta_position = Vec2::ZERO;

        if anchor.y != 0.0 {
            delta_position.y += anchor.y * delta_size.y * cos;
            delta_position.x -= anchor.y * delta_size.y * sin;
        }

        if anchor.x != 0.0 {
            delta_position.y += anchor.x * delta_size.x * sin;
            delta_position.x += anchor.x * delta_size.x * cos;
        }

        self.start_transform
            .resize_and_move_by(delta_size, delta_position)
    }

    fn selection_bounds(&mut self, diagram: &Diagram) -> Result<Transform, ManipulationError> {
        let items = diagram.selected_items();

        match items.as_slice() {
            [] => Ok(Transform::ZERO),
            [single] => self.resolver.bounds(single, diagram),
            many => {
                let mut bounds = Vec::with_capacity(many.len());

                for item in many {
                    bounds.push(self.resolver.bounds(item, diagram)?);
                }

                Ok(Transform::from_transforms_and_rotation(
                    &bounds,
                    self.rotation,
                ))
            }
        }
    }
}
