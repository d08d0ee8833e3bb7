//! Snapping of move, resize and rotate deltas against the grid, the
//! viewport and sibling shapes.

use serde::{Deserialize, Serialize};

use crate::diagram::{BoundsResolver, Diagram};
use crate::error::ManipulationError;
use crate::geometry::{Transform, Vec2};

/// Grid pitch for grid snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 10.0;

/// Distance within which a moved edge or center locks onto a snap line.
pub const SNAP_DISTANCE: f64 = 8.0;

/// Rotation snap increment in degrees.
pub const ROTATION_SNAP_INCREMENT: f64 = 15.0;

/// Snapping strategy applied during a manipulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnapMode {
    /// Round to the grid pitch.
    Grid,
    /// Align with the edges and centers of sibling shapes.
    #[default]
    Shapes,
    /// No snapping.
    None,
}

/// A vertical or horizontal snap line captured from a candidate.
///
/// Center lines only attract the moved center; edge lines only attract
/// the moved edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapLine {
    /// The coordinate of the line on its axis.
    pub value: f64,
    pub is_center: bool,
}

impl SnapLine {
    fn edge(value: f64) -> Self {
        Self { value, is_center: false }
    }

    fn center(value: f64) -> Self {
        Self { value, is_center: true }
    }
}

/// A snapped delta plus the guide lines to render, one per axis at most.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    pub delta: Vec2,
    pub guide_x: Option<SnapLine>,
    pub guide_y: Option<SnapLine>,
}

impl SnapResult {
    fn unsnapped(delta: Vec2) -> Self {
        Self {
            delta,
            guide_x: None,
            guide_y: None,
        }
    }
}

/// Computes snapped deltas for one manipulation session.
///
/// [`SnapManager::prepare`] captures the candidate lines once at session
/// start; after that every snap call is a pure function of the captured
/// lines and its arguments, so repeated calls for the same input delta
/// are idempotent.
#[derive(Debug, Default)]
pub struct SnapManager {
    x_lines: Vec<SnapLine>,
    y_lines: Vec<SnapLine>,
}

impl SnapManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture snap candidates: the viewport edges and center, and the
    /// aabb edges and centers of every unselected root item.
    pub fn prepare(
        &mut self,
        diagram: &Diagram,
        view_size: Vec2,
        resolver: &mut BoundsResolver,
    ) -> Result<(), ManipulationError> {
        self.x_lines.clear();
        self.y_lines.clear();

        if view_size.x > 0.0 && view_size.y > 0.0 {
            self.x_lines.push(SnapLine::edge(0.0));
            self.x_lines.push(SnapLine::edge(view_size.x));
            self.x_lines.push(SnapLine::center(view_size.x * 0.5));

            self.y_lines.push(SnapLine::edge(0.0));
            self.y_lines.push(SnapLine::edge(view_size.y));
            self.y_lines.push(SnapLine::center(view_size.y * 0.5));
        }

        let selected = diagram.selected_ids().to_vec();

        for item in diagram.root_items() {
            if selected.contains(&item.id()) {
                continue;
            }

            let aabb = resolver.bounds(item, diagram)?.aabb();

            self.x_lines.push(SnapLine::edge(aabb.x0));
            self.x_lines.push(SnapLine::edge(aabb.x1));
            self.x_lines.push(SnapLine::center(aabb.center().x));

            self.y_lines.push(SnapLine::edge(aabb.y0));
            self.y_lines.push(SnapLine::edge(aabb.y1));
            self.y_lines.push(SnapLine::center(aabb.center().y));
        }

        Ok(())
    }

    /// Snap a move delta.
    pub fn snap_moving(&self, start: &Transform, delta: Vec2, mode: SnapMode) -> SnapResult {
        match mode {
            SnapMode::None => SnapResult::unsnapped(delta),
            SnapMode::Grid => {
                let moved = start.position() + delta;

                SnapResult::unsnapped(Vec2::new(
                    round_to_grid(moved.x) - start.position().x,
                    round_to_grid(moved.y) - start.position().y,
                ))
            }
            SnapMode::Shapes => {
                let aabb = start.aabb();

                let sides_x = [
                    (aabb.x0 + delta.x, false),
                    (aabb.x1 + delta.x, false),
                    (aabb.center().x + delta.x, true),
                ];
                let sides_y = [
                    (aabb.y0 + delta.y, false),
                    (aabb.y1 + delta.y, false),
                    (aabb.center().y + delta.y, true),
                ];

                let snap_x = best_adjustment(&self.x_lines, &sides_x);
                let snap_y = best_adjustment(&self.y_lines, &sides_y);

                SnapResult {
                    delta: Vec2::new(
                        delta.x + snap_x.map_or(0.0, |(adjust, _)| adjust),
                        delta.y + snap_y.map_or(0.0, |(adjust, _)| adjust),
                    ),
                    guide_x: snap_x.map(|(_, line)| line),
                    guide_y: snap_y.map(|(_, line)| line),
                }
            }
        }
    }

    /// Snap a resize delta by snapping the edge the anchor moves.
    ///
    /// For a rotated reference the moving edge is no longer axis aligned
    /// and the delta passes through unchanged.
    pub fn snap_resizing(
        &self,
        start: &Transform,
        delta_size: Vec2,
        mode: SnapMode,
        anchor_x: f64,
        anchor_y: f64,
    ) -> SnapResult {
        if mode == SnapMode::None || !start.rotation().equals(&crate::geometry::Rotation::ZERO) {
            return SnapResult::unsnapped(delta_size);
        }

        let aabb = start.aabb();

        let (delta_x, guide_x) = snap_resize_axis(
            &self.x_lines,
            mode,
            delta_size.x,
            anchor_x,
            aabb.x0,
            aabb.x1,
        );
        let (delta_y, guide_y) = snap_resize_axis(
            &self.y_lines,
            mode,
            delta_size.y,
            anchor_y,
            aabb.y0,
            aabb.y1,
        );

        SnapResult {
            delta: Vec2::new(delta_x, delta_y),
            guide_x,
            guide_y,
        }
    }

    /// Snap a cumulative rotation in degrees.
    pub fn snap_rotating(&self, _start: &Transform, degrees: f64, mode: SnapMode) -> f64 {
        match mode {
            SnapMode::Grid => (degrees / ROTATION_SNAP_INCREMENT).round() * ROTATION_SNAP_INCREMENT,
            _ => degrees,
        }
    }

    /// The captured snap lines, for diagnostic overlays.
    pub fn debug_lines(&self) -> (&[SnapLine], &[SnapLine]) {
        (&self.x_lines, &self.y_lines)
    }
}

fn round_to_grid(value: f64) -> f64 {
    (value / GRID_SIZE).round() * GRID_SIZE
}

/// The best in-tolerance adjustment over all (line, side) pairs with
/// matching kinds. Strictly-smaller comparison keeps the first captured
/// line on exact ties.
fn best_adjustment(lines: &[SnapLine], sides: &[(f64, bool)]) -> Option<(f64, SnapLine)> {
    let mut best: Option<(f64, SnapLine)> = None;
    let mut best_distance = SNAP_DISTANCE;

    for line in lines {
        for &(side, is_center) in sides {
            if line.is_center != is_center {
                continue;
            }

            let distance = (line.value - side).abs();

            if distance < best_distance {
                best_distance = distance;
                best = Some((line.value - side, *line));
            }
        }
    }

    best
}

fn snap_resize_axis(
    lines: &[SnapLine],
    mode: SnapMode,
    delta: f64,
    anchor: f64,
    low: f64,
    high: f64,
) -> (f64, Option<SnapLine>) {
    if anchor == 0.0 {
        return (delta, None);
    }

    let sign = anchor.signum();

    // The edge opposite the anchor's fixed side is the one that moves.
    let edge = if sign > 0.0 { high + delta } else { low - delta };

    match mode {
        SnapMode::Grid => {
            let target = round_to_grid(edge);

            (delta + sign * (target - edge), None)
        }
        SnapMode::Shapes => match best_adjustment(lines, &[(edge, false)]) {
            Some((adjust, line)) => (delta + sign * adjust, Some(line)),
            None => (delta, None),
        },
        SnapMode::None => (delta, None),
    }
}
