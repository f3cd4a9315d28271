//! Selection set, resize handles and manipulation state.

use crate::entity::{Entity, EntityRef, EntityTrait, VenueElement};
use crate::geometry::Bounds;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Handle size in screen pixels.
pub const HANDLE_SIZE_PX: f64 = 8.0;
/// Extra pixels around a handle that still count as a hit.
pub const HANDLE_HIT_SLOP_PX: f64 = 4.0;
/// Smallest width or height a resize can produce, in feet.
pub const MIN_RESIZE_FT: f64 = 2.0;

/// Corner positions, indexed 0 = TL, 1 = TR, 2 = BL, 3 = BR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomLeft => 2,
            Corner::BottomRight => 3,
        }
    }

    /// The diagonally opposite corner.
    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }

    /// Whether dragging this corner resizes along the NW-SE diagonal.
    pub fn is_nwse(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomRight)
    }

    /// This corner of a bounding box.
    pub fn of(self, bounds: &Bounds) -> Point {
        bounds.corners()[self.index()]
    }
}

/// A resize handle on a venue element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in feet.
    pub position: Point,
    pub corner: Corner,
}

impl Handle {
    pub fn new(position: Point, corner: Corner) -> Self {
        Self { position, corner }
    }

    /// Check if a pixel point hits this handle, given the handle's pixel position.
    pub fn hit_test_pixels(handle_px: Point, point_px: Point) -> bool {
        let reach = HANDLE_SIZE_PX / 2.0 + HANDLE_HIT_SLOP_PX;
        (point_px.x - handle_px.x).abs() <= reach && (point_px.y - handle_px.y).abs() <= reach
    }
}

/// Corner handles for a venue element, in corner-index order.
pub fn resize_handles(element: &VenueElement) -> Vec<Handle> {
    let bounds = element.bounds();
    Corner::ALL
        .iter()
        .map(|&corner| Handle::new(corner.of(&bounds), corner))
        .collect()
}

/// The ordered set of selected entities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    items: Vec<EntityRef>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// More than one entity selected.
    pub fn is_multi(&self) -> bool {
        self.items.len() > 1
    }

    pub fn contains(&self, entity: EntityRef) -> bool {
        self.items.contains(&entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityRef> + '_ {
        self.items.iter().copied()
    }

    pub fn as_slice(&self) -> &[EntityRef] {
        &self.items
    }

    /// The single selected entity, if exactly one.
    pub fn single(&self) -> Option<EntityRef> {
        match self.items.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Replace the selection with one entity.
    pub fn select_only(&mut self, entity: EntityRef) {
        self.items.clear();
        self.items.push(entity);
    }

    pub fn add(&mut self, entity: EntityRef) {
        if !self.contains(entity) {
            self.items.push(entity);
        }
    }

    /// Add if absent, remove if present.
    pub fn toggle(&mut self, entity: EntityRef) {
        if let Some(pos) = self.items.iter().position(|&e| e == entity) {
            self.items.remove(pos);
        } else {
            self.items.push(entity);
        }
    }

    pub fn select_all(&mut self, entities: &[Entity]) {
        self.items = entities.iter().map(Entity::entity_ref).collect();
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drop references to entities that no longer exist.
    pub fn retain_existing(&mut self, entities: &[Entity]) {
        self.items
            .retain(|r| entities.iter().any(|e| e.entity_ref() == *r));
    }
}

/// State of an active drag of one or more entities.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// Pointer position at pointer-down, in feet.
    pub start_point: Point,
    /// Latest pointer position, in feet.
    pub current_point: Point,
    /// Anchors of the unlocked entities being moved, at drag start.
    pub original_anchors: BTreeMap<EntityRef, Point>,
    /// Set once the pointer has moved past the drag threshold.
    pub activated: bool,
}

impl DragState {
    pub fn new(start_point: Point, original_anchors: BTreeMap<EntityRef, Point>) -> Self {
        Self {
            start_point,
            current_point: start_point,
            original_anchors,
            activated: false,
        }
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }
}

/// State of an active venue element resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeState {
    pub entity: EntityRef,
    /// Corner being dragged.
    pub corner: Corner,
    /// Opposite corner, fixed for the whole gesture, in feet.
    pub anchor: Point,
    /// Set once the first change has been applied (and checkpointed).
    pub changed: bool,
}

impl ResizeState {
    pub fn new(entity: EntityRef, corner: Corner, bounds: &Bounds) -> Self {
        Self {
            entity,
            corner,
            anchor: corner.opposite().of(bounds),
            changed: false,
        }
    }
}

/// Resize a venue element between a fixed anchor and the pointer.
///
/// Width and height are the distance to the anchor, optionally rounded to
/// the grid, never below [`MIN_RESIZE_FT`]. The element grows away from the
/// anchor on the pointer's side.
pub fn apply_resize(element: &mut VenueElement, anchor: Point, pointer: Point, grid_size: Option<f64>) {
    let snap = |len: f64| match grid_size {
        Some(g) if g > 0.0 => (len / g).round() * g,
        _ => len,
    };
    let dx = pointer.x - anchor.x;
    let dy = pointer.y - anchor.y;
    let width = snap(dx.abs()).max(MIN_RESIZE_FT);
    let height = snap(dy.abs()).max(MIN_RESIZE_FT);
    let sx = if dx < 0.0 { -1.0 } else { 1.0 };
    let sy = if dy < 0.0 { -1.0 } else { 1.0 };

    element.width = width;
    element.height = height;
    element.position = Point::new(anchor.x + sx * width / 2.0, anchor.y + sy * height / 2.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityKind, RoundTable};

    fn r(id: u32) -> EntityRef {
        EntityRef::new(EntityKind::RoundTable, id)
    }

    #[test]
    fn test_corner_geometry() {
        let bounds = Bounds::from_center(Point::new(10.0, 10.0), 4.0, 2.0);
        assert_eq!(Corner::TopLeft.of(&bounds), Point::new(8.0, 9.0));
        assert_eq!(Corner::BottomRight.of(&bounds), Point::new(12.0, 11.0));
        assert_eq!(Corner::TopRight.opposite(), Corner::BottomLeft);
        assert!(!Corner::TopRight.is_nwse());
    }

    #[test]
    fn test_handle_hit_margin() {
        let handle = Point::new(100.0, 100.0);
        assert!(Handle::hit_test_pixels(handle, Point::new(108.0, 92.0)));
        assert!(!Handle::hit_test_pixels(handle, Point::new(108.5, 100.0)));
    }

    #[test]
    fn test_selection_toggle_and_retain() {
        let mut selection = Selection::new();
        selection.select_only(r(1));
        selection.toggle(r(2));
        selection.add(r(2));
        assert_eq!(selection.as_slice(), &[r(1), r(2)]);
        assert!(selection.is_multi());
        selection.toggle(r(1));
        assert_eq!(selection.single(), Some(r(2)));

        let mut table = RoundTable::default();
        table.id = 1;
        selection.select_only(r(1));
        selection.add(r(5));
        selection.retain_existing(&[Entity::RoundTable(table)]);
        assert_eq!(selection.as_slice(), &[r(1)]);
    }

    #[test]
    fn test_resize_from_anchor() {
        let mut element = VenueElement::new(Point::new(10.0, 10.0), 4.0, 4.0);
        let state = ResizeState::new(
            EntityRef::new(EntityKind::VenueElement, 1),
            Corner::BottomRight,
            &element.bounds(),
        );
        assert_eq!(state.anchor, Point::new(8.0, 8.0));

        apply_resize(&mut element, state.anchor, Point::new(14.3, 11.6), Some(1.0));
        assert!((element.width - 6.0).abs() < f64::EPSILON);
        assert!((element.height - 4.0).abs() < f64::EPSILON);
        assert_eq!(element.position, Point::new(11.0, 10.0));
    }

    #[test]
    fn test_resize_across_anchor_and_floor() {
        let mut element = VenueElement::new(Point::new(10.0, 10.0), 4.0, 4.0);
        let anchor = Point::new(8.0, 8.0);
        apply_resize(&mut element, anchor, Point::new(3.0, 8.5), None);
        assert!((element.width - 5.0).abs() < f64::EPSILON);
        assert!((element.height - MIN_RESIZE_FT).abs() < f64::EPSILON);
        // grows left of the anchor, downward on y
        assert_eq!(element.position, Point::new(5.5, 9.0));
    }
}
