//! Grid snapping and smart-guide alignment detection.
//!
//! Both are advisory: grid snap adjusts a proposed anchor, smart guides only
//! report alignments for display.

use crate::entity::{Entity, EntityKind};
use crate::geometry::Bounds;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Proximity within which two coordinates count as aligned, in feet.
pub const SMART_GUIDE_THRESHOLD_FT: f64 = 0.5;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> SnapResult {
    if grid_size <= 0.0 {
        return SnapResult::none(point);
    }
    let snapped_x = (point.x / grid_size).round() * grid_size;
    let snapped_y = (point.y / grid_size).round() * grid_size;

    SnapResult {
        point: Point::new(snapped_x, snapped_y),
        snapped_x: true,
        snapped_y: true,
    }
}

/// The grid-snapped anchor for an entity.
///
/// Round tables and venue elements snap their center and blocks their
/// top-left corner. Rectangular tables snap their top-left corner and convert
/// back to a center, so the table edge lands on the grid.
pub fn snap_anchor(entity: &Entity, grid_size: f64) -> Point {
    let anchor = entity.anchor();
    match entity.kind() {
        EntityKind::RectTable => {
            let half = Vec2::new(entity.bounds().width() / 2.0, entity.bounds().height() / 2.0);
            snap_to_grid(anchor - half, grid_size).point + half
        }
        EntityKind::RoundTable | EntityKind::ChairBlock | EntityKind::VenueElement => {
            snap_to_grid(anchor, grid_size).point
        }
    }
}

/// Move an entity onto its grid-snapped anchor.
pub fn snap_entity(entity: &mut Entity, grid_size: f64) {
    let anchor = snap_anchor(entity, grid_size);
    entity.set_anchor(anchor);
}

/// Direction of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GuideAxis {
    /// A vertical line at `x = position`.
    Vertical,
    /// A horizontal line at `y = position`.
    Horizontal,
}

/// An alignment line shown while dragging, in feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmartGuide {
    pub axis: GuideAxis,
    /// x for vertical guides, y for horizontal ones.
    pub position: f64,
    /// Extent along the line, covering both aligned boxes.
    pub start: f64,
    pub end: f64,
}

impl SmartGuide {
    /// Line endpoints in feet.
    pub fn endpoints(&self) -> (Point, Point) {
        match self.axis {
            GuideAxis::Vertical => (
                Point::new(self.position, self.start),
                Point::new(self.position, self.end),
            ),
            GuideAxis::Horizontal => (
                Point::new(self.start, self.position),
                Point::new(self.end, self.position),
            ),
        }
    }
}

/// Coordinates compared on one axis: center, then both edges.
fn axis_lines(b: &Bounds, axis: GuideAxis) -> (f64, [f64; 2]) {
    match axis {
        GuideAxis::Vertical => (b.center_x, [b.left, b.right]),
        GuideAxis::Horizontal => (b.center_y, [b.top, b.bottom]),
    }
}

/// Extent of two boxes along the guide direction.
fn span(a: &Bounds, b: &Bounds, axis: GuideAxis) -> (f64, f64) {
    match axis {
        GuideAxis::Vertical => (a.top.min(b.top), a.bottom.max(b.bottom)),
        GuideAxis::Horizontal => (a.left.min(b.left), a.right.max(b.right)),
    }
}

/// Find alignments between dragged boxes and every other box.
///
/// For each pair this checks center alignment and the four edge-to-edge
/// combinations on both axes. Guides sit on the stationary box's coordinate
/// and are deduplicated by axis and position to two decimals, merging their
/// extents. The result is ordered by axis, then position.
pub fn detect_smart_guides(dragged: &[Bounds], others: &[Bounds], threshold: f64) -> Vec<SmartGuide> {
    let mut guides: BTreeMap<(GuideAxis, i64), SmartGuide> = BTreeMap::new();

    for d in dragged {
        for o in others {
            for axis in [GuideAxis::Vertical, GuideAxis::Horizontal] {
                let (dc, d_edges) = axis_lines(d, axis);
                let (oc, o_edges) = axis_lines(o, axis);

                let mut matches = Vec::with_capacity(5);
                if (dc - oc).abs() <= threshold {
                    matches.push(oc);
                }
                for de in d_edges {
                    for oe in o_edges {
                        if (de - oe).abs() <= threshold {
                            matches.push(oe);
                        }
                    }
                }

                let (start, end) = span(d, o, axis);
                for position in matches {
                    let key = (axis, (position * 100.0).round() as i64);
                    guides
                        .entry(key)
                        .and_modify(|g| {
                            g.start = g.start.min(start);
                            g.end = g.end.max(end);
                        })
                        .or_insert(SmartGuide {
                            axis,
                            position,
                            start,
                            end,
                        });
                }
            }
        }
    }

    guides.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ChairBlock, RectTable, RoundTable, VenueElement};
    use crate::geometry::Spacing;

    #[test]
    fn test_snap_to_grid() {
        let result = snap_to_grid(Point::new(12.4, 7.6), 1.0);
        assert_eq!(result.point, Point::new(12.0, 8.0));
        assert!(result.is_snapped());
        assert!(!snap_to_grid(Point::new(1.3, 1.3), 0.0).is_snapped());
    }

    #[test]
    fn test_grid_snap_idempotent() {
        let entities: Vec<Entity> = vec![
            RoundTable::new(Point::new(10.3, 7.8), 5.0, 8).into(),
            RectTable::new(Point::new(20.2, 14.9), 6.0, 2.5, 3, 1).into(),
            ChairBlock::new(Point::new(3.4, 30.6), 3, 4, Spacing::Wide).into(),
            VenueElement::new(Point::new(40.7, 4.2), 9.0, 5.0).into(),
        ];
        for grid in [1.0, 0.5, 2.0] {
            for mut entity in entities.clone() {
                snap_entity(&mut entity, grid);
                let once = entity.anchor();
                snap_entity(&mut entity, grid);
                assert!((entity.anchor() - once).hypot() < 1e-9);
            }
        }
    }

    #[test]
    fn test_rect_table_snaps_edge() {
        // 6 x 2.5 footprint: the top-left corner lands on the grid, not the center
        let entity: Entity = RectTable::new(Point::new(10.2, 10.1), 6.0, 2.5, 3, 0).into();
        let anchor = snap_anchor(&entity, 1.0);
        assert!((anchor.x - 10.0).abs() < 1e-9);
        assert!((anchor.y - 10.25).abs() < 1e-9);
    }

    #[test]
    fn test_block_snaps_corner() {
        let entity: Entity = ChairBlock::new(Point::new(4.6, 5.2), 2, 2, Spacing::Tight).into();
        assert_eq!(snap_anchor(&entity, 1.0), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_center_alignment_guide() {
        let dragged = Bounds::from_center(Point::new(10.3, 30.0), 4.0, 4.0);
        let other = Bounds::from_center(Point::new(10.0, 5.0), 6.0, 6.0);
        let guides = detect_smart_guides(&[dragged], &[other], SMART_GUIDE_THRESHOLD_FT);
        let vertical: Vec<_> = guides.iter().filter(|g| g.axis == GuideAxis::Vertical).collect();
        assert_eq!(vertical.len(), 1);
        assert!((vertical[0].position - 10.0).abs() < 1e-9);
        assert!((vertical[0].start - 2.0).abs() < 1e-9);
        assert!((vertical[0].end - 32.0).abs() < 1e-9);
        assert!(guides.iter().all(|g| g.axis == GuideAxis::Vertical));
    }

    #[test]
    fn test_edge_alignment_guides() {
        // dragged left edge near other's right edge; tops aligned
        let dragged = Bounds::from_origin(Point::new(10.2, 0.0), 4.0, 4.0);
        let other = Bounds::from_origin(Point::new(0.0, 0.0), 10.0, 8.0);
        let guides = detect_smart_guides(&[dragged], &[other], SMART_GUIDE_THRESHOLD_FT);
        assert!(guides
            .iter()
            .any(|g| g.axis == GuideAxis::Vertical && (g.position - 10.0).abs() < 1e-9));
        assert!(guides
            .iter()
            .any(|g| g.axis == GuideAxis::Horizontal && g.position.abs() < 1e-9));
    }

    #[test]
    fn test_guides_deduplicated() {
        let dragged = Bounds::from_center(Point::new(20.0, 20.0), 4.0, 4.0);
        let a = Bounds::from_center(Point::new(20.001, 0.0), 4.0, 4.0);
        let b = Bounds::from_center(Point::new(20.0, 40.0), 4.0, 4.0);
        let guides = detect_smart_guides(&[dragged], &[a, b], SMART_GUIDE_THRESHOLD_FT);
        let centers: Vec<_> = guides
            .iter()
            .filter(|g| g.axis == GuideAxis::Vertical && (g.position - 20.0).abs() < 0.01)
            .collect();
        assert_eq!(centers.len(), 1);
        assert!((centers[0].start + 2.0).abs() < 1e-9);
        assert!((centers[0].end - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_guides_when_far() {
        let dragged = Bounds::from_center(Point::new(5.0, 5.0), 2.0, 2.0);
        let other = Bounds::from_center(Point::new(30.0, 30.0), 2.0, 2.0);
        assert!(detect_smart_guides(&[dragged], &[other], SMART_GUIDE_THRESHOLD_FT).is_empty());
    }
}
