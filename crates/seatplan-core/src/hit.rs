//! Hit testing: pointer position to handle, entity or seat.
//!
//! Entities are checked kind by kind (tables, then blocks, then venue
//! elements) and, within a kind, from the most recently added backwards so
//! the one drawn on top wins.

use crate::camera::Camera;
use crate::entity::{Entity, EntityRef, SeatKey};
use crate::geometry::{SEAT_DEPTH_FT, SEAT_RADIUS_FT};
use crate::selection::{Corner, Handle, Selection, resize_handles};
use kurbo::{Point, Rect};

/// Slack around entity bodies, in feet.
pub const HIT_MARGIN_FT: f64 = 0.5;
/// Room above a chair block reserved for its label, in feet.
pub const BLOCK_LABEL_MARGIN_FT: f64 = 1.0;

const PRIORITY_GROUPS: u8 = 3;

/// What lies under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// A resize handle of a selected venue element.
    Handle { entity: EntityRef, corner: Corner },
    /// An entity body.
    Entity(EntityRef),
    /// Empty space.
    None,
}

/// A seat under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatHit {
    pub entity: EntityRef,
    pub seat: SeatKey,
}

/// Entities in hit priority order.
fn in_priority_order(entities: &[Entity]) -> impl Iterator<Item = &Entity> {
    (0..PRIORITY_GROUPS).flat_map(move |group| {
        entities
            .iter()
            .rev()
            .filter(move |e| e.kind().hit_priority() == group)
    })
}

/// Resolve the pixel point to a handle, then an entity body.
pub fn hit_test(entities: &[Entity], selection: &Selection, camera: &Camera, point_px: Point) -> Hit {
    if let Some((entity, corner)) = hit_test_handles(entities, selection, camera, point_px) {
        return Hit::Handle { entity, corner };
    }
    match hit_test_entity(entities, camera.to_feet(point_px)) {
        Some(entity) => Hit::Entity(entity),
        None => Hit::None,
    }
}

/// Check the corner handles of selected, unlocked venue elements.
pub fn hit_test_handles(
    entities: &[Entity],
    selection: &Selection,
    camera: &Camera,
    point_px: Point,
) -> Option<(EntityRef, Corner)> {
    entities
        .iter()
        .rev()
        .filter(|e| selection.contains(e.entity_ref()) && !e.is_locked())
        .filter_map(|e| e.as_venue_element().map(|v| (e.entity_ref(), v)))
        .find_map(|(entity, venue)| {
            resize_handles(venue)
                .into_iter()
                .find(|h| Handle::hit_test_pixels(camera.to_pixels(h.position), point_px))
                .map(|h| (entity, h.corner))
        })
}

/// Whether a point in feet falls on an entity's hit area.
pub fn entity_contains(entity: &Entity, point: Point) -> bool {
    let body = entity.bounds().to_rect();
    match entity {
        Entity::RoundTable(t) => {
            (point - t.position).hypot() <= t.radius() + SEAT_RADIUS_FT + HIT_MARGIN_FT
        }
        Entity::RectTable(_) => inflated_contains(body, SEAT_DEPTH_FT + HIT_MARGIN_FT, point),
        Entity::VenueElement(_) => inflated_contains(body, HIT_MARGIN_FT, point),
        Entity::ChairBlock(_) => {
            let area = Rect::new(
                body.x0 - HIT_MARGIN_FT,
                body.y0 - HIT_MARGIN_FT - BLOCK_LABEL_MARGIN_FT,
                body.x1 + HIT_MARGIN_FT,
                body.y1 + HIT_MARGIN_FT,
            );
            closed_contains(area, point)
        }
    }
}

fn inflated_contains(rect: Rect, margin: f64, point: Point) -> bool {
    closed_contains(rect.inflate(margin, margin), point)
}

/// Rectangle containment including the far edges.
fn closed_contains(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// The topmost entity whose hit area contains the point (feet).
pub fn hit_test_entity(entities: &[Entity], point: Point) -> Option<EntityRef> {
    in_priority_order(entities)
        .find(|e| entity_contains(e, point))
        .map(Entity::entity_ref)
}

/// The seat under a point (feet).
///
/// Table seats are circles of seat radius; block seats are squares of one
/// grid pitch.
pub fn hit_test_seat(entities: &[Entity], point: Point) -> Option<SeatHit> {
    in_priority_order(entities).find_map(|entity| {
        let seat = match entity {
            Entity::RoundTable(_) | Entity::RectTable(_) => entity
                .seats()
                .into_iter()
                .find(|s| (point - s.center).hypot() <= SEAT_RADIUS_FT),
            Entity::ChairBlock(b) => {
                let half = b.spacing.feet() / 2.0;
                entity
                    .seats()
                    .into_iter()
                    .find(|s| (point.x - s.center.x).abs() <= half && (point.y - s.center.y).abs() <= half)
            }
            Entity::VenueElement(_) => None,
        }?;
        Some(SeatHit {
            entity: entity.entity_ref(),
            seat: seat.key,
        })
    })
}
