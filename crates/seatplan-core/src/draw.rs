//! Read-only draw model for the render consumer.
//!
//! Everything here is rebuilt from plan state on every call, so drawn
//! geometry always matches the current entity parameters.

use crate::camera::Camera;
use crate::entity::{AttendeeIndex, Entity, EntityKind, EntityRef, SeatKey};
use crate::geometry::SEAT_RADIUS_FT;
use crate::interaction::{CursorHint, Interaction};
use crate::plan::SeatingPlan;
use crate::roster::Roster;
use crate::selection::{Corner, HANDLE_SIZE_PX, resize_handles};
use crate::snap::SmartGuide;
use kurbo::{Point, Rect};
use peniko::Color;

/// Table top fill.
const TABLE_COLOR: Color = Color::from_rgba8(226, 232, 240, 255);
/// Chair block background.
const BLOCK_COLOR: Color = Color::from_rgba8(241, 245, 249, 255);

/// One seat, resolved against the roster.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatDraw {
    pub key: SeatKey,
    pub center_ft: Point,
    pub center_px: Point,
    pub radius_px: f64,
    /// Occupant, if the stored index is valid.
    pub occupant: Option<AttendeeIndex>,
    /// Short display name of the occupant.
    pub label: Option<String>,
    /// Seat 0 of a round table.
    pub is_head: bool,
}

/// One entity with its derived geometry.
#[derive(Debug, Clone)]
pub struct EntityDraw {
    pub entity: EntityRef,
    pub kind: EntityKind,
    pub anchor_ft: Point,
    pub bounds_ft: Rect,
    pub bounds_px: Rect,
    /// Round table radius in pixels.
    pub radius_px: Option<f64>,
    pub label: String,
    pub fill: Color,
    pub seats: Vec<SeatDraw>,
    pub occupied: usize,
    pub capacity: u32,
    pub selected: bool,
    pub locked: bool,
    pub ghost: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideDraw {
    pub guide: SmartGuide,
    pub from_px: Point,
    pub to_px: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleDraw {
    pub entity: EntityRef,
    pub corner: Corner,
    pub rect_px: Rect,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct DrawModel {
    /// The room rectangle in pixels.
    pub room_px: Rect,
    /// Pixels per foot.
    pub scale: f64,
    pub grid_size_ft: f64,
    /// Committed entities, back to front.
    pub entities: Vec<EntityDraw>,
    pub ghost: Option<EntityDraw>,
    pub guides: Vec<GuideDraw>,
    pub handles: Vec<HandleDraw>,
    pub cursor: CursorHint,
}

impl DrawModel {
    /// Build the frame. The camera is fitted to the plan's current room, so a
    /// resized or undone room never draws at a stale scale.
    pub fn build(plan: &SeatingPlan, camera: &Camera, interaction: &Interaction, roster: &Roster) -> Self {
        let room = plan.room();
        let camera = &camera.with_room(room.size());
        let selection = interaction.selection();
        let entities = plan
            .entities()
            .iter()
            .map(|e| entity_draw(e, camera, roster, selection.contains(e.entity_ref()), false))
            .collect();
        let ghost = interaction
            .ghost()
            .map(|g| entity_draw(g, camera, roster, false, true));
        let guides = interaction
            .guides()
            .iter()
            .map(|&guide| {
                let (from, to) = guide.endpoints();
                GuideDraw {
                    guide,
                    from_px: camera.to_pixels(from),
                    to_px: camera.to_pixels(to),
                }
            })
            .collect();

        let half = HANDLE_SIZE_PX / 2.0;
        let handles = plan
            .entities()
            .iter()
            .filter(|e| selection.contains(e.entity_ref()) && !e.is_locked())
            .filter_map(|e| e.as_venue_element().map(|v| (e.entity_ref(), v)))
            .flat_map(|(entity, venue)| {
                resize_handles(venue).into_iter().map(move |h| (entity, h))
            })
            .map(|(entity, h)| {
                let c = camera.to_pixels(h.position);
                HandleDraw {
                    entity,
                    corner: h.corner,
                    rect_px: Rect::new(c.x - half, c.y - half, c.x + half, c.y + half),
                }
            })
            .collect();

        Self {
            room_px: pixel_rect(camera, Rect::new(0.0, 0.0, room.width, room.height)),
            scale: camera.scale(),
            grid_size_ft: interaction.config().grid_size_ft,
            entities,
            ghost,
            guides,
            handles,
            cursor: interaction.cursor(),
        }
    }
}

fn pixel_rect(camera: &Camera, rect: Rect) -> Rect {
    Rect::from_points(camera.to_pixels(rect.origin()), camera.to_pixels(Point::new(rect.x1, rect.y1)))
}

fn entity_label(entity: &Entity) -> String {
    match entity {
        Entity::RoundTable(t) => t.name.clone().unwrap_or_else(|| format!("Table {}", t.id)),
        Entity::RectTable(t) => t.name.clone().unwrap_or_else(|| format!("Table {}", t.id)),
        Entity::ChairBlock(b) => b.name.clone().unwrap_or_else(|| format!("Block {}", b.id)),
        Entity::VenueElement(v) => v.display_label().to_string(),
    }
}

fn entity_draw(entity: &Entity, camera: &Camera, roster: &Roster, selected: bool, ghost: bool) -> EntityDraw {
    let bounds_ft = entity.bounds().to_rect();
    let seat_radius_px = camera.length_to_pixels(SEAT_RADIUS_FT);
    let seats = entity
        .seats()
        .into_iter()
        .map(|seat| {
            let occupant = entity.occupant(seat.key, roster);
            SeatDraw {
                key: seat.key,
                center_ft: seat.center,
                center_px: camera.to_pixels(seat.center),
                radius_px: seat_radius_px,
                occupant,
                label: occupant.and_then(|idx| roster.get(idx)).map(|a| a.short_name()),
                is_head: entity.kind() == EntityKind::RoundTable && seat.key == SeatKey::Index(0),
            }
        })
        .collect();
    let (radius_px, fill) = match entity {
        Entity::RoundTable(t) => (Some(camera.length_to_pixels(t.radius())), TABLE_COLOR),
        Entity::RectTable(_) => (None, TABLE_COLOR),
        Entity::ChairBlock(_) => (None, BLOCK_COLOR),
        Entity::VenueElement(v) => (None, v.color.into()),
    };

    EntityDraw {
        entity: entity.entity_ref(),
        kind: entity.kind(),
        anchor_ft: entity.anchor(),
        bounds_ft,
        bounds_px: pixel_rect(camera, bounds_ft),
        radius_px,
        label: entity_label(entity),
        fill,
        seats,
        occupied: entity.occupied(roster),
        capacity: entity.capacity(),
        selected,
        locked: entity.is_locked(),
        ghost,
    }
}
