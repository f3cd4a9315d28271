//! Placeable entities: tables, chair blocks and venue elements.

mod chair_block;
mod rect_table;
mod round_table;
mod venue_element;

pub use chair_block::ChairBlock;
pub use rect_table::RectTable;
pub use round_table::RoundTable;
pub use venue_element::{VenueCategory, VenueElement};

use crate::geometry::Bounds;
use crate::roster::Roster;
use kurbo::{Point, Vec2};
use peniko::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Per-kind entity number. Never reused within a plan.
pub type EntityId = u32;

/// Index of an attendee in the roster.
pub type AttendeeIndex = usize;

/// Seat occupancy of one entity.
pub type SeatMap = BTreeMap<SeatKey, AttendeeIndex>;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Identifies one seat within an entity.
///
/// Tables use a 0-based index; chair blocks use a `row-col` cell. Serialized
/// as a string (`"3"`, `"1-2"`) so it can key a JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeatKey {
    Index(u32),
    Cell { row: u32, col: u32 },
}

impl SeatKey {
    pub fn cell(row: u32, col: u32) -> Self {
        SeatKey::Cell { row, col }
    }
}

impl fmt::Display for SeatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatKey::Index(i) => write!(f, "{i}"),
            SeatKey::Cell { row, col } => write!(f, "{row}-{col}"),
        }
    }
}

/// Error parsing a seat key string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid seat key: {0:?}")]
pub struct ParseSeatKeyError(String);

impl FromStr for SeatKey {
    type Err = ParseSeatKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseSeatKeyError(s.to_string());
        match s.split_once('-') {
            Some((row, col)) => Ok(SeatKey::Cell {
                row: row.trim().parse().map_err(|_| invalid())?,
                col: col.trim().parse().map_err(|_| invalid())?,
            }),
            None => s.trim().parse().map(SeatKey::Index).map_err(|_| invalid()),
        }
    }
}

impl Serialize for SeatKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeatKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A seat position in absolute room feet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seat {
    pub key: SeatKey,
    pub center: Point,
}

/// Entity variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    RoundTable,
    RectTable,
    ChairBlock,
    VenueElement,
}

impl EntityKind {
    /// Whether entities of this kind hold seat assignments.
    pub fn is_seatable(self) -> bool {
        !matches!(self, EntityKind::VenueElement)
    }

    /// Hit-test priority group; lower is checked first.
    pub(crate) fn hit_priority(self) -> u8 {
        match self {
            EntityKind::RoundTable | EntityKind::RectTable => 0,
            EntityKind::ChairBlock => 1,
            EntityKind::VenueElement => 2,
        }
    }
}

/// Stable reference to an entity within a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }
}

/// Capabilities shared by every placeable entity.
pub trait EntityTrait {
    /// Get the per-kind identifier.
    fn id(&self) -> EntityId;

    /// The stored anchor: center for tables and venue elements, top-left for blocks.
    fn anchor(&self) -> Point;

    /// Move the anchor.
    fn set_anchor(&mut self, anchor: Point);

    /// Body bounding box in absolute feet.
    fn bounds(&self) -> Bounds;

    /// Locked entities cannot be dragged, resized or rotated.
    fn is_locked(&self) -> bool;

    fn set_locked(&mut self, locked: bool);

    /// Seat centers in absolute feet, in seat-key order.
    fn seats(&self) -> Vec<Seat>;
}

/// Enum wrapper over all entity variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    RoundTable(RoundTable),
    RectTable(RectTable),
    ChairBlock(ChairBlock),
    VenueElement(VenueElement),
}

macro_rules! dispatch {
    ($self:expr, $e:ident => $body:expr) => {
        match $self {
            Entity::RoundTable($e) => $body,
            Entity::RectTable($e) => $body,
            Entity::ChairBlock($e) => $body,
            Entity::VenueElement($e) => $body,
        }
    };
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::RoundTable(_) => EntityKind::RoundTable,
            Entity::RectTable(_) => EntityKind::RectTable,
            Entity::ChairBlock(_) => EntityKind::ChairBlock,
            Entity::VenueElement(_) => EntityKind::VenueElement,
        }
    }

    pub fn id(&self) -> EntityId {
        dispatch!(self, e => e.id())
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.kind(), self.id())
    }

    pub(crate) fn set_id(&mut self, id: EntityId) {
        dispatch!(self, e => e.id = id)
    }

    pub fn anchor(&self) -> Point {
        dispatch!(self, e => e.anchor())
    }

    pub fn set_anchor(&mut self, anchor: Point) {
        dispatch!(self, e => e.set_anchor(anchor))
    }

    pub fn bounds(&self) -> Bounds {
        dispatch!(self, e => e.bounds())
    }

    pub fn is_locked(&self) -> bool {
        dispatch!(self, e => e.is_locked())
    }

    pub fn set_locked(&mut self, locked: bool) {
        dispatch!(self, e => e.set_locked(locked))
    }

    pub fn seats(&self) -> Vec<Seat> {
        dispatch!(self, e => e.seats())
    }

    /// Place the entity so its body is centered on `center`.
    pub fn set_center(&mut self, center: Point) {
        let current = self.bounds().center();
        let anchor = self.anchor() + (center - current);
        self.set_anchor(anchor);
    }

    /// Read-only view of the seat assignments (`None` for venue elements).
    pub fn assignments(&self) -> Option<&SeatMap> {
        match self {
            Entity::RoundTable(t) => Some(&t.assignments),
            Entity::RectTable(t) => Some(&t.assignments),
            Entity::ChairBlock(b) => Some(&b.assignments),
            Entity::VenueElement(_) => None,
        }
    }

    pub(crate) fn assignments_mut(&mut self) -> Option<&mut SeatMap> {
        match self {
            Entity::RoundTable(t) => Some(&mut t.assignments),
            Entity::RectTable(t) => Some(&mut t.assignments),
            Entity::ChairBlock(b) => Some(&mut b.assignments),
            Entity::VenueElement(_) => None,
        }
    }

    /// Whether `key` names a seat in the current geometry.
    pub fn has_seat(&self, key: SeatKey) -> bool {
        match (self, key) {
            (Entity::RoundTable(t), SeatKey::Index(i)) => i < t.seats,
            (Entity::RectTable(t), SeatKey::Index(i)) => i < t.capacity(),
            (Entity::ChairBlock(b), SeatKey::Cell { row, col }) => row < b.rows && col < b.cols,
            _ => false,
        }
    }

    /// Seat keys in order.
    pub fn seat_keys(&self) -> Vec<SeatKey> {
        self.seats().into_iter().map(|s| s.key).collect()
    }

    /// Number of seats.
    pub fn capacity(&self) -> u32 {
        match self {
            Entity::RoundTable(t) => t.seats,
            Entity::RectTable(t) => t.capacity(),
            Entity::ChairBlock(b) => b.rows * b.cols,
            Entity::VenueElement(_) => 0,
        }
    }

    /// The attendee at `key`, ignoring stale seats and attendees beyond the roster.
    pub fn occupant(&self, key: SeatKey, roster: &Roster) -> Option<AttendeeIndex> {
        if !self.has_seat(key) {
            return None;
        }
        self.assignments()?
            .get(&key)
            .copied()
            .filter(|&idx| roster.get(idx).is_some())
    }

    /// Number of seats whose occupant resolves against the roster.
    pub fn occupied(&self, roster: &Roster) -> usize {
        self.assignments()
            .map(|map| map.keys().filter(|&&k| self.occupant(k, roster).is_some()).count())
            .unwrap_or(0)
    }

    /// Seat keys with no assignment, in seat order.
    pub fn open_seats(&self) -> Vec<SeatKey> {
        let Some(map) = self.assignments() else {
            return Vec::new();
        };
        self.seat_keys()
            .into_iter()
            .filter(|k| !map.contains_key(k))
            .collect()
    }

    /// Drop assignments whose seat no longer exists. Returns how many were dropped.
    pub fn prune_assignments(&mut self) -> usize {
        let keys: Vec<SeatKey> = match self.assignments() {
            Some(map) => map.keys().copied().filter(|&k| !self.has_seat(k)).collect(),
            None => return 0,
        };
        if let Some(map) = self.assignments_mut() {
            for key in &keys {
                map.remove(key);
            }
        }
        if !keys.is_empty() {
            log::info!("Dropped {} stale assignment(s) from {:?}", keys.len(), self.entity_ref());
        }
        keys.len()
    }

    /// A copy with a new id, no assignments, unlocked, offset by `offset`.
    pub fn duplicate(&self, id: EntityId, offset: Vec2) -> Entity {
        let mut copy = self.clone();
        copy.set_id(id);
        copy.set_anchor(self.anchor() + offset);
        copy.set_locked(false);
        if let Some(map) = copy.assignments_mut() {
            map.clear();
        }
        copy
    }

    /// Rotate a quarter turn. See [`crate::assignment::rotate`].
    pub fn rotate(&mut self) -> bool {
        crate::assignment::rotate(self)
    }

    /// Clamp the anchor into `[0, width] x [0, height]`.
    pub fn clamp_to_room(&mut self, width: f64, height: f64) {
        let anchor = self.anchor();
        self.set_anchor(clamp_point(anchor, width, height));
    }

    pub fn as_venue_element(&self) -> Option<&VenueElement> {
        match self {
            Entity::VenueElement(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_venue_element_mut(&mut self) -> Option<&mut VenueElement> {
        match self {
            Entity::VenueElement(v) => Some(v),
            _ => None,
        }
    }
}

/// Clamp a point into the room rectangle.
pub fn clamp_point(point: Point, width: f64, height: f64) -> Point {
    Point::new(point.x.clamp(0.0, width.max(0.0)), point.y.clamp(0.0, height.max(0.0)))
}

impl From<RoundTable> for Entity {
    fn from(t: RoundTable) -> Self {
        Entity::RoundTable(t)
    }
}

impl From<RectTable> for Entity {
    fn from(t: RectTable) -> Self {
        Entity::RectTable(t)
    }
}

impl From<ChairBlock> for Entity {
    fn from(b: ChairBlock) -> Self {
        Entity::ChairBlock(b)
    }
}

impl From<VenueElement> for Entity {
    fn from(v: VenueElement) -> Self {
        Entity::VenueElement(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Attendee;

    #[test]
    fn test_seat_key_parse_and_display() {
        assert_eq!("3".parse::<SeatKey>(), Ok(SeatKey::Index(3)));
        assert_eq!("1-2".parse::<SeatKey>(), Ok(SeatKey::cell(1, 2)));
        assert!("x-2".parse::<SeatKey>().is_err());
        assert!("".parse::<SeatKey>().is_err());
        assert_eq!(SeatKey::cell(4, 0).to_string(), "4-0");
    }

    #[test]
    fn test_seat_key_as_json_map_key() {
        let mut map = SeatMap::new();
        map.insert(SeatKey::cell(0, 1), 7);
        map.insert(SeatKey::Index(2), 3);
        let json = serde_json::to_string(&map).unwrap();
        let back: SeatMap = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }

    #[test]
    fn test_occupant_tolerates_stale_references() {
        let mut table = RoundTable::new(Point::new(10.0, 10.0), 5.0, 4);
        table.assignments.insert(SeatKey::Index(0), 0);
        table.assignments.insert(SeatKey::Index(1), 99);
        table.assignments.insert(SeatKey::Index(9), 0);
        let entity = Entity::RoundTable(table);
        let roster = Roster::new(vec![Attendee::new("Lovelace", "Ada")]);

        assert_eq!(entity.occupant(SeatKey::Index(0), &roster), Some(0));
        assert_eq!(entity.occupant(SeatKey::Index(1), &roster), None);
        assert_eq!(entity.occupant(SeatKey::Index(9), &roster), None);
        assert_eq!(entity.occupied(&roster), 1);
    }

    #[test]
    fn test_prune_assignments() {
        let mut table = RoundTable::new(Point::new(10.0, 10.0), 5.0, 8);
        table.assignments.insert(SeatKey::Index(7), 1);
        table.assignments.insert(SeatKey::Index(1), 2);
        let mut entity = Entity::RoundTable(table);
        if let Entity::RoundTable(t) = &mut entity {
            t.seats = 4;
        }
        assert_eq!(entity.prune_assignments(), 1);
        assert_eq!(entity.assignments().map(|m| m.len()), Some(1));
    }

    #[test]
    fn test_duplicate_clears_assignments() {
        let mut block = ChairBlock::new(Point::new(2.0, 2.0), 2, 2, Default::default());
        block.assignments.insert(SeatKey::cell(0, 0), 5);
        block.locked = true;
        let entity = Entity::ChairBlock(block);
        let copy = entity.duplicate(9, Vec2::new(3.0, 3.0));
        assert_eq!(copy.id(), 9);
        assert_eq!(copy.anchor(), Point::new(5.0, 5.0));
        assert!(!copy.is_locked());
        assert_eq!(copy.assignments().map(|m| m.len()), Some(0));
    }

    #[test]
    fn test_set_center_respects_corner_anchor() {
        let mut entity = Entity::ChairBlock(ChairBlock::new(Point::ZERO, 2, 3, Default::default()));
        entity.set_center(Point::new(10.0, 10.0));
        // 3 cols x 2 rows at 2ft pitch is 6 x 4
        assert_eq!(entity.anchor(), Point::new(7.0, 8.0));
        assert_eq!(entity.bounds().center(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_open_seats_in_order() {
        let mut table = RoundTable::new(Point::ZERO, 5.0, 3);
        table.assignments.insert(SeatKey::Index(1), 0);
        let entity = Entity::RoundTable(table);
        assert_eq!(entity.open_seats(), vec![SeatKey::Index(0), SeatKey::Index(2)]);
    }

    #[test]
    fn test_color_roundtrip() {
        let color = SerializableColor::new(10, 20, 30, 255);
        let peniko_color: Color = color.into();
        assert_eq!(SerializableColor::from(peniko_color), color);
    }
}
