//! Rectangular table.

use super::{EntityId, EntityTrait, Seat, SeatKey, SeatMap};
use crate::geometry::{self, Bounds, MAX_END_SEATS, Orientation};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A rectangular table with seats on both long sides and optionally the ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectTable {
    pub(crate) id: EntityId,
    /// Center of the table.
    pub position: Point,
    /// Long dimension.
    pub width: f64,
    /// Short dimension.
    pub height: f64,
    #[serde(default)]
    pub orientation: Orientation,
    pub seats_per_long_side: u32,
    /// Seats on each short end, 0 to 3.
    #[serde(default)]
    pub end_seats: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub(crate) assignments: SeatMap,
}

impl RectTable {
    pub const DEFAULT_WIDTH: f64 = 6.0;
    pub const DEFAULT_HEIGHT: f64 = 2.5;
    pub const DEFAULT_SEATS_PER_SIDE: u32 = 3;

    /// Create an uncommitted table (id 0 until added to a plan).
    pub fn new(position: Point, width: f64, height: f64, seats_per_long_side: u32, end_seats: u32) -> Self {
        Self {
            id: 0,
            position,
            width,
            height,
            orientation: Orientation::Horizontal,
            seats_per_long_side,
            end_seats: end_seats.min(MAX_END_SEATS),
            name: None,
            locked: false,
            assignments: SeatMap::new(),
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Total seats: both long sides plus both ends.
    pub fn capacity(&self) -> u32 {
        2 * self.seats_per_long_side + 2 * self.end_seats.min(MAX_END_SEATS)
    }

    /// Footprint as `(x extent, y extent)` for the current orientation.
    pub fn footprint(&self) -> (f64, f64) {
        geometry::rect_footprint(self.width, self.height, self.orientation)
    }
}

impl Default for RectTable {
    fn default() -> Self {
        Self::new(
            Point::ZERO,
            Self::DEFAULT_WIDTH,
            Self::DEFAULT_HEIGHT,
            Self::DEFAULT_SEATS_PER_SIDE,
            0,
        )
    }
}

impl EntityTrait for RectTable {
    fn id(&self) -> EntityId {
        self.id
    }

    fn anchor(&self) -> Point {
        self.position
    }

    fn set_anchor(&mut self, anchor: Point) {
        self.position = anchor;
    }

    fn bounds(&self) -> Bounds {
        let (w, h) = self.footprint();
        Bounds::from_center(self.position, w, h)
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    fn seats(&self) -> Vec<Seat> {
        geometry::rect_seat_offsets(
            self.width,
            self.height,
            self.orientation,
            self.seats_per_long_side,
            self.end_seats,
        )
        .into_iter()
        .enumerate()
        .map(|(i, offset)| Seat {
            key: SeatKey::Index(i as u32),
            center: self.position + offset,
        })
        .collect()
    }
}
