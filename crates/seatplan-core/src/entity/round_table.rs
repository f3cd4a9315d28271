//! Round table.

use super::{EntityId, EntityTrait, Seat, SeatKey, SeatMap};
use crate::geometry::{self, Bounds};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A round table with a uniform ring of seats. Seat 0 is the head seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTable {
    pub(crate) id: EntityId,
    /// Center of the table.
    pub position: Point,
    pub diameter: f64,
    pub seats: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub(crate) assignments: SeatMap,
}

impl RoundTable {
    pub const DEFAULT_DIAMETER: f64 = 5.0;
    pub const DEFAULT_SEATS: u32 = 8;

    /// Create an uncommitted table (id 0 until added to a plan).
    pub fn new(position: Point, diameter: f64, seats: u32) -> Self {
        Self {
            id: 0,
            position,
            diameter,
            seats,
            name: None,
            locked: false,
            assignments: SeatMap::new(),
        }
    }

    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }
}

impl Default for RoundTable {
    fn default() -> Self {
        Self::new(Point::ZERO, Self::DEFAULT_DIAMETER, Self::DEFAULT_SEATS)
    }
}

impl EntityTrait for RoundTable {
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
        Bounds::from_center(self.position, self.diameter, self.diameter)
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    fn seats(&self) -> Vec<Seat> {
        geometry::round_seat_offsets(self.diameter, self.seats)
            .into_iter()
            .enumerate()
            .map(|(i, offset)| Seat {
                key: SeatKey::Index(i as u32),
                center: self.position + offset,
            })
            .collect()
    }
}
