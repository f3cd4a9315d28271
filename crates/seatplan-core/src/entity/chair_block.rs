//! Chair block: a grid of loose chairs anchored at its top-left corner.

use super::{EntityId, EntityTrait, Seat, SeatKey, SeatMap};
use crate::geometry::{self, Bounds, Spacing};
use kurbo::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChairBlock {
    pub(crate) id: EntityId,
    /// Top-left corner of the grid.
    pub position: Point,
    pub rows: u32,
    pub cols: u32,
    #[serde(default)]
    pub spacing: Spacing,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub(crate) assignments: SeatMap,
}

impl ChairBlock {
    pub const DEFAULT_ROWS: u32 = 4;
    pub const DEFAULT_COLS: u32 = 6;

    /// Create an uncommitted block (id 0 until added to a plan).
    pub fn new(position: Point, rows: u32, cols: u32, spacing: Spacing) -> Self {
        Self {
            id: 0,
            position,
            rows,
            cols,
            spacing,
            name: None,
            locked: false,
            assignments: SeatMap::new(),
        }
    }

    /// Grid size as `(width, height)` in feet.
    pub fn extent(&self) -> (f64, f64) {
        geometry::block_extent(self.rows, self.cols, self.spacing)
    }
}

impl Default for ChairBlock {
    fn default() -> Self {
        Self::new(Point::ZERO, Self::DEFAULT_ROWS, Self::DEFAULT_COLS, Spacing::Normal)
    }
}

impl EntityTrait for ChairBlock {
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
        let (w, h) = self.extent();
        Bounds::from_origin(self.position, w, h)
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    fn seats(&self) -> Vec<Seat> {
        geometry::block_seat_offsets(self.rows, self.cols, self.spacing)
            .into_iter()
            .map(|(row, col, offset)| Seat {
                key: SeatKey::Cell { row, col },
                center: self.position + offset,
            })
            .collect()
    }
}
