//! Venue elements: stage, dance floor, bar and other non-seating fixtures.

use super::{EntityId, EntityTrait, Seat, SerializableColor};
use crate::geometry::Bounds;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// What a venue element represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VenueCategory {
    Stage,
    DanceFloor,
    Bar,
    Buffet,
    Dj,
    Entrance,
    #[default]
    Custom,
}

impl VenueCategory {
    /// Default `(width, height)` in feet for a new element.
    pub fn default_size(self) -> (f64, f64) {
        match self {
            VenueCategory::Stage => (16.0, 8.0),
            VenueCategory::DanceFloor => (12.0, 12.0),
            VenueCategory::Bar => (8.0, 3.0),
            VenueCategory::Buffet => (10.0, 3.0),
            VenueCategory::Dj => (6.0, 4.0),
            VenueCategory::Entrance => (6.0, 2.0),
            VenueCategory::Custom => (6.0, 6.0),
        }
    }

    pub fn default_color(self) -> SerializableColor {
        match self {
            VenueCategory::Stage => SerializableColor::new(71, 85, 105, 255),
            VenueCategory::DanceFloor => SerializableColor::new(250, 204, 21, 160),
            VenueCategory::Bar => SerializableColor::new(146, 64, 14, 255),
            VenueCategory::Buffet => SerializableColor::new(22, 163, 74, 200),
            VenueCategory::Dj => SerializableColor::new(124, 58, 237, 255),
            VenueCategory::Entrance => SerializableColor::new(148, 163, 184, 255),
            VenueCategory::Custom => SerializableColor::new(203, 213, 225, 255),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            VenueCategory::Stage => "Stage",
            VenueCategory::DanceFloor => "Dance Floor",
            VenueCategory::Bar => "Bar",
            VenueCategory::Buffet => "Buffet",
            VenueCategory::Dj => "DJ",
            VenueCategory::Entrance => "Entrance",
            VenueCategory::Custom => "Element",
        }
    }
}

/// A resizable, center-anchored rectangle with no seats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueElement {
    pub(crate) id: EntityId,
    /// Center of the element.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub category: VenueCategory,
    #[serde(default)]
    pub label: Option<String>,
    pub color: SerializableColor,
    #[serde(default)]
    pub locked: bool,
}

impl VenueElement {
    /// Create an uncommitted element (id 0 until added to a plan).
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: 0,
            position,
            width,
            height,
            category: VenueCategory::Custom,
            label: None,
            color: VenueCategory::Custom.default_color(),
            locked: false,
        }
    }

    /// Create an element with the category's default size and color.
    pub fn of_category(position: Point, category: VenueCategory) -> Self {
        let (width, height) = category.default_size();
        Self {
            category,
            color: category.default_color(),
            ..Self::new(position, width, height)
        }
    }

    /// Label shown on the element, falling back to the category name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(self.category.display_name())
    }
}

impl EntityTrait for VenueElement {
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
        Bounds::from_center(self.position, self.width, self.height)
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    fn seats(&self) -> Vec<Seat> {
        Vec::new()
    }
}
