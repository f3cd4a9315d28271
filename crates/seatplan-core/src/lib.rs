//! SeatPlan Core Library
//!
//! Platform-agnostic layout geometry, interaction and seat assignment engine
//! for event seating plans. Hosts feed pointer and key events in, read a
//! [`DrawModel`] back out, and persist plans as JSON.

pub mod assignment;
pub mod camera;
pub mod config;
pub mod draw;
pub mod entity;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod interaction;
pub mod plan;
pub mod roster;
pub mod selection;
pub mod snap;

pub use assignment::{AssignError, AssignResult};
pub use camera::Camera;
pub use config::EngineConfig;
pub use draw::{DrawModel, EntityDraw, GuideDraw, HandleDraw, SeatDraw};
pub use entity::{
    AttendeeIndex, ChairBlock, Entity, EntityId, EntityKind, EntityRef, RectTable, RoundTable, Seat, SeatKey,
    VenueCategory, VenueElement,
};
pub use geometry::{Bounds, Orientation, Spacing};
pub use hit::{Hit, SeatHit};
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use interaction::{CursorHint, Gesture, Interaction};
pub use plan::{PlanError, PlanResult, Room, SeatingPlan};
pub use roster::{Attendee, Roster};
pub use selection::{Corner, Selection};
pub use snap::{GuideAxis, SmartGuide, SnapResult, snap_to_grid};
