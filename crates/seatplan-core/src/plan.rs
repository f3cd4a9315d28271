//! Seating plan document and undo history.

use crate::assignment::{self, AssignResult};
use crate::entity::{AttendeeIndex, Entity, EntityId, EntityKind, EntityRef, SeatKey};
use crate::geometry::{MAX_END_SEATS, Spacing};
use crate::roster::Roster;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Errors from building or loading a plan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid room size: {width} x {height}")]
    InvalidRoom { width: f64, height: f64 },
}

/// Result type for plan operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// The room, in feet. All entity anchors stay inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub width: f64,
    pub height: f64,
}

impl Room {
    pub fn new(width: f64, height: f64) -> PlanResult<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(PlanError::InvalidRoom { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Last id handed out per counter. Round and rectangular tables share one
/// counter so table numbers are unique.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCounters {
    pub tables: EntityId,
    pub blocks: EntityId,
    pub venue_elements: EntityId,
}

impl IdCounters {
    fn slot(&mut self, kind: EntityKind) -> &mut EntityId {
        match kind {
            EntityKind::RoundTable | EntityKind::RectTable => &mut self.tables,
            EntityKind::ChairBlock => &mut self.blocks,
            EntityKind::VenueElement => &mut self.venue_elements,
        }
    }

    /// Hand out the next id for a kind.
    pub fn next(&mut self, kind: EntityKind) -> EntityId {
        let slot = self.slot(kind);
        *slot += 1;
        *slot
    }

    /// Make sure future ids stay above `id`.
    fn observe(&mut self, kind: EntityKind, id: EntityId) {
        let slot = self.slot(kind);
        *slot = (*slot).max(id);
    }
}

/// A snapshot of plan state for undo/redo.
#[derive(Debug, Clone)]
struct PlanSnapshot {
    room: Room,
    entities: Vec<Entity>,
}

/// A seating plan: the room and everything placed in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatingPlan {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    room: Room,
    /// Entities in insertion order (back to front).
    entities: Vec<Entity>,
    #[serde(default)]
    counters: IdCounters,
    /// Undo history stack.
    #[serde(skip)]
    undo_stack: Vec<PlanSnapshot>,
    /// Redo history stack.
    #[serde(skip)]
    redo_stack: Vec<PlanSnapshot>,
}

impl SeatingPlan {
    /// Create an empty plan for a room of the given size in feet.
    pub fn new(width: f64, height: f64) -> PlanResult<Self> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            room: Room::new(width, height)?,
            entities: Vec::new(),
            counters: IdCounters::default(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        })
    }

    pub fn room(&self) -> Room {
        self.room
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn counters(&self) -> IdCounters {
        self.counters
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, entity: EntityRef) -> Option<&Entity> {
        self.entities.iter().find(|e| e.entity_ref() == entity)
    }

    /// Mutable access for geometry edits. Seat assignments stay read-only
    /// here; use the assignment methods.
    pub fn get_mut(&mut self, entity: EntityRef) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.entity_ref() == entity)
    }

    pub fn contains(&self, entity: EntityRef) -> bool {
        self.get(entity).is_some()
    }

    /// Commit an entity: give it the next id for its kind, clamp it into the
    /// room and put it on top.
    pub fn add(&mut self, mut entity: Entity) -> EntityRef {
        let id = self.counters.next(entity.kind());
        entity.set_id(id);
        entity.clamp_to_room(self.room.width, self.room.height);
        let entity_ref = entity.entity_ref();
        log::debug!("Added {entity_ref:?}");
        self.entities.push(entity);
        entity_ref
    }

    /// Remove an entity, freeing its seats.
    pub fn remove(&mut self, entity: EntityRef) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.entity_ref() == entity)?;
        log::debug!("Removed {entity:?}");
        Some(self.entities.remove(idx))
    }

    /// Duplicate an entity with a new id and no assignments, offset by
    /// `offset_ft` on both axes.
    pub fn copy(&mut self, entity: EntityRef, offset_ft: f64) -> Option<EntityRef> {
        let idx = self.entities.iter().position(|e| e.entity_ref() == entity)?;
        let id = self.counters.next(entity.kind);
        let mut copy = self.entities[idx].duplicate(id, Vec2::new(offset_ft, offset_ft));
        copy.clamp_to_room(self.room.width, self.room.height);
        let copy_ref = copy.entity_ref();
        log::debug!("Copied {entity:?} to {copy_ref:?}");
        self.entities.push(copy);
        Some(copy_ref)
    }

    /// Resize the room and pull every anchor back inside it.
    pub fn resize_room(&mut self, width: f64, height: f64) -> PlanResult<()> {
        self.room = Room::new(width, height)?;
        for entity in &mut self.entities {
            entity.clamp_to_room(width, height);
        }
        Ok(())
    }

    /// Take a snapshot of the current plan state for undo.
    fn snapshot(&self) -> PlanSnapshot {
        PlanSnapshot {
            room: self.room,
            entities: self.entities.clone(),
        }
    }

    fn restore(&mut self, snapshot: PlanSnapshot) {
        self.room = snapshot.room;
        self.entities = snapshot.entities;
    }

    /// Push current state to undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);

        // Clear redo stack when new changes are made
        self.redo_stack.clear();

        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
        log::debug!("Undo checkpoint ({} held)", self.undo_stack.len());
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.redo_stack.push(current);
        self.restore(snapshot);
        true
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.undo_stack.push(current);
        self.restore(snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of checkpoints on the undo stack.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    // --- Seating parameter edits ---

    /// Change a round table's seat count, dropping assignments to seats that
    /// no longer exist. Returns how many were dropped, or `None` if the
    /// entity is not a round table.
    pub fn set_seats(&mut self, entity: EntityRef, seats: u32) -> Option<usize> {
        let target = self.get_mut(entity)?;
        let Entity::RoundTable(table) = &mut *target else {
            return None;
        };
        table.seats = seats;
        Some(target.prune_assignments())
    }

    /// Change a rectangular table's seating.
    pub fn set_rect_seating(&mut self, entity: EntityRef, seats_per_long_side: u32, end_seats: u32) -> Option<usize> {
        let target = self.get_mut(entity)?;
        let Entity::RectTable(table) = &mut *target else {
            return None;
        };
        table.seats_per_long_side = seats_per_long_side;
        table.end_seats = end_seats.min(MAX_END_SEATS);
        Some(target.prune_assignments())
    }

    /// Change a chair block's grid.
    pub fn set_grid(&mut self, entity: EntityRef, rows: u32, cols: u32, spacing: Spacing) -> Option<usize> {
        let target = self.get_mut(entity)?;
        let Entity::ChairBlock(block) = &mut *target else {
            return None;
        };
        block.rows = rows;
        block.cols = cols;
        block.spacing = spacing;
        Some(target.prune_assignments())
    }

    // --- Assignments ---

    pub fn assign(&mut self, roster: &Roster, entity: EntityRef, seat: SeatKey, attendee: AttendeeIndex) -> AssignResult<()> {
        assignment::assign(&mut self.entities, roster, entity, seat, attendee)
    }

    pub fn force_assign(
        &mut self,
        roster: &Roster,
        entity: EntityRef,
        seat: SeatKey,
        attendee: AttendeeIndex,
    ) -> AssignResult<Option<AttendeeIndex>> {
        assignment::force_assign(&mut self.entities, roster, entity, seat, attendee)
    }

    pub fn assign_next_open(&mut self, roster: &Roster, entity: EntityRef, attendee: AttendeeIndex) -> AssignResult<SeatKey> {
        assignment::assign_next_open(&mut self.entities, roster, entity, attendee)
    }

    pub fn unassign(&mut self, entity: EntityRef, seat: SeatKey) -> Option<AttendeeIndex> {
        assignment::unassign(&mut self.entities, entity, seat)
    }

    pub fn unassign_attendee(&mut self, attendee: AttendeeIndex) -> Option<(EntityRef, SeatKey)> {
        assignment::unassign_attendee(&mut self.entities, attendee)
    }

    pub fn swap(&mut self, entity: EntityRef, a: SeatKey, b: SeatKey) -> AssignResult<()> {
        let target = self
            .entities
            .iter_mut()
            .find(|e| e.entity_ref() == entity)
            .ok_or(assignment::AssignError::EntityNotFound)?;
        assignment::swap(target, a, b)
    }

    pub fn move_across_entities(
        &mut self,
        src: EntityRef,
        src_seat: SeatKey,
        dst: EntityRef,
        dst_seat: SeatKey,
    ) -> AssignResult<()> {
        assignment::move_across_entities(&mut self.entities, src, src_seat, dst, dst_seat)
    }

    /// Rotate an entity. Returns false if it is missing or locked.
    pub fn rotate(&mut self, entity: EntityRef) -> bool {
        self.get_mut(entity).is_some_and(Entity::rotate)
    }

    /// Clear the attendee's seat, then mark them disabled.
    pub fn disable_attendee(&mut self, roster: &mut Roster, attendee: AttendeeIndex) -> Option<(EntityRef, SeatKey)> {
        let freed = self.unassign_attendee(attendee);
        roster.set_disabled(attendee, true);
        freed
    }

    pub fn enable_attendee(&self, roster: &mut Roster, attendee: AttendeeIndex) {
        roster.set_disabled(attendee, false);
    }

    // --- Aggregates ---

    /// Attendees seated anywhere.
    pub fn assigned_set(&self) -> HashSet<AttendeeIndex> {
        assignment::build_assigned_set(&self.entities)
    }

    pub fn total_capacity(&self) -> u32 {
        self.entities.iter().map(Entity::capacity).sum()
    }

    /// Seats whose occupant resolves against the roster, across the plan.
    pub fn total_assigned(&self, roster: &Roster) -> usize {
        self.entities.iter().map(|e| e.occupied(roster)).sum()
    }

    /// Enabled attendees without a seat, in roster order.
    pub fn unseated_attendees(&self, roster: &Roster) -> Vec<AttendeeIndex> {
        let assigned = self.assigned_set();
        roster
            .iter()
            .map(|(idx, _)| idx)
            .filter(|idx| !roster.is_disabled(*idx) && !assigned.contains(idx))
            .collect()
    }

    // --- Persistence ---

    /// Serialize the plan to JSON.
    pub fn to_json(&self) -> PlanResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PlanError::Serialization(e.to_string()))
    }

    /// Deserialize a plan from JSON.
    ///
    /// Stale seat keys and attendee indices are kept as-is and ignored at
    /// read time. Id counters are raised past every loaded id.
    pub fn from_json(json: &str) -> PlanResult<Self> {
        let mut plan: SeatingPlan = serde_json::from_str(json).map_err(|e| {
            log::warn!("Failed to load seating plan: {e}");
            PlanError::Serialization(e.to_string())
        })?;
        Room::new(plan.room.width, plan.room.height)?;
        for entity in &plan.entities {
            plan.counters.observe(entity.kind(), entity.id());
        }
        log::info!("Loaded seating plan {} with {} entities", plan.id, plan.entities.len());
        Ok(plan)
    }
}
