//! Seat assignment operations.
//!
//! This module is the only writer of entity seat maps. Every operation either
//! succeeds or returns an [`AssignError`] without touching any state, and
//! together they keep each attendee seated at most once across the plan.
//! Callers take their undo checkpoint before calling in.

use crate::entity::{AttendeeIndex, ChairBlock, Entity, EntityRef, RoundTable, SeatKey, SeatMap};
use crate::roster::Roster;
use std::collections::HashSet;
use thiserror::Error;

/// Why an assignment operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AssignError {
    #[error("Attendee is already assigned to a seat")]
    AlreadyAssigned,
    #[error("Attendee is disabled")]
    AttendeeDisabled,
    #[error("Seat is already occupied")]
    SeatOccupied,
    #[error("Seat does not exist")]
    NoSuchSeat,
    #[error("Entity not found")]
    EntityNotFound,
    #[error("Attendee is not on the roster")]
    UnknownAttendee,
    #[error("Venue elements have no seats")]
    NotSeatable,
}

/// Result type for assignment operations.
pub type AssignResult<T> = Result<T, AssignError>;

/// Every attendee currently holding a seat, across all entities.
pub fn build_assigned_set(entities: &[Entity]) -> HashSet<AttendeeIndex> {
    entities
        .iter()
        .filter_map(Entity::assignments)
        .flat_map(|map| map.values().copied())
        .collect()
}

/// Where an attendee is seated, if anywhere.
pub fn find_attendee(entities: &[Entity], attendee: AttendeeIndex) -> Option<(EntityRef, SeatKey)> {
    entities.iter().find_map(|entity| {
        entity
            .assignments()?
            .iter()
            .find(|&(_, &idx)| idx == attendee)
            .map(|(&key, _)| (entity.entity_ref(), key))
    })
}

fn position(entities: &[Entity], target: EntityRef) -> AssignResult<usize> {
    entities
        .iter()
        .position(|e| e.entity_ref() == target)
        .ok_or(AssignError::EntityNotFound)
}

/// Resolve a seatable entity and check the seat exists.
fn seat_slot(entities: &[Entity], target: EntityRef, seat: SeatKey) -> AssignResult<usize> {
    let idx = position(entities, target)?;
    let entity = &entities[idx];
    if !entity.kind().is_seatable() {
        return Err(AssignError::NotSeatable);
    }
    if !entity.has_seat(seat) {
        return Err(AssignError::NoSuchSeat);
    }
    Ok(idx)
}

fn check_eligible(roster: &Roster, attendee: AttendeeIndex) -> AssignResult<()> {
    if roster.get(attendee).is_none() {
        return Err(AssignError::UnknownAttendee);
    }
    if roster.is_disabled(attendee) {
        return Err(AssignError::AttendeeDisabled);
    }
    Ok(())
}

fn seat_map(entity: &mut Entity) -> AssignResult<&mut SeatMap> {
    entity.assignments_mut().ok_or(AssignError::NotSeatable)
}

/// Seat an attendee. Refuses if they are seated anywhere, disabled, or the
/// seat is taken.
pub fn assign(
    entities: &mut [Entity],
    roster: &Roster,
    target: EntityRef,
    seat: SeatKey,
    attendee: AttendeeIndex,
) -> AssignResult<()> {
    let idx = seat_slot(entities, target, seat)?;
    check_eligible(roster, attendee)?;
    if build_assigned_set(entities).contains(&attendee) {
        log::debug!("Refusing to seat attendee {attendee}: already assigned");
        return Err(AssignError::AlreadyAssigned);
    }
    let map = seat_map(&mut entities[idx])?;
    if map.contains_key(&seat) {
        log::debug!("Refusing to seat attendee {attendee}: {target:?} seat {seat} occupied");
        return Err(AssignError::SeatOccupied);
    }
    map.insert(seat, attendee);
    Ok(())
}

/// Seat an attendee, moving them from any previous seat and displacing the
/// current occupant. Returns the displaced attendee, if any.
pub fn force_assign(
    entities: &mut [Entity],
    roster: &Roster,
    target: EntityRef,
    seat: SeatKey,
    attendee: AttendeeIndex,
) -> AssignResult<Option<AttendeeIndex>> {
    let idx = seat_slot(entities, target, seat)?;
    check_eligible(roster, attendee)?;
    if find_attendee(entities, attendee) == Some((target, seat)) {
        return Ok(None);
    }
    unassign_attendee(entities, attendee);
    let displaced = seat_map(&mut entities[idx])?.insert(seat, attendee);
    if let Some(other) = displaced {
        log::debug!("Attendee {other} displaced from {target:?} seat {seat}");
    }
    Ok(displaced)
}

/// Seat an attendee at the first open seat of an entity (seat order, row-major
/// for blocks). Returns the chosen seat.
pub fn assign_next_open(
    entities: &mut [Entity],
    roster: &Roster,
    target: EntityRef,
    attendee: AttendeeIndex,
) -> AssignResult<SeatKey> {
    let idx = position(entities, target)?;
    if !entities[idx].kind().is_seatable() {
        return Err(AssignError::NotSeatable);
    }
    let seat = entities[idx]
        .open_seats()
        .into_iter()
        .next()
        .ok_or(AssignError::SeatOccupied)?;
    assign(entities, roster, target, seat, attendee)?;
    Ok(seat)
}

/// Clear one seat. Returns the attendee who was there.
pub fn unassign(entities: &mut [Entity], target: EntityRef, seat: SeatKey) -> Option<AttendeeIndex> {
    let idx = position(entities, target).ok()?;
    entities[idx].assignments_mut()?.remove(&seat)
}

/// Clear an attendee's seat wherever it is. Returns where they were.
pub fn unassign_attendee(entities: &mut [Entity], attendee: AttendeeIndex) -> Option<(EntityRef, SeatKey)> {
    let (target, seat) = find_attendee(entities, attendee)?;
    unassign(entities, target, seat).map(|_| (target, seat))
}

/// Exchange the occupants of two seats of one entity. With only one side
/// occupied this is a move; with neither it does nothing.
pub fn swap(entity: &mut Entity, a: SeatKey, b: SeatKey) -> AssignResult<()> {
    if !entity.kind().is_seatable() {
        return Err(AssignError::NotSeatable);
    }
    if !entity.has_seat(a) || !entity.has_seat(b) {
        return Err(AssignError::NoSuchSeat);
    }
    if a == b {
        return Ok(());
    }
    let map = seat_map(entity)?;
    let first = map.remove(&a);
    let second = map.remove(&b);
    if let Some(idx) = first {
        map.insert(b, idx);
    }
    if let Some(idx) = second {
        map.insert(a, idx);
    }
    Ok(())
}

/// Move an occupant from one seat to another, possibly on another entity.
///
/// Within one entity this is [`swap`]. Across entities the destination must be
/// empty. Moving from an empty seat is a no-op.
pub fn move_across_entities(
    entities: &mut [Entity],
    src: EntityRef,
    src_seat: SeatKey,
    dst: EntityRef,
    dst_seat: SeatKey,
) -> AssignResult<()> {
    if src == dst {
        let idx = position(entities, src)?;
        return swap(&mut entities[idx], src_seat, dst_seat);
    }
    let src_idx = seat_slot(entities, src, src_seat)?;
    let dst_idx = seat_slot(entities, dst, dst_seat)?;
    let Some(attendee) = entities[src_idx].assignments().and_then(|m| m.get(&src_seat).copied()) else {
        return Ok(());
    };
    if entities[dst_idx]
        .assignments()
        .is_some_and(|m| m.contains_key(&dst_seat))
    {
        return Err(AssignError::SeatOccupied);
    }
    seat_map(&mut entities[src_idx])?.remove(&src_seat);
    seat_map(&mut entities[dst_idx])?.insert(dst_seat, attendee);
    Ok(())
}

/// Seat index shift applied by one [`rotate_seats`] call.
pub fn rotation_shift(seats: u32) -> u32 {
    if seats < 4 { 1 } else { seats / 4 }
}

/// Rotate a round table's occupants a quarter turn clockwise around the ring.
pub fn rotate_seats(table: &mut RoundTable) {
    let seats = table.seats;
    if seats == 0 {
        return;
    }
    let shift = rotation_shift(seats);
    let rotated: SeatMap = std::mem::take(&mut table.assignments)
        .into_iter()
        .filter_map(|(key, attendee)| match key {
            SeatKey::Index(i) if i < seats => Some((SeatKey::Index((i + shift) % seats), attendee)),
            _ => None,
        })
        .collect();
    table.assignments = rotated;
}

/// Rotate a block's grid by 90 degrees, remapping `(r, c)` to
/// `(c, old_rows - 1 - r)` and swapping `rows`/`cols`. The top-left anchor is kept.
pub fn rotate_block(block: &mut ChairBlock) {
    let old_rows = block.rows;
    let old_cols = block.cols;
    let new_rows = old_cols;
    let new_cols = old_rows;
    let rotated: SeatMap = std::mem::take(&mut block.assignments)
        .into_iter()
        .filter_map(|(key, attendee)| match key {
            SeatKey::Cell { row, col } if row < old_rows && col < old_cols => {
                let (nr, nc) = (col, old_rows - 1 - row);
                (nr < new_rows && nc < new_cols).then_some((SeatKey::cell(nr, nc), attendee))
            }
            _ => None,
        })
        .collect();
    block.assignments = rotated;
    block.rows = new_rows;
    block.cols = new_cols;
}

/// Rotate any unlocked entity. Returns false for locked entities.
///
/// Round tables rotate their occupants, rectangular tables flip orientation,
/// blocks rotate their grid and venue elements swap width and height.
pub fn rotate(entity: &mut Entity) -> bool {
    if entity.is_locked() {
        return false;
    }
    match entity {
        Entity::RoundTable(t) => rotate_seats(t),
        Entity::RectTable(t) => t.orientation = t.orientation.toggled(),
        Entity::ChairBlock(b) => rotate_block(b),
        Entity::VenueElement(v) => std::mem::swap(&mut v.width, &mut v.height),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityKind, RectTable, VenueElement};
    use crate::geometry::Spacing;
    use crate::roster::Attendee;
    use kurbo::Point;

    fn roster(n: usize) -> Roster {
        Roster::new((0..n).map(|i| Attendee::new(format!("Last{i}"), format!("First{i}"))).collect())
    }

    fn setup() -> (Vec<Entity>, EntityRef, EntityRef) {
        let mut round = RoundTable::new(Point::new(10.0, 10.0), 5.0, 8);
        round.id = 1;
        let mut block = ChairBlock::new(Point::new(20.0, 5.0), 2, 3, Spacing::Normal);
        block.id = 1;
        let entities = vec![Entity::RoundTable(round), Entity::ChairBlock(block)];
        (
            entities,
            EntityRef::new(EntityKind::RoundTable, 1),
            EntityRef::new(EntityKind::ChairBlock, 1),
        )
    }

    fn seat_of(entities: &[Entity], target: EntityRef, seat: SeatKey) -> Option<AttendeeIndex> {
        entities
            .iter()
            .find(|e| e.entity_ref() == target)
            .and_then(|e| e.assignments())
            .and_then(|m| m.get(&seat).copied())
    }

    #[test]
    fn test_assign_and_reject_duplicates() {
        let (mut entities, table, block) = setup();
        let roster = roster(5);
        assert_eq!(assign(&mut entities, &roster, table, SeatKey::Index(0), 3), Ok(()));
        assert_eq!(
            assign(&mut entities, &roster, block, SeatKey::cell(0, 0), 3),
            Err(AssignError::AlreadyAssigned)
        );
        assert_eq!(
            assign(&mut entities, &roster, table, SeatKey::Index(0), 4),
            Err(AssignError::SeatOccupied)
        );
        assert_eq!(seat_of(&entities, table, SeatKey::Index(0)), Some(3));
    }

    #[test]
    fn test_assign_rejects_disabled_and_invalid() {
        let (mut entities, table, block) = setup();
        let mut roster = roster(3);
        roster.set_disabled(2, true);
        assert_eq!(
            assign(&mut entities, &roster, table, SeatKey::Index(1), 2),
            Err(AssignError::AttendeeDisabled)
        );
        assert_eq!(
            assign(&mut entities, &roster, table, SeatKey::Index(8), 0),
            Err(AssignError::NoSuchSeat)
        );
        assert_eq!(
            assign(&mut entities, &roster, block, SeatKey::Index(0), 0),
            Err(AssignError::NoSuchSeat)
        );
        assert_eq!(
            assign(&mut entities, &roster, table, SeatKey::Index(1), 9),
            Err(AssignError::UnknownAttendee)
        );
        assert!(build_assigned_set(&entities).is_empty());
    }

    #[test]
    fn test_force_assign_moves_and_displaces() {
        let (mut entities, table, block) = setup();
        let roster = roster(3);
        assign(&mut entities, &roster, table, SeatKey::Index(0), 0).unwrap();
        assign(&mut entities, &roster, block, SeatKey::cell(1, 1), 1).unwrap();

        let displaced = force_assign(&mut entities, &roster, block, SeatKey::cell(1, 1), 0).unwrap();
        assert_eq!(displaced, Some(1));
        assert_eq!(seat_of(&entities, table, SeatKey::Index(0)), None);
        assert_eq!(find_attendee(&entities, 0), Some((block, SeatKey::cell(1, 1))));
        assert_eq!(find_attendee(&entities, 1), None);
    }

    #[test]
    fn test_assign_next_open() {
        let (mut entities, table, _) = setup();
        let roster = roster(3);
        assign(&mut entities, &roster, table, SeatKey::Index(0), 0).unwrap();
        assert_eq!(assign_next_open(&mut entities, &roster, table, 1), Ok(SeatKey::Index(1)));
    }

    #[test]
    fn test_assign_next_open_full_table() {
        let mut small = RoundTable::new(Point::ZERO, 4.0, 1);
        small.id = 4;
        let mut entities = vec![Entity::RoundTable(small)];
        let target = EntityRef::new(EntityKind::RoundTable, 4);
        let roster = roster(2);
        assign_next_open(&mut entities, &roster, target, 0).unwrap();
        assert_eq!(
            assign_next_open(&mut entities, &roster, target, 1),
            Err(AssignError::SeatOccupied)
        );
    }

    #[test]
    fn test_venue_elements_not_seatable() {
        let mut stage = VenueElement::new(Point::ZERO, 10.0, 5.0);
        stage.id = 1;
        let mut entities = vec![Entity::VenueElement(stage)];
        let target = EntityRef::new(EntityKind::VenueElement, 1);
        assert_eq!(
            assign(&mut entities, &roster(1), target, SeatKey::Index(0), 0),
            Err(AssignError::NotSeatable)
        );
    }

    #[test]
    fn test_swap_twice_restores() {
        let (mut entities, table, _) = setup();
        let roster = roster(3);
        assign(&mut entities, &roster, table, SeatKey::Index(0), 0).unwrap();
        assign(&mut entities, &roster, table, SeatKey::Index(3), 1).unwrap();
        let before = entities.clone();

        swap(&mut entities[0], SeatKey::Index(0), SeatKey::Index(3)).unwrap();
        assert_eq!(seat_of(&entities, table, SeatKey::Index(0)), Some(1));
        assert_eq!(seat_of(&entities, table, SeatKey::Index(3)), Some(0));
        swap(&mut entities[0], SeatKey::Index(0), SeatKey::Index(3)).unwrap();
        assert_eq!(entities, before);
    }

    #[test]
    fn test_swap_one_sided_is_move() {
        let (mut entities, table, _) = setup();
        let roster = roster(1);
        assign(&mut entities, &roster, table, SeatKey::Index(2), 0).unwrap();
        swap(&mut entities[0], SeatKey::Index(2), SeatKey::Index(5)).unwrap();
        assert_eq!(seat_of(&entities, table, SeatKey::Index(2)), None);
        assert_eq!(seat_of(&entities, table, SeatKey::Index(5)), Some(0));
    }

    #[test]
    fn test_move_across_entities() {
        let (mut entities, table, block) = setup();
        let roster = roster(3);
        assign(&mut entities, &roster, table, SeatKey::Index(1), 0).unwrap();
        assign(&mut entities, &roster, block, SeatKey::cell(0, 0), 1).unwrap();

        assert_eq!(
            move_across_entities(&mut entities, table, SeatKey::Index(1), block, SeatKey::cell(0, 0)),
            Err(AssignError::SeatOccupied)
        );
        move_across_entities(&mut entities, table, SeatKey::Index(1), block, SeatKey::cell(0, 2)).unwrap();
        assert_eq!(find_attendee(&entities, 0), Some((block, SeatKey::cell(0, 2))));

        // Same entity delegates to swap
        move_across_entities(&mut entities, block, SeatKey::cell(0, 2), block, SeatKey::cell(0, 0)).unwrap();
        assert_eq!(find_attendee(&entities, 0), Some((block, SeatKey::cell(0, 0))));
        assert_eq!(find_attendee(&entities, 1), Some((block, SeatKey::cell(0, 2))));
    }

    #[test]
    fn test_global_exclusivity_after_mixed_operations() {
        let (mut entities, table, block) = setup();
        let roster = roster(6);
        for i in 0..4 {
            assign(&mut entities, &roster, table, SeatKey::Index(i), i as usize).unwrap();
        }
        force_assign(&mut entities, &roster, block, SeatKey::cell(0, 0), 2).unwrap();
        move_across_entities(&mut entities, table, SeatKey::Index(0), block, SeatKey::cell(1, 2)).unwrap();
        swap(&mut entities[0], SeatKey::Index(1), SeatKey::Index(7)).unwrap();
        let _ = assign(&mut entities, &roster, block, SeatKey::cell(0, 1), 1);

        let mut seen = HashSet::new();
        for entity in &entities {
            for &attendee in entity.assignments().unwrap().values() {
                assert!(seen.insert(attendee), "attendee {attendee} seated twice");
            }
        }
    }

    #[test]
    fn test_rotate_seats_scenario() {
        let mut table = RoundTable::new(Point::ZERO, 5.0, 8);
        table.assignments.insert(SeatKey::Index(0), 3);
        table.assignments.insert(SeatKey::Index(7), 4);
        rotate_seats(&mut table);
        assert_eq!(table.assignments.get(&SeatKey::Index(2)), Some(&3));
        assert_eq!(table.assignments.get(&SeatKey::Index(1)), Some(&4));
        assert_eq!(table.assignments.len(), 2);
    }

    #[test]
    fn test_rotation_shift_small_tables() {
        assert_eq!(rotation_shift(3), 1);
        assert_eq!(rotation_shift(10), 2);
    }

    #[test]
    fn test_rotate_block_four_times_restores() {
        let mut block = ChairBlock::new(Point::new(1.0, 1.0), 2, 3, Spacing::Normal);
        block.assignments.insert(SeatKey::cell(0, 0), 0);
        block.assignments.insert(SeatKey::cell(1, 2), 1);
        block.assignments.insert(SeatKey::cell(0, 1), 2);
        let original = block.clone();

        rotate_block(&mut block);
        assert_eq!((block.rows, block.cols), (3, 2));
        assert_eq!(block.assignments.get(&SeatKey::cell(0, 1)), Some(&0));
        assert_eq!(block.assignments.get(&SeatKey::cell(2, 0)), Some(&1));

        for _ in 0..3 {
            rotate_block(&mut block);
        }
        assert_eq!(block, original);
    }

    #[test]
    fn test_rotate_block_drops_stale_cells() {
        let mut block = ChairBlock::new(Point::ZERO, 2, 2, Spacing::Normal);
        block.assignments.insert(SeatKey::cell(5, 5), 0);
        block.assignments.insert(SeatKey::Index(0), 1);
        rotate_block(&mut block);
        assert!(block.assignments.is_empty());
    }

    #[test]
    fn test_rotate_respects_lock() {
        let mut table = RectTable::new(Point::ZERO, 6.0, 3.0, 3, 0);
        table.locked = true;
        let mut entity = Entity::RectTable(table);
        assert!(!rotate(&mut entity));
        entity.set_locked(false);
        assert!(rotate(&mut entity));
        assert!((entity.bounds().height() - 6.0).abs() < f64::EPSILON);
    }
}
