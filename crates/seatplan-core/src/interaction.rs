//! Interaction state machine: pointer and key events to plan mutations.
//!
//! Exactly one [`Gesture`] is active at a time. Pointer-down picks the
//! gesture, pointer-move advances it and pointer-up returns to idle (except
//! ghost placement, which waits for the next pointer-down). Each discrete
//! action takes at most one undo checkpoint, immediately before its first
//! mutation.

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::entity::{Entity, EntityRef, clamp_point};
use crate::hit::{self, Hit};
use crate::input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::plan::SeatingPlan;
use crate::selection::{DragState, ResizeState, Selection, apply_resize};
use crate::snap::{self, SMART_GUIDE_THRESHOLD_FT, SmartGuide};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pointer travel, in feet, before a press on an entity becomes a drag.
pub const DRAG_THRESHOLD_FT: f64 = 0.5;
/// Pointer travel, in pixels, before a press on empty space becomes a pan.
pub const PAN_CLICK_THRESHOLD_PX: f64 = 3.0;

/// Cursor the host should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorHint {
    #[default]
    Default,
    Crosshair,
    Move,
    Grabbing,
    ResizeNwse,
    ResizeNesw,
    Panning,
    NotAllowed,
}

/// State of a press on empty space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanState {
    pub button: MouseButton,
    pub start_px: Point,
    pub last_px: Point,
    /// Set once the pointer has moved past the click threshold.
    pub moved: bool,
}

/// The active gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    /// An uncommitted entity following the pointer.
    PlacingGhost(Entity),
    DraggingSingle(DragState),
    DraggingMulti(DragState),
    Resizing(ResizeState),
    Panning(PanState),
    /// A modifier+wheel zoom; ends at the next pointer event.
    ZoomGesture,
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

/// Ephemeral interaction state: gesture, selection, guides and cursor.
/// None of it is persisted or undo-tracked.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    gesture: Gesture,
    selection: Selection,
    guides: Vec<SmartGuide>,
    cursor: CursorHint,
    config: EngineConfig,
}

impl Interaction {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Smart guides for the current drag.
    pub fn guides(&self) -> &[SmartGuide] {
        &self.guides
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    /// The pending ghost entity, if placing.
    pub fn ghost(&self) -> Option<&Entity> {
        match &self.gesture {
            Gesture::PlacingGhost(ghost) => Some(ghost),
            _ => None,
        }
    }

    /// Start placing a new entity, shown as a ghost centered in the room.
    /// Replaces a pending ghost; refused while another gesture is active.
    pub fn begin_placement(&mut self, plan: &SeatingPlan, mut entity: Entity) -> bool {
        if !matches!(
            self.gesture,
            Gesture::Idle | Gesture::PlacingGhost(_) | Gesture::ZoomGesture
        ) {
            return false;
        }
        entity.set_locked(false);
        self.position_ghost(plan, &mut entity, plan.room().center());
        log::debug!("Placing {:?}", entity.kind());
        self.gesture = Gesture::PlacingGhost(entity);
        self.cursor = CursorHint::Crosshair;
        true
    }

    /// Discard a pending ghost. Returns true if there was one.
    pub fn cancel_placement(&mut self) -> bool {
        if !matches!(self.gesture, Gesture::PlacingGhost(_)) {
            return false;
        }
        log::debug!("Placement cancelled");
        self.gesture = Gesture::Idle;
        self.cursor = CursorHint::Default;
        true
    }

    fn position_ghost(&self, plan: &SeatingPlan, ghost: &mut Entity, center: Point) {
        let room = plan.room();
        ghost.set_center(center);
        ghost.clamp_to_room(room.width, room.height);
        if let Some(grid) = self.config.snap_grid() {
            snap::snap_entity(ghost, grid);
            ghost.clamp_to_room(room.width, room.height);
        }
    }

    fn commit_ghost(&mut self, plan: &mut SeatingPlan) -> Option<EntityRef> {
        let Gesture::PlacingGhost(ghost) = std::mem::take(&mut self.gesture) else {
            return None;
        };
        plan.push_undo();
        let entity = plan.add(ghost);
        log::info!("Placed {entity:?}");
        self.selection.select_only(entity);
        self.cursor = CursorHint::Move;
        Some(entity)
    }

    /// Feed a pointer event. Returns true if the plan, camera or visible
    /// interaction state changed. The camera is refitted to the plan's
    /// current room first.
    pub fn handle_pointer(&mut self, plan: &mut SeatingPlan, camera: &mut Camera, event: PointerEvent) -> bool {
        camera.room = plan.room().size();
        if !matches!(event, PointerEvent::Scroll { .. }) && matches!(self.gesture, Gesture::ZoomGesture) {
            self.gesture = Gesture::Idle;
        }
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => self.handle_press(plan, camera, position, button, modifiers),
            PointerEvent::Move { position } => self.handle_drag(plan, camera, position),
            PointerEvent::Up { position, .. } => self.handle_release(plan, camera, position),
            PointerEvent::Scroll {
                position,
                delta,
                modifiers,
            } => self.handle_scroll(camera, position, delta, modifiers),
        }
    }

    fn handle_press(
        &mut self,
        plan: &mut SeatingPlan,
        camera: &Camera,
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    ) -> bool {
        let point = camera.to_feet(position);

        if let Gesture::PlacingGhost(ghost) = &self.gesture {
            if button == MouseButton::Right {
                return self.cancel_placement();
            }
            let mut placed = ghost.clone();
            self.position_ghost(plan, &mut placed, point);
            self.gesture = Gesture::PlacingGhost(placed);
            return self.commit_ghost(plan).is_some();
        }
        if !self.gesture.is_idle() {
            return false;
        }

        match button {
            MouseButton::Left => {}
            MouseButton::Middle => {
                self.begin_pan(position, MouseButton::Middle);
                return true;
            }
            MouseButton::Right => return false,
        }

        match hit::hit_test(plan.entities(), &self.selection, camera, position) {
            Hit::Handle { entity, corner } => {
                let Some(target) = plan.get(entity) else {
                    return false;
                };
                log::debug!("Resize {entity:?} from {corner:?}");
                self.gesture = Gesture::Resizing(ResizeState::new(entity, corner, &target.bounds()));
                self.cursor = resize_cursor(corner.is_nwse());
                true
            }
            Hit::Entity(entity) => {
                if modifiers.toggles_selection() {
                    self.selection.toggle(entity);
                    return true;
                }
                let multi = self.selection.is_multi() && self.selection.contains(entity);
                if !multi {
                    self.selection.select_only(entity);
                }
                let originals: BTreeMap<EntityRef, Point> = self
                    .selection
                    .iter()
                    .filter_map(|r| plan.get(r))
                    .filter(|e| !e.is_locked())
                    .map(|e| (e.entity_ref(), e.anchor()))
                    .collect();
                let state = DragState::new(point, originals);
                self.gesture = if multi {
                    Gesture::DraggingMulti(state)
                } else {
                    Gesture::DraggingSingle(state)
                };
                self.cursor = CursorHint::Grabbing;
                true
            }
            Hit::None => {
                self.begin_pan(position, MouseButton::Left);
                true
            }
        }
    }

    fn begin_pan(&mut self, position: Point, button: MouseButton) {
        self.gesture = Gesture::Panning(PanState {
            button,
            start_px: position,
            last_px: position,
            moved: false,
        });
        self.cursor = CursorHint::Panning;
    }

    fn handle_drag(&mut self, plan: &mut SeatingPlan, camera: &mut Camera, position: Point) -> bool {
        let point = camera.to_feet(position);
        let room = plan.room();

        match &mut self.gesture {
            Gesture::Idle | Gesture::ZoomGesture => {
                let cursor = self.hover_cursor(plan, camera, position);
                let changed = cursor != self.cursor;
                self.cursor = cursor;
                changed
            }
            Gesture::PlacingGhost(ghost) => {
                let mut moved = ghost.clone();
                self.position_ghost(plan, &mut moved, point);
                self.gesture = Gesture::PlacingGhost(moved);
                true
            }
            Gesture::DraggingSingle(state) | Gesture::DraggingMulti(state) => {
                if !advance_drag(plan, state, point, &self.config) {
                    return false;
                }
                self.guides = if self.config.smart_guides {
                    drag_guides(plan, &state.original_anchors)
                } else {
                    Vec::new()
                };
                true
            }
            Gesture::Resizing(state) => {
                let Some(target) = plan.get(state.entity) else {
                    return false;
                };
                if target.is_locked() {
                    return false;
                }
                if !state.changed {
                    plan.push_undo();
                    state.changed = true;
                }
                let pointer = clamp_point(point, room.width, room.height);
                let grid = self.config.snap_grid();
                if let Some(venue) = plan
                    .get_mut(state.entity)
                    .and_then(Entity::as_venue_element_mut)
                {
                    apply_resize(venue, state.anchor, pointer, grid);
                    venue.position = clamp_point(venue.position, room.width, room.height);
                }
                true
            }
            Gesture::Panning(pan) => {
                if !pan.moved && (position - pan.start_px).hypot() < PAN_CLICK_THRESHOLD_PX {
                    return false;
                }
                pan.moved = true;
                camera.pan_by(position - pan.last_px);
                pan.last_px = position;
                true
            }
        }
    }

    fn handle_release(&mut self, plan: &SeatingPlan, camera: &Camera, position: Point) -> bool {
        match std::mem::take(&mut self.gesture) {
            ghost @ Gesture::PlacingGhost(_) => {
                self.gesture = ghost;
                return false;
            }
            // A click on empty space deselects.
            Gesture::Panning(pan) if !pan.moved && pan.button == MouseButton::Left => {
                self.selection.clear();
            }
            Gesture::DraggingSingle(state) | Gesture::DraggingMulti(state) if state.activated => {
                log::debug!("Moved {} entities by {:?}", state.original_anchors.len(), state.delta());
            }
            Gesture::Resizing(state) if state.changed => {
                log::debug!("Resized {:?}", state.entity);
            }
            _ => {}
        }
        self.guides.clear();
        self.cursor = self.hover_cursor(plan, camera, position);
        true
    }

    fn handle_scroll(&mut self, camera: &mut Camera, position: Point, delta: Vec2, modifiers: Modifiers) -> bool {
        if !matches!(self.gesture, Gesture::Idle | Gesture::ZoomGesture) {
            return false;
        }
        if modifiers.zooms() {
            let before = camera.zoom_level;
            if delta.y < 0.0 {
                camera.zoom_in_at(position);
            } else if delta.y > 0.0 {
                camera.zoom_out_at(position);
            }
            self.gesture = Gesture::ZoomGesture;
            return camera.zoom_level != before;
        }
        if delta == Vec2::ZERO {
            return false;
        }
        camera.pan_by(-delta);
        true
    }

    fn hover_cursor(&self, plan: &SeatingPlan, camera: &Camera, position: Point) -> CursorHint {
        match hit::hit_test(plan.entities(), &self.selection, camera, position) {
            Hit::Handle { corner, .. } => resize_cursor(corner.is_nwse()),
            Hit::Entity(entity) => match plan.get(entity) {
                Some(e) if e.is_locked() => CursorHint::NotAllowed,
                _ => CursorHint::Move,
            },
            Hit::None => CursorHint::Default,
        }
    }

    /// Feed a key event. Returns true if anything changed.
    pub fn handle_key(&mut self, plan: &mut SeatingPlan, event: KeyEvent) -> bool {
        let KeyEvent::Pressed(key) = event else {
            return false;
        };
        match key {
            Key::Escape => {
                if self.cancel_placement() {
                    return true;
                }
                if self.gesture.is_idle() && !self.selection.is_empty() {
                    self.selection.clear();
                    return true;
                }
                false
            }
            Key::Delete => self.delete_selected(plan) > 0,
            Key::Rotate => {
                if let Gesture::PlacingGhost(ghost) = &mut self.gesture {
                    return ghost.rotate();
                }
                self.rotate_selected(plan) > 0
            }
        }
    }

    /// Unlocked selected entities, when idle.
    fn actionable(&self, plan: &SeatingPlan) -> Vec<EntityRef> {
        if !self.gesture.is_idle() {
            return Vec::new();
        }
        self.selection
            .iter()
            .filter(|&r| plan.get(r).is_some_and(|e| !e.is_locked()))
            .collect()
    }

    /// Delete selected unlocked entities under one undo checkpoint.
    pub fn delete_selected(&mut self, plan: &mut SeatingPlan) -> usize {
        let targets = self.actionable(plan);
        if targets.is_empty() {
            return 0;
        }
        plan.push_undo();
        for &entity in &targets {
            plan.remove(entity);
        }
        self.selection.retain_existing(plan.entities());
        log::info!("Deleted {} entities", targets.len());
        targets.len()
    }

    /// Rotate selected unlocked entities under one undo checkpoint.
    pub fn rotate_selected(&mut self, plan: &mut SeatingPlan) -> usize {
        let targets = self.actionable(plan);
        if targets.is_empty() {
            return 0;
        }
        plan.push_undo();
        let rotated = targets.iter().filter(|&&r| plan.rotate(r)).count();
        log::debug!("Rotated {rotated} entities");
        rotated
    }

    /// Copy the selected entities under one undo checkpoint and select the copies.
    pub fn copy_selected(&mut self, plan: &mut SeatingPlan) -> Vec<EntityRef> {
        if !self.gesture.is_idle() || self.selection.is_empty() {
            return Vec::new();
        }
        plan.push_undo();
        let sources: Vec<EntityRef> = self.selection.iter().collect();
        let copies: Vec<EntityRef> = sources
            .into_iter()
            .filter_map(|r| plan.copy(r, self.config.copy_offset_ft))
            .collect();
        self.selection.clear();
        for &copy in &copies {
            self.selection.add(copy);
        }
        copies
    }

    /// Drop state that refers to entities no longer in the plan, e.g. after
    /// undo or redo.
    pub fn sync_with_plan(&mut self, plan: &SeatingPlan) {
        self.selection.retain_existing(plan.entities());
        let stale = match &self.gesture {
            Gesture::DraggingSingle(state) | Gesture::DraggingMulti(state) => {
                state.original_anchors.keys().any(|&r| !plan.contains(r))
            }
            Gesture::Resizing(state) => !plan.contains(state.entity),
            _ => false,
        };
        if stale {
            self.gesture = Gesture::Idle;
            self.guides.clear();
        }
    }
}

fn resize_cursor(nwse: bool) -> CursorHint {
    if nwse {
        CursorHint::ResizeNwse
    } else {
        CursorHint::ResizeNesw
    }
}

/// Apply the pointer position to a drag. Returns false while the pointer is
/// still within the drag threshold.
fn advance_drag(plan: &mut SeatingPlan, state: &mut DragState, point: Point, config: &EngineConfig) -> bool {
    state.current_point = point;
    let delta = state.delta();
    if !state.activated {
        if delta.hypot() <= DRAG_THRESHOLD_FT {
            return false;
        }
        state.activated = true;
        if !state.original_anchors.is_empty() {
            plan.push_undo();
        }
        log::debug!("Drag started for {} entities", state.original_anchors.len());
    }

    let room = plan.room();
    let grid = config.snap_grid();
    for (&entity, &origin) in &state.original_anchors {
        let Some(target) = plan.get_mut(entity) else {
            continue;
        };
        if target.is_locked() {
            continue;
        }
        target.set_anchor(clamp_point(origin + delta, room.width, room.height));
        if let Some(grid) = grid {
            snap::snap_entity(target, grid);
            target.clamp_to_room(room.width, room.height);
        }
    }
    true
}

/// Alignment guides between the moving entities and everything else.
fn drag_guides(plan: &SeatingPlan, moving: &BTreeMap<EntityRef, Point>) -> Vec<SmartGuide> {
    let (dragged, others): (Vec<&Entity>, Vec<&Entity>) = plan
        .entities()
        .iter()
        .partition(|e| moving.contains_key(&e.entity_ref()));
    let dragged: Vec<_> = dragged.iter().map(|e| e.bounds()).collect();
    let others: Vec<_> = others.iter().map(|e| e.bounds()).collect();
    snap::detect_smart_guides(&dragged, &others, SMART_GUIDE_THRESHOLD_FT)
}
