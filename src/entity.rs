// PixelViewport
// copyright zipxing@hotmail.com 2022～2025

//! Trackable map entities and their movement events.
//!
//! Each entity carries a MoveEvent: an observer list of named subscribers
//! with a consumable pending flag per subscriber. Moving the entity emits
//! the event; subscribers poll and consume their flag once per frame.
//! Installing and removing a subscriber is fully reversible, so a camera
//! can re-target without leaving a stale hook on the old entity.

use crate::util::PointF32;
use std::collections::HashMap;

pub type EntityId = u32;

/// What kind of map object an entity is. The original engine told these
/// apart by runtime type names; here the kind travels with the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    MapEvent,
    Follower,
    Vehicle,
}

/// Movement event with an observer list of named subscribers.
/// emit marks every subscriber pending; check consumes one pending flag.
#[derive(Default)]
pub struct MoveEvent {
    subs: HashMap<String, bool>,
}

impl MoveEvent {
    pub fn register(&mut self, name: &str) {
        self.subs.entry(name.to_string()).or_insert(false);
    }

    pub fn unregister(&mut self, name: &str) {
        self.subs.remove(name);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.subs.contains_key(name)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subs.len()
    }

    pub fn emit(&mut self) {
        for flag in self.subs.values_mut() {
            if !(*flag) {
                *flag = true;
            }
        }
    }

    pub fn check(&mut self, name: &str) -> bool {
        if let Some(flag) = self.subs.get_mut(name) {
            if *flag {
                *flag = false;
                return true;
            }
        }
        false
    }
}

/// A movable map object the camera can track.
/// Position is in tile units with the map origin at the top left.
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: PointF32,
    pub on_move: MoveEvent,
}

/// Id-keyed registry of the scene's trackable entities.
/// The host owns entity logic; this only mirrors what the camera needs.
#[derive(Default)]
pub struct EntityRegistry {
    entities: HashMap<EntityId, Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: EntityId, kind: EntityKind, x: f32, y: f32) {
        self.entities.insert(
            id,
            Entity {
                id,
                kind,
                pos: PointF32::new(x, y),
                on_move: MoveEvent::default(),
            },
        );
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Move an entity to an absolute tile position and fire its move event.
    pub fn move_to(&mut self, id: EntityId, x: f32, y: f32) {
        if let Some(e) = self.entities.get_mut(&id) {
            e.pos = PointF32::new(x, y);
            e.on_move.emit();
        }
    }

    /// Move an entity by a tile-unit delta and fire its move event.
    pub fn move_by(&mut self, id: EntityId, dx: f32, dy: f32) {
        if let Some(e) = self.entities.get_mut(&id) {
            e.pos.x += dx;
            e.pos.y += dy;
            e.on_move.emit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_event_flags() {
        let mut ev = MoveEvent::default();
        ev.register("camera");

        // nothing pending before an emit
        assert!(!ev.check("camera"));

        ev.emit();
        assert!(ev.check("camera"));

        // consumed, so a second check is false
        assert!(!ev.check("camera"));
    }

    #[test]
    fn test_unregister_leaves_others() {
        let mut ev = MoveEvent::default();
        ev.register("camera");
        ev.register("minimap");
        ev.unregister("camera");

        assert!(!ev.is_registered("camera"));
        assert!(ev.is_registered("minimap"));

        ev.emit();
        assert!(!ev.check("camera"));
        assert!(ev.check("minimap"));
    }

    #[test]
    fn test_registry_move_emits() {
        let mut reg = EntityRegistry::new();
        reg.add(1, EntityKind::Player, 5.0, 5.0);
        reg.get_mut(1).unwrap().on_move.register("camera");

        reg.move_by(1, 1.0, 0.0);
        let e = reg.get_mut(1).unwrap();
        assert_eq!(e.pos.x, 6.0);
        assert!(e.on_move.check("camera"));
    }
}
