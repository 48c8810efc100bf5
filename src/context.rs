// PixelViewport
// copyright zipxing@hotmail.com 2022～2025

//! MapContext bundles the per-scene state the camera reads from the host:
//! map geometry, the entity registry and the numbered game variables.
//! The host creates one MapContext per map scene and threads it as &mut
//! into the controller's update methods.

use crate::entity::EntityRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Static geometry of the active map and screen, fixed for one scene.
/// Extents are in tiles, tile and screen sizes in pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapGeometry {
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub screen_width: u32,
    pub screen_height: u32,
    pub loop_horizontal: bool,
    pub loop_vertical: bool,
    pub parallax_loop_x: bool,
    pub parallax_loop_y: bool,
}

impl MapGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

impl Default for MapGeometry {
    fn default() -> Self {
        // stock engine screen and tile sizes
        Self {
            width: 17,
            height: 13,
            tile_width: 48,
            tile_height: 48,
            screen_width: 816,
            screen_height: 624,
            loop_horizontal: false,
            loop_vertical: false,
            parallax_loop_x: false,
            parallax_loop_y: false,
        }
    }
}

/// Numbered game variables, readable by command arguments via the $ prefix.
/// Unset variables read as 0, matching the event-script convention.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameVariables {
    data: HashMap<u32, f64>,
}

impl GameVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: u32) -> f64 {
        *self.data.get(&id).unwrap_or(&0.0)
    }

    pub fn set(&mut self, id: u32, value: f64) {
        self.data.insert(id, value);
    }
}

/// Everything the camera needs from the host for one map scene.
pub struct MapContext {
    pub map: MapGeometry,
    pub entities: EntityRegistry,
    pub vars: GameVariables,
}

impl MapContext {
    pub fn new(map: MapGeometry) -> Self {
        Self {
            map,
            entities: EntityRegistry::new(),
            vars: GameVariables::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_variable_reads_zero() {
        let vars = GameVariables::new();
        assert_eq!(vars.get(42), 0.0);
    }

    #[test]
    fn test_variable_roundtrip() {
        let mut vars = GameVariables::new();
        vars.set(3, -2.5);
        assert_eq!(vars.get(3), -2.5);
    }
}
