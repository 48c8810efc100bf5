// PixelViewport
// copyright zipxing@hotmail.com 2022～2025

//! Typed access to the host's plugin parameter map.
//!
//! Plugin parameters arrive as a flat string-to-string JSON object, exactly
//! as the host's plugin manager hands them out. Every getter coerces with a
//! default; a value that fails to parse yields the default rather than an
//! error, because parameters are author-edited data.

use crate::terrain::{LayerOverride, TerrainOffsetTable, TileOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginParams {
    values: HashMap<String, String>,
}

impl PluginParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a parameter map from a JSON object of strings.
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let params: PluginParams = serde_json::from_str(json)?;
        Ok(params)
    }

    /// Load a parameter map from a JSON file.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }

    pub fn string(&self, name: &str, def: &str) -> String {
        match self.values.get(name) {
            Some(v) => v.clone(),
            None => def.to_string(),
        }
    }

    pub fn bool(&self, name: &str, def: bool) -> bool {
        match self.values.get(name) {
            Some(v) => v == "true",
            None => def,
        }
    }

    pub fn uint(&self, name: &str, def: u32) -> u32 {
        match self.values.get(name).and_then(|v| v.trim().parse::<f64>().ok()) {
            Some(v) if v.is_finite() => (v.trunc()).clamp(0.0, i32::MAX as f64) as u32,
            _ => def,
        }
    }

    pub fn sint(&self, name: &str, def: i32) -> i32 {
        match self.values.get(name).and_then(|v| v.trim().parse::<f64>().ok()) {
            Some(v) if v.is_finite() => {
                (v.trunc()).clamp(i32::MIN as f64, i32::MAX as f64) as i32
            }
            _ => def,
        }
    }

    pub fn real(&self, name: &str, def: f32) -> f32 {
        match self.values.get(name).and_then(|v| v.trim().parse::<f32>().ok()) {
            Some(v) if v.is_finite() => v,
            _ => def,
        }
    }
}

/// Camera settings distilled from plugin parameters.
#[derive(Debug, Clone)]
pub struct ViewportParams {
    /// plugin-command name; empty disables the command surface
    pub command_name: String,
    pub initial_scale: f32,
    /// whether a move command may replace a job already in flight
    pub replace_in_flight: bool,
}

impl Default for ViewportParams {
    fn default() -> Self {
        Self {
            command_name: "camera".to_string(),
            initial_scale: 1.0,
            replace_in_flight: false,
        }
    }
}

impl ViewportParams {
    pub fn from_params(p: &PluginParams) -> Self {
        Self {
            command_name: p.string("Command Name", "camera"),
            initial_scale: p.real("Initial Scale", 1.0),
            replace_in_flight: p.bool("Replace In Flight", false),
        }
    }
}

/// Build the terrain offset table from the "Tag N ..." parameter group.
/// Disabled tags stay unconfigured and paint with default behavior.
pub fn terrain_offsets_from_params(p: &PluginParams) -> TerrainOffsetTable {
    let mut table = TerrainOffsetTable::new();
    for tag in 0u8..8 {
        if !p.bool(&format!("Tag {} Enable", tag), false) {
            continue;
        }
        let dx = p.sint(&format!("X Offset Tag {}", tag), 0);
        let dy = p.sint(&format!("Y Offset Tag {}", tag), 0);
        let layer = LayerOverride::from_name(&p.string(&format!("Layer Tag {}", tag), "Normal"));
        table.set(tag, TileOffset::new(dx, dy, layer));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coercion_defaults() {
        let mut p = PluginParams::new();
        p.insert("Flag", "true");
        p.insert("Count", "garbage");
        p.insert("Neg", "-5");
        p.insert("Frac", "10.7");

        assert!(p.bool("Flag", false));
        assert!(!p.bool("Missing", false));
        assert_eq!(p.uint("Count", 7), 7);
        assert_eq!(p.uint("Neg", 7), 0); // negatives clamp to zero
        assert_eq!(p.uint("Frac", 0), 10);
        assert_eq!(p.sint("Neg", 0), -5);
        assert_eq!(p.real("Missing", 1.5), 1.5);
        assert_eq!(p.string("Missing", "camera"), "camera");
    }

    #[test]
    fn test_from_json() {
        let p = PluginParams::from_json(
            r#"{"Command Name":"cam","Initial Scale":"1.25","Replace In Flight":"true"}"#,
        )
        .unwrap();
        let vp = ViewportParams::from_params(&p);
        assert_eq!(vp.command_name, "cam");
        assert_eq!(vp.initial_scale, 1.25);
        assert!(vp.replace_in_flight);
    }

    #[test]
    fn test_viewport_params_defaults() {
        let vp = ViewportParams::from_params(&PluginParams::new());
        assert_eq!(vp.command_name, "camera");
        assert_eq!(vp.initial_scale, 1.0);
        assert!(!vp.replace_in_flight);
    }

    #[test]
    fn test_terrain_offsets_from_params() {
        let mut p = PluginParams::new();
        p.insert("Tag 5 Enable", "true");
        p.insert("X Offset Tag 5", "4");
        p.insert("Y Offset Tag 5", "-2");
        p.insert("Layer Tag 5", "Lower");
        // configured but disabled
        p.insert("X Offset Tag 3", "99");

        let table = terrain_offsets_from_params(&p);
        let e = table.lookup(5);
        assert_eq!(e.offset.x, 4);
        assert_eq!(e.offset.y, -2);
        assert_eq!(e.layer, LayerOverride::Lower);
        assert_eq!(table.lookup(3), TileOffset::default());
    }
}
