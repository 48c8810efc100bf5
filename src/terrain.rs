// PixelViewport
// copyright zipxing@hotmail.com 2022～2025

//! Terrain-tag tile offsets.
//!
//! Every tile id maps to a flag word in the tileset; the high bits carry a
//! terrain tag (0..7). The TerrainOffsetTable turns a tag into a pixel
//! offset and an optional layer override, applied at paint time only: the
//! drawn position shifts, collision and event logic stay on the grid.
//!
//! The host tilemap renderer implements TileSink and calls paint_cell for
//! each visible map cell with that cell's four z-layer tile ids.

use crate::util::PointI32;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// terrain tag position inside the tileset flag word
pub const TERRAIN_TAG_SHIFT: u32 = 12;

bitflags! {
    /// Tileset flag word as stored in the host's tileset data.
    /// Only HIGHER matters here; the rest documents the word.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TileFlags: u16 {
        const IMPASSABLE_DOWN  = 0x0001;
        const IMPASSABLE_LEFT  = 0x0002;
        const IMPASSABLE_RIGHT = 0x0004;
        const IMPASSABLE_UP    = 0x0008;
        const HIGHER           = 0x0010;
        const LADDER           = 0x0020;
        const BUSH             = 0x0040;
        const COUNTER          = 0x0080;
        const DAMAGE_FLOOR     = 0x0100;
    }
}

/// Flag words for a loaded tileset, indexed by tile id.
#[derive(Debug, Clone, Default)]
pub struct Tileset {
    flags: Vec<TileFlags>,
}

impl Tileset {
    pub fn new(raw: Vec<u16>) -> Self {
        Self {
            flags: raw.into_iter().map(TileFlags::from_bits_retain).collect(),
        }
    }

    /// Terrain tag of a tile, 0 when untagged or out of range.
    pub fn terrain_tag(&self, tile_id: u32) -> u8 {
        self.flags
            .get(tile_id as usize)
            .map_or(0, |f| (f.bits() >> TERRAIN_TAG_SHIFT) as u8)
    }

    /// Whether the tile intrinsically draws above characters.
    pub fn is_higher(&self, tile_id: u32) -> bool {
        self.flags
            .get(tile_id as usize)
            .map_or(false, |f| f.contains(TileFlags::HIGHER))
    }
}

/// Which render layer a configured tag forces a tile into.
/// Normal and Unset both leave the intrinsic classification alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayerOverride {
    Upper,
    Normal,
    Lower,
    #[default]
    Unset,
}

impl LayerOverride {
    /// Parse the parameter spelling; anything unrecognized reads as Unset.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Upper" => LayerOverride::Upper,
            "Normal" => LayerOverride::Normal,
            "Lower" => LayerOverride::Lower,
            _ => LayerOverride::Unset,
        }
    }
}

/// Pixel offset and layer override for one terrain tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileOffset {
    pub offset: PointI32,
    pub layer: LayerOverride,
}

impl TileOffset {
    pub fn new(dx: i32, dy: i32, layer: LayerOverride) -> Self {
        Self {
            offset: PointI32 { x: dx, y: dy },
            layer,
        }
    }
}

/// Static tag -> offset mapping, loaded once at startup.
/// Unconfigured tags answer with a zero offset and an Unset layer.
#[derive(Debug, Clone, Default)]
pub struct TerrainOffsetTable {
    entries: [Option<TileOffset>; 8],
}

impl TerrainOffsetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, tag: u8, entry: TileOffset) {
        if let Some(slot) = self.entries.get_mut(tag as usize) {
            *slot = Some(entry);
        }
    }

    pub fn lookup(&self, tag: u8) -> TileOffset {
        self.entries
            .get(tag as usize)
            .and_then(|e| *e)
            .unwrap_or_default()
    }
}

/// The two tilemap render layers the host composites around characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileLayer {
    Upper,
    Lower,
}

/// A tile draws upper when it is intrinsically higher or the override says
/// Upper; an explicit Lower override wins over both.
pub fn resolve_layer(intrinsic_higher: bool, layer: LayerOverride) -> TileLayer {
    if layer == LayerOverride::Lower {
        return TileLayer::Lower;
    }
    if intrinsic_higher || layer == LayerOverride::Upper {
        TileLayer::Upper
    } else {
        TileLayer::Lower
    }
}

/// Paint seam the host tilemap renderer implements.
pub trait TileSink {
    fn draw_tile(&mut self, layer: TileLayer, tile_id: u32, x: i32, y: i32);
}

/// Paint one map cell's four z-layer tiles at base pixel position
/// (base_x, base_y), shifting each tile by its tag's configured offset.
/// At an overpass position the two upper z entries always draw to the
/// upper layer, matching the host's bridge rendering.
pub fn paint_cell<S: TileSink>(
    sink: &mut S,
    tileset: &Tileset,
    table: &TerrainOffsetTable,
    tiles: &[u32; 4],
    base_x: i32,
    base_y: i32,
    overpass: bool,
) {
    for (z, &tile_id) in tiles.iter().enumerate() {
        if tile_id == 0 {
            continue;
        }
        let entry = table.lookup(tileset.terrain_tag(tile_id));
        let x = base_x + entry.offset.x;
        let y = base_y + entry.offset.y;
        let layer = if z >= 2 && overpass {
            TileLayer::Upper
        } else {
            resolve_layer(tileset.is_higher(tile_id), entry.layer)
        };
        sink.draw_tile(layer, tile_id, x, y);
    }
}
