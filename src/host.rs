//! Boundary with the host game client.
//!
//! The radar never talks to the game directly; everything it needs is asked
//! through these traits. An in-memory [`StaticTerrain`] exists for offline
//! use and tests.

use crate::location::*;
use fnv::{FnvHashMap, FnvHashSet};

/// Land tile lookups. Both queries must answer synchronously.
pub trait TerrainSource {
    /// Land tile id at a world coordinate, or `None` when the host has no
    /// data for it.
    fn terrain_id_at(&self, location: WorldLocation, map: MapIndex) -> Option<u16>;

    fn is_impassable(&self, terrain_id: u16) -> bool;
}

/// A key press delivered by the host. Repeated deliveries carry the same
/// timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HotKey {
    pub key: String,
    pub timestamp: u64,
}

impl HotKey {
    pub fn new(key: impl Into<String>, timestamp: u64) -> Self {
        HotKey {
            key: key.into(),
            timestamp,
        }
    }
}

/// Everything the controller loop polls from the running game client.
pub trait HostWorld: TerrainSource {
    fn agent_position(&self) -> WorldLocation;

    fn map_index(&self) -> MapIndex;

    fn last_hot_key(&self) -> Option<HotKey>;

    /// Overhead feedback to the player.
    fn notify_user(&self, message: &str);
}

/// Terrain held in memory, keyed by map and world coordinate.
#[derive(Clone, Debug, Default)]
pub struct StaticTerrain {
    tiles: FnvHashMap<(MapIndex, WorldLocation), u16>,
    impassable: FnvHashSet<u16>,
}

impl StaticTerrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tile(&mut self, map: MapIndex, location: WorldLocation, terrain_id: u16) {
        self.tiles.insert((map, location), terrain_id);
    }

    /// Fill the inclusive rectangle between two corners with one tile id.
    pub fn fill(&mut self, map: MapIndex, from: WorldLocation, to: WorldLocation, terrain_id: u16) {
        for y in from.y().min(to.y())..=from.y().max(to.y()) {
            for x in from.x().min(to.x())..=from.x().max(to.x()) {
                self.set_tile(map, WorldLocation::new(x, y), terrain_id);
            }
        }
    }

    pub fn mark_impassable(&mut self, terrain_id: u16) {
        self.impassable.insert(terrain_id);
    }
}

impl TerrainSource for StaticTerrain {
    fn terrain_id_at(&self, location: WorldLocation, map: MapIndex) -> Option<u16> {
        self.tiles.get(&(map, location)).copied()
    }

    fn is_impassable(&self, terrain_id: u16) -> bool {
        self.impassable.contains(&terrain_id)
    }
}

impl<T: TerrainSource + ?Sized> TerrainSource for &T {
    fn terrain_id_at(&self, location: WorldLocation, map: MapIndex) -> Option<u16> {
        (**self).terrain_id_at(location, map)
    }

    fn is_impassable(&self, terrain_id: u16) -> bool {
        (**self).is_impassable(terrain_id)
    }
}
