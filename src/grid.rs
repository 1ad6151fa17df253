//! The windowed snapshot around the agent.
//!
//! `GridState` is never patched in place after a move: `recenter` classifies
//! every cell of the new window from the host terrain and runs the
//! reachability scan over it, producing a fresh value. Reachable tile lists
//! from a previous position therefore cannot survive a move.

use crate::config::RadarConfig;
use crate::host::TerrainSource;
use crate::location::*;
use crate::scan::ReachabilityScanner;
use crate::terrain::*;
use fnv::FnvHashSet;
use log::*;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Derived facts about one cell of the window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub location: WorldLocation,
    pub category: TileCategory,
    pub bank: BankLocation,
    /// Impassable land. Missing host data counts as passable.
    pub blocked: bool,
    /// Number of distinct unconsumed banks gatherable from this tile.
    pub reachable_banks: u32,
    /// Mineable tiles found by the scan, one per counted bank, in discovery
    /// order.
    pub reachable_tiles: Vec<WorldLocation>,
}

impl Tile {
    pub fn new(
        location: WorldLocation,
        category: TileCategory,
        blocked: bool,
        bank_size: i32,
    ) -> Self {
        Tile {
            location,
            category,
            bank: location.bank(bank_size),
            blocked,
            reachable_banks: 0,
            reachable_tiles: Vec::new(),
        }
    }

    #[inline]
    pub fn is_walkable(&self) -> bool {
        !self.blocked
    }

    #[inline]
    pub fn is_mineable(&self) -> bool {
        self.category == TileCategory::Mineable
    }

    /// Distinct banks owning the reachable tiles, in first-seen order.
    pub fn reachable_bank_set(&self, bank_size: i32) -> Vec<BankLocation> {
        let mut seen = FnvHashSet::default();
        self.reachable_tiles
            .iter()
            .map(|loc| loc.bank(bank_size))
            .filter(|bank| seen.insert(*bank))
            .collect()
    }

    pub(crate) fn clear_reachability(&mut self) {
        self.reachable_banks = 0;
        self.reachable_tiles.clear();
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridState {
    center: WorldLocation,
    map: MapIndex,
    bank_size: i32,
    scan_radius: u32,
    tiles: WindowArray<Tile>,
    /// One flag per horizontal grid line (`side + 1`), set where the line is
    /// a bank edge.
    row_boundaries: Vec<bool>,
    /// One flag per vertical grid line (`side + 1`).
    col_boundaries: Vec<bool>,
}

impl GridState {
    /// A window with nothing scanned yet, centered on the world origin.
    pub fn empty(config: &RadarConfig) -> Self {
        let side = config.window_side();
        let center = WorldLocation::default();
        let half = config.center_index() as i32;
        let tiles = WindowArray::from_fn(side, |pos| {
            let location = center.offset(pos.col as i32 - half, pos.row as i32 - half);
            Tile::new(location, TileCategory::Plain, false, config.bank_span())
        });

        GridState {
            center,
            map: 0,
            bank_size: config.bank_span(),
            scan_radius: config.scan_radius,
            tiles,
            row_boundaries: vec![false; side + 1],
            col_boundaries: vec![false; side + 1],
        }
    }

    /// Rebuild the whole window around `center` and scan it.
    ///
    /// `consumed` holds the banks to leave out of every count; passing the
    /// visible subset of the ledger is enough since only banks inside the
    /// window can be reached.
    pub fn recenter<T>(
        center: WorldLocation,
        map: MapIndex,
        terrain: &T,
        classifier: &TileClassifier,
        consumed: &FnvHashSet<BankLocation>,
        config: &RadarConfig,
    ) -> GridState
    where
        T: TerrainSource + ?Sized,
    {
        let side = config.window_side();
        let half = config.center_index() as i32;
        let bank_size = config.bank_span();

        let tiles = WindowArray::from_fn(side, |pos| {
            let location = center.offset(pos.col as i32 - half, pos.row as i32 - half);
            match terrain.terrain_id_at(location, map) {
                Some(id) => Tile::new(
                    location,
                    classifier.classify(id),
                    terrain.is_impassable(id),
                    bank_size,
                ),
                None => Tile::new(location, TileCategory::Plain, false, bank_size),
            }
        });

        let origin = center.offset(-half, -half);
        let mut grid = GridState {
            center,
            map,
            bank_size,
            scan_radius: config.scan_radius,
            tiles,
            row_boundaries: boundary_lines(origin.y(), side, bank_size),
            col_boundaries: boundary_lines(origin.x(), side, bank_size),
        };

        let scanner = ReachabilityScanner::new(config.scan_radius);
        let scanned = scanner.scan(&mut grid, consumed);

        debug!(
            "Recentered radar on {} (map {}): {} tiles scanned, {} consumed banks excluded",
            center,
            map,
            scanned,
            consumed.len()
        );

        grid
    }

    #[inline]
    pub fn center(&self) -> WorldLocation {
        self.center
    }

    #[inline]
    pub fn map(&self) -> MapIndex {
        self.map
    }

    #[inline]
    pub fn bank_size(&self) -> i32 {
        self.bank_size
    }

    #[inline]
    pub fn scan_radius(&self) -> u32 {
        self.scan_radius
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.tiles.side()
    }

    pub fn center_pos(&self) -> GridPos {
        let half = self.side() / 2;
        GridPos::new(half, half)
    }

    pub fn tile(&self, pos: GridPos) -> Option<&Tile> {
        self.tiles.try_get(pos)
    }

    pub fn center_tile(&self) -> &Tile {
        self.tiles.get(self.center_pos())
    }

    pub fn tiles(&self) -> &WindowArray<Tile> {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut WindowArray<Tile> {
        &mut self.tiles
    }

    pub fn row_boundaries(&self) -> &[bool] {
        &self.row_boundaries
    }

    pub fn col_boundaries(&self) -> &[bool] {
        &self.col_boundaries
    }

    pub fn grid_to_world(&self, pos: GridPos) -> WorldLocation {
        let half = (self.side() / 2) as i32;
        self.center
            .offset(pos.col as i32 - half, pos.row as i32 - half)
    }

    pub fn world_to_grid(&self, location: WorldLocation) -> Option<GridPos> {
        let half = (self.side() / 2) as i32;
        let col = location.x() - self.center.x() + half;
        let row = location.y() - self.center.y() + half;
        let side = self.side() as i32;
        if (0..side).contains(&col) && (0..side).contains(&row) {
            Some(GridPos::new(row as usize, col as usize))
        } else {
            None
        }
    }

    /// World coordinates of the top-left and bottom-right window corners.
    pub fn world_bounds(&self) -> (WorldLocation, WorldLocation) {
        let last = self.side().saturating_sub(1);
        (
            self.grid_to_world(GridPos::new(0, 0)),
            self.grid_to_world(GridPos::new(last, last)),
        )
    }

    /// Rows (and columns) whose whole scan neighbourhood lies inside the
    /// window.
    pub fn inner_range(&self) -> Range<usize> {
        let inset = self.scan_radius as usize;
        inset..self.side().saturating_sub(inset)
    }
}

/// Flags the grid lines `0..=side` that fall on a bank edge, given the world
/// coordinate of the first cell on that axis.
fn boundary_lines(origin: i32, side: usize, bank_size: i32) -> Vec<bool> {
    (0..=side)
        .map(|line| (origin + line as i32).rem_euclid(bank_size) == 0)
        .collect()
}
