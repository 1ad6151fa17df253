//! ReachabilityScanner: counts, for each walkable tile, the distinct banks a
//! gatherer standing there could mine from.
//!
//! Reachability is a fixed square neighbourhood (Chebyshev distance up to the
//! scan radius, center included), not a path search. Only tiles of the inner
//! window are scanned: the window inset by the radius on every side, so every
//! neighbour lookup lands inside the window by construction.

use crate::grid::GridState;
use crate::location::*;
use fnv::FnvHashSet;
use itertools::iproduct;
use log::*;

pub struct ReachabilityScanner {
    radius: u32,
}

impl ReachabilityScanner {
    pub fn new(radius: u32) -> Self {
        ReachabilityScanner { radius }
    }

    /// Recompute reachable counts and tiles for the whole grid. Tiles outside
    /// the inner window and blocked tiles end up with nothing reachable.
    ///
    /// Returns the number of walkable tiles scanned.
    pub fn scan(&self, grid: &mut GridState, consumed: &FnvHashSet<BankLocation>) -> usize {
        for (_, tile) in grid.tiles_mut().iter_mut() {
            tile.clear_reachability();
        }

        let radius = self.radius as usize;
        let inner = grid.inner_range();
        let mut scanned = 0;

        for (row, col) in iproduct!(inner.clone(), inner) {
            let pos = GridPos::new(row, col);
            if !grid.tiles().get(pos).is_walkable() {
                continue;
            }

            let found = self.reachable_from(grid, pos, radius, consumed);
            scanned += 1;

            if !found.is_empty() {
                trace!(
                    "Tile {} reaches {} bank(s)",
                    grid.tiles().get(pos).location,
                    found.len()
                );
            }

            let tile = grid.tiles_mut().get_mut(pos);
            tile.reachable_banks = found.len() as u32;
            tile.reachable_tiles = found;
        }

        scanned
    }

    /// First mineable tile of every distinct unconsumed bank in the
    /// neighbourhood of `pos`, rows outer, columns inner.
    fn reachable_from(
        &self,
        grid: &GridState,
        pos: GridPos,
        radius: usize,
        consumed: &FnvHashSet<BankLocation>,
    ) -> Vec<WorldLocation> {
        let tiles = grid.tiles();
        let mut banks_seen: FnvHashSet<BankLocation> = FnvHashSet::default();
        let mut found = Vec::new();

        for (row, col) in iproduct!(
            pos.row - radius..=pos.row + radius,
            pos.col - radius..=pos.col + radius
        ) {
            let target = tiles.get(GridPos::new(row, col));

            // Consumed banks never enter `banks_seen`.
            if consumed.contains(&target.bank) {
                continue;
            }
            if banks_seen.contains(&target.bank) {
                continue;
            }
            if !target.is_mineable() {
                continue;
            }

            banks_seen.insert(target.bank);
            found.push(target.location);
        }

        found
    }
}
