//! Bounded breadth-first search producing move and attack ranges.

use std::collections::{BTreeSet, HashSet};

use to_arms_core::CellCoord;

use crate::{OccupancyTracker, TerrainMap};

/// Layered breadth-first search over the eight-connected grid.
///
/// Diagonal steps cost the same as orthogonal ones, so a search of depth `d`
/// never leaves the square of Chebyshev radius `d` around the origin. Scratch
/// buffers are kept between calls to avoid reallocating on every activation.
#[derive(Clone, Debug, Default)]
pub struct RangeFinder {
    visited: HashSet<CellCoord>,
    frontier: Vec<CellCoord>,
    next_frontier: Vec<CellCoord>,
}

impl RangeFinder {
    /// Creates a range finder with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects every cell reachable from `origin` in at most `depth` steps.
    ///
    /// A step may only enter a cell for which `eligible` returns true and that
    /// was not reached earlier. The origin itself is never part of the result.
    pub fn expand<F>(&mut self, origin: CellCoord, depth: u32, mut eligible: F) -> BTreeSet<CellCoord>
    where
        F: FnMut(CellCoord) -> bool,
    {
        self.visited.clear();
        self.frontier.clear();
        self.next_frontier.clear();

        let _ = self.visited.insert(origin);
        self.frontier.push(origin);

        let mut reachable = BTreeSet::new();

        for _ in 0..depth {
            if self.frontier.is_empty() {
                break;
            }

            for &cell in &self.frontier {
                for neighbor in cell.neighbors() {
                    if self.visited.contains(&neighbor) || !eligible(neighbor) {
                        continue;
                    }

                    let _ = self.visited.insert(neighbor);
                    let _ = reachable.insert(neighbor);
                    self.next_frontier.push(neighbor);
                }
            }

            std::mem::swap(&mut self.frontier, &mut self.next_frontier);
            self.next_frontier.clear();
        }

        reachable
    }

    /// Cells a unit at `origin` may move to: passable, unoccupied, within `depth` steps.
    pub fn movement(
        &mut self,
        origin: CellCoord,
        depth: u32,
        terrain: &TerrainMap,
        occupancy: &OccupancyTracker,
    ) -> BTreeSet<CellCoord> {
        self.expand(origin, depth, |cell| {
            terrain.is_passable(cell) && !occupancy.is_occupied(cell)
        })
    }

    /// Cells a unit at `origin` may strike: passable, within `depth` steps.
    ///
    /// Occupied cells stay eligible because enemies stand on the cells worth
    /// attacking; reach also passes over other units.
    pub fn attack(
        &mut self,
        origin: CellCoord,
        depth: u32,
        terrain: &TerrainMap,
    ) -> BTreeSet<CellCoord> {
        self.expand(origin, depth, |cell| terrain.is_passable(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use to_arms_core::{TerrainTile, TileKind, UnitId};

    fn open_field(radius: i32) -> TerrainMap {
        let side = u32::try_from(radius * 2 + 1).expect("positive side");
        TerrainMap::rectangle(CellCoord::new(-radius, -radius), side, side, TileKind::Grass)
    }

    #[test]
    fn open_field_move_range_covers_chebyshev_square() {
        let terrain = open_field(2);
        let occupancy = OccupancyTracker::new();
        let origin = CellCoord::new(0, 0);

        let moves = RangeFinder::new().movement(origin, 2, &terrain, &occupancy);

        assert_eq!(moves.len(), 24);
        assert!(!moves.contains(&origin));
        assert!(moves
            .iter()
            .all(|cell| origin.chebyshev_distance(*cell) <= 2));
    }

    #[test]
    fn zero_depth_yields_nothing() {
        let terrain = open_field(2);
        let occupancy = OccupancyTracker::new();

        let moves = RangeFinder::new().movement(CellCoord::new(0, 0), 0, &terrain, &occupancy);

        assert!(moves.is_empty());
    }

    #[test]
    fn occupied_cells_block_movement_but_not_reach() {
        let terrain = open_field(2);
        let mut occupancy = OccupancyTracker::new();
        let origin = CellCoord::new(0, 0);
        let enemy = CellCoord::new(1, 0);
        occupancy.occupy(UnitId::new(0), origin);
        occupancy.occupy(UnitId::new(1), enemy);

        let mut finder = RangeFinder::new();
        let moves = finder.movement(origin, 1, &terrain, &occupancy);
        let attacks = finder.attack(origin, 1, &terrain);

        assert_eq!(moves.len(), 7);
        assert!(!moves.contains(&enemy));
        assert_eq!(attacks.len(), 8);
        assert!(attacks.contains(&enemy));
    }

    #[test]
    fn void_cells_are_never_entered() {
        // Corridor: (0,0) - (1,0) - (2,0) with a void gap at (3,0) before (4,0).
        let tiles = [0, 1, 2, 4]
            .into_iter()
            .map(|x| TerrainTile::new(CellCoord::new(x, 0), TileKind::Stone));
        let terrain = TerrainMap::from_tiles(tiles);
        let occupancy = OccupancyTracker::new();

        let moves = RangeFinder::new().movement(CellCoord::new(0, 0), 5, &terrain, &occupancy);

        assert_eq!(
            moves.into_iter().collect::<Vec<_>>(),
            vec![CellCoord::new(1, 0), CellCoord::new(2, 0)]
        );
    }

    #[test]
    fn walls_force_detours_that_cost_steps() {
        // Column x = 1 is void except at y = 2, so reaching (2, 0) takes a detour.
        let mut tiles = Vec::new();
        for y in 0..=2 {
            for x in 0..=2 {
                if x == 1 && y != 2 {
                    continue;
                }
                tiles.push(TerrainTile::new(CellCoord::new(x, y), TileKind::Grass));
            }
        }
        let terrain = TerrainMap::from_tiles(tiles);
        let occupancy = OccupancyTracker::new();
        let origin = CellCoord::new(0, 0);
        let mut finder = RangeFinder::new();

        let short = finder.movement(origin, 2, &terrain, &occupancy);
        let long = finder.movement(origin, 4, &terrain, &occupancy);

        assert!(!short.contains(&CellCoord::new(2, 0)));
        assert!(long.contains(&CellCoord::new(2, 0)));
    }

    #[test]
    fn void_origin_only_reaches_defined_neighbours() {
        let terrain = TerrainMap::from_tiles([TerrainTile::new(CellCoord::new(1, 1), TileKind::Sand)]);
        let occupancy = OccupancyTracker::new();

        let moves = RangeFinder::new().movement(CellCoord::new(0, 0), 3, &terrain, &occupancy);

        assert_eq!(moves.into_iter().collect::<Vec<_>>(), vec![CellCoord::new(1, 1)]);
    }

    #[test]
    fn scratch_reuse_does_not_leak_between_searches() {
        let terrain = open_field(3);
        let occupancy = OccupancyTracker::new();
        let mut finder = RangeFinder::new();

        let first = finder.movement(CellCoord::new(-3, -3), 1, &terrain, &occupancy);
        let second = finder.movement(CellCoord::new(3, 3), 1, &terrain, &occupancy);

        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 3);
        assert!(first.is_disjoint(&second));
    }
}
