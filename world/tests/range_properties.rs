use std::collections::{BTreeSet, HashMap, VecDeque};

use proptest::prelude::*;
use to_arms_core::{CellCoord, TerrainTile, TileKind, UnitId};
use to_arms_world::{OccupancyTracker, RangeFinder, TerrainMap};

const SIDE: i32 = 9;

#[derive(Debug)]
struct Layout {
    terrain: TerrainMap,
    occupancy: OccupancyTracker,
    origin: CellCoord,
    depth: u32,
}

// 0 is void, 3 is an occupied tile, anything else an open tile.
fn layout() -> impl Strategy<Value = Layout> {
    let cells = usize::try_from(SIDE * SIDE).unwrap_or(0);
    (
        prop::collection::vec(0u8..4, cells),
        0..SIDE,
        0..SIDE,
        0u32..6,
    )
        .prop_map(|(codes, x, y, depth)| {
            let mut tiles = Vec::new();
            let mut occupancy = OccupancyTracker::new();
            for (index, code) in codes.into_iter().enumerate() {
                let index = i32::try_from(index).unwrap_or(0);
                let cell = CellCoord::new(index % SIDE, index / SIDE);
                if code == 0 {
                    continue;
                }
                tiles.push(TerrainTile::new(cell, TileKind::Grass));
                if code == 3 {
                    occupancy.occupy(UnitId::new(index.unsigned_abs()), cell);
                }
            }
            Layout {
                terrain: TerrainMap::from_tiles(tiles),
                occupancy,
                origin: CellCoord::new(x, y),
                depth,
            }
        })
}

fn moves(layout: &Layout, depth: u32) -> BTreeSet<CellCoord> {
    RangeFinder::new().movement(layout.origin, depth, &layout.terrain, &layout.occupancy)
}

/// Step counts from `origin` to every cell reachable through `eligible` cells,
/// found by a plain queue-driven search over the bounded layout.
fn step_counts<F>(origin: CellCoord, eligible: F) -> HashMap<CellCoord, u32>
where
    F: Fn(CellCoord) -> bool,
{
    let mut steps = HashMap::from([(origin, 0)]);
    let mut queue = VecDeque::from([origin]);
    while let Some(cell) = queue.pop_front() {
        let depth = steps[&cell];
        for dy in -1..=1 {
            for dx in -1..=1 {
                let next = CellCoord::new(cell.x() + dx, cell.y() + dy);
                let inside = (0..SIDE).contains(&next.x()) && (0..SIDE).contains(&next.y());
                if !inside || steps.contains_key(&next) || !eligible(next) {
                    continue;
                }
                let _ = steps.insert(next, depth + 1);
                queue.push_back(next);
            }
        }
    }
    steps
}

fn within(steps: &HashMap<CellCoord, u32>, origin: CellCoord, depth: u32) -> BTreeSet<CellCoord> {
    steps
        .iter()
        .filter(|(cell, count)| **cell != origin && **count <= depth)
        .map(|(cell, _)| *cell)
        .collect()
}

proptest! {
    #[test]
    fn move_range_only_holds_legal_cells(layout in layout()) {
        let reachable = moves(&layout, layout.depth);

        prop_assert!(!reachable.contains(&layout.origin));
        for cell in &reachable {
            prop_assert!(layout.terrain.is_passable(*cell));
            prop_assert!(!layout.occupancy.is_occupied(*cell));
            prop_assert!(layout.origin.chebyshev_distance(*cell) <= layout.depth);
        }
    }

    #[test]
    fn move_range_matches_walks_over_free_cells(layout in layout()) {
        let steps = step_counts(layout.origin, |cell| {
            layout.terrain.is_passable(cell) && !layout.occupancy.is_occupied(cell)
        });

        prop_assert_eq!(
            moves(&layout, layout.depth),
            within(&steps, layout.origin, layout.depth)
        );
    }

    #[test]
    fn attack_reach_matches_walks_over_defined_cells(layout in layout()) {
        let steps = step_counts(layout.origin, |cell| layout.terrain.is_passable(cell));
        let reach = RangeFinder::new().attack(layout.origin, layout.depth, &layout.terrain);

        prop_assert_eq!(reach, within(&steps, layout.origin, layout.depth));
    }

    #[test]
    fn move_range_grows_with_depth(layout in layout()) {
        let shallow = moves(&layout, layout.depth);
        let deep = moves(&layout, layout.depth + 1);

        prop_assert!(shallow.is_subset(&deep));
    }

    #[test]
    fn repeated_searches_agree(layout in layout()) {
        let mut finder = RangeFinder::new();
        let first = finder.movement(layout.origin, layout.depth, &layout.terrain, &layout.occupancy);
        let second = finder.movement(layout.origin, layout.depth, &layout.terrain, &layout.occupancy);

        prop_assert_eq!(first, second);
    }

    #[test]
    fn attack_reach_covers_move_range(layout in layout()) {
        let mut finder = RangeFinder::new();
        let reachable = finder.movement(layout.origin, layout.depth, &layout.terrain, &layout.occupancy);
        let reach = finder.attack(layout.origin, layout.depth, &layout.terrain);

        prop_assert!(reachable.is_subset(&reach));
        prop_assert!(!reach.contains(&layout.origin));
    }
}
