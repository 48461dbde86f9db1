//! Static battle map classifying cells as defined or void.

use std::collections::HashMap;

use to_arms_core::{CellCoord, TerrainTile, TileKind};

/// Read-only map of defined cells. Anything not defined is void.
#[derive(Clone, Debug, Default)]
pub struct TerrainMap {
    tiles: HashMap<CellCoord, TileKind>,
}

impl TerrainMap {
    /// Builds a map from tile descriptors. Later duplicates win.
    #[must_use]
    pub fn from_tiles<I>(tiles: I) -> Self
    where
        I: IntoIterator<Item = TerrainTile>,
    {
        Self {
            tiles: tiles
                .into_iter()
                .map(|tile| (tile.cell, tile.kind))
                .collect(),
        }
    }

    /// Builds a rectangular map covering `columns` by `rows` cells from `origin`.
    #[must_use]
    pub fn rectangle(origin: CellCoord, columns: u32, rows: u32, kind: TileKind) -> Self {
        let mut tiles = HashMap::new();
        for dy in 0..rows {
            for dx in 0..columns {
                let (Ok(dx), Ok(dy)) = (i32::try_from(dx), i32::try_from(dy)) else {
                    continue;
                };
                let (Some(x), Some(y)) = (origin.x().checked_add(dx), origin.y().checked_add(dy))
                else {
                    continue;
                };
                let _ = tiles.insert(CellCoord::new(x, y), kind);
            }
        }
        Self { tiles }
    }

    /// Reports whether the cell holds terrain a unit may stand on.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        self.tiles.contains_key(&cell)
    }

    /// Content of the cell, or `None` when the cell is void.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<TileKind> {
        self.tiles.get(&cell).copied()
    }

    /// Number of defined cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether every cell is void.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
