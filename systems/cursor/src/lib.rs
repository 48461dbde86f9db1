#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system tracking the battle cursor across the terrain.
//!
//! The cursor follows the hovered cell only while it changes and stays over
//! defined terrain; hovering the void leaves it on the last valid cell.

use to_arms_core::{CellCoord, TileKind};
use tracing::trace;

/// Input snapshot describing the cell under the pointer, already in grid space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorInput {
    /// Cell under the pointer, if the pointer is over the battle map at all.
    pub hovered: Option<CellCoord>,
}

impl CursorInput {
    /// Creates a new input descriptor.
    #[must_use]
    pub const fn new(hovered: Option<CellCoord>) -> Self {
        Self { hovered }
    }
}

/// Reports that the cursor settled on a new cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorMoved {
    /// Cell the cursor now rests on.
    pub cell: CellCoord,
    /// Terrain drawn on that cell.
    pub tile: TileKind,
}

/// Cursor state carried between frames.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cursor {
    cell: Option<CellCoord>,
}

impl Cursor {
    /// Creates a cursor that has not settled anywhere yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { cell: None }
    }

    /// Cell the cursor currently rests on.
    #[must_use]
    pub const fn cell(&self) -> Option<CellCoord> {
        self.cell
    }

    /// Follows the hovered cell when it differs from the current one and is not void.
    ///
    /// The `tile_at` closure should mirror the world's `query::tile_at` helper.
    pub fn handle<F>(&mut self, input: CursorInput, mut tile_at: F) -> Option<CursorMoved>
    where
        F: FnMut(CellCoord) -> Option<TileKind>,
    {
        let hovered = input.hovered?;
        if self.cell == Some(hovered) {
            return None;
        }

        let tile = tile_at(hovered)?;
        self.cell = Some(hovered);
        trace!(cell = %hovered, tile = tile.name(), "cursor moved");
        Some(CursorMoved {
            cell: hovered,
            tile,
        })
    }
}
