//! Sparse record of which unit stands on which cell.

use std::collections::HashMap;

use to_arms_core::{CellCoord, UnitId};

/// Tracks the cell held by every live unit.
///
/// A cell maps to at most one unit. The tracker does not consult terrain;
/// the world only ever occupies passable cells.
#[derive(Clone, Debug, Default)]
pub struct OccupancyTracker {
    cells: HashMap<CellCoord, UnitId>,
}

impl OccupancyTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the cell as held by the unit. Repeating the call is a no-op.
    pub fn occupy(&mut self, unit: UnitId, cell: CellCoord) {
        let previous = self.cells.insert(cell, unit);
        debug_assert!(
            previous.map_or(true, |existing| existing == unit),
            "cell {cell} already held by {previous:?}, cannot hand it to {unit}"
        );
    }

    /// Frees the cell. Vacating a free cell is a no-op.
    pub fn vacate(&mut self, cell: CellCoord) {
        let _ = self.cells.remove(&cell);
    }

    /// Moves the unit between two cells in a single step.
    pub fn relocate(&mut self, unit: UnitId, from: CellCoord, to: CellCoord) {
        debug_assert_eq!(self.occupant(from), Some(unit), "{unit} does not hold {from}");
        self.vacate(from);
        self.occupy(unit, to);
    }

    /// Reports whether any unit stands on the cell.
    #[must_use]
    pub fn is_occupied(&self, cell: CellCoord) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Unit standing on the cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<UnitId> {
        self.cells.get(&cell).copied()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Frees every cell.
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupy_and_vacate_are_idempotent() {
        let mut tracker = OccupancyTracker::new();
        let unit = UnitId::new(3);
        let cell = CellCoord::new(2, -1);

        tracker.occupy(unit, cell);
        tracker.occupy(unit, cell);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.occupant(cell), Some(unit));

        tracker.vacate(cell);
        tracker.vacate(cell);
        assert!(tracker.is_empty());
        assert!(!tracker.is_occupied(cell));
    }

    #[test]
    fn relocate_swaps_the_held_cell() {
        let mut tracker = OccupancyTracker::new();
        let unit = UnitId::new(0);
        let from = CellCoord::new(0, 0);
        let to = CellCoord::new(1, 1);
        tracker.occupy(unit, from);

        tracker.relocate(unit, from, to);

        assert!(!tracker.is_occupied(from));
        assert_eq!(tracker.occupant(to), Some(unit));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "already held")]
    fn double_occupancy_fails_fast() {
        let mut tracker = OccupancyTracker::new();
        let cell = CellCoord::new(0, 0);
        tracker.occupy(UnitId::new(0), cell);
        tracker.occupy(UnitId::new(1), cell);
    }
}
