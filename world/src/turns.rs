//! Turn rotation over the roster.

use to_arms_core::{Highlights, TurnPhase};

/// How a roster removal affected the active index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Removal {
    /// The active unit kept its index.
    Unaffected,
    /// A unit earlier in the order died; the active index moved down by one.
    Shifted,
    /// The active unit itself died; the unit at `next` must be activated.
    ActiveRemoved { next: usize },
    /// The roster is empty and the rotation stopped.
    Exhausted,
}

/// Phase of the rotation plus the per-activation bookkeeping of the active unit.
#[derive(Clone, Debug)]
pub(crate) struct TurnState {
    phase: TurnPhase,
    has_moved: bool,
    has_attacked: bool,
    highlights: Highlights,
}

impl Default for TurnState {
    fn default() -> Self {
        Self {
            phase: TurnPhase::Idle,
            has_moved: false,
            has_attacked: false,
            highlights: Highlights::default(),
        }
    }
}

impl TurnState {
    pub(crate) fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub(crate) fn active_index(&self) -> Option<usize> {
        match self.phase {
            TurnPhase::UnitActive(index) => Some(index),
            TurnPhase::Idle | TurnPhase::TurnAdvancing => None,
        }
    }

    /// Hands input to the unit at `index` with a fresh set of actions.
    pub(crate) fn activate(&mut self, index: usize) {
        self.phase = TurnPhase::UnitActive(index);
        self.has_moved = false;
        self.has_attacked = false;
        self.highlights.clear();
    }

    /// Ends the current activation and returns the index that follows it.
    ///
    /// Leaves the phase at `TurnAdvancing`; callers activate the returned index.
    pub(crate) fn advance(&mut self, roster_len: usize) -> Option<usize> {
        let current = self.active_index()?;
        assert!(
            current < roster_len,
            "active index {current} outside roster of {roster_len}"
        );
        self.phase = TurnPhase::TurnAdvancing;
        self.highlights.clear();
        Some((current + 1) % roster_len)
    }

    /// Re-indexes the rotation after the unit at `removed` left the roster.
    pub(crate) fn on_removed(&mut self, removed: usize, remaining: usize) -> Removal {
        let Some(active) = self.active_index() else {
            return Removal::Unaffected;
        };

        if remaining == 0 {
            self.halt();
            return Removal::Exhausted;
        }

        if removed < active {
            self.phase = TurnPhase::UnitActive(active - 1);
            Removal::Shifted
        } else if removed == active {
            self.phase = TurnPhase::TurnAdvancing;
            self.highlights.clear();
            Removal::ActiveRemoved {
                next: removed % remaining,
            }
        } else {
            Removal::Unaffected
        }
    }

    /// Stops the rotation; no unit receives input afterwards.
    pub(crate) fn halt(&mut self) {
        self.phase = TurnPhase::Idle;
        self.has_moved = false;
        self.has_attacked = false;
        self.highlights.clear();
    }

    pub(crate) fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub(crate) fn has_attacked(&self) -> bool {
        self.has_attacked
    }

    pub(crate) fn mark_moved(&mut self) {
        self.has_moved = true;
    }

    pub(crate) fn mark_attacked(&mut self) {
        self.has_attacked = true;
    }

    pub(crate) fn actions_spent(&self) -> bool {
        self.has_moved && self.has_attacked
    }

    pub(crate) fn highlights(&self) -> &Highlights {
        &self.highlights
    }

    pub(crate) fn set_highlights(&mut self, highlights: Highlights) {
        self.highlights = highlights;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_rotation_returns_to_the_first_unit() {
        let mut turns = TurnState::default();
        turns.activate(0);

        for _ in 0..4 {
            let next = turns.advance(4).expect("active unit");
            assert_eq!(turns.phase(), TurnPhase::TurnAdvancing);
            turns.activate(next);
        }

        assert_eq!(turns.active_index(), Some(0));
    }

    #[test]
    fn advance_is_refused_while_idle() {
        let mut turns = TurnState::default();
        assert_eq!(turns.advance(3), None);
        assert_eq!(turns.phase(), TurnPhase::Idle);
    }

    #[test]
    fn activation_resets_action_flags() {
        let mut turns = TurnState::default();
        turns.activate(0);
        turns.mark_moved();
        turns.mark_attacked();
        assert!(turns.actions_spent());

        turns.activate(1);

        assert!(!turns.has_moved());
        assert!(!turns.has_attacked());
        assert!(turns.highlights().is_empty());
    }

    #[test]
    fn removing_an_earlier_unit_shifts_the_active_index() {
        let mut turns = TurnState::default();
        turns.activate(2);

        assert_eq!(turns.on_removed(0, 2), Removal::Shifted);
        assert_eq!(turns.active_index(), Some(1));
    }

    #[test]
    fn removing_a_later_unit_leaves_the_active_index() {
        let mut turns = TurnState::default();
        turns.activate(0);

        assert_eq!(turns.on_removed(2, 2), Removal::Unaffected);
        assert_eq!(turns.active_index(), Some(0));
    }

    #[test]
    fn removing_the_active_unit_selects_its_successor() {
        let mut turns = TurnState::default();
        turns.activate(1);

        assert_eq!(turns.on_removed(1, 2), Removal::ActiveRemoved { next: 1 });
    }

    #[test]
    fn removing_the_last_active_unit_wraps_around() {
        let mut turns = TurnState::default();
        turns.activate(2);

        assert_eq!(turns.on_removed(2, 2), Removal::ActiveRemoved { next: 0 });
    }

    #[test]
    fn emptying_the_roster_halts_the_rotation() {
        let mut turns = TurnState::default();
        turns.activate(0);

        assert_eq!(turns.on_removed(0, 0), Removal::Exhausted);
        assert_eq!(turns.phase(), TurnPhase::Idle);
    }
}
