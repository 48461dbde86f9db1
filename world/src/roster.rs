//! Ordered collection of live units defining the turn sequence.

use to_arms_core::{
    resolve_damage, CellCoord, CombatProfile, TeamId, UnitId, UnitKind, UnitSnapshot, UnitStats,
};

/// Authoritative state of a single combatant.
#[derive(Clone, Debug)]
pub(crate) struct Unit {
    pub(crate) id: UnitId,
    pub(crate) team: TeamId,
    pub(crate) kind: UnitKind,
    pub(crate) cell: CellCoord,
    pub(crate) stats: UnitStats,
    pub(crate) health: i32,
    pub(crate) modifier: f32,
}

impl Unit {
    pub(crate) fn new(
        id: UnitId,
        team: TeamId,
        kind: UnitKind,
        cell: CellCoord,
        stats: UnitStats,
        modifier: f32,
    ) -> Self {
        Self {
            id,
            team,
            kind,
            cell,
            stats,
            health: stats.max_health,
            modifier,
        }
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub(crate) fn combat_profile(&self) -> CombatProfile {
        CombatProfile::from_stats(&self.stats, self.modifier)
    }

    /// Applies the damage formula with `attacker` striking this unit.
    ///
    /// Health may drop below zero; callers treat that as death.
    pub(crate) fn receive_attack(&mut self, attacker: &CombatProfile) -> u32 {
        let damage = resolve_damage(attacker, &self.combat_profile());
        let damage_i32 = i32::try_from(damage).unwrap_or(i32::MAX);
        self.health = self.health.saturating_sub(damage_i32);
        damage
    }

    pub(crate) fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            id: self.id,
            team: self.team,
            kind: self.kind,
            cell: self.cell,
            health: self.health,
            stats: self.stats,
            modifier: self.modifier,
        }
    }
}

/// Units in turn order. Removal keeps the relative order of the survivors.
#[derive(Clone, Debug, Default)]
pub(crate) struct Roster {
    units: Vec<Unit>,
}

impl Roster {
    pub(crate) fn push(&mut self, unit: Unit) {
        debug_assert!(
            self.index_of(unit.id).is_none(),
            "{} is already on the roster",
            unit.id
        );
        self.units.push(unit);
    }

    pub(crate) fn remove(&mut self, index: usize) -> Unit {
        self.units.remove(index)
    }

    pub(crate) fn clear(&mut self) {
        self.units.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.units.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Unit> {
        self.units.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Unit> {
        self.units.get_mut(index)
    }

    pub(crate) fn index_of(&self, unit: UnitId) -> Option<usize> {
        self.units.iter().position(|candidate| candidate.id == unit)
    }

    pub(crate) fn find(&self, unit: UnitId) -> Option<&Unit> {
        self.units.iter().find(|candidate| candidate.id == unit)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    /// Team shared by every unit, or `None` when empty or contested.
    pub(crate) fn sole_team(&self) -> Option<TeamId> {
        let first = self.units.first()?.team;
        self.units
            .iter()
            .all(|unit| unit.team == first)
            .then_some(first)
    }
}
