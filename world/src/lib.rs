#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative battle state for the To Arms rules engine.
//!
//! The world owns the terrain, the occupancy of every cell, the roster of
//! live units and the turn rotation. It is mutated exclusively through
//! [`apply`], which validates each [`Command`] and reports the outcome as
//! [`Event`] values. Read access goes through the [`query`] module.

mod occupancy;
mod range;
mod roster;
mod terrain;
mod turns;

use std::collections::BTreeSet;

use to_arms_core::{
    AttackError, BattleError, CellCoord, Command, EndTurnError, Event, Highlights, MoveError,
    SpawnError, TeamId, TerrainError, TerrainTile, TurnPolicy, UnitId, UnitKind, UnitStats,
    WELCOME_BANNER,
};
use tracing::{debug, info};

pub use occupancy::OccupancyTracker;
pub use range::RangeFinder;
pub use terrain::TerrainMap;

use roster::{Roster, Unit};
use turns::{Removal, TurnState};

/// Represents the authoritative To Arms battle state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    terrain: TerrainMap,
    occupancy: OccupancyTracker,
    roster: Roster,
    turns: TurnState,
    range_finder: RangeFinder,
    policy: TurnPolicy,
    started: bool,
    outcome: Option<TeamId>,
    next_unit_id: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty world: void terrain, no units, no battle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            terrain: TerrainMap::default(),
            occupancy: OccupancyTracker::new(),
            roster: Roster::default(),
            turns: TurnState::default(),
            range_finder: RangeFinder::new(),
            policy: TurnPolicy::default(),
            started: false,
            outcome: None,
            next_unit_id: 0,
        }
    }

    fn active_unit(&self) -> Option<(usize, &Unit)> {
        let index = self.turns.active_index()?;
        let unit = self.roster.get(index)?;
        Some((index, unit))
    }

    fn configure_terrain(&mut self, tiles: Vec<TerrainTile>, out_events: &mut Vec<Event>) {
        if self.started {
            debug!("terrain change refused during battle");
            out_events.push(Event::TerrainRejected {
                reason: TerrainError::BattleInProgress,
            });
            return;
        }

        self.terrain = TerrainMap::from_tiles(tiles);
        self.roster.clear();
        self.occupancy.clear();
        info!(cells = self.terrain.len(), "terrain configured");
        out_events.push(Event::TerrainConfigured {
            cells: self.terrain.len(),
        });
    }

    fn validate_spawn(
        &self,
        cell: CellCoord,
        modifier: f32,
        stats: &UnitStats,
    ) -> Result<(), SpawnError> {
        if self.started {
            return Err(SpawnError::BattleInProgress);
        }
        if !modifier.is_finite() || modifier < 0.0 {
            return Err(SpawnError::InvalidModifier);
        }
        if !stats.is_viable() {
            return Err(SpawnError::InvalidStats);
        }
        if !self.terrain.is_passable(cell) {
            return Err(SpawnError::Void);
        }
        if self.occupancy.is_occupied(cell) {
            return Err(SpawnError::Occupied);
        }
        Ok(())
    }

    fn spawn_unit(
        &mut self,
        team: TeamId,
        kind: UnitKind,
        cell: CellCoord,
        modifier: f32,
        stats: Option<UnitStats>,
        out_events: &mut Vec<Event>,
    ) {
        let stats = stats.unwrap_or_else(|| kind.stats());
        if let Err(reason) = self.validate_spawn(cell, modifier, &stats) {
            debug!(%team, %cell, %reason, "spawn rejected");
            out_events.push(Event::SpawnRejected { team, cell, reason });
            return;
        }

        let id = UnitId::new(self.next_unit_id);
        self.next_unit_id = self.next_unit_id.saturating_add(1);
        self.occupancy.occupy(id, cell);
        self.roster
            .push(Unit::new(id, team, kind, cell, stats, modifier));
        debug!(unit = %id, %team, kind = kind.name(), %cell, "unit spawned");
        out_events.push(Event::UnitSpawned {
            unit: id,
            team,
            kind,
            cell,
        });
    }

    fn begin_battle(&mut self, policy: TurnPolicy, out_events: &mut Vec<Event>) {
        let refusal = if self.started {
            Some(BattleError::AlreadyStarted)
        } else if self.roster.is_empty() {
            Some(BattleError::EmptyRoster)
        } else {
            None
        };
        if let Some(reason) = refusal {
            debug!(%reason, "battle rejected");
            out_events.push(Event::BattleRejected { reason });
            return;
        }

        self.started = true;
        self.policy = policy;
        info!(units = self.roster.len(), ?policy, "battle started");
        out_events.push(Event::BattleStarted {
            units: self.roster.len(),
            policy,
        });

        if let Some(winner) = self.roster.sole_team() {
            self.conclude(winner, out_events);
            return;
        }
        self.activate(0, out_events);
    }

    fn activate(&mut self, index: usize, out_events: &mut Vec<Event>) {
        assert!(
            index < self.roster.len(),
            "activated index {index} outside roster of {}",
            self.roster.len()
        );
        self.turns.activate(index);
        let Some(unit) = self.roster.get(index) else {
            return;
        };
        let (unit, cell) = (unit.id, unit.cell);
        info!(%unit, %cell, "unit activated");
        out_events.push(Event::UnitActivated { unit, cell });
        self.refresh_highlights(out_events);
    }

    /// Recomputes the active unit's highlight sets. Spent actions yield empty sets.
    fn refresh_highlights(&mut self, out_events: &mut Vec<Event>) {
        let Some((_, unit)) = self.active_unit() else {
            return;
        };
        let (unit, origin, stats) = (unit.id, unit.cell, unit.stats);

        let moves = if self.turns.has_moved() {
            BTreeSet::new()
        } else {
            self.range_finder
                .movement(origin, stats.move_range, &self.terrain, &self.occupancy)
        };
        let attacks = if self.turns.has_attacked() {
            BTreeSet::new()
        } else {
            self.range_finder
                .attack(origin, stats.attack_range, &self.terrain)
        };

        debug!(%unit, moves = moves.len(), attacks = attacks.len(), "highlights updated");
        out_events.push(Event::HighlightsUpdated {
            unit,
            moves: moves.len(),
            attacks: attacks.len(),
        });
        self.turns.set_highlights(Highlights { moves, attacks });
    }

    fn validate_move(&self, unit: UnitId, to: CellCoord) -> Result<usize, MoveError> {
        let (index, active) = self.active_unit().ok_or(MoveError::NotActive)?;
        if active.id != unit {
            return Err(MoveError::NotActive);
        }
        if self.turns.has_moved() {
            return Err(MoveError::AlreadyMoved);
        }
        if !self.turns.highlights().moves.contains(&to) {
            return Err(MoveError::OutOfRange);
        }
        Ok(index)
    }

    fn move_unit(&mut self, unit: UnitId, to: CellCoord, out_events: &mut Vec<Event>) {
        let index = match self.validate_move(unit, to) {
            Ok(index) => index,
            Err(reason) => {
                debug!(%unit, %to, %reason, "move rejected");
                out_events.push(Event::MoveRejected { unit, to, reason });
                return;
            }
        };

        let Some(mover) = self.roster.get_mut(index) else {
            return;
        };
        let from = mover.cell;
        mover.cell = to;
        self.occupancy.relocate(unit, from, to);
        self.turns.mark_moved();
        info!(%unit, %from, %to, "unit moved");
        out_events.push(Event::UnitMoved { unit, from, to });

        if self.policy == TurnPolicy::MoveEndsTurn || self.turns.actions_spent() {
            self.increment_turn(out_events);
        } else {
            self.refresh_highlights(out_events);
        }
    }

    fn validate_attack(
        &self,
        unit: UnitId,
        target: CellCoord,
    ) -> Result<(usize, usize), AttackError> {
        let (attacker_index, attacker) = self.active_unit().ok_or(AttackError::NotActive)?;
        if attacker.id != unit {
            return Err(AttackError::NotActive);
        }
        if self.turns.has_attacked() {
            return Err(AttackError::AlreadyAttacked);
        }
        if !self.turns.highlights().attacks.contains(&target) {
            return Err(AttackError::OutOfRange);
        }

        let defender_index = self
            .occupancy
            .occupant(target)
            .and_then(|occupant| self.roster.index_of(occupant))
            .ok_or(AttackError::NoTarget)?;
        let defender = self
            .roster
            .get(defender_index)
            .ok_or(AttackError::NoTarget)?;
        if defender.team == attacker.team {
            return Err(AttackError::FriendlyTarget);
        }
        Ok((attacker_index, defender_index))
    }

    fn attack(&mut self, unit: UnitId, target: CellCoord, out_events: &mut Vec<Event>) {
        let (attacker_index, defender_index) = match self.validate_attack(unit, target) {
            Ok(indices) => indices,
            Err(reason) => {
                debug!(%unit, %target, %reason, "attack rejected");
                out_events.push(Event::AttackRejected {
                    unit,
                    target,
                    reason,
                });
                return;
            }
        };

        let Some(profile) = self
            .roster
            .get(attacker_index)
            .map(Unit::combat_profile)
        else {
            return;
        };
        let Some(defender) = self.roster.get_mut(defender_index) else {
            return;
        };
        let damage = defender.receive_attack(&profile);
        let (defender_id, remaining_health, slain) =
            (defender.id, defender.health, defender.is_dead());
        self.turns.mark_attacked();
        info!(attacker = %unit, defender = %defender_id, damage, remaining_health, "unit attacked");
        out_events.push(Event::UnitAttacked {
            attacker: unit,
            defender: defender_id,
            damage,
            remaining_health,
        });

        if slain {
            self.remove_unit(defender_index, out_events);
            if self.outcome.is_some() {
                return;
            }
        }

        if self.turns.actions_spent() {
            self.increment_turn(out_events);
        } else {
            self.refresh_highlights(out_events);
        }
    }

    fn end_turn(&mut self, unit: UnitId, out_events: &mut Vec<Event>) {
        let is_active = self
            .active_unit()
            .map_or(false, |(_, active)| active.id == unit);
        if !is_active {
            let reason = EndTurnError::NotActive;
            debug!(%unit, %reason, "end turn rejected");
            out_events.push(Event::EndTurnRejected { unit, reason });
            return;
        }
        self.increment_turn(out_events);
    }

    /// Passes control to the next unit in roster order, wrapping around.
    fn increment_turn(&mut self, out_events: &mut Vec<Event>) {
        let Some((_, current)) = self.active_unit() else {
            return;
        };
        let from = current.id;
        let Some(next) = self.turns.advance(self.roster.len()) else {
            return;
        };
        let Some(to) = self.roster.get(next).map(|unit| unit.id) else {
            return;
        };
        info!(%from, %to, "turn advanced");
        out_events.push(Event::TurnAdvanced { from, to });
        self.activate(next, out_events);
    }

    fn remove_unit(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let fallen = self.roster.remove(index);
        self.occupancy.vacate(fallen.cell);
        info!(unit = %fallen.id, cell = %fallen.cell, "unit died");
        out_events.push(Event::UnitDied {
            unit: fallen.id,
            cell: fallen.cell,
        });

        let removal = self.turns.on_removed(index, self.roster.len());
        if let Some(winner) = self.roster.sole_team() {
            self.conclude(winner, out_events);
            return;
        }

        match removal {
            Removal::ActiveRemoved { next } => {
                let Some(to) = self.roster.get(next).map(|unit| unit.id) else {
                    return;
                };
                info!(from = %fallen.id, %to, "turn advanced");
                out_events.push(Event::TurnAdvanced {
                    from: fallen.id,
                    to,
                });
                self.activate(next, out_events);
            }
            Removal::Exhausted => info!("roster exhausted"),
            Removal::Unaffected | Removal::Shifted => {}
        }
    }

    fn conclude(&mut self, winner: TeamId, out_events: &mut Vec<Event>) {
        self.outcome = Some(winner);
        self.turns.halt();
        info!(%winner, "battle concluded");
        out_events.push(Event::BattleConcluded { winner });
    }

    fn assert_consistent(&self) {
        debug_assert_eq!(
            self.occupancy.len(),
            self.roster.len(),
            "occupancy out of step with the roster"
        );
        for unit in self.roster.iter() {
            debug_assert_eq!(
                self.occupancy.occupant(unit.cell),
                Some(unit.id),
                "{} does not hold its own cell {}",
                unit.id,
                unit.cell
            );
            debug_assert!(!unit.is_dead(), "{} remains on the roster while dead", unit.id);
        }
        if let Some(index) = self.turns.active_index() {
            assert!(
                index < self.roster.len(),
                "active index {index} outside roster of {}",
                self.roster.len()
            );
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Every command produces at least one event: either the confirmation of the
/// mutation or a rejection carrying its reason. Rejected commands leave the
/// world untouched.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureTerrain { tiles } => world.configure_terrain(tiles, out_events),
        Command::SpawnUnit {
            team,
            kind,
            cell,
            modifier,
            stats,
        } => world.spawn_unit(team, kind, cell, modifier, stats, out_events),
        Command::BeginBattle { policy } => world.begin_battle(policy, out_events),
        Command::MoveUnit { unit, to } => world.move_unit(unit, to, out_events),
        Command::AttackUnit { unit, target } => world.attack(unit, target, out_events),
        Command::EndTurn { unit } => world.end_turn(unit, out_events),
    }
    world.assert_consistent();
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::collections::BTreeSet;

    use super::{TerrainMap, World};
    use to_arms_core::{
        ActivationSnapshot, CellCoord, TeamId, TileKind, TurnPhase, TurnPolicy, UnitId,
        UnitSnapshot, UnitView,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the battle map.
    #[must_use]
    pub fn terrain(world: &World) -> &TerrainMap {
        &world.terrain
    }

    /// Content of the cell, or `None` when it is void.
    #[must_use]
    pub fn tile_at(world: &World, cell: CellCoord) -> Option<TileKind> {
        world.terrain.tile(cell)
    }

    /// Unit standing on the cell, if any.
    #[must_use]
    pub fn occupant(world: &World, cell: CellCoord) -> Option<UnitId> {
        world.occupancy.occupant(cell)
    }

    /// Captures a read-only view of the roster in turn order.
    #[must_use]
    pub fn unit_view(world: &World) -> UnitView {
        UnitView::from_snapshots(world.roster.iter().map(|unit| unit.snapshot()).collect())
    }

    /// Captures the state of a single live unit.
    #[must_use]
    pub fn unit(world: &World, unit: UnitId) -> Option<UnitSnapshot> {
        world.roster.find(unit).map(|unit| unit.snapshot())
    }

    /// Current and maximum health of a live unit.
    #[must_use]
    pub fn unit_health(world: &World, unit: UnitId) -> Option<(i32, i32)> {
        world
            .roster
            .find(unit)
            .map(|unit| (unit.health, unit.stats.max_health))
    }

    /// Unit currently receiving input.
    #[must_use]
    pub fn active_unit(world: &World) -> Option<UnitId> {
        world.active_unit().map(|(_, unit)| unit.id)
    }

    /// Describes the active unit together with its action flags and highlights.
    #[must_use]
    pub fn activation(world: &World) -> Option<ActivationSnapshot> {
        let (_, unit) = world.active_unit()?;
        Some(ActivationSnapshot {
            unit: unit.id,
            team: unit.team,
            cell: unit.cell,
            has_moved: world.turns.has_moved(),
            has_attacked: world.turns.has_attacked(),
            highlights: world.turns.highlights().clone(),
        })
    }

    /// Cells the unit may move to. Empty unless the unit is active.
    #[must_use]
    pub fn legal_move_cells(world: &World, unit: UnitId) -> BTreeSet<CellCoord> {
        if active_unit(world) == Some(unit) {
            world.turns.highlights().moves.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Cells the unit may strike. Empty unless the unit is active.
    #[must_use]
    pub fn legal_attack_cells(world: &World, unit: UnitId) -> BTreeSet<CellCoord> {
        if active_unit(world) == Some(unit) {
            world.turns.highlights().attacks.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Phase of the turn rotation.
    #[must_use]
    pub fn turn_phase(world: &World) -> TurnPhase {
        world.turns.phase()
    }

    /// Rule deciding when activations end.
    #[must_use]
    pub fn turn_policy(world: &World) -> TurnPolicy {
        world.policy
    }

    /// Reports whether the roster is locked.
    #[must_use]
    pub fn is_battle_started(world: &World) -> bool {
        world.started
    }

    /// Team holding the field once the battle concluded.
    #[must_use]
    pub fn outcome(world: &World) -> Option<TeamId> {
        world.outcome
    }
}
