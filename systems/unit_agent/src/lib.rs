#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system translating player clicks into unit action commands.
//!
//! Agents validate requests against an [`ActivationSnapshot`] before emitting
//! commands, so the player receives an immediate reason for an illegal click.
//! The world repeats the same checks authoritatively when it applies them.

use std::collections::BTreeMap;

use thiserror::Error;
use to_arms_core::{
    ActivationSnapshot, AttackError, CellCoord, Command, EndTurnError, Event, MoveError, TeamId,
    UnitId,
};
use tracing::debug;

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AgentInput {
    /// Cell the player clicked on this frame, already converted to grid space.
    pub click: Option<CellCoord>,
    /// Indicates whether the player asked to end the active unit's turn.
    pub end_turn: bool,
}

impl AgentInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(click: Option<CellCoord>, end_turn: bool) -> Self {
        Self { click, end_turn }
    }

    /// Reports whether the input requests nothing.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.click.is_none() && !self.end_turn
    }
}

/// Reasons player input could not be turned into a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AgentError {
    /// No unit is receiving input.
    #[error("no unit is active")]
    NoActiveUnit,
    /// The active unit has no agent attached.
    #[error("no agent controls unit {0}")]
    UnknownUnit(UnitId),
    /// The move request broke a movement rule.
    #[error(transparent)]
    Move(#[from] MoveError),
    /// The attack request broke a combat rule.
    #[error(transparent)]
    Attack(#[from] AttackError),
    /// The end-of-turn request was refused.
    #[error(transparent)]
    EndTurn(#[from] EndTurnError),
    /// The clicked cell is neither a legal destination nor a legal target.
    #[error("nothing to do at {0}")]
    NoAction(CellCoord),
}

/// Controller acting on behalf of a single unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitAgent {
    unit: UnitId,
    team: TeamId,
}

impl UnitAgent {
    /// Creates an agent for the provided unit.
    #[must_use]
    pub const fn new(unit: UnitId, team: TeamId) -> Self {
        Self { unit, team }
    }

    /// Unit controlled by the agent.
    #[must_use]
    pub const fn unit(&self) -> UnitId {
        self.unit
    }

    /// Team of the controlled unit.
    #[must_use]
    pub const fn team(&self) -> TeamId {
        self.team
    }

    fn own<'a>(&self, activation: Option<&'a ActivationSnapshot>) -> Option<&'a ActivationSnapshot> {
        activation.filter(|activation| activation.unit == self.unit)
    }

    /// Requests a move to `target` when it is one of the highlighted move cells.
    pub fn attempt_move(
        &self,
        activation: Option<&ActivationSnapshot>,
        target: CellCoord,
        out: &mut Vec<Command>,
    ) -> Result<(), MoveError> {
        let activation = self.own(activation).ok_or(MoveError::NotActive)?;
        if activation.has_moved {
            return Err(MoveError::AlreadyMoved);
        }
        if !activation.highlights.moves.contains(&target) {
            return Err(MoveError::OutOfRange);
        }

        out.push(Command::MoveUnit {
            unit: self.unit,
            to: target,
        });
        Ok(())
    }

    /// Requests an attack on `target` when an enemy stands on a highlighted cell.
    ///
    /// The `team_at` closure should mirror the world's occupant query, returning
    /// the team of the unit standing on a cell.
    pub fn attempt_attack<F>(
        &self,
        activation: Option<&ActivationSnapshot>,
        target: CellCoord,
        mut team_at: F,
        out: &mut Vec<Command>,
    ) -> Result<(), AttackError>
    where
        F: FnMut(CellCoord) -> Option<TeamId>,
    {
        let activation = self.own(activation).ok_or(AttackError::NotActive)?;
        if activation.has_attacked {
            return Err(AttackError::AlreadyAttacked);
        }
        if !activation.highlights.attacks.contains(&target) {
            return Err(AttackError::OutOfRange);
        }
        let defender_team = team_at(target).ok_or(AttackError::NoTarget)?;
        if defender_team == self.team {
            return Err(AttackError::FriendlyTarget);
        }

        out.push(Command::AttackUnit {
            unit: self.unit,
            target,
        });
        Ok(())
    }

    /// Requests that the controlled unit yield its activation.
    pub fn end_turn(
        &self,
        activation: Option<&ActivationSnapshot>,
        out: &mut Vec<Command>,
    ) -> Result<(), EndTurnError> {
        let _ = self.own(activation).ok_or(EndTurnError::NotActive)?;
        out.push(Command::EndTurn { unit: self.unit });
        Ok(())
    }

    /// Resolves a frame of input into at most one command.
    ///
    /// Ending the turn takes precedence over a click. A click on a legal move
    /// cell moves; otherwise a click on a highlighted enemy attacks.
    pub fn handle<F>(
        &self,
        activation: Option<&ActivationSnapshot>,
        input: AgentInput,
        team_at: F,
        out: &mut Vec<Command>,
    ) -> Result<(), AgentError>
    where
        F: FnMut(CellCoord) -> Option<TeamId>,
    {
        if input.end_turn {
            return self.end_turn(activation, out).map_err(AgentError::from);
        }

        let Some(cell) = input.click else {
            return Ok(());
        };

        match self.attempt_move(activation, cell, out) {
            Ok(()) => return Ok(()),
            Err(MoveError::NotActive) => return Err(MoveError::NotActive.into()),
            Err(MoveError::AlreadyMoved | MoveError::OutOfRange) => {}
        }

        match self.attempt_attack(activation, cell, team_at, out) {
            Ok(()) => Ok(()),
            Err(AttackError::OutOfRange) => Err(AgentError::NoAction(cell)),
            Err(reason) => Err(reason.into()),
        }
    }
}

/// Registry of agents, one per live unit, routing input to the active unit.
#[derive(Clone, Debug, Default)]
pub struct Agents {
    agents: BTreeMap<UnitId, UnitAgent>,
}

impl Agents {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks spawned units and drops agents of fallen ones.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TerrainConfigured { .. } => self.agents.clear(),
                Event::UnitSpawned { unit, team, .. } => {
                    let _ = self.agents.insert(*unit, UnitAgent::new(*unit, *team));
                }
                Event::UnitDied { unit, .. } => {
                    let _ = self.agents.remove(unit);
                }
                _ => {}
            }
        }
    }

    /// Agent controlling the provided unit.
    #[must_use]
    pub fn get(&self, unit: UnitId) -> Option<&UnitAgent> {
        self.agents.get(&unit)
    }

    /// Number of registered agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Reports whether no agent is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Consumes world events and player input to emit commands for the active unit.
    ///
    /// The `team_at` closure should mirror the semantics of the world's
    /// occupant query so agents can tell enemies from allies.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        activation: Option<&ActivationSnapshot>,
        input: AgentInput,
        team_at: F,
        out: &mut Vec<Command>,
    ) -> Result<(), AgentError>
    where
        F: FnMut(CellCoord) -> Option<TeamId>,
    {
        self.observe(events);

        if input.is_idle() {
            return Ok(());
        }

        let activation = activation.ok_or(AgentError::NoActiveUnit)?;
        let agent = self
            .agents
            .get(&activation.unit)
            .ok_or(AgentError::UnknownUnit(activation.unit))?;

        let result = agent.handle(Some(activation), input, team_at, out);
        if let Err(error) = &result {
            debug!(unit = %activation.unit, %error, "input rejected");
        }
        result
    }
}
