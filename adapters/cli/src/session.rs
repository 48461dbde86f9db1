//! Wires the world and the pure systems together for one battle.

use to_arms_core::{CellCoord, Command, Event, TeamId, UnitId, UnitSnapshot};
use to_arms_system_battle_report::BattleReport;
use to_arms_system_bootstrap::{Bootstrap, Scenario, ScenarioError};
use to_arms_system_cursor::{Cursor, CursorInput, CursorMoved};
use to_arms_system_unit_agent::{AgentError, AgentInput, Agents};
use to_arms_world::{self as world, query, World};

/// Authoritative world plus the systems observing it.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    agents: Agents,
    cursor: Cursor,
    report: BattleReport,
    unseen: Vec<Event>,
}

impl Session {
    /// Stages the scenario and starts the battle, returning the staging events.
    pub(crate) fn start(scenario: &Scenario) -> Result<(Self, Vec<Event>), ScenarioError> {
        let commands = Bootstrap.commands(scenario)?;
        let mut session = Self {
            world: World::new(),
            agents: Agents::new(),
            cursor: Cursor::new(),
            report: BattleReport::new(),
            unseen: Vec::new(),
        };
        let events = session.execute(commands);
        Ok((session, events))
    }

    pub(crate) fn banner(&self) -> &str {
        Bootstrap.welcome_banner(&self.world)
    }

    /// Routes player input to the active unit's agent and applies the resulting command.
    pub(crate) fn input(&mut self, input: AgentInput) -> Result<Vec<Event>, AgentError> {
        let activation = query::activation(&self.world);
        let world = &self.world;
        let mut commands = Vec::new();
        let routed = self.agents.handle(
            &self.unseen,
            activation.as_ref(),
            input,
            |cell| team_at(world, cell),
            &mut commands,
        );
        self.unseen.clear();
        routed?;
        Ok(self.execute(commands))
    }

    /// Moves the cursor, returning where it settled and who stands there.
    pub(crate) fn hover(&mut self, cell: CellCoord) -> Option<(CursorMoved, Option<UnitSnapshot>)> {
        let world = &self.world;
        let moved = self
            .cursor
            .handle(CursorInput::new(Some(cell)), |cell| query::tile_at(world, cell))?;
        let occupant = query::occupant(world, moved.cell).and_then(|unit| query::unit(world, unit));
        Some((moved, occupant))
    }

    pub(crate) fn roster(&self) -> Vec<UnitSnapshot> {
        query::unit_view(&self.world).into_vec()
    }

    pub(crate) fn active_unit(&self) -> Option<UnitId> {
        query::active_unit(&self.world)
    }

    pub(crate) fn outcome(&self) -> Option<TeamId> {
        query::outcome(&self.world)
    }

    pub(crate) fn report(&self) -> &BattleReport {
        &self.report
    }

    fn execute(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        self.report.handle(&events);
        self.unseen.extend(events.iter().cloned());
        events
    }
}

fn team_at(world: &World, cell: CellCoord) -> Option<TeamId> {
    let unit = query::occupant(world, cell)?;
    query::unit(world, unit).map(|snapshot| snapshot.team)
}
