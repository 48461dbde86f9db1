//! Renders battle progress as text or JSON lines.

use std::io::Write;

use anyhow::{Context, Result};
use serde_json::json;
use to_arms_core::{Event, UnitId, UnitSnapshot};
use to_arms_system_battle_report::BattleReport;
use to_arms_system_cursor::CursorMoved;
use to_arms_system_unit_agent::AgentError;

/// Writes everything the player sees to a single sink.
#[derive(Debug)]
pub(crate) struct Printer<W: Write> {
    out: W,
    json: bool,
}

impl<W: Write> Printer<W> {
    pub(crate) fn new(out: W, json: bool) -> Self {
        Self { out, json }
    }

    pub(crate) fn banner(&mut self, banner: &str) -> Result<()> {
        if self.json {
            self.json_line(&json!({ "banner": banner }))
        } else {
            self.line(banner)
        }
    }

    pub(crate) fn events(&mut self, events: &[Event]) -> Result<()> {
        for event in events {
            if self.json {
                self.json_line(event)?;
            } else {
                self.line(&describe(event))?;
            }
        }
        Ok(())
    }

    pub(crate) fn input_result(&mut self, result: Result<Vec<Event>, AgentError>) -> Result<()> {
        match result {
            Ok(events) => self.events(&events),
            Err(error) if self.json => self.json_line(&json!({ "rejected": error.to_string() })),
            Err(error) => self.line(&format!("rejected: {error}")),
        }
    }

    pub(crate) fn cursor(&mut self, moved: &CursorMoved, occupant: Option<&UnitSnapshot>) -> Result<()> {
        if self.json {
            return self.json_line(&json!({
                "cursor": { "cell": moved.cell, "tile": moved.tile, "occupant": occupant }
            }));
        }

        self.line(&format!("cursor at {}: {}", moved.cell, moved.tile.name()))?;
        if let Some(unit) = occupant {
            self.line(&format!("  {unit}"))?;
        }
        Ok(())
    }

    pub(crate) fn status(&mut self, active: Option<UnitId>, roster: &[UnitSnapshot]) -> Result<()> {
        if self.json {
            return self.json_line(&json!({ "status": { "active": active, "units": roster } }));
        }

        match active {
            Some(unit) => self.line(&format!("active unit: {unit}"))?,
            None => self.line("no unit is active")?,
        }
        for unit in roster {
            self.line(&format!("  {unit}"))?;
        }
        Ok(())
    }

    pub(crate) fn report(&mut self, report: &BattleReport) -> Result<()> {
        if self.json {
            self.json_line(&json!({ "report": report }))
        } else {
            write!(self.out, "{report}").context("failed to write battle report")
        }
    }

    fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}").context("failed to write output")
    }

    fn json_line<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value).context("failed to encode json output")?;
        self.line(&encoded)
    }
}

fn describe(event: &Event) -> String {
    match event {
        Event::TerrainConfigured { cells } => format!("terrain configured with {cells} cells"),
        Event::TerrainRejected { reason } => format!("terrain rejected: {reason}"),
        Event::UnitSpawned {
            unit,
            team,
            kind,
            cell,
        } => format!("{} {unit} joins {team} at {cell}", kind.name()),
        Event::SpawnRejected { team, cell, reason } => {
            format!("spawn for {team} at {cell} rejected: {reason}")
        }
        Event::BattleStarted { units, policy } => {
            format!("battle started with {units} units under {policy:?}")
        }
        Event::BattleRejected { reason } => format!("battle rejected: {reason}"),
        Event::UnitActivated { unit, cell } => format!("{unit} is active at {cell}"),
        Event::HighlightsUpdated {
            unit,
            moves,
            attacks,
        } => format!("{unit} may move to {moves} cells and strike {attacks}"),
        Event::UnitMoved { unit, from, to } => format!("{unit} moves from {from} to {to}"),
        Event::MoveRejected { unit, to, reason } => {
            format!("{unit} cannot move to {to}: {reason}")
        }
        Event::UnitAttacked {
            attacker,
            defender,
            damage,
            remaining_health,
        } => format!("{attacker} hits {defender} for {damage}, {remaining_health} health left"),
        Event::AttackRejected {
            unit,
            target,
            reason,
        } => format!("{unit} cannot attack {target}: {reason}"),
        Event::UnitDied { unit, cell } => format!("{unit} falls at {cell}"),
        Event::EndTurnRejected { unit, reason } => format!("{unit} cannot end the turn: {reason}"),
        Event::TurnAdvanced { from, to } => format!("turn passes from {from} to {to}"),
        Event::BattleConcluded { winner } => format!("the battle is over, {winner} wins"),
    }
}
