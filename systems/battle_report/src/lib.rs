#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic battle report system that tallies the event stream.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use to_arms_core::{Event, TeamId, UnitId};

/// Per-unit totals accumulated over a battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UnitTally {
    /// Team the unit fought for.
    pub team: Option<TeamId>,
    /// Sum of damage the unit dealt.
    pub damage_dealt: u64,
    /// Sum of damage the unit received.
    pub damage_taken: u64,
    /// Number of attacks the unit landed.
    pub attacks: u32,
    /// Number of enemies the unit slew.
    pub kills: u32,
    /// Number of moves the unit made.
    pub moves: u32,
    /// Number of activations the unit completed.
    pub turns: u32,
    /// Whether the unit died.
    pub fallen: bool,
}

/// Pure system that folds world events into a battle summary.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BattleReport {
    units: BTreeMap<UnitId, UnitTally>,
    turns: u32,
    rejections: u32,
    winner: Option<TeamId>,
    #[serde(skip)]
    last_blow: Option<(UnitId, UnitId)>,
}

impl BattleReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes a batch of world events, updating the totals.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TerrainConfigured { .. } => *self = Self::default(),
                Event::UnitSpawned { unit, team, .. } => {
                    let tally = self.units.entry(*unit).or_default();
                    tally.team = Some(*team);
                }
                Event::UnitMoved { unit, .. } => self.tally(*unit).moves += 1,
                Event::UnitAttacked {
                    attacker,
                    defender,
                    damage,
                    ..
                } => {
                    let attacker_tally = self.tally(*attacker);
                    attacker_tally.damage_dealt += u64::from(*damage);
                    attacker_tally.attacks += 1;
                    self.tally(*defender).damage_taken += u64::from(*damage);
                    self.last_blow = Some((*attacker, *defender));
                }
                Event::UnitDied { unit, .. } => {
                    self.tally(*unit).fallen = true;
                    if let Some((attacker, defender)) = self.last_blow.take() {
                        if defender == *unit {
                            self.tally(attacker).kills += 1;
                        }
                    }
                }
                Event::TurnAdvanced { from, .. } => {
                    self.turns += 1;
                    self.tally(*from).turns += 1;
                }
                Event::TerrainRejected { .. }
                | Event::SpawnRejected { .. }
                | Event::BattleRejected { .. }
                | Event::MoveRejected { .. }
                | Event::AttackRejected { .. }
                | Event::EndTurnRejected { .. } => self.rejections += 1,
                Event::BattleConcluded { winner } => self.winner = Some(*winner),
                Event::BattleStarted { .. }
                | Event::UnitActivated { .. }
                | Event::HighlightsUpdated { .. } => {}
            }
        }
    }

    fn tally(&mut self, unit: UnitId) -> &mut UnitTally {
        self.units.entry(unit).or_default()
    }

    /// Totals of a single unit, alive or fallen.
    #[must_use]
    pub fn unit(&self, unit: UnitId) -> Option<&UnitTally> {
        self.units.get(&unit)
    }

    /// Totals of every unit seen, ordered by identifier.
    pub fn units(&self) -> impl Iterator<Item = (UnitId, &UnitTally)> {
        self.units.iter().map(|(unit, tally)| (*unit, tally))
    }

    /// Number of completed turns.
    #[must_use]
    pub const fn turns(&self) -> u32 {
        self.turns
    }

    /// Number of commands the world refused.
    #[must_use]
    pub const fn rejections(&self) -> u32 {
        self.rejections
    }

    /// Team that held the field, once the battle concluded.
    #[must_use]
    pub const fn winner(&self) -> Option<TeamId> {
        self.winner
    }
}

impl fmt::Display for BattleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "battle report: {} turns, {} rejected commands",
            self.turns, self.rejections
        )?;
        match self.winner {
            Some(winner) => writeln!(f, ", {winner} holds the field")?,
            None => writeln!(f, ", no winner yet")?,
        }

        for (unit, tally) in &self.units {
            let team = tally
                .team
                .map_or_else(|| "unknown team".to_owned(), |team| team.to_string());
            writeln!(
                f,
                "  {unit} ({team}): dealt {}, taken {}, kills {}, moves {}, turns {}{}",
                tally.damage_dealt,
                tally.damage_taken,
                tally.kills,
                tally.moves,
                tally.turns,
                if tally.fallen { ", fallen" } else { "" },
            )?;
        }
        Ok(())
    }
}
