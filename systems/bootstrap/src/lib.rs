#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a To Arms battle from a scenario.

mod scenario;

use to_arms_core::Command;
use to_arms_world::{query, World};
use tracing::debug;

pub use scenario::{
    Scenario, ScenarioError, TerrainSpec, TileSpec, UnitSpec, MAX_TERRAIN_SIDE,
    SUPPORTED_SCENARIO_VERSION,
};

/// Produces data required to greet the player and stage the battle.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Translates a scenario into the command batch that stages and starts the battle.
    ///
    /// The batch configures the terrain, spawns every unit in roster order and
    /// finally begins the battle under the scenario's turn policy. Fails when
    /// the terrain exceeds the supported extent.
    pub fn commands(&self, scenario: &Scenario) -> Result<Vec<Command>, ScenarioError> {
        let tiles = scenario.tiles()?;
        debug!(
            tiles = tiles.len(),
            units = scenario.units.len(),
            "staging scenario"
        );

        let mut commands = Vec::with_capacity(scenario.units.len() + 2);
        commands.push(Command::ConfigureTerrain { tiles });
        commands.extend(scenario.units.iter().map(|unit| Command::SpawnUnit {
            team: unit.team,
            kind: unit.kind,
            cell: unit.cell(),
            modifier: unit.modifier,
            stats: unit.stats,
        }));
        commands.push(Command::BeginBattle {
            policy: scenario.policy,
        });
        Ok(commands)
    }
}
