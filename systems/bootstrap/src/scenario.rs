//! TOML scenario files describing a battle map and its starting roster.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use to_arms_core::{CellCoord, TeamId, TerrainTile, TileKind, TurnPolicy, UnitKind, UnitStats};

/// Scenario format version understood by this crate.
pub const SUPPORTED_SCENARIO_VERSION: u32 = 1;

/// Longest side, in cells, of the rectangle a scenario may declare.
pub const MAX_TERRAIN_SIDE: u32 = 256;

/// Reasons a scenario could not be loaded.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The scenario file could not be read.
    #[error("failed to read scenario at {}", path.display())]
    Io {
        /// Location of the unreadable file.
        path: PathBuf,
        /// Underlying failure reported by the filesystem.
        #[source]
        source: std::io::Error,
    },
    /// The contents are not valid scenario TOML.
    #[error("failed to parse scenario toml contents")]
    Parse(#[from] toml::de::Error),
    /// The scenario declares a format this crate does not understand.
    #[error("unsupported scenario version {found}; expected {expected}")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Version this crate understands.
        expected: u32,
    },
    /// The roster is empty.
    #[error("scenario defines no units")]
    NoUnits,
    /// A unit starts on a cell without terrain.
    #[error("unit {index} starts on void cell {cell}")]
    UnitOnVoid {
        /// Position of the unit in the `units` list.
        index: usize,
        /// Offending cell.
        cell: CellCoord,
    },
    /// Two units start on the same cell.
    #[error("units {first} and {second} both start on {cell}")]
    SharedCell {
        /// Position of the unit that claimed the cell first.
        first: usize,
        /// Position of the unit that claimed it again.
        second: usize,
        /// Contested cell.
        cell: CellCoord,
    },
    /// A difficulty modifier is negative or not finite.
    #[error("unit {index} has invalid modifier {modifier}")]
    InvalidModifier {
        /// Position of the unit in the `units` list.
        index: usize,
        /// Offending modifier.
        modifier: f32,
    },
    /// Replacement statistics would leave a unit dead before the battle starts.
    #[error("unit {index} must start with positive health")]
    InvalidStats {
        /// Position of the unit in the `units` list.
        index: usize,
    },
    /// The terrain rectangle exceeds the supported extent.
    #[error("terrain {width}x{height} exceeds the {max}x{max} limit", max = MAX_TERRAIN_SIDE)]
    TerrainTooLarge {
        /// Declared number of columns.
        width: u32,
        /// Declared number of rows.
        height: u32,
    },
}

/// Battle description loaded from a scenario file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Format version of the file.
    pub version: u32,
    /// Rule deciding when activations end.
    #[serde(default)]
    pub policy: TurnPolicy,
    /// Battle map layout.
    pub terrain: TerrainSpec,
    /// Starting roster in turn order.
    #[serde(default)]
    pub units: Vec<UnitSpec>,
}

/// Rectangular battle map anchored at the origin, with holes and repaints.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerrainSpec {
    /// Number of columns of the rectangle.
    pub width: u32,
    /// Number of rows of the rectangle.
    pub height: u32,
    /// Tile covering the rectangle.
    #[serde(default)]
    pub tile: TileKind,
    /// Cells removed from the rectangle.
    #[serde(default)]
    pub void: Vec<[i32; 2]>,
    /// Cells repainted, or added outside the rectangle, after holes are cut.
    #[serde(default)]
    pub tiles: Vec<TileSpec>,
}

/// Single repainted cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TileSpec {
    /// Cell to paint.
    pub cell: [i32; 2],
    /// Tile drawn on the cell.
    pub kind: TileKind,
}

/// Unit placed on the map when the scenario boots.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitSpec {
    /// Team the unit fights for.
    pub team: TeamId,
    /// Template providing base statistics.
    pub kind: UnitKind,
    /// Starting cell.
    pub cell: [i32; 2],
    /// Difficulty modifier.
    #[serde(default = "default_modifier")]
    pub modifier: f32,
    /// Replacement for the template statistics.
    #[serde(default)]
    pub stats: Option<UnitStats>,
}

impl TerrainSpec {
    fn extent(&self) -> Result<(i32, i32), ScenarioError> {
        let too_large = || ScenarioError::TerrainTooLarge {
            width: self.width,
            height: self.height,
        };
        if self.width > MAX_TERRAIN_SIDE || self.height > MAX_TERRAIN_SIDE {
            return Err(too_large());
        }
        let width = i32::try_from(self.width).map_err(|_| too_large())?;
        let height = i32::try_from(self.height).map_err(|_| too_large())?;
        Ok((width, height))
    }
}

impl UnitSpec {
    /// Starting cell as a grid coordinate.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        CellCoord::new(self.cell[0], self.cell[1])
    }
}

fn default_modifier() -> f32 {
    1.0
}

impl Scenario {
    /// Parses and validates scenario TOML.
    pub fn from_toml_str(contents: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = toml::from_str(contents)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Reads, parses and validates the scenario stored at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Defined tiles of the battle map, ordered by row then column.
    ///
    /// Fails with [`ScenarioError::TerrainTooLarge`] when either side exceeds
    /// [`MAX_TERRAIN_SIDE`].
    pub fn tiles(&self) -> Result<Vec<TerrainTile>, ScenarioError> {
        let (width, height) = self.terrain.extent()?;
        let mut cells: BTreeMap<(i32, i32), TileKind> = BTreeMap::new();

        for y in 0..height {
            for x in 0..width {
                let _ = cells.insert((y, x), self.terrain.tile);
            }
        }
        for [x, y] in &self.terrain.void {
            let _ = cells.remove(&(*y, *x));
        }
        for paint in &self.terrain.tiles {
            let [x, y] = paint.cell;
            let _ = cells.insert((y, x), paint.kind);
        }

        Ok(cells
            .into_iter()
            .map(|((y, x), kind)| TerrainTile::new(CellCoord::new(x, y), kind))
            .collect())
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if self.version != SUPPORTED_SCENARIO_VERSION {
            return Err(ScenarioError::UnsupportedVersion {
                found: self.version,
                expected: SUPPORTED_SCENARIO_VERSION,
            });
        }
        if self.units.is_empty() {
            return Err(ScenarioError::NoUnits);
        }

        let defined: HashMap<CellCoord, TileKind> = self
            .tiles()?
            .into_iter()
            .map(|tile| (tile.cell, tile.kind))
            .collect();
        let mut claimed: HashMap<CellCoord, usize> = HashMap::new();

        for (index, unit) in self.units.iter().enumerate() {
            if !unit.modifier.is_finite() || unit.modifier < 0.0 {
                return Err(ScenarioError::InvalidModifier {
                    index,
                    modifier: unit.modifier,
                });
            }
            if unit.stats.is_some_and(|stats| !stats.is_viable()) {
                return Err(ScenarioError::InvalidStats { index });
            }
            let cell = unit.cell();
            if !defined.contains_key(&cell) {
                return Err(ScenarioError::UnitOnVoid { index, cell });
            }
            if let Some(first) = claimed.insert(cell, index) {
                return Err(ScenarioError::SharedCell {
                    first,
                    second: index,
                    cell,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKIRMISH: &str = r#"
        version = 1
        policy = "move-ends-turn"

        [terrain]
        width = 3
        height = 2
        tile = "grass"
        void = [[1, 1]]
        tiles = [{ cell = [2, 0], kind = "stone" }, { cell = [5, 5], kind = "sand" }]

        [[units]]
        team = 1
        kind = "knight"
        cell = [0, 0]

        [[units]]
        team = 2
        kind = "archer"
        cell = [2, 1]
        modifier = 1.5
    "#;

    #[test]
    fn skirmish_parses_with_defaults() {
        let scenario = Scenario::from_toml_str(SKIRMISH).expect("scenario should parse");

        assert_eq!(scenario.policy, TurnPolicy::MoveEndsTurn);
        assert_eq!(scenario.units.len(), 2);
        assert_eq!(scenario.units[0].modifier, 1.0);
        assert_eq!(scenario.units[0].kind, UnitKind::Knight);
        assert_eq!(scenario.units[1].team, TeamId::new(2));
        assert_eq!(scenario.units[1].cell(), CellCoord::new(2, 1));
    }

    #[test]
    fn tiles_cut_holes_and_apply_repaints() {
        let scenario = Scenario::from_toml_str(SKIRMISH).expect("scenario should parse");
        let tiles = scenario.tiles().expect("terrain within limits");

        assert_eq!(tiles.len(), 6);
        assert!(!tiles.iter().any(|tile| tile.cell == CellCoord::new(1, 1)));
        assert!(tiles.contains(&TerrainTile::new(CellCoord::new(2, 0), TileKind::Stone)));
        assert!(tiles.contains(&TerrainTile::new(CellCoord::new(5, 5), TileKind::Sand)));
        assert_eq!(tiles[0], TerrainTile::new(CellCoord::new(0, 0), TileKind::Grass));
    }

    #[test]
    fn unknown_versions_are_rejected() {
        let contents = SKIRMISH.replace("version = 1", "version = 2");

        let error = Scenario::from_toml_str(&contents).expect_err("version 2 is unknown");

        assert!(matches!(
            error,
            ScenarioError::UnsupportedVersion {
                found: 2,
                expected: 1
            }
        ));
    }

    #[test]
    fn units_on_void_are_rejected() {
        let contents = SKIRMISH.replace("cell = [2, 1]", "cell = [1, 1]");

        let error = Scenario::from_toml_str(&contents).expect_err("(1, 1) is void");

        assert!(matches!(error, ScenarioError::UnitOnVoid { index: 1, .. }));
    }

    #[test]
    fn shared_cells_are_rejected() {
        let contents = SKIRMISH.replace("cell = [2, 1]", "cell = [0, 0]");

        let error = Scenario::from_toml_str(&contents).expect_err("cell claimed twice");

        assert!(matches!(
            error,
            ScenarioError::SharedCell {
                first: 0,
                second: 1,
                ..
            }
        ));
    }

    #[test]
    fn negative_modifiers_are_rejected() {
        let contents = SKIRMISH.replace("modifier = 1.5", "modifier = -0.5");

        let error = Scenario::from_toml_str(&contents).expect_err("modifier below zero");

        assert!(matches!(error, ScenarioError::InvalidModifier { index: 1, .. }));
    }

    #[test]
    fn replacement_stats_need_positive_health() {
        let contents = SKIRMISH.replace(
            "modifier = 1.5",
            "modifier = 1.5\n        stats = { max_health = -5, move_range = 2, attack_range = 1, strength = 2, armor = 2, base_damage = 2 }",
        );

        let error = Scenario::from_toml_str(&contents).expect_err("unit starts dead");

        assert!(matches!(error, ScenarioError::InvalidStats { index: 1 }));
    }

    #[test]
    fn oversized_terrain_is_rejected_before_tiles_are_built() {
        let contents = SKIRMISH
            .replace("width = 3", "width = 60000")
            .replace("height = 2", "height = 60000");

        let error = Scenario::from_toml_str(&contents).expect_err("map is too large");

        assert!(matches!(
            error,
            ScenarioError::TerrainTooLarge {
                width: 60000,
                height: 60000
            }
        ));
    }

    #[test]
    fn tiles_refuse_to_truncate_huge_sides() {
        let mut scenario = Scenario::from_toml_str(SKIRMISH).expect("scenario should parse");
        scenario.terrain.width = u32::MAX;

        let error = scenario.tiles().expect_err("side does not fit the grid");

        assert!(matches!(
            error,
            ScenarioError::TerrainTooLarge {
                width: u32::MAX,
                height: 2
            }
        ));
    }

    #[test]
    fn terrain_at_the_limit_is_accepted() {
        let contents = SKIRMISH
            .replace("width = 3", &format!("width = {MAX_TERRAIN_SIDE}"))
            .replace("height = 2", &format!("height = {MAX_TERRAIN_SIDE}"));

        let scenario = Scenario::from_toml_str(&contents).expect("limit is inclusive");

        let side = MAX_TERRAIN_SIDE as usize;
        assert_eq!(scenario.tiles().expect("within limits").len(), side * side - 1);
    }

    #[test]
    fn unknown_unit_kinds_fail_to_parse() {
        let contents = SKIRMISH.replace("\"archer\"", "\"dragon\"");

        let error = Scenario::from_toml_str(&contents).expect_err("dragons are not a template");

        assert!(matches!(error, ScenarioError::Parse(_)));
    }

    #[test]
    fn empty_roster_is_rejected() {
        let contents = r#"
            version = 1

            [terrain]
            width = 2
            height = 2
        "#;

        let error = Scenario::from_toml_str(contents).expect_err("no units");

        assert!(matches!(error, ScenarioError::NoUnits));
    }

    #[test]
    fn missing_files_report_their_path() {
        let error = Scenario::load("does/not/exist.toml").expect_err("file is missing");

        assert!(error.to_string().contains("does/not/exist.toml"));
    }
}
