#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the To Arms rules engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when a battle boots.
pub const WELCOME_BANNER: &str = "To arms!";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the battle map with the provided tiles. Cells left out are void.
    ConfigureTerrain {
        /// Defined tiles composing the battle map.
        tiles: Vec<TerrainTile>,
    },
    /// Requests that a unit join the roster before the battle begins.
    SpawnUnit {
        /// Team the unit fights for.
        team: TeamId,
        /// Template providing the unit's base statistics.
        kind: UnitKind,
        /// Cell the unit starts on.
        cell: CellCoord,
        /// Difficulty modifier scaling the unit's combat forces.
        modifier: f32,
        /// Optional replacement for the template statistics.
        stats: Option<UnitStats>,
    },
    /// Locks the roster and activates the first unit.
    BeginBattle {
        /// Rule deciding when a unit's actions end its activation.
        policy: TurnPolicy,
    },
    /// Requests that the active unit relocate to the provided cell.
    MoveUnit {
        /// Unit attempting to move.
        unit: UnitId,
        /// Destination cell.
        to: CellCoord,
    },
    /// Requests that the active unit attack whatever occupies the target cell.
    AttackUnit {
        /// Unit performing the attack.
        unit: UnitId,
        /// Cell holding the intended defender.
        target: CellCoord,
    },
    /// Requests that the active unit yield the rest of its activation.
    EndTurn {
        /// Unit ending its turn.
        unit: UnitId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Event {
    /// Confirms that the battle map was replaced.
    TerrainConfigured {
        /// Number of passable cells on the new map.
        cells: usize,
    },
    /// Reports that a terrain change was refused.
    TerrainRejected {
        /// Specific reason the terrain could not change.
        reason: TerrainError,
    },
    /// Confirms that a unit joined the roster.
    UnitSpawned {
        /// Identifier assigned to the unit by the world.
        unit: UnitId,
        /// Team the unit fights for.
        team: TeamId,
        /// Template the unit was created from.
        kind: UnitKind,
        /// Cell the unit occupies.
        cell: CellCoord,
    },
    /// Reports that a spawn request was refused.
    SpawnRejected {
        /// Team named in the request.
        team: TeamId,
        /// Cell named in the request.
        cell: CellCoord,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Announces that the roster is locked and turns are running.
    BattleStarted {
        /// Number of units on the roster.
        units: usize,
        /// Rule deciding when activations end.
        policy: TurnPolicy,
    },
    /// Reports that a battle could not begin.
    BattleRejected {
        /// Specific reason the battle could not begin.
        reason: BattleError,
    },
    /// Announces the unit that now receives input.
    UnitActivated {
        /// Newly active unit.
        unit: UnitId,
        /// Cell the unit occupies.
        cell: CellCoord,
    },
    /// Reports that the active unit's highlight sets were recomputed.
    HighlightsUpdated {
        /// Active unit owning the highlights.
        unit: UnitId,
        /// Number of legal move cells.
        moves: usize,
        /// Number of legal attack cells.
        attacks: usize,
    },
    /// Confirms that a unit relocated between two cells.
    UnitMoved {
        /// Unit that moved.
        unit: UnitId,
        /// Cell the unit occupied before moving.
        from: CellCoord,
        /// Cell the unit occupies after moving.
        to: CellCoord,
    },
    /// Reports that a move request was refused.
    MoveRejected {
        /// Unit named in the request.
        unit: UnitId,
        /// Destination named in the request.
        to: CellCoord,
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Confirms that an attack was resolved.
    UnitAttacked {
        /// Unit that attacked.
        attacker: UnitId,
        /// Unit that received the blow.
        defender: UnitId,
        /// Damage dealt by the attack.
        damage: u32,
        /// Defender health after the attack. Zero or below means the defender died.
        remaining_health: i32,
    },
    /// Reports that an attack request was refused.
    AttackRejected {
        /// Unit named in the request.
        unit: UnitId,
        /// Target cell named in the request.
        target: CellCoord,
        /// Specific reason the attack failed.
        reason: AttackError,
    },
    /// Announces that a unit was removed from the battle.
    UnitDied {
        /// Unit that died.
        unit: UnitId,
        /// Cell the unit occupied, now vacated.
        cell: CellCoord,
    },
    /// Reports that an end-of-turn request was refused.
    EndTurnRejected {
        /// Unit named in the request.
        unit: UnitId,
        /// Specific reason the request failed.
        reason: EndTurnError,
    },
    /// Announces that the turn passed from one unit to the next.
    TurnAdvanced {
        /// Unit whose turn ended.
        from: UnitId,
        /// Unit whose turn begins.
        to: UnitId,
    },
    /// Announces that a single team remains on the field.
    BattleConcluded {
        /// Team holding the field.
        winner: TeamId,
    },
}

/// Location of a single grid cell expressed as lattice coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal lattice coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical lattice coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Number of king moves separating two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Iterates the eight cells one step away, orthogonal and diagonal.
    ///
    /// Neighbours that would overflow the coordinate space are skipped.
    pub fn neighbors(self) -> impl Iterator<Item = CellCoord> {
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dx, dy)| {
            let x = self.x.checked_add(dx)?;
            let y = self.y.checked_add(dy)?;
            Some(CellCoord::new(x, y))
        })
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

static NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Unique identifier assigned to a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Team affiliation deciding which units may attack each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(u8);

impl TeamId {
    /// Creates a new team identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team {}", self.0)
    }
}

/// Visual content of a defined terrain cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    /// Open grassland.
    #[default]
    Grass,
    /// Packed earth.
    Dirt,
    /// Flagstones or bare rock.
    Stone,
    /// Loose sand.
    Sand,
}

impl TileKind {
    /// Lowercase name used by scenarios and hover descriptions.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grass => "grass",
            Self::Dirt => "dirt",
            Self::Stone => "stone",
            Self::Sand => "sand",
        }
    }
}

/// Single defined cell of the battle map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerrainTile {
    /// Cell the tile covers.
    pub cell: CellCoord,
    /// Content drawn on the cell.
    pub kind: TileKind,
}

impl TerrainTile {
    /// Creates a tile descriptor.
    #[must_use]
    pub const fn new(cell: CellCoord, kind: TileKind) -> Self {
        Self { cell, kind }
    }
}

/// Unit templates available when assembling a roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Line infantry; the baseline template.
    Footman,
    /// Fragile unit that strikes from three cells away.
    Archer,
    /// Heavy, fast melee unit.
    Knight,
}

impl UnitKind {
    /// Base statistics associated with the template.
    #[must_use]
    pub const fn stats(self) -> UnitStats {
        match self {
            Self::Footman => UnitStats {
                max_health: 10,
                move_range: 2,
                attack_range: 1,
                strength: 2,
                armor: 2,
                base_damage: 2,
            },
            Self::Archer => UnitStats {
                max_health: 8,
                move_range: 2,
                attack_range: 3,
                strength: 2,
                armor: 1,
                base_damage: 2,
            },
            Self::Knight => UnitStats {
                max_health: 14,
                move_range: 3,
                attack_range: 1,
                strength: 3,
                armor: 3,
                base_damage: 3,
            },
        }
    }

    /// Lowercase name used by scenarios and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Footman => "footman",
            Self::Archer => "archer",
            Self::Knight => "knight",
        }
    }
}

/// Base statistics of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitStats {
    /// Health the unit starts the battle with.
    pub max_health: i32,
    /// Number of steps the unit may take in one move.
    pub move_range: u32,
    /// Number of steps separating the unit from cells it may strike.
    pub attack_range: u32,
    /// Drives both attack and defence forces.
    pub strength: u32,
    /// Scales the defence force.
    pub armor: u32,
    /// Scales the attack force.
    pub base_damage: u32,
}

impl UnitStats {
    /// Reports whether a unit with these statistics starts the battle alive.
    #[must_use]
    pub const fn is_viable(&self) -> bool {
        self.max_health > 0
    }
}

/// Inputs of the damage formula for one combatant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatProfile {
    /// Drives both attack and defence forces.
    pub strength: u32,
    /// Scales the defence force.
    pub armor: u32,
    /// Scales the attack force.
    pub base_damage: u32,
    /// Difficulty modifier applied to both forces.
    pub modifier: f32,
}

impl CombatProfile {
    /// Builds a profile from unit statistics and a difficulty modifier.
    #[must_use]
    pub const fn from_stats(stats: &UnitStats, modifier: f32) -> Self {
        Self {
            strength: stats.strength,
            armor: stats.armor,
            base_damage: stats.base_damage,
            modifier,
        }
    }

    /// Force the combatant brings when attacking.
    #[must_use]
    pub fn attack_force(&self) -> f64 {
        f64::from(self.strength) * f64::from(self.base_damage) * f64::from(self.modifier)
    }

    /// Force the combatant brings when defending.
    #[must_use]
    pub fn defend_force(&self) -> f64 {
        f64::from(self.strength) * f64::from(self.armor) * f64::from(self.modifier)
    }
}

/// Computes the damage an attacker deals to a defender.
///
/// ```text
/// attack = attacker.strength * attacker.base_damage * attacker.modifier
/// defend = defender.strength * defender.armor * defender.modifier
/// damage = floor(attack / (attack + defend) * attacker.strength * 5)
/// ```
///
/// A combined force of zero (or any non-finite intermediate) deals no damage.
#[must_use]
pub fn resolve_damage(attacker: &CombatProfile, defender: &CombatProfile) -> u32 {
    let attack_force = attacker.attack_force();
    let total_force = attack_force + defender.defend_force();
    if !total_force.is_finite() || total_force <= 0.0 {
        return 0;
    }

    let damage = attack_force / total_force * f64::from(attacker.strength) * DAMAGE_SCALE;
    if !damage.is_finite() || damage <= 0.0 {
        return 0;
    }

    damage.floor().min(f64::from(u32::MAX)) as u32
}

const DAMAGE_SCALE: f64 = 5.0;

/// Rule deciding when a unit's actions end its activation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TurnPolicy {
    /// The unit may move and attack in either order; spending both ends the turn.
    #[default]
    ActionsExhausted,
    /// A successful move ends the turn immediately. Attacking first is allowed.
    MoveEndsTurn,
}

/// Phase of the turn rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    /// No unit receives input: the battle has not started or is over.
    Idle,
    /// The unit at the given roster index receives input.
    UnitActive(usize),
    /// The rotation is handing control to the next unit.
    TurnAdvancing,
}

/// Legal destination and target cells of the active unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Highlights {
    /// Cells the unit may move to.
    pub moves: BTreeSet<CellCoord>,
    /// Cells the unit may strike.
    pub attacks: BTreeSet<CellCoord>,
}

impl Highlights {
    /// Removes every highlighted cell.
    pub fn clear(&mut self) {
        self.moves.clear();
        self.attacks.clear();
    }

    /// Reports whether neither set holds a cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.attacks.is_empty()
    }
}

/// Read-only description of the unit currently receiving input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivationSnapshot {
    /// Active unit.
    pub unit: UnitId,
    /// Team of the active unit.
    pub team: TeamId,
    /// Cell the active unit occupies.
    pub cell: CellCoord,
    /// Whether the unit already moved during this activation.
    pub has_moved: bool,
    /// Whether the unit already attacked during this activation.
    pub has_attacked: bool,
    /// Legal destination and target cells.
    pub highlights: Highlights,
}

/// Immutable representation of a single unit's state used for queries.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Team the unit fights for.
    pub team: TeamId,
    /// Template the unit was created from.
    pub kind: UnitKind,
    /// Grid cell currently occupied by the unit.
    pub cell: CellCoord,
    /// Current health. Zero or below means the unit is dead.
    pub health: i32,
    /// Base statistics of the unit.
    pub stats: UnitStats,
    /// Difficulty modifier applied in combat.
    pub modifier: f32,
}

impl fmt::Display for UnitSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) at {}: health {}/{}, move {}, reach {}, strength {}, armor {}, damage {}, modifier {}",
            self.kind.name(),
            self.id,
            self.team,
            self.cell,
            self.health,
            self.stats.max_health,
            self.stats.move_range,
            self.stats.attack_range,
            self.stats.strength,
            self.stats.armor,
            self.stats.base_damage,
            self.modifier,
        )
    }
}

/// Read-only snapshot describing all units on the roster, in turn order.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from snapshots already in turn order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<UnitSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in turn order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of the provided unit.
    #[must_use]
    pub fn get(&self, unit: UnitId) -> Option<&UnitSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == unit)
    }

    /// Number of units captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}

/// Reasons a terrain change may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum TerrainError {
    /// Terrain is fixed once the battle begins.
    #[error("terrain cannot change during a battle")]
    BattleInProgress,
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum SpawnError {
    /// The roster is locked once the battle begins.
    #[error("the roster is locked during a battle")]
    BattleInProgress,
    /// The requested cell is void.
    #[error("the cell is void")]
    Void,
    /// Another unit already occupies the requested cell.
    #[error("the cell is occupied")]
    Occupied,
    /// The difficulty modifier is negative or not finite.
    #[error("the modifier must be finite and non-negative")]
    InvalidModifier,
    /// The statistics would leave the unit dead on arrival.
    #[error("the unit must start with positive health")]
    InvalidStats,
}

/// Reasons a battle may fail to begin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum BattleError {
    /// A battle is already running or has concluded.
    #[error("the battle already started")]
    AlreadyStarted,
    /// No unit was spawned.
    #[error("the roster is empty")]
    EmptyRoster,
}

/// Reasons a move request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum MoveError {
    /// The unit is not the active unit.
    #[error("the unit is not active")]
    NotActive,
    /// The unit already moved during this activation.
    #[error("the unit already moved this turn")]
    AlreadyMoved,
    /// The destination is not a legal move cell.
    #[error("the destination is not a legal move")]
    OutOfRange,
}

/// Reasons an attack request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum AttackError {
    /// The unit is not the active unit.
    #[error("the unit is not active")]
    NotActive,
    /// The unit already attacked during this activation.
    #[error("the unit already attacked this turn")]
    AlreadyAttacked,
    /// The target cell is not a legal attack cell.
    #[error("the target is out of reach")]
    OutOfRange,
    /// No unit occupies the target cell.
    #[error("no unit stands on the target cell")]
    NoTarget,
    /// The unit on the target cell fights for the attacker's team.
    #[error("the target is an ally")]
    FriendlyTarget,
}

/// Reasons an end-of-turn request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum EndTurnError {
    /// The unit is not the active unit.
    #[error("the unit is not active")]
    NotActive,
}

#[cfg(test)]
mod tests {
    use super::{
        resolve_damage, CellCoord, CombatProfile, MoveError, TeamId, TurnPolicy, UnitId,
        UnitKind, UnitStats,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn profile(strength: u32, armor: u32, base_damage: u32, modifier: f32) -> CombatProfile {
        CombatProfile {
            strength,
            armor,
            base_damage,
            modifier,
        }
    }

    #[test]
    fn equal_forces_deal_half_of_strength_scaled_damage() {
        let attacker = profile(5, 0, 5, 1.0);
        let defender = profile(5, 5, 0, 1.0);

        assert_eq!(attacker.attack_force(), 25.0);
        assert_eq!(defender.defend_force(), 25.0);
        assert_eq!(resolve_damage(&attacker, &defender), 12);
    }

    #[test]
    fn zero_total_force_deals_no_damage() {
        let attacker = profile(0, 3, 4, 1.0);
        let defender = profile(0, 3, 4, 1.0);
        assert_eq!(resolve_damage(&attacker, &defender), 0);

        let muted = profile(4, 4, 4, 0.0);
        assert_eq!(resolve_damage(&muted, &muted), 0);
    }

    #[test]
    fn unarmored_defender_takes_full_scaled_damage() {
        let attacker = profile(3, 0, 2, 1.0);
        let defender = profile(3, 0, 0, 1.0);
        assert_eq!(resolve_damage(&attacker, &defender), 15);
    }

    #[test]
    fn modifier_shifts_the_force_balance() {
        let stats = UnitKind::Footman.stats();
        let veteran = CombatProfile::from_stats(&stats, 3.0);
        let recruit = CombatProfile::from_stats(&stats, 1.0);

        // 12 / (12 + 4) * 2 * 5 = 7.5
        assert_eq!(resolve_damage(&veteran, &recruit), 7);
        // 4 / (4 + 12) * 2 * 5 = 2.5
        assert_eq!(resolve_damage(&recruit, &veteran), 2);
    }

    #[test]
    fn footman_template_matches_baseline_soldier() {
        assert_eq!(
            UnitKind::Footman.stats(),
            UnitStats {
                max_health: 10,
                move_range: 2,
                attack_range: 1,
                strength: 2,
                armor: 2,
                base_damage: 2,
            }
        );
    }

    #[test]
    fn neighbors_cover_the_surrounding_ring() {
        let origin = CellCoord::new(0, 0);
        let neighbors: Vec<_> = origin.neighbors().collect();

        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&origin));
        assert!(neighbors
            .iter()
            .all(|cell| origin.chebyshev_distance(*cell) == 1));
    }

    #[test]
    fn neighbors_skip_overflowing_coordinates() {
        let corner = CellCoord::new(i32::MAX, i32::MIN);
        assert_eq!(corner.neighbors().count(), 3);
    }

    #[test]
    fn chebyshev_distance_counts_diagonals_once() {
        let origin = CellCoord::new(-1, 2);
        assert_eq!(origin.chebyshev_distance(CellCoord::new(2, 4)), 3);
        assert_eq!(origin.chebyshev_distance(CellCoord::new(-1, 2)), 0);
    }

    #[test]
    fn templates_start_alive_and_empty_health_does_not() {
        for kind in [UnitKind::Footman, UnitKind::Archer, UnitKind::Knight] {
            assert!(kind.stats().is_viable(), "{} template", kind.name());
        }
        let hollow = UnitStats {
            max_health: 0,
            ..UnitKind::Footman.stats()
        };
        assert!(!hollow.is_viable());
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn identifiers_round_trip_through_bincode() {
        assert_round_trip(&UnitId::new(42));
        assert_round_trip(&TeamId::new(3));
        assert_round_trip(&CellCoord::new(-4, 9));
    }

    #[test]
    fn rejection_reasons_round_trip_through_bincode() {
        assert_round_trip(&MoveError::AlreadyMoved);
        assert_round_trip(&TurnPolicy::MoveEndsTurn);
    }
}
