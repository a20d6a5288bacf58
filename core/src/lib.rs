#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the hex treasure hunt engine.
//!
//! This crate defines the vocabulary that connects the authoritative grid,
//! the pure search systems and the adapters: cell coordinates on the
//! column-shoved hex layout, terrain kinds, the compounding [`EffectState`]
//! carried along a path, the trigger records handed to narrators, and the
//! [`HuntError`] surface returned to callers.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Multiplier applied to a channel when a reward is collected.
pub const REWARD_FACTOR: f64 = 0.5;

/// Multiplier applied to a channel when a penalty trap is triggered.
pub const TRAP_FACTOR: f64 = 2.0;

/// Location of a single hex cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Straight-line distance between the raw offset coordinates.
    ///
    /// This is the estimate the search uses for remaining cost. It ignores the
    /// hex geometry, so a single diagonal step can shrink it by more than one.
    #[must_use]
    pub fn euclidean_distance(self, other: CellCoord) -> f64 {
        let columns = f64::from(self.column.abs_diff(other.column));
        let rows = f64::from(self.row.abs_diff(other.row));
        (columns * columns + rows * rows).sqrt()
    }

    /// Number of hex steps separating two cells when no obstacles intervene.
    #[must_use]
    pub fn hex_distance(self, other: CellCoord) -> u32 {
        let (x1, z1) = self.cube();
        let (x2, z2) = other.cube();
        let dx = x1 - x2;
        let dz = z1 - z2;
        let dy = -dx - dz;
        let total = dx.abs() + dy.abs() + dz.abs();
        u32::try_from(total / 2).unwrap_or(u32::MAX)
    }

    /// Translates the coordinate by a signed delta, returning `None` when
    /// either component would leave the unsigned range.
    #[must_use]
    pub fn offset(self, column_delta: i32, row_delta: i32) -> Option<CellCoord> {
        let column = self.column.checked_add_signed(column_delta)?;
        let row = self.row.checked_add_signed(row_delta)?;
        Some(Self::new(column, row))
    }

    // Even columns sit half a cell lower than their odd neighbours.
    fn cube(self) -> (i64, i64) {
        let column = i64::from(self.column);
        let row = i64::from(self.row);
        (column, row - (column + (column & 1)) / 2)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// The six neighbour directions of the flat-top, column-shoved hex layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexDirection {
    /// Movement toward decreasing row indices within the same column.
    North,
    /// Movement toward the next column, upper neighbour.
    NorthEast,
    /// Movement toward the next column, lower neighbour.
    SouthEast,
    /// Movement toward increasing row indices within the same column.
    South,
    /// Movement toward the previous column, lower neighbour.
    SouthWest,
    /// Movement toward the previous column, upper neighbour.
    NorthWest,
}

impl HexDirection {
    /// All directions in the canonical expansion order.
    pub const ALL: [HexDirection; 6] = [
        Self::North,
        Self::NorthEast,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::NorthWest,
    ];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::NorthEast => Self::SouthWest,
            Self::SouthEast => Self::NorthWest,
            Self::South => Self::North,
            Self::SouthWest => Self::NorthEast,
            Self::NorthWest => Self::SouthEast,
        }
    }

    /// Column and row delta of a step taken from a cell in `column`.
    ///
    /// The diagonal deltas depend on column parity because even columns are
    /// shoved half a cell down relative to odd columns.
    #[must_use]
    pub const fn offset(self, column: u32) -> (i32, i32) {
        let even = column % 2 == 0;
        match (self, even) {
            (Self::North, _) => (0, -1),
            (Self::South, _) => (0, 1),
            (Self::NorthEast, true) => (1, 0),
            (Self::NorthEast, false) => (1, -1),
            (Self::SouthEast, true) => (1, 1),
            (Self::SouthEast, false) => (1, 0),
            (Self::SouthWest, true) => (-1, 1),
            (Self::SouthWest, false) => (-1, 0),
            (Self::NorthWest, true) => (-1, 0),
            (Self::NorthWest, false) => (-1, -1),
        }
    }

    /// Cell reached by stepping once from `cell`, if representable.
    ///
    /// Bounds are not checked; callers filter with the grid.
    #[must_use]
    pub fn step_from(self, cell: CellCoord) -> Option<CellCoord> {
        let (column_delta, row_delta) = self.offset(cell.column());
        cell.offset(column_delta, row_delta)
    }
}

/// Terrain occupying a single hex cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Open ground with no effect.
    Empty,
    /// Impassable rock.
    Obstacle,
    /// Halves the energy spent per step for the rest of the run.
    RewardEnergy,
    /// Halves the step cost per movement for the rest of the run.
    RewardStep,
    /// Doubles the energy spent per step for the rest of the run.
    TrapEnergy,
    /// Doubles the step cost per movement for the rest of the run.
    TrapStep,
    /// Pushes the searcher back up to two cells against its direction of entry.
    TrapDisplace,
    /// Ends the run on contact, so it is never entered.
    TrapLethal,
    /// A treasure location.
    Goal,
    /// Where the searcher begins.
    Start,
    /// Overlay written on cells a completed phase walked across.
    Visited,
    /// Overlay written on the cell a completed phase ended on.
    Occupied,
}

impl TerrainKind {
    /// Short token used by map files and textual renderings.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Empty => ".",
            Self::Obstacle => "o",
            Self::RewardEnergy => "r1",
            Self::RewardStep => "r2",
            Self::TrapEnergy => "t1",
            Self::TrapStep => "t2",
            Self::TrapDisplace => "t3",
            Self::TrapLethal => "t4",
            Self::Goal => "g",
            Self::Start | Self::Occupied => "p",
            Self::Visited => "x",
        }
    }

    /// Reports whether the searcher can never stand on this terrain.
    #[must_use]
    pub const fn is_impassable(self) -> bool {
        matches!(self, Self::Obstacle | Self::TrapLethal)
    }

    /// Reports whether the kind is written only by the consumption overlay.
    #[must_use]
    pub const fn is_overlay(self) -> bool {
        matches!(self, Self::Visited | Self::Occupied)
    }
}

impl fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Raised when a map token does not name any terrain kind.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown terrain token '{0}'")]
pub struct UnknownTerrainToken(pub String);

impl FromStr for TerrainKind {
    type Err = UnknownTerrainToken;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "." | " " => Ok(Self::Empty),
            "o" => Ok(Self::Obstacle),
            "r1" => Ok(Self::RewardEnergy),
            "r2" => Ok(Self::RewardStep),
            "t1" => Ok(Self::TrapEnergy),
            "t2" => Ok(Self::TrapStep),
            "t3" => Ok(Self::TrapDisplace),
            "t4" => Ok(Self::TrapLethal),
            "g" => Ok(Self::Goal),
            "p" => Ok(Self::Start),
            "x" => Ok(Self::Visited),
            other => Err(UnknownTerrainToken(other.to_owned())),
        }
    }
}

/// Terrain effect fired when the searcher enters a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    /// Energy reward collected.
    RewardEnergy,
    /// Step reward collected.
    RewardStep,
    /// Energy penalty trap sprung.
    TrapEnergy,
    /// Step penalty trap sprung.
    TrapStep,
    /// Displacement trap sprung.
    Displacement,
}

/// Compounding multipliers accumulated from rewards and traps along a path.
///
/// Every factor starts at 1.0. Rewards halve and traps double the relevant
/// factor relative to its current value; nothing ever resets them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectState {
    trap_energy: f64,
    trap_step: f64,
    reward_energy: f64,
    reward_step: f64,
}

impl EffectState {
    /// State with every factor at 1.0.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            trap_energy: 1.0,
            trap_step: 1.0,
            reward_energy: 1.0,
            reward_step: 1.0,
        }
    }

    /// Energy penalty factor.
    #[must_use]
    pub const fn trap_energy(&self) -> f64 {
        self.trap_energy
    }

    /// Step penalty factor.
    #[must_use]
    pub const fn trap_step(&self) -> f64 {
        self.trap_step
    }

    /// Energy discount factor.
    #[must_use]
    pub const fn reward_energy(&self) -> f64 {
        self.reward_energy
    }

    /// Step discount factor.
    #[must_use]
    pub const fn reward_step(&self) -> f64 {
        self.reward_step
    }

    /// Returns the state after collecting an energy reward.
    #[must_use]
    pub fn apply_reward_energy(self) -> Self {
        Self {
            reward_energy: self.reward_energy * REWARD_FACTOR,
            ..self
        }
    }

    /// Returns the state after collecting a step reward.
    #[must_use]
    pub fn apply_reward_step(self) -> Self {
        Self {
            reward_step: self.reward_step * REWARD_FACTOR,
            ..self
        }
    }

    /// Returns the state after springing an energy trap.
    #[must_use]
    pub fn apply_trap_energy(self) -> Self {
        Self {
            trap_energy: self.trap_energy * TRAP_FACTOR,
            ..self
        }
    }

    /// Returns the state after springing a step trap.
    #[must_use]
    pub fn apply_trap_step(self) -> Self {
        Self {
            trap_step: self.trap_step * TRAP_FACTOR,
            ..self
        }
    }

    /// Energy spent per unit move under this state.
    #[must_use]
    pub fn energy_multiplier(&self) -> f64 {
        self.trap_energy * self.reward_energy
    }

    /// Step cost per unit move under this state.
    #[must_use]
    pub fn step_multiplier(&self) -> f64 {
        self.trap_step * self.reward_step
    }

    /// State after stepping onto `terrain`, with the trigger it fired.
    #[must_use]
    pub fn entering(self, terrain: TerrainKind) -> (Self, Option<TriggerKind>) {
        match terrain {
            TerrainKind::RewardEnergy => {
                (self.apply_reward_energy(), Some(TriggerKind::RewardEnergy))
            }
            TerrainKind::RewardStep => (self.apply_reward_step(), Some(TriggerKind::RewardStep)),
            TerrainKind::TrapEnergy => (self.apply_trap_energy(), Some(TriggerKind::TrapEnergy)),
            TerrainKind::TrapStep => (self.apply_trap_step(), Some(TriggerKind::TrapStep)),
            TerrainKind::TrapDisplace => (self, Some(TriggerKind::Displacement)),
            _ => (self, None),
        }
    }

    /// Factor affected by `kind`, or `None` for triggers that carry no factor.
    #[must_use]
    pub const fn factor_for(&self, kind: TriggerKind) -> Option<f64> {
        match kind {
            TriggerKind::RewardEnergy => Some(self.reward_energy),
            TriggerKind::RewardStep => Some(self.reward_step),
            TriggerKind::TrapEnergy => Some(self.trap_energy),
            TriggerKind::TrapStep => Some(self.trap_step),
            TriggerKind::Displacement => None,
        }
    }
}

impl Default for EffectState {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Terrain effect encountered along a returned path, for narration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectTrigger {
    /// Cell whose terrain fired the effect.
    pub cell: CellCoord,
    /// Effect that fired.
    pub kind: TriggerKind,
    /// Value of the affected factor after the effect, when it has one.
    pub factor: Option<f64>,
}

/// Reasons a goal coordinate is rejected before any search begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GoalRejection {
    /// The goal lies outside the grid.
    #[error("it lies outside the grid")]
    OutOfBounds,
    /// The goal sits on terrain that can never be entered.
    #[error("it sits on impassable terrain '{0}'")]
    Impassable(TerrainKind),
}

/// Structural defects that make a grid unusable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridDefect {
    /// The grid has no rows or no columns.
    #[error("the grid has no cells")]
    Empty,
    /// A row length differs from the first row.
    #[error("row {row} has {found} cells but the first row has {expected}")]
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// The start cell lies outside the grid.
    #[error("start cell {0} lies outside the grid")]
    StartOutOfBounds(CellCoord),
    /// The start cell sits on impassable terrain.
    #[error("start cell {0} sits on impassable terrain")]
    StartImpassable(CellCoord),
}

/// Failures surfaced by the treasure hunt. None of them are recoverable.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HuntError {
    /// The frontier ran dry before the selected treasure was reached.
    #[error("treasure at {target} is unreachable from {start}")]
    UnreachableTarget {
        /// Cell the failed phase started from.
        start: CellCoord,
        /// Treasure the failed phase was heading for.
        target: CellCoord,
    },
    /// A goal coordinate can never be reached.
    #[error("goal {cell} is invalid: {reason}")]
    InvalidGoal {
        /// The rejected goal.
        cell: CellCoord,
        /// Why it was rejected.
        reason: GoalRejection,
    },
    /// The grid or its start cell is structurally unusable.
    #[error("malformed grid: {reason}")]
    MalformedGrid {
        /// The detected defect.
        reason: GridDefect,
    },
}

#[cfg(test)]
mod tests {
    use super::{
        CellCoord, EffectState, HexDirection, HuntError, TerrainKind, TriggerKind,
    };
    use proptest::prelude::*;
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn euclidean_distance_uses_raw_offsets() {
        let origin = CellCoord::new(0, 0);
        assert!((origin.euclidean_distance(CellCoord::new(3, 4)) - 5.0).abs() < f64::EPSILON);
        assert_eq!(origin.euclidean_distance(origin), 0.0);
    }

    #[test]
    fn hex_distance_follows_shoved_columns() {
        let origin = CellCoord::new(0, 0);
        assert_eq!(origin.hex_distance(CellCoord::new(3, 2)), 3);
        assert_eq!(origin.hex_distance(CellCoord::new(4, 0)), 4);
        assert_eq!(origin.hex_distance(CellCoord::new(1, 1)), 1);
        assert_eq!(origin.hex_distance(CellCoord::new(0, 4)), 4);
        assert_eq!(CellCoord::new(1, 0).hex_distance(CellCoord::new(0, 0)), 1);
    }

    #[test]
    fn every_direction_is_one_hex_step() {
        for column in 2..4 {
            let cell = CellCoord::new(column, 3);
            for direction in HexDirection::ALL {
                let next = direction.step_from(cell).expect("step stays representable");
                assert_eq!(cell.hex_distance(next), 1, "{direction:?} from {cell}");
            }
        }
    }

    #[test]
    fn opposite_step_returns_to_origin() {
        for column in 1..5 {
            let cell = CellCoord::new(column, 2);
            for direction in HexDirection::ALL {
                let there = direction.step_from(cell).expect("step stays representable");
                let back = direction.opposite().step_from(there);
                assert_eq!(back, Some(cell), "{direction:?} from {cell}");
            }
        }
    }

    #[test]
    fn offset_rejects_negative_coordinates() {
        assert_eq!(CellCoord::new(0, 0).offset(-1, 0), None);
        assert_eq!(HexDirection::North.step_from(CellCoord::new(3, 0)), None);
        assert_eq!(CellCoord::new(2, 2).offset(-1, 1), Some(CellCoord::new(1, 3)));
    }

    #[test]
    fn terrain_tokens_parse_back() {
        for kind in [
            TerrainKind::Empty,
            TerrainKind::Obstacle,
            TerrainKind::RewardEnergy,
            TerrainKind::RewardStep,
            TerrainKind::TrapEnergy,
            TerrainKind::TrapStep,
            TerrainKind::TrapDisplace,
            TerrainKind::TrapLethal,
            TerrainKind::Goal,
            TerrainKind::Start,
            TerrainKind::Visited,
        ] {
            assert_eq!(kind.token().parse::<TerrainKind>(), Ok(kind));
        }
        assert!("zz".parse::<TerrainKind>().is_err());
    }

    #[test]
    fn lethal_trap_is_impassable() {
        assert!(TerrainKind::TrapLethal.is_impassable());
        assert!(TerrainKind::Obstacle.is_impassable());
        assert!(!TerrainKind::TrapDisplace.is_impassable());
        assert!(!TerrainKind::Visited.is_impassable());
    }

    #[test]
    fn rewards_and_traps_compound() {
        let state = EffectState::neutral()
            .apply_reward_energy()
            .apply_reward_energy();
        assert_eq!(state.reward_energy(), 0.25);
        assert_eq!(state.energy_multiplier(), 0.25);

        let state = EffectState::neutral().apply_trap_energy().apply_trap_energy();
        assert_eq!(state.trap_energy(), 4.0);

        let mixed = EffectState::neutral().apply_trap_step().apply_reward_step();
        assert_eq!(mixed.step_multiplier(), 1.0);
        assert_eq!(mixed.energy_multiplier(), 1.0);
    }

    #[test]
    fn entering_reports_the_fired_trigger() {
        let (state, trigger) = EffectState::neutral().entering(TerrainKind::TrapStep);
        assert_eq!(trigger, Some(TriggerKind::TrapStep));
        assert_eq!(state.factor_for(TriggerKind::TrapStep), Some(2.0));

        let (state, trigger) = state.entering(TerrainKind::TrapDisplace);
        assert_eq!(trigger, Some(TriggerKind::Displacement));
        assert_eq!(state.factor_for(TriggerKind::Displacement), None);

        let (unchanged, trigger) = state.entering(TerrainKind::Visited);
        assert_eq!(trigger, None);
        assert_eq!(unchanged, state);
    }

    #[test]
    fn errors_render_coordinates() {
        let error = HuntError::UnreachableTarget {
            start: CellCoord::new(0, 0),
            target: CellCoord::new(3, 2),
        };
        assert_eq!(error.to_string(), "treasure at (3, 2) is unreachable from (0, 0)");
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
    fn effect_state_round_trips_through_bincode() {
        assert_round_trip(&EffectState::neutral().apply_trap_energy().apply_reward_step());
    }

    #[test]
    fn terrain_kind_round_trips_through_bincode() {
        assert_round_trip(&TerrainKind::TrapDisplace);
    }

    proptest! {
        #[test]
        fn repeated_traps_scale_by_powers_of_two(times in 0u32..12) {
            let mut state = EffectState::neutral();
            for _ in 0..times {
                state = state.apply_trap_energy().apply_trap_step();
            }
            let expected = 2f64.powi(i32::try_from(times).unwrap());
            prop_assert_eq!(state.trap_energy(), expected);
            prop_assert_eq!(state.trap_step(), expected);
        }

        #[test]
        fn repeated_rewards_scale_by_powers_of_half(times in 0u32..12) {
            let mut state = EffectState::neutral();
            for _ in 0..times {
                state = state.apply_reward_energy().apply_reward_step();
            }
            let expected = 0.5f64.powi(i32::try_from(times).unwrap());
            prop_assert_eq!(state.reward_energy(), expected);
            prop_assert_eq!(state.reward_step(), expected);
        }
    }
}
