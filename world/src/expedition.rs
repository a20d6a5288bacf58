//! Validated bundle of a grid, its start cell and the treasures to collect.

use hex_treasure_core::{CellCoord, GoalRejection, GridDefect, HuntError};

use crate::GridMap;

/// A map together with the start cell and ordered treasure list.
///
/// Construction rejects configurations that can never be searched, so the
/// sequencer only ever sees a start and goals that are inside the grid and
/// on passable terrain.
#[derive(Clone, Debug, PartialEq)]
pub struct Expedition {
    map: GridMap,
    start: CellCoord,
    goals: Vec<CellCoord>,
}

impl Expedition {
    /// Validates and bundles an expedition.
    ///
    /// # Errors
    ///
    /// Returns [`HuntError::MalformedGrid`] when the start cell is outside the
    /// grid or impassable, and [`HuntError::InvalidGoal`] for the first goal
    /// that is outside the grid or impassable.
    pub fn new(map: GridMap, start: CellCoord, goals: Vec<CellCoord>) -> Result<Self, HuntError> {
        if !map.in_bounds(start) {
            return Err(HuntError::MalformedGrid {
                reason: GridDefect::StartOutOfBounds(start),
            });
        }
        if map.is_obstacle(start) {
            return Err(HuntError::MalformedGrid {
                reason: GridDefect::StartImpassable(start),
            });
        }

        for &goal in &goals {
            if !map.in_bounds(goal) {
                return Err(HuntError::InvalidGoal {
                    cell: goal,
                    reason: GoalRejection::OutOfBounds,
                });
            }
            let terrain = map.terrain_at(goal);
            if terrain.is_impassable() {
                return Err(HuntError::InvalidGoal {
                    cell: goal,
                    reason: GoalRejection::Impassable(terrain),
                });
            }
        }

        Ok(Self { map, start, goals })
    }

    /// The map the expedition runs on.
    #[must_use]
    pub fn map(&self) -> &GridMap {
        &self.map
    }

    /// Cell the searcher starts from.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Treasures in configuration order.
    #[must_use]
    pub fn goals(&self) -> &[CellCoord] {
        &self.goals
    }

    /// Splits the expedition into its map, start cell and goals.
    #[must_use]
    pub fn into_parts(self) -> (GridMap, CellCoord, Vec<CellCoord>) {
        (self.map, self.start, self.goals)
    }
}
