#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Multi-treasure control loop threading effects and position between searches.

use hex_treasure_core::{CellCoord, EffectState, HuntError};
use hex_treasure_system_pathfinding::{PathSearchEngine, SearchResult};
use hex_treasure_world::{Expedition, GridMap};
use log::debug;

/// Index of the treasure nearest to `position` by squared Euclidean distance.
///
/// Distances are raw grid distances, not scaled by any effect state. Ties go
/// to the treasure listed first. Returns `None` when `goals` is empty.
#[must_use]
pub fn select_treasure(position: CellCoord, goals: &[CellCoord]) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (index, &goal) in goals.iter().enumerate() {
        let distance = squared_distance(position, goal);
        if best.map_or(true, |(_, current)| distance < current) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}

fn squared_distance(from: CellCoord, to: CellCoord) -> u64 {
    let dx = u64::from(from.column().abs_diff(to.column()));
    let dy = u64::from(from.row().abs_diff(to.row()));
    dx * dx + dy * dy
}

/// One completed search phase.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseReport {
    goal: CellCoord,
    result: SearchResult,
    map: GridMap,
}

impl PhaseReport {
    /// Treasure this phase collected.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    /// Path, costs and triggers of the phase.
    #[must_use]
    pub const fn result(&self) -> &SearchResult {
        &self.result
    }

    /// Map as it stood once the phase path had been consumed.
    #[must_use]
    pub const fn map(&self) -> &GridMap {
        &self.map
    }
}

/// Outcome of a run that collected every treasure.
#[derive(Clone, Debug, PartialEq)]
pub struct HuntReport {
    phases: Vec<PhaseReport>,
    total_energy: f64,
    total_steps: f64,
    final_map: GridMap,
    effects: EffectState,
}

impl HuntReport {
    /// Phases in the order they ran.
    #[must_use]
    pub fn phases(&self) -> &[PhaseReport] {
        &self.phases
    }

    /// Energy spent over the whole run.
    #[must_use]
    pub const fn total_energy(&self) -> f64 {
        self.total_energy
    }

    /// Step cost spent over the whole run.
    #[must_use]
    pub const fn total_steps(&self) -> f64 {
        self.total_steps
    }

    /// Combined energy and step cost of the run.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.total_energy + self.total_steps
    }

    /// Every phase path joined end to end.
    ///
    /// Each phase starts where the previous one ended, so the first cell of
    /// every later phase is dropped. Empty when there were no treasures.
    #[must_use]
    pub fn concatenated_path(&self) -> Vec<CellCoord> {
        let mut path = Vec::new();
        for (index, phase) in self.phases.iter().enumerate() {
            let skip = usize::from(index > 0);
            path.extend(phase.result.path().iter().skip(skip).copied());
        }
        path
    }

    /// Map with every consumed cell marked.
    #[must_use]
    pub const fn final_map(&self) -> &GridMap {
        &self.final_map
    }

    /// Effect state in force after the last phase.
    #[must_use]
    pub const fn effects(&self) -> EffectState {
        self.effects
    }
}

/// Drives one search per treasure until none remain.
#[derive(Clone, Debug)]
pub struct TreasureSequencer {
    map: GridMap,
    position: CellCoord,
    goals: Vec<CellCoord>,
    effects: EffectState,
}

impl TreasureSequencer {
    /// Creates a sequencer positioned on the expedition's start cell.
    #[must_use]
    pub fn new(expedition: Expedition) -> Self {
        let (map, start, goals) = expedition.into_parts();
        Self {
            map,
            position: start,
            goals,
            effects: EffectState::neutral(),
        }
    }

    /// Current map, consumption overlay included.
    #[must_use]
    pub const fn map(&self) -> &GridMap {
        &self.map
    }

    /// Cell the searcher stands on.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Treasures not yet collected, in configuration order.
    #[must_use]
    pub fn remaining_goals(&self) -> &[CellCoord] {
        &self.goals
    }

    /// Effect state carried into the next phase.
    #[must_use]
    pub const fn effects(&self) -> EffectState {
        self.effects
    }

    /// Runs the phase for the nearest remaining treasure.
    ///
    /// Returns `Ok(None)` once every treasure has been collected. On success
    /// the path is consumed on the map: every cell but the last is marked
    /// visited and the last one occupied.
    ///
    /// # Errors
    ///
    /// Propagates [`HuntError::UnreachableTarget`] from the search. The
    /// sequencer is left as it was before the failed phase.
    pub fn step(&mut self) -> Result<Option<PhaseReport>, HuntError> {
        let Some(index) = select_treasure(self.position, &self.goals) else {
            return Ok(None);
        };
        let goal = self.goals[index];
        debug!(
            "heading for treasure at {goal} from {} ({} remaining)",
            self.position,
            self.goals.len()
        );

        let result = PathSearchEngine::new(&self.map).search(self.position, goal, self.effects)?;

        if let Some((&last, walked)) = result.path().split_last() {
            for &cell in walked {
                self.map.mark_visited(cell);
            }
            self.map.mark_occupied(last);
        }
        let _ = self.goals.remove(index);
        self.position = result.end();
        self.effects = result.effects();
        debug!(
            "collected {goal}: energy {}, steps {}",
            result.energy_cost(),
            result.step_cost()
        );

        Ok(Some(PhaseReport {
            goal,
            result,
            map: self.map.clone(),
        }))
    }

    /// Collects every treasure in nearest-first order.
    ///
    /// # Errors
    ///
    /// Returns the first phase error. The run is abandoned and no partial
    /// report is produced.
    pub fn run(mut self) -> Result<HuntReport, HuntError> {
        let mut phases = Vec::new();
        let mut total_energy = 0.0;
        let mut total_steps = 0.0;

        while let Some(phase) = self.step()? {
            total_energy += phase.result.energy_cost();
            total_steps += phase.result.step_cost();
            phases.push(phase);
        }

        debug!("all treasures collected in {} phases", phases.len());
        Ok(HuntReport {
            phases,
            total_energy,
            total_steps,
            final_map: self.map,
            effects: self.effects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_treasure_wins() {
        let goals = [
            CellCoord::new(9, 3),
            CellCoord::new(4, 1),
            CellCoord::new(3, 4),
        ];
        assert_eq!(select_treasure(CellCoord::new(0, 0), &goals), Some(1));
    }

    #[test]
    fn equal_distances_keep_configuration_order() {
        let goals = [CellCoord::new(2, 1), CellCoord::new(1, 2), CellCoord::new(0, 1)];
        assert_eq!(select_treasure(CellCoord::new(1, 1), &goals), Some(0));
    }

    #[test]
    fn no_treasures_selects_nothing() {
        assert_eq!(select_treasure(CellCoord::new(0, 0), &[]), None);
    }

    #[test]
    fn selection_ignores_terrain_and_uses_raw_distance() {
        let goals = [CellCoord::new(0, 3), CellCoord::new(2, 2)];
        assert_eq!(squared_distance(CellCoord::new(0, 0), goals[0]), 9);
        assert_eq!(squared_distance(CellCoord::new(0, 0), goals[1]), 8);
        assert_eq!(select_treasure(CellCoord::new(0, 0), &goals), Some(1));
    }
}
