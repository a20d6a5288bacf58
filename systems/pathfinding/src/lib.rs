#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Best-first search across the hex grid under compounding terrain effects.
//!
//! A single [`PathSearchEngine::search`] call finds one path from a start
//! cell to one target. Each node carries the [`EffectState`] it was reached
//! with, so edge costs depend on the path taken: rewards and traps stepped on
//! earlier change what later moves cost. The estimate of remaining cost is
//! the raw Euclidean distance scaled by the entered state's multipliers, which
//! is not admissible, so the returned path is not guaranteed to be cheapest.

mod frontier;
mod knockback;
mod ledger;

pub use frontier::{Frontier, FrontierKey};
pub use knockback::{KnockbackResolver, KNOCKBACK_DISTANCE};
pub use ledger::{CostLedger, Score, SearchNode};

use hex_treasure_core::{
    CellCoord, EffectState, EffectTrigger, HuntError, TerrainKind, TriggerKind,
};
use hex_treasure_world::GridMap;
use log::{debug, trace};

/// Outcome of one successful search phase.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    path: Vec<CellCoord>,
    energy: f64,
    steps: f64,
    effects: EffectState,
    end: CellCoord,
    triggers: Vec<EffectTrigger>,
}

impl SearchResult {
    /// Cells from the start to the target, inclusive.
    ///
    /// Displacement moves appear in full: the trap cell followed by every
    /// cell the searcher was pushed through.
    #[must_use]
    pub fn path(&self) -> &[CellCoord] {
        &self.path
    }

    /// Energy spent on the path.
    #[must_use]
    pub const fn energy_cost(&self) -> f64 {
        self.energy
    }

    /// Step cost spent on the path.
    #[must_use]
    pub const fn step_cost(&self) -> f64 {
        self.steps
    }

    /// Sum of the energy and step costs.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.energy + self.steps
    }

    /// Effect state in force on arrival.
    #[must_use]
    pub const fn effects(&self) -> EffectState {
        self.effects
    }

    /// Cell the searcher stands on when the phase ends.
    #[must_use]
    pub const fn end(&self) -> CellCoord {
        self.end
    }

    /// Terrain effects fired along the path, in path order.
    #[must_use]
    pub fn triggers(&self) -> &[EffectTrigger] {
        &self.triggers
    }
}

/// Best-first search over a read-only [`GridMap`].
#[derive(Debug)]
pub struct PathSearchEngine<'map> {
    map: &'map GridMap,
    knockback: KnockbackResolver,
}

impl<'map> PathSearchEngine<'map> {
    /// Creates an engine reading terrain from `map`.
    #[must_use]
    pub fn new(map: &'map GridMap) -> Self {
        Self {
            map,
            knockback: KnockbackResolver,
        }
    }

    /// Searches for a path from `start` to `target` beginning under `effects`.
    ///
    /// The frontier pops the lowest combined `f`, ties broken by column then
    /// row. The search ends as soon as the target is generated as a
    /// destination, not when it is popped.
    ///
    /// # Errors
    ///
    /// Returns [`HuntError::UnreachableTarget`] when the frontier is exhausted
    /// before the target is generated.
    pub fn search(
        &self,
        start: CellCoord,
        target: CellCoord,
        effects: EffectState,
    ) -> Result<SearchResult, HuntError> {
        debug!("searching from {start} to {target}");
        if start == target {
            return Ok(SearchResult {
                path: vec![start],
                energy: 0.0,
                steps: 0.0,
                effects,
                end: start,
                triggers: Vec::new(),
            });
        }

        let mut ledger = CostLedger::for_map(self.map);
        let mut frontier = Frontier::new();
        let _ = ledger.update(start, SearchNode::root(start, effects));
        frontier.push(start, 0.0);

        while let Some(FrontierKey { f, cell: current }) = frontier.pop() {
            if ledger.is_closed(current) {
                continue;
            }
            ledger.mark_closed(current);

            let Some(parent) = ledger.get(current) else {
                continue;
            };
            let parent_energy = parent.energy.g();
            let parent_step = parent.step.g();
            let parent_effects = parent.effects;
            trace!("expanding {current} at f = {f}");

            for (direction, neighbor) in self.map.neighbors(current) {
                if !self.map.in_bounds(neighbor)
                    || self.map.is_obstacle(neighbor)
                    || ledger.is_closed(neighbor)
                {
                    continue;
                }

                let terrain = self.map.terrain_at(neighbor);
                let (entered, _) = parent_effects.entering(terrain);
                let pushed = if neighbor != target && terrain == TerrainKind::TrapDisplace {
                    self.knockback.resolve(self.map, neighbor, direction)
                } else {
                    Vec::new()
                };
                let displaced = !pushed.is_empty();
                let destinations = if displaced { pushed } else { vec![neighbor] };

                let energy_per_move = parent_effects.energy_multiplier();
                let step_per_move = parent_effects.step_multiplier();
                let mut energy_g = parent_energy;
                let mut step_g = parent_step;

                for (index, &cell) in destinations.iter().enumerate() {
                    energy_g += energy_per_move;
                    step_g += step_per_move;
                    let distance = cell.euclidean_distance(target);
                    let energy = Score::new(energy_g, distance * entered.energy_multiplier());
                    let step = Score::new(step_g, distance * entered.step_multiplier());

                    let displacement = if displaced {
                        std::iter::once(neighbor)
                            .chain(destinations[..index].iter().copied())
                            .collect()
                    } else {
                        Vec::new()
                    };
                    let node = SearchNode::new(current, energy, step, entered, displacement);

                    if cell == target {
                        debug!(
                            "reached {target}: energy {}, steps {}",
                            node.energy.f(),
                            node.step.f()
                        );
                        return Ok(self.finish(&ledger, start, target, effects, &node));
                    }

                    let f = node.combined.f();
                    if ledger.update(cell, node) {
                        frontier.push(cell, f);
                    }
                }
            }
        }

        debug!("frontier exhausted before reaching {target}");
        Err(HuntError::UnreachableTarget { start, target })
    }

    fn finish(
        &self,
        ledger: &CostLedger,
        start: CellCoord,
        target: CellCoord,
        initial: EffectState,
        terminal: &SearchNode,
    ) -> SearchResult {
        let legs = trace_route(ledger, start, target, terminal);
        let triggers = collect_triggers(self.map, &legs, initial);
        SearchResult {
            path: legs.into_iter().map(|leg| leg.cell).collect(),
            energy: terminal.energy.f(),
            steps: terminal.step.f(),
            effects: terminal.effects,
            end: target,
            triggers,
        }
    }
}

/// One cell of a reconstructed path and how the searcher arrived on it.
#[derive(Clone, Copy, Debug)]
struct Leg {
    cell: CellCoord,
    pushed: bool,
}

fn trace_route(
    ledger: &CostLedger,
    start: CellCoord,
    target: CellCoord,
    terminal: &SearchNode,
) -> Vec<Leg> {
    let mut legs = Vec::new();
    push_legs(&mut legs, target, terminal);

    let mut cursor = terminal.parent;
    while cursor != start {
        let Some(node) = ledger.get(cursor) else {
            break;
        };
        push_legs(&mut legs, cursor, node);
        cursor = node.parent;
    }
    legs.push(Leg {
        cell: start,
        pushed: false,
    });

    legs.reverse();
    legs
}

// Appends in reverse: the node's own cell first, then its displacement list backwards.
fn push_legs(legs: &mut Vec<Leg>, cell: CellCoord, node: &SearchNode) {
    legs.push(Leg {
        cell,
        pushed: !node.displacement.is_empty(),
    });
    for (index, &via) in node.displacement.iter().enumerate().rev() {
        legs.push(Leg {
            cell: via,
            pushed: index > 0,
        });
    }
}

// Cells arrived on by a push never fire their terrain. A displacement trap
// only fires when the following leg was pushed.
fn collect_triggers(map: &GridMap, legs: &[Leg], initial: EffectState) -> Vec<EffectTrigger> {
    let mut state = initial;
    let mut triggers = Vec::new();

    for (index, leg) in legs.iter().enumerate().skip(1) {
        if leg.pushed {
            continue;
        }
        let (next, fired) = state.entering(map.terrain_at(leg.cell));
        state = next;
        let Some(kind) = fired else {
            continue;
        };
        let sprang = legs.get(index + 1).map_or(false, |after| after.pushed);
        if kind == TriggerKind::Displacement && !sprang {
            continue;
        }
        triggers.push(EffectTrigger {
            cell: leg.cell,
            kind,
            factor: state.factor_for(kind),
        });
    }

    triggers
}
