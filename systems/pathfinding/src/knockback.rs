//! Resolution of the displacement trap into the cells the searcher is pushed through.

use hex_treasure_core::{CellCoord, HexDirection};
use hex_treasure_world::GridMap;

/// Maximum number of cells a displacement trap pushes the searcher.
pub const KNOCKBACK_DISTANCE: usize = 2;

/// Pure resolver for the displacement trap.
#[derive(Clone, Copy, Debug, Default)]
pub struct KnockbackResolver;

impl KnockbackResolver {
    /// Cells the searcher is pushed through after entering `trap` by moving
    /// in `entry`.
    ///
    /// The push runs against `entry`, one hex step at a time from the current
    /// cell's column parity, and stops at the first cell that is outside the
    /// grid or impassable. Cells pushed before the block are kept. An empty
    /// list leaves the searcher on the trap.
    #[must_use]
    pub fn resolve(&self, map: &GridMap, trap: CellCoord, entry: HexDirection) -> Vec<CellCoord> {
        let push = entry.opposite();
        let mut cells = Vec::with_capacity(KNOCKBACK_DISTANCE);
        let mut current = trap;

        for _ in 0..KNOCKBACK_DISTANCE {
            let Some(next) = push.step_from(current) else {
                break;
            };
            if !map.in_bounds(next) || map.is_obstacle(next) {
                break;
            }
            cells.push(next);
            current = next;
        }

        cells
    }
}
