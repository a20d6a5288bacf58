//! Per-search cost records indexed by cell.

use hex_treasure_core::{CellCoord, EffectState};
use hex_treasure_world::GridMap;

/// Accumulated cost `g` and remaining estimate `h` of one channel.
///
/// `f` is always derived from the stored parts, so `f = g + h` holds for
/// every score the ledger hands out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Score {
    g: f64,
    h: f64,
}

impl Score {
    /// Score with no cost spent and nothing remaining.
    pub const ZERO: Score = Score::new(0.0, 0.0);

    /// Creates a score from its accumulated and estimated parts.
    #[must_use]
    pub const fn new(g: f64, h: f64) -> Self {
        Self { g, h }
    }

    /// Cost accumulated from the start.
    #[must_use]
    pub const fn g(&self) -> f64 {
        self.g
    }

    /// Estimated cost remaining to the target.
    #[must_use]
    pub const fn h(&self) -> f64 {
        self.h
    }

    /// Total estimate `g + h`.
    #[must_use]
    pub fn f(&self) -> f64 {
        self.g + self.h
    }
}

/// Best-known record for a single cell during one search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchNode {
    /// Cell this node was expanded from; the start cell points at itself.
    pub parent: CellCoord,
    /// Energy channel score.
    pub energy: Score,
    /// Step channel score.
    pub step: Score,
    /// Sum of both channels, used to order the frontier.
    pub combined: Score,
    /// Effect state in force once the searcher stands on this cell.
    pub effects: EffectState,
    /// Cells passed through between `parent` and this cell when the move
    /// sprang a displacement trap: the trap first, then any pushed cells
    /// before the final one. Empty for ordinary moves.
    pub displacement: Vec<CellCoord>,
}

impl SearchNode {
    /// Node for the start cell of a search.
    #[must_use]
    pub fn root(cell: CellCoord, effects: EffectState) -> Self {
        Self {
            parent: cell,
            energy: Score::ZERO,
            step: Score::ZERO,
            combined: Score::ZERO,
            effects,
            displacement: Vec::new(),
        }
    }

    /// Node reached from `parent`, combining both channels.
    #[must_use]
    pub fn new(
        parent: CellCoord,
        energy: Score,
        step: Score,
        effects: EffectState,
        displacement: Vec<CellCoord>,
    ) -> Self {
        Self {
            parent,
            energy,
            step,
            combined: Score::new(energy.g() + step.g(), energy.h() + step.h()),
            effects,
            displacement,
        }
    }
}

/// Arena of [`SearchNode`] records with open/closed bookkeeping.
///
/// Created fresh for every search and indexed by row-major cell position.
/// Cells never recorded behave as if every score were infinite.
#[derive(Clone, Debug)]
pub struct CostLedger {
    columns: u32,
    rows: u32,
    nodes: Vec<Option<SearchNode>>,
    closed: Vec<bool>,
}

impl CostLedger {
    /// Creates an empty ledger for a grid of the provided dimensions.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            nodes: vec![None; capacity],
            closed: vec![false; capacity],
        }
    }

    /// Creates an empty ledger sized for `map`.
    #[must_use]
    pub fn for_map(map: &GridMap) -> Self {
        Self::new(map.columns(), map.rows())
    }

    /// Stored record for `cell`, if one was ever accepted.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<&SearchNode> {
        self.index(cell)
            .and_then(|index| self.nodes.get(index))
            .and_then(Option::as_ref)
    }

    /// Combined `f` of the stored record, or infinity when unvisited.
    #[must_use]
    pub fn combined_f(&self, cell: CellCoord) -> f64 {
        self.get(cell)
            .map_or(f64::INFINITY, |node| node.combined.f())
    }

    /// Records `node` for `cell` when it strictly improves the combined `f`.
    ///
    /// Ties keep the existing record. Closed cells are never rewritten.
    /// Returns whether the record was stored.
    pub fn update(&mut self, cell: CellCoord, node: SearchNode) -> bool {
        let Some(index) = self.index(cell) else {
            return false;
        };
        if self.closed[index] {
            return false;
        }

        let slot = &mut self.nodes[index];
        let improves = slot
            .as_ref()
            .map_or(true, |existing| node.combined.f() < existing.combined.f());
        if improves {
            *slot = Some(node);
        }
        improves
    }

    /// Finalises `cell`; its record is frozen from now on.
    pub fn mark_closed(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            self.closed[index] = true;
        }
    }

    /// Reports whether `cell` has been finalised.
    #[must_use]
    pub fn is_closed(&self, cell: CellCoord) -> bool {
        self.index(cell).map_or(false, |index| self.closed[index])
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
