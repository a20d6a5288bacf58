#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative hex grid state for the treasure hunt.
//!
//! [`GridMap`] owns the immutable base terrain together with the consumption
//! overlay the sequencer writes between phases. Search systems only ever read
//! it; [`Expedition`] bundles a validated map with its start cell and goals.

mod expedition;

pub use expedition::Expedition;

use hex_treasure_core::{CellCoord, GridDefect, HexDirection, HuntError, TerrainKind};

/// Rectangular hex grid with a mutable consumption overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct GridMap {
    columns: u32,
    rows: u32,
    terrain: Vec<TerrainKind>,
    overlay: Vec<Option<TerrainKind>>,
}

impl GridMap {
    /// Builds a map from rows of terrain, top row first.
    ///
    /// # Errors
    ///
    /// Returns [`HuntError::MalformedGrid`] when the grid has no cells or a row
    /// length differs from the first row.
    pub fn new(rows: Vec<Vec<TerrainKind>>) -> Result<Self, HuntError> {
        let expected = rows.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(HuntError::MalformedGrid {
                reason: GridDefect::Empty,
            });
        }

        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, length)| length != expected)
        {
            return Err(HuntError::MalformedGrid {
                reason: GridDefect::RaggedRow {
                    row,
                    expected,
                    found,
                },
            });
        }

        let columns = u32::try_from(expected).map_err(|_| HuntError::MalformedGrid {
            reason: GridDefect::Empty,
        })?;
        let row_count = u32::try_from(rows.len()).map_err(|_| HuntError::MalformedGrid {
            reason: GridDefect::Empty,
        })?;
        let terrain: Vec<TerrainKind> = rows.into_iter().flatten().collect();
        let overlay = vec![None; terrain.len()];

        Ok(Self {
            columns,
            rows: row_count,
            terrain,
            overlay,
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Terrain currently at `cell`, overlay first.
    ///
    /// Cells outside the grid read as [`TerrainKind::Obstacle`].
    #[must_use]
    pub fn terrain_at(&self, cell: CellCoord) -> TerrainKind {
        self.index(cell).map_or(TerrainKind::Obstacle, |index| {
            self.overlay[index].unwrap_or(self.terrain[index])
        })
    }

    /// Terrain the map was built with, ignoring the overlay.
    #[must_use]
    pub fn base_terrain_at(&self, cell: CellCoord) -> TerrainKind {
        self.index(cell)
            .map_or(TerrainKind::Obstacle, |index| self.terrain[index])
    }

    /// Reports whether the cell can never be entered: rock or a lethal trap.
    #[must_use]
    pub fn is_obstacle(&self, cell: CellCoord) -> bool {
        self.terrain_at(cell).is_impassable()
    }

    /// The six neighbour candidates of `cell` in canonical direction order.
    ///
    /// Candidates with a negative component are skipped; the rest are not
    /// bounds checked, so callers filter them with [`GridMap::in_bounds`].
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = (HexDirection, CellCoord)> {
        HexDirection::ALL
            .into_iter()
            .filter_map(move |direction| direction.step_from(cell).map(|next| (direction, next)))
    }

    /// Iterates over every cell and its current terrain in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, TerrainKind)> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns).map(move |column| {
                let cell = CellCoord::new(column, row);
                (cell, self.terrain_at(cell))
            })
        })
    }

    /// Marks a cell as walked across by a completed phase.
    pub fn mark_visited(&mut self, cell: CellCoord) {
        self.write_overlay(cell, TerrainKind::Visited);
    }

    /// Marks the cell a completed phase ended on.
    pub fn mark_occupied(&mut self, cell: CellCoord) {
        self.write_overlay(cell, TerrainKind::Occupied);
    }

    fn write_overlay(&mut self, cell: CellCoord, kind: TerrainKind) {
        if let Some(index) = self.index(cell) {
            self.overlay[index] = Some(kind);
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}
