#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Text rendering of hex grids and paths for terminal adapters.

use std::fmt;

use hex_treasure_core::CellCoord;
use hex_treasure_world::GridMap;

/// Horizontal distance between the left edges of neighbouring columns.
const COLUMN_PITCH: usize = 5;
/// Lines a row of hexes adds to the drawing.
const ROW_PITCH: usize = 2;

/// Flat-top hex drawing of a [`GridMap`] with even columns shoved down half a hex.
///
/// Every cell shows the token of its current terrain, so consumed cells
/// appear with their overlay token.
#[derive(Clone, Copy, Debug)]
pub struct HexGridDisplay<'a> {
    map: &'a GridMap,
}

impl<'a> HexGridDisplay<'a> {
    /// Creates a display for `map`.
    #[must_use]
    pub const fn new(map: &'a GridMap) -> Self {
        Self { map }
    }

    fn canvas(&self) -> Vec<Vec<char>> {
        let columns = usize::try_from(self.map.columns()).unwrap_or(0);
        let rows = usize::try_from(self.map.rows()).unwrap_or(0);
        let width = columns * COLUMN_PITCH + 1;
        let height = rows * ROW_PITCH + 2;
        let mut canvas = vec![vec![' '; width]; height];

        for (cell, terrain) in self.map.cells() {
            let column = usize::try_from(cell.column()).unwrap_or(0);
            let row = usize::try_from(cell.row()).unwrap_or(0);
            let left = column * COLUMN_PITCH;
            let top = row * ROW_PITCH + usize::from(column % 2 == 0);
            let label = format!("{:>3} ", terrain.token());

            for offset in 1..COLUMN_PITCH {
                canvas[top][left + offset] = '_';
                canvas[top + 2][left + offset] = '_';
            }
            canvas[top + 1][left] = '/';
            canvas[top + 1][left + COLUMN_PITCH] = '\\';
            canvas[top + 2][left] = '\\';
            canvas[top + 2][left + COLUMN_PITCH] = '/';
            for (offset, glyph) in label.chars().take(COLUMN_PITCH - 1).enumerate() {
                canvas[top + 1][left + 1 + offset] = glyph;
            }
        }

        canvas
    }
}

impl fmt::Display for HexGridDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .canvas()
            .into_iter()
            .map(|line| line.into_iter().collect::<String>().trim_end().to_owned())
            .collect();
        let first = lines.iter().position(|line| !line.is_empty()).unwrap_or(0);
        let last = lines
            .iter()
            .rposition(|line| !line.is_empty())
            .map_or(first, |index| index + 1);

        for (index, line) in lines[first..last].iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

/// Draws `map` as text, one line per half-hex row, without a trailing newline.
#[must_use]
pub fn render_grid(map: &GridMap) -> String {
    HexGridDisplay::new(map).to_string()
}

/// Formats a path as `-> (c, r) -> (c, r) ...`.
#[must_use]
pub fn format_path(path: &[CellCoord]) -> String {
    path.iter()
        .map(|cell| format!("-> {cell}"))
        .collect::<Vec<_>>()
        .join(" ")
}
