use std::{fs, path::Path};

use anyhow::{Context, Result};
use hex_treasure_core::{CellCoord, HuntError, TerrainKind};
use hex_treasure_world::{Expedition, GridMap};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_MAP: &str = include_str!("../maps/default.toml");

/// On-disk description of an expedition.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MapFile {
    /// Start cell as `[column, row]`.
    pub(crate) start: [u32; 2],
    /// Treasure cells as `[column, row]`, in configuration order.
    #[serde(default)]
    pub(crate) treasures: Vec<[u32; 2]>,
    /// Grid rows of whitespace-separated terrain tokens, top row first.
    pub(crate) grid: Vec<String>,
}

impl MapFile {
    /// Decodes a map file from TOML text.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("map file is not valid TOML")
    }

    /// Builds the validated expedition described by the file.
    pub(crate) fn into_expedition(self) -> Result<Expedition, MapConfigError> {
        let mut rows = Vec::with_capacity(self.grid.len());
        for (row, line) in self.grid.iter().enumerate() {
            let mut cells = Vec::new();
            for (column, token) in line.split_whitespace().enumerate() {
                let kind: TerrainKind = token.parse().map_err(|_| MapConfigError::UnknownToken {
                    row,
                    column,
                    token: token.to_owned(),
                })?;
                if kind.is_overlay() {
                    return Err(MapConfigError::OverlayToken {
                        row,
                        column,
                        token: token.to_owned(),
                    });
                }
                cells.push(kind);
            }
            rows.push(cells);
        }

        let map = GridMap::new(rows)?;
        let goals = self.treasures.into_iter().map(coordinate).collect();
        Ok(Expedition::new(map, coordinate(self.start), goals)?)
    }
}

fn coordinate([column, row]: [u32; 2]) -> CellCoord {
    CellCoord::new(column, row)
}

/// Problems found while turning a map file into an expedition.
#[derive(Debug, Error)]
pub(crate) enum MapConfigError {
    /// A grid token names no terrain kind.
    #[error("unknown terrain token '{token}' at row {row}, column {column}")]
    UnknownToken {
        /// Zero-based grid row.
        row: usize,
        /// Zero-based token position within the row.
        column: usize,
        /// Offending token.
        token: String,
    },
    /// A grid token names a kind only a completed phase may write.
    #[error("terrain token '{token}' at row {row}, column {column} cannot appear in a map file")]
    OverlayToken {
        /// Zero-based grid row.
        row: usize,
        /// Zero-based token position within the row.
        column: usize,
        /// Offending token.
        token: String,
    },
    /// The decoded grid, start or treasures were rejected.
    #[error(transparent)]
    Rejected(#[from] HuntError),
}

/// Loads and validates the expedition stored at `path`.
pub(crate) fn load(path: &Path) -> Result<Expedition> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read map file {}", path.display()))?;
    let file = MapFile::parse(&text).with_context(|| format!("in {}", path.display()))?;
    file.into_expedition()
        .with_context(|| format!("map file {} is invalid", path.display()))
}

/// The expedition bundled with the binary.
pub(crate) fn default_expedition() -> Result<Expedition> {
    MapFile::parse(DEFAULT_MAP)?
        .into_expedition()
        .context("built-in map is invalid")
}
