//! Text map decoding.
//!
//! Maps are delimited text grids with one line per row. Every cell is a
//! four-letter code: terrain, building, occupant and invader, where `n`
//! stands for "none" in the last three positions.
//!
//! ```text
//! pnin,fnnn,mnnn
//! pcnn,pnnn,pnsn
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use skirmish_core::{BuildingKind, TerrainKind, Unit, UnitKind};
use thiserror::Error;

use crate::{Grid, GridError, Tile};

/// Number of characters in a single cell code.
pub const CELL_CODE_WIDTH: usize = 4;

const NONE_CODE: char = 'n';

/// Structural or content problems found while decoding a map.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapFormatError {
    /// The map does not contain a single row.
    #[error("map contains no rows")]
    NoRows,
    /// A row holds a different number of cells than the first row.
    #[error("line {line} holds {found} cells, expected {expected}")]
    RaggedRow {
        /// One-based line number of the offending row.
        line: usize,
        /// Cells in the first row.
        expected: usize,
        /// Cells in the offending row.
        found: usize,
    },
    /// A cell code is not exactly [`CELL_CODE_WIDTH`] characters long.
    #[error(
        "line {line}, cell {cell}: code {token:?} must be {} characters long",
        CELL_CODE_WIDTH
    )]
    CodeWidth {
        /// One-based line number.
        line: usize,
        /// One-based cell position within the line.
        cell: usize,
        /// Offending code.
        token: String,
    },
    /// The terrain letter is not recognised.
    #[error("line {line}, cell {cell}: unknown terrain code {code:?}")]
    UnknownTerrain {
        /// One-based line number.
        line: usize,
        /// One-based cell position within the line.
        cell: usize,
        /// Offending letter.
        code: char,
    },
    /// The building letter is not recognised.
    #[error("line {line}, cell {cell}: unknown building code {code:?}")]
    UnknownBuilding {
        /// One-based line number.
        line: usize,
        /// One-based cell position within the line.
        cell: usize,
        /// Offending letter.
        code: char,
    },
    /// The occupant or invader letter is not recognised.
    #[error("line {line}, cell {cell}: unknown unit code {code:?}")]
    UnknownUnit {
        /// One-based line number.
        line: usize,
        /// One-based cell position within the line.
        cell: usize,
        /// Offending letter.
        code: char,
    },
    /// The decoded rows could not form a grid.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Failures raised while loading a map file.
#[derive(Debug, Error)]
pub enum MapLoadError {
    /// The map file could not be opened or read.
    #[error("map file {} could not be opened", .path.display())]
    NotFound {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The map file was read but its contents are malformed.
    #[error("malformed map: {0}")]
    Format(#[from] MapFormatError),
}

/// Decoder settings for the delimited map format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapFormat {
    delimiter: char,
}

impl Default for MapFormat {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl MapFormat {
    /// Creates a format that separates cells with the provided character.
    #[must_use]
    pub const fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Character separating cells within a row.
    #[must_use]
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Reads and decodes the map stored at `path`.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Grid, MapLoadError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| MapLoadError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "read map file");
        Ok(self.parse(&contents)?)
    }

    /// Decodes a map from its textual description.
    ///
    /// Blank lines are skipped and a single trailing delimiter on a line is
    /// tolerated. Nothing is returned unless every cell decodes.
    pub fn parse(&self, text: &str) -> Result<Grid, MapFormatError> {
        let mut rows: Vec<Vec<Tile>> = Vec::new();
        let mut expected: Option<usize> = None;

        for (index, raw_line) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw_line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let body = trimmed.strip_suffix(self.delimiter).unwrap_or(trimmed);
            let row = body
                .split(self.delimiter)
                .enumerate()
                .map(|(position, token)| decode_cell(token.trim(), line, position + 1))
                .collect::<Result<Vec<_>, _>>()?;

            match expected {
                None => expected = Some(row.len()),
                Some(expected) if expected != row.len() => {
                    return Err(MapFormatError::RaggedRow {
                        line,
                        expected,
                        found: row.len(),
                    });
                }
                Some(_) => {}
            }

            rows.push(row);
        }

        if rows.is_empty() {
            return Err(MapFormatError::NoRows);
        }

        let grid = Grid::from_rows(rows)?;
        tracing::debug!(
            columns = grid.columns(),
            rows = grid.rows(),
            "decoded map"
        );
        Ok(grid)
    }
}

/// Decodes a map using the default comma delimiter.
pub fn parse_map(text: &str) -> Result<Grid, MapFormatError> {
    MapFormat::default().parse(text)
}

/// Loads a map file using the default comma delimiter.
pub fn load_map(path: impl AsRef<Path>) -> Result<Grid, MapLoadError> {
    MapFormat::default().load(path)
}

fn decode_cell(token: &str, line: usize, cell: usize) -> Result<Tile, MapFormatError> {
    let codes: Vec<char> = token.chars().collect();
    let &[terrain, building, occupant, invader] = codes.as_slice() else {
        return Err(MapFormatError::CodeWidth {
            line,
            cell,
            token: token.to_owned(),
        });
    };

    let terrain = TerrainKind::from_code(terrain)
        .ok_or(MapFormatError::UnknownTerrain { line, cell, code: terrain })?;
    let mut tile = Tile::new(terrain);

    if building != NONE_CODE {
        let building = BuildingKind::from_code(building)
            .ok_or(MapFormatError::UnknownBuilding { line, cell, code: building })?;
        tile = tile.with_building(building);
    }
    if let Some(unit) = decode_unit(occupant, line, cell)? {
        tile = tile.with_occupant(unit);
    }
    if let Some(unit) = decode_unit(invader, line, cell)? {
        tile = tile.with_invader(unit);
    }

    Ok(tile)
}

fn decode_unit(code: char, line: usize, cell: usize) -> Result<Option<Unit>, MapFormatError> {
    if code == NONE_CODE {
        return Ok(None);
    }

    UnitKind::from_code(code)
        .map(|kind| Some(Unit::new(kind)))
        .ok_or(MapFormatError::UnknownUnit { line, cell, code })
}
