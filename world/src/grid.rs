//! Dense rectangular tile storage.

use skirmish_core::{BuildingKind, CellCoord, MovementClass, MovementCost, TerrainKind, Unit};
use thiserror::Error;

/// Errors raised by indexed grid access and grid construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The requested cell lies outside the grid.
    #[error("cell ({}, {}) lies outside the {columns}x{rows} grid", .cell.column(), .cell.row())]
    OutOfBounds {
        /// Cell that was requested.
        cell: CellCoord,
        /// Number of columns in the grid.
        columns: u32,
        /// Number of rows in the grid.
        rows: u32,
    },
    /// A grid must contain at least one row and one column.
    #[error("grid must contain at least one tile")]
    Empty,
    /// The tile count does not fit in a `u32`, which row-major offsets use.
    #[error("grid holds more tiles than can be indexed")]
    TooLarge,
    /// A row's length differs from the first row's.
    #[error("row {row} holds {found} tiles, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: u32,
        /// Tiles in the first row.
        expected: u32,
        /// Tiles in the offending row.
        found: u32,
    },
}

/// Single cell of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    terrain: TerrainKind,
    building: Option<BuildingKind>,
    occupant: Option<Unit>,
    invader: Option<Unit>,
}

impl Tile {
    /// Creates a bare tile of the provided terrain.
    #[must_use]
    pub const fn new(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            building: None,
            occupant: None,
            invader: None,
        }
    }

    /// Returns the tile with the provided building standing on it.
    #[must_use]
    pub const fn with_building(self, building: BuildingKind) -> Self {
        Self {
            building: Some(building),
            ..self
        }
    }

    /// Returns the tile with the provided unit occupying it.
    #[must_use]
    pub const fn with_occupant(self, occupant: Unit) -> Self {
        Self {
            occupant: Some(occupant),
            ..self
        }
    }

    /// Returns the tile with the provided hostile unit invading it.
    #[must_use]
    pub const fn with_invader(self, invader: Unit) -> Self {
        Self {
            invader: Some(invader),
            ..self
        }
    }

    /// Surface the tile is made of.
    #[must_use]
    pub const fn terrain(&self) -> TerrainKind {
        self.terrain
    }

    /// Structure standing on the tile, if any.
    #[must_use]
    pub const fn building(&self) -> Option<BuildingKind> {
        self.building
    }

    /// Unit occupying the tile, if any.
    #[must_use]
    pub const fn occupant(&self) -> Option<Unit> {
        self.occupant
    }

    /// Hostile unit sharing the tile, if any. Invaders never count as
    /// occupants.
    #[must_use]
    pub const fn invader(&self) -> Option<Unit> {
        self.invader
    }

    /// Reports whether a unit occupies the tile.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Cost a unit of the provided class pays to enter the tile.
    #[must_use]
    pub const fn movement_cost(&self, class: MovementClass) -> MovementCost {
        self.terrain.movement_cost(class)
    }

    /// Replaces the building standing on the tile.
    pub fn set_building(&mut self, building: Option<BuildingKind>) {
        self.building = building;
    }

    /// Puts a unit on the tile, returning the previous occupant.
    pub fn set_occupant(&mut self, occupant: Unit) -> Option<Unit> {
        self.occupant.replace(occupant)
    }

    /// Clears the occupant, returning it.
    pub fn take_occupant(&mut self) -> Option<Unit> {
        self.occupant.take()
    }
}

/// Rectangular board of tiles stored in row-major order.
///
/// The shape is fixed at construction; only tile contents change afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Builds a grid from rows of tiles, rejecting empty or ragged input.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, GridError> {
        let expected = rows.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(GridError::Empty);
        }

        let columns = u32::try_from(expected).map_err(|_| GridError::TooLarge)?;
        let row_count = u32::try_from(rows.len()).map_err(|_| GridError::TooLarge)?;
        let count = columns
            .checked_mul(row_count)
            .ok_or(GridError::TooLarge)?;
        let mut tiles =
            Vec::with_capacity(usize::try_from(count).map_err(|_| GridError::TooLarge)?);

        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != expected {
                return Err(GridError::Ragged {
                    row: u32::try_from(index).unwrap_or(u32::MAX),
                    expected: columns,
                    found: u32::try_from(row.len()).unwrap_or(u32::MAX),
                });
            }
            tiles.extend(row);
        }

        Ok(Self {
            columns,
            rows: row_count,
            tiles,
        })
    }

    /// Builds a grid where every tile is bare terrain of the provided kind.
    pub fn filled(columns: u32, rows: u32, terrain: TerrainKind) -> Result<Self, GridError> {
        if columns == 0 || rows == 0 {
            return Err(GridError::Empty);
        }

        let count = columns.checked_mul(rows).ok_or(GridError::TooLarge)?;
        let count = usize::try_from(count).map_err(|_| GridError::TooLarge)?;
        Ok(Self {
            columns,
            rows,
            tiles: vec![Tile::new(terrain); count],
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

    /// Largest valid column index.
    #[must_use]
    pub const fn max_column_index(&self) -> u32 {
        self.columns - 1
    }

    /// Largest valid row index.
    #[must_use]
    pub const fn max_row_index(&self) -> u32 {
        self.rows - 1
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Tile stored at the provided cell.
    pub fn tile_at(&self, cell: CellCoord) -> Result<&Tile, GridError> {
        let index = self.index(cell)?;
        Ok(&self.tiles[index])
    }

    /// Mutable tile stored at the provided cell.
    pub fn tile_at_mut(&mut self, cell: CellCoord) -> Result<&mut Tile, GridError> {
        let index = self.index(cell)?;
        Ok(&mut self.tiles[index])
    }

    /// Reports whether a unit occupies the provided cell.
    pub fn is_occupied(&self, cell: CellCoord) -> Result<bool, GridError> {
        self.tile_at(cell).map(Tile::is_occupied)
    }

    /// Iterates tiles in row-major order: row 0 left to right, then row 1.
    pub fn iter(&self) -> impl Iterator<Item = (&Tile, CellCoord)> + '_ {
        let columns = self.columns;
        self.tiles.iter().zip(0u32..).map(move |(tile, offset)| {
            (tile, CellCoord::new(offset % columns, offset / columns))
        })
    }

    /// Iterates cell coordinates in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows)
            .flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }

    fn index(&self, cell: CellCoord) -> Result<usize, GridError> {
        if !self.contains(cell) {
            return Err(GridError::OutOfBounds {
                cell,
                columns: self.columns,
                rows: self.rows,
            });
        }

        let row = usize::try_from(cell.row()).unwrap_or(usize::MAX);
        let column = usize::try_from(cell.column()).unwrap_or(usize::MAX);
        let width = usize::try_from(self.columns).unwrap_or(usize::MAX);
        Ok(row * width + column)
    }
}
