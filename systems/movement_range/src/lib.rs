#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement range queries and the system that keeps the selected unit's
//! reachable tiles highlighted.
//!
//! [`compute_distances`] runs a dense Dijkstra over the board: every round it
//! scans for the cheapest unsettled cell instead of keeping a heap, and ties
//! go to the first such cell in row-major order.
//! [`reachable_cells`] sweeps the resulting field against a unit's budget.

mod distance;

use skirmish_core::{CellCoord, Event, Unit};
use skirmish_world::{Grid, GridError};
use thiserror::Error;

pub use distance::{compute_distances, DistanceGrid};

/// Failures raised by movement range queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RangeError {
    /// The source cell lies outside the grid.
    #[error("movement source is not on the board: {0}")]
    Source(#[from] GridError),
    /// No unit stands on the source cell.
    #[error("no unit stands on cell ({}, {})", .cell.column(), .cell.row())]
    NoOccupantAtSource {
        /// Cell that was queried.
        cell: CellCoord,
    },
}

/// Cells a unit can move to, in row-major order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReachableCells {
    cells: Vec<CellCoord>,
}

impl ReachableCells {
    /// Reports whether the cell is reachable.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Iterates reachable cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.iter().copied()
    }

    /// Number of reachable cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether nothing is reachable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reachable cells as a slice in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[CellCoord] {
        &self.cells
    }
}

/// Cells the unit could end its move on when starting from `source`.
///
/// A cell is included when the cheapest path to it fits the unit's movement
/// budget. The source itself is never included.
pub fn reachable_cells(
    grid: &Grid,
    source: CellCoord,
    unit: &Unit,
) -> Result<ReachableCells, RangeError> {
    let field = compute_distances(grid, source, unit.movement_class())?;
    let budget = unit.movement_budget();

    let cells: Vec<CellCoord> = field
        .iter()
        .filter(|&(cell, distance)| cell != source && distance.within(budget))
        .map(|(cell, _)| cell)
        .collect();

    tracing::debug!(
        ?source,
        budget,
        reachable = cells.len(),
        "swept movement range"
    );
    Ok(ReachableCells { cells })
}

/// Movement range of the unit standing on `source`.
pub fn reachable_from_occupant(
    grid: &Grid,
    source: CellCoord,
) -> Result<ReachableCells, RangeError> {
    let unit = grid
        .tile_at(source)?
        .occupant()
        .ok_or(RangeError::NoOccupantAtSource { cell: source })?;
    reachable_cells(grid, source, &unit)
}

/// Pure system that tracks the selection and caches the selected unit's
/// movement range for highlighting.
#[derive(Debug, Default)]
pub struct MovementRange {
    selection: Option<CellCoord>,
    highlighted: ReachableCells,
}

impl MovementRange {
    /// Consumes world events and recomputes the highlighted range when the
    /// selection or the units on the board change.
    pub fn handle(&mut self, events: &[Event], grid: &Grid) {
        let mut stale = false;

        for event in events {
            match event {
                Event::TileSelected { cell, .. } => {
                    self.selection = Some(*cell);
                    stale = true;
                }
                Event::SelectionCleared { .. } => {
                    self.selection = None;
                    stale = true;
                }
                Event::UnitPlaced { .. } | Event::UnitRemoved { .. } => {
                    stale |= self.selection.is_some();
                }
                _ => {}
            }
        }

        if stale {
            self.refresh(grid);
        }
    }

    /// Cells currently highlighted as reachable by the selected unit.
    #[must_use]
    pub fn highlighted(&self) -> &ReachableCells {
        &self.highlighted
    }

    /// Cell whose occupant the highlight belongs to, if any.
    #[must_use]
    pub fn selection(&self) -> Option<CellCoord> {
        self.selection
    }

    fn refresh(&mut self, grid: &Grid) {
        self.highlighted = match self.selection {
            Some(cell) => match reachable_from_occupant(grid, cell) {
                Ok(cells) => cells,
                Err(RangeError::NoOccupantAtSource { .. }) => ReachableCells::default(),
                Err(error) => {
                    tracing::warn!(%error, "dropping movement range");
                    ReachableCells::default()
                }
            },
            None => ReachableCells::default(),
        };
    }
}
