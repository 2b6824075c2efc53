//! Dense single-source shortest paths over the board.

use skirmish_core::{CellCoord, Direction, Distance, MovementClass, MovementCost};
use skirmish_world::{Grid, GridError};

use crate::RangeError;

/// Per-cell distance and settlement state produced by [`compute_distances`].
///
/// Cells are stored row-major with the same shape as the grid they were
/// computed from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceGrid {
    columns: u32,
    rows: u32,
    distances: Vec<Distance>,
    visited: Vec<bool>,
}

impl DistanceGrid {
    fn unreached(columns: u32, rows: u32, count: usize) -> Self {
        Self {
            columns,
            rows,
            distances: vec![Distance::INFINITE; count],
            visited: vec![false; count],
        }
    }

    /// Number of columns covered by the field.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows covered by the field.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Shortest distance from the source to the cell, or `None` when the cell
    /// lies outside the field.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<Distance> {
        self.index(cell).map(|index| self.distances[index])
    }

    /// Reports whether the cell's distance was settled.
    #[must_use]
    pub fn is_visited(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some_and(|index| self.visited[index])
    }

    /// Iterates every cell with its distance in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Distance)> + '_ {
        self.distances
            .iter()
            .enumerate()
            .map(|(index, distance)| (self.cell(index), *distance))
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }

        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    fn cell(&self, index: usize) -> CellCoord {
        let width = usize::try_from(self.columns).unwrap_or(usize::MAX);
        CellCoord::new(
            u32::try_from(index % width).unwrap_or(u32::MAX),
            u32::try_from(index / width).unwrap_or(u32::MAX),
        )
    }

    /// Unvisited cell with the smallest finite distance. Ties resolve to the
    /// first cell in row-major order; `None` once nothing finite remains.
    fn nearest_unvisited(&self) -> Option<usize> {
        let mut nearest: Option<(usize, Distance)> = None;

        for (index, (&distance, &visited)) in self.distances.iter().zip(&self.visited).enumerate()
        {
            if visited || !distance.is_finite() {
                continue;
            }
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((index, distance));
            }
        }

        nearest.map(|(index, _)| index)
    }
}

/// Computes the cheapest movement cost from `source` to every cell for a unit
/// of the provided movement class.
///
/// Entering a cell costs that cell's terrain cost; the source's own terrain is
/// never paid. Cells cut off by impassable terrain keep
/// [`Distance::INFINITE`]. The grid is only read.
pub fn compute_distances(
    grid: &Grid,
    source: CellCoord,
    class: MovementClass,
) -> Result<DistanceGrid, RangeError> {
    let (columns, rows) = (grid.columns(), grid.rows());
    // Entry costs in the same row-major order as the field.
    let costs: Vec<MovementCost> = grid
        .iter()
        .map(|(tile, _)| tile.movement_cost(class))
        .collect();
    let mut field = DistanceGrid::unreached(columns, rows, costs.len());
    let source_index = field.index(source).ok_or(GridError::OutOfBounds {
        cell: source,
        columns,
        rows,
    })?;
    field.distances[source_index] = Distance::ZERO;
    let mut settled = 0usize;

    while let Some(current) = field.nearest_unvisited() {
        let cell = field.cell(current);
        let here = field.distances[current];
        tracing::trace!(?cell, ?here, "settling cell");

        for direction in Direction::ALL {
            let Some(neighbor) = cell.step(direction, columns, rows) else {
                continue;
            };
            let Some(index) = field.index(neighbor) else {
                continue;
            };
            if field.visited[index] {
                continue;
            }

            let candidate = here.step(costs[index]);
            if candidate < field.distances[index] {
                field.distances[index] = candidate;
            }
        }

        field.visited[current] = true;
        settled += 1;
    }

    tracing::debug!(?source, ?class, settled, "computed distance field");
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::TerrainKind;
    use skirmish_world::parse_map;

    #[test]
    fn source_is_zero_and_costs_accumulate() {
        let grid = parse_map("pnnn,fnnn,pnnn").expect("valid map");
        let field =
            compute_distances(&grid, CellCoord::new(0, 0), MovementClass::Foot).expect("in bounds");

        assert_eq!(field.distance(CellCoord::new(0, 0)), Some(Distance::ZERO));
        assert_eq!(
            field.distance(CellCoord::new(1, 0)).and_then(Distance::get),
            Some(2)
        );
        assert_eq!(
            field.distance(CellCoord::new(2, 0)).and_then(Distance::get),
            Some(3)
        );
        assert_eq!(field.distance(CellCoord::new(3, 0)), None);
    }

    #[test]
    fn cheaper_detour_beats_direct_route() {
        let grid =
            parse_map("pnnn,fnnn,fnnn,fnnn,pnnn\npnnn,pnnn,pnnn,pnnn,pnnn").expect("valid map");
        let field =
            compute_distances(&grid, CellCoord::new(0, 0), MovementClass::Foot).expect("in bounds");

        // Through the forest: 2 + 2 + 2 + 1. Around it: 1 + 4 + 1.
        assert_eq!(
            field.distance(CellCoord::new(4, 0)).and_then(Distance::get),
            Some(6)
        );
        assert_eq!(
            field.distance(CellCoord::new(4, 1)).and_then(Distance::get),
            Some(5)
        );
    }

    #[test]
    fn only_finite_cells_are_settled() {
        let grid = parse_map("pnnn,mnnn,pnnn\nmnnn,mnnn,pnnn").expect("valid map");
        let field =
            compute_distances(&grid, CellCoord::new(0, 0), MovementClass::Foot).expect("in bounds");

        for (cell, distance) in field.iter() {
            assert_eq!(
                field.is_visited(cell),
                distance.is_finite(),
                "settlement mismatch at {cell:?}"
            );
        }
        assert!(field.is_visited(CellCoord::new(0, 0)));
        assert!(!field.is_visited(CellCoord::new(2, 1)));
        assert_eq!(field.nearest_unvisited(), None);
    }

    #[test]
    fn nearest_unvisited_prefers_row_major_order_on_ties() {
        let mut field = DistanceGrid::unreached(2, 2, 4);
        field.distances[0] = Distance::ZERO;
        field.visited[0] = true;
        let plains = TerrainKind::Plains.movement_cost(MovementClass::Foot);
        field.distances[1] = Distance::ZERO.step(plains);
        field.distances[2] = Distance::ZERO.step(plains);

        assert_eq!(field.nearest_unvisited(), Some(1));
        assert_eq!(field.cell(2), CellCoord::new(0, 1));
    }

    #[test]
    fn rejects_source_outside_grid() {
        let grid = parse_map("pnnn,pnnn").expect("valid map");
        assert_eq!(
            compute_distances(&grid, CellCoord::new(2, 0), MovementClass::Foot),
            Err(RangeError::Source(GridError::OutOfBounds {
                cell: CellCoord::new(2, 0),
                columns: 2,
                rows: 1,
            }))
        );
    }

    #[test]
    fn settled_distances_agree_with_neighbour_entry_costs() {
        let grid = parse_map("pnnn,fnnn,mnnn
mnnn,pnnn,fnnn
fnnn,pnnn,pnnn").expect("valid map");

        for class in [MovementClass::Foot, MovementClass::Climbing] {
            let field = compute_distances(&grid, CellCoord::new(1, 1), class).expect("in bounds");

            for (cell, distance) in field.iter() {
                if cell == CellCoord::new(1, 1) || !distance.is_finite() {
                    continue;
                }
                let entry = grid.tile_at(cell).expect("in bounds").movement_cost(class);
                let best = Direction::ALL
                    .into_iter()
                    .filter_map(|direction| cell.step(direction, 3, 3))
                    .filter_map(|neighbor| field.distance(neighbor))
                    .map(|neighbor| neighbor.step(entry))
                    .min();
                assert_eq!(best, Some(distance), "{class:?} at {cell:?}");
            }
        }
    }
}
