#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game session state for Skirmish.
//!
//! The [`World`] owns the board loaded from a map file together with the
//! player's hover cursor and tile selection. Adapters mutate it exclusively
//! through [`apply`] and read it through the [`query`] module.

mod grid;
mod map_file;

use skirmish_core::{CellCoord, Command, Event, PlacementError, RemovalError, SelectionError, Unit};

pub use grid::{Grid, GridError, Tile};
pub use map_file::{
    load_map, parse_map, MapFormat, MapFormatError, MapLoadError, CELL_CODE_WIDTH,
};

/// Represents the authoritative Skirmish session state.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    cursor: CellCoord,
    selection: Option<CellCoord>,
}

impl World {
    /// Creates a session around a loaded grid with the cursor on the
    /// top-left tile and nothing selected.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            cursor: CellCoord::new(0, 0),
            selection: None,
        }
    }

    fn hover(&mut self, to: CellCoord, out_events: &mut Vec<Event>) {
        if to == self.cursor {
            return;
        }

        let from = self.cursor;
        self.cursor = to;
        out_events.push(Event::CursorMoved { from, to });
    }

    fn select(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        match self.grid.tile_at(cell) {
            Ok(tile) => {
                let occupied = tile.is_occupied();
                self.selection = Some(cell);
                out_events.push(Event::TileSelected { cell, occupied });
            }
            Err(error) => {
                tracing::warn!(%error, "selection rejected");
                out_events.push(Event::SelectionRejected {
                    cell,
                    reason: SelectionError::OutOfBounds,
                });
            }
        }
    }

    fn place_unit(&mut self, cell: CellCoord, unit: Unit, out_events: &mut Vec<Event>) {
        let reason = match self.grid.tile_at_mut(cell) {
            Ok(tile) if tile.is_occupied() => PlacementError::Occupied,
            Ok(tile) => {
                let _ = tile.set_occupant(unit);
                out_events.push(Event::UnitPlaced { cell, unit });
                return;
            }
            Err(_) => PlacementError::OutOfBounds,
        };

        tracing::warn!(?cell, ?reason, "unit placement rejected");
        out_events.push(Event::UnitPlacementRejected { cell, unit, reason });
    }

    fn remove_unit(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let reason = match self.grid.tile_at_mut(cell) {
            Ok(tile) => match tile.take_occupant() {
                Some(unit) => {
                    out_events.push(Event::UnitRemoved { cell, unit });
                    return;
                }
                None => RemovalError::Vacant,
            },
            Err(_) => RemovalError::OutOfBounds,
        };

        tracing::warn!(?cell, ?reason, "unit removal rejected");
        out_events.push(Event::UnitRemovalRejected { cell, reason });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::MoveCursor { direction } => {
            let next = world
                .cursor
                .step(direction, world.grid.columns(), world.grid.rows());
            if let Some(next) = next {
                world.hover(next, out_events);
            }
        }
        Command::HoverCell { cell } => {
            if world.grid.contains(cell) {
                world.hover(cell, out_events);
            } else {
                tracing::trace!(?cell, "hover outside grid ignored");
            }
        }
        Command::SelectHovered => {
            let cell = world.cursor;
            world.select(cell, out_events);
        }
        Command::SelectCell { cell } => world.select(cell, out_events),
        Command::ClearSelection => {
            if let Some(cell) = world.selection.take() {
                out_events.push(Event::SelectionCleared { cell });
            }
        }
        Command::PlaceUnit { cell, unit } => world.place_unit(cell, unit, out_events),
        Command::RemoveUnit { cell } => world.remove_unit(cell, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use skirmish_core::{CellCoord, Unit};

    use super::{Grid, World};

    /// Provides read-only access to the board.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Cell currently under the hover cursor.
    #[must_use]
    pub fn cursor(world: &World) -> CellCoord {
        world.cursor
    }

    /// Cell currently selected by the player, if any.
    #[must_use]
    pub fn selection(world: &World) -> Option<CellCoord> {
        world.selection
    }

    /// Reports whether a unit stands on the provided cell. Cells outside the
    /// grid are never occupied.
    #[must_use]
    pub fn is_occupied(world: &World, cell: CellCoord) -> bool {
        world.grid.is_occupied(cell).unwrap_or(false)
    }

    /// Unit standing on the provided cell, if any.
    #[must_use]
    pub fn occupant(world: &World, cell: CellCoord) -> Option<Unit> {
        world.grid.tile_at(cell).ok().and_then(|tile| tile.occupant())
    }

    /// Unit standing on the selected tile, if any.
    #[must_use]
    pub fn selected_unit(world: &World) -> Option<Unit> {
        world.selection.and_then(|cell| occupant(world, cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::{Direction, TerrainKind, UnitKind};

    fn world_3x2() -> World {
        World::new(Grid::filled(3, 2, TerrainKind::Plains).expect("non-empty grid"))
    }

    fn run(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    #[test]
    fn cursor_starts_top_left_and_stops_at_edges() {
        let mut world = world_3x2();
        assert_eq!(query::cursor(&world), CellCoord::new(0, 0));

        let events = run(
            &mut world,
            Command::MoveCursor {
                direction: Direction::North,
            },
        );
        assert!(events.is_empty(), "cursor must not leave the grid");

        let events = run(
            &mut world,
            Command::MoveCursor {
                direction: Direction::South,
            },
        );
        assert_eq!(
            events,
            vec![Event::CursorMoved {
                from: CellCoord::new(0, 0),
                to: CellCoord::new(0, 1),
            }]
        );

        let events = run(
            &mut world,
            Command::MoveCursor {
                direction: Direction::South,
            },
        );
        assert!(events.is_empty());
        assert_eq!(query::cursor(&world), CellCoord::new(0, 1));
    }

    #[test]
    fn hover_outside_grid_is_ignored() {
        let mut world = world_3x2();
        let events = run(
            &mut world,
            Command::HoverCell {
                cell: CellCoord::new(7, 0),
            },
        );
        assert!(events.is_empty());

        let events = run(
            &mut world,
            Command::HoverCell {
                cell: CellCoord::new(2, 1),
            },
        );
        assert_eq!(events.len(), 1);
        assert_eq!(query::cursor(&world), CellCoord::new(2, 1));
    }

    #[test]
    fn selecting_reports_occupancy() {
        let mut world = World::new(parse_map("pnnn,pnin\npnnn,pnnn").expect("valid map"));

        let events = run(&mut world, Command::SelectHovered);
        assert_eq!(
            events,
            vec![Event::TileSelected {
                cell: CellCoord::new(0, 0),
                occupied: false,
            }]
        );

        let events = run(
            &mut world,
            Command::SelectCell {
                cell: CellCoord::new(1, 0),
            },
        );
        assert_eq!(
            events,
            vec![Event::TileSelected {
                cell: CellCoord::new(1, 0),
                occupied: true,
            }]
        );
        assert_eq!(
            query::selected_unit(&world).map(|unit| unit.kind()),
            Some(UnitKind::Infantry)
        );
    }

    #[test]
    fn out_of_bounds_click_keeps_previous_selection() {
        let mut world = world_3x2();
        let _ = run(&mut world, Command::SelectHovered);

        let events = run(
            &mut world,
            Command::SelectCell {
                cell: CellCoord::new(3, 0),
            },
        );
        assert_eq!(
            events,
            vec![Event::SelectionRejected {
                cell: CellCoord::new(3, 0),
                reason: SelectionError::OutOfBounds,
            }]
        );
        assert_eq!(query::selection(&world), Some(CellCoord::new(0, 0)));
    }

    #[test]
    fn clearing_selection_emits_once() {
        let mut world = world_3x2();
        let _ = run(&mut world, Command::SelectHovered);

        let events = run(&mut world, Command::ClearSelection);
        assert_eq!(
            events,
            vec![Event::SelectionCleared {
                cell: CellCoord::new(0, 0),
            }]
        );
        assert!(run(&mut world, Command::ClearSelection).is_empty());
        assert_eq!(query::selection(&world), None);
    }

    #[test]
    fn unit_lifecycle_through_commands() {
        let mut world = world_3x2();
        let cell = CellCoord::new(2, 1);
        let unit = Unit::new(UnitKind::Sniper);

        let events = run(&mut world, Command::PlaceUnit { cell, unit });
        assert_eq!(events, vec![Event::UnitPlaced { cell, unit }]);
        assert!(query::is_occupied(&world, cell));

        let events = run(&mut world, Command::PlaceUnit { cell, unit });
        assert_eq!(
            events,
            vec![Event::UnitPlacementRejected {
                cell,
                unit,
                reason: PlacementError::Occupied,
            }]
        );

        let events = run(&mut world, Command::RemoveUnit { cell });
        assert_eq!(events, vec![Event::UnitRemoved { cell, unit }]);
        assert!(!query::is_occupied(&world, cell));

        let events = run(&mut world, Command::RemoveUnit { cell });
        assert_eq!(
            events,
            vec![Event::UnitRemovalRejected {
                cell,
                reason: RemovalError::Vacant,
            }]
        );

        let outside = CellCoord::new(0, 5);
        let events = run(&mut world, Command::PlaceUnit { cell: outside, unit });
        assert_eq!(
            events,
            vec![Event::UnitPlacementRejected {
                cell: outside,
                unit,
                reason: PlacementError::OutOfBounds,
            }]
        );
        assert!(!query::is_occupied(&world, outside));
    }
}
