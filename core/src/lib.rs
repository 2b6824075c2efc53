#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Skirmish engine.
//!
//! This crate defines the value types and message surface that connect
//! adapters, the authoritative world, and pure systems. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically.

use serde::{Deserialize, Serialize};

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Moves the hover cursor a single tile in the provided direction.
    MoveCursor {
        /// Direction of travel for the cursor.
        direction: Direction,
    },
    /// Places the hover cursor directly over the provided cell.
    HoverCell {
        /// Cell the cursor should hover.
        cell: CellCoord,
    },
    /// Selects the tile currently under the hover cursor.
    SelectHovered,
    /// Selects the provided cell, typically in response to a click.
    SelectCell {
        /// Cell the player clicked.
        cell: CellCoord,
    },
    /// Drops the current selection, if any.
    ClearSelection,
    /// Places a unit onto a vacant tile.
    PlaceUnit {
        /// Tile that should receive the unit.
        cell: CellCoord,
        /// Unit to place.
        unit: Unit,
    },
    /// Removes the unit occupying the provided tile.
    RemoveUnit {
        /// Tile whose occupant should be cleared.
        cell: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the hover cursor moved between two cells.
    CursorMoved {
        /// Cell hovered before the move.
        from: CellCoord,
        /// Cell hovered after the move.
        to: CellCoord,
    },
    /// Confirms that a tile became the active selection.
    TileSelected {
        /// Cell that was selected.
        cell: CellCoord,
        /// Whether a unit occupied the tile at selection time.
        occupied: bool,
    },
    /// Reports that a selection request was rejected.
    SelectionRejected {
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the selection failed.
        reason: SelectionError,
    },
    /// Confirms that the previous selection was dropped.
    SelectionCleared {
        /// Cell that was selected before clearing.
        cell: CellCoord,
    },
    /// Confirms that a unit was placed onto a tile.
    UnitPlaced {
        /// Tile that received the unit.
        cell: CellCoord,
        /// Unit that was placed.
        unit: Unit,
    },
    /// Reports that a unit placement request was rejected.
    UnitPlacementRejected {
        /// Tile provided in the request.
        cell: CellCoord,
        /// Unit the request attempted to place.
        unit: Unit,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a unit was removed from a tile.
    UnitRemoved {
        /// Tile the unit occupied.
        cell: CellCoord,
        /// Unit that was removed.
        unit: Unit,
    },
    /// Reports that a unit removal request was rejected.
    UnitRemovalRejected {
        /// Tile provided in the request.
        cell: CellCoord,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
}

/// Cardinal directions available to the cursor and to unit movement.
///
/// Rows grow downward, so north decreases the row index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All directions in clockwise order starting from north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Adjacent cell in the provided direction, if it lies inside a grid of
    /// `columns` by `rows` cells.
    #[must_use]
    pub fn step(self, direction: Direction, columns: u32, rows: u32) -> Option<CellCoord> {
        let next = match direction {
            Direction::North => CellCoord::new(self.column, self.row.checked_sub(1)?),
            Direction::East => CellCoord::new(self.column.checked_add(1)?, self.row),
            Direction::South => CellCoord::new(self.column, self.row.checked_add(1)?),
            Direction::West => CellCoord::new(self.column.checked_sub(1)?, self.row),
        };

        (next.column < columns && next.row < rows).then_some(next)
    }
}

/// Movement capability classes shared by units that traverse terrain alike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementClass {
    /// Regular troops walking on foot; mountains stop them.
    Foot,
    /// Troops trained to scale mountain passes.
    Climbing,
}

/// Cost paid to enter a tile, or the impassable sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MovementCost(u32);

impl MovementCost {
    /// Sentinel reported for terrain that a movement class cannot enter.
    pub const IMPASSABLE: Self = Self(u32::MAX);

    const fn finite(cost: u32) -> Self {
        Self(cost)
    }

    /// Finite cost of entering the tile, or `None` when impassable.
    #[must_use]
    pub const fn get(self) -> Option<u32> {
        if self.0 == u32::MAX {
            None
        } else {
            Some(self.0)
        }
    }

    /// Reports whether the tile can be entered at all.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        self.0 != u32::MAX
    }
}

/// Accumulated movement cost from a source tile.
///
/// [`Distance::INFINITE`] marks unreachable cells. Every addition saturates
/// into the sentinel instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Distance(u32);

impl Distance {
    /// Distance of the source cell to itself.
    pub const ZERO: Self = Self(0);
    /// Distance of cells that cannot be reached.
    pub const INFINITE: Self = Self(u32::MAX);

    /// Finite distance, or `None` when unreachable.
    #[must_use]
    pub const fn get(self) -> Option<u32> {
        if self.0 == u32::MAX {
            None
        } else {
            Some(self.0)
        }
    }

    /// Reports whether the distance is finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.0 != u32::MAX
    }

    /// Distance after entering one more tile with the provided cost.
    #[must_use]
    pub const fn step(self, cost: MovementCost) -> Self {
        match cost.get() {
            Some(cost) => Self(self.0.saturating_add(cost)),
            None => Self::INFINITE,
        }
    }

    /// Reports whether the distance fits within a movement budget.
    #[must_use]
    pub const fn within(self, budget: u32) -> bool {
        self.is_finite() && self.0 <= budget
    }
}

/// Surface types a tile can be made of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Open ground.
    Plains,
    /// Wooded ground that slows every unit.
    Forest,
    /// High ground only climbing units can cross.
    Mountain,
}

impl TerrainKind {
    /// Cost a unit of the provided class pays to enter this terrain.
    #[must_use]
    pub const fn movement_cost(self, class: MovementClass) -> MovementCost {
        // No wildcard arms: a new class must state its rule for every terrain.
        match (self, class) {
            (Self::Plains, MovementClass::Foot) => MovementCost::finite(1),
            (Self::Plains, MovementClass::Climbing) => MovementCost::finite(1),
            (Self::Forest, MovementClass::Foot) => MovementCost::finite(2),
            (Self::Forest, MovementClass::Climbing) => MovementCost::finite(2),
            (Self::Mountain, MovementClass::Foot) => MovementCost::IMPASSABLE,
            (Self::Mountain, MovementClass::Climbing) => MovementCost::finite(3),
        }
    }

    /// Map file letter that encodes this terrain.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Plains => 'p',
            Self::Forest => 'f',
            Self::Mountain => 'm',
        }
    }

    /// Decodes a map file terrain letter.
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'p' => Some(Self::Plains),
            'f' => Some(Self::Forest),
            'm' => Some(Self::Mountain),
            _ => None,
        }
    }
}

/// Structures that can stand on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    /// Headquarters of a faction.
    CommandCenter,
    /// Field hospital.
    MedicalCenter,
}

impl BuildingKind {
    /// Map file letter that encodes this building.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::CommandCenter => 'c',
            Self::MedicalCenter => 'm',
        }
    }

    /// Decodes a map file building letter.
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'c' => Some(Self::CommandCenter),
            'm' => Some(Self::MedicalCenter),
            _ => None,
        }
    }
}

/// Kinds of units that can occupy a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Line infantry.
    Infantry,
    /// Marksman that favours high ground.
    Sniper,
}

impl UnitKind {
    /// Movement class shared by every unit of this kind.
    #[must_use]
    pub const fn movement_class(self) -> MovementClass {
        match self {
            Self::Infantry => MovementClass::Foot,
            Self::Sniper => MovementClass::Climbing,
        }
    }

    /// Movement budget granted to freshly created units of this kind.
    #[must_use]
    pub const fn default_movement_budget(self) -> u32 {
        match self {
            Self::Infantry => 3,
            Self::Sniper => 2,
        }
    }

    /// Map file letter that encodes this unit kind.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Infantry => 'i',
            Self::Sniper => 's',
        }
    }

    /// Decodes a map file unit letter.
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'i' => Some(Self::Infantry),
            's' => Some(Self::Sniper),
            _ => None,
        }
    }
}

/// Mobile unit standing on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    kind: UnitKind,
    movement_budget: u32,
}

impl Unit {
    /// Creates a unit with the default budget of its kind.
    #[must_use]
    pub const fn new(kind: UnitKind) -> Self {
        Self {
            kind,
            movement_budget: kind.default_movement_budget(),
        }
    }

    /// Returns the unit with its movement budget replaced.
    #[must_use]
    pub const fn with_movement_budget(self, movement_budget: u32) -> Self {
        Self {
            kind: self.kind,
            movement_budget,
        }
    }

    /// Kind of the unit.
    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Movement class used when pricing terrain.
    #[must_use]
    pub const fn movement_class(&self) -> MovementClass {
        self.kind.movement_class()
    }

    /// Maximum total cost the unit may spend leaving its tile.
    #[must_use]
    pub const fn movement_budget(&self) -> u32 {
        self.movement_budget
    }
}

/// Reasons a selection request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionError {
    /// The requested cell lies outside the grid.
    OutOfBounds,
}

/// Reasons a unit placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// Another unit already occupies the tile.
    Occupied,
}

/// Reasons a unit removal request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalError {
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// No unit occupies the tile.
    Vacant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_stays_inside_grid() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::North, 3, 3), None);
        assert_eq!(corner.step(Direction::West, 3, 3), None);
        assert_eq!(
            corner.step(Direction::East, 3, 3),
            Some(CellCoord::new(1, 0))
        );
        assert_eq!(
            corner.step(Direction::South, 3, 3),
            Some(CellCoord::new(0, 1))
        );

        let far = CellCoord::new(2, 2);
        assert_eq!(far.step(Direction::East, 3, 3), None);
        assert_eq!(far.step(Direction::South, 3, 3), None);
        assert_eq!(far.step(Direction::North, 3, 3), Some(CellCoord::new(2, 1)));
    }

    #[test]
    fn passable_costs_are_at_least_one() {
        let terrains = [
            TerrainKind::Plains,
            TerrainKind::Forest,
            TerrainKind::Mountain,
        ];
        let classes = [MovementClass::Foot, MovementClass::Climbing];

        for terrain in terrains {
            for class in classes {
                if let Some(cost) = terrain.movement_cost(class).get() {
                    assert!(cost >= 1, "{terrain:?} priced at zero for {class:?}");
                }
            }
        }
    }

    #[test]
    fn mountains_only_admit_climbers() {
        assert!(!TerrainKind::Mountain
            .movement_cost(MovementClass::Foot)
            .is_passable());
        assert_eq!(
            TerrainKind::Mountain
                .movement_cost(MovementClass::Climbing)
                .get(),
            Some(3)
        );
    }

    #[test]
    fn impassable_step_saturates_to_infinite() {
        let near = Distance::ZERO.step(MovementCost::finite(4));
        assert_eq!(near.get(), Some(4));
        assert_eq!(near.step(MovementCost::IMPASSABLE), Distance::INFINITE);
        assert_eq!(
            Distance::INFINITE.step(MovementCost::finite(1)),
            Distance::INFINITE
        );
        assert!(Distance(u32::MAX - 1)
            .step(MovementCost::finite(7))
            .get()
            .is_none());
    }

    #[test]
    fn infinite_distance_never_fits_a_budget() {
        assert!(!Distance::INFINITE.within(u32::MAX));
        assert!(Distance::ZERO.within(0));
        assert!(!Distance(3).within(2));
    }

    #[test]
    fn codes_decode_to_their_own_letter() {
        for terrain in [
            TerrainKind::Plains,
            TerrainKind::Forest,
            TerrainKind::Mountain,
        ] {
            assert_eq!(TerrainKind::from_code(terrain.code()), Some(terrain));
        }
        for building in [BuildingKind::CommandCenter, BuildingKind::MedicalCenter] {
            assert_eq!(BuildingKind::from_code(building.code()), Some(building));
        }
        for kind in [UnitKind::Infantry, UnitKind::Sniper] {
            assert_eq!(UnitKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(TerrainKind::from_code('n'), None);
        assert_eq!(UnitKind::from_code('n'), None);
    }

    #[test]
    fn unit_budget_override_keeps_kind() {
        let unit = Unit::new(UnitKind::Sniper).with_movement_budget(7);
        assert_eq!(unit.kind(), UnitKind::Sniper);
        assert_eq!(unit.movement_class(), MovementClass::Climbing);
        assert_eq!(unit.movement_budget(), 7);
        assert_eq!(Unit::new(UnitKind::Infantry).movement_budget(), 3);
    }

    #[test]
    fn unit_round_trips_through_bincode() {
        let unit = Unit::new(UnitKind::Infantry).with_movement_budget(5);
        let bytes = bincode::serialize(&unit).expect("serialize");
        let restored: Unit = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, unit);
    }
}
