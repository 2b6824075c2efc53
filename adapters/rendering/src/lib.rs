#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Skirmish adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use skirmish_core::{BuildingKind, CellCoord, TerrainKind, UnitKind};
use std::{error::Error, fmt};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with the provided opacity.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Opacity shared by every tile highlight.
pub const HIGHLIGHT_ALPHA: f32 = 0.3;

/// Pixel dimensions of a single tile on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileMetrics {
    tile_width: u32,
    tile_height: u32,
}

impl Default for TileMetrics {
    fn default() -> Self {
        Self {
            tile_width: Self::DEFAULT_TILE_SIZE,
            tile_height: Self::DEFAULT_TILE_SIZE,
        }
    }
}

impl TileMetrics {
    /// Default side length of a tile in pixels.
    pub const DEFAULT_TILE_SIZE: u32 = 100;

    /// Creates tile metrics, rejecting zero-sized tiles.
    pub fn new(tile_width: u32, tile_height: u32) -> Result<Self, RenderingError> {
        if tile_width == 0 || tile_height == 0 {
            return Err(RenderingError::InvalidTileSize {
                tile_width,
                tile_height,
            });
        }

        Ok(Self {
            tile_width,
            tile_height,
        })
    }

    /// Width of a tile in pixels.
    #[must_use]
    pub const fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Height of a tile in pixels.
    #[must_use]
    pub const fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Cell under the provided pixel position.
    ///
    /// Returns `None` for negative or non-finite positions. The result is not
    /// bounded by any grid; see [`TileMetrics::cell_within`].
    #[must_use]
    pub fn cell_at(&self, position: Vec2) -> Option<CellCoord> {
        if !position.is_finite() || position.x < 0.0 || position.y < 0.0 {
            return None;
        }

        let column = pixel_to_index(position.x, self.tile_width)?;
        let row = pixel_to_index(position.y, self.tile_height)?;
        Some(CellCoord::new(column, row))
    }

    /// Cell under the provided pixel position when it lies on a board of
    /// `columns` by `rows` tiles.
    #[must_use]
    pub fn cell_within(&self, position: Vec2, columns: u32, rows: u32) -> Option<CellCoord> {
        self.cell_at(position)
            .filter(|cell| cell.column() < columns && cell.row() < rows)
    }

    /// Top-left pixel of the tile drawn for the provided cell.
    #[must_use]
    pub fn tile_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.tile_width as f32,
            cell.row() as f32 * self.tile_height as f32,
        )
    }

    /// Pixel size of a board of `columns` by `rows` tiles.
    #[must_use]
    pub fn board_size(&self, columns: u32, rows: u32) -> Vec2 {
        Vec2::new(
            columns as f32 * self.tile_width as f32,
            rows as f32 * self.tile_height as f32,
        )
    }
}

fn pixel_to_index(pixels: f32, tile_size: u32) -> Option<u32> {
    let index = (pixels / tile_size as f32).floor();
    (index <= u32::MAX as f32).then_some(index as u32)
}

/// Reasons a tile is painted over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    /// Tile holding the current selection.
    Selected,
    /// Tile the selected unit can move to.
    Reachable,
    /// Tile under the hover cursor.
    Hovered,
}

impl HighlightKind {
    /// Translucent overlay color for the highlight.
    #[must_use]
    pub const fn color(self) -> Color {
        let base = match self {
            Self::Selected => Color::from_rgb_u8(0, 0, 255),
            Self::Reachable => Color::from_rgb_u8(255, 0, 0),
            Self::Hovered => Color::from_rgb_u8(0, 255, 0),
        };
        base.with_alpha(HIGHLIGHT_ALPHA)
    }
}

/// Overlay painted on a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileHighlight {
    /// Tile that receives the overlay.
    pub cell: CellCoord,
    /// Reason for the overlay.
    pub kind: HighlightKind,
}

impl TileHighlight {
    /// Creates a new tile highlight descriptor.
    #[must_use]
    pub const fn new(cell: CellCoord, kind: HighlightKind) -> Self {
        Self { cell, kind }
    }
}

/// Orders a frame's overlays for painting.
///
/// The selected tile comes first, then every reachable tile, then the hovered
/// tile unless it is the selected one. Later entries paint over earlier ones.
#[must_use]
pub fn compose_highlights<I>(
    selection: Option<CellCoord>,
    hovered: Option<CellCoord>,
    reachable: I,
) -> Vec<TileHighlight>
where
    I: IntoIterator<Item = CellCoord>,
{
    let mut highlights: Vec<TileHighlight> = selection
        .map(|cell| TileHighlight::new(cell, HighlightKind::Selected))
        .into_iter()
        .collect();

    highlights.extend(
        reachable
            .into_iter()
            .map(|cell| TileHighlight::new(cell, HighlightKind::Reachable)),
    );

    if let Some(cell) = hovered.filter(|cell| Some(*cell) != selection) {
        highlights.push(TileHighlight::new(cell, HighlightKind::Hovered));
    }

    highlights
}

/// Immutable snapshot of a single board tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneTile {
    /// Location of the tile.
    pub cell: CellCoord,
    /// Surface drawn as the tile background.
    pub terrain: TerrainKind,
    /// Structure drawn on the tile, if any.
    pub building: Option<BuildingKind>,
    /// Kind of the unit standing on the tile, if any.
    pub occupant: Option<UnitKind>,
}

/// Scene description combining the board and its overlays.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of columns on the board.
    pub columns: u32,
    /// Number of rows on the board.
    pub rows: u32,
    /// Tiles in row-major order.
    pub tiles: Vec<SceneTile>,
    /// Overlays in paint order.
    pub highlights: Vec<TileHighlight>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        columns: u32,
        rows: u32,
        tiles: Vec<SceneTile>,
        highlights: Vec<TileHighlight>,
    ) -> Self {
        Self {
            columns,
            rows,
            tiles,
            highlights,
        }
    }

    /// Topmost overlay painted on the cell, if any.
    #[must_use]
    pub fn top_highlight(&self, cell: CellCoord) -> Option<HighlightKind> {
        self.highlights
            .iter()
            .rev()
            .find(|highlight| highlight.cell == cell)
            .map(|highlight| highlight.kind)
    }

    /// Iterates the tiles of each row, top to bottom.
    pub fn tile_rows(&self) -> impl Iterator<Item = &[SceneTile]> + '_ {
        let width = usize::try_from(self.columns).unwrap_or(usize::MAX).max(1);
        self.tiles.chunks(width)
    }
}

/// Rendering backend capable of presenting Skirmish scenes.
pub trait RenderingBackend {
    /// Presents a single frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Tiles must span at least one pixel along each axis.
    InvalidTileSize {
        /// Provided tile width.
        tile_width: u32,
        /// Provided tile height.
        tile_height: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileSize {
                tile_width,
                tile_height,
            } => {
                write!(
                    f,
                    "tile size must be positive (received {tile_width}x{tile_height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
