use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use skirmish_rendering::{RenderingError, TileMetrics};
use skirmish_world::MapFormat;

/// Optional settings read from a TOML file.
///
/// ```toml
/// [view]
/// tile_width = 64
/// tile_height = 64
///
/// [map]
/// delimiter = ";"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CliConfig {
    pub(crate) view: ViewConfig,
    pub(crate) map: MapConfig,
}

impl CliConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse config TOML")?;
        Ok(config)
    }
}

/// Screen geometry used to translate pointer positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ViewConfig {
    tile_width: u32,
    tile_height: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            tile_width: TileMetrics::DEFAULT_TILE_SIZE,
            tile_height: TileMetrics::DEFAULT_TILE_SIZE,
        }
    }
}

impl ViewConfig {
    pub(crate) fn metrics(&self) -> Result<TileMetrics, RenderingError> {
        TileMetrics::new(self.tile_width, self.tile_height)
    }
}

/// Map decoding settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct MapConfig {
    pub(crate) delimiter: char,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            delimiter: MapFormat::default().delimiter(),
        }
    }
}
