//! Terminal backends that print a composed scene.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use skirmish_core::CellCoord;
use skirmish_rendering::{
    HighlightKind, RenderingBackend, Scene, SceneTile, TileHighlight, TileMetrics,
};

/// Prints the board as text, three characters per tile.
///
/// The middle character is the terrain letter, or the upper-case unit letter
/// when a unit stands on the tile. The brackets around it show the topmost
/// highlight: `*p*` reachable, `[p]` selected, `<p>` hovered.
#[derive(Debug)]
pub(crate) struct TextBoard<W> {
    out: W,
}

impl<W: Write> TextBoard<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RenderingBackend for TextBoard<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        for row in scene.tile_rows() {
            let line: String = row
                .iter()
                .map(|tile| glyph(tile, scene.top_highlight(tile.cell)))
                .collect();
            writeln!(self.out, "{line}").context("failed to write board")?;
        }
        self.out.flush().context("failed to flush board")
    }
}

fn glyph(tile: &SceneTile, highlight: Option<HighlightKind>) -> String {
    let symbol = match tile.occupant {
        Some(unit) => unit.code().to_ascii_uppercase(),
        None => tile.terrain.code(),
    };
    let (open, close) = match highlight {
        None => (' ', ' '),
        Some(HighlightKind::Reachable) => ('*', '*'),
        Some(HighlightKind::Selected) => ('[', ']'),
        Some(HighlightKind::Hovered) => ('<', '>'),
    };
    format!("{open}{symbol}{close}")
}

/// Prints a JSON summary of the scene, including the pixel geometry and
/// colours a graphical frontend would paint.
#[derive(Debug)]
pub(crate) struct JsonReport<W> {
    out: W,
    metrics: TileMetrics,
}

impl<W: Write> JsonReport<W> {
    pub(crate) fn new(out: W, metrics: TileMetrics) -> Self {
        Self { out, metrics }
    }
}

#[derive(Debug, PartialEq, Serialize)]
struct Report {
    columns: u32,
    rows: u32,
    board_size: [f32; 2],
    cursor: Option<CellCoord>,
    selection: Option<CellCoord>,
    reachable: Vec<CellCoord>,
    overlays: Vec<Overlay>,
}

/// One highlight in paint order.
#[derive(Debug, PartialEq, Serialize)]
struct Overlay {
    cell: CellCoord,
    kind: &'static str,
    origin: [f32; 2],
    rgba: [f32; 4],
}

impl Overlay {
    fn new(highlight: &TileHighlight, metrics: &TileMetrics) -> Self {
        let kind = match highlight.kind {
            HighlightKind::Selected => "selected",
            HighlightKind::Reachable => "reachable",
            HighlightKind::Hovered => "hovered",
        };
        let color = highlight.kind.color();
        Self {
            cell: highlight.cell,
            kind,
            origin: metrics.tile_origin(highlight.cell).to_array(),
            rgba: [color.red, color.green, color.blue, color.alpha],
        }
    }
}

impl Report {
    fn from_scene(scene: &Scene, metrics: &TileMetrics) -> Self {
        let layer = |kind: HighlightKind| {
            scene
                .highlights
                .iter()
                .filter(move |highlight| highlight.kind == kind)
                .map(|highlight| highlight.cell)
        };

        let selection = layer(HighlightKind::Selected).next();
        // The hover layer is omitted when the cursor rests on the selection.
        let cursor = layer(HighlightKind::Hovered).next().or(selection);

        Self {
            columns: scene.columns,
            rows: scene.rows,
            board_size: metrics.board_size(scene.columns, scene.rows).to_array(),
            cursor,
            selection,
            reachable: layer(HighlightKind::Reachable).collect(),
            overlays: scene
                .highlights
                .iter()
                .map(|highlight| Overlay::new(highlight, metrics))
                .collect(),
        }
    }
}

impl<W: Write> RenderingBackend for JsonReport<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        let report = Report::from_scene(scene, &self.metrics);
        serde_json::to_writer_pretty(&mut self.out, &report)
            .context("failed to serialize report")?;
        writeln!(self.out).context("failed to write report")?;
        self.out.flush().context("failed to flush report")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::{TerrainKind, UnitKind};
    use skirmish_rendering::{compose_highlights, HIGHLIGHT_ALPHA};

    fn scene(highlights: Vec<TileHighlight>) -> Scene {
        let tile = |column, terrain, occupant| SceneTile {
            cell: CellCoord::new(column, 0),
            terrain,
            building: None,
            occupant,
        };
        Scene::new(
            3,
            1,
            vec![
                tile(0, TerrainKind::Plains, Some(UnitKind::Infantry)),
                tile(1, TerrainKind::Forest, None),
                tile(2, TerrainKind::Mountain, None),
            ],
            highlights,
        )
    }

    #[test]
    fn text_board_wraps_tiles_by_topmost_highlight() {
        let selected = CellCoord::new(0, 0);
        let highlights = compose_highlights(
            Some(selected),
            Some(CellCoord::new(2, 0)),
            [CellCoord::new(1, 0)],
        );
        let mut out = Vec::new();

        TextBoard::new(&mut out)
            .present(&scene(highlights))
            .expect("in-memory write");

        assert_eq!(String::from_utf8(out).expect("utf-8"), "[I]*f*<m>\n");
    }

    #[test]
    fn text_board_without_highlights_is_plain() {
        let mut out = Vec::new();
        TextBoard::new(&mut out)
            .present(&scene(Vec::new()))
            .expect("in-memory write");

        assert_eq!(String::from_utf8(out).expect("utf-8"), " I  f  m \n");
    }

    #[test]
    fn report_recovers_cursor_hidden_by_selection() {
        let cell = CellCoord::new(0, 0);
        let report = Report::from_scene(
            &scene(compose_highlights(
                Some(cell),
                Some(cell),
                [CellCoord::new(1, 0)],
            )),
            &TileMetrics::default(),
        );

        assert_eq!(
            report,
            Report {
                columns: 3,
                rows: 1,
                board_size: [300.0, 100.0],
                cursor: Some(cell),
                selection: Some(cell),
                reachable: vec![CellCoord::new(1, 0)],
                overlays: vec![
                    Overlay {
                        cell,
                        kind: "selected",
                        origin: [0.0, 0.0],
                        rgba: [0.0, 0.0, 1.0, HIGHLIGHT_ALPHA],
                    },
                    Overlay {
                        cell: CellCoord::new(1, 0),
                        kind: "reachable",
                        origin: [100.0, 0.0],
                        rgba: [1.0, 0.0, 0.0, HIGHLIGHT_ALPHA],
                    },
                ],
            }
        );
    }

    #[test]
    fn json_report_lists_reachable_cells() {
        let highlights = compose_highlights(None, Some(CellCoord::new(2, 0)), std::iter::empty());
        let mut out = Vec::new();

        JsonReport::new(&mut out, TileMetrics::new(20, 10).expect("non-zero tiles"))
            .present(&scene(highlights))
            .expect("in-memory write");

        let value: serde_json::Value = serde_json::from_slice(&out).expect("valid json");
        assert_eq!(value["columns"], 3);
        assert_eq!(value["board_size"], serde_json::json!([60.0, 10.0]));
        assert_eq!(value["cursor"]["column"], 2);
        assert!(value["selection"].is_null());
        assert_eq!(value["reachable"], serde_json::json!([]));
        assert_eq!(value["overlays"][0]["kind"], "hovered");
        assert_eq!(value["overlays"][0]["origin"], serde_json::json!([40.0, 0.0]));
        assert_eq!(value["overlays"][0]["rgba"][1], 1.0);
    }
}
