//! `braid render`: draw the lane graph as text, one row per event.

use crate::cmd::{SourceArgs, load_layout};
use crate::config::{BraidConfig, Glyphs, RenderConfig};
use crate::output::{OutputMode, pretty_kv, pretty_rule, render_mode};
use braid_core::{Cell, Connector, Event, Lane, LayoutResult, RowActivity};
use clap::Args;
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Character columns per lane (overrides `render.lane_width`).
    #[arg(long)]
    pub lane_width: Option<usize>,

    /// Row height used for the extent report (overrides `render.row_height`).
    #[arg(long)]
    pub row_height: Option<usize>,
}

/// Rendered graph as returned in JSON output.
#[derive(Debug, Serialize)]
pub struct RenderReport {
    pub lane_count: usize,
    pub width: usize,
    pub height: usize,
    pub rows: Vec<RenderRow>,
}

#[derive(Debug, Serialize)]
pub struct RenderRow {
    pub row: usize,
    pub id: String,
    pub lane: Lane,
    pub graph: String,
    pub cells: Vec<Cell>,
}

/// Glyph for one cell. Node cells always show the node glyph.
const fn glyph(cell: &Cell, glyphs: &Glyphs) -> char {
    if cell.is_node {
        return glyphs.node;
    }
    match (cell.connector, cell.pass_through) {
        (Some(Connector::CurveLeft | Connector::CurveRight), true) => glyphs.merge_through,
        (Some(Connector::Straight), _) => glyphs.straight,
        (Some(Connector::CurveLeft), false) => glyphs.curve_left,
        (Some(Connector::CurveRight), false) => glyphs.curve_right,
        (Some(Connector::MultiMerge), _) => glyphs.multi_merge,
        (None, _) => glyphs.empty,
    }
}

fn draw_row(cells: &[Cell], render: &RenderConfig) -> String {
    let mut graph = String::with_capacity(cells.len() * render.lane_width);
    for cell in cells {
        graph.push(glyph(cell, &render.glyphs));
        for _ in 1..render.lane_width {
            graph.push(render.glyphs.empty);
        }
    }
    graph
}

pub fn build_report(
    events: &[Event<String>],
    layout: &LayoutResult<String>,
    render: &RenderConfig,
) -> RenderReport {
    let activity = RowActivity::new(events, layout);
    let rows = events
        .iter()
        .enumerate()
        .map(|(row, event)| {
            let cells = activity.row_cells(row);
            RenderRow {
                row,
                id: event.id.clone(),
                lane: activity.lane_at(row).unwrap_or(0),
                graph: draw_row(&cells, render),
                cells,
            }
        })
        .collect();

    let (width, height) = render.extent(activity.lane_count(), events.len());
    RenderReport {
        lane_count: activity.lane_count(),
        width,
        height,
        rows,
    }
}

fn write_text(report: &RenderReport, w: &mut dyn Write) -> std::io::Result<()> {
    for row in &report.rows {
        writeln!(w, "{} {}", row.graph, row.id)?;
    }
    writeln!(w, "extent\t{}\t{}", report.width, report.height)
}

fn write_pretty(report: &RenderReport, w: &mut dyn Write) -> std::io::Result<()> {
    for row in &report.rows {
        writeln!(w, "{} {}", row.graph, row.id)?;
    }
    pretty_rule(w)?;
    pretty_kv(w, "Lanes", report.lane_count.to_string())?;
    pretty_kv(w, "Rows", report.rows.len().to_string())?;
    pretty_kv(w, "Extent", format!("{} x {}", report.width, report.height))
}

pub fn run_render(args: &RenderArgs, config: &BraidConfig, output: OutputMode) -> anyhow::Result<()> {
    let mut render = config.render.clone();
    if let Some(width) = args.lane_width {
        render.lane_width = width.max(1);
    }
    if let Some(height) = args.row_height {
        render.row_height = height;
    }

    let (events, layout) = load_layout(&args.source, config)?;
    let report = build_report(&events, &layout, &render);
    render_mode(output, &report, write_text, write_pretty)
}
