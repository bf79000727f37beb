//! `braid analyze`: print lane assignments and branch points.

use crate::cmd::{SourceArgs, load_layout};
use crate::config::BraidConfig;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use braid_core::cache::Fingerprint;
use braid_core::{BranchKind, BranchPoint, Event, Lane, LayoutResult, RowActivity};
use clap::Args;
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Layout summary as returned in JSON output.
#[derive(Debug, Serialize)]
pub struct AnalyzeReport {
    /// Content fingerprint of the input, usable as a memo key.
    pub fingerprint: String,
    pub lane_count: usize,
    pub creates: usize,
    pub merges: usize,
    pub rows: Vec<RowReport>,
    pub branch_points: Vec<BranchPoint<String>>,
}

/// One event in the `analyze` output.
#[derive(Debug, Serialize)]
pub struct RowReport {
    pub row: usize,
    pub id: String,
    pub timestamp: i64,
    pub lane: Lane,
    /// Row where the event's line stops.
    pub reach: usize,
}

pub fn build_report(events: &[Event<String>], layout: &LayoutResult<String>) -> AnalyzeReport {
    let activity = RowActivity::new(events, layout);
    let rows = events
        .iter()
        .enumerate()
        .map(|(row, event)| RowReport {
            row,
            id: event.id.clone(),
            timestamp: event.timestamp,
            lane: activity.lane_at(row).unwrap_or(0),
            reach: activity
                .terminus(row)
                .and_then(|terminus| terminus.row())
                .unwrap_or(row),
        })
        .collect();

    AnalyzeReport {
        fingerprint: Fingerprint::of(events).to_hex(),
        lane_count: layout.lane_count,
        creates: layout.count_of(BranchKind::Create),
        merges: layout.count_of(BranchKind::Merge),
        rows,
        branch_points: layout.branch_points.clone(),
    }
}

const fn kind_label(kind: BranchKind) -> &'static str {
    match kind {
        BranchKind::Create => "create",
        BranchKind::Merge => "merge",
    }
}

fn write_text(report: &AnalyzeReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "lanes {}  events {}  creates {}  merges {}",
        report.lane_count,
        report.rows.len(),
        report.creates,
        report.merges
    )?;
    for row in &report.rows {
        writeln!(w, "{}\t{}\t{}\t{}", row.row, row.lane, row.reach, row.id)?;
    }
    for point in &report.branch_points {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            kind_label(point.kind),
            point.item_id,
            point.from_lane,
            point.to_lane
        )?;
    }
    Ok(())
}

fn write_pretty(report: &AnalyzeReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Layout")?;
    pretty_kv(w, "Lanes", report.lane_count.to_string())?;
    pretty_kv(w, "Events", report.rows.len().to_string())?;
    pretty_kv(w, "Creates", report.creates.to_string())?;
    pretty_kv(w, "Merges", report.merges.to_string())?;
    pretty_kv(w, "Fingerprint", &report.fingerprint)?;

    writeln!(w)?;
    pretty_section(w, "Rows")?;
    writeln!(w, "{:>5}  {:>4}  {:>5}  ID", "ROW", "LANE", "REACH")?;
    for row in &report.rows {
        writeln!(w, "{:>5}  {:>4}  {:>5}  {}", row.row, row.lane, row.reach, row.id)?;
    }

    if !report.branch_points.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Branch points")?;
        for point in &report.branch_points {
            writeln!(
                w,
                "{:<7} {:>3} -> {:<3} {}",
                kind_label(point.kind),
                point.from_lane,
                point.to_lane,
                point.item_id
            )?;
        }
    }
    Ok(())
}

pub fn run_analyze(args: &AnalyzeArgs, config: &BraidConfig, output: OutputMode) -> anyhow::Result<()> {
    let (events, layout) = load_layout(&args.source, config)?;
    let report = build_report(&events, &layout);
    render_mode(output, &report, write_text, write_pretty)
}
