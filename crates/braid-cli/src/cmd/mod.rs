pub mod analyze;
pub mod render;

use anyhow::{Context, Result};
use braid_core::{Event, LayoutResult, analyze, analyze_checked};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::config::BraidConfig;
use crate::input::{self, InputFormat};

/// Input options shared by every command that lays out an event file.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Event file (JSON lines or tab-separated).
    pub file: PathBuf,

    /// Input syntax; inferred from the file extension when omitted.
    #[arg(long, value_enum)]
    pub input_format: Option<InputFormat>,

    /// Stable-sort events by timestamp before laying them out.
    #[arg(long)]
    pub sort: bool,

    /// Reject duplicate ids, out-of-order timestamps and unresolved parents.
    #[arg(long)]
    pub strict: bool,
}

/// Load the events named by `source` and lay them out.
pub fn load_layout(
    source: &SourceArgs,
    config: &BraidConfig,
) -> Result<(Vec<Event<String>>, LayoutResult<String>)> {
    let mut events = input::load_events(&source.file, source.input_format)?;
    if source.sort {
        input::sort_chronologically(&mut events);
    }

    let strict = source.strict || config.layout.strict;
    let layout = if strict {
        analyze_checked(&events)
            .with_context(|| format!("{} failed validation", source.file.display()))?
    } else {
        analyze(&events)
    };

    info!(
        events = events.len(),
        lanes = layout.lane_count,
        strict,
        "layout complete"
    );
    Ok((events, layout))
}
