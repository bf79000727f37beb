//! Event file loading.
//!
//! Two line-oriented formats are accepted:
//!
//! - **JSON lines**: one `{"id": "...", "timestamp": 1, "parents": [...]}`
//!   object per line. A file whose first non-blank character is `[` is read as
//!   a single JSON array of the same objects.
//! - **TSV**: `timestamp<TAB>id<TAB>parent,parent`. The parents column may be
//!   omitted or empty. Timestamps are integer milliseconds or RFC 3339.
//!   Blank lines and `#` comments are skipped.

use braid_core::{ErrorCode, Event};
use chrono::DateTime;
use clap::ValueEnum;
use std::path::{Path, PathBuf};

/// Event file syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Jsonl,
    Tsv,
}

impl InputFormat {
    /// Pick a format from the file extension: `.jsonl` and `.json` are JSON
    /// lines, everything else is TSV.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("jsonl" | "json") => Self::Jsonl,
            _ => Self::Tsv,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl InputError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                ErrorCode::InputNotFound
            }
            Self::Read { .. } | Self::Parse { .. } => ErrorCode::InputParseError,
        }
    }
}

/// Read and parse the event file at `path`.
pub fn load_events(
    path: &Path,
    format: Option<InputFormat>,
) -> Result<Vec<Event<String>>, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let format = format.unwrap_or_else(|| InputFormat::from_path(path));
    let events = parse_events(&content, format).map_err(|(line, message)| InputError::Parse {
        path: path.to_path_buf(),
        line,
        message,
    })?;
    tracing::debug!(path = %path.display(), ?format, events = events.len(), "loaded events");
    Ok(events)
}

/// Parse `content`. Errors carry the 1-based line number.
fn parse_events(content: &str, format: InputFormat) -> Result<Vec<Event<String>>, (usize, String)> {
    match format {
        InputFormat::Jsonl if content.trim_start().starts_with('[') => {
            serde_json::from_str(content).map_err(|err| (err.line(), err.to_string()))
        }
        InputFormat::Jsonl => parse_jsonl(content),
        InputFormat::Tsv => parse_tsv(content),
    }
}

fn parse_jsonl(content: &str) -> Result<Vec<Event<String>>, (usize, String)> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| serde_json::from_str(line).map_err(|err| (index + 1, err.to_string())))
        .collect()
}

fn parse_tsv(content: &str) -> Result<Vec<Event<String>>, (usize, String)> {
    let mut events = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let line_no = index + 1;
        let mut columns = trimmed.split('\t');
        let timestamp = columns
            .next()
            .map(parse_timestamp)
            .transpose()
            .map_err(|message| (line_no, message))?
            .ok_or_else(|| (line_no, "missing timestamp column".to_string()))?;
        let id = columns
            .next()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| (line_no, "missing id column".to_string()))?;
        let parents = columns
            .next()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|parent| !parent.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if columns.next().is_some() {
            return Err((line_no, "expected at most 3 tab-separated columns".to_string()));
        }
        events.push(Event::new(id.to_string(), timestamp, parents));
    }
    Ok(events)
}

/// Integer milliseconds, or an RFC 3339 date converted to milliseconds.
fn parse_timestamp(raw: &str) -> Result<i64, String> {
    let raw = raw.trim();
    if let Ok(millis) = raw.parse::<i64>() {
        return Ok(millis);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.timestamp_millis())
        .map_err(|_| format!("invalid timestamp {raw:?}: expected integer or RFC 3339"))
}

/// Stable sort by timestamp; ties keep file order.
pub fn sort_chronologically(events: &mut [Event<String>]) {
    events.sort_by_key(|event| event.timestamp);
}
