//! Shared output layer for pretty/text/JSON parity across CLI commands.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format`
//! 2. hidden `--json` flag
//! 3. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 4. `output` key in the config files
//! 5. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use braid_core::{ErrorCode, LayoutError};
use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

use crate::input::InputError;

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, visual framing).
    Pretty,
    /// Plain tab-separated text for scripts and pipes.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Core resolution logic, separated from I/O for testability.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    config_output: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if json_flag {
        return OutputMode::Json;
    }

    // Unknown values fall through to the next layer.
    if let Some(mode) = format_env.and_then(OutputMode::parse) {
        return mode;
    }
    if let Some(mode) = config_output.and_then(OutputMode::parse) {
        return mode;
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, config and TTY
/// defaults.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    config_output: Option<&str>,
) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(
        format_flag,
        json_flag,
        env_val.as_deref(),
        config_output,
        is_tty,
    )
}

/// Render a serializable value with explicit pretty/text renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, &mut out)?,
        OutputMode::Pretty => pretty_fn(value, &mut out)?,
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// A structured error with a stable code and optional hint.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Machine-readable code, e.g. `"E3003"`.
    pub code: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl CliError {
    fn with_code(code: ErrorCode, message: String) -> Self {
        Self {
            code: code.code(),
            message,
            hint: code.hint(),
        }
    }
}

/// Classify an error chain by the first cause that carries a known code.
impl From<&anyhow::Error> for CliError {
    fn from(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");
        for cause in err.chain() {
            if let Some(layout) = cause.downcast_ref::<LayoutError>() {
                return Self::with_code(layout.code(), message);
            }
            if let Some(input) = cause.downcast_ref::<InputError>() {
                return Self::with_code(input.code(), message);
            }
            if cause.downcast_ref::<toml::de::Error>().is_some() {
                return Self::with_code(ErrorCode::ConfigParseError, message);
            }
        }
        Self::with_code(ErrorCode::InternalUnexpected, message)
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_error(&mut out, mode, error)
}

fn write_error(out: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            writeln!(out, "error[{}]: {}", error.code, error.message)?;
            if let Some(hint) = error.hint {
                writeln!(out, "  hint: {hint}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    // ── resolve_output_mode_inner ───────────────────────────────────────────

    #[test]
    fn format_flag_wins_over_everything() {
        let mode = resolve_output_mode_inner(
            Some(OutputMode::Text),
            true,
            Some("pretty"),
            Some("json"),
            true,
        );
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn json_flag_beats_env() {
        let mode = resolve_output_mode_inner(None, true, Some("text"), None, true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn env_beats_config() {
        let mode = resolve_output_mode_inner(None, false, Some("TEXT"), Some("json"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn config_used_when_env_unknown() {
        let mode = resolve_output_mode_inner(None, false, Some("fancy"), Some("json"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn tty_defaults() {
        assert_eq!(
            resolve_output_mode_inner(None, false, None, None, true),
            OutputMode::Pretty
        );
        assert_eq!(
            resolve_output_mode_inner(None, false, None, None, false),
            OutputMode::Text
        );
    }

    // ── CliError classification ─────────────────────────────────────────────

    #[test]
    fn layout_error_keeps_its_code() {
        let err = anyhow::Error::new(LayoutError::DuplicateId {
            id: "\"a\"".to_string(),
            row: 1,
            first_row: 0,
        })
        .context("layout failed");
        let cli = CliError::from(&err);
        assert_eq!(cli.code, "E3001");
        assert!(cli.message.starts_with("layout failed: duplicate event id"));
        assert!(cli.hint.is_some());
    }

    #[test]
    fn input_error_maps_to_input_code() {
        let err = anyhow::Error::new(InputError::Parse {
            path: PathBuf::from("events.tsv"),
            line: 3,
            message: "missing id column".to_string(),
        });
        assert_eq!(CliError::from(&err).code, "E2002");
    }

    #[test]
    fn toml_error_maps_to_config_code() {
        let parse_err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let err = anyhow::Error::new(parse_err).context("Failed to parse config.toml");
        assert_eq!(CliError::from(&err).code, "E1002");
    }

    #[test]
    fn unknown_error_is_internal() {
        let err: anyhow::Error = Err::<(), _>(io::Error::other("boom"))
            .context("while doing a thing")
            .unwrap_err();
        assert_eq!(CliError::from(&err).code, "E9001");
    }

    #[test]
    fn json_error_shape() {
        let error = CliError::with_code(ErrorCode::UnresolvedParent, "bad parent".to_string());
        let mut buf = Vec::new();
        write_error(&mut buf, OutputMode::Json, &error).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["error"]["code"], "E3003");
        assert_eq!(value["error"]["message"], "bad parent");
        assert!(value["error"]["hint"].is_string());
    }

    #[test]
    fn text_error_shape() {
        let error = CliError::with_code(ErrorCode::InternalUnexpected, "boom".to_string());
        let mut buf = Vec::new();
        write_error(&mut buf, OutputMode::Text, &error).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("error[E9001]: boom"));
    }
}
