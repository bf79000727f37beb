//! Layered configuration.
//!
//! Files are read in order, later layers overriding earlier ones key by key:
//!
//! 1. built-in defaults
//! 2. user config: `<config_dir>/braid/config.toml`
//! 3. project config: `.braid/config.toml` in the working directory
//!
//! Command-line flags are applied on top by the command handlers.
//!
//! ```toml
//! output = "text"
//!
//! [layout]
//! strict = true
//!
//! [render]
//! lane_width = 2
//! row_height = 24
//!
//! [render.glyphs]
//! node = "o"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BraidConfig {
    pub output: Option<String>,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Reject malformed input instead of laying it out leniently.
    pub strict: bool,
}

/// Presentation settings for `braid render`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Character columns per lane.
    pub lane_width: usize,
    /// Height of one row in the caller's units, used for the extent report.
    pub row_height: usize,
    pub glyphs: Glyphs,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            lane_width: default_lane_width(),
            row_height: default_row_height(),
            glyphs: Glyphs::default(),
        }
    }
}

impl RenderConfig {
    /// Graph extent for `lane_count` lanes and `rows` rows as `(width, height)`.
    pub const fn extent(&self, lane_count: usize, rows: usize) -> (usize, usize) {
        (
            lane_count.saturating_mul(self.lane_width),
            rows.saturating_mul(self.row_height),
        )
    }
}

/// Characters drawn for each cell shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub node: char,
    pub straight: char,
    pub curve_left: char,
    pub curve_right: char,
    pub multi_merge: char,
    /// A merge curve on a lane whose line continues below the merge.
    pub merge_through: char,
    pub empty: char,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            node: '*',
            straight: '|',
            curve_left: '/',
            curve_right: '\\',
            multi_merge: '+',
            merge_through: '+',
            empty: ' ',
        }
    }
}

// ---------------------------------------------------------------------------
// File layers
// ---------------------------------------------------------------------------

/// One config file. Every key is optional so a layer only overrides what it
/// sets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigLayer {
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    layout: LayoutLayer,
    #[serde(default)]
    render: RenderLayer,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutLayer {
    strict: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RenderLayer {
    lane_width: Option<usize>,
    row_height: Option<usize>,
    #[serde(default)]
    glyphs: GlyphsLayer,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GlyphsLayer {
    node: Option<char>,
    straight: Option<char>,
    curve_left: Option<char>,
    curve_right: Option<char>,
    multi_merge: Option<char>,
    merge_through: Option<char>,
    empty: Option<char>,
}

impl BraidConfig {
    fn apply(&mut self, layer: ConfigLayer) {
        if layer.output.is_some() {
            self.output = layer.output;
        }
        if let Some(strict) = layer.layout.strict {
            self.layout.strict = strict;
        }

        let render = layer.render;
        if let Some(width) = render.lane_width {
            self.render.lane_width = width.max(1);
        }
        if let Some(height) = render.row_height {
            self.render.row_height = height;
        }

        let glyphs = &mut self.render.glyphs;
        let layer = render.glyphs;
        for (slot, value) in [
            (&mut glyphs.node, layer.node),
            (&mut glyphs.straight, layer.straight),
            (&mut glyphs.curve_left, layer.curve_left),
            (&mut glyphs.curve_right, layer.curve_right),
            (&mut glyphs.multi_merge, layer.multi_merge),
            (&mut glyphs.merge_through, layer.merge_through),
            (&mut glyphs.empty, layer.empty),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

fn read_layer(path: &Path) -> Result<Option<ConfigLayer>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let layer = toml::from_str::<ConfigLayer>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(layer))
}

/// Path of the user config file, if the platform has a config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("braid/config.toml"))
}

/// Path of the project config file under `project_root`.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".braid/config.toml")
}

/// Resolve defaults, then the user file, then the project file.
pub fn load_config(project_root: &Path) -> Result<BraidConfig> {
    load_layers(
        user_config_path().as_deref(),
        &project_config_path(project_root),
    )
}

fn load_layers(user: Option<&Path>, project: &Path) -> Result<BraidConfig> {
    let mut config = BraidConfig::default();
    for path in user.into_iter().chain(std::iter::once(project)) {
        if let Some(layer) = read_layer(path)? {
            tracing::debug!(path = %path.display(), "applied config layer");
            config.apply(layer);
        }
    }
    Ok(config)
}

const fn default_lane_width() -> usize {
    2
}

const fn default_row_height() -> usize {
    24
}
