//! Runtime configuration.
//!
//! Loaded from an optional TOML file; every field has a default, so an empty
//! file (or none at all) yields [`Config::default`]. Command-line flags are
//! applied on top by the binary, then [`Config::validate`] runs once.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::core::{SevenBag, ShapeSource, SimpleRng};
use crate::term::{Palette, ViewConfig, DEFAULT_BELL_THRESHOLD};
use crate::types::{Rgb, FRAME_RATE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub game: GameConfig,
    pub render: RenderConfig,
    pub audio: AudioConfig,
    pub log: LogConfig,
}

/// How new shapes are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Randomizer {
    /// Each shape independently and uniformly at random
    #[default]
    Uniform,
    /// Shuffled bags containing all seven shapes
    Bag,
}

impl Randomizer {
    pub fn source(self, seed: u32) -> Box<dyn ShapeSource> {
        match self {
            Randomizer::Uniform => Box::new(SimpleRng::new(seed)),
            Randomizer::Bag => Box::new(SevenBag::new(seed)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub randomizer: Randomizer,
    /// Fixed seed; the clock is used when absent
    pub seed: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub cell_width: u16,
    pub cell_height: u16,
    pub show_ghost: bool,
    pub show_controls: bool,
    pub frame_rate: u32,
    pub palette: PaletteConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_width: 2,
            cell_height: 1,
            show_ghost: true,
            show_controls: true,
            frame_rate: FRAME_RATE,
            palette: PaletteConfig::default(),
        }
    }
}

/// Chrome colors as `[r, g, b]` triples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaletteConfig {
    pub background: [u8; 3],
    pub border: [u8; 3],
    pub text: [u8; 3],
    pub accent: [u8; 3],
}

impl Default for PaletteConfig {
    fn default() -> Self {
        let palette = Palette::default();
        let rgb = |c: Rgb| [c.r, c.g, c.b];
        Self {
            background: rgb(palette.background),
            border: rgb(palette.border),
            text: rgb(palette.text),
            accent: rgb(palette.accent),
        }
    }
}

impl From<PaletteConfig> for Palette {
    fn from(value: PaletteConfig) -> Self {
        Self {
            background: value.background.into(),
            border: value.border.into(),
            text: value.text.into(),
            accent: value.accent.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Minimum cue volume that rings the terminal bell
    pub bell_threshold: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell_threshold: DEFAULT_BELL_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub file: PathBuf,
    /// `tracing` filter directive; `RUST_LOG` takes precedence
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: std::env::temp_dir().join("blockfall.log"),
            filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Read and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parse and validate TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let render = &self.render;
        check_range("render.cell_width", render.cell_width, 1..=4)?;
        check_range("render.cell_height", render.cell_height, 1..=2)?;
        check_range("render.frame_rate", render.frame_rate, 1..=240)?;

        let threshold = self.audio.bell_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid {
                field: "audio.bell_threshold",
                reason: format!("{threshold} is outside 0.0..=1.0"),
            });
        }

        if self.log.filter.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "log.filter",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn view_config(&self) -> ViewConfig {
        ViewConfig {
            cell_w: self.render.cell_width,
            cell_h: self.render.cell_height,
            show_ghost: self.render.show_ghost,
            show_controls: self.render.show_controls,
            palette: self.render.palette.into(),
        }
    }

    /// Target duration of one frame
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.render.frame_rate.max(1)
    }
}

fn check_range<T>(
    field: &'static str,
    value: T,
    range: std::ops::RangeInclusive<T>,
) -> Result<(), ConfigError>
where
    T: PartialOrd + std::fmt::Display,
{
    if range.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::Invalid {
        field,
        reason: format!("{value} is outside {}..={}", range.start(), range.end()),
    })
}
