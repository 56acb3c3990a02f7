//! Run settings
//!
//! Built from CLI flags, optionally layered over a JSON settings file.
//! Out-of-range values are clamped, never rejected.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::DEFAULT_MAX_SCENERY_ALPHA;
use crate::sim::Rules;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// No window, no drawing; the loop still runs in real time
    pub headless: bool,
    /// Stop after this many seconds
    pub duration: Option<f32>,
    /// Armed enemies shoot back
    pub enemy_bullets: bool,
    /// Include nebulae in the background mix
    pub enable_nebulae: bool,
    /// Opacity cap for scenery (0-255)
    #[serde(deserialize_with = "deserialize_alpha")]
    pub max_scenery_alpha: u8,
    /// Fixed RNG seed; random when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            headless: false,
            duration: None,
            enemy_bullets: true,
            enable_nebulae: false,
            max_scenery_alpha: DEFAULT_MAX_SCENERY_ALPHA,
            seed: None,
        }
    }
}

/// Failure to read a settings file
#[derive(Debug)]
pub enum SettingsError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read settings file {}: {source}", path.display())
            }
            Self::Parse(e) => write!(f, "invalid settings JSON: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
        }
    }
}

/// Clamp any integer into the valid alpha range
pub fn clamp_alpha(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

fn deserialize_alpha<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    i64::deserialize(deserializer).map(clamp_alpha)
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(json)
            .map(Self::sanitized)
            .map_err(SettingsError::Parse)
    }

    /// Load settings from a JSON file; missing fields take defaults
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Clamp a duration at the boundary: negative or NaN budgets end the run
    /// on the first tick.
    pub fn sanitized(mut self) -> Self {
        self.duration = self
            .duration
            .map(|d| if d.is_nan() { 0.0 } else { d.max(0.0) });
        self
    }

    /// Gameplay switches for the simulation
    pub fn rules(&self) -> Rules {
        Rules {
            enemy_bullets: self.enemy_bullets,
            allow_nebulae: self.enable_nebulae,
            max_scenery_alpha: self.max_scenery_alpha,
        }
    }
}
