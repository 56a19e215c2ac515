// Runtime configuration for the demo, read from environment variables.
// `main` loads a `.env` file first (via `dotenvy`), so the same keys can live there.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::geometry::FillMode;

pub const DEFAULT_CAMERA_INDEX: u32 = 0;
pub const DEFAULT_CAMERA_WIDTH: u32 = 640;
pub const DEFAULT_CAMERA_HEIGHT: u32 = 480;
pub const DEFAULT_WINDOW_WIDTH: usize = 960;
pub const DEFAULT_WINDOW_HEIGHT: usize = 540;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Capture device index (0 = default webcam)
    pub camera_index: u32,
    /// Requested capture width; the camera may pick something close
    pub camera_width: u32,
    /// Requested capture height
    pub camera_height: u32,
    /// Initial window width
    pub window_width: usize,
    /// Initial window height
    pub window_height: usize,
    /// Initial fill mode (F toggles it at runtime)
    pub fill_mode: FillMode,
    /// Show this still image instead of opening the camera
    pub image_path: Option<PathBuf>,
    /// JSON Lines recording for the replay detector; no overlay when unset
    pub replay_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera_index: DEFAULT_CAMERA_INDEX,
            camera_width: DEFAULT_CAMERA_WIDTH,
            camera_height: DEFAULT_CAMERA_HEIGHT,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            fill_mode: FillMode::ScaleToFill,
            image_path: None,
            replay_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key -> value source; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();
        let image_path = path_var(&lookup, "POSE_IMAGE_PATH");
        // Still images read best letterboxed; the live preview goes full-bleed.
        let default_mode = if image_path.is_some() { FillMode::ScaleToFit } else { defaults.fill_mode };
        let config = Config {
            camera_index: parse_var(&lookup, "POSE_CAMERA_INDEX", defaults.camera_index)?,
            camera_width: parse_var(&lookup, "POSE_CAMERA_WIDTH", defaults.camera_width)?,
            camera_height: parse_var(&lookup, "POSE_CAMERA_HEIGHT", defaults.camera_height)?,
            window_width: parse_var(&lookup, "POSE_WINDOW_WIDTH", defaults.window_width)?,
            window_height: parse_var(&lookup, "POSE_WINDOW_HEIGHT", defaults.window_height)?,
            fill_mode: parse_var(&lookup, "POSE_FILL_MODE", default_mode)?,
            image_path,
            replay_path: path_var(&lookup, "POSE_REPLAY_PATH"),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let dims = [
            ("POSE_CAMERA_WIDTH", self.camera_width as usize),
            ("POSE_CAMERA_HEIGHT", self.camera_height as usize),
            ("POSE_WINDOW_WIDTH", self.window_width),
            ("POSE_WINDOW_HEIGHT", self.window_height),
        ];
        for (key, value) in dims {
            if value == 0 {
                return Err(Error::Config(format!("{key} must be greater than zero")));
            }
        }
        Ok(())
    }
}

fn path_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<PathBuf> {
    lookup(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{key}={raw:?}: {e}"))),
        _ => Ok(default),
    }
}
