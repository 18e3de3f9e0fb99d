//! Game configuration resource.
//!
//! Manages game settings loaded from an INI configuration file. Provides
//! defaults for safe startup so a missing file is not fatal.
//!
//! # Configuration File Format
//!
//! ```ini
//! [render]
//! width = 320
//! height = 192
//!
//! [window]
//! width = 1280
//! height = 768
//! fullscreen = false
//! vsync = true
//! target_fps = 60
//!
//! [game]
//! levels = ./assets/levels
//!
//! [player]
//! walk_accel = 900
//! max_speed = 110
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_RENDER_WIDTH: u32 = 320;
const DEFAULT_RENDER_HEIGHT: u32 = 192;
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 768;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_FULLSCREEN: bool = false;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";
const DEFAULT_LEVELS_PATH: &str = "./assets/levels";

/// Movement tuning for the player character. Speeds are in pixels per second
/// and accelerations in pixels per second squared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTuning {
    pub walk_accel: f32,
    pub max_speed: f32,
    pub stop_decel: f32,
    /// Multiplier applied to `max_speed` while sprinting.
    pub run_factor: f32,
    pub jump_speed: f32,
    pub gravity: f32,
    /// Fraction of the upward speed kept when the jump key is released early.
    pub jump_cut: f32,
    pub max_fall_speed: f32,
    pub sprite_width: f32,
    pub sprite_height: f32,
    pub collider_width: f32,
    pub collider_height: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            walk_accel: 900.0,
            max_speed: 110.0,
            stop_decel: 1200.0,
            run_factor: 1.6,
            jump_speed: 300.0,
            gravity: 900.0,
            jump_cut: 0.5,
            max_fall_speed: 400.0,
            sprite_width: 16.0,
            sprite_height: 24.0,
            collider_width: 10.0,
            collider_height: 22.0,
        }
    }
}

/// Game configuration resource.
///
/// Stores render resolution, window settings, the level set location and
/// player tuning.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Internal render width in pixels.
    pub render_width: u32,
    /// Internal render height in pixels.
    pub render_height: u32,
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Target frames per second.
    pub target_fps: u32,
    /// Enable vertical sync.
    pub vsync: bool,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Manifest file or directory of the level set.
    pub levels_path: PathBuf,
    pub player: PlayerTuning,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            render_width: DEFAULT_RENDER_WIDTH,
            render_height: DEFAULT_RENDER_HEIGHT,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            vsync: DEFAULT_VSYNC,
            fullscreen: DEFAULT_FULLSCREEN,
            levels_path: PathBuf::from(DEFAULT_LEVELS_PATH),
            player: PlayerTuning::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);

        info!(
            "Loaded config: {}x{} render, {}x{} window, fps={}, vsync={}, fullscreen={}, levels={:?}",
            self.render_width,
            self.render_height,
            self.window_width,
            self.window_height,
            self.target_fps,
            self.vsync,
            self.fullscreen,
            self.levels_path
        );

        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        let uint = |section: &str, key: &str| config.getuint(section, key).ok().flatten();
        let float = |section: &str, key: &str| {
            config
                .getfloat(section, key)
                .ok()
                .flatten()
                .map(|v| v as f32)
        };

        // [render] section
        if let Some(width) = uint("render", "width") {
            self.render_width = width as u32;
        }
        if let Some(height) = uint("render", "height") {
            self.render_height = height as u32;
        }

        // [window] section
        if let Some(width) = uint("window", "width") {
            self.window_width = width as u32;
        }
        if let Some(height) = uint("window", "height") {
            self.window_height = height as u32;
        }
        if let Some(fps) = uint("window", "target_fps") {
            self.target_fps = fps as u32;
        }
        if let Some(vsync) = config.getbool("window", "vsync").ok().flatten() {
            self.vsync = vsync;
        }
        if let Some(fullscreen) = config.getbool("window", "fullscreen").ok().flatten() {
            self.fullscreen = fullscreen;
        }

        // [game] section
        if let Some(levels) = config.get("game", "levels") {
            self.levels_path = PathBuf::from(levels);
        }

        // [player] section
        let p = &mut self.player;
        for (key, field) in [
            ("walk_accel", &mut p.walk_accel),
            ("max_speed", &mut p.max_speed),
            ("stop_decel", &mut p.stop_decel),
            ("run_factor", &mut p.run_factor),
            ("jump_speed", &mut p.jump_speed),
            ("gravity", &mut p.gravity),
            ("jump_cut", &mut p.jump_cut),
            ("max_fall_speed", &mut p.max_fall_speed),
            ("sprite_width", &mut p.sprite_width),
            ("sprite_height", &mut p.sprite_height),
            ("collider_width", &mut p.collider_width),
            ("collider_height", &mut p.collider_height),
        ] {
            if let Some(value) = float("player", key) {
                *field = value;
            }
        }
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// Get the internal render resolution.
    pub fn render_size(&self) -> (u32, u32) {
        (self.render_width, self.render_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_keep_defaults() {
        let mut config = GameConfig::new();
        config
            .load_from_str("[render]\nwidth = 400\n\n[player]\nmax_speed = 150.5\n")
            .unwrap();
        assert_eq!(config.render_width, 400);
        assert_eq!(config.render_height, DEFAULT_RENDER_HEIGHT);
        assert_eq!(config.player.max_speed, 150.5);
        assert_eq!(config.player.gravity, PlayerTuning::default().gravity);
        assert_eq!(config.levels_path, PathBuf::from(DEFAULT_LEVELS_PATH));
    }

    #[test]
    fn reads_game_section() {
        let mut config = GameConfig::new();
        config
            .load_from_str("[game]\nlevels = data/world\n[window]\nvsync = false\n")
            .unwrap();
        assert_eq!(config.levels_path, PathBuf::from("data/world"));
        assert!(!config.vsync);
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut config = GameConfig::with_path("/nonexistent/config.ini");
        assert!(config.load_from_file().is_err());
        assert_eq!(config.render_size(), (DEFAULT_RENDER_WIDTH, DEFAULT_RENDER_HEIGHT));
    }
}
