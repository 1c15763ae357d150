//! Game configuration resource.
//!
//! Settings loaded from an INI file, with safe defaults for anything the file
//! leaves out.
//!
//! # Configuration File Format
//!
//! ```ini
//! [loop]
//! target_fps = 60
//! frames = 1800
//!
//! [screen]
//! width = 432
//! height = 243
//!
//! [demo]
//! seed = 42
//! star_interval = 3.0
//! round_time = 20.0
//!
//! [input]
//! left = left
//! start = return
//! pause = p
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;

use crate::error::{Error, Result};
use crate::events::input::{Key, MOUSE_BUTTON_1};
use crate::resources::input::InputBindings;

/// Default safe values for startup
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_FRAMES: u64 = 1800;
const DEFAULT_WIDTH: u32 = 432;
const DEFAULT_HEIGHT: u32 = 243;
const DEFAULT_SEED: u64 = 42;
const DEFAULT_STAR_INTERVAL: f32 = 3.0;
const DEFAULT_ROUND_TIME: f32 = 20.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Input ids the demo states react to, with their default keys.
pub const DEFAULT_BINDINGS: [(&str, Key); 7] = [
    ("left", Key::Left),
    ("right", Key::Right),
    ("up", Key::Up),
    ("down", Key::Down),
    ("start", Key::Return),
    ("pause", Key::Char('p')),
    ("quit", Key::Escape),
];

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Fixed simulation rate; one frame advances `1 / target_fps` seconds.
    pub target_fps: u32,
    /// Frames the headless runner simulates before stopping.
    pub frames: u64,
    /// Virtual screen width in pixels.
    pub width: u32,
    /// Virtual screen height in pixels.
    pub height: u32,
    /// Seed for every random source in the demo.
    pub seed: u64,
    /// Seconds between star spawns.
    pub star_interval: f32,
    /// Seconds a round of play lasts.
    pub round_time: f32,
    /// Keyboard bindings, `(input id, key)`.
    pub bindings: Vec<(String, Key)>,
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
            target_fps: DEFAULT_TARGET_FPS,
            frames: DEFAULT_FRAMES,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: DEFAULT_SEED,
            star_interval: DEFAULT_STAR_INTERVAL,
            round_time: DEFAULT_ROUND_TIME,
            bindings: DEFAULT_BINDINGS
                .iter()
                .map(|(id, key)| (id.to_string(), *key))
                .collect(),
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

    /// Seconds per simulated frame.
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    pub fn load_from_file(&mut self) -> Result<()> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| Error::Config(format!("Failed to load config file: {}", e)))?;
        self.apply(&config)
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<()> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        self.apply(&config)
    }

    fn apply(&mut self, config: &Ini) -> Result<()> {
        // [loop] section
        if let Some(fps) = config.getuint("loop", "target_fps").ok().flatten() {
            self.target_fps = to_u32("loop", "target_fps", fps)?;
        }
        if let Some(frames) = config.getuint("loop", "frames").ok().flatten() {
            self.frames = frames;
        }

        // [screen] section
        if let Some(width) = config.getuint("screen", "width").ok().flatten() {
            self.width = to_u32("screen", "width", width)?;
        }
        if let Some(height) = config.getuint("screen", "height").ok().flatten() {
            self.height = to_u32("screen", "height", height)?;
        }

        // [demo] section
        if let Some(seed) = config.getuint("demo", "seed").ok().flatten() {
            self.seed = seed;
        }
        if let Some(interval) = config.getfloat("demo", "star_interval").ok().flatten() {
            self.star_interval = interval as f32;
        }
        if let Some(round) = config.getfloat("demo", "round_time").ok().flatten() {
            self.round_time = round as f32;
        }

        // [input] section
        for (id, key) in self.bindings.iter_mut() {
            if let Some(name) = config.get("input", id) {
                *key = name
                    .parse()
                    .map_err(|e| Error::Config(format!("[input] {id}: {e}")))?;
            }
        }

        if self.target_fps == 0 {
            return Err(Error::Config("target_fps must be at least 1".into()));
        }

        info!(
            "Loaded config: {}x{} screen, fps={}, frames={}, seed={}",
            self.width, self.height, self.target_fps, self.frames, self.seed
        );
        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<()> {
        let mut config = Ini::new();

        config.set("loop", "target_fps", Some(self.target_fps.to_string()));
        config.set("loop", "frames", Some(self.frames.to_string()));
        config.set("screen", "width", Some(self.width.to_string()));
        config.set("screen", "height", Some(self.height.to_string()));
        config.set("demo", "seed", Some(self.seed.to_string()));
        config.set("demo", "star_interval", Some(self.star_interval.to_string()));
        config.set("demo", "round_time", Some(self.round_time.to_string()));
        for (id, key) in &self.bindings {
            config.set("input", id, Some(key.to_string()));
        }

        config
            .write(&self.config_path)
            .map_err(|e| Error::Config(format!("Failed to save config file: {}", e)))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Keyboard bindings plus the left mouse button as `start`.
    pub fn input_bindings(&self) -> InputBindings {
        let mut bindings = InputBindings::new();
        for (id, key) in &self.bindings {
            bindings.bind_key(*key, id.clone());
        }
        bindings.bind_mouse_click(MOUSE_BUTTON_1, "start");
        bindings
    }
}

fn to_u32(section: &str, key: &str, value: u64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| Error::Config(format!("[{section}] {key}: {value} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::new();
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.width, 432);
        assert_eq!(config.bindings.len(), DEFAULT_BINDINGS.len());
        assert!((config.frame_delta() - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_from_str_overrides_present_keys() {
        let mut config = GameConfig::new();
        config
            .load_from_str(
                "[loop]\ntarget_fps = 30\n[demo]\nseed = 7\nstar_interval = 1.5\n[input]\npause = space\n",
            )
            .unwrap();
        assert_eq!(config.target_fps, 30);
        assert_eq!(config.seed, 7);
        assert_eq!(config.star_interval, 1.5);
        assert_eq!(config.round_time, DEFAULT_ROUND_TIME);
        assert_eq!(config.input_bindings().key_binding(Key::Space), Some("pause"));
        assert_eq!(config.input_bindings().key_binding(Key::Char('p')), None);
    }

    #[test]
    fn test_bad_key_name_is_a_config_error() {
        let mut config = GameConfig::new();
        let err = config.load_from_str("[input]\nleft = nowhere\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_oversized_values_are_config_errors() {
        let mut config = GameConfig::new();
        let err = config
            .load_from_str("[screen]\nwidth = 5000000000\n")
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(config.width, GameConfig::new().width);

        let mut config = GameConfig::new();
        assert!(matches!(
            config.load_from_str("[loop]\ntarget_fps = 4294967296\n"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_zero_fps_rejected() {
        let mut config = GameConfig::new();
        assert!(config.load_from_str("[loop]\ntarget_fps = 0\n").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut config = GameConfig::with_path("/definitely/not/here.ini");
        assert!(matches!(config.load_from_file(), Err(Error::Config(_))));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("stepframe-config-{}.ini", std::process::id()));
        let mut config = GameConfig::with_path(&path);
        config.seed = 1234;
        config.bindings[0].1 = Key::Char('a');
        config.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.seed, 1234);
        assert_eq!(loaded.bindings[0], ("left".to_string(), Key::Char('a')));
    }
}
