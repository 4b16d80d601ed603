use fsce_core::{FrameErrorPolicy, SUPPORTED_ITEM_SIZES};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Startup parameters read once by the host and handed to the engine.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub engine: EngineSettings,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub developer: DeveloperConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub menu: bool,
    #[serde(default = "default_resizable")]
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            menu: false,
            resizable: default_resizable(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct DeveloperConfig {
    /// Start with debug mode on.
    #[serde(default)]
    pub activated: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PathsConfig {
    #[serde(default = "default_image_library")]
    pub default_image_library: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            default_image_library: default_image_library(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EngineSettings {
    #[serde(default = "default_item_size")]
    pub item_size: u32,
    #[serde(default = "default_animation_max")]
    pub animation_max: u32,
    /// `None` renders as fast as the surface allows.
    #[serde(default = "default_target_fps")]
    pub target_fps: Option<u32>,
    #[serde(default = "default_load_timeout_ms")]
    pub load_timeout_ms: u64,
    #[serde(default)]
    pub on_frame_error: FrameErrorPolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            item_size: default_item_size(),
            animation_max: default_animation_max(),
            target_fps: default_target_fps(),
            load_timeout_ms: default_load_timeout_ms(),
            on_frame_error: FrameErrorPolicy::default(),
        }
    }
}

impl EngineSettings {
    pub fn frame_interval(&self) -> Option<Duration> {
        match self.target_fps {
            Some(fps) if fps > 0 => Some(Duration::from_nanos(1_000_000_000 / fps as u64)),
            _ => None,
        }
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }
}

pub fn load_config_from_path(config_path: &Path) -> Result<EngineConfig, String> {
    let raw = fs::read_to_string(config_path)
        .map_err(|e| format!("Failed to read config file {}: {e}", config_path.display()))?;
    let config: EngineConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", config_path.display()))?;
    validate_config(&config)?;
    log::info!(
        "Loaded config '{}' ({}x{}, item size {})",
        config_path.display(),
        config.app.window.width,
        config.app.window.height,
        config.engine.item_size
    );
    Ok(config)
}

pub fn validate_config(config: &EngineConfig) -> Result<(), String> {
    let window = &config.app.window;
    if window.width == 0 || window.height == 0 {
        return Err(format!(
            "Config validation failed: window size {}x{} must be non-zero",
            window.width, window.height
        ));
    }

    let engine = &config.engine;
    if !SUPPORTED_ITEM_SIZES.contains(&engine.item_size) {
        return Err(format!(
            "Config validation failed: item_size {} is not one of {:?}",
            engine.item_size, SUPPORTED_ITEM_SIZES
        ));
    }
    if engine.animation_max == 0 {
        return Err("Config validation failed: animation_max must be greater than 0".to_string());
    }
    if engine.load_timeout_ms == 0 {
        return Err("Config validation failed: load_timeout_ms must be greater than 0".to_string());
    }
    if engine.target_fps == Some(0) {
        log::warn!("Config target_fps is 0; frames will not be paced");
    }

    Ok(())
}

fn default_title() -> String {
    "FS Canvas Engine".to_string()
}

const fn default_width() -> u32 {
    800
}

const fn default_height() -> u32 {
    600
}

const fn default_resizable() -> bool {
    true
}

fn default_image_library() -> String {
    "assets/textures/".to_string()
}

const fn default_item_size() -> u32 {
    16
}

const fn default_animation_max() -> u32 {
    8
}

const fn default_target_fps() -> Option<u32> {
    Some(60)
}

const fn default_load_timeout_ms() -> u64 {
    5000
}
