pub mod config;

pub use config::{load_config_from_path, validate_config, EngineConfig};
