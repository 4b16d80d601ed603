mod scene;

use std::env;
use std::path::{Path, PathBuf};

use fsce_core::Action;
use fsce_engine::{Engine, RenderLoop};
use fsce_platform::{load_config_from_path, EngineConfig};
use fsce_render::{FsImageLoader, RasterSurface, Rgba};

use scene::{apply_scene, load_scene_from_path};

const DEFAULT_CONFIG_PATH: &str = "config/config.json";
const DEFAULT_SCENE_PATH: &str = "assets/scenes/demo.json";
const DEFAULT_OUTPUT_PATH: &str = "frame.png";
const DEFAULT_FRAME_COUNT: u64 = 16;

#[derive(Debug, Clone, PartialEq)]
struct Args {
    config: PathBuf,
    scene: PathBuf,
    output: PathBuf,
    frames: u64,
    debug: Option<bool>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            scene: PathBuf::from(DEFAULT_SCENE_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            frames: DEFAULT_FRAME_COUNT,
            debug: None,
        }
    }
}

fn parse_args<I>(args: I) -> Result<Args, String>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| format!("Missing value for {flag}"))
        };
        match arg.as_str() {
            "--config" => parsed.config = PathBuf::from(value("--config")?),
            "--scene" => parsed.scene = PathBuf::from(value("--scene")?),
            "--output" => parsed.output = PathBuf::from(value("--output")?),
            "--frames" => {
                let raw = value("--frames")?;
                parsed.frames = raw
                    .parse()
                    .map_err(|e| format!("Invalid --frames value '{raw}': {e}"))?;
                if parsed.frames == 0 {
                    return Err("--frames must be at least 1".to_string());
                }
            }
            "--debug" => parsed.debug = Some(true),
            "--no-debug" => parsed.debug = Some(false),
            other => return Err(format!("Unknown argument '{other}'")),
        }
    }
    Ok(parsed)
}

fn load_config(path: &Path) -> Result<EngineConfig, String> {
    if path.exists() {
        load_config_from_path(path)
    } else {
        log::warn!(
            "Config file {} not found, using built-in defaults",
            path.display()
        );
        Ok(EngineConfig::default())
    }
}

fn run(args: Args) -> Result<(), String> {
    let config = load_config(&args.config)?;
    let scene = load_scene_from_path(&args.scene)?;
    let window = &config.app.window;
    log::info!("{} ({}x{})", window.title, window.width, window.height);

    let mut engine = Engine::with_log_sink();
    engine
        .setup_screen(window.width, window.height)
        .map_err(|e| e.to_string())?;
    engine
        .init_game_state(config.engine.item_size, config.engine.animation_max)
        .map_err(|e| e.to_string())?;

    let loader = FsImageLoader::new(&config.paths.default_image_library)
        .with_timeout(config.engine.load_timeout());
    pollster::block_on(apply_scene(&mut engine, &loader, &scene)).map_err(|e| e.to_string())?;

    let mut surface =
        RasterSurface::new(window.width, window.height).with_background(Rgba([0, 0, 0, 255]));
    let mut render_loop = RenderLoop::new()
        .with_policy(config.engine.on_frame_error)
        .with_frame_interval(config.engine.frame_interval());
    let handle = render_loop.handle();
    let debug_mode = args.debug.unwrap_or(config.app.developer.activated);

    let mut rendered = 0u64;
    let summary = render_loop.run(&mut engine, &mut surface, debug_mode, |engine| {
        rendered += 1;
        // Headless host: one synthetic key per frame stands in for the keyboard.
        if let Err(err) = engine.push_action(Action::key_up("Tick")) {
            log::debug!("Dropping tick action: {err}");
        }
        if rendered >= args.frames {
            handle.request_stop();
        }
    });

    let pending = engine.drain_actions().map(|a| a.len()).unwrap_or_default();
    log::info!(
        "Rendered {} frames ({} failed, exit {:?}, {pending} actions queued, {:.1} fps)",
        summary.frames,
        summary.failed_frames,
        summary.exit,
        render_loop.time().smoothed_fps
    );

    surface.save_png(&args.output)?;
    for label in surface.labels() {
        log::info!("Overlay text at ({}, {}): {}", label.position.x, label.position.y, label.text);
    }
    log::info!("Last frame written to {}", args.output.display());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("FS Canvas Engine starting...");

    let result = parse_args(env::args().skip(1)).and_then(run);
    if let Err(err) = result {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_arguments_uses_defaults() {
        assert_eq!(args(&[]).expect("defaults"), Args::default());
    }

    #[test]
    fn parses_all_flags() {
        let parsed = args(&[
            "--config", "c.json", "--scene", "s.json", "--output", "out.png", "--frames", "3",
            "--debug",
        ])
        .expect("flags");
        assert_eq!(parsed.config, PathBuf::from("c.json"));
        assert_eq!(parsed.scene, PathBuf::from("s.json"));
        assert_eq!(parsed.output, PathBuf::from("out.png"));
        assert_eq!(parsed.frames, 3);
        assert_eq!(parsed.debug, Some(true));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(args(&["--frames"]).is_err());
        assert!(args(&["--frames", "zero"]).is_err());
        assert!(args(&["--frames", "0"]).is_err());
        assert!(args(&["--fullscreen"]).is_err());
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let config = load_config(Path::new("definitely/not/here.json")).expect("defaults");
        assert_eq!(config, EngineConfig::default());
    }
}
