//! Explicit engine handle.
//!
//! Hosts construct an [`Engine`], set up the screen, initialise the game state
//! and then drive everything through its methods. Every failing operation is
//! forwarded to the error sink as `(title, message)` and also returned, so the
//! caller can react while the player still sees the notification. A failed
//! operation never changes state.

use std::sync::Arc;

use fsce_core::{Action, EngineError, EngineResult, ErrorSink, LogSink, SUPPORTED_ITEM_SIZES};
use fsce_render::{ImageLoader, Surface};
use glam::{IVec2, UVec2};

use crate::behavior::Behaviors;
use crate::block::{Animation, AnimationClip, Block, Item, Sprite};
use crate::renderer::{FrameRenderer, FrameReport};
use crate::scene::Layer;
use crate::state::{GameState, Variable};
use crate::texture::Texture;

pub const DEFAULT_ITEM_SIZE: u32 = 16;
pub const DEFAULT_ANIMATION_MAX: u32 = 8;

const GAME_STATE: &str = "Game state";
const SCREEN: &str = "Screen";

pub struct Engine<S: ErrorSink = LogSink> {
    sink: S,
    screen: Option<UVec2>,
    state: Option<GameState>,
    renderer: FrameRenderer,
}

impl Engine<LogSink> {
    pub fn with_log_sink() -> Self {
        Self::new(LogSink)
    }
}

impl<S: ErrorSink + Default> Default for Engine<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: ErrorSink> Engine<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            screen: None,
            state: None,
            renderer: FrameRenderer::new(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn report<T>(&mut self, result: EngineResult<T>) -> EngineResult<T> {
        if let Err(err) = &result {
            self.sink.notify(err.title(), &err.to_string());
        }
        result
    }

    fn live_state_mut(&mut self) -> EngineResult<&mut GameState> {
        self.state
            .as_mut()
            .ok_or(EngineError::NotInitialized(GAME_STATE))
    }

    fn live_state(&self) -> EngineResult<&GameState> {
        self.state
            .as_ref()
            .ok_or(EngineError::NotInitialized(GAME_STATE))
    }

    // --- Setup ---

    /// Fix the drawable resolution. Allowed exactly once.
    pub fn setup_screen(&mut self, width: u32, height: u32) -> EngineResult<UVec2> {
        let result = if self.screen.is_some() {
            Err(EngineError::AlreadyInitialized(SCREEN))
        } else if width == 0 || height == 0 {
            Err(EngineError::InvalidInput(format!(
                "screen size {width}x{height} must be non-zero"
            )))
        } else {
            let resolution = UVec2::new(width, height);
            self.screen = Some(resolution);
            log::info!("Screen set up at {width}x{height}");
            Ok(resolution)
        };
        self.report(result)
    }

    pub fn resolution(&self) -> Option<UVec2> {
        self.screen
    }

    /// Create the game state. Requires a screen; allowed exactly once.
    pub fn init_game_state(&mut self, item_size: u32, animation_max: u32) -> EngineResult<()> {
        let result = match self.screen {
            None => Err(EngineError::NotInitialized(SCREEN)),
            Some(_) if self.state.is_some() => Err(EngineError::AlreadyInitialized(GAME_STATE)),
            Some(_) if !SUPPORTED_ITEM_SIZES.contains(&item_size) => {
                Err(EngineError::InvalidInput(format!(
                    "item size {item_size} is not one of {SUPPORTED_ITEM_SIZES:?}"
                )))
            }
            Some(_) if animation_max == 0 => Err(EngineError::InvalidInput(
                "animation max must be greater than 0".to_string(),
            )),
            Some(resolution) => {
                self.state = Some(GameState::new(resolution, item_size, animation_max));
                log::info!(
                    "Game state initialised: {}x{}, item size {item_size}, animation max {animation_max}",
                    resolution.x,
                    resolution.y
                );
                Ok(())
            }
        };
        self.report(result)
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Direct access for hosts that batch changes between frames.
    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    // --- Textures ---

    pub async fn build_texture<L: ImageLoader>(
        &mut self,
        loader: &L,
        url: &str,
        id: &str,
    ) -> EngineResult<Arc<Texture>> {
        let result = match self.state.as_mut() {
            Some(state) => state.textures.build(loader, url, id).await,
            None => Err(EngineError::NotInitialized(GAME_STATE)),
        };
        if let Ok(texture) = &result {
            log::info!("Texture '{}' loaded from '{url}'", texture.id);
        }
        self.report(result)
    }

    pub fn texture(&mut self, id: &str) -> EngineResult<Arc<Texture>> {
        let result = self.live_state().and_then(|s| s.textures.get(id));
        self.report(result)
    }

    pub fn remove_texture(&mut self, id: &str) -> EngineResult<Option<Arc<Texture>>> {
        let result = self.live_state_mut().and_then(|s| s.remove_texture(id));
        self.report(result)
    }

    // --- Assets ---

    pub fn build_block(
        &mut self,
        id: &str,
        texture: Option<Arc<Texture>>,
        position: IVec2,
        physics: Option<Behaviors>,
        animation: Option<Animation>,
    ) -> EngineResult<Arc<Block>> {
        let result = self
            .live_state_mut()
            .and_then(|s| s.build_block(id, texture, position, physics, animation));
        self.report(result)
    }

    pub fn block(&mut self, id: &str) -> EngineResult<Arc<Block>> {
        let result = self.live_state().and_then(|s| s.assets.block(id));
        self.report(result)
    }

    pub fn remove_block(&mut self, id: &str) -> EngineResult<Option<Arc<Block>>> {
        let result = self.live_state_mut().map(|s| s.assets.remove_block(id));
        self.report(result)
    }

    pub fn build_sprite(&mut self, id: &str, block_ids: &[&str]) -> EngineResult<Arc<Sprite>> {
        let result = self
            .live_state_mut()
            .and_then(|s| s.assets.build_sprite(id, block_ids));
        self.report(result)
    }

    pub fn sprite(&mut self, id: &str) -> EngineResult<Arc<Sprite>> {
        let result = self.live_state().and_then(|s| s.assets.sprite(id));
        self.report(result)
    }

    pub fn remove_sprite(&mut self, id: &str) -> EngineResult<Option<Arc<Sprite>>> {
        let result = self.live_state_mut().map(|s| s.assets.remove_sprite(id));
        self.report(result)
    }

    pub fn build_animation(
        &mut self,
        id: &str,
        frame_ids: &[&str],
    ) -> EngineResult<Arc<AnimationClip>> {
        let result = self
            .live_state_mut()
            .and_then(|s| s.build_animation(id, frame_ids));
        self.report(result)
    }

    pub fn animation(&mut self, id: &str) -> EngineResult<Arc<AnimationClip>> {
        let result = self.live_state().and_then(|s| s.assets.animation(id));
        self.report(result)
    }

    pub fn remove_animation(&mut self, id: &str) -> EngineResult<Option<Arc<AnimationClip>>> {
        let result = self.live_state_mut().map(|s| s.assets.remove_animation(id));
        self.report(result)
    }

    // --- Layers ---

    /// Create a layer and return the index it was given.
    pub fn create_layer(&mut self, name: &str, index: Option<i32>) -> EngineResult<i32> {
        let result = self
            .live_state_mut()
            .and_then(|s| s.scene.create_layer(name, index).map(|layer| layer.index));
        self.report(result)
    }

    pub fn remove_layer(&mut self, name: &str) -> EngineResult<Option<Layer>> {
        let result = self.live_state_mut().map(|s| s.scene.remove_layer(name));
        self.report(result)
    }

    pub fn layer_names(&self) -> Vec<String> {
        self.state
            .as_ref()
            .map(|s| s.scene.layer_names().into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn insert_item(&mut self, item: Item, layer: &str) -> EngineResult<()> {
        let result = self
            .live_state_mut()
            .and_then(|s| s.scene.insert_item(item, layer));
        self.report(result)
    }

    pub fn remove_item(&mut self, item: &Item, layer: &str) -> EngineResult<bool> {
        let result = self
            .live_state_mut()
            .and_then(|s| s.scene.remove_item(item, layer));
        self.report(result)
    }

    // --- Input and variables ---

    pub fn push_action(&mut self, action: Action) -> EngineResult<()> {
        let result = self.live_state_mut().map(|s| s.actions.push(action));
        self.report(result)
    }

    pub fn drain_actions(&mut self) -> EngineResult<Vec<Action>> {
        let result = self.live_state_mut().map(|s| s.actions.drain());
        self.report(result)
    }

    pub fn set_variable(&mut self, name: &str, value: Variable) -> EngineResult<Option<Variable>> {
        let result = self
            .live_state_mut()
            .map(|s| s.variables.insert(name.to_string(), value));
        self.report(result)
    }

    pub fn variable(&mut self, name: &str) -> EngineResult<Option<Variable>> {
        let result = self.live_state().map(|s| s.variables.get(name).cloned());
        self.report(result)
    }

    pub fn remove_variable(&mut self, name: &str) -> EngineResult<Option<Variable>> {
        let result = self.live_state_mut().map(|s| s.variables.remove(name));
        self.report(result)
    }

    // --- Frames ---

    /// Show or hide the debug overlay and the notification panel together.
    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.renderer.set_debug(enabled);
        self.sink.set_visible(enabled);
    }

    pub fn debug_mode(&self) -> bool {
        self.renderer.debug_enabled()
    }

    /// Step the shared animation counter. `None` before the game state exists.
    pub fn advance_animation(&mut self) -> Option<u32> {
        self.state.as_mut().map(|s| s.animation.advance())
    }

    pub fn render_frame<T: Surface + ?Sized>(&mut self, surface: &mut T) -> EngineResult<FrameReport> {
        let result = self.renderer.render(self.state.as_ref(), surface);
        self.report(result)
    }
}
