pub mod assets;
pub mod behavior;
pub mod block;
pub mod engine;
pub mod renderer;
pub mod run_loop;
pub mod scene;
pub mod state;
pub mod texture;

pub use assets::AssetStore;
pub use behavior::{Behavior, BehaviorEntry, BehaviorKind, Behaviors, Direction};
pub use block::{Animation, AnimationClip, Block, Item, Sprite};
pub use engine::{Engine, DEFAULT_ANIMATION_MAX, DEFAULT_ITEM_SIZE};
pub use renderer::{FrameRenderer, FrameReport};
pub use run_loop::{
    ExitReason, LoopHandle, LoopState, LoopSummary, RenderLoop, FAILED_FRAME_BACKOFF,
};
pub use scene::{Layer, SceneGraph};
pub use state::{GameState, Variable};
pub use texture::{Texture, TextureRegistry};
