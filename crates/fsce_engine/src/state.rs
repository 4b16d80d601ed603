use std::collections::BTreeMap;
use std::sync::Arc;

use fsce_core::{ActionQueue, AnimationFrame, EngineError, EngineResult};
use fsce_render::GridProjection;
use glam::{IVec2, UVec2};
use serde::Deserialize;

use crate::assets::AssetStore;
use crate::behavior::Behaviors;
use crate::block::{Animation, AnimationClip, Block};
use crate::scene::SceneGraph;
use crate::texture::{Texture, TextureRegistry};

/// Value held in the game's variable store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Variable {
    Text(String),
    Number(f64),
    Null,
}

/// Root aggregate for everything a frame needs: resolution, grid size, the
/// shared animation counter, variables, layers, assets and textures.
#[derive(Debug)]
pub struct GameState {
    pub resolution: UVec2,
    pub item_size: u32,
    pub animation: AnimationFrame,
    pub variables: BTreeMap<String, Variable>,
    pub scene: SceneGraph,
    pub assets: AssetStore,
    pub textures: TextureRegistry,
    pub actions: ActionQueue,
}

impl GameState {
    pub fn new(resolution: UVec2, item_size: u32, animation_max: u32) -> Self {
        Self {
            resolution,
            item_size,
            animation: AnimationFrame::new(animation_max),
            variables: BTreeMap::new(),
            scene: SceneGraph::new(),
            assets: AssetStore::new(),
            textures: TextureRegistry::new(),
            actions: ActionQueue::new(),
        }
    }

    pub fn projection(&self) -> GridProjection {
        GridProjection::new(self.item_size, self.resolution)
    }

    pub fn build_block(
        &mut self,
        id: &str,
        texture: Option<Arc<Texture>>,
        position: IVec2,
        physics: Option<Behaviors>,
        animation: Option<Animation>,
    ) -> EngineResult<Arc<Block>> {
        self.assets
            .build_block(&self.textures, id, texture, position, physics, animation)
    }

    pub fn build_animation(
        &mut self,
        id: &str,
        frame_ids: &[&str],
    ) -> EngineResult<Arc<AnimationClip>> {
        self.assets.build_animation(&self.textures, id, frame_ids)
    }

    /// Unregister a texture that nothing draws with any more.
    ///
    /// Fails with `TextureInUse` while anything that can still draw it holds a
    /// reference: stored blocks and sprites, animation clips, and blocks placed
    /// in a layer. Absent ids are a no-op.
    pub fn remove_texture(&mut self, id: &str) -> EngineResult<Option<Arc<Texture>>> {
        let Some(texture) = self.textures.find(id).cloned() else {
            return Ok(None);
        };
        let user = self.assets.texture_user(&texture).or_else(|| {
            self.scene
                .blocks()
                .find(|b| b.uses_texture(&texture))
                .map(|b| format!("block '{}' in the scene", b.id))
        });
        if let Some(user) = user {
            return Err(EngineError::TextureInUse {
                id: id.to_string(),
                user,
            });
        }
        Ok(self.textures.remove(id))
    }
}
