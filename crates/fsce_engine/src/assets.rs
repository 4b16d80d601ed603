use std::sync::Arc;

use fsce_core::{EngineError, EngineResult};
use glam::IVec2;

use crate::behavior::Behaviors;
use crate::block::{Animation, AnimationClip, Block, Sprite};
use crate::texture::{Texture, TextureRegistry};

/// Blocks, sprites and animation clips, each kept in creation order with
/// unique identifiers per collection.
#[derive(Debug, Default)]
pub struct AssetStore {
    blocks: Vec<Arc<Block>>,
    sprites: Vec<Arc<Sprite>>,
    animations: Vec<Arc<AnimationClip>>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and store a block.
    ///
    /// Checks run in a fixed order: the texture must be present and registered
    /// in `textures` (animation frames too), then the id must be free.
    pub fn build_block(
        &mut self,
        textures: &TextureRegistry,
        id: &str,
        texture: Option<Arc<Texture>>,
        position: IVec2,
        physics: Option<Behaviors>,
        animation: Option<Animation>,
    ) -> EngineResult<Arc<Block>> {
        let texture = texture.ok_or_else(|| {
            EngineError::InvalidTexture(format!("block '{id}' was given no texture"))
        })?;
        if !textures.is_registered(&texture) {
            return Err(EngineError::InvalidTexture(format!(
                "texture '{}' used by block '{id}' is not registered",
                texture.id
            )));
        }
        let animation = animation.unwrap_or_default();
        if let Some(frame) = animation.frames.iter().find(|f| !textures.is_registered(f)) {
            return Err(EngineError::InvalidTexture(format!(
                "animation frame '{}' used by block '{id}' is not registered",
                frame.id
            )));
        }
        if self.blocks.iter().any(|b| b.id == id) {
            return Err(EngineError::duplicate_id("Block", id));
        }

        let block = Arc::new(Block {
            id: id.to_string(),
            texture,
            position,
            physics: physics.unwrap_or_default(),
            animation,
        });
        self.blocks.push(Arc::clone(&block));
        log::debug!("Block '{id}' built at ({}, {})", position.x, position.y);
        Ok(block)
    }

    pub fn block(&self, id: &str) -> EngineResult<Arc<Block>> {
        self.blocks
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("Block", id))
    }

    pub fn remove_block(&mut self, id: &str) -> Option<Arc<Block>> {
        remove_by(&mut self.blocks, |b| b.id == id)
    }

    pub fn blocks(&self) -> &[Arc<Block>] {
        &self.blocks
    }

    pub fn build_sprite(&mut self, id: &str, block_ids: &[&str]) -> EngineResult<Arc<Sprite>> {
        if self.sprites.iter().any(|s| s.id == id) {
            return Err(EngineError::duplicate_id("Sprite", id));
        }
        if block_ids.is_empty() {
            return Err(EngineError::InvalidInput(format!(
                "sprite '{id}' needs at least one block"
            )));
        }
        let blocks = block_ids
            .iter()
            .map(|block_id| self.block(block_id))
            .collect::<EngineResult<Vec<_>>>()?;

        let sprite = Arc::new(Sprite {
            id: id.to_string(),
            blocks,
        });
        self.sprites.push(Arc::clone(&sprite));
        log::debug!("Sprite '{id}' built from {} blocks", block_ids.len());
        Ok(sprite)
    }

    pub fn sprite(&self, id: &str) -> EngineResult<Arc<Sprite>> {
        self.sprites
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("Sprite", id))
    }

    pub fn remove_sprite(&mut self, id: &str) -> Option<Arc<Sprite>> {
        remove_by(&mut self.sprites, |s| s.id == id)
    }

    pub fn sprites(&self) -> &[Arc<Sprite>] {
        &self.sprites
    }

    pub fn build_animation(
        &mut self,
        textures: &TextureRegistry,
        id: &str,
        frame_ids: &[&str],
    ) -> EngineResult<Arc<AnimationClip>> {
        if self.animations.iter().any(|a| a.id == id) {
            return Err(EngineError::duplicate_id("Animation", id));
        }
        if frame_ids.is_empty() {
            return Err(EngineError::InvalidInput(format!(
                "animation '{id}' needs at least one frame"
            )));
        }
        let frames = frame_ids
            .iter()
            .map(|frame_id| {
                textures.find(frame_id).cloned().ok_or_else(|| {
                    EngineError::InvalidTexture(format!(
                        "animation frame '{frame_id}' used by '{id}' is not registered"
                    ))
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let clip = Arc::new(AnimationClip {
            id: id.to_string(),
            frames,
        });
        self.animations.push(Arc::clone(&clip));
        Ok(clip)
    }

    pub fn animation(&self, id: &str) -> EngineResult<Arc<AnimationClip>> {
        self.animations
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("Animation", id))
    }

    pub fn remove_animation(&mut self, id: &str) -> Option<Arc<AnimationClip>> {
        remove_by(&mut self.animations, |a| a.id == id)
    }

    pub fn animations(&self) -> &[Arc<AnimationClip>] {
        &self.animations
    }

    /// Describe the first stored asset that still draws with `texture`.
    pub fn texture_user(&self, texture: &Arc<Texture>) -> Option<String> {
        if let Some(block) = self.blocks.iter().find(|b| b.uses_texture(texture)) {
            return Some(format!("block '{}'", block.id));
        }
        // Sprites hold their own block handles, which outlive removal from `blocks`.
        if let Some(sprite) = self
            .sprites
            .iter()
            .find(|s| s.blocks.iter().any(|b| b.uses_texture(texture)))
        {
            return Some(format!("sprite '{}'", sprite.id));
        }
        self.animations
            .iter()
            .find(|a| a.frames.iter().any(|f| Arc::ptr_eq(f, texture)))
            .map(|a| format!("animation '{}'", a.id))
    }
}

fn remove_by<T>(items: &mut Vec<Arc<T>>, matches: impl Fn(&T) -> bool) -> Option<Arc<T>> {
    let pos = items.iter().position(|item| matches(&**item))?;
    Some(items.remove(pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{BehaviorEntry, BehaviorKind};
    use fsce_render::{ImageHandle, Rgba};

    fn registry(ids: &[&str]) -> TextureRegistry {
        let mut textures = TextureRegistry::new();
        for id in ids {
            textures
                .insert(id, ImageHandle::solid(2, 2, Rgba([9, 9, 9, 255])))
                .expect("insert texture");
        }
        textures
    }

    fn build(
        store: &mut AssetStore,
        textures: &TextureRegistry,
        id: &str,
    ) -> EngineResult<Arc<Block>> {
        let texture = textures.find("brick").cloned();
        store.build_block(textures, id, texture, IVec2::new(1, 1), None, None)
    }

    #[test]
    fn build_block_applies_defaults() {
        let textures = registry(&["brick"]);
        let mut store = AssetStore::new();
        let block = build(&mut store, &textures, "b1").expect("block should build");

        assert!(block.is_visible());
        assert!(!block.animation.is_animated);
        assert!(block.animation.frames.is_empty());
        assert_eq!(store.block("b1").expect("stored"), block);
    }

    #[test]
    fn duplicate_block_fails_and_keeps_one() {
        let textures = registry(&["brick"]);
        let mut store = AssetStore::new();
        build(&mut store, &textures, "dup").expect("first");

        let err = build(&mut store, &textures, "dup").expect_err("second");
        assert!(matches!(err, EngineError::DuplicateId { kind: "Block", .. }));
        assert_eq!(store.blocks().len(), 1);
    }

    #[test]
    fn missing_or_foreign_texture_is_invalid() {
        let textures = registry(&["brick"]);
        let mut store = AssetStore::new();

        let err = store
            .build_block(&textures, "b", None, IVec2::ONE, None, None)
            .expect_err("no texture");
        assert!(matches!(err, EngineError::InvalidTexture(_)));

        let foreign = registry(&["brick"]).get("brick").expect("foreign texture");
        let err = store
            .build_block(&textures, "b", Some(foreign), IVec2::ONE, None, None)
            .expect_err("unregistered texture");
        assert!(matches!(err, EngineError::InvalidTexture(_)));
        assert!(store.blocks().is_empty());
    }

    #[test]
    fn texture_check_runs_before_duplicate_check() {
        let textures = registry(&["brick"]);
        let mut store = AssetStore::new();
        build(&mut store, &textures, "b").expect("first");

        let err = store
            .build_block(&textures, "b", None, IVec2::ONE, None, None)
            .expect_err("bad texture and duplicate id");
        assert!(matches!(err, EngineError::InvalidTexture(_)));
    }

    #[test]
    fn unregistered_animation_frame_is_invalid() {
        let textures = registry(&["brick"]);
        let stray = registry(&["stray"]).get("stray").expect("stray");
        let mut store = AssetStore::new();

        let err = store
            .build_block(
                &textures,
                "anim",
                textures.find("brick").cloned(),
                IVec2::ONE,
                None,
                Some(Animation::looping(vec![stray])),
            )
            .expect_err("stray frame");
        assert!(matches!(err, EngineError::InvalidTexture(_)));
    }

    #[test]
    fn explicit_physics_is_kept() {
        let textures = registry(&["brick"]);
        let mut store = AssetStore::new();
        let hidden = Behaviors::from_entries([BehaviorEntry::new(BehaviorKind::Visibility, false)]);
        let block = store
            .build_block(
                &textures,
                "ghost",
                textures.find("brick").cloned(),
                IVec2::new(2, 3),
                Some(hidden),
                None,
            )
            .expect("block");
        assert!(!block.is_visible());
        assert_eq!(block.position, IVec2::new(2, 3));
    }

    #[test]
    fn remove_absent_block_is_noop_and_preserves_order() {
        let textures = registry(&["brick"]);
        let mut store = AssetStore::new();
        for id in ["a", "b", "c"] {
            build(&mut store, &textures, id).expect("build");
        }

        assert!(store.remove_block("zzz").is_none());
        assert!(store.remove_block("b").is_some());
        let ids: Vec<&str> = store.blocks().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn sprites_reference_existing_blocks() {
        let textures = registry(&["brick"]);
        let mut store = AssetStore::new();
        build(&mut store, &textures, "head").expect("head");
        build(&mut store, &textures, "body").expect("body");

        let sprite = store.build_sprite("hero", &["head", "body"]).expect("sprite");
        assert_eq!(sprite.blocks.len(), 2);

        assert!(matches!(
            store.build_sprite("hero", &["head"]),
            Err(EngineError::DuplicateId { kind: "Sprite", .. })
        ));
        assert!(matches!(
            store.build_sprite("ghost", &["legs"]),
            Err(EngineError::NotFound { kind: "Block", .. })
        ));
        assert!(matches!(
            store.build_sprite("empty", &[]),
            Err(EngineError::InvalidInput(_))
        ));
        assert_eq!(store.sprites().len(), 1);

        assert!(store.remove_sprite("hero").is_some());
        assert!(store.sprite("hero").is_err());
    }

    #[test]
    fn animations_resolve_registered_frames() {
        let textures = registry(&["walk0", "walk1"]);
        let mut store = AssetStore::new();

        let clip = store
            .build_animation(&textures, "walk", &["walk0", "walk1"])
            .expect("clip");
        assert_eq!(clip.frames.len(), 2);
        assert!(clip.to_animation().is_animated);

        assert!(matches!(
            store.build_animation(&textures, "walk", &["walk0"]),
            Err(EngineError::DuplicateId { .. })
        ));
        assert!(matches!(
            store.build_animation(&textures, "run", &["run0"]),
            Err(EngineError::InvalidTexture(_))
        ));
        assert!(matches!(
            store.build_animation(&textures, "idle", &[]),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(store.remove_animation("walk").is_some());
        assert!(store.animations().is_empty());
    }

    #[test]
    fn texture_user_finds_blocks_and_clips() {
        let textures = registry(&["brick", "walk0"]);
        let brick = textures.get("brick").expect("brick");
        let walk0 = textures.get("walk0").expect("walk0");
        let mut store = AssetStore::new();

        assert_eq!(store.texture_user(&brick), None);
        build(&mut store, &textures, "wall").expect("wall");
        assert_eq!(store.texture_user(&brick).as_deref(), Some("block 'wall'"));

        store
            .build_animation(&textures, "walk", &["walk0"])
            .expect("clip");
        assert_eq!(store.texture_user(&walk0).as_deref(), Some("animation 'walk'"));
    }

    #[test]
    fn texture_user_sees_sprites_after_their_block_is_removed() {
        let textures = registry(&["brick"]);
        let brick = textures.get("brick").expect("brick");
        let mut store = AssetStore::new();
        build(&mut store, &textures, "b").expect("block");
        store.build_sprite("s", &["b"]).expect("sprite");
        store.remove_block("b");

        assert_eq!(store.texture_user(&brick).as_deref(), Some("sprite 's'"));
        store.remove_sprite("s");
        assert_eq!(store.texture_user(&brick), None);
    }
}
