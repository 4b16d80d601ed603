//! Drawable building blocks and the items layers hold.

use std::slice;
use std::sync::Arc;

use fsce_core::AnimationFrame;
use glam::IVec2;

use crate::behavior::Behaviors;
use crate::texture::Texture;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
    pub is_animated: bool,
    pub frames: Vec<Arc<Texture>>,
}

impl Animation {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn looping(frames: Vec<Arc<Texture>>) -> Self {
        Self {
            is_animated: true,
            frames,
        }
    }
}

/// One grid cell's worth of texture. `position` is in grid units, 1-based.
#[derive(Debug, PartialEq)]
pub struct Block {
    pub id: String,
    pub texture: Arc<Texture>,
    pub position: IVec2,
    pub physics: Behaviors,
    pub animation: Animation,
}

impl Block {
    pub fn is_visible(&self) -> bool {
        self.physics.is_visible()
    }

    /// Texture to draw on the given animation frame. Falls back to the base
    /// texture when the block is not animated or has no frames.
    pub fn current_texture(&self, frame: &AnimationFrame) -> &Arc<Texture> {
        if self.animation.is_animated {
            if let Some(index) = frame.index_for(self.animation.frames.len()) {
                return &self.animation.frames[index];
            }
        }
        &self.texture
    }

    pub fn uses_texture(&self, texture: &Arc<Texture>) -> bool {
        Arc::ptr_eq(&self.texture, texture)
            || self.animation.frames.iter().any(|f| Arc::ptr_eq(f, texture))
    }
}

/// Several blocks that make up one logical entity.
#[derive(Debug)]
pub struct Sprite {
    pub id: String,
    pub blocks: Vec<Arc<Block>>,
}

/// Named frame sequence kept in the asset store for reuse across blocks.
#[derive(Debug)]
pub struct AnimationClip {
    pub id: String,
    pub frames: Vec<Arc<Texture>>,
}

impl AnimationClip {
    pub fn to_animation(&self) -> Animation {
        Animation::looping(self.frames.clone())
    }
}

/// Anything a layer can hold. Two items are equal only when they share the
/// same underlying block or sprite instance.
#[derive(Debug, Clone)]
pub enum Item {
    Block(Arc<Block>),
    Sprite(Arc<Sprite>),
}

impl Item {
    pub fn id(&self) -> &str {
        match self {
            Item::Block(block) => &block.id,
            Item::Sprite(sprite) => &sprite.id,
        }
    }

    /// Blocks to draw for this item, in order.
    pub fn blocks(&self) -> slice::Iter<'_, Arc<Block>> {
        match self {
            Item::Block(block) => slice::from_ref(block).iter(),
            Item::Sprite(sprite) => sprite.blocks.iter(),
        }
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Item::Block(a), Item::Block(b)) => Arc::ptr_eq(a, b),
            (Item::Sprite(a), Item::Sprite(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Arc<Block>> for Item {
    fn from(block: Arc<Block>) -> Self {
        Item::Block(block)
    }
}

impl From<Arc<Sprite>> for Item {
    fn from(sprite: Arc<Sprite>) -> Self {
        Item::Sprite(sprite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{Behavior, BehaviorKind};
    use fsce_render::{ImageHandle, Rgba};

    fn texture(id: &str) -> Arc<Texture> {
        Arc::new(Texture {
            id: id.to_string(),
            image: ImageHandle::solid(1, 1, Rgba([0, 0, 0, 255])),
        })
    }

    fn block(id: &str, texture: Arc<Texture>, animation: Animation) -> Arc<Block> {
        Arc::new(Block {
            id: id.to_string(),
            texture,
            position: IVec2::new(1, 1),
            physics: Behaviors::default(),
            animation,
        })
    }

    #[test]
    fn static_block_draws_base_texture() {
        let base = texture("base");
        let b = block("b", Arc::clone(&base), Animation::none());
        let mut frame = AnimationFrame::new(8);
        frame.advance();
        assert!(Arc::ptr_eq(b.current_texture(&frame), &base));
    }

    #[test]
    fn animated_block_cycles_frames_modulo_length() {
        let frames = vec![texture("f0"), texture("f1"), texture("f2")];
        let b = block("b", texture("base"), Animation::looping(frames.clone()));
        let mut frame = AnimationFrame::new(8);
        for _ in 0..4 {
            frame.advance();
        }
        assert!(Arc::ptr_eq(b.current_texture(&frame), &frames[1]));
    }

    #[test]
    fn animated_block_without_frames_falls_back() {
        let base = texture("base");
        let b = block("b", Arc::clone(&base), Animation::looping(Vec::new()));
        assert!(Arc::ptr_eq(b.current_texture(&AnimationFrame::default()), &base));
    }

    #[test]
    fn visibility_comes_from_physics() {
        let mut b = Block {
            id: "b".to_string(),
            texture: texture("t"),
            position: IVec2::ONE,
            physics: Behaviors::default(),
            animation: Animation::none(),
        };
        assert!(b.is_visible());
        b.physics.set(BehaviorKind::Visibility, Behavior::disabled());
        assert!(!b.is_visible());
    }

    #[test]
    fn item_equality_is_identity() {
        let t = texture("t");
        let a = block("same", Arc::clone(&t), Animation::none());
        let b = block("same", t, Animation::none());

        assert_eq!(Item::from(Arc::clone(&a)), Item::Block(Arc::clone(&a)));
        assert_ne!(Item::from(a), Item::from(b));
    }

    #[test]
    fn sprite_item_yields_its_blocks_in_order() {
        let t = texture("t");
        let sprite = Arc::new(Sprite {
            id: "hero".to_string(),
            blocks: vec![
                block("head", Arc::clone(&t), Animation::none()),
                block("body", t, Animation::none()),
            ],
        });
        let item = Item::from(sprite);
        let ids: Vec<&str> = item.blocks().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["head", "body"]);
        assert_eq!(item.id(), "hero");
    }
}
