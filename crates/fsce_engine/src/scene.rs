//! Named, indexed layers of drawable items.
//!
//! Layers draw in ascending index order; items inside a layer draw in the
//! order they were inserted. Names and indices are both unique.

use std::sync::Arc;

use fsce_core::{EngineError, EngineResult};

use crate::block::{Block, Item};

#[derive(Debug, Clone)]
pub struct Layer {
    pub index: i32,
    pub name: String,
    pub items: Vec<Item>,
}

#[derive(Debug, Default)]
pub struct SceneGraph {
    layers: Vec<Layer>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty layer.
    ///
    /// Without an explicit `index` the layer gets the current layer count, or
    /// the next free index above it. An explicit index that is already taken
    /// is rejected.
    pub fn create_layer(&mut self, name: &str, index: Option<i32>) -> EngineResult<&Layer> {
        if self.layers.iter().any(|l| l.name == name) {
            return Err(EngineError::DuplicateName(name.to_string()));
        }
        let index = match index {
            Some(index) if self.index_taken(index) => {
                return Err(EngineError::DuplicateIndex(index));
            }
            Some(index) => index,
            None => {
                let mut candidate = i32::try_from(self.layers.len()).map_err(|_| {
                    EngineError::InvalidInput("too many layers".to_string())
                })?;
                while self.index_taken(candidate) {
                    candidate += 1;
                }
                candidate
            }
        };

        self.layers.push(Layer {
            index,
            name: name.to_string(),
            items: Vec::new(),
        });
        log::debug!("Layer '{name}' created at index {index}");
        Ok(&self.layers[self.layers.len() - 1])
    }

    fn index_taken(&self, index: i32) -> bool {
        self.layers.iter().any(|l| l.index == index)
    }

    pub fn remove_layer(&mut self, name: &str) -> Option<Layer> {
        let pos = self.layers.iter().position(|l| l.name == name)?;
        Some(self.layers.remove(pos))
    }

    pub fn layer(&self, name: &str) -> EngineResult<&Layer> {
        self.layers
            .iter()
            .find(|l| l.name == name)
            .ok_or_else(|| EngineError::not_found("Layer", name))
    }

    fn layer_mut(&mut self, name: &str) -> EngineResult<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|l| l.name == name)
            .ok_or_else(|| EngineError::not_found("Layer", name))
    }

    /// Layers in creation order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layers sorted by ascending index.
    pub fn draw_order(&self) -> Vec<&Layer> {
        let mut ordered: Vec<&Layer> = self.layers.iter().collect();
        ordered.sort_by_key(|l| l.index);
        ordered
    }

    pub fn layer_names(&self) -> Vec<&str> {
        self.draw_order().into_iter().map(|l| l.name.as_str()).collect()
    }

    /// Append `item` to the named layer. Never creates a layer.
    pub fn insert_item(&mut self, item: Item, layer: &str) -> EngineResult<()> {
        let target = self.layer_mut(layer)?;
        log::trace!("Item '{}' inserted into layer '{layer}'", item.id());
        target.items.push(item);
        Ok(())
    }

    /// Remove the first occurrence of this exact item instance. Returns false
    /// when the layer does not hold it.
    pub fn remove_item(&mut self, item: &Item, layer: &str) -> EngineResult<bool> {
        let target = self.layer_mut(layer)?;
        match target.items.iter().position(|i| i == item) {
            Some(pos) => {
                target.items.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Every block placed in any layer, sprites flattened.
    pub fn blocks(&self) -> impl Iterator<Item = &Arc<Block>> {
        self.layers
            .iter()
            .flat_map(|l| l.items.iter())
            .flat_map(|item| item.blocks())
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Behaviors;
    use crate::block::Animation;
    use crate::texture::Texture;
    use fsce_render::{ImageHandle, Rgba};
    use glam::IVec2;

    fn item(id: &str) -> Item {
        Item::Block(Arc::new(Block {
            id: id.to_string(),
            texture: Arc::new(Texture {
                id: "t".to_string(),
                image: ImageHandle::solid(1, 1, Rgba([0, 0, 0, 255])),
            }),
            position: IVec2::ONE,
            physics: Behaviors::default(),
            animation: Animation::none(),
        }))
    }

    #[test]
    fn default_index_is_layer_count() {
        let mut scene = SceneGraph::new();
        assert_eq!(scene.create_layer("bg", None).expect("bg").index, 0);
        assert_eq!(scene.create_layer("fg", None).expect("fg").index, 1);
    }

    #[test]
    fn default_index_skips_taken_values() {
        let mut scene = SceneGraph::new();
        scene.create_layer("top", Some(1)).expect("top");
        let next = scene.create_layer("next", None).expect("next");
        assert_eq!(next.index, 2);
    }

    #[test]
    fn duplicate_name_fails_and_leaves_state_unchanged() {
        let mut scene = SceneGraph::new();
        scene.create_layer("bg", Some(5)).expect("bg");
        let err = scene.create_layer("bg", Some(7)).expect_err("duplicate name");
        assert_eq!(err, EngineError::DuplicateName("bg".to_string()));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.layer("bg").expect("bg").index, 5);
    }

    #[test]
    fn explicit_index_collision_is_rejected() {
        let mut scene = SceneGraph::new();
        scene.create_layer("a", Some(3)).expect("a");
        let err = scene.create_layer("b", Some(3)).expect_err("collision");
        assert_eq!(err, EngineError::DuplicateIndex(3));
        assert!(scene.layer("b").is_err());
    }

    #[test]
    fn draw_order_is_ascending_index() {
        let mut scene = SceneGraph::new();
        scene.create_layer("two", Some(2)).expect("two");
        scene.create_layer("zero", Some(0)).expect("zero");
        scene.create_layer("one", Some(1)).expect("one");

        assert_eq!(scene.layer_names(), ["zero", "one", "two"]);
        let indices: Vec<i32> = scene.draw_order().iter().map(|l| l.index).collect();
        assert_eq!(indices, [0, 1, 2]);
    }

    #[test]
    fn negative_indices_draw_first() {
        let mut scene = SceneGraph::new();
        scene.create_layer("main", None).expect("main");
        scene.create_layer("sky", Some(-1)).expect("sky");
        assert_eq!(scene.layer_names(), ["sky", "main"]);
    }

    #[test]
    fn insert_into_missing_layer_fails_without_creating_it() {
        let mut scene = SceneGraph::new();
        let err = scene.insert_item(item("b1"), "bg").expect_err("no layers yet");
        assert!(matches!(err, EngineError::NotFound { kind: "Layer", .. }));
        assert!(scene.is_empty());
    }

    #[test]
    fn items_keep_insertion_order() {
        let mut scene = SceneGraph::new();
        scene.create_layer("bg", None).expect("bg");
        for id in ["a", "b", "c"] {
            scene.insert_item(item(id), "bg").expect("insert");
        }
        let ids: Vec<&str> = scene.layer("bg").expect("bg").items.iter().map(|i| i.id()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(scene.blocks().count(), 3);
    }

    #[test]
    fn remove_item_matches_identity() {
        let mut scene = SceneGraph::new();
        scene.create_layer("bg", None).expect("bg");
        let kept = item("same");
        let removed = item("same");
        scene.insert_item(kept.clone(), "bg").expect("insert kept");
        scene.insert_item(removed.clone(), "bg").expect("insert removed");

        assert!(scene.remove_item(&removed, "bg").expect("layer exists"));
        assert!(!scene.remove_item(&removed, "bg").expect("layer exists"));
        let layer = scene.layer("bg").expect("bg");
        assert_eq!(layer.items.len(), 1);
        assert_eq!(layer.items[0], kept);

        assert!(scene.remove_item(&kept, "fg").is_err());
    }

    #[test]
    fn remove_layer_absent_is_noop() {
        let mut scene = SceneGraph::new();
        scene.create_layer("a", None).expect("a");
        scene.create_layer("b", None).expect("b");
        assert!(scene.remove_layer("zzz").is_none());
        assert!(scene.remove_layer("a").is_some());
        assert_eq!(scene.layer_names(), ["b"]);
    }
}
