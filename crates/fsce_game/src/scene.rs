use fsce_core::{EngineResult, ErrorSink};
use fsce_engine::{BehaviorEntry, Behaviors, Engine, Item, Variable};
use fsce_render::ImageLoader;
use glam::IVec2;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

const SUPPORTED_VERSION: &str = "0.1";

#[derive(Debug, Deserialize, Clone)]
pub struct SceneFile {
    pub version: String,
    pub scene_id: String,
    #[serde(default)]
    pub textures: Vec<SceneTexture>,
    #[serde(default)]
    pub animations: Vec<SceneAnimation>,
    #[serde(default)]
    pub blocks: Vec<SceneBlock>,
    #[serde(default)]
    pub sprites: Vec<SceneSprite>,
    pub layers: Vec<SceneLayer>,
    #[serde(default)]
    pub variables: BTreeMap<String, Variable>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SceneTexture {
    pub id: String,
    /// Locator handed to the image loader, relative to the image library.
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SceneAnimation {
    pub id: String,
    pub frames: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SceneBlock {
    pub id: String,
    pub texture: String,
    pub x: i32,
    pub y: i32,
    /// Omitted means the default behaviors (visible).
    #[serde(default)]
    pub physics: Option<Vec<BehaviorEntry>>,
    #[serde(default)]
    pub animation: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SceneSprite {
    pub id: String,
    pub blocks: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SceneLayer {
    pub name: String,
    #[serde(default)]
    pub index: Option<i32>,
    #[serde(default)]
    pub items: Vec<SceneItem>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SceneItem {
    #[serde(default)]
    pub block: Option<String>,
    #[serde(default)]
    pub sprite: Option<String>,
}

pub fn load_scene_from_path(scene_path: &Path) -> Result<SceneFile, String> {
    let raw = fs::read_to_string(scene_path)
        .map_err(|e| format!("Failed to read scene file {}: {e}", scene_path.display()))?;
    let scene: SceneFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse scene JSON {}: {e}", scene_path.display()))?;
    validate_scene(&scene)?;
    Ok(scene)
}

fn unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<HashSet<&'a str>, String> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(format!("Scene validation failed: duplicate {kind} id '{id}'"));
        }
    }
    Ok(seen)
}

fn validate_scene(scene: &SceneFile) -> Result<(), String> {
    // Every reference is resolved here so apply_scene only fails on load errors.
    if scene.version != SUPPORTED_VERSION {
        return Err(format!(
            "Scene validation failed: unsupported version '{}' (expected '{SUPPORTED_VERSION}')",
            scene.version
        ));
    }
    if scene.layers.is_empty() {
        return Err("Scene validation failed: layers array is empty".to_string());
    }

    let textures = unique("texture", scene.textures.iter().map(|t| t.id.as_str()))?;
    let animations = unique("animation", scene.animations.iter().map(|a| a.id.as_str()))?;
    let blocks = unique("block", scene.blocks.iter().map(|b| b.id.as_str()))?;
    let sprites = unique("sprite", scene.sprites.iter().map(|s| s.id.as_str()))?;
    unique("layer", scene.layers.iter().map(|l| l.name.as_str()))?;

    for animation in &scene.animations {
        if animation.frames.is_empty() {
            return Err(format!(
                "Scene validation failed: animation '{}' has no frames",
                animation.id
            ));
        }
        if let Some(frame) = animation.frames.iter().find(|f| !textures.contains(f.as_str())) {
            return Err(format!(
                "Scene validation failed: animation '{}' references unknown texture '{frame}'",
                animation.id
            ));
        }
    }

    for block in &scene.blocks {
        if !textures.contains(block.texture.as_str()) {
            return Err(format!(
                "Scene validation failed: block '{}' references unknown texture '{}'",
                block.id, block.texture
            ));
        }
        if let Some(animation) = &block.animation {
            if !animations.contains(animation.as_str()) {
                return Err(format!(
                    "Scene validation failed: block '{}' references unknown animation '{animation}'",
                    block.id
                ));
            }
        }
    }

    for sprite in &scene.sprites {
        if sprite.blocks.is_empty() {
            return Err(format!(
                "Scene validation failed: sprite '{}' has no blocks",
                sprite.id
            ));
        }
        if let Some(block) = sprite.blocks.iter().find(|b| !blocks.contains(b.as_str())) {
            return Err(format!(
                "Scene validation failed: sprite '{}' references unknown block '{block}'",
                sprite.id
            ));
        }
    }

    let mut explicit_indices = HashSet::new();
    for layer in &scene.layers {
        if let Some(index) = layer.index {
            if !explicit_indices.insert(index) {
                return Err(format!(
                    "Scene validation failed: layer '{}' reuses index {index}",
                    layer.name
                ));
            }
        }
        if layer.items.is_empty() {
            log::warn!(
                "Scene layer '{}' has no items. This is allowed but often accidental.",
                layer.name
            );
        }
        for item in &layer.items {
            match (&item.block, &item.sprite) {
                (Some(block), None) if !blocks.contains(block.as_str()) => {
                    return Err(format!(
                        "Scene validation failed: layer '{}' references unknown block '{block}'",
                        layer.name
                    ));
                }
                (None, Some(sprite)) if !sprites.contains(sprite.as_str()) => {
                    return Err(format!(
                        "Scene validation failed: layer '{}' references unknown sprite '{sprite}'",
                        layer.name
                    ));
                }
                (Some(_), None) | (None, Some(_)) => {}
                _ => {
                    return Err(format!(
                        "Scene validation failed: items in layer '{}' must provide exactly one of 'block' or 'sprite'",
                        layer.name
                    ));
                }
            }
        }
    }

    Ok(())
}

/// Build everything a scene describes through the engine's own operations.
///
/// Stops at the first failure; the engine has already reported it to its sink.
pub async fn apply_scene<S, L>(
    engine: &mut Engine<S>,
    loader: &L,
    scene: &SceneFile,
) -> EngineResult<()>
where
    S: ErrorSink,
    L: ImageLoader,
{
    for texture in &scene.textures {
        engine.build_texture(loader, &texture.url, &texture.id).await?;
    }

    for animation in &scene.animations {
        let frames: Vec<&str> = animation.frames.iter().map(String::as_str).collect();
        engine.build_animation(&animation.id, &frames)?;
    }

    for block in &scene.blocks {
        let texture = engine.texture(&block.texture)?;
        let physics = block.physics.clone().map(Behaviors::from_entries);
        let animation = match &block.animation {
            Some(id) => Some(engine.animation(id)?.to_animation()),
            None => None,
        };
        engine.build_block(
            &block.id,
            Some(texture),
            IVec2::new(block.x, block.y),
            physics,
            animation,
        )?;
    }

    for sprite in &scene.sprites {
        let block_ids: Vec<&str> = sprite.blocks.iter().map(String::as_str).collect();
        engine.build_sprite(&sprite.id, &block_ids)?;
    }

    for layer in &scene.layers {
        engine.create_layer(&layer.name, layer.index)?;
        for item in &layer.items {
            let item = match (&item.block, &item.sprite) {
                (Some(block), _) => Item::from(engine.block(block)?),
                (None, Some(sprite)) => Item::from(engine.sprite(sprite)?),
                (None, None) => continue,
            };
            engine.insert_item(item, &layer.name)?;
        }
    }

    for (name, value) in &scene.variables {
        engine.set_variable(name, value.clone())?;
    }

    log::info!(
        "Scene '{}' applied: {} textures, {} blocks, {} sprites, {} layers",
        scene.scene_id,
        scene.textures.len(),
        scene.blocks.len(),
        scene.sprites.len(),
        scene.layers.len()
    );
    Ok(())
}
