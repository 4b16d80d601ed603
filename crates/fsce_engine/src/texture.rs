use std::sync::Arc;

use fsce_core::{EngineError, EngineResult};
use fsce_render::{ImageHandle, ImageLoader};

/// A decoded image registered under an identifier. Immutable once built.
#[derive(Debug, PartialEq)]
pub struct Texture {
    pub id: String,
    pub image: ImageHandle,
}

/// Textures in registration order. Identifiers are unique.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    textures: Vec<Arc<Texture>>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `url` through `loader` and register the result as `id`.
    ///
    /// The duplicate check happens before loading, so a clashing id never
    /// touches the loader. A failed load adds nothing.
    pub async fn build<L: ImageLoader>(
        &mut self,
        loader: &L,
        url: &str,
        id: &str,
    ) -> EngineResult<Arc<Texture>> {
        if self.contains(id) {
            return Err(EngineError::duplicate_id("Texture", id));
        }
        let image = loader.load(url).await?;
        self.insert(id, image)
    }

    /// Register an already decoded image.
    pub fn insert(&mut self, id: &str, image: ImageHandle) -> EngineResult<Arc<Texture>> {
        if self.contains(id) {
            return Err(EngineError::duplicate_id("Texture", id));
        }
        let texture = Arc::new(Texture {
            id: id.to_string(),
            image,
        });
        self.textures.push(Arc::clone(&texture));
        log::debug!("Texture '{id}' registered ({} total)", self.textures.len());
        Ok(texture)
    }

    pub fn get(&self, id: &str) -> EngineResult<Arc<Texture>> {
        self.find(id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("Texture", id))
    }

    pub fn find(&self, id: &str) -> Option<&Arc<Texture>> {
        self.textures.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// True when this exact texture instance is registered here.
    pub fn is_registered(&self, texture: &Arc<Texture>) -> bool {
        self.textures.iter().any(|t| Arc::ptr_eq(t, texture))
    }

    /// Remove `id`, keeping the order of the rest. Absent ids are a no-op.
    pub fn remove(&mut self, id: &str) -> Option<Arc<Texture>> {
        let pos = self.textures.iter().position(|t| t.id == id)?;
        Some(self.textures.remove(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Texture>> {
        self.textures.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.textures.iter().map(|t| t.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsce_render::{spawn_load, MemoryImageLoader, Rgba};
    use std::thread;
    use std::time::Duration;

    /// Loader whose decode never finishes inside its timeout.
    struct StalledLoader;

    impl ImageLoader for StalledLoader {
        async fn load(&self, locator: &str) -> Result<ImageHandle, EngineError> {
            spawn_load(locator, Duration::from_millis(10), || {
                thread::sleep(Duration::from_millis(300));
                Ok(ImageHandle::solid(1, 1, Rgba([0, 0, 0, 255])))
            })
            .await
        }
    }

    fn loader() -> MemoryImageLoader {
        MemoryImageLoader::new()
            .with("brick.png", ImageHandle::solid(4, 4, Rgba([180, 60, 40, 255])))
            .with("grass.png", ImageHandle::solid(4, 4, Rgba([40, 180, 60, 255])))
    }

    #[test]
    fn build_registers_loaded_texture() {
        let mut registry = TextureRegistry::new();
        let texture = pollster::block_on(registry.build(&loader(), "brick.png", "brick"))
            .expect("brick should load");

        assert_eq!(texture.id, "brick");
        assert!(registry.is_registered(&texture));
        assert_eq!(registry.get("brick").expect("registered"), texture);
    }

    #[test]
    fn duplicate_id_fails_and_leaves_registry_unchanged() {
        let mut registry = TextureRegistry::new();
        let loader = loader();
        let first = pollster::block_on(registry.build(&loader, "brick.png", "t"))
            .expect("first build");

        let err = pollster::block_on(registry.build(&loader, "grass.png", "t"))
            .expect_err("duplicate id");
        assert!(matches!(err, EngineError::DuplicateId { kind: "Texture", .. }));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("t").expect("still there"), first);
    }

    #[test]
    fn same_source_under_two_ids_gives_independent_textures() {
        let mut registry = TextureRegistry::new();
        let loader = loader();
        let a = pollster::block_on(registry.build(&loader, "brick.png", "a")).expect("a");
        let b = pollster::block_on(registry.build(&loader, "brick.png", "b")).expect("b");

        assert!(!Arc::ptr_eq(&a, &b));
        registry.remove("a");
        assert!(registry.get("b").is_ok());
        assert!(registry.get("a").is_err());
    }

    #[test]
    fn failed_load_adds_nothing() {
        let mut registry = TextureRegistry::new();
        let err = pollster::block_on(registry.build(&loader(), "missing.png", "m"))
            .expect_err("unknown locator");
        assert!(matches!(err, EngineError::Load { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn timed_out_load_adds_nothing() {
        let mut registry = TextureRegistry::new();
        let err = pollster::block_on(registry.build(&StalledLoader, "slow.png", "slow"))
            .expect_err("load should time out");

        assert!(matches!(err, EngineError::Load { ref reason, .. } if reason.contains("timed out")));
        assert!(registry.is_empty());
        assert!(!registry.contains("slow"));
    }

    #[test]
    fn get_unknown_is_not_found() {
        let registry = TextureRegistry::new();
        assert!(matches!(
            registry.get("nope"),
            Err(EngineError::NotFound { kind: "Texture", .. })
        ));
    }

    #[test]
    fn remove_absent_is_noop_and_preserves_order() {
        let mut registry = TextureRegistry::new();
        let image = ImageHandle::solid(1, 1, Rgba([0, 0, 0, 255]));
        for id in ["a", "b", "c"] {
            registry.insert(id, image.clone()).expect("insert");
        }

        assert!(registry.remove("zzz").is_none());
        assert_eq!(registry.ids(), ["a", "b", "c"]);

        assert!(registry.remove("b").is_some());
        assert_eq!(registry.ids(), ["a", "c"]);
    }
}
