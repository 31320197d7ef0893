use std::collections::HashMap;

use egui::{Context, Rect, TextureHandle, TextureId, TextureOptions, Vec2};
use log::{debug, warn};

use crate::element::Element;
use crate::geometry::BoundsLookup;
use crate::id_generator::ElementId;
use crate::rasterizer::{ImageStore, RasterError, RasterizedElement, Rasterizer};
use crate::state::DesignState;

/// Everything that can change an element's raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureKey {
    pub element_id: ElementId,
    pub revision: u64,
    pub bitmap_version: u64,
}

impl TextureKey {
    pub fn for_element(element: &Element, images: &ImageStore) -> Self {
        Self {
            element_id: element.id(),
            revision: element.revision(),
            bitmap_version: images.bitmap_version(element.id()),
        }
    }
}

struct CachedTexture {
    key: TextureKey,
    handle: TextureHandle,
    texture: ElementTexture,
    last_used: u64,
}

/// A texture ready to paint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementTexture {
    pub id: TextureId,
    /// Covered area relative to the element position
    pub content_bounds: Rect,
    /// Buffer size in pixels, drawn 1:1 in points
    pub size: Vec2,
}

/// Manages textures for elements, providing caching and invalidation.
/// One texture is kept per element; a new key replaces the old texture.
pub struct TextureManager {
    texture_cache: HashMap<ElementId, CachedTexture>,
    /// Current frame counter for LRU tracking
    current_frame: u64,
    max_cache_size: usize,
    generations: u64,
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            current_frame: 0,
            max_cache_size: max_cache_size.max(1),
            generations: 0,
        }
    }

    /// Increments the frame counter, should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Gets or creates a texture for `key`
    pub fn get_or_create_texture<F>(
        &mut self,
        key: TextureKey,
        generator: F,
        ctx: &Context,
    ) -> Result<ElementTexture, RasterError>
    where
        F: FnOnce() -> Result<RasterizedElement, RasterError>,
    {
        if let Some(cached) = self.texture_cache.get_mut(&key.element_id) {
            if cached.key == key {
                cached.last_used = self.current_frame;
                return Ok(cached.texture);
            }
        }

        let raster = generator()?;
        self.generations += 1;

        let name = format!("element_{}_r{}_b{}", key.element_id, key.revision, key.bitmap_version);
        let handle = ctx.load_texture(name, raster.to_color_image(), TextureOptions::LINEAR);
        debug!("Rasterized {} (revision {})", key.element_id, key.revision);

        let texture = ElementTexture {
            id: handle.id(),
            content_bounds: raster.centered_bounds(),
            size: raster.extent(),
        };
        self.texture_cache.insert(
            key.element_id,
            CachedTexture {
                key,
                handle,
                texture,
                last_used: self.current_frame,
            },
        );
        self.prune_cache_if_needed();
        Ok(texture)
    }

    /// Rasterize on demand; failures are logged and the element is skipped
    pub fn texture_for(
        &mut self,
        element: &Element,
        images: &ImageStore,
        rasterizer: &Rasterizer,
        ctx: &Context,
    ) -> Option<ElementTexture> {
        let key = TextureKey::for_element(element, images);
        let bitmap = images.bitmap(element.id());
        match self.get_or_create_texture(key, || rasterizer.rasterize(element, bitmap), ctx) {
            Ok(texture) => Some(texture),
            Err(err) => {
                warn!("Skipping {} this frame: {err}", element.id());
                None
            }
        }
    }

    pub fn invalidate_element(&mut self, element_id: ElementId) {
        self.texture_cache.remove(&element_id);
    }

    /// Drop textures of elements that no longer exist
    pub fn retain_existing(&mut self, design: &DesignState) {
        self.texture_cache.retain(|id, _| design.contains(*id));
    }

    /// Prunes the cache if it exceeds the maximum size
    fn prune_cache_if_needed(&mut self) {
        if self.texture_cache.len() <= self.max_cache_size {
            return;
        }

        let mut entries: Vec<(ElementId, u64)> = self
            .texture_cache
            .iter()
            .map(|(id, cached)| (*id, cached.last_used))
            .collect();

        // Oldest first
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = entries.len() - self.max_cache_size;
        for (id, _) in entries.iter().take(to_remove) {
            self.texture_cache.remove(id);
        }
    }

    pub fn clear_cache(&mut self) {
        self.texture_cache.clear();
    }

    /// Returns the number of textures currently in the cache
    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    /// How many rasterizations have run since creation
    pub fn generation_count(&self) -> u64 {
        self.generations
    }

    pub fn cached_key(&self, element_id: ElementId) -> Option<TextureKey> {
        self.texture_cache.get(&element_id).map(|cached| cached.key)
    }
}

impl BoundsLookup for TextureManager {
    fn content_bounds(&self, element: &Element) -> Option<Rect> {
        self.texture_cache
            .get(&element.id())
            .map(|cached| cached.texture.content_bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementPatch;
    use crate::id_generator::generate_id;
    use crate::rasterizer::{BlobStore, FontManager, ImageLoader};
    use egui::{Pos2, Vec2};
    use image::RgbaImage;

    fn mock_raster() -> Result<RasterizedElement, RasterError> {
        Ok(RasterizedElement {
            pixels: RgbaImage::new(8, 8),
            content_bounds: Rect::from_min_size(Pos2::ZERO, Vec2::splat(8.0)),
        })
    }

    fn key(element_id: ElementId, revision: u64) -> TextureKey {
        TextureKey {
            element_id,
            revision,
            bitmap_version: 0,
        }
    }

    #[test]
    fn test_cache_hit() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        let id = generate_id();

        let first = manager.get_or_create_texture(key(id, 0), mock_raster, &ctx).unwrap();
        let second = manager.get_or_create_texture(key(id, 0), mock_raster, &ctx).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(manager.cache_size(), 1);
        assert_eq!(manager.generation_count(), 1);
    }

    #[test]
    fn test_new_revision_replaces_texture() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        let id = generate_id();

        manager.get_or_create_texture(key(id, 0), mock_raster, &ctx).unwrap();
        manager.get_or_create_texture(key(id, 1), mock_raster, &ctx).unwrap();

        assert_eq!(manager.cache_size(), 1);
        assert_eq!(manager.cached_key(id), Some(key(id, 1)));
        assert_eq!(manager.generation_count(), 2);
    }

    #[test]
    fn test_lru_eviction() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(2);
        let (a, b, c) = (generate_id(), generate_id(), generate_id());

        manager.get_or_create_texture(key(a, 0), mock_raster, &ctx).unwrap();
        manager.begin_frame();
        manager.get_or_create_texture(key(b, 0), mock_raster, &ctx).unwrap();
        manager.begin_frame();
        manager.get_or_create_texture(key(c, 0), mock_raster, &ctx).unwrap();

        assert_eq!(manager.cache_size(), 2);
        assert!(manager.cached_key(a).is_none());
        assert!(manager.cached_key(b).is_some());
        assert!(manager.cached_key(c).is_some());
    }

    #[test]
    fn test_position_change_reuses_texture() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        let rasterizer = Rasterizer::new(64, FontManager::bundled_only());
        let images = ImageStore::new(ImageLoader::new(BlobStore::new()));
        let mut design = DesignState::new();
        let id = design.add_text("Hi", 16.0, egui::Color32::BLACK, "Arial");

        for step in 0..5 {
            design.move_element(id, 20.0 + step as f32, 30.0);
            let element = design.get(id).unwrap();
            assert!(manager.texture_for(element, &images, &rasterizer, &ctx).is_some());
        }
        assert_eq!(manager.generation_count(), 1);

        design.update_element(id, &ElementPatch::new().bold(true));
        manager.texture_for(design.get(id).unwrap(), &images, &rasterizer, &ctx);
        assert_eq!(manager.generation_count(), 2);
    }

    #[test]
    fn test_bounds_are_relative_to_element_center() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        let id = generate_id();

        let texture = manager.get_or_create_texture(key(id, 0), mock_raster, &ctx).unwrap();
        assert_eq!(texture.size, Vec2::splat(8.0));
        assert_eq!(texture.content_bounds, Rect::from_center_size(Pos2::ZERO, Vec2::splat(8.0)));
    }

    #[test]
    fn test_failures_are_skipped() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        let rasterizer = Rasterizer::new(0, FontManager::bundled_only());
        let images = ImageStore::new(ImageLoader::new(BlobStore::new()));

        let element = Element::image("x.png");
        assert!(manager.texture_for(&element, &images, &rasterizer, &ctx).is_none());
        assert_eq!(manager.cache_size(), 0);
    }
}
