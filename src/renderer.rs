use eframe::egui::{self, Color32, Painter, Pos2, Rect, Stroke};
use log::debug;

use crate::config::DesignerConfig;
use crate::element::{PRINTABLE_MAX, PRINTABLE_MIN};
use crate::geometry::{CanvasTransform, HANDLE_RADIUS, element_screen_rect};
use crate::id_generator::ElementId;
use crate::projector::DecalTexture;
use crate::rasterizer::{
    BlobStore, ChainedSource, FontManager, FsImageSource, ImageLoader, ImageStore, Rasterizer,
};
use crate::state::DesignState;
use crate::texture_manager::{ElementTexture, TextureManager};
use crate::widgets::{Corner, HANDLE_FILL, ResizeHandle};

const FULL_UV: Rect = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
const PRINTABLE_STROKE: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 60);

/// Owns the raster pipeline and paints the flat design overlay
pub struct Renderer {
    rasterizer: Rasterizer,
    textures: TextureManager,
    images: ImageStore,
    blobs: BlobStore,
}

impl Renderer {
    pub fn new(config: &DesignerConfig) -> Self {
        let blobs = BlobStore::new();
        let source = ChainedSource::new()
            .with(blobs.clone())
            .with(FsImageSource::new());
        Self {
            rasterizer: Rasterizer::new(config.texture_size, FontManager::new()),
            textures: TextureManager::new(config.texture_cache_size),
            images: ImageStore::new(ImageLoader::new(source)),
            blobs,
        }
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    pub fn buffer_size(&self) -> u32 {
        self.rasterizer.buffer_size()
    }

    /// Reconcile image loads and the texture cache with the design.
    /// Returns true while loads are still in flight.
    pub fn begin_frame(&mut self, design: &DesignState) -> bool {
        self.textures.begin_frame();
        self.images.sync(design);
        let applied = self.images.poll(design);
        if applied > 0 {
            debug!("Applied {applied} finished image loads");
        }
        self.textures.retain_existing(design);
        self.images.has_pending()
    }

    /// Texture for any element of any view, rasterized on first use
    pub fn texture_for(
        &mut self,
        ctx: &egui::Context,
        design: &DesignState,
        id: ElementId,
    ) -> Option<ElementTexture> {
        let (_, element) = design.find(id)?;
        self.textures
            .texture_for(element, &self.images, &self.rasterizer, ctx)
    }

    /// The element's texture sized for the 3D preview
    pub fn decal_texture(
        &mut self,
        ctx: &egui::Context,
        design: &DesignState,
        id: ElementId,
    ) -> Option<DecalTexture> {
        let buffer = self.buffer_size() as f32;
        self.texture_for(ctx, design, id).map(|texture| DecalTexture {
            id: texture.id,
            extent: texture.size / buffer,
        })
    }

    /// Paint the active view: garment backdrop, elements in order, then the
    /// selection frame with its handles
    pub fn paint_canvas(
        &mut self,
        ctx: &egui::Context,
        painter: &Painter,
        transform: &CanvasTransform,
        design: &DesignState,
        garment_color: Color32,
        hovered_corner: Option<Corner>,
    ) {
        let canvas = transform.rect();
        painter.rect_filled(canvas, 8.0, garment_color);
        let printable = Rect::from_min_max(
            transform.to_screen(Pos2::new(PRINTABLE_MIN, PRINTABLE_MIN)),
            transform.to_screen(Pos2::new(PRINTABLE_MAX, PRINTABLE_MAX)),
        );
        painter.rect_stroke(printable, 0.0, Stroke::new(1.0, PRINTABLE_STROKE));

        let canvas_painter = painter.with_clip_rect(canvas);
        for element in design.active_elements() {
            let Some(texture) = self
                .textures
                .texture_for(element, &self.images, &self.rasterizer, ctx)
            else {
                continue;
            };
            let center = transform.to_screen(element.position());
            let rect = Rect::from_center_size(center, texture.size);
            canvas_painter.image(texture.id, rect, FULL_UV, Color32::WHITE);
        }

        if let Some(selected) = design.selected_element() {
            let frame =
                element_screen_rect(selected, transform, &self.textures, self.buffer_size());
            painter.rect_stroke(frame, 2.0, Stroke::new(1.5, HANDLE_FILL));
            for handle in ResizeHandle::around(frame, HANDLE_RADIUS) {
                handle.paint(painter, hovered_corner == Some(handle.corner()));
            }
        }
    }
}
