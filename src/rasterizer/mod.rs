//! Turns elements into RGBA buffers.
//!
//! The same buffer feeds both the 2D overlay and the decals of the 3D preview,
//! so an element is centered in its buffer and the buffer is placed centered
//! on the element's position. A buffer is `buffer_size` square unless the
//! content needs more room, in which case it grows so nothing is clipped.

use egui::{Color32, Pos2, Rect, Vec2};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use thiserror::Error;

mod blend;
pub mod font_manager;
pub mod image_loader;
pub mod text;

pub use font_manager::{FontManager, ResolvedFont};
pub use image_loader::{
    BLOB_PREFIX, BlobStore, ChainedSource, FsImageSource, ImageLoadError, ImageLoader,
    ImageSource, ImageStatus, ImageStore,
};

use crate::element::{Element, ElementKind, TextAlign, TextStyle};
use text::TextRun;

pub const DEFAULT_BUFFER_SIZE: u32 = 256;
pub const PLACEHOLDER_LABEL: &str = "Image";
pub const PLACEHOLDER_LABEL_SIZE: f32 = 16.0;
/// 10% black
pub const PLACEHOLDER_TINT: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 26);
/// Longest side of an image at scale 1, as a fraction of `buffer_size`
pub const IMAGE_BASE_FRACTION: f32 = 0.5;
const MAX_BUFFER_SIZE: u32 = 4096;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Invalid raster buffer size {0}")]
    InvalidDimensions(u32),
    #[error("No font available for {0:?}")]
    FontUnavailable(String),
}

/// A rendered element and the part of the buffer it actually covers
#[derive(Debug, Clone)]
pub struct RasterizedElement {
    pub pixels: RgbaImage,
    /// Buffer space, origin at the top-left pixel
    pub content_bounds: Rect,
}

impl RasterizedElement {
    pub fn size(&self) -> [usize; 2] {
        [self.pixels.width() as usize, self.pixels.height() as usize]
    }

    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.pixels.width() as f32, self.pixels.height() as f32)
    }

    /// `content_bounds` relative to the buffer center, which is the element position
    pub fn centered_bounds(&self) -> Rect {
        self.content_bounds.translate(-self.extent() / 2.0)
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(self.size(), self.pixels.as_raw())
    }
}

/// Smallest even side of at least `base` holding `needed` pixels
fn buffer_side(needed: f32, base: u32) -> u32 {
    let side = (needed.max(0.0).ceil() as u32).max(base).min(MAX_BUFFER_SIZE);
    side + side % 2
}

pub struct Rasterizer {
    buffer_size: u32,
    fonts: FontManager,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE, FontManager::new())
    }
}

impl Rasterizer {
    pub fn new(buffer_size: u32, fonts: FontManager) -> Self {
        Self { buffer_size, fonts }
    }

    pub fn buffer_size(&self) -> u32 {
        self.buffer_size
    }

    pub fn fonts(&self) -> &FontManager {
        &self.fonts
    }

    /// Side of the square an image occupies at `scale`, before its bitmap is known
    pub fn placeholder_side(&self, scale: f32) -> f32 {
        (self.buffer_size as f32 * IMAGE_BASE_FRACTION * scale).round().max(1.0)
    }

    /// `bitmap` is the decoded image for image elements, if it has loaded
    pub fn rasterize(
        &self,
        element: &Element,
        bitmap: Option<&RgbaImage>,
    ) -> Result<RasterizedElement, RasterError> {
        let size = self.buffer_size;
        if size == 0 || size > MAX_BUFFER_SIZE {
            return Err(RasterError::InvalidDimensions(size));
        }

        match (element.kind(), bitmap) {
            (ElementKind::Text(style), _) => {
                self.rasterize_text(element.content(), style, element.scale())
            }
            (ElementKind::Image, Some(bitmap)) => {
                Ok(self.rasterize_bitmap(bitmap, element.scale()))
            }
            (ElementKind::Image, None) => self.rasterize_placeholder(element.scale()),
        }
    }

    fn rasterize_text(
        &self,
        content: &str,
        style: &TextStyle,
        scale: f32,
    ) -> Result<RasterizedElement, RasterError> {
        let font = self.fonts.resolve(style)?;
        let run = TextRun {
            text: content,
            size: style.scaled_size(scale),
            color: style.color,
            align: style.align,
            underline: style.underline,
        };

        // Left and right alignment put all the ink on one side of the anchor
        let ink = text::measure(&font, &run);
        let reach = match run.align {
            TextAlign::Center => ink.x / 2.0,
            TextAlign::Left | TextAlign::Right => ink.x,
        };
        let pad = run.size * 0.25 + 2.0;
        let width = buffer_side(2.0 * (reach + pad), self.buffer_size);
        let height = buffer_side(ink.y + 2.0 * pad, self.buffer_size);

        let mut pixels = RgbaImage::new(width, height);
        let anchor = Pos2::new(width as f32 / 2.0, height as f32 / 2.0);
        let content_bounds = text::draw_text(&mut pixels, &font, &run, anchor);
        Ok(RasterizedElement {
            pixels,
            content_bounds,
        })
    }

    /// Fit the bitmap's longest side to the image base size, then apply `scale`
    fn rasterize_bitmap(&self, bitmap: &RgbaImage, scale: f32) -> RasterizedElement {
        let (width, height) = bitmap.dimensions();
        if width == 0 || height == 0 {
            let pixels = RgbaImage::new(self.buffer_size, self.buffer_size);
            let center = Pos2::new(self.buffer_size as f32 / 2.0, self.buffer_size as f32 / 2.0);
            return RasterizedElement {
                pixels,
                content_bounds: Rect::from_center_size(center, Vec2::ZERO),
            };
        }

        let base = self.buffer_size as f32 * IMAGE_BASE_FRACTION;
        let fit = base / width.max(height) as f32;
        let target_w = ((width as f32 * fit * scale).round() as u32).clamp(1, MAX_BUFFER_SIZE);
        let target_h = ((height as f32 * fit * scale).round() as u32).clamp(1, MAX_BUFFER_SIZE);
        let resized = imageops::resize(bitmap, target_w, target_h, FilterType::Triangle);

        let buffer_w = buffer_side(target_w as f32, self.buffer_size);
        let buffer_h = buffer_side(target_h as f32, self.buffer_size);
        let mut pixels = RgbaImage::new(buffer_w, buffer_h);
        let x = (buffer_w - target_w) / 2;
        let y = (buffer_h - target_h) / 2;
        imageops::overlay(&mut pixels, &resized, x as i64, y as i64);

        RasterizedElement {
            content_bounds: Rect::from_min_size(
                Pos2::new(x as f32, y as f32),
                Vec2::new(target_w as f32, target_h as f32),
            ),
            pixels,
        }
    }

    /// A tinted square with a centered label, covering the whole buffer
    fn rasterize_placeholder(&self, scale: f32) -> Result<RasterizedElement, RasterError> {
        let side = buffer_side(self.placeholder_side(scale), 1);
        let [r, g, b, a] = PLACEHOLDER_TINT.to_srgba_unmultiplied();
        let mut pixels = RgbaImage::from_pixel(side, side, Rgba([r, g, b, a]));

        let label_style = TextStyle {
            font_size: PLACEHOLDER_LABEL_SIZE,
            font_family: "Arial".to_owned(),
            ..Default::default()
        };
        let font = self.fonts.resolve(&label_style)?;
        let run = TextRun {
            text: PLACEHOLDER_LABEL,
            size: PLACEHOLDER_LABEL_SIZE,
            color: Color32::BLACK,
            align: TextAlign::Center,
            underline: false,
        };
        let center = Pos2::new(side as f32 / 2.0, side as f32 / 2.0);
        text::draw_text(&mut pixels, &font, &run, center);

        Ok(RasterizedElement {
            content_bounds: blend::image_rect(&pixels),
            pixels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rasterizer() -> Rasterizer {
        Rasterizer::new(DEFAULT_BUFFER_SIZE, FontManager::bundled_only())
    }

    #[test]
    fn test_placeholder_covers_buffer() {
        let raster = rasterizer().rasterize(&Element::image("pending.png"), None).unwrap();
        assert_eq!(raster.size(), [128, 128]);
        assert_eq!(raster.content_bounds, Rect::from_min_size(Pos2::ZERO, Vec2::splat(128.0)));
        let centered = Rect::from_center_size(Pos2::ZERO, Vec2::splat(128.0));
        assert_eq!(raster.centered_bounds(), centered);
        // Corner keeps the plain tint, the label sits in the middle
        assert_eq!(raster.pixels.get_pixel(0, 0)[3], 26);
        assert!(raster.pixels.get_pixel(0, 0)[0] == 0);
    }

    #[test]
    fn test_placeholder_follows_scale() {
        let mut element = Element::image("pending.png");
        element.apply_patch(&crate::element::ElementPatch::new().scale(2.0));
        let raster = rasterizer().rasterize(&element, None).unwrap();
        assert_eq!(raster.size(), [256, 256]);
    }

    #[test]
    fn test_bitmap_fitted_and_scaled() {
        let bitmap = RgbaImage::from_pixel(100, 50, Rgba([255, 0, 0, 255]));
        let mut element = Element::image("wide.png");
        let fitted = rasterizer().rasterize(&element, Some(&bitmap)).unwrap();
        assert_eq!(fitted.size(), [256, 256]);
        assert_eq!(fitted.content_bounds.width(), 128.0);
        assert_eq!(fitted.content_bounds.height(), 64.0);

        element.apply_patch(&crate::element::ElementPatch::new().scale(0.5));
        let half = rasterizer().rasterize(&element, Some(&bitmap)).unwrap();
        assert_eq!(half.content_bounds.width(), 64.0);
        assert_eq!(half.pixels.get_pixel(128, 128), &Rgba([255, 0, 0, 255]));
        assert_eq!(half.pixels.get_pixel(10, 128)[3], 0);
    }

    #[test]
    fn test_scale_multiplies_bitmap_size() {
        let bitmap = RgbaImage::from_pixel(64, 64, Rgba([0, 255, 0, 255]));
        let mut element = Element::image("square.png");
        let base = rasterizer().rasterize(&element, Some(&bitmap)).unwrap();

        element.apply_patch(&crate::element::ElementPatch::new().scale(2.0));
        let double = rasterizer().rasterize(&element, Some(&bitmap)).unwrap();
        assert_eq!(double.content_bounds.width(), base.content_bounds.width() * 2.0);

        // Past the configured size the buffer grows instead of cropping
        element.apply_patch(&crate::element::ElementPatch::new().scale(3.0));
        let triple = rasterizer().rasterize(&element, Some(&bitmap)).unwrap();
        assert_eq!(triple.size(), [384, 384]);
        assert_eq!(triple.content_bounds, Rect::from_min_size(Pos2::ZERO, Vec2::splat(384.0)));
        assert_eq!(triple.centered_bounds().center(), Pos2::ZERO);
    }

    #[test]
    fn test_wide_text_is_not_clipped() {
        let rasterizer = rasterizer();
        let style = TextStyle {
            font_size: 48.0,
            ..Default::default()
        };
        let mut element = Element::text("MY TEAM 2026", style);
        element.apply_patch(&crate::element::ElementPatch::new().scale(3.0));
        let raster = rasterizer.rasterize(&element, None).unwrap();

        let buffer = blend::image_rect(&raster.pixels);
        assert!(raster.size()[0] > 256);
        assert!(raster.content_bounds.width() > 256.0);
        assert!(raster.content_bounds.min.x > buffer.min.x);
        assert!(raster.content_bounds.max.x < buffer.max.x);
        assert!(raster.content_bounds.min.y > buffer.min.y);
        assert!(raster.content_bounds.max.y < buffer.max.y);
    }

    #[test]
    fn test_left_aligned_text_grows_buffer_both_ways() {
        let style = TextStyle {
            font_size: 72.0,
            align: TextAlign::Left,
            ..Default::default()
        };
        let raster = rasterizer().rasterize(&Element::text("LEFT SIDE", style), None).unwrap();
        let center = raster.extent().x / 2.0;
        assert!((raster.content_bounds.min.x - center).abs() <= 8.0);
        assert!(raster.content_bounds.max.x < raster.extent().x);
    }

    #[test]
    fn test_text_bounds_grow_with_scale() {
        let rasterizer = rasterizer();
        let mut element = Element::text("Hello", TextStyle::default());
        let small = rasterizer.rasterize(&element, None).unwrap();
        element.apply_patch(&crate::element::ElementPatch::new().scale(2.0));
        let large = rasterizer.rasterize(&element, None).unwrap();
        assert!(large.content_bounds.width() > small.content_bounds.width() * 1.5);
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let rasterizer = Rasterizer::new(0, FontManager::bundled_only());
        assert!(matches!(
            rasterizer.rasterize(&Element::image("x.png"), None),
            Err(RasterError::InvalidDimensions(0))
        ));
    }
}
