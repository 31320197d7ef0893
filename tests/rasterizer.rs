use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use egui::{Color32, Pos2, Rect, Vec2};
use image::{ImageFormat, Rgba, RgbaImage};
use tee_designer::element::{ElementPatch, TextAlign};
use tee_designer::rasterizer::{
    BlobStore, ChainedSource, DEFAULT_BUFFER_SIZE, FontManager, FsImageSource, ImageLoader,
    ImageStatus, ImageStore, Rasterizer,
};
use tee_designer::state::DesignState;
use tee_designer::texture_manager::TextureKey;

const WAIT: Duration = Duration::from_secs(5);

fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
    let image = RgbaImage::from_pixel(width, height, Rgba([20, 120, 220, 255]));
    image.save_with_format(dir.join(name), ImageFormat::Png).unwrap();
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([0, 200, 0, 255]));
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
    bytes
}

fn rasterizer() -> Rasterizer {
    Rasterizer::new(DEFAULT_BUFFER_SIZE, FontManager::bundled_only())
}

/// The placeholder at scale 1 is a half-buffer square covering its whole buffer
fn placeholder() -> Rect {
    Rect::from_min_size(Pos2::ZERO, Vec2::splat(DEFAULT_BUFFER_SIZE as f32 / 2.0))
}

#[test]
fn test_placeholder_replaced_once_loaded() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "logo.png", 64, 32);

    let mut design = DesignState::new();
    let id = design.add_image("logo.png");
    let mut images = ImageStore::new(ImageLoader::new(FsImageSource::with_root(dir.path())));
    images.sync(&design);
    assert_eq!(images.status(id), Some(ImageStatus::Loading));

    let element = design.get(id).unwrap().clone();
    let before = rasterizer().rasterize(&element, images.bitmap(id)).unwrap();
    assert_eq!(before.content_bounds, placeholder());
    let key_before = TextureKey::for_element(&element, &images);

    assert!(images.wait_for_loads(&design, WAIT));
    assert_eq!(images.status(id), Some(ImageStatus::Ready));
    assert_eq!(images.bitmap(id).unwrap().dimensions(), (64, 32));

    // A 2:1 bitmap's long side takes half the buffer at scale 1
    let after = rasterizer().rasterize(&element, images.bitmap(id)).unwrap();
    assert_eq!(after.size(), [256, 256]);
    assert_eq!(after.content_bounds.width(), 128.0);
    assert_eq!(after.content_bounds.height(), 64.0);
    assert_eq!(after.content_bounds.center(), Pos2::new(128.0, 128.0));
    assert_eq!(after.pixels.get_pixel(0, 0)[3], 0);
    assert_eq!(after.pixels.get_pixel(128, 128), &Rgba([20, 120, 220, 255]));

    let key_after = TextureKey::for_element(&element, &images);
    assert_eq!(key_after.revision, key_before.revision);
    assert_ne!(key_after, key_before);

    design.update_element(id, &ElementPatch::new().scale(2.0));
    let doubled = rasterizer().rasterize(design.get(id).unwrap(), images.bitmap(id)).unwrap();
    assert_eq!(doubled.content_bounds.width(), 256.0);
    assert_eq!(doubled.content_bounds.height(), 128.0);
}

#[test]
fn test_result_for_deleted_element_is_dropped() {
    let blobs = BlobStore::new();
    let reference = blobs.register(png_bytes(8, 8));

    let mut design = DesignState::new();
    let id = design.add_image(&reference);
    let mut images = ImageStore::new(ImageLoader::new(ChainedSource::new().with(blobs.clone())));
    images.sync(&design);

    design.delete_element(id);
    assert!(images.wait_for_loads(&design, WAIT));
    assert_eq!(images.status(id), None);
    assert!(images.bitmap(id).is_none());
    assert!(images.is_empty());
}

#[test]
fn test_missing_file_fails_and_keeps_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let mut design = DesignState::new();
    let id = design.add_image("nowhere.png");
    let mut images = ImageStore::new(ImageLoader::new(FsImageSource::with_root(dir.path())));
    images.sync(&design);

    assert!(images.wait_for_loads(&design, WAIT));
    assert_eq!(images.status(id), Some(ImageStatus::Failed));
    assert_eq!(images.bitmap_version(id), 0);

    let element = design.get(id).unwrap();
    let raster = rasterizer().rasterize(element, images.bitmap(id)).unwrap();
    assert_eq!(raster.content_bounds, placeholder());
}

#[test]
fn test_text_scale_and_underline_change_raster() {
    let mut design = DesignState::new();
    let id = design.add_text("HELLO", 24.0, Color32::from_rgb(200, 0, 0), "Arial");
    let raster = rasterizer();

    let plain = raster.rasterize(design.get(id).unwrap(), None).unwrap();
    assert!(plain.content_bounds.width() > 0.0);
    assert!((plain.content_bounds.center().x - 128.0).abs() <= 3.0);

    design.update_element(id, &ElementPatch::new().scale(2.0));
    let scaled = raster.rasterize(design.get(id).unwrap(), None).unwrap();
    assert!(scaled.content_bounds.width() > plain.content_bounds.width() * 1.5);

    let banner = ElementPatch::new().content("MY TEAM 2026").font_size(72.0).scale(3.0);
    design.update_element(id, &banner);
    let huge = raster.rasterize(design.get(id).unwrap(), None).unwrap();
    let [width, height] = huge.size();
    assert!(huge.content_bounds.min.x > 0.0 && huge.content_bounds.max.x < width as f32);
    assert!(huge.content_bounds.min.y > 0.0 && huge.content_bounds.max.y < height as f32);
    assert!((huge.centered_bounds().center().x).abs() <= 4.0);

    let underline = ElementPatch::new()
        .content("HELLO")
        .font_size(24.0)
        .scale(1.0)
        .underline(true);
    design.update_element(id, &underline);
    let underlined = raster.rasterize(design.get(id).unwrap(), None).unwrap();
    assert!(underlined.content_bounds.max.y > plain.content_bounds.max.y);
}

#[test]
fn test_alignment_anchors_at_buffer_center() {
    let mut design = DesignState::new();
    let id = design.add_text("ALIGN", 24.0, Color32::BLACK, "Arial");
    let raster = rasterizer();

    design.update_element(id, &ElementPatch::new().align(TextAlign::Left));
    let left = raster.rasterize(design.get(id).unwrap(), None).unwrap();
    assert!((left.content_bounds.min.x - 128.0).abs() <= 4.0);

    design.update_element(id, &ElementPatch::new().align(TextAlign::Right));
    let right = raster.rasterize(design.get(id).unwrap(), None).unwrap();
    assert!((right.content_bounds.max.x - 128.0).abs() <= 4.0);
}
