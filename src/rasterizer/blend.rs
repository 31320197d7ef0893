use egui::{Color32, Rect};
use image::{Rgba, RgbaImage};

/// Source-over blend of `color` at `coverage` onto one unpremultiplied pixel
pub fn blend_pixel(image: &mut RgbaImage, x: i32, y: i32, color: Color32, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= image.width() || y as u32 >= image.height() {
        return;
    }
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let src_a = (a as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }

    let dst = image.get_pixel_mut(x as u32, y as u32);
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }

    let mix = |src: u8, dst: u8| -> u8 {
        let value = (src as f32 * src_a + dst as f32 * dst_a * (1.0 - src_a)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };
    *dst = Rgba([
        mix(r, dst[0]),
        mix(g, dst[1]),
        mix(b, dst[2]),
        (out_a * 255.0).round() as u8,
    ]);
}

/// Blend a solid rectangle, clipped to the image
pub fn fill_rect(image: &mut RgbaImage, rect: Rect, color: Color32) {
    let clipped = rect.intersect(image_rect(image));
    if !clipped.is_positive() {
        return;
    }
    let (x0, y0) = (clipped.min.x.floor() as i32, clipped.min.y.floor() as i32);
    let (x1, y1) = (clipped.max.x.ceil() as i32, clipped.max.y.ceil() as i32);
    for y in y0..y1 {
        for x in x0..x1 {
            blend_pixel(image, x, y, color, 1.0);
        }
    }
}

pub fn image_rect(image: &RgbaImage) -> Rect {
    Rect::from_min_max(
        egui::Pos2::ZERO,
        egui::pos2(image.width() as f32, image.height() as f32),
    )
}
