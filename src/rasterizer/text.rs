use egui::{Color32, Pos2, Rect, Vec2};
use image::RgbaImage;
use rusttype::{Font, Point, PositionedGlyph, Scale, point};

use super::blend::{blend_pixel, fill_rect, image_rect};
use super::font_manager::ResolvedFont;
use crate::element::TextAlign;

/// Horizontal shear applied per pixel above the baseline for synthetic italics
const ITALIC_SHEAR: f32 = 0.2;

/// A single line of text to draw into a raster buffer
pub struct TextRun<'a> {
    pub text: &'a str,
    pub size: f32,
    pub color: Color32,
    pub align: TextAlign,
    pub underline: bool,
}

/// Newlines render as spaces
pub fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

fn layout(font: &Font<'static>, text: &str, scale: Scale) -> (Vec<PositionedGlyph<'static>>, f32) {
    let glyphs: Vec<PositionedGlyph<'static>> = font.layout(text, scale, point(0.0, 0.0)).collect();
    let width = glyphs
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0);
    (glyphs, width)
}

fn bold_spread(font: &ResolvedFont, size: f32) -> f32 {
    if font.synthetic_bold { (size / 24.0).max(1.0) } else { 0.0 }
}

fn underline_thickness(size: f32) -> f32 {
    (size / 16.0).max(1.0)
}

/// Width and height of the ink `draw_text` lays down for `run`, underline included
pub fn measure(font: &ResolvedFont, run: &TextRun<'_>) -> Vec2 {
    let text = single_line(run.text);
    let scale = Scale::uniform(run.size);
    let v_metrics = font.font.v_metrics(scale);
    let (_, advance) = layout(&font.font, &text, scale);
    let shear = if font.synthetic_italic { v_metrics.ascent * ITALIC_SHEAR } else { 0.0 };
    let underline = if run.underline { 2.0 * underline_thickness(run.size) } else { 0.0 };
    Vec2::new(
        advance + bold_spread(font, run.size) + shear,
        v_metrics.ascent - v_metrics.descent + 2.0 * underline,
    )
}

/// Draw `run` anchored at `anchor` with canvas `textAlign` semantics and a
/// middle baseline. Returns the buffer-space rect the text covers.
pub fn draw_text(
    image: &mut RgbaImage,
    font: &ResolvedFont,
    run: &TextRun<'_>,
    anchor: Pos2,
) -> Rect {
    let text = single_line(run.text);
    let scale = Scale::uniform(run.size);
    let v_metrics = font.font.v_metrics(scale);
    let (glyphs, advance) = layout(&font.font, &text, scale);
    let spread = bold_spread(font, run.size);
    let width = advance + spread;

    let start_x = match run.align {
        TextAlign::Left => anchor.x,
        TextAlign::Center => anchor.x - width / 2.0,
        TextAlign::Right => anchor.x - width,
    };
    let baseline = anchor.y + (v_metrics.ascent + v_metrics.descent) / 2.0;

    let mut covered = Rect::NOTHING;
    for glyph in glyphs {
        let origin: Point<f32> = point(start_x + glyph.position().x, baseline);
        let glyph = glyph.into_unpositioned().positioned(origin);
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };

        let shear = |py: i32| -> i32 {
            if font.synthetic_italic {
                ((baseline - py as f32) * ITALIC_SHEAR).round() as i32
            } else {
                0
            }
        };
        let strike = spread.round() as i32;

        glyph.draw(|gx, gy, coverage| {
            let py = bb.min.y + gy as i32;
            let px = bb.min.x + gx as i32 + shear(py);
            blend_pixel(image, px, py, run.color, coverage);
            if strike > 0 {
                blend_pixel(image, px + strike, py, run.color, coverage);
            }
        });

        let top_shift = shear(bb.min.y).max(shear(bb.max.y));
        let bottom_shift = shear(bb.min.y).min(shear(bb.max.y));
        covered = covered.union(Rect::from_min_max(
            Pos2::new((bb.min.x + bottom_shift) as f32, bb.min.y as f32),
            Pos2::new((bb.max.x + top_shift + strike) as f32, bb.max.y as f32),
        ));
    }

    if run.underline && width > 0.0 {
        let thickness = underline_thickness(run.size);
        let top = baseline + thickness;
        let line = Rect::from_min_size(Pos2::new(start_x, top), Vec2::new(width, thickness));
        fill_rect(image, line, run.color);
        covered = covered.union(line);
    }

    if covered.is_negative() {
        return Rect::from_center_size(anchor, Vec2::ZERO);
    }
    covered.intersect(image_rect(image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::TextStyle;
    use crate::rasterizer::FontManager;

    fn font() -> ResolvedFont {
        FontManager::bundled_only().resolve(&TextStyle::default()).unwrap()
    }

    fn run(text: &str, align: TextAlign) -> TextRun<'_> {
        TextRun {
            text,
            size: 32.0,
            color: Color32::BLACK,
            align,
            underline: false,
        }
    }

    #[test]
    fn test_alignment_relative_to_anchor() {
        let font = font();
        let anchor = Pos2::new(128.0, 128.0);

        let mut image = RgbaImage::new(256, 256);
        let left = draw_text(&mut image, &font, &run("HI", TextAlign::Left), anchor);
        assert!(left.min.x >= anchor.x - 1.0);

        let mut image = RgbaImage::new(256, 256);
        let right = draw_text(&mut image, &font, &run("HI", TextAlign::Right), anchor);
        assert!(right.max.x <= anchor.x + 1.0);

        let mut image = RgbaImage::new(256, 256);
        let center = draw_text(&mut image, &font, &run("HI", TextAlign::Center), anchor);
        assert!(center.min.x < anchor.x && center.max.x > anchor.x);
    }

    #[test]
    fn test_underline_extends_below_glyphs() {
        let font = font();
        let anchor = Pos2::new(128.0, 128.0);
        let mut plain = RgbaImage::new(256, 256);
        let without = draw_text(&mut plain, &font, &run("ace", TextAlign::Center), anchor);

        let mut underlined = RgbaImage::new(256, 256);
        let mut with_line = run("ace", TextAlign::Center);
        with_line.underline = true;
        let with = draw_text(&mut underlined, &font, &with_line, anchor);

        assert!(with.max.y > without.max.y);
    }

    #[test]
    fn test_measure_covers_drawn_ink() {
        let font = font();
        let mut underlined = run("Wide text", TextAlign::Center);
        underlined.underline = true;
        let ink = measure(&font, &underlined);

        let mut image = RgbaImage::new(512, 512);
        let drawn = draw_text(&mut image, &font, &underlined, Pos2::new(256.0, 256.0));
        assert!(drawn.width() <= ink.x + 2.0);
        assert!(drawn.height() <= ink.y);
    }

    #[test]
    fn test_newlines_become_spaces() {
        assert_eq!(single_line("a\nb\r\nc"), "a b  c");
    }
}
