use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

use crate::id_generator::{ElementId, generate_id};

mod common;
mod text;

pub use common::{
    CANVAS_CENTER, DEFAULT_SCALE, MAX_SCALE, MIN_FONT_SIZE, MIN_SCALE, PRINTABLE_MAX,
    PRINTABLE_MIN, clamp_position, clamp_scale,
};
pub(crate) use common::hex_color;
pub use text::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, TextAlign, TextStyle};

/// The closed set of element variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text(TextStyle),
    Image,
}

/// A single placed design on one garment view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    id: ElementId,
    #[serde(flatten)]
    kind: ElementKind,
    content: String,
    x: f32,
    y: f32,
    scale: f32,
    is_selected: bool,
    /// Bumped on every change that affects the rendered appearance
    #[serde(skip)]
    revision: u64,
}

impl Element {
    pub fn text(content: impl Into<String>, style: TextStyle) -> Self {
        Self::with_kind(ElementKind::Text(style), content.into())
    }

    /// `reference` is a path, a `file://` URL or a `blob:` handle
    pub fn image(reference: impl Into<String>) -> Self {
        Self::with_kind(ElementKind::Image, reference.into())
    }

    fn with_kind(kind: ElementKind, content: String) -> Self {
        Self {
            id: generate_id(),
            kind,
            content,
            x: CANVAS_CENTER.x,
            y: CANVAS_CENTER.y,
            scale: DEFAULT_SCALE,
            is_selected: false,
            revision: 0,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn element_type(&self) -> &'static str {
        match self.kind {
            ElementKind::Text(_) => "text",
            ElementKind::Image => "image",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text(_))
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, ElementKind::Image)
    }

    pub fn text_style(&self) -> Option<&TextStyle> {
        match &self.kind {
            ElementKind::Text(style) => Some(style),
            ElementKind::Image => None,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Visual center in percent of the canvas
    pub fn position(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.is_selected = selected;
    }

    /// Returns `true` if the position changed
    pub(crate) fn set_position(&mut self, pos: Pos2) -> bool {
        let pos = clamp_position(pos);
        if pos == self.position() {
            return false;
        }
        self.x = pos.x;
        self.y = pos.y;
        true
    }

    /// Merge `patch` into this element, returning `true` if anything changed.
    /// Text attributes are ignored for images.
    pub(crate) fn apply_patch(&mut self, patch: &ElementPatch) -> bool {
        let mut appearance_changed = false;

        if let Some(content) = &patch.content {
            if *content != self.content {
                self.content.clone_from(content);
                appearance_changed = true;
            }
        }

        if let Some(scale) = patch.scale {
            let scale = clamp_scale(scale);
            if scale != self.scale {
                self.scale = scale;
                appearance_changed = true;
            }
        }

        if let ElementKind::Text(style) = &mut self.kind {
            appearance_changed |= patch.apply_to_style(style);
        }

        let moved = patch.position.is_some_and(|pos| self.set_position(pos));

        if appearance_changed {
            self.revision += 1;
        }
        appearance_changed || moved
    }
}

/// A partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub content: Option<String>,
    pub position: Option<Pos2>,
    pub scale: Option<f32>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    pub color: Option<Color32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub align: Option<TextAlign>,
}

impl ElementPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.position = Some(Pos2::new(x, y));
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn color(mut self, color: Color32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn underline(mut self, underline: bool) -> Self {
        self.underline = Some(underline);
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = Some(align);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply_to_style(&self, style: &mut TextStyle) -> bool {
        let mut changed = false;

        if let Some(size) = self.font_size {
            let size = if size.is_nan() { style.font_size } else { size.max(MIN_FONT_SIZE) };
            changed |= replace(&mut style.font_size, size);
        }
        if let Some(family) = &self.font_family {
            if *family != style.font_family {
                style.font_family.clone_from(family);
                changed = true;
            }
        }
        if let Some(color) = self.color {
            changed |= replace(&mut style.color, color);
        }
        if let Some(bold) = self.bold {
            changed |= replace(&mut style.bold, bold);
        }
        if let Some(italic) = self.italic {
            changed |= replace(&mut style.italic, italic);
        }
        if let Some(underline) = self.underline {
            changed |= replace(&mut style.underline, underline);
        }
        if let Some(align) = self.align {
            changed |= replace(&mut style.align, align);
        }

        changed
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Factory functions for creating elements
pub mod factory {
    use super::*;

    pub fn create_text(
        content: &str,
        font_size: f32,
        color: Color32,
        font_family: &str,
    ) -> Element {
        Element::text(content, TextStyle::new(font_size, color, font_family))
    }

    pub fn create_image(reference: &str) -> Element {
        Element::image(reference)
    }
}
