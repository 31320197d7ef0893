use egui::{Color32, Pos2};
use tee_designer::element::{
    self, DEFAULT_FONT_FAMILY, Element, ElementKind, ElementPatch, TextAlign, TextStyle,
};

fn create_test_text() -> Element {
    element::factory::create_text("HELLO", 24.0, Color32::BLACK, DEFAULT_FONT_FAMILY)
}

fn create_test_image() -> Element {
    element::factory::create_image("assets/template-1.png")
}

#[test]
fn test_element_creation() {
    let text = create_test_text();
    assert_eq!(text.element_type(), "text");
    assert_eq!(text.content(), "HELLO");
    assert_eq!(text.position(), Pos2::new(50.0, 50.0));
    assert_eq!(text.scale(), 1.0);

    let image = create_test_image();
    assert_eq!(image.element_type(), "image");
    assert!(image.text_style().is_none());
    assert_ne!(text.id(), image.id());
}

#[test]
fn test_family_list_parsing() {
    let style = TextStyle::new(12.0, Color32::BLACK, "'Helvetica Neue', Arial , sans-serif");
    let families: Vec<&str> = style.families().collect();
    assert_eq!(families, vec!["Helvetica Neue", "Arial", "sans-serif"]);
}

#[test]
fn test_element_json_shape() {
    let text = create_test_text();
    let value = serde_json::to_value(&text).unwrap();
    assert_eq!(value["type"], "text");
    assert_eq!(value["content"], "HELLO");
    assert_eq!(value["color"], "#000000");
    assert_eq!(value["align"], "center");

    let back: Element = serde_json::from_value(value).unwrap();
    assert!(matches!(back.kind(), ElementKind::Text(style) if style.align == TextAlign::Center));
    assert_eq!(back.id(), text.id());
}

#[test]
fn test_empty_patch() {
    assert!(ElementPatch::new().is_empty());
    assert!(!ElementPatch::new().underline(true).is_empty());
}
