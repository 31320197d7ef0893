use crate::element::{Element, ElementPatch, TextAlign};
use crate::state::{DesignContext, DesignState};

/// Actions offered by the floating text toolbar and the context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    Align(TextAlign),
    Delete,
}

impl ToolbarAction {
    pub fn label(&self) -> &'static str {
        match self {
            ToolbarAction::ToggleBold => "Bold",
            ToolbarAction::ToggleItalic => "Italic",
            ToolbarAction::ToggleUnderline => "Underline",
            ToolbarAction::Align(align) => align.label(),
            ToolbarAction::Delete => "Delete",
        }
    }

    /// Actions that make sense for `element`; images only get Delete
    pub fn available_for(element: &Element) -> Vec<ToolbarAction> {
        if !element.is_text() {
            return vec![ToolbarAction::Delete];
        }
        let mut actions = vec![
            ToolbarAction::ToggleBold,
            ToolbarAction::ToggleItalic,
            ToolbarAction::ToggleUnderline,
        ];
        actions.extend(TextAlign::ALL.map(ToolbarAction::Align));
        actions.push(ToolbarAction::Delete);
        actions
    }
}

/// The selected element, if it is a text element
pub fn toolbar_for(design: &DesignState) -> Option<&Element> {
    design.selected_element().filter(|element| element.is_text())
}

/// Apply `action` to the current selection; `false` if nothing changed
pub fn apply_action(ctx: &mut DesignContext, action: ToolbarAction) -> bool {
    let Some(element) = ctx.design().selected_element() else {
        return false;
    };
    let id = element.id();

    if action == ToolbarAction::Delete {
        return ctx.delete_element(id).is_some();
    }

    let Some(style) = element.text_style() else {
        return false;
    };
    let patch = match action {
        ToolbarAction::ToggleBold => ElementPatch::new().bold(!style.bold),
        ToolbarAction::ToggleItalic => ElementPatch::new().italic(!style.italic),
        ToolbarAction::ToggleUnderline => ElementPatch::new().underline(!style.underline),
        ToolbarAction::Align(align) => ElementPatch::new().align(align),
        ToolbarAction::Delete => return false,
    };
    ctx.update_element(id, &patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    #[test]
    fn test_toolbar_only_for_text() {
        let mut ctx = DesignContext::default();
        ctx.add_image("logo.png");
        assert!(toolbar_for(ctx.design()).is_none());

        ctx.add_text("HI", 24.0, Color32::BLACK);
        assert!(toolbar_for(ctx.design()).is_some());
    }

    #[test]
    fn test_toggle_and_align() {
        let mut ctx = DesignContext::default();
        let id = ctx.add_text("HI", 24.0, Color32::BLACK).unwrap();

        assert!(apply_action(&mut ctx, ToolbarAction::ToggleBold));
        assert!(apply_action(&mut ctx, ToolbarAction::Align(TextAlign::Right)));
        let style = ctx.design().get(id).and_then(Element::text_style).cloned().unwrap();
        assert!(style.bold);
        assert_eq!(style.align, TextAlign::Right);

        assert!(apply_action(&mut ctx, ToolbarAction::ToggleBold));
        assert!(!ctx.design().get(id).and_then(Element::text_style).unwrap().bold);
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut ctx = DesignContext::default();
        ctx.add_text("HI", 24.0, Color32::BLACK);
        assert!(apply_action(&mut ctx, ToolbarAction::Delete));
        assert_eq!(ctx.design().selected_id(), None);
        assert!(!apply_action(&mut ctx, ToolbarAction::ToggleItalic));
    }

    #[test]
    fn test_image_menu_is_delete_only() {
        let image = Element::image("logo.png");
        assert_eq!(ToolbarAction::available_for(&image), vec![ToolbarAction::Delete]);
        let text = Element::text("HI", Default::default());
        assert_eq!(ToolbarAction::available_for(&text).len(), 7);
    }
}
