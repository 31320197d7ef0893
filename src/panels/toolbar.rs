use eframe::egui;

use crate::DesignerApp;
use crate::element::{Element, TextStyle};
use crate::geometry::{CanvasTransform, element_screen_rect};
use crate::tools::{ToolbarAction, apply_action, toolbar_for};

fn icon(action: ToolbarAction) -> &'static str {
    match action {
        ToolbarAction::ToggleBold => "B",
        ToolbarAction::ToggleItalic => "I",
        ToolbarAction::ToggleUnderline => "U",
        ToolbarAction::Align(align) => align.icon(),
        ToolbarAction::Delete => "🗑",
    }
}

fn is_on(action: ToolbarAction, style: &TextStyle) -> bool {
    match action {
        ToolbarAction::ToggleBold => style.bold,
        ToolbarAction::ToggleItalic => style.italic,
        ToolbarAction::ToggleUnderline => style.underline,
        ToolbarAction::Align(align) => style.align == align,
        ToolbarAction::Delete => false,
    }
}

/// Floating formatting bar above the selected text element
pub fn text_toolbar(app: &mut DesignerApp, ctx: &egui::Context, transform: &CanvasTransform) {
    let Some(element) = toolbar_for(app.context.design()) else {
        return;
    };
    let Some(style) = element.text_style().cloned() else {
        return;
    };
    let frame = element_screen_rect(
        element,
        transform,
        app.renderer.textures(),
        app.renderer.buffer_size(),
    );
    let actions = ToolbarAction::available_for(element);

    let mut clicked = None;
    egui::Area::new(egui::Id::new("text_toolbar"))
        .order(egui::Order::Foreground)
        .fixed_pos(frame.center_top() + egui::vec2(-120.0, -44.0))
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    for action in actions {
                        let label = egui::RichText::new(icon(action)).strong();
                        if ui
                            .selectable_label(is_on(action, &style), label)
                            .on_hover_text(action.label())
                            .clicked()
                        {
                            clicked = Some(action);
                        }
                    }
                });
            });
        });

    if let Some(action) = clicked {
        apply_action(&mut app.context, action);
    }
}

/// Context menu entries for `element`; images only offer Delete
pub fn action_menu(ui: &mut egui::Ui, element: &Element) -> Option<ToolbarAction> {
    let mut chosen = None;
    for action in ToolbarAction::available_for(element) {
        if action == ToolbarAction::Delete {
            ui.separator();
        }
        let text = format!("{}  {}", icon(action), action.label());
        if ui.button(text).clicked() {
            chosen = Some(action);
        }
    }
    chosen
}
