use eframe::egui;

use super::toolbar::{action_menu, text_toolbar};
use crate::DesignerApp;
use crate::geometry::{CanvasTransform, HitTarget, hit_test};
use crate::tools::{PointerSample, SelectionState, Tool, apply_action};

pub fn central_panel(app: &mut DesignerApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let available = ui.available_rect_before_wrap();
        let transform = CanvasTransform::fit(available.shrink(16.0));
        let response = ui.allocate_rect(transform.rect(), egui::Sense::click_and_drag());

        handle_pointer(app, ui, &response, &transform);

        let hover_target = response
            .hover_pos()
            .map(|pos| target_at(app, &transform, pos));
        let hovered_corner = match hover_target {
            Some(HitTarget::Handle { corner, .. }) => Some(corner),
            _ => None,
        };
        let cursor = match (app.context.tool().state(), hover_target) {
            (SelectionState::Resizing { corner, .. }, _) => Some(corner.cursor_icon()),
            (SelectionState::Dragging { .. }, _) => Some(egui::CursorIcon::Grabbing),
            (SelectionState::Idle, Some(HitTarget::Handle { corner, .. })) => {
                Some(corner.cursor_icon())
            }
            (SelectionState::Idle, Some(HitTarget::Element(_))) => Some(egui::CursorIcon::Grab),
            _ => None,
        };
        if let Some(cursor) = cursor {
            ui.ctx().set_cursor_icon(cursor);
        }

        // Right click selects what is under the pointer before the menu opens
        if response.secondary_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let target = target_at(app, &transform, pos);
                app.context.canvas_click(target);
            }
        }
        response.context_menu(|ui| {
            let Some(selected) = app.context.design().selected_element() else {
                ui.label("Nothing selected");
                return;
            };
            if let Some(action) = action_menu(ui, selected) {
                apply_action(&mut app.context, action);
                ui.close_menu();
            }
        });

        let painter = ui.painter_at(available);
        let garment_color = app.context.garment().resolved().color32();
        app.renderer.paint_canvas(
            ctx,
            &painter,
            &transform,
            app.context.design(),
            garment_color,
            hovered_corner,
        );

        text_toolbar(app, ctx, &transform);
    });
}

fn target_at(app: &DesignerApp, transform: &CanvasTransform, pos: egui::Pos2) -> HitTarget {
    hit_test(
        app.context.design(),
        transform,
        app.renderer.textures(),
        app.renderer.buffer_size(),
        pos,
    )
}

/// Feed primary-button pointer activity on the canvas to the selection tool
fn handle_pointer(
    app: &mut DesignerApp,
    ui: &egui::Ui,
    response: &egui::Response,
    transform: &CanvasTransform,
) {
    let (pressed, released, down, moving, pos) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.primary_down(),
            i.pointer.is_moving(),
            i.pointer.interact_pos(),
        )
    });

    let Some(pos) = pos else {
        if app.context.tool().is_active() {
            app.context.pointer_leave();
        }
        return;
    };
    let sample = PointerSample {
        percent: transform.to_percent(pos),
        screen: pos,
    };

    if pressed && response.hovered() {
        let target = target_at(app, transform, pos);
        app.context.pointer_down(target, sample);
    } else if app.context.tool().is_active() {
        if !transform.rect().contains(pos) {
            app.context.pointer_leave();
        } else if released || !down {
            app.context.pointer_up(sample);
        } else if moving {
            app.context.pointer_move(sample);
        }
    }
}
