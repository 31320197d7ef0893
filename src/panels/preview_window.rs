use std::collections::HashMap;

use eframe::egui::{self, Color32};

use crate::DesignerApp;
use crate::projector::{SceneInput, build_scene, project_design};

pub const PREVIEW_HINT: &str = "Drag to rotate, scroll to zoom, double click to reset";

pub fn preview_window(app: &mut DesignerApp, ctx: &egui::Context) {
    let mut open = app.show_preview;
    egui::Window::new("3D Preview")
        .open(&mut open)
        .default_pos(egui::pos2(24.0, 80.0))
        .resizable(false)
        .show(ctx, |ui| {
            let (rect, response) =
                ui.allocate_exact_size(egui::vec2(320.0, 360.0), egui::Sense::click_and_drag());

            let camera = &mut app.camera;
            if response.drag_started() {
                camera.set_dragging(true);
            }
            if response.dragged() {
                camera.orbit(response.drag_delta(), rect.height());
            }
            if response.drag_stopped() {
                camera.set_dragging(false);
            }
            if response.double_clicked() {
                camera.reset();
            }
            if response.hovered() {
                let scroll = ui.input(|i| i.smooth_scroll_delta.y);
                if scroll != 0.0 {
                    camera.zoom(scroll);
                }
            }
            if camera.update(ui.input(|i| i.stable_dt)) {
                ctx.request_repaint();
            }

            let design = app.context.design();
            let decals = project_design(design);
            let textures: HashMap<_, _> = decals
                .iter()
                .filter_map(|decal| {
                    app.renderer
                        .decal_texture(ctx, design, decal.element_id)
                        .map(|texture| (decal.element_id, texture))
                })
                .collect();

            let input = SceneInput {
                camera: &app.camera,
                viewport: rect,
                garment: &app.garment_proxy,
                garment_color: app.context.garment().resolved().color32(),
                decals: &decals,
            };
            let painter = ui.painter_at(rect);
            painter.rect_filled(rect, 4.0, Color32::from_gray(235));
            painter.extend(build_scene(&input, |id| textures.get(&id).copied()));

            ui.weak(PREVIEW_HINT);
        });
    app.show_preview = open;
}
