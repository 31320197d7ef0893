use eframe::egui;

use crate::DesignerApp;
use crate::components::ViewButton;
use crate::view::View;

pub fn view_selector(app: &mut DesignerApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("view_selector").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Design your tee");
            ui.separator();

            let active = app.context.active_view();
            for view in View::ALL {
                if ViewButton::new(view, view == active).show(ui).clicked() {
                    app.context.switch_view(view);
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.toggle_value(&mut app.show_preview, "3D Preview");
            });
        });
    });
}
