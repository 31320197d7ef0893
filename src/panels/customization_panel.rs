use eframe::egui::{self, Color32, Stroke};

use crate::DesignerApp;
use crate::state::GarmentColor;
use crate::state::context::TEMPLATES;

pub fn customization_panel(app: &mut DesignerApp, ctx: &egui::Context) {
    egui::SidePanel::right("customization_panel")
        .resizable(true)
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading("Customize");
            ui.separator();

            color_section(app, ui);
            ui.separator();
            text_section(app, ui);
            ui.separator();
            upload_section(app, ui);
            ui.separator();
            template_section(app, ui);
            ui.separator();

            if let Some(selected) = app.context.design().selected_element() {
                ui.label(format!(
                    "Selected: {} at ({:.0}%, {:.0}%), scale {:.2}",
                    selected.element_type(),
                    selected.position().x,
                    selected.position().y,
                    selected.scale(),
                ));
                ui.separator();
            }

            ui.vertical_centered_justified(|ui| {
                let save = egui::Button::new(egui::RichText::new("Save & Proceed").strong())
                    .min_size(egui::vec2(0.0, 32.0));
                if ui.add(save).clicked() {
                    app.context.save_design(&mut app.cart);
                }
            });
            if !app.cart.is_empty() {
                ui.label(format!("{} design(s) in cart", app.cart.len()));
            }
        });
}

fn color_section(app: &mut DesignerApp, ui: &mut egui::Ui) {
    ui.strong("Shirt color");
    let current = app.context.garment().resolved();
    ui.horizontal_wrapped(|ui| {
        for color in GarmentColor::ALL {
            let selected = color == current;
            let stroke = if selected {
                Stroke::new(2.0, ui.visuals().selection.stroke.color)
            } else {
                Stroke::new(1.0, Color32::from_gray(120))
            };
            let swatch = egui::Button::new("")
                .fill(color.color32())
                .stroke(stroke)
                .min_size(egui::vec2(26.0, 26.0));
            if ui.add(swatch).on_hover_text(color.label()).clicked() {
                app.context.set_color(color.name());
            }
        }
    });
}

fn text_section(app: &mut DesignerApp, ui: &mut egui::Ui) {
    ui.strong("Add text");
    ui.add(egui::TextEdit::singleline(&mut app.text_form.text).hint_text("Enter your text"));
    ui.horizontal(|ui| {
        ui.label("Size:");
        let range = app.config.font_size_range();
        ui.add(egui::Slider::new(&mut app.text_form.font_size, range).suffix("px"));
    });
    ui.horizontal(|ui| {
        ui.label("Color:");
        egui::color_picker::color_edit_button_srgba(
            ui,
            &mut app.text_form.color,
            egui::color_picker::Alpha::Opaque,
        );
    });
    if ui.button("Add Text").clicked() {
        let size = app.config.clamp_font_size(app.text_form.font_size);
        let added = app
            .context
            .add_text(&app.text_form.text, size, app.text_form.color);
        if added.is_some() {
            app.text_form.text.clear();
        }
    }
}

fn upload_section(app: &mut DesignerApp, ui: &mut egui::Ui) {
    ui.strong("Upload design");
    upload_button(app, ui);
    ui.weak("or drop an image onto the window");
}

#[cfg(not(target_arch = "wasm32"))]
fn upload_button(app: &mut DesignerApp, ui: &mut egui::Ui) {
    if ui.button("Choose image…").clicked() {
        if let Some(reference) = app.file_handler.pick_image_file() {
            app.context.upload_design(&reference);
        }
    }
}

// No native dialog on the web; dropping files still works
#[cfg(target_arch = "wasm32")]
fn upload_button(_app: &mut DesignerApp, _ui: &mut egui::Ui) {}

fn template_section(app: &mut DesignerApp, ui: &mut egui::Ui) {
    ui.strong("Templates");
    ui.horizontal_wrapped(|ui| {
        for (index, template) in TEMPLATES.iter().enumerate() {
            if ui.button(format!("Template {}", index + 1)).clicked() {
                app.context.add_template(template);
            }
        }
    });
}
