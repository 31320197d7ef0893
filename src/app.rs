use eframe::egui::{self, Color32};
use log::info;

use crate::config::DesignerConfig;
use crate::event::RepaintOnChange;
use crate::file_handler::FileHandler;
use crate::panels;
use crate::projector::{GarmentProxy, OrbitCamera};
use crate::renderer::Renderer;
use crate::services::{InMemoryCart, ToastNotifier};
use crate::state::DesignContext;

/// Contents of the add-text form
#[derive(Debug, Clone, PartialEq)]
pub struct TextForm {
    pub text: String,
    pub font_size: f32,
    pub color: Color32,
}

impl TextForm {
    fn new(config: &DesignerConfig) -> Self {
        Self {
            text: String::new(),
            font_size: config.clamp_font_size(config.default_font_size),
            color: config.default_text_color,
        }
    }
}

pub struct DesignerApp {
    pub(crate) config: DesignerConfig,
    pub(crate) context: DesignContext,
    pub(crate) renderer: Renderer,
    pub(crate) camera: OrbitCamera,
    pub(crate) garment_proxy: GarmentProxy,
    pub(crate) toasts: ToastNotifier,
    pub(crate) cart: InMemoryCart,
    pub(crate) file_handler: FileHandler,
    pub(crate) text_form: TextForm,
    pub(crate) show_preview: bool,
}

impl DesignerApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Load previous settings (if any).
        let config: DesignerConfig = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        info!("Starting with {config:?}");

        let app = Self::with_config(config);
        app.context
            .event_bus()
            .subscribe(Box::new(RepaintOnChange::new(cc.egui_ctx.clone())));
        app
    }

    pub fn with_config(config: DesignerConfig) -> Self {
        let toasts = ToastNotifier::new();
        Self {
            context: DesignContext::new(&config, Box::new(toasts.clone())),
            renderer: Renderer::new(&config),
            camera: OrbitCamera::from_config(&config.camera),
            garment_proxy: GarmentProxy::new(),
            toasts,
            cart: InMemoryCart::new(),
            file_handler: FileHandler::new(),
            text_form: TextForm::new(&config),
            show_preview: true,
            config,
        }
    }

    pub fn context(&self) -> &DesignContext {
        &self.context
    }

    pub fn cart(&self) -> &InMemoryCart {
        &self.cart
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        self.file_handler.preview_files_being_dropped(ctx);
        if !self.file_handler.check_for_dropped_files(ctx) {
            return;
        }
        for reference in self.file_handler.process_dropped_files(self.renderer.blobs()) {
            self.context.upload_design(&reference);
        }
    }

    fn show_toasts(&self, ctx: &egui::Context) {
        let toasts = self.toasts.visible();
        if toasts.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in toasts {
                    let fill = match toast.kind {
                        crate::services::ToastKind::Success => Color32::from_rgb(46, 125, 50),
                        crate::services::ToastKind::Error => Color32::from_rgb(198, 40, 40),
                    };
                    egui::Frame::popup(ui.style()).fill(fill).show(ui, |ui| {
                        ui.colored_label(Color32::WHITE, toast.message);
                    });
                }
            });
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}

impl eframe::App for DesignerApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.config);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.toasts.tick(ctx.input(|i| i.time));
        if self.renderer.begin_frame(self.context.design()) {
            // Keep polling until every image load has landed
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
        self.handle_dropped_files(ctx);

        panels::view_selector(self, ctx);
        panels::customization_panel(self, ctx);
        panels::central_panel(self, ctx);
        panels::preview_window(self, ctx);
        self.show_toasts(ctx);
    }
}
