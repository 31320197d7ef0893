#![warn(clippy::all, rust_2018_idioms)]

//! Garment design composition engine with an egui host.
//!
//! Text and image elements live on four independent garment faces. The
//! [`DesignContext`] is the single input boundary; the [`rasterizer`] turns
//! elements into textures shared by the flat overlay and the 3D preview built
//! by the [`projector`].

pub mod app;
pub mod command;
pub mod components;
pub mod config;
pub mod element;
pub mod event;
pub mod file_handler;
pub mod geometry;
pub mod id_generator;
pub mod panels;
pub mod projector;
pub mod rasterizer;
pub mod renderer;
pub mod services;
pub mod state;
pub mod texture_manager;
pub mod tools;
pub mod util;
pub mod view;
pub mod widgets;

pub use app::DesignerApp;
pub use command::Command;
pub use config::{CameraConfig, DesignerConfig};
pub use element::{Element, ElementKind, ElementPatch, TextAlign, TextStyle};
pub use id_generator::ElementId;
pub use renderer::Renderer;
pub use state::{DesignContext, DesignSnapshot, DesignState, GarmentColor};
pub use tools::{SelectionTool, Tool};
pub use view::View;
