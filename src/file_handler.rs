use std::collections::HashSet;

use eframe::egui;

use crate::rasterizer::BlobStore;

pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Turns dropped and picked files into image references
#[derive(Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
    processed_files: HashSet<String>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect newly dropped files from the UI context.
    /// Returns true if any were dropped this frame.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let mut new_dropped_files = false;
        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
                new_dropped_files = true;
            }
        });
        new_dropped_files
    }

    /// References for the dropped image files, ready for `upload_design`.
    /// In-memory bytes are registered as blobs, files on disk keep their path.
    pub fn process_dropped_files(&mut self, blobs: &BlobStore) -> Vec<String> {
        let files = std::mem::take(&mut self.dropped_files);
        let mut references = Vec::new();

        for file in &files {
            let file_name = display_name(file);
            if self.processed_files.contains(&file_name) {
                continue;
            }
            if !is_image_file(file) {
                log::warn!("Dropped file is not a supported type: {file_name}");
                continue;
            }

            let reference = if let Some(bytes) = &file.bytes {
                log::info!("Registering dropped image {file_name} ({} bytes)", bytes.len());
                Some(blobs.register(bytes.to_vec()))
            } else if let Some(path) = &file.path {
                Some(path.display().to_string())
            } else {
                log::warn!("Dropped file has no accessible data: {file_name}");
                None
            };

            if let Some(reference) = reference {
                self.processed_files.insert(file_name);
                references.push(reference);
            }
        }
        references
    }

    /// Native file dialog for the upload button
    #[cfg(not(target_arch = "wasm32"))]
    pub fn pick_image_file(&self) -> Option<String> {
        let path = rfd::FileDialog::new()
            .set_title("Upload design")
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_file()?;
        log::info!("Picked {}", path.display());
        Some(path.display().to_string())
    }

    /// Overlay shown while files hover over the window
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }
        let text = ctx.input(|i| {
            let mut text = "Drop to upload your design:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                }
            }
            text
        });

        let painter =
            ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            egui::TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }

    /// Forget which files were already uploaded
    pub fn clear_processed_files(&mut self) {
        self.dropped_files.clear();
        self.processed_files.clear();
    }
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let extension = file
        .path
        .as_ref()
        .and_then(|path| path.extension())
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .or_else(|| {
            file.name
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_lowercase())
        });
    extension.is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn dropped(name: &str) -> egui::DroppedFile {
        egui::DroppedFile {
            name: name.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn test_bytes_become_blobs_and_paths_stay_paths() {
        let blobs = BlobStore::new();
        let mut handler = FileHandler::new();
        handler.dropped_files = vec![
            egui::DroppedFile {
                bytes: Some(Arc::from(vec![1u8, 2, 3])),
                ..dropped("logo.png")
            },
            egui::DroppedFile {
                path: Some(PathBuf::from("/tmp/art.JPG")),
                ..Default::default()
            },
            dropped("notes.txt"),
        ];

        let references = handler.process_dropped_files(&blobs);
        assert_eq!(references.len(), 2);
        assert!(references[0].starts_with(crate::rasterizer::BLOB_PREFIX));
        assert_eq!(references[1], "/tmp/art.JPG");
        assert_eq!(blobs.len(), 1);
    }

    #[test]
    fn test_same_file_is_not_uploaded_twice() {
        let blobs = BlobStore::new();
        let mut handler = FileHandler::new();
        let file = egui::DroppedFile {
            path: Some(PathBuf::from("/tmp/art.png")),
            ..Default::default()
        };
        handler.dropped_files = vec![file.clone()];
        assert_eq!(handler.process_dropped_files(&blobs).len(), 1);
        handler.dropped_files = vec![file];
        assert!(handler.process_dropped_files(&blobs).is_empty());
    }

    #[test]
    fn test_mime_wins_over_extension() {
        let file = egui::DroppedFile {
            mime: "text/plain".to_owned(),
            ..dropped("fake.png")
        };
        assert!(!is_image_file(&file));
    }
}
