use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use log::{debug, warn};
use parking_lot::Mutex;
use rusttype::Font;

use super::RasterError;
use crate::element::TextStyle;

#[derive(Clone, Eq, PartialEq, Hash)]
struct FontKey {
    family: String,
    bold: bool,
    italic: bool,
}

/// A face plus the styling it could not provide natively
#[derive(Clone)]
pub struct ResolvedFont {
    pub font: Arc<Font<'static>>,
    pub synthetic_bold: bool,
    pub synthetic_italic: bool,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("synthetic_bold", &self.synthetic_bold)
            .field("synthetic_italic", &self.synthetic_italic)
            .finish_non_exhaustive()
    }
}

/// Resolves CSS-like family lists to `rusttype` fonts
pub struct FontManager {
    use_system_fonts: bool,
    db: OnceLock<Database>,
    fallback: OnceLock<Option<Arc<Font<'static>>>>,
    cache: Mutex<HashMap<FontKey, ResolvedFont>>,
}

impl Default for FontManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FontManager {
    /// System fonts through `fontdb`, then the bundled egui face
    pub fn new() -> Self {
        Self::with_system_fonts(true)
    }

    /// Only the bundled face; deterministic across machines
    pub fn bundled_only() -> Self {
        Self::with_system_fonts(false)
    }

    fn with_system_fonts(use_system_fonts: bool) -> Self {
        Self {
            use_system_fonts,
            db: OnceLock::new(),
            fallback: OnceLock::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn db(&self) -> &Database {
        self.db.get_or_init(|| {
            let mut db = Database::new();
            if self.use_system_fonts {
                db.load_system_fonts();
                debug!("Loaded {} system font faces", db.len());
            }
            db
        })
    }

    pub fn resolve(&self, style: &TextStyle) -> Result<ResolvedFont, RasterError> {
        let key = FontKey {
            family: style.font_family.clone(),
            bold: style.bold,
            italic: style.italic,
        };
        if let Some(found) = self.cache.lock().get(&key) {
            return Ok(found.clone());
        }

        let resolved = style
            .families()
            .find_map(|family| self.load_system(family, style.bold, style.italic))
            .or_else(|| {
                self.bundled().map(|font| ResolvedFont {
                    font,
                    synthetic_bold: style.bold,
                    synthetic_italic: style.italic,
                })
            })
            .ok_or_else(|| RasterError::FontUnavailable(style.font_family.clone()))?;

        self.cache.lock().insert(key, resolved.clone());
        Ok(resolved)
    }

    fn load_system(&self, family: &str, bold: bool, italic: bool) -> Option<ResolvedFont> {
        if !self.use_system_fonts {
            return None;
        }
        let families = [css_family(family)];
        let query = Query {
            families: &families,
            weight: if bold { Weight::BOLD } else { Weight::NORMAL },
            stretch: Stretch::Normal,
            style: if italic { Style::Italic } else { Style::Normal },
        };

        let db = self.db();
        let id = db.query(&query)?;
        let face = db.face(id)?;
        let synthetic_bold = bold && face.weight.0 < Weight::SEMIBOLD.0;
        let synthetic_italic = italic && face.style == Style::Normal;

        let font = db
            .with_face_data(id, |data, index| {
                Font::try_from_vec_and_index(data.to_vec(), index)
            })??;
        debug!("Resolved font family {family:?} (bold={bold}, italic={italic})");
        Some(ResolvedFont {
            font: Arc::new(font),
            synthetic_bold,
            synthetic_italic,
        })
    }

    fn bundled(&self) -> Option<Arc<Font<'static>>> {
        self.fallback
            .get_or_init(|| {
                let font = load_bundled_font();
                if font.is_none() {
                    warn!("Bundled fallback font could not be parsed");
                }
                font.map(Arc::new)
            })
            .clone()
    }
}

fn css_family(name: &str) -> Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        _ => Family::Name(name),
    }
}

/// The first proportional face egui ships with
fn load_bundled_font() -> Option<Font<'static>> {
    let definitions = egui::FontDefinitions::default();
    let name = definitions
        .families
        .get(&egui::FontFamily::Proportional)?
        .first()?;
    let data = definitions.font_data.get(name)?;
    Font::try_from_vec_and_index(data.font.to_vec(), data.index)
}
