//! System font lookup for text rasterization.

use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight};
use parking_lot::Mutex;
use rusttype::Font;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::sync::OnceLock;

#[derive(Clone, Eq, PartialEq, Hash)]
struct FontKey {
    family: String,
    weight: u16,
}

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!("Loaded {} font faces", db.len());
        db
    })
}

/// Families installed on this machine, sorted.
pub fn list_font_families() -> Vec<String> {
    let mut set = HashSet::new();
    for face in db().faces() {
        for (name, _) in &face.families {
            set.insert(name.clone());
        }
    }
    let mut out: Vec<_> = set.into_iter().collect();
    out.sort();
    out
}

/// Font for a CSS-like family name and weight, falling back to any
/// sans-serif face. `None` when the machine has no usable font at all.
pub fn font_for(family: &str, weight: u16) -> Option<&'static Font<'static>> {
    static CACHE: OnceLock<Mutex<HashMap<FontKey, Option<&'static Font<'static>>>>> =
        OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    let key = FontKey {
        family: family.to_string(),
        weight,
    };
    if let Some(found) = cache.lock().get(&key) {
        return *found;
    }

    let loaded = load_font(&[requested_family(family)], weight)
        .or_else(|| {
            tracing::warn!("Font '{}' not found, using sans-serif", family);
            load_font(&[Family::SansSerif], weight)
        })
        .or_else(|| load_font(&[Family::SansSerif], Weight::NORMAL.0));

    // Leaked once per key.
    let font_ref = loaded.map(|font| &*Box::leak(Box::new(font)));
    if font_ref.is_none() {
        tracing::warn!("No font available for '{}', text will be skipped", family);
    }
    cache.lock().insert(key, font_ref);
    font_ref
}

fn requested_family(family: &str) -> Family<'_> {
    match family.trim() {
        "" | "sans-serif" | "Sans" => Family::SansSerif,
        "serif" | "Serif" => Family::Serif,
        "monospace" | "Monospace" => Family::Monospace,
        other => Family::Name(other),
    }
}

fn load_font(families: &[Family<'_>], weight: u16) -> Option<Font<'static>> {
    let query = Query {
        families,
        weight: Weight(weight),
        stretch: Stretch::Normal,
        style: Style::Normal,
    };

    let id = db().query(&query)?;
    let face = db().face(id)?;
    let bytes = match &face.source {
        Source::File(path) | Source::SharedFile(path, _) => fs::read(path).ok()?,
        Source::Binary(data) => data.as_ref().as_ref().to_vec(),
    };
    Font::try_from_vec_and_index(bytes, face.index)
}
