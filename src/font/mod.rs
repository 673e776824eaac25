//! # Font Management
//!
//! Text measurement for the layout engine and font data for the PDF writer.
//!
//! The Helvetica family is always available as one of the standard PDF
//! fonts and needs no embedding. Chinese text needs a real TrueType font:
//! one is registered under [`CJK_FAMILY`] by [`init`], exactly once per
//! process. If it cannot be found or parsed the engine keeps going with
//! Helvetica and logs a warning; CJK glyphs then degrade to `?`.

pub mod metrics;

pub use metrics::StandardFontMetrics;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;

/// Family name under which the CJK body font is registered.
pub const CJK_FAMILY: &str = "GreenLinkCJK";

/// Family used when no CJK font is available.
pub const FALLBACK_FAMILY: &str = "Helvetica";

/// Environment variable naming the regular CJK font file.
pub const REGULAR_FONT_ENV: &str = "GREENLINK_FONT_REGULAR";
/// Environment variable naming the bold CJK font file.
pub const BOLD_FONT_ENV: &str = "GREENLINK_FONT_BOLD";

const REGULAR_CANDIDATES: &[&str] = &[
    "fonts/NotoSansSC-Regular.ttf",
    "assets/fonts/NotoSansSC-Regular.ttf",
    "fonts/SimHei.ttf",
];

const BOLD_CANDIDATES: &[&str] = &[
    "fonts/NotoSansSC-Bold.ttf",
    "assets/fonts/NotoSansSC-Bold.ttf",
];

/// A font registry that maps font family + weight + style to font data.
pub struct FontRegistry {
    fonts: HashMap<FontKey, FontData>,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct FontKey {
    pub family: String,
    pub weight: u32,
    pub italic: bool,
}

fn snap_weight(weight: u32) -> u32 {
    if weight >= 600 {
        700
    } else {
        400
    }
}

#[derive(Debug, Clone)]
pub enum FontData {
    /// One of the standard PDF fonts. No embedding needed.
    Standard(StandardFont),
    /// A TrueType font that needs to be embedded.
    Custom {
        data: Vec<u8>,
        metrics: CustomFontMetrics,
    },
}

/// Parsed metrics from a TrueType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct CustomFontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
    pub ascender: i16,
    pub descender: i16,
    /// Maps characters to their glyph IDs in the font.
    pub glyph_ids: HashMap<char, u16>,
}

impl CustomFontMetrics {
    /// Get the advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    /// Parse metrics from font data using ttf-parser.
    ///
    /// Only single-face TrueType (glyf) fonts are accepted: collections and
    /// CFF-flavoured OpenType fonts cannot be embedded as FontFile2.
    pub fn from_font_data(data: &[u8]) -> Result<Self, String> {
        if data.starts_with(b"ttcf") {
            return Err("font collections (.ttc) are not supported".to_string());
        }
        let face = ttf_parser::Face::parse(data, 0).map_err(|e| e.to_string())?;
        if face.tables().glyf.is_none() {
            return Err("font has no TrueType outlines".to_string());
        }
        let units_per_em = face.units_per_em();

        let mut advance_widths = HashMap::new();
        let mut glyph_ids = HashMap::new();
        let mut default_advance = 0u16;

        // Basic Multilingual Plane is enough for report text.
        for code in 32u32..=0xFFFF {
            if let Some(ch) = char::from_u32(code) {
                if let Some(glyph_id) = face.glyph_index(ch) {
                    let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                    advance_widths.insert(ch, advance);
                    glyph_ids.insert(ch, glyph_id.0);
                    if ch == ' ' {
                        default_advance = advance;
                    }
                }
            }
        }

        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        Ok(CustomFontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
            ascender: face.ascender(),
            descender: face.descender(),
            glyph_ids,
        })
    }
}

/// The standard PDF fonts a report uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
        }
    }

    /// Obliques share the widths of their upright faces.
    pub fn metrics(&self) -> StandardFontMetrics {
        match self {
            Self::Helvetica | Self::HelveticaOblique => metrics::HELVETICA_METRICS,
            Self::HelveticaBold | Self::HelveticaBoldOblique => metrics::HELVETICA_BOLD_METRICS,
        }
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        let mut fonts = HashMap::new();

        let standard_mappings = [
            ((400, false), StandardFont::Helvetica),
            ((700, false), StandardFont::HelveticaBold),
            ((400, true), StandardFont::HelveticaOblique),
            ((700, true), StandardFont::HelveticaBoldOblique),
        ];

        for ((weight, italic), font) in standard_mappings {
            fonts.insert(
                FontKey {
                    family: FALLBACK_FAMILY.to_string(),
                    weight,
                    italic,
                },
                FontData::Standard(font),
            );
        }

        Self { fonts }
    }

    /// Look up a font, falling back to the upright face of the same family
    /// and then to Helvetica.
    pub fn resolve(&self, family: &str, weight: u32, italic: bool) -> &FontData {
        self.resolve_entry(family, weight, italic)
            .map(|(_, font)| font)
            // Helvetica is registered in every face by `new`.
            .unwrap_or(&HELVETICA_DATA)
    }

    /// Like [`resolve`](Self::resolve), but also returns the key of the
    /// registered face that was chosen. Styles that fall back to the same
    /// face share a key.
    pub fn resolve_entry(&self, family: &str, weight: u32, italic: bool) -> Option<(&FontKey, &FontData)> {
        let weight = snap_weight(weight);
        let candidates = [
            (family, weight, italic),
            (family, weight, false),
            (family, 400, false),
            (FALLBACK_FAMILY, weight, italic),
        ];
        candidates.into_iter().find_map(|(family, weight, italic)| {
            let key = FontKey {
                family: family.to_string(),
                weight,
                italic,
            };
            self.fonts.get_key_value(&key)
        })
    }

    /// Register a custom font.
    pub fn register(
        &mut self,
        family: &str,
        weight: u32,
        italic: bool,
        data: Vec<u8>,
        metrics: CustomFontMetrics,
    ) {
        self.fonts.insert(
            FontKey {
                family: family.to_string(),
                weight: snap_weight(weight),
                italic,
            },
            FontData::Custom { data, metrics },
        );
    }

    pub fn contains_family(&self, family: &str) -> bool {
        self.fonts.keys().any(|k| k.family == family)
    }
}

static HELVETICA_DATA: FontData = FontData::Standard(StandardFont::Helvetica);

/// Where to find the CJK body font.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontSources {
    /// Regular-weight TrueType file. Searched in well-known locations when unset.
    pub regular: Option<PathBuf>,
    /// Bold TrueType file. The regular face is reused when unset or missing.
    pub bold: Option<PathBuf>,
}

impl FontSources {
    /// Font paths from `GREENLINK_FONT_REGULAR` / `GREENLINK_FONT_BOLD`.
    pub fn from_env() -> Self {
        Self {
            regular: std::env::var_os(REGULAR_FONT_ENV).map(PathBuf::from),
            bold: std::env::var_os(BOLD_FONT_ENV).map(PathBuf::from),
        }
    }

    /// Fill unset paths from `other`.
    pub fn or(self, other: FontSources) -> Self {
        Self {
            regular: self.regular.or(other.regular),
            bold: self.bold.or(other.bold),
        }
    }
}

fn locate(explicit: Option<&Path>, candidates: &[&str]) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => candidates
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_file()),
    }
}

fn load_face(path: &Path) -> Option<(Vec<u8>, CustomFontMetrics)> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read font file");
            return None;
        }
    };
    match CustomFontMetrics::from_font_data(&data) {
        Ok(metrics) => Some((data, metrics)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot parse font file");
            None
        }
    }
}

/// Shared font context used by layout and PDF serialization.
/// Provides text measurement with real glyph metrics.
pub struct FontContext {
    registry: FontRegistry,
}

impl Default for FontContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FontContext {
    /// A context with only the standard Helvetica faces.
    pub fn new() -> Self {
        Self {
            registry: FontRegistry::new(),
        }
    }

    /// Build a context with the CJK body font registered when it can be
    /// loaded. Never fails: problems are logged and Helvetica is used.
    pub fn load(sources: &FontSources) -> Self {
        let mut ctx = Self::new();

        let Some(regular_path) = locate(sources.regular.as_deref(), REGULAR_CANDIDATES) else {
            tracing::warn!(
                "no CJK font configured (set {}); falling back to {}",
                REGULAR_FONT_ENV,
                FALLBACK_FAMILY
            );
            return ctx;
        };
        let Some((regular_data, regular_metrics)) = load_face(&regular_path) else {
            tracing::warn!("falling back to {} for report text", FALLBACK_FAMILY);
            return ctx;
        };

        ctx.registry
            .register(CJK_FAMILY, 400, false, regular_data, regular_metrics);
        tracing::debug!(path = %regular_path.display(), "registered CJK font");

        // Without a bold face, bold text resolves to the regular one.
        match locate(sources.bold.as_deref(), BOLD_CANDIDATES).and_then(|path| load_face(&path)) {
            Some((bold_data, bold_metrics)) => {
                ctx.registry
                    .register(CJK_FAMILY, 700, false, bold_data, bold_metrics);
            }
            None => tracing::debug!("no bold CJK face; bold text uses the regular face"),
        }
        ctx
    }

    /// The family report text should be set in.
    pub fn body_family(&self) -> &'static str {
        if self.registry.contains_family(CJK_FAMILY) {
            CJK_FAMILY
        } else {
            FALLBACK_FAMILY
        }
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(
        &self,
        ch: char,
        family: &str,
        weight: u32,
        italic: bool,
        font_size: f64,
    ) -> f64 {
        match self.registry.resolve(family, weight, italic) {
            FontData::Standard(std_font) => std_font.metrics().char_width(ch, font_size),
            FontData::Custom { metrics, .. } => metrics.char_width(ch, font_size),
        }
    }

    /// Measure the width of a string in points.
    pub fn measure_string(
        &self,
        text: &str,
        family: &str,
        weight: u32,
        italic: bool,
        font_size: f64,
    ) -> f64 {
        match self.registry.resolve(family, weight, italic) {
            FontData::Standard(std_font) => std_font.metrics().measure_string(text, font_size),
            FontData::Custom { metrics, .. } => text
                .chars()
                .map(|ch| metrics.char_width(ch, font_size))
                .sum(),
        }
    }

    /// Resolve a font key to its font data.
    pub fn resolve(&self, family: &str, weight: u32, italic: bool) -> &FontData {
        self.registry.resolve(family, weight, italic)
    }

    /// Access the underlying font registry.
    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }
}

static SHARED: OnceLock<FontContext> = OnceLock::new();

/// Register fonts for the whole process. Only the first call loads
/// anything; later calls return the same context regardless of `sources`.
pub fn init(sources: &FontSources) -> &'static FontContext {
    SHARED.get_or_init(|| FontContext::load(sources))
}

/// The process-wide font context, initialized from the environment on
/// first use.
pub fn shared() -> &'static FontContext {
    if let Some(ctx) = SHARED.get() {
        return ctx;
    }
    init(&FontSources::from_env())
}
