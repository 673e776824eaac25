//! # PDF Serializer
//!
//! Takes the laid-out pages from the layout engine and writes a valid PDF file.
//!
//! This is a from-scratch PDF 1.7 writer covering the subset a report
//! needs: colored text, filled and stroked rectangles, rules, and fonts.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (fonts, pages, content streams, etc.)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root and info objects
//! %%EOF
//! ```
//!
//! ## Font Embedding
//!
//! The Helvetica faces are standard Type1 fonts and only referenced, with
//! text encoded as WinAnsi. The CJK body font is embedded whole as a
//! CIDFontType2 with Identity-H encoding: FontFile2, FontDescriptor,
//! CIDFont, ToUnicode CMap and the root Type0 dictionary. Styles that
//! resolve to the same registered face share one embedded font.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::GreenlinkError;
use crate::font::{CustomFontMetrics, FontContext, FontData, FontKey, FALLBACK_FAMILY};
use crate::layout::{DrawCommand, LayoutElement, LayoutPage};
use crate::model::Metadata;
use crate::style::TextStyle;

const PRODUCER: &str = "GreenLink";

pub struct PdfWriter;

/// Glyph lookup for an embedded TrueType font.
struct CustomFontEmbedData {
    char_to_gid: HashMap<char, u16>,
}

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    /// Index is the object number; entry 0 is the unused free object.
    objects: Vec<PdfObject>,
    /// Registered face -> font object id, in /F0, /F1, ... order.
    font_objects: Vec<(FontKey, usize)>,
    custom_font_data: HashMap<FontKey, CustomFontEmbedData>,
}

struct PdfObject {
    data: Vec<u8>,
}

impl PdfBuilder {
    fn new() -> Self {
        // 0 = placeholder (PDF objects are 1-indexed), 1 = Catalog, 2 = Pages
        Self {
            objects: (0..3).map(|_| PdfObject { data: Vec::new() }).collect(),
            font_objects: Vec::new(),
            custom_font_data: HashMap::new(),
        }
    }

    fn push(&mut self, data: Vec<u8>) -> usize {
        let id = self.objects.len();
        self.objects.push(PdfObject { data });
        id
    }

    /// Add a FlateDecode stream object with optional extra dictionary entries.
    fn push_stream(&mut self, content: &[u8], extra: &str) -> usize {
        let compressed = compress_to_vec_zlib(content, 6);
        let mut data: Vec<u8> = Vec::new();
        let _ = write!(
            data,
            "<< /Length {}{} /Filter /FlateDecode >>\nstream\n",
            compressed.len(),
            extra
        );
        data.extend_from_slice(&compressed);
        data.extend_from_slice(b"\nendstream");
        self.push(data)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write laid-out pages to a PDF byte vector.
    pub fn write(
        &self,
        pages: &[LayoutPage],
        metadata: &Metadata,
        font_context: &FontContext,
    ) -> Result<Vec<u8>, GreenlinkError> {
        if pages.is_empty() {
            return Err(GreenlinkError::RenderError(
                "layout produced no pages".to_string(),
            ));
        }

        let mut builder = PdfBuilder::new();
        self.register_fonts(&mut builder, pages, font_context)?;

        let font_resources = self.build_font_resource_dict(&builder.font_objects);
        let mut page_obj_ids: Vec<usize> = Vec::with_capacity(pages.len());

        for page in pages {
            let content = self.build_content_stream_for_page(page, &builder, font_context);
            let content_obj_id = builder.push_stream(content.as_bytes(), "");

            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << /Font << {} >> >> >>",
                page.width, page.height, content_obj_id, font_resources
            );
            page_obj_ids.push(builder.push(page_dict.into_bytes()));
        }

        builder.objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = builder.push(Self::build_info_dict(metadata).into_bytes());

        tracing::debug!(
            pages = pages.len(),
            fonts = builder.font_objects.len(),
            objects = builder.objects.len() - 1,
            "writing PDF"
        );
        Ok(self.serialize(&builder, info_obj_id))
    }

    fn build_info_dict(metadata: &Metadata) -> String {
        let mut info = String::from("<< ");
        let entries = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
            ("Creator", &metadata.creator),
        ];
        for (name, value) in entries {
            if let Some(value) = value {
                let _ = write!(info, "/{} {} ", name, Self::pdf_text_string(value));
            }
        }
        let _ = write!(info, "/Producer ({}) >>", PRODUCER);
        info
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream_for_page(
        &self,
        page: &LayoutPage,
        builder: &PdfBuilder,
        font_context: &FontContext,
    ) -> String {
        let mut stream = String::new();
        for element in &page.elements {
            self.write_element(&mut stream, element, page.height, builder, font_context);
        }
        stream
    }

    /// Write a single layout element as PDF operators.
    fn write_element(
        &self,
        stream: &mut String,
        element: &LayoutElement,
        page_height: f64,
        builder: &PdfBuilder,
        font_context: &FontContext,
    ) {
        match &element.draw {
            DrawCommand::Rect {
                background,
                border_width,
                border_color,
            } => {
                let x = element.x;
                let y = page_height - element.y - element.height;
                let (w, h) = (element.width, element.height);

                if let Some(bg) = background {
                    if bg.a > 0.0 {
                        let _ = write!(
                            stream,
                            "q\n{:.3} {:.3} {:.3} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
                            bg.r, bg.g, bg.b, x, y, w, h
                        );
                    }
                }
                if *border_width > 0.0 {
                    let bc = border_color;
                    let _ = write!(
                        stream,
                        "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{:.2} {:.2} {:.2} {:.2} re\nS\nQ\n",
                        bc.r, bc.g, bc.b, border_width, x, y, w, h
                    );
                }
            }

            DrawCommand::Line { color, thickness } => {
                let y = page_height - element.y;
                let _ = write!(
                    stream,
                    "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
                    color.r,
                    color.g,
                    color.b,
                    thickness,
                    element.x,
                    y,
                    element.x + element.width,
                    y
                );
            }

            DrawCommand::Text {
                text,
                baseline,
                style,
            } => {
                let key = Self::resolved_key(font_context, style);
                let font_idx = self.font_index(&key, &builder.font_objects);
                let color = style.color;
                let _ = write!(
                    stream,
                    "BT\n{:.3} {:.3} {:.3} rg\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n",
                    color.r,
                    color.g,
                    color.b,
                    font_idx,
                    style.font_size,
                    element.x,
                    page_height - baseline
                );

                match builder.custom_font_data.get(&key) {
                    Some(embed) => {
                        let mut hex = String::new();
                        for ch in text.chars() {
                            let gid = embed.char_to_gid.get(&ch).copied().unwrap_or(0);
                            let _ = write!(hex, "{:04X}", gid);
                        }
                        let _ = write!(stream, "<{}> Tj\n", hex);
                    }
                    None => {
                        let _ = write!(stream, "({}) Tj\n", Self::encode_winansi(text));
                    }
                }
                let _ = write!(stream, "ET\n");
            }
        }
    }

    /// The registered face a text style will actually be drawn with.
    fn resolved_key(font_context: &FontContext, style: &TextStyle) -> FontKey {
        font_context
            .registry()
            .resolve_entry(&style.font_family, style.font_weight, style.is_italic())
            .map(|(key, _)| key.clone())
            .unwrap_or_else(|| FontKey {
                family: FALLBACK_FAMILY.to_string(),
                weight: 400,
                italic: false,
            })
    }

    /// Register the faces used across all pages. Each registered face gets
    /// one PDF font object no matter how many styles resolve to it.
    fn register_fonts(
        &self,
        builder: &mut PdfBuilder,
        pages: &[LayoutPage],
        font_context: &FontContext,
    ) -> Result<(), GreenlinkError> {
        // Sorted for deterministic object order.
        let mut font_chars: BTreeMap<FontKey, BTreeSet<char>> = BTreeMap::new();
        for page in pages {
            for element in &page.elements {
                if let DrawCommand::Text { text, style, .. } = &element.draw {
                    let key = Self::resolved_key(font_context, style);
                    font_chars.entry(key).or_default().extend(text.chars());
                }
            }
        }

        if font_chars.is_empty() {
            font_chars.insert(
                FontKey {
                    family: FALLBACK_FAMILY.to_string(),
                    weight: 400,
                    italic: false,
                },
                BTreeSet::new(),
            );
        }

        for (key, used_chars) in &font_chars {
            match font_context.resolve(&key.family, key.weight, key.italic) {
                FontData::Standard(std_font) => {
                    let font_dict = format!(
                        "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                         /Encoding /WinAnsiEncoding >>",
                        std_font.pdf_name()
                    );
                    let obj_id = builder.push(font_dict.into_bytes());
                    builder.font_objects.push((key.clone(), obj_id));
                }
                FontData::Custom { data, metrics } => {
                    let type0_obj_id =
                        Self::write_custom_font_objects(builder, key, data, metrics, used_chars)?;
                    builder.font_objects.push((key.clone(), type0_obj_id));
                }
            }
        }

        Ok(())
    }

    /// Write the 5 CIDFont PDF objects for a custom TrueType font.
    /// Returns the object ID of the Type0 root font dictionary.
    fn write_custom_font_objects(
        builder: &mut PdfBuilder,
        key: &FontKey,
        ttf_data: &[u8],
        metrics: &CustomFontMetrics,
        used_chars: &BTreeSet<char>,
    ) -> Result<usize, GreenlinkError> {
        let face = ttf_parser::Face::parse(ttf_data, 0).map_err(|e| {
            GreenlinkError::FontError(format!(
                "Failed to parse TTF data for font '{}': {}",
                key.family, e
            ))
        })?;

        let units_per_em = metrics.units_per_em;
        let ascender = metrics.ascender;
        let descender = metrics.descender;

        let char_to_gid: HashMap<char, u16> = used_chars
            .iter()
            .filter_map(|ch| metrics.glyph_ids.get(ch).map(|&gid| (*ch, gid)))
            .collect();
        let missing = used_chars.len() - char_to_gid.len();
        if missing > 0 {
            tracing::warn!(font = %key.family, missing, "characters without glyphs drawn as .notdef");
        }

        let pdf_font_name = Self::sanitize_font_name(&key.family, key.weight, key.italic);

        // 1. FontFile2 stream with the whole TrueType file
        let fontfile2_id = builder.push_stream(ttf_data, &format!(" /Length1 {}", ttf_data.len()));

        // 2. FontDescriptor
        let scale = 1000.0 / units_per_em as f64;
        let bbox = face.global_bounding_box();
        let bbox_str = format!(
            "[{} {} {} {}]",
            (bbox.x_min as f64 * scale) as i32,
            (bbox.y_min as f64 * scale) as i32,
            (bbox.x_max as f64 * scale) as i32,
            (bbox.y_max as f64 * scale) as i32,
        );
        let cap_height = face.capital_height().unwrap_or(ascender) as f64 * scale;
        let stem_v = if key.weight >= 700 { 120 } else { 80 };
        let font_descriptor_dict = format!(
            "<< /Type /FontDescriptor /FontName /{} /Flags 4 \
             /FontBBox {} /ItalicAngle {} \
             /Ascent {} /Descent {} /CapHeight {} /StemV {} \
             /FontFile2 {} 0 R >>",
            pdf_font_name,
            bbox_str,
            if key.italic { -12 } else { 0 },
            (ascender as f64 * scale) as i32,
            (descender as f64 * scale) as i32,
            cap_height as i32,
            stem_v,
            fontfile2_id,
        );
        let font_descriptor_id = builder.push(font_descriptor_dict.into_bytes());

        // 3. CIDFont dictionary (DescendantFont)
        let w_array = Self::build_w_array(&char_to_gid, |gid| {
            face.glyph_hor_advance(ttf_parser::GlyphId(gid))
                .map(|adv| (adv as f64 * scale) as u32)
                .unwrap_or(0)
        });
        let default_width = face
            .glyph_hor_advance(ttf_parser::GlyphId(0))
            .map(|adv| (adv as f64 * scale) as u32)
            .unwrap_or(1000);
        let cidfont_dict = format!(
            "<< /Type /Font /Subtype /CIDFontType2 /BaseFont /{} \
             /CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> \
             /FontDescriptor {} 0 R /DW {} /W {} \
             /CIDToGIDMap /Identity >>",
            pdf_font_name, font_descriptor_id, default_width, w_array,
        );
        let cidfont_id = builder.push(cidfont_dict.into_bytes());

        // 4. ToUnicode CMap
        let cmap_content = Self::build_tounicode_cmap(&char_to_gid, &pdf_font_name);
        let tounicode_id = builder.push_stream(cmap_content.as_bytes(), "");

        // 5. Type0 font dictionary (the root, referenced by /Resources)
        let type0_dict = format!(
            "<< /Type /Font /Subtype /Type0 /BaseFont /{} \
             /Encoding /Identity-H \
             /DescendantFonts [{} 0 R] \
             /ToUnicode {} 0 R >>",
            pdf_font_name, cidfont_id, tounicode_id,
        );
        let type0_id = builder.push(type0_dict.into_bytes());

        builder
            .custom_font_data
            .insert(key.clone(), CustomFontEmbedData { char_to_gid });

        Ok(type0_id)
    }

    /// Build the /W array for per-glyph widths in CIDFont.
    /// Format: [gid [width] gid [width] ...]
    fn build_w_array(char_to_gid: &HashMap<char, u16>, width_of: impl Fn(u16) -> u32) -> String {
        let gids: BTreeSet<u16> = char_to_gid.values().copied().collect();
        let mut result = String::from("[");
        for gid in gids {
            let _ = write!(result, " {} [{}]", gid, width_of(gid));
        }
        result.push_str(" ]");
        result
    }

    /// Build a ToUnicode CMap for text extraction/copy-paste support.
    fn build_tounicode_cmap(char_to_gid: &HashMap<char, u16>, font_name: &str) -> String {
        // Invert the mapping: gid -> unicode
        let gid_to_char: BTreeMap<u16, char> =
            char_to_gid.iter().map(|(&ch, &gid)| (gid, ch)).collect();
        let entries: Vec<(u16, char)> = gid_to_char.into_iter().collect();

        let mut cmap = String::new();
        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo\n");
        cmap.push_str("<< /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        let _ = writeln!(cmap, "/CMapName /{}-UTF16 def", font_name);
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n");
        cmap.push_str("<0000> <FFFF>\n");
        cmap.push_str("endcodespacerange\n");

        // PDF spec limits beginbfchar to 100 entries per block
        for chunk in entries.chunks(100) {
            let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
            for &(gid, ch) in chunk {
                let _ = writeln!(cmap, "<{:04X}> <{}>", gid, Self::utf16_hex(&ch.to_string()));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\n");
        cmap.push_str("end\n");
        cmap
    }

    /// Sanitize a font name for use as a PDF name object.
    /// Strips spaces and special characters, appends weight/style suffixes.
    fn sanitize_font_name(family: &str, weight: u32, italic: bool) -> String {
        let mut name: String = family
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if name.is_empty() {
            name = "CustomFont".to_string();
        }
        if weight >= 700 {
            name.push_str("-Bold");
        }
        if italic {
            name.push_str("-Italic");
        }
        name
    }

    fn build_font_resource_dict(&self, font_objects: &[(FontKey, usize)]) -> String {
        font_objects
            .iter()
            .enumerate()
            .map(|(i, (_, obj_id))| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Look up the font index (/F0, /F1, etc.) for a registered face.
    fn font_index(&self, key: &FontKey, font_objects: &[(FontKey, usize)]) -> usize {
        font_objects
            .iter()
            .position(|(k, _)| k == key)
            .unwrap_or(0)
    }

    /// A PDF text string: literal for ASCII, UTF-16BE hex with a byte
    /// order mark otherwise.
    fn pdf_text_string(s: &str) -> String {
        if s.is_ascii() {
            format!("({})", Self::escape_pdf_string(s))
        } else {
            format!("<FEFF{}>", Self::utf16_hex(s))
        }
    }

    fn utf16_hex(s: &str) -> String {
        s.encode_utf16().map(|unit| format!("{:04X}", unit)).collect()
    }

    /// Escape special characters in a PDF string.
    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)")
    }

    /// Encode text for a standard font's literal string. Characters outside
    /// WinAnsi become `?`.
    fn encode_winansi(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            let b = Self::unicode_to_winansi(ch).unwrap_or(b'?');
            match b {
                b'\\' => out.push_str("\\\\"),
                b'(' => out.push_str("\\("),
                b')' => out.push_str("\\)"),
                0x20..=0x7E => out.push(b as char),
                // Octal escape for bytes outside the printable ASCII range
                _ => {
                    let _ = write!(out, "\\{:03o}", b);
                }
            }
        }
        out
    }

    /// Map a Unicode codepoint to a WinAnsiEncoding byte value.
    ///
    /// WinAnsiEncoding is based on Windows-1252. Most codepoints in
    /// 0x20..=0x7E and 0xA0..=0xFF map directly. The 0x80..=0x9F range
    /// contains special mappings for smart quotes, bullets, dashes, etc.
    fn unicode_to_winansi(ch: char) -> Option<u8> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
            return Some(cp as u8);
        }
        match cp {
            0x20AC => Some(0x80), // Euro sign
            0x201A => Some(0x82),
            0x0192 => Some(0x83),
            0x201E => Some(0x84),
            0x2026 => Some(0x85), // Horizontal ellipsis
            0x2020 => Some(0x86),
            0x2021 => Some(0x87),
            0x02C6 => Some(0x88),
            0x2030 => Some(0x89), // Per mille sign
            0x0160 => Some(0x8A),
            0x2039 => Some(0x8B),
            0x0152 => Some(0x8C),
            0x017D => Some(0x8E),
            0x2018 => Some(0x91), // Left single quotation mark
            0x2019 => Some(0x92), // Right single quotation mark
            0x201C => Some(0x93), // Left double quotation mark
            0x201D => Some(0x94), // Right double quotation mark
            0x2022 => Some(0x95), // Bullet
            0x2013 => Some(0x96), // En dash
            0x2014 => Some(0x97), // Em dash
            0x02DC => Some(0x98),
            0x2122 => Some(0x99), // Trade mark sign
            0x0161 => Some(0x9A),
            0x203A => Some(0x9B),
            0x0153 => Some(0x9C),
            0x017E => Some(0x9E),
            0x0178 => Some(0x9F),
            _ => None,
        }
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            info_obj_id,
            xref_offset
        );

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ElementKind;
    use crate::style::Color;
    use miniz_oxide::inflate::decompress_to_vec_zlib;

    fn page(elements: Vec<LayoutElement>) -> LayoutPage {
        LayoutPage {
            number: 1,
            width: 595.28,
            height: 841.89,
            elements,
        }
    }

    fn text(content: &str, style: TextStyle) -> LayoutElement {
        LayoutElement {
            x: 54.0,
            y: 54.0,
            width: 100.0,
            height: 13.0,
            kind: ElementKind::Body,
            draw: DrawCommand::Text {
                text: content.to_string(),
                baseline: 64.0,
                style,
            },
        }
    }

    /// Decompress every FlateDecode stream in the file.
    fn streams(bytes: &[u8]) -> Vec<String> {
        let mut out = Vec::new();
        let mut rest = bytes;
        while let Some(start) = find(rest, b"stream\n") {
            let body = &rest[start + 7..];
            let Some(end) = find(body, b"\nendstream") else {
                break;
            };
            if let Ok(raw) = decompress_to_vec_zlib(&body[..end]) {
                out.push(String::from_utf8_lossy(&raw).into_owned());
            }
            rest = &body[end + b"\nendstream".len()..];
        }
        out
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(PdfWriter::escape_pdf_string("Hello (World)"), "Hello \\(World\\)");
        assert_eq!(PdfWriter::escape_pdf_string("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_no_pages_is_an_error() {
        let result = PdfWriter::new().write(&[], &Metadata::default(), &FontContext::new());
        assert!(matches!(result, Err(GreenlinkError::RenderError(_))));
    }

    #[test]
    fn test_empty_page_produces_valid_pdf() {
        let bytes = PdfWriter::new()
            .write(&[page(vec![])], &Metadata::default(), &FontContext::new())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(find(&bytes, b"%%EOF").is_some());
        assert!(find(&bytes, b"xref").is_some());
        assert!(find(&bytes, b"/Producer (GreenLink)").is_some());
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = PdfWriter::new()
            .write(
                &[page(vec![text("Hi", TextStyle::default())])],
                &Metadata::default(),
                &FontContext::new(),
            )
            .unwrap();
        // Streams are binary, so offsets are checked on raw bytes.
        let xref = find(&bytes, b"xref\n").unwrap();
        let table = std::str::from_utf8(&bytes[xref..]).unwrap();
        let entries: Vec<&str> = table
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .collect();
        assert!(!entries.is_empty());
        for (i, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            let expected = format!("{} 0 obj", i + 1);
            assert!(bytes[offset..].starts_with(expected.as_bytes()), "object {} misplaced", i + 1);
        }
    }

    #[test]
    fn test_metadata_in_pdf() {
        let metadata = Metadata {
            title: Some("Acme Corp - ESG Report".to_string()),
            author: Some("GreenLink".to_string()),
            subject: None,
            creator: None,
        };
        let bytes = PdfWriter::new()
            .write(&[page(vec![])], &metadata, &FontContext::new())
            .unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Title (Acme Corp - ESG Report)"));
        assert!(text.contains("/Author (GreenLink)"));
        assert!(!text.contains("/Subject"));
    }

    #[test]
    fn test_non_ascii_title_is_utf16() {
        assert_eq!(PdfWriter::pdf_text_string("中粮"), "<FEFF4E2D7CAE>");
        assert_eq!(PdfWriter::pdf_text_string("IOI (M)"), "(IOI \\(M\\))");
    }

    #[test]
    fn test_bold_font_registered_separately() {
        let pages = [page(vec![
            text("A", TextStyle::regular("Helvetica", 12.0)),
            text("A", TextStyle::bold("Helvetica", 12.0)),
        ])];
        let bytes = PdfWriter::new()
            .write(&pages, &Metadata::default(), &FontContext::new())
            .unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/BaseFont /Helvetica "));
        assert!(text.contains("/BaseFont /Helvetica-Bold "));
        assert!(text.contains("/Type1"));
        assert!(!text.contains("CIDFontType2"));
    }

    #[test]
    fn test_unregistered_family_shares_helvetica() {
        let pages = [page(vec![
            text("A", TextStyle::regular("Helvetica", 12.0)),
            text("B", TextStyle::regular(crate::font::CJK_FAMILY, 12.0)),
        ])];
        let bytes = PdfWriter::new()
            .write(&pages, &Metadata::default(), &FontContext::new())
            .unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert_eq!(text.matches("/Subtype /Type1").count(), 1);
    }

    #[test]
    fn test_content_stream_operators() {
        let rule = LayoutElement {
            x: 56.69,
            y: 120.0,
            width: 481.89,
            height: 2.0,
            kind: ElementKind::Rule,
            draw: DrawCommand::Line {
                color: Color::GREEN,
                thickness: 2.0,
            },
        };
        let banner = LayoutElement {
            x: 0.0,
            y: 0.0,
            width: 595.28,
            height: 141.73,
            kind: ElementKind::Decoration,
            draw: DrawCommand::Rect {
                background: Some(Color::GREEN),
                border_width: 0.0,
                border_color: Color::GREEN,
            },
        };
        let colored = text("Risk (High) • 中", TextStyle::bold("Helvetica", 11.0).with_color(Color::RED));
        let bytes = PdfWriter::new()
            .write(&[page(vec![banner, rule, colored])], &Metadata::default(), &FontContext::new())
            .unwrap();
        let content = streams(&bytes).join("\n");

        assert!(content.contains("0.150 0.680 0.380 rg\n0.00 700.16 595.28 141.73 re\nf"));
        assert!(content.contains("2.00 w\n56.69 721.89 m\n538.58 721.89 l\nS"));
        assert!(content.contains("0.910 0.300 0.240 rg"));
        assert!(content.contains("(Risk \\(High\\) \\225 ?) Tj"));
        assert!(content.contains("54.00 777.89 Td"));
    }

    #[test]
    fn test_sanitize_font_name() {
        assert_eq!(PdfWriter::sanitize_font_name("GreenLinkCJK", 400, false), "GreenLinkCJK");
        assert_eq!(PdfWriter::sanitize_font_name("GreenLinkCJK", 700, false), "GreenLinkCJK-Bold");
        assert_eq!(PdfWriter::sanitize_font_name("Noto Sans SC", 400, true), "NotoSansSC-Italic");
        assert_eq!(PdfWriter::sanitize_font_name("思源黑体", 400, false), "CustomFont");
    }

    #[test]
    fn test_tounicode_cmap_format() {
        let mut char_to_gid = HashMap::new();
        char_to_gid.insert('A', 36u16);
        char_to_gid.insert('中', 1200u16);

        let cmap = PdfWriter::build_tounicode_cmap(&char_to_gid, "TestFont");
        assert!(cmap.contains("2 beginbfchar"));
        assert!(cmap.contains("<0024> <0041>"));
        assert!(cmap.contains("<04B0> <4E2D>"));
        assert!(cmap.contains("<0000> <FFFF>"));
        assert!(cmap.contains("/CMapName /TestFont-UTF16 def"));
    }

    #[test]
    fn test_w_array_sorted_and_deduplicated() {
        let mut char_to_gid = HashMap::new();
        char_to_gid.insert('b', 5u16);
        char_to_gid.insert('a', 3u16);
        char_to_gid.insert('c', 5u16);
        let w = PdfWriter::build_w_array(&char_to_gid, |gid| gid as u32 * 100);
        assert_eq!(w, "[ 3 [300] 5 [500] ]");
    }
}
