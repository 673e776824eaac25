//! # Paginated Layout Engine
//!
//! Places report content onto fixed-size A4 pages one unit at a time.
//!
//! There is no infinite canvas and no slicing afterwards. Before each unit
//! is placed the engine asks "does this fit above the bottom limit?":
//!
//! 1. Section headers and the first line of a field are checked
//!    proactively and moved whole to the next page when they don't fit.
//! 2. Wrapped text is checked reactively, line by line, so a long value or
//!    paragraph continues on the next page where it left off.
//! 3. Every page gets its footer exactly once, when the page is closed.
//!
//! Coordinates are top-down: `y` grows toward the bottom of the page, and
//! the PDF writer flips them. The cursor is the top of the next line box.
//!
//! The cursor is a small state machine. A page starts `FreshPage`, becomes
//! `MidPage` once content lands on it, and passes through `NeedBreak` when
//! something would cross the bottom limit. A `FreshPage` is never broken
//! again, and each line triggers at most one break, so content larger than a
//! page cannot loop.

pub mod content;
pub mod page_break;

pub use content::{
    BilingualLabel, Field, FieldValue, ListMarker, SectionHeader, TextItem, PLACEHOLDER,
};

use crate::font::FontContext;
use crate::style::{Color, TextStyle};
use crate::text::TextLayout;
use page_break::{decide_break, BreakDecision};

/// Points per centimetre.
pub const CM: f64 = 28.3465;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.3;

/// Size of body text in fields.
const FIELD_FONT_SIZE: f64 = 10.0;
/// Size of the secondary-language half of a label.
const LABEL_SECONDARY_SIZE: f64 = 8.0;
/// Space after each field.
const FIELD_SPACING: f64 = 6.0;
/// Space after each item of a text block.
pub const ITEM_SPACING: f64 = 4.0;

const TITLE_SIZE: f64 = 16.0;
const SUBTITLE_SIZE: f64 = 10.0;
const RULE_GAP: f64 = 4.0;
const RULE_THICKNESS: f64 = 2.0;
/// Gap between the accent rule and the first line of section content.
const HEADER_BOTTOM_GAP: f64 = 0.5 * CM;

const SUBHEADING_SIZE: f64 = 11.0;
const SUBHEADING_GAP: f64 = 3.0;

const FOOTER_SIZE: f64 = 8.0;

/// Fewest lines of a wrapped item left at the bottom of a page.
pub const MIN_ORPHAN_LINES: usize = 2;

/// Tolerance for comparisons against the bottom limit.
pub const EPSILON: f64 = 1e-6;

pub fn line_height(font_size: f64) -> f64 {
    font_size * LINE_HEIGHT_FACTOR
}

/// Fixed page geometry shared by every page of a report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    /// Where content starts on every page.
    pub top: f64,
    /// No line box may extend below this.
    pub bottom_limit: f64,
    /// Baseline of the first footer line.
    pub footer_first_line: f64,
    /// Baseline of the second footer line.
    pub footer_second_line: f64,
}

impl PageGeometry {
    /// ISO A4 portrait with 2 cm side margins.
    pub fn a4() -> Self {
        let height = 841.89;
        Self {
            width: 595.28,
            height,
            margin_left: 2.0 * CM,
            margin_right: 2.0 * CM,
            top: 3.0 * CM,
            bottom_limit: height - 5.0 * CM,
            footer_first_line: height - 2.0 * CM,
            footer_second_line: height - 1.5 * CM,
        }
    }

    pub fn content_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn right_edge(&self) -> f64 {
        self.width - self.margin_right
    }

    /// Vertical space available for content on one page.
    pub fn usable_height(&self) -> f64 {
        self.bottom_limit - self.top
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// The two footer lines. The first is prefixed with the page number.
#[derive(Debug, Clone, PartialEq)]
pub struct FooterText {
    pub notice: String,
    pub attribution: String,
}

impl Default for FooterText {
    fn default() -> Self {
        Self {
            notice: "Confidential".to_string(),
            attribution: "Generated by GreenLink Platform | Based on Satellite & AI Analysis"
                .to_string(),
        }
    }
}

impl FooterText {
    pub fn first_line(&self, page_number: usize) -> String {
        format!("Page {} | {}", page_number, self.notice)
    }
}

/// A fully laid-out page ready for PDF serialization.
#[derive(Debug, Clone)]
pub struct LayoutPage {
    /// 1-based position in the document.
    pub number: usize,
    pub width: f64,
    pub height: f64,
    pub elements: Vec<LayoutElement>,
}

impl LayoutPage {
    /// All text drawn on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = (&LayoutElement, &str)> {
        self.elements.iter().filter_map(|e| match &e.draw {
            DrawCommand::Text { text, .. } => Some((e, text.as_str())),
            _ => None,
        })
    }

    /// The first text element containing `needle`.
    pub fn find_text(&self, needle: &str) -> Option<&LayoutElement> {
        self.texts()
            .find(|(_, text)| text.contains(needle))
            .map(|(e, _)| e)
    }

    pub fn elements_of(&self, kind: ElementKind) -> impl Iterator<Item = &LayoutElement> {
        self.elements.iter().filter(move |e| e.kind == kind)
    }
}

/// What part of the report an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Body,
    Marker,
    Label,
    Header,
    Rule,
    Footer,
    /// Cover page banners, boxes and free-positioned text.
    Decoration,
}

/// A positioned element on a page.
#[derive(Debug, Clone)]
pub struct LayoutElement {
    /// Top-left corner, top-down.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub kind: ElementKind,
    pub draw: DrawCommand,
}

impl LayoutElement {
    pub fn text(&self) -> Option<&str> {
        match &self.draw {
            DrawCommand::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// What to actually draw for this element.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// One line of text with its baseline at `baseline`.
    Text {
        text: String,
        baseline: f64,
        style: TextStyle,
    },
    /// A filled and/or stroked rectangle covering the element box.
    Rect {
        background: Option<Color>,
        border_width: f64,
        border_color: Color,
    },
    /// A horizontal rule along the top edge of the element box.
    Line { color: Color, thickness: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Nothing but repeated headers on this page yet.
    FreshPage,
    MidPage,
    /// The next unit would cross the bottom limit.
    NeedBreak,
}

/// Tracks where we are on the current page.
#[derive(Debug)]
struct PageCursor {
    number: usize,
    y: f64,
    elements: Vec<LayoutElement>,
    state: CursorState,
    footer_drawn: bool,
}

impl PageCursor {
    fn new(number: usize, top: f64) -> Self {
        Self {
            number,
            y: top,
            elements: Vec::new(),
            state: CursorState::FreshPage,
            footer_drawn: false,
        }
    }

    fn finalize(self, geometry: &PageGeometry) -> LayoutPage {
        LayoutPage {
            number: self.number,
            width: geometry.width,
            height: geometry.height,
            elements: self.elements,
        }
    }
}

/// The layout engine for one report. Build one per render call.
pub struct LayoutEngine<'a> {
    fonts: &'a FontContext,
    geometry: PageGeometry,
    text_layout: TextLayout,
    footer: FooterText,
    pages: Vec<LayoutPage>,
    cursor: PageCursor,
    continuation: Option<SectionHeader>,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(fonts: &'a FontContext, geometry: PageGeometry, footer: FooterText) -> Self {
        Self {
            fonts,
            geometry,
            text_layout: TextLayout::new(),
            footer,
            pages: Vec::new(),
            cursor: PageCursor::new(1, geometry.top),
            continuation: None,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn fonts(&self) -> &'a FontContext {
        self.fonts
    }

    pub fn cursor_y(&self) -> f64 {
        self.cursor.y
    }

    pub fn page_number(&self) -> usize {
        self.cursor.number
    }

    /// Regular body text at `size` in the report's body family.
    pub fn style(&self, size: f64) -> TextStyle {
        TextStyle::regular(self.fonts.body_family(), size)
    }

    /// Bold body text at `size`.
    pub fn bold(&self, size: f64) -> TextStyle {
        TextStyle::bold(self.fonts.body_family(), size)
    }

    pub fn measure(&self, text: &str, style: &TextStyle) -> f64 {
        self.text_layout.measure_width(self.fonts, text, style)
    }

    /// Header to redraw, marked as continued, at the top of every page this
    /// engine starts until it is cleared or a new section begins.
    pub fn set_continuation(&mut self, header: Option<SectionHeader>) {
        self.continuation = header;
    }

    fn remaining_height(&self) -> f64 {
        (self.geometry.bottom_limit - self.cursor.y).max(0.0)
    }

    fn fits(&self, height: f64) -> bool {
        self.cursor.y + height <= self.geometry.bottom_limit + EPSILON
    }

    /// Break to a new page unless `height` fits below the cursor. Returns
    /// whether a break was taken.
    pub fn ensure_space(&mut self, height: f64) -> bool {
        if self.fits(height) {
            return false;
        }
        self.force_break()
    }

    /// Move to the next page unless this one is still fresh.
    fn force_break(&mut self) -> bool {
        if self.cursor.state == CursorState::FreshPage {
            return false;
        }
        self.cursor.state = CursorState::NeedBreak;
        self.new_page();
        true
    }

    /// Explicit break between major sections. A no-op on a page that has
    /// no content yet.
    pub fn page_break(&mut self) {
        if self.cursor.state == CursorState::FreshPage {
            tracing::debug!(page = self.cursor.number, "skipping break on fresh page");
            return;
        }
        self.new_page();
    }

    fn new_page(&mut self) {
        let number = self.cursor.number;
        tracing::debug!(
            page = number,
            cursor_y = self.cursor.y,
            forced = self.cursor.state == CursorState::NeedBreak,
            "page break"
        );
        self.draw_footer(number);
        let finished = std::mem::replace(
            &mut self.cursor,
            PageCursor::new(number + 1, self.geometry.top),
        );
        self.pages.push(finished.finalize(&self.geometry));

        if let Some(header) = self.continuation.clone() {
            self.draw_header(&header.continued());
        }
    }

    /// Start a logical section: title, subtitle and an accent rule. The
    /// header plus one body line is kept together on one page. Returns the
    /// cursor below the rule.
    pub fn start_section(&mut self, header: &SectionHeader) -> f64 {
        self.continuation = None;

        let lines = [
            line_height(TITLE_SIZE),
            line_height(SUBTITLE_SIZE) + RULE_GAP + HEADER_BOTTOM_GAP,
            line_height(FIELD_FONT_SIZE),
        ];
        let remaining = self.remaining_height();
        if decide_break(remaining, &lines, false, 1) == BreakDecision::MoveToNextPage {
            self.force_break();
        }

        self.draw_header(header);
        self.cursor.state = CursorState::MidPage;
        self.cursor.y
    }

    /// Draw a header at the cursor without any break checks.
    fn draw_header(&mut self, header: &SectionHeader) {
        let left = self.geometry.margin_left;
        let title_style = self.bold(TITLE_SIZE);
        let y = self.cursor.y;
        self.push_text(left, y + TITLE_SIZE, &header.title, &title_style, ElementKind::Header);
        let mut y = y + line_height(TITLE_SIZE);

        if !header.subtitle.is_empty() {
            let subtitle_style = self.style(SUBTITLE_SIZE).with_color(Color::GRAY);
            self.push_text(left, y + SUBTITLE_SIZE, &header.subtitle, &subtitle_style, ElementKind::Header);
            y += line_height(SUBTITLE_SIZE);
        }

        y += RULE_GAP;
        self.cursor.elements.push(LayoutElement {
            x: left,
            y,
            width: self.geometry.content_width(),
            height: RULE_THICKNESS,
            kind: ElementKind::Rule,
            draw: DrawCommand::Line {
                color: header.accent,
                thickness: RULE_THICKNESS,
            },
        });
        self.cursor.y = y + HEADER_BOTTOM_GAP;
    }

    /// Draw a bold one-line heading inside a section, kept on the same page
    /// as the first line that follows it.
    pub fn draw_subheading(&mut self, label: &BilingualLabel) -> f64 {
        let style = self.bold(SUBHEADING_SIZE);
        let lh = line_height(SUBHEADING_SIZE);
        // Room for the heading, its gap, and a two-line field label.
        let next = line_height(FIELD_FONT_SIZE) + line_height(LABEL_SECONDARY_SIZE);
        let remaining = self.remaining_height();
        if decide_break(remaining, &[lh + SUBHEADING_GAP, next], false, 1)
            == BreakDecision::MoveToNextPage
        {
            self.force_break();
        }
        let x = self.geometry.margin_left + 0.5 * CM;
        let baseline = self.cursor.y + SUBHEADING_SIZE;
        self.push_text(x, baseline, &label.joined(), &style, ElementKind::Label);
        self.cursor.y += lh + SUBHEADING_GAP;
        self.cursor.state = CursorState::MidPage;
        self.cursor.y
    }

    /// Draw a bilingual label with its value wrapped in the value column.
    /// Returns the cursor after the field and its trailing spacing.
    pub fn draw_field(&mut self, field: &Field) -> f64 {
        let label_x = self.geometry.margin_left + 0.5 * CM;
        let value_x = self.geometry.margin_left + 5.0 * CM;
        let value_width = self.geometry.right_edge() - value_x;

        let value_style = self.style(FIELD_FONT_SIZE).with_color(field.value_color);
        let lh = line_height(FIELD_FONT_SIZE);
        let lines = self.text_layout.break_into_lines(
            self.fonts,
            &field.value.display(),
            value_width,
            &value_style,
        );

        let has_secondary = !field.label.secondary.is_empty();
        let label_height = if has_secondary {
            lh + line_height(LABEL_SECONDARY_SIZE)
        } else {
            lh
        };

        // The label and at least the first line of the value go together.
        self.ensure_space(label_height.max(lh));
        let start_page = self.cursor.number;
        let start_y = self.cursor.y;

        let primary_style = self.bold(FIELD_FONT_SIZE);
        self.push_text(label_x, start_y + FIELD_FONT_SIZE, &field.label.primary, &primary_style, ElementKind::Label);
        if has_secondary {
            let secondary_style = self.style(LABEL_SECONDARY_SIZE).with_color(Color::GRAY);
            self.push_text(
                label_x,
                start_y + lh + LABEL_SECONDARY_SIZE,
                &field.label.secondary,
                &secondary_style,
                ElementKind::Label,
            );
        }

        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.ensure_space(lh);
            }
            let y = self.cursor.y;
            self.push_text(value_x, y + FIELD_FONT_SIZE, &line.text, &value_style, ElementKind::Body);
            self.cursor.y += lh;
        }

        if self.cursor.number == start_page {
            self.cursor.y = self.cursor.y.max(start_y + label_height);
        }
        self.cursor.y += FIELD_SPACING;
        self.cursor.state = CursorState::MidPage;
        self.cursor.y
    }

    /// Draw plain, bulleted and numbered items, `indent` points in from the
    /// left margin. Marked items get a hanging indent: every line of the
    /// content starts after the widest marker in the block. A wrapped item
    /// leaves at least [`MIN_ORPHAN_LINES`] lines at the bottom of a page or
    /// moves to the next one. Returns the cursor after the block.
    pub fn draw_text_block(&mut self, items: &[TextItem], style: &TextStyle, indent: f64) -> f64 {
        let base_x = self.geometry.margin_left + indent;
        let lh = line_height(style.font_size);
        let marker_width = items
            .iter()
            .filter_map(|item| item.marker.label())
            .map(|m| self.measure(&format!("{} ", m), style))
            .fold(0.0, f64::max);

        for item in items {
            let marker = item.marker.label();
            let content_x = if marker.is_some() { base_x + marker_width } else { base_x };
            let width = (self.geometry.right_edge() - content_x).max(style.font_size);
            let lines = self
                .text_layout
                .break_into_lines(self.fonts, &item.text, width, style);
            let heights = vec![lh; lines.len()];

            let mut start = 0;
            while start < lines.len() {
                let orphans = MIN_ORPHAN_LINES.min(lines.len() - start);
                let count = match decide_break(self.remaining_height(), &heights[start..], true, orphans) {
                    BreakDecision::Place => lines.len() - start,
                    BreakDecision::Split { items_on_current_page } => items_on_current_page,
                    BreakDecision::MoveToNextPage => {
                        if self.force_break() {
                            continue;
                        }
                        // Not even one line fits on a fresh page.
                        1
                    }
                };

                for (offset, line) in lines[start..start + count].iter().enumerate() {
                    let baseline = self.cursor.y + style.font_size;
                    if start + offset == 0 {
                        if let Some(m) = &marker {
                            self.push_text(base_x, baseline, m, style, ElementKind::Marker);
                        }
                    }
                    self.push_text(content_x, baseline, &line.text, style, ElementKind::Body);
                    self.cursor.y += lh;
                    self.cursor.state = CursorState::MidPage;
                }
                start += count;
                if start < lines.len() {
                    self.force_break();
                }
            }
            self.cursor.y += ITEM_SPACING;
        }

        self.cursor.y
    }

    /// Draw the two footer lines on the current page. Only the first call
    /// for a page draws anything.
    pub fn draw_footer(&mut self, page_number: usize) {
        if self.cursor.footer_drawn || self.cursor.number != page_number {
            return;
        }
        let style = self.style(FOOTER_SIZE).italic().with_color(Color::GRAY);
        let first = self.footer.first_line(page_number);
        let second = self.footer.attribution.clone();
        self.centered(self.geometry.footer_first_line, &first, &style, ElementKind::Footer);
        if !second.is_empty() {
            self.centered(self.geometry.footer_second_line, &second, &style, ElementKind::Footer);
        }
        self.cursor.footer_drawn = true;
    }

    /// Draw free-positioned text with its baseline at `baseline`. Returns
    /// the measured width.
    pub fn draw_text_at(&mut self, x: f64, baseline: f64, text: &str, style: &TextStyle) -> f64 {
        self.cursor.state = CursorState::MidPage;
        self.push_text(x, baseline, text, style, ElementKind::Decoration)
    }

    /// Draw text centered on the page.
    pub fn draw_centered(&mut self, baseline: f64, text: &str, style: &TextStyle) -> f64 {
        self.cursor.state = CursorState::MidPage;
        self.centered(baseline, text, style, ElementKind::Decoration)
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.push_rect(x, y, width, height, Some(color), 0.0, color);
    }

    pub fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color, line_width: f64) {
        self.push_rect(x, y, width, height, None, line_width, color);
    }

    #[allow(clippy::too_many_arguments)]
    fn push_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        background: Option<Color>,
        border_width: f64,
        border_color: Color,
    ) {
        self.cursor.state = CursorState::MidPage;
        self.cursor.elements.push(LayoutElement {
            x,
            y,
            width,
            height,
            kind: ElementKind::Decoration,
            draw: DrawCommand::Rect {
                background,
                border_width,
                border_color,
            },
        });
    }

    /// Move the cursor to an absolute position on the current page.
    pub fn move_cursor_to(&mut self, y: f64) {
        self.cursor.y = y;
    }

    /// Move the cursor down by `dy`.
    pub fn advance(&mut self, dy: f64) -> f64 {
        self.cursor.y += dy;
        self.cursor.y
    }

    fn centered(&mut self, baseline: f64, text: &str, style: &TextStyle, kind: ElementKind) -> f64 {
        let width = self.measure(text, style);
        let x = (self.geometry.width - width) / 2.0;
        self.push_text(x, baseline, text, style, kind)
    }

    fn push_text(&mut self, x: f64, baseline: f64, text: &str, style: &TextStyle, kind: ElementKind) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let width = self.measure(text, style);
        self.cursor.elements.push(LayoutElement {
            x,
            y: baseline - style.font_size,
            width,
            height: line_height(style.font_size),
            kind,
            draw: DrawCommand::Text {
                text: text.to_string(),
                baseline,
                style: style.clone(),
            },
        });
        width
    }

    /// Close the last page and return every page in order.
    pub fn finish(mut self) -> Vec<LayoutPage> {
        let trailing_empty = self.cursor.state == CursorState::FreshPage && !self.pages.is_empty();
        if trailing_empty {
            tracing::debug!(page = self.cursor.number, "dropping empty trailing page");
        } else {
            let number = self.cursor.number;
            self.draw_footer(number);
            let last = std::mem::replace(&mut self.cursor, PageCursor::new(number + 1, self.geometry.top));
            self.pages.push(last.finalize(&self.geometry));
        }
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(fonts: &FontContext) -> LayoutEngine<'_> {
        LayoutEngine::new(fonts, PageGeometry::a4(), FooterText::default())
    }

    fn footers(page: &LayoutPage) -> Vec<&str> {
        page.elements_of(ElementKind::Footer)
            .filter_map(|e| e.text())
            .collect()
    }

    #[test]
    fn test_hanging_indent() {
        let fonts = FontContext::new();
        let mut engine = engine(&fonts);
        let style = engine.style(10.0);
        let long = "Establish a comprehensive supply chain monitoring system that covers \
                    every tier of suppliers, with weekly satellite checks of every \
                    concession and quarterly on-site audits of the highest risk mills";
        engine.draw_text_block(&[TextItem::from_marked(&format!("• {}", long))], &style, 0.5 * CM);
        let pages = engine.finish();

        let page = &pages[0];
        let marker: Vec<_> = page.elements_of(ElementKind::Marker).collect();
        assert_eq!(marker.len(), 1);
        assert_eq!(marker[0].text(), Some("•"));

        let body: Vec<_> = page.elements_of(ElementKind::Body).collect();
        assert!(body.len() >= 2, "expected wrapped lines, got {}", body.len());
        let base_x = PageGeometry::a4().margin_left + 0.5 * CM;
        let expected_x = base_x + fonts.measure_string("• ", "Helvetica", 400, false, 10.0);
        for line in &body {
            assert!((line.x - expected_x).abs() < 1e-9);
            assert!(!line.text().unwrap_or("").contains('•'));
        }
        assert!((marker[0].x - base_x).abs() < 1e-9);
    }

    #[test]
    fn test_plain_items_start_at_indent() {
        let fonts = FontContext::new();
        let mut engine = engine(&fonts);
        let style = engine.style(10.0);
        engine.draw_text_block(&[TextItem::plain("3.5% growth in certified volume")], &style, 0.0);
        let pages = engine.finish();
        let body: Vec<_> = pages[0].elements_of(ElementKind::Body).collect();
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].x, PageGeometry::a4().margin_left);
        assert_eq!(pages[0].elements_of(ElementKind::Marker).count(), 0);
    }

    #[test]
    fn test_page_count_matches_content_height() {
        let fonts = FontContext::new();
        let mut engine = engine(&fonts);
        let style = engine.style(10.0);
        let items: Vec<TextItem> = (0..100).map(|i| TextItem::plain(format!("Line {}", i))).collect();
        engine.draw_text_block(&items, &style, 0.0);
        let pages = engine.finish();

        let per_item = line_height(10.0) + ITEM_SPACING;
        let total = per_item * items.len() as f64;
        let expected = (total / PageGeometry::a4().usable_height()).ceil() as usize;
        assert!(pages.len() >= expected && pages.len() <= expected + 1);
        assert_eq!(pages.len(), 3);

        let body_lines: usize = pages.iter().map(|p| p.elements_of(ElementKind::Body).count()).sum();
        assert_eq!(body_lines, 100);
        for page in &pages {
            for e in page.elements_of(ElementKind::Body) {
                assert!(e.y + e.height <= PageGeometry::a4().bottom_limit + EPSILON);
            }
        }
    }

    #[test]
    fn test_footer_once_per_page() {
        let fonts = FontContext::new();
        let mut engine = engine(&fonts);
        let style = engine.style(10.0);
        let items: Vec<TextItem> = (0..80).map(|i| TextItem::bullet(format!("Item {}", i))).collect();
        engine.draw_text_block(&items, &style, 0.0);
        engine.draw_footer(1);
        let current = engine.page_number();
        engine.draw_footer(current);
        engine.draw_footer(current);
        let pages = engine.finish();

        assert!(pages.len() >= 2);
        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.number, i + 1);
            let lines = footers(page);
            assert_eq!(lines.len(), 2, "page {} footer lines", page.number);
            assert_eq!(lines[0], format!("Page {} | Confidential", i + 1));
        }
    }

    #[test]
    fn test_section_header_never_split() {
        let fonts = FontContext::new();
        let mut engine = engine(&fonts);
        let geometry = PageGeometry::a4();
        // Leave room for the title but not the rest of the header.
        engine.draw_text_at(geometry.margin_left, geometry.top + 10.0, "filler", &engine.style(10.0));
        engine.move_cursor_to(geometry.bottom_limit - line_height(TITLE_SIZE) - 2.0);
        let header = SectionHeader::new("环境风险分析", "Environmental Risk Analysis (E)", Color::GREEN);
        engine.start_section(&header);
        let pages = engine.finish();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].elements_of(ElementKind::Header).count(), 0);
        assert_eq!(pages[0].elements_of(ElementKind::Rule).count(), 0);
        assert_eq!(pages[1].elements_of(ElementKind::Header).count(), 2);
        assert_eq!(pages[1].elements_of(ElementKind::Rule).count(), 1);
    }

    #[test]
    fn test_field_wraps_without_reprinting_label() {
        let fonts = FontContext::new();
        let mut engine = engine(&fonts);
        let geometry = PageGeometry::a4();
        engine.draw_text_at(geometry.margin_left, geometry.top + 10.0, "filler", &engine.style(10.0));
        engine.move_cursor_to(geometry.bottom_limit - line_height(10.0) * 2.5);

        let value = "Sentinel-2 NDVI time series across all concessions ".repeat(12);
        let field = Field::new(BilingualLabel::new("分析方法", "Analysis Method"), value);
        engine.draw_field(&field);
        let pages = engine.finish();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].elements_of(ElementKind::Label).count(), 2);
        assert_eq!(pages[1].elements_of(ElementKind::Label).count(), 0);
        assert!(pages[1].elements_of(ElementKind::Body).count() > 0);
    }

    #[test]
    fn test_missing_field_value_shows_placeholder() {
        let fonts = FontContext::new();
        let mut engine = engine(&fonts);
        let field = Field::new(BilingualLabel::new("分析周期", "Period"), FieldValue::Missing);
        let before = engine.cursor_y();
        let after = engine.draw_field(&field);
        assert!(after > before);
        let pages = engine.finish();
        assert!(pages[0].find_text(PLACEHOLDER).is_some());
    }

    #[test]
    fn test_continuation_header_redrawn() {
        let fonts = FontContext::new();
        let mut engine = engine(&fonts);
        let header = SectionHeader::new("社会风险分析", "Social Risk Analysis (S)", Color::RED);
        engine.start_section(&header);
        engine.set_continuation(Some(header));
        let style = engine.style(9.0);
        let items: Vec<TextItem> = (0..60).map(|i| TextItem::plain(format!("Event {}", i))).collect();
        engine.draw_text_block(&items, &style, 0.0);
        engine.set_continuation(None);
        let pages = engine.finish();

        assert!(pages.len() >= 2);
        assert!(pages[0].find_text("(continued)").is_none());
        assert!(pages[1].find_text("Social Risk Analysis (S) (continued)").is_some());
        assert!(pages[1].find_text("社会风险分析（续）").is_some());
    }

    #[test]
    fn test_explicit_break_on_fresh_page_is_noop() {
        let fonts = FontContext::new();
        let mut engine = engine(&fonts);
        engine.page_break();
        assert_eq!(engine.page_number(), 1);
        engine.draw_text_block(&[TextItem::plain("content")], &engine.style(10.0), 0.0);
        engine.page_break();
        assert_eq!(engine.page_number(), 2);
        let pages = engine.finish();
        // The trailing page never received content.
        assert_eq!(pages.len(), 1);
    }

    /// A page with content on it and `room` points left above the bottom limit.
    fn nearly_full(engine: &mut LayoutEngine<'_>, room: f64) {
        let geometry = PageGeometry::a4();
        let filler = engine.style(10.0);
        engine.draw_text_at(geometry.margin_left, geometry.top + 10.0, "filler", &filler);
        engine.move_cursor_to(geometry.bottom_limit - room);
    }

    fn wrapped_item(engine: &LayoutEngine<'_>, lines: usize) -> TextItem {
        let style = engine.style(10.0);
        let mut text = String::new();
        while engine
            .text_layout
            .break_into_lines(engine.fonts, &text, PageGeometry::a4().content_width(), &style)
            .len()
            < lines
        {
            text.push_str("canopy cover stable across monitored concessions ");
        }
        TextItem::plain(text.trim_end())
    }

    #[test]
    fn test_subheading_moves_with_its_first_line() {
        let fonts = FontContext::new();
        let mut engine = engine(&fonts);
        nearly_full(&mut engine, 28.5);
        engine.draw_subheading(&BilingualLabel::new("结论", "Conclusion"));
        engine.draw_text_block(&[TextItem::plain("Vegetation stable.")], &engine.style(10.0), CM);
        let pages = engine.finish();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].elements_of(ElementKind::Label).count(), 0);
        assert_eq!(pages[1].elements_of(ElementKind::Label).count(), 1);
        assert_eq!(pages[1].elements_of(ElementKind::Body).count(), 1);
    }

    #[test]
    fn test_single_orphan_line_moves_whole_item() {
        let fonts = FontContext::new();
        let mut engine = engine(&fonts);
        let item = wrapped_item(&engine, 3);
        nearly_full(&mut engine, line_height(10.0) * 1.5);
        engine.draw_text_block(&[item], &engine.style(10.0), 0.0);
        let pages = engine.finish();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].elements_of(ElementKind::Body).count(), 0);
        assert_eq!(pages[1].elements_of(ElementKind::Body).count(), 3);
    }

    #[test]
    fn test_wrapped_item_splits_across_pages() {
        let fonts = FontContext::new();
        let mut engine = engine(&fonts);
        let item = wrapped_item(&engine, 3);
        nearly_full(&mut engine, line_height(10.0) * 2.5);
        engine.draw_text_block(&[item], &engine.style(10.0), 0.0);
        let pages = engine.finish();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].elements_of(ElementKind::Body).count(), 2);
        assert_eq!(pages[1].elements_of(ElementKind::Body).count(), 1);
    }

    #[test]
    fn test_numbered_items_share_content_column() {
        let fonts = FontContext::new();
        let mut engine = engine(&fonts);
        let items = TextItem::numbered_list((1..=10).map(|i| format!("Action {}", i)));
        engine.draw_text_block(&items, &engine.style(10.0), 0.0);
        let pages = engine.finish();

        let xs: Vec<f64> = pages[0].elements_of(ElementKind::Body).map(|e| e.x).collect();
        assert_eq!(xs.len(), 10);
        let widest = fonts.measure_string("10. ", "Helvetica", 400, false, 10.0);
        for x in xs {
            assert!((x - (PageGeometry::a4().margin_left + widest)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_oversized_line_is_placed_once() {
        let fonts = FontContext::new();
        let mut engine = engine(&fonts);
        let huge = engine.style(700.0);
        engine.draw_text_block(&[TextItem::plain("X")], &huge, 0.0);
        let pages = engine.finish();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].elements_of(ElementKind::Body).count(), 1);
    }
}
