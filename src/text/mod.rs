//! # Text Layout
//!
//! Line breaking and text measurement.
//!
//! Breaking is greedy first-fit: each line takes as many whole segments as
//! fit, where segments are delimited by UAX#14 break opportunities (after
//! spaces in Latin text, between ideographs in Chinese). A segment that is
//! wider than the whole line on its own is split character by character.

use crate::font::FontContext;
use crate::style::TextStyle;
use unicode_linebreak::{linebreaks, BreakOpportunity};

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    /// The text on this line, without trailing whitespace.
    pub text: String,
    /// Measured width of `text` in points.
    pub width: f64,
}

/// Tolerance for floating point width comparisons.
const EPSILON: f64 = 1e-6;

/// A run of text between two break opportunities.
struct Segment<'a> {
    text: &'a str,
    /// The line must end after this segment.
    mandatory: bool,
}

fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Split text at its UAX#14 break opportunities.
fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut result = Vec::new();
    let mut start = 0;
    for (end, opp) in linebreaks(text) {
        let mandatory = opp == BreakOpportunity::Mandatory && end < text.len();
        result.push(Segment {
            text: &text[start..end],
            mandatory,
        });
        start = end;
    }
    result
}

/// Accumulates one output line while breaking.
#[derive(Default)]
struct LineBuilder {
    text: String,
    /// Width including any trailing whitespace.
    width: f64,
    /// Width of the trailing whitespace in `width`.
    trailing: f64,
}

impl LineBuilder {
    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn visible_width(&self) -> f64 {
        self.width - self.trailing
    }

    fn take(&mut self) -> BrokenLine {
        let line = BrokenLine {
            text: self.text.trim_end().to_string(),
            width: self.visible_width().max(0.0),
        };
        *self = LineBuilder::default();
        line
    }
}

pub struct TextLayout;

impl Default for TextLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Break a string into lines that fit within `max_width`.
    ///
    /// Always returns at least one line; empty input yields one empty line.
    pub fn break_into_lines(
        &self,
        font_context: &FontContext,
        text: &str,
        max_width: f64,
        style: &TextStyle,
    ) -> Vec<BrokenLine> {
        let mut lines = Vec::new();
        let mut line = LineBuilder::default();

        for segment in segments(text) {
            let content = segment.text.trim_end_matches(is_line_terminator);
            let visible = content.trim_end();
            let seg_width = self.measure_width(font_context, content, style);
            let visible_width = self.measure_width(font_context, visible, style);

            if line.width + visible_width <= max_width + EPSILON {
                line.text.push_str(content);
                line.width += seg_width;
                line.trailing = seg_width - visible_width;
            } else {
                if !line.is_empty() {
                    lines.push(line.take());
                }
                if visible_width <= max_width + EPSILON {
                    line.text.push_str(content);
                    line.width = seg_width;
                    line.trailing = seg_width - visible_width;
                } else {
                    self.split_segment(font_context, content, max_width, style, &mut line, &mut lines);
                }
            }

            if segment.mandatory {
                lines.push(line.take());
            }
        }

        if !line.is_empty() || lines.is_empty() {
            lines.push(line.take());
        }

        lines
    }

    /// Character-level fallback for a segment wider than the line.
    fn split_segment(
        &self,
        font_context: &FontContext,
        content: &str,
        max_width: f64,
        style: &TextStyle,
        line: &mut LineBuilder,
        lines: &mut Vec<BrokenLine>,
    ) {
        for ch in content.chars() {
            let w = self.char_width(font_context, ch, style);
            if ch.is_whitespace() {
                line.text.push(ch);
                line.width += w;
                line.trailing += w;
                continue;
            }
            if line.visible_width() + line.trailing + w > max_width + EPSILON && !line.is_empty() {
                lines.push(line.take());
            }
            line.text.push(ch);
            line.width += w;
            line.trailing = 0.0;
        }
    }

    fn char_width(&self, font_context: &FontContext, ch: char, style: &TextStyle) -> f64 {
        font_context.char_width(
            ch,
            &style.font_family,
            style.font_weight,
            style.is_italic(),
            style.font_size,
        )
    }

    /// Measure the width of a string on a single line.
    pub fn measure_width(&self, font_context: &FontContext, text: &str, style: &TextStyle) -> f64 {
        font_context.measure_string(
            text,
            &style.font_family,
            style.font_weight,
            style.is_italic(),
            style.font_size,
        )
    }
}
