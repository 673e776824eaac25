//! Units of content the layout engine places: section headers, bilingual
//! fields, and text items with optional list markers.

use crate::style::Color;

/// Placeholder drawn wherever a value is missing.
pub const PLACEHOLDER: &str = "N/A";

/// Separator used when a list value is shown inline in a field.
pub const LIST_SEPARATOR: &str = "; ";

/// Glyphs recognized as a leading bullet by [`ListMarker::detect`].
const BULLET_GLYPHS: &[char] = &['•', '●', '◦', '▪', '·'];

/// The glyph drawn for bulleted items.
pub const BULLET: char = '•';

/// A list marker drawn in front of a text item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMarker {
    #[default]
    None,
    Bullet,
    /// Numbered item, drawn as `"{n}."`.
    Ordered(u32),
}

impl ListMarker {
    /// The text drawn in the marker column, if any.
    pub fn label(&self) -> Option<String> {
        match self {
            ListMarker::None => None,
            ListMarker::Bullet => Some(BULLET.to_string()),
            ListMarker::Ordered(n) => Some(format!("{}.", n)),
        }
    }

    /// Recover a marker from text that still carries one inline.
    ///
    /// A leading bullet glyph is recognized with or without following
    /// whitespace. A leading `<digits>.` only counts when whitespace follows
    /// it, so `"3.5% growth"` stays ordinary text. Returns the marker and
    /// the text with the marker and its whitespace removed.
    pub fn detect(text: &str) -> (ListMarker, &str) {
        let trimmed = text.trim_start();

        if let Some(rest) = trimmed.strip_prefix(BULLET_GLYPHS) {
            return (ListMarker::Bullet, rest.trim_start());
        }

        let digits = trimmed.len() - trimmed.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits > 0 {
            let rest = &trimmed[digits..];
            if let Some(after_dot) = rest.strip_prefix('.') {
                if after_dot.starts_with(char::is_whitespace) {
                    if let Ok(n) = trimmed[..digits].parse::<u32>() {
                        return (ListMarker::Ordered(n), after_dot.trim_start());
                    }
                }
            }
        }

        (ListMarker::None, text)
    }
}

/// One paragraph or list entry of a text block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub marker: ListMarker,
}

impl TextItem {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marker: ListMarker::None,
        }
    }

    pub fn bullet(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marker: ListMarker::Bullet,
        }
    }

    pub fn numbered(n: u32, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marker: ListMarker::Ordered(n),
        }
    }

    /// Build an item from a string that may start with an inline marker.
    pub fn from_marked(text: &str) -> Self {
        let (marker, rest) = ListMarker::detect(text);
        Self {
            text: rest.to_string(),
            marker,
        }
    }

    /// Bullet items for each entry.
    pub fn bullets<I, S>(entries: I) -> Vec<TextItem>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        entries.into_iter().map(TextItem::bullet).collect()
    }

    /// Items numbered from 1 in order.
    pub fn numbered_list<I, S>(entries: I) -> Vec<TextItem>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        entries
            .into_iter()
            .zip(1u32..)
            .map(|(text, n)| TextItem::numbered(n, text))
            .collect()
    }
}

/// A label in the report's primary language with a secondary-language gloss.
#[derive(Debug, Clone, PartialEq)]
pub struct BilingualLabel {
    pub primary: String,
    pub secondary: String,
}

impl BilingualLabel {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    /// Both languages on one line, e.g. `"风险来源 Risk Source"`.
    pub fn joined(&self) -> String {
        match (self.primary.is_empty(), self.secondary.is_empty()) {
            (true, _) => self.secondary.clone(),
            (_, true) => self.primary.clone(),
            _ => format!("{} {}", self.primary, self.secondary),
        }
    }
}

/// The heading that opens a report section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionHeader {
    pub title: String,
    pub subtitle: String,
    pub accent: Color,
}

impl SectionHeader {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>, accent: Color) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            accent,
        }
    }

    /// The same header marked as continuing from the previous page.
    pub fn continued(&self) -> Self {
        Self {
            title: format!("{}（续）", self.title),
            subtitle: format!("{} (continued)", self.subtitle),
            accent: self.accent,
        }
    }
}

/// The value half of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Missing,
}

impl FieldValue {
    /// The text drawn for this value; empty or missing values become
    /// [`PLACEHOLDER`].
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) if !s.trim().is_empty() => s.clone(),
            FieldValue::List(items) if !items.is_empty() => items.join(LIST_SEPARATOR),
            _ => PLACEHOLDER.to_string(),
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map(FieldValue::Text).unwrap_or(FieldValue::Missing)
    }
}

impl From<Option<&str>> for FieldValue {
    fn from(value: Option<&str>) -> Self {
        value
            .map(|s| FieldValue::Text(s.to_string()))
            .unwrap_or(FieldValue::Missing)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

/// A bilingual label paired with a wrapped value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: BilingualLabel,
    pub value: FieldValue,
    pub value_color: Color,
}

impl Field {
    pub fn new(label: BilingualLabel, value: impl Into<FieldValue>) -> Self {
        Self {
            label,
            value: value.into(),
            value_color: Color::BLACK,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.value_color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_bullet_strips_glyph_and_space() {
        let (marker, rest) = ListMarker::detect("• Example text");
        assert_eq!(marker, ListMarker::Bullet);
        assert_eq!(rest, "Example text");

        let (marker, rest) = ListMarker::detect("•Tight bullet");
        assert_eq!(marker, ListMarker::Bullet);
        assert_eq!(rest, "Tight bullet");
    }

    #[test]
    fn detect_ordered_marker() {
        let (marker, rest) = ListMarker::detect("12. Prepare EUDR documentation");
        assert_eq!(marker, ListMarker::Ordered(12));
        assert_eq!(rest, "Prepare EUDR documentation");
    }

    #[test]
    fn decimal_numbers_are_not_markers() {
        let (marker, rest) = ListMarker::detect("3.5% growth in certified volume");
        assert_eq!(marker, ListMarker::None);
        assert_eq!(rest, "3.5% growth in certified volume");

        let (marker, _) = ListMarker::detect("2024. A year of audits");
        assert_eq!(marker, ListMarker::Ordered(2024));

        let (marker, _) = ListMarker::detect("42 suppliers audited");
        assert_eq!(marker, ListMarker::None);
    }

    #[test]
    fn numbered_list_counts_from_one() {
        let items = TextItem::numbered_list(["a", "b", "c"]);
        assert_eq!(items[0].marker, ListMarker::Ordered(1));
        assert_eq!(items[2].marker, ListMarker::Ordered(3));
        assert_eq!(items[2].marker.label().as_deref(), Some("3."));
    }

    #[test]
    fn field_values_degrade_to_placeholder() {
        assert_eq!(FieldValue::from(None::<String>).display(), "N/A");
        assert_eq!(FieldValue::Text("  ".into()).display(), "N/A");
        assert_eq!(FieldValue::List(vec![]).display(), "N/A");
        assert_eq!(
            FieldValue::List(vec!["EU".into(), "US".into()]).display(),
            "EU; US"
        );
    }

    #[test]
    fn continued_header_keeps_accent() {
        let header = SectionHeader::new("社会风险分析", "Social Risk Analysis (S)", Color::RED);
        let cont = header.continued();
        assert!(cont.subtitle.ends_with("(continued)"));
        assert_eq!(cont.accent, Color::RED);
    }
}
