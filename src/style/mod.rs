//! # Style System
//!
//! The small amount of styling a report needs: colors, font selection, and
//! the risk palette used to color scores, severities and supplier statuses.

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const GRAY: Color = Color {
        r: 0.5,
        g: 0.5,
        b: 0.5,
        a: 1.0,
    };
    pub const LIGHT_GRAY: Color = Color {
        r: 0.8,
        g: 0.8,
        b: 0.8,
        a: 1.0,
    };
    /// GreenLink brand green, also the low-risk color.
    pub const GREEN: Color = Color {
        r: 0.15,
        g: 0.68,
        b: 0.38,
        a: 1.0,
    };
    pub const ORANGE: Color = Color {
        r: 0.95,
        g: 0.61,
        b: 0.07,
        a: 1.0,
    };
    pub const RED: Color = Color {
        r: 0.91,
        g: 0.30,
        b: 0.24,
        a: 1.0,
    };
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub fn is_italic(self) -> bool {
        self == FontStyle::Italic
    }
}

/// Font and color for a run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: u32,
    pub font_style: FontStyle,
    pub color: Color,
}

impl TextStyle {
    /// Regular weight text in the given family.
    pub fn regular(family: &str, size: f64) -> Self {
        Self {
            font_family: family.to_string(),
            font_size: size,
            font_weight: 400,
            font_style: FontStyle::Normal,
            color: Color::BLACK,
        }
    }

    /// Bold text in the given family.
    pub fn bold(family: &str, size: f64) -> Self {
        Self {
            font_weight: 700,
            ..Self::regular(family, size)
        }
    }

    pub fn italic(mut self) -> Self {
        self.font_style = FontStyle::Italic;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn is_italic(&self) -> bool {
        self.font_style.is_italic()
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::regular("Helvetica", 10.0)
    }
}

/// Coarse risk classification driving the traffic-light palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTier {
    Low,
    Medium,
    High,
    /// Neither a score nor a recognizable level was supplied.
    Unknown,
}

const LOW_WORDS: &[&str] = &["低", "Low", "low"];
const MEDIUM_WORDS: &[&str] = &["中", "Medium", "medium", "Moderate", "moderate"];
const HIGH_WORDS: &[&str] = &["高", "严重", "High", "high", "Severe", "severe", "Critical"];

fn mentions(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

impl RiskTier {
    /// Classify a 0-100 risk score together with its level label.
    ///
    /// A score below 40 or a level mentioning "low" is low; below 70 is
    /// medium; anything else is high. Without a score the label decides.
    pub fn classify(score: Option<f64>, level: Option<&str>) -> Self {
        let level = level.unwrap_or("");
        match score {
            Some(s) if s < 40.0 || mentions(level, LOW_WORDS) => RiskTier::Low,
            Some(s) if s < 70.0 => RiskTier::Medium,
            Some(_) => RiskTier::High,
            None => Self::from_label(level),
        }
    }

    /// Classify a free-text label such as an event severity or supplier
    /// risk status.
    pub fn from_label(label: &str) -> Self {
        if mentions(label, HIGH_WORDS) {
            RiskTier::High
        } else if mentions(label, LOW_WORDS) {
            RiskTier::Low
        } else if mentions(label, MEDIUM_WORDS) {
            RiskTier::Medium
        } else {
            RiskTier::Unknown
        }
    }

    /// This tier, or `fallback` when the label was not recognized.
    pub fn known_or(self, fallback: RiskTier) -> Self {
        match self {
            RiskTier::Unknown => fallback,
            tier => tier,
        }
    }

    pub fn color(self) -> Color {
        match self {
            RiskTier::Low => Color::GREEN,
            RiskTier::Medium => Color::ORANGE,
            RiskTier::High => Color::RED,
            RiskTier::Unknown => Color::GRAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_thresholds() {
        assert_eq!(RiskTier::classify(Some(25.0), Some("Low")), RiskTier::Low);
        assert_eq!(RiskTier::classify(Some(55.0), Some("Medium")), RiskTier::Medium);
        assert_eq!(RiskTier::classify(Some(75.0), Some("High")), RiskTier::High);
        assert_eq!(RiskTier::classify(Some(70.0), None), RiskTier::High);
    }

    #[test]
    fn test_low_label_wins_over_score() {
        assert_eq!(RiskTier::classify(Some(80.0), Some("低风险")), RiskTier::Low);
    }

    #[test]
    fn test_missing_score_uses_label() {
        assert_eq!(RiskTier::classify(None, Some("高风险")), RiskTier::High);
        assert_eq!(RiskTier::classify(None, Some("中等")), RiskTier::Medium);
        assert_eq!(RiskTier::classify(None, None), RiskTier::Unknown);
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(RiskTier::from_label("严重"), RiskTier::High);
        assert_eq!(RiskTier::from_label("Severe"), RiskTier::High);
        assert_eq!(RiskTier::from_label("中"), RiskTier::Medium);
        assert_eq!(RiskTier::from_label("Low"), RiskTier::Low);
        assert_eq!(RiskTier::High.color(), Color::RED);
        assert_eq!(RiskTier::Low.color(), Color::GREEN);
    }

    #[test]
    fn test_unrecognized_label_takes_fallback() {
        assert_eq!(RiskTier::from_label("Under review").known_or(RiskTier::Medium), RiskTier::Medium);
        assert_eq!(RiskTier::from_label("High").known_or(RiskTier::Low), RiskTier::High);
    }
}
