//! Advance widths for the standard Helvetica faces.
//!
//! Widths come from the Adobe AFM files and are in 1/1000 em. Only the
//! printable ASCII range is tabulated; the handful of WinAnsi punctuation
//! characters a report actually uses are special-cased, and anything the
//! font cannot draw (CJK in particular) is measured as a full em so that
//! layout stays sane when the CJK font is unavailable.

/// Width table for one standard font.
#[derive(Debug, Clone, Copy)]
pub struct StandardFontMetrics {
    /// Widths for chars 0x20..=0x7E.
    ascii: &'static [u16; 95],
    /// Width used for Latin-1 and other narrow characters not in the table.
    default_width: u16,
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' - '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0' - '?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@' - 'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P' - '_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`' - 'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // 'p' - '~'
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' - '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0' - '?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@' - 'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P' - '_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`' - 'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,      // 'p' - '~'
];

pub(crate) const HELVETICA_METRICS: StandardFontMetrics = StandardFontMetrics {
    ascii: &HELVETICA,
    default_width: 556,
};

pub(crate) const HELVETICA_BOLD_METRICS: StandardFontMetrics = StandardFontMetrics {
    ascii: &HELVETICA_BOLD,
    default_width: 611,
};

/// Whether a character occupies a full em in East Asian typesetting.
pub fn is_wide(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x20000..=0x2FFFD
    )
}

impl StandardFontMetrics {
    /// Advance width in 1/1000 em.
    pub fn char_units(&self, ch: char) -> u16 {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) {
            return self.ascii[(cp - 0x20) as usize];
        }
        match ch {
            '\u{00A0}' => self.ascii[0],
            '\u{2022}' => 350,             // bullet
            '\u{2013}' => 556,             // en dash
            '\u{2014}' | '\u{2026}' => 1000, // em dash, ellipsis
            '\u{2018}' | '\u{2019}' => 222,
            '\u{201C}' | '\u{201D}' => 333,
            _ if is_wide(ch) => 1000,
            _ => self.default_width,
        }
    }

    /// Get the advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.char_units(ch) as f64 / 1000.0 * font_size
    }

    /// Measure a string in points.
    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_width() {
        assert!((HELVETICA_METRICS.char_width(' ', 12.0) - 3.336).abs() < 0.001);
    }

    #[test]
    fn test_table_alignment() {
        // Spot checks at each row boundary guard against an off-by-one in the tables.
        assert_eq!(HELVETICA_METRICS.char_units('0'), 556);
        assert_eq!(HELVETICA_METRICS.char_units('@'), 1015);
        assert_eq!(HELVETICA_METRICS.char_units('P'), 667);
        assert_eq!(HELVETICA_METRICS.char_units('i'), 222);
        assert_eq!(HELVETICA_METRICS.char_units('~'), 584);
        assert_eq!(HELVETICA_BOLD_METRICS.char_units('m'), 889);
        assert_eq!(HELVETICA_BOLD_METRICS.char_units('~'), 584);
    }

    #[test]
    fn test_cjk_is_full_width() {
        assert_eq!(HELVETICA_METRICS.char_units('中'), 1000);
        assert!(is_wide('粮'));
        assert!(!is_wide('a'));
    }
}
