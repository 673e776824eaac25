//! Report configuration.
//!
//! Everything here has a sensible default, so a report renders with no
//! configuration at all. A JSON file (camelCase keys) can override any
//! part, and the CJK font paths can also come from the environment:
//!
//! ```json
//! {
//!   "fonts": { "regular": "fonts/NotoSansSC-Regular.ttf" },
//!   "reportDate": "2024-11-30",
//!   "footerNotice": "Confidential"
//! }
//! ```

use std::path::Path;

use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::error::GreenlinkError;
use crate::font::FontSources;
use crate::layout::FooterText;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportConfig {
    pub fonts: FontSources,
    /// Date printed on the cover. Today when unset.
    pub report_date: Option<NaiveDate>,
    /// Text after the page number in the first footer line.
    pub footer_notice: String,
    /// Second footer line.
    pub footer_attribution: String,
    /// Contact lines printed at the end of the report.
    pub contact: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let footer = FooterText::default();
        Self {
            fonts: FontSources::default(),
            report_date: None,
            footer_notice: footer.notice,
            footer_attribution: footer.attribution,
            contact: vec![
                "GreenLink ESG Platform".to_string(),
                "Email: support@greenlink.com".to_string(),
                "Website: www.greenlink.com".to_string(),
            ],
        }
    }
}

impl ReportConfig {
    /// Defaults plus font paths from the environment.
    pub fn from_env() -> Self {
        Self {
            fonts: FontSources::from_env(),
            ..Self::default()
        }
    }

    /// Load a configuration file. Font paths not set in the file are taken
    /// from the environment.
    pub fn load(path: &Path) -> Result<Self, GreenlinkError> {
        let text = std::fs::read_to_string(path).map_err(|source| GreenlinkError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&text)?;
        config.fonts = config.fonts.or(FontSources::from_env());
        tracing::debug!(path = %path.display(), "loaded report configuration");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, GreenlinkError> {
        serde_json::from_str(text).map_err(|e| GreenlinkError::Config(e.to_string()))
    }

    /// The date printed on the cover.
    pub fn date(&self) -> NaiveDate {
        self.report_date.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn footer(&self) -> FooterText {
        FooterText {
            notice: self.footer_notice.clone(),
            attribution: self.footer_attribution.clone(),
        }
    }
}
