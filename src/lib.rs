//! # GreenLink
//!
//! Paginated PDF generation for bilingual (Chinese/English) ESG risk
//! assessment reports.
//!
//! The input is pre-computed risk data for one company. The output is an
//! A4 report: a cover page, an environmental section, a social section,
//! an optional supply chain section and recommended actions, each with a
//! page-numbered footer.
//!
//! Pagination is decided while content is placed. Every block asks the
//! cursor for space before it is drawn, section headers never split from
//! their first line, and a wrapped list item keeps its marker with its
//! first line.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON)
//!       ↓
//!   [model]    ReportData, lenient field parsing
//!       ↓
//!   [report]   Which sections exist and what goes in them
//!       ↓
//!   [layout]   Cursor, page breaks, fields, lists, footers
//!       ↓         (uses [text] line breaking and [font] metrics)
//!   [pdf]      Serialize to PDF bytes
//! ```

pub mod config;
pub mod error;
pub mod font;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod report;
pub mod style;
pub mod text;

use config::ReportConfig;
use error::GreenlinkError;
use font::FontContext;
use model::{Metadata, ReportData};
use pdf::PdfWriter;

/// Render a report to PDF bytes.
///
/// Uses the shared font context and a configuration built from the
/// environment.
pub fn render_report(data: &ReportData) -> Result<Vec<u8>, GreenlinkError> {
    render_report_with(data, &ReportConfig::from_env(), font::shared())
}

/// Render a report with an explicit configuration and font context.
pub fn render_report_with(
    data: &ReportData,
    config: &ReportConfig,
    fonts: &FontContext,
) -> Result<Vec<u8>, GreenlinkError> {
    let pages = report::layout_report(data, config, fonts);
    if pages.is_empty() {
        return Err(GreenlinkError::RenderError(
            "report produced no pages".to_string(),
        ));
    }
    PdfWriter::new().write(&pages, &Metadata::for_report(data), fonts)
}

/// Render report data given as JSON text to PDF bytes.
pub fn render_json(json: &str) -> Result<Vec<u8>, GreenlinkError> {
    let data = ReportData::from_json(json)?;
    render_report(&data)
}
