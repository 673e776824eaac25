//! # Report Composition
//!
//! Turns [`ReportData`] into layout engine calls. The engine knows nothing
//! about ESG; this module decides which sections exist, what goes in them,
//! and how risk levels are colored.
//!
//! Page order:
//!
//! ```text
//! cover -> environmental (E) -> social (S) -> [supply chain] -> recommendations
//! ```
//!
//! Each major section starts on a new page. The supply chain section only
//! exists when the data has something to put in it.

mod actions;
mod analysis;
mod cover;
mod supply_chain;

use crate::config::ReportConfig;
use crate::font::FontContext;
use crate::layout::{
    BilingualLabel, LayoutEngine, LayoutPage, PageGeometry, SectionHeader, TextItem,
};
use crate::model::{RiskSummary, ReportData};
use crate::style::{Color, RiskTier};

/// Body text size for list items.
const LIST_SIZE: f64 = 9.0;
/// Body text size for paragraphs.
const PARAGRAPH_SIZE: f64 = 10.0;

/// Lay out the complete report.
pub fn layout_report(data: &ReportData, config: &ReportConfig, fonts: &FontContext) -> Vec<LayoutPage> {
    let mut engine = LayoutEngine::new(fonts, PageGeometry::a4(), config.footer());

    cover::draw(&mut engine, data, config);

    engine.page_break();
    analysis::environment(&mut engine, data);

    engine.page_break();
    analysis::social(&mut engine, data);

    match &data.supply_chain {
        Some(chain) if chain.has_content() => {
            engine.page_break();
            supply_chain::draw(&mut engine, data, chain);
        }
        _ => tracing::debug!("no supply chain data; section omitted"),
    }

    engine.page_break();
    actions::draw(&mut engine, data, config);

    let pages = engine.finish();
    tracing::debug!(pages = pages.len(), company = data.company_name(), "report laid out");
    pages
}

fn label(primary: &str, secondary: &str) -> BilingualLabel {
    BilingualLabel::new(primary, secondary)
}

fn header(title: &str, subtitle: &str, accent: Color) -> SectionHeader {
    SectionHeader::new(title, subtitle, accent)
}

/// Color for a pillar's overview line.
fn summary_color(summary: &RiskSummary) -> Color {
    RiskTier::classify(summary.risk_score, summary.risk_level.as_deref()).color()
}

/// Cut `text` to `max_chars` characters, marking the cut with `...`.
fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

/// Draw `items` as a bulleted list under a subheading. Nothing is drawn
/// when there are no items.
fn bullet_list(engine: &mut LayoutEngine<'_>, heading: BilingualLabel, items: &[String], limit: usize) {
    if items.is_empty() {
        return;
    }
    engine.draw_subheading(&heading);
    let style = engine.style(LIST_SIZE);
    let items = TextItem::bullets(items.iter().take(limit).cloned());
    engine.draw_text_block(&items, &style, crate::layout::CM);
    engine.advance(LIST_SIZE);
}

/// Draw a paragraph under a subheading, with `N/A` when it is missing.
fn paragraph(engine: &mut LayoutEngine<'_>, heading: BilingualLabel, text: Option<&str>) {
    engine.draw_subheading(&heading);
    let style = engine.style(PARAGRAPH_SIZE);
    let text = text.unwrap_or(crate::layout::PLACEHOLDER);
    engine.draw_text_block(&[TextItem::plain(text)], &style, crate::layout::CM);
    engine.advance(LIST_SIZE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ElementKind;

    fn render(json: &str) -> Vec<LayoutPage> {
        let data = ReportData::from_json(json).unwrap();
        let config = ReportConfig {
            report_date: chrono::NaiveDate::from_ymd_opt(2024, 11, 30),
            ..ReportConfig::default()
        };
        layout_report(&data, &config, &FontContext::new())
    }

    fn all_text(pages: &[LayoutPage]) -> String {
        pages
            .iter()
            .flat_map(|p| p.texts().map(|(_, t)| t.to_string()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("强迫劳动指控", 2), "强迫...");
    }

    #[test]
    fn test_empty_report_still_renders() {
        let pages = render("{}");
        // Cover, environment, social, recommendations.
        assert_eq!(pages.len(), 4);
        let text = all_text(&pages);
        assert!(text.contains("Unknown Company"));
        assert!(text.contains("N/A (N/A/100)"));
        assert!(!text.contains("Supply Chain Risk Analysis"));
    }

    #[test]
    fn test_sections_start_on_new_pages() {
        let pages = render(r#"{"company": "FGV Holdings", "environment": {"risk_score": 30}}"#);
        assert!(pages[1].find_text("Environmental Risk Analysis (E)").is_some());
        assert!(pages[2].find_text("Social Risk Analysis (S)").is_some());
        assert!(pages[3].find_text("Recommended Actions").is_some());
    }

    #[test]
    fn test_midstream_defaults_and_findings() {
        let pages = render(
            r#"{
                "company": "COFCO International",
                "environment": {
                    "analysis": {
                        "key_findings": ["a", "b", "c", "d", "e"],
                        "conclusion": "Supplier concessions show stable canopy cover."
                    }
                },
                "supply_chain": {"upstream": {"suppliers": [{"name": "FGV Holdings", "risk_status": "高风险"}]}}
            }"#,
        );
        let text = all_text(&pages);
        assert!(text.contains("Midstream Processor / Buyer"));
        assert!(text.contains("Complete on-site audit of high-risk suppliers (FGV, IOI)"));
        assert!(text.contains("Supplier concessions show stable canopy cover."));
        let env_markers = pages[1].elements_of(ElementKind::Marker).count();
        assert_eq!(env_markers, 4);
        assert!(text.contains("Supply Chain Risk Analysis"));
        let status = pages
            .iter()
            .find_map(|p| p.find_text("Risk Status:"))
            .unwrap();
        match &status.draw {
            crate::layout::DrawCommand::Text { style, .. } => assert_eq!(style.color, Color::RED),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_event_list_limits_and_truncation() {
        let long_event = "Z".repeat(150);
        let events: Vec<String> = (0..7)
            .map(|i| {
                format!(
                    r#"{{"date": "2023-0{}", "event": "{}", "impact": "Buyers paused orders", "severity": "High"}}"#,
                    i + 1,
                    long_event
                )
            })
            .collect();
        let json = format!(r#"{{"company": "IOI", "social": {{"key_events": [{}]}}}}"#, events.join(","));
        let text = all_text(&render(&json));
        assert!(text.contains("Event 5: 2023-05"));
        assert!(!text.contains("Event 6"));
        // Each description keeps its first 100 characters, possibly wrapped.
        assert_eq!(text.matches('Z').count(), 5 * 100);
        assert_eq!(text.matches("Severity: High").count(), 5);
    }

    fn color_of(pages: &[LayoutPage], needle: &str) -> Color {
        let element = pages
            .iter()
            .find_map(|p| p.find_text(needle))
            .unwrap_or_else(|| panic!("no text {:?}", needle));
        match &element.draw {
            crate::layout::DrawCommand::Text { style, .. } => style.color,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unrecognized_supplier_status_is_orange() {
        let pages = render(
            r#"{"supply_chain": {"upstream": {"suppliers": [
                {"name": "Mill A", "risk_status": "Under review"},
                {"name": "Mill B"}
            ]}}}"#,
        );
        assert_eq!(color_of(&pages, "Risk Status: Under review"), Color::ORANGE);
        assert_eq!(color_of(&pages, "Risk Status: N/A"), Color::ORANGE);
    }

    #[test]
    fn test_unrecognized_event_severity_is_green() {
        let pages = render(
            r#"{"social": {"key_events": [
                {"date": "2022", "event": "Permit delay", "severity": "Minor"},
                {"date": "2023", "event": "Strike", "severity": "Medium"}
            ]}}"#,
        );
        assert_eq!(color_of(&pages, "Severity: Minor"), Color::GREEN);
        assert_eq!(color_of(&pages, "Severity: Medium"), Color::ORANGE);
    }

    #[test]
    fn test_supplied_recommendations_are_numbered() {
        let pages = render(
            r#"{"recommendations": {"immediate": ["one", "two", "three", "four", "five"], "long_term": ["later"]}}"#,
        );
        let last = pages.last().unwrap();
        let markers: Vec<&str> = last
            .elements_of(ElementKind::Marker)
            .filter_map(|e| e.text())
            .collect();
        assert_eq!(markers, vec!["1.", "2.", "3.", "4.", "1."]);
        assert!(last.find_text("five").is_none());
        assert!(last.find_text("Conduct comprehensive supplier ESG audit").is_none());
    }
}
