//! Cover page: banner, company, report facts and the risk overview.

use crate::config::ReportConfig;
use crate::font::FALLBACK_FAMILY;
use crate::layout::{LayoutEngine, TextItem, CM};
use crate::model::{ReportData, RiskSummary};
use crate::style::{Color, TextStyle};

use super::summary_color;

const DEFAULT_PERIOD: &str = "2018 - 2024";
const DESCRIPTION_CHARS: usize = 80;

const ADVANTAGES: &[&str] = &[
    "Real-time satellite monitoring (weekly updates)",
    "AI-powered sentiment analysis",
    "Separated E/S risk scoring (not aggregated like MSCI)",
    "90% cost reduction vs traditional ESG ratings",
];

pub(super) fn draw(engine: &mut LayoutEngine<'_>, data: &ReportData, config: &ReportConfig) {
    let geometry = *engine.geometry();
    let left = geometry.margin_left;

    engine.fill_rect(0.0, 0.0, geometry.width, 5.0 * CM, Color::GREEN);
    let brand = TextStyle::bold(FALLBACK_FAMILY, 28.0).with_color(Color::WHITE);
    engine.draw_centered(3.0 * CM, "GreenLink", &brand);
    let tagline = TextStyle::regular(FALLBACK_FAMILY, 16.0).with_color(Color::WHITE);
    engine.draw_centered(4.0 * CM, "ESG Risk Assessment Report", &tagline);

    let company = engine.bold(20.0);
    engine.draw_centered(8.0 * CM, data.company_name(), &company);

    if let Some(description) = &data.description {
        let style = engine.style(11.0);
        let short: String = description.chars().take(DESCRIPTION_CHARS).collect();
        let lines = crate::text::TextLayout::new().break_into_lines(
            engine.fonts(),
            &short,
            geometry.content_width(),
            &style,
        );
        for (i, line) in lines.iter().take(2).enumerate() {
            engine.draw_centered(8.8 * CM + i as f64 * 0.5 * CM, &line.text, &style);
        }
    }

    engine.stroke_rect(left, 9.7 * CM, geometry.content_width(), 3.4 * CM, Color::LIGHT_GRAY, 1.0);
    let period = data
        .environment
        .as_ref()
        .and_then(|e| e.analysis.as_ref())
        .and_then(|a| a.period.as_deref())
        .unwrap_or(DEFAULT_PERIOD);
    let facts = [
        format!("Report Date: {}", config.date().format("%B %d, %Y")),
        "Report Type: Supply Chain ESG Compliance".to_string(),
        format!("Company Type: {}", data.company_type().description()),
        format!("Assessment Period: {}", period),
    ];
    let fact_style = engine.style(11.0);
    for (i, fact) in facts.iter().enumerate() {
        engine.draw_text_at(left + 0.5 * CM, 10.5 * CM + i as f64 * 0.7 * CM, fact, &fact_style);
    }

    let mut y = 15.0 * CM;
    let heading = engine.bold(14.0);
    engine.draw_text_at(left, y, "Risk Level Overview", &heading);

    let mut pillars = vec![
        (
            "Environmental Risk (E):",
            data.environment.as_ref().map(|e| e.summary()).unwrap_or_default(),
        ),
        (
            "Social Risk (S):",
            data.social.as_ref().map(|s| s.summary()).unwrap_or_default(),
        ),
    ];
    if let Some(governance) = &data.governance {
        pillars.push(("Governance Risk (G):", governance.clone()));
    }

    y += 1.0 * CM;
    for (name, summary) in &pillars {
        overview_line(engine, y, name, summary);
        y += 0.8 * CM;
    }

    y += 0.7 * CM;
    let advantage = engine.bold(12.0);
    engine.draw_text_at(left, y, "GreenLink Assessment Advantage:", &advantage);
    engine.move_cursor_to(y + 0.4 * CM);
    let list = engine.style(9.0);
    engine.draw_text_block(&TextItem::bullets(ADVANTAGES.iter().copied()), &list, 0.5 * CM);
}

fn overview_line(engine: &mut LayoutEngine<'_>, y: f64, name: &str, summary: &RiskSummary) {
    let left = engine.geometry().margin_left;
    let label = engine.style(11.0);
    engine.draw_text_at(left + 0.5 * CM, y, name, &label);
    let value = engine.bold(11.0).with_color(summary_color(summary));
    engine.draw_text_at(left + 6.0 * CM, y, &summary.overview(), &value);
}
