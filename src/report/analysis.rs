//! The environmental (E) and social (S) analysis sections.

use crate::layout::{line_height, Field, FieldValue, LayoutEngine, TextItem, CM, ITEM_SPACING};
use crate::model::{CompanyType, KeyEvent, ReportData};
use crate::style::{Color, RiskTier};

use super::{bullet_list, header, label, paragraph, summary_color, truncate, LIST_SIZE};

const KEY_FINDINGS: usize = 4;
const OBSERVATIONS: usize = 3;
const KEY_EVENTS: usize = 5;
const MITIGATIONS: usize = 4;
const EVENT_CHARS: usize = 100;
const IMPACT_CHARS: usize = 80;

pub(super) fn environment(engine: &mut LayoutEngine<'_>, data: &ReportData) {
    engine.start_section(&header("环境风险分析", "Environmental Risk Analysis (E)", Color::GREEN));

    let env = data.environment.clone().unwrap_or_default();
    let analysis = env.analysis.clone().unwrap_or_default();
    let evidence = analysis.evidence.clone().unwrap_or_default();

    let summary = env.summary();
    engine.draw_field(
        &Field::new(label("风险等级", "Risk Level"), summary.overview())
            .with_color(summary_color(&summary)),
    );
    engine.draw_field(&Field::new(label("分析方法", "Analysis Method"), analysis.method.clone()));
    engine.draw_field(&Field::new(label("分析周期", "Analysis Period"), analysis.period.clone()));
    if analysis.indicator.is_some() {
        engine.draw_field(&Field::new(label("监测指标", "Indicator"), analysis.indicator.clone()));
    }
    if evidence.ndvi_change.is_some() {
        engine.draw_field(&Field::new(label("NDVI变化", "NDVI Change"), evidence.ndvi_change.clone()));
    }
    engine.advance(0.3 * CM);

    let conclusion = match data.company_type() {
        CompanyType::Midstream => {
            bullet_list(engine, label("关键发现", "Key Findings"), &analysis.key_findings, KEY_FINDINGS);
            analysis.conclusion.as_deref()
        }
        CompanyType::Upstream => evidence.conclusion.as_deref().or(analysis.result.as_deref()),
    };

    bullet_list(
        engine,
        label("卫星观测", "Satellite Observations"),
        &evidence.observation,
        OBSERVATIONS,
    );

    paragraph(engine, label("结论", "Conclusion"), conclusion);

    let compliance: Vec<String> = env
        .compliance
        .iter()
        .map(|(regulation, status)| format!("{}: {}", regulation, status))
        .collect();
    bullet_list(
        engine,
        label("合规状态", "Regulatory Compliance"),
        &compliance,
        compliance.len(),
    );
}

pub(super) fn social(engine: &mut LayoutEngine<'_>, data: &ReportData) {
    let section = header("社会风险分析", "Social Risk Analysis (S)", Color::RED);
    engine.start_section(&section);

    let social = data.social.clone().unwrap_or_default();
    let summary = social.summary();
    engine.draw_field(
        &Field::new(label("风险等级", "Risk Level"), summary.overview())
            .with_color(summary_color(&summary)),
    );

    if let Some(rating) = social.traditional_rating.as_ref().and_then(|r| r.display()) {
        engine.draw_field(&Field::new(label("传统评级", "Traditional Rating"), rating));
    }
    if let Some(analysis) = &social.analysis {
        if analysis.risk_source.is_some() {
            engine.draw_field(&Field::new(label("风险来源", "Risk Source"), analysis.risk_source.clone()));
        }
        if analysis.key_concern.is_some() {
            engine.draw_field(&Field::new(label("关注重点", "Key Concern"), analysis.key_concern.clone()));
        }
    }
    engine.advance(0.3 * CM);

    engine.draw_subheading(&label("关键风险事件", "Key Risk Events"));
    if social.key_events.is_empty() {
        let style = engine.style(LIST_SIZE);
        engine.draw_text_block(&[TextItem::plain(crate::layout::PLACEHOLDER)], &style, CM);
    } else {
        engine.set_continuation(Some(section));
        for (index, event) in social.key_events.iter().take(KEY_EVENTS).enumerate() {
            key_event(engine, index + 1, event);
        }
        engine.set_continuation(None);
    }
    engine.advance(LIST_SIZE);

    bullet_list(
        engine,
        label("风险缓解措施", "Risk Mitigation Actions"),
        &social.risk_mitigation,
        MITIGATIONS,
    );
}

/// One event: dated title, description, impact, severity and source.
fn key_event(engine: &mut LayoutEngine<'_>, number: usize, event: &KeyEvent) {
    let title_style = engine.bold(10.0);
    let body = engine.style(LIST_SIZE);

    // Keep the title with the first line of the description.
    engine.ensure_space(line_height(10.0) + ITEM_SPACING + line_height(LIST_SIZE));
    let title = format!("Event {}: {}", number, event.when().unwrap_or(crate::layout::PLACEHOLDER));
    engine.draw_text_block(&[TextItem::plain(title)], &title_style, CM);

    let description = FieldValue::from(event.event.clone()).display();
    let impact = FieldValue::from(event.impact.clone()).display();
    let mut lines = vec![
        TextItem::plain(truncate(&description, EVENT_CHARS)),
        TextItem::plain(format!("Impact: {}", truncate(&impact, IMPACT_CHARS))),
    ];
    if let Some(source) = &event.source {
        lines.push(TextItem::plain(format!("Source: {}", source)));
    }
    engine.draw_text_block(&lines, &body, 1.5 * CM);

    if let Some(severity) = &event.severity {
        let color = RiskTier::from_label(severity).known_or(RiskTier::Low).color();
        let style = body.clone().with_color(color);
        engine.draw_text_block(&[TextItem::plain(format!("Severity: {}", severity))], &style, 1.5 * CM);
    }
    engine.advance(0.3 * CM);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontContext;
    use crate::layout::{FooterText, PageGeometry};

    #[test]
    fn test_event_title_stays_with_description() {
        let fonts = FontContext::new();
        let geometry = PageGeometry::a4();
        let mut engine = LayoutEngine::new(&fonts, geometry, FooterText::default());
        let filler = engine.style(10.0);
        engine.draw_text_at(geometry.margin_left, geometry.top + 10.0, "filler", &filler);
        engine.move_cursor_to(geometry.bottom_limit - 28.5);

        let event = KeyEvent {
            date: Some("2023-06".to_string()),
            event: Some("Mill audit found unpaid overtime".to_string()),
            ..KeyEvent::default()
        };
        key_event(&mut engine, 1, &event);
        let pages = engine.finish();

        assert_eq!(pages.len(), 2);
        assert!(pages[0].find_text("Event 1").is_none());
        assert!(pages[1].find_text("Event 1: 2023-06").is_some());
        assert!(pages[1].find_text("Mill audit found unpaid overtime").is_some());
    }
}
