//! Recommended actions and the closing contact block.

use crate::config::ReportConfig;
use crate::layout::{BilingualLabel, LayoutEngine, TextItem, CM};
use crate::model::{CompanyType, ReportData};
use crate::style::Color;

use super::{header, label, PARAGRAPH_SIZE};

const PER_HORIZON: usize = 4;

const MIDSTREAM_IMMEDIATE: &[&str] = &[
    "Complete on-site audit of high-risk suppliers (FGV, IOI)",
    "Prepare EUDR compliance documentation package",
    "Communicate supply chain improvement progress to EU/US customers",
    "Increase procurement from low-risk suppliers to >50%",
];

const UPSTREAM_IMMEDIATE: &[&str] = &[
    "Conduct comprehensive supplier ESG audit within 30 days",
    "Engage with downstream customers on ESG improvement plans",
    "Implement real-time monitoring system for high-risk indicators",
    "Obtain third-party certification (RSPO, EUDR compliance)",
];

const LONG_TERM: &[&str] = &[
    "Establish comprehensive supply chain ESG monitoring system",
    "Diversify supply chain to reduce concentration risk",
    "Increase supply chain transparency and traceability",
    "Obtain GreenLink certification to enhance competitiveness",
];

pub(super) fn draw(engine: &mut LayoutEngine<'_>, data: &ReportData, config: &ReportConfig) {
    engine.start_section(&header("建议措施", "Recommended Actions", Color::GREEN));

    match data.recommendations.as_ref().filter(|r| !r.is_empty()) {
        Some(recs) => {
            numbered(engine, label("立即行动", "Immediate Actions"), &recs.immediate);
            numbered(engine, label("中期行动", "Medium-term Actions"), &recs.medium_term);
            numbered(engine, label("长期战略", "Long-term Strategy"), &recs.long_term);
        }
        None => {
            let immediate = match data.company_type() {
                CompanyType::Midstream => MIDSTREAM_IMMEDIATE,
                CompanyType::Upstream => UPSTREAM_IMMEDIATE,
            };
            let immediate: Vec<String> = immediate.iter().map(|s| s.to_string()).collect();
            numbered(engine, label("立即行动", "Immediate Actions"), &immediate);

            engine.draw_subheading(&label("长期战略", "Long-term Strategy"));
            let style = engine.style(PARAGRAPH_SIZE);
            engine.draw_text_block(&TextItem::bullets(LONG_TERM.iter().copied()), &style, 0.5 * CM);
            engine.advance(PARAGRAPH_SIZE);
        }
    }

    if !config.contact.is_empty() {
        engine.advance(0.5 * CM);
        engine.draw_subheading(&label("联系方式", "For More Information"));
        let style = engine.style(PARAGRAPH_SIZE);
        let lines: Vec<TextItem> = config.contact.iter().map(TextItem::plain).collect();
        engine.draw_text_block(&lines, &style, 0.5 * CM);
    }
}

fn numbered(engine: &mut LayoutEngine<'_>, heading: BilingualLabel, items: &[String]) {
    if items.is_empty() {
        return;
    }
    engine.draw_subheading(&heading);
    let style = engine.style(PARAGRAPH_SIZE);
    let items = TextItem::numbered_list(items.iter().take(PER_HORIZON).cloned());
    engine.draw_text_block(&items, &style, 0.5 * CM);
    engine.advance(PARAGRAPH_SIZE);
}
