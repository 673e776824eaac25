//! Supply chain section: upstream suppliers and how their risk travels,
//! downstream buyers and markets, and the resulting impact alert.

use crate::layout::{line_height, Field, FieldValue, LayoutEngine, TextItem, CM};
use crate::model::{ReportData, Supplier, SupplyChain};
use crate::style::{Color, RiskTier};

use super::{bullet_list, header, label, LIST_SIZE};

const SUPPLIERS: usize = 3;
const CUSTOMERS: usize = 8;
const MARKETS: usize = 5;
const NOTE_CHARS: usize = 70;

pub(super) fn draw(engine: &mut LayoutEngine<'_>, data: &ReportData, chain: &SupplyChain) {
    let section = header("供应链风险分析", "Supply Chain Risk Analysis", Color::GREEN);
    engine.start_section(&section);
    tracing::debug!(company = data.company_name(), "laying out supply chain section");

    if let Some(upstream) = &chain.upstream {
        if !upstream.suppliers.is_empty() {
            engine.draw_subheading(&label("上游供应商风险评估", "Upstream Suppliers Risk Assessment"));
            engine.set_continuation(Some(section.clone()));
            for supplier in upstream.suppliers.iter().take(SUPPLIERS) {
                draw_supplier(engine, supplier);
            }
            engine.set_continuation(None);
        }
        if !upstream.risk_transmission_path.is_empty() {
            engine.draw_subheading(&label("风险传导路径", "Risk Transmission Pathways"));
            let style = engine.style(LIST_SIZE);
            let items = TextItem::numbered_list(upstream.risk_transmission_path.iter().cloned());
            engine.draw_text_block(&items, &style, CM);
            engine.advance(LIST_SIZE);
        }
    }

    if let Some(downstream) = &chain.downstream {
        if !downstream.major_customers.is_empty() || !downstream.markets.is_empty() {
            engine.draw_subheading(&label("下游市场影响", "Downstream Market Impact"));
            if !downstream.major_customers.is_empty() {
                let customers: Vec<String> =
                    downstream.major_customers.iter().take(CUSTOMERS).cloned().collect();
                engine.draw_field(&Field::new(label("主要客户", "Major Customers"), customers));
            }
            if !downstream.markets.is_empty() {
                let markets: Vec<String> = downstream.markets.iter().take(MARKETS).cloned().collect();
                engine.draw_field(&Field::new(label("目标市场", "Target Markets"), markets));
            }
            engine.advance(LIST_SIZE);
        }
        let regulations: Vec<String> = downstream
            .regulations
            .iter()
            .map(|(name, requirement)| format!("{}: {}", name, requirement))
            .collect();
        bullet_list(engine, label("相关法规", "Regulations"), &regulations, regulations.len());
    }

    if let Some(alert) = &chain.impact_alert {
        if alert.message.is_some() {
            let color = alert
                .severity
                .as_deref()
                .map(|s| RiskTier::from_label(s).color())
                .unwrap_or(Color::ORANGE);
            engine.draw_field(
                &Field::new(label("影响预警", "Impact Alert"), alert.message.clone()).with_color(color),
            );
        }
    }
}

fn draw_supplier(engine: &mut LayoutEngine<'_>, supplier: &Supplier) {
    let name_style = engine.bold(10.0);
    let body = engine.style(LIST_SIZE);

    engine.ensure_space(line_height(10.0) + 3.0 * line_height(LIST_SIZE));
    let name = FieldValue::from(supplier.name.clone()).display();
    engine.draw_text_block(&[TextItem::plain(name)], &name_style, 0.5 * CM);

    let country = FieldValue::from(supplier.country.clone()).display();
    let product = FieldValue::from(supplier.product.clone()).display();
    engine.draw_text_block(
        &[
            TextItem::plain(format!("Location: {}", country)),
            TextItem::plain(format!("Product: {}", product)),
        ],
        &body,
        CM,
    );

    let status = FieldValue::from(supplier.risk_status.clone()).display();
    // Statuses that are neither high nor low read as medium.
    let tier = RiskTier::from_label(&status).known_or(RiskTier::Medium);
    let status_style = body.clone().with_color(tier.color());
    engine.draw_text_block(
        &[TextItem::plain(format!("Risk Status: {}", status))],
        &status_style,
        CM,
    );

    if let Some(note) = &supplier.note {
        let note_style = engine.style(8.0).italic().with_color(Color::GRAY);
        engine.draw_text_block(&[TextItem::plain(super::truncate(note, NOTE_CHARS))], &note_style, CM);
    }
    engine.advance(0.3 * CM);
}
