//! # Report Data Model
//!
//! The input contract: pre-computed ESG risk data for one company, as
//! produced by the GreenLink analysis pipeline and supplied as JSON.
//!
//! Every field is optional. A field with the wrong JSON type is treated as
//! absent rather than rejecting the document (see [`lenient`]), so the
//! report always renders and shows `N/A` where data is missing. Only input
//! that is not a JSON object fails to parse.

pub mod lenient;

use serde::Deserialize;

use crate::error::GreenlinkError;

/// Pre-computed risk data for one company.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportData {
    #[serde(deserialize_with = "lenient::text")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub environment: Option<Environment>,
    #[serde(deserialize_with = "lenient::optional")]
    pub social: Option<Social>,
    #[serde(deserialize_with = "lenient::optional")]
    pub governance: Option<RiskSummary>,
    #[serde(deserialize_with = "lenient::optional")]
    pub supply_chain: Option<SupplyChain>,
    #[serde(deserialize_with = "lenient::optional")]
    pub recommendations: Option<Recommendations>,
}

impl ReportData {
    /// Parse report data from JSON text. The top level must be an object.
    pub fn from_json(json: &str) -> Result<Self, GreenlinkError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(<serde_json::Error as serde::de::Error>::custom(
                "report data must be a JSON object",
            )
            .into());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Company name, or a generic placeholder.
    pub fn company_name(&self) -> &str {
        self.company.as_deref().unwrap_or("Unknown Company")
    }

    /// Companies buying from plantations rather than operating them.
    pub fn company_type(&self) -> CompanyType {
        CompanyType::for_company(self.company_name())
    }
}

/// Where a company sits in the palm oil supply chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyType {
    /// Plantation operator or grower.
    Upstream,
    /// Processor or buyer sourcing from upstream suppliers.
    Midstream,
}

const MIDSTREAM_MARKERS: &[&str] = &["COFCO", "中粮"];

impl CompanyType {
    pub fn for_company(name: &str) -> Self {
        if MIDSTREAM_MARKERS.iter().any(|m| name.contains(m)) {
            CompanyType::Midstream
        } else {
            CompanyType::Upstream
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CompanyType::Upstream => "Upstream Supplier / Plantation",
            CompanyType::Midstream => "Midstream Processor / Buyer",
        }
    }
}

/// Level and score shared by every risk pillar.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RiskSummary {
    #[serde(deserialize_with = "lenient::text")]
    pub risk_level: Option<String>,
    #[serde(deserialize_with = "lenient::score")]
    pub risk_score: Option<f64>,
}

impl RiskSummary {
    /// `"{level} ({score}/100)"`, with `N/A` for missing parts.
    pub fn overview(&self) -> String {
        let level = self.risk_level.as_deref().unwrap_or("N/A");
        let score = self
            .risk_score
            .map(format_score)
            .unwrap_or_else(|| "N/A".to_string());
        format!("{} ({}/100)", level, score)
    }
}

/// Whole scores print without a fractional part.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 && score.abs() < 1e15 {
        format!("{}", score as i64)
    } else {
        format!("{:.1}", score)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Environment {
    #[serde(deserialize_with = "lenient::text")]
    pub risk_level: Option<String>,
    #[serde(deserialize_with = "lenient::score")]
    pub risk_score: Option<f64>,
    #[serde(deserialize_with = "lenient::optional")]
    pub analysis: Option<EnvironmentAnalysis>,
    /// Regulation name to status, in authored order.
    #[serde(deserialize_with = "lenient::text_entries")]
    pub compliance: Vec<(String, String)>,
}

impl Environment {
    pub fn summary(&self) -> RiskSummary {
        RiskSummary {
            risk_level: self.risk_level.clone(),
            risk_score: self.risk_score,
        }
    }
}

/// Satellite analysis of land use around the company's concessions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnvironmentAnalysis {
    #[serde(deserialize_with = "lenient::text")]
    pub method: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub period: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub indicator: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub result: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub conclusion: Option<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub key_findings: Vec<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub evidence: Option<Evidence>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Evidence {
    #[serde(deserialize_with = "lenient::text")]
    pub conclusion: Option<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub observation: Vec<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub ndvi_change: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Social {
    #[serde(deserialize_with = "lenient::text")]
    pub risk_level: Option<String>,
    #[serde(deserialize_with = "lenient::score")]
    pub risk_score: Option<f64>,
    #[serde(deserialize_with = "lenient::list")]
    pub key_events: Vec<KeyEvent>,
    #[serde(deserialize_with = "lenient::optional")]
    pub analysis: Option<SocialAnalysis>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub risk_mitigation: Vec<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub traditional_rating: Option<TraditionalRating>,
}

impl Social {
    pub fn summary(&self) -> RiskSummary {
        RiskSummary {
            risk_level: self.risk_level.clone(),
            risk_score: self.risk_score,
        }
    }
}

/// A dated controversy picked up by news and NGO monitoring.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeyEvent {
    #[serde(deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub year: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub event: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub impact: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub severity: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub source: Option<String>,
}

impl KeyEvent {
    /// The full date when known, otherwise the year.
    pub fn when(&self) -> Option<&str> {
        self.date.as_deref().or(self.year.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SocialAnalysis {
    #[serde(deserialize_with = "lenient::text")]
    pub risk_source: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub key_concern: Option<String>,
}

/// The company's rating from a conventional ESG agency, for comparison.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TraditionalRating {
    #[serde(deserialize_with = "lenient::text")]
    pub msci: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub description: Option<String>,
}

impl TraditionalRating {
    pub fn display(&self) -> Option<String> {
        match (&self.msci, &self.description) {
            (Some(r), Some(d)) => Some(format!("MSCI {} ({})", r, d)),
            (Some(r), None) => Some(format!("MSCI {}", r)),
            (None, Some(d)) => Some(d.clone()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SupplyChain {
    #[serde(deserialize_with = "lenient::optional")]
    pub upstream: Option<Upstream>,
    #[serde(deserialize_with = "lenient::optional")]
    pub downstream: Option<Downstream>,
    #[serde(deserialize_with = "lenient::optional")]
    pub impact_alert: Option<ImpactAlert>,
}

impl SupplyChain {
    /// Whether there is anything to put in a supply chain section.
    pub fn has_content(&self) -> bool {
        let upstream = self
            .upstream
            .as_ref()
            .is_some_and(|u| !u.suppliers.is_empty() || !u.risk_transmission_path.is_empty());
        let downstream = self.downstream.as_ref().is_some_and(|d| {
            !d.markets.is_empty() || !d.major_customers.is_empty() || !d.regulations.is_empty()
        });
        let alert = self
            .impact_alert
            .as_ref()
            .is_some_and(|a| a.message.is_some());
        upstream || downstream || alert
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Upstream {
    #[serde(deserialize_with = "lenient::list")]
    pub suppliers: Vec<Supplier>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub risk_transmission_path: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Supplier {
    #[serde(deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub country: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub product: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub risk_status: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Downstream {
    /// Region names; objects contribute their `region` or `name`.
    #[serde(deserialize_with = "lenient::text_list")]
    pub markets: Vec<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub major_customers: Vec<String>,
    #[serde(deserialize_with = "lenient::text_entries")]
    pub regulations: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImpactAlert {
    #[serde(deserialize_with = "lenient::text")]
    pub severity: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Recommendations {
    #[serde(deserialize_with = "lenient::text_list")]
    pub immediate: Vec<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub medium_term: Vec<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub long_term: Vec<String>,
}

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        self.immediate.is_empty() && self.medium_term.is_empty() && self.long_term.is_empty()
    }
}

/// Document metadata written to the PDF info dictionary.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
}

impl Metadata {
    /// Metadata for a company's report, titled `"<company> - ESG Report"`.
    pub fn for_report(data: &ReportData) -> Self {
        Self {
            title: Some(format!("{} - ESG Report", data.company_name())),
            author: Some("GreenLink".to_string()),
            subject: Some("Supply Chain ESG Compliance".to_string()),
            creator: Some("GreenLink ESG Platform".to_string()),
        }
    }
}
