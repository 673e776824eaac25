//! # GreenLink CLI
//!
//! Usage:
//!   greenlink report.json -o report.pdf
//!   echo '{ ... }' | greenlink -o report.pdf
//!   greenlink --example > ioi.json

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use greenlink::config::ReportConfig;
use greenlink::error::GreenlinkError;
use greenlink::model::ReportData;

#[derive(Parser)]
#[command(name = "greenlink")]
#[command(version)]
#[command(about = "Render an ESG risk assessment report to PDF", long_about = None)]
struct Cli {
    /// Report data as JSON (stdin if not specified)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF file
    #[arg(short, long, value_name = "FILE", default_value = "report.pdf")]
    output: PathBuf,

    /// Report configuration (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print sample report data and exit
    #[arg(long)]
    example: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    if cli.example {
        print!("{}", example_report_json());
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(written) => {
            eprintln!("✓ Written {} bytes to {}", written, cli.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<usize, GreenlinkError> {
    let config = match &cli.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::from_env(),
    };
    let fonts = greenlink::font::init(&config.fonts);

    let input = read_input(cli.input.as_deref())?;
    let data = ReportData::from_json(&input)?;
    tracing::info!(company = data.company_name(), "rendering report");

    let pdf_bytes = greenlink::render_report_with(&data, &config, fonts)?;
    fs::write(&cli.output, &pdf_bytes).map_err(|source| GreenlinkError::Io {
        path: cli.output.clone(),
        source,
    })?;
    Ok(pdf_bytes.len())
}

fn read_input(path: Option<&Path>) -> Result<String, GreenlinkError> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|source| GreenlinkError::Io {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| GreenlinkError::Io {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok(buf)
        }
    }
}

fn example_report_json() -> &'static str {
    r##"{
  "company": "IOI Corporation",
  "description": "Integrated palm oil producer with plantations in Malaysia and Indonesia, supplying refined oils to global food and oleochemical markets.",
  "environment": {
    "risk_level": "Low",
    "risk_score": 28,
    "analysis": {
      "method": "Sentinel-2 NDVI time series",
      "period": "2018 - 2024",
      "indicator": "Canopy cover change",
      "result": "No significant deforestation detected",
      "conclusion": "Vegetation index stable across monitored concessions.",
      "evidence": {
        "ndvi_change": "+0.8%",
        "observation": [
          "No clearing detected in peat areas",
          "Replanting cycles consistent with plantation age",
          "Buffer zones along rivers intact"
        ]
      }
    },
    "compliance": {
      "EUDR": "Compliant",
      "RSPO": "Certified"
    }
  },
  "social": {
    "risk_level": "High",
    "risk_score": 72,
    "traditional_rating": { "msci": "BBB", "description": "Average within sector" },
    "analysis": {
      "risk_source": "Labour practices",
      "key_concern": "Forced labour allegations in migrant workforce"
    },
    "key_events": [
      {
        "date": "2023-06",
        "event": "NGO report alleges recruitment fee debt bondage",
        "impact": "Two EU buyers suspended purchases pending audit",
        "severity": "High",
        "source": "Amnesty International"
      },
      {
        "year": "2022",
        "event": "Land rights dispute with indigenous community",
        "impact": "Concession expansion halted",
        "severity": "Medium"
      }
    ],
    "risk_mitigation": [
      "Reimburse recruitment fees",
      "Independent grievance mechanism"
    ]
  },
  "supply_chain": {
    "upstream": {
      "suppliers": [
        {
          "name": "Smallholder cooperative (Sabah)",
          "country": "Malaysia",
          "product": "Fresh fruit bunches",
          "risk_status": "Medium Risk",
          "note": "Traceability to plantation level at 85%"
        }
      ],
      "risk_transmission_path": [
        "Labour allegations reach buyer due diligence",
        "Buyers pause contracts",
        "Revenue and certification at risk"
      ]
    },
    "downstream": {
      "major_customers": ["Nestle", "Unilever", "Cargill"],
      "markets": ["EU", "USA", "China"],
      "regulations": { "EUDR": "Deforestation-free due diligence from 2025" }
    },
    "impact_alert": {
      "severity": "High",
      "message": "EU market access depends on closing the labour audit findings."
    }
  }
}
"##
}
