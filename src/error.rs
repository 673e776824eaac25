//! Structured error types for the GreenLink report engine.
//!
//! Layout itself never fails: missing data becomes placeholder text and
//! overflow becomes a page break. What remains are input parsing, font
//! embedding, and the IO done by the CLI and configuration loader.

use std::path::PathBuf;

/// The unified error type returned by all public GreenLink API functions.
#[derive(Debug, thiserror::Error)]
pub enum GreenlinkError {
    /// JSON input failed to parse as report data.
    #[error("Failed to parse report data: {source}{}", hint_suffix(.hint))]
    ParseError {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
    /// An embedded font could not be parsed while writing the PDF.
    #[error("Font error: {0}")]
    FontError(String),
    /// Layout or PDF generation failed.
    #[error("Render error: {0}")]
    RenderError(String),
    /// Reading or writing a file failed.
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not usable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for GreenlinkError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The report data must be a JSON object with keys such as \"company\" and \"environment\".".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        GreenlinkError::ParseError { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_carry_a_hint() {
        let err: GreenlinkError = serde_json::from_str::<serde_json::Value>("{\"a\": 1,}")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse report data"));
        assert!(msg.contains("Hint: Check for trailing commas"));
    }

    #[test]
    fn truncated_input_is_reported_as_eof() {
        let err: GreenlinkError = serde_json::from_str::<serde_json::Value>("{\"company\": ")
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn io_error_names_the_path() {
        let err = GreenlinkError::Io {
            path: PathBuf::from("missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("missing.json"));
    }
}
