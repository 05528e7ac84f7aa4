pub mod delimited;
pub mod structured;
pub mod tagged;
pub mod text;

use crate::error::AnalysisError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Closed set of payload formats accepted by the parser front door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalFormat {
    /// Delimited tabular text (CSV and friends).
    Delimited,
    /// Line-oriented free numeric text.
    Plain,
    /// Tagged hierarchical text (JSON).
    Structured,
    /// Timestamp-prefixed custom export.
    Tagged,
}

impl SignalFormat {
    /// Map an upload extension onto its format; anything else is rejected
    /// before the core runs.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Delimited),
            "txt" => Some(Self::Plain),
            "json" => Some(Self::Structured),
            "apn" => Some(Self::Tagged),
            _ => None,
        }
    }
}

/// Extract a flat numeric sequence from a payload under its declared format.
/// Individual strategy failures are recovered internally; only exhaustion of
/// every strategy surfaces as `AnalysisError::Parse`.
pub fn parse_signal(content: &str, format: SignalFormat) -> Result<Vec<f64>, AnalysisError> {
    match format {
        SignalFormat::Delimited => delimited::parse(content),
        SignalFormat::Plain => text::parse(content),
        SignalFormat::Structured => structured::parse(content),
        SignalFormat::Tagged => tagged::parse(content),
    }
}

/// Read a payload from disk and parse it, inferring the format from the file
/// extension unless one is given.
pub fn read_signal(path: &Path, format: Option<SignalFormat>) -> anyhow::Result<Vec<f64>> {
    let format = match format {
        Some(format) => format,
        None => path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(SignalFormat::from_extension)
            .ok_or_else(|| {
                anyhow::anyhow!("cannot infer signal format from {}", path.display())
            })?,
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(parse_signal(&contents, format)?)
}

/// Parse one sample token. Non-finite values count as non-numeric so every
/// accepted sample is finite.
pub(crate) fn parse_sample(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse every token on a line, normalizing commas and tabs to whitespace.
/// A single unparsable token disqualifies the whole line.
pub(crate) fn parse_line_tokens(line: &str) -> Option<Vec<f64>> {
    let normalized = line.replace([',', '\t'], " ");
    let mut values = Vec::new();
    for token in normalized.split_whitespace() {
        values.push(parse_sample(token)?);
    }
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}
