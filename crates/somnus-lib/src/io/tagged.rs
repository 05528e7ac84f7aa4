use super::parse_sample;
use crate::error::AnalysisError;

/// Parse the timestamp-prefixed export format: the sample is the last
/// whitespace token on each line, so bare one-token lines also work.
/// Blank lines, `#` comments, and unparsable lines are skipped.
pub fn parse(content: &str) -> Result<Vec<f64>, AnalysisError> {
    let mut out = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(value) = trimmed.split_whitespace().last().and_then(parse_sample) {
            out.push(value);
        }
    }
    if out.is_empty() {
        Err(AnalysisError::Parse(
            "no numeric samples found in tagged payload".into(),
        ))
    } else {
        Ok(out)
    }
}
