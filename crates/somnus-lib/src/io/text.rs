use super::parse_line_tokens;
use crate::error::AnalysisError;

/// Parse line-oriented free numeric text, ignoring blank and comment lines.
/// A line with any non-numeric token contributes nothing.
pub fn parse(content: &str) -> Result<Vec<f64>, AnalysisError> {
    let mut out = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }
        if let Some(values) = parse_line_tokens(trimmed) {
            out.extend(values);
        }
    }
    if out.is_empty() {
        Err(AnalysisError::Parse(
            "no numeric samples found in text payload".into(),
        ))
    } else {
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_tokens_across_lines() {
        let payload = "0.1 0.2\n0.3\n0.4,0.5\n";
        assert_eq!(parse(payload).unwrap(), vec![0.1, 0.2, 0.3, 0.4, 0.5]);
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let payload = "# lead II export\n\n// device: sim\n1.0\n2.0\n";
        assert_eq!(parse(payload).unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn mixed_lines_are_dropped_whole() {
        let payload = "1.0 volts\n2.0\n";
        assert_eq!(parse(payload).unwrap(), vec![2.0]);
    }

    #[test]
    fn all_non_numeric_is_a_parse_failure() {
        assert!(parse("hello\nworld\n").is_err());
    }
}
