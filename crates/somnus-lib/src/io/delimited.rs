use super::{parse_line_tokens, parse_sample};
use crate::error::AnalysisError;
use csv::{ReaderBuilder, Trim};

/// Field delimiters tried in priority order.
const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b' '];

/// Header fragments that mark a column as the signal lead.
const SIGNAL_KEYWORDS: [&str; 6] = ["ecg", "ekg", "signal", "voltage", "amplitude", "value"];

/// Extract samples from delimited tabular text. Tries each delimiter in
/// order; the first one yielding a usable table wins. If none does, falls
/// back to line-oriented free numeric extraction.
pub fn parse(content: &str) -> Result<Vec<f64>, AnalysisError> {
    for &delimiter in &DELIMITERS {
        if let Some(samples) = try_delimiter(content, delimiter) {
            log::debug!(
                "delimiter {:?} yielded {} samples",
                delimiter as char,
                samples.len()
            );
            return Ok(samples);
        }
    }
    let samples = free_numeric_lines(content);
    if samples.is_empty() {
        Err(AnalysisError::Parse(
            "no numeric column or token found in delimited payload".into(),
        ))
    } else {
        log::debug!("free-token fallback yielded {} samples", samples.len());
        Ok(samples)
    }
}

/// One parsing strategy: read the payload as a table under a single
/// delimiter and pull the best column. Returns `None` when the table is
/// unusable so the caller can move on to the next strategy.
fn try_delimiter(content: &str, delimiter: u8) -> Option<Vec<f64>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.ok()?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    if rows.is_empty() {
        return None;
    }

    // A leading row whose cells are all numeric is data, not a header.
    let has_header = !rows[0].iter().all(|cell| parse_sample(cell).is_some());
    let (header, data) = if has_header {
        (Some(&rows[0]), &rows[1..])
    } else {
        (None, &rows[..])
    };
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);

    // 1. A column whose header names the signal lead.
    if let Some(names) = header {
        let keyword_col = names.iter().position(|name| {
            let lower = name.to_lowercase();
            SIGNAL_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
        });
        if let Some(col) = keyword_col {
            let samples = coerce_column(data, col);
            if !samples.is_empty() {
                return Some(samples);
            }
        }
    }

    // 2. The first column whose non-empty cells are all numeric.
    for col in 0..columns {
        if let Some(samples) = numeric_column(data, col) {
            return Some(samples);
        }
    }

    // 3. The first column with non-numeric cells dropped.
    let samples = coerce_column(data, 0);
    if samples.is_empty() {
        None
    } else {
        Some(samples)
    }
}

/// Column values when every non-empty cell parses; `None` otherwise.
fn numeric_column(rows: &[Vec<String>], col: usize) -> Option<Vec<f64>> {
    let mut values = Vec::new();
    for row in rows {
        match row.get(col) {
            Some(cell) if cell.is_empty() => continue,
            Some(cell) => values.push(parse_sample(cell)?),
            None => continue,
        }
    }
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

/// Column values with unparsable cells dropped.
fn coerce_column(rows: &[Vec<String>], col: usize) -> Vec<f64> {
    rows.iter()
        .filter_map(|row| row.get(col))
        .filter_map(|cell| parse_sample(cell))
        .collect()
}

/// Last-resort rescue: harvest numeric tokens line by line, a whole line at
/// a time.
fn free_numeric_lines(content: &str) -> Vec<f64> {
    let mut out = Vec::new();
    for line in content.lines() {
        if let Some(values) = parse_line_tokens(line) {
            out.extend(values);
        }
    }
    out
}
