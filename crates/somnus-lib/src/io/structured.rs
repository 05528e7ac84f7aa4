use crate::error::AnalysisError;
use serde_json::{Map, Value};

/// Keys searched in a list of keyed records, in priority order.
const RECORD_KEYS: [&str; 5] = ["ecg", "signal", "value", "amplitude", "voltage"];

/// Keys searched in a single keyed object, in priority order.
const OBJECT_KEYS: [&str; 6] = ["ecg", "signal", "data", "values", "amplitudes", "voltages"];

/// Extract samples from a tagged hierarchical payload. Malformed input is a
/// hard failure, never a silent fallback to another format.
pub fn parse(content: &str) -> Result<Vec<f64>, AnalysisError> {
    let value: Value = serde_json::from_str(content)
        .map_err(|err| AnalysisError::Parse(format!("malformed structured payload: {err}")))?;
    let samples = match &value {
        Value::Array(items) => from_array(items),
        Value::Object(map) => from_object(map),
        _ => None,
    };
    match samples {
        Some(samples) if !samples.is_empty() => Ok(samples),
        _ => Err(AnalysisError::Parse(
            "no numeric series found in structured payload".into(),
        )),
    }
}

fn from_array(items: &[Value]) -> Option<Vec<f64>> {
    if let Some(samples) = numeric_list(items) {
        return Some(samples);
    }
    // List of keyed records: pull the first known key's values across records.
    if let Some(Value::Object(first)) = items.first() {
        let key = RECORD_KEYS.iter().find(|key| first.contains_key(**key))?;
        let samples: Vec<f64> = items
            .iter()
            .filter_map(|item| item.get(*key))
            .filter_map(finite_number)
            .collect();
        if !samples.is_empty() {
            return Some(samples);
        }
    }
    None
}

fn from_object(map: &Map<String, Value>) -> Option<Vec<f64>> {
    for key in OBJECT_KEYS {
        if let Some(Value::Array(items)) = map.get(key) {
            match numeric_list(items) {
                Some(samples) if !samples.is_empty() => return Some(samples),
                _ => {}
            }
        }
    }
    // No direct match: the first list-valued entry that is wholly numeric.
    map.values().find_map(|value| {
        value
            .as_array()
            .and_then(|items| numeric_list(items))
            .filter(|samples| !samples.is_empty())
    })
}

/// The whole list as finite floats, or `None` if any element is not.
fn numeric_list(items: &[Value]) -> Option<Vec<f64>> {
    items.iter().map(finite_number).collect()
}

fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}
