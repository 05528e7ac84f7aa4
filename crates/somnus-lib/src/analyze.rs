use crate::config::AnalysisConfig;
use crate::detect::{detect_events, ApneaEvent, LikelihoodPoint, ScoringPolicy};
use crate::error::AnalysisError;
use crate::metrics::{aggregate, SeverityBand};
use crate::segment::segment;
use crate::signal::{SignalSeries, SignalStats};
use serde::{Deserialize, Serialize};

/// Aggregate outcome of one analysis pass. Owns no reference back to the
/// input; everything here is built fresh per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Full event count, never truncated.
    pub apnea_count: usize,
    pub ahi: f64,
    pub severity: SeverityBand,
    pub duration_hours: f64,
    /// Event list capped for payload size; see `apnea_count` for the total.
    pub apnea_events: Vec<ApneaEvent>,
    pub probability_data: Vec<LikelihoodPoint>,
    pub signal_stats: SignalStats,
}

/// Segment, score, and aggregate one signal. Sensitivity is clamped into
/// [0, 1] here as well as at the CLI boundary, so both entry points behave
/// identically.
pub fn analyze(
    series: &SignalSeries,
    sensitivity: f64,
    policy: &mut dyn ScoringPolicy,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    if series.is_empty() {
        return Err(AnalysisError::EmptySequence);
    }
    let sensitivity = sensitivity.clamp(0.0, 1.0);
    let windows = segment(&series.data, config.window_size);
    let (events, probability_data) = detect_events(
        &windows,
        sensitivity,
        policy,
        config.positive_threshold,
        series.fs,
    );
    let summary = aggregate(events.len(), series.len(), series.fs);
    let apnea_count = events.len();
    let mut apnea_events = events;
    apnea_events.truncate(config.max_reported_events);
    log::info!(
        "analysis complete: {} event(s), AHI {:.2} ({:?})",
        apnea_count,
        summary.ahi,
        summary.severity
    );
    Ok(AnalysisResult {
        apnea_count,
        ahi: (summary.ahi * 100.0).round() / 100.0,
        severity: summary.severity,
        duration_hours: summary.duration_hours,
        apnea_events,
        probability_data,
        signal_stats: SignalStats::from_samples(&series.data),
    })
}
