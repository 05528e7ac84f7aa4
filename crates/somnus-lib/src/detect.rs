use crate::segment::{Window, WindowFeatures};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Per-event severity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSeverity {
    Mild,
    Moderate,
    Severe,
}

const SEVERITY_LABELS: [EventSeverity; 3] = [
    EventSeverity::Mild,
    EventSeverity::Moderate,
    EventSeverity::Severe,
];

/// A maximal run of adjacent apnea-positive windows, expressed back in time
/// units. Indices always fall on full-window boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApneaEvent {
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub start_index: usize,
    pub end_index: usize,
    pub severity: EventSeverity,
}

/// One positive-class score per window, stamped at the window's start offset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LikelihoodPoint {
    pub time: f64,
    pub probability: f64,
}

/// Window scoring sits behind this trait so a trained model can replace the
/// placeholder without touching segmentation, event, or aggregation logic.
pub trait ScoringPolicy {
    /// Positive-class likelihood in [0, 1] for one window.
    fn likelihood(&mut self, features: &WindowFeatures, sensitivity: f64) -> f64;
    /// Label assigned to a closed event.
    fn severity(&mut self) -> EventSeverity;
}

/// Reference policy: bounded random likelihoods, explicitly not a trained
/// model. Unseeded by default; seed it for reproducible runs.
pub struct RandomScorer {
    rng: StdRng,
}

impl RandomScorer {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringPolicy for RandomScorer {
    fn likelihood(&mut self, _features: &WindowFeatures, sensitivity: f64) -> f64 {
        // Uniform draw scaled by twice the sensitivity: 0.5 keeps the full
        // [0, 1) range, 0.0 can never cross the positive threshold.
        (self.rng.gen_range(0.0..1.0) * 2.0 * sensitivity).min(1.0)
    }

    fn severity(&mut self) -> EventSeverity {
        SEVERITY_LABELS
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(EventSeverity::Mild)
    }
}

/// Scan the window stream with a two-state machine: open an event on the
/// first positive window, extend it while positives are adjacent, close it
/// on a negative window or end-of-stream. Also returns the per-window
/// likelihood curve.
pub fn detect_events(
    windows: &[Window<'_>],
    sensitivity: f64,
    policy: &mut dyn ScoringPolicy,
    threshold: f64,
    fs: f64,
) -> (Vec<ApneaEvent>, Vec<LikelihoodPoint>) {
    let mut events = Vec::new();
    let mut curve = Vec::with_capacity(windows.len());
    let mut open: Option<(usize, usize)> = None;

    for window in windows {
        let features = WindowFeatures::from_samples(window.samples);
        let probability = policy.likelihood(&features, sensitivity).clamp(0.0, 1.0);
        curve.push(LikelihoodPoint {
            time: window.start as f64 / fs,
            probability,
        });
        if probability > threshold {
            match open {
                Some((_, ref mut end)) => *end = window.end(),
                None => open = Some((window.start, window.end())),
            }
        } else if let Some((start, end)) = open.take() {
            events.push(close_event(start, end, fs, policy));
        }
    }
    if let Some((start, end)) = open {
        events.push(close_event(start, end, fs, policy));
    }
    (events, curve)
}

fn close_event(start: usize, end: usize, fs: f64, policy: &mut dyn ScoringPolicy) -> ApneaEvent {
    ApneaEvent {
        start_time: start as f64 / fs,
        end_time: end as f64 / fs,
        duration: (end - start) as f64 / fs,
        start_index: start,
        end_index: end,
        severity: policy.severity(),
    }
}
