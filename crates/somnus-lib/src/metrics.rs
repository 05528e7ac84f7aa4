use serde::{Deserialize, Serialize};

/// Severity bands over the apnea-hypopnea index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeverityBand {
    Normal,
    Mild,
    Moderate,
    Severe,
}

impl SeverityBand {
    /// Fixed clinical-style thresholds, inclusive-lower / exclusive-upper.
    pub fn from_ahi(ahi: f64) -> Self {
        if ahi < 5.0 {
            Self::Normal
        } else if ahi < 15.0 {
            Self::Mild
        } else if ahi < 30.0 {
            Self::Moderate
        } else {
            Self::Severe
        }
    }
}

/// Events-per-hour rate with its band and the true recording length.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AhiSummary {
    pub ahi: f64,
    pub severity: SeverityBand,
    pub duration_hours: f64,
}

/// Convert an event count and recording length into an AHI-style summary.
/// `duration_hours` is reported true; only the rate denominator is floored
/// at 0.1 h so second-scale recordings do not blow up the index.
pub fn aggregate(event_count: usize, total_samples: usize, sampling_rate: f64) -> AhiSummary {
    let duration_hours = total_samples as f64 / (sampling_rate * 3600.0);
    let ahi = event_count as f64 / duration_hours.max(0.1);
    AhiSummary {
        ahi,
        severity: SeverityBand::from_ahi(ahi),
        duration_hours,
    }
}
