use serde::{Deserialize, Serialize};

/// Single-lead waveform as a uniformly sampled series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalSeries {
    /// Uniform sampling frequency in Hz
    pub fs: f64,
    /// Samples
    pub data: Vec<f64>,
}

impl SignalSeries {
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    pub fn duration(&self) -> f64 {
        self.data.len() as f64 / self.fs
    }
}

/// Whole-recording descriptive statistics reported alongside an analysis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignalStats {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub length: usize,
}

impl SignalStats {
    pub fn from_samples(data: &[f64]) -> Self {
        if data.is_empty() {
            return Self {
                mean: 0.0,
                std: 0.0,
                min: 0.0,
                max: 0.0,
                length: 0,
            };
        }
        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let min = data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            mean,
            std: variance.sqrt(),
            min,
            max,
            length: data.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_follows_sampling_rate() {
        let series = SignalSeries {
            fs: 250.0,
            data: vec![0.0; 500],
        };
        assert!((series.duration() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn stats_match_hand_computation() {
        let stats = SignalStats::from_samples(&[1.0, 2.0, 3.0, 4.0]);
        assert!((stats.mean - 2.5).abs() < 1e-12);
        assert!((stats.std - 1.25f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.length, 4);
    }

    #[test]
    fn empty_stats_are_zeroed() {
        let stats = SignalStats::from_samples(&[]);
        assert_eq!(stats.length, 0);
        assert_eq!(stats.min, 0.0);
    }
}
