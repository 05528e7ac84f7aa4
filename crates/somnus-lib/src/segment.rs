use serde::{Deserialize, Serialize};

/// Fixed-length view into a signal, anchored at its start sample.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    pub start: usize,
    pub samples: &'a [f64],
}

impl Window<'_> {
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    /// First sample index past the window, always on a window boundary.
    pub fn end(&self) -> usize {
        self.start + self.samples.len()
    }
}

/// Partition a signal into non-overlapping full windows. A trailing
/// remainder shorter than `window_size` is dropped, not padded; downstream
/// detection only ever sees full windows.
pub fn segment(data: &[f64], window_size: usize) -> Vec<Window<'_>> {
    if window_size == 0 {
        return Vec::new();
    }
    data.chunks_exact(window_size)
        .enumerate()
        .map(|(i, samples)| Window {
            start: i * window_size,
            samples,
        })
        .collect()
}

/// Descriptive statistics over one window, recomputed each analysis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WindowFeatures {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl WindowFeatures {
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self {
                mean: 0.0,
                std: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            mean,
            std: variance.sqrt(),
            min,
            max,
        }
    }
}
