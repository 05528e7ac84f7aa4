use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Fixed constants the pipeline relies on, grouped so behavior stays
/// reproducible and testable instead of scattered literals.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Sampling frequency assumed for payloads without their own rate (Hz).
    pub sampling_rate: f64,
    /// Samples per analysis window (one second at the default rate).
    pub window_size: usize,
    /// Point cap for the raw-signal visualization reduction.
    pub viz_max_points: usize,
    /// Presentation cap on the reported event list; the aggregate count is
    /// never truncated.
    pub max_reported_events: usize,
    /// Likelihood above which a window counts as apnea-positive.
    pub positive_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 250.0,
            window_size: 250,
            viz_max_points: 5000,
            max_reported_events: 50,
            positive_threshold: 0.5,
        }
    }
}

/// Read an `AnalysisConfig` from a TOML file; missing keys keep their defaults.
pub fn read_config(path: &Path) -> Result<AnalysisConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: AnalysisConfig =
        toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_system_constants() {
        let config = AnalysisConfig::default();
        assert_eq!(config.sampling_rate, 250.0);
        assert_eq!(config.window_size, 250);
        assert_eq!(config.viz_max_points, 5000);
        assert_eq!(config.max_reported_events, 50);
        assert_eq!(config.positive_threshold, 0.5);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: AnalysisConfig = toml::from_str("window_size = 125\n").unwrap();
        assert_eq!(config.window_size, 125);
        assert_eq!(config.sampling_rate, 250.0);
        assert_eq!(config.max_reported_events, 50);
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("somnus.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "sampling_rate = 500.0").unwrap();
        let config = read_config(&path).unwrap();
        assert_eq!(config.sampling_rate, 500.0);
        assert_eq!(config.window_size, 250);
    }

    #[test]
    fn rejects_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("somnus.toml");
        std::fs::write(&path, "sampling_rate = \"fast\"").unwrap();
        assert!(read_config(&path).is_err());
    }
}
