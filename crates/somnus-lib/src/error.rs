use thiserror::Error;

/// Failures surfaced by the analysis core. Nothing here is fatal to the
/// process; every failure path returns a value.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No numeric data recoverable from the payload under its declared format.
    #[error("could not extract signal data: {0}")]
    Parse(String),

    /// A zero-length sequence reached the detector.
    #[error("signal sequence is empty")]
    EmptySequence,
}
