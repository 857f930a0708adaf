use thiserror::Error;

/// Failure reported by an external collaborator (OCR engine or classifier).
#[derive(Debug, Error)]
pub enum SignalError {
    /// The collaborator cannot run at all: binary or model artifact missing.
    #[error("signal unavailable: {0}")]
    Unavailable(String),

    /// The collaborator ran and failed.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl SignalError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        SignalError::Unavailable(reason.into())
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, SignalError::Unavailable(_))
    }
}

/// Errors the ensemble core refuses to recover from.
#[derive(Debug, Error, PartialEq)]
pub enum EnsembleError {
    #[error("malformed {signal} probabilities: {reason}")]
    MalformedInput { signal: &'static str, reason: String },
}

impl EnsembleError {
    pub fn malformed(signal: &'static str, reason: impl Into<String>) -> Self {
        EnsembleError::MalformedInput {
            signal,
            reason: reason.into(),
        }
    }
}
