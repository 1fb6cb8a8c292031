//! Error types.
//!
//! Two layers:
//!
//! - [`MscError`]: the library taxonomy returned by the fitting core
//! - [`AppError`]: what the `msc` binary reports (message + process exit code)
//!
//! Exit codes: `2` input/config/IO, `3` fit failure, `4` numerical/internal.

use thiserror::Error;

/// Errors produced by the fitting core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MscError {
    /// Malformed measurements or candidate set (caught before any numeric work).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Every candidate Q produced a degenerate fit.
    #[error("Fit failure: all {candidates} candidate Q values produced a degenerate fit (log theta constant across samples)")]
    FitFailure { candidates: usize },

    /// Log theta or the regression produced a non-finite value for an otherwise valid Q.
    #[error("Numerical failure at Q = {q}: {detail}")]
    NumericalFailure { q: f64, detail: String },
}

impl MscError {
    pub fn invalid(message: impl Into<String>) -> Self {
        MscError::InvalidInput(message.into())
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<MscError> for AppError {
    fn from(err: MscError) -> Self {
        let exit_code = match err {
            MscError::InvalidInput(_) => 2,
            MscError::FitFailure { .. } => 3,
            MscError::NumericalFailure { .. } => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msc_errors_map_to_exit_codes() {
        let e: AppError = MscError::invalid("bad").into();
        assert_eq!(e.exit_code(), 2);
        let e: AppError = MscError::FitFailure { candidates: 3 }.into();
        assert_eq!(e.exit_code(), 3);
        assert!(e.to_string().contains("all 3 candidate"));
        let e: AppError = MscError::NumericalFailure { q: 1.0, detail: "nan".into() }.into();
        assert_eq!(e.exit_code(), 4);
    }
}
