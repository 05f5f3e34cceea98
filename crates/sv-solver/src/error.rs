//! Error types for dimension resolution.

use sv_core::SvError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Convergence failed after {iterations} iterations: {what}")]
    ConvergenceFailed { what: String, iterations: usize },

    #[error("Numeric error at iteration {iterations}: {what}")]
    Numeric { what: String, iterations: usize },

    #[error("Invalid input: {what}")]
    InvalidInput { what: &'static str },

    #[error(transparent)]
    Core(#[from] SvError),
}

impl ResolveError {
    /// Iterations completed before the solver gave up, if it got that far.
    pub fn iterations(&self) -> Option<usize> {
        match self {
            Self::ConvergenceFailed { iterations, .. } | Self::Numeric { iterations, .. } => {
                Some(*iterations)
            }
            _ => None,
        }
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;
