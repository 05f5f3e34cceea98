//! Conditions raised by empirical curves.
//!
//! Regression formulas are only validated over a limited range and several of
//! them divide by quantities that vanish for degenerate hulls. Rather than
//! failing, the curves substitute a neutral value and attach a [`Diagnostic`]
//! so that callers can decide whether the estimate is usable.

use crate::Real;
use std::fmt;

/// Kind of recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    /// A regression input fell outside its tabulated bins; a zero coefficient
    /// was substituted.
    OutOfValidatedRange,
    /// A denominator was at or near zero and was floored.
    DegenerateGeometry,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfValidatedRange => write!(f, "out of validated range"),
            Self::DegenerateGeometry => write!(f, "degenerate geometry"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    pub condition: Condition,
    /// Quantity that triggered the condition
    pub what: &'static str,
    /// Offending value
    pub value: Real,
}

impl Diagnostic {
    pub fn new(condition: Condition, what: &'static str, value: Real) -> Self {
        Self {
            condition,
            what,
            value,
        }
    }

    pub fn out_of_range(what: &'static str, value: Real) -> Self {
        Self::new(Condition::OutOfValidatedRange, what, value)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} = {})", self.condition, self.what, self.value)
    }
}

/// A value together with the diagnostics raised while computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Flagged<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Flagged<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    pub fn with(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has(&self, condition: Condition) -> bool {
        self.diagnostics.iter().any(|d| d.condition == condition)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Flagged<U> {
        Flagged {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    /// Moves the diagnostics into `sink` and returns the bare value.
    pub fn drain_into(self, sink: &mut Vec<Diagnostic>) -> T {
        sink.extend(self.diagnostics);
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flagged_tracks_conditions() {
        let f = Flagged::with(0.0, vec![Diagnostic::out_of_range("froude", 1.2)]);
        assert!(!f.is_clean());
        assert!(f.has(Condition::OutOfValidatedRange));
        assert!(!f.has(Condition::DegenerateGeometry));
    }

    #[test]
    fn drain_moves_diagnostics() {
        let mut sink = Vec::new();
        let f = Flagged::with(
            3.0,
            vec![Diagnostic::new(Condition::DegenerateGeometry, "depth", 0.0)],
        );
        let v = f.drain_into(&mut sink);
        assert_eq!(v, 3.0);
        assert_eq!(sink.len(), 1);
        assert!(sink[0].to_string().contains("depth"));
    }
}
