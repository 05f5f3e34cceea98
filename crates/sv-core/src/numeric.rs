use crate::SvError;
use crate::diagnostics::{Condition, Diagnostic};

/// Floating point type used throughout system
pub type Real = f64;

/// Floor applied to denominators that can vanish for degenerate hulls.
pub const DENOMINATOR_EPSILON: Real = 1e-4;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, SvError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SvError::NonFinite { what, value: v })
    }
}

pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, SvError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(SvError::InvalidArg { what })
    }
}

/// Floors a denominator at [`DENOMINATOR_EPSILON`].
///
/// When the floor is applied a `DegenerateGeometry` diagnostic is pushed so the
/// caller can tell the result came from a physically meaningless input.
pub fn floor_denominator(value: Real, what: &'static str, diags: &mut Vec<Diagnostic>) -> Real {
    if value < DENOMINATOR_EPSILON {
        diags.push(Diagnostic::new(Condition::DegenerateGeometry, what, value));
        DENOMINATOR_EPSILON
    } else {
        value
    }
}

/// Relative difference `|a - b| / |reference|`, infinite when the reference is zero.
pub fn relative_gap(a: Real, b: Real, reference: Real) -> Real {
    if reference == 0.0 {
        return Real::INFINITY;
    }
    (a - b).abs() / reference.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero() {
        assert!(ensure_positive(0.0, "length").is_err());
        assert_eq!(ensure_positive(2.5, "length").unwrap(), 2.5);
    }

    #[test]
    fn floor_denominator_flags_substitution() {
        let mut diags = Vec::new();
        assert_eq!(floor_denominator(3.0, "depth", &mut diags), 3.0);
        assert!(diags.is_empty());

        let v = floor_denominator(0.0, "depth", &mut diags);
        assert_eq!(v, DENOMINATOR_EPSILON);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].condition, Condition::DegenerateGeometry);
    }

    #[test]
    fn relative_gap_zero_reference() {
        assert!(relative_gap(1.0, 2.0, 0.0).is_infinite());
        assert!((relative_gap(110.0, 100.0, 100.0) - 0.1).abs() < 1e-12);
    }
}
