//! Newton solver with box constraints.

use crate::error::{ResolveError, ResolveResult};
use nalgebra::{DMatrix, DVector};
use tracing::debug;

/// Newton solver configuration.
#[derive(Debug, Clone)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Converged once the residual norm drops below this
    pub abs_tol: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
    /// Lower bound per unknown, iterates are projected onto it
    pub lower: Option<DVector<f64>>,
    /// Upper bound per unknown
    pub upper: Option<DVector<f64>>,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            abs_tol: 1e-6,
            line_search_beta: 0.5,
            max_line_search_iters: 20,
            lower: None,
            upper: None,
        }
    }
}

impl NewtonConfig {
    fn project(&self, mut x: DVector<f64>) -> DVector<f64> {
        if let Some(lo) = &self.lower {
            x.zip_apply(lo, |xi, l| *xi = xi.max(l));
        }
        if let Some(hi) = &self.upper {
            x.zip_apply(hi, |xi, h| *xi = xi.min(h));
        }
        x
    }
}

/// Newton iteration result.
#[derive(Debug, Clone)]
pub struct NewtonResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

/// Projected Newton solver with backtracking line search.
///
/// Every trial point is clipped to the configured bounds before the residual
/// is evaluated. Returns `ConvergenceFailed` once the iteration cap is hit.
pub fn newton_solve<F, J>(
    x0: DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
) -> ResolveResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> ResolveResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> ResolveResult<DMatrix<f64>>,
{
    let mut x = config.project(x0);
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.norm();

    for iter in 0..config.max_iterations {
        debug!(iter, residual = r_norm, x = ?x.as_slice(), "newton iteration");
        if r_norm < config.abs_tol {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
            });
        }

        let jac = jacobian_fn(&x)?;

        // Solve J * dx = -r
        let dx = jac.lu().solve(&(-r.clone())).ok_or_else(|| ResolveError::Numeric {
            what: "singular Jacobian".to_string(),
            iterations: iter,
        })?;

        let mut alpha = 1.0;
        let mut x_new = config.project(&x + alpha * &dx);
        let mut r_new = residual_fn(&x_new)?;
        let mut r_new_norm = r_new.norm();

        for _ in 0..config.max_line_search_iters {
            if r_new_norm < r_norm {
                break;
            }
            alpha *= config.line_search_beta;
            x_new = config.project(&x + alpha * &dx);
            r_new = residual_fn(&x_new)?;
            r_new_norm = r_new.norm();
        }

        x = x_new;
        r = r_new;
        r_norm = r_new_norm;
    }

    if r_norm < config.abs_tol {
        return Ok(NewtonResult {
            x,
            residual_norm: r_norm,
            iterations: config.max_iterations,
            converged: true,
        });
    }

    Err(ResolveError::ConvergenceFailed {
        what: format!(
            "maximum iterations {} reached, residual = {}",
            config.max_iterations, r_norm
        ),
        iterations: config.max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_quadratic() {
        // x^2 - 4 = 0, x > 0
        let residual = |x: &DVector<f64>| -> ResolveResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] - 4.0))
        };
        let jacobian = |x: &DVector<f64>| -> ResolveResult<DMatrix<f64>> {
            Ok(DMatrix::from_element(1, 1, 2.0 * x[0]))
        };

        let result = newton_solve(
            DVector::from_element(1, 3.0),
            residual,
            jacobian,
            &NewtonConfig::default(),
        )
        .unwrap();

        assert!(result.converged);
        assert!((result.x[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn bounds_select_positive_root() {
        let residual = |x: &DVector<f64>| -> ResolveResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] - 4.0))
        };
        let jacobian = |x: &DVector<f64>| -> ResolveResult<DMatrix<f64>> {
            Ok(DMatrix::from_element(1, 1, 2.0 * x[0]))
        };
        let config = NewtonConfig {
            lower: Some(DVector::from_element(1, 0.5)),
            upper: Some(DVector::from_element(1, 10.0)),
            ..NewtonConfig::default()
        };
        // Unconstrained Newton from -0.1 heads for the negative root
        let result = newton_solve(DVector::from_element(1, -0.1), residual, jacobian, &config)
            .unwrap();
        assert!(result.converged);
        assert!((result.x[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn root_outside_bounds_fails() {
        let residual = |x: &DVector<f64>| -> ResolveResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] - 100.0))
        };
        let jacobian =
            |_: &DVector<f64>| -> ResolveResult<DMatrix<f64>> { Ok(DMatrix::identity(1, 1)) };
        let config = NewtonConfig {
            max_iterations: 5,
            upper: Some(DVector::from_element(1, 10.0)),
            ..NewtonConfig::default()
        };
        let err = newton_solve(DVector::from_element(1, 1.0), residual, jacobian, &config)
            .unwrap_err();
        assert!(matches!(err, ResolveError::ConvergenceFailed { .. }));
        assert_eq!(err.iterations(), Some(5));
    }

    #[test]
    fn singular_jacobian_is_numeric_error() {
        let residual = |_: &DVector<f64>| -> ResolveResult<DVector<f64>> {
            Ok(DVector::from_element(1, 1.0))
        };
        let jacobian =
            |_: &DVector<f64>| -> ResolveResult<DMatrix<f64>> { Ok(DMatrix::zeros(1, 1)) };
        let err = newton_solve(
            DVector::from_element(1, 1.0),
            residual,
            jacobian,
            &NewtonConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::Numeric { .. }));
        assert_eq!(err.iterations(), Some(0));
    }
}
