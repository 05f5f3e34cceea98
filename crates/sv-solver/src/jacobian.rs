//! Finite difference Jacobian.

use crate::error::ResolveResult;
use nalgebra::{DMatrix, DVector};

/// Forward difference Jacobian of `f` at `x`.
///
/// Column j perturbs x[j] by `epsilon·max(|x[j]|, 1)`.
pub fn finite_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> ResolveResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> ResolveResult<DVector<f64>>,
{
    let n = x.len();
    let f_x = f(x)?;
    let m = f_x.len();

    let mut jac = DMatrix::zeros(m, n);

    for j in 0..n {
        let mut x_perturbed = x.clone();
        let dx = epsilon * x[j].abs().max(1.0);
        x_perturbed[j] += dx;

        let df = (f(&x_perturbed)? - &f_x) / dx;
        jac.set_column(j, &df);
    }

    Ok(jac)
}
