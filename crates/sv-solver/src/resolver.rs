//! Ratio to dimension resolution.

use crate::error::{ResolveError, ResolveResult};
use crate::jacobian::finite_difference_jacobian;
use crate::newton::{NewtonConfig, newton_solve};
use crate::sweep;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use sv_core::{Real, ensure_positive, relative_gap};
use sv_curves::{FuelAllowance, GrubisicWeights, WeightCurve, WeightInput, displacement};
use tracing::debug;

/// Dimensionless hull proportions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignRatios {
    /// Length over beam
    pub lb: Real,
    /// Beam over draft
    pub bt: Real,
    /// Draft over length
    pub tl: Real,
}

impl DesignRatios {
    pub fn new(lb: Real, bt: Real, tl: Real) -> Self {
        Self { lb, bt, tl }
    }

    /// Beam and draft at a given length, derived from T/L and B/T.
    pub fn beam_and_draft(&self, length_m: Real) -> (Real, Real) {
        let draft = self.tl * length_m;
        (self.bt * draft, draft)
    }

    /// L/B implied by the other two ratios.
    pub fn implied_lb(&self) -> Real {
        1.0 / (self.bt * self.tl)
    }

    pub fn validate(&self) -> ResolveResult<()> {
        ensure_positive(self.lb, "L/B")?;
        ensure_positive(self.bt, "B/T")?;
        ensure_positive(self.tl, "T/L")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveStrategy {
    /// Forward sweep over length, first balanced hull wins.
    #[default]
    Sweep,
    /// Projected Newton on the relative weight-displacement residual.
    Newton,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub min_length_m: Real,
    pub max_length_m: Real,
    pub min_beam_m: Real,
    pub max_beam_m: Real,
    pub min_draft_m: Real,
    pub max_draft_m: Real,
    pub sweep_step_m: Real,
    /// Accepted |W − Δ| as a fraction of W
    pub tolerance: Real,
    /// Machinery rating assumed while sizing
    pub reference_mcr_kw: Real,
    /// Endurance speed assumed for the fuel load while sizing
    pub reference_speed_kn: Real,
    pub strategy: ResolveStrategy,
    pub max_iterations: usize,
    pub jacobian_epsilon: Real,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_length_m: 19.0,
            max_length_m: 51.0,
            min_beam_m: 2.0,
            max_beam_m: 12.0,
            min_draft_m: 1.0,
            max_draft_m: 5.0,
            sweep_step_m: 0.1,
            tolerance: 0.1,
            reference_mcr_kw: 500.0,
            reference_speed_kn: 16.0,
            strategy: ResolveStrategy::Sweep,
            max_iterations: 50,
            jacobian_epsilon: 1e-7,
        }
    }
}

impl ResolverConfig {
    pub fn validate(&self) -> ResolveResult<()> {
        let bounds = [
            (self.min_length_m, self.max_length_m, "length bounds"),
            (self.min_beam_m, self.max_beam_m, "beam bounds"),
            (self.min_draft_m, self.max_draft_m, "draft bounds"),
        ];
        for (lo, hi, what) in bounds {
            ensure_positive(lo, what)?;
            if !(hi.is_finite() && hi > lo) {
                return Err(ResolveError::InvalidInput { what });
            }
        }
        ensure_positive(self.sweep_step_m, "sweep step")?;
        ensure_positive(self.tolerance, "tolerance")?;
        ensure_positive(self.reference_mcr_kw, "reference MCR")?;
        ensure_positive(self.reference_speed_kn, "reference speed")?;
        ensure_positive(self.jacobian_epsilon, "jacobian epsilon")?;
        if self.max_iterations == 0 {
            return Err(ResolveError::InvalidInput {
                what: "max iterations",
            });
        }
        Ok(())
    }

    pub(crate) fn in_section_bounds(&self, beam_m: Real, draft_m: Real) -> bool {
        (self.min_beam_m..=self.max_beam_m).contains(&beam_m)
            && (self.min_draft_m..=self.max_draft_m).contains(&draft_m)
    }
}

/// Outcome of one resolution.
///
/// When `converged` is false the dimensions are a zero sentinel and must not
/// be evaluated as a hull.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedDimensions {
    pub length_m: Real,
    pub beam_m: Real,
    pub draft_m: Real,
    pub weight_t: Real,
    pub displacement_t: Real,
    /// Weight less displacement, t
    pub residual_t: Real,
    pub iterations: usize,
    pub converged: bool,
    pub strategy: ResolveStrategy,
}

impl ResolvedDimensions {
    pub fn failed(strategy: ResolveStrategy, iterations: usize) -> Self {
        Self {
            length_m: 0.0,
            beam_m: 0.0,
            draft_m: 0.0,
            weight_t: 0.0,
            displacement_t: 0.0,
            residual_t: 0.0,
            iterations,
            converged: false,
            strategy,
        }
    }

    /// |W − Δ| / W
    pub fn relative_residual(&self) -> Real {
        relative_gap(self.weight_t, self.displacement_t, self.weight_t)
    }
}

/// Weight and displacement of the ratio hull at one length.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Balance {
    pub length_m: Real,
    pub beam_m: Real,
    pub draft_m: Real,
    pub weight_t: Real,
    pub displacement_t: Real,
}

impl Balance {
    /// Signed (W − Δ)/W
    pub fn relative(&self) -> Real {
        (self.weight_t - self.displacement_t) / self.weight_t
    }

    pub fn within(&self, tolerance: Real) -> bool {
        let lower = self.weight_t * (1.0 - tolerance);
        let upper = self.weight_t * (1.0 + tolerance);
        lower < self.displacement_t && self.displacement_t < upper
    }

    pub fn resolved(&self, strategy: ResolveStrategy, iterations: usize) -> ResolvedDimensions {
        ResolvedDimensions {
            length_m: self.length_m,
            beam_m: self.beam_m,
            draft_m: self.draft_m,
            weight_t: self.weight_t,
            displacement_t: self.displacement_t,
            residual_t: self.weight_t - self.displacement_t,
            iterations,
            converged: true,
            strategy,
        }
    }
}

/// Finds balanced principal dimensions for ratio-defined designs.
#[derive(Clone)]
pub struct DimensionResolver {
    config: ResolverConfig,
    curve: Arc<dyn WeightCurve>,
}

impl std::fmt::Debug for DimensionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DimensionResolver")
            .field("config", &self.config)
            .field("curve", &self.curve.name())
            .finish()
    }
}

impl Default for DimensionResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl DimensionResolver {
    /// Resolver sizing against the Grubisic weight regression.
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_curve(config, Arc::new(GrubisicWeights::default()))
    }

    pub fn with_curve(config: ResolverConfig, curve: Arc<dyn WeightCurve>) -> Self {
        Self { config, curve }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub(crate) fn balance(&self, cb: Real, ratios: &DesignRatios, length_m: Real) -> Balance {
        let (beam_m, draft_m) = ratios.beam_and_draft(length_m);
        let input = WeightInput {
            cb,
            draft_m,
            length_m,
            beam_m,
            mcr_kw: self.config.reference_mcr_kw,
        };
        let weight = self.curve.estimate(
            &input,
            FuelAllowance::Endurance {
                speed_kn: self.config.reference_speed_kn,
            },
        );
        if !weight.is_clean() {
            debug!(length_m, diagnostics = ?weight.diagnostics, "weight curve flagged");
        }
        Balance {
            length_m,
            beam_m,
            draft_m,
            weight_t: weight.value.total_t,
            displacement_t: displacement(cb, draft_m, length_m, beam_m),
        }
    }

    /// Resolves ratios into dimensions with the configured strategy.
    ///
    /// Non-convergence is reported through [`ResolvedDimensions::converged`];
    /// errors are returned only for invalid inputs.
    pub fn resolve(&self, cb: Real, ratios: &DesignRatios) -> ResolveResult<ResolvedDimensions> {
        if !(cb > 0.0 && cb < 1.0) {
            return Err(ResolveError::InvalidInput {
                what: "block coefficient",
            });
        }
        ratios.validate()?;

        let implied = ratios.implied_lb();
        if relative_gap(ratios.lb, implied, implied) > 1e-6 {
            debug!(
                lb = ratios.lb,
                implied, "L/B inconsistent with B/T and T/L, using B/T and T/L"
            );
        }

        let resolved = match self.config.strategy {
            ResolveStrategy::Sweep => sweep::forward_sweep(self, cb, ratios),
            ResolveStrategy::Newton => self.newton(cb, ratios),
        };

        if resolved.converged {
            debug!(
                length_m = resolved.length_m,
                beam_m = resolved.beam_m,
                draft_m = resolved.draft_m,
                iterations = resolved.iterations,
                "dimensions resolved"
            );
        } else {
            debug!(
                cb,
                lb = ratios.lb,
                bt = ratios.bt,
                tl = ratios.tl,
                strategy = ?resolved.strategy,
                "dimension resolution failed"
            );
        }
        Ok(resolved)
    }

    /// Length interval on which beam and draft also satisfy their bounds.
    fn length_interval(&self, ratios: &DesignRatios) -> Option<(Real, Real)> {
        let c = &self.config;
        let bt_tl = ratios.bt * ratios.tl;
        let lo = c
            .min_length_m
            .max(c.min_draft_m / ratios.tl)
            .max(c.min_beam_m / bt_tl);
        let hi = c
            .max_length_m
            .min(c.max_draft_m / ratios.tl)
            .min(c.max_beam_m / bt_tl);
        (lo <= hi).then_some((lo, hi))
    }

    fn newton(&self, cb: Real, ratios: &DesignRatios) -> ResolvedDimensions {
        let strategy = ResolveStrategy::Newton;
        let Some((lo, hi)) = self.length_interval(ratios) else {
            debug!("no length satisfies beam and draft bounds");
            return ResolvedDimensions::failed(strategy, 0);
        };

        let residual = |x: &DVector<f64>| -> crate::ResolveResult<DVector<f64>> {
            Ok(DVector::from_element(1, self.balance(cb, ratios, x[0]).relative()))
        };
        let config = NewtonConfig {
            max_iterations: self.config.max_iterations,
            abs_tol: self.config.tolerance,
            lower: Some(DVector::from_element(1, lo)),
            upper: Some(DVector::from_element(1, hi)),
            ..NewtonConfig::default()
        };
        let x0 = DVector::from_element(1, 0.5 * (lo + hi));
        let eps = self.config.jacobian_epsilon;

        match newton_solve(
            x0,
            residual,
            |x| finite_difference_jacobian(x, residual, eps),
            &config,
        ) {
            Ok(result) => {
                let balance = self.balance(cb, ratios, result.x[0]);
                if balance.within(self.config.tolerance)
                    && self.config.in_section_bounds(balance.beam_m, balance.draft_m)
                {
                    balance.resolved(strategy, result.iterations)
                } else {
                    ResolvedDimensions::failed(strategy, result.iterations)
                }
            }
            Err(e) => {
                debug!(error = %e, "newton resolution stopped");
                ResolvedDimensions::failed(strategy, e.iterations().unwrap_or(0))
            }
        }
    }
}
