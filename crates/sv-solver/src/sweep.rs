//! Forward sweep over length.
//!
//! Steps L upward from the lower bound, deriving T and B from the ratios, and
//! stops at the first length whose displacement is within tolerance of the
//! estimated weight. The first acceptable hull is returned, not the best one.

use crate::resolver::{DesignRatios, DimensionResolver, ResolveStrategy, ResolvedDimensions};
use sv_core::Real;
use tracing::debug;

pub(crate) fn forward_sweep(
    resolver: &DimensionResolver,
    cb: Real,
    ratios: &DesignRatios,
) -> ResolvedDimensions {
    let config = resolver.config();
    let mut step = 0usize;
    loop {
        // Index based to avoid accumulating rounding over ~300 steps
        let length_m = config.min_length_m + step as Real * config.sweep_step_m;
        if length_m >= config.max_length_m {
            return ResolvedDimensions::failed(ResolveStrategy::Sweep, step);
        }

        let (beam_m, draft_m) = ratios.beam_and_draft(length_m);
        if config.in_section_bounds(beam_m, draft_m) {
            let balance = resolver.balance(cb, ratios, length_m);
            debug!(
                length_m,
                weight_t = balance.weight_t,
                displacement_t = balance.displacement_t,
                "sweep step"
            );
            if balance.within(config.tolerance) {
                return balance.resolved(ResolveStrategy::Sweep, step);
            }
        }
        step += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolverConfig;

    #[test]
    fn failed_sweep_counts_every_step() {
        let resolver = DimensionResolver::default();
        let r = forward_sweep(&resolver, 0.39, &DesignRatios::new(3.0, 2.5, 0.15));
        assert!(!r.converged);
        assert_eq!(r.iterations, 320);
    }

    #[test]
    fn first_acceptable_not_best() {
        // A wide tolerance accepts the very first step even though a longer
        // hull balances more closely.
        let resolver = DimensionResolver::new(ResolverConfig {
            tolerance: 0.7,
            ..ResolverConfig::default()
        });
        let ratios = DesignRatios::new(6.0, 2.0, 0.08);
        let r = forward_sweep(&resolver, 0.45, &ratios);
        assert!(r.converged);
        assert_eq!(r.iterations, 0);
        assert!((r.length_m - 19.0).abs() < 1e-12);
        let closer = resolver.balance(0.45, &ratios, 27.4);
        assert!(closer.relative().abs() < r.relative_residual());
    }
}
