//! Initial transverse stability.

use sv_core::{Flagged, Real, floor_denominator};

/// Vertical centre of gravity as a fraction of draft.
pub const KG_DRAFT_FRACTION: Real = 0.8;

/// Breakdown of the transverse metacentric height, all heights above keel.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StabilityEstimate {
    /// Prismatic coefficient
    pub cp: Real,
    /// Waterplane coefficient
    pub cwp: Real,
    pub kb_m: Real,
    pub bm_m: Real,
    pub kg_m: Real,
    pub gm_m: Real,
}

impl StabilityEstimate {
    /// A design is initially stable when `GM > 0`.
    pub fn is_stable(&self) -> bool {
        self.gm_m > 0.0
    }
}

/// Transverse metacentric height `GM_T = KB + BM − KG` (Parsons).
///
/// `Cp` and `Cwp` are estimated from `Cb`; `KB` uses the modified Papmel
/// formula `KB = 0.961·T·(1.048 − Cb/(Cb + Cwp))` and `BM = I_T/∇` with the waterplane inertia coefficient
/// `C_I = 1.04·Cwp²/12`.
pub fn metacentric_height(
    cb: Real,
    draft_m: Real,
    length_m: Real,
    beam_m: Real,
) -> Flagged<StabilityEstimate> {
    let mut diags = Vec::new();
    let cp = 0.384 + 0.565 * cb;
    let cwp = 0.467 + 0.47 * cp;

    let kb = 0.961 * draft_m * (1.048 - cb / floor_denominator(cb + cwp, "cb + cwp", &mut diags));

    let ci = 1.04 * cwp * cwp / 12.0;
    let it = ci * length_m * beam_m.powi(3);
    let nabla = floor_denominator(cb * draft_m * length_m * beam_m, "volume", &mut diags);
    let bm = it / nabla;

    let kg = KG_DRAFT_FRACTION * draft_m;

    Flagged::with(
        StabilityEstimate {
            cp,
            cwp,
            kb_m: kb,
            bm_m: bm,
            kg_m: kg,
            gm_m: kb + bm - kg,
        },
        diags,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sv_core::Condition;

    #[test]
    fn reference_hull_is_stable() {
        let s = metacentric_height(0.45, 2.5, 40.0, 8.0);
        assert!(s.is_clean());
        assert!((s.value.gm_m - 2.529_76).abs() < 1e-4);
        assert!(s.value.is_stable());
        assert!((s.value.kg_m - 2.0).abs() < 1e-12);
    }

    #[test]
    fn centre_of_buoyancy_follows_papmel() {
        let s = metacentric_height(0.45, 2.5, 40.0, 8.0).value;
        let expected = 0.961 * 2.5 * (1.048 - 0.45 / (0.45 + s.cwp));
        assert!((s.kb_m - expected).abs() < 1e-12);
        assert!((s.kb_m - 1.629_45).abs() < 1e-4);
    }

    #[test]
    fn narrow_deep_hull_is_unstable() {
        let s = metacentric_height(0.45, 4.0, 40.0, 3.0).value;
        assert!((s.gm_m + 0.338).abs() < 1e-3);
        assert!(!s.is_stable());
    }

    #[test]
    fn zero_volume_is_flagged() {
        let s = metacentric_height(0.45, 0.0, 40.0, 8.0);
        assert!(s.has(Condition::DegenerateGeometry));
        assert!(s.value.gm_m.is_finite());
    }

    proptest! {
        #[test]
        fn gm_decreases_with_draft(
            cb in 0.3..0.6f64,
            l in 20.0..50.0f64,
            b in 3.0..12.0f64,
            t in 1.0..5.0f64,
            dt in 0.05..1.0f64,
        ) {
            let lo = metacentric_height(cb, t, l, b).value.gm_m;
            let hi = metacentric_height(cb, t + dt, l, b).value.gm_m;
            prop_assert!(hi < lo);
        }

        #[test]
        fn gm_increases_with_beam(
            cb in 0.3..0.6f64,
            l in 20.0..50.0f64,
            b in 3.0..12.0f64,
            t in 1.0..5.0f64,
        ) {
            let lo = metacentric_height(cb, t, l, b).value.gm_m;
            let hi = metacentric_height(cb, t, l, b * 1.1).value.gm_m;
            prop_assert!(hi > lo);
        }
    }
}
