//! Hull form quantities derived from principal dimensions.

use sv_core::constants::RHO_SEAWATER_KG_M3;
use sv_core::units::{Area, Length, Mass};
use sv_core::{Flagged, Real, floor_denominator, m, m2, tonnes};

/// Displaced volume `Cb·L·B·T` in m^3.
pub fn volume(cb: Real, draft_m: Real, length_m: Real, beam_m: Real) -> Real {
    cb * draft_m * length_m * beam_m
}

/// Displacement in metric tonnes from the block coefficient definition.
pub fn displacement(cb: Real, draft_m: Real, length_m: Real, beam_m: Real) -> Real {
    volume(cb, draft_m, length_m, beam_m) * RHO_SEAWATER_KG_M3 / 1000.0
}

/// Depth estimated from draft (Grubisic 2012): `D = 2.493·T^0.582`.
pub fn estimate_depth(draft_m: Real) -> Real {
    2.493 * draft_m.powf(0.582)
}

/// Wetted surface area in m^2 (Grubisic 2012).
///
/// `S = C·sqrt(L·∇)` with `C = 2.61 + (B/T)(B/T − 0.244)/81`.
pub fn wetted_surface(cb: Real, draft_m: Real, length_m: Real, beam_m: Real) -> Flagged<Real> {
    let mut diags = Vec::new();
    let t = floor_denominator(draft_m, "draft", &mut diags);
    let bt = beam_m / t;
    let c = 2.61 + (bt * (bt - 0.244)) / 81.0;
    let nabla = volume(cb, draft_m, length_m, beam_m);
    Flagged::with(c * (length_m * nabla).sqrt(), diags)
}

/// Derived hull geometry for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HullForm {
    pub cb: Real,
    pub length: Length,
    pub beam: Length,
    pub draft: Length,
    pub depth: Length,
    pub wetted_surface: Area,
    pub displacement: Mass,
}

impl HullForm {
    pub fn length_m(&self) -> Real {
        self.length.value
    }

    pub fn beam_m(&self) -> Real {
        self.beam.value
    }

    pub fn draft_m(&self) -> Real {
        self.draft.value
    }

    pub fn depth_m(&self) -> Real {
        self.depth.value
    }

    pub fn wetted_surface_m2(&self) -> Real {
        self.wetted_surface.value
    }

    pub fn displacement_t(&self) -> Real {
        sv_core::as_tonnes(self.displacement)
    }
}

/// Computes wetted surface, displacement and depth together.
pub fn hull_form(cb: Real, draft_m: Real, length_m: Real, beam_m: Real) -> Flagged<HullForm> {
    let mut diags = Vec::new();
    let s = wetted_surface(cb, draft_m, length_m, beam_m).drain_into(&mut diags);
    let hull = HullForm {
        cb,
        length: m(length_m),
        beam: m(beam_m),
        draft: m(draft_m),
        depth: m(estimate_depth(draft_m)),
        wetted_surface: m2(s),
        displacement: tonnes(displacement(cb, draft_m, length_m, beam_m)),
    };
    Flagged::with(hull, diags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_core::Condition;

    #[test]
    fn displacement_matches_block_definition() {
        // 0.4 * 2.85 * 19 * 5.7 * 1.026
        let d = displacement(0.4, 2.85, 19.0, 5.7);
        assert!((d - 126.672_012).abs() < 1e-6);
    }

    #[test]
    fn depth_from_draft() {
        assert!((estimate_depth(1.0) - 2.493).abs() < 1e-12);
        assert!(estimate_depth(3.0) > estimate_depth(2.0));
    }

    #[test]
    fn wetted_surface_reference() {
        let s = wetted_surface(0.45, 2.5, 40.0, 8.0);
        assert!(s.is_clean());
        assert!((s.value - 327.213_629_6).abs() < 1e-4);
    }

    #[test]
    fn zero_draft_is_flagged() {
        let s = wetted_surface(0.45, 0.0, 40.0, 8.0);
        assert!(s.has(Condition::DegenerateGeometry));
        assert!(s.value.is_finite());
    }

    #[test]
    fn hull_form_collects_quantities() {
        let hull = hull_form(0.45, 2.5, 40.0, 8.0);
        assert!(hull.is_clean());
        let h = hull.value;
        assert!((h.displacement_t() - 369.36).abs() < 1e-9);
        assert!((h.length_m() - 40.0).abs() < 1e-12);
        assert!(h.depth_m() > h.draft_m());
    }
}
