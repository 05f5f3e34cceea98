//! Lightship and deadweight estimation.
//!
//! Two regressions are available behind [`WeightCurve`]:
//! - [`GrubisicWeights`]: Grubisic & Begovic (2009) for small aluminium
//!   patrol craft, the default used by the design pipeline.
//! - [`ParsonsWeights`]: Parsons' NA470 coursepack tug regression.
//!
//! Both treat `L_p = L_wl = L_oa` and estimate depth from draft.

use crate::hull::{displacement, estimate_depth};
use sv_core::constants::RHO_SEAWATER_KG_M3;
use sv_core::{Flagged, Real, floor_denominator};

/// Principal particulars consumed by a weight curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightInput {
    pub cb: Real,
    pub draft_m: Real,
    pub length_m: Real,
    pub beam_m: Real,
    pub mcr_kw: Real,
}

/// How the fuel load enters the weight estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FuelAllowance {
    /// Steady-state endurance at `speed_kn`: `SFC·MCR·(range/speed)·margin`.
    Endurance { speed_kn: Real },
    /// Fuel mass supplied by a mission integrator, tonnes.
    Fixed { fuel_t: Real },
}

/// Weight groups in metric tonnes.
///
/// Grubisic groups follow the SWBS numbering: structure (100), machinery
/// (200, propulsion engine and propeller included), electrical (300),
/// electronics (400), auxiliary (500), outfit (600) and special systems (700).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WeightBreakdown {
    pub structure_t: Real,
    pub machinery_t: Real,
    pub fuel_t: Real,
    pub electrical_t: Real,
    pub electronics_t: Real,
    pub auxiliary_t: Real,
    pub outfit_t: Real,
    pub special_systems_t: Real,
    pub cargo_t: Real,
    pub margin_t: Real,
    pub total_t: Real,
}

impl WeightBreakdown {
    /// Sum of all groups before the design margin.
    pub fn subtotal_t(&self) -> Real {
        self.structure_t
            + self.machinery_t
            + self.fuel_t
            + self.electrical_t
            + self.electronics_t
            + self.auxiliary_t
            + self.outfit_t
            + self.special_systems_t
            + self.cargo_t
    }

    /// Lightship, i.e. total less fuel and cargo.
    pub fn lightship_t(&self) -> Real {
        self.total_t - self.fuel_t - self.cargo_t
    }

    fn close(mut self, margin_fraction: Real) -> Self {
        let subtotal = self.subtotal_t();
        self.margin_t = subtotal * margin_fraction;
        self.total_t = subtotal + self.margin_t;
        self
    }
}

/// A weight regression.
pub trait WeightCurve: Send + Sync {
    fn name(&self) -> &str;

    fn estimate(&self, input: &WeightInput, fuel: FuelAllowance) -> Flagged<WeightBreakdown>;
}

/// Grubisic & Begovic (2009) regression for aluminium patrol craft.
#[derive(Debug, Clone, PartialEq)]
pub struct GrubisicWeights {
    /// Service type factor (1.20 patrol craft)
    pub service_type_factor: Real,
    /// Service restriction factor (1.25 unrestricted)
    pub service_restriction_factor: Real,
    pub sfc_t_per_kwh: Real,
    pub endurance_nm: Real,
    pub fuel_margin: Real,
    pub cargo_t: Real,
    pub margin_fraction: Real,
}

impl Default for GrubisicWeights {
    fn default() -> Self {
        Self {
            service_type_factor: 1.20,
            service_restriction_factor: 1.25,
            sfc_t_per_kwh: 0.000196,
            endurance_nm: 4500.0,
            fuel_margin: 1.05,
            // Two 30 t shipping containers
            cargo_t: 60.0,
            margin_fraction: 0.05,
        }
    }
}

impl GrubisicWeights {
    fn fuel_t(&self, mcr_kw: Real, fuel: FuelAllowance) -> Real {
        match fuel {
            FuelAllowance::Endurance { speed_kn } => {
                self.sfc_t_per_kwh * mcr_kw * (self.endurance_nm / speed_kn) * self.fuel_margin
            }
            FuelAllowance::Fixed { fuel_t } => fuel_t,
        }
    }
}

impl WeightCurve for GrubisicWeights {
    fn name(&self) -> &str {
        "grubisic"
    }

    fn estimate(&self, input: &WeightInput, fuel: FuelAllowance) -> Flagged<WeightBreakdown> {
        let WeightInput {
            cb,
            draft_m: t,
            length_m: l,
            beam_m: b,
            mcr_kw,
        } = *input;
        let mut diags = Vec::new();

        let disp = displacement(cb, t, l, b);
        let d = estimate_depth(t);
        let freeboard = floor_denominator(d - t, "freeboard", &mut diags);

        // Reduced surface area: bottom, sides, deck, watertight bulkheads
        let s_bottom = 2.825 * ((disp / RHO_SEAWATER_KG_M3) * l).sqrt();
        let s_sides = 1.09 * (2.0 * (l + b)) * freeboard;
        let s_deck = 0.823 * l * b;
        let n_bulkheads = l / 5.0;
        let s_bulkheads = 0.6 * n_bulkheads * b * d;
        let s_reduced = s_bottom + 0.73 * s_sides + 0.69 * s_deck + 0.65 * s_bulkheads;

        // Displacement-length and draft-depth corrections
        let l2 = floor_denominator(l * l - 15.8, "length squared less 15.8", &mut diags);
        let disp_lr = 0.125 * l2;
        let nabla = (disp_lr + disp) / RHO_SEAWATER_KG_M3;
        let f_dis = 0.7 + 2.4 * (nabla / l2);
        let c_td = 1.144 * (t / floor_denominator(d, "depth", &mut diags)).powf(0.244);

        let structural_numeral = f_dis * c_td * s_reduced;
        let k = 0.002 + 0.0064 * self.service_type_factor * self.service_restriction_factor;

        let lbd = l * b * d;
        let propulsion = mcr_kw / 286.0;
        let remaining_machinery = lbd.powf(0.94) / 45.66;
        let propeller = mcr_kw.powf(1.271) / 8375.0;

        let breakdown = WeightBreakdown {
            structure_t: k * structural_numeral.powf(1.33),
            machinery_t: remaining_machinery + propulsion + propeller,
            fuel_t: self.fuel_t(mcr_kw, fuel),
            electrical_t: lbd.powf(1.24) / 592.0,
            electronics_t: l.powf(2.254) / 1887.0,
            auxiliary_t: (l * b).powf(1.784) / 1295.0,
            outfit_t: l.powf(2.132) / 102.5,
            special_systems_t: lbd.powf(1.422) / 3000.0,
            cargo_t: self.cargo_t,
            margin_t: 0.0,
            total_t: 0.0,
        };

        Flagged::with(breakdown.close(self.margin_fraction), diags)
    }
}

/// Parsons' NA470 tug regression.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsonsWeights {
    /// Structural weight constant (0.044 for tugs)
    pub k: Real,
    /// Lloyd's equipment numeral
    pub equipment_numeral: Real,
    /// Outfit coefficient
    pub outfit_coefficient: Real,
    pub sfc_t_per_kwh: Real,
    pub endurance_nm: Real,
    pub fuel_margin: Real,
    pub cargo_t: Real,
    pub margin_fraction: Real,
}

impl Default for ParsonsWeights {
    fn default() -> Self {
        Self {
            k: 0.044,
            equipment_numeral: 400.0,
            outfit_coefficient: 0.4,
            sfc_t_per_kwh: 0.000196,
            endurance_nm: 4500.0,
            fuel_margin: 1.05,
            cargo_t: 60.0,
            margin_fraction: 0.05,
        }
    }
}

impl WeightCurve for ParsonsWeights {
    fn name(&self) -> &str {
        "parsons"
    }

    fn estimate(&self, input: &WeightInput, fuel: FuelAllowance) -> Flagged<WeightBreakdown> {
        let WeightInput {
            cb,
            draft_m: t,
            length_m: l,
            beam_m: b,
            mcr_kw,
        } = *input;
        let mut diags = Vec::new();

        let d = estimate_depth(t);
        let t_floor = floor_denominator(t, "draft", &mut diags);
        // Block coefficient at 0.8·D
        let cb_prime = cb + (1.0 - cb) * ((0.8 * d - t) / (3.0 * t_floor));
        let structure = self.k * self.equipment_numeral.powf(1.36) * (1.0 + 0.5 * (cb_prime - 0.7));

        let fuel_t = match fuel {
            FuelAllowance::Endurance { speed_kn } => {
                self.sfc_t_per_kwh * mcr_kw * (self.endurance_nm / speed_kn) * self.fuel_margin
            }
            FuelAllowance::Fixed { fuel_t } => fuel_t,
        };

        let breakdown = WeightBreakdown {
            structure_t: structure,
            machinery_t: 0.72 * mcr_kw.powf(0.78),
            fuel_t,
            outfit_t: self.outfit_coefficient * l * b,
            cargo_t: self.cargo_t,
            ..WeightBreakdown::default()
        };

        Flagged::with(breakdown.close(self.margin_fraction), diags)
    }
}

/// Grubisic total weight with the fuel load from steady endurance at `speed_kn`.
pub fn weight_estimate(
    cb: Real,
    draft_m: Real,
    length_m: Real,
    beam_m: Real,
    mcr_kw: Real,
    speed_kn: Real,
) -> Flagged<Real> {
    let input = WeightInput {
        cb,
        draft_m,
        length_m,
        beam_m,
        mcr_kw,
    };
    GrubisicWeights::default()
        .estimate(&input, FuelAllowance::Endurance { speed_kn })
        .map(|w| w.total_t)
}

/// Grubisic total weight with an externally computed fuel load.
pub fn weight_estimate_with_fuel(
    cb: Real,
    draft_m: Real,
    length_m: Real,
    beam_m: Real,
    mcr_kw: Real,
    fuel_t: Real,
) -> Flagged<Real> {
    let input = WeightInput {
        cb,
        draft_m,
        length_m,
        beam_m,
        mcr_kw,
    };
    GrubisicWeights::default()
        .estimate(&input, FuelAllowance::Fixed { fuel_t })
        .map(|w| w.total_t)
}
