//! Series 64 residuary resistance.
//!
//! Taken from Molland, *Ship Resistance and Propulsion*. The regression is
//! `C_R = a·(L/Δ^(1/3))^n / 1000` with `(a, n)` tabulated per block
//! coefficient band and Froude number band. The bands are kept as an ordered
//! table so that lookups outside the tested hull family are reported rather
//! than silently producing zero resistance.

use sv_core::constants::{G_MPS2, KNOTS_PER_MPS, RHO_SEAWATER_KG_M3};
use sv_core::units::Force;
use sv_core::{Diagnostic, Real, newtons};

/// One `(Cb band, Fn band) -> (a, n)` regression entry.
///
/// Bands are half open: `lo <= x < hi`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResistanceBin {
    pub cb_lo: Real,
    pub cb_hi: Real,
    pub fn_lo: Real,
    pub fn_hi: Real,
    pub a: Real,
    pub n: Real,
}

impl ResistanceBin {
    const fn new(cb_lo: Real, cb_hi: Real, fn_lo: Real, fn_hi: Real, a: Real, n: Real) -> Self {
        Self {
            cb_lo,
            cb_hi,
            fn_lo,
            fn_hi,
            a,
            n,
        }
    }

    pub fn covers_cb(&self, cb: Real) -> bool {
        cb >= self.cb_lo && cb < self.cb_hi
    }

    pub fn covers_froude(&self, froude: Real) -> bool {
        froude >= self.fn_lo && froude < self.fn_hi
    }

    pub fn contains(&self, cb: Real, froude: Real) -> bool {
        self.covers_cb(cb) && self.covers_froude(froude)
    }

    /// Residuary resistance coefficient for slenderness `L/Δ^(1/3)`.
    pub fn coefficient(&self, slenderness: Real) -> Real {
        self.a * slenderness.powf(self.n) / 1000.0
    }
}

#[rustfmt::skip]
const SERIES_64_BINS: [ResistanceBin; 21] = [
    ResistanceBin::new(0.3, 0.4, 0.35, 0.45, 288.0, -2.33),
    ResistanceBin::new(0.3, 0.4, 0.45, 0.55, 751.0, -2.76),
    ResistanceBin::new(0.3, 0.4, 0.55, 0.65, 758.0, -2.81),
    ResistanceBin::new(0.3, 0.4, 0.65, 0.75, 279.0, -2.42),
    ResistanceBin::new(0.3, 0.4, 0.75, 0.85, 106.0, -2.06),
    ResistanceBin::new(0.3, 0.4, 0.85, 0.95, 47.0, -1.74),
    ResistanceBin::new(0.3, 0.4, 0.95, 1.05, 25.0, -1.50),
    ResistanceBin::new(0.4, 0.5, 0.35, 0.45, 36726.0, -4.41),
    ResistanceBin::new(0.4, 0.5, 0.45, 0.55, 55159.0, -4.61),
    ResistanceBin::new(0.4, 0.5, 0.55, 0.65, 42184.0, -4.56),
    ResistanceBin::new(0.4, 0.5, 0.65, 0.75, 29257.0, -4.47),
    ResistanceBin::new(0.4, 0.5, 0.75, 0.85, 27130.0, -4.51),
    ResistanceBin::new(0.4, 0.5, 0.85, 0.95, 20657.0, -4.46),
    ResistanceBin::new(0.4, 0.5, 0.95, 1.05, 11644.0, -4.24),
    ResistanceBin::new(0.5, 0.6, 0.35, 0.45, 926.0, -2.74),
    ResistanceBin::new(0.5, 0.6, 0.45, 0.55, 1775.0, -3.05),
    ResistanceBin::new(0.5, 0.6, 0.55, 0.65, 1642.0, -3.08),
    ResistanceBin::new(0.5, 0.6, 0.65, 0.75, 1106.0, -2.98),
    ResistanceBin::new(0.5, 0.6, 0.75, 0.85, 783.0, -2.90),
    ResistanceBin::new(0.5, 0.6, 0.85, 0.95, 458.0, -2.73),
    ResistanceBin::new(0.5, 0.6, 0.95, 1.05, 199.0, -2.38),
];

/// Ordered regression table.
#[derive(Debug, Clone, Copy)]
pub struct ResistanceTable<'a> {
    bins: &'a [ResistanceBin],
}

impl ResistanceTable<'static> {
    /// Series 64 high speed displacement hulls.
    pub const SERIES_64: ResistanceTable<'static> = ResistanceTable {
        bins: &SERIES_64_BINS,
    };
}

impl Default for ResistanceTable<'static> {
    fn default() -> Self {
        Self::SERIES_64
    }
}

impl<'a> ResistanceTable<'a> {
    pub fn new(bins: &'a [ResistanceBin]) -> Self {
        Self { bins }
    }

    pub fn bins(&self) -> &'a [ResistanceBin] {
        self.bins
    }

    /// First bin containing `(cb, froude)`.
    pub fn lookup(&self, cb: Real, froude: Real) -> Option<&'a ResistanceBin> {
        self.bins.iter().find(|bin| bin.contains(cb, froude))
    }

    /// Residuary resistance of a hull at `speed_kn`.
    ///
    /// Outside the tabulated bands the coefficient is zero and the estimate
    /// carries an `OutOfValidatedRange` diagnostic for every input that missed.
    pub fn resistance(
        &self,
        length_m: Real,
        wetted_surface_m2: Real,
        displacement_t: Real,
        cb: Real,
        speed_kn: Real,
    ) -> ResistanceEstimate {
        let v = speed_kn / KNOTS_PER_MPS;
        let froude = froude_number(speed_kn, length_m);
        let slenderness = length_m / displacement_t.cbrt();

        let bin = self.lookup(cb, froude).copied();
        let mut diagnostics = Vec::new();
        if bin.is_none() {
            if !self.bins.iter().any(|b| b.covers_cb(cb)) {
                diagnostics.push(Diagnostic::out_of_range("block coefficient", cb));
            }
            if !self.bins.iter().any(|b| b.covers_froude(froude)) {
                diagnostics.push(Diagnostic::out_of_range("froude number", froude));
            }
            // Each input is covered on its own but the pair is not.
            if diagnostics.is_empty() {
                diagnostics.push(Diagnostic::out_of_range("froude number", froude));
            }
        }

        let coefficient = bin.map_or(0.0, |b| b.coefficient(slenderness));
        let force = coefficient * 0.5 * RHO_SEAWATER_KG_M3 * wetted_surface_m2 * v * v;

        ResistanceEstimate {
            speed_mps: v,
            froude,
            coefficient,
            force: newtons(force),
            bin,
            diagnostics,
        }
    }
}

/// `Fn = V/sqrt(g·L)` with V converted from knots.
pub fn froude_number(speed_kn: Real, length_m: Real) -> Real {
    (speed_kn / KNOTS_PER_MPS) / (G_MPS2 * length_m).sqrt()
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResistanceEstimate {
    pub speed_mps: Real,
    pub froude: Real,
    pub coefficient: Real,
    pub force: Force,
    /// Regression entry used, `None` when out of range
    pub bin: Option<ResistanceBin>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ResistanceEstimate {
    pub fn force_n(&self) -> Real {
        self.force.value
    }

    pub fn is_out_of_range(&self) -> bool {
        self.bin.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_core::Condition;

    #[test]
    fn reference_hull_at_cruise() {
        // L=30 m, S=400 m^2, Δ=650 t, Cb=0.45, 16 kn gives Fn ≈ 0.4798,
        // which selects the (0.4..0.5, 0.45..0.55) bin: a=55159, n=-4.61.
        let r = ResistanceTable::SERIES_64.resistance(30.0, 400.0, 650.0, 0.45, 16.0);
        assert!((r.froude - 0.479_765_032).abs() < 1e-8);
        let bin = r.bin.expect("in range");
        assert_eq!(bin.a, 55159.0);
        assert_eq!(bin.n, -4.61);
        assert!((r.coefficient - 0.179_720_488_8).abs() < 1e-9);
        assert!((r.force_n() - 2_498_172.3185).abs() < 1e-2);
        assert!(r.diagnostics.is_empty());
    }

    #[test]
    fn low_block_coefficient_is_flagged() {
        let r = ResistanceTable::SERIES_64.resistance(30.0, 400.0, 650.0, 0.25, 16.0);
        assert_eq!(r.coefficient, 0.0);
        assert_eq!(r.force_n(), 0.0);
        assert!(r.is_out_of_range());
        assert_eq!(r.diagnostics.len(), 1);
        assert_eq!(r.diagnostics[0].condition, Condition::OutOfValidatedRange);
        assert_eq!(r.diagnostics[0].what, "block coefficient");
    }

    #[test]
    fn upper_band_edge_is_exclusive() {
        let r = ResistanceTable::SERIES_64.resistance(30.0, 400.0, 650.0, 0.6, 16.0);
        assert!(r.is_out_of_range());
    }

    #[test]
    fn slow_speed_is_flagged() {
        // 5 kn on a 30 m hull is Fn ≈ 0.15
        let r = ResistanceTable::SERIES_64.resistance(30.0, 400.0, 650.0, 0.45, 5.0);
        assert!(r.is_out_of_range());
        assert_eq!(r.coefficient, 0.0);
        assert_eq!(r.diagnostics[0].what, "froude number");
    }

    #[test]
    fn both_inputs_out_of_range() {
        let r = ResistanceTable::SERIES_64.resistance(30.0, 400.0, 650.0, 0.9, 60.0);
        assert_eq!(r.diagnostics.len(), 2);
    }

    #[test]
    fn custom_table_lookup() {
        let bins = [ResistanceBin::new(0.0, 1.0, 0.0, 2.0, 1000.0, 0.0)];
        let table = ResistanceTable::new(&bins);
        let r = table.resistance(30.0, 100.0, 650.0, 0.5, 10.0);
        assert!((r.coefficient - 1.0).abs() < 1e-12);
    }

    #[test]
    fn every_series_64_bin_is_reachable() {
        let table = ResistanceTable::SERIES_64;
        for bin in table.bins() {
            let cb = 0.5 * (bin.cb_lo + bin.cb_hi);
            let froude = 0.5 * (bin.fn_lo + bin.fn_hi);
            assert_eq!(table.lookup(cb, froude), Some(bin));
        }
    }
}
