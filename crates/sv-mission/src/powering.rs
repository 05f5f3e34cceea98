//! Brake power at speed from the resistance regression.

use serde::{Deserialize, Serialize};
use sv_core::{Diagnostic, Real};
use sv_curves::{ResistanceEstimate, ResistanceTable};
use tracing::debug;

/// Propulsive efficiency chain from effective to brake power.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EfficiencyConfig {
    /// Hull efficiency
    pub hull: Real,
    /// Propeller relative rotative efficiency
    pub rotative: Real,
    /// Propeller open water efficiency
    pub open_water: Real,
    /// Stern tube, bearing and gear efficiency, machinery aft
    pub transmission: Real,
    /// Fraction of MCR at which the brake power is rated
    pub mcr_margin: Real,
}

impl Default for EfficiencyConfig {
    fn default() -> Self {
        Self {
            hull: 1.2,
            rotative: 0.97,
            open_water: 0.55,
            transmission: 0.98,
            mcr_margin: 0.85,
        }
    }
}

impl EfficiencyConfig {
    /// Quasi-propulsive coefficient `ηH·ηR·ηO`.
    pub fn quasi_propulsive(&self) -> Real {
        self.hull * self.rotative * self.open_water
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        let fields = [
            (self.hull, "hull efficiency"),
            (self.rotative, "rotative efficiency"),
            (self.open_water, "open water efficiency"),
            (self.transmission, "transmission efficiency"),
            (self.mcr_margin, "MCR margin"),
        ];
        for (value, what) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(what);
            }
        }
        Ok(())
    }
}

/// Powering at one speed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoweringResult {
    pub speed_kn: Real,
    pub froude: Real,
    pub resistance_n: Real,
    pub effective_kw: Real,
    pub delivered_kw: Real,
    pub brake_kw: Real,
    pub diagnostics: Vec<Diagnostic>,
}

impl PoweringResult {
    fn from_resistance(speed_kn: Real, r: ResistanceEstimate, eff: &EfficiencyConfig) -> Self {
        let effective_kw = r.force_n() * r.speed_mps / 1000.0;
        let delivered_kw = effective_kw / eff.quasi_propulsive();
        let brake_kw = (delivered_kw / eff.transmission) * eff.mcr_margin;
        Self {
            speed_kn,
            froude: r.froude,
            resistance_n: r.force_n(),
            effective_kw,
            delivered_kw,
            brake_kw,
            diagnostics: r.diagnostics,
        }
    }

    pub fn is_out_of_range(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Resistance table plus efficiency chain.
#[derive(Debug, Clone)]
pub struct PoweringModel<'a> {
    table: ResistanceTable<'a>,
    efficiency: EfficiencyConfig,
}

impl Default for PoweringModel<'static> {
    fn default() -> Self {
        Self::new(ResistanceTable::SERIES_64, EfficiencyConfig::default())
    }
}

impl<'a> PoweringModel<'a> {
    pub fn new(table: ResistanceTable<'a>, efficiency: EfficiencyConfig) -> Self {
        Self { table, efficiency }
    }

    pub fn efficiency(&self) -> &EfficiencyConfig {
        &self.efficiency
    }

    pub fn brake_power(
        &self,
        length_m: Real,
        wetted_surface_m2: Real,
        displacement_t: Real,
        cb: Real,
        speed_kn: Real,
    ) -> PoweringResult {
        let r = self
            .table
            .resistance(length_m, wetted_surface_m2, displacement_t, cb, speed_kn);
        let result = PoweringResult::from_resistance(speed_kn, r, &self.efficiency);
        for d in &result.diagnostics {
            debug!(speed_kn, "resistance regression: {d}");
        }
        result
    }
}

/// Brake power with the Series 64 table and default efficiencies.
pub fn brake_power(
    length_m: Real,
    wetted_surface_m2: Real,
    displacement_t: Real,
    cb: Real,
    speed_kn: Real,
) -> PoweringResult {
    PoweringModel::default().brake_power(length_m, wetted_surface_m2, displacement_t, cb, speed_kn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_hull_cruise_and_sprint() {
        // Cb 0.45, L 40, B 8, T 2.5
        let s = 327.213_63;
        let disp = 369.36;
        let cruise = brake_power(40.0, s, disp, 0.45, 16.0);
        let sprint = brake_power(40.0, s, disp, 0.45, 27.0);
        assert!(!cruise.is_out_of_range());
        assert!((cruise.froude - 0.4155).abs() < 1e-3);
        assert!((cruise.brake_kw - 2383.07).abs() < 0.05);
        assert!((sprint.froude - 0.7011).abs() < 1e-3);
        assert!((sprint.brake_kw - 8229.06).abs() < 0.05);
    }

    #[test]
    fn efficiency_chain_is_consistent() {
        let p = brake_power(30.0, 400.0, 650.0, 0.45, 16.0);
        let eff = EfficiencyConfig::default();
        let expected_pe = p.resistance_n * (16.0 / 1.944) / 1000.0;
        assert!((p.effective_kw - expected_pe).abs() < 1e-9);
        assert!((p.delivered_kw * eff.quasi_propulsive() - p.effective_kw).abs() < 1e-9);
        assert!((p.brake_kw - p.delivered_kw / 0.98 * 0.85).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_speed_yields_flagged_zero() {
        let p = brake_power(40.0, 327.0, 369.0, 0.45, 5.0);
        assert_eq!(p.brake_kw, 0.0);
        assert!(p.is_out_of_range());
    }

    #[test]
    fn custom_efficiencies_scale_power() {
        let eff = EfficiencyConfig {
            open_water: 0.65,
            ..EfficiencyConfig::default()
        };
        let model = PoweringModel::new(ResistanceTable::SERIES_64, eff);
        let better = model.brake_power(40.0, 327.0, 369.0, 0.45, 16.0);
        let base = brake_power(40.0, 327.0, 369.0, 0.45, 16.0);
        assert!((better.brake_kw * 0.65 - base.brake_kw * 0.55).abs() < 1e-6);
    }

    #[test]
    fn validate_rejects_zero_efficiency() {
        let eff = EfficiencyConfig {
            hull: 0.0,
            ..EfficiencyConfig::default()
        };
        assert_eq!(eff.validate(), Err("hull efficiency"));
        assert!(EfficiencyConfig::default().validate().is_ok());
    }
}
