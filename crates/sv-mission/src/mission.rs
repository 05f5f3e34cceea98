//! Mission profile integration: fuel, MCR and engine duty.
//!
//! The mission is split into four legs. Sprint and in-port comms legs run a
//! fixed number of hours per day, the cruise leg covers the mission range at
//! cruise speed and loiter takes whatever is left. Each leg adds a hotel load
//! on top of the propulsion brake power.
//!
//! With flywheel storage the engine cycles during loiter: it charges the bank
//! from the cruise power surplus, then shuts down while the bank carries the
//! loiter load. The engine duty fraction `eta_run` and number of starts follow
//! from the charge and discharge times.

use crate::error::{MissionError, MissionResult};
use crate::powering::{PoweringModel, PoweringResult};
use serde::{Deserialize, Serialize};
use sv_core::constants::{HOURS_PER_DAY, SECONDS_PER_HOUR};
use sv_core::{Real, ensure_positive};
use sv_curves::storage_mass;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionProfile {
    pub range_nm: Real,
    pub duration_days: Real,
    pub cruise_speed_kn: Real,
    pub sprint_speed_kn: Real,
    pub sprint_hours_per_day: Real,
    pub comms_hours_per_day: Real,
    /// Hotel load while loitering with the engine off
    pub sleep_power_kw: Real,
    /// Hotel load during sprint and cruise
    pub normal_power_kw: Real,
    /// Hotel load during comms
    pub max_power_kw: Real,
    /// Specific fuel consumption, t/kWh
    pub sfc_t_per_kwh: Real,
}

impl Default for MissionProfile {
    fn default() -> Self {
        Self {
            range_nm: 4500.0,
            duration_days: 60.0,
            cruise_speed_kn: 16.0,
            sprint_speed_kn: 27.0,
            sprint_hours_per_day: 1.0,
            comms_hours_per_day: 2.0,
            sleep_power_kw: 50.0,
            normal_power_kw: 300.0,
            max_power_kw: 500.0,
            sfc_t_per_kwh: 0.000196,
        }
    }
}

/// Hours spent in each leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MissionLegs {
    pub total_h: Real,
    pub sprint_h: Real,
    pub comms_h: Real,
    pub cruise_h: Real,
    pub loiter_h: Real,
}

impl MissionProfile {
    pub fn total_hours(&self) -> Real {
        self.duration_days * HOURS_PER_DAY
    }

    /// Partitions the mission into legs; loiter must not go negative.
    pub fn legs(&self) -> MissionResult<MissionLegs> {
        let total_h = self.total_hours();
        let sprint_h = self.duration_days * self.sprint_hours_per_day;
        let comms_h = self.duration_days * self.comms_hours_per_day;
        let cruise_h = self.range_nm / self.cruise_speed_kn;
        let loiter_h = total_h - (sprint_h + comms_h + cruise_h);
        if loiter_h < 0.0 {
            return Err(MissionError::InvalidMissionProfile {
                loiter_hours: loiter_h,
            });
        }
        Ok(MissionLegs {
            total_h,
            sprint_h,
            comms_h,
            cruise_h,
            loiter_h,
        })
    }

    pub fn validate(&self) -> MissionResult<()> {
        ensure_positive(self.range_nm, "range")?;
        ensure_positive(self.duration_days, "duration")?;
        ensure_positive(self.cruise_speed_kn, "cruise speed")?;
        ensure_positive(self.sprint_speed_kn, "sprint speed")?;
        ensure_positive(self.sfc_t_per_kwh, "specific fuel consumption")?;
        let non_negative = [
            (self.sprint_hours_per_day, "sprint hours per day"),
            (self.comms_hours_per_day, "comms hours per day"),
            (self.sleep_power_kw, "sleep power"),
            (self.normal_power_kw, "normal power"),
            (self.max_power_kw, "max power"),
        ];
        for (value, what) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(MissionError::InvalidArg { what });
            }
        }
        self.legs()?;
        Ok(())
    }

    /// Integrates fuel over the mission for the given propulsion brake powers.
    ///
    /// `storage_capacity_mj` of `None` or `Some(0.0)` gives the engine running
    /// through loiter at sleep power.
    pub fn fuel(
        &self,
        cruise_brake_kw: Real,
        sprint_brake_kw: Real,
        storage_capacity_mj: Option<Real>,
    ) -> MissionResult<MissionFuel> {
        let legs = self.legs()?;
        let capacity_mj = storage_capacity_mj.unwrap_or(0.0);
        if !(capacity_mj.is_finite() && capacity_mj >= 0.0) {
            return Err(MissionError::InvalidArg {
                what: "storage capacity",
            });
        }

        let sprint_kw = sprint_brake_kw + self.normal_power_kw;
        let comms_kw = cruise_brake_kw + self.max_power_kw;
        let cruise_kw = cruise_brake_kw + self.normal_power_kw;
        let loiter_kw = self.sleep_power_kw;
        let mcr_kw = sprint_kw.max(comms_kw).max(cruise_kw).max(loiter_kw);

        let (charge_s, discharge_s, eta_run, n_starts) = if capacity_mj > 0.0 {
            let surplus_kw = cruise_kw - loiter_kw;
            if surplus_kw <= 0.0 || loiter_kw <= 0.0 {
                return Err(MissionError::StorageCannotCharge { surplus_kw });
            }
            // MJ -> kJ over kW gives seconds
            let charge_s = capacity_mj * 1000.0 / surplus_kw;
            let discharge_s = capacity_mj * 1000.0 / loiter_kw;
            let cycle_s = charge_s + discharge_s;
            let loiter_s = legs.loiter_h * SECONDS_PER_HOUR;
            (charge_s, discharge_s, charge_s / cycle_s, loiter_s / cycle_s)
        } else {
            (0.0, 0.0, 1.0, 0.0)
        };

        let sfc = self.sfc_t_per_kwh;
        let sprint_fuel_t = sfc * sprint_kw * legs.sprint_h;
        let comms_fuel_t = sfc * comms_kw * legs.comms_h;
        let cruise_fuel_t = sfc * cruise_kw * legs.cruise_h;
        let loiter_fuel_t = sfc * loiter_kw * (legs.loiter_h * eta_run);
        let storage_mass_t = storage_mass(capacity_mj);
        let fuel_t =
            sprint_fuel_t + comms_fuel_t + cruise_fuel_t + loiter_fuel_t + storage_mass_t;

        debug!(
            fuel_t,
            mcr_kw, eta_run, n_starts, loiter_h = legs.loiter_h, "mission fuel"
        );

        Ok(MissionFuel {
            legs,
            sprint_kw,
            comms_kw,
            cruise_kw,
            loiter_kw,
            sprint_fuel_t,
            comms_fuel_t,
            cruise_fuel_t,
            loiter_fuel_t,
            storage_capacity_mj: capacity_mj,
            storage_mass_t,
            charge_s,
            discharge_s,
            fuel_t,
            mcr_kw,
            eta_run,
            n_starts,
            sprint_cruise_ratio: sprint_brake_kw / cruise_brake_kw,
        })
    }
}

/// Fuel and engine duty over one mission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionFuel {
    pub legs: MissionLegs,
    /// Total leg power including hotel load, kW
    pub sprint_kw: Real,
    pub comms_kw: Real,
    pub cruise_kw: Real,
    pub loiter_kw: Real,
    pub sprint_fuel_t: Real,
    pub comms_fuel_t: Real,
    pub cruise_fuel_t: Real,
    pub loiter_fuel_t: Real,
    pub storage_capacity_mj: Real,
    pub storage_mass_t: Real,
    pub charge_s: Real,
    pub discharge_s: Real,
    /// Fuel burned plus storage mass, t
    pub fuel_t: Real,
    pub mcr_kw: Real,
    pub eta_run: Real,
    pub n_starts: Real,
    /// Sprint over cruise propulsion brake power; infinite when cruise is zero
    pub sprint_cruise_ratio: Real,
}

impl MissionFuel {
    pub fn burned_t(&self) -> Real {
        self.fuel_t - self.storage_mass_t
    }
}

/// Powering at both mission speeds plus the fuel integration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionEstimate {
    pub cruise: PoweringResult,
    pub sprint: PoweringResult,
    pub fuel: MissionFuel,
}

/// Evaluates a mission for a hull directly from its particulars.
#[derive(Debug, Clone, Default)]
pub struct MissionEstimator<'a> {
    pub powering: PoweringModel<'a>,
    pub profile: MissionProfile,
}

impl<'a> MissionEstimator<'a> {
    pub fn new(powering: PoweringModel<'a>, profile: MissionProfile) -> Self {
        Self { powering, profile }
    }

    pub fn estimate(
        &self,
        length_m: Real,
        wetted_surface_m2: Real,
        displacement_t: Real,
        cb: Real,
        storage_capacity_mj: Option<Real>,
    ) -> MissionResult<MissionEstimate> {
        let cruise = self.powering.brake_power(
            length_m,
            wetted_surface_m2,
            displacement_t,
            cb,
            self.profile.cruise_speed_kn,
        );
        let sprint = self.powering.brake_power(
            length_m,
            wetted_surface_m2,
            displacement_t,
            cb,
            self.profile.sprint_speed_kn,
        );
        let fuel = self
            .profile
            .fuel(cruise.brake_kw, sprint.brake_kw, storage_capacity_mj)?;
        Ok(MissionEstimate {
            cruise,
            sprint,
            fuel,
        })
    }
}
