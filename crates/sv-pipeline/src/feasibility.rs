//! Feasibility verdict.

use crate::stage::Stage;
use serde::{Deserialize, Serialize};
use std::fmt;
use sv_core::{Real, relative_gap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeasibilityConfig {
    /// GM_T must exceed this, m
    pub min_gmt_m: Real,
    /// Accepted |Δ − W| as a fraction of W
    pub balance_tolerance: Real,
    /// Sprint over cruise brake power must stay below this
    pub max_sprint_cruise_ratio: Real,
    pub max_mcr_kw: Option<Real>,
    pub max_fuel_t: Option<Real>,
}

impl Default for FeasibilityConfig {
    fn default() -> Self {
        Self {
            min_gmt_m: 0.0,
            balance_tolerance: 0.1,
            max_sprint_cruise_ratio: 3.0,
            max_mcr_kw: None,
            max_fuel_t: None,
        }
    }
}

impl FeasibilityConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.min_gmt_m.is_finite() {
            return Err("min GMT must be finite");
        }
        if !(self.balance_tolerance > 0.0) {
            return Err("balance tolerance must be positive");
        }
        if !(self.max_sprint_cruise_ratio > 1.0) {
            return Err("sprint/cruise ratio bound must exceed 1");
        }
        if self.max_mcr_kw.is_some_and(|v| !(v > 0.0)) {
            return Err("MCR ceiling must be positive");
        }
        if self.max_fuel_t.is_some_and(|v| !(v > 0.0)) {
            return Err("fuel ceiling must be positive");
        }
        Ok(())
    }
}

/// Why a design was judged infeasible.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InfeasibilityReason {
    InvalidInput { what: String },
    DimensionResolutionFailed,
    OutOfValidatedRange { stage: Stage, what: String, value: Real },
    DegenerateGeometry { stage: Stage, what: String, value: Real },
    InvalidMissionProfile { detail: String },
    NegativeStability { gmt_m: Real },
    WeightImbalance { weight_t: Real, displacement_t: Real },
    PowerRatioExceeded { ratio: Real, limit: Real },
    McrExceeded { mcr_kw: Real, limit: Real },
    FuelExceeded { fuel_t: Real, limit: Real },
}

impl InfeasibilityReason {
    /// Stable short label, used for counting and flat output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::DimensionResolutionFailed => "dimension_resolution_failed",
            Self::OutOfValidatedRange { .. } => "out_of_validated_range",
            Self::DegenerateGeometry { .. } => "degenerate_geometry",
            Self::InvalidMissionProfile { .. } => "invalid_mission_profile",
            Self::NegativeStability { .. } => "negative_stability",
            Self::WeightImbalance { .. } => "weight_imbalance",
            Self::PowerRatioExceeded { .. } => "power_ratio_exceeded",
            Self::McrExceeded { .. } => "mcr_exceeded",
            Self::FuelExceeded { .. } => "fuel_exceeded",
        }
    }
}

impl fmt::Display for InfeasibilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { what } => write!(f, "invalid input: {what}"),
            Self::DimensionResolutionFailed => write!(f, "dimension resolution failed"),
            Self::OutOfValidatedRange { stage, what, value } => {
                write!(f, "{stage}: {what} = {value:.4} out of validated range")
            }
            Self::DegenerateGeometry { stage, what, value } => {
                write!(f, "{stage}: degenerate {what} = {value:.4}")
            }
            Self::InvalidMissionProfile { detail } => write!(f, "{detail}"),
            Self::NegativeStability { gmt_m } => write!(f, "GMT {gmt_m:.3} m not positive"),
            Self::WeightImbalance {
                weight_t,
                displacement_t,
            } => write!(
                f,
                "displacement {displacement_t:.1} t does not balance weight {weight_t:.1} t"
            ),
            Self::PowerRatioExceeded { ratio, limit } => {
                write!(f, "sprint/cruise power ratio {ratio:.2} exceeds {limit:.2}")
            }
            Self::McrExceeded { mcr_kw, limit } => {
                write!(f, "MCR {mcr_kw:.0} kW exceeds {limit:.0} kW")
            }
            Self::FuelExceeded { fuel_t, limit } => {
                write!(f, "fuel {fuel_t:.1} t exceeds {limit:.1} t")
            }
        }
    }
}

/// Outputs the verdict depends on.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FeasibilityInputs {
    pub gmt_m: Real,
    pub weight_t: Real,
    pub displacement_t: Real,
    pub sprint_cruise_ratio: Real,
    pub mcr_kw: Real,
    pub fuel_t: Real,
}

pub(crate) fn check(config: &FeasibilityConfig, x: &FeasibilityInputs) -> Vec<InfeasibilityReason> {
    let mut reasons = Vec::new();
    if !(x.gmt_m > config.min_gmt_m) {
        reasons.push(InfeasibilityReason::NegativeStability { gmt_m: x.gmt_m });
    }
    if !(relative_gap(x.displacement_t, x.weight_t, x.weight_t) <= config.balance_tolerance) {
        reasons.push(InfeasibilityReason::WeightImbalance {
            weight_t: x.weight_t,
            displacement_t: x.displacement_t,
        });
    }
    if !(x.sprint_cruise_ratio < config.max_sprint_cruise_ratio) {
        reasons.push(InfeasibilityReason::PowerRatioExceeded {
            ratio: x.sprint_cruise_ratio,
            limit: config.max_sprint_cruise_ratio,
        });
    }
    if let Some(limit) = config.max_mcr_kw.filter(|limit| x.mcr_kw > *limit) {
        reasons.push(InfeasibilityReason::McrExceeded {
            mcr_kw: x.mcr_kw,
            limit,
        });
    }
    if let Some(limit) = config.max_fuel_t.filter(|limit| x.fuel_t > *limit) {
        reasons.push(InfeasibilityReason::FuelExceeded {
            fuel_t: x.fuel_t,
            limit,
        });
    }
    reasons
}
