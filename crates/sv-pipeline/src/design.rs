//! Design vector: the input to one evaluation.

use serde::{Deserialize, Serialize};
use sv_core::Real;
use sv_solver::DesignRatios;

/// Hull proportions, either as ratios to be resolved or as absolute dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DesignInput {
    Ratios { lb: Real, bt: Real, tl: Real },
    Dimensions { length_m: Real, beam_m: Real, draft_m: Real },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignVector {
    pub cb: Real,
    pub input: DesignInput,
    /// Flywheel storage capacity, MJ
    #[serde(default)]
    pub storage_capacity_mj: Option<Real>,
}

impl DesignVector {
    pub fn from_ratios(cb: Real, lb: Real, bt: Real, tl: Real) -> Self {
        Self {
            cb,
            input: DesignInput::Ratios { lb, bt, tl },
            storage_capacity_mj: None,
        }
    }

    pub fn from_dimensions(cb: Real, length_m: Real, beam_m: Real, draft_m: Real) -> Self {
        Self {
            cb,
            input: DesignInput::Dimensions {
                length_m,
                beam_m,
                draft_m,
            },
            storage_capacity_mj: None,
        }
    }

    pub fn with_storage(mut self, capacity_mj: Real) -> Self {
        self.storage_capacity_mj = Some(capacity_mj);
        self
    }

    pub fn ratios(&self) -> Option<DesignRatios> {
        match self.input {
            DesignInput::Ratios { lb, bt, tl } => Some(DesignRatios::new(lb, bt, tl)),
            DesignInput::Dimensions { .. } => None,
        }
    }

    /// Checks domain constraints; the message names the offending field.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.cb > 0.0 && self.cb < 1.0) {
            return Err(format!("block coefficient {} not in (0, 1)", self.cb));
        }
        let fields = match self.input {
            DesignInput::Ratios { lb, bt, tl } => [("L/B", lb), ("B/T", bt), ("T/L", tl)],
            DesignInput::Dimensions {
                length_m,
                beam_m,
                draft_m,
            } => [("length", length_m), ("beam", beam_m), ("draft", draft_m)],
        };
        for (what, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{what} {value} must be positive and finite"));
            }
        }
        if let Some(cap) = self
            .storage_capacity_mj
            .filter(|cap| !(cap.is_finite() && *cap >= 0.0))
        {
            return Err(format!("storage capacity {cap} must be non-negative"));
        }
        Ok(())
    }
}
