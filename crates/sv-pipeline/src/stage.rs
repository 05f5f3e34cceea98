//! Evaluation stages and progress events.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ResolveDimensions,
    HullForm,
    Powering,
    MissionFuel,
    Weight,
    Stability,
    Reliability,
    Feasibility,
}

impl Stage {
    /// All stages in a valid execution order.
    pub const ORDER: [Stage; 8] = [
        Stage::ResolveDimensions,
        Stage::HullForm,
        Stage::Powering,
        Stage::MissionFuel,
        Stage::Weight,
        Stage::Stability,
        Stage::Reliability,
        Stage::Feasibility,
    ];

    /// Stages whose outputs this stage consumes.
    pub fn prerequisites(self) -> &'static [Stage] {
        match self {
            Stage::ResolveDimensions => &[],
            Stage::HullForm => &[Stage::ResolveDimensions],
            Stage::Powering => &[Stage::HullForm],
            Stage::MissionFuel => &[Stage::Powering],
            Stage::Weight => &[Stage::HullForm, Stage::MissionFuel],
            Stage::Stability => &[Stage::HullForm],
            Stage::Reliability => &[Stage::MissionFuel],
            Stage::Feasibility => &[
                Stage::Powering,
                Stage::MissionFuel,
                Stage::Weight,
                Stage::Stability,
                Stage::Reliability,
            ],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::ResolveDimensions => "resolve dimensions",
            Stage::HullForm => "hull form",
            Stage::Powering => "powering",
            Stage::MissionFuel => "mission fuel",
            Stage::Weight => "weight",
            Stage::Stability => "stability",
            Stage::Reliability => "reliability",
            Stage::Feasibility => "feasibility",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Completed,
    /// Completed with diagnostics attached
    Flagged,
    /// Not needed for this design, e.g. resolution of absolute dimensions
    Skipped,
    /// Stopped the evaluation
    Failed,
}

#[derive(Debug, Clone)]
pub struct StageEvent {
    pub stage: Stage,
    pub outcome: StageOutcome,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}
