//! Mission failure probability.
//!
//! Each contribution is linear in its exposure: engine running hours, engine
//! starts and hours the flywheel bank carries the load alone.

use serde::{Deserialize, Serialize};
use sv_core::Real;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReliabilityConfig {
    /// Engine mean time between failures, h
    pub engine_mtbf_h: Real,
    /// Energy storage mean time between failures, h
    pub storage_mtbf_h: Real,
    pub failure_per_start: Real,
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            engine_mtbf_h: 10_000.0,
            storage_mtbf_h: 10_000.0,
            failure_per_start: 1e-4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReliabilityEstimate {
    pub run: Real,
    pub start: Real,
    pub storage: Real,
    /// Sum of the contributions, clamped to [0, 1]
    pub total: Real,
}

pub fn failure_probability(
    config: &ReliabilityConfig,
    eta_run: Real,
    n_starts: Real,
    mission_hours: Real,
) -> ReliabilityEstimate {
    let run = eta_run * mission_hours / config.engine_mtbf_h;
    let start = config.failure_per_start * n_starts;
    let storage = (1.0 - eta_run) * mission_hours / config.storage_mtbf_h;
    ReliabilityEstimate {
        run,
        start,
        storage,
        total: (run + start + storage).clamp(0.0, 1.0),
    }
}
