//! Flat case rows and study manifests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use sv_explore::{Case, DesignSpace, Exploration, SamplerConfig};
use sv_pipeline::{DesignInput, PipelineConfig};

/// Bumped whenever [`CaseRecord`] columns change.
pub const SCHEMA_VERSION: u32 = 1;

/// One CSV row: every design input followed by every evaluation output.
///
/// Outputs are empty when the stage producing them did not run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub index: usize,
    pub cb: f64,
    pub lb: Option<f64>,
    pub bt: Option<f64>,
    pub tl: Option<f64>,
    pub storage_mj: Option<f64>,
    pub length_m: Option<f64>,
    pub beam_m: Option<f64>,
    pub draft_m: Option<f64>,
    pub resolve_converged: Option<bool>,
    pub resolve_iterations: Option<usize>,
    pub wetted_surface_m2: Option<f64>,
    pub displacement_t: Option<f64>,
    pub weight_t: Option<f64>,
    pub excess_displacement_t: Option<f64>,
    pub fuel_t: Option<f64>,
    pub cruise_brake_kw: Option<f64>,
    pub sprint_brake_kw: Option<f64>,
    pub mcr_kw: Option<f64>,
    pub sprint_cruise_ratio: Option<f64>,
    pub eta_run: Option<f64>,
    pub n_starts: Option<f64>,
    pub gmt_m: Option<f64>,
    pub failure_probability: Option<f64>,
    pub feasible: bool,
    /// Reason kinds separated by `;`
    pub reasons: String,
}

impl CaseRecord {
    pub fn from_case(case: &Case) -> Self {
        let r = &case.result;
        let (lb, bt, tl) = match case.design.input {
            DesignInput::Ratios { lb, bt, tl } => (Some(lb), Some(bt), Some(tl)),
            DesignInput::Dimensions { .. } => (None, None, None),
        };
        Self {
            index: case.index,
            cb: case.design.cb,
            lb,
            bt,
            tl,
            storage_mj: case.design.storage_capacity_mj,
            length_m: r.length_m(),
            beam_m: r.beam_m(),
            draft_m: r.draft_m(),
            resolve_converged: r.resolution.as_ref().map(|s| s.converged),
            resolve_iterations: r.resolution.as_ref().map(|s| s.iterations),
            wetted_surface_m2: r.wetted_surface_m2(),
            displacement_t: r.displacement_t(),
            weight_t: r.weight_t(),
            excess_displacement_t: r.excess_displacement_t(),
            fuel_t: r.fuel_weight_t(),
            cruise_brake_kw: r.cruise.as_ref().map(|p| p.brake_kw),
            sprint_brake_kw: r.sprint.as_ref().map(|p| p.brake_kw),
            mcr_kw: r.mcr_kw(),
            sprint_cruise_ratio: r.sprint_cruise_ratio(),
            eta_run: r.eta_run(),
            n_starts: r.n_starts(),
            gmt_m: r.gmt_m(),
            failure_probability: r.failure_probability(),
            feasible: r.feasible,
            reasons: r
                .reasons
                .iter()
                .map(|reason| reason.kind())
                .collect::<Vec<_>>()
                .join(";"),
        }
    }

    pub fn reason_kinds(&self) -> impl Iterator<Item = &str> {
        self.reasons.split(';').filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyManifest {
    pub study_id: String,
    pub name: String,
    pub timestamp: String,
    pub schema_version: u32,
    pub sampler_name: String,
    pub batch_size: usize,
    pub max_cases: Option<usize>,
    pub evaluated: usize,
    pub feasible: usize,
    pub reason_counts: BTreeMap<String, usize>,
    pub elapsed_s: f64,
    pub config: PipelineConfig,
    pub space: DesignSpace,
    pub sampler: SamplerConfig,
}

impl StudyManifest {
    pub fn new(
        name: impl Into<String>,
        config: &PipelineConfig,
        space: &DesignSpace,
        sampler: &SamplerConfig,
        exploration: &Exploration,
    ) -> Self {
        Self {
            study_id: crate::compute_study_id(
                config,
                space,
                sampler,
                exploration.batch_size,
                exploration.max_cases,
            ),
            name: name.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            schema_version: SCHEMA_VERSION,
            sampler_name: exploration.sampler.clone(),
            batch_size: exploration.batch_size,
            max_cases: exploration.max_cases,
            evaluated: exploration.stats.evaluated,
            feasible: exploration.stats.feasible,
            reason_counts: exploration.stats.reason_counts.clone(),
            elapsed_s: exploration.stats.elapsed_s,
            config: config.clone(),
            space: space.clone(),
            sampler: sampler.clone(),
        }
    }
}
