//! Pipeline configuration.
//!
//! Every constant the evaluation depends on lives here so alternate missions
//! or efficiency assumptions can be substituted from a file. All sections
//! default to the reference patrol craft mission.

use crate::error::{PipelineError, PipelineResult};
use crate::feasibility::FeasibilityConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use sv_curves::{GrubisicWeights, ParsonsWeights, WeightCurve};
use sv_mission::{EfficiencyConfig, MissionProfile, ReliabilityConfig};
use sv_solver::ResolverConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightCurveKind {
    #[default]
    Grubisic,
    Parsons,
}

impl WeightCurveKind {
    pub fn build(self) -> Arc<dyn WeightCurve> {
        match self {
            WeightCurveKind::Grubisic => Arc::new(GrubisicWeights::default()),
            WeightCurveKind::Parsons => Arc::new(ParsonsWeights::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub weight_curve: WeightCurveKind,
    pub efficiency: EfficiencyConfig,
    pub mission: MissionProfile,
    pub reliability: ReliabilityConfig,
    pub resolver: ResolverConfig,
    pub feasibility: FeasibilityConfig,
}

impl PipelineConfig {
    pub fn validate(&self) -> PipelineResult<()> {
        self.efficiency
            .validate()
            .map_err(|what| PipelineError::InvalidConfig {
                what: format!("efficiency: {what} must be positive"),
            })?;
        self.mission.validate()?;
        self.resolver.validate()?;

        let r = &self.reliability;
        if !(r.engine_mtbf_h > 0.0 && r.storage_mtbf_h > 0.0) {
            return Err(PipelineError::InvalidConfig {
                what: "reliability: MTBF must be positive".to_string(),
            });
        }
        if !(r.failure_per_start >= 0.0 && r.failure_per_start <= 1.0) {
            return Err(PipelineError::InvalidConfig {
                what: "reliability: failure per start must be in [0, 1]".to_string(),
            });
        }

        self.feasibility
            .validate()
            .map_err(|what| PipelineError::InvalidConfig {
                what: format!("feasibility: {what}"),
            })
    }

    pub fn from_yaml_str(content: &str) -> PipelineResult<Self> {
        let config: PipelineConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

pub fn load_yaml(path: &Path) -> PipelineResult<PipelineConfig> {
    let content = std::fs::read_to_string(path)?;
    PipelineConfig::from_yaml_str(&content)
}

pub fn save_yaml(path: &Path, config: &PipelineConfig) -> PipelineResult<()> {
    config.validate()?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> PipelineResult<PipelineConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: PipelineConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Loads by extension: `.json` as JSON, anything else as YAML.
pub fn load(path: &Path) -> PipelineResult<PipelineConfig> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}
