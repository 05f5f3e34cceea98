//! Study files: everything `sv-cli explore` needs in one YAML document.

use crate::error::CliResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use sv_explore::{DesignSpace, Explorer, Objective, SamplerConfig};
use sv_pipeline::PipelineConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    pub name: String,
    pub pipeline: PipelineConfig,
    pub space: DesignSpace,
    pub sampler: SamplerConfig,
    pub batch_size: usize,
    pub max_cases: Option<usize>,
    /// Relative paths are taken from the study file's directory
    pub output_dir: PathBuf,
    /// Objectives for the Pareto summary
    pub objectives: Vec<Objective>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            name: "study".to_string(),
            pipeline: PipelineConfig::default(),
            space: DesignSpace::ratio_space(),
            sampler: SamplerConfig::default(),
            batch_size: Explorer::DEFAULT_BATCH_SIZE,
            max_cases: None,
            output_dir: PathBuf::from("studies"),
            objectives: vec![Objective::Fuel, Objective::Displacement],
        }
    }
}

impl StudyConfig {
    pub fn from_yaml_str(content: &str) -> CliResult<Self> {
        let study: StudyConfig = serde_yaml::from_str(content)?;
        study.pipeline.validate()?;
        study.space.validate()?;
        Ok(study)
    }

    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut study = Self::from_yaml_str(&content)?;
        if study.output_dir.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            study.output_dir = base.join(&study.output_dir);
        }
        Ok(study)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_explore::SpaceKind;

    #[test]
    fn demo_study_parses() {
        let study =
            StudyConfig::from_yaml_str(include_str!("../../../demos/ratio_study.yaml")).unwrap();
        assert_eq!(study.name, "ratio-lhs");
        assert_eq!(study.space.kind, SpaceKind::Ratios);
        assert_eq!(
            study.sampler,
            SamplerConfig::LatinHypercube {
                samples: 200,
                seed: 7
            }
        );
        assert_eq!(study.objectives, [Objective::Fuel, Objective::Gmt]);
    }

    #[test]
    fn empty_study_uses_defaults() {
        let study = StudyConfig::from_yaml_str("{}").unwrap();
        assert_eq!(study, StudyConfig::default());
    }

    #[test]
    fn invalid_space_is_rejected() {
        let yaml = "space:\n  kind: ratios\n  variables:\n    - { name: cb, lower: 0.3, upper: 0.5 }\n";
        assert!(StudyConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn output_dir_is_relative_to_study_file() {
        let dir = std::env::temp_dir().join("sv_cli_study_load");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("study.yaml");
        std::fs::write(&path, "output_dir: out\n").unwrap();

        let study = StudyConfig::load(&path).unwrap();
        assert_eq!(study.output_dir, dir.join("out"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
