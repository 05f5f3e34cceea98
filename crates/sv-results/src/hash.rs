//! Content-based hashing for study ids.

use sha2::{Digest, Sha256};
use sv_explore::{DesignSpace, SamplerConfig};
use sv_pipeline::PipelineConfig;

/// Same configuration, space, sampler and run limits give the same id.
///
/// Batch size is part of the id since feedback-driven samplers propose
/// differently when results come back in larger batches.
pub fn compute_study_id(
    config: &PipelineConfig,
    space: &DesignSpace,
    sampler: &SamplerConfig,
    batch_size: usize,
    max_cases: Option<usize>,
) -> String {
    let mut hasher = Sha256::new();

    let config_json = serde_json::to_string(config).unwrap_or_default();
    hasher.update(config_json.as_bytes());

    let space_json = serde_json::to_string(space).unwrap_or_default();
    hasher.update(space_json.as_bytes());

    let sampler_json = serde_json::to_string(sampler).unwrap_or_default();
    hasher.update(sampler_json.as_bytes());

    let limits_json = serde_json::to_string(&(batch_size, max_cases)).unwrap_or_default();
    hasher.update(limits_json.as_bytes());

    hasher.update(crate::SCHEMA_VERSION.to_le_bytes());

    format!("{:x}", hasher.finalize())
}
