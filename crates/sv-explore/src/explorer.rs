//! Batch evaluation of sampled designs.

use crate::error::{ExploreError, ExploreResult};
use crate::sampler::DesignSampler;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;
use sv_pipeline::{DesignVector, EvaluatedDesign, Pipeline};
use tracing::{debug, info, warn};

/// One evaluated candidate, numbered in proposal order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Case {
    pub index: usize,
    pub design: DesignVector,
    pub result: EvaluatedDesign,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExplorationStats {
    pub evaluated: usize,
    pub feasible: usize,
    /// Number of cases carrying each infeasibility reason kind
    pub reason_counts: BTreeMap<String, usize>,
    pub elapsed_s: f64,
}

impl ExplorationStats {
    fn record(&mut self, result: &EvaluatedDesign) {
        self.evaluated += 1;
        if result.feasible {
            self.feasible += 1;
        }
        let mut kinds: Vec<&'static str> = result.reasons.iter().map(|r| r.kind()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        for kind in kinds {
            *self.reason_counts.entry(kind.to_string()).or_default() += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exploration {
    pub sampler: String,
    pub batch_size: usize,
    pub max_cases: Option<usize>,
    pub cases: Vec<Case>,
    pub stats: ExplorationStats,
}

impl Exploration {
    pub fn feasible(&self) -> impl Iterator<Item = &Case> {
        self.cases.iter().filter(|c| c.result.feasible)
    }
}

/// Drives a sampler through the pipeline.
#[derive(Debug, Clone)]
pub struct Explorer {
    pipeline: Pipeline,
    batch_size: usize,
}

impl Explorer {
    pub const DEFAULT_BATCH_SIZE: usize = 64;

    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            batch_size: Self::DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> ExploreResult<Self> {
        if batch_size == 0 {
            return Err(ExploreError::InvalidSetting {
                what: "batch size must be at least 1",
            });
        }
        self.batch_size = batch_size;
        Ok(self)
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Evaluates candidates until the sampler is exhausted or `max_cases`
    /// designs have been evaluated.
    ///
    /// Each batch is evaluated in parallel; results are handed back to the
    /// sampler in proposal order, so a seeded sampler gives the same cases
    /// regardless of thread count.
    pub fn run(&self, sampler: &mut dyn DesignSampler, max_cases: Option<usize>) -> Exploration {
        let started = Instant::now();
        let limit = max_cases.unwrap_or(usize::MAX);
        info!(
            sampler = sampler.name(),
            batch_size = self.batch_size,
            ?max_cases,
            "exploration started"
        );

        let mut cases: Vec<Case> = Vec::new();
        let mut stats = ExplorationStats::default();
        let mut exhausted = false;

        while cases.len() < limit && !exhausted {
            let want = self.batch_size.min(limit - cases.len());
            let mut batch = Vec::with_capacity(want);
            while batch.len() < want {
                match sampler.next_candidate() {
                    Some(design) => batch.push(design),
                    None => {
                        exhausted = true;
                        break;
                    }
                }
            }
            if batch.is_empty() {
                break;
            }

            let results: Vec<EvaluatedDesign> = batch
                .par_iter()
                .map(|design| self.pipeline.evaluate(design))
                .collect();

            let batch_feasible = results.iter().filter(|r| r.feasible).count();
            debug!(
                first = cases.len(),
                size = batch.len(),
                feasible = batch_feasible,
                "batch evaluated"
            );

            for (design, result) in batch.into_iter().zip(results) {
                sampler.observe(&design, &result);
                stats.record(&result);
                if !result.feasible {
                    debug!(
                        index = cases.len(),
                        reasons = ?result.reasons.iter().map(|r| r.kind()).collect::<Vec<_>>(),
                        "infeasible design"
                    );
                }
                cases.push(Case {
                    index: cases.len(),
                    design,
                    result,
                });
            }
        }

        if exhausted && max_cases.is_some_and(|m| cases.len() < m) {
            warn!(
                sampler = sampler.name(),
                evaluated = cases.len(),
                requested = limit,
                "sampler exhausted before requested case count"
            );
        }
        if stats.evaluated > 0 && stats.feasible == 0 {
            warn!(
                evaluated = stats.evaluated,
                reasons = ?stats.reason_counts,
                "no feasible design found"
            );
        }

        stats.elapsed_s = started.elapsed().as_secs_f64();
        info!(
            evaluated = stats.evaluated,
            feasible = stats.feasible,
            elapsed_s = stats.elapsed_s,
            "exploration finished"
        );

        Exploration {
            sampler: sampler.name().to_string(),
            batch_size: self.batch_size,
            max_cases,
            cases,
            stats,
        }
    }
}
