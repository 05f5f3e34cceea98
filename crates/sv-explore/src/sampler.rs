//! Candidate generators.
//!
//! Every sampler works in the unit hypercube and maps points onto the
//! [`DesignSpace`] bounds, so the same sampler serves ratio and dimension
//! spaces alike.

use crate::error::{ExploreError, ExploreResult};
use crate::rank::Objective;
use crate::space::DesignSpace;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use sv_core::Real;
use sv_pipeline::{DesignVector, EvaluatedDesign};
use tracing::{debug, warn};

/// Source of design vectors for the explorer.
///
/// Optimizers can use [`observe`](DesignSampler::observe) to steer later
/// candidates; it is called once per evaluated candidate, in proposal order.
pub trait DesignSampler: Send {
    fn name(&self) -> &str;

    /// Next candidate, or `None` once the sampler is exhausted.
    fn next_candidate(&mut self) -> Option<DesignVector>;

    fn observe(&mut self, _design: &DesignVector, _result: &EvaluatedDesign) {}

    /// Number of candidates still to come, when known.
    fn remaining(&self) -> Option<usize> {
        None
    }
}

/// Maps `values` onto a design; a failure ends the sampler with a warning.
fn candidate(space: &DesignSpace, sampler: &str, values: &[Real]) -> Option<DesignVector> {
    match space.design_at(values) {
        Ok(design) => Some(design),
        Err(e) => {
            warn!(
                sampler,
                error = %e,
                "candidate rejected by design space, sampler stopped"
            );
            None
        }
    }
}

/// Independent uniform draws over the space.
pub struct UniformSampler {
    space: DesignSpace,
    rng: ChaCha8Rng,
    remaining: usize,
}

impl UniformSampler {
    pub fn new(space: DesignSpace, samples: usize, seed: u64) -> ExploreResult<Self> {
        space.validate()?;
        Ok(Self {
            space,
            rng: ChaCha8Rng::seed_from_u64(seed),
            remaining: samples,
        })
    }
}

impl DesignSampler for UniformSampler {
    fn name(&self) -> &str {
        "uniform"
    }

    fn next_candidate(&mut self) -> Option<DesignVector> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let unit: Vec<Real> = (0..self.space.dimensions())
            .map(|_| self.rng.random::<Real>())
            .collect();
        candidate(&self.space, self.name(), &self.space.scale(&unit))
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

/// Latin hypercube: each axis is cut into `samples` strata and every stratum
/// is hit exactly once.
pub struct LatinHypercubeSampler {
    space: DesignSpace,
    points: Vec<Vec<Real>>,
    next: usize,
}

impl LatinHypercubeSampler {
    pub fn new(space: DesignSpace, samples: usize, seed: u64) -> ExploreResult<Self> {
        space.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let n = samples as Real;
        let mut points = vec![Vec::with_capacity(space.dimensions()); samples];
        for _ in 0..space.dimensions() {
            let mut strata: Vec<usize> = (0..samples).collect();
            strata.shuffle(&mut rng);
            for (point, stratum) in points.iter_mut().zip(strata) {
                let offset: Real = rng.random();
                point.push((stratum as Real + offset) / n);
            }
        }
        Ok(Self {
            space,
            points,
            next: 0,
        })
    }
}

impl DesignSampler for LatinHypercubeSampler {
    fn name(&self) -> &str {
        "latin_hypercube"
    }

    fn next_candidate(&mut self) -> Option<DesignVector> {
        let unit = self.points.get(self.next)?;
        self.next += 1;
        candidate(&self.space, self.name(), &self.space.scale(unit))
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.points.len() - self.next)
    }
}

/// Full factorial grid with `levels` evenly spaced values per variable.
pub struct GridSampler {
    space: DesignSpace,
    axes: Vec<Vec<Real>>,
    counter: Vec<usize>,
    done: bool,
}

impl GridSampler {
    pub fn new(space: DesignSpace, levels: usize) -> ExploreResult<Self> {
        space.validate()?;
        if levels == 0 {
            return Err(ExploreError::InvalidSampler {
                what: "grid needs at least one level per variable".to_string(),
            });
        }
        let axes: Vec<Vec<Real>> = space
            .variables
            .iter()
            .map(|v| linear_levels(v.lower, v.upper, levels))
            .collect();
        let done = axes.is_empty();
        Ok(Self {
            counter: vec![0; axes.len()],
            space,
            axes,
            done,
        })
    }

    pub fn total(&self) -> usize {
        self.axes.iter().map(Vec::len).product()
    }

    fn advance(&mut self) {
        for axis in (0..self.axes.len()).rev() {
            self.counter[axis] += 1;
            if self.counter[axis] < self.axes[axis].len() {
                return;
            }
            self.counter[axis] = 0;
        }
        self.done = true;
    }
}

impl DesignSampler for GridSampler {
    fn name(&self) -> &str {
        "grid"
    }

    fn next_candidate(&mut self) -> Option<DesignVector> {
        if self.done {
            return None;
        }
        let values: Vec<Real> = self
            .counter
            .iter()
            .zip(&self.axes)
            .map(|(&i, axis)| axis[i])
            .collect();
        self.advance();
        candidate(&self.space, self.name(), &values)
    }
}

/// Random local search driven by evaluation feedback.
///
/// Draws uniformly until a feasible design is observed, then perturbs the
/// best feasible design so far by up to `step` of each variable's range.
/// Relies on [`observe`](DesignSampler::observe) arriving in proposal order.
pub struct LocalSearchSampler {
    space: DesignSpace,
    rng: ChaCha8Rng,
    remaining: usize,
    objective: Objective,
    step: Real,
    /// Unit-cube points proposed but not yet observed
    pending: VecDeque<Vec<Real>>,
    best: Option<(Real, Vec<Real>)>,
}

impl LocalSearchSampler {
    pub fn new(
        space: DesignSpace,
        samples: usize,
        seed: u64,
        objective: Objective,
        step: Real,
    ) -> ExploreResult<Self> {
        space.validate()?;
        if !(step > 0.0 && step <= 1.0) {
            return Err(ExploreError::InvalidSampler {
                what: format!("local search step must be in (0, 1], got {step}"),
            });
        }
        Ok(Self {
            space,
            rng: ChaCha8Rng::seed_from_u64(seed),
            remaining: samples,
            objective,
            step,
            pending: VecDeque::new(),
            best: None,
        })
    }

    /// Score of the current search centre, smaller is better.
    pub fn best_score(&self) -> Option<Real> {
        self.best.as_ref().map(|(score, _)| *score)
    }
}

impl DesignSampler for LocalSearchSampler {
    fn name(&self) -> &str {
        "local_search"
    }

    fn next_candidate(&mut self) -> Option<DesignVector> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let rng = &mut self.rng;
        let unit: Vec<Real> = match &self.best {
            Some((_, centre)) => centre
                .iter()
                .map(|&c| (c + self.step * (2.0 * rng.random::<Real>() - 1.0)).clamp(0.0, 1.0))
                .collect(),
            None => (0..self.space.dimensions())
                .map(|_| rng.random::<Real>())
                .collect(),
        };
        let design = candidate(&self.space, self.name(), &self.space.scale(&unit))?;
        self.pending.push_back(unit);
        Some(design)
    }

    fn observe(&mut self, _design: &DesignVector, result: &EvaluatedDesign) {
        let Some(unit) = self.pending.pop_front() else {
            return;
        };
        if !result.feasible {
            return;
        }
        let Some(score) = self.objective.score(result) else {
            return;
        };
        if self.best.as_ref().is_none_or(|(best, _)| score < *best) {
            debug!(objective = %self.objective, score, "local search centre moved");
            self.best = Some((score, unit));
        }
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

fn linear_levels(start: Real, end: Real, levels: usize) -> Vec<Real> {
    if levels <= 1 {
        return vec![start];
    }
    let delta = (end - start) / (levels - 1) as Real;
    let mut points: Vec<Real> = (0..levels).map(|i| start + i as Real * delta).collect();
    // Exact endpoint
    points[levels - 1] = end;
    points
}

/// Serializable sampler definition, as written in a study file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SamplerConfig {
    Uniform { samples: usize, seed: u64 },
    LatinHypercube { samples: usize, seed: u64 },
    Grid { levels: usize },
    LocalSearch {
        samples: usize,
        seed: u64,
        objective: Objective,
        #[serde(default = "default_step")]
        step: Real,
    },
}

fn default_step() -> Real {
    0.1
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig::LatinHypercube {
            samples: 100,
            seed: 0,
        }
    }
}

impl SamplerConfig {
    pub fn build(&self, space: &DesignSpace) -> ExploreResult<Box<dyn DesignSampler>> {
        let space = space.clone();
        Ok(match *self {
            SamplerConfig::Uniform { samples, seed } => {
                Box::new(UniformSampler::new(space, samples, seed)?)
            }
            SamplerConfig::LatinHypercube { samples, seed } => {
                Box::new(LatinHypercubeSampler::new(space, samples, seed)?)
            }
            SamplerConfig::Grid { levels } => Box::new(GridSampler::new(space, levels)?),
            SamplerConfig::LocalSearch {
                samples,
                seed,
                objective,
                step,
            } => Box::new(LocalSearchSampler::new(space, samples, seed, objective, step)?),
        })
    }
}
