//! Objectives and Pareto ranking over explored cases.

use crate::explorer::Case;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use sv_core::Real;
use sv_pipeline::EvaluatedDesign;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Displacement,
    Weight,
    Fuel,
    Mcr,
    Starts,
    FailureProbability,
    /// Transverse metacentric height; larger is better
    Gmt,
}

impl Objective {
    pub const ALL: [Objective; 7] = [
        Objective::Displacement,
        Objective::Weight,
        Objective::Fuel,
        Objective::Mcr,
        Objective::Starts,
        Objective::FailureProbability,
        Objective::Gmt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Objective::Displacement => "displacement",
            Objective::Weight => "weight",
            Objective::Fuel => "fuel",
            Objective::Mcr => "mcr",
            Objective::Starts => "starts",
            Objective::FailureProbability => "failure_probability",
            Objective::Gmt => "gmt",
        }
    }

    pub fn minimize(self) -> bool {
        !matches!(self, Objective::Gmt)
    }

    pub fn value(self, result: &EvaluatedDesign) -> Option<Real> {
        match self {
            Objective::Displacement => result.displacement_t(),
            Objective::Weight => result.weight_t(),
            Objective::Fuel => result.fuel_weight_t(),
            Objective::Mcr => result.mcr_kw(),
            Objective::Starts => result.n_starts(),
            Objective::FailureProbability => result.failure_probability(),
            Objective::Gmt => result.gmt_m(),
        }
    }

    /// Value oriented so that smaller is always better.
    pub fn score(self, result: &EvaluatedDesign) -> Option<Real> {
        let v = self.value(result)?;
        Some(if self.minimize() { v } else { -v })
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Objective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Objective::ALL
            .into_iter()
            .find(|o| o.name() == s)
            .ok_or_else(|| format!("unknown objective '{s}'"))
    }
}

fn scores(case: &Case, objectives: &[Objective]) -> Option<Vec<Real>> {
    if !case.result.feasible {
        return None;
    }
    objectives
        .iter()
        .map(|o| o.score(&case.result))
        .collect()
}

fn dominates(a: &[Real], b: &[Real]) -> bool {
    a.iter().zip(b).all(|(x, y)| x <= y) && a.iter().zip(b).any(|(x, y)| x < y)
}

/// Positions in `cases` of the feasible, non-dominated cases, in input order.
pub fn pareto_front(cases: &[Case], objectives: &[Objective]) -> Vec<usize> {
    let scored: Vec<(usize, Vec<Real>)> = cases
        .iter()
        .enumerate()
        .filter_map(|(i, c)| scores(c, objectives).map(|s| (i, s)))
        .collect();

    scored
        .iter()
        .filter(|(_, s)| !scored.iter().any(|(_, other)| dominates(other, s)))
        .map(|(i, _)| *i)
        .collect()
}

/// Best feasible case for a single objective.
pub fn best_by(cases: &[Case], objective: Objective) -> Option<&Case> {
    cases
        .iter()
        .filter(|c| c.result.feasible)
        .filter_map(|c| objective.score(&c.result).map(|s| (c, s)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(c, _)| c)
}
