//! Single design evaluation.

use crate::config::PipelineConfig;
use crate::design::{DesignInput, DesignVector};
use crate::error::PipelineResult;
use crate::feasibility::{FeasibilityInputs, InfeasibilityReason, check};
use crate::stage::{Stage, StageEvent, StageOutcome};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use sv_core::{Condition, Diagnostic, Flagged, Real};
use sv_curves::{
    FuelAllowance, HullForm, ResistanceTable, StabilityEstimate, WeightBreakdown, WeightCurve,
    WeightInput, hull_form, metacentric_height,
};
use sv_mission::{
    MissionFuel, PoweringModel, PoweringResult, ReliabilityEstimate, failure_probability,
};
use sv_solver::{DimensionResolver, ResolvedDimensions};
use tracing::debug;

/// Everything one evaluation produced.
///
/// Stage outputs are `None` when an earlier stage stopped the evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedDesign {
    pub design: DesignVector,
    /// Present for ratio-defined designs
    pub resolution: Option<ResolvedDimensions>,
    pub hull: Option<HullForm>,
    pub cruise: Option<PoweringResult>,
    pub sprint: Option<PoweringResult>,
    pub mission: Option<MissionFuel>,
    pub weight: Option<WeightBreakdown>,
    pub stability: Option<StabilityEstimate>,
    pub reliability: Option<ReliabilityEstimate>,
    pub diagnostics: Vec<Diagnostic>,
    pub feasible: bool,
    pub reasons: Vec<InfeasibilityReason>,
}

impl EvaluatedDesign {
    fn new(design: DesignVector) -> Self {
        Self {
            design,
            resolution: None,
            hull: None,
            cruise: None,
            sprint: None,
            mission: None,
            weight: None,
            stability: None,
            reliability: None,
            diagnostics: Vec::new(),
            feasible: false,
            reasons: Vec::new(),
        }
    }

    pub fn length_m(&self) -> Option<Real> {
        self.hull.as_ref().map(HullForm::length_m)
    }

    pub fn beam_m(&self) -> Option<Real> {
        self.hull.as_ref().map(HullForm::beam_m)
    }

    pub fn draft_m(&self) -> Option<Real> {
        self.hull.as_ref().map(HullForm::draft_m)
    }

    pub fn wetted_surface_m2(&self) -> Option<Real> {
        self.hull.as_ref().map(HullForm::wetted_surface_m2)
    }

    pub fn displacement_t(&self) -> Option<Real> {
        self.hull.as_ref().map(HullForm::displacement_t)
    }

    /// Fuel load including storage mass, t
    pub fn fuel_weight_t(&self) -> Option<Real> {
        self.mission.as_ref().map(|m| m.fuel_t)
    }

    pub fn mcr_kw(&self) -> Option<Real> {
        self.mission.as_ref().map(|m| m.mcr_kw)
    }

    pub fn eta_run(&self) -> Option<Real> {
        self.mission.as_ref().map(|m| m.eta_run)
    }

    pub fn n_starts(&self) -> Option<Real> {
        self.mission.as_ref().map(|m| m.n_starts)
    }

    pub fn sprint_cruise_ratio(&self) -> Option<Real> {
        self.mission.as_ref().map(|m| m.sprint_cruise_ratio)
    }

    pub fn weight_t(&self) -> Option<Real> {
        self.weight.as_ref().map(|w| w.total_t)
    }

    pub fn gmt_m(&self) -> Option<Real> {
        self.stability.as_ref().map(|s| s.gm_m)
    }

    /// Displacement less weight, t
    pub fn excess_displacement_t(&self) -> Option<Real> {
        Some(self.displacement_t()? - self.weight_t()?)
    }

    pub fn failure_probability(&self) -> Option<Real> {
        self.reliability.as_ref().map(|r| r.total)
    }

    pub fn has_reason(&self, kind: &str) -> bool {
        self.reasons.iter().any(|r| r.kind() == kind)
    }
}

/// Stateless evaluator; safe to share across threads.
#[derive(Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    resolver: DimensionResolver,
    powering: PoweringModel<'static>,
    curve: Arc<dyn WeightCurve>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("curve", &self.curve.name())
            .finish()
    }
}

struct Progress<'p> {
    observer: Option<&'p mut dyn FnMut(StageEvent)>,
    started: Instant,
}

impl Progress<'_> {
    fn emit(&mut self, stage: Stage, outcome: StageOutcome, message: Option<String>) {
        debug!(%stage, ?outcome, "stage finished");
        if let Some(cb) = self.observer.as_deref_mut() {
            cb(StageEvent {
                stage,
                outcome,
                elapsed_wall_s: self.started.elapsed().as_secs_f64(),
                message,
            });
        }
    }

    fn emit_flagged<T>(&mut self, stage: Stage, flagged: &Flagged<T>) {
        if flagged.is_clean() {
            self.emit(stage, StageOutcome::Completed, None);
        } else {
            let message = flagged
                .diagnostics
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            self.emit(stage, StageOutcome::Flagged, Some(message));
        }
    }
}

/// Turns curve diagnostics into reasons and keeps them on the result.
fn record(out: &mut EvaluatedDesign, stage: Stage, diagnostics: Vec<Diagnostic>) {
    for d in diagnostics {
        debug!(%stage, "{d}");
        let what = d.what.to_string();
        out.reasons.push(match d.condition {
            Condition::OutOfValidatedRange => InfeasibilityReason::OutOfValidatedRange {
                stage,
                what,
                value: d.value,
            },
            Condition::DegenerateGeometry => InfeasibilityReason::DegenerateGeometry {
                stage,
                what,
                value: d.value,
            },
        });
        out.diagnostics.push(d);
    }
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PipelineConfig) -> Self {
        let curve = config.weight_curve.build();
        let resolver = DimensionResolver::with_curve(config.resolver.clone(), Arc::clone(&curve));
        let powering = PoweringModel::new(ResistanceTable::SERIES_64, config.efficiency.clone());
        Self {
            config,
            resolver,
            powering,
            curve,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn resolver(&self) -> &DimensionResolver {
        &self.resolver
    }

    pub fn evaluate(&self, design: &DesignVector) -> EvaluatedDesign {
        self.evaluate_with_progress(design, None)
    }

    /// Evaluates a design and reports each stage to `observer`.
    pub fn evaluate_with_progress(
        &self,
        design: &DesignVector,
        observer: Option<&mut dyn FnMut(StageEvent)>,
    ) -> EvaluatedDesign {
        let span = tracing::debug_span!(
            "evaluate",
            cb = design.cb,
            input = ?design.input,
            storage_mj = ?design.storage_capacity_mj
        );
        let _guard = span.enter();

        let mut progress = Progress {
            observer,
            started: Instant::now(),
        };
        let mut out = EvaluatedDesign::new(*design);
        self.run_stages(design, &mut out, &mut progress);

        out.feasible = out.reasons.is_empty();
        if !out.feasible {
            let kinds: Vec<&str> = out.reasons.iter().map(InfeasibilityReason::kind).collect();
            debug!(?kinds, "design infeasible");
        }
        out
    }

    fn run_stages(&self, design: &DesignVector, out: &mut EvaluatedDesign, progress: &mut Progress) {
        if let Err(what) = design.validate() {
            progress.emit(Stage::ResolveDimensions, StageOutcome::Failed, Some(what.clone()));
            out.reasons.push(InfeasibilityReason::InvalidInput { what });
            return;
        }
        let cb = design.cb;

        // Resolve dimensions
        let (length_m, beam_m, draft_m) = match design.input {
            DesignInput::Dimensions {
                length_m,
                beam_m,
                draft_m,
            } => {
                progress.emit(Stage::ResolveDimensions, StageOutcome::Skipped, None);
                (length_m, beam_m, draft_m)
            }
            DesignInput::Ratios { lb, bt, tl } => {
                let ratios = sv_solver::DesignRatios::new(lb, bt, tl);
                let resolved = match self.resolver.resolve(cb, &ratios) {
                    Ok(resolved) => resolved,
                    Err(e) => {
                        let what = e.to_string();
                        progress.emit(Stage::ResolveDimensions, StageOutcome::Failed, Some(what.clone()));
                        out.reasons.push(InfeasibilityReason::InvalidInput { what });
                        return;
                    }
                };
                out.resolution = Some(resolved);
                if !resolved.converged {
                    progress.emit(
                        Stage::ResolveDimensions,
                        StageOutcome::Failed,
                        Some("dimension resolution failed".to_string()),
                    );
                    out.reasons.push(InfeasibilityReason::DimensionResolutionFailed);
                    return;
                }
                progress.emit(Stage::ResolveDimensions, StageOutcome::Completed, None);
                (resolved.length_m, resolved.beam_m, resolved.draft_m)
            }
        };

        // Hull form
        let hull = hull_form(cb, draft_m, length_m, beam_m);
        progress.emit_flagged(Stage::HullForm, &hull);
        let hull = {
            let Flagged { value, diagnostics } = hull;
            record(out, Stage::HullForm, diagnostics);
            value
        };
        out.hull = Some(hull);

        // Powering at both mission speeds
        let mission = &self.config.mission;
        let [cruise, sprint] = [mission.cruise_speed_kn, mission.sprint_speed_kn].map(|speed| {
            self.powering.brake_power(
                hull.length_m(),
                hull.wetted_surface_m2(),
                hull.displacement_t(),
                cb,
                speed,
            )
        });
        let flagged = Flagged::with(
            (),
            cruise
                .diagnostics
                .iter()
                .chain(&sprint.diagnostics)
                .cloned()
                .collect(),
        );
        progress.emit_flagged(Stage::Powering, &flagged);
        record(out, Stage::Powering, flagged.diagnostics);
        let (cruise_kw, sprint_kw) = (cruise.brake_kw, sprint.brake_kw);
        out.cruise = Some(cruise);
        out.sprint = Some(sprint);

        // Mission fuel
        let fuel = match mission.fuel(cruise_kw, sprint_kw, design.storage_capacity_mj) {
            Ok(fuel) => fuel,
            Err(e) => {
                let detail = e.to_string();
                progress.emit(Stage::MissionFuel, StageOutcome::Failed, Some(detail.clone()));
                out.reasons
                    .push(InfeasibilityReason::InvalidMissionProfile { detail });
                return;
            }
        };
        progress.emit(Stage::MissionFuel, StageOutcome::Completed, None);

        // Weight with the mission fuel load
        let weight = self.curve.estimate(
            &WeightInput {
                cb,
                draft_m: hull.draft_m(),
                length_m: hull.length_m(),
                beam_m: hull.beam_m(),
                mcr_kw: fuel.mcr_kw,
            },
            FuelAllowance::Fixed {
                fuel_t: fuel.fuel_t,
            },
        );
        progress.emit_flagged(Stage::Weight, &weight);
        let weight = {
            let Flagged { value, diagnostics } = weight;
            record(out, Stage::Weight, diagnostics);
            value
        };
        out.weight = Some(weight);

        // Stability
        let stability = metacentric_height(cb, hull.draft_m(), hull.length_m(), hull.beam_m());
        progress.emit_flagged(Stage::Stability, &stability);
        let stability = {
            let Flagged { value, diagnostics } = stability;
            record(out, Stage::Stability, diagnostics);
            value
        };
        out.stability = Some(stability);

        // Reliability
        let reliability = failure_probability(
            &self.config.reliability,
            fuel.eta_run,
            fuel.n_starts,
            fuel.legs.total_h,
        );
        out.reliability = Some(reliability);
        progress.emit(Stage::Reliability, StageOutcome::Completed, None);

        // Feasibility
        let inputs = FeasibilityInputs {
            gmt_m: stability.gm_m,
            weight_t: weight.total_t,
            displacement_t: hull.displacement_t(),
            sprint_cruise_ratio: fuel.sprint_cruise_ratio,
            mcr_kw: fuel.mcr_kw,
            fuel_t: fuel.fuel_t,
        };
        out.mission = Some(fuel);
        let reasons = check(&self.config.feasibility, &inputs);
        let outcome = if reasons.is_empty() && out.reasons.is_empty() {
            StageOutcome::Completed
        } else {
            StageOutcome::Failed
        };
        out.reasons.extend(reasons);
        progress.emit(Stage::Feasibility, outcome, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> Pipeline {
        Pipeline::new(PipelineConfig::default()).unwrap()
    }

    #[test]
    fn feasible_reference_design() {
        let e = pipeline().evaluate(&DesignVector::from_dimensions(0.31, 34.03, 5.11, 4.98));
        assert!(e.feasible, "{:?}", e.reasons);
        assert!(e.resolution.is_none());
        assert!((e.wetted_surface_m2().unwrap() - 250.411).abs() < 1e-3);
        assert!((e.displacement_t().unwrap() - 275.436).abs() < 1e-3);
        assert!((e.fuel_weight_t().unwrap() - 120.239).abs() < 1e-3);
        assert!((e.mcr_kw().unwrap() - 1936.07).abs() < 1e-2);
        assert!((e.weight_t().unwrap() - 276.359).abs() < 1e-3);
        assert!((e.gmt_m().unwrap() - 0.385_44).abs() < 1e-4);
        assert!((e.excess_displacement_t().unwrap() + 0.922).abs() < 1e-3);
        assert!((e.failure_probability().unwrap() - 0.144).abs() < 1e-9);
        assert_eq!(e.eta_run(), Some(1.0));
        assert_eq!(e.n_starts(), Some(0.0));
    }

    #[test]
    fn infeasible_design_lists_every_violation() {
        let e = pipeline().evaluate(&DesignVector::from_dimensions(0.45, 40.0, 3.0, 4.0));
        assert!(!e.feasible);
        assert!(e.has_reason("negative_stability"));
        assert!(e.has_reason("weight_imbalance"));
        assert!(e.has_reason("power_ratio_exceeded"));
        assert!((e.gmt_m().unwrap() + 0.338).abs() < 1e-3);
        // Downstream results are still reported
        assert!(e.reliability.is_some());
    }

    #[test]
    fn mission_profile_failure_stops_evaluation() {
        // Bypass config validation to reach the per-design guard
        let mut config = PipelineConfig::default();
        config.mission.range_nm = 40_000.0;
        let p = Pipeline::build(config);
        let e = p.evaluate(&DesignVector::from_dimensions(0.31, 34.03, 5.11, 4.98));
        assert!(!e.feasible);
        assert!(e.has_reason("invalid_mission_profile"));
        assert!(e.cruise.is_some());
        assert!(e.mission.is_none());
        assert!(e.weight.is_none());
        assert!(e.reliability.is_none());
    }

    #[test]
    fn progress_reports_stages_in_order() {
        let mut stages = Vec::new();
        let mut observer = |event: StageEvent| stages.push((event.stage, event.outcome));
        pipeline().evaluate_with_progress(
            &DesignVector::from_dimensions(0.31, 34.03, 5.11, 4.98),
            Some(&mut observer),
        );
        let order: Vec<Stage> = stages.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            order,
            [
                Stage::ResolveDimensions,
                Stage::HullForm,
                Stage::Powering,
                Stage::MissionFuel,
                Stage::Weight,
                Stage::Stability,
                Stage::Reliability,
                Stage::Feasibility,
            ]
        );
        assert_eq!(stages[0].1, StageOutcome::Skipped);
        assert_eq!(stages[7].1, StageOutcome::Completed);
    }

    #[test]
    fn failed_resolution_emits_single_event() {
        let mut events = Vec::new();
        let mut observer = |event: StageEvent| events.push(event);
        let e = pipeline().evaluate_with_progress(
            &DesignVector::from_ratios(0.39, 3.0, 2.5, 0.15),
            Some(&mut observer),
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].outcome, StageOutcome::Failed);
        assert_eq!(e.reasons, [InfeasibilityReason::DimensionResolutionFailed]);
    }
}
