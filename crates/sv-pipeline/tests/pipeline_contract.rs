use proptest::prelude::*;
use sv_pipeline::{
    DesignVector, InfeasibilityReason, Pipeline, PipelineConfig, Stage, StageEvent, StageOutcome,
};
use sv_solver::ResolveStrategy;

fn pipeline() -> Pipeline {
    Pipeline::new(PipelineConfig::default()).unwrap()
}

#[test]
fn ratio_design_resolves_before_evaluation() {
    let e = pipeline().evaluate(&DesignVector::from_ratios(0.4, 4.0, 2.0, 0.15));
    let resolution = e.resolution.expect("ratio design resolves");
    assert!(resolution.converged);
    assert!((e.length_m().unwrap() - 19.0).abs() < 1e-9);
    assert!((e.beam_m().unwrap() - 5.7).abs() < 1e-9);
    assert!((e.draft_m().unwrap() - 2.85).abs() < 1e-9);
    // Resolution balances against 500 kW machinery; the mission needs far more
    assert!(e.mcr_kw().unwrap() > 10_000.0);
    assert!(!e.feasible);
    assert!(e.has_reason("weight_imbalance"));
}

#[test]
fn newton_strategy_through_pipeline() {
    let mut config = PipelineConfig::default();
    config.resolver.strategy = ResolveStrategy::Newton;
    let e = Pipeline::new(config)
        .unwrap()
        .evaluate(&DesignVector::from_ratios(0.45, 6.0, 2.0, 0.08));
    let r = e.resolution.unwrap();
    assert!(r.converged);
    assert_eq!(r.strategy, ResolveStrategy::Newton);
    assert!(e.hull.is_some());
}

#[test]
fn non_convergence_is_reported_not_raised() {
    let e = pipeline().evaluate(&DesignVector::from_ratios(0.39, 3.0, 2.5, 0.15));
    assert!(!e.feasible);
    assert_eq!(e.reasons, [InfeasibilityReason::DimensionResolutionFailed]);
    assert!(e.hull.is_none());
    assert_eq!(e.resolution.unwrap().length_m, 0.0);
    assert_eq!(
        e.reasons[0].to_string(),
        "dimension resolution failed"
    );
}

#[test]
fn storage_design_stays_feasible() {
    let design = DesignVector::from_dimensions(0.31, 34.03, 5.11, 4.98).with_storage(300.0);
    let e = pipeline().evaluate(&design);
    assert!(e.feasible, "{:?}", e.reasons);
    assert!((e.fuel_weight_t().unwrap() - 122.324).abs() < 1e-3);
    assert!((e.eta_run().unwrap() - 0.047_277).abs() < 1e-6);
    assert!((e.n_starts().unwrap() - 559.49).abs() < 1e-2);
    assert!((e.weight_t().unwrap() - 278.548).abs() < 1e-3);
    assert!((e.failure_probability().unwrap() - 0.199_95).abs() < 1e-5);
}

#[test]
fn zero_storage_matches_no_storage() {
    let p = pipeline();
    let base = DesignVector::from_dimensions(0.31, 34.03, 5.11, 4.98);
    let a = p.evaluate(&base);
    let b = p.evaluate(&base.with_storage(0.0));
    assert_eq!(a.mission, b.mission);
    assert_eq!(a.weight, b.weight);
    assert_eq!(a.reliability, b.reliability);
    assert_eq!(a.feasible, b.feasible);
}

#[test]
fn out_of_range_block_coefficient_is_flagged() {
    let e = pipeline().evaluate(&DesignVector::from_dimensions(0.25, 40.0, 8.0, 2.5));
    assert!(!e.feasible);
    let cruise = e.cruise.as_ref().unwrap();
    assert_eq!(cruise.brake_kw, 0.0);
    assert!(cruise.is_out_of_range());
    assert!(e.reasons.iter().any(|r| matches!(
        r,
        InfeasibilityReason::OutOfValidatedRange { stage: Stage::Powering, what, .. }
            if what == "block coefficient"
    )));
    assert!(!e.diagnostics.is_empty());
}

#[test]
fn invalid_input_is_reported() {
    let e = pipeline().evaluate(&DesignVector::from_dimensions(0.45, -40.0, 8.0, 2.5));
    assert!(!e.feasible);
    assert!(e.has_reason("invalid_input"));
    assert!(e.hull.is_none());
}

#[test]
fn observer_sees_flagged_powering() {
    let mut events: Vec<StageEvent> = Vec::new();
    pipeline().evaluate_with_progress(
        &DesignVector::from_dimensions(0.25, 40.0, 8.0, 2.5),
        Some(&mut |event| events.push(event)),
    );
    let powering = events
        .iter()
        .find(|e| e.stage == Stage::Powering)
        .unwrap();
    assert_eq!(powering.outcome, StageOutcome::Flagged);
    assert!(powering.message.as_deref().unwrap().contains("block coefficient"));
}

#[test]
fn evaluated_design_serializes() {
    let e = pipeline().evaluate(&DesignVector::from_dimensions(0.45, 40.0, 3.0, 4.0));
    let json = serde_json::to_value(&e).unwrap();
    assert_eq!(json["feasible"], false);
    assert_eq!(json["reasons"][0]["kind"], "negative_stability");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn evaluation_is_idempotent(
        cb in 0.31..0.59f64,
        l in 25.0..50.0f64,
        b in 3.0..12.0f64,
        t in 2.0..5.0f64,
        cap in 0.0..1000.0f64,
    ) {
        let p = pipeline();
        let design = DesignVector::from_dimensions(cb, l, b, t).with_storage(cap);
        let first = p.evaluate(&design);
        let second = p.evaluate(&design);
        prop_assert_eq!(first, second);
    }
}
