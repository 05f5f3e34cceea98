use proptest::prelude::*;
use sv_explore::{
    DesignSampler, DesignSpace, Explorer, LatinHypercubeSampler, Objective, SamplerConfig,
    UniformSampler, pareto_front,
};
use sv_pipeline::{DesignInput, DesignVector, Pipeline, PipelineConfig};

fn values(d: &DesignVector) -> [f64; 5] {
    let (a, b, c) = match d.input {
        DesignInput::Ratios { lb, bt, tl } => (lb, bt, tl),
        DesignInput::Dimensions {
            length_m,
            beam_m,
            draft_m,
        } => (length_m, beam_m, draft_m),
    };
    [d.cb, a, b, c, d.storage_capacity_mj.unwrap_or(f64::NAN)]
}

fn within(space: &DesignSpace, d: &DesignVector) -> bool {
    space
        .variables
        .iter()
        .zip(values(d))
        .all(|(v, x)| v.contains(x))
}

proptest! {
    #[test]
    fn uniform_samples_stay_in_bounds(seed in any::<u64>(), dims in any::<bool>()) {
        let space = if dims { DesignSpace::dimension_space() } else { DesignSpace::ratio_space() };
        let mut sampler = UniformSampler::new(space.clone(), 32, seed).unwrap();
        while let Some(d) = sampler.next_candidate() {
            prop_assert!(within(&space, &d), "{d:?}");
        }
    }

    #[test]
    fn latin_hypercube_samples_stay_in_bounds(seed in any::<u64>(), n in 1usize..40) {
        let space = DesignSpace::ratio_space();
        let mut sampler = LatinHypercubeSampler::new(space.clone(), n, seed).unwrap();
        let mut count = 0;
        while let Some(d) = sampler.next_candidate() {
            prop_assert!(within(&space, &d), "{d:?}");
            count += 1;
        }
        prop_assert_eq!(count, n);
    }
}

#[test]
fn study_from_yaml_runs_end_to_end() {
    let space: DesignSpace = serde_yaml::from_str(
        r#"
kind: dimensions
variables:
  - { name: cb, lower: 0.31, upper: 0.35 }
  - { name: length_m, lower: 32.0, upper: 36.0 }
  - { name: beam_m, lower: 5.0, upper: 5.2 }
  - { name: draft_m, lower: 4.9, upper: 5.0 }
"#,
    )
    .unwrap();
    let sampler: SamplerConfig = serde_yaml::from_str("kind: grid\nlevels: 3\n").unwrap();

    let explorer = Explorer::new(Pipeline::new(PipelineConfig::default()).unwrap());
    let mut sampler = sampler.build(&space).unwrap();
    let run = explorer.run(sampler.as_mut(), None);

    assert_eq!(run.cases.len(), 81);
    assert!(run.stats.feasible > 0);

    let front = pareto_front(&run.cases, &[Objective::Fuel, Objective::Gmt]);
    assert!(!front.is_empty());
    for &i in &front {
        assert!(run.cases[i].result.feasible);
    }
}
