use sv_explore::{DesignSpace, Explorer, SamplerConfig, SpaceKind, Variable};
use sv_pipeline::{Pipeline, PipelineConfig};
use sv_results::*;

fn run_study(seed: u64, max_cases: Option<usize>) -> (StudyManifest, Vec<CaseRecord>) {
    let config = PipelineConfig::default();
    let space = DesignSpace {
        kind: SpaceKind::Dimensions,
        variables: vec![
            Variable::new("cb", 0.31, 0.45),
            Variable::new("length_m", 30.0, 40.0),
            Variable::new("beam_m", 3.0, 6.0),
            Variable::new("draft_m", 3.0, 5.0),
            Variable::new("storage_mj", 0.0, 500.0),
        ],
    };
    let sampler = SamplerConfig::Uniform { samples: 12, seed };

    let explorer = Explorer::new(Pipeline::new(config.clone()).unwrap());
    let mut built = sampler.build(&space).unwrap();
    let exploration = explorer.run(built.as_mut(), max_cases);

    let manifest = StudyManifest::new("smoke", &config, &space, &sampler, &exploration);
    let cases = exploration.cases.iter().map(CaseRecord::from_case).collect();
    (manifest, cases)
}

#[test]
fn save_and_load_study() {
    let temp_dir = std::env::temp_dir().join("sv_results_save_load");
    let _ = std::fs::remove_dir_all(&temp_dir);
    let store = StudyStore::new(temp_dir.clone()).unwrap();

    let (manifest, cases) = run_study(5, None);
    assert_eq!(manifest.evaluated, 12);
    assert_eq!(manifest.schema_version, SCHEMA_VERSION);

    store.save_study(&manifest, &cases).unwrap();
    assert!(store.has_study(&manifest.study_id));
    assert!(temp_dir.join(&manifest.study_id).join("cases.csv").exists());

    let loaded = store.load_manifest(&manifest.study_id).unwrap();
    assert_eq!(loaded.study_id, manifest.study_id);
    assert_eq!(loaded.name, "smoke");
    assert_eq!(loaded.evaluated, manifest.evaluated);
    assert_eq!(loaded.feasible, manifest.feasible);
    assert_eq!(loaded.reason_counts, manifest.reason_counts);
    assert_eq!(loaded.sampler, manifest.sampler);
    assert_eq!(loaded.max_cases, None);
    assert_eq!(loaded.batch_size, Explorer::DEFAULT_BATCH_SIZE);

    let loaded_cases = store.load_cases(&manifest.study_id).unwrap();
    assert_eq!(loaded_cases.len(), cases.len());
    for (a, b) in loaded_cases.iter().zip(&cases) {
        assert_eq!(a.index, b.index);
        assert_eq!(a.feasible, b.feasible);
        assert_eq!(a.reasons, b.reasons);
        assert_eq!(a.fuel_t.is_some(), b.fuel_t.is_some());
        if let (Some(x), Some(y)) = (a.fuel_t, b.fuel_t) {
            assert!((x - y).abs() <= 1e-9 * y.abs());
        }
    }

    let _ = std::fs::remove_dir_all(&temp_dir);
}

#[test]
fn list_and_delete_studies() {
    let temp_dir = std::env::temp_dir().join("sv_results_list_delete");
    let _ = std::fs::remove_dir_all(&temp_dir);
    let store = StudyStore::new(temp_dir.clone()).unwrap();

    let (first, first_cases) = run_study(1, None);
    let (second, second_cases) = run_study(2, None);
    assert_ne!(first.study_id, second.study_id);

    store.save_study(&first, &first_cases).unwrap();
    store.save_study(&second, &second_cases).unwrap();
    std::fs::create_dir_all(temp_dir.join("not-a-study")).unwrap();

    let listed = store.list_studies().unwrap();
    assert_eq!(listed.len(), 2);

    store.delete_study(&first.study_id).unwrap();
    let listed = store.list_studies().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].study_id, second.study_id);

    assert!(matches!(
        store.load_manifest(&first.study_id),
        Err(ResultsError::StudyNotFound { .. })
    ));

    let _ = std::fs::remove_dir_all(&temp_dir);
}

#[test]
fn same_study_definition_overwrites() {
    let temp_dir = std::env::temp_dir().join("sv_results_overwrite");
    let _ = std::fs::remove_dir_all(&temp_dir);
    let store = StudyStore::new(temp_dir.clone()).unwrap();

    let (manifest, cases) = run_study(3, None);
    store.save_study(&manifest, &cases).unwrap();
    store.save_study(&manifest, &cases[..4]).unwrap();

    assert_eq!(store.list_studies().unwrap().len(), 1);
    assert_eq!(store.load_cases(&manifest.study_id).unwrap().len(), 4);

    let _ = std::fs::remove_dir_all(&temp_dir);
}

#[test]
fn capped_run_does_not_overwrite_full_run() {
    let temp_dir = std::env::temp_dir().join("sv_results_capped");
    let _ = std::fs::remove_dir_all(&temp_dir);
    let store = StudyStore::new(temp_dir.clone()).unwrap();

    let (full, full_cases) = run_study(6, None);
    let (capped, capped_cases) = run_study(6, Some(5));
    assert_ne!(full.study_id, capped.study_id);
    assert_eq!(capped.max_cases, Some(5));

    store.save_study(&full, &full_cases).unwrap();
    store.save_study(&capped, &capped_cases).unwrap();

    assert_eq!(store.list_studies().unwrap().len(), 2);
    assert_eq!(store.load_cases(&full.study_id).unwrap().len(), 12);
    assert_eq!(store.load_cases(&capped.study_id).unwrap().len(), 5);

    let _ = std::fs::remove_dir_all(&temp_dir);
}
