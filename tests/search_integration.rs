use antennasearch::config::{AppConfig, GeometryConfig, ParameterRange, StorageConfig};
use antennasearch::data::filing;
use antennasearch::engines::generation::evolution_engine::Cohort;
use antennasearch::engines::generation::pareto::dominates;
use antennasearch::{
    Curve, FitnessScore, Geometry, Individual, ParameterSpace, SearchEngine, SearchError,
    SilentProgressCallback, SimulationResult, StopCriterion, StopReason,
};
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;
use tempfile::TempDir;

/// Small two-parameter design: `a` moves the resonance, `b` widens it.
fn create_test_config(dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.search.population_size = 6;
    config.search.number_of_offspring = 3;
    config.search.mutation_rate = 0.2;
    config.search.max_generations = Some(3);
    config.search.seed = Some(7);
    config.geometry = GeometryConfig {
        step_size: 0.5,
        parameters: vec![ParameterRange::new("a", 1.0, 10.0), ParameterRange::new("b", 1.0, 5.0)],
        constraints: Vec::new(),
    };
    config.storage = StorageConfig {
        directory: dir.to_path_buf(),
        name: None,
    };
    config
}

fn resonator_response(parameters: &[f64]) -> SimulationResult {
    let centre = 1.9 + 0.1 * parameters[0];
    let width = 0.01 * parameters[1];
    let frequencies: Vec<f64> = (0..=200).map(|i| 2.0 + i as f64 * 0.005).collect();
    let return_loss = frequencies
        .iter()
        .map(|f| -25.0 * (-((f - centre) / width).powi(2)).exp())
        .collect();
    let gain = vec![3.0; frequencies.len()];
    SimulationResult::new(
        Curve::new(frequencies.clone(), return_loss),
        Curve::new(frequencies, gain),
    )
}

/// Simulator that counts its calls through a shared cell.
fn counting_simulator(
    calls: Rc<Cell<usize>>,
) -> impl FnMut(&[f64]) -> anyhow::Result<SimulationResult> {
    move |parameters: &[f64]| {
        calls.set(calls.get() + 1);
        Ok(resonator_response(parameters))
    }
}

fn unreachable_threshold() -> StopCriterion {
    StopCriterion::Convergence(FitnessScore::new(-1.0, -1.0))
}

#[test]
fn test_search_runs_to_generation_limit() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let calls = Rc::new(Cell::new(0));
    let geometry = ParameterSpace::from_config(&config);

    let mut engine = SearchEngine::new(&config, geometry, counting_simulator(calls.clone())).unwrap();
    let report = engine
        .search(unreachable_threshold(), &mut SilentProgressCallback)
        .unwrap();

    assert_eq!(report.generations, 3);
    assert_eq!(report.stop_reason, StopReason::GenerationLimit);
    assert!(report.best.is_some());
    assert!(report.finished_at >= report.started_at);

    assert_eq!(engine.population().len(), 6);
    assert_eq!(engine.offspring().len(), 3);
    assert!(engine.population().iter().all(Individual::is_evaluated));

    assert_eq!(report.stats.simulations, calls.get());
    assert_eq!(engine.store().len(), calls.get());
    // at most the initial population plus three rounds of offspring
    assert!(calls.get() <= 6 + 3 * 3);
}

#[test]
fn test_slots_never_get_worse() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path());
    config.search.max_generations = Some(5);
    let geometry = ParameterSpace::from_config(&config);

    let mut engine =
        SearchEngine::new(&config, geometry, counting_simulator(Rc::new(Cell::new(0)))).unwrap();
    engine
        .search(unreachable_threshold(), &mut SilentProgressCallback)
        .unwrap();

    let history: Vec<Vec<FitnessScore>> = filing::read_lines(&engine.files().fitness);
    assert_eq!(history.len(), 5);
    for pair in history.windows(2) {
        assert_eq!(pair[0].len(), 6);
        assert_eq!(pair[1].len(), 6);
        for (before, after) in pair[0].iter().zip(&pair[1]) {
            assert!(after == before || dominates(after, before));
        }
    }

    let best = engine.best_fitness().unwrap();
    for score in history.last().unwrap() {
        assert!(!dominates(score, &best));
    }
}

#[test]
fn test_zero_time_budget_stops_after_one_generation() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path());
    config.search.max_generations = None;
    let geometry = ParameterSpace::from_config(&config);

    let mut engine =
        SearchEngine::new(&config, geometry, counting_simulator(Rc::new(Cell::new(0)))).unwrap();
    let report = engine
        .search(StopCriterion::TimeBudget(Duration::ZERO), &mut SilentProgressCallback)
        .unwrap();

    assert_eq!(report.generations, 1);
    assert_eq!(report.stop_reason, StopReason::TimeBudget);
}

#[test]
fn test_loose_threshold_converges_immediately() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let geometry = ParameterSpace::from_config(&config);

    let mut engine =
        SearchEngine::new(&config, geometry, counting_simulator(Rc::new(Cell::new(0)))).unwrap();
    let report = engine
        .search(
            StopCriterion::Convergence(FitnessScore::new(f64::MAX, f64::MAX)),
            &mut SilentProgressCallback,
        )
        .unwrap();

    assert_eq!(report.generations, 1);
    assert_eq!(report.stop_reason, StopReason::Converged);
    let best = report.best_fitness.unwrap();
    assert!(best.within(&FitnessScore::new(f64::MAX, f64::MAX)));
}

#[test]
fn test_restart_resumes_from_snapshots() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());

    let first_calls = Rc::new(Cell::new(0));
    let mut engine = SearchEngine::new(
        &config,
        ParameterSpace::from_config(&config),
        counting_simulator(first_calls.clone()),
    )
    .unwrap();
    engine
        .search(unreachable_threshold(), &mut SilentProgressCallback)
        .unwrap();
    let population = engine.population().to_vec();
    let offspring = engine.offspring().to_vec();
    let explored = engine.store().len();
    drop(engine);

    let second_calls = Rc::new(Cell::new(0));
    let mut resumed = SearchEngine::new(
        &config,
        ParameterSpace::from_config(&config),
        counting_simulator(second_calls.clone()),
    )
    .unwrap();

    assert_eq!(resumed.population(), population.as_slice());
    assert_eq!(resumed.store().len(), explored);
    assert_eq!(
        filing::read_snapshot(&resumed.files().offspring),
        Some(offspring)
    );

    resumed
        .ensure_evaluated(Cohort::Population, &mut SilentProgressCallback)
        .unwrap();
    assert_eq!(second_calls.get(), 0);
}

#[test]
fn test_duplicate_vectors_simulated_once() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let files = filing::SnapshotFiles::in_directory(dir.path());
    let duplicates = vec![Individual::new(vec![4.5, 2.0]); 6];
    filing::save_snapshot(&files.population, &duplicates).unwrap();

    let calls = Rc::new(Cell::new(0));
    let mut engine = SearchEngine::new(
        &config,
        ParameterSpace::from_config(&config),
        counting_simulator(calls.clone()),
    )
    .unwrap();
    assert_eq!(engine.population(), duplicates.as_slice());

    engine
        .ensure_evaluated(Cohort::Population, &mut SilentProgressCallback)
        .unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(engine.stats().cache_hits, 5);
    assert!(engine.population().iter().all(Individual::is_evaluated));

    engine
        .ensure_evaluated(Cohort::Population, &mut SilentProgressCallback)
        .unwrap();
    assert_eq!(calls.get(), 1);

    let saved = filing::read_snapshot(&files.population).unwrap();
    assert!(saved.iter().all(Individual::is_evaluated));
}

#[test]
fn test_stale_population_snapshot_is_replaced() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let files = filing::SnapshotFiles::in_directory(dir.path());
    filing::save_snapshot(&files.population, &[Individual::new(vec![2.0, 2.0])]).unwrap();

    let engine = SearchEngine::new(
        &config,
        ParameterSpace::from_config(&config),
        counting_simulator(Rc::new(Cell::new(0))),
    )
    .unwrap();
    assert_eq!(engine.population().len(), 6);
    assert_eq!(filing::read_snapshot(&files.population).map(|p| p.len()), Some(6));
}

#[test]
fn test_simulator_failure_propagates() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let failing = |_: &[f64]| -> anyhow::Result<SimulationResult> {
        Err(anyhow::anyhow!("solver licence unavailable"))
    };

    let mut engine =
        SearchEngine::new(&config, ParameterSpace::from_config(&config), failing).unwrap();
    let err = engine
        .search(unreachable_threshold(), &mut SilentProgressCallback)
        .unwrap_err();

    assert!(matches!(err, SearchError::Simulator(_)));
    assert!(err.to_string().contains("solver licence unavailable"));
    assert!(engine.store().is_empty());
}

#[test]
fn test_malformed_response_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let malformed = |_: &[f64]| -> anyhow::Result<SimulationResult> {
        Ok(SimulationResult::new(
            Curve::new(vec![2.0, 2.1, 2.2], vec![-12.0, -15.0]),
            Curve::new(vec![2.0, 2.1, 2.2], vec![1.0, 1.0, 1.0]),
        ))
    };

    let mut engine =
        SearchEngine::new(&config, ParameterSpace::from_config(&config), malformed).unwrap();
    let err = engine
        .ensure_evaluated(Cohort::Population, &mut SilentProgressCallback)
        .unwrap_err();

    assert!(matches!(err, SearchError::InvalidSimulationResult(_)));
    assert!(engine.store().is_empty());
}

#[test]
fn test_invalid_config_rejected() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path());
    config.search.crossover_rate = 1.5;

    let result = SearchEngine::new(
        &config,
        ParameterSpace::from_config(&config),
        counting_simulator(Rc::new(Cell::new(0))),
    );
    assert!(matches!(result, Err(SearchError::Configuration(_))));
}

#[test]
fn test_out_of_range_snapshot_is_regenerated() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let files = filing::SnapshotFiles::in_directory(dir.path());
    let mut saved = vec![Individual::new(vec![2.0, 2.0]); 6];
    saved[1] = Individual::new(vec![99.0, 2.0]);
    filing::save_snapshot(&files.population, &saved).unwrap();

    let calls = Rc::new(Cell::new(0));
    let geometry = ParameterSpace::from_config(&config);
    let mut engine =
        SearchEngine::new(&config, geometry.clone(), counting_simulator(calls.clone())).unwrap();

    assert_ne!(engine.population(), saved.as_slice());
    engine
        .ensure_evaluated(Cohort::Population, &mut SilentProgressCallback)
        .unwrap();
    for individual in engine.population() {
        assert!(geometry.check_boundary(&individual.parameters).is_ok());
    }
    assert!(engine
        .store()
        .entries()
        .iter()
        .all(|entry| entry.parameters != vec![99.0, 2.0]));
}

#[test]
fn test_snapshot_with_corrupt_result_is_regenerated() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let files = filing::SnapshotFiles::in_directory(dir.path());
    let corrupt = SimulationResult::new(
        Curve::new(vec![3.0, 2.0, 1.0], vec![-12.0]),
        Curve::new(Vec::new(), Vec::new()),
    );
    let mut saved = vec![Individual::new(vec![2.0, 2.0]); 6];
    saved[0] = Individual::evaluated(vec![2.0, 2.0], corrupt);
    filing::save_snapshot(&files.population, &saved).unwrap();

    let engine = SearchEngine::new(
        &config,
        ParameterSpace::from_config(&config),
        counting_simulator(Rc::new(Cell::new(0))),
    )
    .unwrap();

    assert_eq!(engine.population().len(), 6);
    assert!(engine.population().iter().all(|individual| !individual.is_evaluated()));
}

#[test]
fn test_corrupt_explored_entry_is_not_a_cache_hit() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let files = filing::SnapshotFiles::in_directory(dir.path());
    filing::save_snapshot(&files.population, &vec![Individual::new(vec![2.0, 2.0]); 6]).unwrap();
    let corrupt = Individual::evaluated(
        vec![2.0, 2.0],
        SimulationResult::new(
            Curve::new(vec![3.0, 2.0, 1.0], vec![-12.0]),
            Curve::new(Vec::new(), Vec::new()),
        ),
    );
    filing::append_line(&files.explored, &corrupt).unwrap();

    let calls = Rc::new(Cell::new(0));
    let mut engine = SearchEngine::new(
        &config,
        ParameterSpace::from_config(&config),
        counting_simulator(calls.clone()),
    )
    .unwrap();
    assert!(engine.store().is_empty());

    engine
        .ensure_evaluated(Cohort::Population, &mut SilentProgressCallback)
        .unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(engine.population()[0].result, Some(resonator_response(&[2.0, 2.0])));
}
